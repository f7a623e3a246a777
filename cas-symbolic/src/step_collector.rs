use std::sync::mpsc::Sender;

/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when you don't
/// want to know the steps taken by an algorithm, which lets the algorithm skip building them.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

/// Steps are sent over the channel as they are produced. A disconnected receiver is not an error;
/// the steps are dropped.
impl<S> StepCollector<S> for Sender<S> {
    #[inline]
    fn push(&mut self, step: S) {
        let _ = self.send(step);
    }
}
