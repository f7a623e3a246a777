//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that attaches source spans to an [`ErrorKind`].
//!
//! Error kinds are usually declared with `#[derive(ErrorKind)]` from the `cas-attrs` crate, which
//! generates both the plain-text message and the [`ariadne`] report for the kind.

pub use ariadne;

use ariadne::{Color, Report, Source};
use std::{fmt::{self, Debug, Display}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the one-line message describing the error, without any source highlighting.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Prints the report of this error to stderr, highlighting the given source code.
    ///
    /// The [`Report`] type has no `Display` implementation, so it can only be written to a
    /// stream.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) {
        let report = self.build_report(src_id);
        if let Err(err) = report.eprint((src_id, Source::from(input))) {
            eprintln!("{}", err);
        }
    }

    /// Writes the report of this error into a string, highlighting the given source code. The
    /// output contains ANSI color codes.
    pub fn report_to_string(&self, src_id: &str, input: &str) -> String {
        let mut buf = Vec::new();
        let report = self.build_report(src_id);
        match report.write((src_id, Source::from(input)), &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())?;
        if let Some(span) = self.spans.first() {
            write!(f, " (at {}..{})", span.start, span.end)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
