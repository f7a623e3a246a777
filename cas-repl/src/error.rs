use cas_error::Error as ParseError;

/// Utility enum to package errors that can occur while reading a command.
#[derive(Debug)]
pub enum Error {
    /// An expression or equation in the command failed to parse. The second field is the source
    /// text the error's spans refer to.
    Parse(ParseError, String),

    /// The command itself was malformed.
    Usage(String),
}

impl Error {
    /// Report the error to stderr.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Parse(err, source) => err.report_to_stderr("input", source),
            Self::Usage(msg) => eprintln!("error: {}", msg),
        }
    }
}
