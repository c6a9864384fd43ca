use std::fmt::{self, Display, Formatter};
use std::num::ParseFloatError;

/// The kind of failure behind an [`Error`](struct.Error.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed expression: empty input, unbalanced parenthesis, dangling
    /// operator, nesting too deep, wrong number of arguments
    Structural,
    /// Unknown variable or function name
    UnknownReference,
    /// An evaluated value could not be used by an operator
    InvalidOperand,
    /// The raw text of a function argument could not be used
    InvalidArgument,
    /// An operator was used in a position (unary/binary) it does not support
    Unsupported,
}

impl Display for ErrorKind {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let name = match *self {
            Self::Structural => "StructuralError",
            Self::UnknownReference => "NameError",
            Self::InvalidOperand => "OperandError",
            Self::InvalidArgument => "ArgumentError",
            Self::Unsupported => "UnsupportedError",
        };
        fmt.write_str(name)
    }
}

/// The failure wrapped by an [`Error`](struct.Error.html)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Cause {
    /// Text that is not a number
    #[error(transparent)]
    Number(#[from] ParseFloatError),
    /// A lower level evaluation error
    #[error(transparent)]
    Eval(Box<Error>),
}

impl From<Error> for Cause {
    fn from(error: Error) -> Self {
        Self::Eval(Box::new(error))
    }
}

/// Error type for the reckoner crate.
///
/// Every error carries a message for humans and, when it was raised in
/// response to a lower level failure, that failure as its cause. Causes are
/// never flattened: a failed numeric parse inside a function argument shows
/// up as `Two numeric arguments are required` → `Invalid argument: x` →
/// `Invalid operand: x` → the `ParseFloatError` itself.
///
/// ```
/// use reckoner::{eval, ErrorKind, NoVariables};
///
/// let error = eval("min(1, \"a\")", &NoVariables).unwrap_err();
/// assert_eq!(error.kind(), ErrorKind::InvalidArgument);
/// assert_eq!(error.to_string(), "Two numeric arguments are required");
///
/// let messages: Vec<String> = error.causes().map(ToString::to_string).collect();
/// assert_eq!(messages, ["Invalid argument: \"a\"", "Invalid operand: a"]);
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Cause>,
}

impl Error {
    /// Create a new error without a cause
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach `cause` to this error, replacing any previous one
    #[must_use]
    pub fn caused_by<C: Into<Cause>>(mut self, cause: C) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Malformed expression
    pub fn structural<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Structural, message)
    }

    /// A variable name the resolver does not know about
    pub fn unknown_variable(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownReference,
            format!("Unknown variable: {}", name),
        )
    }

    /// A function name that is not registered
    pub fn unknown_function(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownReference,
            format!("Unknown function: {}", name),
        )
    }

    /// An already evaluated `value` that could not be coerced
    pub fn invalid_operand<V: Display, C: Into<Cause>>(value: V, cause: C) -> Self {
        Self::new(ErrorKind::InvalidOperand, format!("Invalid operand: {}", value))
            .caused_by(cause)
    }

    /// The raw `argument` text that could not be evaluated or coerced
    pub fn invalid_argument<C: Into<Cause>>(argument: &str, cause: C) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("Invalid argument: {}", argument),
        )
        .caused_by(cause)
    }

    /// An operator used in a position it does not support
    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the message of this error, without its causes
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the direct cause of this error, if any
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Get the direct cause of this error if it is itself an evaluation error
    pub fn inner(&self) -> Option<&Error> {
        match self.cause {
            Some(Cause::Eval(ref inner)) => Some(inner),
            _ => None,
        }
    }

    /// Iterate over the nested evaluation errors below this one, closest
    /// first. A final non-evaluation cause (a `ParseFloatError`) is not
    /// included, use `std::error::Error::source` to reach it.
    pub fn causes(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(self.inner(), |error| error.inner())
    }

    /// Get the innermost evaluation error of the chain, which is `self` when
    /// there is no nested evaluation error
    pub fn root(&self) -> &Error {
        self.causes().last().unwrap_or(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn parse_failure() -> ParseFloatError {
        "abc".parse::<f64>().unwrap_err()
    }

    #[test]
    fn messages() {
        assert_eq!(Error::unknown_variable("x").to_string(), "Unknown variable: x");
        assert_eq!(Error::unknown_function("f").to_string(), "Unknown function: f");
        assert_eq!(
            Error::invalid_operand("abc", parse_failure()).to_string(),
            "Invalid operand: abc"
        );
        assert_eq!(ErrorKind::UnknownReference.to_string(), "NameError");
    }

    #[test]
    fn chain() {
        let operand = Error::invalid_operand("abc", parse_failure());
        let argument = Error::invalid_argument("abc", operand.clone());
        let function = Error::new(ErrorKind::InvalidArgument, "Two numeric arguments are required")
            .caused_by(argument.clone());

        let causes: Vec<&Error> = function.causes().collect();
        assert_eq!(causes, [&argument, &operand]);
        assert_eq!(function.root(), &operand);
        assert_eq!(operand.root(), &operand);

        let source = operand.source().expect("operand error has a source");
        assert_eq!(source.to_string(), parse_failure().to_string());
        assert!(source.source().is_none());

        let source = function.source().expect("function error has a source");
        assert_eq!(source.to_string(), "Invalid argument: abc");
    }

    #[test]
    fn caused_by_replaces() {
        let error = Error::structural("outer")
            .caused_by(Error::structural("first"))
            .caused_by(Error::structural("second"));
        assert_eq!(error.inner().map(Error::message), Some("second"));
        assert_eq!(error.causes().count(), 1);
    }
}
