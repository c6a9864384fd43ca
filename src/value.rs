use crate::lexer::scan_number;
use std::fmt::{self, Display, Formatter};
use std::num::ParseFloatError;

/// The result of evaluating any expression fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A floating point number
    Number(f64),
    /// A piece of text
    Text(String),
}

impl Value {
    /// Boolean values are represented as the numbers `1` and `0`
    pub fn from_bool(value: bool) -> Self {
        Self::Number(if value { 1.0 } else { 0.0 })
    }

    /// Get `Some(number)` if this value is already a number
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Self::Number(number) => Some(number),
            Self::Text(_) => None,
        }
    }

    /// Get `Some(text)` if this value is a piece of text
    pub fn as_text(&self) -> Option<&str> {
        match *self {
            Self::Number(_) => None,
            Self::Text(ref text) => Some(text),
        }
    }

    /// Convert this value to a number, failing if it is text that does not
    /// contain a number (surrounding whitespace is allowed).
    ///
    /// ```
    /// # use reckoner::Value;
    /// assert_eq!(Value::Number(2.5).to_number(), Ok(2.5));
    /// assert_eq!(Value::from(" 4e2 ").to_number(), Ok(400.0));
    /// assert!(Value::from("4 apples").to_number().is_err());
    /// assert!(Value::from("inf").to_number().is_err());
    /// ```
    pub fn to_number(&self) -> Result<f64, ParseFloatError> {
        match *self {
            Self::Number(number) => Ok(number),
            Self::Text(ref text) => {
                let text = text.trim();
                let unsigned = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
                if !unsigned.is_empty() && scan_number(unsigned) == unsigned.len() {
                    text.parse()
                } else {
                    // `inf` and `nan` parse as f64, but are not numbers here
                    unsigned.parse::<f64>().and_then(|_| "-".parse())
                }
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Number(number) => write!(fmt, "{}", number),
            Self::Text(ref text) => fmt.write_str(text),
        }
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_number() == Some(*other)
    }
}
