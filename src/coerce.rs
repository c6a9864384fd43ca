//! Conversion of values and argument text to numbers.
//!
//! There are two strict flavours, which differ in what they report on
//! failure. [`operand`](fn.operand.html) reports the already computed value
//! that is not a number, and is used by operators. [`argument`](fn.argument.html)
//! reports the raw argument text, and is used by functions which evaluate
//! their own arguments.

use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::lexer::scan_number;
use crate::value::Value;

/// Extract the longest leading number of `text`, ignoring leading
/// whitespace, or return `default` when `text` does not start with a number.
///
/// # Examples
///
/// ```
/// # use reckoner::coerce::extract_number;
/// assert_eq!(extract_number("12.5kg", 0.0), 12.5);
/// assert_eq!(extract_number("  -3e2 apples", 0.0), -300.0);
/// assert_eq!(extract_number("kg", 1.0), 1.0);
/// ```
pub fn extract_number(text: &str, default: f64) -> f64 {
    let text = text.trim_start();
    let sign = match text.chars().next() {
        Some('+') | Some('-') => 1,
        _ => 0,
    };
    match scan_number(&text[sign..]) {
        0 => default,
        length => text[..sign + length].parse().unwrap_or(default),
    }
}

/// Best effort conversion of `value` to a number: numbers are returned as
/// is, text goes through [`extract_number`](fn.extract_number.html) with a
/// default of `0`.
pub fn number(value: &Value) -> f64 {
    match *value {
        Value::Number(number) => number,
        Value::Text(ref text) => extract_number(text, 0.0),
    }
}

/// Convert an evaluated operand to a number, failing with
/// `Invalid operand: <value>` if it is not numeric.
pub fn operand(value: &Value) -> Result<f64, Error> {
    value
        .to_number()
        .map_err(|cause| Error::invalid_operand(value, cause))
}

/// Evaluate the raw `argument` text with a nested evaluator and convert the
/// result to a number, failing with `Invalid argument: <argument>` wrapping
/// whatever went wrong.
pub fn argument(evaluator: &Evaluator, argument: &str) -> Result<f64, Error> {
    evaluator
        .nested()
        .evaluate(argument)
        .and_then(|value| operand(&value))
        .map_err(|cause| Error::invalid_argument(argument.trim(), cause))
}
