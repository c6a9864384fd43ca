use crate::error::Error;
use crate::operator::{Associativity, Operator, OperatorRegistry};

#[must_use]
/// Check if `ident` is a valid variable or function name
///
/// # Examples
///
/// ```
/// # use reckoner::is_variable;
///
/// assert_eq!(is_variable("__abc3"), true);
/// assert_eq!(is_variable("34zb"), false);
/// ```
pub fn is_variable(ident: &str) -> bool {
    let mut chars = ident.chars();
    // Check first char
    if !chars.next().map_or(false, is_variable_start) {
        return false;
    }
    // Check all others
    for c in chars {
        if !is_variable_part(c) {
            return false;
        }
    }
    return true;
}

/// The place where an expression is cut in two halves
pub(crate) struct Split<'r> {
    /// Byte offset of the operator symbol
    pub index: usize,
    pub operator: &'r dyn Operator,
}

/// The shape of an expression without any top-level operator
#[derive(Debug, PartialEq)]
pub(crate) enum Term<'a> {
    /// `name(arguments)`
    Call { name: &'a str, arguments: &'a str },
    /// `(inner)`
    Group(&'a str),
    Variable(&'a str),
    Number(f64),
    /// `"text"`, without the quotes
    Text(&'a str),
}

/// Find the top-level operator where `expression` should be split: the one
/// with the lowest precedence, right-most on ties for left associative
/// operators and left-most for right associative ones.
///
/// Operators which are not preceded by an operand are unary prefixes and
/// never split an expression. This also checks that parentheses and quotes
/// are balanced.
pub(crate) fn find_split<'r>(
    expression: &str,
    operators: &'r OperatorRegistry,
) -> Result<Option<Split<'r>>, Error> {
    let mut best: Option<Split<'r>> = None;
    let mut depth = 0_usize;
    let mut expect_operand = true;
    let mut index = 0;

    while let Some(c) = expression[index..].chars().next() {
        let rest = &expression[index..];
        match c {
            '"' => {
                index += scan_text(rest)?;
                expect_operand = false;
                continue;
            }
            '(' => {
                depth += 1;
                index += 1;
                continue;
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| unbalanced(expression))?;
                expect_operand = false;
                index += 1;
                continue;
            }
            _ if depth > 0 || c.is_whitespace() => {
                index += c.len_utf8();
                continue;
            }
            _ => {}
        }

        let length = scan_number(rest);
        if length > 0 {
            index += length;
            expect_operand = false;
            continue;
        }

        let (operator, length) = if is_variable_start(c) {
            let length = rest.find(|c| !is_variable_part(c)).unwrap_or(rest.len());
            (operators.get(&rest[..length]), length)
        } else {
            match operators.longest_match(rest) {
                Some(operator) => (Some(operator), operator.symbol().len()),
                None => (None, c.len_utf8()),
            }
        };

        match operator {
            Some(operator) => {
                if !expect_operand && splits_before(operator, best.as_ref()) {
                    best = Some(Split { index, operator });
                }
                expect_operand = true;
            }
            None => expect_operand = false,
        }
        index += length;
    }

    if depth != 0 {
        return Err(unbalanced(expression));
    }
    Ok(best)
}

fn splits_before(candidate: &dyn Operator, best: Option<&Split>) -> bool {
    match best {
        None => true,
        Some(best) => {
            let (new, old) = (candidate.precedence(), best.operator.precedence());
            new < old || (new == old && candidate.associativity() == Associativity::Left)
        }
    }
}

/// Get the operator at the very start of `expression`, if any
pub(crate) fn prefix_operator<'r>(
    expression: &str,
    operators: &'r OperatorRegistry,
) -> Option<&'r dyn Operator> {
    let first = expression.chars().next()?;
    if is_variable_start(first) {
        let length = expression
            .find(|c| !is_variable_part(c))
            .unwrap_or(expression.len());
        operators.get(&expression[..length])
    } else {
        operators.longest_match(expression)
    }
}

/// Classify a trimmed `expression` which has no top-level operator
pub(crate) fn term(expression: &str) -> Result<Term<'_>, Error> {
    if expression.ends_with(')') {
        if let Some(open) = expression.find('(') {
            if closing_paren(expression, open) == Some(expression.len() - 1) {
                let inner = &expression[open + 1..expression.len() - 1];
                let name = expression[..open].trim_end();
                if open == 0 {
                    return Ok(Term::Group(inner));
                } else if is_variable(name) {
                    return Ok(Term::Call {
                        name,
                        arguments: inner,
                    });
                }
            }
        }
    }

    if is_variable(expression) {
        return Ok(Term::Variable(expression));
    }

    if let Some(first) = expression.chars().next() {
        if (first.is_ascii_digit() || first == '.') && scan_number(expression) == expression.len()
        {
            return expression.parse().map(Term::Number).map_err(|cause| {
                Error::structural(format!("Invalid number: {}", expression)).caused_by(cause)
            });
        }
        if first == '"' && scan_text(expression)? == expression.len() {
            return Ok(Term::Text(&expression[1..expression.len() - 1]));
        }
    }

    Err(Error::structural(format!("Invalid expression: {}", expression)))
}

/// Get the byte offset of the parenthesis closing the one at `open`
pub(crate) fn closing_paren(input: &str, open: usize) -> Option<usize> {
    let mut depth = 0_usize;
    let mut quoted = false;
    for (index, c) in input[open..].char_indices() {
        match c {
            '"' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Get the length of the unsigned number at the start of `input`, or 0 if
/// `input` does not start with a number. Exponents are only included when
/// they are complete.
pub(crate) fn scan_number(input: &str) -> usize {
    let bytes = input.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = digits(0);
    let mut mantissa = end;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits(end + 1);
        mantissa += fraction;
        end += 1 + fraction;
    }
    if mantissa == 0 {
        return 0;
    }

    if let Some(b'e') | Some(b'E') = bytes.get(end) {
        let mut exponent = end + 1;
        if let Some(b'+') | Some(b'-') = bytes.get(exponent) {
            exponent += 1;
        }
        let count = digits(exponent);
        if count > 0 {
            end = exponent + count;
        }
    }
    end
}

/// Get the length of the quoted text at the start of `input`, quotes
/// included
fn scan_text(input: &str) -> Result<usize, Error> {
    input[1..]
        .find('"')
        .map(|end| end + 2)
        .ok_or_else(|| Error::structural(format!("Unterminated text literal: {}", input)))
}

fn unbalanced(expression: &str) -> Error {
    Error::structural(format!("Unbalanced parenthesis: {}", expression))
}

/// Check if `c` can appear at the first character of a variable
fn is_variable_start(c: char) -> bool {
    c == '_' || (c.is_ascii() && c.is_alphabetic())
}

/// Check if `c` can appear inside a variable
fn is_variable_part(c: char) -> bool {
    c == '.' || c == '_' || c == '[' || c == ']' || (c.is_ascii() && c.is_alphanumeric())
}
