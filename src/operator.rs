//! Operators and the registry they are looked up in.
//!
//! An operator is identified by its symbol and carries a precedence: when an
//! expression contains several operators outside of parentheses, the one
//! with the lowest precedence is evaluated last, after both of its sides.
//! Operators can be used as binary (`a % b`) or unary prefix (`-a`)
//! operators, and report an `Unsupported` error for the forms they do not
//! implement.

use crate::coerce::operand;
use crate::error::Error;
use crate::value::Value;
use hashbrown::HashMap;
use std::cmp::Ordering;
use std::fmt;

/// How a chain of operators with the same precedence is grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a - b - c` is `(a - b) - c`
    Left,
    /// `a ^ b ^ c` is `a ^ (b ^ c)`
    Right,
}

/// An operator which can be plugged in an
/// [`OperatorRegistry`](struct.OperatorRegistry.html).
///
/// # Examples
///
/// ```
/// use reckoner::{coerce, Context, Error, FunctionRegistry, NoVariables};
/// use reckoner::{Operator, OperatorRegistry, Value};
///
/// /// Integer division
/// struct Quotient;
///
/// impl Operator for Quotient {
///     fn symbol(&self) -> &str { "//" }
///     fn precedence(&self) -> u8 { 6 }
///     fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
///         let quotient = coerce::operand(left)? / coerce::operand(right)?;
///         Ok(Value::Number(quotient.trunc()))
///     }
/// }
///
/// let mut operators = OperatorRegistry::with_builtins();
/// operators.register(Quotient);
/// let functions = FunctionRegistry::with_builtins();
///
/// let context = Context::new(&operators, &functions, &NoVariables);
/// assert_eq!(context.evaluate("7 // 2 + 1"), Ok(Value::Number(4.0)));
/// ```
pub trait Operator: Send + Sync {
    /// The symbol of this operator, which is also its identity
    fn symbol(&self) -> &str;

    /// Operators with a lower precedence are evaluated after the others
    fn precedence(&self) -> u8;

    /// How chains of operators with the same precedence are grouped
    fn associativity(&self) -> Associativity {
        Associativity::Left
    }

    /// Combine two evaluated operands
    fn binary(&self, _left: &Value, _right: &Value) -> Result<Value, Error> {
        Err(Error::unsupported(format!(
            "Operator '{}' can not be used as a binary operator",
            self.symbol()
        )))
    }

    /// Apply this operator to a single evaluated operand.
    ///
    /// An operator is used as a prefix when nothing comes before it, and
    /// only once the fragment has no binary operator left to split on. A
    /// prefix therefore binds tighter than every binary operator, whatever
    /// its precedence: `-2 ^ 2` is `(-2) ^ 2 = 4`, and `-(2 ^ 2)` must be
    /// written with parenthesis.
    fn unary(&self, _operand: &Value) -> Result<Value, Error> {
        Err(Error::unsupported(format!(
            "Operator '{}' can not be used as a unary operator",
            self.symbol()
        )))
    }
}

/// The set of operators known to an evaluation, looked up by symbol.
///
/// Registering an operator whose symbol is already known replaces the
/// previous one, which allows to override the built-in operators.
#[derive(Default)]
pub struct OperatorRegistry {
    operators: HashMap<String, Box<dyn Operator>>,
    /// Registered symbols, longest first
    symbols: Vec<String>,
}

impl OperatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing all the built-in operators:
    ///
    /// | symbol | precedence | binary | unary |
    /// |--------|-----------:|--------|-------|
    /// | `\|\|` | 1 | logical or | |
    /// | `&&` | 2 | logical and | |
    /// | `==` `!=` | 3 | equality | |
    /// | `<` `<=` `>` `>=` | 4 | comparison | |
    /// | `+` | 5 | addition or text concatenation | identity |
    /// | `-` | 5 | subtraction | negation |
    /// | `*` `/` `%` | 6 | multiplication, division, remainder | |
    /// | `^` | 7 | exponentiation (right associative) | |
    /// | `!` | 8 | | logical not |
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Or);
        registry.register(And);
        registry.register(Compare::Equal);
        registry.register(Compare::NotEqual);
        registry.register(Compare::Less);
        registry.register(Compare::LessOrEqual);
        registry.register(Compare::Greater);
        registry.register(Compare::GreaterOrEqual);
        registry.register(Add);
        registry.register(Subtract);
        registry.register(Multiply);
        registry.register(Divide);
        registry.register(Mod);
        registry.register(Power);
        registry.register(Not);
        registry
    }

    /// Add `operator` to this registry, replacing any operator with the same
    /// symbol
    pub fn register<O: Operator + 'static>(&mut self, operator: O) {
        let symbol = operator.symbol().to_owned();
        if self
            .operators
            .insert(symbol.clone(), Box::new(operator))
            .is_some()
        {
            tracing::debug!(symbol = %symbol, "replaced operator");
        } else {
            self.symbols.push(symbol);
            self.symbols
                .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
    }

    /// Get the operator with the given `symbol`
    pub fn get(&self, symbol: &str) -> Option<&dyn Operator> {
        self.operators.get(symbol).map(|operator| &**operator)
    }

    /// Check if an operator with the given `symbol` is registered
    pub fn contains(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    /// Get the operator with the longest symbol `input` starts with
    pub fn longest_match(&self, input: &str) -> Option<&dyn Operator> {
        self.symbols
            .iter()
            .find(|symbol| input.starts_with(symbol.as_str()))
            .and_then(|symbol| self.get(symbol))
    }

    /// Iterate over the registered symbols, longest first
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Get the number of registered operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if this registry is empty
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("OperatorRegistry")
            .field("symbols", &self.symbols)
            .finish()
    }
}

fn is_true(value: &Value) -> Result<bool, Error> {
    operand(value).map(|number| number != 0.0)
}

/// `a || b`
struct Or;

impl Operator for Or {
    fn symbol(&self) -> &str {
        "||"
    }

    fn precedence(&self) -> u8 {
        1
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::from_bool(is_true(left)? || is_true(right)?))
    }
}

/// `a && b`
struct And;

impl Operator for And {
    fn symbol(&self) -> &str {
        "&&"
    }

    fn precedence(&self) -> u8 {
        2
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::from_bool(is_true(left)? && is_true(right)?))
    }
}

/// `!a`
struct Not;

impl Operator for Not {
    fn symbol(&self) -> &str {
        "!"
    }

    fn precedence(&self) -> u8 {
        8
    }

    fn unary(&self, operand: &Value) -> Result<Value, Error> {
        Ok(Value::from_bool(!is_true(operand)?))
    }
}

/// Comparison operators. Numbers are compared as numbers, anything else as
/// text.
#[derive(Clone, Copy)]
enum Compare {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Compare {
    fn accepts(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Self::NotEqual, ordering) => ordering != Some(Ordering::Equal),
            (_, None) => false,
            (Self::Equal, Some(ordering)) => ordering == Ordering::Equal,
            (Self::Less, Some(ordering)) => ordering == Ordering::Less,
            (Self::LessOrEqual, Some(ordering)) => ordering != Ordering::Greater,
            (Self::Greater, Some(ordering)) => ordering == Ordering::Greater,
            (Self::GreaterOrEqual, Some(ordering)) => ordering != Ordering::Less,
        }
    }
}

impl Operator for Compare {
    fn symbol(&self) -> &str {
        match *self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }

    fn precedence(&self) -> u8 {
        match *self {
            Self::Equal | Self::NotEqual => 3,
            _ => 4,
        }
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        let ordering = match (left.to_number(), right.to_number()) {
            (Ok(left), Ok(right)) => left.partial_cmp(&right),
            _ => Some(left.to_string().cmp(&right.to_string())),
        };
        Ok(Value::from_bool(self.accepts(ordering)))
    }
}

/// `a + b` adds numbers and concatenates anything else, `+a` is `a`
struct Add;

impl Operator for Add {
    fn symbol(&self) -> &str {
        "+"
    }

    fn precedence(&self) -> u8 {
        5
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        match (left.to_number(), right.to_number()) {
            (Ok(left), Ok(right)) => Ok(Value::Number(left + right)),
            _ => Ok(Value::Text(format!("{}{}", left, right))),
        }
    }

    fn unary(&self, value: &Value) -> Result<Value, Error> {
        operand(value).map(Value::Number)
    }
}

/// `a - b`, `-a`
struct Subtract;

impl Operator for Subtract {
    fn symbol(&self) -> &str {
        "-"
    }

    fn precedence(&self) -> u8 {
        5
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::Number(operand(left)? - operand(right)?))
    }

    fn unary(&self, value: &Value) -> Result<Value, Error> {
        operand(value).map(|number| Value::Number(-number))
    }
}

/// `a * b`
struct Multiply;

impl Operator for Multiply {
    fn symbol(&self) -> &str {
        "*"
    }

    fn precedence(&self) -> u8 {
        6
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::Number(operand(left)? * operand(right)?))
    }
}

/// `a / b`, following IEEE rules for division by zero
struct Divide;

impl Operator for Divide {
    fn symbol(&self) -> &str {
        "/"
    }

    fn precedence(&self) -> u8 {
        6
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::Number(operand(left)? / operand(right)?))
    }
}

/// `a % b`, the floating point remainder of `a / b`
struct Mod;

impl Operator for Mod {
    fn symbol(&self) -> &str {
        "%"
    }

    fn precedence(&self) -> u8 {
        6
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::Number(libm::fmod(operand(left)?, operand(right)?)))
    }
}

/// `a ^ b`
struct Power;

impl Operator for Power {
    fn symbol(&self) -> &str {
        "^"
    }

    fn precedence(&self) -> u8 {
        7
    }

    fn associativity(&self) -> Associativity {
        Associativity::Right
    }

    fn binary(&self, left: &Value, right: &Value) -> Result<Value, Error> {
        Ok(Value::Number(libm::pow(operand(left)?, operand(right)?)))
    }
}
