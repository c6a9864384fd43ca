//! Functions and the registry they are looked up in.
//!
//! A function receives the raw, unevaluated text between its parentheses.
//! It is free to split it with [`Arguments`](struct.Arguments.html) and
//! to evaluate the pieces it needs with the evaluator it is given, which
//! lets every function own its arity and argument types, and lets functions
//! such as `if` skip the evaluation of some arguments.

use crate::args::Arguments;
use crate::coerce;
use crate::error::{Error, ErrorKind};
use crate::evaluator::Evaluator;
use crate::util::MATH_FUNCTIONS;
use crate::value::Value;
use hashbrown::HashMap;
use std::fmt;

/// A function which can be plugged in a
/// [`FunctionRegistry`](struct.FunctionRegistry.html).
///
/// # Examples
///
/// ```
/// use reckoner::{coerce, Arguments, Context, Error, Evaluator};
/// use reckoner::{Function, FunctionRegistry, NoVariables, OperatorRegistry, Value};
///
/// /// `hypot(a, b)`
/// struct Hypot;
///
/// impl Function for Hypot {
///     fn name(&self) -> &str { "hypot" }
///
///     fn execute(&self, evaluator: &Evaluator, arguments: &str) -> Result<Value, Error> {
///         let [a, b] = Arguments::new(arguments).exactly::<2>()?;
///         let a = coerce::argument(evaluator, a)?;
///         let b = coerce::argument(evaluator, b)?;
///         Ok(Value::Number(a.hypot(b)))
///     }
/// }
///
/// let operators = OperatorRegistry::with_builtins();
/// let mut functions = FunctionRegistry::with_builtins();
/// functions.register(Hypot);
///
/// let context = Context::new(&operators, &functions, &NoVariables);
/// assert_eq!(context.evaluate("hypot(3, 2 * 2)"), Ok(Value::Number(5.0)));
/// ```
pub trait Function: Send + Sync {
    /// The name of this function, which is also its identity
    fn name(&self) -> &str;

    /// Run this function with the raw text of its `arguments`
    fn execute(&self, evaluator: &Evaluator, arguments: &str) -> Result<Value, Error>;
}

/// The set of functions known to an evaluation, looked up by their exact
/// (case sensitive) name.
///
/// Registering a function whose name is already known replaces the previous
/// one.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Box<dyn Function>>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing all the built-in functions:
    ///
    /// - `min(a, b)` and `max(a, b)`;
    /// - `sum(a, b, ...)`, with any number of arguments;
    /// - `if(condition, then, otherwise)`, which only evaluates the selected
    ///   branch;
    /// - the single argument functions `sqrt`, `cbrt`, `sin`, `cos`, `tan`,
    ///   `asin`, `acos`, `atan`, `sinh`, `cosh`, `tanh`, `asinh`, `acosh`,
    ///   `atanh`, `floor`, `ceil`, `round`, `abs`, `exp`, `ln`, `log2` and
    ///   `log10`, with the same meaning as the corresponding `f64` methods.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(MinMax::Min);
        registry.register(MinMax::Max);
        registry.register(Sum);
        registry.register(If);
        for (&name, &function) in MATH_FUNCTIONS.iter() {
            registry.register(Math { name, function });
        }
        registry
    }

    /// Add `function` to this registry, replacing any function with the
    /// same name
    pub fn register<F: Function + 'static>(&mut self, function: F) {
        let name = function.name().to_owned();
        if self.functions.insert(name.clone(), Box::new(function)).is_some() {
            tracing::debug!(name = %name, "replaced function");
        }
    }

    /// Get the function called `name`
    pub fn get(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|function| &**function)
    }

    /// Check if a function called `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Iterate over the names of the registered functions, in no particular
    /// order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if this registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        fmt.debug_struct("FunctionRegistry")
            .field("names", &names)
            .finish()
    }
}

/// Evaluate exactly `N` numeric arguments, failing with `message` caused by
/// the first problem found
fn numeric_arguments<const N: usize>(
    evaluator: &Evaluator,
    arguments: &str,
    message: &str,
) -> Result<[f64; N], Error> {
    Arguments::new(arguments)
        .exactly::<N>()
        .and_then(|arguments| {
            let mut numbers = [0.0; N];
            for (number, argument) in numbers.iter_mut().zip(arguments.iter()) {
                *number = coerce::argument(evaluator, argument)?;
            }
            Ok(numbers)
        })
        .map_err(|cause| Error::new(ErrorKind::InvalidArgument, message).caused_by(cause))
}

/// `min(a, b)` and `max(a, b)`
#[derive(Clone, Copy)]
enum MinMax {
    Min,
    Max,
}

impl Function for MinMax {
    fn name(&self) -> &str {
        match *self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    fn execute(&self, evaluator: &Evaluator, arguments: &str) -> Result<Value, Error> {
        let [a, b] =
            numeric_arguments::<2>(evaluator, arguments, "Two numeric arguments are required")?;
        let result = match *self {
            Self::Min => a.min(b),
            Self::Max => a.max(b),
        };
        Ok(Value::Number(result))
    }
}

/// `sum(a, b, ...)`, `sum()` is 0
struct Sum;

impl Function for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn execute(&self, evaluator: &Evaluator, arguments: &str) -> Result<Value, Error> {
        if arguments.trim().is_empty() {
            return Ok(Value::Number(0.0));
        }
        Arguments::new(arguments)
            .map(|argument| coerce::argument(evaluator, argument))
            .sum::<Result<f64, Error>>()
            .map(Value::Number)
            .map_err(|cause| {
                Error::new(ErrorKind::InvalidArgument, "Numeric arguments are required")
                    .caused_by(cause)
            })
    }
}

/// `if(condition, then, otherwise)`
struct If;

impl Function for If {
    fn name(&self) -> &str {
        "if"
    }

    fn execute(&self, evaluator: &Evaluator, arguments: &str) -> Result<Value, Error> {
        let wrap = |cause: Error| {
            Error::new(
                ErrorKind::InvalidArgument,
                "A numeric condition and two values are required",
            )
            .caused_by(cause)
        };
        let [condition, then, otherwise] = Arguments::new(arguments).exactly::<3>().map_err(wrap)?;
        let branch = if coerce::argument(evaluator, condition).map_err(wrap)? != 0.0 {
            then
        } else {
            otherwise
        };
        evaluator.nested().evaluate(branch)
    }
}

/// Single argument functions from `MATH_FUNCTIONS`
struct Math {
    name: &'static str,
    function: fn(f64) -> f64,
}

impl Function for Math {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&self, evaluator: &Evaluator, arguments: &str) -> Result<Value, Error> {
        let [x] =
            numeric_arguments::<1>(evaluator, arguments, "One numeric argument is required")?;
        Ok(Value::Number((self.function)(x)))
    }
}
