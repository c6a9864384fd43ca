use crate::config::Config;
use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::function::FunctionRegistry;
use crate::operator::OperatorRegistry;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

/// Resolution of variable names to values.
///
/// This is implemented for maps from names to numbers or values, and for
/// closures:
///
/// ```
/// use reckoner::{eval, Value};
///
/// let variables = |name: &str| match name {
///     "answer" => Some(Value::Number(42.0)),
///     _ => None,
/// };
/// assert_eq!(eval("answer / 2", &variables), Ok(Value::Number(21.0)));
/// ```
pub trait VariableResolver {
    /// Get the value of the variable `name`, or `None` if it does not exist
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// A resolver which knows no variable at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl VariableResolver for NoVariables {
    fn resolve(&self, _: &str) -> Option<Value> {
        None
    }
}

impl<S: BuildHasher> VariableResolver for HashMap<String, f64, S> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).copied().map(Value::Number)
    }
}

impl<S: BuildHasher> VariableResolver for HashMap<String, Value, S> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<F> VariableResolver for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// Everything an evaluation needs: the operators and functions to use, the
/// variables and the configuration.
///
/// A context only borrows its registries and never modifies them, so a
/// single set of registries can be shared by any number of contexts, and
/// the same context can evaluate any number of expressions, from any number
/// of threads. Variable resolvers must be `Sync` for this reason.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    operators: &'a OperatorRegistry,
    functions: &'a FunctionRegistry,
    variables: &'a (dyn VariableResolver + Sync),
    config: Config,
}

impl<'a> Context<'a> {
    /// Create a new context with the default configuration
    pub fn new(
        operators: &'a OperatorRegistry,
        functions: &'a FunctionRegistry,
        variables: &'a (dyn VariableResolver + Sync),
    ) -> Self {
        Self {
            operators,
            functions,
            variables,
            config: Config::default(),
        }
    }

    /// Use the given `config` in this context
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Get the operators available in this context
    pub fn operators(&self) -> &'a OperatorRegistry {
        self.operators
    }

    /// Get the functions available in this context
    pub fn functions(&self) -> &'a FunctionRegistry {
        self.functions
    }

    /// Get the configuration of this context
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the value of the variable `name`
    pub fn resolve(&self, name: &str) -> Option<Value> {
        self.variables.resolve(name)
    }

    /// Evaluate `expression` in this context. This is a shortcut for
    /// `Evaluator::new(&context).evaluate(expression)`.
    pub fn evaluate(&self, expression: &str) -> Result<Value, Error> {
        Evaluator::new(self).evaluate(expression)
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Context")
            .field("operators", self.operators)
            .field("functions", self.functions)
            .field("config", &self.config)
            .finish()
    }
}
