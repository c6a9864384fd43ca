#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(
    clippy::needless_return,
    clippy::missing_docs_in_private_items,
    clippy::non_ascii_literal,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

//! Reckoner, a crate for embedding a small formula language in an
//! application.
//!
//! The host gives an expression such as `"min(2,3)+4%2"` and a way to
//! resolve variables, and gets back a [`Value`](enum.Value.html), which is
//! either a number or a piece of text. The easiest way to use this crate is
//! with the [`eval`](fn.eval.html) function:
//!
//! ```
//! use reckoner::{eval, NoVariables, Value};
//! assert_eq!(eval("3 + 5 * 2", &NoVariables), Ok(Value::Number(13.0)));
//! ```
//!
//! The second argument to `eval` resolves variables. It can be a
//! `HashMap<String, f64>`, a `HashMap<String, Value>` or a closure:
//!
//! ```
//! use std::collections::HashMap;
//! use reckoner::Value;
//!
//! let mut context: HashMap<String, f64> = HashMap::new();
//! context.insert("a".into(), 3.5);
//! assert_eq!(reckoner::eval("2 * a", &context), Ok(Value::Number(7.0)));
//! ```
//!
//! Operators and functions live in explicit registries, built once and then
//! shared by any number of evaluations. Hosts can add their own operators
//! and functions, or replace the built-in ones, before creating a
//! [`Context`](struct.Context.html):
//!
//! ```
//! use reckoner::{Context, FunctionRegistry, NoVariables, OperatorRegistry, Value};
//!
//! let operators = OperatorRegistry::with_builtins();
//! let functions = FunctionRegistry::with_builtins();
//! let context = Context::new(&operators, &functions, &NoVariables);
//!
//! assert_eq!(context.evaluate("max(1, 10 % 4)"), Ok(Value::Number(2.0)));
//! assert_eq!(context.evaluate("if(1 < 2, \"yes\", \"no\")"), Ok(Value::from("yes")));
//! ```
//!
//! # Language definition
//!
//! An expression can contain the following elements:
//!
//! - number literals: `12`, `0.5`, `.5`, `4e-3`, ...;
//! - text literals between double quotes: `"some text"`. There are no
//!   escape sequences;
//! - left and right parenthesis;
//! - operators, see
//!   [`OperatorRegistry::with_builtins`](struct.OperatorRegistry.html#method.with_builtins)
//!   for the built-in ones. Operators used without a left operand (`-a`,
//!   `!b`) are unary operators;
//! - variables. Variables names are ASCII only, and can start by a letter or
//!   `_`, and can contain letters, digits, `.`, `_`, `[` or `]`.
//! - function calls: `min(a, 2)`, `sqrt(22.0)`, see
//!   [`FunctionRegistry::with_builtins`](struct.FunctionRegistry.html#method.with_builtins)
//!   for the built-in ones.
//!
//! When several operators appear outside of parenthesis, the one with the
//! lowest precedence is applied last. Operators with the same precedence are
//! grouped from the left (`10 - 3 - 2` is `5`), except for right associative
//! ones such as `^`.
//!
//! # Errors
//!
//! Every failure is reported as an [`Error`](struct.Error.html) with an
//! [`ErrorKind`](enum.ErrorKind.html), a message, and the lower level error
//! which caused it, if any. Errors are never swallowed: a typo in a deeply
//! nested function argument is reported by the outermost function, with the
//! full chain of causes down to the unknown name.
//!
//! # Technical details
//!
//! reckoner evaluates expressions by recursively cutting them at their
//! top-level operator with the lowest precedence, without building an AST.
//! The nesting depth of this recursion is limited by
//! [`Config::max_depth`](struct.Config.html#structfield.max_depth).
//! Evaluation is synchronous and never modifies the registries, which can be
//! shared between threads.

#[macro_use]
extern crate lazy_static;

mod args;
pub mod coerce;
mod config;
mod context;
mod error;
mod evaluator;
mod function;
mod lexer;
mod operator;
mod util;
mod value;

pub use args::Arguments;
pub use config::{Config, DEFAULT_MAX_DEPTH};
pub use context::{Context, NoVariables, VariableResolver};
pub use error::{Cause, Error, ErrorKind};
pub use evaluator::{eval, Evaluator};
pub use function::{Function, FunctionRegistry};
pub use lexer::is_variable;
pub use operator::{Associativity, Operator, OperatorRegistry};
pub use util::MATH_FUNCTIONS;
pub use value::Value;
