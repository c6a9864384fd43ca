use crate::context::{Context, VariableResolver};
use crate::error::Error;
use crate::lexer::{find_split, prefix_operator, term, Term};
use crate::operator::{Associativity, Operator};
use crate::util::{BUILTIN_FUNCTIONS, BUILTIN_OPERATORS};
use crate::value::Value;

/// Evaluate a single expression from `input`, using the built-in operators
/// and functions.
///
/// Returns `Ok(result)` if the evaluation is successful, or `Err(cause)` if
/// evaluating the expression failed.
///
/// # Example
///
/// ```
/// # use std::collections::HashMap;
/// # use reckoner::{eval, NoVariables, Value};
///
/// assert_eq!(eval("min(2,3)+4%2", &NoVariables), Ok(Value::Number(2.0)));
///
/// let mut context: HashMap<String, f64> = HashMap::new();
/// context.insert("a".into(), -5.0);
/// assert_eq!(eval("3 * a", &context), Ok(Value::Number(-15.0)));
/// ```
pub fn eval<R: VariableResolver + Sync>(input: &str, variables: &R) -> Result<Value, Error> {
    Context::new(&BUILTIN_OPERATORS, &BUILTIN_FUNCTIONS, variables).evaluate(input)
}

/// Recursive evaluator for expressions.
///
/// An expression is evaluated by cutting it at its top-level operator with
/// the lowest precedence, evaluating both halves and combining them with
/// the operator. Fragments without any top-level operator are, in order of
/// preference, a unary operator applied to the rest of the fragment, a
/// function call, a parenthesized expression, a variable, a number or a
/// quoted text.
///
/// The evaluator keeps no state between evaluations besides its context
/// and its nesting depth, so evaluating the same expression twice gives the
/// same result.
///
/// # Examples
///
/// ```
/// use reckoner::{Context, Evaluator, FunctionRegistry, OperatorRegistry, Value};
/// use std::collections::HashMap;
///
/// let operators = OperatorRegistry::with_builtins();
/// let functions = FunctionRegistry::with_builtins();
/// let mut variables: HashMap<String, Value> = HashMap::new();
/// variables.insert("name".into(), Value::from("world"));
///
/// let context = Context::new(&operators, &functions, &variables);
/// let evaluator = Evaluator::new(&context);
/// assert_eq!(evaluator.evaluate("\"hello \" + name"), Ok(Value::from("hello world")));
/// assert_eq!(evaluator.evaluate("10 - 3 - 2"), Ok(Value::Number(5.0)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    context: Context<'a>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create a new top-level evaluator for the given `context`
    pub fn new(context: &Context<'a>) -> Self {
        Self {
            context: *context,
            depth: 0,
        }
    }

    /// Create an evaluator one level deeper than this one, sharing the same
    /// context. Functions use this to evaluate their arguments.
    pub fn nested(&self) -> Self {
        Self {
            context: self.context,
            depth: self.depth + 1,
        }
    }

    /// Get the context of this evaluator
    pub fn context(&self) -> &Context<'a> {
        &self.context
    }

    /// Get the nesting depth of this evaluator, 0 for top-level evaluators
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluate `expression`
    pub fn evaluate(&self, expression: &str) -> Result<Value, Error> {
        let result = self.evaluate_at(expression, self.depth);
        if self.depth == 0 {
            if let Err(ref error) = result {
                tracing::debug!(expression, error = %error, kind = %error.kind(), "evaluation failed");
            }
        }
        result
    }

    fn evaluate_at(&self, expression: &str, depth: usize) -> Result<Value, Error> {
        let max_depth = self.context.config().max_depth;
        if depth > max_depth {
            return Err(Error::structural(format!(
                "Expression nested too deeply (limit {})",
                max_depth
            )));
        }

        let expression = expression.trim();
        if expression.is_empty() {
            return Err(Error::structural("Empty expression"));
        }

        let operators = self.context.operators();
        if let Some(split) = find_split(expression, operators)? {
            let operator = split.operator;
            let symbol = operator.symbol();
            let right = &expression[split.index + symbol.len()..];
            if right.trim().is_empty() {
                return Err(missing_operand(symbol, expression));
            }
            tracing::trace!(expression, symbol, depth, "binary operator");
            if operator.associativity() == Associativity::Right {
                // `a ^ b ^ c` nests to the right
                let left = self.evaluate_at(&expression[..split.index], depth)?;
                let right = self.evaluate_at(right, depth + 1)?;
                return operator.binary(&left, &right);
            }
            return self.evaluate_chain(&expression[..split.index], operator, right, depth);
        }

        if let Some(operator) = prefix_operator(expression, operators) {
            let symbol = operator.symbol();
            let operand = &expression[symbol.len()..];
            if operand.trim().is_empty() {
                return Err(missing_operand(symbol, expression));
            }
            tracing::trace!(expression, symbol, depth, "unary operator");
            let operand = self.evaluate_at(operand, depth + 1)?;
            return operator.unary(&operand);
        }

        match term(expression)? {
            Term::Call { name, arguments } => {
                let function = self
                    .context
                    .functions()
                    .get(name)
                    .ok_or_else(|| Error::unknown_function(name))?;
                tracing::trace!(name, arguments, depth, "function call");
                let evaluator = Self {
                    context: self.context,
                    depth: depth + 1,
                };
                function.execute(&evaluator, arguments)
            }
            Term::Group(inner) => self.evaluate_at(inner, depth + 1),
            Term::Variable(name) => self
                .context
                .resolve(name)
                .ok_or_else(|| Error::unknown_variable(name)),
            Term::Number(number) => Ok(Value::Number(number)),
            Term::Text(text) => Ok(Value::Text(text.to_owned())),
        }
    }

    /// Evaluate `head operator last`, where `head` may itself be a chain of
    /// left associative operators with the same precedence as `operator`.
    /// Such chains are unrolled in a loop, so `1 + 1 + ... + 1` does not
    /// nest any deeper than `1 + 1`.
    fn evaluate_chain(
        &self,
        head: &str,
        operator: &dyn Operator,
        last: &str,
        depth: usize,
    ) -> Result<Value, Error> {
        let precedence = operator.precedence();
        let mut links = vec![(operator, last)];
        let mut head = head.trim();
        while let Some(split) = find_split(head, self.context.operators())? {
            let next = split.operator;
            if next.precedence() != precedence || next.associativity() != Associativity::Left {
                break;
            }
            let right = &head[split.index + next.symbol().len()..];
            if right.trim().is_empty() {
                return Err(missing_operand(next.symbol(), head));
            }
            links.push((next, right));
            head = head[..split.index].trim();
        }

        let mut value = self.evaluate_at(head, depth)?;
        for (operator, right) in links.into_iter().rev() {
            let right = self.evaluate_at(right, depth)?;
            value = operator.binary(&value, &right)?;
        }
        Ok(value)
    }
}

fn missing_operand(symbol: &str, expression: &str) -> Error {
    Error::structural(format!(
        "Missing operand after '{}' in: {}",
        symbol, expression
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::NoVariables;
    use crate::error::ErrorKind;
    use crate::function::FunctionRegistry;
    use crate::operator::OperatorRegistry;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn variables() -> HashMap<String, Value> {
        let mut variables = HashMap::new();
        variables.insert("a".into(), Value::Number(1.0));
        variables.insert("b".into(), Value::Number(2.0));
        variables.insert("name".into(), Value::from("Ada"));
        variables.insert("digits".into(), Value::from("12"));
        variables
    }

    #[test_case("3 + 5" => 8.0 ; "addition")]
    #[test_case("2 - 5" => -3.0 ; "subtraction")]
    #[test_case("10 % 3" => 1.0 ; "remainder")]
    #[test_case("10.5 % 3" => 1.5 ; "floating point remainder")]
    #[test_case("min(2,3)+4%2" => 2.0 ; "function and operators")]
    #[test_case("3 + 5 * 2" => 13.0 ; "precedence")]
    #[test_case("(3 + 5) * 2" => 16.0 ; "parenthesis")]
    #[test_case("((((7))))" => 7.0 ; "nested parenthesis")]
    #[test_case("10 - 3 - 2" => 5.0 ; "subtraction is left associative")]
    #[test_case("64 / 4 / 2" => 8.0 ; "division is left associative")]
    #[test_case("2 ^ 3 ^ 2" => 512.0 ; "power is right associative")]
    #[test_case("-3" => -3.0 ; "negation")]
    #[test_case("--3" => 3.0 ; "double negation")]
    #[test_case("-2 ^ 2" => 4.0 ; "prefix binds tighter than any split")]
    #[test_case("-(2 ^ 2)" => -4.0 ; "negated power needs parenthesis")]
    #[test_case("-(1 + 2) * 2" => -6.0 ; "negated group")]
    #[test_case("25 - -3" => 28.0 ; "negative right operand")]
    #[test_case("2 * -a" => -2.0 ; "negated variable")]
    #[test_case("+.5e1" => 5.0 ; "unary plus and exponent")]
    #[test_case("(a + b)^2" => 9.0 ; "variables")]
    #[test_case("digits * 2" => 24.0 ; "numeric text variables")]
    #[test_case("max(a, min(b, 10)) + sum(1, 2, 3)" => 8.0 ; "nested calls")]
    #[test_case("sqrt(9) + abs(-1)" => 4.0 ; "math functions")]
    #[test_case("max (1, 2) * 3" => 6.0 ; "space between name and arguments")]
    #[test_case("1 < 2 && 2 <= 2" => 1.0 ; "comparisons and logic")]
    #[test_case("!(a == b) || 0" => 1.0 ; "logical not")]
    #[test_case("if(a > b, 1, 2) * 10" => 20.0 ; "conditional")]
    #[test_case("1e3 + 5E-1" => 1000.5 ; "exponents")]
    fn numbers(expression: &str) -> f64 {
        let context = variables();
        let result = eval(expression, &context).unwrap();
        result.as_number().unwrap()
    }

    #[test_case("\"hello\"" => "hello" ; "text literal")]
    #[test_case("\"Dear \" + name" => "Dear Ada" ; "concatenation")]
    #[test_case("name + 1" => "Ada1" ; "concatenation with a number")]
    #[test_case("\"(a, b) + c\"" => "(a, b) + c" ; "quoted operators are text")]
    #[test_case("if(1, name, 0)" => "Ada" ; "conditional text")]
    fn texts(expression: &str) -> String {
        let context = variables();
        eval(expression, &context).unwrap().to_string()
    }

    #[test_case("" => ErrorKind::Structural ; "empty")]
    #[test_case("   " => ErrorKind::Structural ; "blank")]
    #[test_case("(1 + 2" => ErrorKind::Structural ; "unclosed parenthesis")]
    #[test_case("1 + 2)" => ErrorKind::Structural ; "extra parenthesis")]
    #[test_case("min(1, 2" => ErrorKind::Structural ; "unclosed call")]
    #[test_case("1 +" => ErrorKind::Structural ; "dangling operator")]
    #[test_case("-" => ErrorKind::Structural ; "lonely operator")]
    #[test_case("()" => ErrorKind::Structural ; "empty group")]
    #[test_case("2 3" => ErrorKind::Structural ; "missing operator")]
    #[test_case("\"abc" => ErrorKind::Structural ; "unterminated text")]
    #[test_case("z + 1" => ErrorKind::UnknownReference ; "unknown variable")]
    #[test_case("bogus(1)" => ErrorKind::UnknownReference ; "unknown function")]
    #[test_case("Min(1, 2)" => ErrorKind::UnknownReference ; "function names are case sensitive")]
    #[test_case("name * 2" => ErrorKind::InvalidOperand ; "text operand")]
    #[test_case("\"nan\" * 1" => ErrorKind::InvalidOperand ; "nan text is not a number")]
    #[test_case("\"inf\" - 0" => ErrorKind::InvalidOperand ; "infinity text is not a number")]
    #[test_case("min(1)" => ErrorKind::InvalidArgument ; "wrong arity")]
    #[test_case("% 5" => ErrorKind::Unsupported ; "remainder has no unary form")]
    #[test_case("*a" => ErrorKind::Unsupported ; "multiplication has no unary form")]
    fn errors(expression: &str) -> ErrorKind {
        let context = variables();
        eval(expression, &context).unwrap_err().kind()
    }

    #[test]
    fn error_messages() {
        let context = variables();
        let message = |expression| eval(expression, &context).unwrap_err().to_string();

        assert_eq!(message("z + 1"), "Unknown variable: z");
        assert_eq!(message("bogus(1)"), "Unknown function: bogus");
        assert_eq!(message("name % 2"), "Invalid operand: Ada");
        assert_eq!(message("\"nan\" * 1"), "Invalid operand: nan");
        assert_eq!(message("1 +"), "Missing operand after '+' in: 1 +");
        assert_eq!(message("% 5"), "Operator '%' can not be used as a unary operator");
        assert_eq!(message("(1 + 2"), "Unbalanced parenthesis: (1 + 2");
    }

    #[test]
    fn failures_deep_inside_are_chained() {
        let context = variables();
        let error = eval("1 + min(2, max(3, z))", &context).unwrap_err();
        let messages: Vec<String> = std::iter::once(&error)
            .chain(error.causes())
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            [
                "Two numeric arguments are required",
                "Invalid argument: max(3, z)",
                "Two numeric arguments are required",
                "Invalid argument: z",
                "Unknown variable: z",
            ]
        );
    }

    #[test]
    fn depth_limit() {
        let operators = OperatorRegistry::with_builtins();
        let functions = FunctionRegistry::with_builtins();
        let context = Context::new(&operators, &functions, &NoVariables)
            .with_config(Config::new().with_max_depth(10));

        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(context.evaluate(&nested(10)), Ok(Value::Number(1.0)));

        let error = context.evaluate(&nested(11)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.to_string(), "Expression nested too deeply (limit 10)");

        let deep = format!("{}1{}", "abs(".repeat(200), ")".repeat(200));
        let error = eval(&deep, &NoVariables).unwrap_err();
        assert_eq!(error.root().kind(), ErrorKind::Structural);
    }

    #[test]
    fn nested_evaluators() {
        let operators = OperatorRegistry::with_builtins();
        let functions = FunctionRegistry::with_builtins();
        let context = Context::new(&operators, &functions, &NoVariables)
            .with_config(Config::new().with_max_depth(1));
        let evaluator = Evaluator::new(&context);
        assert_eq!(evaluator.depth(), 0);
        assert_eq!(evaluator.nested().depth(), 1);
        assert_eq!(evaluator.context().config().max_depth, 1);

        assert_eq!(evaluator.evaluate("(1 + 2)"), Ok(Value::Number(3.0)));
        assert_eq!(evaluator.nested().evaluate("1 + 2"), Ok(Value::Number(3.0)));
        assert!(evaluator.nested().evaluate("(1 + 2)").is_err());
    }

    #[test]
    fn long_chains_are_flat() {
        let ones = vec!["1"; 1000].join(" + ");
        assert_eq!(eval(&ones, &NoVariables), Ok(Value::Number(1000.0)));

        let mixed = format!("1000{}", " - 1 + 2 * 1 - 1".repeat(300));
        assert_eq!(eval(&mixed, &NoVariables), Ok(Value::Number(1000.0)));

        let operators = OperatorRegistry::with_builtins();
        let functions = FunctionRegistry::with_builtins();
        let context = Context::new(&operators, &functions, &NoVariables)
            .with_config(Config::new().with_max_depth(3));
        assert_eq!(
            context.evaluate("1 * 2 + 3 * 4 - 5 * 6 + (7 - 8)"),
            Ok(Value::Number(-17.0))
        );

        // right associative chains still nest
        let powers = vec!["1"; 5].join(" ^ ");
        assert_eq!(context.evaluate(&powers).unwrap_err().kind(), ErrorKind::Structural);
        assert_eq!(eval(&powers, &NoVariables), Ok(Value::Number(1.0)));
    }

    #[test]
    fn empty_registries() {
        let operators = OperatorRegistry::new();
        let functions = FunctionRegistry::new();
        let context = Context::new(&operators, &functions, &NoVariables);
        assert_eq!(context.evaluate("42"), Ok(Value::Number(42.0)));
        assert_eq!(
            context.evaluate("1 + 2").unwrap_err().kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            context.evaluate("min(1, 2)").unwrap_err().kind(),
            ErrorKind::UnknownReference
        );
    }

    proptest! {
        #[test]
        fn evaluation_is_repeatable(a in -1000i32..1000, b in 1i32..1000, c in -50i32..50) {
            let expression = format!("({} % {}) * {} - min({}, {})", a, b, c, a, c);
            let first = eval(&expression, &NoVariables);
            let second = eval(&expression, &NoVariables);
            prop_assert!(first.is_ok());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn remainder_matches_f64(a in -1.0e6f64..1.0e6, b in 0.5f64..1.0e3) {
            let expression = format!("({}) % ({})", a, b);
            prop_assert_eq!(eval(&expression, &NoVariables), Ok(Value::Number(a % b)));
        }
    }
}
