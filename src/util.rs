use crate::function::FunctionRegistry;
use crate::operator::OperatorRegistry;
use hashbrown::HashMap;

lazy_static! {
    /// Single argument math functions, registered as built-in functions
    pub static ref MATH_FUNCTIONS: HashMap<&'static str, fn(f64) -> f64> = {
        let mut map = HashMap::<&'static str, fn(f64) -> f64>::new();
        map.insert("sqrt", f64::sqrt);
        map.insert("cbrt", f64::cbrt);
        map.insert("sin", f64::sin);
        map.insert("cos", f64::cos);
        map.insert("tan", f64::tan);
        map.insert("asin", f64::asin);
        map.insert("acos", f64::acos);
        map.insert("atan", f64::atan);
        map.insert("sinh", f64::sinh);
        map.insert("cosh", f64::cosh);
        map.insert("tanh", f64::tanh);
        map.insert("asinh", f64::asinh);
        map.insert("acosh", f64::acosh);
        map.insert("atanh", f64::atanh);
        map.insert("floor", f64::floor);
        map.insert("ceil", f64::ceil);
        map.insert("round", f64::round);
        map.insert("abs", f64::abs);
        map.insert("exp", f64::exp);
        map.insert("ln", f64::ln);
        map.insert("log2", f64::log2);
        map.insert("log10", f64::log10);
        map.shrink_to_fit();
        map
    };

    /// Frozen built-in operators, used by `eval`
    pub(crate) static ref BUILTIN_OPERATORS: OperatorRegistry = OperatorRegistry::with_builtins();

    /// Frozen built-in functions, used by `eval`
    pub(crate) static ref BUILTIN_FUNCTIONS: FunctionRegistry = FunctionRegistry::with_builtins();
}
