/// Default value of [`Config::max_depth`](struct.Config.html#structfield.max_depth)
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tuning knobs for an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximal number of nested sub-evaluations. Every operator side,
    /// parenthesized group, unary operand and function argument evaluation
    /// counts as one level. Going deeper fails with a structural error
    /// instead of overflowing the stack.
    pub max_depth: usize,
}

impl Config {
    /// Get the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximal evaluation depth
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
