/// Configuration for LL parser
#[derive(Debug, Clone)]
pub struct LlConfig {
    /// Treat tokens left over after the start symbol is fully derived as an
    /// error instead of returning them to the caller
    pub reject_trailing_input: bool,

    /// Maximum number of pending symbols on the parse stack, and maximum
    /// depth of the parse tree
    pub max_depth: usize,
}

impl Default for LlConfig {
    fn default() -> Self {
        Self {
            reject_trailing_input: true,
            max_depth: 10_000,
        }
    }
}
