mod base;
mod interface;
mod middleware;

pub use self::base::{ConfigError, UsageError};
pub(crate) use self::base::Parser;
pub(crate) use self::interface::*;
pub use self::middleware::GeneralParser;

/// Points at the token (and character within it) where a parse went wrong.
///
/// The offset counts characters across the tokens, excluding the separating spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, tokens: &[&str]) -> Self {
        Self {
            offset,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens_length = 0;
        let mut spaces = 0;

        for (i, token) in self.tokens.iter().enumerate() {
            tokens_length += token.len();

            // Count the spaces that come before the offset.
            if i + 1 < self.tokens.len() && tokens_length <= self.offset {
                spaces += 1;
            }
        }

        write!(
            f,
            "{}\n{:width$}^",
            self.tokens.join(" "),
            "",
            width = std::cmp::min(self.offset, tokens_length.saturating_sub(1)) + spaces
        )
    }
}
