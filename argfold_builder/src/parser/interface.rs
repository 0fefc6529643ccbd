use crate::parser::{ErrorContext, UsageError};

/// Where parse failures get reported.
pub(crate) trait UserInterface {
    fn print_error(&self, error: &UsageError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print_error(&self, error: &UsageError) {
        eprintln!("Usage error: {error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}
