use std::collections::HashMap;
use std::env;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::model::ParseResult;
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::ErrorContext;

/// The configured command line parser.
///
/// Built via [`crate::CommandLineParser::build`] or [`crate::SubCommandParser::build`].
/// A `GeneralParser` holds no state between parses, so it may be used any number of times.
pub struct GeneralParser {
    program: String,
    command: Parser,
    sub_commands: HashMap<String, Parser>,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for GeneralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("program", &self.program)
            .field("command", &self.command)
            .field("sub_commands", &self.sub_commands)
            .finish()
    }
}

impl GeneralParser {
    pub(crate) fn command(
        program: impl Into<String>,
        command: Parser,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            program: program.into(),
            command,
            sub_commands: HashMap::default(),
            user_interface,
        }
    }

    pub(crate) fn sub_command(
        program: impl Into<String>,
        command: Parser,
        sub_commands: HashMap<String, Parser>,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            program: program.into(),
            command,
            sub_commands,
            user_interface,
        }
    }

    /// The program name this parser was built with.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn invoke(&self, tokens: &[&str]) -> Result<ParseResult, (ErrorContext, UsageError)> {
        let outcome = self
            .command
            .consume(tokens)
            .map_err(|(offset, error)| (ErrorContext::new(offset, tokens), error))?;
        let mut result = ParseResult::new(outcome.values);

        let (name, (variant_offset, variant)) = match outcome.discriminee {
            Some(discriminee) => discriminee,
            None => return Ok(result),
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Selected sub-command '{variant}' for parameter '{name}'.");
        }

        let sub_command = match self.sub_commands.get(&variant) {
            Some(sub_command) => sub_command,
            None => {
                return Err((
                    ErrorContext::new(variant_offset, tokens),
                    UsageError::UnknownSubCommand { name, variant },
                ));
            }
        };

        // The sub-command's offsets are relative to the tokens it received.
        let remaining: Vec<&str> = outcome.remaining.iter().map(AsRef::as_ref).collect();
        let consumed: usize = tokens[..tokens.len() - remaining.len()]
            .iter()
            .map(|token| token.len())
            .sum();
        let sub_outcome = sub_command
            .consume(remaining.as_slice())
            .map_err(|(offset, error)| (ErrorContext::new(consumed + offset, tokens), error))?;

        result.merge(ParseResult::new(sub_outcome.values));
        result.select(name, variant);
        Ok(result)
    }

    /// Parse the tokens, reporting nothing.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{Action, CommandLineParser, Parameter, UsageError, Value};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option("arg", None).action(Action::Extend))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(&["--arg", "1", "--arg", "2"]).unwrap();
    /// assert_eq!(result.get("arg"), Some(&Value::from(vec!["1", "2"])));
    ///
    /// let error = parser.parse_tokens(&["--moot"]).unwrap_err();
    /// assert_eq!(error, UsageError::UnknownOption("moot".to_string()));
    /// ```
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ParseResult, UsageError> {
        self.invoke(tokens).map_err(|(_, error)| error)
    }

    /// Parse the tokens, reporting any usage error (and where it occurred) on the user interface.
    /// On error, returns the exit code.
    pub(crate) fn report(&self, tokens: &[&str]) -> Result<ParseResult, i32> {
        self.invoke(tokens).map_err(|(error_context, error)| {
            self.user_interface.print_error(&error);
            self.user_interface.print_error_context(error_context);
            1
        })
    }

    /// Run the parser against the Cli [`env::args`].
    /// If a usage error is encountered, it is reported and the program exits with code `1` (via [`std::process::exit`]).
    pub fn parse(&self) -> ParseResult {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.report(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(result) => result,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }
}
