use std::collections::{HashMap, VecDeque};
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::*;
use crate::matcher::api::*;
use crate::matcher::model::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TokenMatcherError {
    #[error("Cannot duplicate the option '{0}'.")]
    DuplicateOption(String),

    #[error("Cannot duplicate the short option '{0}'.")]
    DuplicateShortOption(char),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MatchError {
    #[error("Not enough tokens provided to parameter '{0}'.")]
    Undercomplete(String),

    #[error("Too many tokens provided to parameter '{0}'.")]
    Overcomplete(String),

    #[error("No more arguments to match '{0}' against.")]
    ArgumentsExhausted(String),

    #[error("Option '{0}' does not exist.")]
    InvalidOption(String),

    #[error("Short option '{0}' does not exist.")]
    InvalidShortOption(char),
}

impl From<CountError> for MatchError {
    fn from(error: CountError) -> Self {
        match error {
            CountError::Short { name, .. } => MatchError::Undercomplete(name),
            CountError::Excess { name, .. } => MatchError::Overcomplete(name),
        }
    }
}

/// Aligns raw Cli tokens to options and arguments.
///
/// Every occurrence of an option produces its own `MatchTokens`, so repeated options are matched in the order they appear.
/// A matcher is single use: one per parse.
#[derive(Debug)]
pub(crate) struct TokenMatcher {
    option_bounds: HashMap<String, Bound>,
    short_options: HashMap<char, String>,
    arguments: VecDeque<ArgumentConfig>,
    numeric_shorts: bool,
    fed: usize,
    matches: Vec<MatchTokens>,
    buffer: Option<OccurrenceBuffer>,
}

impl TokenMatcher {
    pub(crate) fn new(
        options: Vec<OptionConfig>,
        arguments: VecDeque<ArgumentConfig>,
    ) -> Result<Self, TokenMatcherError> {
        let mut option_bounds = HashMap::default();
        let mut short_options = HashMap::default();

        for option_config in options.into_iter() {
            if option_bounds
                .insert(option_config.name().to_string(), option_config.bound())
                .is_some()
            {
                return Err(TokenMatcherError::DuplicateOption(
                    option_config.name().to_string(),
                ));
            }

            if let Some(short) = option_config.short() {
                if short_options
                    .insert(*short, option_config.name().to_string())
                    .is_some()
                {
                    return Err(TokenMatcherError::DuplicateShortOption(*short));
                }
            }
        }

        // With a digit short option, '-1' must be read as that option rather than a negative number.
        let numeric_shorts = short_options.keys().any(char::is_ascii_digit);

        Ok(Self {
            option_bounds,
            short_options,
            arguments,
            numeric_shorts,
            fed: 0,
            matches: Vec::default(),
            buffer: None,
        })
    }

    pub(crate) fn feed(&mut self, token: &str) -> Result<(), MatchError> {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Feeding '{token}' at offset {}.", self.fed);
        }

        let token_length = token.len();
        // 1. Find a value disguised as a flag, such as:
        //  -
        //  -1
        //  -2.5
        // 2. Find a 'long' flag, such as:
        //  --initial
        //  --initial ..
        //  --initial=..
        //  A bare '--' names the empty option, so it is always an unknown option.
        // 3. Find 'short' flag(s), such as (both -i and -v are example short flags):
        //  -i
        //  -i ..
        //  -i=..
        //  -iv
        //  -iv ..
        //  -iv=..
        // 4. Match against an argument.
        let result = if self.is_value(token) {
            self.match_argument(token)
        } else if let Some(token) = token.strip_prefix(LONG_PREFIX) {
            self.match_option(split_value_delimiter(token))
        } else if let Some(token) = token.strip_prefix(SHORT_PREFIX) {
            self.match_option_short(split_value_delimiter(token))
        } else {
            self.match_argument(token)
        };

        self.fed += token_length;
        result
    }

    fn is_value(&self, token: &str) -> bool {
        if token == SHORT_PREFIX {
            return true;
        }

        !self.numeric_shorts && is_negative_number(token)
    }

    fn match_argument(&mut self, token: &str) -> Result<(), MatchError> {
        let mut occurrence = match self.buffer.take() {
            Some(occurrence) => {
                if occurrence.is_open() {
                    occurrence
                } else {
                    // Flip to the next argument.
                    let match_tokens = occurrence.close()?;
                    self.matches.push(match_tokens);
                    self.next_argument(token)?
                }
            }
            None => {
                // Flip to the next argument.
                self.next_argument(token)?
            }
        };

        occurrence.push(self.fed, token.to_string());
        self.buffer.replace(occurrence);
        Ok(())
    }

    fn next_argument(&mut self, token: &str) -> Result<OccurrenceBuffer, MatchError> {
        match self.arguments.pop_front() {
            Some(argument_config) => Ok(OccurrenceBuffer::new(
                argument_config.name(),
                argument_config.bound(),
            )),
            None => Err(MatchError::ArgumentsExhausted(token.to_string())),
        }
    }

    fn match_option(
        &mut self,
        (option_name, single_value): (&str, Option<&str>),
    ) -> Result<(), MatchError> {
        let bound = match self.option_bounds.get(option_name) {
            Some(bound) => *bound,
            None => return Err(MatchError::InvalidOption(option_name.to_string())),
        };
        // Any open occurrence ends here, before this occurrence begins.
        self.update_buffer(None)?;
        let mut occurrence = OccurrenceBuffer::new(option_name, bound);

        match single_value {
            Some(value) => {
                // The 3 comes from the option specifier '--' and value delimiter '='.
                occurrence.push(self.fed + option_name.len() + 3, value.to_string());

                // Options using k=v syntax cannot follow up with more values afterwards.
                let match_tokens = occurrence.close()?;
                self.matches.push(match_tokens);
                Ok(())
            }
            None => self.update_buffer(Some(occurrence)),
        }
    }

    fn match_option_short(
        &mut self,
        (short_names, single_value): (&str, Option<&str>),
    ) -> Result<(), MatchError> {
        self.update_buffer(None)?;
        let final_index = short_names.chars().count().saturating_sub(1);

        for (index, single) in short_names.chars().enumerate() {
            let name = match self.short_options.get(&single) {
                Some(name) => name.clone(),
                None => return Err(MatchError::InvalidShortOption(single)),
            };
            let bound = *self
                .option_bounds
                .get(&name)
                .expect("internal error - short option must align with an option");
            let mut occurrence = OccurrenceBuffer::new(name, bound);

            if index == final_index {
                // Only the final option may accept values.
                match single_value {
                    Some(value) => {
                        // The 2 comes from the short option specifier '-' and value delimiter '='.
                        occurrence.push(self.fed + short_names.len() + 2, value.to_string());

                        // Options using k=v syntax cannot follow up with more values afterwards.
                        let match_tokens = occurrence.close()?;
                        self.matches.push(match_tokens);
                    }
                    None => {
                        self.update_buffer(Some(occurrence))?;
                    }
                }
            } else {
                // All characters in the head of the short option token must allow no values.
                let match_tokens = occurrence.close()?;
                self.matches.push(match_tokens);
            }
        }

        Ok(())
    }

    fn update_buffer(&mut self, next_buffer: Option<OccurrenceBuffer>) -> Result<(), MatchError> {
        let previous_buffer = std::mem::replace(&mut self.buffer, next_buffer);

        if let Some(occurrence) = previous_buffer {
            let match_tokens = occurrence.close()?;
            self.matches.push(match_tokens);
        }

        Ok(())
    }

    /// Whether the parameter `name` has received at least one value so far.
    pub(crate) fn has_matched(&self, name: &str) -> bool {
        if let Some(occurrence) = &self.buffer {
            if occurrence.name() == name && !occurrence.is_empty() {
                return true;
            }
        }

        self.matches
            .iter()
            .any(|mt| mt.name == name && !mt.values.is_empty())
    }

    /// The total length of the tokens fed so far.
    pub(crate) fn fed(&self) -> usize {
        self.fed
    }

    pub(crate) fn close(mut self) -> Result<Matches, (usize, MatchError)> {
        if let Some(occurrence) = self.buffer.take() {
            let match_tokens = occurrence
                .close()
                .map_err(|error| (self.fed, MatchError::from(error)))?;
            self.matches.push(match_tokens);
        }

        for argument_config in self.arguments {
            let occurrence = OccurrenceBuffer::new(argument_config.name(), argument_config.bound());
            let match_tokens = occurrence
                .close()
                .map_err(|error| (self.fed, MatchError::from(error)))?;
            self.matches.push(match_tokens);
        }

        Ok(Matches {
            values: self.matches,
        })
    }
}

fn split_value_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once(VALUE_DELIMITER) {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}

fn is_negative_number(token: &str) -> bool {
    match token.strip_prefix(SHORT_PREFIX) {
        // Leading digit check rules out the likes of '-inf' and '-nan'.
        Some(number) => {
            number.starts_with(|c: char| c.is_ascii_digit() || c == '.')
                && number.parse::<f64>().is_ok()
        }
        None => false,
    }
}
