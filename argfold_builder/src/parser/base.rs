use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{Capture, InvalidCapture, ParameterClass, ParameterInner};
use crate::matcher::*;
use crate::model::Value;

/// A mistake in the configuration of the command line parser.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

impl From<TokenMatcherError> for ConfigError {
    fn from(error: TokenMatcherError) -> Self {
        ConfigError(error.to_string())
    }
}

/// Malformed Cli input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    /// An unrecognized `--NAME` flag.
    #[error("Option '--{0}' does not exist.")]
    UnknownOption(String),

    /// An unrecognized `-N` flag.
    #[error("Short option '-{0}' does not exist.")]
    UnknownShortOption(char),

    /// An occurrence received fewer values than its nargs requires.
    #[error("Not enough tokens provided to parameter '{0}'.")]
    TooFewValues(String),

    /// An occurrence received more values than its nargs permits.
    #[error("Too many tokens provided to parameter '{0}'.")]
    TooManyValues(String),

    /// A token that no argument is left to match.
    #[error("Unexpected argument '{0}'; no more arguments to match against.")]
    UnexpectedArgument(String),

    /// A token rejected by the parameter's transform.
    #[error("Invalid value for parameter '{name}': {capture}")]
    InvalidValue {
        /// The parameter name.
        name: String,
        /// The underlying capture failure.
        capture: InvalidCapture,
    },

    /// A required option that never occurred.
    #[error("Required option '--{0}' was not provided.")]
    MissingRequired(String),

    /// No sub-command was selected, although one is required.
    #[error("A sub-command must be provided for parameter '{0}'.")]
    MissingSubCommand(String),

    /// The selected sub-command does not exist.
    #[error("Unknown sub-command '{variant}' for parameter '{name}'.")]
    UnknownSubCommand {
        /// The condition name.
        name: String,
        /// The unmatched sub-command.
        variant: String,
    },
}

impl From<MatchError> for UsageError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::Undercomplete(name) => UsageError::TooFewValues(name),
            MatchError::Overcomplete(name) => UsageError::TooManyValues(name),
            MatchError::ArgumentsExhausted(token) => UsageError::UnexpectedArgument(token),
            MatchError::InvalidOption(name) => UsageError::UnknownOption(name),
            MatchError::InvalidShortOption(short) => UsageError::UnknownShortOption(short),
        }
    }
}

/// The parse of a single (sub-)command.
#[derive(Debug, PartialEq)]
pub(crate) struct Outcome {
    pub values: BTreeMap<String, Value>,
    pub discriminee: Option<(String, OffsetValue)>,
    pub remaining: Vec<String>,
}

/// Parses tokens against one set of parameters.
///
/// The parser only holds configuration; every call to `consume` starts from a fresh matcher and fresh slots.
#[derive(Debug)]
pub(crate) struct Parser {
    option_configs: Vec<OptionConfig>,
    argument_configs: VecDeque<ArgumentConfig>,
    captures: HashMap<String, Capture>,
    required: Vec<String>,
    defaults: Vec<(String, Value)>,
    discriminator: Option<String>,
}

impl Parser {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(Vec::default(), None).unwrap()
    }

    pub(crate) fn new(
        parameters: Vec<ParameterInner>,
        discriminator: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut option_configs = Vec::default();
        let mut argument_configs = VecDeque::default();
        let mut captures = HashMap::default();
        let mut names = HashSet::new();
        let mut required = Vec::default();
        let mut defaults = Vec::default();

        for parameter in parameters.into_iter() {
            parameter.validate()?;

            if !names.insert(parameter.name().to_string()) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the parameter '{}'.",
                    parameter.name()
                )));
            }

            match parameter.class() {
                ParameterClass::Opt => {
                    option_configs.push(OptionConfig::from(&parameter));

                    if parameter.required() {
                        required.push(parameter.name().to_string());
                    }
                }
                ParameterClass::Arg => {
                    argument_configs.push_back(ArgumentConfig::from(&parameter));
                }
            }

            if let Some(default) = parameter.default() {
                defaults.push((parameter.name().to_string(), default.clone()));
            }

            captures.insert(parameter.name().to_string(), Capture::from(&parameter));
        }

        // Surface any matcher configuration problem (ex: a repeated short name) now, rather than per parse.
        TokenMatcher::new(option_configs.clone(), argument_configs.clone())?;

        Ok(Self {
            option_configs,
            argument_configs,
            captures,
            required,
            defaults,
            discriminator,
        })
    }

    pub(crate) fn consume(&self, tokens: &[&str]) -> Result<Outcome, (usize, UsageError)> {
        let mut token_matcher =
            TokenMatcher::new(self.option_configs.clone(), self.argument_configs.clone())
                .expect("internal error - matcher configuration must be validated on construction");
        let mut token_iter = tokens.iter();

        // 1. Feed the raw token strings to the matcher.
        // With a discriminator, stop as soon as the sub-command has been selected.
        for token in token_iter.by_ref() {
            let offset = token_matcher.fed();
            token_matcher
                .feed(token)
                .map_err(|error| (offset, UsageError::from(error)))?;

            if let Some(discriminator) = &self.discriminator {
                if token_matcher.has_matched(discriminator) {
                    break;
                }
            }
        }

        let fed = token_matcher.fed();
        let matches = token_matcher
            .close()
            .map_err(|(offset, error)| match error {
                MatchError::Undercomplete(name) if Some(&name) == self.discriminator.as_ref() => {
                    (offset, UsageError::MissingSubCommand(name))
                }
                error => (offset, UsageError::from(error)),
            })?;

        // 2. Required options may occur anywhere, so check only once everything is matched.
        for name in &self.required {
            if !matches.contains(name) {
                return Err((fed, UsageError::MissingRequired(name.clone())));
            }
        }

        let mut slots: HashMap<String, Option<Value>> = HashMap::default();
        let mut discriminee: Option<(String, OffsetValue)> = None;

        // 3. Fold each occurrence, in order, into its parameter's slot.
        for match_tokens in matches.values {
            let capture = self
                .captures
                .get(&match_tokens.name)
                .expect("internal error - mismatch between matches and captures");
            let slot = slots.entry(match_tokens.name.clone()).or_default();
            capture
                .capture(slot, &match_tokens.values)
                .map_err(|(offset, capture)| {
                    (
                        offset,
                        UsageError::InvalidValue {
                            name: match_tokens.name.clone(),
                            capture,
                        },
                    )
                })?;

            if self.discriminator.as_ref() == Some(&match_tokens.name) {
                match &match_tokens.values[..] {
                    [] => {}
                    [(offset, value)] => {
                        if discriminee
                            .replace((match_tokens.name.clone(), (*offset, value.clone())))
                            .is_some()
                        {
                            unreachable!(
                                "internal error - discriminator cannot have multiple matches"
                            );
                        }
                    }
                    _ => {
                        unreachable!("internal error - discriminator must match at most 1 token");
                    }
                }
            }
        }

        // 4. Finalize: occurred parameters keep their value, absent ones take their default (if any).
        let mut values: BTreeMap<String, Value> = slots
            .into_iter()
            .filter_map(|(name, slot)| slot.map(|value| (name, value)))
            .collect();

        for (name, default) in &self.defaults {
            values
                .entry(name.clone())
                .or_insert_with(|| default.clone());
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsed values: {values:?}, discriminee: {discriminee:?}.");
        }

        Ok(Outcome {
            values,
            discriminee,
            remaining: token_iter.map(|s| s.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Parameter, Transform};
    use crate::model::{Action, Nargs};
    use rstest::rstest;

    fn parser(parameters: Vec<Parameter>) -> Parser {
        Parser::new(
            parameters.into_iter().map(Parameter::consume).collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn parser_empty() {
        // Setup
        let parser = Parser::empty();

        // Execute
        let outcome = parser.consume(&[]).unwrap();

        // Verify
        assert_eq!(
            outcome,
            Outcome {
                values: BTreeMap::default(),
                discriminee: None,
                remaining: vec![],
            }
        );
    }

    #[rstest]
    #[case(vec!["--variable", "1"])]
    #[case(vec!["--variable", "01"])]
    #[case(vec!["-v", "1"])]
    #[case(vec!["-v=1"])]
    #[case(vec!["--variable=01"])]
    #[case(vec!["--variable", "5", "--variable", "1"])]
    fn parser_option(#[case] tokens: Vec<&str>) {
        // Setup
        let parser = parser(vec![
            Parameter::option("variable", Some('v')).transform(Transform::parse::<u32>())
        ]);

        // Execute
        let outcome = parser.consume(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(
            outcome.values,
            BTreeMap::from([("variable".to_string(), Value::Integer(1))])
        );
        assert_eq!(outcome.discriminee, None);
        assert_eq!(outcome.remaining, Vec::<String>::default());
    }

    #[rstest]
    #[case(vec![], vec![])]
    #[case(vec!["1"], vec![1])]
    #[case(vec!["1", "3", "2", "1"], vec![1, 3, 2, 1])]
    #[case(vec!["01"], vec![1])]
    fn parser_argument(#[case] tokens: Vec<&str>, #[case] expected: Vec<u32>) {
        // Setup
        let parser = parser(vec![Parameter::argument("variable")
            .nargs(Nargs::Any)
            .transform(Transform::parse::<u32>())]);

        // Execute
        let outcome = parser.consume(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(
            outcome.values,
            BTreeMap::from([("variable".to_string(), Value::from(expected))])
        );
    }

    #[test]
    fn parser_absent_and_default() {
        // Setup
        let parser = parser(vec![
            Parameter::option("absent", None),
            Parameter::option("defaulted", None).default("x"),
            Parameter::switch("verbose", Some('v')),
        ]);

        // Execute
        let outcome = parser.consume(&[]).unwrap();

        // Verify
        assert_eq!(
            outcome.values,
            BTreeMap::from([
                ("defaulted".to_string(), Value::from("x")),
                ("verbose".to_string(), Value::Bool(false)),
            ])
        );
    }

    #[test]
    fn parser_default_unused() {
        let parser = parser(vec![Parameter::option("arg", None)
            .action(Action::Append)
            .default(vec!["x"])]);

        let outcome = parser.consume(&["--arg", "1"]).unwrap();

        // The default is not the starting point of the accumulation.
        assert_eq!(
            outcome.values,
            BTreeMap::from([("arg".to_string(), Value::from(vec!["1"]))])
        );
    }

    #[rstest]
    #[case(vec!["--arg", "1"])]
    #[case(vec!["--other", "--arg", "1"])]
    #[case(vec!["--arg", "1", "--other"])]
    fn parser_required(#[case] tokens: Vec<&str>) {
        let parser = parser(vec![
            Parameter::option("arg", None).required(),
            Parameter::switch("other", None),
        ]);

        let outcome = parser.consume(tokens.as_slice()).unwrap();

        assert_eq!(outcome.values.get("arg"), Some(&Value::from("1")));
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec!["--other"], 7)]
    fn parser_required_missing(#[case] tokens: Vec<&str>, #[case] expected_offset: usize) {
        let parser = parser(vec![
            Parameter::option("arg", None).required(),
            Parameter::switch("other", None),
        ]);

        let (offset, error) = parser.consume(tokens.as_slice()).unwrap_err();

        assert_eq!(offset, expected_offset);
        assert_eq!(error, UsageError::MissingRequired("arg".to_string()));
    }

    #[rstest]
    #[case(vec!["--moot"], 0, UsageError::UnknownOption("moot".to_string()))]
    #[case(vec!["--arg", "1", "-x"], 6, UsageError::UnknownShortOption('x'))]
    #[case(vec!["--arg"], 5, UsageError::TooFewValues("arg".to_string()))]
    #[case(vec!["--arg", "1", "2"], 6, UsageError::UnexpectedArgument("2".to_string()))]
    fn parser_usage_error(
        #[case] tokens: Vec<&str>,
        #[case] expected_offset: usize,
        #[case] expected: UsageError,
    ) {
        let parser = parser(vec![Parameter::option("arg", None)]);

        let (offset, error) = parser.consume(tokens.as_slice()).unwrap_err();

        assert_eq!(offset, expected_offset);
        assert_eq!(error, expected);
    }

    #[test]
    fn parser_invalid_value() {
        let parser = parser(vec![Parameter::option("arg", None)
            .nargs(Nargs::AtLeastOne)
            .transform(Transform::parse::<u32>())]);

        let (offset, error) = parser.consume(&["--arg", "1", "x"]).unwrap_err();

        assert_eq!(offset, 6);
        assert_matches!(error, UsageError::InvalidValue { name, capture } => {
            assert_eq!(name, "arg");
            assert_matches!(capture, InvalidCapture::InvalidConversion { .. });
        });
    }

    #[test]
    fn parser_duplicate() {
        let error = Parser::new(
            vec![
                Parameter::option("abc", None).consume(),
                Parameter::argument("abc").consume(),
            ],
            None,
        )
        .unwrap_err();

        assert_eq!(
            error,
            ConfigError("Cannot duplicate the parameter 'abc'.".to_string())
        );
    }

    #[test]
    fn parser_duplicate_short() {
        let error = Parser::new(
            vec![
                Parameter::option("abc", Some('a')).consume(),
                Parameter::option("def", Some('a')).consume(),
            ],
            None,
        )
        .unwrap_err();

        assert_eq!(
            error,
            ConfigError("Cannot duplicate the short option 'a'.".to_string())
        );
    }

    #[test]
    fn parser_reusable() {
        let parser = parser(vec![Parameter::option("arg", None).action(Action::Extend)]);

        let first = parser.consume(&["--arg", "1", "--arg", "2"]).unwrap();
        let second = parser.consume(&["--arg", "3"]).unwrap();

        assert_eq!(first.values.get("arg"), Some(&Value::from(vec!["1", "2"])));
        assert_eq!(second.values.get("arg"), Some(&Value::from(vec!["3"])));
    }

    #[rstest]
    #[case(vec!["log"], 0, "log", vec![])]
    #[case(vec!["--flag", "log"], 6, "log", vec![])]
    #[case(vec!["log", "--arg", "1"], 0, "log", vec!["--arg", "1"])]
    #[case(vec!["--flag", "diff", "a", "--flag"], 6, "diff", vec!["a", "--flag"])]
    fn parser_discriminator(
        #[case] tokens: Vec<&str>,
        #[case] offset: usize,
        #[case] variant: &str,
        #[case] remaining: Vec<&str>,
    ) {
        // Setup
        let parser = Parser::new(
            vec![
                Parameter::switch("flag", None).consume(),
                Parameter::argument("command").consume(),
            ],
            Some("command".to_string()),
        )
        .unwrap();

        // Execute
        let outcome = parser.consume(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(
            outcome.discriminee,
            Some(("command".to_string(), (offset, variant.to_string())))
        );
        assert_eq!(outcome.values.get("command"), Some(&Value::from(variant)));
        assert_eq!(
            outcome.remaining,
            remaining
                .into_iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>()
        );
    }

    #[test]
    fn parser_discriminator_missing() {
        let parser = Parser::new(
            vec![Parameter::argument("command").consume()],
            Some("command".to_string()),
        )
        .unwrap();

        let (offset, error) = parser.consume(&[]).unwrap_err();

        assert_eq!(offset, 0);
        assert_eq!(error, UsageError::MissingSubCommand("command".to_string()));
    }
}
