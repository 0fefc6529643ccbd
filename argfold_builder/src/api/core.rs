use std::collections::HashMap;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{Condition, Parameter, ParameterInner};
use crate::constant::SHORT_PREFIX;
use crate::parser::{ConfigError, ConsoleInterface, GeneralParser, Parser, UserInterface};

/// The base command line parser.
///
/// ### Example
/// ```
/// # use argfold_builder as argfold;
/// use argfold::CommandLineParser;
///
/// let parser = CommandLineParser::new("program")
///     // Configure with CommandLineParser::add and CommandLineParser::branch.
///     .build();
/// parser.parse_tokens(&[]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineParser {
    program: String,
    parameters: Vec<ParameterInner>,
    discriminator: Option<String>,
    deferred_error: Option<ConfigError>,
}

impl CommandLineParser {
    /// Create a command line parser.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            parameters: Vec::default(),
            discriminator: None,
            deferred_error: None,
        }
    }

    fn defer(&mut self, error: ConfigError) {
        // Only the first configuration error is reported.
        if self.deferred_error.is_none() {
            self.deferred_error.replace(error);
        }
    }

    fn push(&mut self, parameter: ParameterInner) {
        if let Err(error) = parameter.validate() {
            self.defer(error);
        }

        self.parameters.push(parameter);
    }

    /// Add an argument/option to the command line parser.
    ///
    /// The order of argument parameters corresponds to their positional order during parsing.
    /// The order of option parameters does not affect the command parser semantics.
    ///
    /// An invalid parameter (ex: `Action::Count` with `Nargs::AtLeastOne`) is reported when the parser is built.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{CommandLineParser, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::argument("a"))
    ///     .add(Parameter::argument("b"))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(vec!["1", "2"].as_slice()).unwrap();
    ///
    /// assert_eq!(result.text("a"), Some("1"));
    /// assert_eq!(result.text("b"), Some("2"));
    /// ```
    pub fn add(mut self, parameter: Parameter) -> Self {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Adding parameter '{}' to '{}'.", parameter.name(), self.program);
        }

        self.push(parameter.consume());
        self
    }

    /// Inherit the parameters of the `parent` command line parser.
    ///
    /// The parameters are copied as they are at the time of the call.
    /// Later changes to the `parent` do not affect this parser.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{CommandLineParser, Parameter};
    ///
    /// let common = CommandLineParser::new("common")
    ///     .add(Parameter::switch("verbose", Some('v')));
    /// let parser = CommandLineParser::new("program")
    ///     .parent(&common)
    ///     .add(Parameter::argument("file"))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(&["-v", "abc.txt"]).unwrap();
    /// assert_eq!(result.get("verbose").and_then(|v| v.as_bool()), Some(true));
    /// ```
    pub fn parent(mut self, parent: &CommandLineParser) -> Self {
        if let Some(error) = &parent.deferred_error {
            self.defer(error.clone());
        }

        for parameter in &parent.parameters {
            self.push(parameter.clone());
        }

        self
    }

    /// Branch into a sub-command parser.
    ///
    /// This changes the command line parser into a sub-command style command line parser.
    /// Any parameters added before the branch apply to the root parser.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{CommandLineParser, Condition, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::argument("belongs_to_root"))
    ///     .branch(Condition::new("sub_command"))
    ///     .command("the-command", |sub| sub.add(Parameter::argument("belongs_to_sub_command")))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(vec!["1", "the-command", "2"].as_slice()).unwrap();
    ///
    /// assert_eq!(result.text("belongs_to_root"), Some("1"));
    /// assert_eq!(result.command(), Some("the-command"));
    /// assert_eq!(result.text("belongs_to_sub_command"), Some("2"));
    /// ```
    pub fn branch(mut self, condition: Condition) -> SubCommandParser {
        let parameter = condition.consume();
        if self
            .discriminator
            .replace(parameter.name().to_string())
            .is_some()
        {
            unreachable!("internal error - cannot setup multiple discriminators");
        }

        SubCommandParser::new(self.add(parameter))
    }

    fn into_parser(self) -> Result<(String, Parser), ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        let parser = Parser::new(self.parameters, self.discriminator)?;
        Ok((self.program, parser))
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        let (program, parser) = self.into_parser()?;
        Ok(GeneralParser::command(program, parser, user_interface))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

/// The sub-command parser.
#[derive(Debug)]
pub struct SubCommandParser {
    root: CommandLineParser,
    commands: HashMap<String, CommandLineParser>,
    deferred_error: Option<ConfigError>,
}

impl SubCommandParser {
    fn new(root: CommandLineParser) -> Self {
        Self {
            root,
            commands: HashMap::default(),
            deferred_error: None,
        }
    }

    /// Setup a sub-command.
    ///
    /// If repeated for the same `name`, only the final version will be created on the parser.
    /// The order of sub-commands does not affect the command parser semantics.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{CommandLineParser, Condition, Parameter};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .branch(Condition::new("sub_command"))
    ///     .command("a", |sub| sub.add(Parameter::argument("value_a")))
    ///     .command("b", |sub| sub.add(Parameter::argument("value_b")))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(vec!["a", "1"].as_slice()).unwrap();
    ///
    /// assert_eq!(result.command(), Some("a"));
    /// assert_eq!(result.text("value_a"), Some("1"));
    /// assert_eq!(result.text("value_b"), None);
    /// ```
    pub fn command(
        mut self,
        name: impl Into<String>,
        setup_fn: impl FnOnce(SubCommand) -> SubCommand,
    ) -> Self {
        let name = name.into();

        if name.is_empty() || name.starts_with(SHORT_PREFIX) {
            let discriminator = self
                .root
                .discriminator
                .as_ref()
                .expect("internal error - root must have a discriminator");
            self.deferred_error.get_or_insert(ConfigError(format!(
                "Parameter '{discriminator}' contains invalid sub-command '{name}'."
            )));
        }

        let inner = CommandLineParser::new(name.clone());
        let sub_command = setup_fn(SubCommand { inner });
        self.commands.insert(name, sub_command.inner);
        self
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        let (program, command) = self.root.into_parser()?;
        let mut sub_commands = HashMap::default();

        for (name, clp) in self.commands.into_iter() {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Building sub-command '{name}' of '{program}'.");
            }

            let (_, sub_parser) = clp.into_parser()?;
            sub_commands.insert(name, sub_parser);
        }

        Ok(GeneralParser::sub_command(
            program,
            command,
            sub_commands,
            user_interface,
        ))
    }

    /// Build the sub-command based command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the sub-command based command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

/// A sub-command line parser.
///
/// Used with [`SubCommandParser::command`].
#[derive(Debug)]
pub struct SubCommand {
    inner: CommandLineParser,
}

impl SubCommand {
    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a [`SubCommand`] for use in testing.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{Parameter, SubCommand};
    ///
    /// // Function under test.
    /// // We want to make sure the setup_fn is wired up correctly.
    /// pub fn setup_fn(sub: SubCommand) -> SubCommand {
    ///     sub.add(Parameter::argument("value"))
    /// }
    ///
    /// let parser = setup_fn(SubCommand::test_dummy()).build_parser().unwrap();
    /// let result = parser.parse_tokens(vec!["2"].as_slice()).unwrap();
    /// assert_eq!(result.text("value"), Some("2"));
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn test_dummy() -> Self {
        SubCommand {
            inner: CommandLineParser::new("test-dummy"),
        }
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a [`GeneralParser`] for testing.
    /// See [`SubCommand::test_dummy`] for an example.
    #[cfg(feature = "unit_test")]
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.inner
            .build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Add an argument/option to the sub-command.
    ///
    /// The order of argument parameters corresponds to their positional order during parsing.
    /// The order of option parameters does not affect the sub-command parser semantics.
    ///
    /// See [`SubCommandParser::command`] for usage.
    pub fn add(self, parameter: Parameter) -> Self {
        SubCommand {
            inner: self.inner.add(parameter),
        }
    }

    /// Inherit the parameters of the `parent` command line parser.
    /// See [`CommandLineParser::parent`] for the semantics.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{CommandLineParser, Condition, Parameter};
    ///
    /// let common = CommandLineParser::new("common")
    ///     .add(Parameter::option("common", None));
    /// let parser = CommandLineParser::new("program")
    ///     .branch(Condition::new("command"))
    ///     .command("log", |sub| sub.parent(&common))
    ///     .command("diff", |sub| sub.parent(&common))
    ///     .build();
    ///
    /// let result = parser.parse_tokens(&["log", "--common", "abc"]).unwrap();
    /// assert_eq!(result.command(), Some("log"));
    /// assert_eq!(result.text("common"), Some("abc"));
    /// ```
    pub fn parent(self, parent: &CommandLineParser) -> Self {
        SubCommand {
            inner: self.inner.parent(parent),
        }
    }
}
