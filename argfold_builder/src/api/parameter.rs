use crate::api::capture::Capture;
use crate::api::Transform;
use crate::constant::{SHORT_PREFIX, VALUE_DELIMITER};
use crate::matcher::{ArgumentConfig, Bound, OptionConfig};
use crate::model::{Action, Nargs, Value};
use crate::parser::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterClass {
    Opt,
    Arg,
}

#[derive(Debug, Clone)]
pub(crate) struct ParameterInner {
    class: ParameterClass,
    name: String,
    short: Option<char>,
    nargs: Nargs,
    action: Action,
    transform: Transform,
    required: bool,
    default: Option<Value>,
}

impl ParameterInner {
    pub(crate) fn class(&self) -> ParameterClass {
        self.class
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn short(&self) -> Option<char> {
        self.short
    }

    pub(crate) fn required(&self) -> bool {
        self.required
    }

    pub(crate) fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Check that the parameter is internally consistent.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError("Parameter names cannot be empty.".to_string()));
        }

        if self.name.starts_with(SHORT_PREFIX) {
            return Err(ConfigError(format!(
                "Parameter '{}' must be named without its '-' prefix.",
                self.name
            )));
        }

        if self
            .name
            .chars()
            .any(|c| c == VALUE_DELIMITER || c.is_whitespace())
        {
            return Err(ConfigError(format!(
                "Parameter '{}' cannot contain '{VALUE_DELIMITER}' or whitespace.",
                self.name
            )));
        }

        if let Some(short) = self.short {
            if short == '-' || short == VALUE_DELIMITER || short.is_whitespace() {
                return Err(ConfigError(format!(
                    "Parameter '{}' cannot use '{short}' as its short name.",
                    self.name
                )));
            }
        }

        let consistent = match (&self.action, self.nargs) {
            (Action::Replace | Action::Append | Action::Extend, Nargs::Precisely(0)) => false,
            (Action::Replace | Action::Append | Action::Extend, _) => true,
            (Action::Constant(_) | Action::Count, Nargs::Precisely(0)) => true,
            (Action::Constant(_) | Action::Count, _) => false,
        };

        if !consistent {
            return Err(ConfigError(format!(
                "Parameter '{}' cannot combine action {} with nargs {}.",
                self.name, self.action, self.nargs
            )));
        }

        if self.class == ParameterClass::Arg && self.action != Action::Replace {
            return Err(ConfigError(format!(
                "Argument '{}' cannot use action {}; arguments only occur once.",
                self.name, self.action
            )));
        }

        Ok(())
    }
}

impl From<&ParameterInner> for OptionConfig {
    fn from(value: &ParameterInner) -> Self {
        OptionConfig::new(value.name(), value.short(), Bound::from(value.nargs))
    }
}

impl From<&ParameterInner> for ArgumentConfig {
    fn from(value: &ParameterInner) -> Self {
        let bound = match (value.nargs, value.required) {
            (Nargs::Precisely(1), false) => Bound::Range(0, 1),
            (nargs, _) => Bound::from(nargs),
        };
        ArgumentConfig::new(value.name.clone(), bound)
    }
}

impl From<&ParameterInner> for Capture {
    fn from(value: &ParameterInner) -> Self {
        Capture::new(value.nargs, value.action.clone(), value.transform.clone())
    }
}

/// The sub-command selector with which to branch the parser.
/// Used with [`CommandLineParser::branch`](./struct.CommandLineParser.html#method.branch).
///
/// The selector is the first argument following the root parser's own arguments.
/// Its value is recorded in the [`ParseResult`](crate::ParseResult) under the condition's name.
#[derive(Debug, Clone)]
pub struct Condition(Parameter);

impl Condition {
    /// Create a (required) condition.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::Condition;
    ///
    /// Condition::new("command");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Condition(Parameter::argument(name))
    }

    /// Set whether a sub-command must be selected.
    /// When not required and no sub-command is given, the selector is absent from the result.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::Condition;
    ///
    /// Condition::new("command").required(false);
    /// ```
    pub fn required(self, required: bool) -> Self {
        let mut inner = (self.0).0;
        inner.required = required;
        Self(Parameter(inner))
    }

    pub(crate) fn consume(self) -> Parameter {
        self.0
    }
}

/// An argument/option definition for the command line parser.
/// Used with [`CommandLineParser::add`](./struct.CommandLineParser.html#method.add) and [`SubCommand::add`](./struct.SubCommand.html#method.add).
///
/// A parameter is plain data: cloning it (ex: when inheriting from a parent parser) produces an independent copy.
#[derive(Debug, Clone)]
pub struct Parameter(ParameterInner);

impl Parameter {
    /// Create an option parameter, matched via `--NAME` (or `-SHORT`).
    ///
    /// By default the option takes precisely one value, replaces any previous occurrence, is not required, and has no default.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{Action, Nargs, Parameter};
    ///
    /// Parameter::option("include", Some('i'))
    ///     .nargs(Nargs::AtLeastOne)
    ///     .action(Action::Extend);
    /// ```
    pub fn option(name: impl Into<String>, short: Option<char>) -> Self {
        Self(ParameterInner {
            class: ParameterClass::Opt,
            name: name.into(),
            short,
            nargs: Nargs::Precisely(1),
            action: Action::Replace,
            transform: Transform::identity(),
            required: false,
            default: None,
        })
    }

    /// Create a switch option: takes no values, stores `true` when present and defaults to `false`.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::Parameter;
    ///
    /// Parameter::switch("verbose", Some('v'));
    /// ```
    pub fn switch(name: impl Into<String>, short: Option<char>) -> Self {
        Parameter::option(name, short)
            .nargs(Nargs::Precisely(0))
            .action(Action::Constant(Value::Bool(true)))
            .default(false)
    }

    /// Create an argument parameter, matched positionally.
    ///
    /// By default the argument takes precisely one value.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{Nargs, Parameter};
    ///
    /// Parameter::argument("files").nargs(Nargs::Any);
    /// ```
    pub fn argument(name: impl Into<String>) -> Self {
        Self(ParameterInner {
            class: ParameterClass::Arg,
            name: name.into(),
            short: None,
            nargs: Nargs::Precisely(1),
            action: Action::Replace,
            transform: Transform::identity(),
            required: true,
            default: None,
        })
    }

    /// Set the number of values each occurrence takes.
    pub fn nargs(self, nargs: Nargs) -> Self {
        let mut inner = self.0;
        inner.nargs = nargs;
        Self(inner)
    }

    /// Set how repeated occurrences fold together.
    /// See [`Action`] for the semantics of each action.
    pub fn action(self, action: Action) -> Self {
        let mut inner = self.0;
        inner.action = action;
        Self(inner)
    }

    /// Set the transform applied to each value token.
    pub fn transform(self, transform: Transform) -> Self {
        let mut inner = self.0;
        inner.transform = transform;
        Self(inner)
    }

    /// Require the option to occur at least once.
    /// Arguments are always required (unless their nargs permit zero values).
    pub fn required(self) -> Self {
        let mut inner = self.0;
        inner.required = true;
        Self(inner)
    }

    /// Set the value used when the parameter does not occur.
    /// Without a default, an absent parameter is absent from the result.
    ///
    /// ### Example
    /// ```
    /// # use argfold_builder as argfold;
    /// use argfold::{Parameter, Transform};
    ///
    /// Parameter::option("jobs", Some('j'))
    ///     .transform(Transform::parse::<u32>())
    ///     .default(1u32);
    /// ```
    pub fn default(self, value: impl Into<Value>) -> Self {
        let mut inner = self.0;
        inner.default = Some(value.into());
        Self(inner)
    }

    pub(crate) fn name(&self) -> &str {
        &self.0.name
    }

    pub(crate) fn consume(self) -> ParameterInner {
        self.0
    }
}
