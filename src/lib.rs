//! `argfold` is a command line parser for Rust, centred on how *repeated* options fold into a single value.
//!
//! Most command line parsers let an option occur more than once, but quietly keep only the last occurrence.
//! `argfold` makes the folding explicit: each parameter declares an [`Action`] which decides how its occurrences combine.
//! * *Replace*: the last occurrence wins.
//! * *Append*: each occurrence becomes one element of a list (multi-value occurrences nest).
//! * *Extend*: each occurrence is flattened onto a list.
//!
//! Parsing produces a [`ParseResult`]: a dynamic mapping from parameter name to [`Value`].
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/repeated.rs")]
//! ```
//!
//! ```console
//! $ repeated -D a=1 -D b=2 -I x y -I z -vvv -l -3
//! define: [a=1, b=2]
//! include: [x, y, z]
//! level: -3
//! verbose: 3
//!
//! $ repeated --level x
//! Usage error: Invalid value for parameter 'level': cannot convert 'x' to i32.
//! --level x
//!         ^
//! ```
//!
//! # Builder Api
//! Configure `argfold` by starting with a [`CommandLineParser`] and `add`ing parameters.
//! There are two classes of parameters: [`Parameter::argument`] and [`Parameter::option`] (along with the [`Parameter::switch`] shorthand).
//!
//! Each parameter is configured with:
//! * Its cardinality per occurrence, via [`Nargs`] (default: precisely 1).
//! * Its [`Action`] (default: `Action::Replace`).
//! * A [`Transform`] applied to each value token (default: identity, keeping the token as `Value::Text`).
//! * Whether it is required (options only; arguments are inherently required).
//! * An optional default, used only when the parameter does not occur.
//!
//! Not every combination makes sense.
//! The value taking actions (`Replace`, `Append`, `Extend`) require at least one value, while `Action::Constant` and `Action::Count` require `Nargs::Precisely(0)`.
//! Arguments only ever occur once, so they only support `Action::Replace`.
//! Configuration mistakes are reported as a [`ConfigError`] when the parser is built.
//!
//! ### Transforms
//! A transform converts each token individually, before the action folds it in.
//! In particular, a transform never sees the assembled list of a multi-value occurrence.
//!
//! ```
//! use argfold::{Action, CommandLineParser, Parameter, Transform, Value};
//!
//! let parser = CommandLineParser::new("program")
//!     .add(
//!         Parameter::option("arg", None)
//!             .action(Action::Append)
//!             .transform(Transform::characters()),
//!     )
//!     .build();
//!
//! let result = parser.parse_tokens(&["--arg", "1", "--arg", "2"]).unwrap();
//! assert_eq!(
//!     result.get("arg"),
//!     Some(&Value::List(vec![Value::from(vec!["1"]), Value::from(vec!["2"])]))
//! );
//! ```
//!
//! ### Sub-commands
//! To setup a sub-command based Cli, start with a root `CommandLineParser`.
//! Both options and arguments may be added to the root parser via `add`.
//! The sub-command section of the parser begins by `branch`ing this parser with a [`Condition`].
//!
//! Once `branch`ed, the result is a [`SubCommandParser`] that allows you to setup individual sub-commands via [`SubCommandParser::command`].
//! Parameters shared amongst sub-commands may be declared once on a separate `CommandLineParser` and inherited via [`SubCommand::parent`].
//!
//! The selected sub-command is stored in the result under the condition's name (and via [`ParseResult::command`]).
//! The values of the sub-command are merged into the same result.
//!
//! ```no_run
#![doc = include_str!("../demos/sub_command.rs")]
//! ```
//!
//! ```console
//! $ sub-command log --arg 1
//! log --arg 1
//!
//! $ sub-command log
//! Usage error: Required option '--arg' was not provided.
//! log
//!   ^
//!
//! $ sub-command diff -c abc x y
//! diff over 2 path(s)
//! common: abc
//! ```
//!
//! # Cli Semantics
//! `argfold` parses the Cli tokens according to the following set of rules.
//!
//! * Arguments are matched based off positional ordering.
//! * Options are matched based off the `--NAME` (or short name `-N`) specifier.
//! Once specified, the cardinality is matched against the subsequent tokens.
//! * The `Nargs` `*` and `+` match greedily, until the next option or the end of the tokens.
//! * The value of an option may be attached with the `=` character (ex: `--key=123` or `-k=123`).
//! Subsequent tokens always rollover to the next parameter, even if the option's cardinality is greedy.
//! * Multiple short named options may be combined into a single flag (ex: `-abc`); only the final one may take values.
//! * Tokens that look like negative numbers (ex: `-1` or `-2.5`) are values, unless a digit short option is configured.
//! * Options may occur any number of times; each occurrence is folded into the value in the order encountered.
//! * Required options are checked once all the tokens have been matched.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events while parsing.
pub use argfold_builder::*;
