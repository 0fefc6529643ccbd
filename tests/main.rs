use argfold::{
    Action, CommandLineParser, Condition, ConfigError, GeneralParser, Nargs, Parameter,
    Transform, UsageError, Value,
};
use assert_matches::assert_matches;
use rstest::rstest;

fn texts(values: &[&str]) -> Value {
    Value::from(values.to_vec())
}

fn single(action: Action, transform: Transform) -> GeneralParser {
    CommandLineParser::new("program")
        .add(
            Parameter::option("arg", None)
                .action(action)
                .transform(transform),
        )
        .build_parser()
        .unwrap()
}

fn vcs() -> GeneralParser {
    let common = CommandLineParser::new("common").add(Parameter::option("common", None));
    CommandLineParser::new("vcs")
        .branch(Condition::new("command"))
        .command("log", |sub| {
            sub.parent(&common)
                .add(Parameter::option("arg", None).required())
        })
        .command("diff", |sub| sub.parent(&common))
        .build_parser()
        .unwrap()
}

#[test]
fn append_repeated() {
    let parser = single(Action::Append, Transform::identity());

    let result = parser
        .parse_tokens(&["--arg", "1", "--arg", "2", "--arg", "3"])
        .unwrap();

    assert_eq!(result.get("arg"), Some(&texts(&["1", "2", "3"])));
}

#[test]
fn extend_repeated() {
    let parser = single(Action::Extend, Transform::identity());

    let result = parser
        .parse_tokens(&["--arg", "1", "--arg", "2", "--arg", "3"])
        .unwrap();

    assert_eq!(result.get("arg"), Some(&texts(&["1", "2", "3"])));
}

#[test]
fn extend_at_least_one_repeated() {
    let parser = CommandLineParser::new("program")
        .add(
            Parameter::option("arg", None)
                .nargs(Nargs::AtLeastOne)
                .action(Action::Extend),
        )
        .build_parser()
        .unwrap();

    let result = parser.parse_tokens(&["--arg", "1", "--arg", "2", "3"]).unwrap();

    assert_eq!(result.get("arg"), Some(&texts(&["1", "2", "3"])));
}

#[test]
fn extend_characters_repeated() {
    let parser = single(Action::Extend, Transform::characters());

    let result = parser
        .parse_tokens(&["--arg", "1", "--arg", "2", "--arg", "3"])
        .unwrap();

    assert_eq!(result.get("arg"), Some(&texts(&["1", "2", "3"])));
}

#[test]
fn append_characters_repeated() {
    let parser = single(Action::Append, Transform::characters());

    let result = parser
        .parse_tokens(&["--arg", "1", "--arg", "2", "--arg", "3"])
        .unwrap();

    assert_eq!(
        result.get("arg"),
        Some(&Value::List(vec![
            texts(&["1"]),
            texts(&["2"]),
            texts(&["3"]),
        ]))
    );
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(7)]
fn occurrences_fold_in_order(#[case] n: usize) {
    // Setup
    let tokens: Vec<String> = (0..n).map(|i| format!("--arg={i}")).collect();
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let expected = Value::List((0..n).map(|i| Value::from(i.to_string())).collect());

    for action in [Action::Append, Action::Extend] {
        let parser = single(action, Transform::identity());

        // Execute
        let result = parser.parse_tokens(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(result.get("arg"), Some(&expected));
    }
}

#[rstest]
#[case(Action::Extend, texts(&["a", "b", "c"]))]
#[case(Action::Append, Value::List(vec![texts(&["a", "b", "c"])]))]
#[case(Action::Replace, texts(&["a", "b", "c"]))]
fn single_multi_value_occurrence(#[case] action: Action, #[case] expected: Value) {
    let parser = CommandLineParser::new("program")
        .add(
            Parameter::option("arg", None)
                .nargs(Nargs::AtLeastOne)
                .action(action),
        )
        .build_parser()
        .unwrap();

    let result = parser.parse_tokens(&["--arg", "a", "b", "c"]).unwrap();

    assert_eq!(result.get("arg"), Some(&expected));
}

#[test]
fn replace_last_wins() {
    let parser = single(Action::Replace, Transform::parse::<i64>());

    let result = parser
        .parse_tokens(&["--arg", "1", "--arg", "-2", "--arg=3"])
        .unwrap();

    assert_eq!(result.get("arg"), Some(&Value::Integer(3)));
}

#[test]
fn transform_per_token() {
    let parser = CommandLineParser::new("program")
        .add(
            Parameter::option("arg", None)
                .nargs(Nargs::Precisely(2))
                .action(Action::Append)
                .transform(Transform::parse::<f64>()),
        )
        .build_parser()
        .unwrap();

    let result = parser
        .parse_tokens(&["--arg", "1", "-2.5", "--arg", "0", "4"])
        .unwrap();

    assert_eq!(
        result.get("arg"),
        Some(&Value::List(vec![
            Value::List(vec![Value::Float(1.0), Value::Float(-2.5)]),
            Value::List(vec![Value::Float(0.0), Value::Float(4.0)]),
        ]))
    );
}

#[test]
fn transform_failure() {
    let parser = single(Action::Append, Transform::parse::<u8>());

    let error = parser
        .parse_tokens(&["--arg", "1", "--arg", "256"])
        .unwrap_err();

    assert_matches!(error, UsageError::InvalidValue { name, .. } => {
        assert_eq!(name, "arg");
    });
}

#[test]
fn custom_transform() {
    let parser = single(
        Action::Extend,
        Transform::new("key=value", |token| match token.split_once('=') {
            Some((key, value)) => Ok(Value::from(vec![key, value])),
            None => Err("expected 'key=value'".to_string()),
        }),
    );

    let result = parser
        .parse_tokens(&["--arg", "a=1", "--arg", "b=2"])
        .unwrap();
    assert_eq!(result.get("arg"), Some(&texts(&["a", "1", "b", "2"])));

    let error = parser.parse_tokens(&["--arg", "a"]).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid value for parameter 'arg': invalid value 'a': expected 'key=value'."
    );
}

#[test]
fn switches_and_counts() {
    let parser = CommandLineParser::new("program")
        .add(Parameter::switch("dry-run", Some('n')))
        .add(
            Parameter::option("verbose", Some('v'))
                .nargs(Nargs::Precisely(0))
                .action(Action::Count),
        )
        .build_parser()
        .unwrap();

    let result = parser.parse_tokens(&["-vnv", "--verbose"]).unwrap();
    assert_eq!(result.get("dry-run"), Some(&Value::Bool(true)));
    assert_eq!(result.get("verbose"), Some(&Value::Integer(3)));

    let result = parser.parse_tokens(empty()).unwrap();
    assert_eq!(result.get("dry-run"), Some(&Value::Bool(false)));
    assert_eq!(result.get("verbose"), None);
}

fn empty() -> &'static [&'static str] {
    &[]
}

#[test]
fn absent_and_default() {
    let parser = CommandLineParser::new("program")
        .add(Parameter::option("absent", None))
        .add(
            Parameter::option("jobs", Some('j'))
                .transform(Transform::parse::<u32>())
                .default(1u32),
        )
        .build_parser()
        .unwrap();

    let result = parser.parse_tokens(empty()).unwrap();
    assert!(!result.contains("absent"));
    assert_eq!(result.get("jobs"), Some(&Value::Integer(1)));

    let result = parser.parse_tokens(&["-j", "4"]).unwrap();
    assert_eq!(result.get("jobs"), Some(&Value::Integer(4)));
}

#[test]
fn required_option_anywhere() {
    let parser = CommandLineParser::new("program")
        .add(Parameter::option("arg", None).required())
        .add(Parameter::argument("items").nargs(Nargs::Any))
        .build_parser()
        .unwrap();

    let result = parser.parse_tokens(&["x", "y", "--arg", "1"]).unwrap();
    assert_eq!(result.text("arg"), Some("1"));
    assert_eq!(result.get("items"), Some(&texts(&["x", "y"])));

    assert_eq!(
        parser.parse_tokens(&["x", "y"]).unwrap_err(),
        UsageError::MissingRequired("arg".to_string())
    );
}

#[rstest]
#[case(vec!["--moot"], UsageError::UnknownOption("moot".to_string()))]
#[case(vec!["-x"], UsageError::UnknownShortOption('x'))]
#[case(vec!["--", "1"], UsageError::UnknownOption("".to_string()))]
#[case(vec!["--arg"], UsageError::TooFewValues("arg".to_string()))]
#[case(vec!["--arg", "1", "extra"], UsageError::UnexpectedArgument("extra".to_string()))]
fn usage_errors(#[case] tokens: Vec<&str>, #[case] expected: UsageError) {
    let parser = single(Action::Replace, Transform::identity());

    assert_eq!(parser.parse_tokens(tokens.as_slice()).unwrap_err(), expected);
}

#[test]
fn parser_reusable() {
    let parser = single(Action::Extend, Transform::identity());

    let first = parser.parse_tokens(&["--arg", "1", "--arg", "2"]).unwrap();
    let second = parser.parse_tokens(&["--arg", "3"]).unwrap();
    let third = parser.parse_tokens(empty()).unwrap();

    assert_eq!(first.get("arg"), Some(&texts(&["1", "2"])));
    assert_eq!(second.get("arg"), Some(&texts(&["3"])));
    assert_eq!(third.get("arg"), None);
}

#[test]
fn sub_command_log() {
    let result = vcs().parse_tokens(&["log", "--arg", "1"]).unwrap();

    assert_eq!(result.command(), Some("log"));
    assert_eq!(result.text("command"), Some("log"));
    assert_eq!(result.text("arg"), Some("1"));
}

#[test]
fn sub_command_log_missing_required() {
    let error = vcs().parse_tokens(&["log"]).unwrap_err();

    assert_eq!(error, UsageError::MissingRequired("arg".to_string()));
}

#[test]
fn sub_command_diff() {
    let result = vcs().parse_tokens(&["diff"]).unwrap();

    assert_eq!(result.command(), Some("diff"));
    assert!(!result.contains("arg"));
}

#[rstest]
#[case(vec!["log", "--arg", "1", "--common", "abc"], "log")]
#[case(vec!["log", "--common", "abc", "--arg", "1"], "log")]
#[case(vec!["diff", "--common", "abc"], "diff")]
fn sub_command_inherited(#[case] tokens: Vec<&str>, #[case] expected_command: &str) {
    let result = vcs().parse_tokens(tokens.as_slice()).unwrap();

    assert_eq!(result.command(), Some(expected_command));
    assert_eq!(result.text("common"), Some("abc"));
}

#[rstest]
#[case(vec![], UsageError::MissingSubCommand("command".to_string()))]
#[case(vec!["blame"], UsageError::UnknownSubCommand { name: "command".to_string(), variant: "blame".to_string() })]
#[case(vec!["--common", "abc", "diff"], UsageError::UnknownOption("common".to_string()))]
fn sub_command_errors(#[case] tokens: Vec<&str>, #[case] expected: UsageError) {
    assert_eq!(vcs().parse_tokens(tokens.as_slice()).unwrap_err(), expected);
}

#[test]
fn parent_snapshot() {
    let common = CommandLineParser::new("common").add(Parameter::option("common", None));
    let scp = CommandLineParser::new("vcs")
        .branch(Condition::new("command"))
        .command("log", |sub| sub.parent(&common));
    let _common = common.add(Parameter::option("later", None));
    let parser = scp.build_parser().unwrap();

    assert_eq!(
        parser.parse_tokens(&["log", "--later", "x"]).unwrap_err(),
        UsageError::UnknownOption("later".to_string())
    );
}

#[rstest]
#[case(Parameter::option("arg", None).nargs(Nargs::Precisely(0)))]
#[case(Parameter::option("arg", None).nargs(Nargs::Any).action(Action::Count))]
#[case(Parameter::option("arg", None).action(Action::Constant(Value::from("x"))))]
#[case(Parameter::argument("arg").action(Action::Extend))]
#[case(Parameter::option("-arg", None))]
fn config_errors(#[case] parameter: Parameter) {
    let error: ConfigError = CommandLineParser::new("program")
        .add(parameter)
        .build_parser()
        .unwrap_err();

    assert!(error.to_string().starts_with("Config error: "));
}
