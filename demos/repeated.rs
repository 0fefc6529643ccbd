use argfold::{Action, CommandLineParser, Nargs, Parameter, Transform};

fn main() {
    let parser = CommandLineParser::new("repeated")
        .add(Parameter::option("define", Some('D')).action(Action::Append))
        .add(
            Parameter::option("include", Some('I'))
                .nargs(Nargs::AtLeastOne)
                .action(Action::Extend),
        )
        .add(
            Parameter::option("verbose", Some('v'))
                .nargs(Nargs::Precisely(0))
                .action(Action::Count)
                .default(0u8),
        )
        .add(
            Parameter::option("level", Some('l'))
                .transform(Transform::parse::<i32>())
                .default(0i32),
        )
        .build();

    let result = parser.parse();

    for (name, value) in result.iter() {
        println!("{name}: {value}");
    }
}
