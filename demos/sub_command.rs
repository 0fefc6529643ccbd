use argfold::{Action, CommandLineParser, Condition, Nargs, Parameter};

fn main() {
    let common = CommandLineParser::new("common").add(Parameter::option("common", Some('c')));
    let parser = CommandLineParser::new("sub-command")
        .add(Parameter::switch("dry-run", Some('n')))
        .branch(Condition::new("command"))
        .command("log", |sub| {
            sub.parent(&common)
                .add(Parameter::option("arg", None).required())
        })
        .command("diff", |sub| {
            sub.parent(&common).add(
                Parameter::argument("paths")
                    .nargs(Nargs::Any)
                    .action(Action::Replace),
            )
        })
        .build();

    let result = parser.parse();

    match result.command() {
        Some("log") => {
            println!("log --arg {}", result.text("arg").unwrap_or_default());
        }
        Some("diff") => {
            let paths = result.list("paths").unwrap_or_default();
            println!("diff over {} path(s)", paths.len());
        }
        _ => {
            panic!("impossible - the parser rejects any sub-command not set up via `command(..)`.")
        }
    }

    if let Some(common) = result.text("common") {
        println!("common: {common}");
    }
}
