use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the catalog identifiers in backdrop-core.
// Build scripts can't depend on the crate they build alongside.
const STYLE_IDS: &[&str] = &["glass", "frost", "mist", "crisp", "card", "float", "zen", "off"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("backdrop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scroll-driven backgrounds for Markdown documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("styles"))
        .subcommand(
            Command::new("parse")
                .arg(Arg::new("file").required(true).value_hint(ValueHint::FilePath))
                .arg(Arg::new("context").long("context").value_hint(ValueHint::FilePath))
                .arg(Arg::new("vault").long("vault").value_hint(ValueHint::DirPath)),
        )
        .subcommand(
            Command::new("render")
                .arg(
                    Arg::new("documents")
                        .required(true)
                        .num_args(1..)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("scroll").long("scroll").action(ArgAction::Append))
                .arg(Arg::new("vault").long("vault").value_hint(ValueHint::DirPath))
                .arg(
                    Arg::new("style")
                        .long("style")
                        .value_parser(clap::builder::PossibleValuesParser::new(STYLE_IDS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("set-style")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(STYLE_IDS)),
                )
                .arg(Arg::new("data").long("data").value_hint(ValueHint::FilePath)),
        )
        .subcommand(Command::new("generate-css"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "backdrop", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "backdrop", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "backdrop", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
