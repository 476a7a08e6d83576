// Command-line interface for backdrop
//
// Works on the same pieces a host editor would wire together, without the editor:
//
//  backdrop styles                                   - List the style presets
//  backdrop parse <block-file> [--context DOC]       - Print the parsed block configuration
//  backdrop render <doc.md>... [--scroll LINE]...    - Render documents to a standalone HTML page
//  backdrop set-style <id> [--data FILE]             - Persist the global style preference
//  backdrop generate-css                             - Print the stylesheet
//
// Configuration is read from `backdrop.toml` in the working directory when present, layered
// over the built-in defaults. `--config PATH` adds a required file on top.

mod snapshot;

use backdrop_config::{BackdropConfig, JsonSettingsStore, Loader};
use backdrop_core::host::VaultResolver;
use backdrop_core::{catalog, css, parse_block, GlobalPreference, SettingsStore, StyleId};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use snapshot::{Document, Snapshot};
use std::fs;

fn build_cli() -> Command {
    Command::new("backdrop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scroll-driven backgrounds for Markdown documents")
        .long_about(
            "backdrop reads fenced `backdrop` blocks in Markdown documents and shows the\n\
            block nearest the reading position as the background of the document view.\n\n\
            Commands:\n  \
            - styles:       List the style presets\n  \
            - parse:        Show how a block's text is interpreted\n  \
            - render:       Produce an HTML snapshot of rendered documents\n  \
            - set-style:    Change the global default style\n  \
            - generate-css: Print the stylesheet hosts inject",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a backdrop.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log state transitions to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("styles").about("List the style presets"))
        .subcommand(
            Command::new("parse")
                .about("Parse the text of one block and print its configuration as JSON")
                .arg(
                    Arg::new("file")
                        .help("File holding the block text (the lines between the fences)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("context")
                        .long("context")
                        .value_name("DOC")
                        .help("Document the block belongs to (defaults to the block file)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("vault")
                        .long("vault")
                        .value_name("DIR")
                        .help("Root directory for image lookups (defaults to the working directory)")
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Render Markdown documents to a standalone HTML snapshot")
                .long_about(
                    "Opens each document in turn, as if switching views, then scrolls the\n\
                    last one to every --scroll line in order. The resulting workspace is\n\
                    written as HTML with the stylesheet embedded.\n\n\
                    Examples:\n  \
                    backdrop render notes/trip.md --scroll 1 --scroll 120\n  \
                    backdrop render a.md b.md --style zen -o out.html",
                )
                .arg(
                    Arg::new("documents")
                        .help("Markdown documents to open")
                        .required(true)
                        .num_args(1..)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("scroll")
                        .long("scroll")
                        .value_name("LINE")
                        .help("Scroll the last document so LINE is at the top (repeatable)")
                        .action(ArgAction::Append)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("vault")
                        .long("vault")
                        .value_name("DIR")
                        .help("Root directory for image lookups (defaults to the working directory)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("style")
                        .long("style")
                        .value_name("ID")
                        .help("Global style for this render, overriding the stored preference"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("set-style")
                .about("Persist the global default style")
                .arg(
                    Arg::new("id")
                        .help("Style identifier, see `backdrop styles`")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("data")
                        .long("data")
                        .value_name("FILE")
                        .help("Settings file (defaults to settings.path from the configuration)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("generate-css").about("Print the stylesheet"))
}

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_flag("verbose"));
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));

    match matches.subcommand() {
        Some(("styles", _)) => handle_styles_command(),
        Some(("parse", sub_matches)) => handle_parse_command(sub_matches),
        Some(("render", sub_matches)) => handle_render_command(sub_matches, config),
        Some(("set-style", sub_matches)) => handle_set_style_command(sub_matches, &config),
        Some(("generate-css", _)) => handle_generate_css_command(),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_cli_config(explicit_path: Option<&str>) -> BackdropConfig {
    let loader = Loader::new().with_optional_file("backdrop.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Handle the styles command
fn handle_styles_command() {
    print!("{}", catalog::describe());
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches) {
    let path = matches
        .get_one::<String>("file")
        .expect("file is required");
    let context = matches
        .get_one::<String>("context")
        .map(|s| s.as_str())
        .unwrap_or(path);
    let resolver = vault_resolver(matches);

    let source = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let config = parse_block(&source, context, &resolver);
    if let Err(err) = config.validate() {
        eprintln!("Warning: {err}");
    }

    let json = serde_json::to_string_pretty(&config).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    println!("{json}");
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches, config: BackdropConfig) {
    let style = matches
        .get_one::<String>("style")
        .map(|raw| parse_style_arg(raw));
    let resolver = vault_resolver(matches);

    let mut snapshot = Snapshot::new(config, Box::new(resolver), style);
    for path in matches
        .get_many::<String>("documents")
        .expect("documents are required")
    {
        let document = Document::read(path).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
        snapshot.open(&document);
    }
    for line in matches.get_many::<usize>("scroll").into_iter().flatten() {
        snapshot.scroll_to(*line);
    }
    if snapshot.errors() > 0 {
        eprintln!("{} block(s) rendered without an image", snapshot.errors());
    }

    let html = snapshot.to_html().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, html).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{html}"),
    }
}

/// Handle the set-style command
fn handle_set_style_command(matches: &ArgMatches, config: &BackdropConfig) {
    let raw = matches.get_one::<String>("id").expect("id is required");
    let style = parse_style_arg(raw);

    let mut store = match matches.get_one::<String>("data") {
        Some(path) => JsonSettingsStore::new(path, config.appearance.style),
        None => config.settings_store(),
    };
    if let Err(err) = store.save(&GlobalPreference::new(style)) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    println!(
        "Global style set to {} ({})",
        style.label(),
        store.path().display()
    );
}

/// Handle the generate-css command
fn handle_generate_css_command() {
    print!("{}", css::stylesheet());
}

fn vault_resolver(matches: &ArgMatches) -> VaultResolver {
    let root = matches
        .get_one::<String>("vault")
        .map(|s| s.as_str())
        .unwrap_or(".");
    VaultResolver::new(root)
}

fn parse_style_arg(raw: &str) -> StyleId {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn render_collects_repeated_scrolls() {
        let matches = build_cli()
            .try_get_matches_from([
                "backdrop", "render", "a.md", "b.md", "--scroll", "3", "--scroll", "40",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "render");
        let docs: Vec<_> = sub.get_many::<String>("documents").unwrap().collect();
        assert_eq!(docs, ["a.md", "b.md"]);
        let lines: Vec<usize> = sub.get_many::<usize>("scroll").unwrap().copied().collect();
        assert_eq!(lines, [3, 40]);
    }

    #[test]
    fn config_flag_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["backdrop", "styles", "--config", "custom.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("config").map(|s| s.as_str()),
            Some("custom.toml")
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(build_cli()
            .try_get_matches_from(["backdrop", "--verbose"])
            .is_err());
    }
}
