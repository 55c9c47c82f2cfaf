#![deny(missing_docs)]

//! # DTO Writer CLI
//!
//! Command Line Interface for the C# DTO generator.
//!
//! Supported Commands:
//! - `generate`: Model file -> `<Model>Dto.cs` with mapping methods.
//! - `analyze`: Prints the analyzed model as JSON.
//! - `attribute`: Adds or removes serialization attributes in a DTO file.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod analyze;
mod attribute;
mod error;
mod generate;
mod options;

use crate::error::CliResult;

#[derive(Parser, Debug)]
#[clap(author, version, about = "C# DTO generator")]
struct Cli {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate DTO classes for a model file.
    Generate(generate::GenerateArgs),
    /// Print the analysis of a model file as JSON.
    Analyze(analyze::AnalyzeArgs),
    /// Add or remove serialization attributes in an existing DTO file.
    Attribute(attribute::AttributeArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Analyze(args) => analyze::execute(args)?,
        Commands::Attribute(args) => attribute::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "dto-writer",
            "generate",
            "Models/Person.cs",
            "--json-property",
            "--exclude-property",
            "Person.Secret",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate(args) => {
                assert!(args.toggles.json_property);
                assert_eq!(
                    args.toggles.exclude_property,
                    vec![("Person".to_string(), "Secret".to_string())]
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_attribute() {
        let cli = Cli::try_parse_from([
            "dto-writer",
            "attribute",
            "remove",
            "PersonDto.cs",
            "--kind",
            "data-member",
            "--class",
            "PersonDto",
        ])
        .unwrap();
        match cli.command {
            Commands::Attribute(args) => {
                assert_eq!(args.action, attribute::Action::Remove);
                assert_eq!(args.kind, attribute::Kind::DataMember);
                assert!(args.property.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
