#![deny(missing_docs)]

//! # Analyze Command
//!
//! Prints the analyzed model as JSON, after toggles are applied.

use crate::error::CliResult;
use crate::generate::load_model;
use crate::options::OptionArgs;
use std::path::PathBuf;

/// Arguments for the analyze command.
#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// C# file containing the model classes.
    pub model_file: PathBuf,

    /// Project root searched for sibling `.cs` files (default: the model file's directory).
    #[clap(long)]
    pub project_dir: Option<PathBuf>,

    #[clap(flatten)]
    pub toggles: OptionArgs,
}

/// Executes the analyze command.
pub fn execute(args: &AnalyzeArgs) -> CliResult<()> {
    println!("{}", render(args)?);
    Ok(())
}

fn render(args: &AnalyzeArgs) -> CliResult<String> {
    let model = load_model(&args.model_file, args.project_dir.as_deref(), &args.toggles)?;
    Ok(serde_json::to_string_pretty(&model)?)
}
