#![deny(missing_docs)]

//! # Generate Command
//!
//! Plays the host role for the generator: finds the project's other source
//! files, runs the analysis, applies the toggles and writes the DTO file.

use crate::error::CliResult;
use crate::options::OptionArgs;
use dto_writer_core::{analyze, generate_source_code, ParsedModel};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories holding build output rather than sources.
const SKIPPED_DIRS: &[&str] = &["bin", "obj"];

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// C# file containing the model classes.
    pub model_file: PathBuf,

    /// Project root searched for sibling `.cs` files (default: the model file's directory).
    #[clap(long)]
    pub project_dir: Option<PathBuf>,

    /// Output file (default: `<ModelFile>Dto.cs` next to the model file).
    #[clap(long, short, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the generated code instead of writing a file.
    #[clap(long)]
    pub stdout: bool,

    #[clap(flatten)]
    pub toggles: OptionArgs,
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let model = load_model(&args.model_file, args.project_dir.as_deref(), &args.toggles)?;
    let code = generate_source_code(&model);

    if args.stdout {
        print!("{}", code);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.model_file));
    write_output(&output, &code)?;
    tracing::info!(path = %output.display(), "wrote DTO file");
    Ok(())
}

/// Analyzes `model_file` against its project and applies the toggles.
pub fn load_model(
    model_file: &Path,
    project_dir: Option<&Path>,
    toggles: &OptionArgs,
) -> CliResult<ParsedModel> {
    let project_dir = match project_dir {
        Some(dir) => dir.to_path_buf(),
        None => model_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let others = discover_sources(&project_dir, model_file);
    let total = others.len() * 2;
    tracing::debug!(project = %project_dir.display(), files = others.len(), "discovered sources");

    let model = analyze(model_file, &others, |done| {
        tracing::debug!(done, total, "analysis progress");
    })?;
    Ok(toggles.resolve()?.apply(&model))
}

/// Every `.cs` file under `project_dir` except `selected` and build output.
pub fn discover_sources(project_dir: &Path, selected: &Path) -> Vec<PathBuf> {
    let selected = fs::canonicalize(selected).unwrap_or_else(|_| selected.to_path_buf());

    WalkDir::new(project_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.depth() > 0
                && e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.iter().any(|d| d.eq_ignore_ascii_case(name))))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "cs"))
        .filter(|p| fs::canonicalize(p).unwrap_or_else(|_| p.clone()) != selected)
        .collect()
}

/// `Models/Person.cs` -> `Models/PersonDto.cs`.
pub fn default_output_path(model_file: &Path) -> PathBuf {
    let stem = model_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    model_file.with_file_name(format!("{}Dto.cs", stem))
}

/// Writes `code`, creating missing parent directories.
pub fn write_output(path: &Path, code: &str) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, code)?;
    Ok(())
}
