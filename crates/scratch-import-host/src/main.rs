// scratch-import: Desktop host for the Scratch Everywhere import pipeline
//
// Plays the part the Android activity plays on device: receives one or more
// content handles, answers overwrite prompts on the terminal and shows one
// notice per imported item.

mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scratch_import::{
    ConflictDecision, ConflictStrategy, ContentHandle, CopyFailurePolicy, FixedDecision, FsResolver,
    ImportConfig, ImportOutcome, ImportRequest, Importer, OverwritePrompt, list_projects,
};

use crate::prompt::TerminalPrompt;

#[derive(Parser)]
#[command(name = "scratch-import", about = "Import Scratch projects into app storage")]
struct Cli {
    /// Project directory (defaults to the platform data directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Import config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import files or file:// URIs into the project directory
    Import {
        /// Files to import, in order
        #[arg(required = true)]
        handles: Vec<String>,

        /// Overwrite existing projects without asking
        #[arg(short, long, conflicts_with = "no")]
        yes: bool,

        /// Never overwrite existing projects
        #[arg(short, long)]
        no: bool,

        /// Ask once per batch instead of once per conflicting file
        #[arg(long)]
        apply_to_all: bool,

        /// Keep partially written files when a copy fails
        #[arg(long)]
        keep_partial: bool,

        /// Transfer buffer size in bytes
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// List projects in the project directory
    List,
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("io.github", "scratcheverywhere", "scratch-everywhere")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

/// Resolve the effective config: file (or defaults), then CLI overrides.
fn load_config(cli: &Cli) -> Result<ImportConfig> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => project_dirs()?.config_dir().join("import.json"),
    };
    let default_root = match &cli.root {
        Some(root) => root.clone(),
        None => project_dirs()?.data_dir().to_path_buf(),
    };

    let mut config = ImportConfig::load(&config_path, default_root)?;
    if let Some(root) = &cli.root {
        config.storage_root = root.clone();
    }
    tracing::debug!("Using config {:?}", config);
    Ok(config)
}

fn run_import(
    config: ImportConfig,
    handles: Vec<String>,
    prompt: &mut dyn OverwritePrompt,
) -> Result<Vec<ImportOutcome>> {
    let importer = Importer::new(FsResolver, config)?;
    let request = match handles.len() {
        1 => ImportRequest::Send(ContentHandle::new(handles.into_iter().next().unwrap_or_default())),
        _ => ImportRequest::SendMultiple(handles.into_iter().map(ContentHandle::new).collect()),
    };
    tracing::info!("Importing {} item(s) into {}", request.len(), importer.config().storage_root.display());
    Ok(importer.import_request(request, prompt))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Import {
            handles,
            yes,
            no,
            apply_to_all,
            keep_partial,
            chunk_size,
        } => {
            if apply_to_all {
                config.conflict_strategy = ConflictStrategy::ApplyToAll;
            }
            if keep_partial {
                config.on_copy_failure = CopyFailurePolicy::KeepPartial;
            }
            if let Some(chunk_size) = chunk_size {
                config.chunk_size = chunk_size;
            }

            let mut prompt: Box<dyn OverwritePrompt> = if yes {
                Box::new(FixedDecision(ConflictDecision::Overwrite))
            } else if no {
                Box::new(FixedDecision(ConflictDecision::Cancel))
            } else {
                Box::new(TerminalPrompt::stdin())
            };

            let outcomes = run_import(config, handles, prompt.as_mut())?;
            for outcome in &outcomes {
                println!("{}", outcome.notice());
            }

            let failed = outcomes.iter().filter(|o| o.reason().is_some()).count();
            if failed > 0 {
                anyhow::bail!("{} of {} item(s) failed to import", failed, outcomes.len());
            }
        }
        Commands::List => {
            let projects = list_projects(&config.storage_root)?;
            if projects.is_empty() {
                println!("No projects in {}.", config.storage_root.display());
            } else {
                println!("{:<40} {:<10} {:>12}", "Name", "Kind", "Size");
                println!("{}", "-".repeat(64));
                for project in projects {
                    let kind = format!("{:?}", project.kind).to_lowercase();
                    println!("{:<40} {:<10} {:>12}", project.name, kind, project.size);
                }
            }
        }
    }

    Ok(())
}
