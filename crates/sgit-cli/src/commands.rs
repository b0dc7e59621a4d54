use std::path::PathBuf;

use colored::Colorize;

use sgit_index::FileState;
use sgit_repo::{CommitOutcome, Repository};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Add(args) => cmd_add(args),
        Command::Commit(_) => cmd_commit(),
        Command::Status(_) => cmd_status(),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let target = match args.path {
        Some(path) => {
            let target = PathBuf::from(path);
            std::fs::create_dir_all(&target)?;
            target
        }
        None => std::env::current_dir()?,
    };
    let repo = Repository::init(&target)?;
    println!(
        "{} Initialized empty sgit repository in {}",
        "✓".green().bold(),
        repo.layout().control_dir().display().to_string().bold()
    );
    Ok(())
}

fn cmd_add(args: AddArgs) -> anyhow::Result<()> {
    let repo = Repository::open(&std::env::current_dir()?)?;
    let paths: Vec<PathBuf> = args.paths.iter().map(PathBuf::from).collect();
    for path in repo.add(&paths)? {
        println!("  {} {}", "staged:".green(), path);
    }
    Ok(())
}

fn cmd_commit() -> anyhow::Result<()> {
    let repo = Repository::open(&std::env::current_dir()?)?;
    match repo.commit()? {
        CommitOutcome::Committed(id) => {
            println!(
                "{} Committed snapshot {}",
                "✓".green().bold(),
                id.short_hex().yellow()
            );
        }
        CommitOutcome::Unchanged(id) => {
            println!(
                "Nothing to commit; head stays at {}",
                id.short_hex().yellow()
            );
        }
    }
    Ok(())
}

fn cmd_status() -> anyhow::Result<()> {
    let repo = Repository::open(&std::env::current_dir()?)?;
    let head = repo.head()?;
    let report = repo.status()?;

    println!("Head: {}", head.short_hex().yellow());
    if report.is_empty() {
        println!("No files in the working tree.");
        return Ok(());
    }
    for (path, state) in &report {
        let label = format!("{:>9}", state.to_string());
        let label = match state {
            FileState::Unchanged => label.dimmed(),
            FileState::Staged => label.green(),
            FileState::Modified => label.red(),
            FileState::New => label.cyan(),
        };
        println!("  {label}  {path}");
    }
    Ok(())
}
