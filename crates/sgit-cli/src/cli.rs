use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sgit",
    about = "sgit — minimal content-addressed file versioning",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new sgit repository
    Init(InitArgs),
    /// Stage files for the next commit
    Add(AddArgs),
    /// Commit staged changes as a new snapshot
    Commit(CommitArgs),
    /// Show working directory status
    Status(StatusArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Files or directories to stage
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct CommitArgs {}

#[derive(Args)]
pub struct StatusArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["sgit", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(_)));
    }

    #[test]
    fn parse_init_with_path() {
        let cli = Cli::try_parse_from(["sgit", "init", "/tmp/work"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.path, Some("/tmp/work".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_add_multiple_paths() {
        let cli = Cli::try_parse_from(["sgit", "add", "a.txt", "src"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.paths, vec!["a.txt", "src"]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn add_requires_at_least_one_path() {
        assert!(Cli::try_parse_from(["sgit", "add"]).is_err());
    }

    #[test]
    fn parse_commit() {
        let cli = Cli::try_parse_from(["sgit", "commit"]).unwrap();
        assert!(matches!(cli.command, Command::Commit(_)));
    }

    #[test]
    fn parse_status() {
        let cli = Cli::try_parse_from(["sgit", "status"]).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["sgit", "--verbose", "status"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_command_fails() {
        assert!(Cli::try_parse_from(["sgit", "push"]).is_err());
    }
}
