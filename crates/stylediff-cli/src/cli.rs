use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stylediff",
    about = "Compute and replay incremental updates between map style documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the update commands turning one style into another
    Diff(DiffArgs),
    /// Apply a JSON command list to a style and print the result
    Apply(ApplyArgs),
    /// Diff two styles, replay the commands and report convergence
    Check(CheckArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    #[arg(required_unless_present = "initial")]
    pub before: Option<PathBuf>,
    #[arg(required_unless_present = "initial")]
    pub after: Option<PathBuf>,
    /// Diff against no previous style (first load)
    #[arg(long, value_name = "AFTER", conflicts_with_all = ["before", "after"])]
    pub initial: Option<PathBuf>,
    /// TOML file with differ settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub style: PathBuf,
    pub commands: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["stylediff", "diff", "a.json", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.before, Some("a.json".into()));
            assert_eq!(args.after, Some("b.json".into()));
            assert!(args.initial.is_none());
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_diff_initial() {
        let cli = Cli::try_parse_from(["stylediff", "diff", "--initial", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.initial, Some("b.json".into()));
            assert!(args.before.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn diff_needs_both_documents() {
        assert!(Cli::try_parse_from(["stylediff", "diff", "a.json"]).is_err());
        let both = ["stylediff", "diff", "a.json", "b.json", "--initial", "c.json"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn parse_diff_with_config_and_json() {
        let cli = Cli::try_parse_from([
            "stylediff", "diff", "a.json", "b.json", "--config", "diff.toml", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.config, Some("diff.toml".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_apply() {
        let cli =
            Cli::try_parse_from(["stylediff", "apply", "style.json", "commands.json"]).unwrap();
        assert!(matches!(cli.command, Command::Apply(_)));
    }

    #[test]
    fn parse_check_verbose() {
        let cli = Cli::try_parse_from(["stylediff", "-v", "check", "a.json", "b.json"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Check(_)));
    }
}
