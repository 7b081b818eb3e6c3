use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::{json, Value};
use stylediff_diff::{DiffConfig, StyleDiffer};
use stylediff_replay::ReplayEngine;
use stylediff_types::{Command as StyleCommand, Operation};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, format),
        Command::Apply(args) => cmd_apply(args, format),
        Command::Check(args) => cmd_check(args, format),
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let differ = StyleDiffer::new(load_config(args.config.as_deref())?);
    let (before, after) = match (args.initial, args.before, args.after) {
        (Some(after), _, _) => (None, read_json(&after)?),
        (None, Some(before), Some(after)) => (Some(read_json(&before)?), read_json(&after)?),
        _ => bail!("diff needs <BEFORE> <AFTER>, or --initial <AFTER>"),
    };

    let commands = differ.diff(before.as_ref(), &after);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&commands)?),
        OutputFormat::Text => print_commands(&commands, before.is_some()),
    }
    Ok(())
}

fn cmd_apply(args: ApplyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let style = read_json(&args.style)?;
    let commands: Vec<StyleCommand> = serde_json::from_value(read_json(&args.commands)?)
        .with_context(|| format!("decoding commands in {}", args.commands.display()))?;

    let result = ReplayEngine::apply(style, &commands)?;
    if format == OutputFormat::Text {
        eprintln!("{} Applied {} commands", "✓".green().bold(), commands.len());
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let differ = StyleDiffer::new(load_config(args.config.as_deref())?);
    let before = read_json(&args.before)?;
    let after = read_json(&args.after)?;

    let commands = differ.diff(Some(&before), &after);
    let outcome = ReplayEngine::verify(&before, &after, &commands)?;
    let full_replace = is_full_replace(&commands);

    match format {
        OutputFormat::Json => {
            let mut report = serde_json::to_value(&outcome)?;
            report["full_replace"] = json!(full_replace);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if outcome.converged {
                println!(
                    "{} Replay converged after {} commands",
                    "✓".green().bold(),
                    outcome.applied.to_string().bold()
                );
            } else {
                println!("{} Replay diverged from the target style", "✗".red().bold());
            }
            if full_replace {
                println!("  {}", "incremental diff unavailable; fell back to setStyle".yellow());
            }
        }
    }

    if !outcome.converged {
        bail!("replaying {} commands did not reproduce {}", outcome.applied, args.after.display());
    }
    Ok(())
}

fn print_commands(commands: &[StyleCommand], had_before: bool) {
    if commands.is_empty() {
        println!("No changes.");
        return;
    }
    for command in commands {
        let args = Value::Array(command.args());
        println!("  {} {}", command.operation().as_str().cyan().bold(), args.to_string().dimmed());
    }
    if had_before && is_full_replace(commands) {
        println!("{}", "Full style replace.".yellow());
    } else {
        println!("{} {} commands", "✓".green().bold(), commands.len());
    }
}

fn is_full_replace(commands: &[StyleCommand]) -> bool {
    matches!(commands, [only] if only.operation() == Operation::SetStyle)
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Differ settings from a TOML file, or the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DiffConfig> {
    let Some(path) = path else {
        return Ok(DiffConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: DiffConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    debug!(
        path = %path.display(),
        geojson_data_updates = config.geojson_data_updates,
        "loaded diff config"
    );
    Ok(config)
}
