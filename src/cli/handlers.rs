use anyhow::Result;
use colored::Colorize;
use log::{info, warn};
use std::io::Write;

use super::app::{Commands, MigrationsCommands, MigrationsSubcommands};
use super::prompts::confirm;
use crate::adapter::{v1, v2};
use crate::config::{Backend, Config};
use crate::contract::v1::{AsyncOption, AsyncOptions};
use crate::contract::v2::AsyncOptions as _;
use crate::store::SqliteStore;
use crate::value::OptionValue;

/// The collection the CLI works on
pub type CliOptions = v1::Options<String, OptionValue>;

/// Dispatch a parsed command against the configured store
pub async fn run(command: Commands, config: &Config) -> Result<()> {
    if let Commands::Migrations(migrations) = command {
        return migrations_command(migrations, config).await;
    }

    if let Commands::ResetAll { force: false } = command {
        if !confirm("Reset all options to their default values?", false)? {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    if let Some(warning) = persistence_warning(config) {
        warn!("{}", warning);
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    let options = CliOptions::with_store(config.open_store().await?);
    let mut stdout = std::io::stdout();
    execute(command, &options, &mut stdout).await
}

/// Run an option command, writing its report to `out`
///
/// `reset-all` runs without asking; confirmation happens in [`run`].
pub async fn execute(command: Commands, options: &CliOptions, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::List => {
            let all = options.options().await?;
            if all.is_empty() {
                writeln!(out, "No options found.")?;
                return Ok(());
            }

            for option in &all {
                let value = option.value().await?;
                let default = option.default().await?;
                let marker = if value == default { " " } else { "*" };
                writeln!(
                    out,
                    "{} {} = {} {}",
                    marker.yellow(),
                    option.name().bold(),
                    value,
                    format!("(default: {})", default).dimmed()
                )?;
            }
            writeln!(out, "\nTotal options: {}", all.len())?;
        }
        Commands::Get { name } => {
            let option = existing(options, &name).await?;
            writeln!(out, "{}", option.value().await?)?;
        }
        Commands::Default { name } => {
            let option = existing(options, &name).await?;
            writeln!(out, "{}", option.default().await?)?;
        }
        Commands::Create { name, default } => {
            let default = default.as_deref().map(OptionValue::parse_input);
            let option = options.option(name.clone(), default).await?;
            writeln!(out, "{} = {}", name, option.value().await?)?;
        }
        Commands::Set { name, value } => {
            info!("Setting {} to {}", name, value);
            let value = OptionValue::parse_input(&value);
            let option = options.option(name.clone(), Some(value.clone())).await?;
            let shown = value.to_string();
            option.update(move |_| value).await?;
            writeln!(out, "Set {} = {}", name, shown)?;
        }
        Commands::Reset { name } => {
            let option = existing(options, &name).await?;
            option.reset().await?;
            writeln!(out, "Reset {} to {}", name, option.default().await?)?;
        }
        Commands::ResetAll { .. } => {
            let all = options.options().await?;
            for option in &all {
                option.reset().await?;
            }
            writeln!(out, "Reset {} options to their default values", all.len())?;
        }
        Commands::Remove { name } => {
            existing(options, &name).await?;
            options.remove(&name).await?;
            writeln!(out, "Removed {}", name)?;
        }
        Commands::Add { name, value, default } => {
            let value = OptionValue::parse_input(&value);
            let default = match default {
                Some(default) => OptionValue::parse_input(&default),
                None => value.clone(),
            };
            let report = format!("Added {} = {} (default: {})", name, value, default);
            v2::Options::from(options).add(name, value, default).await?;
            writeln!(out, "{}", report)?;
        }
        Commands::Migrations(_) => {
            anyhow::bail!("Migrations are managed through `run`, not an option collection");
        }
    }

    Ok(())
}

/// Why changes made by this run will not be kept, if they won't
fn persistence_warning(config: &Config) -> Option<String> {
    if config.backend.is_persistent() {
        return None;
    }
    Some(format!(
        "the {} backend is discarded when options-cli exits, changes will not be saved",
        config.backend
    ))
}

/// Look up an option without creating it
async fn existing(
    options: &CliOptions,
    name: &str,
) -> Result<v1::OptionHandle<String, OptionValue>> {
    options
        .options()
        .await?
        .into_iter()
        .find(|option| option.name() == name)
        .ok_or_else(|| anyhow::anyhow!("Option '{}' not found", name))
}

async fn migrations_command(command: MigrationsCommands, config: &Config) -> Result<()> {
    if config.backend != Backend::Sqlite {
        anyhow::bail!(
            "Migrations only apply to the sqlite backend (configured: {})",
            config.backend
        );
    }

    let path = config.database_path()?;
    let pool = SqliteStore::connect(&path).await?;
    let store = SqliteStore::new(pool);
    let manager = store.migrations();

    match command.command {
        MigrationsSubcommands::Status => {
            let status = manager.status().await?;
            println!("Migration Status:");
            println!("  Current version: {:?}", status.current_version);
            println!("  Applied migrations: {}", status.applied.len());
            println!("  Pending migrations: {}", status.pending.len());
            println!("  Up to date: {}", status.is_up_to_date());

            for migration in &status.applied {
                println!(
                    "  {} {} {} ({})",
                    "✓".green(),
                    migration.version,
                    migration.name,
                    migration.applied_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
            for migration in &status.pending {
                println!("  {} {} {}", "○".yellow(), migration.version, migration.name);
            }
        }
        MigrationsSubcommands::Down { to } => {
            manager.migrate_down(to).await?;
            println!("Rolled back to version {}", to.unwrap_or(0));
        }
    }

    Ok(())
}
