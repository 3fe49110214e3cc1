//! Command dispatch: maps parsed arguments onto the forum admin service

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{to_tree, ForumChanges, ForumId, ForumRow, NewForum, ParentChoice};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the parsed command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => {
            let settings = load_settings(cli)?;
            cmd_config(command, &settings, cli)
        }
        Some(command) => {
            let settings = load_settings(cli)?;
            let container = ServiceContainer::new(settings)?;
            let result = dispatch(command, &container);
            // notices queued before a failure are still worth showing
            for notice in container.messages.drain() {
                output::success(&notice);
            }
            result
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

/// Settings from config layers, with `--store` taking precedence.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(store) = &cli.store {
        settings.store_path = store.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn dispatch(command: &Commands, container: &ServiceContainer) -> CliResult<()> {
    let admin = container.forum_admin();
    match command {
        Commands::List => cmd_list(container),
        Commands::Tree => cmd_tree(container),
        Commands::New {
            name,
            parent,
            description,
        } => {
            admin.create(NewForum {
                name: name.clone(),
                description: description.clone(),
                parent: parent.map(ForumId),
            })?;
            Ok(())
        }
        Commands::Edit {
            id,
            name,
            description,
            parent,
            top_level,
        } => {
            let new_parent = match (parent, top_level) {
                (Some(pid), _) => Some(ParentChoice::Forum(ForumId(*pid))),
                (None, true) => Some(ParentChoice::TopLevel),
                (None, false) => None,
            };
            admin.edit(
                ForumId(*id),
                ForumChanges {
                    name: name.clone(),
                    description: description.clone(),
                    new_parent,
                },
            )?;
            Ok(())
        }
        Commands::Delete { id } => {
            admin.delete(ForumId(*id))?;
            Ok(())
        }
        Commands::MoveUp { id } => {
            if !admin.move_up(ForumId(*id))?.is_moved() {
                output::info(&"Forum is already first among its siblings.".dimmed());
            }
            Ok(())
        }
        Commands::MoveDown { id } => {
            if !admin.move_down(ForumId(*id))?.is_moved() {
                output::info(&"Forum is already last among its siblings.".dimmed());
            }
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::InvalidArgs(
            "command does not operate on the forum store".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn cmd_list(container: &ServiceContainer) -> CliResult<()> {
    let rows = container.forum_admin().list()?;
    if rows.is_empty() {
        output::info(&"No forums.".dimmed());
        return Ok(());
    }
    for row in &rows {
        output::info(&format_row(row, &container.settings.indent));
    }
    Ok(())
}

/// One listing line: indentation, id, name and the available move hints.
pub fn format_row(row: &ForumRow, indent: &str) -> String {
    let pad = indent.repeat(row.level_range.len());
    let mut hints = Vec::new();
    if row.can_move_up() {
        hints.push("↑");
    }
    if row.can_move_down() {
        hints.push("↓");
    }
    let mut line = format!("{}{:>4}  {}", pad, row.forum.id.to_string(), row.forum.name);
    if !hints.is_empty() {
        line.push_str(&format!("  {}", hints.join(" ")));
    }
    line
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer) -> CliResult<()> {
    let forums = container.forum_admin().forums()?;
    output::info(&to_tree("Forums", &forums));
    Ok(())
}

fn cmd_config(command: &ConfigCommands, settings: &Settings, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective configuration");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::action("Global", &format!("{}{}", path.display(), state));
                }
                None => output::warning("no global config directory on this platform"),
            }
            if let Some(path) = &cli.config {
                output::action("File", &path.display());
            }
            output::action("Store", &settings.store_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Forum, TreeId};

    fn row(level: u32, first: bool, last: bool) -> ForumRow {
        ForumRow {
            forum: Forum {
                id: ForumId(7),
                parent_id: None,
                tree_id: TreeId(1),
                level,
                name: "News".to_string(),
                description: String::new(),
            },
            level_range: 0..level - 1,
            first,
            last,
        }
    }

    #[test]
    fn given_nested_row_when_formatting_then_indents_per_level() {
        let line = format_row(&row(3, true, true), "..");
        assert!(line.starts_with("....   7  News"), "got {line:?}");
        assert!(!line.contains('↑'));
        assert!(!line.contains('↓'));
    }

    #[test]
    fn given_middle_row_when_formatting_then_shows_both_hints() {
        let line = format_row(&row(1, false, false), "  ");
        assert!(line.ends_with("↑ ↓"), "got {line:?}");
    }
}
