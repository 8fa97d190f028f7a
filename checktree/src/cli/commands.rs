use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::Checklist;
use crate::cli::args::{Cli, Commands, ConfigCommands, SelectionArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::Expansion;
use crate::infrastructure::{load_checklist, JsonFileSource, StaticSource};
use crate::tree_traits::{row_label, TreeRender};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.no_color {
        settings.color = false;
    }

    match &cli.command {
        Some(Commands::Tree { selection }) => _tree(&settings, selection),
        Some(Commands::Selected { selection }) => _selected(&settings, selection),
        Some(Commands::Flat {
            selection,
            collapse,
        }) => _flat(&settings, selection, collapse),
        Some(Commands::Insert {
            document,
            parent,
            name,
            json,
        }) => _insert(&settings, document.as_deref(), parent, name, *json),
        Some(Commands::Rename {
            document,
            id,
            name,
            json,
        }) => _rename(&settings, document.as_deref(), id, name, *json),
        Some(Commands::Config { command }) => _config(&settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Load the document given on the command line, the configured one, or the sample.
pub fn open_checklist(settings: &Settings, document: Option<&Path>) -> CliResult<Checklist> {
    let checklist = match document.map(Path::to_path_buf).or_else(|| settings.document.clone()) {
        Some(path) => load_checklist(&JsonFileSource::new(path))?,
        None => load_checklist(&StaticSource::sample())?,
    };
    Ok(checklist)
}

fn open_with_toggles(settings: &Settings, selection: &SelectionArgs) -> CliResult<Checklist> {
    let mut checklist = open_checklist(settings, selection.document.as_deref())?;
    for id in &selection.toggles {
        checklist.toggle(id)?;
    }
    debug!(toggles = selection.toggles.len(), selected = checklist.selection().len());
    Ok(checklist)
}

fn print_tree(settings: &Settings, checklist: &Checklist) {
    for tree in checklist.to_tree_strings(settings) {
        output::info(&tree);
    }
}

#[instrument(skip(settings))]
fn _tree(settings: &Settings, selection: &SelectionArgs) -> CliResult<()> {
    let checklist = open_with_toggles(settings, selection)?;
    print_tree(settings, &checklist);
    Ok(())
}

#[instrument(skip(settings))]
fn _selected(settings: &Settings, selection: &SelectionArgs) -> CliResult<()> {
    let checklist = open_with_toggles(settings, selection)?;
    for id in checklist.selected_ids() {
        output::info(&id);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _flat(settings: &Settings, selection: &SelectionArgs, collapse: &[String]) -> CliResult<()> {
    let checklist = open_with_toggles(settings, selection)?;

    let not_folders = collapse
        .iter()
        .filter(|id| {
            !checklist
                .tree()
                .node(id)
                .map(|node| node.data.kind.is_folder())
                .unwrap_or(false)
        })
        .join(", ");
    if !not_folders.is_empty() {
        return Err(CliError::InvalidArgs(format!(
            "--collapse expects folder ids: {}",
            not_folders
        )));
    }

    let expansion = Expansion::collapsing(checklist.tree(), collapse);
    for row in checklist.rows(&expansion) {
        output::info(&format!(
            "{}{}",
            "  ".repeat(row.depth),
            row_label(settings, row.state, &row.label, &row.id)
        ));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _insert(
    settings: &Settings,
    document: Option<&Path>,
    parent: &str,
    name: &str,
    json: bool,
) -> CliResult<()> {
    let mut checklist = open_checklist(settings, document)?;
    let id = checklist.insert_item(parent, name)?;
    print_result(settings, &checklist, json)?;
    output::success(&format!("inserted {} under {}", id, parent));
    Ok(())
}

#[instrument(skip(settings))]
fn _rename(
    settings: &Settings,
    document: Option<&Path>,
    id: &str,
    name: &str,
    json: bool,
) -> CliResult<()> {
    let mut checklist = open_checklist(settings, document)?;
    checklist.update_item(id, name)?;
    print_result(settings, &checklist, json)?;
    output::success(&format!("renamed {}", id));
    Ok(())
}

fn print_result(settings: &Settings, checklist: &Checklist, json: bool) -> CliResult<()> {
    if json {
        output::info(&serde_json::to_string_pretty(&checklist.snapshot().nodes)?);
    } else {
        print_tree(settings, checklist);
    }
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::InvalidArgs(
                    "no config directory on this platform".into(),
                ))
            }
        },
    }
    Ok(())
}
