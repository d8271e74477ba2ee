use tracing::{debug, instrument};

use crate::arena::Tree;
use crate::builder::{Provision, TreeBuilder};
use crate::cli::args::{Cli, Commands, StorageArg};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::errors::TreeResult;
use crate::node::NodeId;
use crate::storage::{Dynamic, Static, StorageMode};
use crate::traverse::Order;
use crate::tree_traits::TreeNodeConvert;

/// Placeholder for a missing child in level-order input.
pub const HOLE: &str = "_";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    match cli.storage {
        StorageArg::Static => run::<Static>(cli.command.as_ref(), &settings),
        StorageArg::Dynamic => run::<Dynamic>(cli.command.as_ref(), &settings),
    }
}

#[instrument(skip(settings))]
fn run<M>(command: Option<&Commands>, settings: &Settings) -> CliResult<()>
where
    M: StorageMode,
    Tree<String, M>: Provision<String>,
{
    match command {
        Some(Commands::Show { values }) => _show::<M>(settings, values),
        Some(Commands::Walk { order, values }) => {
            _walk::<M>(settings, order.unwrap_or(settings.order), values)
        }
        Some(Commands::Depth { values }) => _depth::<M>(settings, values),
        Some(Commands::Config) => _config(settings),
        None => Ok(()),
    }
}

/// Maps command line words to level-order values, [`HOLE`] becomes `None`.
pub fn parse_values(values: &[String]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| if v == HOLE { None } else { Some(v.clone()) })
        .collect()
}

fn build<M>(settings: &Settings, values: &[String]) -> CliResult<(Tree<String, M>, Option<NodeId>)>
where
    M: StorageMode,
    Tree<String, M>: Provision<String>,
{
    if values.is_empty() {
        return Err(CliError::InvalidArgs("no values given".to_string()));
    }
    let builder = TreeBuilder::with_settings(settings.clone());
    let built = builder.build_from_level_order(parse_values(values))?;
    debug!("Built tree from {} values", values.len());
    Ok(built)
}

fn _show<M>(settings: &Settings, values: &[String]) -> CliResult<()>
where
    M: StorageMode,
    Tree<String, M>: Provision<String>,
{
    let (tree, root) = build::<M>(settings, values)?;
    print!("{}", tree.render(root, &settings.empty_label)?);
    Ok(())
}

fn _walk<M>(settings: &Settings, order: Order, values: &[String]) -> CliResult<()>
where
    M: StorageMode,
    Tree<String, M>: Provision<String>,
{
    let (tree, root) = build::<M>(settings, values)?;
    if root.is_none() {
        output::warning("empty tree, nothing to walk");
        return Ok(());
    }

    let mut line: Vec<String> = Vec::new();
    let mut visit = |line: &mut Vec<String>, value: Option<&String>| -> TreeResult<()> {
        line.push(value.cloned().unwrap_or_else(|| settings.empty_label.clone()));
        Ok(())
    };
    tree.walk(order, root, &mut line, Some(&mut visit))?;
    println!("{}", line.join(" "));
    Ok(())
}

fn _depth<M>(settings: &Settings, values: &[String]) -> CliResult<()>
where
    M: StorageMode,
    Tree<String, M>: Provision<String>,
{
    let (tree, root) = build::<M>(settings, values)?;
    println!("{}", tree.depth(root));
    Ok(())
}

fn _config(settings: &Settings) -> CliResult<()> {
    if let Some(path) = global_config_path() {
        output::action("global config", &path.display());
    }
    let capacity = settings
        .capacity
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unbounded".to_string());
    output::action("capacity", &capacity);
    output::action("max_depth", &settings.max_depth);
    output::action("order", &settings.order);
    output::action("empty_label", &settings.empty_label);
    Ok(())
}
