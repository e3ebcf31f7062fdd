use std::fmt::Display;
use std::io;
use std::path::Path;
use std::str::FromStr;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::load_outline;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{Forest, Translation, TraversalOrder};

/// Runs `$f` with integer payloads, or with text payloads when `$text` is set.
macro_rules! with_payload {
    ($text:expr, $f:ident($($arg:expr),* $(,)?)) => {
        if $text {
            $f::<String>($($arg),*)
        } else {
            $f::<i64>($($arg),*)
        }
    };
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir().ok();
    let mut settings = Settings::load(cwd.as_deref())?;
    if let Some(indent) = cli.indent {
        if indent == 0 {
            return Err(CliError::Usage("--indent must be at least 1".into()));
        }
        settings.indent_width = indent;
    }
    if !settings.color {
        colored::control::set_override(false);
    }
    debug!(?settings, "effective settings");

    match &cli.command {
        Some(Commands::Path {
            file,
            order,
            translate,
            lines,
            per_root,
        }) => {
            let order = order.unwrap_or(settings.default_order);
            with_payload!(
                cli.text,
                _path(file, order, *translate, *lines, *per_root, &settings)
            )
        }
        Some(Commands::Translate { file, translation }) => {
            with_payload!(cli.text, _translate(file, *translation, &settings))
        }
        Some(Commands::Show { file }) => with_payload!(cli.text, _show(file, &settings)),
        Some(Commands::Stats { file }) => with_payload!(cli.text, _stats(file, &settings)),
        Some(Commands::Config { template }) => _config(*template, &settings),
        Some(Commands::Completion { shell }) => {
            _completion(*shell);
            Ok(())
        }
        None => Ok(()),
    }
}

fn load<T>(file: &Path, settings: &Settings) -> CliResult<Forest<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let forest = load_outline(file, settings.indent_width)?;
    debug!(file = %file.display(), nodes = forest.len(), "loaded outline");
    Ok(forest)
}

#[instrument(skip(settings))]
fn _path<T>(
    file: &Path,
    order: TraversalOrder,
    translation: Option<Translation>,
    lines: bool,
    per_root: bool,
    settings: &Settings,
) -> CliResult<()>
where
    T: FromStr + Ord + Display,
    T::Err: Display,
{
    let mut forest = load::<T>(file, settings)?;
    if let Some(translation) = translation {
        forest.translate(translation);
    }

    if per_root {
        for path in forest.paths_by_root::<&T>(order) {
            output::info(&path.iter().join(" "));
        }
        return Ok(());
    }

    let path: Vec<&T> = forest.path(order);
    if lines {
        for value in path {
            output::info(value);
        }
    } else {
        output::info(&path.iter().join(" "));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _translate<T>(file: &Path, translation: Translation, settings: &Settings) -> CliResult<()>
where
    T: FromStr + Ord + Display,
    T::Err: Display,
{
    let mut forest = load::<T>(file, settings)?;
    forest.translate(translation);
    output::info(&forest);
    Ok(())
}

#[instrument(skip(settings))]
fn _show<T>(file: &Path, settings: &Settings) -> CliResult<()>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let forest = load::<T>(file, settings)?;
    output::header(&format!("{} ({} roots)", file.display(), forest.root_ids().len()));
    output::info(&forest);
    Ok(())
}

#[instrument(skip(settings))]
fn _stats<T>(file: &Path, settings: &Settings) -> CliResult<()>
where
    T: FromStr,
    T::Err: Display,
{
    let forest = load::<T>(file, settings)?;
    output::field("roots", &forest.root_ids().len());
    output::field("nodes", &forest.len());
    output::field("leaves", &forest.leaves().len());
    output::field("depth", &forest.depth());
    Ok(())
}

#[instrument(skip(settings))]
fn _config(template: bool, settings: &Settings) -> CliResult<()> {
    if template {
        output::info(&Settings::template());
    } else {
        output::info(&settings.to_toml()?);
    }
    Ok(())
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
