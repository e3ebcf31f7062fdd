//! Builds forests from indented text outlines.
//!
//! One node per line, nested by leading spaces:
//!
//! ```text
//! # comment
//! 1
//!   3
//!     7
//!   2
//! 10
//! ```
//!
//! Column-0 lines are roots. Each further `indent_width` spaces is one level
//! deeper; skipping a level is an error. Blank lines and lines starting with
//! `#` are ignored.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Forest, NodeId};

pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Parses `text` into a forest of `T`.
#[instrument(level = "debug", skip(text))]
pub fn parse_outline<T>(text: &str, indent_width: usize) -> ApplicationResult<Forest<T>>
where
    T: FromStr,
    T::Err: Display,
{
    if indent_width == 0 {
        return Err(ApplicationError::Config {
            message: "indent width must be at least 1".into(),
        });
    }

    let mut forest = Forest::new();
    // ancestors[k] is the most recent node on level k
    let mut ancestors: Vec<NodeId> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim_start_matches(' ');
        if content.trim().is_empty() || content.starts_with('#') {
            continue;
        }
        if content.starts_with('\t') {
            return Err(ApplicationError::outline(line, "tab indentation is not supported"));
        }

        let indent = raw.len() - content.len();
        if indent % indent_width != 0 {
            return Err(ApplicationError::outline(
                line,
                format!("indentation of {} is not a multiple of {}", indent, indent_width),
            ));
        }
        let level = indent / indent_width;
        if level > ancestors.len() {
            return Err(ApplicationError::outline(
                line,
                format!(
                    "expected indentation of at most {} spaces",
                    ancestors.len() * indent_width
                ),
            ));
        }

        let token = content.trim_end();
        let value = token.parse::<T>().map_err(|e| {
            ApplicationError::outline(line, format!("invalid value {:?}: {}", token, e))
        })?;

        ancestors.truncate(level);
        let id = match ancestors.last() {
            None => forest.add_root(value),
            Some(&parent) => forest.node_mut(parent)?.add_child(value),
        };
        ancestors.push(id);
    }

    debug!(roots = forest.root_ids().len(), nodes = forest.len(), "parsed outline");
    Ok(forest)
}

/// Reads and parses an outline file.
#[instrument(level = "debug")]
pub fn load_outline<T>(path: &Path, indent_width: usize) -> ApplicationResult<Forest<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let text = std::fs::read_to_string(path).with_path_context("read outline", path)?;
    parse_outline(&text, indent_width)
}
