//! Catalog path resolution for CLI input
//!
//! Turns the positional path arguments into a list of catalog files,
//! expanding glob patterns and falling back to the conventional catalog
//! location when nothing is given.

use crate::constants::DEFAULT_CATALOG_PATH;
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// True if the argument contains glob metacharacters
fn is_pattern(argument: &str) -> bool {
    argument.contains(['*', '?', '['])
}

/// Resolve path arguments into catalog files
///
/// Plain paths are kept as given, even if they do not exist, so that a
/// missing catalog is reported when it is opened. A glob pattern must match
/// at least one file. Duplicates are dropped, first occurrence wins.
pub fn resolve_catalog_paths(arguments: &[String]) -> Result<Vec<PathBuf>> {
    if arguments.is_empty() {
        debug!("No catalog paths given, using {}", DEFAULT_CATALOG_PATH);
        return Ok(vec![PathBuf::from(DEFAULT_CATALOG_PATH)]);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for argument in arguments {
        if !is_pattern(argument) {
            push_unique(&mut paths, PathBuf::from(argument));
            continue;
        }

        let entries = glob::glob(argument).map_err(|e| {
            Error::configuration(format!("Invalid glob pattern '{}': {}", argument, e))
        })?;

        let mut matched: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        matched.sort();

        if matched.is_empty() {
            return Err(Error::configuration(format!(
                "No catalog files match pattern '{}'",
                argument
            )));
        }

        debug!("Pattern '{}' matched {} files", argument, matched.len());
        for path in matched {
            push_unique(&mut paths, path);
        }
    }

    Ok(paths)
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}
