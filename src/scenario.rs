//! Scenario files.
//!
//! The `scenario` module loads [`Scenario`]s from JSON on disk so that
//! the command line front end can estimate several outages at once.  A
//! file may hold one scenario object or an array of them; a directory is
//! scanned for `.json` files.

use crate::models::{Scenario, ScenarioSet};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioFile {
    Many(Vec<Scenario>),
    One(Scenario),
}

/// Parse the scenarios held in a single JSON file.
///
/// Scenarios without a name are named after the file stem.
pub fn load_scenario_file(path: &Path) -> Result<Vec<Scenario>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    let parsed: ScenarioFile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse scenario file {}", path.display()))?;
    let mut scenarios = match parsed {
        ScenarioFile::Many(scenarios) => scenarios,
        ScenarioFile::One(scenario) => vec![scenario],
    };
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        for scenario in scenarios.iter_mut().filter(|s| s.name.is_none()) {
            scenario.name = Some(stem.to_string());
        }
    }
    Ok(scenarios)
}

/// Load scenarios from a file or a directory.
///
/// Directory entries are read in path order.  A file inside a directory
/// that cannot be parsed is skipped with a warning; a file named
/// directly must parse.
pub fn load_scenarios(path: &Path) -> Result<ScenarioSet> {
    if !path.is_dir() {
        return Ok(ScenarioSet {
            scenarios: load_scenario_file(path)?,
        });
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("failed to read scenario directory {}", path.display()))?
    {
        let entry = entry?;
        let entry_path = entry.path();
        if entry.file_type()?.is_file() && entry_path.extension().is_some_and(|ext| ext == "json") {
            files.push(entry_path);
        }
    }
    files.sort();

    let mut scenarios = Vec::new();
    for file in files {
        match load_scenario_file(&file) {
            Ok(loaded) => scenarios.extend(loaded),
            Err(err) => {
                tracing::warn!(path = %file.display(), error = %format!("{err:#}"), "skipping scenario file");
            }
        }
    }
    Ok(ScenarioSet { scenarios })
}
