//! Command line front end.
//!
//! Reads a JSON input document (one [`PensionInputs`] or an array of
//! them), picks a formula revision and prints the computed result as
//! JSON on stdout.  Log output goes to stderr.

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::engine::{compute_many, recompute};
use crate::error::PensionError;
use crate::formula::{load_formula, load_formulas_from_dir, select_revision, FormulaConfig};
use crate::models::{PensionInputs, PensionResult};
use crate::summary::PensionSummary;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "pension_engine", version, about = "Estimate a points-based state pension")]
pub struct Cli {
    /// JSON input document.  Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Formula revision file.  Takes precedence over --formula-dir.
    #[arg(long)]
    pub formula: Option<PathBuf>,

    /// Directory of formula revision files.
    #[arg(long, env = "PENSION_FORMULA_DIR")]
    pub formula_dir: Option<PathBuf>,

    /// Revision to pick from --formula-dir; the latest when omitted.
    #[arg(long)]
    pub revision: Option<String>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Print the status, per-period breakdown and grouped years too.
    #[arg(long)]
    pub summary: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// An input document holds one scenario or several.
#[derive(Debug, Clone)]
pub enum InputDocument {
    Batch(Vec<PensionInputs>),
    Single(PensionInputs),
}

impl InputDocument {
    /// Parse a document, choosing the shape from its first token so that
    /// errors point at the offending field instead of a failed guess.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        if data.trim_start().starts_with('[') {
            serde_json::from_str(data).map(InputDocument::Batch)
        } else {
            serde_json::from_str(data).map(InputDocument::Single)
        }
    }
}

/// Parse an input document from `path`, or from stdin when `path` is
/// `None`.
pub fn read_inputs(path: Option<&Path>) -> Result<InputDocument, PensionError> {
    let (label, data) = match path {
        Some(path) => {
            let data = std::fs::read_to_string(path).map_err(|source| PensionError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            (path.to_path_buf(), data)
        }
        None => {
            let label = PathBuf::from("<stdin>");
            let mut data = String::new();
            std::io::stdin()
                .read_to_string(&mut data)
                .map_err(|source| PensionError::Io {
                    path: label.clone(),
                    source,
                })?;
            (label, data)
        }
    };
    InputDocument::from_json(&data).map_err(|source| PensionError::Json { path: label, source })
}

/// Resolve the formula revision requested on the command line, falling
/// back to the built-in one.
pub fn resolve_formula(cli: &Cli) -> Result<FormulaConfig> {
    if let Some(path) = &cli.formula {
        return load_formula(path).with_context(|| format!("loading formula {}", path.display()));
    }
    if let Some(dir) = &cli.formula_dir {
        let formulas = load_formulas_from_dir(dir)
            .with_context(|| format!("loading formulas from {}", dir.display()))?;
        return Ok(select_revision(formulas, cli.revision.as_deref())?);
    }
    if let Some(revision) = &cli.revision {
        anyhow::bail!("--revision {revision} requires --formula-dir");
    }
    Ok(FormulaConfig::default())
}

fn render(
    inputs: &PensionInputs,
    result: PensionResult,
    formula: &FormulaConfig,
    summary: bool,
) -> Result<Value> {
    let value = if summary {
        serde_json::to_value(PensionSummary::build(
            &inputs.contribution_periods,
            result.details,
            formula,
        ))?
    } else {
        serde_json::to_value(result)?
    };
    Ok(value)
}

/// Run the command and return the JSON to print.
pub fn run(cli: &Cli) -> Result<Value> {
    let formula = resolve_formula(cli)?;
    let clock: Box<dyn Clock> = match cli.today {
        Some(today) => Box::new(FixedClock(today)),
        None => Box::new(SystemClock),
    };
    tracing::info!(revision = %formula.revision, today = %clock.today(), "evaluating");

    match read_inputs(cli.input.as_deref())? {
        InputDocument::Single(inputs) => {
            let result = recompute(&inputs, &formula, clock.as_ref());
            render(&inputs, result, &formula, cli.summary)
        }
        InputDocument::Batch(scenarios) => {
            let results = compute_many(&scenarios, &formula, clock.as_ref());
            let rendered = scenarios
                .iter()
                .zip(results)
                .map(|(inputs, result)| render(inputs, result, &formula, cli.summary))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(rendered))
        }
    }
}
