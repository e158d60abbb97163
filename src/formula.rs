//! Formula revisions and their loading.
//!
//! The `formula` module holds the constants of the points formula as an
//! immutable [`FormulaConfig`] value.  The engine never reads a
//! literal; it is always handed a configuration, so that a later year's
//! revision (a new reference value, a new average salary) can be
//! dropped in as a JSON file without touching the algorithm.

use crate::error::PensionError;
use crate::models::NonContributiveType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One band of the stability bonus: contributor ages `from_age..=to_age`
/// earn `rate` points per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityTier {
    pub from_age: i32,
    pub to_age: i32,
    pub rate: f64,
}

/// The three stability bands.  The last band is open-ended; its
/// `to_age` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityTiers {
    pub first: StabilityTier,
    pub second: StabilityTier,
    pub third: StabilityTier,
}

impl Default for StabilityTiers {
    fn default() -> Self {
        Self {
            first: StabilityTier {
                from_age: 26,
                to_age: 30,
                rate: 0.50,
            },
            second: StabilityTier {
                from_age: 31,
                to_age: 35,
                rate: 0.75,
            },
            third: StabilityTier {
                from_age: 36,
                to_age: 40,
                rate: 1.00,
            },
        }
    }
}

/// Points per year credited for each non-contributive type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonContributiveRates {
    pub military: f64,
    pub university: f64,
    pub child_care: f64,
    pub medical: f64,
}

impl Default for NonContributiveRates {
    fn default() -> Self {
        Self {
            military: 0.25,
            university: 0.25,
            child_care: 0.25,
            medical: 0.20,
        }
    }
}

impl NonContributiveRates {
    pub fn rate(&self, kind: NonContributiveType) -> f64 {
        match kind {
            NonContributiveType::Military => self.military,
            NonContributiveType::University => self.university,
            NonContributiveType::ChildCare => self.child_care,
            NonContributiveType::Medical => self.medical,
        }
    }
}

/// Constants of one revision of the points formula.
///
/// Every field defaults to the 2024 revision, so a JSON revision file
/// only needs to list what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormulaConfig {
    /// Identifier of the revision, e.g. `"2024"`.
    pub revision: String,
    /// Value of one point in Lei (VPR).
    pub reference_value: f64,
    /// National average gross salary that a salary is compared with.
    pub average_gross_salary: f64,
    /// Below this many contributive years no pension is granted.
    pub minimum_contribution_years: f64,
    /// A complete career.
    pub complete_contribution_years: f64,
    pub retirement_age: i32,
    pub stability_tiers: StabilityTiers,
    pub non_contributive_rates: NonContributiveRates,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            revision: "2024".to_string(),
            reference_value: 81.03,
            average_gross_salary: 6789.0,
            minimum_contribution_years: 15.0,
            complete_contribution_years: 35.0,
            retirement_age: 65,
            stability_tiers: StabilityTiers::default(),
            non_contributive_rates: NonContributiveRates::default(),
        }
    }
}

impl FormulaConfig {
    /// Checks that the constants describe a usable formula.
    pub fn validate(&self) -> Result<(), PensionError> {
        let invalid = |msg: String| -> Result<(), PensionError> {
            Err(PensionError::InvalidFormula(msg))
        };
        if !(self.reference_value.is_finite() && self.reference_value > 0.0) {
            return invalid(format!(
                "revision {}: reference value must be positive, got {}",
                self.revision, self.reference_value
            ));
        }
        if !(self.average_gross_salary.is_finite() && self.average_gross_salary > 0.0) {
            return invalid(format!(
                "revision {}: average gross salary must be positive, got {}",
                self.revision, self.average_gross_salary
            ));
        }
        if self.minimum_contribution_years < 0.0
            || self.minimum_contribution_years > self.complete_contribution_years
        {
            return invalid(format!(
                "revision {}: minimum contribution years ({}) must lie between 0 \
                 and the complete contribution years ({})",
                self.revision, self.minimum_contribution_years, self.complete_contribution_years
            ));
        }
        let tiers = &self.stability_tiers;
        let ascending = tiers.first.from_age <= tiers.first.to_age
            && tiers.first.to_age < tiers.second.from_age
            && tiers.second.from_age <= tiers.second.to_age
            && tiers.second.to_age < tiers.third.from_age;
        if !ascending {
            return invalid(format!(
                "revision {}: stability tier ages must be ascending and non-overlapping",
                self.revision
            ));
        }
        let rates = &self.non_contributive_rates;
        if [rates.military, rates.university, rates.child_care, rates.medical]
            .iter()
            .any(|r| !r.is_finite() || *r < 0.0)
        {
            return invalid(format!(
                "revision {}: non-contributive rates must be non-negative",
                self.revision
            ));
        }
        Ok(())
    }
}

/// Load and validate a single formula revision from a JSON file.
pub fn load_formula(path: &Path) -> Result<FormulaConfig, PensionError> {
    let data = std::fs::read_to_string(path).map_err(|source| PensionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let formula: FormulaConfig =
        serde_json::from_str(&data).map_err(|source| PensionError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    formula.validate()?;
    Ok(formula)
}

/// Load every formula revision from a directory.
///
/// Scans the directory for `.json` files and parses each one as a
/// [`FormulaConfig`].  Files that fail to parse or validate are logged
/// and skipped.  The result is sorted by revision; duplicate revisions
/// are kept in file order and the caller decides which one wins.
pub fn load_formulas_from_dir(path: &Path) -> Result<Vec<FormulaConfig>, PensionError> {
    let io_err = |source| PensionError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut formulas = Vec::new();
    if path.is_dir() {
        let mut entries = std::fs::read_dir(path)
            .map_err(io_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?;
        entries.sort_by_key(|entry| entry.path());
        for entry in entries {
            let file_path = entry.path();
            if !file_path.is_file() || file_path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            match load_formula(&file_path) {
                Ok(formula) => formulas.push(formula),
                Err(err) => {
                    tracing::warn!(
                        path = %file_path.display(),
                        error = %err,
                        "skipping formula revision"
                    );
                }
            }
        }
    }
    formulas.sort_by(|a, b| a.revision.cmp(&b.revision));
    Ok(formulas)
}

/// Pick a revision by identifier, or the latest one when `revision` is
/// `None`.
pub fn select_revision(
    formulas: Vec<FormulaConfig>,
    revision: Option<&str>,
) -> Result<FormulaConfig, PensionError> {
    match revision {
        Some(wanted) => formulas
            .into_iter()
            .find(|f| f.revision == wanted)
            .ok_or_else(|| PensionError::UnknownRevision(wanted.to_string())),
        None => formulas
            .into_iter()
            .last()
            .ok_or_else(|| PensionError::UnknownRevision("latest".to_string())),
    }
}
