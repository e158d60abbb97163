//! Pension computation engine.
//!
//! The `engine` module turns a set of contribution periods and a birth
//! date into a [`PensionResult`].  It runs the point accumulator,
//! gates the result on the minimum contributive years, adds the
//! stability bonus and prices the total with the reference value.
//! Every call is pure: the same inputs, formula and date always give
//! the same result.  Independent scenarios can be evaluated in
//! parallel with [`compute_many`], which uses [`rayon`].

use crate::clock::Clock;
use crate::formula::FormulaConfig;
use crate::models::{ContributionPeriod, PensionDetails, PensionInputs, PensionResult};
use crate::points::accumulate_points;
use crate::stability::stability_points;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;

/// Age in whole years on `today`, one less when the birthday has not
/// come yet this year.
pub fn current_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Round a currency amount to two decimals.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Message shown when the contributor is short of the minimum
/// contributive years.
pub fn insufficient_years_message(total_contributive_years: f64, minimum: f64) -> String {
    let needed = (minimum - total_contributive_years).ceil().max(0.0);
    format!(
        "You need {} more years to reach the minimum contribution period of {} years",
        needed, minimum
    )
}

/// Computes the pension for a list of periods and a birth date.
///
/// When the contributive years fall short of the formula's minimum the
/// result carries a zero pension, zero points and an error message;
/// the contributive years and ages are still reported so the caller
/// can show progress.
pub fn compute_pension(
    periods: &[ContributionPeriod],
    birth_date: NaiveDate,
    formula: &FormulaConfig,
    today: NaiveDate,
) -> PensionResult {
    let current_age = current_age(birth_date, today);
    let years_until_retirement = formula.retirement_age - current_age;

    let totals = accumulate_points(periods, formula);

    if totals.total_contributive_years < formula.minimum_contribution_years {
        let error = insufficient_years_message(
            totals.total_contributive_years,
            formula.minimum_contribution_years,
        );
        tracing::debug!(
            contributive_years = totals.total_contributive_years,
            minimum = formula.minimum_contribution_years,
            "below minimum contributive years"
        );
        return PensionResult {
            monthly_pension: 0.0,
            details: PensionDetails {
                total_contributive_years: totals.total_contributive_years,
                total_contributive_days: totals.total_contributive_days,
                current_age,
                years_until_retirement,
                error: Some(error),
                ..PensionDetails::default()
            },
        };
    }

    let stability_points = stability_points(periods, birth_date, formula);
    let total_points =
        totals.contribution_points + stability_points + totals.non_contributive_points;
    let monthly_pension = round_currency(total_points * formula.reference_value);
    let yearly_pension = round_currency(monthly_pension * 12.0);

    tracing::debug!(
        revision = %formula.revision,
        contribution_points = totals.contribution_points,
        stability_points,
        non_contributive_points = totals.non_contributive_points,
        monthly_pension,
        "pension computed"
    );

    PensionResult {
        monthly_pension,
        details: PensionDetails {
            contribution_points: totals.contribution_points,
            stability_points,
            non_contributive_points: totals.non_contributive_points,
            total_points,
            total_contributive_years: totals.total_contributive_years,
            total_contributive_days: totals.total_contributive_days,
            monthly_pension,
            yearly_pension,
            current_age,
            years_until_retirement,
            error: None,
        },
    }
}

/// Recompute the pension for the current state of a form.  This is the
/// call site presentation layers invoke whenever the inputs change.
pub fn recompute(
    inputs: &PensionInputs,
    formula: &FormulaConfig,
    clock: &dyn Clock,
) -> PensionResult {
    compute_pension(
        &inputs.contribution_periods,
        inputs.birth_date,
        formula,
        clock.today(),
    )
}

/// Evaluate independent scenarios in parallel.  Results are returned
/// in input order and all share the same "today".
pub fn compute_many(
    scenarios: &[PensionInputs],
    formula: &FormulaConfig,
    clock: &dyn Clock,
) -> Vec<PensionResult> {
    let today = clock.today();
    scenarios
        .par_iter()
        .map(|inputs| {
            compute_pension(&inputs.contribution_periods, inputs.birth_date, formula, today)
        })
        .collect()
}
