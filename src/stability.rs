//! Stability bonus.
//!
//! Long careers earn extra points once the contributor has passed the
//! minimum contributive years.  The bonus of a period is apportioned
//! across three age bands using the contributor's age in the calendar
//! year the period starts and the year it ends; month and day are
//! ignored.  This is a per-period approximation, not a day-by-day
//! accrual.

use crate::formula::{FormulaConfig, StabilityTiers};
use crate::models::ContributionPeriod;
use crate::points::{duration_years, is_dated_contributive};
use chrono::{Datelike, NaiveDate};

/// Years of one period falling into each age band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandYears {
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

impl BandYears {
    pub fn points(&self, tiers: &StabilityTiers) -> f64 {
        self.first * tiers.first.rate
            + self.second * tiers.second.rate
            + self.third * tiers.third.rate
    }
}

/// Age difference in calendar years only.
fn calendar_age(birth_date: NaiveDate, at: NaiveDate) -> i32 {
    at.year() - birth_date.year()
}

/// Distribute `years` of a period between `start_age` and `end_age`
/// over the stability bands.  Periods starting before the year
/// preceding the first band get nothing.  Every band is floored at
/// zero.
pub fn band_years(
    start_age: i32,
    end_age: i32,
    years: f64,
    tiers: &StabilityTiers,
) -> BandYears {
    let mut bands = BandYears::default();
    if start_age < tiers.first.from_age - 1 {
        return bands;
    }

    bands.first = years.min(f64::from(tiers.first.to_age - start_age)).max(0.0);

    let second = &tiers.second;
    if start_age < second.to_age && end_age >= second.from_age {
        let span = second.to_age.min(end_age) - second.from_age.max(start_age);
        bands.second = years.min(f64::from(span)).max(0.0);
    }

    let third = &tiers.third;
    if end_age >= third.from_age {
        bands.third = f64::from(end_age - third.from_age.max(start_age)).max(0.0);
    }

    bands
}

/// Stability points earned by the contributive periods.
///
/// Periods are walked in start-date order while the contributive
/// years are summed; a period only earns a bonus once that running sum,
/// including the period itself, exceeds the minimum contributive
/// years.  Unpaid contributive periods still advance the running sum;
/// non-contributive and undated periods are ignored.
pub fn stability_points(
    periods: &[ContributionPeriod],
    birth_date: NaiveDate,
    formula: &FormulaConfig,
) -> f64 {
    let mut dated: Vec<(NaiveDate, NaiveDate, f64)> = periods
        .iter()
        .filter(|p| is_dated_contributive(p))
        .filter_map(|p| {
            let years = duration_years(p.from_date, p.to_date)?;
            Some((p.from_date?, p.to_date?, years))
        })
        .collect();
    dated.sort_by_key(|(from, _, _)| *from);

    let tiers = &formula.stability_tiers;
    let mut cumulative_years = 0.0;
    let mut total = 0.0;
    for (from, to, years) in dated {
        cumulative_years += years;
        if cumulative_years <= formula.minimum_contribution_years {
            continue;
        }
        let start_age = calendar_age(birth_date, from);
        let end_age = calendar_age(birth_date, to);
        let bands = band_years(start_age, end_age, years, tiers);
        tracing::trace!(%from, %to, start_age, end_age, ?bands, "stability bands");
        total += bands.points(tiers);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NonContributiveType;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn born_1990() -> NaiveDate {
        date(1990, 1, 1)
    }

    #[test]
    fn test_band_years_across_all_bands() {
        let tiers = StabilityTiers::default();
        let bands = band_years(25, 55, 30.0, &tiers);
        assert_eq!(
            bands,
            BandYears {
                first: 5.0,
                second: 4.0,
                third: 19.0
            }
        );
        assert_eq!(bands.points(&tiers), 2.5 + 3.0 + 19.0);
    }

    #[test]
    fn test_band_years_below_eligible_age() {
        let tiers = StabilityTiers::default();
        assert_eq!(band_years(24, 60, 36.0, &tiers), BandYears::default());
    }

    #[test]
    fn test_band_years_are_floored() {
        let tiers = StabilityTiers::default();
        // Entirely in the open-ended band.
        let bands = band_years(40, 45, 5.0, &tiers);
        assert_eq!(bands.first, 0.0);
        assert_eq!(bands.second, 0.0);
        assert_eq!(bands.third, 5.0);

        // Short period inside the second band.
        let bands = band_years(32, 33, 1.0, &tiers);
        assert_eq!(bands.first, 0.0);
        assert_eq!(bands.second, 1.0);
        assert_eq!(bands.third, 0.0);
    }

    #[test]
    fn test_band_years_second_band_edges() {
        let tiers = StabilityTiers::default();
        // Starting at the last age of the second band skips it.
        let bands = band_years(35, 40, 5.0, &tiers);
        assert_eq!(
            bands,
            BandYears {
                first: 0.0,
                second: 0.0,
                third: 4.0
            }
        );

        // A period shorter than the band span keeps its own duration.
        let bands = band_years(31, 35, 1.5, &tiers);
        assert_eq!(bands.first, 0.0);
        assert_eq!(bands.second, 1.5);
        assert_eq!(bands.third, 0.0);

        // Ending exactly at the first age of the second band.
        let bands = band_years(28, 31, 3.0, &tiers);
        assert_eq!(bands.first, 2.0);
        assert_eq!(bands.second, 0.0);
    }

    #[test]
    fn test_unpaid_period_advances_running_sum() {
        let formula = FormulaConfig::default();
        let paid =
            ContributionPeriod::contributive("Late", date(2030, 1, 1), date(2035, 1, 1), 6789.0);
        assert_eq!(stability_points(&[paid.clone()], born_1990(), &formula), 0.0);

        let unpaid = ContributionPeriod {
            kind: crate::models::PeriodKind::Contributive {
                company: "Unpaid".into(),
                monthly_gross_salary: None,
                working_condition: Default::default(),
            },
            ..ContributionPeriod::contributive("", date(2010, 1, 1), date(2026, 1, 1), 0.0)
        };
        // The unpaid years fill the minimum; the paid period then earns
        // five years in the open-ended band.
        assert_eq!(stability_points(&[paid, unpaid], born_1990(), &formula), 5.0);
    }

    #[test]
    fn test_long_career_earns_stability() {
        let formula = FormulaConfig::default();
        let periods = vec![ContributionPeriod::contributive(
            "Acme",
            date(2015, 1, 1),
            date(2045, 1, 1),
            6789.0,
        )];
        let points = stability_points(&periods, born_1990(), &formula);
        assert!((points - 24.5).abs() < 1e-9);
    }

    #[test]
    fn test_short_career_earns_nothing() {
        let formula = FormulaConfig::default();
        let periods = vec![ContributionPeriod::contributive(
            "Acme",
            date(2015, 1, 1),
            date(2020, 1, 1),
            6789.0,
        )];
        assert_eq!(stability_points(&periods, born_1990(), &formula), 0.0);
    }

    #[test]
    fn test_career_starting_young_earns_nothing_from_that_period() {
        let formula = FormulaConfig::default();
        let periods = vec![ContributionPeriod::contributive(
            "Acme",
            date(2010, 1, 1),
            date(2030, 1, 1),
            6789.0,
        )];
        assert_eq!(stability_points(&periods, born_1990(), &formula), 0.0);
    }

    #[test]
    fn test_periods_before_threshold_are_skipped_in_date_order() {
        let formula = FormulaConfig::default();
        // Listed out of order; the early period fills the minimum years.
        let periods = vec![
            ContributionPeriod::contributive("Late", date(2030, 1, 1), date(2035, 1, 1), 6789.0),
            ContributionPeriod::contributive("Early", date(2010, 1, 1), date(2026, 1, 1), 6789.0),
        ];
        // Late: ages 40..45, five years in the open-ended band.
        let years = 1826.0 / crate::points::DAYS_PER_YEAR;
        let tiers = &formula.stability_tiers;
        let expected = band_years(40, 45, years, tiers).points(tiers);
        let points = stability_points(&periods, born_1990(), &formula);
        assert!((points - expected).abs() < 1e-9);
        assert_eq!(expected, 5.0);
    }

    #[test]
    fn test_non_contributive_periods_never_earn_stability() {
        let formula = FormulaConfig::default();
        let periods = vec![ContributionPeriod::non_contributive(
            NonContributiveType::ChildCare,
            date(2015, 1, 1),
            date(2045, 1, 1),
        )];
        assert_eq!(stability_points(&periods, born_1990(), &formula), 0.0);
    }
}
