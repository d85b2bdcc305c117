//! Anchoring scenario trajectories to the observed record.
//!
//! For each scenario and a pivot year `p`: years at or after `p` are shifted
//! by the constant offset `observed[p] − scenario[p]`; years before `p` are
//! replaced with observed values outright. The anchored trajectory is
//! therefore continuous at `p` and exactly equal to the observation before
//! it.

use num_traits::Float;

use crate::primitives::{ClimTraceError, TimeSeries};
use crate::scenarios::ScenarioTable;

/// Anchor every scenario column to the observed series at `pivot`.
///
/// Years for which any column is undefined (typically leading years the
/// observed record does not reach) are trimmed from the result. A missing or
/// non-finite value at the pivot year, in either the observation or a
/// scenario column, is a fatal configuration error.
pub fn anchor_to_observations<T: Float>(
    obs: &TimeSeries<T>,
    scenarios: &ScenarioTable<T>,
    pivot: i32,
) -> Result<ScenarioTable<T>, ClimTraceError> {
    let obs_pivot = obs
        .get(pivot)
        .filter(|v| v.is_finite())
        .ok_or(ClimTraceError::MissingObservation { year: pivot })?;

    let mut anchored = ScenarioTable::new();
    for (scenario, series) in scenarios.iter() {
        let scen_pivot = series.get(pivot).filter(|v| v.is_finite()).ok_or(
            ClimTraceError::MissingScenarioValue {
                scenario: scenario.name(),
                year: pivot,
            },
        )?;
        let offset = obs_pivot - scen_pivot;

        let values = series
            .iter()
            .map(|(year, v)| {
                if year < pivot {
                    obs.at_or_nan(year)
                } else {
                    v + offset
                }
            })
            .collect();
        anchored.insert(scenario, TimeSeries::new(series.start(), values)?)?;
    }

    trim_undefined_rows(anchored)
}

/// Drop leading/trailing years where any column is undefined; an interior
/// gap cannot be trimmed away and is reported as a precondition violation.
fn trim_undefined_rows<T: Float>(
    table: ScenarioTable<T>,
) -> Result<ScenarioTable<T>, ClimTraceError> {
    let (start, end) = match table.range() {
        Some(range) => range,
        None => return Ok(table),
    };

    let defined: Vec<bool> = (start..=end)
        .map(|year| {
            table
                .iter()
                .all(|(_, series)| series.at_or_nan(year).is_finite())
        })
        .collect();

    let first = defined.iter().position(|&d| d);
    let last = defined.iter().rposition(|&d| d);
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(ClimTraceError::EmptySeries),
    };
    if defined[first..=last].iter().any(|&d| !d) {
        return Err(ClimTraceError::InvalidInput(
            "anchored scenario table has an interior undefined year".into(),
        ));
    }

    let lo = start + first as i32;
    let hi = start + last as i32;
    let mut trimmed = ScenarioTable::new();
    for (scenario, series) in table.iter() {
        trimmed.insert(scenario, series.restrict(lo, hi)?)?;
    }
    Ok(trimmed)
}
