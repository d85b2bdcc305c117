//! Layer 5: Scenarios (model-trajectory tables and their reconciliation
//! with observations).
//!
//! ## Purpose
//!
//! This layer holds the closed set of scenario pathways, the shared-index
//! scenario table, and the anchoring/adjustment operations that reconcile
//! raw model trajectories with the observed decadal record.
//!
//! ## Design notes
//!
//! * **Closed enum**: scenario identity is a variant, not a column-name
//!   string, so an unrecognized pathway is unrepresentable rather than a
//!   runtime surprise deep in downstream code.
//! * **Column isolation**: every operation treats scenario columns
//!   independently; a degenerate value in one column fails that column's
//!   computation without contaminating the others.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_traits::Float;

use crate::primitives::{ClimTraceError, TimeSeries};

pub mod adjust;
pub mod anchor;

pub use adjust::{adjust_to_observations, scenario_derivatives, AdjustedScenarios};
pub use anchor::anchor_to_observations;

// ============================================================================
// Scenario
// ============================================================================

/// The SSP pathways carried through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scenario {
    /// SSP1-1.9 (strong mitigation).
    Ssp119,
    /// SSP1-2.6.
    Ssp126,
    /// SSP2-4.5.
    Ssp245,
    /// SSP5-8.5 (high emissions).
    Ssp585,
}

impl Scenario {
    /// All pathways, in ascending forcing order.
    pub const ALL: [Scenario; 4] = [
        Scenario::Ssp119,
        Scenario::Ssp126,
        Scenario::Ssp245,
        Scenario::Ssp585,
    ];

    /// Canonical lowercase column name.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Ssp119 => "ssp119",
            Scenario::Ssp126 => "ssp126",
            Scenario::Ssp245 => "ssp245",
            Scenario::Ssp585 => "ssp585",
        }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ClimTraceError;

    /// Parse a canonical column name; unknown names are a configuration
    /// error, caught here rather than at use sites.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scen| scen.name() == s)
            .ok_or_else(|| ClimTraceError::InvalidInput(format!("unknown scenario name '{s}'")))
    }
}

// ============================================================================
// ScenarioTable
// ============================================================================

/// A set of scenario trajectories sharing one time index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioTable<T> {
    columns: BTreeMap<Scenario, TimeSeries<T>>,
}

impl<T: Float> Default for ScenarioTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ScenarioTable<T> {
    /// Create an empty table; the first inserted column fixes the index.
    pub fn new() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Build a table from `(scenario, series)` pairs.
    pub fn from_columns<I>(columns: I) -> Result<Self, ClimTraceError>
    where
        I: IntoIterator<Item = (Scenario, TimeSeries<T>)>,
    {
        let mut table = Self::new();
        for (scenario, series) in columns {
            table.insert(scenario, series)?;
        }
        Ok(table)
    }

    /// Insert a column, enforcing the shared-index invariant.
    pub fn insert(
        &mut self,
        scenario: Scenario,
        series: TimeSeries<T>,
    ) -> Result<(), ClimTraceError> {
        if let Some((start, end)) = self.range() {
            if series.start() != start || series.end() != end {
                return Err(ClimTraceError::MismatchedScenarioIndex {
                    scenario: scenario.name(),
                    expected: (start, end),
                    got: (series.start(), series.end()),
                });
            }
        }
        self.columns.insert(scenario, series);
        Ok(())
    }

    /// The shared index range, or `None` for an empty table.
    pub fn range(&self) -> Option<(i32, i32)> {
        self.columns
            .values()
            .next()
            .map(|s| (s.start(), s.end()))
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Borrow one scenario's trajectory.
    pub fn series(&self, scenario: Scenario) -> Result<&TimeSeries<T>, ClimTraceError> {
        self.columns.get(&scenario).ok_or_else(|| {
            ClimTraceError::InvalidInput(format!(
                "scenario '{scenario}' is not present in the table"
            ))
        })
    }

    /// Iterate over `(scenario, trajectory)` pairs in pathway order.
    pub fn iter(&self) -> impl Iterator<Item = (Scenario, &TimeSeries<T>)> {
        self.columns.iter().map(|(&s, series)| (s, series))
    }

    /// Apply `f` to every value of every column.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            columns: self
                .columns
                .iter()
                .map(|(&s, series)| (s, series.map(&f)))
                .collect(),
        }
    }

    /// Scale every column by a constant factor.
    ///
    /// This is how GSAT tracks become GMST tracks: divide by the fixed
    /// empirical ratio. The conversion is linear, so the same call converts
    /// derivative tables.
    pub fn scaled(&self, factor: T) -> Self {
        self.map(|v| v * factor)
    }
}
