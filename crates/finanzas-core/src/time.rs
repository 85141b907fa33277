//! Month iteration and the month selection the reporting views work on

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::UserFinancialState;
use crate::types::MonthKey;

/// Parse the valid keys of a record map, ascending
fn valid_keys<'a, I>(keys: I) -> BTreeSet<MonthKey>
where
    I: Iterator<Item = &'a String>,
{
    keys.filter_map(|key| match key.parse::<MonthKey>() {
        Ok(mes) => Some(mes),
        Err(_) => {
            log::warn!("Ignoring record stored under invalid month key {:?}", key);
            None
        }
    })
    .collect()
}

/// Every month with an estimate or an actual record, ascending, deduplicated
pub fn available_months(state: &UserFinancialState) -> Vec<MonthKey> {
    let mut months = valid_keys(state.estimados.keys());
    months.extend(valid_keys(state.reales.keys()));
    months.into_iter().collect()
}

/// Months with an estimate record, ascending
pub fn months_with_estimate(state: &UserFinancialState) -> Vec<MonthKey> {
    valid_keys(state.estimados.keys()).into_iter().collect()
}

/// Months with an actual record, ascending
pub fn months_with_actual(state: &UserFinancialState) -> Vec<MonthKey> {
    valid_keys(state.reales.keys()).into_iter().collect()
}

/// Months with both an estimate and an actual record, ascending
pub fn months_with_both(state: &UserFinancialState) -> Vec<MonthKey> {
    let actual = valid_keys(state.reales.keys());
    valid_keys(state.estimados.keys())
        .into_iter()
        .filter(|mes| actual.contains(mes))
        .collect()
}

/// Spanish long label for a raw month key
///
/// Anything that is not a well formed key comes back unchanged.
pub fn month_label(key: &str) -> String {
    key.parse::<MonthKey>()
        .map(|mes| mes.label())
        .unwrap_or_else(|_| key.to_string())
}

/// Selected month plus an optional inclusive range for cross-month views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSelection {
    /// Month shown by the single-month views
    pub selected: MonthKey,
    /// First month of the range (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<MonthKey>,
    /// Last month of the range (inclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<MonthKey>,
}

impl Default for MonthSelection {
    fn default() -> Self {
        Self::new(MonthKey::current())
    }
}

impl MonthSelection {
    /// Select a month with no range
    pub fn new(selected: MonthKey) -> Self {
        Self {
            selected,
            from: None,
            to: None,
        }
    }

    /// Restrict the cross-month views to `from..=to`
    ///
    /// A reversed range is swapped.
    pub fn with_range(mut self, from: Option<MonthKey>, to: Option<MonthKey>) -> Self {
        match (from, to) {
            (Some(a), Some(b)) if a > b => {
                self.from = Some(b);
                self.to = Some(a);
            }
            (from, to) => {
                self.from = from;
                self.to = to;
            }
        }
        self
    }

    /// Check if a month falls inside the range
    pub fn contains(&self, mes: &MonthKey) -> bool {
        let after_start = self.from.as_ref().map_or(true, |from| mes >= from);
        let before_end = self.to.as_ref().map_or(true, |to| mes <= to);
        after_start && before_end
    }

    /// Months with data inside the range, in chronological order
    pub fn months_in(&self, state: &UserFinancialState) -> Vec<MonthKey> {
        available_months(state)
            .into_iter()
            .filter(|mes| self.contains(mes))
            .collect()
    }

    /// Months with both records inside the range, in chronological order
    pub fn complete_months_in(&self, state: &UserFinancialState) -> Vec<MonthKey> {
        months_with_both(state)
            .into_iter()
            .filter(|mes| self.contains(mes))
            .collect()
    }

    /// Human-readable description of the range
    pub fn description(&self) -> String {
        match (&self.from, &self.to) {
            (None, None) => "Todos los meses".to_string(),
            (Some(from), None) => format!("Desde {}", from.label()),
            (None, Some(to)) => format!("Hasta {}", to.label()),
            (Some(from), Some(to)) => format!("{} a {}", from.label(), to.label()),
        }
    }
}
