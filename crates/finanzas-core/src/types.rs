//! Basic types shared by the records and the reports

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MONTH_NAMES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

/// Calendar month key in `YYYY-MM` form
///
/// Only the shape is checked, so `2024-13` is a valid key. String order is
/// chronological order for this format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    /// Check whether a raw map key has the `YYYY-MM` shape
    pub fn is_valid(key: &str) -> bool {
        static MONTH_KEY: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
        // ASCII classes: `\d` would also accept non-latin digits
        let pattern = MONTH_KEY.get_or_init(|| {
            regex::Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("month key pattern")
        });
        pattern.is_match(key)
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        MonthKey(Local::now().format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> i32 {
        self.0[..4].parse().unwrap_or(0)
    }

    /// Month number as written in the key (not range checked)
    pub fn month(&self) -> u32 {
        self.0[5..7].parse().unwrap_or(0)
    }

    /// Spanish long label, e.g. `marzo de 2024`
    ///
    /// Keys whose month part is outside 1..=12 are returned unchanged.
    pub fn label(&self) -> String {
        match self.month() {
            m @ 1..=12 => format!("{} de {}", MONTH_NAMES[(m - 1) as usize], self.year()),
            _ => self.0.clone(),
        }
    }
}

impl std::str::FromStr for MonthKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if MonthKey::is_valid(s) {
            Ok(MonthKey(s.to_string()))
        } else {
            Err(CoreError::InvalidMonth { key: s.to_string() })
        }
    }
}

impl TryFrom<String> for MonthKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.0
    }
}

impl AsRef<str> for MonthKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How actual spending compares to the month's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Spending at or below the near-limit threshold
    WithinBudget,
    /// Above the threshold but not above 100%
    NearLimit,
    /// Spent more than budgeted
    OverBudget,
}

impl BudgetStatus {
    /// Classify a spending execution percentage (actual / estimated * 100)
    pub fn from_execution(execution: f64, near_limit: f64) -> Self {
        if execution > 100.0 {
            BudgetStatus::OverBudget
        } else if execution > near_limit {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::WithinBudget
        }
    }
}

impl Default for BudgetStatus {
    fn default() -> Self {
        BudgetStatus::WithinBudget
    }
}

impl std::str::FromStr for BudgetStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "within_budget" => Ok(BudgetStatus::WithinBudget),
            "near_limit" => Ok(BudgetStatus::NearLimit),
            "over_budget" => Ok(BudgetStatus::OverBudget),
            _ => Err(format!("Invalid budget status: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::WithinBudget => write!(f, "within_budget"),
            BudgetStatus::NearLimit => write!(f, "near_limit"),
            BudgetStatus::OverBudget => write!(f, "over_budget"),
        }
    }
}
