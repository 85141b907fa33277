//! Stored records: monthly estimates, monthly actuals and the per-user document
//!
//! Numeric fields come from form inputs and may arrive as numbers, numeric
//! strings, empty strings or `null`. They are coerced once, on the way in,
//! with [`parse_or_zero`], so the rest of the crate only sees `f64`.
//! Names and lists get the same treatment: a field of the wrong type reads
//! as empty and a malformed list item is skipped, so one bad entry never
//! makes the whole document unreadable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{CoreError, CoreResult};
use crate::types::MonthKey;

/// Coerce a loosely typed JSON value into an amount
///
/// Numbers and numeric strings are read as `f64`. Anything else, including
/// non-finite results, becomes `0.0`.
pub fn parse_or_zero(value: &serde_json::Value) -> f64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_amount_str(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_amount_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_or_zero).unwrap_or(0.0))
}

/// Strings as is, numbers as their text, anything else empty
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items,
        Some(serde_json::Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            log::warn!("Expected a list, ignoring {}", other);
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Skipping malformed list item: {}", e);
                None
            }
        })
        .collect())
}

fn lenient_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Object(entries)) => entries,
        Some(serde_json::Value::Null) | None => return Ok(BTreeMap::new()),
        Some(other) => {
            log::warn!("Expected a month map, ignoring {}", other);
            return Ok(BTreeMap::new());
        }
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, record)| match serde_json::from_value(record) {
            Ok(parsed) => Some((key, parsed)),
            Err(e) => {
                log::warn!("Skipping malformed record for {:?}: {}", key, e);
                None
            }
        })
        .collect())
}

/// Concept names must be non-blank and distinct within a month
fn check_concept_names<'a>(names: impl Iterator<Item = &'a str>) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for nombre in names {
        if nombre.trim().is_empty() {
            return Err(CoreError::ValidationError {
                message: "Concept without a name".to_string(),
            });
        }
        if !seen.insert(nombre) {
            return Err(CoreError::ValidationError {
                message: format!("Duplicate concept {:?}", nombre),
            });
        }
    }
    Ok(())
}

// ==================== Estimates ====================

/// Budgeted amount for one concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateConcept {
    #[serde(default, deserialize_with = "text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "amount")]
    pub monto: f64,
}

impl EstimateConcept {
    pub fn new(nombre: &str, monto: f64) -> Self {
        Self {
            nombre: nombre.to_string(),
            monto,
        }
    }
}

/// Budget for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    /// Estimated income
    #[serde(default, deserialize_with = "amount")]
    pub ingreso: f64,
    /// Estimated investment
    #[serde(default, deserialize_with = "amount")]
    pub inversion: f64,
    /// Concepts in the order the user entered them
    #[serde(default, deserialize_with = "lenient_list")]
    pub conceptos: Vec<EstimateConcept>,
}

impl EstimateRecord {
    /// Check the record before it is saved
    pub fn validate(&self) -> CoreResult<()> {
        check_concept_names(self.conceptos.iter().map(|c| c.nombre.as_str()))
    }
}

// ==================== Actuals ====================

/// One line item of actual spending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gasto {
    #[serde(default, deserialize_with = "text")]
    pub detalle: String,
    #[serde(default, deserialize_with = "amount")]
    pub monto: f64,
}

impl Gasto {
    pub fn new(detalle: &str, monto: f64) -> Self {
        Self {
            detalle: detalle.to_string(),
            monto,
        }
    }
}

/// How the actual spend of a concept was entered
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseEntry {
    /// A single amount for the whole concept
    Simple(f64),
    /// Independent line items
    Detailed(Vec<Gasto>),
}

impl Default for ExpenseEntry {
    fn default() -> Self {
        ExpenseEntry::Detailed(Vec::new())
    }
}

impl ExpenseEntry {
    /// Total spend of the entry
    ///
    /// Line items are summed in ascending order so the result does not
    /// depend on the order they were entered in.
    pub fn total(&self) -> f64 {
        match self {
            ExpenseEntry::Simple(monto) => *monto,
            ExpenseEntry::Detailed(gastos) => {
                let mut montos: Vec<f64> = gastos.iter().map(|g| g.monto).collect();
                montos.sort_by(|a, b| a.total_cmp(b));
                montos.into_iter().sum()
            }
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, ExpenseEntry::Simple(_))
    }

    /// Line items, empty for a simple entry
    pub fn items(&self) -> &[Gasto] {
        match self {
            ExpenseEntry::Simple(_) => &[],
            ExpenseEntry::Detailed(gastos) => gastos,
        }
    }
}

/// Actual spend for one concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredActualConcept", into = "StoredActualConcept")]
pub struct ActualConcept {
    pub nombre: String,
    pub entry: ExpenseEntry,
}

impl ActualConcept {
    /// Concept with nothing recorded yet
    pub fn empty(nombre: &str) -> Self {
        Self {
            nombre: nombre.to_string(),
            entry: ExpenseEntry::default(),
        }
    }

    pub fn simple(nombre: &str, monto: f64) -> Self {
        Self {
            nombre: nombre.to_string(),
            entry: ExpenseEntry::Simple(monto),
        }
    }

    pub fn detailed(nombre: &str, gastos: Vec<Gasto>) -> Self {
        Self {
            nombre: nombre.to_string(),
            entry: ExpenseEntry::Detailed(gastos),
        }
    }

    pub fn total(&self) -> f64 {
        self.entry.total()
    }

    /// Replace whatever was recorded with a single amount
    pub fn set_simple(&mut self, monto: f64) {
        self.entry = ExpenseEntry::Simple(monto);
    }

    /// Append a line item; a simple amount is discarded first
    pub fn add_detail(&mut self, gasto: Gasto) {
        match &mut self.entry {
            ExpenseEntry::Detailed(gastos) => gastos.push(gasto),
            ExpenseEntry::Simple(_) => self.entry = ExpenseEntry::Detailed(vec![gasto]),
        }
    }

    /// Remove a line item by position
    pub fn remove_detail(&mut self, index: usize) -> Option<Gasto> {
        match &mut self.entry {
            ExpenseEntry::Detailed(gastos) if index < gastos.len() => Some(gastos.remove(index)),
            _ => None,
        }
    }
}

/// Stored shape of an actual concept: `{ nombre, gastos: [{ detalle, monto }] }`
///
/// A simple entry is stored as one gasto labelled with the concept name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredActualConcept {
    #[serde(default, deserialize_with = "text")]
    nombre: String,
    #[serde(default, deserialize_with = "lenient_list")]
    gastos: Vec<Gasto>,
}

impl From<StoredActualConcept> for ActualConcept {
    fn from(stored: StoredActualConcept) -> Self {
        let StoredActualConcept { nombre, mut gastos } = stored;
        let entry = if gastos.len() == 1 && gastos[0].detalle == nombre {
            ExpenseEntry::Simple(gastos.remove(0).monto)
        } else {
            ExpenseEntry::Detailed(gastos)
        };
        ActualConcept { nombre, entry }
    }
}

impl From<ActualConcept> for StoredActualConcept {
    fn from(concept: ActualConcept) -> Self {
        let gastos = match concept.entry {
            ExpenseEntry::Simple(monto) => vec![Gasto::new(&concept.nombre, monto)],
            ExpenseEntry::Detailed(gastos) => gastos,
        };
        StoredActualConcept {
            nombre: concept.nombre,
            gastos,
        }
    }
}

/// What actually happened in one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualRecord {
    #[serde(default, deserialize_with = "amount")]
    pub ingreso: f64,
    #[serde(default, deserialize_with = "amount")]
    pub inversion: f64,
    /// Realized investment gain
    #[serde(default, deserialize_with = "amount")]
    pub ganado_inversion: f64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub conceptos: Vec<ActualConcept>,
}

impl ActualRecord {
    /// Check the record before it is saved
    pub fn validate(&self) -> CoreResult<()> {
        check_concept_names(self.conceptos.iter().map(|c| c.nombre.as_str()))
    }

    /// New record whose concept list is copied from the month's estimate
    ///
    /// The copy is taken once; later estimate edits do not reach it.
    pub fn seeded_from(estimate: &EstimateRecord) -> Self {
        Self {
            conceptos: estimate
                .conceptos
                .iter()
                .map(|c| ActualConcept::empty(&c.nombre))
                .collect(),
            ..Self::default()
        }
    }

    /// First concept with exactly this name
    pub fn concept(&self, nombre: &str) -> Option<&ActualConcept> {
        self.conceptos.iter().find(|c| c.nombre == nombre)
    }
}

// ==================== User document ====================

/// Everything stored for one user
///
/// Keys are kept as raw strings so a document with malformed month keys
/// survives a load/save cycle untouched; reports skip those keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFinancialState {
    #[serde(default, deserialize_with = "lenient_map")]
    pub estimados: BTreeMap<String, EstimateRecord>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub reales: BTreeMap<String, ActualRecord>,
}

impl UserFinancialState {
    pub fn is_empty(&self) -> bool {
        self.estimados.is_empty() && self.reales.is_empty()
    }

    pub fn estimate(&self, mes: &MonthKey) -> Option<&EstimateRecord> {
        self.estimados.get(mes.as_str())
    }

    pub fn actual(&self, mes: &MonthKey) -> Option<&ActualRecord> {
        self.reales.get(mes.as_str())
    }

    /// Replace the whole estimate for a month
    pub fn replace_estimate(&mut self, mes: &MonthKey, record: EstimateRecord) {
        self.estimados.insert(mes.to_string(), record);
    }

    /// Replace the whole actual record for a month
    pub fn replace_actual(&mut self, mes: &MonthKey, record: ActualRecord) {
        self.reales.insert(mes.to_string(), record);
    }

    /// The actual record to show in the entry form for a month
    ///
    /// Returns the stored record when there is one, otherwise a fresh record
    /// seeded from that month's estimate concepts.
    pub fn actual_for_edit(&self, mes: &MonthKey) -> ActualRecord {
        match self.actual(mes) {
            Some(record) => record.clone(),
            None => self
                .estimate(mes)
                .map(ActualRecord::seeded_from)
                .unwrap_or_default(),
        }
    }
}
