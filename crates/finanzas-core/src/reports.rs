//! Report structures for API responses
//!
//! Field names serialize in camelCase, matching the names the reporting
//! views already use for these figures.

use serde::{Deserialize, Serialize};

use super::types::{BudgetStatus, MonthKey};

/// Estimate and actual totals for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotals {
    pub mes: MonthKey,
    pub ingreso_estimado: f64,
    pub ingreso_real: f64,
    pub inversion_estimada: f64,
    pub inversion_real: f64,
    pub ganado_inversion: f64,
    pub total_gastos_estimado: f64,
    pub total_gastos_real: f64,
    /// income - expenses - investment
    pub ahorro_estimado: f64,
    /// income - expenses - investment + investment gain
    pub ahorro_real: f64,
}

/// Estimate vs actual for one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDeviation {
    pub nombre: String,
    pub estimado: f64,
    pub real: f64,
    /// real - estimado
    pub desvio: f64,
    /// desvio as a percentage of estimado, 0 when nothing was estimated
    pub desvio_porcentaje: f64,
}

/// Headline indicators for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthKpis {
    /// ahorroReal - ahorroEstimado
    pub desvio_ahorro: f64,
    /// Actual expenses as a rounded percentage of estimated expenses
    pub ejecucion_gastos: f64,
    /// Estimated investment as a rounded percentage of estimated income
    pub inversion_sobre_ingreso: f64,
    pub estado: BudgetStatus,
}

/// Share of a month's actual spend taken by one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingShare {
    pub nombre: String,
    pub monto: f64,
    pub porcentaje: f64,
}

/// Everything the single-month view renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReport {
    pub totales: MonthTotals,
    /// Sorted by descending absolute deviation
    pub desvios: Vec<ConceptDeviation>,
    /// Compliance score, 0..=100
    pub cumplimiento: f64,
    pub kpis: MonthKpis,
    pub distribucion: Vec<SpendingShare>,
}

/// One step of the cumulative investment series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPoint {
    pub mes: MonthKey,
    pub inversion_mes: f64,
    pub ganancia_mes: f64,
    pub capital_aportado: f64,
    pub ganancia_acumulada: f64,
    pub capital_total: f64,
    pub roi: f64,
}

/// One month of the historical comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMonth {
    pub mes: MonthKey,
    pub ingreso_estimado: f64,
    pub ingreso_real: f64,
    pub gastos_estimados: f64,
    pub gastos_reales: f64,
    pub inversion_estimada: f64,
    pub inversion_real: f64,
    pub ganado_inversion: f64,
    pub ahorro_estimado: f64,
    pub ahorro_real: f64,
    pub desvio_ingreso: f64,
    pub desvio_gastos: f64,
    pub desvio_ahorro: f64,
    /// (estimated - actual expenses) / estimated * 100
    pub cumplimiento_presupuesto: f64,
    /// Change in actual expenses vs the previous month, `None` for the first
    pub variacion_gastos: Option<f64>,
}

/// Column sums across the months of a historical summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTotals {
    pub ingreso_estimado: f64,
    pub ingreso_real: f64,
    pub desvio_ingreso: f64,
    pub gastos_estimados: f64,
    pub gastos_reales: f64,
    pub desvio_gastos: f64,
    pub inversion_estimada: f64,
    pub inversion_real: f64,
    pub ganado_inversion: f64,
    pub ahorro_estimado: f64,
    pub ahorro_real: f64,
    pub desvio_ahorro: f64,
}

/// Cross-month summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSummary {
    pub meses: Vec<HistoricalMonth>,
    pub total_ahorrado: f64,
    pub ahorro_promedio: f64,
    pub cumplimiento_promedio: f64,
    /// Months with positive actual savings
    pub meses_superavit: usize,
    pub porcentaje_superavit: f64,
    pub totales: HistoricalTotals,
}
