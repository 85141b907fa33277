//! Aggregation engine: derived figures for the reporting views
//!
//! Every function here is pure. A missing record reads as an empty one and
//! every ratio falls back to a fixed value when its denominator is zero, so
//! nothing in this module can fail. Callers that need to tell "no data"
//! from "zero" must check record presence themselves.

use std::collections::BTreeMap;

use crate::models::{ActualConcept, ActualRecord, EstimateRecord, UserFinancialState};
use crate::reports::{
    ConceptDeviation, HistoricalMonth, HistoricalSummary, HistoricalTotals, InvestmentPoint,
    MonthKpis, MonthReport, MonthTotals, SpendingShare,
};
use crate::types::{BudgetStatus, MonthKey};

/// Actual spend of one concept
pub fn concept_total(concept: &ActualConcept) -> f64 {
    concept.total()
}

/// Sum of the estimated concept amounts
pub fn estimated_expenses(record: &EstimateRecord) -> f64 {
    record.conceptos.iter().map(|c| c.monto).sum()
}

/// Sum of the actual concept totals
pub fn actual_expenses(record: &ActualRecord) -> f64 {
    record.conceptos.iter().map(concept_total).sum()
}

/// Income, expenses, investment and savings on both sides of a month
pub fn month_totals(
    mes: &MonthKey,
    estimado: Option<&EstimateRecord>,
    real: Option<&ActualRecord>,
) -> MonthTotals {
    let empty_estimate = EstimateRecord::default();
    let empty_actual = ActualRecord::default();
    let estimado = estimado.unwrap_or(&empty_estimate);
    let real = real.unwrap_or(&empty_actual);

    let total_gastos_estimado = estimated_expenses(estimado);
    let total_gastos_real = actual_expenses(real);

    MonthTotals {
        mes: mes.clone(),
        ingreso_estimado: estimado.ingreso,
        ingreso_real: real.ingreso,
        inversion_estimada: estimado.inversion,
        inversion_real: real.inversion,
        ganado_inversion: real.ganado_inversion,
        total_gastos_estimado,
        total_gastos_real,
        ahorro_estimado: estimado.ingreso - total_gastos_estimado - estimado.inversion,
        ahorro_real: real.ingreso - total_gastos_real - real.inversion + real.ganado_inversion,
    }
}

/// Per-concept deviation, largest absolute deviation first
///
/// The estimate's concept list decides which concepts are compared. Actual
/// concepts are matched by exact name; an unmatched concept counts as 0.
/// Ties keep the estimate's order.
pub fn concept_deviations(
    estimado: Option<&EstimateRecord>,
    real: Option<&ActualRecord>,
) -> Vec<ConceptDeviation> {
    let Some(estimado) = estimado else {
        return Vec::new();
    };

    let mut deviations: Vec<ConceptDeviation> = estimado
        .conceptos
        .iter()
        .map(|concepto| {
            let actual = real
                .and_then(|r| r.concept(&concepto.nombre))
                .map(concept_total)
                .unwrap_or(0.0);
            let desvio = actual - concepto.monto;
            ConceptDeviation {
                nombre: concepto.nombre.clone(),
                estimado: concepto.monto,
                real: actual,
                desvio,
                desvio_porcentaje: if concepto.monto > 0.0 {
                    desvio * 100.0 / concepto.monto
                } else {
                    0.0
                },
            }
        })
        .collect();

    // sort_by is stable
    deviations.sort_by(|a, b| b.desvio.abs().total_cmp(&a.desvio.abs()));
    deviations
}

/// The first `n` entries of an already sorted deviation list
pub fn largest_deviations(deviations: &[ConceptDeviation], n: usize) -> &[ConceptDeviation] {
    &deviations[..n.min(deviations.len())]
}

/// Budget compliance score in 0..=100, rounded
///
/// Averages the relative absolute deviation over every estimate concept.
/// Concepts estimated at 0 add nothing to the sum but still count in the
/// denominator. No concepts at all scores 100.
pub fn compliance_score(deviations: &[ConceptDeviation]) -> f64 {
    if deviations.is_empty() {
        return 100.0;
    }

    let sum: f64 = deviations
        .iter()
        .map(|d| {
            if d.estimado > 0.0 {
                (d.real - d.estimado).abs() / d.estimado
            } else {
                0.0
            }
        })
        .sum();
    let average = sum / deviations.len() as f64;

    (100.0 - average * 100.0).clamp(0.0, 100.0).round()
}

/// Headline indicators derived from a month's totals
pub fn month_kpis(totals: &MonthTotals, near_limit: f64) -> MonthKpis {
    let ejecucion_gastos = if totals.total_gastos_estimado > 0.0 {
        (totals.total_gastos_real / totals.total_gastos_estimado * 100.0).round()
    } else {
        0.0
    };
    let inversion_sobre_ingreso = if totals.ingreso_estimado > 0.0 {
        (totals.inversion_estimada / totals.ingreso_estimado * 100.0).round()
    } else {
        0.0
    };

    MonthKpis {
        desvio_ahorro: totals.ahorro_real - totals.ahorro_estimado,
        ejecucion_gastos,
        inversion_sobre_ingreso,
        estado: BudgetStatus::from_execution(ejecucion_gastos, near_limit),
    }
}

/// Each actual concept's share of the month's actual spend, in entry order
pub fn spending_distribution(real: Option<&ActualRecord>) -> Vec<SpendingShare> {
    let Some(real) = real else {
        return Vec::new();
    };
    let total = actual_expenses(real);

    real.conceptos
        .iter()
        .map(|concepto| {
            let monto = concept_total(concepto);
            SpendingShare {
                nombre: concepto.nombre.clone(),
                monto,
                porcentaje: if total > 0.0 { monto / total * 100.0 } else { 0.0 },
            }
        })
        .collect()
}

/// Totals, deviations, compliance, KPIs and distribution for one month
pub fn month_report(
    mes: &MonthKey,
    estimado: Option<&EstimateRecord>,
    real: Option<&ActualRecord>,
    near_limit: f64,
) -> MonthReport {
    let totales = month_totals(mes, estimado, real);
    let desvios = concept_deviations(estimado, real);
    let cumplimiento = compliance_score(&desvios);
    let kpis = month_kpis(&totales, near_limit);

    MonthReport {
        totales,
        desvios,
        cumplimiento,
        kpis,
        distribucion: spending_distribution(real),
    }
}

/// Running investment and gain totals over `months`, in the given order
///
/// This is a left fold: callers must pass months in chronological order.
pub fn cumulative_investment_series(
    months: &[MonthKey],
    reales: &BTreeMap<String, ActualRecord>,
) -> Vec<InvestmentPoint> {
    let mut capital_aportado = 0.0;
    let mut ganancia_acumulada = 0.0;

    months
        .iter()
        .map(|mes| {
            let (inversion_mes, ganancia_mes) = reales
                .get(mes.as_str())
                .map(|r| (r.inversion, r.ganado_inversion))
                .unwrap_or((0.0, 0.0));

            capital_aportado += inversion_mes;
            ganancia_acumulada += ganancia_mes;

            InvestmentPoint {
                mes: mes.clone(),
                inversion_mes,
                ganancia_mes,
                capital_aportado,
                ganancia_acumulada,
                capital_total: capital_aportado + ganancia_acumulada,
                roi: if inversion_mes > 0.0 {
                    ganancia_mes / inversion_mes * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Month-by-month comparison plus aggregate statistics
///
/// `months` must be in chronological order; expense variation is measured
/// against the previous entry of this list.
pub fn historical_summary(months: &[MonthKey], state: &UserFinancialState) -> HistoricalSummary {
    let mut meses: Vec<HistoricalMonth> = Vec::with_capacity(months.len());
    let mut previous_expenses: Option<f64> = None;

    for mes in months {
        let totals = month_totals(mes, state.estimate(mes), state.actual(mes));
        let gastos_estimados = totals.total_gastos_estimado;
        let gastos_reales = totals.total_gastos_real;

        let variacion_gastos = previous_expenses.map(|prev| {
            if prev > 0.0 {
                (gastos_reales - prev) / prev * 100.0
            } else {
                0.0
            }
        });
        previous_expenses = Some(gastos_reales);

        meses.push(HistoricalMonth {
            mes: mes.clone(),
            ingreso_estimado: totals.ingreso_estimado,
            ingreso_real: totals.ingreso_real,
            gastos_estimados,
            gastos_reales,
            inversion_estimada: totals.inversion_estimada,
            inversion_real: totals.inversion_real,
            ganado_inversion: totals.ganado_inversion,
            ahorro_estimado: totals.ahorro_estimado,
            ahorro_real: totals.ahorro_real,
            desvio_ingreso: totals.ingreso_real - totals.ingreso_estimado,
            desvio_gastos: gastos_reales - gastos_estimados,
            desvio_ahorro: totals.ahorro_real - totals.ahorro_estimado,
            cumplimiento_presupuesto: if gastos_estimados > 0.0 {
                (gastos_estimados - gastos_reales) / gastos_estimados * 100.0
            } else {
                0.0
            },
            variacion_gastos,
        });
    }

    summarize(meses)
}

fn summarize(meses: Vec<HistoricalMonth>) -> HistoricalSummary {
    let count = meses.len();
    let total_ahorrado: f64 = meses.iter().map(|m| m.ahorro_real).sum();
    let cumplimiento_total: f64 = meses.iter().map(|m| m.cumplimiento_presupuesto).sum();
    let meses_superavit = meses.iter().filter(|m| m.ahorro_real > 0.0).count();

    let average = |sum: f64| if count > 0 { sum / count as f64 } else { 0.0 };

    let totales = meses.iter().fold(HistoricalTotals::default(), |mut t, m| {
        t.ingreso_estimado += m.ingreso_estimado;
        t.ingreso_real += m.ingreso_real;
        t.desvio_ingreso += m.desvio_ingreso;
        t.gastos_estimados += m.gastos_estimados;
        t.gastos_reales += m.gastos_reales;
        t.desvio_gastos += m.desvio_gastos;
        t.inversion_estimada += m.inversion_estimada;
        t.inversion_real += m.inversion_real;
        t.ganado_inversion += m.ganado_inversion;
        t.ahorro_estimado += m.ahorro_estimado;
        t.ahorro_real += m.ahorro_real;
        t.desvio_ahorro += m.desvio_ahorro;
        t
    });

    HistoricalSummary {
        total_ahorrado,
        ahorro_promedio: average(total_ahorrado),
        cumplimiento_promedio: average(cumplimiento_total),
        meses_superavit,
        porcentaje_superavit: average(meses_superavit as f64 * 100.0),
        totales,
        meses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EstimateConcept, Gasto};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn month(key: &str) -> MonthKey {
        key.parse().unwrap()
    }

    fn estimate(ingreso: f64, inversion: f64, conceptos: &[(&str, f64)]) -> EstimateRecord {
        EstimateRecord {
            ingreso,
            inversion,
            conceptos: conceptos
                .iter()
                .map(|(nombre, monto)| EstimateConcept::new(nombre, *monto))
                .collect(),
        }
    }

    fn actual(ingreso: f64, inversion: f64, ganado: f64, conceptos: &[(&str, f64)]) -> ActualRecord {
        ActualRecord {
            ingreso,
            inversion,
            ganado_inversion: ganado,
            conceptos: conceptos
                .iter()
                .map(|(nombre, monto)| ActualConcept::simple(nombre, *monto))
                .collect(),
        }
    }

    // ==================== concept total ====================

    #[test]
    fn test_concept_total_is_order_independent() {
        let gastos = vec![
            Gasto::new("a", 0.1),
            Gasto::new("b", 1e16),
            Gasto::new("c", 0.2),
            Gasto::new("d", -1e16),
            Gasto::new("e", 0.3),
        ];
        let forward = ActualConcept::detailed("X", gastos.clone());
        let mut reversed_items = gastos.clone();
        reversed_items.reverse();
        let reversed = ActualConcept::detailed("X", reversed_items);
        let mut rotated_items = gastos;
        rotated_items.rotate_left(2);
        let rotated = ActualConcept::detailed("X", rotated_items);

        assert_eq!(concept_total(&forward), concept_total(&reversed));
        assert_eq!(concept_total(&forward), concept_total(&rotated));
    }

    #[test]
    fn test_concept_total_empty_and_simple() {
        assert_eq!(concept_total(&ActualConcept::empty("Luz")), 0.0);
        assert_eq!(concept_total(&ActualConcept::simple("Comida", 25000.0)), 25000.0);
    }

    #[test]
    fn test_concept_total_is_idempotent() {
        let concept = ActualConcept::detailed(
            "Comida",
            vec![Gasto::new("Super", 12000.0), Gasto::new("Feria", 3000.0)],
        );
        assert_eq!(concept_total(&concept), concept_total(&concept));
        assert_eq!(concept_total(&concept), 15000.0);
    }

    // ==================== month totals ====================

    #[test]
    fn test_month_totals_all_absent_is_zero() {
        let totals = month_totals(&month("2024-01"), None, None);
        assert_eq!(totals.total_gastos_estimado, 0.0);
        assert_eq!(totals.total_gastos_real, 0.0);
        assert_eq!(totals.ahorro_estimado, 0.0);
        assert_eq!(totals.ahorro_real, 0.0);
    }

    #[test]
    fn test_month_totals_empty_records_is_zero() {
        let totals = month_totals(
            &month("2024-01"),
            Some(&EstimateRecord::default()),
            Some(&ActualRecord::default()),
        );
        assert_eq!(totals.ahorro_estimado, 0.0);
        assert_eq!(totals.ahorro_real, 0.0);
    }

    #[test]
    fn test_month_totals_estimate_without_actual() {
        let est = estimate(100000.0, 10000.0, &[("Comida", 30000.0)]);
        let totals = month_totals(&month("2024-03"), Some(&est), None);

        assert_close(totals.total_gastos_estimado, 30000.0);
        assert_close(totals.ahorro_estimado, 60000.0);
        assert_close(totals.total_gastos_real, 0.0);
        // actual income is not borrowed from the estimate, so nothing was saved
        assert_close(totals.ahorro_real, 0.0);
    }

    #[test]
    fn test_month_totals_actual_savings_include_gain() {
        let act = actual(100000.0, 0.0, 0.0, &[]);
        let totals = month_totals(&month("2024-03"), None, Some(&act));
        assert_close(totals.ahorro_real, 100000.0);

        let act = actual(5000.0, 1000.0, 200.0, &[("Comida", 1500.0), ("Luz", 500.0)]);
        let totals = month_totals(&month("2024-03"), None, Some(&act));
        assert_close(totals.total_gastos_real, 2000.0);
        assert_close(totals.ahorro_real, 5000.0 - 2000.0 - 1000.0 + 200.0);
    }

    // ==================== deviations ====================

    #[test]
    fn test_deviation_sign_and_percentage() {
        let est = estimate(0.0, 0.0, &[("Comida", 1000.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("Comida", 1200.0)]);
        let devs = concept_deviations(Some(&est), Some(&act));

        assert_eq!(devs.len(), 1);
        assert_close(devs[0].desvio, 200.0);
        assert_close(devs[0].desvio_porcentaje, 20.0);
    }

    #[test]
    fn test_deviation_missing_actual_concept_is_zero() {
        let est = estimate(0.0, 0.0, &[("Comida", 1000.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("comida", 900.0)]);
        let devs = concept_deviations(Some(&est), Some(&act));

        assert_eq!(devs[0].real, 0.0);
        assert_close(devs[0].desvio, -1000.0);
        assert_close(devs[0].desvio_porcentaje, -100.0);
    }

    #[test]
    fn test_deviation_zero_estimate_percentage() {
        let est = estimate(0.0, 0.0, &[("Regalos", 0.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("Regalos", 300.0)]);
        let devs = concept_deviations(Some(&est), Some(&act));
        assert_close(devs[0].desvio, 300.0);
        assert_eq!(devs[0].desvio_porcentaje, 0.0);
    }

    #[test]
    fn test_deviation_ignores_actual_only_concepts() {
        let est = estimate(0.0, 0.0, &[("Comida", 100.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("Comida", 100.0), ("Extra", 999.0)]);
        let devs = concept_deviations(Some(&est), Some(&act));
        assert_eq!(devs.len(), 1);
        assert!(concept_deviations(None, Some(&act)).is_empty());
    }

    #[test]
    fn test_deviation_order_is_stable() {
        let est = estimate(
            0.0,
            0.0,
            &[("A", 100.0), ("B", 100.0), ("C", 100.0), ("D", 100.0)],
        );
        let act = actual(
            0.0,
            0.0,
            0.0,
            &[("A", 150.0), ("B", 300.0), ("C", 50.0), ("D", 100.0)],
        );
        let devs = concept_deviations(Some(&est), Some(&act));
        let names: Vec<&str> = devs.iter().map(|d| d.nombre.as_str()).collect();

        // A (+50) and C (-50) tie and keep their estimate order
        assert_eq!(names, vec!["B", "A", "C", "D"]);
        assert_eq!(largest_deviations(&devs, 2).len(), 2);
        assert_eq!(largest_deviations(&devs, 10).len(), 4);
    }

    // ==================== compliance ====================

    #[test]
    fn test_compliance_no_concepts_is_perfect() {
        assert_eq!(compliance_score(&[]), 100.0);
    }

    #[test]
    fn test_compliance_exact_match_is_perfect() {
        let est = estimate(0.0, 0.0, &[("A", 100.0), ("B", 250.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("A", 100.0), ("B", 250.0)]);
        assert_eq!(compliance_score(&concept_deviations(Some(&est), Some(&act))), 100.0);
    }

    #[test]
    fn test_compliance_zero_estimates_count_in_denominator() {
        // A deviates by 50%, B is estimated at 0: average = 0.5 / 2
        let est = estimate(0.0, 0.0, &[("A", 100.0), ("B", 0.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("A", 150.0), ("B", 500.0)]);
        assert_eq!(compliance_score(&concept_deviations(Some(&est), Some(&act))), 75.0);
    }

    #[test]
    fn test_compliance_is_clamped() {
        let est = estimate(0.0, 0.0, &[("A", 100.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("A", 1000.0)]);
        assert_eq!(compliance_score(&concept_deviations(Some(&est), Some(&act))), 0.0);
    }

    #[test]
    fn test_compliance_is_rounded() {
        // average deviation 1/3 -> 66.67 -> 67
        let est = estimate(0.0, 0.0, &[("A", 300.0)]);
        let act = actual(0.0, 0.0, 0.0, &[("A", 200.0)]);
        assert_eq!(compliance_score(&concept_deviations(Some(&est), Some(&act))), 67.0);
    }

    // ==================== KPIs and distribution ====================

    #[test]
    fn test_month_kpis() {
        let est = estimate(100000.0, 10000.0, &[("Comida", 30000.0)]);
        let act = actual(100000.0, 10000.0, 0.0, &[("Comida", 27000.0)]);
        let totals = month_totals(&month("2024-03"), Some(&est), Some(&act));
        let kpis = month_kpis(&totals, 80.0);

        assert_eq!(kpis.ejecucion_gastos, 90.0);
        assert_eq!(kpis.inversion_sobre_ingreso, 10.0);
        assert_close(kpis.desvio_ahorro, 3000.0);
        assert_eq!(kpis.estado, BudgetStatus::NearLimit);
    }

    #[test]
    fn test_month_kpis_without_budget() {
        let totals = month_totals(&month("2024-03"), None, None);
        let kpis = month_kpis(&totals, 80.0);
        assert_eq!(kpis.ejecucion_gastos, 0.0);
        assert_eq!(kpis.inversion_sobre_ingreso, 0.0);
        assert_eq!(kpis.estado, BudgetStatus::WithinBudget);
    }

    #[test]
    fn test_spending_distribution() {
        let act = actual(0.0, 0.0, 0.0, &[("Comida", 750.0), ("Luz", 250.0)]);
        let shares = spending_distribution(Some(&act));
        assert_eq!(shares.len(), 2);
        assert_close(shares[0].porcentaje, 75.0);
        assert_close(shares[1].porcentaje, 25.0);

        let nothing = actual(0.0, 0.0, 0.0, &[("Comida", 0.0)]);
        assert_eq!(spending_distribution(Some(&nothing))[0].porcentaje, 0.0);
        assert!(spending_distribution(None).is_empty());
    }

    #[test]
    fn test_month_report_bundles_everything() {
        let est = estimate(1000.0, 0.0, &[("A", 100.0), ("B", 200.0)]);
        let act = actual(1000.0, 0.0, 0.0, &[("A", 100.0), ("B", 260.0)]);
        let report = month_report(&month("2024-05"), Some(&est), Some(&act), 80.0);

        assert_eq!(report.desvios[0].nombre, "B");
        assert_eq!(report.cumplimiento, 85.0);
        assert_eq!(report.kpis.estado, BudgetStatus::OverBudget);
        assert_eq!(report.distribucion.len(), 2);
        assert_close(report.totales.total_gastos_real, 360.0);
    }

    // ==================== investment series ====================

    #[test]
    fn test_cumulative_series_accumulates() {
        let months = vec![month("2024-01"), month("2024-02")];
        let mut reales = BTreeMap::new();
        reales.insert("2024-01".to_string(), actual(0.0, 1000.0, 100.0, &[]));
        reales.insert("2024-02".to_string(), actual(0.0, 500.0, 50.0, &[]));

        let series = cumulative_investment_series(&months, &reales);
        let aportado: Vec<f64> = series.iter().map(|p| p.capital_aportado).collect();
        let ganancia: Vec<f64> = series.iter().map(|p| p.ganancia_acumulada).collect();
        let total: Vec<f64> = series.iter().map(|p| p.capital_total).collect();

        assert_eq!(aportado, vec![1000.0, 1500.0]);
        assert_eq!(ganancia, vec![100.0, 150.0]);
        assert_eq!(total, vec![1100.0, 1650.0]);
        assert_close(series[0].roi, 10.0);
        assert_close(series[1].roi, 10.0);
    }

    #[test]
    fn test_cumulative_series_roi_guard() {
        let months = vec![month("2024-01")];
        let mut reales = BTreeMap::new();
        reales.insert("2024-01".to_string(), actual(0.0, 0.0, 750.0, &[]));

        let series = cumulative_investment_series(&months, &reales);
        assert_eq!(series[0].roi, 0.0);
        assert_eq!(series[0].ganancia_acumulada, 750.0);
    }

    #[test]
    fn test_cumulative_series_missing_month_contributes_zero() {
        let months = vec![month("2024-01"), month("2024-02"), month("2024-03")];
        let mut reales = BTreeMap::new();
        reales.insert("2024-01".to_string(), actual(0.0, 100.0, 10.0, &[]));
        reales.insert("2024-03".to_string(), actual(0.0, 100.0, 10.0, &[]));

        let series = cumulative_investment_series(&months, &reales);
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].capital_aportado, 100.0);
        assert_eq!(series[1].inversion_mes, 0.0);
        assert_eq!(series[2].capital_total, 220.0);
    }

    // ==================== historical summary ====================

    fn state_with(months: &[(&str, EstimateRecord, ActualRecord)]) -> UserFinancialState {
        let mut state = UserFinancialState::default();
        for (key, est, act) in months {
            let mes = month(key);
            state.replace_estimate(&mes, est.clone());
            state.replace_actual(&mes, act.clone());
        }
        state
    }

    #[test]
    fn test_historical_mean_compliance() {
        // Compliance 10%, -5%, 20%
        let state = state_with(&[
            ("2024-01", estimate(0.0, 0.0, &[("A", 1000.0)]), actual(0.0, 0.0, 0.0, &[("A", 900.0)])),
            ("2024-02", estimate(0.0, 0.0, &[("A", 1000.0)]), actual(0.0, 0.0, 0.0, &[("A", 1050.0)])),
            ("2024-03", estimate(0.0, 0.0, &[("A", 1000.0)]), actual(0.0, 0.0, 0.0, &[("A", 800.0)])),
        ]);
        let months = vec![month("2024-01"), month("2024-02"), month("2024-03")];
        let summary = historical_summary(&months, &state);

        let compliance: Vec<f64> = summary.meses.iter().map(|m| m.cumplimiento_presupuesto).collect();
        assert_close(compliance[0], 10.0);
        assert_close(compliance[1], -5.0);
        assert_close(compliance[2], 20.0);
        assert_close(summary.cumplimiento_promedio, 25.0 / 3.0);

        // Every month spent money with no income: no surplus months
        assert_eq!(summary.meses_superavit, 0);
        assert_eq!(summary.porcentaje_superavit, 0.0);
    }

    #[test]
    fn test_historical_total_saved_identity() {
        let state = state_with(&[
            ("2024-01", estimate(1000.0, 100.0, &[]), actual(1000.3, 100.1, 5.7, &[("A", 333.3)])),
            ("2024-02", estimate(1000.0, 100.0, &[]), actual(900.0, 0.0, 0.0, &[("A", 1200.0)])),
            ("2024-03", estimate(1000.0, 100.0, &[]), actual(1500.5, 250.25, 12.0, &[("A", 10.1)])),
        ]);
        let months = vec![month("2024-01"), month("2024-02"), month("2024-03")];
        let summary = historical_summary(&months, &state);

        let sum: f64 = summary.meses.iter().map(|m| m.ahorro_real).sum();
        assert_close(summary.total_ahorrado, sum);
        assert_close(summary.totales.ahorro_real, sum);
        assert_close(summary.ahorro_promedio, sum / 3.0);
        assert_eq!(summary.meses_superavit, 2);
        assert_close(summary.porcentaje_superavit, 200.0 / 3.0);
    }

    #[test]
    fn test_historical_expense_variation() {
        let state = state_with(&[
            ("2024-01", EstimateRecord::default(), actual(0.0, 0.0, 0.0, &[])),
            ("2024-02", EstimateRecord::default(), actual(0.0, 0.0, 0.0, &[("A", 200.0)])),
            ("2024-03", EstimateRecord::default(), actual(0.0, 0.0, 0.0, &[("A", 300.0)])),
        ]);
        let months = vec![month("2024-01"), month("2024-02"), month("2024-03")];
        let summary = historical_summary(&months, &state);

        assert_eq!(summary.meses[0].variacion_gastos, None);
        // previous month spent nothing
        assert_eq!(summary.meses[1].variacion_gastos, Some(0.0));
        assert_close(summary.meses[2].variacion_gastos.unwrap(), 50.0);
    }

    #[test]
    fn test_historical_deviation_columns() {
        let state = state_with(&[(
            "2024-01",
            estimate(1000.0, 100.0, &[("A", 500.0)]),
            actual(1100.0, 100.0, 0.0, &[("A", 450.0)]),
        )]);
        let summary = historical_summary(&[month("2024-01")], &state);
        let m = &summary.meses[0];

        assert_close(m.desvio_ingreso, 100.0);
        assert_close(m.desvio_gastos, -50.0);
        assert_close(m.desvio_ahorro, 550.0 - 400.0);
    }

    #[test]
    fn test_historical_empty() {
        let summary = historical_summary(&[], &UserFinancialState::default());
        assert!(summary.meses.is_empty());
        assert_eq!(summary.total_ahorrado, 0.0);
        assert_eq!(summary.ahorro_promedio, 0.0);
        assert_eq!(summary.cumplimiento_promedio, 0.0);
        assert_eq!(summary.porcentaje_superavit, 0.0);
    }
}
