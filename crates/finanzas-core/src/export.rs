//! Spreadsheet layout for the export views
//!
//! Produces the cell grid of each sheet. Writing an actual workbook file is
//! left to whoever consumes these sheets.

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, concept_total};
use crate::models::{ExpenseEntry, UserFinancialState};
use crate::reports::HistoricalMonth;
use crate::types::MonthKey;

pub const SHEET_ESTIMADOS: &str = "Estimados";
pub const SHEET_REALES: &str = "Reales";
pub const SHEET_RESUMEN: &str = "Resumen Mensual";

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A named grid of cells with column headers and widths (in characters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub widths: Vec<u16>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    fn new(name: &str, columns: &[(&str, u16)]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|(c, _)| c.to_string()).collect(),
            widths: columns.iter().map(|(_, w)| *w).collect(),
            rows: Vec::new(),
        }
    }

    fn push_blank(&mut self) {
        self.rows.push(vec![Cell::Empty; self.columns.len()]);
    }
}

/// The three export sheets, in workbook order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Lay out the export workbook for `months` (chronological order)
pub fn export_workbook(state: &UserFinancialState, months: &[MonthKey]) -> Workbook {
    log::debug!("Exporting {} months", months.len());
    Workbook {
        sheets: vec![
            estimates_sheet(state, months),
            actuals_sheet(state, months),
            summary_sheet(state, months),
        ],
    }
}

fn estimates_sheet(state: &UserFinancialState, months: &[MonthKey]) -> Sheet {
    let mut sheet = Sheet::new(
        SHEET_ESTIMADOS,
        &[
            ("Mes", 20),
            ("Tipo", 12),
            ("Concepto", 25),
            ("Monto", 12),
            ("Ingreso", 12),
            ("Total Gastos", 15),
            ("Inversión", 12),
            ("Ahorro Estimado", 15),
        ],
    );

    for mes in months {
        let totals = aggregate::month_totals(mes, state.estimate(mes), None);
        sheet.rows.push(vec![
            Cell::text(mes.label()),
            Cell::text("RESUMEN"),
            Cell::Empty,
            Cell::Empty,
            Cell::Number(totals.ingreso_estimado),
            Cell::Number(totals.total_gastos_estimado),
            Cell::Number(totals.inversion_estimada),
            Cell::Number(totals.ahorro_estimado),
        ]);

        if let Some(estimado) = state.estimate(mes) {
            for concepto in &estimado.conceptos {
                sheet.rows.push(vec![
                    Cell::Empty,
                    Cell::text("Gasto"),
                    Cell::text(concepto.nombre.clone()),
                    Cell::Number(concepto.monto),
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                    Cell::Empty,
                ]);
            }
        }

        sheet.push_blank();
    }

    sheet
}

fn actuals_sheet(state: &UserFinancialState, months: &[MonthKey]) -> Sheet {
    let mut sheet = Sheet::new(
        SHEET_REALES,
        &[
            ("Mes", 20),
            ("Tipo", 12),
            ("Concepto", 25),
            ("Detalle", 30),
            ("Monto", 12),
            ("Ingreso", 12),
            ("Total Gastos", 15),
            ("Inversión", 12),
            ("Ganancia Inv.", 15),
            ("Ahorro Real", 15),
        ],
    );
    let detail_row = |concepto: Cell, detalle: Cell, monto: Cell, tipo: Cell| {
        let mut row = vec![Cell::Empty, tipo, concepto, detalle, monto];
        row.resize(10, Cell::Empty);
        row
    };

    for mes in months {
        let totals = aggregate::month_totals(mes, None, state.actual(mes));
        sheet.rows.push(vec![
            Cell::text(mes.label()),
            Cell::text("RESUMEN"),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Number(totals.ingreso_real),
            Cell::Number(totals.total_gastos_real),
            Cell::Number(totals.inversion_real),
            Cell::Number(totals.ganado_inversion),
            Cell::Number(totals.ahorro_real),
        ]);

        for concepto in state.actual(mes).map(|r| r.conceptos.as_slice()).unwrap_or(&[]) {
            let nombre = Cell::text(concepto.nombre.clone());
            match &concepto.entry {
                ExpenseEntry::Detailed(gastos) if gastos.is_empty() => {
                    sheet
                        .rows
                        .push(detail_row(nombre, Cell::Empty, Cell::Empty, Cell::text("Gasto")));
                }
                entry => {
                    sheet.rows.push(detail_row(
                        nombre,
                        Cell::text("Total:"),
                        Cell::Number(concept_total(concepto)),
                        Cell::text("Gasto"),
                    ));
                    for gasto in entry.items() {
                        sheet.rows.push(detail_row(
                            Cell::Empty,
                            Cell::text(format!("  • {}", gasto.detalle)),
                            Cell::Number(gasto.monto),
                            Cell::Empty,
                        ));
                    }
                }
            }
        }

        sheet.push_blank();
    }

    sheet
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn summary_row(label: Cell, m: &HistoricalMonth, cumplimiento: f64) -> Vec<Cell> {
    vec![
        label,
        Cell::Number(m.ingreso_estimado),
        Cell::Number(m.ingreso_real),
        Cell::Number(m.desvio_ingreso),
        Cell::Number(m.gastos_estimados),
        Cell::Number(m.gastos_reales),
        Cell::Number(m.desvio_gastos),
        Cell::Number(m.inversion_estimada),
        Cell::Number(m.inversion_real),
        Cell::Number(m.ganado_inversion),
        Cell::Number(m.ahorro_estimado),
        Cell::Number(m.ahorro_real),
        Cell::Number(m.desvio_ahorro),
        Cell::Number(cumplimiento),
    ]
}

fn summary_sheet(state: &UserFinancialState, months: &[MonthKey]) -> Sheet {
    let mut columns: Vec<(&str, u16)> = vec![("Mes", 20)];
    columns.extend(
        [
            "Ingreso Est.",
            "Ingreso Real",
            "Desv. Ingreso",
            "Gastos Est.",
            "Gastos Reales",
            "Desv. Gastos",
            "Inversión Est.",
            "Inversión Real",
            "Ganancia Inv.",
            "Ahorro Est.",
            "Ahorro Real",
            "Desv. Ahorro",
        ]
        .iter()
        .map(|c| (*c, 13)),
    );
    columns.push(("Cumplimiento %", 15));
    let mut sheet = Sheet::new(SHEET_RESUMEN, &columns);

    let summary = aggregate::historical_summary(months, state);
    let mut cumplimiento_total = 0.0;

    for m in &summary.meses {
        let cumplimiento = round_one_decimal(m.cumplimiento_presupuesto);
        cumplimiento_total += cumplimiento;
        sheet
            .rows
            .push(summary_row(Cell::text(m.mes.label()), m, cumplimiento));
    }

    let t = &summary.totales;
    let cumplimiento_promedio = if summary.meses.is_empty() {
        0.0
    } else {
        round_one_decimal(cumplimiento_total / summary.meses.len() as f64)
    };
    sheet.rows.push(vec![
        Cell::text("TOTALES"),
        Cell::Number(t.ingreso_estimado),
        Cell::Number(t.ingreso_real),
        Cell::Number(t.desvio_ingreso),
        Cell::Number(t.gastos_estimados),
        Cell::Number(t.gastos_reales),
        Cell::Number(t.desvio_gastos),
        Cell::Number(t.inversion_estimada),
        Cell::Number(t.inversion_real),
        Cell::Number(t.ganado_inversion),
        Cell::Number(t.ahorro_estimado),
        Cell::Number(t.ahorro_real),
        Cell::Number(t.desvio_ahorro),
        Cell::Number(cumplimiento_promedio),
    ]);

    sheet
}
