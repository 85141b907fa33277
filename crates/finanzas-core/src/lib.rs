//! Monthly budget records and the reports derived from them

pub mod aggregate;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod store;
pub mod time;
pub mod types;

use finanzas_config::Config;
use std::sync::{PoisonError, RwLock};

pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails,
    ErrorLogger, ErrorSeverity,
};
pub use export::{export_workbook, Cell, Sheet, Workbook};
pub use models::{
    parse_or_zero, ActualConcept, ActualRecord, EstimateConcept, EstimateRecord, ExpenseEntry,
    Gasto, UserFinancialState,
};
pub use reports::{
    ConceptDeviation, HistoricalMonth, HistoricalSummary, HistoricalTotals, InvestmentPoint,
    MonthKpis, MonthReport, MonthTotals, SpendingShare,
};
pub use store::{StateStore, StoreRef};
pub use time::{available_months, month_label, months_with_both, MonthSelection};
pub use types::{BudgetStatus, MonthKey};

/// One user's financial document plus the month selection the views share
pub struct Finances {
    config: Config,
    store: StoreRef,
    user: String,
    state: UserFinancialState,
    loaded: bool,
    selection: RwLock<MonthSelection>,
}

impl Finances {
    /// Create a facade for the user named in the configuration
    pub fn new(config: Config, store: StoreRef) -> Self {
        let user = config.data.user.clone();
        Self::for_user(config, store, &user)
    }

    /// Create a facade for a specific user
    pub fn for_user(config: Config, store: StoreRef, user: &str) -> Self {
        Self {
            config,
            store,
            user: user.to_string(),
            state: UserFinancialState::default(),
            loaded: false,
            selection: RwLock::new(MonthSelection::default()),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load the user's document from the store
    pub async fn load(&mut self) -> CoreResult<()> {
        let state = self.store.load(&self.user).await.map_err(|e| {
            DefaultErrorLogger.log_error(&e, &ErrorContext::new("load").with_user_id(&self.user));
            e
        })?;

        log::info!(
            "Loaded {} estimate and {} actual months for user {}",
            state.estimados.len(),
            state.reales.len(),
            self.user
        );
        self.state = state;
        self.loaded = true;
        Ok(())
    }

    /// Discard the in-memory document and load it again
    pub async fn reload(&mut self) -> CoreResult<()> {
        self.load().await
    }

    /// The loaded document
    pub fn state(&self) -> CoreResult<&UserFinancialState> {
        if self.loaded {
            Ok(&self.state)
        } else {
            Err(CoreError::NotLoaded)
        }
    }

    // ==================== Data Entry ====================

    /// Replace a month's estimate and persist the whole document
    pub async fn save_estimate(&mut self, mes: &MonthKey, record: EstimateRecord) -> CoreResult<()> {
        self.reject_invalid(record.validate(), "save_estimate", mes)?;
        let mut next = self.state()?.clone();
        next.replace_estimate(mes, record);
        self.persist(next, "save_estimate", mes).await
    }

    /// Replace a month's actual record and persist the whole document
    pub async fn save_actual(&mut self, mes: &MonthKey, record: ActualRecord) -> CoreResult<()> {
        self.reject_invalid(record.validate(), "save_actual", mes)?;
        let mut next = self.state()?.clone();
        next.replace_actual(mes, record);
        self.persist(next, "save_actual", mes).await
    }

    fn reject_invalid(&self, checked: CoreResult<()>, operation: &str, mes: &MonthKey) -> CoreResult<()> {
        if let Err(e) = &checked {
            DefaultErrorLogger.log_warning(
                &e.to_string(),
                &ErrorContext::new(operation)
                    .with_user_id(&self.user)
                    .with_data("month", serde_json::json!(mes.as_str())),
            );
        }
        checked
    }

    /// Only a successful save replaces the in-memory document
    async fn persist(&mut self, next: UserFinancialState, operation: &str, mes: &MonthKey) -> CoreResult<()> {
        if let Err(e) = self.store.save(&self.user, &next).await {
            DefaultErrorLogger.log_error(
                &e,
                &ErrorContext::new(operation)
                    .with_user_id(&self.user)
                    .with_data("month", serde_json::json!(mes.as_str())),
            );
            return Err(e);
        }

        log::info!("Saved {} for {} (user {})", operation, mes, self.user);
        self.state = next;
        Ok(())
    }

    /// Estimate for a month, if one was saved
    pub fn estimate(&self, mes: &MonthKey) -> CoreResult<Option<EstimateRecord>> {
        Ok(self.state()?.estimate(mes).cloned())
    }

    /// Actual record to edit for a month, seeded from the estimate when new
    pub fn actual_for_edit(&self, mes: &MonthKey) -> CoreResult<ActualRecord> {
        Ok(self.state()?.actual_for_edit(mes))
    }

    // ==================== Month Selection ====================

    /// Every month with data, ascending
    pub fn months(&self) -> CoreResult<Vec<MonthKey>> {
        Ok(available_months(self.state()?))
    }

    pub fn selection(&self) -> MonthSelection {
        self.selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_selection(&self, selection: MonthSelection) {
        *self.selection.write().unwrap_or_else(PoisonError::into_inner) = selection;
    }

    /// Change the selected month, keeping the range
    pub fn select_month(&self, mes: MonthKey) {
        self.selection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .selected = mes;
    }

    /// Change the range, keeping the selected month
    pub fn set_range(&self, from: Option<MonthKey>, to: Option<MonthKey>) {
        let mut selection = self.selection.write().unwrap_or_else(PoisonError::into_inner);
        *selection = selection.clone().with_range(from, to);
    }

    /// Months with data inside the selected range, ascending
    pub fn selected_months(&self) -> CoreResult<Vec<MonthKey>> {
        let state = self.state()?;
        Ok(self.selection().months_in(state))
    }

    // ==================== Reports ====================

    /// Single-month report
    pub fn month_report(&self, mes: &MonthKey) -> CoreResult<MonthReport> {
        let state = self.state()?;
        log::debug!("Building month report for {}", mes);
        Ok(aggregate::month_report(
            mes,
            state.estimate(mes),
            state.actual(mes),
            self.config.reports.near_limit_threshold,
        ))
    }

    /// Report for the currently selected month
    pub fn selected_month_report(&self) -> CoreResult<MonthReport> {
        let mes = self.selection().selected;
        self.month_report(&mes)
    }

    /// The configured number of largest deviations for a month
    pub fn largest_deviations(&self, mes: &MonthKey) -> CoreResult<Vec<ConceptDeviation>> {
        let state = self.state()?;
        let deviations = aggregate::concept_deviations(state.estimate(mes), state.actual(mes));
        Ok(aggregate::largest_deviations(&deviations, self.config.reports.top_deviations).to_vec())
    }

    /// Cumulative investment series over the selected months
    pub fn investment_series(&self) -> CoreResult<Vec<InvestmentPoint>> {
        let state = self.state()?;
        let months = self.selection().months_in(state);
        log::debug!("Building investment series over {} months", months.len());
        Ok(aggregate::cumulative_investment_series(&months, &state.reales))
    }

    /// Historical summary over the selected months that have both records
    pub fn historical_summary(&self) -> CoreResult<HistoricalSummary> {
        let state = self.state()?;
        let months = self.selection().complete_months_in(state);
        log::debug!("Building historical summary over {} months", months.len());
        Ok(aggregate::historical_summary(&months, state))
    }

    /// Export sheets over the selected months
    pub fn export_workbook(&self) -> CoreResult<Workbook> {
        let state = self.state()?;
        let months = self.selection().months_in(state);
        Ok(export::export_workbook(state, &months))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct TestStore {
        documents: Mutex<HashMap<String, UserFinancialState>>,
        fail_saves: bool,
    }

    #[async_trait]
    impl StateStore for TestStore {
        async fn load(&self, user: &str) -> CoreResult<UserFinancialState> {
            Ok(self.documents.lock().unwrap().get(user).cloned().unwrap_or_default())
        }

        async fn save(&self, user: &str, state: &UserFinancialState) -> CoreResult<()> {
            if self.fail_saves {
                return Err(CoreError::StoreError { message: "offline".to_string() });
            }
            self.documents.lock().unwrap().insert(user.to_string(), state.clone());
            Ok(())
        }
    }

    fn month(key: &str) -> MonthKey {
        key.parse().unwrap()
    }

    fn estimate() -> EstimateRecord {
        EstimateRecord {
            ingreso: 100000.0,
            inversion: 10000.0,
            conceptos: vec![
                EstimateConcept::new("Comida", 30000.0),
                EstimateConcept::new("Luz", 5000.0),
            ],
        }
    }

    async fn loaded(store: Arc<TestStore>) -> Finances {
        let mut finances = Finances::new(Config::default(), store);
        finances.load().await.unwrap();
        finances
    }

    #[tokio::test]
    async fn test_reports_require_load() {
        let finances = Finances::new(Config::default(), Arc::new(TestStore::default()));
        assert!(!finances.is_loaded());
        assert!(matches!(finances.months(), Err(CoreError::NotLoaded)));
        assert!(matches!(
            finances.month_report(&month("2024-03")),
            Err(CoreError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_first_load_is_empty() {
        let finances = loaded(Arc::new(TestStore::default())).await;
        assert!(finances.state().unwrap().is_empty());
        assert!(finances.months().unwrap().is_empty());
        assert_eq!(finances.user(), "default");
    }

    #[tokio::test]
    async fn test_save_estimate_persists_whole_document() {
        let store = Arc::new(TestStore::default());
        let mut finances = loaded(store.clone()).await;

        finances.save_estimate(&month("2024-03"), estimate()).await.unwrap();

        let stored = store.documents.lock().unwrap().get("default").cloned().unwrap();
        assert_eq!(stored.estimados.len(), 1);
        assert_eq!(finances.estimate(&month("2024-03")).unwrap(), Some(estimate()));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_state() {
        let store = Arc::new(TestStore {
            fail_saves: true,
            ..TestStore::default()
        });
        let mut finances = loaded(store).await;

        let result = finances.save_estimate(&month("2024-03"), estimate()).await;
        assert!(matches!(result, Err(CoreError::StoreError { .. })));
        assert!(finances.state().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_concepts_are_not_saved() {
        let store = Arc::new(TestStore::default());
        let mut finances = loaded(store.clone()).await;
        let mut record = estimate();
        record.conceptos.push(EstimateConcept::new("Comida", 1.0));

        let result = finances.save_estimate(&month("2024-03"), record).await;
        assert!(matches!(result, Err(CoreError::ValidationError { .. })));
        assert!(finances.state().unwrap().is_empty());
        assert!(store.documents.lock().unwrap().is_empty());

        let actual = ActualRecord {
            conceptos: vec![ActualConcept::simple("", 10.0)],
            ..ActualRecord::default()
        };
        let result = finances.save_actual(&month("2024-03"), actual).await;
        assert!(matches!(result, Err(CoreError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_actual_snapshot_is_taken_once() {
        let mut finances = loaded(Arc::new(TestStore::default())).await;
        let mes = month("2024-03");
        finances.save_estimate(&mes, estimate()).await.unwrap();

        let draft = finances.actual_for_edit(&mes).unwrap();
        let names: Vec<&str> = draft.conceptos.iter().map(|c| c.nombre.as_str()).collect();
        assert_eq!(names, vec!["Comida", "Luz"]);
        finances.save_actual(&mes, draft).await.unwrap();

        let mut changed = estimate();
        changed.conceptos.push(EstimateConcept::new("Gas", 2000.0));
        finances.save_estimate(&mes, changed).await.unwrap();

        assert_eq!(finances.actual_for_edit(&mes).unwrap().conceptos.len(), 2);
    }

    #[tokio::test]
    async fn test_month_report_through_facade() {
        let mut finances = loaded(Arc::new(TestStore::default())).await;
        let mes = month("2024-03");
        finances.save_estimate(&mes, estimate()).await.unwrap();

        let report = finances.month_report(&mes).unwrap();
        assert_eq!(report.totales.ahorro_estimado, 55000.0);
        assert_eq!(report.totales.ahorro_real, 0.0);
        assert_eq!(report.desvios[0].nombre, "Comida");
        assert_eq!(finances.largest_deviations(&mes).unwrap().len(), 2);

        finances.select_month(mes.clone());
        assert_eq!(finances.selected_month_report().unwrap(), report);
    }

    #[tokio::test]
    async fn test_selection_drives_cross_month_reports() {
        let mut finances = loaded(Arc::new(TestStore::default())).await;
        for (key, inversion) in [("2024-01", 1000.0), ("2024-02", 500.0), ("2024-03", 250.0)] {
            let record = ActualRecord {
                inversion,
                ..ActualRecord::default()
            };
            finances.save_estimate(&month(key), estimate()).await.unwrap();
            finances.save_actual(&month(key), record).await.unwrap();
        }

        assert_eq!(finances.investment_series().unwrap().len(), 3);

        finances.set_range(Some(month("2024-02")), None);
        let series = finances.investment_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].capital_aportado, 750.0);
        assert_eq!(finances.historical_summary().unwrap().meses.len(), 2);
        assert_eq!(finances.selected_months().unwrap(), vec![month("2024-02"), month("2024-03")]);

        let workbook = finances.export_workbook().unwrap();
        let resumen = workbook.sheet(export::SHEET_RESUMEN).unwrap();
        // two months plus the totals row
        assert_eq!(resumen.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_history_skips_months_without_actuals() {
        let mut finances = loaded(Arc::new(TestStore::default())).await;
        let complete = month("2024-01");
        finances.save_estimate(&complete, EstimateRecord::default()).await.unwrap();
        let actual = ActualRecord {
            ingreso: 1000.0,
            ..ActualRecord::default()
        };
        finances.save_actual(&complete, actual).await.unwrap();
        finances.save_estimate(&month("2024-02"), estimate()).await.unwrap();

        let summary = finances.historical_summary().unwrap();
        assert_eq!(summary.meses.len(), 1);
        assert_eq!(summary.meses[0].mes, complete);
        assert_eq!(summary.ahorro_promedio, 1000.0);
        assert_eq!(summary.porcentaje_superavit, 100.0);

        // budgeted-only months still show up in the month list
        assert_eq!(finances.selected_months().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_changes() {
        let store = Arc::new(TestStore::default());
        let mut finances = loaded(store.clone()).await;

        let mut external = UserFinancialState::default();
        external.replace_estimate(&month("2024-05"), estimate());
        store.documents.lock().unwrap().insert("default".to_string(), external);

        finances.reload().await.unwrap();
        assert_eq!(finances.months().unwrap(), vec![month("2024-05")]);
    }
}
