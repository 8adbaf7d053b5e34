//! Engine facade tying the store to the aggregation steps.

use forecast_store::{ForecastStore, NearestReach, ReturnPeriods};
use hydro_common::{Cms, DateRange, FlowTable, ForecastDate, HydroResult, IssueDate};
use tracing::{debug, info};

use crate::selector::MemberSelection;
use crate::warnings::{self, ExceedanceSource, ReturnPeriodComparator, WarningTable};
use crate::{anomaly, ensembles, records, stats};

/// Stateless request executor. Shareable across threads; every call opens
/// its own store handles.
pub struct ForecastEngine {
    store: ForecastStore,
    exceedance: Box<dyn ExceedanceSource>,
}

impl ForecastEngine {
    pub fn new(store: ForecastStore) -> Self {
        Self {
            store,
            exceedance: Box::new(ReturnPeriodComparator::default()),
        }
    }

    /// Replace the warning collaborator.
    pub fn with_exceedance_source<S>(mut self, source: S) -> Self
    where
        S: ExceedanceSource + 'static,
    {
        self.exceedance = Box::new(source);
        self
    }

    pub fn store(&self) -> &ForecastStore {
        &self.store
    }

    /// Resolve an issue date for a reach's region.
    pub fn resolve_issue(&self, reach_id: u64, issue: IssueDate) -> HydroResult<ForecastDate> {
        let region = self.store.region_for(reach_id)?;
        Ok(self.store.resolve_issue(Some(region), issue)?)
    }

    /// Seven-series ensemble statistics.
    pub fn forecast_stats(&self, reach_id: u64, issue: IssueDate) -> HydroResult<FlowTable<Cms>> {
        let array = self.store.open_forecast(reach_id, issue)?;
        let table = stats::aggregate(&array)?;
        info!(reach_id, issue = %array.issue(), rows = table.len(), "Computed forecast stats");
        Ok(table)
    }

    /// Pool mean only.
    pub fn forecast(&self, reach_id: u64, issue: IssueDate) -> HydroResult<FlowTable<Cms>> {
        let array = self.store.open_forecast(reach_id, issue)?;
        let table = stats::mean_forecast(&array)?;
        info!(reach_id, issue = %array.issue(), rows = table.len(), "Computed mean forecast");
        Ok(table)
    }

    /// Per-member columns filtered by a selection.
    pub fn forecast_ensembles(
        &self,
        reach_id: u64,
        issue: IssueDate,
        selection: &MemberSelection,
    ) -> HydroResult<FlowTable<Cms>> {
        let array = self.store.open_forecast(reach_id, issue)?;
        let table = ensembles::ensemble_table(&array, self.store.high_res_label(), selection)?;
        info!(
            reach_id,
            issue = %array.issue(),
            members = table.series().len(),
            "Selected forecast ensembles"
        );
        Ok(table)
    }

    /// Forecast records inside an inclusive date window.
    pub fn forecast_records(&self, reach_id: u64, range: &DateRange) -> HydroResult<FlowTable<Cms>> {
        let all = self.store.read_records(reach_id)?;
        let table = records::window(&all, range)?;
        info!(
            reach_id,
            start = %range.start,
            end = %range.end,
            rows = table.len(),
            "Windowed forecast records"
        );
        Ok(table)
    }

    /// Mean forecast against day-of-year averages.
    pub fn forecast_anomalies(&self, reach_id: u64, issue: IssueDate) -> HydroResult<FlowTable<Cms>> {
        let mean = self.forecast(reach_id, issue)?;
        let baseline = self.store.read_daily_averages(reach_id)?;
        let table = anomaly::anomalies(&mean, &baseline)?;
        debug!(reach_id, forecast_rows = mean.len(), joined_rows = table.len(), "Computed anomalies");
        Ok(table)
    }

    /// Flagged reaches across every region with the issue.
    pub fn forecast_warnings(&self, issue: IssueDate) -> HydroResult<WarningTable> {
        let issue = self.store.resolve_issue(None, issue)?;
        let table = warnings::scan(&self.store, self.exceedance.as_ref(), issue)?;
        info!(issue = %issue, flagged = table.len(), "Scanned forecast warnings");
        Ok(table)
    }

    pub fn return_periods(&self, reach_id: u64) -> HydroResult<ReturnPeriods> {
        Ok(self.store.read_return_periods(reach_id)?)
    }

    pub fn available_dates(&self, region: Option<&str>) -> HydroResult<Vec<ForecastDate>> {
        Ok(self.store.available_dates(region)?)
    }

    pub fn nearest_reach(&self, lat: f64, lon: f64) -> HydroResult<NearestReach> {
        Ok(self.store.nearest_reach(lat, lon)?)
    }
}
