use super::{ApiRequest, ClientError, SmartHeatingClient, Transport, encode};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    /// Efficiency report for one area; the period defaults to a week.
    pub fn get_efficiency_report(
        &self,
        area_id: &AreaId,
        period: Option<EfficiencyPeriod>,
    ) -> Result<EfficiencyReport, ClientError> {
        let period = period.unwrap_or_default();
        self.fetch(ApiRequest::get(["efficiency", "report", area_id.as_str()]).query("period", period.as_str()))
    }

    pub fn get_all_areas_efficiency(&self, period: Option<EfficiencyPeriod>) -> Result<AllAreasEfficiency, ClientError> {
        let period = period.unwrap_or_default();
        self.fetch(ApiRequest::get(["efficiency", "all_areas"]).query("period", period.as_str()))
    }

    pub fn get_comparison(&self, period: EfficiencyPeriod) -> Result<ComparisonReport, ClientError> {
        self.fetch(ApiRequest::get(["comparison", period.as_str()]))
    }

    pub fn get_custom_comparison(&self, ranges: &CustomComparison) -> Result<ComparisonReport, ClientError> {
        self.fetch(ApiRequest::post(["comparison", "custom"]).json(encode(ranges)?))
    }
}
