use super::{ApiRequest, ClientError, SmartHeatingClient, Transport};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_advanced_metrics(&self, days: u32) -> Result<AdvancedMetrics, ClientError> {
        self.fetch(ApiRequest::get(["metrics", "advanced"]).query("days", days))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::SmartHeatingClient;
    use crate::client::transport::testing::RecordingTransport;

    #[test]
    fn metrics_days_query() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.get_advanced_metrics(7).unwrap();
        let req = client.transport().last();
        assert_eq!(req.path(), "/metrics/advanced");
        assert_eq!(req.query, vec![("days".to_string(), "7".to_string())]);
    }
}
