use serde_json::Value;

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport, encode};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_area_history(&self, area_id: &AreaId, hours: Option<u32>) -> Result<AreaHistory, ClientError> {
        let mut req = ApiRequest::get(["areas", area_id.as_str(), "history"]);
        if let Some(hours) = hours {
            req = req.query("hours", hours);
        }
        self.fetch(req)
    }

    pub fn get_history_config(&self) -> Result<HistoryConfig, ClientError> {
        self.fetch(ApiRequest::get(["history", "config"]))
    }

    pub fn set_history_config(&self, config: &HistoryConfig) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["history", "config"]).json(encode(config)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::SmartHeatingClient;
    use crate::client::transport::testing::RecordingTransport;

    #[test]
    fn history_hours_query() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.transport().respond(
            200,
            r#"{"area_id":"office","entries":[{"timestamp":"2026-10-18T06:00:00Z","current_temperature":19.5,"state":"heating"}]}"#,
        );
        let history = client.get_area_history(&"office".into(), Some(48)).unwrap();
        assert_eq!(history.entries.len(), 1);
        let req = client.transport().last();
        assert_eq!(req.path(), "/areas/office/history");
        assert_eq!(req.query, vec![("hours".to_string(), "48".to_string())]);
    }
}
