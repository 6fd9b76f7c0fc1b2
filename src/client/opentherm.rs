use serde_json::{Value, json};

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_opentherm_logs(&self, limit: Option<u32>) -> Result<OpenThermLogs, ClientError> {
        let mut req = ApiRequest::get(["opentherm", "logs"]);
        if let Some(limit) = limit {
            req = req.query("limit", limit);
        }
        self.fetch(req)
    }

    pub fn clear_opentherm_logs(&self) -> Result<Value, ClientError> {
        self.command(ApiRequest::delete(["opentherm", "logs"]))
    }

    pub fn get_opentherm_capabilities(&self) -> Result<OpenThermCapabilities, ClientError> {
        self.fetch(ApiRequest::get(["opentherm", "capabilities"]))
    }

    pub fn discover_opentherm_capabilities(&self) -> Result<OpenThermCapabilities, ClientError> {
        self.fetch(ApiRequest::post(["opentherm", "capabilities", "discover"]))
    }

    pub fn get_opentherm_gateway(&self) -> Result<OpenThermGateway, ClientError> {
        self.fetch(ApiRequest::get(["opentherm_gateway"]))
    }

    pub fn set_opentherm_gateway(&self, gateway_id: &str) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["opentherm_gateway"]).json(json!({ "gateway_id": gateway_id })))
    }

    pub fn list_opentherm_gateways(&self) -> Result<Vec<OpenThermGatewayEntry>, ClientError> {
        let resp: OpenThermGatewayList = self.fetch(ApiRequest::get(["opentherm", "gateways"]))?;
        Ok(resp.gateways)
    }

    pub fn calibrate_opentherm(&self) -> Result<CalibrationResult, ClientError> {
        self.fetch(ApiRequest::post(["opentherm", "calibrate"]))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::SmartHeatingClient;
    use crate::client::transport::testing::RecordingTransport;
    use http::Method;

    #[test]
    fn logs_limit_is_optional() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.get_opentherm_logs(None).unwrap();
        assert!(client.transport().last().query.is_empty());

        client.transport().respond(
            200,
            r#"{"logs":[{"timestamp":"2026-10-18T06:00:00Z","event_type":"modulation","data":{"level":42}}],"count":1}"#,
        );
        let logs = client.get_opentherm_logs(Some(25)).unwrap();
        assert_eq!(logs.logs[0].event_type, "modulation");
        assert_eq!(client.transport().last().query, vec![("limit".to_string(), "25".to_string())]);
    }

    #[test]
    fn gateway_and_calibration_paths() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.discover_opentherm_capabilities().unwrap();
        assert_eq!(client.transport().last().path(), "/opentherm/capabilities/discover");
        assert_eq!(client.transport().last().method, Method::POST);

        client.transport().respond(200, r#"{"gateways":[{"gateway_id":"otgw","title":"Boiler"}]}"#);
        let gateways = client.list_opentherm_gateways().unwrap();
        assert_eq!(gateways[0].gateway_id, "otgw");

        client.set_opentherm_gateway("otgw").unwrap();
        assert_eq!(client.transport().last().path(), "/opentherm_gateway");

        client.transport().respond(200, r#"{"success":true,"opv":0.8}"#);
        assert_eq!(client.calibrate_opentherm().unwrap().opv, Some(0.8));
        assert_eq!(client.transport().last().path(), "/opentherm/calibrate");

        client.clear_opentherm_logs().unwrap();
        assert_eq!(client.transport().last().method, Method::DELETE);
    }
}
