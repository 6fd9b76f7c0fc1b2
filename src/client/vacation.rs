use super::{ApiRequest, ClientError, SmartHeatingClient, Transport, encode};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_vacation_mode(&self) -> Result<VacationMode, ClientError> {
        self.fetch(ApiRequest::get(["vacation_mode"]))
    }

    pub fn enable_vacation_mode(&self, settings: &VacationMode) -> Result<VacationMode, ClientError> {
        self.fetch(ApiRequest::post(["vacation_mode"]).json(encode(settings)?))
    }

    pub fn disable_vacation_mode(&self) -> Result<VacationMode, ClientError> {
        self.fetch(ApiRequest::delete(["vacation_mode"]))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::SmartHeatingClient;
    use crate::client::transport::testing::RecordingTransport;
    use crate::models::smart_heating::*;
    use chrono::NaiveDate;
    use http::Method;

    #[test]
    fn vacation_lifecycle() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        let settings = VacationMode {
            enabled: true,
            start_date: NaiveDate::from_ymd_opt(2026, 12, 20),
            end_date: NaiveDate::from_ymd_opt(2027, 1, 3),
            preset_mode: Some(PresetMode::Away),
            ..Default::default()
        };
        client
            .transport()
            .respond(200, r#"{"enabled":true,"start_date":"2026-12-20","end_date":"2027-01-03"}"#);
        let state = client.enable_vacation_mode(&settings).unwrap();
        assert!(state.enabled);
        let req = client.transport().last();
        assert_eq!(req.method, Method::POST);
        let body = req.body.unwrap();
        assert_eq!(body["start_date"], "2026-12-20");
        assert_eq!(body["preset_mode"], "away");

        client.transport().respond(200, r#"{"enabled":false}"#);
        assert!(!client.disable_vacation_mode().unwrap().enabled);
        assert_eq!(client.transport().last().method, Method::DELETE);
        assert_eq!(client.transport().last().path(), "/vacation_mode");
    }
}
