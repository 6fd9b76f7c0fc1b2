use serde_json::{Value, json};

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_areas(&self) -> Result<Vec<Area>, ClientError> {
        let resp: AreasResponse = self.fetch(ApiRequest::get(["areas"]))?;
        Ok(resp.areas)
    }

    pub fn get_area(&self, area_id: &AreaId) -> Result<Area, ClientError> {
        self.fetch(ApiRequest::get(["areas", area_id.as_str()]))
    }

    pub fn get_devices(&self) -> Result<Vec<Device>, ClientError> {
        let resp: DevicesResponse = self.fetch(ApiRequest::get(["devices"]))?;
        Ok(resp.devices)
    }

    pub fn get_status(&self) -> Result<SystemStatus, ClientError> {
        self.fetch(ApiRequest::get(["status"]))
    }

    pub fn set_area_temperature(&self, area_id: &AreaId, temperature: f64) -> Result<Value, ClientError> {
        self.command(
            ApiRequest::post(["areas", area_id.as_str(), "temperature"]).json(json!({ "temperature": temperature })),
        )
    }

    pub fn enable_area(&self, area_id: &AreaId) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["areas", area_id.as_str(), "enable"]))
    }

    pub fn disable_area(&self, area_id: &AreaId) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["areas", area_id.as_str(), "disable"]))
    }

    pub fn hide_area(&self, area_id: &AreaId) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["areas", area_id.as_str(), "hide"]))
    }

    pub fn unhide_area(&self, area_id: &AreaId) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["areas", area_id.as_str(), "unhide"]))
    }

    pub fn set_manual_override(&self, area_id: &AreaId, enabled: bool) -> Result<Value, ClientError> {
        self.command(
            ApiRequest::post(["areas", area_id.as_str(), "manual_override"]).json(json!({ "enabled": enabled })),
        )
    }

    /// `duration` is in minutes.
    pub fn set_boost_mode(&self, area_id: &AreaId, temperature: f64, duration: u32) -> Result<Value, ClientError> {
        self.command(
            ApiRequest::post(["areas", area_id.as_str(), "boost"])
                .json(json!({ "temperature": temperature, "duration": duration })),
        )
    }

    pub fn cancel_boost(&self, area_id: &AreaId) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["areas", area_id.as_str(), "cancel_boost"]))
    }

    pub fn set_hvac_mode(&self, area_id: &AreaId, mode: HvacMode) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["areas", area_id.as_str(), "hvac_mode"]).json(json!({ "hvac_mode": mode })))
    }

    pub fn set_heating_type(
        &self,
        area_id: &AreaId,
        heating_type: HeatingType,
        custom_overhead_temp: Option<f64>,
    ) -> Result<Value, ClientError> {
        let mut body = json!({ "heating_type": heating_type });
        if let Some(overhead) = custom_overhead_temp {
            body["custom_overhead_temp"] = json!(overhead);
        }
        self.command(ApiRequest::post(["areas", area_id.as_str(), "heating_type"]).json(body))
    }

    pub fn set_preset_mode(&self, area_id: &AreaId, mode: PresetMode) -> Result<Value, ClientError> {
        self.command(
            ApiRequest::post(["areas", area_id.as_str(), "preset_mode"]).json(json!({ "preset_mode": mode })),
        )
    }

    /// Persist one preset temperature for an area (`{"comfort_temp": 21.0}`).
    pub fn set_area_preset_temperature(
        &self,
        area_id: &AreaId,
        preset: PresetMode,
        temperature: f64,
    ) -> Result<Value, ClientError> {
        let key = preset
            .temperature_key()
            .ok_or_else(|| ClientError::InvalidArgument(format!("preset {:?} has no temperature setting", preset)))?;
        let mut body = json!({});
        body[key] = json!(temperature);
        self.command(ApiRequest::post(["areas", area_id.as_str(), "preset_config"]).json(body))
    }

    pub fn add_device(&self, area_id: &AreaId, device_id: &str, device_type: &str) -> Result<Value, ClientError> {
        self.command(
            ApiRequest::post(["areas", area_id.as_str(), "devices"])
                .json(json!({ "device_id": device_id, "device_type": device_type })),
        )
    }

    pub fn remove_device(&self, area_id: &AreaId, device_id: &str) -> Result<Value, ClientError> {
        self.command(ApiRequest::delete(["areas", area_id.as_str(), "devices", device_id]))
    }

    pub fn add_schedule(&self, area_id: &AreaId, schedule: &Schedule) -> Result<Value, ClientError> {
        let body = super::encode(schedule)?;
        self.command(ApiRequest::post(["areas", area_id.as_str(), "schedule"]).json(body))
    }

    pub fn remove_schedule(&self, area_id: &AreaId, schedule_id: &str) -> Result<Value, ClientError> {
        self.command(ApiRequest::delete(["areas", area_id.as_str(), "schedule", schedule_id]))
    }

    /// Day lists are forwarded verbatim; when absent the keys are left out entirely.
    pub fn copy_schedule(
        &self,
        source: &AreaId,
        target: &AreaId,
        source_days: Option<&[String]>,
        target_days: Option<&[String]>,
    ) -> Result<Value, ClientError> {
        let mut body = json!({
            "source_area_id": source,
            "target_area_id": target,
        });
        if let Some(days) = source_days {
            body["source_days"] = json!(days);
        }
        if let Some(days) = target_days {
            body["target_days"] = json!(days);
        }
        self.command(ApiRequest::post(["copy_schedule"]).json(body))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::SmartHeatingClient;
    use crate::client::transport::testing::RecordingTransport;
    use crate::models::smart_heating::*;
    use http::Method;
    use serde_json::json;

    fn client() -> SmartHeatingClient<RecordingTransport> {
        SmartHeatingClient::with_transport(RecordingTransport::new())
    }

    #[test]
    fn get_areas_unwraps_envelope() {
        let client = client();
        let fixture = std::fs::read_to_string("tests/data/areas.json").expect("fixture present");
        client.transport().respond(200, &fixture);
        let areas = client.get_areas().unwrap();
        assert_eq!(areas.len(), 3);
        let req = client.transport().last();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path(), "/areas");
    }

    #[test]
    fn set_temperature_posts_value() {
        let client = client();
        client.set_area_temperature(&"living_room".into(), 21.5).unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path(), "/areas/living_room/temperature");
        assert_eq!(req.body, Some(json!({ "temperature": 21.5 })));
    }

    #[test]
    fn copy_schedule_without_days_omits_keys() {
        let client = client();
        client.copy_schedule(&"a1".into(), &"a2".into(), None, None).unwrap();
        let req = client.transport().last();
        assert_eq!(req.path(), "/copy_schedule");
        assert_eq!(req.body, Some(json!({ "source_area_id": "a1", "target_area_id": "a2" })));
    }

    #[test]
    fn copy_schedule_with_days_includes_them_verbatim() {
        let client = client();
        let source = vec!["Monday".to_string(), "tue".to_string()];
        let target = vec!["saturday".to_string()];
        client
            .copy_schedule(&"a1".into(), &"a2".into(), Some(source.as_slice()), Some(target.as_slice()))
            .unwrap();
        let body = client.transport().last().body.unwrap();
        assert_eq!(body["source_days"], json!(["Monday", "tue"]));
        assert_eq!(body["target_days"], json!(["saturday"]));
    }

    #[test]
    fn heating_type_overhead_is_optional() {
        let client = client();
        client
            .set_heating_type(&"a1".into(), HeatingType::FloorHeating, Some(42.0))
            .unwrap();
        let body = client.transport().last().body.unwrap();
        assert_eq!(body, json!({ "heating_type": "floor_heating", "custom_overhead_temp": 42.0 }));

        client.set_heating_type(&"a1".into(), HeatingType::Radiator, None).unwrap();
        let body = client.transport().last().body.unwrap();
        assert_eq!(body, json!({ "heating_type": "radiator" }));
        assert!(body.get("custom_overhead_temp").is_none());
    }

    #[test]
    fn area_commands_hit_their_paths() {
        let client = client();
        let id: AreaId = "kitchen".into();
        client.hide_area(&id).unwrap();
        client.unhide_area(&id).unwrap();
        client.set_manual_override(&id, false).unwrap();
        client.set_boost_mode(&id, 24.0, 30).unwrap();
        client.cancel_boost(&id).unwrap();
        client.set_hvac_mode(&id, HvacMode::HeatCool).unwrap();
        client.set_preset_mode(&id, PresetMode::None_).unwrap();
        client.remove_device(&id, "climate.trv").unwrap();

        let paths: Vec<String> = client.transport().requests().iter().map(|r| r.path()).collect();
        assert_eq!(
            paths,
            vec![
                "/areas/kitchen/hide",
                "/areas/kitchen/unhide",
                "/areas/kitchen/manual_override",
                "/areas/kitchen/boost",
                "/areas/kitchen/cancel_boost",
                "/areas/kitchen/hvac_mode",
                "/areas/kitchen/preset_mode",
                "/areas/kitchen/devices/climate.trv",
            ]
        );
        let reqs = client.transport().requests();
        assert_eq!(reqs[3].body, Some(json!({ "temperature": 24.0, "duration": 30 })));
        assert_eq!(reqs[5].body, Some(json!({ "hvac_mode": "heat_cool" })));
        assert_eq!(reqs[6].body, Some(json!({ "preset_mode": "none" })));
        assert_eq!(reqs[7].method, Method::DELETE);
    }

    #[test]
    fn preset_temperature_uses_preset_key() {
        let client = client();
        client
            .set_area_preset_temperature(&"a1".into(), PresetMode::Eco, 17.5)
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.path(), "/areas/a1/preset_config");
        assert_eq!(req.body, Some(json!({ "eco_temp": 17.5 })));
        assert!(client.set_area_preset_temperature(&"a1".into(), PresetMode::None_, 17.5).is_err());
    }
}
