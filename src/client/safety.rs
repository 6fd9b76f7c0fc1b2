use serde_json::Value;

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport, encode};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_safety_sensors(&self) -> Result<SafetyStatus, ClientError> {
        self.fetch(ApiRequest::get(["safety_sensor"]))
    }

    pub fn set_safety_sensor(&self, sensor: &SafetySensor) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["safety_sensor"]).json(encode(sensor)?))
    }

    pub fn remove_safety_sensor(&self, sensor_id: &str) -> Result<Value, ClientError> {
        self.command(ApiRequest::delete(["safety_sensor"]).query("sensor_id", sensor_id))
    }
}
