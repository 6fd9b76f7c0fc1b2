use serde_json::Value;

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport, encode};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_config(&self) -> Result<GlobalConfig, ClientError> {
        self.fetch(ApiRequest::get(["config"]))
    }

    pub fn set_config(&self, config: &GlobalConfig) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["config"]).json(encode(config)?))
    }

    pub fn get_advanced_control(&self) -> Result<AdvancedControl, ClientError> {
        self.fetch(ApiRequest::get(["config", "advanced_control"]))
    }

    pub fn set_advanced_control(&self, settings: &AdvancedControl) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["config", "advanced_control"]).json(encode(settings)?))
    }

    pub fn get_frost_protection(&self) -> Result<FrostProtection, ClientError> {
        self.fetch(ApiRequest::get(["frost_protection"]))
    }

    pub fn set_frost_protection(&self, settings: &FrostProtection) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["frost_protection"]).json(encode(settings)?))
    }

    pub fn get_entity_state(&self, entity_id: &str) -> Result<EntityState, ClientError> {
        self.fetch(ApiRequest::get(["entity_state", entity_id]))
    }

    pub fn get_binary_sensor_entities(&self) -> Result<Vec<EntityState>, ClientError> {
        let resp: EntityList = self.fetch(ApiRequest::get(["entities", "binary_sensor"]))?;
        Ok(resp.entities)
    }

    pub fn get_weather_entities(&self) -> Result<Vec<EntityState>, ClientError> {
        let resp: EntityList = self.fetch(ApiRequest::get(["entities", "weather"]))?;
        Ok(resp.entities)
    }

    pub fn set_global_presets(&self, presets: &GlobalPresets) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["global_presets"]).json(encode(presets)?))
    }
}
