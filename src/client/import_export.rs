use serde_json::{Value, json};

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    /// Raw export document, exactly as the backend produced it.
    pub fn export_config(&self) -> Result<Vec<u8>, ClientError> {
        self.send(ApiRequest::get(["export"]))
    }

    pub fn import_config(&self, data: &Value, create_backup: bool) -> Result<ImportResult, ClientError> {
        self.fetch(ApiRequest::post(["import"]).json(json!({ "data": data, "create_backup": create_backup })))
    }

    pub fn validate_import(&self, data: &Value) -> Result<ValidationResult, ClientError> {
        self.fetch(ApiRequest::post(["validate"]).json(json!({ "data": data })))
    }

    pub fn list_backups(&self) -> Result<Vec<Backup>, ClientError> {
        let resp: BackupList = self.fetch(ApiRequest::get(["backups"]))?;
        Ok(resp.backups)
    }

    pub fn restore_backup(&self, filename: &str) -> Result<ImportResult, ClientError> {
        self.fetch(ApiRequest::post(["backups", filename, "restore"]))
    }
}
