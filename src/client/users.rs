use serde_json::Value;

use super::{ApiRequest, ClientError, SmartHeatingClient, Transport, encode};
use crate::models::smart_heating::*;

impl<T: Transport> SmartHeatingClient<T> {
    pub fn get_users(&self) -> Result<UsersResponse, ClientError> {
        self.fetch(ApiRequest::get(["users"]))
    }

    pub fn get_user(&self, user_id: &UserId) -> Result<User, ClientError> {
        self.fetch(ApiRequest::get(["users", user_id.0.as_str()]))
    }

    pub fn create_user(&self, user: &User) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["users"]).json(encode(user)?))
    }

    pub fn update_user(&self, user: &User) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["users", user.user_id.0.as_str()]).json(encode(user)?))
    }

    pub fn delete_user(&self, user_id: &UserId) -> Result<Value, ClientError> {
        self.command(ApiRequest::delete(["users", user_id.0.as_str()]))
    }

    pub fn set_user_settings(&self, settings: &UserSettings) -> Result<Value, ClientError> {
        self.command(ApiRequest::post(["users", "settings"]).json(encode(settings)?))
    }

    pub fn get_presence(&self) -> Result<PresenceState, ClientError> {
        self.fetch(ApiRequest::get(["users", "presence"]))
    }

    /// Preset preferences currently in force, merged across the users at home.
    pub fn get_active_preferences(&self) -> Result<Value, ClientError> {
        self.fetch(ApiRequest::get(["users", "preferences"]))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::SmartHeatingClient;
    use crate::client::transport::testing::RecordingTransport;
    use crate::models::smart_heating::*;
    use http::Method;
    use std::collections::BTreeMap;

    fn alice() -> User {
        User {
            user_id: UserId("alice".into()),
            name: "Alice".into(),
            person_entity: Some("person.alice".into()),
            areas: vec!["office".into()],
            preset_preferences: BTreeMap::from([("comfort".to_string(), 21.5)]),
            priority: 5,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn user_crud_paths() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.create_user(&alice()).unwrap();
        client.update_user(&alice()).unwrap();
        client.delete_user(&UserId("alice".into())).unwrap();

        let reqs = client.transport().requests();
        assert_eq!(reqs[0].path(), "/users");
        assert_eq!(reqs[0].method, Method::POST);
        assert_eq!(reqs[0].body.as_ref().unwrap()["person_entity"], "person.alice");
        assert_eq!(reqs[1].path(), "/users/alice");
        assert_eq!(reqs[2].method, Method::DELETE);
        assert_eq!(reqs[2].path(), "/users/alice");
    }

    #[test]
    fn users_listing_keyed_by_id() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.transport().respond(
            200,
            r#"{"users":{"bob":{"user_id":"bob","name":"Bob","areas":["kitchen"]}},"settings":{"multi_user_strategy":"priority"}}"#,
        );
        let resp = client.get_users().unwrap();
        assert_eq!(resp.users["bob"].areas, vec![AreaId::from("kitchen")]);
        assert_eq!(
            resp.settings.and_then(|s| s.multi_user_strategy).as_deref(),
            Some("priority")
        );
    }

    #[test]
    fn presence_and_preferences() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client
            .transport()
            .respond(200, r#"{"users_home":["alice"],"users_away":["bob"],"anyone_home":true}"#);
        let presence = client.get_presence().unwrap();
        assert!(presence.anyone_home);
        assert_eq!(client.transport().last().path(), "/users/presence");

        client.get_active_preferences().unwrap();
        assert_eq!(client.transport().last().path(), "/users/preferences");

        client.set_user_settings(&UserSettings::default()).unwrap();
        assert_eq!(client.transport().last().path(), "/users/settings");
    }
}
