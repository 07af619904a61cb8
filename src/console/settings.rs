use std::time::Duration;

use serde_json::Value;

use crate::api::{ApiClient, ApiError};
use crate::config::FieldSpec;
use crate::console::alert::AlertSlot;
use crate::console::form::Form;

/// The config tab: a form bound to `/api/config`.
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    pub form: Form,
    pub alert: AlertSlot,
}

impl SettingsPanel {
    pub fn new(fields: &[FieldSpec], alert_ttl: Duration) -> Self {
        Self {
            form: Form::from_specs(fields),
            alert: AlertSlot::new(alert_ttl),
        }
    }

    pub fn apply(&mut self, result: Result<Value, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(data) => {
                self.form.populate(&data);
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("Failed to load config: {e}"));
                Err(e)
            }
        }
    }

    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let result = api.config().await;
        self.apply(result)
    }

    /// Posts the serialized form. A failure leaves the form as typed.
    pub async fn save(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        let body = self.form.serialize();
        match api.save_config(&body).await {
            Ok(_) => {
                self.alert.success("Config saved");
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("Failed to save config: {e}"));
                Err(e)
            }
        }
    }
}
