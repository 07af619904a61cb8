use serde::{Deserialize, Serialize};

use crate::console::form::FieldKind;

// ================= admin.toml =================
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_alert_ttl")]
    pub alert_ttl_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Fields of the config form, in display order.
    #[serde(default = "default_config_fields")]
    pub config_fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self { name: name.to_string(), kind }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval(),
            alert_ttl_secs: default_alert_ttl(),
            request_timeout_secs: default_request_timeout(),
            config_fields: default_config_fields(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_alert_ttl() -> u64 {
    3
}

// test-crawl and manual-push run the whole pipeline server side
fn default_request_timeout() -> u64 {
    120
}

fn default_config_fields() -> Vec<FieldSpec> {
    use FieldKind::*;
    vec![
        FieldSpec::new("crawler.request_interval", Number),
        FieldSpec::new("crawler.enable_crawler", Checkbox),
        FieldSpec::new("crawler.use_proxy", Checkbox),
        FieldSpec::new("crawler.default_proxy", Text),
        FieldSpec::new("report.mode", Text),
        FieldSpec::new("report.rank_threshold", Number),
        FieldSpec::new("notification.enable_notification", Checkbox),
        FieldSpec::new("notification.message_batch_size", Number),
        FieldSpec::new("notification.batch_send_interval", Number),
        FieldSpec::new("notification.push_window.enabled", Checkbox),
        FieldSpec::new("notification.push_window.time_range.start", Text),
        FieldSpec::new("notification.push_window.time_range.end", Text),
        FieldSpec::new("notification.push_window.once_per_day", Checkbox),
        FieldSpec::new("notification.webhooks.feishu_url", Text),
        FieldSpec::new("notification.webhooks.dingtalk_url", Text),
        FieldSpec::new("notification.webhooks.wework_url", Text),
        FieldSpec::new("notification.webhooks.telegram_bot_token", Text),
        FieldSpec::new("notification.webhooks.telegram_chat_id", Text),
    ]
}
