use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::api::{ApiClient, ApiError, models::CrawlReport};
use crate::console::alert::AlertSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManualAction {
    TestCrawl,
    ManualPush,
}

impl ManualAction {
    fn label(self) -> &'static str {
        match self {
            ManualAction::TestCrawl => "Test crawl",
            ManualAction::ManualPush => "Manual push",
        }
    }

    fn pending(self) -> &'static str {
        match self {
            ManualAction::TestCrawl => "Running test crawl, please wait...",
            ManualAction::ManualPush => "Running manual push, please wait...",
        }
    }
}

impl fmt::Display for ManualAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Last finished action and what the backend answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub action: ManualAction,
    pub body: Value,
}

impl ActionResult {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }

    /// Crawl statistics, for test crawl answers that carry them.
    pub fn crawl_report(&self) -> Option<CrawlReport> {
        if self.action != ManualAction::TestCrawl {
            return None;
        }
        let data = self.body.get("data")?;
        serde_json::from_value(data.clone()).ok()
    }
}

#[derive(Debug, Clone)]
pub struct ManualPanel {
    pub result: Option<ActionResult>,
    pub alert: AlertSlot,
}

impl ManualPanel {
    pub fn new(alert_ttl: Duration) -> Self {
        Self { result: None, alert: AlertSlot::new(alert_ttl) }
    }

    pub fn begin(&mut self, action: ManualAction) {
        self.alert.info(action.pending());
    }

    pub fn finish(
        &mut self,
        action: ManualAction,
        outcome: Result<Value, ApiError>,
    ) -> Result<(), ApiError> {
        match outcome {
            Ok(body) => {
                self.alert.success(format!("{action} finished"));
                self.result = Some(ActionResult { action, body });
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("{action} failed: {e}"));
                Err(e)
            }
        }
    }

    /// Runs one action to completion. The panel stays mutably borrowed until
    /// the backend answers, so a second action cannot start meanwhile.
    pub async fn run(&mut self, action: ManualAction, api: &ApiClient) -> Result<(), ApiError> {
        self.begin(action);
        let outcome = match action {
            ManualAction::TestCrawl => api.test_crawl().await,
            ManualAction::ManualPush => api.manual_push().await,
        };
        self.finish(action, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_action_keeps_no_result() {
        let mut panel = ManualPanel::new(Duration::from_secs(3));
        panel.begin(ManualAction::ManualPush);
        assert_eq!(panel.alert.visible().unwrap().message, "Running manual push, please wait...");

        let _ = panel.finish(ManualAction::ManualPush, Err(ApiError::Rejected("boom".into())));
        assert!(panel.result.is_none());
        assert_eq!(panel.alert.visible().unwrap().message, "Manual push failed: boom");
    }

    #[test]
    fn crawl_result_yields_summary() {
        let mut panel = ManualPanel::new(Duration::from_secs(3));
        panel.begin(ManualAction::TestCrawl);
        let body = json!({
            "success": true,
            "data": {
                "total_platforms": 3,
                "success_platforms": 2,
                "failed_platforms": 1,
                "total_news": 40,
                "platform_details": {
                    "weibo": {"name": "Weibo", "news_count": 40, "sample_titles": ["a"]}
                },
                "failed_ids": ["zhihu"]
            }
        });
        panel.finish(ManualAction::TestCrawl, Ok(body)).unwrap();

        let result = panel.result.as_ref().unwrap();
        let report = result.crawl_report().unwrap();
        assert_eq!(report.success_platforms, 2);
        assert_eq!(report.failed_ids, vec!["zhihu".to_string()]);
        assert_eq!(report.platform_details["weibo"].news_count, 40);
        assert!(result.pretty().contains("\"total_news\": 40"));
    }
}
