use crate::api::{ApiClient, ApiError, models::SystemStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indicator {
    Hidden,
    Loading,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag {
    pub text: &'static str,
    pub tone: Tone,
}

/// Health snapshot panel. A failed refresh only touches the indicator; the
/// last good snapshot is kept but stays hidden.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    pub indicator: Indicator,
    pub content_visible: bool,
    pub snapshot: Option<SystemStatus>,
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self {
            indicator: Indicator::Loading,
            content_visible: false,
            snapshot: None,
        }
    }
}

impl StatusPanel {
    pub fn begin(&mut self) {
        self.indicator = Indicator::Loading;
        self.content_visible = false;
    }

    pub fn apply(&mut self, result: Result<SystemStatus, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(status) => {
                self.snapshot = Some(status);
                self.indicator = Indicator::Hidden;
                self.content_visible = true;
                Ok(())
            }
            Err(e) => {
                log::error!("loading system status failed: {e}");
                self.indicator = Indicator::Failed(format!("Failed to load system status: {e}"));
                Err(e)
            }
        }
    }

    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.begin();
        let result = api.status().await;
        self.apply(result)
    }
}

pub fn config_flag(s: &SystemStatus) -> Flag {
    presence(s.config_exists)
}

pub fn keywords_flag(s: &SystemStatus) -> Flag {
    presence(s.keywords_exists)
}

pub fn today_flag(s: &SystemStatus) -> Flag {
    if s.today_has_data {
        Flag { text: "✅ Has data", tone: Tone::Good }
    } else {
        Flag { text: "⚠️ No data", tone: Tone::Warn }
    }
}

fn presence(ok: bool) -> Flag {
    if ok {
        Flag { text: "✅ OK", tone: Tone::Good }
    } else {
        Flag { text: "❌ Missing", tone: Tone::Bad }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_snapshot_and_shows_error() {
        let mut panel = StatusPanel::default();
        let good = SystemStatus {
            version: "2.0.3".into(),
            config_exists: true,
            ..Default::default()
        };
        panel.begin();
        panel.apply(Ok(good.clone())).unwrap();
        assert!(panel.content_visible);

        panel.begin();
        let err = ApiError::Status { status: 502, reason: "Bad Gateway".into() };
        assert!(panel.apply(Err(err)).is_err());

        assert_eq!(panel.snapshot.as_ref(), Some(&good));
        assert!(!panel.content_visible);
        assert_eq!(
            panel.indicator,
            Indicator::Failed("Failed to load system status: HTTP 502: Bad Gateway".into())
        );
    }

    #[test]
    fn flags_follow_snapshot() {
        let s = SystemStatus { config_exists: true, ..Default::default() };
        assert_eq!(config_flag(&s).tone, Tone::Good);
        assert_eq!(keywords_flag(&s).text, "❌ Missing");
        assert_eq!(today_flag(&s).tone, Tone::Warn);
    }
}
