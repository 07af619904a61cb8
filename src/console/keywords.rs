use std::time::Duration;

use crate::api::{ApiClient, ApiError, models::KeywordsPayload};
use crate::console::alert::AlertSlot;

pub const HINT: &str = "One keyword or keyword group per line";
pub const LOADING: &str = "Loading keyword configuration...";
pub const LOAD_FAILED: &str = "Loading failed, please retry";

/// Editor for the frequency-words blob. The text is opaque to the console.
#[derive(Debug, Clone)]
pub struct KeywordEditor {
    pub content: String,
    pub placeholder: &'static str,
    pub word_groups: usize,
    pub filter_words: usize,
    pub alert: AlertSlot,
}

impl KeywordEditor {
    pub fn new(alert_ttl: Duration) -> Self {
        Self {
            content: String::new(),
            placeholder: HINT,
            word_groups: 0,
            filter_words: 0,
            alert: AlertSlot::new(alert_ttl),
        }
    }

    pub fn begin(&mut self) {
        self.placeholder = LOADING;
    }

    pub fn apply(&mut self, result: Result<KeywordsPayload, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(payload) => {
                self.content = payload.content;
                self.word_groups = payload.word_groups.len();
                self.filter_words = payload.filter_words.len();
                self.placeholder = HINT;
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("Failed to load keywords: {e}"));
                self.placeholder = LOAD_FAILED;
                Err(e)
            }
        }
    }

    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.begin();
        let result = api.keywords().await;
        self.apply(result)
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub async fn save(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        match api.save_keywords(&self.content).await {
            Ok(_) => {
                self.alert.success("Keywords saved");
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("Failed to save keywords: {e}"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failure_marks_placeholder() {
        let mut editor = KeywordEditor::new(Duration::from_secs(3));
        editor.set_content("kept");
        editor.begin();
        assert_eq!(editor.placeholder, LOADING);

        let _ = editor.apply(Err(ApiError::Rejected("no file".into())));
        assert_eq!(editor.placeholder, LOAD_FAILED);
        assert_eq!(editor.content, "kept");
        assert!(editor.alert.visible().unwrap().message.contains("no file"));
    }

    #[test]
    fn load_counts_parsed_groups() {
        let mut editor = KeywordEditor::new(Duration::from_secs(3));
        let payload = KeywordsPayload {
            content: "AI\nchip\n\n!ads".into(),
            word_groups: vec![serde_json::json!({"normal": ["AI", "chip"]})],
            filter_words: vec!["ads".into()],
        };
        editor.apply(Ok(payload)).unwrap();
        assert_eq!(editor.word_groups, 1);
        assert_eq!(editor.filter_words, 1);
        assert_eq!(editor.placeholder, HINT);
    }
}
