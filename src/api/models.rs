// models.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reads an explicit `null` as the type's default, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ======================
// Response envelope
// ======================
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: Option<bool>,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Body of a write endpoint that only acknowledges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
}

// ======================
// /api/status
// ======================
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub config_exists: bool,
    #[serde(default)]
    pub keywords_exists: bool,
    #[serde(default)]
    pub today_has_data: bool,
    #[serde(default)]
    pub version: String,
    pub latest_file: Option<LatestFile>,
    #[serde(default)]
    pub current_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LatestFile {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub modified: String,
}

// ======================
// /api/keywords
// ======================
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordsPayload {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_groups: Vec<Value>,
    #[serde(default)]
    pub filter_words: Vec<String>,
}

#[derive(Serialize)]
pub struct SaveKeywordsRequest<'a> {
    pub content: &'a str,
}

// ======================
// /api/platforms
// ======================
/// One entry of the backend's platform list. Optional fields stay absent
/// until edited, so a save writes untouched records back as they came.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Platform {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Backend fields the console does not edit; written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub const DEFAULT_WEIGHT: i64 = 5;
pub const WEIGHT_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

impl Platform {
    /// A freshly added platform: every field set, enabled.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight: Some(DEFAULT_WEIGHT),
            description: Some(String::new()),
            enabled: Some(true),
            extra: Map::new(),
        }
    }

    /// Title shown on the card: the name, or the id when unnamed.
    pub fn title(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }

    /// Weight to show and edit; unset or zero reads as the default.
    pub fn weight(&self) -> i64 {
        self.weight.filter(|w| *w != 0).unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

/// Bounds an edited weight to the range the weight input accepts.
pub fn clamp_weight(weight: i64) -> i64 {
    weight.clamp(*WEIGHT_RANGE.start(), *WEIGHT_RANGE.end())
}

#[derive(Serialize)]
pub struct SavePlatformsRequest<'a> {
    pub platforms: &'a [Platform],
}

// ======================
// /api/history
// ======================
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryFile {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
    /// Epoch seconds, possibly fractional.
    pub mtime: Option<f64>,
    /// Preformatted time text, sent by backends that group files per day.
    pub modified: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl HistoryFile {
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/') || self.name.ends_with('\\')
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryDay {
    pub date: String,
    #[serde(default)]
    pub files: Vec<HistoryFile>,
}

/// `/api/history` answers either `{files: [...]}` or
/// `{success, data: [{date, files: [...]}]}`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub success: Option<bool>,
    pub files: Option<Vec<HistoryFile>>,
    pub data: Option<Vec<HistoryDay>>,
    pub message: Option<String>,
    pub error: Option<String>,
}

// ======================
// /api/execution-history
// ======================
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecutionRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    pub mode: Option<String>,
    pub report_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pushed: u64,
    pub actual_pushed: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_sent: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword_groups: u64,
}

impl ExecutionRecord {
    /// Pushed count after dedup; older records only carry the total.
    pub fn actual(&self) -> u64 {
        self.actual_pushed.unwrap_or(self.total_pushed)
    }
}

// ======================
// /api/test-crawl
// ======================
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlReport {
    #[serde(default)]
    pub total_platforms: u64,
    #[serde(default)]
    pub success_platforms: u64,
    #[serde(default)]
    pub failed_platforms: u64,
    #[serde(default)]
    pub total_news: u64,
    #[serde(default)]
    pub platform_details: BTreeMap<String, CrawlPlatformDetail>,
    #[serde(default)]
    pub failed_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlPlatformDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub news_count: u64,
    #[serde(default)]
    pub sample_titles: Vec<String>,
}

// ======================
// /api/history/{path}
// ======================
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    /// Rendered report; open the URL in a browser.
    Html { url: url::Url },
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct FileEnvelope {
    pub success: Option<bool>,
    pub content: Option<String>,
    pub error: Option<String>,
}
