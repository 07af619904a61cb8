use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::api::{
    ApiClient, ApiError,
    models::{ExecutionRecord, FileContent, HistoryFile},
};
use crate::console::alert::AlertSlot;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Unloaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    fn settle(result: Result<T, ApiError>, what: &str) -> (Self, Result<(), ApiError>) {
        match result {
            Ok(v) => (LoadState::Loaded(v), Ok(())),
            Err(e) => {
                log::error!("{what} failed: {e}");
                (LoadState::Failed(format!("Failed to load {what}: {e}")), Err(e))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryView {
    Files,
    Executions,
}

impl fmt::Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryView::Files => "files",
            HistoryView::Executions => "executions",
        })
    }
}

impl FromStr for HistoryView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" => Ok(HistoryView::Files),
            "executions" | "execution" => Ok(HistoryView::Executions),
            other => Err(format!("unknown history view: {other}")),
        }
    }
}

/// Text file shown over the console until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOverlay {
    pub path: String,
    pub content: String,
}

/// Where a click on the open overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayClick {
    CloseButton,
    Backdrop,
    Content,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Opened {
    /// HTML report; the operator opens it in a browser.
    Browser(Url),
    Overlay,
}

#[derive(Debug, Clone)]
pub struct HistoryViewer {
    pub active: HistoryView,
    pub files: LoadState<Vec<HistoryFile>>,
    pub executions: LoadState<Vec<ExecutionRecord>>,
    pub overlay: Option<FileOverlay>,
    pub alert: AlertSlot,
}

impl HistoryViewer {
    pub fn new(alert_ttl: Duration) -> Self {
        Self {
            active: HistoryView::Files,
            files: LoadState::Unloaded,
            executions: LoadState::Unloaded,
            overlay: None,
            alert: AlertSlot::new(alert_ttl),
        }
    }

    pub fn begin_files(&mut self) {
        self.files = LoadState::Loading;
    }

    pub fn apply_files(
        &mut self,
        result: Result<Vec<HistoryFile>, ApiError>,
    ) -> Result<(), ApiError> {
        let (state, outcome) = LoadState::settle(result, "history");
        self.files = state;
        outcome
    }

    pub async fn load_files(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.begin_files();
        let result = api.history().await;
        self.apply_files(result)
    }

    pub async fn load_executions(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.executions = LoadState::Loading;
        let (state, outcome) = LoadState::settle(api.execution_history().await, "push history");
        self.executions = state;
        outcome
    }

    /// Shows `view` and runs its loader.
    pub async fn switch(&mut self, view: HistoryView, api: &ApiClient) -> Result<(), ApiError> {
        self.active = view;
        match view {
            HistoryView::Files => self.load_files(api).await,
            HistoryView::Executions => self.load_executions(api).await,
        }
    }

    pub async fn view_file(&mut self, path: &str, api: &ApiClient) -> Result<Opened, ApiError> {
        match api.history_file(path).await {
            Ok(FileContent::Html { url }) => Ok(Opened::Browser(url)),
            Ok(FileContent::Text(content)) => {
                self.overlay = Some(FileOverlay { path: path.to_string(), content });
                Ok(Opened::Overlay)
            }
            Err(e) => {
                self.alert.error(format!("Failed to view file: {e}"));
                Err(e)
            }
        }
    }

    /// Closes the overlay on the close control or a backdrop click.
    pub fn click_overlay(&mut self, click: OverlayClick) {
        match click {
            OverlayClick::CloseButton | OverlayClick::Backdrop => self.overlay = None,
            OverlayClick::Content => {}
        }
    }
}
