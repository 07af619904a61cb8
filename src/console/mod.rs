//! Console state and event dispatch.
//!
//! Every panel owns its own slice of state; `Console` ties them together,
//! routes `Event`s to them and runs the follow-up loads one action implies
//! (a save refreshes the status panel, a push reloads the file history).

pub mod alert;
pub mod form;
pub mod history;
pub mod keywords;
pub mod manual;
pub mod platforms;
pub mod settings;
pub mod status;
pub mod tab;

use std::time::Duration;

use log::{debug, info};
use url::Url;

use crate::api::ApiClient;
use crate::config::{Config, FieldSpec};

use history::{HistoryView, HistoryViewer, Opened, OverlayClick};
use keywords::KeywordEditor;
use manual::{ManualAction, ManualPanel};
use platforms::{Confirm, PlatformDraft, PlatformEditor, PlatformField};
use settings::SettingsPanel;
use status::StatusPanel;
use tab::{Loader, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ActivateTab(Tab),
    RefreshStatus,

    LoadKeywords,
    EditKeywords(String),
    SaveKeywords,

    LoadConfig,
    SetConfigField { name: String, value: String },
    SaveConfig,

    LoadPlatforms,
    TogglePlatform(usize),
    UpdatePlatform(usize, PlatformField),
    RemovePlatform(usize),
    StartAddPlatform,
    EditDraft(PlatformDraft),
    CommitAddPlatform,
    CancelAddPlatform,
    SavePlatforms,

    Run(ManualAction),

    SwitchHistory(HistoryView),
    ViewFile(String),
    ClickOverlay(OverlayClick),
}

/// What the caller has to do after an event, beyond repainting.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    /// The operator declined a confirmation.
    Declined,
    OpenInBrowser(Url),
}

pub struct Console {
    api: ApiClient,
    alert_ttl: Duration,
    fields: Vec<FieldSpec>,

    pub current: Tab,
    pub mounted: bool,
    pub status: StatusPanel,
    pub keywords: KeywordEditor,
    pub settings: SettingsPanel,
    pub platforms: PlatformEditor,
    pub history: HistoryViewer,
    pub manual: ManualPanel,
}

impl Console {
    pub fn new(api: ApiClient, cfg: &Config) -> Self {
        let alert_ttl = Duration::from_secs(cfg.alert_ttl_secs);
        Self {
            api,
            alert_ttl,
            fields: cfg.config_fields.clone(),
            current: Tab::Dashboard,
            mounted: false,
            status: StatusPanel::default(),
            keywords: KeywordEditor::new(alert_ttl),
            settings: SettingsPanel::new(&cfg.config_fields, alert_ttl),
            platforms: PlatformEditor::new(alert_ttl),
            history: HistoryViewer::new(alert_ttl),
            manual: ManualPanel::new(alert_ttl),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Loads every panel's data at once. Failures stay inside their panel.
    pub async fn mount(&mut self) {
        info!("Mounting console against {}", self.api.base_url());
        self.status.begin();
        self.keywords.begin();
        self.history.begin_files();

        let api = &self.api;
        let (status, keywords, config, platforms, history) = futures::join!(
            api.status(),
            api.keywords(),
            api.config(),
            api.platforms(),
            api.history(),
        );

        let _ = self.status.apply(status);
        let _ = self.keywords.apply(keywords);
        let _ = self.settings.apply(config);
        let _ = self.platforms.apply(platforms);
        let _ = self.history.apply_files(history);
        self.mounted = true;
    }

    /// Drops all loaded state.
    pub fn teardown(&mut self) {
        let ttl = self.alert_ttl;
        self.current = Tab::Dashboard;
        self.status = StatusPanel::default();
        self.keywords = KeywordEditor::new(ttl);
        self.settings = SettingsPanel::new(&self.fields, ttl);
        self.platforms = PlatformEditor::new(ttl);
        self.history = HistoryViewer::new(ttl);
        self.manual = ManualPanel::new(ttl);
        self.mounted = false;
        debug!("Console torn down");
    }

    pub async fn activate_tab(&mut self, tab: Tab) -> anyhow::Result<()> {
        self.current = tab;
        let Some(loader) = tab.loader() else {
            return Ok(());
        };
        match loader {
            Loader::Status => self.status.refresh(&self.api).await?,
            Loader::Keywords => self.keywords.load(&self.api).await?,
            Loader::Config => self.settings.load(&self.api).await?,
            Loader::HistoryFiles => self.history.load_files(&self.api).await?,
        }
        Ok(())
    }

    pub async fn handle<C: Confirm>(
        &mut self,
        event: Event,
        confirm: &mut C,
    ) -> anyhow::Result<Outcome> {
        debug!("event: {event:?}");
        match event {
            Event::ActivateTab(tab) => self.activate_tab(tab).await?,
            Event::RefreshStatus => self.status.refresh(&self.api).await?,

            Event::LoadKeywords => self.keywords.load(&self.api).await?,
            Event::EditKeywords(text) => self.keywords.set_content(text),
            Event::SaveKeywords => {
                self.keywords.save(&self.api).await?;
                self.refresh_status_quietly().await;
            }

            Event::LoadConfig => self.settings.load(&self.api).await?,
            Event::SetConfigField { name, value } => self.settings.form.set(&name, &value)?,
            Event::SaveConfig => {
                self.settings.save(&self.api).await?;
                self.refresh_status_quietly().await;
            }

            Event::LoadPlatforms => self.platforms.load(&self.api).await?,
            Event::TogglePlatform(i) => {
                self.platforms.toggle_enabled(i)?;
            }
            Event::UpdatePlatform(i, field) => self.platforms.update_field(i, field)?,
            Event::RemovePlatform(i) => {
                if !self.platforms.remove(i, confirm, &self.api).await? {
                    return Ok(Outcome::Declined);
                }
            }
            Event::StartAddPlatform => {
                self.platforms.enter_add_mode();
            }
            Event::EditDraft(draft) => *self.platforms.enter_add_mode() = draft,
            Event::CommitAddPlatform => {
                self.platforms.commit_add()?;
            }
            Event::CancelAddPlatform => self.platforms.cancel_add(),
            Event::SavePlatforms => self.platforms.persist(&self.api).await?,

            Event::Run(action) => {
                self.manual.run(action, &self.api).await?;
                if action == ManualAction::ManualPush {
                    self.refresh_status_quietly().await;
                    if self.current == Tab::History {
                        let _ = self.history.load_files(&self.api).await;
                    }
                }
            }

            Event::SwitchHistory(view) => self.history.switch(view, &self.api).await?,
            Event::ViewFile(path) => {
                if let Opened::Browser(url) = self.history.view_file(&path, &self.api).await? {
                    return Ok(Outcome::OpenInBrowser(url));
                }
            }
            Event::ClickOverlay(click) => self.history.click_overlay(click),
        }
        Ok(Outcome::Done)
    }

    /// Follow-up refresh after a write; its failure shows on the status
    /// panel and does not fail the write.
    async fn refresh_status_quietly(&mut self) {
        let _ = self.status.refresh(&self.api).await;
    }
}
