use std::future::Future;
use std::time::Duration;

use crate::api::models::{DEFAULT_WEIGHT, Platform, clamp_weight};
use crate::api::{ApiClient, ApiError};
use crate::console::alert::AlertSlot;
use crate::console::form::parse_int_prefix;

/// Asks the operator a yes/no question before a destructive edit.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> impl Future<Output = bool>;
}

/// Fixed answer, for `--yes` and tests.
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformField {
    Name(String),
    Weight(i64),
    Description(String),
}

impl PlatformField {
    /// Builds an edit from a field name and raw text.
    pub fn parse(field: &str, value: &str) -> Result<Self, EditError> {
        match field.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(PlatformField::Name(value.to_string())),
            "description" => Ok(PlatformField::Description(value.to_string())),
            "weight" => parse_int_prefix(value)
                .map(PlatformField::Weight)
                .ok_or_else(|| EditError::BadWeight(value.to_string())),
            other => Err(EditError::UnknownField(other.to_string())),
        }
    }
}

/// Unsaved new-platform form.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDraft {
    pub id: String,
    pub name: String,
    pub weight: String,
    pub description: String,
}

impl Default for PlatformDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            weight: DEFAULT_WEIGHT.to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EditError {
    #[error("no platform at position {0}")]
    NoSuchPlatform(usize),
    #[error("no platform with id {0}")]
    UnknownId(String),
    #[error("unknown platform field {0}, expected name, weight or description")]
    UnknownField(String),
    #[error("weight must be a number, got {0}")]
    BadWeight(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AddError {
    #[error("not adding a platform")]
    NotAdding,
    #[error("platform id and name must not be empty")]
    MissingIdOrName,
    #[error("platform id {0} already exists, choose another id")]
    DuplicateId(String),
}

/// Local copy of the platform list. Edits stay local until `persist`, except
/// `remove`, which persists straight away.
#[derive(Debug, Clone)]
pub struct PlatformEditor {
    pub platforms: Vec<Platform>,
    pub draft: Option<PlatformDraft>,
    pub loaded: bool,
    pub alert: AlertSlot,
}

impl PlatformEditor {
    pub fn new(alert_ttl: Duration) -> Self {
        Self {
            platforms: Vec::new(),
            draft: None,
            loaded: false,
            alert: AlertSlot::new(alert_ttl),
        }
    }

    pub fn apply(&mut self, result: Result<Vec<Platform>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(list) => {
                self.platforms = list;
                self.loaded = true;
                self.alert.success("Platforms loaded");
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("Failed to load platforms: {e}"));
                Err(e)
            }
        }
    }

    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.alert.info("Loading platforms...");
        let result = api.platforms().await;
        self.apply(result)
    }

    pub fn position(&self, id: &str) -> Result<usize, EditError> {
        self.platforms
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| EditError::UnknownId(id.to_string()))
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Platform, EditError> {
        self.platforms.get_mut(index).ok_or(EditError::NoSuchPlatform(index))
    }

    pub fn toggle_enabled(&mut self, index: usize) -> Result<bool, EditError> {
        let p = self.get_mut(index)?;
        let enabled = !p.enabled();
        p.enabled = Some(enabled);
        Ok(enabled)
    }

    pub fn update_field(&mut self, index: usize, field: PlatformField) -> Result<(), EditError> {
        let p = self.get_mut(index)?;
        match field {
            PlatformField::Name(v) => p.name = v,
            PlatformField::Weight(w) => p.weight = Some(clamp_weight(w)),
            PlatformField::Description(v) => p.description = Some(v),
        }
        Ok(())
    }

    /// Removes after confirmation and saves the remaining list. Returns
    /// `false` when the operator declined.
    pub async fn remove<C: Confirm>(
        &mut self,
        index: usize,
        confirm: &mut C,
        api: &ApiClient,
    ) -> anyhow::Result<bool> {
        let title = self
            .platforms
            .get(index)
            .ok_or(EditError::NoSuchPlatform(index))?
            .title()
            .to_string();
        if !confirm.confirm(&format!("Delete platform {title}?")).await {
            return Ok(false);
        }
        self.platforms.remove(index);
        self.persist(api).await?;
        Ok(true)
    }

    pub fn enter_add_mode(&mut self) -> &mut PlatformDraft {
        self.draft.get_or_insert_with(PlatformDraft::default)
    }

    pub fn cancel_add(&mut self) {
        self.draft = None;
    }

    /// Validates the draft and appends it, enabled. Nothing is saved; on
    /// failure the draft stays open.
    pub fn commit_add(&mut self) -> Result<&Platform, AddError> {
        let draft = self.draft.as_ref().ok_or(AddError::NotAdding)?;
        let id = draft.id.trim();
        let name = draft.name.trim();

        if id.is_empty() || name.is_empty() {
            self.alert.error(AddError::MissingIdOrName.to_string());
            return Err(AddError::MissingIdOrName);
        }
        if self.platforms.iter().any(|p| p.id == id) {
            let err = AddError::DuplicateId(id.to_string());
            self.alert.error(err.to_string());
            return Err(err);
        }

        let mut platform = Platform::new(id, name);
        let weight = parse_int_prefix(&draft.weight).filter(|w| *w != 0);
        platform.weight = Some(weight.map_or(DEFAULT_WEIGHT, clamp_weight));
        platform.description = Some(draft.description.trim().to_string());

        self.platforms.push(platform);
        self.draft = None;
        self.alert.success("Platform added");
        Ok(&self.platforms[self.platforms.len() - 1])
    }

    /// Overwrites the remote list with the local one.
    pub async fn persist(&mut self, api: &ApiClient) -> Result<(), ApiError> {
        self.alert.info("Saving platforms...");
        match api.save_platforms(&self.platforms).await {
            Ok(_) => {
                self.alert.success("Platforms saved");
                Ok(())
            }
            Err(e) => {
                self.alert.error(format!("Failed to save platforms: {e}"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(ids: &[&str]) -> PlatformEditor {
        let mut ed = PlatformEditor::new(Duration::from_secs(3));
        ed.platforms = ids.iter().map(|id| Platform::new(*id, id.to_uppercase())).collect();
        ed
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut ed = editor_with(&["toutiao", "baidu"]);
        let draft = ed.enter_add_mode();
        draft.id = "baidu".into();
        draft.name = "Baidu again".into();

        assert_eq!(ed.commit_add().unwrap_err(), AddError::DuplicateId("baidu".into()));
        assert_eq!(ed.platforms.len(), 2);
        assert!(ed.draft.is_some());
    }

    #[test]
    fn id_match_is_case_sensitive() {
        let mut ed = editor_with(&["baidu"]);
        let draft = ed.enter_add_mode();
        draft.id = "Baidu".into();
        draft.name = "Baidu".into();
        assert!(ed.commit_add().is_ok());
        assert_eq!(ed.platforms.len(), 2);
    }

    #[test]
    fn blank_id_or_name_keeps_add_mode_open() {
        let mut ed = editor_with(&[]);
        let draft = ed.enter_add_mode();
        draft.id = "  ".into();
        draft.name = "Weibo".into();
        assert_eq!(ed.commit_add().unwrap_err(), AddError::MissingIdOrName);
        assert!(ed.draft.is_some());
        assert!(ed.platforms.is_empty());
    }

    #[test]
    fn commit_appends_enabled_platform_without_saving() {
        let mut ed = editor_with(&["toutiao"]);
        let draft = ed.enter_add_mode();
        draft.id = " weibo ".into();
        draft.name = "Weibo".into();
        draft.weight = "oops".into();
        draft.description = " hot search ".into();

        let added = ed.commit_add().unwrap().clone();
        assert_eq!(added.id, "weibo");
        assert_eq!(added.weight, Some(DEFAULT_WEIGHT));
        assert_eq!(added.description(), "hot search");
        assert!(added.enabled());
        assert!(ed.draft.is_none());
        assert_eq!(ed.platforms.last(), Some(&added));
    }

    #[test]
    fn added_weight_uses_the_edit_bounds() {
        let mut ed = editor_with(&[]);
        for (id, raw) in [("a", "42"), ("b", "-3"), ("c", "0")] {
            let draft = ed.enter_add_mode();
            draft.id = id.into();
            draft.name = id.into();
            draft.weight = raw.into();
            ed.commit_add().unwrap();
        }
        let weights: Vec<_> = ed.platforms.iter().map(|p| p.weight).collect();
        assert_eq!(weights, [Some(10), Some(1), Some(DEFAULT_WEIGHT)]);
    }

    #[test]
    fn toggling_an_unset_flag_enables() {
        let mut ed = editor_with(&[]);
        let sparse = serde_json::json!({"id": "x", "name": "X"});
        ed.platforms.push(serde_json::from_value(sparse).unwrap());
        assert_eq!(ed.toggle_enabled(0), Ok(true));
        assert_eq!(ed.platforms[0].enabled, Some(true));
        assert_eq!(ed.platforms[0].weight, None);
    }

    #[test]
    fn add_mode_holds_a_single_draft() {
        let mut ed = editor_with(&[]);
        ed.enter_add_mode().id = "zhihu".into();
        assert_eq!(ed.enter_add_mode().id, "zhihu");
        ed.cancel_add();
        assert!(ed.draft.is_none());
        assert_eq!(ed.commit_add().unwrap_err(), AddError::NotAdding);
    }

    #[test]
    fn toggle_and_update_edit_in_place() {
        let mut ed = editor_with(&["a", "b"]);
        assert_eq!(ed.toggle_enabled(0), Ok(false));
        assert_eq!(ed.toggle_enabled(0), Ok(true));
        assert!(ed.platforms[1].enabled());

        ed.update_field(0, PlatformField::Weight(42)).unwrap();
        assert_eq!(ed.platforms[0].weight(), 10);
        ed.update_field(0, PlatformField::Name("Renamed".into())).unwrap();
        assert_eq!(ed.platforms[0].title(), "Renamed");

        assert_eq!(ed.toggle_enabled(9), Err(EditError::NoSuchPlatform(9)));
        assert_eq!(ed.position("b"), Ok(1));
        assert!(ed.position("zz").is_err());
    }

    #[test]
    fn field_edits_parse_from_text() {
        assert_eq!(PlatformField::parse("Weight", "7"), Ok(PlatformField::Weight(7)));
        assert_eq!(PlatformField::parse("name", "Zhihu"), Ok(PlatformField::Name("Zhihu".into())));
        assert_eq!(
            PlatformField::parse("weight", "heavy"),
            Err(EditError::BadWeight("heavy".into()))
        );
        assert!(matches!(PlatformField::parse("id", "x"), Err(EditError::UnknownField(_))));
    }
}
