//! Two-way binding between dot-path named form fields and a nested JSON
//! object.
//!
//! A field named `push.interval_minutes` reads `data["push"]["interval_minutes"]`
//! when the form is populated and writes the same place when it is serialized.
//! Fields whose paths share a prefix but disagree on its shape overwrite each
//! other in field order: a later field can replace an object an earlier field
//! built, and an intermediate holding a scalar is replaced by an object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::FieldSpec;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    /// Raw input text; unused by checkboxes.
    pub value: String,
    pub checked: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, value: String::new(), checked: false }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    #[error("no form field named {0}")]
    UnknownField(String),
    #[error("{field} is a checkbox; expected true/false, got {value}")]
    NotABool { field: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    pub fields: Vec<FormField>,
}

impl Form {
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        Self {
            fields: specs.iter().map(|s| FormField::new(&s.name, s.kind)).collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sets a field the way a user would type into it.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        match field.kind {
            FieldKind::Checkbox => {
                field.checked = parse_bool(raw).ok_or_else(|| FormError::NotABool {
                    field: name.to_string(),
                    value: raw.to_string(),
                })?;
            }
            FieldKind::Text | FieldKind::Number => field.value = raw.to_string(),
        }
        Ok(())
    }

    /// Copies values out of `data`. Fields whose path is missing are left
    /// untouched.
    pub fn populate(&mut self, data: &Value) {
        for field in &mut self.fields {
            if field.name.is_empty() {
                continue;
            }
            let Some(value) = lookup(data, &field.name) else {
                continue;
            };
            match field.kind {
                FieldKind::Checkbox => field.checked = truthy(value),
                FieldKind::Text | FieldKind::Number => field.value = display_value(value),
            }
        }
    }

    pub fn serialize(&self) -> Value {
        let mut root = Map::new();
        for field in &self.fields {
            if field.name.is_empty() {
                continue;
            }
            let leaf = match field.kind {
                FieldKind::Checkbox => Value::Bool(field.checked),
                FieldKind::Number => Value::from(parse_int_prefix(&field.value).unwrap_or(0)),
                FieldKind::Text => Value::String(field.value.clone()),
            };
            insert_path(&mut root, &field.name, leaf);
        }
        Value::Object(root)
    }
}

/// Walks a dot path through nested objects.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |cur, key| cur.as_object()?.get(key))
}

fn insert_path(root: &mut Map<String, Value>, path: &str, leaf: Value) {
    let mut keys: Vec<&str> = path.split('.').collect();
    let last = keys.pop().unwrap_or_default();

    let mut current = root;
    for key in keys {
        let slot = current.entry(key).or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Some(next) = slot.as_object_mut() else { return };
        current = next;
    }
    current.insert(last.to_string(), leaf);
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Leading integer of `s`, ignoring leading whitespace and anything after
/// the digits: `" 12px"` is 12, `"3.7"` is 3, `"abc"` is `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
