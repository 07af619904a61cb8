mod config;

pub use config::{Config, FieldSpec};

use std::{fs, io, path::Path};

use anyhow::Context;
use log::info;

impl Config {
    /// Reads the console config. A missing file means defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let cfg: Config = toml::from_str(&text)
            .with_context(|| format!("{} parse error", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::form::FieldKind;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("admin.toml")).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.poll_interval_secs, 30);
        assert_eq!(cfg.alert_ttl_secs, 3);
        assert!(!cfg.config_fields.is_empty());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
base_url = "http://radar.lan:8080"

[[config_fields]]
name = "report.mode"

[[config_fields]]
name = "crawler.use_proxy"
kind = "checkbox"
"#
        )
        .unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.base_url, "http://radar.lan:8080");
        assert_eq!(cfg.poll_interval_secs, 30);
        assert_eq!(cfg.config_fields.len(), 2);
        assert_eq!(cfg.config_fields[0].kind, FieldKind::Text);
        assert_eq!(cfg.config_fields[1].kind, FieldKind::Checkbox);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_secs = \"often\"").unwrap();
        assert!(Config::load(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "poll_interval_secs = 0").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
