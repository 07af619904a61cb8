use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Keywords,
    Config,
    Platforms,
    Manual,
    History,
}

/// Data load a tab triggers when it becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Status,
    Keywords,
    Config,
    HistoryFiles,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Keywords,
        Tab::Config,
        Tab::Platforms,
        Tab::Manual,
        Tab::History,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Keywords => "keywords",
            Tab::Config => "config",
            Tab::Platforms => "platforms",
            Tab::Manual => "manual",
            Tab::History => "history",
        }
    }

    pub fn loader(self) -> Option<Loader> {
        match self {
            Tab::Dashboard => Some(Loader::Status),
            Tab::Keywords => Some(Loader::Keywords),
            Tab::Config => Some(Loader::Config),
            Tab::History => Some(Loader::HistoryFiles),
            Tab::Platforms | Tab::Manual => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tab::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("History".parse::<Tab>().unwrap(), Tab::History);
        assert_eq!(" keywords ".parse::<Tab>().unwrap(), Tab::Keywords);
        assert!("settings".parse::<Tab>().is_err());
    }

    #[test]
    fn only_data_tabs_have_loaders() {
        assert_eq!(Tab::History.loader(), Some(Loader::HistoryFiles));
        assert_eq!(Tab::Platforms.loader(), None);
        assert_eq!(Tab::Manual.loader(), None);
    }
}
