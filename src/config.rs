use chrono::Weekday;
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar::{GridOptions, LabelLocale, Layout, Result, TodayCheck};

const CONFIG_PATH_ENV_VAR: &str = "INFINICAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("infinical").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".infinical.toml"));
    }

    locations
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: Weekday,
    pub layout: Layout,
    pub today_check: TodayCheck,
    pub locale: LabelLocale,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub tick_rate: Duration,
    /// Rows kept between the selected day and the pane border.
    pub scrolloff: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            week_start: Weekday::Sun,
            layout: Layout::default(),
            today_check: TodayCheck::default(),
            locale: LabelLocale::default(),
            tick_rate: Duration::from_millis(500),
            scrolloff: 1,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let config = Config::from_toml(&content)?;
        log::info!("Loaded config from '{}'", path.display());

        Ok(config)
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions {
            week_start: self.week_start,
            layout: self.layout,
            locale: self.locale,
        }
    }
}

/// Loads `path` if given, else the first existing file of the default
/// locations, else the built-in defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => Config::from_path(&location),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ErrorKind;
    use chrono::Locale;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml(
            r#"
            week_start = "monday"
            layout = "months"
            today_check = "day-month"
            locale = "fr_FR"
            tick_rate = 1000
            scrolloff = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.week_start, Weekday::Mon);
        assert_eq!(config.layout, Layout::Months);
        assert_eq!(config.today_check, TodayCheck::DayMonth);
        assert_eq!(config.locale, LabelLocale(Locale::fr_FR));
        assert_eq!(config.tick_rate, Duration::from_secs(1));
        assert_eq!(config.scrolloff, 3);

        let options = config.grid_options();
        assert_eq!(options.week_start, Weekday::Mon);
        assert_eq!(options.layout, Layout::Months);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let err = Config::from_toml(r#"layout = "weeks""#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn unknown_locale_is_an_error() {
        let err = Config::from_toml(r#"locale = "tlh_KLINGON""#).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_suitable_config(Some(Path::new("/nonexistent/infinical.toml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }
}
