use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use unsegen::input::Key;

use crate::cmds::{self, Cmd};
use crate::date::WeekStart;
use crate::error::{Error, ErrorKind, Result};
use crate::picker::calendar::DEFAULT_YEAR_SPAN;
use crate::picker::Period;

pub type KeyMap = HashMap<Key, Cmd>;

const CONFIG_PATH_ENV_VAR: &str = "RANGEPICK_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("rangepick").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".rangepick.toml"));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeSpec {
    pub today_char: Option<char>,
    pub focus_char: Option<char>,
    pub header_color: String,
    pub selected_color: String,
    pub range_color: String,
    pub focus_color: String,
    pub disabled_color: String,
}

impl Default for ThemeSpec {
    fn default() -> Self {
        ThemeSpec {
            today_char: Some('*'),
            focus_char: None,
            header_color: "yellow".to_owned(),
            selected_color: "blue".to_owned(),
            range_color: "cyan".to_owned(),
            focus_color: "red".to_owned(),
            disabled_color: "lightblack".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    week_start: Option<WeekStart>,
    default_period: Option<Period>,
    year_span: Option<i32>,
    tick_rate_ms: Option<u64>,
    theme: ThemeSpec,
    keys: HashMap<String, Cmd>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub key_map: KeyMap,
    pub tick_rate: Duration,
    pub week_start: WeekStart,
    pub default_period: Period,
    pub year_span: i32,
    pub theme: ThemeSpec,
}

impl Default for Config {
    fn default() -> Config {
        let mut config = Config {
            key_map: HashMap::new(),
            tick_rate: Duration::from_millis(500),
            week_start: WeekStart::default(),
            default_period: Period::default(),
            year_span: DEFAULT_YEAR_SPAN,
            theme: ThemeSpec::default(),
        };

        config.key_map.insert(Key::Char('l'), Cmd::NextDay);
        config.key_map.insert(Key::Char('h'), Cmd::PrevDay);
        config.key_map.insert(Key::Char('j'), Cmd::NextWeek);
        config.key_map.insert(Key::Char('k'), Cmd::PrevWeek);
        config.key_map.insert(Key::Right, Cmd::NextDay);
        config.key_map.insert(Key::Left, Cmd::PrevDay);
        config.key_map.insert(Key::Down, Cmd::NextWeek);
        config.key_map.insert(Key::Up, Cmd::PrevWeek);
        config.key_map.insert(Key::Char(']'), Cmd::NextMonth);
        config.key_map.insert(Key::Char('['), Cmd::PrevMonth);
        config.key_map.insert(Key::Char('m'), Cmd::MonthMenu);
        config.key_map.insert(Key::Char('y'), Cmd::YearMenu);
        config.key_map.insert(Key::Char('\n'), Cmd::Pick);
        config.key_map.insert(Key::Char(' '), Cmd::Pick);
        config.key_map.insert(Key::Char('i'), Cmd::EditStart);
        config.key_map.insert(Key::Char('I'), Cmd::EditEnd);
        config.key_map.insert(Key::Char('a'), Cmd::Apply);
        config.key_map.insert(Key::Char('c'), Cmd::Clear);
        config.key_map.insert(Key::Char('q'), Cmd::Cancel);

        for (key, period) in ['1', '2', '3', '4', '5', '6'].iter().zip(Period::ALL.iter()) {
            config.key_map.insert(Key::Char(*key), Cmd::Preset(*period));
        }

        config
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Config::default();

        if let Some(week_start) = file.week_start {
            config.week_start = week_start;
        }
        if let Some(period) = file.default_period {
            config.default_period = period;
        }
        if let Some(span) = file.year_span {
            if span < 0 {
                return Err(Error::new(
                    ErrorKind::ConfigParse,
                    "year_span must not be negative",
                ));
            }
            config.year_span = span;
        }
        if let Some(ms) = file.tick_rate_ms {
            config.tick_rate = Duration::from_millis(ms);
        }
        config.theme = file.theme;

        for (name, cmd) in file.keys {
            match cmds::parse_key(&name) {
                Some(key) => {
                    config.key_map.insert(key, cmd);
                }
                None => log::warn!("Unknown key '{}' in key bindings, skipping", name),
            }
        }

        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content).map_err(|e| {
            let msg = format!(
                "{}: {}",
                path.display(),
                e.message.as_deref().unwrap_or("unreadable content")
            );
            e.with_msg(&msg)
        })
    }
}

pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.exists()) {
        Some(path) => {
            log::info!("Using config file {}", path.display());
            Config::from_path(&path)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
