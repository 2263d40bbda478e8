use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::i18n::Language;

pub const COOKIE_TTL_DAYS: i64 = 365;

const LANG: &str = "lang";
const DARK_MODE: &str = "darkMode";
const UKRAINE_MODE: &str = "ukraineMode";
const EXCLUDE_DUTCH: &str = "excludeDutch";

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub language: Language,
    pub dark_mode: bool,
    pub ukraine_mode: bool,
    pub exclude_dutch: bool,
}

impl Preferences {
    /// Ukraine mode only takes effect while the Ukrainian locale is active.
    pub fn ukraine_active(&self) -> bool {
        self.ukraine_mode && self.language == Language::Ua
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cookie {
    name: String,
    value: String,
    expires: DateTime<Utc>,
}

impl Cookie {
    fn to_line(&self) -> String {
        format!(
            "{}={};expires={};path=/;SameSite=Lax",
            self.name,
            self.value,
            self.expires.format(EXPIRES_FORMAT)
        )
    }

    fn parse_line(line: &str) -> Option<Cookie> {
        let mut parts = line.split(';');
        let (name, value) = parts.next()?.trim().split_once('=')?;
        let expires = parts
            .filter_map(|attr| attr.trim().split_once('='))
            .find(|(key, _)| key.eq_ignore_ascii_case("expires"))
            .and_then(|(_, raw)| NaiveDateTime::parse_from_str(raw.trim(), EXPIRES_FORMAT).ok())
            .map(|naive| naive.and_utc())?;
        Some(Cookie {
            name: name.to_string(),
            value: value.to_string(),
            expires,
        })
    }
}

/// Small cookie-file backed store for UI preferences. Every write refreshes
/// that cookie's expiry; expired cookies read as unset.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    cookies: Vec<Cookie>,
    prefs: Preferences,
}

impl PreferenceStore {
    pub fn open() -> Result<Self> {
        Self::open_at(Self::default_path())
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        Self::load(path.into(), Utc::now())
    }

    fn default_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobfinder") {
            proj_dirs.data_dir().join("prefs.cookies")
        } else {
            PathBuf::from("jobfinder.cookies")
        }
    }

    fn load(path: PathBuf, now: DateTime<Utc>) -> Result<Self> {
        let cookies = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
            text.lines().filter_map(Cookie::parse_line).collect()
        } else {
            Vec::new()
        };

        let mut store = Self {
            path,
            cookies,
            prefs: Preferences::default(),
        };
        store.prefs = store.read_prefs(now);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn set_language(&mut self, lang: Language) -> Result<()> {
        self.prefs.language = lang;
        self.write(LANG, lang.code())
    }

    pub fn set_dark_mode(&mut self, on: bool) -> Result<()> {
        self.prefs.dark_mode = on;
        self.write(DARK_MODE, bool_str(on))
    }

    pub fn set_ukraine_mode(&mut self, on: bool) -> Result<()> {
        self.prefs.ukraine_mode = on;
        self.write(UKRAINE_MODE, bool_str(on))
    }

    pub fn set_exclude_dutch(&mut self, on: bool) -> Result<()> {
        self.prefs.exclude_dutch = on;
        self.write(EXCLUDE_DUTCH, bool_str(on))
    }

    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let on = !self.prefs.dark_mode;
        self.set_dark_mode(on)?;
        Ok(on)
    }

    pub fn toggle_ukraine_mode(&mut self) -> Result<bool> {
        let on = !self.prefs.ukraine_mode;
        self.set_ukraine_mode(on)?;
        Ok(on)
    }

    pub fn toggle_exclude_dutch(&mut self) -> Result<bool> {
        let on = !self.prefs.exclude_dutch;
        self.set_exclude_dutch(on)?;
        Ok(on)
    }

    fn read_prefs(&self, now: DateTime<Utc>) -> Preferences {
        let header = self.cookie_header(now);
        Preferences {
            language: get_cookie(&header, LANG)
                .and_then(|code| code.parse().ok())
                .unwrap_or_default(),
            dark_mode: get_cookie(&header, DARK_MODE).as_deref() == Some("true"),
            ukraine_mode: get_cookie(&header, UKRAINE_MODE).as_deref() == Some("true"),
            exclude_dutch: get_cookie(&header, EXCLUDE_DUTCH).as_deref() == Some("true"),
        }
    }

    /// Live cookies joined the way a browser exposes them: `a=1; b=2`.
    fn cookie_header(&self, now: DateTime<Utc>) -> String {
        self.cookies
            .iter()
            .filter(|c| c.expires > now)
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_at(name, value, Utc::now())
    }

    fn write_at(&mut self, name: &str, value: &str, now: DateTime<Utc>) -> Result<()> {
        let cookie = Cookie {
            name: name.to_string(),
            value: value.to_string(),
            expires: now + Duration::days(COOKIE_TTL_DAYS),
        };
        match self.cookies.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text: String = self
            .cookies
            .iter()
            .map(|c| format!("{}\n", c.to_line()))
            .collect();
        std::fs::write(&self.path, text)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))?;
        tracing::debug!(cookie = name, value, "preference saved");
        Ok(())
    }
}

fn get_cookie(header: &str, name: &str) -> Option<String> {
    let pattern = format!("(^| ){}=([^;]+)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(header)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn bool_str(on: bool) -> &'static str {
    if on { "true" } else { "false" }
}
