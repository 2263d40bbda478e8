use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::translations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Ru,
    Ua,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ru, Language::Ua];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Ua => "ua",
        }
    }

    /// Next language in switcher order, wrapping around.
    pub fn next(self) -> Language {
        match self {
            Language::En => Language::Ru,
            Language::Ru => Language::Ua,
            Language::Ua => Language::En,
        }
    }

    fn table(self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            Language::En => &EN,
            Language::Ru => &RU,
            Language::Ua => &UA,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ru" => Ok(Language::Ru),
            "ua" | "uk" => Ok(Language::Ua),
            other => Err(format!("unknown language '{other}' (expected en, ru or ua)")),
        }
    }
}

static EN: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| translations::EN.iter().copied().collect());
static RU: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| translations::RU.iter().copied().collect());
static UA: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| translations::UA.iter().copied().collect());

/// Resolves translation keys for one language, falling back to English and
/// then to the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    lang: Language,
}

impl Translator {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key).to_string()
    }

    /// Looks up `key` and replaces the first `{name}` token for each
    /// parameter, in order. This is plain text substitution: values are not
    /// escaped and a value containing `{...}` may be matched by a later
    /// parameter.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut text = self.lookup(key).to_string();
        for (name, value) in params {
            let token = format!("{{{name}}}");
            text = text.replacen(&token, value, 1);
        }
        text
    }

    fn lookup<'a>(&self, key: &'a str) -> &'a str {
        self.lang
            .table()
            .get(key)
            .or_else(|| EN.get(key))
            .copied()
            .unwrap_or(key)
    }
}
