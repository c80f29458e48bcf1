//! Translation lookup for every user-facing string produced by the backend.
//!
//! Catalogs are nested JSON objects addressed with dot notation (`game.yourTurn`).
//! Lookups fall back to the English catalog and finally to the key itself, so a missing
//! translation never breaks a response. The active language can be switched at runtime
//! through [`Localizer`].

use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use dashmap::DashMap;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

/// Languages a catalog may be provided for.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "ko", "en", "zh", "hi", "ru", "ja", "es", "pt", "id", "tr", "de", "fr",
];
/// Language used when nothing else matches.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Source of translated strings.
pub trait Translate: Send + Sync {
    /// Translated text for `key`, or `key` itself when no catalog knows it.
    fn translate(&self, key: &str) -> String;

    /// Translate `key` and substitute `{name}` placeholders.
    fn translate_with(&self, key: &str, args: &[(&str, String)]) -> String {
        args.iter()
            .fold(self.translate(key), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// Active catalog plus the English fallback.
#[derive(Debug, Clone)]
pub struct Catalog {
    language: String,
    messages: Value,
    fallback: Value,
}

impl Catalog {
    /// Built-in English catalog only.
    pub fn builtin() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            messages: builtin_messages(),
            fallback: builtin_messages(),
        }
    }

    /// Catalog built from in-memory messages, English built-ins as fallback.
    pub fn from_messages(language: impl Into<String>, messages: Value) -> Self {
        Self {
            language: language.into(),
            messages,
            fallback: builtin_messages(),
        }
    }

    /// Load `{dir}/{language}.json`, falling back to `{dir}/en.json` and then to the
    /// built-in English strings. The catalog keeps `language` even when only English
    /// strings were found.
    pub fn load(dir: &Path, language: &str) -> Self {
        let fallback = read_catalog(dir, DEFAULT_LANGUAGE).unwrap_or_else(builtin_messages);

        match read_catalog(dir, language) {
            Some(messages) => {
                info!(language, dir = %dir.display(), "loaded translations");
                Self {
                    language: language.to_string(),
                    messages,
                    fallback,
                }
            }
            None => {
                info!(language, "no translations found; using English strings");
                Self {
                    language: language.to_string(),
                    messages: fallback.clone(),
                    fallback,
                }
            }
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        lookup(&self.messages, key)
            .or_else(|| lookup(&self.fallback, key))
            .map(str::to_owned)
            .unwrap_or_else(|| key.to_owned())
    }
}

#[derive(Debug, Error)]
#[error("unsupported language `{0}`")]
pub struct UnsupportedLanguage(pub String);

/// Active catalog that can be swapped while the server runs.
///
/// Catalogs are read from disk once per language and kept for later switches.
#[derive(Debug)]
pub struct Localizer {
    dir: PathBuf,
    loaded: DashMap<String, Arc<Catalog>>,
    active: RwLock<Arc<Catalog>>,
}

impl Localizer {
    /// Start with `language`, reading catalogs from `dir`.
    pub fn load(dir: impl Into<PathBuf>, language: &str) -> Self {
        let dir = dir.into();
        let catalog = Arc::new(Catalog::load(&dir, language));
        let loaded = DashMap::new();
        loaded.insert(catalog.language().to_string(), catalog.clone());
        Self {
            dir,
            loaded,
            active: RwLock::new(catalog),
        }
    }

    pub fn language(&self) -> String {
        self.current().language().to_string()
    }

    /// Make `language` active and return its normalized code (`pt-BR` → `pt`).
    pub fn switch(&self, language: &str) -> Result<String, UnsupportedLanguage> {
        let code =
            supported_language(language).ok_or_else(|| UnsupportedLanguage(language.to_string()))?;
        let catalog = Arc::clone(
            &self
                .loaded
                .entry(code.clone())
                .or_insert_with(|| Arc::new(Catalog::load(&self.dir, &code))),
        );
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = catalog;
        info!(language = %code, "language switched");
        Ok(code)
    }

    fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Translate for Localizer {
    fn translate(&self, key: &str) -> String {
        self.current().translate(key)
    }
}

/// Pick the language: the player's saved choice, then the configured one, then the
/// `LANG` environment prefix (`fr_FR.UTF-8` → `fr`), else English. Unsupported
/// candidates are skipped.
pub fn detect_language(saved: Option<&str>, configured: Option<&str>) -> String {
    let candidates = saved
        .into_iter()
        .chain(configured)
        .map(str::to_owned)
        .chain(env::var("LANG").ok());

    candidates
        .filter_map(|raw| supported_language(&raw))
        .next()
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Normalized language code of `raw` when a catalog may exist for it.
pub fn supported_language(raw: &str) -> Option<String> {
    normalize_language(raw).filter(|lang| SUPPORTED_LANGUAGES.contains(&lang.as_str()))
}

fn normalize_language(raw: &str) -> Option<String> {
    let prefix = raw
        .split(['-', '_', '.'])
        .next()
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty())?;
    Some(prefix.to_ascii_lowercase())
}

fn read_catalog(dir: &Path, language: &str) -> Option<Value> {
    let path = dir.join(format!("{language}.json"));
    let contents = fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<Value>(&contents) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            warn!(path = %path.display(), "translation file is not a JSON object; ignoring");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to parse translation file");
            None
        }
    }
}

fn lookup<'a>(messages: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(messages, |node, segment| node.get(segment))?
        .as_str()
}

fn builtin_messages() -> Value {
    json!({
        "game": {
            "ready": "Press start to play",
            "watching": "Watch the sequence...",
            "yourTurn": "Your turn!",
            "success": "Well done!",
            "over": "Game over"
        },
        "leaderboard": {
            "newRecord": "New record: {score} points!",
            "topRank": "You placed #{rank} on the leaderboard!"
        },
        "share": {
            "title": "Color Memory Game",
            "text": "🎮 I got {score} points on Color Memory!\n🎯 Level: {level}\n\nCan you beat my score?",
            "copied": "Copied to clipboard!"
        }
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn builtin_lookup_uses_dot_notation() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.translate("game.yourTurn"), "Your turn!");
    }

    #[test]
    fn missing_key_falls_back_to_key() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.translate("game.unknown"), "game.unknown");
        assert_eq!(catalog.translate("game"), "game");
    }

    #[test]
    fn missing_translation_falls_back_to_english() {
        let catalog = Catalog::from_messages("fr", json!({ "game": { "over": "Partie terminée" } }));
        assert_eq!(catalog.translate("game.over"), "Partie terminée");
        assert_eq!(catalog.translate("game.ready"), "Press start to play");
    }

    #[test]
    fn placeholders_are_substituted() {
        let catalog = Catalog::builtin();
        let text = catalog.translate_with("leaderboard.topRank", &[("rank", "3".into())]);
        assert_eq!(text, "You placed #3 on the leaderboard!");
    }

    #[test]
    fn load_reads_language_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("de.json"),
            r#"{ "game": { "yourTurn": "Du bist dran!" } }"#,
        )
        .unwrap();

        let catalog = Catalog::load(temp.path(), "de");
        assert_eq!(catalog.language(), "de");
        assert_eq!(catalog.translate("game.yourTurn"), "Du bist dran!");
        assert_eq!(catalog.translate("game.over"), "Game over");
    }

    #[test]
    fn load_without_file_uses_english_strings() {
        let temp = TempDir::new().unwrap();
        let catalog = Catalog::load(temp.path(), "ja");
        assert_eq!(catalog.language(), "ja");
        assert_eq!(catalog.translate("share.copied"), "Copied to clipboard!");
    }

    #[test]
    fn configured_language_wins_when_supported() {
        assert_eq!(detect_language(None, Some("pt-BR")), "pt");
        assert_eq!(detect_language(None, Some("KO")), "ko");
    }

    #[test]
    fn saved_language_beats_configured_one() {
        assert_eq!(detect_language(Some("de"), Some("fr")), "de");
        assert_eq!(detect_language(Some("klingon"), Some("fr")), "fr");
    }

    #[test]
    fn switch_swaps_the_active_catalog() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("de.json"),
            r#"{ "game": { "over": "Spiel vorbei" } }"#,
        )
        .unwrap();

        let localizer = Localizer::load(temp.path(), "en");
        assert_eq!(localizer.translate("game.over"), "Game over");

        assert_eq!(localizer.switch("de-AT").unwrap(), "de");
        assert_eq!(localizer.language(), "de");
        assert_eq!(localizer.translate("game.over"), "Spiel vorbei");
        assert_eq!(localizer.translate("game.ready"), "Press start to play");

        assert_eq!(localizer.switch("en").unwrap(), "en");
        assert_eq!(localizer.translate("game.over"), "Game over");
    }

    #[test]
    fn switch_rejects_unsupported_language() {
        let temp = TempDir::new().unwrap();
        let localizer = Localizer::load(temp.path(), "fr");

        let err = localizer.switch("xx").unwrap_err();
        assert_eq!(err.to_string(), "unsupported language `xx`");
        assert_eq!(localizer.language(), "fr");
    }

    #[test]
    fn normalizes_locale_strings() {
        assert_eq!(normalize_language("fr_FR.UTF-8").as_deref(), Some("fr"));
        assert_eq!(normalize_language(""), None);
    }
}
