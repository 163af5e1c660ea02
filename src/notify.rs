//! Failure-surface collaborators supplied by the host environment.

/// Message key for a failed wind observation load.
pub const WIND_LOAD_ERROR_KEY: &str = "error.wind_load";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Korean,
    English,
}

impl Language {
    /// Map a config or browser language tag onto a supported language.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        if tag == "en" || tag.starts_with("en-") {
            Language::English
        } else {
            Language::Korean
        }
    }
}

/// User-facing error reporting, injected by the host.
///
/// `translate` resolves a message key to a template for the given language;
/// templates interpolate the underlying error through the `{{message}}`
/// placeholder before `display` is called.
pub trait Notifier: Send + Sync {
    fn display(&self, message: &str);
    fn translate(&self, key: &str, lang: Language) -> String;
}

/// Fallback notifier for headless deployments: messages go to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn display(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn translate(&self, key: &str, lang: Language) -> String {
        match (key, lang) {
            (WIND_LOAD_ERROR_KEY, Language::Korean) => {
                "날씨 데이터를 불러오지 못했습니다: {{message}}".to_string()
            }
            (WIND_LOAD_ERROR_KEY, Language::English) => {
                "Failed to load weather data: {{message}}".to_string()
            }
            (other, _) => other.to_string(),
        }
    }
}
