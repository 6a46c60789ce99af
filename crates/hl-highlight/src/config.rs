//! Phrase list and highlight style supplied to a pass.

use hl_core::HighlightError;
use hl_core::HighlightResult;

pub const DEFAULT_PHRASES: &[&str] = &["誤っている", "誤り", "間違っている", "間違い"];

pub const DEFAULT_STYLE: &str = "background-color: #ffff00; color: #000000; font-weight: bold; padding: 2px; border-radius: 3px;";

/// Replaces the phrase list; entries are separated by newlines or `|`.
pub const PHRASES_ENV: &str = "HL_HIGHLIGHT_PHRASES";

/// Replaces the highlight style.
pub const STYLE_ENV: &str = "HL_HIGHLIGHT_STYLE";

/// What to highlight and how it looks.
///
/// Phrases are matched case-insensitively in list order; earlier phrases win
/// when two start at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    pub phrases: Vec<String>,
    pub style: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES
                .iter()
                .map(|phrase| (*phrase).to_owned())
                .collect(),
            style: DEFAULT_STYLE.to_owned(),
        }
    }
}

impl HighlightConfig {
    pub fn with_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Applies [`PHRASES_ENV`] and [`STYLE_ENV`] when they are set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(PHRASES_ENV) {
            self.phrases = split_phrase_list(&raw);
        }

        if let Some(style) = lookup(STYLE_ENV) {
            self.style = style;
        }

        self
    }

    pub fn validate(&self) -> HighlightResult<()> {
        if let Some(index) = self.phrases.iter().position(|phrase| phrase.is_empty()) {
            return Err(HighlightError::new(
                "highlight.empty_phrase",
                format!("phrase #{index} is empty and would match everywhere"),
            ));
        }

        Ok(())
    }
}

fn split_phrase_list(raw: &str) -> Vec<String> {
    raw.split(['\n', '|'])
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_STYLE;
    use super::HighlightConfig;
    use super::PHRASES_ENV;
    use super::STYLE_ENV;

    #[test]
    fn defaults_are_valid() {
        let config = HighlightConfig::default();
        assert_eq!(config.phrases.len(), 4);
        assert_eq!(config.style, DEFAULT_STYLE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_phrases() {
        let config = HighlightConfig::default().with_phrases(["ok", ""]);
        let result = config.validate();
        assert_eq!(result.map_err(|error| error.code), Err("highlight.empty_phrase"));
    }

    #[test]
    fn empty_phrase_list_is_allowed() {
        let config = HighlightConfig::default().with_phrases(Vec::<String>::new());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_replace_fields() {
        let config = HighlightConfig::default().with_overrides_from(|key| match key {
            PHRASES_ENV => Some("error | warning\n\n fatal \r\n".to_owned()),
            STYLE_ENV => Some("color: red".to_owned()),
            _ => None,
        });

        assert_eq!(config.phrases, vec!["error", "warning", "fatal"]);
        assert_eq!(config.style, "color: red");
    }

    #[test]
    fn missing_environment_keeps_defaults() {
        let config = HighlightConfig::default().with_overrides_from(|_| None);
        assert_eq!(config, HighlightConfig::default());
    }
}
