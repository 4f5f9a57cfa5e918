//! Source → logo lookup.

use std::borrow::Cow;
use std::collections::HashMap;

/// Key of the fallback entry.
pub const DEFAULT_KEY: &str = "default";

const BUILTIN: &[(&str, &str)] = &[
    // Keys as stored in `source_site` by the scrapers.
    ("dtrspider", "/static/logos/datart.png"),
    ("planeospider", "/static/logos/planeo.png"),
    ("mironetspider", "/static/logos/mironet.png"),
    // Plain shop names.
    ("datart", "/static/logos/datart.png"),
    ("planeo", "/static/logos/planeo.png"),
    ("mironet", "/static/logos/mironet.png"),
    (DEFAULT_KEY, "/static/logos/default.png"),
];

/// Maps a lower-cased source identifier to an image reference.
///
/// Always contains a `default` entry; `resolve` never returns a dangling
/// reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoMap {
    entries: HashMap<String, String>,
}

impl LogoMap {
    pub fn fallback(&self) -> &str {
        // `Default` always installs DEFAULT_KEY.
        self.entries.get(DEFAULT_KEY).map(String::as_str).unwrap_or_default()
    }

    /// Logo for `source`, falling back to the default entry when the source
    /// is absent, empty or unmapped.
    pub fn resolve(&self, source: Option<&str>) -> &str {
        let key: Cow<'_, str> = match source {
            Some(s) if !s.is_empty() => Cow::Owned(s.to_lowercase()),
            _ => Cow::Borrowed(DEFAULT_KEY),
        };

        self.entries
            .get(key.as_ref())
            .map(String::as_str)
            .unwrap_or_else(|| self.fallback())
    }
}

impl Default for LogoMap {
    fn default() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_case_insensitively() {
        let logos = LogoMap::default();
        assert_eq!(logos.resolve(Some("DtrSpider")), "/static/logos/datart.png");
        assert_eq!(logos.resolve(Some("planeo")), "/static/logos/planeo.png");
    }

    #[test]
    fn unknown_or_missing_source_uses_fallback() {
        let logos = LogoMap::default();
        assert_eq!(logos.resolve(Some("alzaspider")), "/static/logos/default.png");
        assert_eq!(logos.resolve(None), "/static/logos/default.png");
        assert_eq!(logos.resolve(Some("")), "/static/logos/default.png");
        assert_eq!(logos.fallback(), "/static/logos/default.png");
    }
}
