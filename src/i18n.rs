//! Message catalog
//!
//! Read-only key to string tables per locale. Lookups fall back from the
//! requested locale to the catalog's fallback locale and finally to the key
//! itself.

use std::collections::HashMap;

/// Locale used when none is requested and for missing keys
pub const DEFAULT_LOCALE: &str = "ru";

const EMBEDDED: [(&str, &str); 2] = [
    ("ru", include_str!("../resources/locales/ru.toml")),
    ("en", include_str!("../resources/locales/en.toml")),
];

/// Localized strings, injected wherever messages are rendered
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    tables: HashMap<String, HashMap<String, String>>,
    fallback: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MessageCatalog {
    /// Empty catalog falling back to `fallback`
    pub fn new(fallback: &str) -> Self {
        Self {
            tables: HashMap::new(),
            fallback: normalize_locale(fallback),
        }
    }

    /// Catalog with the embedded `ru` and `en` tables
    pub fn builtin() -> Self {
        let mut catalog = Self::new(DEFAULT_LOCALE);
        for (locale, content) in EMBEDDED {
            if let Err(e) = catalog.add_locale_toml(locale, content) {
                log::warn!("Failed to parse embedded '{}' messages: {}", locale, e);
            }
        }
        catalog
    }

    /// Add or replace a locale from a flat TOML table of strings
    pub fn add_locale_toml(&mut self, locale: &str, content: &str) -> Result<(), toml::de::Error> {
        let table: HashMap<String, String> = toml::from_str(content)?;
        self.add_locale(locale, table);
        Ok(())
    }

    pub fn add_locale(&mut self, locale: &str, table: HashMap<String, String>) {
        self.tables.insert(normalize_locale(locale), table);
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(&normalize_locale(locale))
    }

    /// Known locales, sorted
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        locales.sort_unstable();
        locales
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Look up `key`, falling back to the fallback locale, then to the key
    pub fn get<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        let locale = normalize_locale(locale);
        if let Some(text) = self.tables.get(&locale).and_then(|t| t.get(key)) {
            return text;
        }
        if let Some(text) = self.tables.get(&self.fallback).and_then(|t| t.get(key)) {
            log::debug!("Message '{}' missing for '{}', using '{}'", key, locale, self.fallback);
            return text;
        }
        log::warn!("Message '{}' missing from every locale", key);
        key
    }

    /// Look up `key` and substitute its `{name}` placeholders
    pub fn render(&self, locale: &str, key: &str, args: &[(&str, String)]) -> String {
        args.iter()
            .fold(self.get(locale, key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// Reduce values like `en_US.UTF-8` or `EN-gb` to a bare language code
pub fn normalize_locale(locale: &str) -> String {
    locale
        .trim()
        .split(['_', '-', '.', '@'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_locales() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(catalog.locales(), vec!["en", "ru"]);
        assert_eq!(catalog.fallback(), "ru");
    }

    #[test]
    fn test_embedded_tables_have_same_keys() {
        let catalog = MessageCatalog::builtin();
        let mut en: Vec<&String> = catalog.tables["en"].keys().collect();
        let mut ru: Vec<&String> = catalog.tables["ru"].keys().collect();
        en.sort();
        ru.sort();
        assert_eq!(en, ru);
    }

    #[test]
    fn test_lookup() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(catalog.get("en", "no_g17"), "Missing G17 (XY plane)");
        assert_eq!(catalog.get("ru", "no_g17"), "Нет G17 (плоскость XY)");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(catalog.get("de", "no_g17"), catalog.get("ru", "no_g17"));
    }

    #[test]
    fn test_missing_key_falls_back() {
        let mut catalog = MessageCatalog::builtin();
        catalog.add_locale_toml("fr", "no_g17 = \"G17 manquant\"\n").unwrap();

        assert_eq!(catalog.get("fr", "no_g17"), "G17 manquant");
        assert_eq!(catalog.get("fr", "no_g21"), "Нет G21 (мм)");
        assert_eq!(catalog.get("fr", "no_such_key"), "no_such_key");
    }

    #[test]
    fn test_render_placeholders() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(
            catalog.render("en", "unknown_code", &[("code", "G99".to_string())]),
            "Unknown/unsupported code: G99"
        );
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en_US.UTF-8"), "en");
        assert_eq!(normalize_locale("RU"), "ru");
        assert_eq!(normalize_locale(" en-GB "), "en");
        assert!(MessageCatalog::builtin().has_locale("EN_us"));
    }
}
