//! Generator help text

use crate::i18n::MessageCatalog;

/// Topics with a detailed description
pub const TOPICS: [&str; 3] = ["face", "round_pocket", "square_pocket"];

/// Overview of the generators, optionally followed by one topic's details.
///
/// Topics are matched case-insensitively; the command-line names `round`
/// and `square` are accepted as aliases.
pub fn help_text(catalog: &MessageCatalog, locale: &str, topic: Option<&str>) -> String {
    let overview = catalog.get(locale, "help_overview").trim_start();
    let Some(topic) = topic else {
        return overview.to_string();
    };

    let topic = match topic.trim().to_ascii_lowercase().as_str() {
        "round" => "round_pocket".to_string(),
        "square" => "square_pocket".to_string(),
        other => other.to_string(),
    };

    if TOPICS.contains(&topic.as_str()) {
        let key = format!("help_{topic}");
        format!("{overview}\n{}", catalog.get(locale, &key))
    } else {
        catalog.get(locale, "help_unknown_topic").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_lists_generators() {
        let catalog = MessageCatalog::builtin();
        let text = help_text(&catalog, "en", None);
        assert!(text.starts_with("Available generators:"));
        for topic in TOPICS {
            assert!(text.contains(&format!("  - {topic}(")));
        }
    }

    #[test]
    fn test_topic_details() {
        let catalog = MessageCatalog::builtin();
        let text = help_text(&catalog, "en", Some("Round"));
        assert!(text.starts_with("Available generators:"));
        assert!(text.ends_with(catalog.get("en", "help_round_pocket")));
    }

    #[test]
    fn test_unknown_topic() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(help_text(&catalog, "ru", Some("drill")), "Неизвестная тема.");
    }
}
