//! Validation findings
//!
//! Each finding maps to one catalog message; arguments fill its placeholders.

use crate::i18n::MessageCatalog;

/// A defect found in a program
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// G/M code outside the known set, as written
    UnknownCode(String),
    /// Line body over the length limit, 1-based line number
    LineTooLong { line: usize },
    DuplicateFeed,
    CutBeforeSpindleOn,
    FeedMoveWithoutFeed,
    CutBeforeCoolantOn,
    FeedOnRapid,
    SuspiciousZ(f64),
    RapidIntoNegativeZ,
    ArcWithoutCenter,
    MissingPlane,
    MissingUnits,
    MissingAbsoluteMode,
    MissingWorkOffset,
    IncrementalModeLeft,
    MissingProgramEnd,
    MissingSpindleOff,
    MissingCoolantOff,
    MissingSafeRetract,
}

impl Finding {
    /// Catalog key of the message
    pub fn key(&self) -> &'static str {
        match self {
            Finding::UnknownCode(_) => "unknown_code",
            Finding::LineTooLong { .. } => "long_line",
            Finding::DuplicateFeed => "dup_feed",
            Finding::CutBeforeSpindleOn => "g1_before_m3",
            Finding::FeedMoveWithoutFeed => "g1_no_feed",
            Finding::CutBeforeCoolantOn => "coolant_before_cut",
            Finding::FeedOnRapid => "g0_with_feed",
            Finding::SuspiciousZ(_) => "absurd_z",
            Finding::RapidIntoNegativeZ => "g0_down",
            Finding::ArcWithoutCenter => "arc_no_radius",
            Finding::MissingPlane => "no_g17",
            Finding::MissingUnits => "no_g21",
            Finding::MissingAbsoluteMode => "no_g90",
            Finding::MissingWorkOffset => "no_wcs",
            Finding::IncrementalModeLeft => "g91_mode",
            Finding::MissingProgramEnd => "missing_footer",
            Finding::MissingSpindleOff => "no_spindle_off",
            Finding::MissingCoolantOff => "no_coolant_off",
            Finding::MissingSafeRetract => "no_safe_retract",
        }
    }

    fn args(&self) -> Vec<(&'static str, String)> {
        match self {
            Finding::UnknownCode(code) => vec![("code", code.clone())],
            Finding::LineTooLong { line } => vec![("n", line.to_string())],
            Finding::SuspiciousZ(z) => vec![("z", format!("{z:?}"))],
            _ => Vec::new(),
        }
    }

    /// Message text in the requested locale
    pub fn render(&self, catalog: &MessageCatalog, locale: &str) -> String {
        catalog.render(locale, self.key(), &self.args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_arguments() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(
            Finding::SuspiciousZ(-1500.0).render(&catalog, "en"),
            "Suspiciously low Z: -1500.0"
        );
        assert_eq!(
            Finding::LineTooLong { line: 12 }.render(&catalog, "en"),
            "Line longer than 80 chars (#12)"
        );
        assert_eq!(
            Finding::UnknownCode("M99".to_string()).render(&catalog, "ru"),
            "Неизвестный или неподдерживаемый код: M99"
        );
    }

    #[test]
    fn test_every_key_is_in_catalog() {
        let catalog = MessageCatalog::builtin();
        let all = [
            Finding::UnknownCode(String::new()),
            Finding::LineTooLong { line: 1 },
            Finding::DuplicateFeed,
            Finding::CutBeforeSpindleOn,
            Finding::FeedMoveWithoutFeed,
            Finding::CutBeforeCoolantOn,
            Finding::FeedOnRapid,
            Finding::SuspiciousZ(0.0),
            Finding::RapidIntoNegativeZ,
            Finding::ArcWithoutCenter,
            Finding::MissingPlane,
            Finding::MissingUnits,
            Finding::MissingAbsoluteMode,
            Finding::MissingWorkOffset,
            Finding::IncrementalModeLeft,
            Finding::MissingProgramEnd,
            Finding::MissingSpindleOff,
            Finding::MissingCoolantOff,
            Finding::MissingSafeRetract,
        ];
        for finding in all {
            for locale in ["en", "ru"] {
                assert_ne!(catalog.get(locale, finding.key()), finding.key());
            }
        }
    }
}
