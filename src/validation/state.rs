//! Modal state
//!
//! What a line's tokens say ([`LineFacts`]) and what they imply for the
//! controller state carried across lines ([`ModalState`]).

use crate::validation::lexer::{CodeFamily, Token, TokenKind};

/// Codes and values extracted from one line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineFacts {
    /// G codes, in line order
    pub g: Vec<u32>,
    /// M codes, in line order
    pub m: Vec<u32>,
    /// G/M words whose number is not a plain integer, as written
    pub malformed_codes: Vec<String>,
    /// Every parsable F value, in line order
    pub feeds: Vec<f64>,
    /// First parsable Z value
    pub z: Option<f64>,
    /// An R, I or J word is present
    pub has_arc_geometry: bool,
}

impl LineFacts {
    pub fn from_tokens(tokens: &[Token<'_>]) -> Self {
        let mut facts = Self::default();

        for token in tokens {
            match token.kind {
                TokenKind::Comment => {}
                TokenKind::Code => match token.code() {
                    Some((CodeFamily::G, Some(n))) => facts.g.push(n),
                    Some((CodeFamily::M, Some(n))) => facts.m.push(n),
                    Some((_, None)) if !token.value().is_empty() => {
                        facts.malformed_codes.push(token.text.to_ascii_uppercase());
                    }
                    _ => {}
                },
                TokenKind::Word => match token.letter() {
                    Some('F') => facts.feeds.extend(token.number()),
                    Some('Z') if facts.z.is_none() => facts.z = token.number(),
                    Some('R' | 'I' | 'J') => facts.has_arc_geometry = true,
                    _ => {}
                },
            }
        }

        facts
    }

    pub fn has_g(&self, code: u32) -> bool {
        self.g.contains(&code)
    }

    pub fn has_m(&self, code: u32) -> bool {
        self.m.contains(&code)
    }

    pub fn is_rapid(&self) -> bool {
        self.has_g(0)
    }

    pub fn is_linear_feed(&self) -> bool {
        self.has_g(1)
    }

    pub fn is_arc(&self) -> bool {
        self.has_g(2) || self.has_g(3)
    }
}

/// Controller state tracked across one validation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalState {
    pub spindle_on: bool,
    pub coolant_on: bool,
    /// G91 active
    pub incremental: bool,
    /// Last F value seen
    pub feed: Option<f64>,
    /// A rapid reached the safe height at least once
    pub safe_retract_seen: bool,
    pub spindle_off_seen: bool,
    pub coolant_off_seen: bool,
    pub program_end_seen: bool,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one line into the state
    pub fn apply(&mut self, facts: &LineFacts, safe_height: f64) {
        if facts.has_m(3) {
            self.spindle_on = true;
        }
        if facts.has_m(5) {
            self.spindle_on = false;
            self.spindle_off_seen = true;
        }
        if facts.has_m(8) {
            self.coolant_on = true;
        }
        if facts.has_m(9) {
            self.coolant_on = false;
            self.coolant_off_seen = true;
        }
        if facts.has_m(30) {
            self.program_end_seen = true;
        }

        if facts.has_g(90) {
            self.incremental = false;
        }
        if facts.has_g(91) {
            self.incremental = true;
        }

        if let Some(&feed) = facts.feeds.last() {
            self.feed = Some(feed);
        }

        if facts.is_rapid() && facts.z.is_some_and(|z| z >= safe_height) {
            self.safe_retract_seen = true;
        }
    }

    /// Whether the last feed seen is usable for a cutting move
    pub fn has_positive_feed(&self) -> bool {
        self.feed.is_some_and(|f| f > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::lexer::tokenize_line;

    fn facts(line: &str) -> LineFacts {
        LineFacts::from_tokens(&tokenize_line(line))
    }

    #[test]
    fn test_facts_collect_codes_in_any_order() {
        let f = facts("X1 M3 G1 S1000 M8 G90");
        assert_eq!(f.g, vec![1, 90]);
        assert_eq!(f.m, vec![3, 8]);
        assert!(f.is_linear_feed());
    }

    #[test]
    fn test_facts_values() {
        let f = facts("G1 Z-2 Z-3 F100 F200 I1");
        assert_eq!(f.z, Some(-2.0));
        assert_eq!(f.feeds, vec![100.0, 200.0]);
        assert!(f.has_arc_geometry);
    }

    #[test]
    fn test_facts_ignore_comment_content() {
        let f = facts("G0 Z5 (M3 F100)");
        assert!(f.m.is_empty());
        assert!(f.feeds.is_empty());
    }

    #[test]
    fn test_malformed_codes() {
        let f = facts("G91.1 G");
        assert!(f.g.is_empty());
        assert_eq!(f.malformed_codes, vec!["G91.1"]);
    }

    #[test]
    fn test_spindle_and_coolant_transitions() {
        let mut state = ModalState::new();
        state.apply(&facts("M3 S1000"), 0.0);
        state.apply(&facts("M8"), 0.0);
        assert!(state.spindle_on && state.coolant_on);

        state.apply(&facts("M9"), 0.0);
        state.apply(&facts("M5"), 0.0);
        assert!(!state.spindle_on && !state.coolant_on);
        assert!(state.spindle_off_seen && state.coolant_off_seen);
        assert!(!state.program_end_seen);

        state.apply(&facts("M30"), 0.0);
        assert!(state.program_end_seen);
    }

    #[test]
    fn test_distance_mode() {
        let mut state = ModalState::new();
        state.apply(&facts("G91"), 0.0);
        assert!(state.incremental);
        state.apply(&facts("G90"), 0.0);
        assert!(!state.incremental);
    }

    #[test]
    fn test_feed_tracks_last_value() {
        let mut state = ModalState::new();
        state.apply(&facts("G1 F100 F0"), 0.0);
        assert_eq!(state.feed, Some(0.0));
        assert!(!state.has_positive_feed());

        state.apply(&facts("G1 X1"), 0.0);
        assert_eq!(state.feed, Some(0.0));
    }

    #[test]
    fn test_safe_retract_threshold() {
        let mut state = ModalState::new();
        state.apply(&facts("G0 Z4.9"), 5.0);
        assert!(!state.safe_retract_seen);
        state.apply(&facts("G1 Z10 F100"), 5.0);
        assert!(!state.safe_retract_seen);
        state.apply(&facts("G0 Z5"), 5.0);
        assert!(state.safe_retract_seen);
    }
}
