//! Validation Engine
//!
//! Single pass over a program: tokenize each line, fold it into the modal
//! state, check it, then check the program as a whole.

use std::collections::HashSet;

use crate::i18n::MessageCatalog;
use crate::validation::finding::Finding;
use crate::validation::lexer::{CodeFamily, is_comment_line, strip_block_number, tokenize_line};
use crate::validation::state::{LineFacts, ModalState};

/// Line bodies longer than this are reported
pub const MAX_LINE_LENGTH: usize = 80;

/// Z values below this are reported as implausible
pub const MIN_PLAUSIBLE_Z: f64 = -1000.0;

/// Motion and mode codes accepted without complaint
pub const KNOWN_G_CODES: &[u32] = &[
    0, 1, 2, 3, 17, 18, 19, 20, 21, 28, 40, 41, 42, 43, 49, 54, 55, 56, 57, 58, 59, 80, 81, 82,
    83, 84, 85, 86, 87, 88, 89, 90, 91,
];

/// Auxiliary codes accepted without complaint
pub const KNOWN_M_CODES: &[u32] = &[0, 1, 2, 3, 5, 6, 8, 9, 30];

const WORK_OFFSETS: [&str; 6] = ["G54", "G55", "G56", "G57", "G58", "G59"];

/// Tunable thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    /// A rapid at or above this Z counts as a safe retract
    pub safe_height: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { safe_height: 0.0 }
    }
}

/// Scan a program and return every finding in the order it was raised.
///
/// Never fails: text that is not a program simply produces many findings.
pub fn scan_program(text: &str, options: &ValidationOptions) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut state = ModalState::new();

    for (idx, raw) in text.lines().enumerate() {
        let body = strip_block_number(raw.trim());
        if body.is_empty() || is_comment_line(body) {
            continue;
        }

        let facts = LineFacts::from_tokens(&tokenize_line(body));
        state.apply(&facts, options.safe_height);
        check_line(idx + 1, body, &facts, &state, &mut findings);
    }

    check_program(text, &state, &mut findings);
    log::debug!("Scanned program: {} findings", findings.len());
    findings
}

/// Per-line checks, run after the line has been folded into `state`
fn check_line(
    line_num: usize,
    body: &str,
    facts: &LineFacts,
    state: &ModalState,
    findings: &mut Vec<Finding>,
) {
    for &code in &facts.g {
        if !KNOWN_G_CODES.contains(&code) {
            findings.push(unknown(CodeFamily::G, code));
        }
    }
    for &code in &facts.m {
        if !KNOWN_M_CODES.contains(&code) {
            findings.push(unknown(CodeFamily::M, code));
        }
    }
    for code in &facts.malformed_codes {
        findings.push(Finding::UnknownCode(code.clone()));
    }

    if body.chars().count() > MAX_LINE_LENGTH {
        findings.push(Finding::LineTooLong { line: line_num });
    }

    if facts.feeds.len() > 1 {
        findings.push(Finding::DuplicateFeed);
    }

    if facts.is_linear_feed() {
        if !state.spindle_on {
            findings.push(Finding::CutBeforeSpindleOn);
        }
        if !state.has_positive_feed() {
            findings.push(Finding::FeedMoveWithoutFeed);
        }
        if !state.coolant_on {
            findings.push(Finding::CutBeforeCoolantOn);
        }
    }

    if facts.is_rapid() && !facts.feeds.is_empty() {
        findings.push(Finding::FeedOnRapid);
    }

    if let Some(z) = facts.z {
        if z < MIN_PLAUSIBLE_Z {
            findings.push(Finding::SuspiciousZ(z));
        }
        if facts.is_rapid() && z < 0.0 {
            findings.push(Finding::RapidIntoNegativeZ);
        }
    }

    if facts.is_arc() && !facts.has_arc_geometry {
        findings.push(Finding::ArcWithoutCenter);
    }
}

fn unknown(family: CodeFamily, code: u32) -> Finding {
    Finding::UnknownCode(format!("{}{}", family.letter(), code))
}

/// Whole-program checks after the scan
fn check_program(text: &str, state: &ModalState, findings: &mut Vec<Finding>) {
    let upper = text.to_ascii_uppercase();

    if !upper.contains("G17") {
        findings.push(Finding::MissingPlane);
    }
    if !upper.contains("G21") {
        findings.push(Finding::MissingUnits);
    }
    if !upper.contains("G90") {
        findings.push(Finding::MissingAbsoluteMode);
    }
    if !WORK_OFFSETS.iter().any(|w| upper.contains(w)) {
        findings.push(Finding::MissingWorkOffset);
    }
    if state.incremental {
        findings.push(Finding::IncrementalModeLeft);
    }
    if !state.program_end_seen {
        findings.push(Finding::MissingProgramEnd);
    }
    if !state.spindle_off_seen {
        findings.push(Finding::MissingSpindleOff);
    }
    if !state.coolant_off_seen {
        findings.push(Finding::MissingCoolantOff);
    }
    if !state.safe_retract_seen {
        findings.push(Finding::MissingSafeRetract);
    }
}

/// Validate a program and render its diagnostics.
///
/// Messages keep first-seen order; repeated messages are dropped.
pub fn validate_program(
    text: &str,
    catalog: &MessageCatalog,
    locale: &str,
    options: &ValidationOptions,
) -> Vec<String> {
    let mut seen = HashSet::new();
    scan_program(text, options)
        .iter()
        .map(|finding| finding.render(catalog, locale))
        .filter(|message| seen.insert(message.clone()))
        .collect()
}

/// Validate with the built-in catalog and default thresholds
pub fn validate_text(text: &str, locale: &str) -> Vec<String> {
    validate_program(
        text,
        &MessageCatalog::builtin(),
        locale,
        &ValidationOptions::default(),
    )
}
