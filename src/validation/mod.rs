//! Program Validator
//!
//! Line-oriented lexer, modal state reducer and the checks built on them.

pub mod engine;
pub mod finding;
pub mod lexer;
pub mod state;

pub use engine::{
    KNOWN_G_CODES, KNOWN_M_CODES, MAX_LINE_LENGTH, MIN_PLAUSIBLE_Z, ValidationOptions,
    scan_program, validate_program, validate_text,
};
pub use finding::Finding;
pub use lexer::{Token, TokenKind, tokenize_line};
pub use state::{LineFacts, ModalState};
