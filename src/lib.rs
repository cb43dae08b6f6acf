//! G-code Generators
//!
//! Toolpath generators for milling operations and the tooling around them.
//!
//! This library provides:
//! - Face, round pocket and square pocket programs
//! - A post-processor driven by a style file
//! - A program validator with localized messages
//! - Command-line configuration

pub mod config;
pub mod error;
pub mod help;
pub mod i18n;
pub mod post;
pub mod toolpath;
pub mod validation;

pub use config::Config;
pub use error::{GenerateError, StyleError};
pub use i18n::MessageCatalog;
pub use post::{PostProcessor, StyleConfig};
pub use toolpath::{
    CuttingParams, FaceParams, Point, RoundPocketParams, SquarePocketParams, generate_face,
    generate_round_pocket, generate_square_pocket,
};
pub use validation::{ValidationOptions, validate_program, validate_text};
