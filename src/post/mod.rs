//! Post-processor
//!
//! Turns motion commands into text blocks under a configurable style.

pub mod command;
pub mod formatter;
pub mod style;

pub use command::{ArcDirection, Axes, MotionCommand};
pub use formatter::{BlockCounter, Formatter, PostProcessor, ProgramInfo};
pub use style::StyleConfig;
