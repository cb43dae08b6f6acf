//! Block formatter
//!
//! A [`PostProcessor`] is the immutable part of formatting: the style and the
//! date stamped into headers. Each generated program gets its own
//! [`Formatter`] session, which owns the block counter for that program.

use chrono::{Local, NaiveDate};

use crate::post::command::{Field, MotionCommand};
use crate::post::style::StyleConfig;

/// Program-separator marker, never numbered
const PERCENT: &str = "%";

/// Identity of the program being formatted, used by header/footer templates
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub number: u32,
    pub comment: String,
}

impl ProgramInfo {
    pub fn new(number: u32, comment: impl Into<String>) -> Self {
        Self {
            number,
            comment: comment.into(),
        }
    }
}

/// Style plus the date used for `{date}` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessor {
    style: StyleConfig,
    date: NaiveDate,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}

impl PostProcessor {
    /// Create a post-processor stamped with today's local date
    pub fn new(style: StyleConfig) -> Self {
        Self {
            style,
            date: Local::now().date_naive(),
        }
    }

    /// Fix the header date, for reproducible output
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Start formatting a new program with a fresh block counter
    pub fn session(&self, program: ProgramInfo) -> Formatter<'_> {
        Formatter {
            style: &self.style,
            date: self.date,
            program,
            counter: BlockCounter::new(self.style.line_step),
        }
    }
}

/// Sequential block numbers for one program.
///
/// Starts at the increment itself and never resets. Saturates instead of
/// wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCounter {
    current: u64,
    step: u64,
}

impl BlockCounter {
    pub fn new(step: u32) -> Self {
        Self {
            current: 0,
            step: u64::from(step),
        }
    }

    /// Advance and return the number for the next block
    pub fn advance(&mut self) -> u64 {
        self.current = self.current.saturating_add(self.step);
        self.current
    }

    /// Last number handed out, 0 before the first block
    pub fn current(&self) -> u64 {
        self.current
    }
}

/// Formatting session for a single program
#[derive(Debug)]
pub struct Formatter<'a> {
    style: &'a StyleConfig,
    date: NaiveDate,
    program: ProgramInfo,
    counter: BlockCounter,
}

impl Formatter<'_> {
    pub fn counter(&self) -> BlockCounter {
        self.counter
    }

    /// Render a number according to the style
    pub fn number(&self, value: f64) -> String {
        self.style.format_number(value)
    }

    /// Apply block numbering to a finished line of text.
    ///
    /// A line consisting only of `%` is returned verbatim and does not
    /// consume a block number. Empty text stays empty.
    pub fn block(&mut self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        if text.trim() == PERCENT || !self.style.line_numbers {
            return text.trim_end().to_string();
        }
        let n = self.counter.advance();
        format!("N{n} {text}").trim_end().to_string()
    }

    /// Header lines joined by line breaks, blank entries dropped
    pub fn header(&mut self) -> String {
        let style = self.style;
        self.template_lines(&style.header_template)
    }

    /// Footer lines joined by line breaks, blank entries dropped
    pub fn footer(&mut self) -> String {
        let style = self.style;
        self.template_lines(&style.footer_template)
    }

    fn template_lines(&mut self, templates: &[String]) -> String {
        let date = self.date.format("%Y-%m-%d").to_string();
        let number = self.program.number.to_string();

        templates
            .iter()
            .map(|template| {
                let line = fill(
                    template,
                    &[
                        ("program_number", number.as_str()),
                        ("comment", self.program.comment.as_str()),
                        ("date", date.as_str()),
                    ],
                );
                self.block(&line)
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A parenthesised comment block
    pub fn comment(&mut self, text: &str) -> String {
        self.block(&format!("({text})"))
    }

    /// Command word followed by its present fields
    pub fn command(&mut self, command: &MotionCommand) -> String {
        let mut parts: Vec<String> = Vec::new();
        let word = command.command_word();
        if !word.is_empty() {
            parts.push(word.to_string());
        }
        for (field, value) in command.fields() {
            let value = match field {
                Field::S => format!("{value:.0}"),
                _ => self.number(value),
            };
            parts.push(format!("{}{}", field.letter(), value));
        }
        self.block(&parts.join(" "))
    }

    pub fn tool_change(&mut self, tool: u32) -> String {
        self.block(&format!("T{tool} M6"))
    }

    pub fn spindle_on(&mut self, rpm: u32) -> String {
        let rpm = rpm.to_string();
        let line = fill(&self.style.spindle_on_cmd, &[("spindle", rpm.as_str())]);
        self.block(&line)
    }

    pub fn spindle_off(&mut self) -> String {
        let style = self.style;
        self.block(&style.spindle_off_cmd)
    }

    pub fn coolant_on(&mut self) -> String {
        let style = self.style;
        self.block(&style.coolant_on_cmd)
    }

    pub fn coolant_off(&mut self) -> String {
        let style = self.style;
        self.block(&style.coolant_off_cmd)
    }
}

/// Substitute `{name}` placeholders; unknown placeholders are left alone
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
