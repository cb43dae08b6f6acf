//! Toolpath generators
//!
//! Each strategy builds a [`Toolpath`]: an ordered list of [`Step`]s that is
//! pure geometry. Rendering the plan through a [`PostProcessor`] produces the
//! program text.

pub mod face;
pub mod round_pocket;
pub mod square_pocket;

pub use face::{FaceParams, generate_face, plan_face};
pub use round_pocket::{RoundPocketParams, generate_round_pocket, plan_round_pocket};
pub use square_pocket::{SquarePocketParams, generate_square_pocket, plan_square_pocket};

use crate::error::GenerateError;
use crate::post::{Axes, MotionCommand, PostProcessor, ProgramInfo};

/// Absorbs round-off when comparing against a row or ring boundary
pub const EPSILON: f64 = 1e-6;

/// Most raster rows or rings allowed at a single depth
pub const MAX_STEPS_PER_LAYER: usize = 100_000;

/// Modal words selecting the XY plane, millimetres and absolute coordinates
const SETUP_WORDS: &str = "G17 G21 G90";
/// First work coordinate system
const WORK_OFFSET: &str = "G54";
const TOOL: u32 = 1;

/// A point in the XY plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cutting parameters shared by all strategies
#[derive(Debug, Clone, PartialEq)]
pub struct CuttingParams {
    /// Total depth below the work surface (positive)
    pub depth: f64,
    /// Maximum depth of a single pass
    pub step_down: f64,
    /// Feed rate in mm/min
    pub feed: f64,
    /// Spindle speed in rpm
    pub spindle: u32,
    pub tool_diameter: f64,
    /// Clearance height for rapid moves
    pub safe_z: f64,
}

impl Default for CuttingParams {
    fn default() -> Self {
        Self {
            depth: 1.0,
            step_down: 0.5,
            feed: 800.0,
            spindle: 10000,
            tool_diameter: 10.0,
            safe_z: 5.0,
        }
    }
}

impl CuttingParams {
    pub(crate) fn check(&self) -> Result<(), GenerateError> {
        positive("depth", self.depth)?;
        positive("step_down", self.step_down)?;
        positive("feed", self.feed)?;
        positive("tool_diameter", self.tool_diameter)?;
        finite("safe_z", self.safe_z)
    }
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<(), GenerateError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GenerateError::invalid(name, format!("must be finite, got {value}")))
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), GenerateError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(GenerateError::invalid(name, format!("must be positive, got {value}")))
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<(), GenerateError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(GenerateError::invalid(name, format!("must not be negative, got {value}")))
    }
}

/// Number of positions `start + k * step` that stay within `start + span`.
///
/// Zero when the span is negative beyond round-off. Fails when the count is
/// not representable or exceeds [`MAX_STEPS_PER_LAYER`].
pub(crate) fn step_count(name: &'static str, span: f64, step: f64) -> Result<usize, GenerateError> {
    positive(name, step)?;
    if span + EPSILON < 0.0 {
        return Ok(0);
    }

    let count = ((span + EPSILON) / step).floor() + 1.0;
    if count.is_finite() && count <= MAX_STEPS_PER_LAYER as f64 {
        Ok(count as usize)
    } else {
        Err(GenerateError::invalid(
            name,
            format!("{step} gives {count} steps per layer, limit is {MAX_STEPS_PER_LAYER}"),
        ))
    }
}

/// Cut depths of successive passes as negative Z values.
///
/// There are `ceil(depth / step_down)` passes; pass `k` reaches
/// `-min(k * step_down, depth)`, so the last one lands exactly on `-depth`.
pub fn depth_passes(depth: f64, step_down: f64) -> Vec<f64> {
    if !(depth > 0.0 && step_down > 0.0) {
        return Vec::new();
    }
    // An exact multiple must not gain a pass from round-off in the division
    let count = (depth / step_down - 1e-9).ceil().max(1.0) as usize;
    (1..=count)
        .map(|k| {
            if k == count {
                -depth
            } else {
                -(k as f64 * step_down).min(depth)
            }
        })
        .collect()
}

/// Axis along which raster rows travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RasterAxis {
    /// Rows along X, stepping in Y
    #[default]
    X,
    /// Rows along Y, stepping in X
    Y,
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_corner(corner: Point, width: f64, length: f64) -> Self {
        Self {
            min_x: corner.x,
            min_y: corner.y,
            max_x: corner.x + width,
            max_y: corner.y + length,
        }
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Corners counter-clockwise from the minimum corner
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

/// One entry of a toolpath plan
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Header,
    ToolChange(u32),
    SpindleOn(u32),
    SpindleOff,
    CoolantOn,
    CoolantOff,
    /// Marker comment opening pass `index` (1-based) at depth `z`
    PassStart { index: usize, z: f64 },
    Motion(MotionCommand),
    Footer,
}

/// Ordered plan for one program
#[derive(Debug, Clone, PartialEq)]
pub struct Toolpath {
    pub program: ProgramInfo,
    pub steps: Vec<Step>,
}

impl Toolpath {
    pub fn new(program: ProgramInfo) -> Self {
        Self {
            program,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn motion(&mut self, command: MotionCommand) {
        self.steps.push(Step::Motion(command));
    }

    /// Header, modal setup, tool, spindle, coolant and a rapid to safe height
    fn preamble(&mut self, cutting: &CuttingParams) {
        self.push(Step::Header);
        self.motion(MotionCommand::word(SETUP_WORDS));
        self.motion(MotionCommand::word(WORK_OFFSET));
        self.push(Step::ToolChange(TOOL));
        self.push(Step::SpindleOn(cutting.spindle));
        self.push(Step::CoolantOn);
        self.motion(MotionCommand::rapid(Axes::z(cutting.safe_z)));
    }

    fn epilogue(&mut self) {
        self.push(Step::CoolantOff);
        self.push(Step::SpindleOff);
        self.push(Step::Footer);
    }

    /// Zig-zag over `area`, starting at its minimum corner.
    ///
    /// Rows are `stepover` apart; `row_feed` is attached to every move.
    fn raster(
        &mut self,
        area: &Bounds,
        axis: RasterAxis,
        stepover: f64,
        row_feed: Option<f64>,
    ) -> Result<(), GenerateError> {
        let (first, last) = match axis {
            RasterAxis::X => (area.min_y, area.max_y),
            RasterAxis::Y => (area.min_x, area.max_x),
        };
        let rows = step_count("stepover", last - first, stepover)?;

        for k in 0..rows {
            let row = first + k as f64 * stepover;
            let across = match (axis, k % 2 == 0) {
                (RasterAxis::X, true) => Axes::xy(area.max_x, row),
                (RasterAxis::X, false) => Axes::xy(area.min_x, row),
                (RasterAxis::Y, true) => Axes::xy(row, area.max_y),
                (RasterAxis::Y, false) => Axes::xy(row, area.min_y),
            };
            self.motion(MotionCommand::linear(across, row_feed));

            if k + 1 < rows {
                let next = first + (k + 1) as f64 * stepover;
                let step = match axis {
                    RasterAxis::X => Axes::y(next),
                    RasterAxis::Y => Axes::x(next),
                };
                self.motion(MotionCommand::linear(step, row_feed));
            }
        }
        Ok(())
    }

    /// Depths of the pass markers, in order
    pub fn pass_depths(&self) -> Vec<f64> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::PassStart { z, .. } => Some(*z),
                _ => None,
            })
            .collect()
    }

    /// Render the plan into program text with a trailing line break.
    ///
    /// Steps that render to nothing are skipped.
    pub fn render(&self, post: &PostProcessor) -> String {
        let mut f = post.session(self.program.clone());
        let mut lines: Vec<String> = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let line = match step {
                Step::Header => f.header(),
                Step::ToolChange(tool) => f.tool_change(*tool),
                Step::SpindleOn(rpm) => f.spindle_on(*rpm),
                Step::SpindleOff => f.spindle_off(),
                Step::CoolantOn => f.coolant_on(),
                Step::CoolantOff => f.coolant_off(),
                Step::PassStart { index, z } => {
                    let text = format!("PASS {index} Z{}", f.number(*z));
                    f.comment(&text)
                }
                Step::Motion(command) => f.command(command),
                Step::Footer => f.footer(),
            };
            if !line.is_empty() {
                lines.push(line);
            }
        }

        log::debug!(
            "Rendered program O{} into {} entries",
            self.program.number,
            lines.len()
        );

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}
