//! Face milling
//!
//! Zig-zag raster over the stock rectangle, grown by a fraction of the tool
//! diameter so no rim is left at the edges.

use crate::error::GenerateError;
use crate::post::{Axes, MotionCommand, PostProcessor, ProgramInfo};
use crate::toolpath::{
    Bounds, CuttingParams, Point, RasterAxis, Step, Toolpath, depth_passes, non_negative,
};

pub const PROGRAM_NUMBER: u32 = 1000;
pub const PROGRAM_TITLE: &str = "FACE";

/// Row spacing as a fraction of the tool diameter
pub const STEPOVER_RATIO: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct FaceParams {
    /// Size along X
    pub width: f64,
    /// Size along Y
    pub length: f64,
    /// Minimum corner of the stock
    pub start: Point,
    pub cutting: CuttingParams,
    /// Overrun past each edge, as a fraction of the tool diameter
    pub overlap: f64,
}

impl FaceParams {
    pub fn new(width: f64, length: f64, cutting: CuttingParams) -> Self {
        Self {
            width,
            length,
            start: Point::default(),
            cutting,
            overlap: 0.5,
        }
    }
}

/// Plan a facing program
pub fn plan_face(params: &FaceParams) -> Result<Toolpath, GenerateError> {
    let cutting = &params.cutting;
    cutting.check()?;
    non_negative("width", params.width)?;
    non_negative("length", params.length)?;
    non_negative("overlap", params.overlap)?;

    let area = Bounds::from_corner(params.start, params.width, params.length)
        .expanded(cutting.tool_diameter * params.overlap);
    let stepover = cutting.tool_diameter * STEPOVER_RATIO;
    let passes = depth_passes(cutting.depth, cutting.step_down);

    let mut path = Toolpath::new(ProgramInfo::new(PROGRAM_NUMBER, PROGRAM_TITLE));
    path.preamble(cutting);
    path.motion(MotionCommand::rapid(Axes::xy(area.min_x, area.min_y)));

    for (i, &z) in passes.iter().enumerate() {
        path.push(Step::PassStart { index: i + 1, z });
        path.motion(MotionCommand::linear(Axes::z(z), Some(cutting.feed)));
        path.raster(&area, RasterAxis::X, stepover, Some(cutting.feed))?;
    }

    path.motion(MotionCommand::rapid(Axes::z(cutting.safe_z)));
    path.epilogue();

    log::debug!(
        "Face plan: {} passes, {} steps",
        passes.len(),
        path.steps.len()
    );
    Ok(path)
}

/// Generate a facing program
pub fn generate_face(params: &FaceParams, post: &PostProcessor) -> Result<String, GenerateError> {
    Ok(plan_face(params)?.render(post))
}
