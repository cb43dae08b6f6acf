//! Square pocket
//!
//! Raster roughing like face milling with a selectable row direction and an
//! optional perimeter pass at every depth.

use crate::error::GenerateError;
use crate::post::{Axes, MotionCommand, PostProcessor, ProgramInfo};
use crate::toolpath::{
    Bounds, CuttingParams, Point, RasterAxis, Step, Toolpath, depth_passes, non_negative,
    positive,
};

pub const PROGRAM_NUMBER: u32 = 1002;
pub const PROGRAM_TITLE: &str = "SQUARE_POCKET";

#[derive(Debug, Clone, PartialEq)]
pub struct SquarePocketParams {
    pub width: f64,
    pub length: f64,
    pub start: Point,
    pub cutting: CuttingParams,
    /// Row spacing as a fraction of the tool diameter
    pub stepover_ratio: f64,
    /// Overrun past each edge, as a fraction of the tool diameter
    pub overlap: f64,
    /// Trace the rectangle after the raster at every depth
    pub finish_contour: bool,
    pub raster_axis: RasterAxis,
}

impl SquarePocketParams {
    pub fn new(width: f64, length: f64, cutting: CuttingParams) -> Self {
        Self {
            width,
            length,
            start: Point::default(),
            cutting,
            stepover_ratio: 0.6,
            overlap: 0.5,
            finish_contour: true,
            raster_axis: RasterAxis::X,
        }
    }
}

/// Plan a square pocket program
pub fn plan_square_pocket(params: &SquarePocketParams) -> Result<Toolpath, GenerateError> {
    let cutting = &params.cutting;
    cutting.check()?;
    non_negative("width", params.width)?;
    non_negative("length", params.length)?;
    non_negative("overlap", params.overlap)?;
    positive("stepover_ratio", params.stepover_ratio)?;

    let area = Bounds::from_corner(params.start, params.width, params.length)
        .expanded(cutting.tool_diameter * params.overlap);
    let stepover = cutting.tool_diameter * params.stepover_ratio;
    let passes = depth_passes(cutting.depth, cutting.step_down);

    let mut path = Toolpath::new(ProgramInfo::new(PROGRAM_NUMBER, PROGRAM_TITLE));
    path.preamble(cutting);
    path.motion(MotionCommand::rapid(Axes::xy(area.min_x, area.min_y)));

    for (i, &z) in passes.iter().enumerate() {
        path.push(Step::PassStart { index: i + 1, z });
        path.motion(MotionCommand::linear(Axes::z(z), Some(cutting.feed)));
        path.raster(&area, params.raster_axis, stepover, None)?;

        if params.finish_contour {
            let corners = area.corners();
            for corner in corners.iter().chain(&corners[..1]) {
                path.motion(MotionCommand::linear(Axes::xy(corner.x, corner.y), None));
            }
        }

        path.motion(MotionCommand::rapid(Axes::z(cutting.safe_z)));
    }

    path.epilogue();

    log::debug!(
        "Square pocket plan: {} passes along {:?}, {} steps",
        passes.len(),
        params.raster_axis,
        path.steps.len()
    );
    Ok(path)
}

/// Generate a square pocket program
pub fn generate_square_pocket(
    params: &SquarePocketParams,
    post: &PostProcessor,
) -> Result<String, GenerateError> {
    Ok(plan_square_pocket(params)?.render(post))
}
