//! Round pocket
//!
//! Concentric full-circle rings at each depth, growing outward from the
//! center by a fraction of the tool diameter.

use crate::error::GenerateError;
use crate::post::{ArcDirection, Axes, MotionCommand, PostProcessor, ProgramInfo};
use crate::toolpath::{
    CuttingParams, Point, Step, Toolpath, depth_passes, positive, step_count,
};

pub const PROGRAM_NUMBER: u32 = 1001;
pub const PROGRAM_TITLE: &str = "ROUND_POCKET_RINGS";

/// Smallest first ring radius
const MIN_RING_RADIUS: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct RoundPocketParams {
    pub diameter: f64,
    pub center: Point,
    pub cutting: CuttingParams,
    /// Ring spacing as a fraction of the tool diameter
    pub stepover_ratio: f64,
    pub direction: ArcDirection,
}

impl RoundPocketParams {
    pub fn new(diameter: f64, cutting: CuttingParams) -> Self {
        Self {
            diameter,
            center: Point::default(),
            cutting,
            stepover_ratio: 0.6,
            direction: ArcDirection::Clockwise,
        }
    }
}

/// Radii of the rings cut at every depth.
///
/// Starts at 60% of the tool radius and never exceeds `max_radius`.
pub fn ring_radii(
    tool_radius: f64,
    max_radius: f64,
    stepover: f64,
) -> Result<Vec<f64>, GenerateError> {
    let first = (tool_radius * 0.6).max(MIN_RING_RADIUS);
    let count = step_count("stepover_ratio", max_radius - first, stepover)?;

    Ok((0..count)
        .map(|k| (first + k as f64 * stepover).min(max_radius))
        .collect())
}

/// Plan a round pocket program.
///
/// Fails with [`GenerateError::PocketTooSmall`] when the pocket leaves no
/// room for the tool to move.
pub fn plan_round_pocket(params: &RoundPocketParams) -> Result<Toolpath, GenerateError> {
    let cutting = &params.cutting;
    cutting.check()?;
    positive("diameter", params.diameter)?;
    positive("stepover_ratio", params.stepover_ratio)?;

    let tool_radius = cutting.tool_diameter / 2.0;
    let max_radius = params.diameter / 2.0 - tool_radius;
    if max_radius <= 0.0 {
        return Err(GenerateError::PocketTooSmall {
            diameter: params.diameter,
            tool_diameter: cutting.tool_diameter,
        });
    }

    let Point { x: cx, y: cy } = params.center;
    let radii = ring_radii(
        tool_radius,
        max_radius,
        cutting.tool_diameter * params.stepover_ratio,
    )?;
    let passes = depth_passes(cutting.depth, cutting.step_down);

    let mut path = Toolpath::new(ProgramInfo::new(PROGRAM_NUMBER, PROGRAM_TITLE));
    path.preamble(cutting);

    for (i, &z) in passes.iter().enumerate() {
        path.push(Step::PassStart { index: i + 1, z });
        path.motion(MotionCommand::rapid(Axes::xy(cx, cy)));
        path.motion(MotionCommand::linear(Axes::z(z), Some(cutting.feed)));

        for &r in &radii {
            // Each ring starts and ends right of the center
            let (x0, y0) = (cx + r, cy);
            path.motion(MotionCommand::linear(Axes::xy(x0, y0), Some(cutting.feed)));
            path.motion(MotionCommand::Arc {
                direction: params.direction,
                to: Axes::xy(x0, y0),
                center_offset: (cx - x0, cy - y0),
                feed: Some(cutting.feed),
                speed: None,
            });
        }

        path.motion(MotionCommand::rapid(Axes::z(cutting.safe_z)));
    }

    path.epilogue();

    log::debug!(
        "Round pocket plan: {} passes of {} rings",
        passes.len(),
        radii.len()
    );
    Ok(path)
}

/// Generate a round pocket program
pub fn generate_round_pocket(
    params: &RoundPocketParams,
    post: &PostProcessor,
) -> Result<String, GenerateError> {
    Ok(plan_round_pocket(params)?.render(post))
}
