//! Motion commands
//!
//! Closed set of machine instructions handed to the formatter. Each variant
//! carries only the fields that mean something for it.

/// Rotation direction of a circular move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcDirection {
    /// G2
    #[default]
    Clockwise,
    /// G3
    CounterClockwise,
}

impl ArcDirection {
    pub fn word(self) -> &'static str {
        match self {
            ArcDirection::Clockwise => "G2",
            ArcDirection::CounterClockwise => "G3",
        }
    }
}

/// Optional target coordinates of a move
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl Axes {
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    pub fn x(x: f64) -> Self {
        Self {
            x: Some(x),
            ..Self::default()
        }
    }

    pub fn y(y: f64) -> Self {
        Self {
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn z(z: f64) -> Self {
        Self {
            z: Some(z),
            ..Self::default()
        }
    }
}

/// One machine instruction
#[derive(Debug, Clone, PartialEq)]
pub enum MotionCommand {
    /// G0 positioning move
    Rapid(Axes),
    /// G1 cutting move
    Linear {
        to: Axes,
        feed: Option<f64>,
        /// Spindle speed change carried on the block
        speed: Option<u32>,
    },
    /// G2/G3 move in the XY plane, center given relative to the start point
    Arc {
        direction: ArcDirection,
        to: Axes,
        center_offset: (f64, f64),
        feed: Option<f64>,
        speed: Option<u32>,
    },
    /// Modal words emitted verbatim, e.g. `G17 G21 G90`
    Word(String),
}

/// Field letters in the order they are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    X,
    Y,
    Z,
    I,
    J,
    F,
    S,
}

impl Field {
    pub(crate) fn letter(self) -> char {
        match self {
            Field::X => 'X',
            Field::Y => 'Y',
            Field::Z => 'Z',
            Field::I => 'I',
            Field::J => 'J',
            Field::F => 'F',
            Field::S => 'S',
        }
    }
}

impl MotionCommand {
    pub fn rapid(to: Axes) -> Self {
        Self::Rapid(to)
    }

    pub fn linear(to: Axes, feed: Option<f64>) -> Self {
        Self::Linear {
            to,
            feed,
            speed: None,
        }
    }

    /// Attach a spindle speed to a cutting move; other variants are unchanged
    pub fn with_speed(mut self, rpm: u32) -> Self {
        if let MotionCommand::Linear { speed, .. } | MotionCommand::Arc { speed, .. } = &mut self {
            *speed = Some(rpm);
        }
        self
    }

    pub fn word(word: impl Into<String>) -> Self {
        Self::Word(word.into())
    }

    /// The command word the block starts with
    pub fn command_word(&self) -> &str {
        match self {
            MotionCommand::Rapid(_) => "G0",
            MotionCommand::Linear { .. } => "G1",
            MotionCommand::Arc { direction, .. } => direction.word(),
            MotionCommand::Word(word) => word.trim(),
        }
    }

    /// Present fields in canonical order
    pub(crate) fn fields(&self) -> Vec<(Field, f64)> {
        let (to, center, feed, speed) = match self {
            MotionCommand::Rapid(to) => (Some(to), None, None, None),
            MotionCommand::Linear { to, feed, speed } => (Some(to), None, *feed, *speed),
            MotionCommand::Arc {
                to,
                center_offset,
                feed,
                speed,
                ..
            } => (Some(to), Some(*center_offset), *feed, *speed),
            MotionCommand::Word(_) => (None, None, None, None),
        };

        let mut fields = Vec::with_capacity(7);
        if let Some(to) = to {
            fields.extend(to.x.map(|v| (Field::X, v)));
            fields.extend(to.y.map(|v| (Field::Y, v)));
            fields.extend(to.z.map(|v| (Field::Z, v)));
        }
        if let Some((i, j)) = center {
            fields.push((Field::I, i));
            fields.push((Field::J, j));
        }
        fields.extend(feed.map(|v| (Field::F, v)));
        fields.extend(speed.map(|v| (Field::S, f64::from(v))));
        fields
    }
}
