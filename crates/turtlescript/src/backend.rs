//! The drawing primitives that scripts can call.

use crate::value::{Color, Speed};

/// A drawing surface with a turtle on it.
///
/// Angles are in degrees. Only the interpreter's side of the contract is fixed here; what is
/// actually drawn is up to the implementation.
pub trait Turtle {
    fn forward(&mut self, distance: f64);
    fn back(&mut self, distance: f64);
    fn right(&mut self, angle: f64);
    fn left(&mut self, angle: f64);
    fn goto(&mut self, x: f64, y: f64);
    fn set_x(&mut self, x: f64);
    fn set_y(&mut self, y: f64);
    fn set_heading(&mut self, angle: f64);
    fn home(&mut self);
    /// Draws (part of) a circle whose center is `radius` units to the left of the turtle.
    fn circle(&mut self, radius: f64, extent: Option<f64>, steps: Option<u32>);
    fn dot(&mut self, size: Option<f64>, color: Option<Color>);
    /// Stamps the turtle shape onto the canvas, returning an id for [`Turtle::clear_stamp`].
    fn stamp(&mut self) -> i64;
    fn clear_stamp(&mut self, id: i64);
    /// Clears all stamps if `n` is `None`, otherwise the first `n` (or the last `-n`, if negative).
    fn clear_stamps(&mut self, n: Option<i64>);
    fn undo(&mut self);
    fn speed(&self) -> Speed;
    fn set_speed(&mut self, speed: Speed);
    /// Holds until the drawing surface is closed.
    fn wait(&mut self);
}

/// A single call made on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum TurtleCmd {
    Forward(f64),
    Back(f64),
    Right(f64),
    Left(f64),
    Goto(f64, f64),
    SetX(f64),
    SetY(f64),
    SetHeading(f64),
    Home,
    Circle {
        radius: f64,
        extent: Option<f64>,
        steps: Option<u32>,
    },
    Dot {
        size: Option<f64>,
        color: Option<Color>,
    },
    Stamp(i64),
    ClearStamp(i64),
    ClearStamps(Option<i64>),
    Undo,
    Speed(Speed),
    Wait,
}

impl std::fmt::Display for TurtleCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt<T: std::fmt::Display>(x: &Option<T>) -> String {
            x.as_ref().map_or_else(|| "-".to_owned(), |x| x.to_string())
        }

        match self {
            TurtleCmd::Forward(x) => write!(f, "forward {x}"),
            TurtleCmd::Back(x) => write!(f, "back {x}"),
            TurtleCmd::Right(x) => write!(f, "right {x}"),
            TurtleCmd::Left(x) => write!(f, "left {x}"),
            TurtleCmd::Goto(x, y) => write!(f, "goto {x} {y}"),
            TurtleCmd::SetX(x) => write!(f, "setx {x}"),
            TurtleCmd::SetY(y) => write!(f, "sety {y}"),
            TurtleCmd::SetHeading(x) => write!(f, "setheading {x}"),
            TurtleCmd::Home => f.write_str("home"),
            TurtleCmd::Circle {
                radius,
                extent,
                steps,
            } => write!(f, "circle {radius} {} {}", opt(extent), opt(steps)),
            TurtleCmd::Dot { size, color } => write!(f, "dot {} {}", opt(size), opt(color)),
            TurtleCmd::Stamp(id) => write!(f, "stamp {id}"),
            TurtleCmd::ClearStamp(id) => write!(f, "clearstamp {id}"),
            TurtleCmd::ClearStamps(n) => write!(f, "clearstamps {}", opt(n)),
            TurtleCmd::Undo => f.write_str("undo"),
            TurtleCmd::Speed(s) => write!(f, "speed {}", s.0),
            TurtleCmd::Wait => f.write_str("wait"),
        }
    }
}

/// A [`Turtle`] that draws nothing, and just remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<TurtleCmd>,
    next_stamp: i64,
    speed: Speed,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Turtle for Recorder {
    fn forward(&mut self, distance: f64) {
        self.calls.push(TurtleCmd::Forward(distance));
    }

    fn back(&mut self, distance: f64) {
        self.calls.push(TurtleCmd::Back(distance));
    }

    fn right(&mut self, angle: f64) {
        self.calls.push(TurtleCmd::Right(angle));
    }

    fn left(&mut self, angle: f64) {
        self.calls.push(TurtleCmd::Left(angle));
    }

    fn goto(&mut self, x: f64, y: f64) {
        self.calls.push(TurtleCmd::Goto(x, y));
    }

    fn set_x(&mut self, x: f64) {
        self.calls.push(TurtleCmd::SetX(x));
    }

    fn set_y(&mut self, y: f64) {
        self.calls.push(TurtleCmd::SetY(y));
    }

    fn set_heading(&mut self, angle: f64) {
        self.calls.push(TurtleCmd::SetHeading(angle));
    }

    fn home(&mut self) {
        self.calls.push(TurtleCmd::Home);
    }

    fn circle(&mut self, radius: f64, extent: Option<f64>, steps: Option<u32>) {
        self.calls.push(TurtleCmd::Circle {
            radius,
            extent,
            steps,
        });
    }

    fn dot(&mut self, size: Option<f64>, color: Option<Color>) {
        self.calls.push(TurtleCmd::Dot { size, color });
    }

    fn stamp(&mut self) -> i64 {
        self.next_stamp += 1;
        self.calls.push(TurtleCmd::Stamp(self.next_stamp));
        self.next_stamp
    }

    fn clear_stamp(&mut self, id: i64) {
        self.calls.push(TurtleCmd::ClearStamp(id));
    }

    fn clear_stamps(&mut self, n: Option<i64>) {
        self.calls.push(TurtleCmd::ClearStamps(n));
    }

    fn undo(&mut self) {
        self.calls.push(TurtleCmd::Undo);
    }

    fn speed(&self) -> Speed {
        self.speed
    }

    fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        self.calls.push(TurtleCmd::Speed(speed));
    }

    fn wait(&mut self) {
        self.calls.push(TurtleCmd::Wait);
    }
}
