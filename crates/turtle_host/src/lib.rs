use std::collections::{HashSet, VecDeque};

use kurbo::{Point, Rect, Vec2};
use turtlescript::{Color, Speed, Turtle};

/// How many actions [`Canvas::undo`] can go back.
pub const UNDO_BUFFER: usize = 1000;

const DEFAULT_DOT_SIZE: f64 = 5.0;
/// Most chords a single circle is drawn with.
pub const MAX_CIRCLE_STEPS: u32 = 3600;

/// A single element of a drawing.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Draw a line from the previous position to here.
    MoveTo { x: f64, y: f64 },
    Dot {
        x: f64,
        y: f64,
        size: f64,
        color: Option<Color>,
    },
    Stamp {
        id: i64,
        x: f64,
        y: f64,
        heading: f64,
    },
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = |x: f64| x.round() as i32;
        match self {
            Op::MoveTo { x, y } => write!(f, "moveto {} {}", r(*x), r(*y)),
            Op::Dot { x, y, size, color } => {
                write!(f, "dot {} {} {}", r(*x), r(*y), size)?;
                if let Some(color) = color {
                    write!(f, " {color}")?;
                }
                Ok(())
            }
            Op::Stamp { id, x, y, heading } => {
                write!(f, "stamp {id} {} {} {}", r(*x), r(*y), r(*heading))
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Snapshot {
    pos: Point,
    heading: f64,
    num_ops: usize,
}

/// A headless turtle that records what it draws as a list of [`Op`]s.
///
/// The turtle starts at the origin facing east (heading 0). Angles are in degrees and go
/// counter-clockwise, and the pen is always down.
#[derive(Clone, Debug)]
pub struct Canvas {
    pos: Point,
    heading: f64,
    speed: Speed,
    ops: Vec<Op>,
    cleared: HashSet<i64>,
    next_stamp: i64,
    undo: VecDeque<Snapshot>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            pos: Point::ORIGIN,
            heading: 0.0,
            speed: Speed::default(),
            ops: Vec::new(),
            cleared: HashSet::new(),
            next_stamp: 1,
            undo: VecDeque::new(),
        }
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// The drawing so far, without the stamps that were cleared.
    pub fn ops(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter().filter(|op| match op {
            Op::Stamp { id, .. } => !self.cleared.contains(id),
            _ => true,
        })
    }

    /// The smallest rectangle containing the origin and everything drawn.
    pub fn bounds(&self) -> Rect {
        self.ops().fold(Rect::ZERO, |rect, op| {
            let pt = match op {
                Op::MoveTo { x, y } | Op::Dot { x, y, .. } | Op::Stamp { x, y, .. } => {
                    Point::new(*x, *y)
                }
            };
            rect.union_pt(pt)
        })
    }

    fn stamp_ids(&self) -> Vec<i64> {
        self.ops()
            .filter_map(|op| match op {
                Op::Stamp { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn checkpoint(&mut self) {
        if self.undo.len() == UNDO_BUFFER {
            self.undo.pop_front();
        }
        self.undo.push_back(Snapshot {
            pos: self.pos,
            heading: self.heading,
            num_ops: self.ops.len(),
        });
    }

    fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading.to_radians())
    }

    fn go(&mut self, distance: f64) {
        let target = self.pos + self.direction() * distance;
        self.go_to(target);
    }

    fn go_to(&mut self, target: Point) {
        self.pos = target;
        self.ops.push(Op::MoveTo {
            x: target.x,
            y: target.y,
        });
    }

    fn rotate(&mut self, angle: f64) {
        self.heading = (self.heading + angle).rem_euclid(360.0);
    }
}

impl Turtle for Canvas {
    fn forward(&mut self, distance: f64) {
        self.checkpoint();
        self.go(distance);
    }

    fn back(&mut self, distance: f64) {
        self.checkpoint();
        self.go(-distance);
    }

    fn right(&mut self, angle: f64) {
        self.checkpoint();
        self.rotate(-angle);
    }

    fn left(&mut self, angle: f64) {
        self.checkpoint();
        self.rotate(angle);
    }

    fn goto(&mut self, x: f64, y: f64) {
        self.checkpoint();
        self.go_to(Point::new(x, y));
    }

    fn set_x(&mut self, x: f64) {
        self.checkpoint();
        self.go_to(Point::new(x, self.pos.y));
    }

    fn set_y(&mut self, y: f64) {
        self.checkpoint();
        self.go_to(Point::new(self.pos.x, y));
    }

    fn set_heading(&mut self, angle: f64) {
        self.checkpoint();
        self.heading = angle.rem_euclid(360.0);
    }

    fn home(&mut self) {
        self.checkpoint();
        self.go_to(Point::ORIGIN);
        self.heading = 0.0;
    }

    fn circle(&mut self, radius: f64, extent: Option<f64>, steps: Option<u32>) {
        self.checkpoint();
        let extent = extent.unwrap_or(360.0);
        let frac = extent.abs() / 360.0;
        let steps = match steps {
            Some(n) => n,
            None => {
                let auto = (11.0 + radius.abs() / 6.0).min(59.0) * frac + 1.0;
                auto.min(MAX_CIRCLE_STEPS as f64) as u32
            }
        };
        if steps > MAX_CIRCLE_STEPS {
            log::warn!("circle with {steps} steps, drawing {MAX_CIRCLE_STEPS}");
        }
        let steps = steps.clamp(1, MAX_CIRCLE_STEPS);
        // Walk the chords of a regular polygon, starting and ending half a turn off.
        let mut w = extent / steps as f64;
        let mut w2 = 0.5 * w;
        let mut len = 2.0 * radius * w2.to_radians().sin();
        if radius < 0.0 {
            (len, w, w2) = (-len, -w, -w2);
        }
        self.rotate(w2);
        for _ in 0..steps {
            self.go(len);
            self.rotate(w);
        }
        self.rotate(-w2);
    }

    fn dot(&mut self, size: Option<f64>, color: Option<Color>) {
        self.checkpoint();
        self.ops.push(Op::Dot {
            x: self.pos.x,
            y: self.pos.y,
            size: size.unwrap_or(DEFAULT_DOT_SIZE),
            color,
        });
    }

    fn stamp(&mut self) -> i64 {
        self.checkpoint();
        let id = self.next_stamp;
        self.next_stamp += 1;
        self.ops.push(Op::Stamp {
            id,
            x: self.pos.x,
            y: self.pos.y,
            heading: self.heading,
        });
        id
    }

    fn clear_stamp(&mut self, id: i64) {
        if self.stamp_ids().contains(&id) {
            self.cleared.insert(id);
        } else {
            log::debug!("no stamp with id {id}");
        }
    }

    fn clear_stamps(&mut self, n: Option<i64>) {
        let ids = self.stamp_ids();
        let ids = match n {
            None => &ids[..],
            Some(n) if n >= 0 => &ids[..(n as usize).min(ids.len())],
            Some(n) => &ids[ids.len().saturating_sub(n.unsigned_abs() as usize)..],
        };
        self.cleared.extend(ids);
    }

    fn undo(&mut self) {
        let Some(snap) = self.undo.pop_back() else {
            log::debug!("nothing to undo");
            return;
        };
        self.pos = snap.pos;
        self.heading = snap.heading;
        self.ops.truncate(snap.num_ops);
    }

    fn speed(&self) -> Speed {
        self.speed
    }

    fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    fn wait(&mut self) {
        log::info!("nothing to wait for on a headless canvas");
    }
}
