/// A value flowing through a script: a coerced argument, or the return value of a command.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Val {
    /// The absent value. Commands without a result return this, and so does `cap::` for a
    /// variable that was never captured.
    #[default]
    None,
    Int(i64),
    Float(f64),
    /// A token passed through without interpretation (color names, speed names, variable names).
    Word(String),
    Tuple(Vec<Val>),
}

impl Val {
    /// The numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Val::Int(x) => Some(*x as f64),
            Val::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The integer value, if this is a number without a fractional part.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Val::Int(x) => Some(*x),
            Val::Float(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => Some(*x as i64),
            _ => None,
        }
    }
}

impl From<f64> for Val {
    fn from(x: f64) -> Self {
        Val::Float(x)
    }
}

impl From<i64> for Val {
    fn from(x: i64) -> Self {
        Val::Int(x)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Word(s.to_owned())
    }
}

impl From<()> for Val {
    fn from(_: ()) -> Self {
        Val::None
    }
}

impl TryFrom<Val> for f64 {
    type Error = ();

    fn try_from(value: Val) -> Result<Self, ()> {
        value.as_f64().ok_or(())
    }
}

impl TryFrom<Val> for i64 {
    type Error = ();

    fn try_from(value: Val) -> Result<Self, ()> {
        value.as_int().ok_or(())
    }
}

impl TryFrom<Val> for String {
    type Error = ();

    fn try_from(value: Val) -> Result<Self, ()> {
        match value {
            Val::Word(s) => Ok(s),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Val::None => f.write_str("none"),
            Val::Int(x) => x.fmt(f),
            Val::Float(x) => x.fmt(f),
            Val::Word(w) => w.fmt(f),
            Val::Tuple(items) => {
                f.write_str("(")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    v.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A color as the drawing backend understands it.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    /// A color name or hex string, passed through to the backend as-is.
    Named(String),
    Rgb(f64, f64, f64),
}

impl TryFrom<Val> for Color {
    type Error = ();

    fn try_from(value: Val) -> Result<Self, ()> {
        match value {
            Val::Word(w) => Ok(Color::Named(w)),
            Val::Tuple(items) => match items.as_slice() {
                [r, g, b] => Ok(Color::Rgb(
                    r.as_f64().ok_or(())?,
                    g.as_f64().ok_or(())?,
                    b.as_f64().ok_or(())?,
                )),
                _ => Err(()),
            },
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Named(name) => name.fmt(f),
            Color::Rgb(r, g, b) => write!(f, "rgb({r},{g},{b})"),
        }
    }
}

/// Turtle animation speed, from 0 (no animation) through 1 (slowest) to 10 (fast).
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct Speed(pub u8);

impl Default for Speed {
    fn default() -> Self {
        Speed::SLOW
    }
}

impl Speed {
    pub const FASTEST: Speed = Speed(0);
    pub const FAST: Speed = Speed(10);
    pub const NORMAL: Speed = Speed(6);
    pub const SLOW: Speed = Speed(3);
    pub const SLOWEST: Speed = Speed(1);

    pub fn from_name(name: &str) -> Option<Speed> {
        Some(match name {
            "fastest" => Speed::FASTEST,
            "fast" => Speed::FAST,
            "normal" => Speed::NORMAL,
            "slow" => Speed::SLOW,
            "slowest" => Speed::SLOWEST,
            _ => return None,
        })
    }

    /// Numbers outside of `0.5..10.5` all mean "no animation".
    pub fn from_num(x: f64) -> Speed {
        if 0.5 < x && x < 10.5 {
            Speed(x.round_ties_even() as u8)
        } else {
            Speed(0)
        }
    }
}

impl TryFrom<Val> for Speed {
    type Error = ();

    fn try_from(value: Val) -> Result<Self, ()> {
        match &value {
            Val::Word(w) => Speed::from_name(w).ok_or(()),
            v => v.as_f64().map(Speed::from_num).ok_or(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Val::Int(5).to_string(), "5");
        assert_eq!(Val::Float(2.5).to_string(), "2.5");
        assert_eq!(Val::None.to_string(), "none");
        let rgb = Val::Tuple(vec![Val::Int(1), Val::Float(0.5), Val::Int(3)]);
        assert_eq!(rgb.to_string(), "(1, 0.5, 3)");
    }

    #[test]
    fn colors() {
        assert_eq!(
            Color::try_from(Val::from("red")),
            Ok(Color::Named("red".to_owned()))
        );
        let rgb = Val::Tuple(vec![Val::Int(1), Val::Int(2), Val::Int(3)]);
        assert_eq!(Color::try_from(rgb), Ok(Color::Rgb(1.0, 2.0, 3.0)));
        assert!(Color::try_from(Val::Int(7)).is_err());
    }

    #[test]
    fn speeds() {
        assert_eq!(Speed::try_from(Val::from("slow")), Ok(Speed::SLOW));
        assert_eq!(Speed::try_from(Val::Float(3.4)), Ok(Speed(3)));
        assert_eq!(Speed::try_from(Val::Int(11)), Ok(Speed(0)));
        assert_eq!(Speed::try_from(Val::Float(0.2)), Ok(Speed(0)));
        assert!(Speed::try_from(Val::from("warp")).is_err());
        assert!(Speed::try_from(Val::None).is_err());
    }
}
