//! Turning raw argument tokens into values.
//!
//! Every positional slot of a command has a type tag naming the coercion to use. A tag can be
//! composite: `num?raw` tries `num` first and falls back to `raw` if that fails.

use std::collections::HashMap;

use crate::{error::FormatError, state::CaptureState, value::Val};

/// Tokens with this prefix are looked up in the capture state instead of being coerced.
pub const CAPTURE_PREFIX: &str = "cap::";

/// A coerced argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Val(Val),
    /// A slot for the capture state, which is handed to the command when it is invoked.
    State,
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Val(v) => v.fmt(f),
            Arg::State => f.write_str("<state>"),
        }
    }
}

/// A coercion function. It gets read access to the capture state.
pub type Coercion = fn(&str, &CaptureState) -> Result<Arg, ()>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag(String);

impl TypeTag {
    pub const STATE: &'static str = "state";

    pub fn new(tag: impl Into<String>) -> Self {
        TypeTag(tag.into())
    }

    /// The coercions to try, in order.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.split('?')
    }

    pub fn is_state(&self) -> bool {
        self.0 == Self::STATE
    }
}

impl From<&str> for TypeTag {
    fn from(s: &str) -> Self {
        TypeTag::new(s)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Parses a number, preferring an integer if the number has no fractional part.
pub fn parse_num(token: &str) -> Result<Val, ()> {
    let x: f64 = token.parse().map_err(|_| ())?;
    if !x.is_finite() {
        return Err(());
    }
    if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
        Ok(Val::Int(x as i64))
    } else {
        Ok(Val::Float(x))
    }
}

/// Parses `rgb(r,g,b)` into a triple of numbers. Anything else, including `rgb(...)` with the wrong
/// number of components, is a color name, kept as it is.
pub fn parse_color(token: &str) -> Result<Val, ()> {
    let Some(inner) = token
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Ok(Val::Word(token.to_owned()));
    };
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 3 {
        return Ok(Val::Word(token.to_owned()));
    }
    let components = parts
        .into_iter()
        .map(parse_num)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Val::Tuple(components))
}

/// Maps type tags to coercions.
#[derive(Clone)]
pub struct TypeRegistry {
    coercions: HashMap<String, Coercion>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut ret = TypeRegistry {
            coercions: HashMap::new(),
        };
        ret.register("num", |tok, _state| parse_num(tok).map(Arg::Val));
        ret.register("color", |tok, _state| parse_color(tok).map(Arg::Val));
        ret.register("raw", |tok, _state| Ok(Arg::Val(Val::Word(tok.to_owned()))));
        ret.register(TypeTag::STATE, |_tok, _state| Ok(Arg::State));
        ret
    }
}

impl TypeRegistry {
    pub fn register(&mut self, name: &str, coercion: Coercion) {
        self.coercions.insert(name.to_owned(), coercion);
    }

    /// Returns the first part of `tag` that has no registered coercion.
    pub fn unknown_part<'t>(&self, tag: &'t TypeTag) -> Option<&'t str> {
        tag.parts().find(|part| !self.coercions.contains_key(*part))
    }

    pub fn coerce(
        &self,
        tag: &TypeTag,
        token: &str,
        state: &CaptureState,
    ) -> Result<Arg, FormatError> {
        if let Some(name) = token.strip_prefix(CAPTURE_PREFIX) {
            return Ok(Arg::Val(state.get(name)));
        }
        tag.parts()
            .find_map(|part| {
                let coercion = self.coercions.get(part)?;
                coercion(token, state).ok()
            })
            .ok_or_else(|| FormatError {
                token: token.to_owned(),
                tag: tag.to_string(),
            })
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.coercions.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry").field("tags", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(tag: &str, token: &str) -> Result<Arg, FormatError> {
        TypeRegistry::default().coerce(&tag.into(), token, &CaptureState::new())
    }

    #[test]
    fn nums() {
        assert_eq!(parse_num("5"), Ok(Val::Int(5)));
        assert_eq!(parse_num("5.0"), Ok(Val::Int(5)));
        assert_eq!(parse_num("-2e2"), Ok(Val::Int(-200)));
        assert_eq!(parse_num("2.5"), Ok(Val::Float(2.5)));
        assert_eq!(parse_num("abc"), Err(()));
        assert_eq!(parse_num("inf"), Err(()));
        assert_eq!(parse_num("nan"), Err(()));
        assert_eq!(parse_num("1e300"), Ok(Val::Float(1e300)));
    }

    #[test]
    fn colors() {
        assert_eq!(
            parse_color("rgb(1,2,3)"),
            Ok(Val::Tuple(vec![Val::Int(1), Val::Int(2), Val::Int(3)]))
        );
        assert_eq!(
            parse_color("rgb(0.5,2,3)"),
            Ok(Val::Tuple(vec![Val::Float(0.5), Val::Int(2), Val::Int(3)]))
        );
        assert_eq!(parse_color("red"), Ok(Val::from("red")));
        assert_eq!(parse_color("#ff0000"), Ok(Val::from("#ff0000")));
        assert_eq!(parse_color("rgb(1,x,3)"), Err(()));
        assert_eq!(parse_color("rgb(1,2)"), Ok(Val::from("rgb(1,2)")));
        assert_eq!(parse_color("rgb()"), Ok(Val::from("rgb()")));
    }

    #[test]
    fn num_failure_names_the_token() {
        assert_eq!(
            coerce("num", "abc"),
            Err(FormatError {
                token: "abc".to_owned(),
                tag: "num".to_owned()
            })
        );
    }

    #[test]
    fn composite() {
        assert_eq!(coerce("num?raw", "fast"), Ok(Arg::Val(Val::from("fast"))));
        assert_eq!(coerce("num?raw", "5"), Ok(Arg::Val(Val::Int(5))));
        assert!(coerce("num?color", "rgb(1,2,3)").is_ok());
        assert!(coerce("num?num", "x").is_err());
    }

    #[test]
    fn state_ignores_token() {
        assert_eq!(coerce("state", "whatever"), Ok(Arg::State));
    }

    #[test]
    fn capture_lookup_bypasses_coercion() {
        let types = TypeRegistry::default();
        let mut state = CaptureState::new();
        state.set("out", Val::from("not a number"));
        assert_eq!(
            types.coerce(&"num".into(), "cap::out", &state),
            Ok(Arg::Val(Val::from("not a number")))
        );
        assert_eq!(
            types.coerce(&"color".into(), "cap::missing", &state),
            Ok(Arg::Val(Val::None))
        );
    }

    #[test]
    fn unknown_parts() {
        let types = TypeRegistry::default();
        assert_eq!(types.unknown_part(&"num?raw".into()), None);
        assert_eq!(types.unknown_part(&"num?angle".into()), Some("angle"));
    }
}
