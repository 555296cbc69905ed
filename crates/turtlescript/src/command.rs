use std::collections::{BTreeMap, HashMap};

use crate::{
    backend::Turtle,
    coerce::{Arg, TypeRegistry, TypeTag},
    error::{CallError, RegistryError},
    state::CaptureState,
    value::Val,
};

/// How much of the turtle a command set exposes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Movement and capture only.
    Basic,
    /// Everything, including circles, dots, stamps, undo and speed.
    #[default]
    Full,
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "basic" => Ok(Level::Basic),
            "full" => Ok(Level::Full),
            _ => Err(format!("unknown level {s:?} (expected basic or full)")),
        }
    }
}

pub type TurtleFn = fn(&mut dyn Turtle, &Inputs) -> Result<Val, CallError>;
pub type StateFn = fn(&mut CaptureState, &Inputs) -> Result<Val, CallError>;

/// What a command does when it is invoked.
///
/// Commands that need the capture state say so here, and get it passed in explicitly.
#[derive(Copy, Clone)]
pub enum Action {
    Turtle(TurtleFn),
    State(StateFn),
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Turtle(_) => f.write_str("Turtle(..)"),
            Action::State(_) => f.write_str("State(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Command {
    pub name: String,
    pub action: Action,
    /// Type tags of the positional arguments.
    pub positional: Vec<TypeTag>,
    /// How many of the positional arguments must be supplied. The rest are optional.
    pub required: usize,
    pub keywords: BTreeMap<String, TypeTag>,
    pub level: Level,
}

impl Command {
    pub fn new(name: &str, action: Action, positional: &[&str], required: usize) -> Self {
        Command {
            name: name.to_owned(),
            action,
            positional: positional.iter().copied().map(TypeTag::from).collect(),
            required,
            keywords: BTreeMap::new(),
            level: Level::Basic,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    fn check(&self, types: &TypeRegistry) -> Result<(), RegistryError> {
        if self.required > self.positional.len() {
            return Err(RegistryError::TooManyRequired {
                command: self.name.clone(),
                required: self.required,
                declared: self.positional.len(),
            });
        }
        for tag in self.positional.iter().chain(self.keywords.values()) {
            if let Some(part) = types.unknown_part(tag) {
                return Err(RegistryError::UnknownTag {
                    command: self.name.clone(),
                    tag: part.to_owned(),
                });
            }
            if tag.parts().any(|p| p == TypeTag::STATE) && !matches!(self.action, Action::State(_))
            {
                return Err(RegistryError::StateNotAccepted {
                    command: self.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The coerced inputs to a command, as seen by its implementation.
pub struct Inputs<'a> {
    command: &'a str,
    vals: &'a [Val],
}

impl<'a> Inputs<'a> {
    pub fn new(command: &'a str, vals: &'a [Val]) -> Self {
        Inputs { command, vals }
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    fn bad_arg(&self, arg: &Val) -> CallError {
        CallError::BadArg {
            command: self.command.to_owned(),
            arg: arg.clone(),
        }
    }

    /// The `idx`th input, which must be present and convertible to `T`.
    pub fn get<T: TryFrom<Val>>(&self, idx: usize) -> Result<T, CallError> {
        let val = self.vals.get(idx).ok_or_else(|| CallError::MissingArg {
            command: self.command.to_owned(),
        })?;
        T::try_from(val.clone()).map_err(|_| self.bad_arg(val))
    }

    /// The `idx`th input, or `None` if it was left out (or is the absent value).
    pub fn opt<T: TryFrom<Val>>(&self, idx: usize) -> Result<Option<T>, CallError> {
        match self.vals.get(idx) {
            None | Some(Val::None) => Ok(None),
            Some(val) => T::try_from(val.clone())
                .map(Some)
                .map_err(|_| self.bad_arg(val)),
        }
    }

    /// The `idx`th input in its script form. It must be present.
    pub fn text(&self, idx: usize) -> Result<String, CallError> {
        match self.vals.get(idx) {
            None => Err(CallError::MissingArg {
                command: self.command.to_owned(),
            }),
            Some(val @ Val::None) => Err(self.bad_arg(val)),
            Some(val) => Ok(val.to_string()),
        }
    }
}

/// A parsed line, ready to run.
#[derive(Clone, Debug, Default)]
pub struct Call<'c> {
    /// `None` for lines that do nothing (blank, or not understood).
    pub command: Option<&'c Command>,
    pub args: Vec<Arg>,
    /// Always empty for now: the script syntax has no way to name arguments.
    pub kwargs: BTreeMap<String, Val>,
}

impl PartialEq for Call<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_command = match (self.command, other.command) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_command && self.args == other.args && self.kwargs == other.kwargs
    }
}

impl<'c> Call<'c> {
    pub fn noop() -> Self {
        Call::default()
    }

    pub fn is_noop(&self) -> bool {
        self.command.is_none()
    }

    pub fn name(&self) -> Option<&'c str> {
        self.command.map(|c| c.name.as_str())
    }

    pub fn invoke(
        &self,
        turtle: &mut dyn Turtle,
        state: &mut CaptureState,
    ) -> Result<Val, CallError> {
        let Some(command) = self.command else {
            return Ok(Val::None);
        };
        let vals: Vec<Val> = self
            .args
            .iter()
            .filter_map(|arg| match arg {
                Arg::Val(v) => Some(v.clone()),
                Arg::State => None,
            })
            .collect();
        let inputs = Inputs::new(&command.name, &vals);
        match command.action {
            Action::Turtle(f) => f(turtle, &inputs),
            Action::State(f) => f(state, &inputs),
        }
    }
}

impl std::fmt::Display for Call<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name().unwrap_or("(nothing)"))?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Commands by name, plus aliases for them.
#[derive(Clone, Debug, Default)]
pub struct CommandSet {
    commands: HashMap<String, Command>,
    aliases: HashMap<String, String>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, command: Command, types: &TypeRegistry) -> Result<(), RegistryError> {
        command.check(types)?;
        if self.commands.contains_key(&command.name) || self.aliases.contains_key(&command.name) {
            return Err(RegistryError::Duplicate {
                command: command.name,
            });
        }
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    /// Adds `alias` as another name for `target`, which must be a command and not an alias.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<(), RegistryError> {
        if !self.commands.contains_key(target) {
            return Err(RegistryError::BadAlias {
                alias: alias.to_owned(),
                target: target.to_owned(),
            });
        }
        if self.commands.contains_key(alias) || self.aliases.contains_key(alias) {
            return Err(RegistryError::Duplicate {
                command: alias.to_owned(),
            });
        }
        self.aliases.insert(alias.to_owned(), target.to_owned());
        Ok(())
    }

    /// Follows (at most one) alias.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn resolve(&self, name: &str) -> Option<&Command> {
        self.commands.get(self.canonical_name(name))
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Recorder;

    fn nothing(_: &mut dyn Turtle, _: &Inputs) -> Result<Val, CallError> {
        Ok(Val::None)
    }

    fn set() -> CommandSet {
        let mut set = CommandSet::new();
        let types = TypeRegistry::default();
        set.insert(Command::new("home", Action::Turtle(nothing), &[], 0), &types)
            .unwrap();
        set.alias("hm", "home").unwrap();
        set
    }

    #[test]
    fn aliases_resolve_one_level() {
        let mut set = set();
        assert_eq!(set.resolve("hm").unwrap().name, "home");
        assert!(matches!(
            set.alias("h", "hm"),
            Err(RegistryError::BadAlias { .. })
        ));
        assert!(set.resolve("h").is_none());
    }

    #[test]
    fn duplicates() {
        let mut set = set();
        let types = TypeRegistry::default();
        assert!(matches!(
            set.insert(Command::new("hm", Action::Turtle(nothing), &[], 0), &types),
            Err(RegistryError::Duplicate { .. })
        ));
        assert!(matches!(
            set.alias("home", "home"),
            Err(RegistryError::Duplicate { .. })
        ));
    }

    #[test]
    fn signature_checks() {
        let mut set = CommandSet::new();
        let types = TypeRegistry::default();
        assert!(matches!(
            set.insert(Command::new("a", Action::Turtle(nothing), &["num"], 2), &types),
            Err(RegistryError::TooManyRequired { .. })
        ));
        assert!(matches!(
            set.insert(Command::new("b", Action::Turtle(nothing), &["num?angle"], 1), &types),
            Err(RegistryError::UnknownTag { .. })
        ));
        assert!(matches!(
            set.insert(Command::new("c", Action::Turtle(nothing), &["state"], 0), &types),
            Err(RegistryError::StateNotAccepted { .. })
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn inputs() {
        let vals = [Val::Int(3), Val::None, Val::from("x")];
        let inputs = Inputs::new("test", &vals);
        assert_eq!(inputs.get::<f64>(0), Ok(3.0));
        assert_eq!(inputs.opt::<f64>(1), Ok(None));
        assert_eq!(inputs.opt::<f64>(7), Ok(None));
        assert_eq!(
            inputs.get::<f64>(2),
            Err(CallError::BadArg {
                command: "test".to_owned(),
                arg: Val::from("x")
            })
        );
        assert!(matches!(
            inputs.get::<f64>(3),
            Err(CallError::MissingArg { .. })
        ));
        assert_eq!(inputs.text(0), Ok("3".to_owned()));
    }

    #[test]
    fn noop_does_nothing() {
        let mut turtle = Recorder::new();
        let mut state = CaptureState::new();
        assert_eq!(Call::noop().invoke(&mut turtle, &mut state), Ok(Val::None));
        assert!(turtle.calls.is_empty());
    }
}
