use crate::value::Val;

/// A token that none of the coercions for its type tag would accept.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("can't read {token:?} as {tag}")]
pub struct FormatError {
    pub token: String,
    pub tag: String,
}

/// A command rejected one of its (already coerced) inputs when it was invoked.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CallError {
    #[error("{command} doesn't like {arg} as input")]
    BadArg { command: String, arg: Val },
    #[error("not enough inputs to {command}")]
    MissingArg { command: String },
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ArityWarning {
    #[error("{command} got extra inputs {extra:?}")]
    Extra { command: String, extra: Vec<String> },
    #[error("{command} is missing {missing} input(s)")]
    Missing { command: String, missing: usize },
}

/// Everything that can go wrong with a single line. None of these stop a script.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LineError {
    #[error("I don't know how to {name}")]
    UnknownCommand { name: String },
    #[error(transparent)]
    Arity(#[from] ArityWarning),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Call(#[from] CallError),
}

/// A [`LineError`], located in the script.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{}: {kind}", location(.line, .column))]
pub struct Warning {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column of the offending token, if there is one.
    pub column: Option<usize>,
    pub kind: LineError,
}

fn location(line: &usize, column: &Option<usize>) -> String {
    match column {
        Some(col) => format!("line {line}:{col}"),
        None => format!("line {line}"),
    }
}

/// Problems with a command table, detected when it is built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{command} requires {required} inputs but only declares {declared}")]
    TooManyRequired {
        command: String,
        required: usize,
        declared: usize,
    },
    #[error("{command} uses unknown type tag {tag:?}")]
    UnknownTag { command: String, tag: String },
    #[error("{command} takes the capture state but isn't a state command")]
    StateNotAccepted { command: String },
    #[error("{command} is already defined")]
    Duplicate { command: String },
    #[error("alias {alias} points at {target}, which isn't a command")]
    BadAlias { alias: String, target: String },
}

/// Fatal errors: the script itself could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
}
