//! An interpreter for line-oriented turtle scripts.
//!
//! Each line of a script names a command followed by whitespace-separated arguments:
//!
//! ```text
//! speed fastest
//! fd 100
//! rt 90
//! capture id
//! stamp
//! fd 50
//! clearstamp cap::id
//! ```
//!
//! Arguments are coerced according to the command's signature (see [`coerce`]), and the command
//! is invoked on a [`Turtle`]. `capture <name>` stores the result of the next command under
//! `<name>`, and `cap::<name>` substitutes it back in as an argument.
//!
//! A line that can't be run (unknown command, wrong number of arguments, an argument that doesn't
//! parse) is skipped with a [`Warning`]; it never stops the script.

pub mod backend;
mod builtins;
pub mod coerce;
pub mod command;
pub mod error;
pub mod parse;
pub mod run;
pub mod state;
pub mod value;

pub use backend::{Recorder, Turtle, TurtleCmd};
pub use coerce::{Arg, TypeRegistry, TypeTag};
pub use command::{Call, Command, CommandSet, Level};
pub use error::{CallError, FormatError, LineError, ScriptError, Warning};
pub use run::{Interpreter, Options, RunSummary};
pub use state::{CaptureMode, CaptureState};
pub use value::{Color, Speed, Val};
