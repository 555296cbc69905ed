use std::io::BufRead;

use crate::{
    backend::Turtle,
    coerce::TypeRegistry,
    command::{CommandSet, Level},
    error::{RegistryError, ScriptError, Warning},
    parse::{parse_line, Parsed},
    state::{CaptureMode, CaptureState},
    value::Val,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub level: Level,
    pub capture: CaptureMode,
}

/// What happened during a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Number of lines read, including blank ones.
    pub lines: usize,
    /// Number of lines that invoked a command successfully.
    pub executed: usize,
    pub warnings: Vec<Warning>,
}

impl RunSummary {
    fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// A command set together with the coercions its signatures refer to.
///
/// This is set up once, and can then run any number of scripts.
#[derive(Debug)]
pub struct Interpreter {
    commands: CommandSet,
    types: TypeRegistry,
    capture: CaptureMode,
}

impl Interpreter {
    pub fn new(options: Options) -> Result<Self, RegistryError> {
        let types = TypeRegistry::default();
        let commands = CommandSet::builtin(options.level, &types)?;
        Ok(Interpreter {
            commands,
            types,
            capture: options.capture,
        })
    }

    /// An interpreter for a custom command set. `types` must know every tag that `commands` uses,
    /// which is checked when the commands are inserted.
    pub fn with_commands(commands: CommandSet, types: TypeRegistry, capture: CaptureMode) -> Self {
        Interpreter {
            commands,
            types,
            capture,
        }
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn parse_line(&self, line: &str, line_no: usize, state: &CaptureState) -> Parsed<'_> {
        parse_line(&self.commands, &self.types, line, line_no, state)
    }

    /// Runs a script with a fresh capture state, and returns the state it ended with.
    pub fn run<I, S>(&self, lines: I, turtle: &mut dyn Turtle) -> (CaptureState, RunSummary)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = CaptureState::new();
        let summary = self.run_with_state(lines, turtle, &mut state);
        (state, summary)
    }

    /// Runs a script, capturing into (and substituting from) an existing state.
    ///
    /// Lines are pulled from `lines` one at a time, and each is run before the next is parsed.
    pub fn run_with_state<I, S>(
        &self,
        lines: I,
        turtle: &mut dyn Turtle,
        state: &mut CaptureState,
    ) -> RunSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = RunSummary::default();
        for (i, line) in lines.into_iter().enumerate() {
            self.step(i + 1, line.as_ref(), turtle, state, &mut summary);
        }
        summary
    }

    /// Runs a script from a reader. Failing to read is fatal; nothing else is.
    pub fn run_reader<R: BufRead>(
        &self,
        reader: R,
        turtle: &mut dyn Turtle,
        state: &mut CaptureState,
    ) -> Result<RunSummary, ScriptError> {
        let mut summary = RunSummary::default();
        for (i, line) in reader.lines().enumerate() {
            self.step(i + 1, &line?, turtle, state, &mut summary);
        }
        Ok(summary)
    }

    fn step(
        &self,
        line_no: usize,
        line: &str,
        turtle: &mut dyn Turtle,
        state: &mut CaptureState,
        summary: &mut RunSummary,
    ) {
        log::debug!("line {line_no}: got {line:?}");
        summary.lines += 1;

        let Parsed { call, warnings } = self.parse_line(line, line_no, state);
        for w in warnings {
            summary.warn(w);
        }

        // Every line produces a result, even if it's only the absent value from a no-op.
        let armed = state.armed().map(str::to_owned);
        let val = match call.invoke(turtle, state) {
            Ok(val) => {
                if !call.is_noop() {
                    summary.executed += 1;
                }
                val
            }
            Err(e) => {
                summary.warn(Warning {
                    line: line_no,
                    column: None,
                    kind: e.into(),
                });
                Val::None
            }
        };
        if let Some(name) = state.store_result(armed.as_deref(), val.clone(), self.capture) {
            log::debug!("line {line_no}: copied {val} to capture variable {name}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{Recorder, TurtleCmd},
        command::{Action, Command},
        error::{CallError, LineError},
    };

    fn interp() -> Interpreter {
        Interpreter::new(Options::default()).unwrap()
    }

    #[test]
    fn capture_home() {
        // Make `home` return something worth capturing.
        let types = TypeRegistry::default();
        let mut commands = CommandSet::new();
        let full = CommandSet::builtin(Level::Full, &types).unwrap();
        for name in ["capture", "endcapture"] {
            commands
                .insert(full.get(name).unwrap().clone(), &types)
                .unwrap();
        }
        commands
            .insert(
                Command::new("home", Action::Turtle(|_, _| Ok(Val::from("V"))), &[], 0),
                &types,
            )
            .unwrap();
        let interp = Interpreter::with_commands(commands, types, CaptureMode::Once);

        let mut turtle = Recorder::new();
        let (state, summary) = interp.run(["capture out", "home", "endcapture"], &mut turtle);
        assert_eq!(state.get("out"), Val::from("V"));
        assert_eq!(state.armed(), None);
        assert!(summary.warnings.is_empty());
        assert_eq!(summary.executed, 3);
    }

    #[test]
    fn capture_stamp_and_clear_it() {
        let mut turtle = Recorder::new();
        let (state, summary) = interp().run(
            ["stamp", "cap id", "stamp", "stamp", "clearstamp cap::id"],
            &mut turtle,
        );
        assert_eq!(state.get("id"), Val::Int(2));
        assert!(summary.warnings.is_empty());
        assert_eq!(turtle.calls.last(), Some(&TurtleCmd::ClearStamp(2)));
    }

    #[test]
    fn endcapture_stores_nothing() {
        let mut turtle = Recorder::new();
        let (state, _) = interp().run(["capture x", "endcapture", "stamp"], &mut turtle);
        assert!(!state.contains("x"));
        assert_eq!(state.armed(), None);
    }

    #[test]
    fn rearming_overwrites() {
        let mut turtle = Recorder::new();
        let (state, _) = interp().run(["capture a", "capture b", "stamp"], &mut turtle);
        assert!(!state.contains("a"));
        assert_eq!(state.get("b"), Val::Int(1));
    }

    #[test]
    fn noop_lines_are_captured_too() {
        let mut turtle = Recorder::new();
        let (state, summary) = interp().run(["capture x", "", "stamp"], &mut turtle);
        assert!(state.contains("x"));
        assert_eq!(state.get("x"), Val::None);
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.executed, 2);
    }

    #[test]
    fn continuous_capture() {
        let interp = Interpreter::new(Options {
            capture: CaptureMode::Continuous,
            ..Options::default()
        })
        .unwrap();
        let mut turtle = Recorder::new();
        let (state, _) = interp.run(
            ["capture n", "stamp", "stamp", "endcapture", "stamp"],
            &mut turtle,
        );
        assert_eq!(state.get("n"), Val::Int(2));
        assert_eq!(state.armed(), None);
    }

    #[test]
    fn state_survives_between_runs() {
        let interp = interp();
        let mut turtle = Recorder::new();
        let mut state = CaptureState::new();
        interp.run_with_state(["speed 7", "cap s", "speed"], &mut turtle, &mut state);
        interp.run_with_state(["forward cap::s"], &mut turtle, &mut state);
        assert_eq!(turtle.calls.last(), Some(&TurtleCmd::Forward(7.0)));
    }

    #[test]
    fn bad_lines_dont_stop_the_run() {
        let mut turtle = Recorder::new();
        let (_, summary) = interp().run(
            [
                "forward 10",
                "jump",
                "forward ten",
                "goto 1",
                "forward cap::nothing",
                "right 90 extra",
                "left 45",
            ],
            &mut turtle,
        );
        assert_eq!(
            turtle.calls,
            vec![
                TurtleCmd::Forward(10.0),
                TurtleCmd::Right(90.0),
                TurtleCmd::Left(45.0)
            ]
        );
        let lines: Vec<_> = summary.warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, vec![2, 3, 4, 5, 6]);
        assert_eq!(
            summary.warnings[3].kind,
            LineError::Call(CallError::BadArg {
                command: "forward".to_owned(),
                arg: Val::None
            })
        );
        assert_eq!(summary.executed, 3);
    }

    #[test]
    fn basic_level_has_no_stamps() {
        let interp = Interpreter::new(Options {
            level: Level::Basic,
            ..Options::default()
        })
        .unwrap();
        assert_eq!(interp.commands().len(), 11);
        let mut turtle = Recorder::new();
        let (_, summary) = interp.run(["stamp", "fd 5"], &mut turtle);
        assert_eq!(turtle.calls, vec![TurtleCmd::Forward(5.0)]);
        assert_eq!(
            summary.warnings[0].kind,
            LineError::UnknownCommand {
                name: "stamp".to_owned()
            }
        );
    }

    #[test]
    fn reader() {
        let script = "fd 10\n\nrt 90\n";
        let mut turtle = Recorder::new();
        let mut state = CaptureState::new();
        let summary = interp()
            .run_reader(script.as_bytes(), &mut turtle, &mut state)
            .unwrap();
        assert_eq!(summary.lines, 3);
        assert_eq!(
            turtle.calls,
            vec![TurtleCmd::Forward(10.0), TurtleCmd::Right(90.0)]
        );
    }
}
