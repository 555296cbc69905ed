use crate::{
    coerce::TypeRegistry,
    command::{Action, Command, CommandSet, Level},
    error::{CallError, RegistryError},
    value::{Color, Speed, Val},
};

const ALIASES: &[(&str, &str)] = &[
    ("fd", "forward"),
    ("bk", "back"),
    ("backward", "back"),
    ("rt", "right"),
    ("lt", "left"),
    ("setpos", "goto"),
    ("setposition", "goto"),
    // Misspelled, but older scripts use it.
    ("setpositon", "goto"),
    ("seth", "setheading"),
    ("cap", "capture"),
    ("nocap", "endcapture"),
];

fn builtins() -> Vec<Command> {
    use Action::{State, Turtle};

    let basic = vec![
        Command::new(
            "forward",
            Turtle(|t, args| {
                t.forward(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "back",
            Turtle(|t, args| {
                t.back(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "right",
            Turtle(|t, args| {
                t.right(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "left",
            Turtle(|t, args| {
                t.left(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "goto",
            Turtle(|t, args| {
                t.goto(args.get(0)?, args.get(1)?);
                Ok(Val::None)
            }),
            &["num", "num"],
            2,
        ),
        Command::new(
            "setx",
            Turtle(|t, args| {
                t.set_x(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "sety",
            Turtle(|t, args| {
                t.set_y(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "setheading",
            Turtle(|t, args| {
                t.set_heading(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "home",
            Turtle(|t, _| {
                t.home();
                Ok(Val::None)
            }),
            &[],
            0,
        ),
        Command::new(
            "capture",
            State(|state, args| {
                state.arm(args.text(0)?);
                Ok(Val::None)
            }),
            &["raw", "state"],
            1,
        ),
        Command::new(
            "endcapture",
            State(|state, _| {
                state.disarm();
                Ok(Val::None)
            }),
            &["state"],
            0,
        ),
    ];

    let full = vec![
        Command::new(
            "circle",
            Turtle(|t, args| {
                let steps = match args.opt::<i64>(2)? {
                    Some(n) => Some(u32::try_from(n).map_err(|_| CallError::BadArg {
                        command: "circle".to_owned(),
                        arg: Val::Int(n),
                    })?),
                    None => None,
                };
                t.circle(args.get(0)?, args.opt(1)?, steps);
                Ok(Val::None)
            }),
            &["num", "num", "num"],
            1,
        ),
        Command::new(
            "dot",
            Turtle(|t, args| {
                t.dot(args.opt(0)?, args.opt::<Color>(1)?);
                Ok(Val::None)
            }),
            &["num", "color"],
            0,
        ),
        Command::new("stamp", Turtle(|t, _| Ok(Val::Int(t.stamp()))), &[], 0),
        Command::new(
            "clearstamp",
            Turtle(|t, args| {
                t.clear_stamp(args.get(0)?);
                Ok(Val::None)
            }),
            &["num"],
            1,
        ),
        Command::new(
            "clearstamps",
            Turtle(|t, args| {
                t.clear_stamps(args.opt(0)?);
                Ok(Val::None)
            }),
            &["num"],
            0,
        ),
        Command::new(
            "undo",
            Turtle(|t, _| {
                t.undo();
                Ok(Val::None)
            }),
            &[],
            0,
        ),
        Command::new(
            "speed",
            Turtle(|t, args| match args.opt::<Speed>(0)? {
                Some(speed) => {
                    t.set_speed(speed);
                    Ok(Val::None)
                }
                // With no input, speed reports the current speed.
                None => Ok(Val::Int(t.speed().0.into())),
            }),
            &["num?raw"],
            0,
        ),
        Command::new(
            "wait",
            Turtle(|t, _| {
                t.wait();
                Ok(Val::None)
            }),
            &[],
            0,
        ),
    ];

    basic
        .into_iter()
        .chain(full.into_iter().map(|c| c.with_level(Level::Full)))
        .collect()
}

impl CommandSet {
    /// The built-in commands available at `level`, and their aliases.
    pub fn builtin(level: Level, types: &TypeRegistry) -> Result<CommandSet, RegistryError> {
        let mut ret = CommandSet::new();
        for command in builtins() {
            if command.level <= level {
                ret.insert(command, types)?;
            }
        }
        for (alias, target) in ALIASES {
            if ret.get(target).is_some() {
                ret.alias(alias, target)?;
            }
        }
        Ok(ret)
    }
}
