use nom::{
    bytes::complete::{take_till1, take_while, take_while1},
    combinator::{all_consuming, map},
    multi::separated_list0,
    sequence::delimited,
    IResult,
};

use crate::{
    coerce::{Arg, TypeRegistry},
    command::{Call, CommandSet},
    error::{ArityWarning, LineError, Warning},
    state::CaptureState,
};

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

/// A whitespace-delimited piece of a line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    /// 1-based column, counted in characters.
    pub column: usize,
}

fn blank(input: Span) -> IResult<Span, Span> {
    take_while(char::is_whitespace)(input)
}

fn token(input: Span) -> IResult<Span, Token> {
    map(take_till1(char::is_whitespace), |s: Span| Token {
        text: *s.fragment(),
        column: s.get_utf8_column(),
    })(input)
}

pub fn tokens(input: Span) -> IResult<Span, Vec<Token>> {
    all_consuming(delimited(
        blank,
        separated_list0(take_while1(char::is_whitespace), token),
        blank,
    ))(input)
}

/// Splits a line on whitespace. There is no quoting.
pub fn split_line(line: &str) -> Vec<Token<'_>> {
    // Every character is either whitespace or part of a token, so this can't fail.
    tokens(Span::new(line))
        .map(|(_, toks)| toks)
        .unwrap_or_default()
}

/// The result of parsing one line: something to invoke, and whatever went wrong on the way.
#[derive(Debug)]
pub struct Parsed<'c> {
    pub call: Call<'c>,
    pub warnings: Vec<Warning>,
}

impl<'c> Parsed<'c> {
    fn ok(call: Call<'c>) -> Self {
        Parsed {
            call,
            warnings: Vec::new(),
        }
    }

    fn noop(line: usize, column: Option<usize>, kind: impl Into<LineError>) -> Self {
        Parsed {
            call: Call::noop(),
            warnings: vec![Warning {
                line,
                column,
                kind: kind.into(),
            }],
        }
    }
}

/// Parses a single line into a call.
///
/// Problems never abort parsing: a line that can't be used becomes a no-op call, with a warning
/// saying why. Extra arguments are dropped (with a warning) and the rest of the line still runs.
pub fn parse_line<'c>(
    commands: &'c CommandSet,
    types: &TypeRegistry,
    line: &str,
    line_no: usize,
    state: &CaptureState,
) -> Parsed<'c> {
    let toks = split_line(line);
    let Some((name, args)) = toks.split_first() else {
        log::debug!("line {line_no}: skipping blank line");
        return Parsed::ok(Call::noop());
    };

    let Some(command) = commands.resolve(name.text) else {
        return Parsed::noop(
            line_no,
            Some(name.column),
            LineError::UnknownCommand {
                name: commands.canonical_name(name.text).to_owned(),
            },
        );
    };

    let mut warnings = Vec::new();
    let declared = command.positional.len();
    let args = if args.len() > declared {
        let extra = &args[declared..];
        warnings.push(Warning {
            line: line_no,
            column: Some(extra[0].column),
            kind: ArityWarning::Extra {
                command: command.name.clone(),
                extra: extra.iter().map(|t| t.text.to_owned()).collect(),
            }
            .into(),
        });
        &args[..declared]
    } else if args.len() < command.required {
        return Parsed::noop(
            line_no,
            Some(name.column),
            ArityWarning::Missing {
                command: command.name.clone(),
                missing: command.required - args.len(),
            },
        );
    } else {
        args
    };

    let mut coerced = Vec::with_capacity(declared);
    for (tok, tag) in args.iter().zip(&command.positional) {
        match types.coerce(tag, tok.text, state) {
            Ok(arg) => coerced.push(arg),
            Err(e) => return Parsed::noop(line_no, Some(tok.column), e),
        }
    }
    // The capture state is passed along implicitly when its slot isn't written out.
    for tag in &command.positional[args.len()..] {
        if tag.is_state() {
            coerced.push(Arg::State);
        }
    }

    let call = Call {
        command: Some(command),
        args: coerced,
        kwargs: Default::default(),
    };
    log::debug!("line {line_no}: resolved to {call}");
    Parsed { call, warnings }
}
