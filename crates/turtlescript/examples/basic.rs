use turtlescript::{Interpreter, Options, Recorder};

fn main() {
    let script = "speed fastest\nfd 90\nrt 90\ncapture id\nstamp\nclearstamp cap::id";
    let interp = Interpreter::new(Options::default()).unwrap();
    let mut turtle = Recorder::new();
    let (state, summary) = interp.run(script.lines(), &mut turtle);
    dbg!(turtle.calls, state, summary);
}
