mod args;
mod dispatch;
mod flags;
mod interp;
mod opts;
mod personality;
mod signal;
mod vm;

pub use args::{process_args, ArgsError, ExitRequest, ExprQueue, RunContext};
pub use dispatch::{run, run_as};
pub use flags::{Flag, Flags};
pub use interp::{InterpretError, Interpreter, SourceSink};
pub use personality::Personality;
pub use signal::Interrupts;
pub use vm::Vm;
