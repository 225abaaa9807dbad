use std::error::Error;
use std::fmt::Display;

/// An error surfaced by an engine while executing one unit of source text.
#[derive(Debug)]
pub struct InterpretError {
    pub message: String,
}

impl InterpretError {
    pub fn new<T: Into<String>>(message: T) -> Self {
        InterpretError {
            message: message.into(),
        }
    }
}

impl Display for InterpretError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

impl Error for InterpretError {}

/// The seam between this front end and an arithmetic engine.
///
/// The Vm feeds the math library, each queued input unit, each positional
/// file and each interactive line through this trait, in execution order.
/// `source_name` is the file the text came from, or a `<...>` placeholder
/// for inline and stdin input.
pub trait Interpreter {
    fn interpret(&mut self, source_name: &str, text: &str) -> Result<(), InterpretError>;
}

/// A pass-through engine: discards its input, or echoes the statement
/// stream when code echo (`-c`) is on. It lets the binary and the tests
/// drive the whole front end while the arithmetic core is developed as a
/// separate crate.
pub struct SourceSink {
    echo: bool,
}

impl SourceSink {
    pub fn new(echo: bool) -> Self {
        SourceSink { echo }
    }
}

impl Interpreter for SourceSink {
    fn interpret(&mut self, source_name: &str, text: &str) -> Result<(), InterpretError> {
        if self.echo {
            for line in text.lines() {
                println!("{}: {}", source_name, line);
            }
        }
        Ok(())
    }
}
