//! Argument processing: one linear pass over the option parser's output,
//! building the flag state and the ordered queue of input units.

use std::error::Error;
use std::fmt::Display;
use std::fs;

use clap::ArgMatches;

use crate::flags::{Flag, Flags};
use crate::opts::{self, OptId};
use crate::personality::Personality;

/// A fatal argument-processing error. Nothing here is recoverable; the
/// caller reports the diagnostic and exits non-zero.
#[derive(Debug)]
pub enum ArgsError {
    /// clap rejected the argument vector (unknown option, missing value).
    Usage(clap::Error),
    /// An `-e` or `-f` appeared after `-f -` latched stdin-only mode.
    StdinLatched { option: String },
    /// A file named by `-f` could not be read.
    FileRead {
        path: String,
        source: std::io::Error,
    },
}

impl Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgsError::Usage(err) => err.fmt(f),
            ArgsError::StdinLatched { option } => {
                write!(f, "option {} is not allowed after '-f -'", option)
            }
            ArgsError::FileRead { path, source } => {
                write!(f, "could not read file '{}': {}", path, source)
            }
        }
    }
}

impl Error for ArgsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ArgsError::Usage(err) => Some(err),
            ArgsError::FileRead { source, .. } => Some(source),
            ArgsError::StdinLatched { .. } => None,
        }
    }
}

/// An exit requested by `-h` or `-v`, honored only after the whole argument
/// vector has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    Help,
    Version,
}

/// Ordered queue of input units: inline expressions and file contents,
/// concatenated into one statement stream in argv order.
#[derive(Debug, Default)]
pub struct ExprQueue {
    buf: Option<String>,
    units: usize,
    source_name: Option<String>,
}

impl ExprQueue {
    /// Appends an expression and its terminating separator. The backing
    /// buffer is allocated on first use only.
    pub fn push_expr(&mut self, text: &str) {
        let buf = self.buf.get_or_insert_with(String::new);
        buf.push_str(text);
        buf.push('\n');
        self.units += 1;
    }

    /// Records `path` as the current source name, then appends the file's
    /// full contents as one unit.
    pub fn push_file(&mut self, path: &str) -> Result<(), ArgsError> {
        self.source_name = Some(path.to_string());
        let contents = fs::read_to_string(path).map_err(|source| ArgsError::FileRead {
            path: path.to_string(),
            source,
        })?;
        self.push_expr(&contents);
        Ok(())
    }

    /// The concatenated statement stream, or `None` if nothing was queued.
    pub fn text(&self) -> Option<&str> {
        self.buf.as_deref()
    }

    pub fn unit_count(&self) -> usize {
        self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units == 0
    }

    /// The most recent file queued with `-f`, used for diagnostics.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }
}

/// Everything the interpreter entry point needs to know, resolved from the
/// argument vector. Read-only once built.
#[derive(Debug)]
pub struct RunContext {
    pub personality: Personality,
    pub flags: Flags,
    pub exprs: ExprQueue,
    /// Trailing operands, run as source files after the queued units.
    /// `None` (not an empty allocation) when there are no operands.
    pub files: Option<Vec<String>>,
    pub exit: Option<ExitRequest>,
    /// Whether the session should end once the queued units have run.
    pub exit_after_exprs: bool,
    /// Set by `-f -`: keep reading standard input after the queued units.
    pub stdin_latched: bool,
}

enum Unit<'a> {
    Expression(&'a str),
    File(&'a str),
}

/// Replays the `-e` and `-f` occurrences in the order they appeared on the
/// command line. clap hands each option's values back grouped by option, so
/// the two streams are merged by argv index.
fn ordered_units(matches: &ArgMatches) -> Vec<(usize, Unit<'_>)> {
    let mut units: Vec<(usize, Unit)> = Vec::new();
    if let (Some(values), Some(indices)) = (
        matches.get_many::<String>("expression"),
        matches.indices_of("expression"),
    ) {
        units.extend(indices.zip(values.map(|v| Unit::Expression(v.as_str()))));
    }
    if let (Some(values), Some(indices)) = (
        matches.get_many::<String>("file"),
        matches.indices_of("file"),
    ) {
        units.extend(indices.zip(values.map(|v| Unit::File(v.as_str()))));
    }
    units.sort_by_key(|(index, _)| *index);
    units
}

/// Processes the full argument vector for one personality.
///
/// `exit_exprs` is the caller's request that queued expressions end the
/// session once they have run; `-f -` and `-i` can override it.
///
/// This is a single pass with no backtracking. Any error is fatal and the
/// queue is left untouched past the point of failure.
pub fn process_args(
    personality: Personality,
    argv: &[String],
    exit_exprs: bool,
) -> Result<RunContext, ArgsError> {
    let matches = opts::build_command(personality)
        .try_get_matches_from(argv.iter().map(String::as_str))
        .map_err(ArgsError::Usage)?;

    let mut ctx = RunContext {
        personality,
        flags: Flags::defaults(personality),
        exprs: ExprQueue::default(),
        files: None,
        exit: None,
        exit_after_exprs: false,
        stdin_latched: false,
    };

    for (_, unit) in ordered_units(&matches) {
        match unit {
            Unit::Expression(text) => {
                if ctx.stdin_latched {
                    return Err(ArgsError::StdinLatched {
                        option: "-e (--expression)".to_string(),
                    });
                }
                ctx.exprs.push_expr(text);
                ctx.exit_after_exprs = ctx.exit_after_exprs || exit_exprs;
            }
            Unit::File("-") => {
                ctx.stdin_latched = true;
            }
            Unit::File(path) => {
                if ctx.stdin_latched {
                    return Err(ArgsError::StdinLatched {
                        option: "-f (--file)".to_string(),
                    });
                }
                ctx.exprs.push_file(path)?;
                ctx.exit_after_exprs = ctx.exit_after_exprs || exit_exprs;
            }
        }
    }

    for spec in opts::for_personality(personality) {
        if spec.takes_value() || !matches.get_flag(spec.name) {
            continue;
        }
        match spec.id {
            // Queued above, in argv order.
            OptId::Expression | OptId::File => {}
            OptId::Help => {
                if ctx.exit.is_none() {
                    ctx.exit = Some(ExitRequest::Help);
                }
            }
            OptId::Version => ctx.exit = Some(ExitRequest::Version),
            OptId::Interactive => ctx.flags.set(Flag::Interactive),
            OptId::MathLib => ctx.flags.set(Flag::MathLib),
            OptId::NoPrompt => ctx.flags.clear(Flag::Prompt),
            OptId::NoReadPrompt => ctx.flags.clear(Flag::ReadPrompt),
            OptId::Quiet => ctx.flags.clear(Flag::Banner),
            OptId::GlobalStacks => ctx.flags.set(Flag::GlobalStacks),
            OptId::Standard => ctx.flags.set(Flag::Standard),
            OptId::Warn => ctx.flags.set(Flag::Warn),
            OptId::CodeEcho => ctx.flags.set(Flag::CodeEcho),
            OptId::ExtendedRegisters => ctx.flags.set(Flag::ExtendedRegisters),
        }
    }

    // A non-interactive session with queued work must not print a banner,
    // and the alternate personality never has one.
    if personality == Personality::Dc || ctx.exprs.unit_count() > 1 {
        ctx.flags.clear(Flag::Banner);
    }

    let operands: Vec<String> = matches
        .get_many::<String>("operands")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if !operands.is_empty() {
        ctx.files = Some(operands);
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::ExprQueue;

    #[test]
    fn queue_buffer_is_lazily_allocated() {
        let queue = ExprQueue::default();
        assert!(queue.text().is_none());
        assert!(queue.is_empty());
        assert_eq!(queue.unit_count(), 0);
    }

    #[test]
    fn expressions_are_separator_terminated() {
        let mut queue = ExprQueue::default();
        queue.push_expr("1+1");
        queue.push_expr("2+2");
        assert_eq!(queue.text(), Some("1+1\n2+2\n"));
        assert_eq!(queue.unit_count(), 2);
    }
}
