//! The table of recognized options and the clap command built from it.
//!
//! clap's built-in help and version flags are disabled: `-h` and `-v`/`-V`
//! are recorded like any other flag so that their exits can be deferred
//! until the whole argument vector has been validated.

use clap::{Arg, ArgAction, Command};

use crate::personality::Personality;

/// Closed set of semantic option identifiers.
///
/// The argument processor matches on this exhaustively, so an option that
/// parses but has no effect is a compile error rather than a runtime
/// "should never happen" branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptId {
    Expression,
    File,
    Help,
    Interactive,
    MathLib,
    NoPrompt,
    NoReadPrompt,
    Quiet,
    GlobalStacks,
    Standard,
    Warn,
    CodeEcho,
    Version,
    ExtendedRegisters,
}

/// Which personalities recognize an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Both,
    BcOnly,
    DcOnly,
}

pub struct OptSpec {
    pub id: OptId,
    /// The clap identifier, also used to look the option back up in matches.
    pub name: &'static str,
    pub short: char,
    pub short_alias: Option<char>,
    pub long: &'static str,
    pub value_name: Option<&'static str>,
    pub gate: Gate,
    pub help: &'static str,
}

impl OptSpec {
    pub fn takes_value(&self) -> bool {
        self.value_name.is_some()
    }
}

pub const OPTIONS: &[OptSpec] = &[
    OptSpec {
        id: OptId::Expression,
        name: "expression",
        short: 'e',
        short_alias: None,
        long: "expression",
        value_name: Some("EXPR"),
        gate: Gate::Both,
        help: "run EXPR before any files; may be given more than once",
    },
    OptSpec {
        id: OptId::File,
        name: "file",
        short: 'f',
        short_alias: None,
        long: "file",
        value_name: Some("FILE"),
        gate: Gate::Both,
        help: "run the contents of FILE; '-' switches to reading standard \
               input and forbids any further -e or -f",
    },
    OptSpec {
        id: OptId::Help,
        name: "help",
        short: 'h',
        short_alias: None,
        long: "help",
        value_name: None,
        gate: Gate::Both,
        help: "print this usage message and exit",
    },
    OptSpec {
        id: OptId::Interactive,
        name: "interactive",
        short: 'i',
        short_alias: None,
        long: "interactive",
        value_name: None,
        gate: Gate::Both,
        help: "force interactive mode",
    },
    OptSpec {
        id: OptId::MathLib,
        name: "mathlib",
        short: 'l',
        short_alias: None,
        long: "mathlib",
        value_name: None,
        gate: Gate::BcOnly,
        help: "load the predefined math routines before any other input:\n\
               \x20 s(x)     sine of x in radians\n\
               \x20 c(x)     cosine of x in radians\n\
               \x20 a(x)     arctangent of x, returning radians\n\
               \x20 l(x)     natural log of x\n\
               \x20 e(x)     raises e to the power of x\n\
               \x20 j(n, x)  Bessel function of integer order n of x",
    },
    OptSpec {
        id: OptId::NoPrompt,
        name: "no-prompt",
        short: 'P',
        short_alias: None,
        long: "no-prompt",
        value_name: None,
        gate: Gate::Both,
        help: "disable the interactive prompt",
    },
    OptSpec {
        id: OptId::NoReadPrompt,
        name: "no-read-prompt",
        short: 'R',
        short_alias: None,
        long: "no-read-prompt",
        value_name: None,
        gate: Gate::Both,
        help: "disable the read() prompt",
    },
    OptSpec {
        id: OptId::Quiet,
        name: "quiet",
        short: 'q',
        short_alias: None,
        long: "quiet",
        value_name: None,
        gate: Gate::Both,
        help: "don't print the version and copyright banner",
    },
    OptSpec {
        id: OptId::GlobalStacks,
        name: "global-stacks",
        short: 'g',
        short_alias: None,
        long: "global-stacks",
        value_name: None,
        gate: Gate::BcOnly,
        help: "make scale, ibase and obase stack like function parameters",
    },
    OptSpec {
        id: OptId::Standard,
        name: "standard",
        short: 's',
        short_alias: None,
        long: "standard",
        value_name: None,
        gate: Gate::BcOnly,
        help: "error if any non-POSIX extensions are used",
    },
    OptSpec {
        id: OptId::Warn,
        name: "warn",
        short: 'w',
        short_alias: None,
        long: "warn",
        value_name: None,
        gate: Gate::BcOnly,
        help: "warn if any non-POSIX extensions are used",
    },
    OptSpec {
        id: OptId::CodeEcho,
        name: "code",
        short: 'c',
        short_alias: None,
        long: "code",
        value_name: None,
        gate: Gate::BcOnly,
        help: "echo each statement as it is read",
    },
    OptSpec {
        id: OptId::Version,
        name: "version",
        short: 'v',
        short_alias: Some('V'),
        long: "version",
        value_name: None,
        gate: Gate::Both,
        help: "print version information and copyright and exit",
    },
    OptSpec {
        id: OptId::ExtendedRegisters,
        name: "extended-register",
        short: 'x',
        short_alias: None,
        long: "extended-register",
        value_name: None,
        gate: Gate::DcOnly,
        help: "start with extended register mode enabled",
    },
];

/// Iterates over the options one personality recognizes.
pub fn for_personality(personality: Personality) -> impl Iterator<Item = &'static OptSpec> {
    OPTIONS.iter().filter(move |spec| match spec.gate {
        Gate::Both => true,
        Gate::BcOnly => personality == Personality::Bc,
        Gate::DcOnly => personality == Personality::Dc,
    })
}

/// Builds the clap command for one personality.
///
/// Options the other personality owns are simply absent, so clap itself
/// reports them as unknown with a fatal diagnostic.
pub fn build_command(personality: Personality) -> Command {
    let mut cmd = Command::new(personality.name())
        .about(personality.about())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("operands")
                .value_name("FILE")
                .num_args(0..)
                .help("calculator source files, run after all queued expressions"),
        );

    for spec in for_personality(personality) {
        let mut arg = Arg::new(spec.name)
            .short(spec.short)
            .long(spec.long)
            .help(spec.help);
        arg = match spec.value_name {
            Some(value_name) => arg
                .value_name(value_name)
                .action(ArgAction::Append)
                // Expressions may start with a minus sign, and "-" is a
                // meaningful file operand.
                .allow_hyphen_values(true),
            // Repeated flags re-write the same bit, so they override
            // themselves rather than erroring (`-v -V` is fine).
            None => arg.action(ArgAction::SetTrue).overrides_with(spec.name),
        };
        if let Some(alias) = spec.short_alias {
            arg = arg.short_alias(alias);
        }
        cmd = cmd.arg(arg);
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::{build_command, for_personality, OptId};
    use crate::personality::Personality;

    #[test]
    fn gated_options_are_personality_specific() {
        let bc: Vec<OptId> = for_personality(Personality::Bc).map(|s| s.id).collect();
        let dc: Vec<OptId> = for_personality(Personality::Dc).map(|s| s.id).collect();
        assert!(bc.contains(&OptId::MathLib));
        assert!(!dc.contains(&OptId::MathLib));
        assert!(dc.contains(&OptId::ExtendedRegisters));
        assert!(!bc.contains(&OptId::ExtendedRegisters));
        assert!(bc.contains(&OptId::Expression));
        assert!(dc.contains(&OptId::Expression));
    }

    #[test]
    fn commands_build_without_conflicts() {
        build_command(Personality::Bc).debug_assert();
        build_command(Personality::Dc).debug_assert();
    }

    #[test]
    fn mathlib_help_lists_the_routines() {
        let mut cmd = build_command(Personality::Bc);
        let help = cmd.render_help().to_string();
        for routine in ["s(x)", "c(x)", "a(x)", "l(x)", "e(x)", "j(n, x)"] {
            assert!(help.contains(routine), "help is missing {}", routine);
        }
    }
}
