//! Personality resolution and the top of the execution pipeline.

use colored::*;

use crate::args::{self, ArgsError, ExitRequest};
use crate::flags::Flag;
use crate::interp::SourceSink;
use crate::opts;
use crate::personality::Personality;
use crate::signal::Interrupts;
use crate::vm::Vm;

/// Resolves the personality from the invoked program name and runs it with
/// the full, unmodified argument vector. Returns the process exit status.
pub fn run(argv: &[String]) -> i32 {
    let personality = argv
        .first()
        .map(|argv0| Personality::from_program_name(argv0))
        .unwrap_or(Personality::Bc);
    run_as(personality, argv)
}

/// One personality's entry point: process the arguments, honor any deferred
/// exit, then hand the resolved context to the Vm.
pub fn run_as(personality: Personality, argv: &[String]) -> i32 {
    // The handler must be in place before the arguments are touched: an
    // interrupt arriving while the context is being built (including whole
    // -f file reads) is recorded, not acted upon, until the Vm polls for it
    // at a safe point.
    let interrupts = Interrupts::install();

    let ctx = match args::process_args(personality, argv, true) {
        Ok(ctx) => ctx,
        Err(ArgsError::Usage(err)) => {
            // clap renders its own diagnostic, naming the offending flag.
            let _ = err.print();
            return 1;
        }
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            return 1;
        }
    };

    match ctx.exit {
        Some(ExitRequest::Version) => {
            print_version(personality);
            return 0;
        }
        Some(ExitRequest::Help) => {
            print_help(personality);
            return 0;
        }
        None => {}
    }

    let echo = ctx.flags.contains(Flag::CodeEcho);
    Vm::new(ctx, SourceSink::new(echo), Some(interrupts)).run()
}

fn print_version(personality: Personality) {
    println!(
        "{} {}",
        personality.name(),
        env!("CARGO_PKG_VERSION")
    );
    println!("This is free software with ABSOLUTELY NO WARRANTY.");
}

fn print_help(personality: Personality) {
    let mut cmd = opts::build_command(personality);
    // Nothing sensible to do if stdout is gone.
    let _ = cmd.print_help();
}

#[cfg(test)]
mod tests {
    use crate::args::process_args;
    use crate::personality::Personality;
    use crate::signal::Interrupts;
    use std::sync::mpsc::channel;

    #[test]
    fn interrupts_during_argument_processing_stay_pending() {
        let (tx, rx) = channel();
        let interrupts = Interrupts::from_receiver(rx);
        // The interrupt lands before the argument pass begins.
        tx.send(()).unwrap();

        let argv: Vec<String> = ["rbc", "-e", "1+1"].iter().map(|s| s.to_string()).collect();
        let ctx = process_args(Personality::Bc, &argv, true).unwrap();

        // The pass completed untouched, and the interrupt is still waiting
        // for the first safe point.
        assert_eq!(ctx.exprs.unit_count(), 1);
        assert!(interrupts.take());
    }
}
