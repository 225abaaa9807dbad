//! The execution handoff: everything that happens between a resolved
//! [`RunContext`] and the engine.

use std::io::{stdin, IsTerminal, Read};
use std::path::PathBuf;

use colored::*;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::args::RunContext;
use crate::flags::Flag;
use crate::interp::Interpreter;
use crate::personality::Personality;
use crate::signal::Interrupts;

/// Where `-l` finds the math library unless `RBC_MATHLIB` overrides it.
const DEFAULT_MATHLIB_PATH: &str = "/usr/local/share/rbc/mathlib.bc";
const MATHLIB_PATH_VAR: &str = "RBC_MATHLIB";

const HISTORY_FILENAME: &'static str = ".rbc-history.txt";

fn get_history_path() -> Option<PathBuf> {
    // std::env::home_dir() is deprecated because it misbehaves under Cygwin
    // and Mingw; we don't support those platforms.
    #[allow(deprecated)]
    match std::env::home_dir() {
        Some(path) if path.exists() => Some(path.join(HISTORY_FILENAME)),
        _ => None,
    }
}

pub struct Vm<I: Interpreter> {
    ctx: RunContext,
    engine: I,
    interrupts: Option<Interrupts>,
}

impl<I: Interpreter> Vm<I> {
    pub fn new(ctx: RunContext, engine: I, interrupts: Option<Interrupts>) -> Self {
        Vm {
            ctx,
            engine,
            interrupts,
        }
    }

    pub fn run(mut self) -> i32 {
        match self.run_impl() {
            Ok(()) => 0,
            Err(exit_code) => exit_code,
        }
    }

    fn run_impl(&mut self) -> Result<(), i32> {
        self.print_banner();
        self.run_units()?;

        if !self.ctx.exprs.is_empty()
            && self.ctx.exit_after_exprs
            && !self.ctx.stdin_latched
            && !self.ctx.flags.contains(Flag::Interactive)
        {
            return Ok(());
        }

        if stdin().is_terminal() {
            self.repl()
        } else {
            self.run_stdin_batch()
        }
    }

    /// Runs the math library, the queued expression stream and the
    /// positional files, in that order. Interrupts are polled between
    /// stages; nothing inside a stage is interruptible.
    fn run_units(&mut self) -> Result<(), i32> {
        if self.ctx.flags.contains(Flag::MathLib) {
            let path = std::env::var(MATHLIB_PATH_VAR)
                .unwrap_or_else(|_| DEFAULT_MATHLIB_PATH.to_string());
            let text = read_source_file(&path)?;
            self.interpret(&path, &text)?;
            self.check_interrupt()?;
        }

        if !self.ctx.exprs.is_empty() {
            let name = self
                .ctx
                .exprs
                .source_name()
                .unwrap_or("<expression>")
                .to_string();
            let text = self.ctx.exprs.text().unwrap_or_default().to_string();
            self.interpret(&name, &text)?;
            self.check_interrupt()?;
        }

        if let Some(files) = self.ctx.files.clone() {
            for path in files {
                let text = read_source_file(&path)?;
                self.interpret(&path, &text)?;
                self.check_interrupt()?;
            }
        }

        Ok(())
    }

    fn run_stdin_batch(&mut self) -> Result<(), i32> {
        let mut text = String::new();
        if let Err(err) = stdin().read_to_string(&mut text) {
            eprintln!(
                "{}",
                format!("could not read standard input: {}", err).red()
            );
            return Err(1);
        }
        if text.is_empty() {
            return Ok(());
        }
        self.interpret("<stdin>", &text)
    }

    fn repl(&mut self) -> Result<(), i32> {
        let Ok(mut rl) = DefaultEditor::new() else {
            eprintln!("Initializing DefaultEditor failed!");
            return Err(1);
        };

        let history_path = get_history_path();

        // Ignoring the results around history here: if loading errors, the
        // file probably doesn't exist yet, and history is optional anyway.
        if let Some(path) = &history_path {
            let _ = rl.load_history(path);
        }

        let prompt = if self.ctx.flags.contains(Flag::Prompt) {
            ">>> "
        } else {
            ""
        };

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if let Err(err) = rl.add_history_entry(line.as_str()) {
                        eprintln!("WARNING: Failed to add history entry ({:?}).", err);
                    }
                    // Interactive engine errors abandon the line, not the
                    // session; the diagnostic was already printed.
                    let _ = self.interpret("<stdin>", &line);
                }
                Err(ReadlineError::Interrupted) => {
                    // An interrupt only abandons the current line.
                    let _ = self.interrupts.as_ref().map(Interrupts::take);
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    return Err(1);
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn interpret(&mut self, source_name: &str, text: &str) -> Result<(), i32> {
        if let Err(err) = self.engine.interpret(source_name, text) {
            eprintln!("{}", format!("{}: {}", source_name, err).red());
            return Err(1);
        }
        Ok(())
    }

    fn check_interrupt(&self) -> Result<(), i32> {
        let interrupted = self
            .interrupts
            .as_ref()
            .map(Interrupts::take)
            .unwrap_or(false);
        if interrupted && !self.session_is_interactive() {
            eprintln!("{}", "interrupted".red());
            return Err(1);
        }
        Ok(())
    }

    fn session_is_interactive(&self) -> bool {
        self.ctx.flags.contains(Flag::Interactive) || stdin().is_terminal()
    }

    fn print_banner(&self) {
        if self.ctx.personality == Personality::Bc
            && self.ctx.flags.contains(Flag::Banner)
            && self.session_is_interactive()
        {
            println!(
                "{} {}",
                self.ctx.personality.name(),
                env!("CARGO_PKG_VERSION")
            );
            println!("This is free software with ABSOLUTELY NO WARRANTY.");
        }
    }
}

fn read_source_file(path: &str) -> Result<String, i32> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) => {
            eprintln!("{}", format!("could not read file '{}': {}", path, err).red());
            Err(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Vm;
    use crate::args::process_args;
    use crate::interp::{InterpretError, Interpreter};
    use crate::personality::Personality;
    use crate::signal::Interrupts;
    use std::io::Write;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(String, String)>,
        fail_on: Option<String>,
    }

    impl Interpreter for &mut Recorder {
        fn interpret(&mut self, source_name: &str, text: &str) -> Result<(), InterpretError> {
            if self.fail_on.as_deref() == Some(source_name) {
                return Err(InterpretError::new("synthetic failure"));
            }
            self.calls.push((source_name.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("rbc")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    fn temp_source_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("rbc-vm-test-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn units_run_before_positional_files() {
        let file = temp_source_file("after.rbc", "3*3\n");
        let ctx = process_args(
            Personality::Bc,
            &argv(&["-e", "1+1", &file]),
            true,
        )
        .unwrap();

        let mut recorder = Recorder::default();
        let mut vm = Vm::new(ctx, &mut recorder, None);
        vm.run_units().unwrap();

        assert_eq!(recorder.calls.len(), 2);
        assert_eq!(recorder.calls[0], ("<expression>".to_string(), "1+1\n".to_string()));
        assert_eq!(recorder.calls[1], (file.clone(), "3*3\n".to_string()));
        std::fs::remove_file(&file).unwrap();
    }

    #[test]
    fn expression_stream_is_named_after_last_file() {
        let file = temp_source_file("named.rbc", "2^10");
        let ctx = process_args(
            Personality::Bc,
            &argv(&["-f", &file, "-e", "1+1"]),
            true,
        )
        .unwrap();

        let mut recorder = Recorder::default();
        let mut vm = Vm::new(ctx, &mut recorder, None);
        vm.run_units().unwrap();

        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(recorder.calls[0].0, file);
        assert_eq!(recorder.calls[0].1, "2^10\n1+1\n");
        std::fs::remove_file(&file).unwrap();
    }

    #[test]
    fn missing_positional_file_is_fatal() {
        let ctx = process_args(
            Personality::Bc,
            &argv(&["/nonexistent/rbc-test-file.rbc"]),
            true,
        )
        .unwrap();

        let mut recorder = Recorder::default();
        let mut vm = Vm::new(ctx, &mut recorder, None);
        assert_eq!(vm.run_units(), Err(1));
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn mathlib_stage_boundary_polls_interrupts() {
        let lib = temp_source_file("mathlib.rbc", "scale=20\n");
        std::env::set_var("RBC_MATHLIB", &lib);
        // -i keeps a pending interrupt from ending the session, so the only
        // observable effect of the poll is that it drains the channel.
        let ctx = process_args(Personality::Bc, &argv(&["-i", "-l"]), true).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        tx.send(()).unwrap();

        let mut recorder = Recorder::default();
        let mut vm = Vm::new(ctx, &mut recorder, Some(Interrupts::from_receiver(rx)));
        vm.run_units().unwrap();
        assert!(!vm.interrupts.as_ref().unwrap().take());

        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(recorder.calls[0], (lib.clone(), "scale=20\n".to_string()));
        std::fs::remove_file(&lib).unwrap();
    }

    #[test]
    fn engine_errors_are_fatal() {
        let ctx = process_args(Personality::Bc, &argv(&["-e", "1+1"]), true).unwrap();
        let mut recorder = Recorder {
            fail_on: Some("<expression>".to_string()),
            ..Recorder::default()
        };
        let mut vm = Vm::new(ctx, &mut recorder, None);
        assert_eq!(vm.run_units(), Err(1));
    }
}
