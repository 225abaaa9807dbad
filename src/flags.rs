use crate::personality::Personality;

/// One behavioral capability of a calculator session.
///
/// Each variant names a single bit in [`Flags`]. Most options set a bit;
/// `-q`, `-P` and `-R` clear one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Keep reading from the terminal after queued work finishes.
    Interactive = 1 << 0,
    /// Print the startup banner. Default for rbc; `-q` clears it, and it is
    /// also cleared after parsing when running as rdc or when more than one
    /// input unit was queued.
    Banner = 1 << 1,
    /// Show a prompt when reading interactively. `-P` clears it.
    Prompt = 1 << 2,
    /// Show a prompt for `read()` input. `-R` clears it.
    ReadPrompt = 1 << 3,
    /// Load the predefined math routines before anything else (rbc only).
    MathLib = 1 << 4,
    /// Make scale, ibase and obase stack like function parameters (rbc only).
    GlobalStacks = 1 << 5,
    /// Error on any non-POSIX extension (rbc only).
    Standard = 1 << 6,
    /// Warn on any non-POSIX extension (rbc only).
    Warn = 1 << 7,
    /// Echo each statement as it is read (rbc only).
    CodeEcho = 1 << 8,
    /// Start with extended register mode enabled (rdc only).
    ExtendedRegisters = 1 << 9,
}

/// The session's flag state, packed into a bit-set.
///
/// Built once during argument processing and read-only afterward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u16);

impl Flags {
    /// The flag state before any option has been applied.
    pub fn defaults(personality: Personality) -> Self {
        let mut flags = Flags::default();
        flags.set(Flag::Prompt);
        flags.set(Flag::ReadPrompt);
        if personality == Personality::Bc {
            flags.set(Flag::Banner);
        }
        flags
    }

    pub fn set(&mut self, flag: Flag) {
        self.0 |= flag as u16;
    }

    pub fn clear(&mut self, flag: Flag) {
        self.0 &= !(flag as u16);
    }

    pub fn contains(self, flag: Flag) -> bool {
        self.0 & (flag as u16) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Flag, Flags};
    use crate::personality::Personality;

    #[test]
    fn set_clear_and_contains_work() {
        let mut flags = Flags::default();
        assert!(!flags.contains(Flag::Warn));
        flags.set(Flag::Warn);
        flags.set(Flag::Standard);
        assert!(flags.contains(Flag::Warn));
        assert!(flags.contains(Flag::Standard));
        flags.clear(Flag::Warn);
        assert!(!flags.contains(Flag::Warn));
        assert!(flags.contains(Flag::Standard));
    }

    #[test]
    fn defaults_differ_by_personality() {
        let bc = Flags::defaults(Personality::Bc);
        assert!(bc.contains(Flag::Banner));
        assert!(bc.contains(Flag::Prompt));
        assert!(bc.contains(Flag::ReadPrompt));
        assert!(!bc.contains(Flag::Interactive));

        let dc = Flags::defaults(Personality::Dc);
        assert!(!dc.contains(Flag::Banner));
        assert!(dc.contains(Flag::Prompt));
    }
}
