use std::path::Path;

/// The two calculator front ends sharing this binary.
///
/// Which one runs is decided purely from the invoked program name; the two
/// personalities share no mutable state beyond that resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    /// The primary, bc-like personality.
    Bc,
    /// The alternate, dc-like personality.
    Dc,
}

impl Personality {
    pub const PRIMARY_NAME: &'static str = "rbc";
    pub const ALTERNATE_NAME: &'static str = "rdc";

    pub fn name(self) -> &'static str {
        match self {
            Personality::Bc => Personality::PRIMARY_NAME,
            Personality::Dc => Personality::ALTERNATE_NAME,
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            Personality::Bc => {
                "rbc is a command-line arbitrary-precision calculator with a \
                 Turing-complete language."
            }
            Personality::Dc => {
                "rdc is a command-line arbitrary-precision reverse-Polish \
                 calculator."
            }
        }
    }

    /// Resolves the personality from the invoked program name.
    ///
    /// The alternate personality is selected iff the base name (directory
    /// components stripped) is exactly [`Personality::ALTERNATE_NAME`], or
    /// starts with it followed by a separator such as a version or extension
    /// suffix. `rdc`, `rdc.exe` and `rdc-2` all select rdc; `rdcfoo` does not.
    pub fn from_program_name(argv0: &str) -> Personality {
        let base = Path::new(argv0)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(argv0);
        if is_alternate_name(base) {
            Personality::Dc
        } else {
            Personality::Bc
        }
    }
}

fn is_alternate_name(base: &str) -> bool {
    match base.strip_prefix(Personality::ALTERNATE_NAME) {
        Some(rest) => rest
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_alphanumeric()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::Personality;

    #[test]
    fn exact_alternate_name_selects_dc() {
        assert_eq!(Personality::from_program_name("rdc"), Personality::Dc);
        assert_eq!(
            Personality::from_program_name("/usr/local/bin/rdc"),
            Personality::Dc
        );
    }

    #[test]
    fn suffixed_alternate_names_select_dc() {
        assert_eq!(Personality::from_program_name("rdc.exe"), Personality::Dc);
        assert_eq!(Personality::from_program_name("rdc-2.1"), Personality::Dc);
        assert_eq!(Personality::from_program_name("rdc_old"), Personality::Dc);
    }

    #[test]
    fn everything_else_selects_bc() {
        assert_eq!(Personality::from_program_name("rbc"), Personality::Bc);
        assert_eq!(Personality::from_program_name("rdcfoo"), Personality::Bc);
        assert_eq!(Personality::from_program_name("rdc2"), Personality::Bc);
        assert_eq!(Personality::from_program_name("dc"), Personality::Bc);
        assert_eq!(Personality::from_program_name(""), Personality::Bc);
    }
}
