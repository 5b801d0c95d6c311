//! Argument vector parsing
//!
//! The grammar is `<command> [positional...] [--flag value]...`. Parsing never
//! fails: a missing positional reads as the empty string and a missing flag as
//! `None`. Whether that is acceptable is decided per command by the
//! dispatcher. All values stay strings.

use std::collections::BTreeMap;

/// Flag values by flag token (including the leading `--`)
///
/// Distinguishes a flag that was not given (`None`) from one given with an
/// empty value (`Some("")`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedArgs(BTreeMap<String, String>);

impl NamedArgs {
    /// Scans `args` left to right; the first occurrence of a flag followed by
    /// another element wins
    fn scan(args: &[String]) -> Self {
        let mut named = BTreeMap::new();
        for pair in args.windows(2) {
            if pair[0].starts_with("--") {
                named
                    .entry(pair[0].clone())
                    .or_insert_with(|| pair[1].clone());
            }
        }
        Self(named)
    }

    pub fn get(&self, flag: &str) -> Option<&str> {
        self.0.get(flag).map(String::as_str)
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains_key(flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One parsed command line, immutable once built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<String>,
    named: NamedArgs,
}

impl Invocation {
    /// Parses a full argument vector (without the program name)
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let named = NamedArgs::scan(args.get(1..).unwrap_or_default());
        Self { args, named }
    }

    /// Parses the process arguments
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Element 0, or `None` when the vector is empty
    pub fn command(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Element `index` of the full vector, or `""`
    ///
    /// Index 0 is the command token, so the first argument is `positional(1)`.
    pub fn positional(&self, index: usize) -> &str {
        self.args.get(index).map(String::as_str).unwrap_or("")
    }

    /// Value following the first occurrence of `flag` after the command
    pub fn named(&self, flag: &str) -> Option<&str> {
        self.named.get(flag)
    }

    /// Owned copy of a flag value
    pub fn named_owned(&self, flag: &str) -> Option<String> {
        self.named(flag).map(str::to_string)
    }

    pub fn named_args(&self) -> &NamedArgs {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}
