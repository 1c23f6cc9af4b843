//! Visible-before-use legal notice

pub const DISCLAIMER: &str = include_str!("../DISCLAIMER.md");

/// Print the disclaimer to stderr before any command runs, keeping
/// machine-readable stdout clean.
pub fn show() {
    eprintln!("{}", DISCLAIMER.trim_end());
    eprintln!();
}
