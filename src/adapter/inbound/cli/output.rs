//! Plain terminal output for CLI handlers.

use std::fmt::Display;

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{title}");
}

/// Print an aligned `label: value` line.
pub fn field(label: &str, value: impl Display) {
    println!("  {label:<18} {value}");
}

pub fn success(message: &str) {
    println!("  ✓ {message}");
}

pub fn warning(message: &str) {
    println!("  ! {message}");
}
