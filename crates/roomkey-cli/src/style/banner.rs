//! Banner for the demo walkthrough.

use super::colors::SemanticStyle;

const BANNER: &str = r"
  ◆ R O O M K E Y
";

/// Prints the full banner with styling.
pub fn print_banner() {
    println!("{}", BANNER.info());
    println!("  {}", "Rule-table access control for hotel locks".muted());
    println!();
}

/// Prints a section heading, e.g. one demo test set.
pub fn print_section(title: &str) {
    println!();
    println!("{} {}", "◆".info(), title.header());
}
