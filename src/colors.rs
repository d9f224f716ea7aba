//! Terminal color setup for the run summary.
//!
//! Follows the NO_COLOR standard (https://no-color.org/) and the CLICOLOR
//! conventions. The summary goes to stderr, so TTY detection checks stderr:
//! stdout may be carrying the JSON document.

use colored::control;
use std::io::IsTerminal;

/// Decide whether to color output from the relevant environment values
pub fn color_choice(
    no_color: Option<&str>,
    clicolor_force: Option<&str>,
    clicolor: Option<&str>,
    is_tty: bool,
) -> bool {
    if no_color.is_some() {
        return false;
    }
    if clicolor_force.is_some_and(|v| v != "0") {
        return true;
    }
    if clicolor == Some("0") {
        return false;
    }
    is_tty
}

/// Configure `colored` for the whole process. Call once at startup.
pub fn init_colors() {
    let no_color = std::env::var("NO_COLOR").ok();
    let clicolor_force = std::env::var("CLICOLOR_FORCE").ok();
    let clicolor = std::env::var("CLICOLOR").ok();

    control::set_override(color_choice(
        no_color.as_deref(),
        clicolor_force.as_deref(),
        clicolor.as_deref(),
        std::io::stderr().is_terminal(),
    ));
}
