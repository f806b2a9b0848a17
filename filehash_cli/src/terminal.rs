//! Terminal detection
//!
//! Decides whether progress bars and colours are worth emitting. Progress
//! goes to stderr and results go to stdout, so the two are checked
//! separately.

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdin, stdout};

const CI_VARIABLES: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "JENKINS_URL",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "TF_BUILD",
];

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    stdout().is_terminal()
        && !is_ci_environment()
        && env::var("DEBIAN_FRONTEND").unwrap_or_default() != "noninteractive"
}

/// Whether prompts can be shown, i.e. both ends are a terminal
pub fn can_prompt() -> bool {
    stdin().is_terminal() && stderr().is_terminal()
}

fn term_supports_ansi() -> bool {
    let term = env::var("TERM").unwrap_or_default();
    cfg!(windows) || !(term.is_empty() || term == "dumb")
}

fn is_ci_environment() -> bool {
    CI_VARIABLES.iter().any(|var| env::var_os(var).is_some())
}

/// Progress bars are drawn only on an ANSI-capable terminal stderr
pub fn should_show_progress(progress_enabled: bool) -> bool {
    progress_enabled && stderr().is_terminal() && !is_ci_environment() && term_supports_ansi()
}

/// Colour is used when enabled, not vetoed by `NO_COLOR` and stdout is a terminal
pub fn should_use_color(color_enabled: bool) -> bool {
    color_enabled
        && env::var_os("NO_COLOR").is_none()
        && is_interactive()
        && term_supports_ansi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_settings_always_win() {
        assert!(!should_show_progress(false));
        assert!(!should_use_color(false));
    }
}
