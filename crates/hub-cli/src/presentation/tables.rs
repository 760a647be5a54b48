//! Table formatting utilities for CLI output.

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use hub_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("buildah", 10), "buildah");
/// assert_eq!(truncate_string("git-clone-with-submodules", 12), "git-clone...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Format an average rating; unrated resources show `--`.
pub fn format_rating(average: f64) -> String {
    if average > 0.0 {
        format!("{average:.1}")
    } else {
        "--".to_string()
    }
}
