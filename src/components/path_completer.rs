// ABOUTME: Tab completion for filesystem paths with round-robin cycling
// Matches are cached per parent directory and recomputed whenever the parent changes

use std::fs;
use std::path::{Path, MAIN_SEPARATOR};
use tracing::debug;

/// Completes a path typed into a single text field.
///
/// Call [`PathCompleter::next`] on every Tab press and [`PathCompleter::reset`]
/// on every other keystroke, otherwise stale matches are reused against a changed query.
#[derive(Debug, Clone, Default)]
pub struct PathCompleter {
    matches: Option<Vec<String>>,
    cycle_index: usize,
    last_input: String,
    dirs_only: bool,
}

impl PathCompleter {
    pub fn new(dirs_only: bool) -> Self {
        Self {
            dirs_only,
            ..Self::default()
        }
    }

    /// Next completion for `input`.
    ///
    /// The first request for a parent directory computes candidates and returns either the
    /// unambiguous common prefix or the first match. Later requests with the same parent
    /// cycle through the candidates.
    pub fn next(&mut self, input: &str) -> String {
        let (parent, prefix) = split_path(input);

        let cached = self
            .matches
            .as_ref()
            .filter(|_| self.last_input == parent);

        let Some(matches) = cached else {
            let matches = self.find_matches(&parent, &prefix);
            debug!(parent = %parent, prefix = %prefix, count = matches.len(), "Computed path completions");
            self.cycle_index = 0;
            self.last_input = parent.clone();

            let result = if matches.is_empty() {
                input.to_string()
            } else {
                let common = (matches.len() > 1)
                    .then(|| join(&parent, &longest_common_prefix(&matches)))
                    .filter(|candidate| candidate.chars().count() > input.chars().count());
                common.unwrap_or_else(|| format_match(&parent, &matches[0]))
            };
            self.matches = Some(matches);
            return result;
        };

        if matches.is_empty() {
            return input.to_string();
        }

        self.cycle_index = (self.cycle_index + 1) % matches.len();
        format_match(&parent, &matches[self.cycle_index])
    }

    /// Forget cached matches and the cycle position
    pub fn reset(&mut self) {
        self.matches = None;
        self.cycle_index = 0;
        self.last_input.clear();
    }

    fn find_matches(&self, parent: &str, prefix: &str) -> Vec<String> {
        let dir = if parent.is_empty() { "." } else { parent };
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let low_prefix = prefix.to_lowercase();
        let mut matches: Vec<String> = entries
            .filter_map(Result::ok)
            // Symlinks are not followed when filtering for directories
            .filter(|entry| !self.dirs_only || entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.to_lowercase().starts_with(&low_prefix))
            .collect();

        matches.sort();
        matches
    }
}

/// Split a query into parent directory and name prefix.
///
/// ```text
/// ""          -> (".", "")
/// "."         -> (".", "")
/// "my"        -> (".", "my")
/// "src/"      -> ("src", "")
/// "src/com"   -> ("src", "com")
/// "src/."     -> ("src", ".")
/// ```
pub fn split_path(input: &str) -> (String, String) {
    if input.is_empty() || input == "." {
        return (".".to_string(), String::new());
    }

    if input.ends_with('/') || input.ends_with(MAIN_SEPARATOR) {
        let trimmed = input.trim_end_matches(['/', MAIN_SEPARATOR]);
        if trimmed.is_empty() {
            return (MAIN_SEPARATOR.to_string(), String::new());
        }
        return (trimmed.to_string(), String::new());
    }

    // Plain string split so `.` and `..` stay literal name prefixes
    match input.rfind(['/', MAIN_SEPARATOR]) {
        Some(0) => (MAIN_SEPARATOR.to_string(), input[1..].to_string()),
        Some(idx) => (input[..idx].to_string(), input[idx + 1..].to_string()),
        None => (".".to_string(), input.to_string()),
    }
}

/// Case-insensitive longest common prefix, returned with the first entry's casing
fn longest_common_prefix(names: &[String]) -> String {
    let Some((first, rest)) = names.split_first() else {
        return String::new();
    };

    let mut len = 0;
    'outer: for (i, ch) in first.chars().enumerate() {
        for other in rest {
            match other.chars().nth(i) {
                Some(o) if o.to_lowercase().eq(ch.to_lowercase()) => {}
                _ => break 'outer,
            }
        }
        len = i + 1;
    }
    first.chars().take(len).collect()
}

fn join(parent: &str, name: &str) -> String {
    if name.is_empty() {
        return parent.to_string();
    }
    if parent == "." {
        return name.to_string();
    }
    if parent.ends_with('/') || parent.ends_with(MAIN_SEPARATOR) {
        return format!("{parent}{name}");
    }
    format!("{parent}{MAIN_SEPARATOR}{name}")
}

fn format_match(parent: &str, name: &str) -> String {
    let result = join(parent, name);
    if Path::new(&result).is_dir() {
        format!("{result}{MAIN_SEPARATOR}")
    } else {
        result
    }
}
