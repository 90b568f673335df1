//! Native-compilation response files.
//!
//! A response file is a plain-text artifact with one command-line directive
//! per line (e.g. `--feature:Some.Switch=true`). The harness treats each
//! directive as an opaque token: order is preserved, nothing is deduplicated.

/// Ordered sequence of directives from a response file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseFile {
    lines: Vec<String>,
}

impl ResponseFile {
    /// Parse response-file content.
    ///
    /// Lines are trimmed; blank lines are dropped. An empty file yields an
    /// empty sequence.
    pub fn parse(content: &str) -> Self {
        let lines = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self { lines }
    }

    /// The directives, in artifact order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether an exact directive line is present anywhere in the sequence.
    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    /// Whether any directive contains the given substring.
    pub fn contains_substring(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Number of directives.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
