//! Query highlighting for display text

use regex::RegexBuilder;

/// Wraps literal, case-insensitive query occurrences in open/close markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    open: String,
    close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

impl Highlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// ANSI reverse-video markers for terminal output
    pub fn ansi() -> Self {
        Self::new("\x1b[7m", "\x1b[0m")
    }

    /// Highlight every occurrence of `query` in `text`.
    ///
    /// The query is escaped before matching, so `a+b` only matches the
    /// literal text `a+b`. An empty query returns the text unchanged.
    pub fn highlight(&self, text: &str, query: &str) -> String {
        if query.is_empty() {
            return text.to_string();
        }

        let pattern = match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                // Only reachable when the escaped query exceeds the regex size limit
                tracing::warn!("Skipping highlight for oversized query: {}", e);
                return text.to_string();
            }
        };

        let mut out = String::with_capacity(text.len() + self.open.len() + self.close.len());
        let mut last = 0;
        for m in pattern.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            out.push_str(&self.open);
            out.push_str(m.as_str());
            out.push_str(&self.close);
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Highlight with the default `<mark>` markers
pub fn highlight(text: &str, query: &str) -> String {
    Highlighter::default().highlight(text, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_text() {
        for text in ["", "Marina Bay Sands", "a+b (c)"] {
            assert_eq!(highlight(text, ""), text);
        }
    }

    #[test]
    fn test_highlights_every_occurrence_preserving_case() {
        assert_eq!(
            highlight("Bay view of the bay", "BAY"),
            "<mark>Bay</mark> view of the <mark>bay</mark>"
        );
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert_eq!(highlight("aab a+b", "a+b"), "aab <mark>a+b</mark>");
        assert_eq!(highlight("cost (SGD) $5", "(sgd)"), "cost <mark>(SGD)</mark> $5");
        assert_eq!(highlight("anything", ".*"), "anything");
        assert_eq!(highlight("x [y] z", "[y]"), "x <mark>[y]</mark> z");
    }

    #[test]
    fn test_no_match_returns_text() {
        assert_eq!(highlight("Sentosa", "orchard"), "Sentosa");
    }

    #[test]
    fn test_custom_markers() {
        let hl = Highlighter::new("[", "]");
        assert_eq!(hl.highlight("Little India", "india"), "Little [India]");

        let ansi = Highlighter::ansi().highlight("Clarke Quay", "quay");
        assert_eq!(ansi, "Clarke \x1b[7mQuay\x1b[0m");
    }
}
