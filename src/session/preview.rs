//! Short human-readable rendering of a result for the popup.

use std::fmt;

/// Number of items shown in a preview.
pub const PREVIEW_ITEMS: usize = 10;

/// Characters shown per item before truncation.
pub const PREVIEW_CHARS: usize = 100;

/// The first few values of a result, truncated for display.
///
/// ```
/// use tab_scraper::Preview;
///
/// let values: Vec<String> = (1..=12).map(|i| format!("item {i}")).collect();
/// let preview = Preview::new(&values);
/// assert_eq!(preview.lines().len(), 10);
/// assert_eq!(preview.remaining(), 2);
/// assert!(preview.to_string().ends_with("... and 2 more items"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    lines: Vec<String>,
    remaining: usize,
}

impl Preview {
    /// Builds the preview of `values`.
    #[must_use]
    pub fn new(values: &[String]) -> Self {
        let lines = values
            .iter()
            .take(PREVIEW_ITEMS)
            .enumerate()
            .map(|(i, value)| format!("{}: {}", i + 1, truncate(value)))
            .collect();

        Self {
            lines,
            remaining: values.len().saturating_sub(PREVIEW_ITEMS),
        }
    }

    /// Numbered, truncated item lines.
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Items not shown.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        if self.remaining > 0 {
            write!(f, "\n... and {} more items", self.remaining)?;
        }
        Ok(())
    }
}

fn truncate(value: &str) -> String {
    match value.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
