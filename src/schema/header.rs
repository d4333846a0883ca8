use std::collections::HashMap;

use tracing::debug;

/// Trimmed column name -> zero-based position, built from the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
    width: usize,
}

impl HeaderIndex {
    /// Index `headers`. Names are trimmed and case-sensitive; on duplicates
    /// the last occurrence wins.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positions = HashMap::new();
        let mut width = 0;
        for (idx, raw) in headers.into_iter().enumerate() {
            let name = raw.as_ref().trim();
            if let Some(prev) = positions.insert(name.to_string(), idx) {
                debug!(column = name, prev, idx, "duplicate header, last one wins");
            }
            width = idx + 1;
        }
        Self { positions, width }
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Number of physical header cells (including duplicates).
    pub fn width(&self) -> usize {
        self.width
    }
}
