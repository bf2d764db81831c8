use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::FameError;
use crate::types::FameEntry;

/// A single ranking dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    Lines,
    Commits,
    Files,
}

/// Tie-break order used after the user's chosen key: commits, then lines,
/// then files. Ordering by lines gives lines, commits, files.
const TIE_BREAK_ORDER: [OrderKey; 3] = [OrderKey::Commits, OrderKey::Lines, OrderKey::Files];

impl OrderKey {
    fn value(self, entry: &FameEntry) -> usize {
        match self {
            OrderKey::Lines   => entry.lines,
            OrderKey::Commits => entry.commits,
            OrderKey::Files   => entry.files,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderKey::Lines   => "lines",
            OrderKey::Commits => "commits",
            OrderKey::Files   => "files",
        }
    }
}

impl FromStr for OrderKey {
    type Err = FameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lines"   => Ok(OrderKey::Lines),
            "commits" => Ok(OrderKey::Commits),
            "files"   => Ok(OrderKey::Files),
            other     => Err(FameError::UnsupportedOrderKey(other.to_string())),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen key followed by the other two in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeKey([OrderKey; 3]);

impl CompositeKey {
    pub fn new(first: OrderKey) -> Self {
        let mut keys = [first; 3];
        let mut rest = TIE_BREAK_ORDER.iter().copied().filter(|k| *k != first);
        for slot in keys.iter_mut().skip(1) {
            // TIE_BREAK_ORDER holds every key once, so two remain
            *slot = rest.next().unwrap_or(first);
        }
        CompositeKey(keys)
    }

    pub fn keys(&self) -> &[OrderKey; 3] {
        &self.0
    }

    /// Higher values first on each key in turn, then names ascending.
    pub fn compare(&self, a: &FameEntry, b: &FameEntry) -> Ordering {
        self.0
            .iter()
            .map(|key| key.value(b).cmp(&key.value(a)))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.name.cmp(&b.name))
    }
}

impl Default for CompositeKey {
    fn default() -> Self {
        CompositeKey::new(OrderKey::Lines)
    }
}

impl FromStr for CompositeKey {
    type Err = FameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<OrderKey>().map(CompositeKey::new)
    }
}

pub fn sort_fame_entries(entries: &mut [FameEntry], order: &CompositeKey) {
    entries.sort_by(|a, b| order.compare(a, b));
}
