//! Static grapheme correspondence table with longest-match lookup.
//!
//! The table is built once at startup from configuration data and never
//! mutated afterwards, so it can be shared across requests without
//! locking. Lookup is an explicit length-ordered probe (longest
//! configured grapheme first) rather than regex chaining, which keeps
//! match precedence auditable and makes the ambiguity check at load
//! time mechanical.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LexiconError, Result};

/// Conversion direction between the two scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    LatinToCyrillic,
    CyrillicToLatin,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LatinToCyrillic => "latin_to_cyrillic",
            Direction::CyrillicToLatin => "cyrillic_to_latin",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source-to-target correspondence in the grapheme table.
///
/// A `direction` of `None` means the entry applies in both directions
/// (used for characters shared by the two orthographies, like `æ`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphemeEntry {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub priority: i32,
}

impl GraphemeEntry {
    /// Number of code points consumed when this entry matches.
    pub fn source_len(&self) -> usize {
        self.source.chars().count()
    }
}

/// Case-fold a slice of code points into a lookup key.
fn fold(chars: &[char]) -> String {
    chars.iter().flat_map(|c| c.to_lowercase()).collect()
}

#[derive(Debug, Clone, Default)]
struct DirectionTable {
    by_source: HashMap<String, GraphemeEntry>,
    max_len: usize,
}

impl DirectionTable {
    fn insert(&mut self, direction: Direction, entry: GraphemeEntry) -> Result<()> {
        let key: String = entry.source.to_lowercase();
        let len = entry.source_len();

        if let Some(existing) = self.by_source.get(&key) {
            if existing.priority == entry.priority {
                return Err(LexiconError::AmbiguousMapping {
                    sequence: entry.source,
                    direction: direction.to_string(),
                    priority: entry.priority,
                });
            }
            if existing.priority > entry.priority {
                return Ok(());
            }
        }

        self.max_len = self.max_len.max(len);
        self.by_source.insert(key, entry);
        Ok(())
    }
}

/// Bidirectional longest-match grapheme lookup table.
#[derive(Debug, Clone, Default)]
pub struct GraphemeMapTable {
    latin_to_cyrillic: DirectionTable,
    cyrillic_to_latin: DirectionTable,
}

impl GraphemeMapTable {
    /// Build the table from configured entries.
    ///
    /// Fails with [`LexiconError::AmbiguousMapping`] when two entries
    /// for the same direction share a source sequence and a priority;
    /// when priorities differ the higher one wins.
    pub fn new(entries: &[GraphemeEntry]) -> Result<Self> {
        let mut table = Self::default();
        for entry in entries {
            if entry.source.is_empty() {
                return Err(LexiconError::InvalidConfig(
                    "grapheme entry with empty source sequence".to_string(),
                ));
            }
            match entry.direction {
                Some(direction) => table.side_mut(direction).insert(direction, entry.clone())?,
                None => {
                    // Bidirectional entries land in both tables.
                    table
                        .side_mut(Direction::LatinToCyrillic)
                        .insert(Direction::LatinToCyrillic, entry.clone())?;
                    table
                        .side_mut(Direction::CyrillicToLatin)
                        .insert(Direction::CyrillicToLatin, entry.clone())?;
                }
            }
        }
        Ok(table)
    }

    fn side_mut(&mut self, direction: Direction) -> &mut DirectionTable {
        match direction {
            Direction::LatinToCyrillic => &mut self.latin_to_cyrillic,
            Direction::CyrillicToLatin => &mut self.cyrillic_to_latin,
        }
    }

    fn side(&self, direction: Direction) -> &DirectionTable {
        match direction {
            Direction::LatinToCyrillic => &self.latin_to_cyrillic,
            Direction::CyrillicToLatin => &self.cyrillic_to_latin,
        }
    }

    /// Longest grapheme entry matching at `pos`, or `None` when the
    /// character at `pos` has no mapping in `direction` (digits,
    /// punctuation, whitespace pass through at the call site).
    ///
    /// Matching is case-folded; the caller is responsible for restoring
    /// the original casing on output.
    pub fn lookup(&self, chars: &[char], pos: usize, direction: Direction) -> Option<&GraphemeEntry> {
        let side = self.side(direction);
        let remaining = chars.len().saturating_sub(pos);
        let longest = side.max_len.min(remaining);

        for len in (1..=longest).rev() {
            let key = fold(&chars[pos..pos + len]);
            if let Some(entry) = side.by_source.get(&key) {
                return Some(entry);
            }
        }
        None
    }

    /// Length in code points of the longest configured source sequence
    /// for `direction`.
    pub fn max_grapheme_len(&self, direction: Direction) -> usize {
        self.side(direction).max_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str, target: &str, direction: Option<Direction>) -> GraphemeEntry {
        GraphemeEntry {
            source: source.to_string(),
            target: target.to_string(),
            direction,
            priority: 0,
        }
    }

    fn sample_table() -> GraphemeMapTable {
        GraphemeMapTable::new(&[
            entry("k", "к", Some(Direction::LatinToCyrillic)),
            entry("k'", "къ", Some(Direction::LatinToCyrillic)),
            entry("k'ẜ", "къу", Some(Direction::LatinToCyrillic)),
            entry("kẜ", "хъу", Some(Direction::LatinToCyrillic)),
            entry("æ", "æ", None),
            entry("х", "h", Some(Direction::CyrillicToLatin)),
            entry("хъ", "q", Some(Direction::CyrillicToLatin)),
            entry("хъу", "kẜ", Some(Direction::CyrillicToLatin)),
        ])
        .unwrap()
    }

    #[test]
    fn test_longest_match_wins() {
        let table = sample_table();
        let chars: Vec<char> = "k'ẜym".chars().collect();
        let entry = table.lookup(&chars, 0, Direction::LatinToCyrillic).unwrap();
        assert_eq!(entry.source, "k'ẜ");
        assert_eq!(entry.target, "къу");
        assert_eq!(entry.source_len(), 3);
    }

    #[test]
    fn test_shorter_match_when_cluster_absent() {
        let table = sample_table();
        let chars: Vec<char> = "kyd".chars().collect();
        let entry = table.lookup(&chars, 0, Direction::LatinToCyrillic).unwrap();
        assert_eq!(entry.source, "k");
    }

    #[test]
    fn test_cyrillic_trigraph() {
        let table = sample_table();
        let chars: Vec<char> = "хъуыд".chars().collect();
        let entry = table.lookup(&chars, 0, Direction::CyrillicToLatin).unwrap();
        assert_eq!(entry.target, "kẜ");
        assert_eq!(entry.source_len(), 3);
    }

    #[test]
    fn test_case_folded_lookup() {
        let table = sample_table();
        let chars: Vec<char> = "Kẜyd".chars().collect();
        let entry = table.lookup(&chars, 0, Direction::LatinToCyrillic).unwrap();
        assert_eq!(entry.source, "kẜ");
    }

    #[test]
    fn test_unmapped_character_returns_none() {
        let table = sample_table();
        let chars: Vec<char> = "7".chars().collect();
        assert!(table.lookup(&chars, 0, Direction::LatinToCyrillic).is_none());
    }

    #[test]
    fn test_bidirectional_entry_visible_from_both_sides() {
        let table = sample_table();
        let chars: Vec<char> = "æ".chars().collect();
        assert!(table.lookup(&chars, 0, Direction::LatinToCyrillic).is_some());
        assert!(table.lookup(&chars, 0, Direction::CyrillicToLatin).is_some());
    }

    #[test]
    fn test_equal_priority_collision_rejected() {
        let result = GraphemeMapTable::new(&[
            entry("хъ", "q", Some(Direction::CyrillicToLatin)),
            entry("хъ", "kh", Some(Direction::CyrillicToLatin)),
        ]);
        assert!(matches!(
            result,
            Err(LexiconError::AmbiguousMapping { ref sequence, .. }) if sequence == "хъ"
        ));
    }

    #[test]
    fn test_higher_priority_overrides() {
        let mut high = entry("хъ", "kh", Some(Direction::CyrillicToLatin));
        high.priority = 10;
        let table = GraphemeMapTable::new(&[
            entry("хъ", "q", Some(Direction::CyrillicToLatin)),
            high,
        ])
        .unwrap();
        let chars: Vec<char> = "хъ".chars().collect();
        let found = table.lookup(&chars, 0, Direction::CyrillicToLatin).unwrap();
        assert_eq!(found.target, "kh");
    }

    #[test]
    fn test_priority_override_is_order_independent() {
        let mut high = entry("хъ", "kh", Some(Direction::CyrillicToLatin));
        high.priority = 10;
        let table = GraphemeMapTable::new(&[
            high,
            entry("хъ", "q", Some(Direction::CyrillicToLatin)),
        ])
        .unwrap();
        let chars: Vec<char> = "хъ".chars().collect();
        let found = table.lookup(&chars, 0, Direction::CyrillicToLatin).unwrap();
        assert_eq!(found.target, "kh");
    }

    #[test]
    fn test_empty_source_rejected() {
        let result = GraphemeMapTable::new(&[entry("", "x", None)]);
        assert!(matches!(result, Err(LexiconError::InvalidConfig(_))));
    }
}
