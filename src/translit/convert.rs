//! Script conversion over the grapheme table.
//!
//! The scan is greedy left to right: at every position the table is
//! probed for the longest matching grapheme in the requested direction;
//! on a match the mapped target is emitted and the scan advances by the
//! consumed source length, otherwise the character passes through
//! unchanged. The result is a pure function of the input text and the
//! static table.
//!
//! Greedy longest-match is what keeps the clustered forms intact: a
//! glottal-stop marker fused to a stop (`k'` → `къ`) and a
//! labialization marker fused to a possibly-glottalized consonant
//! (`kẜ` → `хъу`, `k'ẜ` → `къу`) must be consumed as one grapheme;
//! splitting them yields a different consonant entirely.

use super::table::{Direction, GraphemeMapTable};

/// Deterministic script converter backed by a [`GraphemeMapTable`].
#[derive(Debug, Clone)]
pub struct Transliterator {
    table: GraphemeMapTable,
}

impl Transliterator {
    pub fn new(table: GraphemeMapTable) -> Self {
        Self { table }
    }

    /// Convert `text` in `direction`, preserving the casing pattern of
    /// each consumed source grapheme on its output.
    pub fn convert(&self, text: &str, direction: Direction) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        while pos < chars.len() {
            match self.table.lookup(&chars, pos, direction) {
                Some(entry) => {
                    let len = entry.source_len();
                    out.push_str(&recase(&chars[pos..pos + len], &entry.target));
                    pos += len;
                }
                None => {
                    out.push(chars[pos]);
                    pos += 1;
                }
            }
        }

        out
    }
}

/// Reproduce the casing of the consumed source grapheme on the mapped
/// target: an all-uppercase source uppercases the whole target, an
/// initial capital capitalizes the target's first character.
fn recase(source: &[char], target: &str) -> String {
    if target.is_empty() {
        return String::new();
    }

    let cased: Vec<&char> = source.iter().filter(|c| c.is_alphabetic()).collect();
    let all_upper = !cased.is_empty() && cased.iter().all(|c| c.is_uppercase());

    if all_upper {
        return target.to_uppercase();
    }

    if source.first().is_some_and(|c| c.is_uppercase()) {
        let mut chars = target.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().chain(chars).collect();
        }
    }

    target.to_string()
}
