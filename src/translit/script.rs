//! Script detection for query strings.
//!
//! Classifies text by the proportion of code points belonging to the
//! Cyrillic block versus the extended Latin set used by the academic
//! transcription. The result only chooses which transliteration
//! direction to run first; ambiguous input still gets both directions.

/// Dominant script of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    /// Both scripts present above the mixed threshold.
    Mixed,
    /// No script-specific characters at all (digits, punctuation).
    Neutral,
}

/// Non-ASCII letters of the academic Latin transcription.
///
/// `ә` (U+04D9) sits in the Unicode Cyrillic block but is used by the
/// transcription for the reduced close vowel, so it must be tested
/// before the block check. `æ` is shared by both orthographies and
/// counts for neither.
const LATIN_EXTRAS: &[char] = &[
    'ä', 'ū', 'ḱ', 'ǵ', 'ṕ', 'ṭ', 'ẜ', 'š', 'ž', 'č', 'ğ', 'ә',
];

/// Minority-script share above which text counts as `Mixed`.
const MIXED_THRESHOLD: f64 = 0.1;

fn is_latin_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || LATIN_EXTRAS.contains(&c)
}

fn is_cyrillic_letter(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

/// Classify the dominant script of `text`.
pub fn detect(text: &str) -> Script {
    let mut latin = 0usize;
    let mut cyrillic = 0usize;

    for c in text.chars().flat_map(|c| c.to_lowercase()) {
        if c == 'æ' {
            continue;
        }
        if is_latin_letter(c) {
            latin += 1;
        } else if is_cyrillic_letter(c) {
            cyrillic += 1;
        }
    }

    let total = latin + cyrillic;
    if total == 0 {
        return Script::Neutral;
    }

    let minority = latin.min(cyrillic) as f64 / total as f64;
    if latin > 0 && cyrillic > 0 && minority >= MIXED_THRESHOLD {
        return Script::Mixed;
    }

    if latin >= cyrillic {
        Script::Latin
    } else {
        Script::Cyrillic
    }
}
