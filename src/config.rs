//! # Configuration Module
//!
//! Static linguistic data (grapheme map, typo rules, special cases) and
//! backend connection settings.
//!
//! The linguistic tables ship built in (they encode the scholarly
//! transcription conventions for Ossetian and rarely change), but every
//! table can also be loaded from a TOML file with the same shape, which
//! is how deployments carry dictionary-specific additions.
//!
//! All tables are constructed once at startup, validated, and shared as
//! immutable state for the lifetime of the process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::translit::table::Direction::{CyrillicToLatin, LatinToCyrillic};
use crate::translit::{
    GraphemeEntry, GraphemeMapTable, SpecialCase, SpecialCaseResolver, TypoRule, VariantGenerator,
};

/// Default number of merged hits returned by a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Default cap on hits sharing one dictionary source.
pub const DEFAULT_PER_SOURCE_LIMIT: usize = 5;

/// Default cap on expanded candidate queries per request.
pub const DEFAULT_CANDIDATE_CAPACITY: usize = 24;

/// Upper bound on the per-candidate fetch from the backend. The
/// aggregator over-fetches (twice the requested limit) so merging and
/// per-source truncation have enough material, but never past this.
pub const MAX_FETCH_LIMIT: usize = 100;

/// Default per-candidate search timeout, seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

/// Static linguistic configuration for the expansion engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub graphemes: Vec<GraphemeEntry>,
    #[serde(default)]
    pub typo_rules: Vec<TypoRule>,
    #[serde(default)]
    pub special_cases: Vec<SpecialCase>,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Build the validated grapheme lookup table.
    pub fn grapheme_table(&self) -> Result<GraphemeMapTable> {
        GraphemeMapTable::new(&self.graphemes)
    }

    /// Build the typo variant generator.
    pub fn variant_generator(&self) -> VariantGenerator {
        VariantGenerator::new(self.typo_rules.clone())
    }

    /// Build the validated special-case resolver.
    pub fn special_resolver(&self) -> Result<SpecialCaseResolver> {
        SpecialCaseResolver::new(self.special_cases.clone())
    }

    /// The built-in Ossetian tables.
    pub fn builtin() -> Self {
        Self {
            graphemes: builtin_graphemes(),
            typo_rules: builtin_typo_rules(),
            special_cases: builtin_special_cases(),
        }
    }
}

/// Connection settings for the Meilisearch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub index_uid: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:7700".to_string(),
            api_key: None,
            index_uid: "dictionary".to_string(),
            timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

fn latin(source: &str, target: &str) -> GraphemeEntry {
    GraphemeEntry {
        source: source.to_string(),
        target: target.to_string(),
        direction: Some(LatinToCyrillic),
        priority: 0,
    }
}

fn cyrillic(source: &str, target: &str) -> GraphemeEntry {
    GraphemeEntry {
        source: source.to_string(),
        target: target.to_string(),
        direction: Some(CyrillicToLatin),
        priority: 0,
    }
}

fn both(source: &str, target: &str) -> GraphemeEntry {
    GraphemeEntry {
        source: source.to_string(),
        target: target.to_string(),
        direction: None,
        priority: 0,
    }
}

/// The scholarly transcription table.
///
/// Latin-to-Cyrillic is many-to-one in places (`u`, `ū`, `w` and `ә`
/// all write `у`), so only one Cyrillic-to-Latin entry exists per
/// Cyrillic grapheme and round trips are exact only for words spelled
/// with the preferred transcription.
fn builtin_graphemes() -> Vec<GraphemeEntry> {
    vec![
        // Shared by both orthographies
        both("æ", "æ"),
        // Latin letters
        latin("a", "а"),
        latin("ä", "æ"),
        latin("b", "б"),
        latin("c", "ц"),
        latin("č", "ч"),
        latin("d", "д"),
        latin("e", "е"),
        latin("f", "ф"),
        latin("g", "г"),
        latin("ğ", "гъ"),
        latin("h", "х"),
        latin("i", "и"),
        latin("j", "й"),
        latin("k", "к"),
        latin("ḱ", "къ"),
        latin("l", "л"),
        latin("m", "м"),
        latin("n", "н"),
        latin("o", "о"),
        latin("p", "п"),
        latin("ṕ", "пъ"),
        latin("q", "хъ"),
        latin("r", "р"),
        latin("s", "с"),
        latin("š", "ш"),
        latin("t", "т"),
        latin("ṭ", "тъ"),
        latin("u", "у"),
        latin("ū", "у"),
        latin("v", "в"),
        latin("w", "у"),
        latin("x", "х"),
        latin("y", "ы"),
        latin("z", "з"),
        latin("ž", "ж"),
        latin("ә", "у"),
        // Glottal stops marked with apostrophes
        latin("k'", "къ"),
        latin("p'", "пъ"),
        latin("t'", "тъ"),
        latin("c'", "цъ"),
        // Labialized velar clusters
        latin("kẜ", "хъу"),
        latin("gẜ", "гъу"),
        latin("k'ẜ", "къу"),
        // Affricate digraphs
        latin("dz", "дз"),
        latin("dzh", "дж"),
        // Cyrillic letters
        cyrillic("а", "a"),
        cyrillic("б", "b"),
        cyrillic("в", "v"),
        cyrillic("г", "g"),
        cyrillic("гъ", "ğ"),
        cyrillic("д", "d"),
        cyrillic("дж", "dzh"),
        cyrillic("дз", "dz"),
        cyrillic("е", "e"),
        cyrillic("ё", "jo"),
        cyrillic("ж", "ž"),
        cyrillic("з", "z"),
        cyrillic("и", "i"),
        cyrillic("й", "j"),
        cyrillic("к", "k"),
        cyrillic("къ", "k'"),
        cyrillic("л", "l"),
        cyrillic("м", "m"),
        cyrillic("н", "n"),
        cyrillic("о", "o"),
        cyrillic("п", "p"),
        cyrillic("пъ", "p'"),
        cyrillic("р", "r"),
        cyrillic("с", "s"),
        cyrillic("т", "t"),
        cyrillic("тъ", "t'"),
        cyrillic("у", "u"),
        cyrillic("ф", "f"),
        cyrillic("х", "h"),
        cyrillic("хъ", "q"),
        cyrillic("ц", "c"),
        cyrillic("цъ", "c'"),
        cyrillic("ч", "č"),
        cyrillic("ш", "š"),
        cyrillic("щ", "šč"),
        cyrillic("ъ", ""),
        cyrillic("ы", "y"),
        cyrillic("ь", ""),
        cyrillic("э", "e"),
        cyrillic("ю", "ju"),
        cyrillic("я", "ja"),
        // Labialized clusters
        cyrillic("хъу", "kẜ"),
        cyrillic("гъу", "gẜ"),
        cyrillic("къу", "k'ẜ"),
    ]
}

fn typo(source: &str, replacements: &[&str]) -> TypoRule {
    TypoRule {
        source: source.to_string(),
        replacements: replacements.iter().map(|r| r.to_string()).collect(),
    }
}

/// Common misspellings seen in user queries: ASCII fallbacks for the
/// transcription diacritics and the æ/ä confusion.
fn builtin_typo_rules() -> Vec<TypoRule> {
    vec![
        typo("æ", &["ä", "a", "e"]),
        typo("ä", &["æ", "a", "e"]),
        typo("ū", &["u"]),
        typo("ә", &["u", "y"]),
        typo("ẜ", &["w"]),
        typo("ğ", &["gh"]),
        typo("š", &["sh"]),
        typo("ž", &["zh"]),
        typo("č", &["ch"]),
    ]
}

fn builtin_special_cases() -> Vec<SpecialCase> {
    vec![
        // "hare": the attested transcriptions disagree with the
        // mechanical mapping of хъу
        SpecialCase {
            canonical: "тæрхъус".to_string(),
            latin: vec![
                "tærqūs".to_string(),
                "tærqos".to_string(),
                "tärqūs".to_string(),
                "tärqos".to_string(),
            ],
            cyrillic: vec!["тæрхъус".to_string()],
        },
    ]
}
