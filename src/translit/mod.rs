//! # Transliteration Module
//!
//! Deterministic, side-effect-free mapping between the Cyrillic and
//! academic-Latin orthographies of Ossetian, plus the typo and
//! irregular-word machinery built on top of it.
//!
//! The transcription follows the scholarly conventions the dictionaries
//! use: glottal stops marked with apostrophes (`k'`, `p'`, `t'`, `c'`),
//! secondary labialization with a dedicated diacritic (`kẜ`, `gẜ`,
//! `k'ẜ`), and the usual hacek/macron letters (`š`, `ž`, `č`, `ū`).
//!
//! ## Key Components
//!
//! - [`table`] - longest-match grapheme correspondence table with
//!   load-time ambiguity rejection
//! - [`script`] - dominant-script classification of query strings
//! - [`convert`] - greedy left-to-right script conversion
//! - [`variants`] - bounded single-edit typo variant generation
//! - [`special`] - exact-match resolution of irregular words

pub mod convert;
pub mod script;
pub mod special;
pub mod table;
pub mod variants;

pub use convert::Transliterator;
pub use script::{Script, detect};
pub use special::{SpecialCase, SpecialCaseResolver};
pub use table::{Direction, GraphemeEntry, GraphemeMapTable};
pub use variants::{TypoRule, VariantGenerator};
