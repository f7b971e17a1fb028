//! Query expansion planning.
//!
//! Composes the transliteration machinery into the final candidate
//! list: original query, irregular-word forms, script conversions,
//! then typo variants of everything collected so far, deduplicated by
//! exact text and capped. The result is a pure function of the static
//! tables and the input, so repeated expansion of the same query is
//! byte-identical.

use crate::config::EngineConfig;
use crate::error::{LexiconError, Result};
use crate::query::candidate::{Candidate, Origin};
use crate::translit::table::Direction;
use crate::translit::{
    Script, SpecialCaseResolver, Transliterator, VariantGenerator, detect,
};

/// Plans the bounded, ordered candidate set for one query.
#[derive(Debug, Clone)]
pub struct QueryExpansionPlanner {
    transliterator: Transliterator,
    variants: VariantGenerator,
    special: SpecialCaseResolver,
}

impl QueryExpansionPlanner {
    /// Build the planner from validated engine configuration.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            transliterator: Transliterator::new(config.grapheme_table()?),
            variants: config.variant_generator(),
            special: config.special_resolver()?,
        })
    }

    /// Expand `query` into at most `capacity` candidates.
    ///
    /// With transliteration disabled the result is exactly the original
    /// query. Otherwise candidates are generated in the order original,
    /// special-case forms, transliterations, typo variants; duplicates
    /// keep their earliest position with the higher-priority origin;
    /// the final list is ordered by origin priority (SpecialCase >
    /// Original > Transliterated > TypoVariant) with generation order
    /// breaking ties. The original query always survives truncation.
    pub fn expand(
        &self,
        query: &str,
        transliteration_enabled: bool,
        capacity: usize,
    ) -> Result<Vec<Candidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LexiconError::InvalidQuery);
        }
        let capacity = capacity.max(1);

        if !transliteration_enabled {
            return Ok(vec![Candidate::new(query, Origin::Original)]);
        }

        let mut candidates: Vec<Candidate> = Vec::new();
        push_deduped(&mut candidates, query.to_string(), Origin::Original);

        for form in self.special.resolve(query) {
            push_deduped(&mut candidates, form, Origin::SpecialCase);
        }

        for direction in directions_for(detect(query)) {
            let converted = self.transliterator.convert(query, direction);
            if !converted.trim().is_empty() {
                push_deduped(&mut candidates, converted, Origin::Transliterated);
            }
        }

        // Typo variants of everything collected so far, budgeted so the
        // total never exceeds capacity.
        let bases: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
        for base in bases {
            let budget = capacity.saturating_sub(candidates.len());
            if budget == 0 {
                break;
            }
            for variant in self.variants.generate(&base, budget) {
                push_deduped(&mut candidates, variant, Origin::TypoVariant);
            }
        }

        // Stable sort keeps generation order within each priority tier.
        candidates.sort_by(|a, b| b.priority().cmp(&a.priority()));
        retain_original_within(&mut candidates, capacity);
        candidates.truncate(capacity);

        Ok(candidates)
    }
}

/// Which conversion directions to attempt for a detected script. The
/// unambiguous cases run the single opposite direction; mixed or
/// neutral input gets both.
fn directions_for(script: Script) -> Vec<Direction> {
    match script {
        Script::Latin => vec![Direction::LatinToCyrillic],
        Script::Cyrillic => vec![Direction::CyrillicToLatin],
        Script::Mixed | Script::Neutral => {
            vec![Direction::LatinToCyrillic, Direction::CyrillicToLatin]
        }
    }
}

/// Append a candidate unless its exact text is already present; on a
/// duplicate the earliest position is kept and the origin upgraded when
/// the newcomer outranks it.
fn push_deduped(candidates: &mut Vec<Candidate>, text: String, origin: Origin) {
    if let Some(existing) = candidates.iter_mut().find(|c| c.text == text) {
        if origin.priority() > existing.origin.priority() {
            existing.origin = origin;
        }
        return;
    }
    candidates.push(Candidate::new(text, origin));
}

/// Truncation must never evict the `{query, Original}` candidate: when
/// special-case forms alone fill the cap, the original takes the last
/// kept slot.
fn retain_original_within(candidates: &mut [Candidate], capacity: usize) {
    let Some(idx) = candidates.iter().position(|c| c.origin == Origin::Original) else {
        return;
    };
    if idx >= capacity {
        candidates[capacity - 1..=idx].rotate_right(1);
    }
}
