//! Typo-tolerant spelling variant generation.
//!
//! Each configured rule maps one source sequence to a set of common
//! misspellings (`æ` typed as `ä`, `a` or `e`; `š` typed as `sh`, and
//! so on). Variants apply exactly one substitution: single edits are
//! prioritized over compound edits to keep the candidate set small and
//! high-precision, so generation never attempts multi-substitution
//! combinations.

use serde::{Deserialize, Serialize};

/// One substitution rule, applicable within either script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypoRule {
    pub source: String,
    pub replacements: Vec<String>,
}

/// Bounded single-edit variant generator over a fixed rule set.
#[derive(Debug, Clone, Default)]
pub struct VariantGenerator {
    rules: Vec<TypoRule>,
}

impl VariantGenerator {
    pub fn new(rules: Vec<TypoRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[TypoRule] {
        &self.rules
    }

    /// Produce up to `max_variants` spelling variants of `text`, each
    /// distinct from the input and from one another.
    ///
    /// Ordering is ascending occurrence position, then rule declaration
    /// order, then replacement declaration order. Once the cap is hit
    /// generation stops without backtracking.
    pub fn generate(&self, text: &str, max_variants: usize) -> Vec<String> {
        let mut variants: Vec<String> = Vec::new();
        if max_variants == 0 || text.is_empty() {
            return variants;
        }

        let chars: Vec<char> = text.chars().collect();
        // One folded char per original char keeps the two views
        // position-aligned; expanding folds (İ lowercases to i plus a
        // combining dot) would desync the splice offsets.
        let folded: Vec<char> = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();

        for pos in 0..chars.len() {
            for rule in &self.rules {
                let source: Vec<char> = rule.source.chars().collect();
                if !matches_at(&folded, pos, &source) {
                    continue;
                }
                for replacement in &rule.replacements {
                    let variant = splice(&chars, pos, source.len(), replacement);
                    if variant != text && !variants.contains(&variant) {
                        variants.push(variant);
                        if variants.len() >= max_variants {
                            return variants;
                        }
                    }
                }
            }
        }

        variants
    }
}

/// Case-insensitive match of `source` against `folded` at `pos`.
fn matches_at(folded: &[char], pos: usize, source: &[char]) -> bool {
    pos + source.len() <= folded.len() && &folded[pos..pos + source.len()] == source
}

fn splice(chars: &[char], pos: usize, len: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(chars.len() + replacement.len());
    out.extend(&chars[..pos]);
    out.push_str(replacement);
    out.extend(&chars[pos + len..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(source: &str, replacements: &[&str]) -> TypoRule {
        TypoRule {
            source: source.to_string(),
            replacements: replacements.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn generator() -> VariantGenerator {
        VariantGenerator::new(vec![
            rule("æ", &["ä", "a", "e"]),
            rule("ū", &["u"]),
            rule("š", &["sh"]),
        ])
    }

    #[test]
    fn test_single_substitution_per_variant() {
        let variants = generator().generate("tærqūs", 10);
        assert_eq!(
            variants,
            vec!["tärqūs", "tarqūs", "terqūs", "tærqus"]
        );
    }

    #[test]
    fn test_position_then_rule_order() {
        // Two æ occurrences: all variants for the first position come
        // before any for the second.
        let variants = generator().generate("æmæ", 10);
        assert_eq!(
            variants,
            vec!["ämæ", "amæ", "emæ", "æmä", "æma", "æme"]
        );
    }

    #[test]
    fn test_cap_respected() {
        let variants = generator().generate("æmæ", 2);
        assert_eq!(variants, vec!["ämæ", "amæ"]);
    }

    #[test]
    fn test_zero_cap() {
        assert!(generator().generate("tærqūs", 0).is_empty());
    }

    #[test]
    fn test_multi_character_replacement() {
        let variants = generator().generate("šalon", 10);
        assert_eq!(variants, vec!["shalon"]);
    }

    #[test]
    fn test_no_applicable_rules() {
        assert!(generator().generate("kitap", 10).is_empty());
    }

    #[test]
    fn test_input_never_mutated_or_emitted() {
        let text = "tærqūs";
        let variants = generator().generate(text, 10);
        assert!(!variants.contains(&text.to_string()));
        assert_eq!(text, "tærqūs");
    }

    #[test]
    fn test_case_insensitive_match() {
        // Matching is case-folded; the replacement is spliced verbatim.
        let variants = generator().generate("Ūs", 10);
        assert_eq!(variants, vec!["us"]);
    }

    #[test]
    fn test_expanding_fold_keeps_positions_aligned() {
        // İ lowercases to two code points; the substitutions must still
        // land on the æ occurrences, not their shifted neighbours.
        let variants = generator().generate("İæmæ", 10);
        assert_eq!(
            variants,
            vec!["İämæ", "İamæ", "İemæ", "İæmä", "İæma", "İæme"]
        );
    }

    #[test]
    fn test_expanding_fold_with_multi_character_source() {
        let g = VariantGenerator::new(vec![rule("sh", &["š"])]);
        let variants = g.generate("İsh", 10);
        assert_eq!(variants, vec!["İš"]);
    }
}
