//! Candidate query value types.

use serde::{Deserialize, Serialize};

/// How a candidate query string was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The query exactly as the user typed it.
    Original,
    /// An accepted form of an irregular word.
    SpecialCase,
    /// A script conversion of the query.
    Transliterated,
    /// A single-edit typo variant of some other candidate.
    TypoVariant,
}

impl Origin {
    /// Ranking priority: SpecialCase > Original > Transliterated >
    /// TypoVariant. Used for dedup resolution and final ordering.
    pub fn priority(self) -> u8 {
        match self {
            Origin::SpecialCase => 3,
            Origin::Original => 2,
            Origin::Transliterated => 1,
            Origin::TypoVariant => 0,
        }
    }
}

/// One expanded query string, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub origin: Origin,
}

impl Candidate {
    pub fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn priority(&self) -> u8 {
        self.origin.priority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Origin::SpecialCase.priority() > Origin::Original.priority());
        assert!(Origin::Original.priority() > Origin::Transliterated.priority());
        assert!(Origin::Transliterated.priority() > Origin::TypoVariant.priority());
    }

    #[test]
    fn test_serialized_names() {
        let candidate = Candidate::new("тæрхъус", Origin::SpecialCase);
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["origin"], "special_case");
        assert_eq!(json["text"], "тæрхъус");
    }
}
