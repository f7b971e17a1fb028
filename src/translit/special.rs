//! Irregular-word resolution.
//!
//! Some lexemes have accepted spellings that no mechanical mapping can
//! reach (scholarly transcriptions differ from the mapped forms, or a
//! word has several attested Latin spellings). These are kept in an
//! exact-match table keyed by every accepted form of either script;
//! a hit returns the union of all forms minus the query itself.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LexiconError, Result};

/// One irregular word with its accepted forms per script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialCase {
    pub canonical: String,
    #[serde(default)]
    pub latin: Vec<String>,
    #[serde(default)]
    pub cyrillic: Vec<String>,
}

impl SpecialCase {
    /// All accepted forms in declaration order, canonical first,
    /// without duplicates.
    fn forms(&self) -> Vec<&str> {
        let mut forms: Vec<&str> = Vec::with_capacity(1 + self.latin.len() + self.cyrillic.len());
        for form in std::iter::once(self.canonical.as_str())
            .chain(self.latin.iter().map(String::as_str))
            .chain(self.cyrillic.iter().map(String::as_str))
        {
            if !forms.contains(&form) {
                forms.push(form);
            }
        }
        forms
    }
}

/// Exact-match lookup over every accepted form of every special case.
#[derive(Debug, Clone, Default)]
pub struct SpecialCaseResolver {
    cases: Vec<SpecialCase>,
    // normalized form -> index into `cases`
    by_form: HashMap<String, usize>,
}

/// Lookup normalization: trim and case-fold, diacritics preserved.
fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

impl SpecialCaseResolver {
    /// Build the resolver, rejecting a form registered under two
    /// different cases.
    pub fn new(cases: Vec<SpecialCase>) -> Result<Self> {
        let mut by_form: HashMap<String, usize> = HashMap::new();
        for (idx, case) in cases.iter().enumerate() {
            for form in case.forms() {
                let key = normalize(form);
                if key.is_empty() {
                    return Err(LexiconError::InvalidConfig(format!(
                        "special case {:?} has an empty accepted form",
                        case.canonical
                    )));
                }
                if let Some(&existing) = by_form.get(&key)
                    && existing != idx
                {
                    return Err(LexiconError::InvalidConfig(format!(
                        "special case form {form:?} is claimed by both {:?} and {:?}",
                        cases[existing].canonical, case.canonical
                    )));
                }
                by_form.insert(key, idx);
            }
        }
        Ok(Self { cases, by_form })
    }

    /// Accepted variant forms for `text`, excluding `text` itself.
    /// Empty when the word is regular.
    pub fn resolve(&self, text: &str) -> Vec<String> {
        let key = normalize(text);
        let Some(&idx) = self.by_form.get(&key) else {
            return Vec::new();
        };

        self.cases[idx]
            .forms()
            .into_iter()
            .filter(|form| normalize(form) != key)
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
