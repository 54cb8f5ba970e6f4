mod normalize;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use yojana_core::{Locale, Scheme};

pub use normalize::{normalize, tokens};

/// Keyword retriever over a loaded scheme catalog. Haystacks are
/// precomputed once per session; the catalog is read-only after load.
#[derive(Debug, Clone)]
pub struct SchemeRetriever {
    schemes: Vec<Scheme>,
    haystacks: Vec<Haystack>,
}

#[derive(Debug, Clone)]
struct Haystack {
    text: String,
    tokens: Vec<String>,
}

impl SchemeRetriever {
    pub fn from_schemes(schemes: Vec<Scheme>) -> Self {
        let haystacks = schemes
            .iter()
            .map(|scheme| {
                let combined = format!("{} {}", scheme.name, scheme.description);
                Haystack {
                    text: normalize(&combined),
                    tokens: tokens(&combined),
                }
            })
            .collect();

        Self { schemes, haystacks }
    }

    pub fn from_catalog_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_schemes(load_catalog(path)?))
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    /// Match keywords against the catalog: direct substring containment in
    /// the normalized `"<name> <description>"` haystack first, token overlap
    /// (either direction) second. Ordering is first-matched-first; a scheme
    /// appears at most once; an empty keyword list yields an empty result.
    ///
    /// Deliberately permissive substring matching, not stemmed NLP — short
    /// keywords inside unrelated longer words are an accepted false positive.
    pub fn find(&self, keywords: &[String]) -> Vec<Scheme> {
        let mut matched = Vec::new();
        let mut seen = HashSet::new();

        for keyword in keywords {
            let needle = normalize(keyword);
            let needle_tokens = tokens(keyword);

            for (index, haystack) in self.haystacks.iter().enumerate() {
                if seen.contains(&index) {
                    continue;
                }

                let direct = !needle.is_empty() && haystack.text.contains(&needle);
                if direct || token_overlap(&needle_tokens, &haystack.tokens) {
                    seen.insert(index);
                    matched.push(self.schemes[index].clone());
                }
            }
        }

        matched
    }
}

fn token_overlap(needle_tokens: &[String], haystack_tokens: &[String]) -> bool {
    needle_tokens.iter().any(|needle| {
        haystack_tokens
            .iter()
            .any(|hay| hay.contains(needle.as_str()) || needle.contains(hay.as_str()))
    })
}

/// Load the scheme catalog for one session. A missing or malformed catalog
/// is a hard failure at session start, never a per-turn condition.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Scheme>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("schemes catalog not found at {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("invalid schemes catalog at {}", path.display()))
}

pub fn catalog_path_for_locale(dir: impl AsRef<Path>, locale: Locale) -> PathBuf {
    let code = match locale {
        Locale::Te => "te",
        Locale::Mr | Locale::Unknown => "mr",
    };
    dir.as_ref().join(format!("schemes_{code}.json"))
}
