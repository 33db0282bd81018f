//! Gazetteer and cue-phrase entity recognition
//!
//! Organizations come from a list of fashion houses and retailers. People come
//! from a list of designers plus cue phrases such as "designer Jane Doe" or
//! "creative director Jane Doe". Longer names win over shorter ones starting
//! at the same position, so "Alexander McQueen" is one organization rather
//! than a match on a shorter alias.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use super::{EntityLabel, RecognizedEntity};

/// Known fashion houses and retailers
const BRANDS: &[&str] = &[
    "Alexander McQueen",
    "Adidas",
    "Balenciaga",
    "Balmain",
    "Bottega Veneta",
    "Burberry",
    "Celine",
    "Chanel",
    "Chloé",
    "Coach",
    "Dior",
    "Dolce & Gabbana",
    "Fendi",
    "Givenchy",
    "Gucci",
    "H&M",
    "Hermès",
    "Jacquemus",
    "Loewe",
    "Louis Vuitton",
    "Marni",
    "Miu Miu",
    "Moschino",
    "Nike",
    "Off-White",
    "Prada",
    "Ralph Lauren",
    "Saint Laurent",
    "Schiaparelli",
    "Stella McCartney",
    "Tom Ford",
    "Uniqlo",
    "Valentino",
    "Versace",
    "Zara",
];

/// Known designers
const DESIGNERS: &[&str] = &[
    "Alessandro Michele",
    "Anthony Vaccarello",
    "Daniel Lee",
    "Demna",
    "Donatella Versace",
    "Hedi Slimane",
    "Jonathan Anderson",
    "Kim Jones",
    "Maria Grazia Chiuri",
    "Matthieu Blazy",
    "Miuccia Prada",
    "Nicolas Ghesquière",
    "Pharrell Williams",
    "Pierpaolo Piccioli",
    "Raf Simons",
    "Rick Owens",
    "Sabato De Sarno",
    "Sarah Burton",
    "Simon Porte Jacquemus",
    "Virginie Viard",
];

lazy_static! {
    // "designer Jane Doe", "creative director Jane Doe", "by Jane Doe's"
    static ref PERSON_CUE: Regex = Regex::new(
        r"(?:[Dd]esigners?|[Cc]reative [Dd]irector|[Ff]ounder|[Cc]outurier|[Ss]tylist)\s+((?:\p{Lu}[\p{L}'-]+)(?:\s+\p{Lu}[\p{L}'-]+){1,2})"
    )
    .expect("Invalid person cue pattern");
}

/// Entity recognizer backed by name lists and cue phrases
#[derive(Debug, Clone)]
pub struct GazetteerRecognizer {
    names: Regex,
    organizations: HashSet<String>,
}

impl GazetteerRecognizer {
    /// Create a recognizer with the built-in name lists
    #[must_use]
    pub fn new() -> Self {
        Self::with_extra(&[], &[])
    }

    /// Create a recognizer extended with extra organization and person names
    #[must_use]
    pub fn with_extra(extra_brands: &[String], extra_designers: &[String]) -> Self {
        let brands: Vec<&str> = BRANDS
            .iter()
            .copied()
            .chain(extra_brands.iter().map(String::as_str))
            .collect();
        let designers: Vec<&str> = DESIGNERS
            .iter()
            .copied()
            .chain(extra_designers.iter().map(String::as_str))
            .collect();

        let organizations = brands.iter().map(|b| b.to_lowercase()).collect();

        let mut all: Vec<&str> = brands.iter().chain(designers.iter()).copied().collect();
        // Longest first so alternation prefers the full name
        all.sort_by_key(|name| std::cmp::Reverse(name.len()));
        all.dedup();

        let alternatives: Vec<String> = all
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| regex::escape(n.trim()))
            .collect();

        let source = format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}])({})(?:$|[^\p{{L}}\p{{N}}])", alternatives.join("|"));
        let names = Regex::new(&source).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid gazetteer pattern, falling back to built-in names");
            Regex::new(r"(?i)(?:^|[^\p{L}\p{N}])(gucci|prada|chanel|dior)(?:$|[^\p{L}\p{N}])")
                .expect("Invalid fallback gazetteer pattern")
        });

        Self {
            names,
            organizations,
        }
    }

    /// Recognize organization and person spans in `text`
    ///
    /// Every occurrence is returned in document order; cue-phrase persons
    /// follow gazetteer hits.
    #[must_use]
    pub fn recognize(&self, text: &str) -> Vec<RecognizedEntity> {
        let mut entities = Vec::new();
        let mut covered: Vec<(usize, usize)> = Vec::new();

        // Boundary characters are consumed by the pattern, so adjacent names
        // separated by a single character are found by restarting after the
        // captured group instead of after the whole match.
        let mut offset = 0;
        while offset < text.len() {
            let Some(caps) = self.names.captures_at(text, offset) else {
                break;
            };
            let Some(span) = caps.get(1) else {
                break;
            };

            let label = if self.organizations.contains(&span.as_str().to_lowercase()) {
                EntityLabel::Organization
            } else {
                EntityLabel::Person
            };
            entities.push(RecognizedEntity::new(span.as_str(), label));
            covered.push((span.start(), span.end()));
            offset = span.end();
        }

        for caps in PERSON_CUE.captures_iter(text) {
            if let Some(span) = caps.get(1) {
                let overlaps = covered
                    .iter()
                    .any(|&(start, end)| span.start() < end && start < span.end());
                if !overlaps {
                    entities.push(RecognizedEntity::person(span.as_str()));
                }
            }
        }

        entities
    }
}

impl Default for GazetteerRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
