//! Valence-lexicon sentiment scoring
//!
//! Each known word carries a valence in [-4.0, 4.0]. Intensifiers ("very",
//! "slightly") shift the following word's valence, a negation within the
//! three preceding words flips and dampens it, and exclamation marks add
//! emphasis. The summed valence is normalised into [-1.0, 1.0] with
//! `x / sqrt(x^2 + ALPHA)`.

use super::SentimentScores;

/// Normalisation constant for the compound score
const ALPHA: f64 = 15.0;

/// Valence shift applied by an intensifier or dampener
const BOOST: f64 = 0.293;

/// Multiplier applied to a negated word
const NEGATION_SCALAR: f64 = -0.74;

/// Emphasis added per exclamation mark, capped at four marks
const EXCLAMATION_BOOST: f64 = 0.292;

/// Word valences tuned for fashion and culture writing
const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("acclaimed", 2.2),
    ("adore", 2.9),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("bold", 1.4),
    ("brilliant", 2.8),
    ("celebrated", 2.2),
    ("charming", 2.3),
    ("chic", 2.0),
    ("classic", 1.2),
    ("confident", 1.9),
    ("delight", 2.9),
    ("elegant", 2.1),
    ("exciting", 2.2),
    ("excellent", 2.7),
    ("exquisite", 2.6),
    ("fabulous", 2.4),
    ("fantastic", 2.6),
    ("fresh", 1.3),
    ("glamorous", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("iconic", 2.0),
    ("impressive", 2.3),
    ("innovative", 1.9),
    ("inspired", 2.0),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("modern", 0.9),
    ("perfect", 2.7),
    ("playful", 1.9),
    ("polished", 1.5),
    ("popular", 1.8),
    ("refined", 1.6),
    ("romantic", 2.1),
    ("stunning", 2.9),
    ("stylish", 2.1),
    ("success", 2.7),
    ("successful", 2.8),
    ("timeless", 1.8),
    ("triumph", 2.6),
    ("win", 2.8),
    ("wonderful", 2.7),
    // Negative
    ("awful", -2.0),
    ("bad", -2.5),
    ("bland", -1.2),
    ("boring", -1.3),
    ("controversy", -1.6),
    ("controversial", -0.8),
    ("criticism", -1.9),
    ("criticized", -1.8),
    ("dated", -1.0),
    ("disappointing", -2.2),
    ("dull", -1.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("flop", -1.4),
    ("hate", -2.7),
    ("messy", -1.5),
    ("mistake", -1.7),
    ("problem", -1.7),
    ("sad", -2.1),
    ("scandal", -2.4),
    ("tacky", -1.8),
    ("terrible", -2.5),
    ("tired", -1.9),
    ("ugly", -3.1),
    ("uninspired", -1.9),
    ("waste", -1.8),
    ("worst", -3.1),
];

/// Words that increase the intensity of the next word
const BOOSTERS: &[&str] = &[
    "absolutely",
    "extremely",
    "incredibly",
    "really",
    "so",
    "totally",
    "truly",
    "very",
];

/// Words that decrease the intensity of the next word
const DAMPENERS: &[&str] = &["barely", "hardly", "slightly", "somewhat", "marginally"];

/// Negation words
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "isn't", "wasn't", "aren't", "don't",
    "doesn't", "didn't", "can't", "won't",
];

/// Lexicon-based sentiment scorer
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    /// Create a new scorer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn valence(word: &str) -> Option<f64> {
        LEXICON
            .iter()
            .find(|(lex_word, _)| *lex_word == word)
            .map(|(_, valence)| *valence)
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .trim_matches('\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// Score `text`; empty or unknown text scores 0.0
    #[must_use]
    pub fn score(&self, text: &str) -> SentimentScores {
        let tokens = Self::tokenize(text);
        let mut valences = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = Self::valence(token) else {
                valences.push(0.0);
                continue;
            };

            if i > 0 {
                let previous = tokens[i - 1].as_str();
                if BOOSTERS.contains(&previous) {
                    valence += BOOST * valence.signum();
                } else if DAMPENERS.contains(&previous) {
                    valence -= BOOST * valence.signum();
                }
            }

            let window = &tokens[i.saturating_sub(3)..i];
            if window.iter().any(|w| NEGATIONS.contains(&w.as_str())) {
                valence *= NEGATION_SCALAR;
            }

            valences.push(valence);
        }

        let mut sum: f64 = valences.iter().sum();
        if sum != 0.0 {
            let marks = text.matches('!').count().min(4) as f64;
            sum += marks * EXCLAMATION_BOOST * sum.signum();
        }

        let compound = (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0);

        let positive: f64 = valences.iter().filter(|v| **v > 0.0).sum();
        let negative: f64 = valences.iter().filter(|v| **v < 0.0).map(|v| v.abs()).sum();
        let neutral = valences.iter().filter(|v| **v == 0.0).count() as f64;
        let total = positive + negative + neutral;

        if total == 0.0 {
            return SentimentScores::from_compound(compound);
        }

        SentimentScores {
            compound,
            positive: positive / total,
            negative: negative / total,
            neutral: neutral / total,
        }
    }
}
