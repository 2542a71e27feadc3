//! Extraction boundary: untrusted LLM output and the strict candidate shape.
//!
//! [`ExtractedPainPoint`] mirrors whatever JSON the model produced, with every
//! field optional. [`Candidate::from_extracted`] is the only way that data
//! reaches the merge/insert path, and it is where enum values are validated
//! and defaults filled in.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::types::pain_point::{Category, Level, Quote};

/// Title used when the extractor gave none.
pub const UNTITLED: &str = "Untitled Pain Point";

// ============================================================================
// Untrusted shape
// ============================================================================

/// A pain point as returned by an extractor, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedPainPoint {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "subCategory")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default, alias = "marketSize")]
    pub market_size: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quotes: Vec<ExtractedQuote>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, alias = "llmConfidenceScore", alias = "llm_confidence_score")]
    pub confidence: Option<f64>,
}

/// Quotes arrive either as bare strings or as objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedQuote {
    Text(String),
    Full {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        source: Option<String>,
    },
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Strict shape
// ============================================================================

/// Validated input to the merge/insert orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub summary: String,
    pub description: String,
    /// `None` when the extractor gave no category at all.
    pub category: Option<Category>,
    pub sub_category: Option<String>,
    pub intensity: Level,
    pub urgency: Level,
    pub market_size: Option<Level>,
    pub quotes: Vec<Quote>,
    pub keywords: IndexSet<String>,
    pub tags: IndexSet<String>,
    /// Extractor confidence in [0, 1].
    pub llm_confidence_score: f64,
}

impl Candidate {
    /// A candidate with the given title and every other field defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            description: String::new(),
            category: None,
            sub_category: None,
            intensity: Level::Medium,
            urgency: Level::Medium,
            market_size: None,
            quotes: Vec::new(),
            keywords: IndexSet::new(),
            tags: IndexSet::new(),
            llm_confidence_score: 0.0,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_intensity(mut self, intensity: Level) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_urgency(mut self, urgency: Level) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_market_size(mut self, market_size: Level) -> Self {
        self.market_size = Some(market_size);
        self
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.push(quote);
        self
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.llm_confidence_score = clamp_confidence(Some(confidence));
        self
    }

    /// Validate and default-fill raw extractor output.
    ///
    /// Invalid or missing intensity/urgency fall back to `Medium`, unknown
    /// categories map to `Other`, keywords are lower-cased and deduplicated.
    pub fn from_extracted(raw: ExtractedPainPoint) -> Self {
        let intensity = parse_level_or_medium("intensity", raw.intensity.as_deref());
        let urgency = parse_level_or_medium("urgency", raw.urgency.as_deref());
        let market_size = raw
            .market_size
            .as_deref()
            .and_then(|s| s.parse::<Level>().ok());

        let category = non_blank(raw.category).map(|c| {
            c.parse::<Category>().unwrap_or_else(|_| {
                debug!(category = %c, "Unknown category, using Other");
                Category::Other
            })
        });

        let quotes = raw
            .quotes
            .into_iter()
            .filter_map(|q| match q {
                ExtractedQuote::Text(text) => non_blank(Some(text)).map(Quote::new),
                ExtractedQuote::Full {
                    text,
                    author,
                    source,
                } => non_blank(text).map(|text| Quote {
                    text,
                    author: non_blank(author),
                    source: non_blank(source),
                }),
            })
            .collect();

        Self {
            title: non_blank(raw.title).unwrap_or_else(|| UNTITLED.to_string()),
            summary: raw.summary.unwrap_or_default().trim().to_string(),
            description: raw.description.unwrap_or_default().trim().to_string(),
            category,
            sub_category: non_blank(raw.sub_category),
            intensity,
            urgency,
            market_size,
            quotes,
            keywords: normalize_terms(raw.keywords),
            tags: normalize_terms(raw.tags),
            llm_confidence_score: clamp_confidence(raw.confidence),
        }
    }

    /// Apply the orchestrator's field defaults to a hand-built candidate.
    pub fn normalized(mut self) -> Self {
        self.title = non_blank(Some(self.title)).unwrap_or_else(|| UNTITLED.to_string());
        self.llm_confidence_score = clamp_confidence(Some(self.llm_confidence_score));
        self
    }
}

impl From<ExtractedPainPoint> for Candidate {
    fn from(raw: ExtractedPainPoint) -> Self {
        Self::from_extracted(raw)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_level_or_medium(field: &'static str, value: Option<&str>) -> Level {
    match value.map(str::parse::<Level>) {
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            debug!(field, error = %e, "Invalid level, using Medium");
            Level::Medium
        }
        None => Level::Medium,
    }
}

fn normalize_terms(terms: Vec<String>) -> IndexSet<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn clamp_confidence(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_defaults() {
        let candidate = Candidate::from_extracted(ExtractedPainPoint::default());

        assert_eq!(candidate.title, UNTITLED);
        assert_eq!(candidate.intensity, Level::Medium);
        assert_eq!(candidate.urgency, Level::Medium);
        assert!(candidate.category.is_none());
        assert!(candidate.quotes.is_empty());
        assert!(candidate.keywords.is_empty());
        assert_eq!(candidate.llm_confidence_score, 0.0);
    }

    #[test]
    fn invalid_levels_fall_back_to_medium() {
        let raw: ExtractedPainPoint = serde_json::from_value(serde_json::json!({
            "title": "Rent keeps going up",
            "intensity": "EXTREME",
            "urgency": "high",
        }))
        .unwrap();

        let candidate = Candidate::from_extracted(raw);
        assert_eq!(candidate.intensity, Level::Medium);
        assert_eq!(candidate.urgency, Level::High);
    }

    #[test]
    fn unknown_category_becomes_other() {
        let raw = ExtractedPainPoint {
            category: Some("Pets".into()),
            ..Default::default()
        };
        assert_eq!(Candidate::from_extracted(raw).category, Some(Category::Other));
    }

    #[test]
    fn accepts_camel_case_and_nulls() {
        let raw: ExtractedPainPoint = serde_json::from_value(serde_json::json!({
            "title": "  Meal planning takes forever ",
            "subCategory": "cooking",
            "llmConfidenceScore": 1.7,
            "keywords": null,
            "quotes": [
                "I spend Sundays planning",
                {"text": "  ", "author": "ghost"},
                {"text": "every week the same fight", "author": "u/chef", "source": "reddit"}
            ]
        }))
        .unwrap();

        let candidate = Candidate::from_extracted(raw);
        assert_eq!(candidate.title, "Meal planning takes forever");
        assert_eq!(candidate.sub_category.as_deref(), Some("cooking"));
        assert_eq!(candidate.llm_confidence_score, 1.0);
        assert!(candidate.keywords.is_empty());
        assert_eq!(candidate.quotes.len(), 2);
        assert_eq!(candidate.quotes[1].author.as_deref(), Some("u/chef"));
    }

    #[test]
    fn keywords_are_lowercased_and_deduplicated() {
        let raw = ExtractedPainPoint {
            keywords: vec!["Budget".into(), "budget ".into(), "".into(), "Apps".into()],
            ..Default::default()
        };
        let candidate = Candidate::from_extracted(raw);
        assert_eq!(
            candidate.keywords.into_iter().collect::<Vec<_>>(),
            ["budget", "apps"]
        );
    }

    #[test]
    fn nan_confidence_is_zero() {
        assert_eq!(Candidate::new("x").with_confidence(f64::NAN).llm_confidence_score, 0.0);
    }

    #[test]
    fn normalized_fills_blank_title() {
        assert_eq!(Candidate::new("   ").normalized().title, UNTITLED);
    }
}
