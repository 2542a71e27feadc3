//! The pain-point record and its enumerations.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::scoring::rank::{calculate_batch_rank_score, calculate_rank_score};
use crate::types::candidate::Candidate;
use crate::types::thread::Thread;

// ============================================================================
// Identity
// ============================================================================

/// Opaque, immutable pain-point identity.
///
/// Backed by a UUID v7 so ids sort in creation order in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PainPointId(Uuid);

impl PainPointId {
    /// Creates a new time-ordered id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an id loaded from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner `Uuid`.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for PainPointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PainPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PainPointId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Returned when a stored or submitted string is not a known variant.
#[derive(Debug, Clone, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Life area a pain point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Health,
    Wealth,
    Relationships,
    Technology,
    Education,
    Entertainment,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Health,
        Category::Wealth,
        Category::Relationships,
        Category::Technology,
        Category::Education,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Wealth => "Wealth",
            Category::Relationships => "Relationships",
            Category::Technology => "Technology",
            Category::Education => "Education",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Three-step scale used for intensity, urgency, and market size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Medium
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(ParseEnumError {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

/// Review lifecycle of a pain point.
///
/// The extraction pipeline creates records as `Processed`; `Validated` and
/// `Rejected` are set by administrative flows outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainPointStatus {
    Pending,
    Processed,
    Validated,
    Rejected,
}

impl fmt::Display for PainPointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PainPointStatus::Pending => write!(f, "pending"),
            PainPointStatus::Processed => write!(f, "processed"),
            PainPointStatus::Validated => write!(f, "validated"),
            PainPointStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for PainPointStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PainPointStatus::Pending),
            "processed" => Ok(PainPointStatus::Processed),
            "validated" => Ok(PainPointStatus::Validated),
            "rejected" => Ok(PainPointStatus::Rejected),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// A verbatim quote supporting a pain point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl Quote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: None,
            source: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A recurring user-expressed problem extracted from social-media threads.
///
/// `rank_score` is derived: it is only written by [`PainPoint::refresh_rank_score`]
/// and [`PainPoint::apply_batch_rank_score`], in the same operation that
/// changes any of its inputs. Deserialized records ignore any incoming
/// `rankScore` and are rescored with the ingestion formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PainPointFields")]
pub struct PainPoint {
    pub id: PainPointId,
    pub thread_id: String,

    // Content
    pub title: String,
    pub summary: String,
    pub description: String,
    pub category: Category,
    pub sub_category: Option<String>,

    // Signals
    pub intensity: Level,
    pub urgency: Level,
    pub market_size: Option<Level>,
    pub frequency: u32,
    pub quotes: Vec<Quote>,
    pub keywords: IndexSet<String>,
    pub tags: IndexSet<String>,
    pub llm_confidence_score: f64,
    pub(crate) rank_score: u8,

    // Validation overlay
    pub is_validated: Option<bool>,
    pub validation_score: Option<f64>,
    pub status: PainPointStatus,

    // Thread context
    pub source: Option<String>,
    pub url: Option<String>,
    pub post_date: Option<DateTime<Utc>>,

    pub extracted_at: DateTime<Utc>,
    pub extracted_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything in a serialized [`PainPoint`] except the derived score.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PainPointFields {
    id: PainPointId,
    thread_id: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    category: Category,
    #[serde(default)]
    sub_category: Option<String>,
    intensity: Level,
    urgency: Level,
    #[serde(default)]
    market_size: Option<Level>,
    frequency: u32,
    #[serde(default)]
    quotes: Vec<Quote>,
    #[serde(default)]
    keywords: IndexSet<String>,
    #[serde(default)]
    tags: IndexSet<String>,
    llm_confidence_score: f64,
    #[serde(default)]
    is_validated: Option<bool>,
    #[serde(default)]
    validation_score: Option<f64>,
    status: PainPointStatus,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    post_date: Option<DateTime<Utc>>,
    extracted_at: DateTime<Utc>,
    extracted_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PainPointFields> for PainPoint {
    fn from(fields: PainPointFields) -> Self {
        let mut pain_point = Self {
            id: fields.id,
            thread_id: fields.thread_id,
            title: fields.title,
            summary: fields.summary,
            description: fields.description,
            category: fields.category,
            sub_category: fields.sub_category,
            intensity: fields.intensity,
            urgency: fields.urgency,
            market_size: fields.market_size,
            frequency: fields.frequency,
            quotes: fields.quotes,
            keywords: fields.keywords,
            tags: fields.tags,
            llm_confidence_score: fields.llm_confidence_score,
            rank_score: 0,
            is_validated: fields.is_validated,
            validation_score: fields.validation_score,
            status: fields.status,
            source: fields.source,
            url: fields.url,
            post_date: fields.post_date,
            extracted_at: fields.extracted_at,
            extracted_by: fields.extracted_by,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
        };
        pain_point.refresh_rank_score();
        pain_point
    }
}

impl PainPoint {
    /// Build a new record from a normalized candidate and its source thread.
    ///
    /// The rank score is computed before returning.
    pub fn from_candidate(candidate: Candidate, thread: &Thread, extracted_by: &str) -> Self {
        let now = Utc::now();
        let mut pain_point = Self {
            id: PainPointId::new(),
            thread_id: thread.id.clone(),
            title: candidate.title,
            summary: candidate.summary,
            description: candidate.description,
            category: candidate.category.unwrap_or(Category::Other),
            sub_category: candidate.sub_category,
            intensity: candidate.intensity,
            urgency: candidate.urgency,
            market_size: candidate.market_size,
            frequency: 1,
            quotes: candidate.quotes,
            keywords: candidate.keywords,
            tags: candidate.tags,
            llm_confidence_score: candidate.llm_confidence_score,
            rank_score: 0,
            is_validated: None,
            validation_score: None,
            status: PainPointStatus::Processed,
            source: thread.source.clone(),
            url: thread.url.clone(),
            post_date: thread.created_at,
            extracted_at: now,
            extracted_by: extracted_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        pain_point.refresh_rank_score();
        pain_point
    }

    /// Current rank score in [0, 100].
    pub fn rank_score(&self) -> u8 {
        self.rank_score
    }

    /// Fold a duplicate observation into this record.
    ///
    /// Frequency goes up by exactly one, quotes are appended as-is, keywords
    /// and tags become the union of old and new. Title, category, and the
    /// first-seen confidence are kept.
    pub fn absorb(&mut self, candidate: Candidate) {
        self.frequency = self.frequency.saturating_add(1);
        self.quotes.extend(candidate.quotes);
        self.keywords.extend(candidate.keywords);
        self.tags.extend(candidate.tags);
        self.updated_at = Utc::now();
        self.refresh_rank_score();
    }

    /// Recompute the ingestion rank score.
    pub fn refresh_rank_score(&mut self) {
        self.rank_score = calculate_rank_score(self);
    }

    /// Recompute with the batch reranking formula.
    ///
    /// Returns `true` when the stored score changed.
    pub fn apply_batch_rank_score(&mut self) -> bool {
        let score = calculate_batch_rank_score(self);
        if score == self.rank_score {
            return false;
        }
        self.rank_score = score;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> Thread {
        Thread::new("t3_budget", "Budgeting apps all suck", "I have tried five of them")
            .with_source("personalfinance")
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("wealth".parse::<Category>().unwrap(), Category::Wealth);
        assert_eq!(" TECHNOLOGY ".parse::<Category>().unwrap(), Category::Technology);
        assert!("finance".parse::<Category>().is_err());
    }

    #[test]
    fn level_round_trips_through_display() {
        for level in [Level::Low, Level::Medium, Level::High] {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert!("urgent".parse::<Level>().is_err());
    }

    #[test]
    fn new_record_takes_thread_context_and_scores() {
        let candidate = Candidate::new("I can't find a good expense tracker")
            .with_category(Category::Wealth)
            .with_intensity(Level::High)
            .with_urgency(Level::Medium)
            .with_confidence(0.8);

        let pain_point = PainPoint::from_candidate(candidate, &thread(), "test");

        assert_eq!(pain_point.thread_id, "t3_budget");
        assert_eq!(pain_point.source.as_deref(), Some("personalfinance"));
        assert_eq!(pain_point.frequency, 1);
        assert_eq!(pain_point.status, PainPointStatus::Processed);
        assert_eq!(pain_point.rank_score(), 63);
    }

    #[test]
    fn absorb_increments_once_and_rescores() {
        let mut pain_point = PainPoint::from_candidate(
            Candidate::new("expense tracker")
                .with_keywords(["budget", "expenses"])
                .with_quote(Quote::new("nothing syncs")),
            &thread(),
            "test",
        );
        let first_score = pain_point.rank_score();

        pain_point.absorb(
            Candidate::new("expense tracker app")
                .with_keywords(["expenses", "apps"])
                .with_quote(Quote::new("nothing syncs")),
        );

        assert_eq!(pain_point.frequency, 2);
        assert_eq!(pain_point.quotes.len(), 2);
        assert_eq!(
            pain_point.keywords.iter().collect::<Vec<_>>(),
            ["budget", "expenses", "apps"]
        );
        assert_eq!(pain_point.title, "expense tracker");
        assert_eq!(pain_point.rank_score(), first_score + 10);
    }

    #[test]
    fn absorb_keeps_first_confidence() {
        let mut pain_point = PainPoint::from_candidate(
            Candidate::new("slow checkout").with_confidence(0.4),
            &thread(),
            "test",
        );
        pain_point.absorb(Candidate::new("slow checkout").with_confidence(0.95));
        assert_eq!(pain_point.llm_confidence_score, 0.4);
    }

    #[test]
    fn serializes_camel_case() {
        let pain_point = PainPoint::from_candidate(Candidate::new("x"), &thread(), "test");
        let json = serde_json::to_value(&pain_point).unwrap();
        assert!(json.get("rankScore").is_some());
        assert!(json.get("llmConfidenceScore").is_some());
        assert_eq!(json["status"], "processed");
        assert_eq!(json["intensity"], "Medium");
    }

    #[test]
    fn deserializing_ignores_incoming_rank_score() {
        let pain_point = PainPoint::from_candidate(
            Candidate::new("rent is too high").with_urgency(Level::High),
            &thread(),
            "test",
        );
        let mut json = serde_json::to_value(&pain_point).unwrap();
        json["rankScore"] = serde_json::json!(99);

        let restored: PainPoint = serde_json::from_value(json).unwrap();

        assert_eq!(restored.rank_score(), calculate_rank_score(&restored));
        assert_eq!(restored.rank_score(), pain_point.rank_score());
        assert_eq!(restored, pain_point);
    }

    #[test]
    fn deserializing_rescores_edited_signals() {
        let pain_point = PainPoint::from_candidate(Candidate::new("x"), &thread(), "test");
        let mut json = serde_json::to_value(&pain_point).unwrap();
        json["frequency"] = serde_json::json!(4);

        let restored: PainPoint = serde_json::from_value(json).unwrap();

        assert_eq!(restored.rank_score(), pain_point.rank_score() + 30);
    }
}
