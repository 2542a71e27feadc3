//! Source threads and the extractor input built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment under a source thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

/// A social-media post plus its comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Subreddit, Twitter handle, or other source label
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Thread {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            comments: Vec::new(),
            source: None,
            url: None,
            created_at: None,
        }
    }

    pub fn with_comment(mut self, author: impl Into<String>, text: impl Into<String>) -> Self {
        self.comments.push(Comment::new(author, text));
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the extractor input, keeping at most `max_comments` comments.
    pub fn extraction_input(&self, max_comments: usize) -> ExtractionInput {
        ExtractionInput {
            title: self.title.clone(),
            content: self.content.clone(),
            comments: self.comments.iter().take(max_comments).cloned().collect(),
        }
    }
}

/// What an extractor sees of a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionInput {
    pub title: String,
    pub content: String,
    pub comments: Vec<Comment>,
}
