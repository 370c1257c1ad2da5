//! The stored entity, the caller-facing request payload, and the first-run seed set.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a record. Always positive; `0` is never issued.
pub type RecordId = u64;

/// A single stored article.
///
/// Serializes with the canonical on-disk field names `id`, `title`, `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Immutable once assigned.
    pub id: RecordId,
    /// Headline text.
    pub title: String,
    /// Article text. Named `text` on disk.
    #[serde(rename = "text")]
    pub body: String,
}

impl Record {
    /// Build a record from its parts. No validation happens here; use
    /// [`RecordRequest::validate`] for caller-supplied input.
    pub fn new(id: RecordId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Write payload as it arrives from the routing layer. Either field may be
/// missing; [`validate`](Self::validate) decides whether the request is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    /// Requested title.
    #[serde(default)]
    pub title: Option<String>,
    /// Requested body, named `text` on the wire.
    #[serde(default, rename = "text", alias = "body")]
    pub text: Option<String>,
}

impl RecordRequest {
    /// Shorthand for a request with both fields present.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            text: Some(text.into()),
        }
    }

    /// Returns `(title, body)` when both are present and non-blank. The
    /// returned strings are the caller's originals, untrimmed.
    pub fn validate(self) -> Result<(String, String)> {
        match (self.title, self.text) {
            (Some(title), Some(text)) => {
                check_fields(&title, &text)?;
                Ok((title, text))
            }
            _ => Err(Error::InvalidInput("title and text are required".into())),
        }
    }
}

pub(crate) fn check_fields(title: &str, body: &str) -> Result<()> {
    if title.trim().is_empty() || body.trim().is_empty() {
        return Err(Error::InvalidInput("title and text are required".into()));
    }
    Ok(())
}

/// The five articles a store starts with when no usable backing file exists.
/// Ids are 1 through 5.
pub fn default_records() -> Vec<Record> {
    vec![
        Record::new(
            1,
            "Getting Started with ASP.NET Core",
            "ASP.NET Core is a cross-platform, high-performance, open-source framework for \
             building modern, cloud-based, internet-connected applications. This article covers \
             the basics of getting started with ASP.NET Core and building your first web API.",
        ),
        Record::new(
            2,
            "Understanding RESTful APIs",
            "REST (Representational State Transfer) is an architectural style for designing \
             networked applications. RESTful APIs use HTTP methods like GET, POST, PUT, and DELETE \
             to perform operations on resources. This article explains the core concepts and \
             best practices.",
        ),
        Record::new(
            3,
            "Introduction to Angular Framework",
            "Angular is a platform and framework for building single-page client applications \
             using HTML and TypeScript. Angular is written in TypeScript and implements core and \
             optional functionality as a set of TypeScript libraries that you import into your \
             applications.",
        ),
        Record::new(
            4,
            "Best Practices for Web Development",
            "Modern web development requires following best practices to ensure code quality, \
             maintainability, and performance. This includes proper error handling, code \
             organization, security considerations, and testing strategies.",
        ),
        Record::new(
            5,
            "Building Full-Stack Applications",
            "Full-stack development involves working with both frontend and backend \
             technologies. This article explores how to integrate Angular frontend applications \
             with ASP.NET Core Web API backends, including CORS configuration and API \
             communication patterns.",
        ),
    ]
}
