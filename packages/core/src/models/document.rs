//! Document Data Structures
//!
//! This module defines the `Document` struct and the request/patch types used
//! to create and edit documents.
//!
//! # Tree Fields
//!
//! Only `parent_id` and `position` take part in the tree invariants. Every
//! other field (title, slug, rich-text content, flags, timestamps) is payload
//! that the tree engine carries through untouched.
//!
//! # Examples
//!
//! ```rust
//! use teamspace_core::models::Document;
//!
//! let root = Document::new("org-1", "project-1", "Meeting notes", "meeting-notes", "user-1");
//! assert!(root.is_root());
//! assert_eq!(root.position, 0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for Document operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Invalid document kind: {0}")]
    InvalidKind(String),
}

/// What a document is used for.
///
/// Purely descriptive; the kind never affects tree placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Document,
    Note,
    Agenda,
    Minutes,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Document => "document",
            DocumentKind::Note => "note",
            DocumentKind::Agenda => "agenda",
            DocumentKind::Minutes => "minutes",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(DocumentKind::Document),
            "note" => Ok(DocumentKind::Note),
            "agenda" => Ok(DocumentKind::Agenda),
            "minutes" => Ok(DocumentKind::Minutes),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}

/// A node in a project's document forest.
///
/// # Fields
///
/// - `id`: Opaque unique identifier, never changes
/// - `project_id`: Owning project, never changes
/// - `parent_id`: Parent document in the same project (`None` = root level)
/// - `position`: Dense 0-based order among documents sharing `parent_id`
/// - `content`: Rich-text body, stored as opaque JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,

    pub organization_id: String,

    pub project_id: String,

    /// Parent document ID (`None` means the document sits at root level)
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Sibling order within the parent's group
    #[serde(default, deserialize_with = "deserialize_position")]
    pub position: u32,

    pub title: String,

    #[serde(default)]
    pub slug: String,

    /// Rich-text body (editor JSON), opaque to this crate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,

    #[serde(default, rename = "type")]
    pub kind: DocumentKind,

    #[serde(default)]
    pub is_public: bool,

    #[serde(default)]
    pub is_archived: bool,

    pub created_by: String,

    #[serde(default)]
    pub last_edited_by: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub last_edited_at: Option<DateTime<Utc>>,
}

/// Positions are stored as nullable integers upstream; a missing or null
/// value reads as 0.
fn deserialize_position<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

impl Document {
    /// Create a new root-level document at position 0 with a generated ID.
    ///
    /// Callers placing the document into an existing project should set
    /// `position` from [`crate::tree::next_root_position`].
    pub fn new(
        organization_id: impl Into<String>,
        project_id: impl Into<String>,
        title: impl Into<String>,
        slug: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self::new_with_id(
            format!("doc_{}", Uuid::new_v4().simple()),
            organization_id,
            project_id,
            title,
            slug,
            created_by,
        )
    }

    /// Create a new root-level document with an explicit ID
    pub fn new_with_id(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        project_id: impl Into<String>,
        title: impl Into<String>,
        slug: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            project_id: project_id.into(),
            parent_id: None,
            position: 0,
            title: title.into(),
            slug: slug.into(),
            content: None,
            kind: DocumentKind::default(),
            is_public: false,
            is_archived: false,
            created_by: created_by.into(),
            last_edited_by: None,
            created_at: now,
            updated_at: now,
            last_edited_at: None,
        }
    }

    /// Builder-style parent/position setter, mostly useful for fixtures
    pub fn placed(mut self, parent_id: Option<&str>, position: u32) -> Self {
        self.parent_id = parent_id.map(str::to_string);
        self.position = position;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if self.project_id.is_empty() {
            return Err(ValidationError::MissingField("project_id".to_string()));
        }

        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }

        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(ValidationError::InvalidParent(
                "Document cannot be its own parent".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply a tree-neutral edit, stamping the edit metadata.
    pub fn apply_patch(&mut self, patch: &DocumentPatch, edited_by: Option<&str>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }

        if let Some(content) = &patch.content {
            self.content = content.clone();
        }

        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }

        if let Some(is_archived) = patch.is_archived {
            self.is_archived = is_archived;
        }

        let now = Utc::now();
        self.updated_at = now;
        self.last_edited_at = Some(now);
        if let Some(user) = edited_by {
            self.last_edited_by = Some(user.to_string());
        }
    }
}

/// Parameters for creating a document
///
/// The slug and position are never supplied by the caller: the slug is
/// derived from the title and made unique within the project, and the
/// document is always appended to the end of the root level.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub organization_id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default, rename = "type")]
    pub kind: DocumentKind,
    pub created_by: String,
}

impl NewDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }
        if self.project_id.is_empty() {
            return Err(ValidationError::MissingField("project_id".to_string()));
        }
        Ok(())
    }
}

/// Partial, tree-neutral update of a document
///
/// `content` uses the double-Option pattern:
/// - `None`: leave content unchanged
/// - `Some(None)`: clear the body
/// - `Some(Some(json))`: replace the body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub content: Option<Option<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = Some(Some(content));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.is_public.is_none()
            && self.is_archived.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::MissingField("title".to_string()));
            }
        }
        Ok(())
    }
}

/// Distinguishes an explicit `null` from an absent field
fn deserialize_optional_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
