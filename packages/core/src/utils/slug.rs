//! Title-derived slugs, unique per project
//!
//! A slug is derived from the document title and then made unique within the
//! owning project by checking `base`, `base-1`, `base-2`, ... against the
//! persistence layer until an unused candidate turns up.
//!
//! Checking and the subsequent insert must run under the same per-project
//! serialization point, otherwise two concurrent creations can claim the same
//! slug.

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Default upper bound on candidates tried for one title
pub const DEFAULT_MAX_SLUG_ATTEMPTS: usize = 10_000;

#[derive(Error, Debug)]
pub enum SlugError {
    /// Every candidate up to the attempt limit is taken
    #[error("No free slug for '{base}' after {attempts} attempts")]
    Exhausted { base: String, attempts: usize },

    /// The existence check itself failed
    #[error("Slug lookup failed: {0}")]
    LookupFailed(String),
}

/// Read-only existence check supplied by the persistence layer
#[async_trait]
pub trait SlugLookup: Send + Sync {
    async fn slug_exists(&self, project_id: &str, slug: &str) -> Result<bool, SlugError>;
}

/// Lowercase, strip anything but ASCII letters, digits, whitespace and
/// hyphens, then join words with single hyphens.
///
/// ```rust
/// use teamspace_core::utils::slugify;
///
/// assert_eq!(slugify("  Sprint Planning: Q3!  "), "sprint-planning-q3");
/// assert_eq!(slugify("Intro"), "intro");
/// ```
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped = DISALLOWED_CHARS.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    HYPHEN_RUNS.replace_all(&hyphenated, "-").into_owned()
}

/// Candidate slug for the given attempt (0 = bare base)
pub fn slug_candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Tries candidate slugs until one is free in the project
#[derive(Debug, Clone)]
pub struct SlugAllocator {
    max_attempts: usize,
}

impl Default for SlugAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SLUG_ATTEMPTS)
    }
}

impl SlugAllocator {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Find the first unused slug for `title` within `project_id`.
    ///
    /// A title with no slug-able characters falls back to
    /// `untitled-<unix millis>`. The suffix counter strictly increases, so
    /// the search ends after at most (existing slugs + 1) attempts, or with
    /// [`SlugError::Exhausted`] once the attempt limit is reached.
    pub async fn allocate(
        &self,
        project_id: &str,
        title: &str,
        lookup: &dyn SlugLookup,
    ) -> Result<String, SlugError> {
        let mut base = slugify(title);
        if base.is_empty() {
            base = format!("untitled-{}", Utc::now().timestamp_millis());
        }

        for attempt in 0..self.max_attempts {
            let candidate = slug_candidate(&base, attempt);
            if !lookup.slug_exists(project_id, &candidate).await? {
                if attempt > 0 {
                    tracing::debug!(
                        "Slug '{}' taken in project '{}', using '{}'",
                        base,
                        project_id,
                        candidate
                    );
                }
                return Ok(candidate);
            }
        }

        tracing::warn!(
            "Slug checking for '{}' in project '{}' hit the limit of {}",
            base,
            project_id,
            self.max_attempts
        );
        Err(SlugError::Exhausted {
            base,
            attempts: self.max_attempts,
        })
    }
}
