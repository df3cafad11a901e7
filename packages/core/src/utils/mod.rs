//! Utility functions for Teamspace Core
//!
//! This module provides common utility functions used across the codebase.

mod slug;

pub use slug::{
    slug_candidate, slugify, SlugAllocator, SlugError, SlugLookup, DEFAULT_MAX_SLUG_ATTEMPTS,
};
