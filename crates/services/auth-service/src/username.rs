//! Username allocation.
//!
//! Candidates are derived from the registrant's name (or email local part)
//! plus a random suffix. Uniqueness is decided by the store; the allocator
//! only produces candidates.

use domain::{
    MAX_USERNAME_ATTEMPTS, USERNAME_BASE_MAX_LENGTH, USERNAME_FALLBACK_LENGTH,
    USERNAME_SUFFIX_LENGTH,
};

use crate::security::random_alphanumeric;

/// Produces the sequence of username candidates for one registration.
#[derive(Debug, Clone)]
pub struct UsernameAllocator {
    base: Option<String>,
    requested: Option<String>,
    max_attempts: usize,
}

impl UsernameAllocator {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            base: derive_base(first_name, last_name, email),
            requested: None,
            max_attempts: MAX_USERNAME_ATTEMPTS,
        }
    }

    /// Try the registrant's own choice before any generated candidate.
    pub fn with_requested(mut self, requested: Option<String>) -> Self {
        self.requested = requested
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Candidate for the given zero-based attempt.
    pub fn candidate(&self, attempt: usize) -> String {
        match (&self.requested, attempt) {
            (Some(requested), 0) => requested.clone(),
            _ => self.generate(),
        }
    }

    /// A fresh generated candidate: base plus random suffix.
    pub fn generate(&self) -> String {
        match &self.base {
            Some(base) => format!("{}{}", base, random_alphanumeric(USERNAME_SUFFIX_LENGTH)),
            None => random_alphanumeric(USERNAME_FALLBACK_LENGTH),
        }
    }
}

fn derive_base(first_name: &str, last_name: &str, email: &str) -> Option<String> {
    let from_name = strip(&format!("{}.{}", first_name, last_name));
    let base = if from_name.is_empty() {
        let local = email.split('@').next().unwrap_or_default();
        strip(local)
    } else {
        from_name
    };

    if base.is_empty() {
        return None;
    }
    Some(base.chars().take(USERNAME_BASE_MAX_LENGTH).collect())
}

/// Lower-case and keep only `[a-z0-9]`.
fn strip(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
