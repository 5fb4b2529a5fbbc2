//! Errors and outcomes of page synchronization.
//!
//! This module defines:
//!
//! - [`NavigationError`]: every failure the crate reports, such as a path that no
//!   page matches, a malformed template at registration time, an event that
//!   names an unknown page, a rejected parameter coercion, or a missing
//!   parameter under strict formatting.
//! - [`SyncOutcome`]: what [`PageSync`](crate::PageSync) did with an event
//!   or a navigation notification (`Dispatched`, `Unchanged`, `Echo`,
//!   `PassedThrough`).
//!
//! # Examples
//!
//! ```
//! use page_navigator::{NavigationError, SyncOutcome};
//!
//! let outcome = SyncOutcome::Dispatched { pushed: Some("/posts/3".into()) };
//! assert!(outcome.is_dispatched());
//! assert_eq!(outcome.pushed_path(), Some("/posts/3"));
//!
//! let err = NavigationError::NoMatchFound { path: "/comments/3".into() };
//! assert_eq!(err.to_string(), "no matches found: /comments/3");
//! ```

use std::fmt;

// ============================================================================
// Sync Outcome
// ============================================================================

/// What the synchronization middleware did with one input.
///
/// Returned by [`PageSync::dispatch`](crate::PageSync::dispatch) and
/// [`PageSync::handle_navigation`](crate::PageSync::handle_navigation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The page-change event reached the state container.
    Dispatched { pushed: Option<String> },
    /// The event equalled the current page state and was swallowed.
    Unchanged { pushed: Option<String> },
    /// The notification was the echo of a push this middleware issued.
    Echo { path: String },
    /// A non-page event was forwarded untouched.
    PassedThrough,
}

impl SyncOutcome {
    /// Check if the state container received the event
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SyncOutcome::Dispatched { .. })
    }

    /// Check if the event was swallowed as a no-op
    pub fn is_unchanged(&self) -> bool {
        matches!(self, SyncOutcome::Unchanged { .. })
    }

    /// Check if the notification was consumed as an echo
    pub fn is_echo(&self) -> bool {
        matches!(self, SyncOutcome::Echo { .. })
    }

    /// Check if the event was not a page change
    pub fn is_passed_through(&self) -> bool {
        matches!(self, SyncOutcome::PassedThrough)
    }

    /// Get the path pushed to the navigation backend, if any
    pub fn pushed_path(&self) -> Option<&str> {
        match self {
            SyncOutcome::Dispatched {
                pushed: Some(path),
            }
            | SyncOutcome::Unchanged {
                pushed: Some(path),
            } => Some(path),
            _ => None,
        }
    }
}

// ============================================================================
// Navigation Error
// ============================================================================

/// Detailed error variants reported by matching, registration and syncing.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No registered page matches the path
    NoMatchFound { path: String },

    /// Pattern rejected at registration time
    MalformedTemplate { pattern: String, reason: String },

    /// A page-change event names a page that was never registered
    UnknownPage { name: String },

    /// A mapper coercion rejected its raw input
    InvalidParam {
        key: String,
        value: String,
        message: String,
    },

    /// Strict formatting found no value for a template parameter
    MissingParam { name: String, template: String },
}

impl NavigationError {
    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        NavigationError::MalformedTemplate {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if no page matched the path
    pub fn is_no_match(&self) -> bool {
        matches!(self, NavigationError::NoMatchFound { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::NoMatchFound { path } => {
                write!(f, "no matches found: {}", path)
            }
            NavigationError::MalformedTemplate { pattern, reason } => {
                write!(f, "malformed template '{}': {}", pattern, reason)
            }
            NavigationError::UnknownPage { name } => {
                write!(f, "unknown page: {}", name)
            }
            NavigationError::InvalidParam {
                key,
                value,
                message,
            } => {
                write!(f, "invalid parameter '{}' = '{}': {}", key, value, message)
            }
            NavigationError::MissingParam { name, template } => {
                write!(f, "missing parameter '{}' for template '{}'", name, template)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

// ============================================================================
// Tests
// ============================================================================
