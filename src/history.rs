//! Navigation backend contract and an in-memory history.
//!
//! The real navigation backend (a browser location, a deep-link router, ...)
//! is external. [`NavigationBackend`] is all the synchronization core needs
//! from it: read the current path, push a new one, and subscribe to path
//! changes.
//!
//! [`MemoryHistory`] implements the contract with a plain history stack and
//! is what tests and headless hosts use. [`Notifications`] buffers change
//! notifications so the host can feed them back into
//! [`PageSync::handle_navigation`](crate::PageSync::handle_navigation) once
//! the call that caused them has returned.
//!
//! # Example
//!
//! ```
//! use page_navigator::{MemoryHistory, NavigationBackend, Notifications};
//!
//! let mut history = MemoryHistory::new("/");
//! let notifications = Notifications::new();
//! history.subscribe(notifications.listener());
//!
//! history.push("/posts");
//! history.push("/posts/3");
//! history.back();
//!
//! assert_eq!(history.current_path(), "/posts");
//! assert_eq!(notifications.drain(), ["/posts", "/posts/3", "/posts"]);
//! ```

use crate::trace_log;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Callback receiving every new current path.
pub type Listener = Box<dyn FnMut(&str)>;

/// Handle returned by [`NavigationBackend::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(usize);

impl Subscription {
    /// Wrap a backend-specific listener id.
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// The backend-specific listener id.
    pub const fn id(self) -> usize {
        self.0
    }
}

/// The external navigation backend.
pub trait NavigationBackend {
    /// The current path.
    fn current_path(&self) -> String;

    /// Navigate to `path`, adding a history entry.
    fn push(&mut self, path: &str);

    /// Register a listener for path changes, including changes caused by
    /// [`push`](Self::push).
    fn subscribe(&mut self, listener: Listener) -> Subscription;

    /// Remove a listener. Returns `false` if it was already removed.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

// ============================================================================
// Notifications
// ============================================================================

/// Single-threaded FIFO buffer of path-change notifications.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: Rc<RefCell<VecDeque<String>>>,
}

impl Notifications {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener appending every notified path to this buffer.
    pub fn listener(&self) -> Listener {
        let queue = Rc::clone(&self.queue);
        Box::new(move |path: &str| queue.borrow_mut().push_back(path.to_string()))
    }

    /// Take the oldest buffered path.
    pub fn pop(&self) -> Option<String> {
        self.queue.borrow_mut().pop_front()
    }

    /// Take every buffered path, oldest first.
    pub fn drain(&self) -> Vec<String> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Return the number of buffered paths.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Return `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

// ============================================================================
// MemoryHistory
// ============================================================================

/// In-memory history stack implementing [`NavigationBackend`].
pub struct MemoryHistory {
    /// Navigation history stack
    entries: Vec<String>,
    /// Current position in history
    current: usize,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: usize,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial_path`.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: vec![initial_path.into()],
            current: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    fn notify(&mut self) {
        let path = self.entries[self.current].clone();
        trace_log!("History moved to '{}', notifying {} listeners", path, self.listeners.len());
        for (_, listener) in &mut self.listeners {
            listener(path.as_str());
        }
    }

    /// Get current path
    pub fn location(&self) -> &str {
        &self.entries[self.current]
    }

    /// Replace the current entry
    pub fn replace(&mut self, path: impl Into<String>) {
        self.entries[self.current] = path.into();
        self.notify();
    }

    /// Go back in history. Returns `false` at the first entry.
    pub fn back(&mut self) -> bool {
        if self.can_go_back() {
            self.current -= 1;
            self.notify();
            true
        } else {
            false
        }
    }

    /// Go forward in history. Returns `false` at the last entry.
    pub fn forward(&mut self) -> bool {
        if self.can_go_forward() {
            self.current += 1;
            self.notify();
            true
        } else {
            false
        }
    }

    /// Check if can go back
    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    /// Check if can go forward
    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    /// Peek at the path `back()` would move to.
    pub fn peek_back_path(&self) -> Option<&str> {
        self.current
            .checked_sub(1)
            .map(|index| self.entries[index].as_str())
    }

    /// Peek at the path `forward()` would move to.
    pub fn peek_forward_path(&self) -> Option<&str> {
        self.entries.get(self.current + 1).map(String::as_str)
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Return the number of history entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history has at least its initial entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("entries", &self.entries)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl NavigationBackend for MemoryHistory {
    fn current_path(&self) -> String {
        self.location().to_string()
    }

    /// Drops forward entries, appends `path` and notifies listeners.
    fn push(&mut self, path: &str) {
        self.entries.truncate(self.current + 1);
        self.entries.push(path.to_string());
        self.current += 1;
        self.notify();
    }

    fn subscribe(&mut self, listener: Listener) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, listener));
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }
}
