//! Two-way synchronization between page state and the navigation backend.
//!
//! [`PageSync`] sits on the event-dispatch path of the application's state
//! container. It owns the [`Pages`] registry, the [`NavigationBackend`], a
//! selector reading the current [`PageState`] out of the container's state,
//! and the queue of paths it pushed itself ([`PendingPushes`]).
//!
//! All methods are **synchronous**; nothing here owns a thread.
//!
//! # Outbound: a page-change event
//!
//! 1. Resolve the page by name and format the target path.
//! 2. If the backend already shows the target path, nothing is pushed.
//! 3. Otherwise, if the backend's path matches the page with deep-equal
//!    coerced parameters, it is an equivalent spelling and nothing is pushed.
//!    If not, the target is queued and pushed. The push happens **before**
//!    the container sees the event.
//! 4. The event reaches the container only if it differs from the current
//!    page state.
//!
//! # Inbound: a navigation notification
//!
//! 1. If the path equals the head of the pending queue, it is the echo of
//!    our own push: the head is dropped and nothing else happens.
//! 2. Otherwise the path is matched against the registry and the resulting
//!    event is dispatched through the outbound path above, with the notified
//!    path standing in for the backend's current path. A notification never
//!    causes a push, even when the host drains several at once and the
//!    backend has already moved past it.
//!
//! Only the queue head is examined, so echoes are consumed strictly in push
//! order. A push whose echo never arrives stays queued and will swallow the
//! next notification for the same path.
//!
//! # Example
//!
//! ```
//! use page_navigator::*;
//!
//! let mut pages = Pages::new();
//! pages.page("/").name("index").register()?;
//! let post = pages
//!     .page("/posts/:id")
//!     .name("post")
//!     .mapper(Mapper::new().integer("id"))
//!     .register()?;
//!
//! let mut store: PageStore = PageStore::new("index", PageParams::new());
//! let mut sync = PageSync::new(pages, MemoryHistory::new("/"), select_page);
//! let notifications = sync.connect();
//!
//! // State -> path
//! let outcome = sync.dispatch(&mut store, post.change_event(PageParams::new().with("id", 3)).into())?;
//! assert_eq!(outcome.pushed_path(), Some("/posts/3"));
//! assert_eq!(sync.backend().location(), "/posts/3");
//!
//! // The backend echoes the push; the echo is swallowed.
//! for path in notifications.drain() {
//!     assert!(sync.handle_navigation(&mut store, &path)?.is_echo());
//! }
//!
//! // Path -> state
//! sync.backend_mut().back();
//! for path in notifications.drain() {
//!     sync.handle_navigation(&mut store, &path)?;
//! }
//! assert_eq!(store.state().name, "index");
//! # Ok::<(), page_navigator::NavigationError>(())
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, MatchCache};
use crate::error::{NavigationError, SyncOutcome};
use crate::history::{NavigationBackend, Notifications, Subscription};
use crate::page::{Event, Page, PageChangeEvent};
use crate::pages::Pages;
use crate::params::PageParams;
use crate::store::{PageState, StateContainer};
use crate::{debug_log, trace_log, warn_log};
use std::collections::VecDeque;
use std::fmt;

// ============================================================================
// PendingPushes
// ============================================================================

/// FIFO of pushed paths whose echo has not arrived yet.
#[derive(Debug, Clone, Default)]
pub struct PendingPushes {
    queue: VecDeque<String>,
}

impl PendingPushes {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pushed path at the tail.
    pub fn enqueue(&mut self, path: String) {
        self.queue.push_back(path);
    }

    /// Drop the head if it equals `path`. Returns `true` if it did.
    pub fn consume_echo(&mut self, path: &str) -> bool {
        if self.queue.front().is_some_and(|head| head == path) {
            self.queue.pop_front();
            true
        } else {
            false
        }
    }

    /// The oldest unechoed push.
    pub fn head(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    /// Return the number of unechoed pushes.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Return `true` if every push has been echoed.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ============================================================================
// SyncOptions
// ============================================================================

/// Runtime configuration of [`PageSync`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Fail with [`NavigationError::MissingParam`] instead of leaving a
    /// missing parameter out of a pushed path.
    pub strict_format: bool,

    /// Number of paths remembered by the match cache.
    #[cfg(feature = "cache")]
    pub cache_capacity: usize,
}

impl SyncOptions {
    /// Default options: permissive formatting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`strict_format`](Self::strict_format).
    pub fn strict_format(mut self, strict: bool) -> Self {
        self.strict_format = strict;
        self
    }

    /// Set [`cache_capacity`](Self::cache_capacity).
    #[cfg(feature = "cache")]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            strict_format: false,
            #[cfg(feature = "cache")]
            cache_capacity: MatchCache::DEFAULT_CAPACITY,
        }
    }
}

// ============================================================================
// PageSync
// ============================================================================

/// Reads the page slice out of the container's state.
pub type Selector<T> = Box<dyn Fn(&T) -> &PageState>;

/// The synchronization middleware and navigation handler.
pub struct PageSync<S: StateContainer, N: NavigationBackend> {
    pages: Pages,
    backend: N,
    selector: Selector<S::State>,
    pending: PendingPushes,
    options: SyncOptions,
    #[cfg(feature = "cache")]
    cache: MatchCache,
    subscription: Option<Subscription>,
}

impl<S: StateContainer, N: NavigationBackend> PageSync<S, N> {
    /// Create the middleware with default [`SyncOptions`].
    ///
    /// The registry is frozen from here on.
    pub fn new<F>(pages: Pages, backend: N, selector: F) -> Self
    where
        F: Fn(&S::State) -> &PageState + 'static,
    {
        Self {
            pages,
            backend,
            selector: Box::new(selector),
            pending: PendingPushes::new(),
            options: SyncOptions::default(),
            #[cfg(feature = "cache")]
            cache: MatchCache::new(),
            subscription: None,
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        #[cfg(feature = "cache")]
        {
            self.cache = MatchCache::with_capacity(options.cache_capacity);
        }
        self.options = options;
        self
    }

    /// The frozen page registry.
    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    /// The navigation backend.
    pub fn backend(&self) -> &N {
        &self.backend
    }

    /// The navigation backend, for host-driven navigation (back, forward, ...).
    pub fn backend_mut(&mut self) -> &mut N {
        &mut self.backend
    }

    /// Pushes still waiting for their echo.
    pub fn pending(&self) -> &PendingPushes {
        &self.pending
    }

    /// Current options.
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Match cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Zero the match cache counters, keeping the cached matches.
    #[cfg(feature = "cache")]
    pub fn reset_cache_stats(&mut self) {
        self.cache.reset_stats();
    }

    /// Subscribe a fresh [`Notifications`] buffer to the backend.
    ///
    /// The host drains it and passes each path to
    /// [`handle_navigation`](Self::handle_navigation). Connecting again
    /// replaces the previous subscription.
    pub fn connect(&mut self) -> Notifications {
        self.disconnect();
        let notifications = Notifications::new();
        self.subscription = Some(self.backend.subscribe(notifications.listener()));
        notifications
    }

    /// Drop the subscription made by [`connect`](Self::connect).
    pub fn disconnect(&mut self) -> bool {
        self.subscription
            .take()
            .is_some_and(|subscription| self.backend.unsubscribe(subscription))
    }

    /// Match `path` against the registry, first match wins.
    pub fn match_path(&mut self, path: &str) -> Result<PageChangeEvent, NavigationError> {
        #[cfg(feature = "cache")]
        {
            if let Some((index, raw)) = self.cache.get(path) {
                return self.pages.resolve(index, raw);
            }
            if let Some((index, raw)) = self.pages.find(path) {
                self.cache.insert(path.to_string(), index, raw.clone());
                return self.pages.resolve(index, raw);
            }
            Err(NavigationError::NoMatchFound {
                path: path.to_string(),
            })
        }
        #[cfg(not(feature = "cache"))]
        {
            self.pages.match_path(path)
        }
    }

    /// Run an event through the middleware into `store`.
    pub fn dispatch(
        &mut self,
        store: &mut S,
        event: Event<S::Action>,
    ) -> Result<SyncOutcome, NavigationError> {
        let change = match event {
            Event::ChangePage(change) => change,
            Event::App(action) => {
                store.dispatch(Event::App(action));
                return Ok(SyncOutcome::PassedThrough);
            }
        };

        self.forward(store, change, None)
    }

    /// Reconcile the backend path for `change`, then hand it to `store`
    /// unless it is already the current page.
    ///
    /// `observed` is the path a notification reported; when set it stands in
    /// for [`NavigationBackend::current_path`], which may already have moved
    /// on if the host drained several notifications at once.
    fn forward(
        &mut self,
        store: &mut S,
        change: PageChangeEvent,
        observed: Option<&str>,
    ) -> Result<SyncOutcome, NavigationError> {
        let page = self
            .pages
            .by_name(&change.name)
            .cloned()
            .ok_or_else(|| NavigationError::UnknownPage {
                name: change.name.clone(),
            })?;
        let target = if self.options.strict_format {
            page.try_path(&change.params)?
        } else {
            page.path(&change.params)
        };

        let current = observed.map_or_else(|| self.backend.current_path(), str::to_string);
        let pushed = self.reconcile_path(&page, &change.params, current, target);

        if (self.selector)(store.state()).is_same_page(&change) {
            debug_log!(
                "Page '{}' is already current; not forwarding the event",
                change.name
            );
            return Ok(SyncOutcome::Unchanged { pushed });
        }

        debug_log!("Changing page to '{}'", change.name);
        store.dispatch(Event::ChangePage(change));
        Ok(SyncOutcome::Dispatched { pushed })
    }

    /// Push `target` unless the backend already shows this page.
    fn reconcile_path(
        &mut self,
        page: &Page,
        params: &PageParams,
        current: String,
        target: String,
    ) -> Option<String> {
        if current == target {
            trace_log!("Backend already at '{}'", target);
            return None;
        }

        match page.match_path(&current) {
            Ok(Some(existing)) if existing == *params => {
                trace_log!(
                    "'{}' is an equivalent path for page '{}'; not pushing '{}'",
                    current,
                    page.name(),
                    target
                );
                return None;
            }
            Err(err) => {
                warn_log!(
                    "Current path '{}' does not coerce for page '{}': {}",
                    current,
                    page.name(),
                    err
                );
            }
            _ => {}
        }

        debug_log!("Pushing '{}' (was '{}')", target, current);
        self.pending.enqueue(target.clone());
        self.backend.push(&target);
        Some(target)
    }

    /// Apply a path-change notification from the backend.
    ///
    /// Fails with [`NavigationError::NoMatchFound`] when no page matches;
    /// register a trailing-wildcard page last to catch everything else.
    pub fn handle_navigation(
        &mut self,
        store: &mut S,
        path: &str,
    ) -> Result<SyncOutcome, NavigationError> {
        if self.pending.consume_echo(path) {
            debug_log!(
                "Ignoring echo of pushed path '{}' ({} still pending)",
                path,
                self.pending.len()
            );
            return Ok(SyncOutcome::Echo {
                path: path.to_string(),
            });
        }

        let change = self.match_path(path)?;
        self.forward(store, change, Some(path))
    }

    /// Bring the page state in line with the backend's current path.
    ///
    /// Call once at startup, before any notification arrives.
    pub fn sync_current_path(&mut self, store: &mut S) -> Result<SyncOutcome, NavigationError> {
        let path = self.backend.current_path();
        self.handle_navigation(store, &path)
    }
}

impl<S: StateContainer, N: NavigationBackend + fmt::Debug> fmt::Debug for PageSync<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSync")
            .field("pages", &self.pages.len())
            .field("backend", &self.backend)
            .field("pending", &self.pending)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::page::Mapper;
    use crate::store::{select_page, PageStore};

    fn blog() -> Pages {
        let mut pages = Pages::new();
        let posts = pages.page("/posts").name("posts").register().unwrap();
        pages
            .child_page(&posts, "/:number")
            .name("post")
            .mapper(Mapper::new().integer("number"))
            .register()
            .unwrap();
        pages
    }

    fn post(number: i64) -> Event<()> {
        PageChangeEvent::new("post", PageParams::new().with("number", number)).into()
    }

    #[test]
    fn test_pending_pushes_fifo() {
        let mut pending = PendingPushes::new();
        pending.enqueue("/a".to_string());
        pending.enqueue("/b".to_string());

        assert!(!pending.consume_echo("/b"));
        assert_eq!(pending.head(), Some("/a"));
        assert!(pending.consume_echo("/a"));
        assert!(pending.consume_echo("/b"));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_push_then_echo() {
        let mut store: PageStore = PageStore::new("posts", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/posts"), select_page);

        let outcome = sync.dispatch(&mut store, post(3)).unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::Dispatched {
                pushed: Some("/posts/3".to_string())
            }
        );
        assert_eq!(sync.pending().iter().collect::<Vec<_>>(), ["/posts/3"]);

        let echo = sync.handle_navigation(&mut store, "/posts/3").unwrap();
        assert!(echo.is_echo());
        assert!(sync.pending().is_empty());
    }

    #[test]
    fn test_unknown_page() {
        let mut store: PageStore = PageStore::new("posts", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/posts"), select_page);

        let err = sync
            .dispatch(
                &mut store,
                PageChangeEvent::new("nope", PageParams::new()).into(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            NavigationError::UnknownPage {
                name: "nope".to_string()
            }
        );
        assert!(sync.pending().is_empty());
        assert_eq!(sync.backend().len(), 1);
    }

    #[test]
    fn test_strict_format_rejects_missing_param() {
        let mut store: PageStore = PageStore::new("posts", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/posts"), select_page)
            .with_options(SyncOptions::new().strict_format(true));

        let err = sync
            .dispatch(
                &mut store,
                PageChangeEvent::new("post", PageParams::new()).into(),
            )
            .unwrap_err();
        assert!(matches!(err, NavigationError::MissingParam { .. }));
        assert_eq!(store.state().name, "posts");
    }

    #[test]
    fn test_permissive_format_pushes_partial_path() {
        let mut store: PageStore = PageStore::new("index", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/elsewhere"), select_page);

        let outcome = sync
            .dispatch(
                &mut store,
                PageChangeEvent::new("post", PageParams::new()).into(),
            )
            .unwrap();
        assert_eq!(outcome.pushed_path(), Some("/posts"));
    }

    #[test]
    fn test_app_events_pass_through() {
        let mut store: PageStore<&str> = PageStore::new("posts", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/posts"), select_page);

        let outcome = sync.dispatch(&mut store, Event::App("INCREMENT")).unwrap();
        assert!(outcome.is_passed_through());
        assert!(sync.pending().is_empty());
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut store: PageStore = PageStore::new("posts", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/posts"), select_page);

        let notifications = sync.connect();
        sync.dispatch(&mut store, post(1)).unwrap();
        assert_eq!(notifications.drain(), ["/posts/1"]);

        assert!(sync.disconnect());
        assert!(!sync.disconnect());
        sync.dispatch(&mut store, post(2)).unwrap();
        assert!(notifications.is_empty());
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_match_path_uses_cache() {
        let mut sync: PageSync<PageStore, _> =
            PageSync::new(blog(), MemoryHistory::new("/posts"), select_page)
                .with_options(SyncOptions::new().cache_capacity(8));

        for path in ["/posts/4", "/posts/5", "/posts/4"] {
            sync.match_path(path).unwrap();
        }
        assert_eq!(sync.cache_stats().hits, 1);
        assert_eq!(sync.cache_stats().misses, 2);

        sync.reset_cache_stats();
        assert_eq!(sync.cache_stats().hits, 0);
        sync.match_path("/posts/5").unwrap();
        assert_eq!(sync.cache_stats().hits, 1);
        assert_eq!(sync.cache_stats().misses, 0);
        assert_eq!(
            sync.match_path("/posts/4").unwrap().params,
            PageParams::new().with("number", 4)
        );
        assert!(sync.match_path("/users").unwrap_err().is_no_match());
    }

    #[test]
    fn test_sync_current_path() {
        let mut store: PageStore = PageStore::new("posts", PageParams::new());
        let mut sync = PageSync::new(blog(), MemoryHistory::new("/posts/9"), select_page);

        let outcome = sync.sync_current_path(&mut store).unwrap();
        assert_eq!(outcome, SyncOutcome::Dispatched { pushed: None });
        assert_eq!(store.state().params, PageParams::new().with("number", 9));
    }
}
