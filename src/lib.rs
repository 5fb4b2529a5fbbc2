//! # Page Navigator
//!
//! Keeps an application's "current page" state and a navigation backend's
//! current path in agreement, in both directions:
//!
//! - **Path Templates** - `/users/:id/posts/:number` and trailing `/*` wildcards
//! - **Page Registry** - ordered pages, first match wins, parent/child composition
//! - **Mappers** - per-parameter coercion of raw path strings (integers, flags, ...)
//! - **Synchronization** - page-change events push paths, path changes dispatch events
//! - **Echo Suppression** - the backend's echo of our own push is recognised and dropped
//!
//! The state container and the navigation backend are external; they are
//! reached through the [`StateContainer`] and [`NavigationBackend`] traits.
//! [`PageStore`] and [`MemoryHistory`] are in-crate implementations used by
//! headless hosts and tests.
//!
//! # Quick Start
//!
//! ```
//! use page_navigator::*;
//!
//! let mut pages = Pages::new();
//! pages.page("/").name("index").register()?;
//! let users = pages.page("/users").name("users").register()?;
//! let user = pages.child_page(&users, "/:id").name("user").register()?;
//! pages
//!     .child_page(&user, "/posts/:number")
//!     .name("userPost")
//!     .mapper(Mapper::new().integer("number"))
//!     .register()?;
//! pages.page("/*").name("error").register()?;
//!
//! let mut store: PageStore = PageStore::new("index", PageParams::new());
//! let mut sync = PageSync::new(pages, MemoryHistory::new("/"), select_page);
//! let notifications = sync.connect();
//!
//! // Navigating the backend changes the page.
//! sync.backend_mut().push("/users/7/posts/2");
//! for path in notifications.drain() {
//!     sync.handle_navigation(&mut store, &path)?;
//! }
//! assert_eq!(store.state().name, "userPost");
//! assert_eq!(store.state().params.get_as::<i64>("number"), Some(2));
//!
//! // Changing the page navigates the backend.
//! let event = PageChangeEvent::new("user", PageParams::new().with("id", "5"));
//! sync.dispatch(&mut store, event.into())?;
//! assert_eq!(sync.backend().location(), "/users/5");
//! # Ok::<(), NavigationError>(())
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Description                                   | Default |
//! |-----------|-----------------------------------------------|---------|
//! | `log`     | Log through the `log` crate                   | yes     |
//! | `tracing` | Log through the `tracing` crate               | no      |
//! | `cache`   | LRU cache of path matches inside [`PageSync`] | yes     |

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core modules
pub mod page;
pub mod pages;
pub mod params;
pub mod template;

// Error handling
pub mod error;

// Host integration
pub mod history;
pub mod middleware;
pub mod store;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, MatchCache};
pub use error::{NavigationError, SyncOutcome};
pub use history::{Listener, MemoryHistory, NavigationBackend, Notifications, Subscription};
pub use middleware::{PageSync, PendingPushes, Selector, SyncOptions};
pub use page::{Coercion, Event, Mapper, Page, PageChangeEvent};
pub use pages::{PageBuilder, Pages};
pub use params::{PageParams, ParamValue};
pub use store::{select_page, PageState, PageStore, StateContainer};
pub use template::{Segment, Template};
