//! Test utilities for synchronization tests
//!
//! Provides a spy state container, a scripted navigation backend, and page
//! fixtures shared by the integration tests.

#![allow(dead_code)]

use page_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Route `log` output to the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Call log
// ============================================================================

/// One observable side effect of the middleware.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Push(String),
    Dispatch(PageChangeEvent),
    App(String),
}

/// Ordered record of pushes and dispatches, shared between the spy store
/// and the scripted backend.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn pushes(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Push(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn dispatches(&self) -> Vec<PageChangeEvent> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Dispatch(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

// ============================================================================
// SpyStore
// ============================================================================

/// Application state with the page slice nested inside, like a combined
/// reducer would produce.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub page: PageState,
}

pub fn select_app_page(state: &AppState) -> &PageState {
    &state.page
}

/// State container whose state only changes when a test says so; every
/// event it receives is recorded.
#[derive(Debug)]
pub struct SpyStore {
    pub state: AppState,
    log: CallLog,
}

impl SpyStore {
    pub fn new(name: &str, params: PageParams, log: CallLog) -> Self {
        Self {
            state: AppState {
                page: PageState::new(name, params),
            },
            log,
        }
    }

    pub fn set_page(&mut self, name: &str, params: PageParams) {
        self.state.page = PageState::new(name, params);
    }
}

impl StateContainer for SpyStore {
    type State = AppState;
    type Action = String;

    fn dispatch(&mut self, event: Event<String>) {
        match event {
            Event::ChangePage(change) => self.log.record(Call::Dispatch(change)),
            Event::App(action) => self.log.record(Call::App(action)),
        }
    }

    fn state(&self) -> &AppState {
        &self.state
    }
}

// ============================================================================
// ScriptedBackend
// ============================================================================

/// Navigation backend whose current path is set by the test.
///
/// `push` is recorded but does not move the current path and does not
/// notify anyone.
#[derive(Debug)]
pub struct ScriptedBackend {
    pub current: String,
    log: CallLog,
}

impl ScriptedBackend {
    pub fn new(current: &str, log: CallLog) -> Self {
        Self {
            current: current.to_string(),
            log,
        }
    }
}

impl NavigationBackend for ScriptedBackend {
    fn current_path(&self) -> String {
        self.current.clone()
    }

    fn push(&mut self, path: &str) {
        self.log.record(Call::Push(path.to_string()));
    }

    fn subscribe(&mut self, _listener: Listener) -> Subscription {
        Subscription::new(0)
    }

    fn unsubscribe(&mut self, _subscription: Subscription) -> bool {
        false
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// `posts` at `/posts`, `post` at `/posts/:number` with an integer mapper,
/// and `error` at `/posts/:number/*`.
pub fn posts_pages() -> Pages {
    let mut pages = Pages::new();
    let posts = pages.page("/posts").name("posts").register().unwrap();
    let post = pages
        .child_page(&posts, "/:number")
        .name("post")
        .mapper(Mapper::new().integer("number"))
        .register()
        .unwrap();
    pages
        .child_page(&post, "/*")
        .name("error")
        .mapper(Mapper::new().integer("number"))
        .register()
        .unwrap();
    pages
}

pub type SpySync = PageSync<SpyStore, ScriptedBackend>;

/// Middleware over [`posts_pages`] with a spy store stuck on the `error`
/// page and a backend at `current`.
pub fn spy_setup(current: &str) -> (SpySync, SpyStore, CallLog) {
    init_logging();
    let log = CallLog::new();
    let store = SpyStore::new("error", PageParams::new(), log.clone());
    let sync = PageSync::new(
        posts_pages(),
        ScriptedBackend::new(current, log.clone()),
        select_app_page,
    );
    (sync, store, log)
}

pub fn change(name: &str, params: PageParams) -> Event<String> {
    PageChangeEvent::new(name, params).into()
}

pub fn post(number: i64) -> Event<String> {
    change("post", PageParams::new().with("number", number))
}

/// Assert that a parameter holds the given string.
pub fn assert_param_equals(params: &PageParams, key: &str, expected: &str) {
    assert_eq!(
        params.get_str(key),
        Some(expected),
        "Parameter '{}' in {:?}",
        key,
        params
    );
}
