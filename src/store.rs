//! State container contract and the page slice of application state.
//!
//! The application's state container is external; this crate only needs to
//! dispatch events into it and read its current state. [`StateContainer`]
//! captures that contract.
//!
//! [`PageState`] is the "current page" slice the container is expected to
//! hold, and [`PageState::reduce`] is its reducer. [`PageStore`] is a
//! minimal container holding nothing but that slice, handy when the page is
//! the only state an application keeps in sync.

use crate::page::{Event, PageChangeEvent};
use crate::params::PageParams;
use std::marker::PhantomData;

/// The external state container.
pub trait StateContainer {
    /// Whole application state.
    type State;

    /// Application events other than page changes.
    type Action;

    /// Deliver an event to the container's reducers.
    fn dispatch(&mut self, event: Event<Self::Action>);

    /// Read the current state.
    fn state(&self) -> &Self::State;
}

/// The current page as held in application state.
///
/// # Example
///
/// ```
/// use page_navigator::{Event, PageChangeEvent, PageParams, PageState};
///
/// let mut state = PageState::new("index", PageParams::new());
/// let event: Event<()> = PageChangeEvent::new("post", PageParams::new().with("id", "3")).into();
///
/// assert!(state.reduce(&event));
/// assert_eq!(state.name, "post");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageState {
    /// Current page name
    pub name: String,
    /// Current page parameters
    pub params: PageParams,
}

impl PageState {
    /// Initial state: the default page with its default parameters.
    pub fn new(name: impl Into<String>, params: PageParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Return `true` if `event` names this page with deep-equal parameters.
    pub fn is_same_page(&self, event: &PageChangeEvent) -> bool {
        self.name == event.name && self.params == event.params
    }

    /// Page reducer: a page change replaces the slice, anything else is
    /// ignored. Returns `true` if the state changed.
    pub fn reduce<A>(&mut self, event: &Event<A>) -> bool {
        match event {
            Event::ChangePage(change) if !self.is_same_page(change) => {
                self.name.clone_from(&change.name);
                self.params = change.params.clone();
                true
            }
            _ => false,
        }
    }
}

impl From<PageChangeEvent> for PageState {
    fn from(change: PageChangeEvent) -> Self {
        Self {
            name: change.name,
            params: change.params,
        }
    }
}

/// Identity selector for containers whose whole state is a [`PageState`].
pub fn select_page(state: &PageState) -> &PageState {
    state
}

/// Minimal container holding only the current page.
///
/// Application events (`Event::App`) are accepted and dropped.
#[derive(Debug, Clone)]
pub struct PageStore<A = ()> {
    state: PageState,
    _action: PhantomData<fn(A)>,
}

impl<A> PageStore<A> {
    /// Create a store starting at the default page.
    pub fn new(default_page: impl Into<String>, default_params: PageParams) -> Self {
        Self {
            state: PageState::new(default_page, default_params),
            _action: PhantomData,
        }
    }
}

impl<A> StateContainer for PageStore<A> {
    type State = PageState;
    type Action = A;

    fn dispatch(&mut self, event: Event<A>) {
        self.state.reduce(&event);
    }

    fn state(&self) -> &PageState {
        &self.state
    }
}
