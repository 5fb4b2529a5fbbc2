//! Pages, mappers and page-change events.
//!
//! A [`Page`] binds a name to one [`Template`] and the [`Mapper`] that
//! coerces its matched parameters. Pages are created by the
//! [`Pages`](crate::Pages) registry and never change afterwards.
//!
//! Events flowing into the state container are a closed enum, [`Event`]:
//! either a [`PageChangeEvent`] or an application event of the host's own
//! type.

use crate::error::NavigationError;
use crate::params::{PageParams, ParamValue};
use crate::template::Template;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Mapper
// ============================================================================

/// Coercion from a raw path segment to a typed value.
pub type Coercion = Arc<dyn Fn(&str) -> Result<ParamValue, String> + Send + Sync>;

/// Per-page parameter coercion table, applied only when matching.
///
/// Entries run in insertion order. Registering a key twice replaces the
/// earlier coercion in place.
///
/// # Example
///
/// ```
/// use page_navigator::{Mapper, PageParams, ParamValue};
///
/// let mapper = Mapper::new()
///     .integer("number")
///     .map("slug", |raw| ParamValue::from(raw.to_uppercase()));
///
/// let mut params = PageParams::new().with("number", "5").with("slug", "intro");
/// mapper.apply(&mut params)?;
/// assert_eq!(params.get("number"), Some(&ParamValue::Int(5)));
/// assert_eq!(params.get_str("slug"), Some("INTRO"));
/// # Ok::<(), page_navigator::NavigationError>(())
/// ```
#[derive(Clone, Default)]
pub struct Mapper {
    entries: Vec<(String, Coercion)>,
}

impl Mapper {
    /// Create an empty mapper (parameters stay raw strings).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a total coercion.
    pub fn map<F>(self, key: impl Into<String>, coerce: F) -> Self
    where
        F: Fn(&str) -> ParamValue + Send + Sync + 'static,
    {
        let coercion: Coercion = Arc::new(move |raw: &str| Ok::<_, String>(coerce(raw)));
        self.entry(key.into(), coercion)
    }

    /// Add a fallible coercion; its error surfaces as
    /// [`NavigationError::InvalidParam`] from matching.
    pub fn try_map<F, E>(self, key: impl Into<String>, coerce: F) -> Self
    where
        F: Fn(&str) -> Result<ParamValue, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let coercion: Coercion = Arc::new(move |raw: &str| coerce(raw).map_err(|e| e.to_string()));
        self.entry(key.into(), coercion)
    }

    /// Parse the parameter as an `i64`.
    pub fn integer(self, key: impl Into<String>) -> Self {
        self.try_map(key, |raw| raw.parse::<i64>().map(ParamValue::Int))
    }

    /// Parse the parameter as an `f64`.
    pub fn float(self, key: impl Into<String>) -> Self {
        self.try_map(key, |raw| raw.parse::<f64>().map(ParamValue::Float))
    }

    /// Parse the parameter as a `bool` (`true` / `false`).
    pub fn boolean(self, key: impl Into<String>) -> Self {
        self.try_map(key, |raw| raw.parse::<bool>().map(ParamValue::Bool))
    }

    fn entry(mut self, key: String, coercion: Coercion) -> Self {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = coercion;
        } else {
            self.entries.push((key, coercion));
        }
        self
    }

    /// Keys with a coercion, in application order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Return `true` if no coercion is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the number of coercions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replace each mapped parameter with its coerced value.
    ///
    /// Keys absent from `params` are skipped.
    pub fn apply(&self, params: &mut PageParams) -> Result<(), NavigationError> {
        for (key, coerce) in &self.entries {
            let Some(value) = params.get(key) else {
                continue;
            };
            let raw = value.to_string();
            let coerced = coerce(&raw).map_err(|message| NavigationError::InvalidParam {
                key: key.clone(),
                value: raw.clone(),
                message,
            })?;
            params.insert(key.clone(), coerced);
        }
        Ok(())
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

// ============================================================================
// Events
// ============================================================================

/// Request to make `name` the current page with `params`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageChangeEvent {
    /// Registered page name
    pub name: String,
    /// Page parameters
    pub params: PageParams,
}

impl PageChangeEvent {
    /// Create a page-change event.
    pub fn new(name: impl Into<String>, params: PageParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Every event delivered to a [`StateContainer`](crate::StateContainer).
///
/// `A` is the host application's own event type; the synchronization
/// middleware only inspects [`Event::ChangePage`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event<A> {
    /// Change the current page
    ChangePage(PageChangeEvent),
    /// Any other application event, passed through untouched
    App(A),
}

impl<A> Event<A> {
    /// Get the page change, if this is one.
    pub fn as_page_change(&self) -> Option<&PageChangeEvent> {
        match self {
            Event::ChangePage(change) => Some(change),
            Event::App(_) => None,
        }
    }
}

impl<A> From<PageChangeEvent> for Event<A> {
    fn from(change: PageChangeEvent) -> Self {
        Event::ChangePage(change)
    }
}

// ============================================================================
// Page
// ============================================================================

/// A named, registered binding of one template.
///
/// # Example
///
/// ```
/// use page_navigator::{PageParams, Pages};
///
/// let mut pages = Pages::new();
/// let page = pages.add_page("/:a/:b", Some("page1"), Default::default())?;
///
/// let params = PageParams::new().with("a", "posts").with("b", 3);
/// assert_eq!(page.path(&params), "/posts/3");
/// assert_eq!(page.change_event(params.clone()).name, "page1");
/// # Ok::<(), page_navigator::NavigationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    name: String,
    template: Template,
    mapper: Mapper,
}

impl Page {
    pub(crate) fn new(name: String, template: Template, mapper: Mapper) -> Self {
        Self {
            name,
            template,
            mapper,
        }
    }

    /// The page name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The coercions applied when this page matches.
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Generate the path for `params`; missing parameters are left out.
    pub fn path(&self, params: &PageParams) -> String {
        self.template.format(params)
    }

    /// Generate the path for `params`, rejecting missing parameters.
    pub fn try_path(&self, params: &PageParams) -> Result<String, NavigationError> {
        self.template.try_format(params)
    }

    /// Build the event that makes this page current.
    pub fn change_event(&self, params: PageParams) -> PageChangeEvent {
        PageChangeEvent::new(self.name.clone(), params)
    }

    /// Match `path` against this page alone and coerce the parameters.
    pub fn match_path(&self, path: &str) -> Result<Option<PageParams>, NavigationError> {
        let Some(mut params) = self.template.match_path(path) else {
            return Ok(None);
        };
        self.mapper.apply(&mut params)?;
        Ok(Some(params))
    }
}
