//! Ordered page registry.
//!
//! [`Pages`] keeps registered pages in registration order. Matching walks
//! that order and the **first match wins**, so an earlier page permanently
//! shadows a later page with an overlapping template. A name index sits
//! alongside for O(1) lookup when formatting; it is never used for matching.
//!
//! # Example
//!
//! ```
//! use page_navigator::{Mapper, Pages, ParamValue};
//!
//! let mut pages = Pages::new();
//! let posts = pages.page("/posts").name("posts").register()?;
//! pages
//!     .child_page(&posts, "/:id")
//!     .name("post")
//!     .mapper(Mapper::new().integer("id"))
//!     .register()?;
//! pages.page("/*").name("error").register()?;
//!
//! let matched = pages.match_path("/posts/11")?;
//! assert_eq!(matched.name, "post");
//! assert_eq!(matched.params.get("id"), Some(&ParamValue::Int(11)));
//!
//! assert_eq!(pages.match_path("/anything/goes/here")?.name, "error");
//! # Ok::<(), page_navigator::NavigationError>(())
//! ```

use crate::error::NavigationError;
use crate::page::{Mapper, Page, PageChangeEvent};
use crate::params::PageParams;
use crate::template::Template;
use crate::{debug_log, info_log, trace_log, warn_log};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of pages in priority order.
#[derive(Debug, Clone, Default)]
pub struct Pages {
    pages: Vec<Arc<Page>>,
    by_name: HashMap<String, usize>,
}

impl Pages {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page for `pattern`.
    ///
    /// Without a name the page is named after its canonical template
    /// (`/users/:id`).
    pub fn add_page(
        &mut self,
        pattern: &str,
        name: Option<&str>,
        mapper: Mapper,
    ) -> Result<Arc<Page>, NavigationError> {
        let template = Template::parse(pattern)?;
        Ok(self.insert(template, name, mapper))
    }

    /// Register a page whose template is `parent`'s followed by `suffix`.
    pub fn add_child_page(
        &mut self,
        parent: &Page,
        suffix: &str,
        name: Option<&str>,
        mapper: Mapper,
    ) -> Result<Arc<Page>, NavigationError> {
        let template = parent.template().compose(suffix)?;
        Ok(self.insert(template, name, mapper))
    }

    /// Start a builder-style registration for `pattern`.
    pub fn page<'a>(&'a mut self, pattern: &'a str) -> PageBuilder<'a> {
        PageBuilder::new(self, None, pattern)
    }

    /// Start a builder-style registration of a child of `parent`.
    pub fn child_page<'a>(&'a mut self, parent: &'a Page, suffix: &'a str) -> PageBuilder<'a> {
        PageBuilder::new(self, Some(parent), suffix)
    }

    fn insert(&mut self, template: Template, name: Option<&str>, mapper: Mapper) -> Arc<Page> {
        let name = name.map_or_else(|| template.inspect(), str::to_string);
        let index = self.pages.len();

        if self.by_name.contains_key(&name) {
            warn_log!(
                "Page name '{}' registered again; lookups by name now resolve to '{}'",
                name,
                template
            );
        }
        info_log!("Registered page '{}' ({})", name, template);

        let page = Arc::new(Page::new(name.clone(), template, mapper));
        self.pages.push(Arc::clone(&page));
        self.by_name.insert(name, index);
        page
    }

    /// Look up a page by name (latest registration wins).
    pub fn by_name(&self, name: &str) -> Option<&Arc<Page>> {
        self.by_name.get(name).map(|&index| &self.pages[index])
    }

    /// Get the page at a registration position.
    pub fn get(&self, index: usize) -> Option<&Arc<Page>> {
        self.pages.get(index)
    }

    /// Iterate over pages in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Page>> {
        self.pages.iter()
    }

    /// Return the number of registered pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Return `true` if no page is registered.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Match `path` to the first page whose template accepts it.
    ///
    /// The winning page's mapper coerces the parameters.
    pub fn match_path(&self, path: &str) -> Result<PageChangeEvent, NavigationError> {
        let (index, raw) = self.find(path).ok_or_else(|| {
            debug_log!("No page matches '{}'", path);
            NavigationError::NoMatchFound {
                path: path.to_string(),
            }
        })?;
        self.resolve(index, raw)
    }

    /// Position and raw parameters of the first page matching `path`.
    pub(crate) fn find(&self, path: &str) -> Option<(usize, PageParams)> {
        self.pages.iter().enumerate().find_map(|(index, page)| {
            let params = page.template().match_path(path)?;
            trace_log!("'{}' matched page '{}' at position {}", path, page.name(), index);
            Some((index, params))
        })
    }

    /// Apply the mapper of the page at `index` to raw parameters.
    pub(crate) fn resolve(
        &self,
        index: usize,
        mut params: PageParams,
    ) -> Result<PageChangeEvent, NavigationError> {
        let page = &self.pages[index];
        page.mapper().apply(&mut params)?;
        Ok(page.change_event(params))
    }
}

// ============================================================================
// PageBuilder
// ============================================================================

/// Builder returned by [`Pages::page`] and [`Pages::child_page`].
///
/// Nothing is registered until [`register`](Self::register) is called.
pub struct PageBuilder<'a> {
    pages: &'a mut Pages,
    parent: Option<&'a Page>,
    pattern: &'a str,
    name: Option<String>,
    mapper: Mapper,
}

impl<'a> PageBuilder<'a> {
    fn new(pages: &'a mut Pages, parent: Option<&'a Page>, pattern: &'a str) -> Self {
        Self {
            pages,
            parent,
            pattern,
            name: None,
            mapper: Mapper::new(),
        }
    }

    /// Set the page name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the parameter coercions.
    pub fn mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Parse the pattern and append the page to the registry.
    pub fn register(self) -> Result<Arc<Page>, NavigationError> {
        let name = self.name.as_deref();
        match self.parent {
            Some(parent) => self
                .pages
                .add_child_page(parent, self.pattern, name, self.mapper),
            None => self.pages.add_page(self.pattern, name, self.mapper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_page_named() {
        let mut pages = Pages::new();
        let post = pages.add_page("/posts/:id", Some("post"), Mapper::new()).unwrap();
        assert_eq!(post.name(), "post");
        assert_eq!(post.path(&PageParams::new().with("id", 3)), "/posts/3");
    }

    #[test]
    fn test_name_defaults_to_template() {
        let mut pages = Pages::new();
        let user = pages.add_page("/users/:id", None, Mapper::new()).unwrap();
        assert_eq!(user.name(), "/users/:id");

        let user_post = pages
            .add_child_page(&user, "/posts/:number", None, Mapper::new())
            .unwrap();
        assert_eq!(user_post.name(), "/users/:id/posts/:number");
    }

    #[test]
    fn test_duplicate_name_shadows_lookup_only() {
        let mut pages = Pages::new();
        pages.add_page("/a", Some("dup"), Mapper::new()).unwrap();
        pages.add_page("/b", Some("dup"), Mapper::new()).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages.by_name("dup").unwrap().template().inspect(), "/b");
        assert_eq!(pages.match_path("/a").unwrap().name, "dup");
        assert_eq!(pages.match_path("/b").unwrap().name, "dup");
    }

    #[test]
    fn test_registration_failure_leaves_registry_untouched() {
        let mut pages = Pages::new();
        assert!(pages.add_page("/*/x", Some("bad"), Mapper::new()).is_err());
        assert!(pages.is_empty());
        assert!(pages.by_name("bad").is_none());
    }

    #[test]
    fn test_find_reports_position() {
        let mut pages = Pages::new();
        pages.add_page("/posts", Some("posts"), Mapper::new()).unwrap();
        pages.add_page("/posts/:id", Some("post"), Mapper::new()).unwrap();

        let (index, raw) = pages.find("/posts/4").unwrap();
        assert_eq!(index, 1);
        assert_eq!(raw.get_str("id"), Some("4"));
        assert!(pages.find("/users").is_none());
    }

    #[test]
    fn test_builder_registers_child() {
        let mut pages = Pages::new();
        let posts = pages.page("/posts").name("posts").register().unwrap();
        let post = pages
            .child_page(&posts, "/:id")
            .name("post")
            .mapper(Mapper::new().integer("id"))
            .register()
            .unwrap();

        assert_eq!(post.template(), &posts.template().compose("/:id").unwrap());
        assert_eq!(pages.iter().map(|p| p.name()).collect::<Vec<_>>(), ["posts", "post"]);
    }
}
