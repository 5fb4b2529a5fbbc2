//! Path templates: parsing, composing, formatting and matching
//!
//! A [`Template`] is the parsed form of a pattern such as `/users/:id/*`.
//!
//! # Grammar
//!
//! - Split on `/`; empty pieces are ignored (`/`, `""` and `//` all parse to
//!   the empty template, which formats as `/`)
//! - `:name` is a named parameter and binds one path segment
//! - `*` is a wildcard; it must be the last segment and absorbs zero or more
//!   remaining path segments without binding them
//! - Anything else is a literal, compared case-sensitively
//!
//! # Example
//!
//! ```
//! use page_navigator::{PageParams, Template};
//!
//! let template = Template::parse("/posts/:id")?;
//! assert_eq!(template.format(&PageParams::new().with("id", 11)), "/posts/11");
//!
//! let params = template.match_path("/posts/11").unwrap();
//! assert_eq!(params.get_str("id"), Some("11"));
//! # Ok::<(), page_navigator::NavigationError>(())
//! ```

use crate::error::NavigationError;
use crate::params::{PageParams, ParamValue};
use crate::trace_log;
use std::fmt;

/// Prefix marking a named-parameter segment.
pub const PARAM_MARKER: char = ':';

/// Segment marking the trailing wildcard.
pub const WILDCARD: &str = "*";

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the path segment exactly
    Literal(String),
    /// Binds the path segment under this name
    Param(String),
    /// Absorbs the rest of the path
    Wildcard,
}

/// Parsed, immutable path template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a pattern into a template.
    ///
    /// Fails with [`NavigationError::MalformedTemplate`] when a wildcard is
    /// not the final segment or a parameter has no name.
    pub fn parse(pattern: &str) -> Result<Self, NavigationError> {
        let pieces = split_path(pattern);
        let last = pieces.len().saturating_sub(1);
        let mut segments = Vec::with_capacity(pieces.len());

        for (i, piece) in pieces.into_iter().enumerate() {
            if is_wildcard_segment(piece) {
                if i != last {
                    return Err(NavigationError::malformed(
                        pattern,
                        "wildcard must be the last segment",
                    ));
                }
                segments.push(Segment::Wildcard);
            } else if let Some(name) = extract_param_name(piece) {
                if name.is_empty() {
                    return Err(NavigationError::malformed(pattern, "empty parameter name"));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(piece.to_string()));
            }
        }

        Ok(Self { segments })
    }

    /// Append the segments of `suffix` to this template.
    ///
    /// A template ending in a wildcard cannot be extended.
    ///
    /// ```
    /// use page_navigator::Template;
    ///
    /// let parent = Template::parse("/users/:id")?;
    /// let child = parent.compose("/posts/:number")?;
    /// assert_eq!(child.inspect(), "/users/:id/posts/:number");
    ///
    /// let catch_all = Template::parse("/*")?;
    /// assert!(catch_all.compose("/more").is_err());
    /// # Ok::<(), page_navigator::NavigationError>(())
    /// ```
    pub fn compose(&self, suffix: &str) -> Result<Self, NavigationError> {
        if self.has_wildcard() {
            return Err(NavigationError::malformed(
                &format!("{}{}", self.inspect(), suffix),
                "cannot compose onto a wildcard-terminated template",
            ));
        }

        let tail = Template::parse(suffix)?;
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }

    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Return `true` if the template ends in a wildcard.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// Names of the parameter segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Render a concrete path.
    ///
    /// Parameters missing from `params` are left out of the path rather than
    /// reported; the wildcard renders nothing. Use
    /// [`try_format`](Self::try_format) to reject missing parameters.
    pub fn format(&self, params: &PageParams) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    path.push('/');
                    path.push_str(literal);
                }
                Segment::Param(name) => {
                    if let Some(value) = params.get(name) {
                        path.push('/');
                        path.push_str(&value.to_string());
                    }
                }
                Segment::Wildcard => {}
            }
        }

        if path.is_empty() {
            path.push('/');
        }
        path
    }

    /// Render a concrete path, failing on the first missing parameter.
    pub fn try_format(&self, params: &PageParams) -> Result<String, NavigationError> {
        if let Some(missing) = self.param_names().find(|name| !params.contains(name)) {
            return Err(NavigationError::MissingParam {
                name: missing.to_string(),
                template: self.inspect(),
            });
        }
        Ok(self.format(params))
    }

    /// Match a concrete path, returning the raw parameter strings.
    ///
    /// Segment counts must agree unless the template ends in a wildcard.
    pub fn match_path(&self, path: &str) -> Option<PageParams> {
        let parts = split_path(path);
        let mut params = PageParams::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Literal(literal) => {
                    if parts.get(i) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(i)?;
                    params.insert(name.clone(), ParamValue::from(*value));
                }
            }
        }

        if parts.len() == self.segments.len() {
            Some(params)
        } else {
            trace_log!(
                "'{}' has {} segments, template '{}' needs {}",
                path,
                parts.len(),
                self,
                self.segments.len()
            );
            None
        }
    }

    /// Canonical string form; equal templates give equal strings.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => write!(f, "/{}", literal)?,
                Segment::Param(name) => write!(f, "/{}{}", PARAM_MARKER, name)?,
                Segment::Wildcard => write!(f, "/{}", WILDCARD)?,
            }
        }
        Ok(())
    }
}

/// Split a path into segments, filtering empty segments
///
/// # Examples
///
/// ```
/// use page_navigator::template::split_path;
///
/// assert_eq!(split_path("/users/123"), vec!["users", "123"]);
/// assert_eq!(split_path("/users/"), vec!["users"]);
/// assert!(split_path("/").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Extract parameter name from a pattern segment
///
/// # Examples
///
/// ```
/// use page_navigator::template::extract_param_name;
///
/// assert_eq!(extract_param_name(":id"), Some("id"));
/// assert_eq!(extract_param_name("users"), None);
/// ```
pub fn extract_param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(PARAM_MARKER)
}

/// Check if a pattern segment is the wildcard
pub fn is_wildcard_segment(segment: &str) -> bool {
    segment == WILDCARD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PageParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/users/123"), vec!["users", "123"]);
        assert_eq!(split_path("/"), Vec::<&str>::new());
        assert_eq!(split_path(""), Vec::<&str>::new());
        assert_eq!(split_path("users/123/"), vec!["users", "123"]);
    }

    #[test]
    fn test_extract_param_name() {
        assert_eq!(extract_param_name(":id"), Some("id"));
        assert_eq!(extract_param_name(":userId"), Some("userId"));
        assert_eq!(extract_param_name("users"), None);
        assert_eq!(extract_param_name(""), None);
    }

    #[test]
    fn test_is_wildcard_segment() {
        assert!(is_wildcard_segment("*"));
        assert!(!is_wildcard_segment("*path"));
        assert!(!is_wildcard_segment(":id"));
    }

    #[test]
    fn test_parse_segments() {
        let template = Template::parse("/users/:id/*").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("users".to_string()),
                Segment::Param("id".to_string()),
                Segment::Wildcard,
            ]
        );
        assert!(template.has_wildcard());
    }

    #[test]
    fn test_parse_root_variants() {
        for pattern in ["/", "", "//"] {
            let template = Template::parse(pattern).unwrap();
            assert!(template.segments().is_empty());
            assert_eq!(template.inspect(), "/");
        }
    }

    #[test]
    fn test_wildcard_must_be_last() {
        let err = Template::parse("/*/posts").unwrap_err();
        assert!(matches!(err, NavigationError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_empty_param_name_rejected() {
        assert!(Template::parse("/users/:").is_err());
    }

    #[test]
    fn test_duplicate_param_names_allowed() {
        let template = Template::parse("/:a/:a").unwrap();
        let matched = template.match_path("/x/y").unwrap();
        assert_eq!(matched.get_str("a"), Some("y"));
    }

    #[test]
    fn test_compose_onto_wildcard_fails() {
        let parent = Template::parse("/posts/*").unwrap();
        assert!(parent.compose("/:id").is_err());
        assert!(parent.compose("/").is_err());
    }

    #[test]
    fn test_format_literals_and_params() {
        let template = Template::parse("/:a/:b").unwrap();
        let p = PageParams::new().with("a", "posts").with("b", 3);
        assert_eq!(template.format(&p), "/posts/3");
    }

    #[test]
    fn test_format_missing_param_is_absent() {
        let template = Template::parse("/posts/:id").unwrap();
        assert_eq!(template.format(&PageParams::new()), "/posts");
    }

    #[test]
    fn test_try_format_missing_param() {
        let template = Template::parse("/posts/:id").unwrap();
        let err = template.try_format(&PageParams::new()).unwrap_err();
        assert_eq!(
            err,
            NavigationError::MissingParam {
                name: "id".to_string(),
                template: "/posts/:id".to_string(),
            }
        );
        assert_eq!(
            template.try_format(&params(&[("id", "9")])).unwrap(),
            "/posts/9"
        );
    }

    #[test]
    fn test_format_wildcard_renders_nothing() {
        let template = Template::parse("/posts/:number/*").unwrap();
        let p = PageParams::new().with("number", 3);
        assert_eq!(template.format(&p), "/posts/3");
        assert_eq!(Template::parse("/*").unwrap().format(&p), "/");
    }

    #[test]
    fn test_match_exact_literal() {
        let template = Template::parse("/users/list").unwrap();
        assert_eq!(template.match_path("/users/list"), Some(PageParams::new()));
        assert_eq!(template.match_path("/users/create"), None);
        assert_eq!(template.match_path("/Users/list"), None);
    }

    #[test]
    fn test_match_counts_must_agree() {
        let template = Template::parse("/users/:id").unwrap();
        assert_eq!(template.match_path("/users"), None);
        assert_eq!(template.match_path("/users/3/posts"), None);
    }

    #[test]
    fn test_match_wildcard_suffix() {
        let template = Template::parse("/posts/:number/*").unwrap();
        assert_eq!(
            template.match_path("/posts/3/something/else"),
            Some(params(&[("number", "3")]))
        );
        assert_eq!(
            template.match_path("/posts/3"),
            Some(params(&[("number", "3")]))
        );
        assert_eq!(template.match_path("/comments/3/x"), None);
    }

    #[test]
    fn test_match_root() {
        let template = Template::parse("/").unwrap();
        assert_eq!(template.match_path("/"), Some(PageParams::new()));
        assert_eq!(template.match_path("/posts"), None);
    }

    #[test]
    fn test_inspect_is_structural() {
        let a = Template::parse("/users/:id").unwrap();
        let b = Template::parse("users//:id/").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.inspect(), b.inspect());
        assert_eq!(a.inspect(), "/users/:id");
    }
}
