//! Key paths for diagnostics.
//!
//! A [`KeyPath`] names a location inside a document as a sequence of
//! [`PathStep`]s. It renders the way a TOML header would spell it: steps are
//! joined with `.`, and a key that is not a valid bare key is wrapped in
//! double quotes.
//!
//! ```rust
//! use typed_toml::{render_path, KeyPath};
//!
//! assert_eq!(render_path(["foo", "bar"]), "foo.bar");
//! assert_eq!(render_path(["foo", "hello world"]), r#"foo."hello world""#);
//!
//! let path = KeyPath::from(["project", "keywords"]);
//! assert_eq!(path.indexed(0), "project.keywords[0]");
//! ```

use std::fmt;

/// One step of a [`KeyPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<&String> for PathStep {
    fn from(key: &String) -> Self {
        PathStep::Key(key.clone())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) if is_bare_key(key) => f.write_str(key),
            PathStep::Key(key) => write!(f, "\"{}\"", key),
            PathStep::Index(index) => write!(f, "{}", index),
        }
    }
}

/// An immutable sequence of path steps.
///
/// Extending a path with [`KeyPath::join`] returns a new path and leaves the
/// original untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    steps: Vec<PathStep>,
}

impl KeyPath {
    /// The empty path, which names the document root.
    #[must_use]
    pub fn root() -> Self {
        KeyPath::default()
    }

    /// Returns a new path with `step` appended.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::KeyPath;
    ///
    /// let project = KeyPath::from(["project"]);
    /// let urls = project.join("urls");
    /// assert_eq!(project.to_string(), "project");
    /// assert_eq!(urls.to_string(), "project.urls");
    /// ```
    #[must_use]
    pub fn join<S: Into<PathStep>>(&self, step: S) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step.into());
        KeyPath { steps }
    }

    /// Renders the path with a trailing `[idx]`, the form used for array elements.
    #[must_use]
    pub fn indexed(&self, idx: usize) -> String {
        format!("{}[{}]", self, idx)
    }

    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The final step, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl<S: Into<PathStep>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        KeyPath {
            steps: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<PathStep>, const N: usize> From<[S; N]> for KeyPath {
    fn from(steps: [S; N]) -> Self {
        steps.into_iter().collect()
    }
}

impl<S: Into<PathStep>> From<Vec<S>> for KeyPath {
    fn from(steps: Vec<S>) -> Self {
        steps.into_iter().collect()
    }
}

/// Renders a sequence of steps as a dotted path.
///
/// # Examples
///
/// ```rust
/// use typed_toml::render_path;
///
/// assert_eq!(render_path(["foo"]), "foo");
/// assert_eq!(render_path(vec!["foo", "bar"]), "foo.bar");
/// assert_eq!(render_path(["foo", "hello world"].iter().copied()), r#"foo."hello world""#);
/// ```
pub fn render_path<I, S>(steps: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<PathStep>,
{
    steps.into_iter().collect::<KeyPath>().to_string()
}

/// Returns `true` if `key` can be written without quotes.
#[inline]
pub(crate) fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
