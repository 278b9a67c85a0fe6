//! Positional path parameters.

use std::ops::Index;

/// Values captured by a route's placeholders, in left-to-right template order.
///
/// Placeholder names are not kept: `/users/{id}/posts/{post}` matched against
/// `/users/7/posts/9` yields `["7", "9"]`, and the handler reads them by
/// position.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Params(Vec<String>);

impl Params {
    pub(crate) fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// The `index`-th captured value, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> { self.0 }
}

/// Panics when `index` is out of range, like slice indexing.
impl Index<usize> for Params {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}
