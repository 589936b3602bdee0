//! Immutable symbol sequences.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::types::Symbol;

/// An ordered, finite, immutable list of symbols.
///
/// Two sequences with the same symbols in the same order are
/// interchangeable; cloning shares the underlying buffer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Sequence<T: Symbol> {
    symbols: Arc<[T]>,
}

impl<T: Symbol> Sequence<T> {
    /// Build a sequence from any symbol iterator
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            symbols: tokens.into_iter().collect(),
        }
    }

    /// The symbols as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.symbols
    }
}

impl Sequence<char> {
    /// Build a character sequence from a string
    pub fn from_chars(text: &str) -> Self {
        Self::from_tokens(text.chars())
    }
}

impl Sequence<String> {
    /// Build a token sequence by splitting on whitespace
    pub fn from_whitespace(text: &str) -> Self {
        Self::from_tokens(text.split_whitespace().map(str::to_string))
    }
}

impl<T: Symbol> Deref for Sequence<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.symbols
    }
}

impl<T: Symbol> AsRef<[T]> for Sequence<T> {
    fn as_ref(&self) -> &[T] {
        &self.symbols
    }
}

impl<T: Symbol> From<Vec<T>> for Sequence<T> {
    fn from(symbols: Vec<T>) -> Self {
        Self {
            symbols: symbols.into(),
        }
    }
}

impl From<&str> for Sequence<char> {
    fn from(text: &str) -> Self {
        Self::from_chars(text)
    }
}

impl<T: Symbol> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.symbols.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chars() {
        let seq = Sequence::from_chars("gatta");
        assert_eq!(seq.len(), 5);
        assert_eq!(seq[0], 'g');
        assert_eq!(seq.as_slice(), &['g', 'a', 't', 't', 'a']);
    }

    #[test]
    fn test_from_whitespace() {
        let seq = Sequence::from_whitespace("the  dog   barks");
        assert_eq!(seq.as_slice(), &["the", "dog", "barks"]);
    }

    #[test]
    fn test_content_identity() {
        let a = Sequence::from_chars("bar");
        let b: Sequence<char> = vec!['b', 'a', 'r'].into();
        assert_eq!(a, b);
        assert_ne!(a, Sequence::from("bat"));
    }

    #[test]
    fn test_empty_sequence() {
        let seq = Sequence::from_chars("");
        assert!(seq.is_empty());
        assert_eq!(format!("{:?}", seq), "[]");
    }
}
