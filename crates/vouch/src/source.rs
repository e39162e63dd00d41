//! The ordered list of candidate sources and its two markers.
//!
//! A list is consumed from the front. Besides locators it may hold:
//!
//! - [`Source::Trust`]: accept the locator it follows without checking its
//!   digest. A leading trust marker applies to the first locator after it.
//! - [`Source::Stop`]: stop here without reporting an error.
//!
//! Running out of entries without reaching a stop marker is
//! [`Next::Exhausted`], which callers must surface as an error.

use std::collections::VecDeque;
use std::fmt;

/// One entry of a [`SourceList`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// An opaque locator handed to the transport.
    Locator(String),
    /// Trust-override marker. Encoded as the empty string.
    Trust,
    /// Silent-stop marker. Has no string encoding.
    Stop,
}

impl Source {
    pub fn locator(locator: impl Into<String>) -> Self { Self::Locator(locator.into()) }

    pub fn is_marker(&self) -> bool { !matches!(self, Self::Locator(_)) }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        if s.is_empty() { Self::Trust } else { Self::Locator(s.to_string()) }
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        if s.is_empty() { Self::Trust } else { Self::Locator(s) }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locator(locator) => f.write_str(locator),
            Self::Trust => f.write_str("<trust>"),
            Self::Stop => f.write_str("<stop>"),
        }
    }
}

/// A locator ready to be attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub locator: String,
    /// Skip digest verification for this locator.
    pub trusted: bool,
}

/// Result of inspecting the head of a [`SourceList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Stop,
    Exhausted,
    Attempt(Candidate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
    items: VecDeque<Source>,
}

impl SourceList {
    pub fn new() -> Self { Self::default() }

    /// Append a locator. An empty string appends a trust marker.
    #[must_use]
    pub fn source(mut self, locator: impl Into<String>) -> Self {
        self.items.push_back(Source::from(locator.into()));
        self
    }

    /// Trust the preceding locator regardless of its digest.
    #[must_use]
    pub fn trust(mut self) -> Self {
        self.items.push_back(Source::Trust);
        self
    }

    /// End the list silently.
    #[must_use]
    pub fn stop(mut self) -> Self {
        self.items.push_back(Source::Stop);
        self
    }

    pub fn push(&mut self, source: impl Into<Source>) { self.items.push_back(source.into()); }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Source> { self.items.iter() }

    /// Consume the head of the list.
    ///
    /// Trust markers directly after a locator are consumed with it and mark it
    /// trusted, so they can never leak onto the next locator.
    pub fn next(&mut self) -> Next {
        let mut trusted = false;
        loop {
            match self.items.pop_front() {
                None => return Next::Exhausted,
                Some(Source::Stop) => return Next::Stop,
                Some(Source::Trust) => trusted = true,
                Some(Source::Locator(locator)) => {
                    while self.items.front() == Some(&Source::Trust) {
                        self.items.pop_front();
                        trusted = true;
                    }
                    return Next::Attempt(Candidate { locator, trusted });
                }
            }
        }
    }

    /// Whether another locator can still be reached, i.e. one remains before
    /// any stop marker.
    pub fn has_further_source(&self) -> bool {
        self.items
            .iter()
            .take_while(|s| **s != Source::Stop)
            .any(|s| matches!(s, Source::Locator(_)))
    }

    /// Swap the head with another locator inside the leading `window`, e.g.
    /// to spread cache warm-up over mirrors.
    ///
    /// `pick` receives the number of eligible positions and returns the index
    /// to swap with. The eligible window is the leading run of locators that
    /// have no trust marker attached, so markers never move and never change
    /// which locator they apply to. Returns `true` if the order changed.
    pub fn prime(&mut self, window: usize, pick: impl FnOnce(usize) -> usize) -> bool {
        let eligible = self.priming_window(window);
        if eligible < 2 {
            return false;
        }
        let index = pick(eligible);
        if index == 0 || index >= eligible {
            return false;
        }
        self.items.swap(0, index);
        true
    }

    fn priming_window(&self, window: usize) -> usize {
        let mut eligible = 0;
        for (i, item) in self.items.iter().enumerate().take(window) {
            let attached_trust = self.items.get(i + 1) == Some(&Source::Trust);
            if item.is_marker() || attached_trust {
                break;
            }
            eligible += 1;
        }
        eligible
    }
}

impl<S: Into<Source>> FromIterator<S> for SourceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<Source>> From<Vec<S>> for SourceList {
    fn from(items: Vec<S>) -> Self { items.into_iter().collect() }
}

impl<S: Into<Source>, const N: usize> From<[S; N]> for SourceList {
    fn from(items: [S; N]) -> Self { items.into_iter().collect() }
}

impl fmt::Display for SourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn attempt(locator: &str, trusted: bool) -> Next {
        Next::Attempt(Candidate {
            locator: locator.to_string(),
            trusted,
        })
    }

    #[test]
    fn test_empty_string_is_trust_marker() {
        assert_eq!(Source::from(""), Source::Trust);
        assert_eq!(Source::from("a"), Source::locator("a"));
        assert_eq!(SourceList::new().source("").iter().next(), Some(&Source::Trust));
    }

    #[test]
    fn test_next_plain_sequence() {
        let mut list = SourceList::from(vec!["a", "b"]);
        assert_eq!(list.next(), attempt("a", false));
        assert_eq!(list.next(), attempt("b", false));
        assert_eq!(list.next(), Next::Exhausted);
        assert_eq!(list.next(), Next::Exhausted);
    }

    #[test]
    fn test_trailing_trust_applies_to_previous() {
        let mut list = SourceList::from(vec!["a", "", "b"]);
        assert_eq!(list.next(), attempt("a", true));
        assert_eq!(list.next(), attempt("b", false));
    }

    #[test]
    fn test_leading_trust_applies_to_upcoming() {
        let mut list = SourceList::from(vec!["", "", "a", "b"]);
        assert_eq!(list.next(), attempt("a", true));
        assert_eq!(list.next(), attempt("b", false));
    }

    #[test]
    fn test_stop_marker() {
        let mut list = SourceList::new().source("a").stop().source("b");
        assert_eq!(list.next(), attempt("a", false));
        assert_eq!(list.next(), Next::Stop);
    }

    #[test]
    fn test_empty_list_is_exhausted() {
        assert_eq!(SourceList::new().next(), Next::Exhausted);
        assert_eq!(SourceList::new().trust().next(), Next::Exhausted);
    }

    #[test]
    fn test_has_further_source() {
        assert!(SourceList::from(vec!["b"]).has_further_source());
        assert!(SourceList::from(vec!["", "b"]).has_further_source());
        assert!(!SourceList::new().has_further_source());
        assert!(!SourceList::new().trust().has_further_source());
        assert!(!SourceList::new().stop().source("b").has_further_source());
    }

    #[test]
    fn test_prime_swaps_within_window() {
        let mut list = SourceList::from(vec!["a", "b", "c", "d"]);
        assert!(list.prime(3, |n| {
            assert_eq!(n, 3);
            2
        }));
        assert_eq!(list.to_string(), "[c, b, a, d]");
    }

    #[test]
    fn test_prime_never_crosses_markers() {
        let mut list = SourceList::new().source("a").source("b").trust().source("c");
        // "b" carries a trust marker, so only "a" is eligible.
        assert!(!list.prime(4, |_| 1));
        assert_eq!(list.to_string(), "[a, b, <trust>, c]");

        let mut list = SourceList::new().source("a").stop().source("b");
        assert!(!list.prime(3, |_| 2));
    }

    #[test]
    fn test_prime_rejects_out_of_range_pick() {
        let mut list = SourceList::from(vec!["a", "b"]);
        assert!(!list.prime(2, |_| 5));
        assert!(!list.prime(2, |_| 0));
        assert_eq!(list.to_string(), "[a, b]");
    }

    fn arb_source() -> impl Strategy<Value = Source> {
        prop_oneof![
            4 => "[a-e]".prop_map(Source::Locator),
            1 => Just(Source::Trust),
            1 => Just(Source::Stop),
        ]
    }

    proptest! {
        #[test]
        fn prop_traversal_terminates_once(items in prop::collection::vec(arb_source(), 0..16)) {
            let locators = items.iter().filter(|s| !s.is_marker()).count();
            let mut list: SourceList = items.clone().into_iter().collect();
            let mut attempts = 0;
            let terminal = loop {
                match list.next() {
                    Next::Attempt(_) => attempts += 1,
                    other => break other,
                }
            };
            prop_assert!(attempts <= locators);
            let stop_reached = items
                .iter()
                .filter(|s| **s != Source::Trust)
                .nth(attempts)
                .is_some_and(|s| *s == Source::Stop);
            prop_assert_eq!(terminal == Next::Stop, stop_reached);
        }

        #[test]
        fn prop_prime_keeps_markers_in_place(
            items in prop::collection::vec(arb_source(), 0..16),
            window in 0usize..8,
            pick in 0usize..8,
        ) {
            let mut list: SourceList = items.clone().into_iter().collect();
            list.prime(window, |_| pick);
            let after: Vec<Source> = list.iter().cloned().collect();
            prop_assert_eq!(after.len(), items.len());
            for (before, after) in items.iter().zip(&after) {
                prop_assert_eq!(before.is_marker(), after.is_marker());
                if before.is_marker() {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }
}
