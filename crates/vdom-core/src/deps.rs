use std::fmt;
use std::hash::Hash;

use crate::hash::hash_one;

/// Dependency list guarding an effect or memoized callback.
///
/// Each element is reduced to its hash when the list is built. Two lists are
/// equal when they have the same length and every element hash matches, so
/// an empty list never changes and `Always` never compares equal.
///
/// Elements are compared by value, not by identity: a freshly built `Vec`
/// with the same contents as last render counts as unchanged. Only `Hash`
/// types can be listed (wrap floats with `f64::to_bits`), and two distinct
/// values whose 64-bit hashes collide are taken as equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Deps {
    /// No list supplied: the guarded work runs on every render.
    #[default]
    Always,
    List(Vec<u64>),
}

impl Deps {
    pub fn always() -> Self {
        Deps::Always
    }

    /// Empty list: run once, on the first render.
    pub fn empty() -> Self {
        Deps::List(Vec::new())
    }

    pub fn with<T: Hash + ?Sized>(self, value: &T) -> Self {
        let mut hashes = match self {
            Deps::Always => Vec::new(),
            Deps::List(hashes) => hashes,
        };
        hashes.push(hash_one(value));
        Deps::List(hashes)
    }

    /// Whether moving from `self` (stored) to `next` must re-run the guarded work.
    pub fn changed(&self, next: &Deps) -> bool {
        match (self, next) {
            (Deps::List(previous), Deps::List(next)) => previous != next,
            _ => true,
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Deps::Always => None,
            Deps::List(hashes) => Some(hashes.len()),
        }
    }
}

/// Build a [`Deps::List`] from hashable values.
///
/// `deps![]` runs once; `deps![a, b]` re-runs whenever `a` or `b` changes.
#[macro_export]
macro_rules! deps {
    ($($dep:expr),* $(,)?) => {
        $crate::Deps::List(vec![$($crate::hash::hash_one(&$dep)),*])
    };
}

/// Teardown returned from an effect, run before the effect fires again.
#[derive(Default)]
pub struct Cleanup {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Cleanup {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_some(&self) -> bool {
        self.cleanup.is_some()
    }

    pub(crate) fn run(self) {
        if let Some(cleanup) = self.cleanup {
            cleanup();
        }
    }
}

impl From<()> for Cleanup {
    fn from(_: ()) -> Self {
        Self::none()
    }
}

// `FnOnce` is fundamental, so `()` above cannot overlap with this impl.
impl<F: FnOnce() + 'static> From<F> for Cleanup {
    fn from(cleanup: F) -> Self {
        Self::new(cleanup)
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanup")
            .field("present", &self.cleanup.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_lists_do_not_change() {
        assert!(!deps![1, "a"].changed(&deps![1, "a"]));
        assert!(!Deps::empty().changed(&deps![]));
    }

    #[test]
    fn differing_element_or_length_changes() {
        assert!(deps![1].changed(&deps![2]));
        assert!(deps![1].changed(&deps![1, 1]));
        assert!(deps![].changed(&deps![0]));
    }

    #[test]
    fn missing_list_always_changes() {
        assert!(Deps::Always.changed(&Deps::Always));
        assert!(deps![].changed(&Deps::always()));
        assert_eq!(Deps::always().len(), None);
    }

    #[test]
    fn fresh_collections_compare_by_value() {
        let previous = deps![vec![String::from("a")]];
        assert!(!previous.changed(&deps![vec![String::from("a")]]));
        assert!(previous.changed(&deps![vec![String::from("b")]]));
        assert!(!deps![1.5f64.to_bits()].changed(&deps![1.5f64.to_bits()]));
    }

    #[test]
    fn cleanup_presence() {
        assert!(!Cleanup::from(()).is_some());
        assert!(!Cleanup::none().is_some());
        let cleanup = Cleanup::from(|| {});
        assert!(cleanup.is_some());
        cleanup.run();
    }

    #[test]
    fn builder_matches_macro() {
        let built = Deps::empty().with(&1u8).with("x");
        assert_eq!(built, deps![1u8, "x"]);
    }
}
