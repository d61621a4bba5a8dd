//! Hashing behind the child cache and dependency lists.
//!
//! `hashbrown` with `ahash` by default; the `std-hash` feature switches both to
//! the standard library.

use std::hash::{Hash, Hasher};

#[cfg(not(feature = "std-hash"))]
pub type ChildMap<V> = hashbrown::HashMap<String, V>;
#[cfg(feature = "std-hash")]
pub type ChildMap<V> = std::collections::HashMap<String, V>;

#[cfg(not(feature = "std-hash"))]
fn dependency_hasher() -> ahash::AHasher {
    ahash::AHasher::default()
}

#[cfg(feature = "std-hash")]
fn dependency_hasher() -> std::collections::hash_map::DefaultHasher {
    std::collections::hash_map::DefaultHasher::new()
}

/// Reduce one dependency value to the hash stored in a [`Deps`](crate::Deps) list.
///
/// Both hashers use fixed keys, so a value hashes the same way on every render
/// of the process.
#[inline]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = dependency_hasher();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_hash_equal() {
        assert_eq!(hash_one("abc"), hash_one(&String::from("abc")));
        assert_eq!(hash_one(&vec![1, 2]), hash_one(&vec![1, 2]));
        assert_ne!(hash_one(&1u32), hash_one(&2u32));
    }
}
