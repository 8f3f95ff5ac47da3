//! Identity caches: one wrapper object per underlying host entity.
//!
//! # Design
//!
//! - [`IdentityCache`] maps a key to an `Arc` of the wrapper built for it.
//!   Repeated lookups return the same allocation, so `Arc::ptr_eq` is the
//!   identity test consumers rely on.
//! - Keys are host handles ([`ksp_ir::SyntaxId`], [`ksp_ir::DescriptorId`]),
//!   [`IdKey`] for host values that must be told apart by allocation, or
//!   small structural tuples for synthetic composites.
//! - Every cache lives in the [`CacheRegistry`] owned by one session. There
//!   is no global state; dropping or clearing the registry forgets every
//!   wrapper of that session.
//!
//! Wrapper constructors are pure given their key, so the wrapper is built
//! outside the lock and a losing racer simply drops its copy.

mod registry;

pub use registry::{CacheRegistry, CacheStats};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Keyed memo table returning one shared wrapper per key.
pub struct IdentityCache<K, V> {
    entries: RwLock<FxHashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash, V> IdentityCache<K, V> {
    pub fn new() -> Self {
        IdentityCache {
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// The wrapper cached for `key`, building and storing it on first use.
    pub fn get_or_put(&self, key: K, make: impl FnOnce() -> V) -> Arc<V> {
        if let Some(existing) = self.entries.read().get(&key) {
            return Arc::clone(existing);
        }

        let built = Arc::new(make());
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert(built))
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<K: Eq + Hash, V> Default for IdentityCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for IdentityCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("len", &self.entries.read().len())
            .finish()
    }
}

/// Cache key comparing an `Arc` by allocation rather than by value.
///
/// Holding the `Arc` keeps the allocation alive, so its address cannot be
/// reused by an unrelated value while the key is in a cache.
pub struct IdKey<T: ?Sized>(Arc<T>);

impl<T: ?Sized> IdKey<T> {
    pub fn new(value: &Arc<T>) -> Self {
        IdKey(Arc::clone(value))
    }

    pub fn get(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T: ?Sized> Clone for IdKey<T> {
    fn clone(&self) -> Self {
        IdKey(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for IdKey<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for IdKey<T> {}

impl<T: ?Sized> Hash for IdKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for IdKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdKey({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

#[cfg(test)]
mod tests;
