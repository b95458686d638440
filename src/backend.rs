//! The object-store contract this crate is built on top of (§6.1).
//!
//! The store itself — network transport, on-disk layout, replication —
//! is an external collaborator. This module only pins down the shape of
//! that collaborator: an opaque 32-byte [`Ref`] and the four primitives
//! ([`ObjectStore::store`], [`ObjectStore::fetch`],
//! [`ObjectStore::fetch_tail`], [`ObjectStore::append`]) the rest of the
//! crate is written against.

use crate::error::{Error, Result};

/// A 32-byte opaque identifier assigned by the object store.
///
/// Equality and ordering are byte-wise. Every on-disk pointer between
/// entities (inode logs, directory entries, inode `data_ref`/`xattr_ref`)
/// is a `Ref`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ref(pub [u8; 32]);

impl Ref {
    /// The all-zero ref, used by directories and symlinks created via
    /// `mkdir`/`symlink` to mean "no xattrs".
    pub const ZERO: Ref = Ref([0u8; 32]);

    /// Generates a fresh ref, unique with overwhelming probability.
    ///
    /// Refs are assigned by the caller, not the store (§6.1): this is
    /// what every mutating operation calls before a `store`/`append` to
    /// mint the ref it writes to.
    pub fn generate() -> Ref {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        bytes[16..].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        Ref(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Debug for Ref {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Ref(")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "…)")
    }
}

/// The backend collaborator: an immutable blob store keyed by [`Ref`],
/// plus one append-only log per ref.
///
/// Implementations are expected to be cheap to share (`Send + Sync`):
/// the core holds no long-lived handle of its own and calls through a
/// shared reference on every operation (§5).
pub trait ObjectStore: Send + Sync {
    /// Writes an immutable blob at `r`. Fresh refs are unique, so this is
    /// idempotent at the caller's discretion.
    fn store(&self, r: &Ref, bytes: &[u8]) -> Result<()>;

    /// Reads the whole blob at `r`.
    ///
    /// Fails with [`Error::ObjectDoesNotExist`] if `r` has no content.
    fn fetch(&self, r: &Ref) -> Result<Vec<u8>>;

    /// Reads the last `n` bytes of the append-only log keyed by `r`.
    ///
    /// Fails with [`Error::ObjectDoesNotExist`] for an empty (never
    /// appended) log.
    fn fetch_tail(&self, r: &Ref, n: usize) -> Result<Vec<u8>>;

    /// Atomically appends `bytes` to the log keyed by `r`.
    fn append(&self, r: &Ref, bytes: &[u8]) -> Result<()>;
}

/// An in-memory reference [`ObjectStore`], used by this crate's own tests
/// and suitable as a starting point for exercising a [`crate::fs::Filesystem`]
/// without a real network-backed store.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A single ref is either an immutable blob or an append-only log
    /// depending only on how its caller chooses to use it — `store`
    /// resets its content, `append` grows it, `fetch`/`fetch_tail` both
    /// read from the same growable byte sequence. Inode logs only ever
    /// see `append`/`fetch_tail`; data, directory, and xattr blobs are
    /// usually `store`d fresh but a file's data blob may also be grown
    /// with `append` by the offset-equals-size fast path in `write`.
    #[derive(Default)]
    struct State {
        objects: HashMap<[u8; 32], Vec<u8>>,
    }

    /// A process-local, mutex-guarded object store backed by one hash map.
    #[derive(Default)]
    pub struct MemoryStore {
        state: Mutex<State>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl ObjectStore for MemoryStore {
        fn store(&self, r: &Ref, bytes: &[u8]) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.objects.insert(r.0, bytes.to_vec());
            Ok(())
        }

        fn fetch(&self, r: &Ref) -> Result<Vec<u8>> {
            let state = self.state.lock().unwrap();
            state.objects.get(&r.0).cloned().ok_or(Error::ObjectDoesNotExist)
        }

        fn fetch_tail(&self, r: &Ref, n: usize) -> Result<Vec<u8>> {
            let state = self.state.lock().unwrap();
            let object = state.objects.get(&r.0).ok_or(Error::ObjectDoesNotExist)?;
            if object.len() < n {
                return Err(Error::ObjectDoesNotExist);
            }
            Ok(object[object.len() - n..].to_vec())
        }

        fn append(&self, r: &Ref, bytes: &[u8]) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.objects.entry(r.0).or_default().extend_from_slice(bytes);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn fetch_tail_on_empty_log_is_not_found() {
            let store = MemoryStore::new();
            let r = Ref::generate();
            assert!(matches!(store.fetch_tail(&r, 8), Err(Error::ObjectDoesNotExist)));
        }

        #[test]
        fn append_then_fetch_tail_returns_last_record() {
            let store = MemoryStore::new();
            let r = Ref::generate();
            store.append(&r, &[1, 2, 3, 4]).unwrap();
            store.append(&r, &[5, 6, 7, 8]).unwrap();
            assert_eq!(store.fetch_tail(&r, 4).unwrap(), vec![5, 6, 7, 8]);
        }

        #[test]
        fn store_and_fetch_roundtrip() {
            let store = MemoryStore::new();
            let r = Ref::generate();
            store.store(&r, b"hello").unwrap();
            assert_eq!(store.fetch(&r).unwrap(), b"hello");
        }
    }
}
