//! The inode-log wrapper (§4.1).
//!
//! A [`Node`] is nothing but a stable identity: the ref of its inode log.
//! Reading it fetches the tail of that log; mutating it appends. Prior
//! snapshots are retained — there is no in-place overwrite anywhere in
//! this crate.

use crate::backend::{ObjectStore, Ref};
use crate::error::{Error, Result};
use crate::inode::{InodeRecord, INODE_RECORD_SIZE};

/// A node bound to the ref of its inode log.
///
/// Cheap to copy and to pass around: it carries no cached inode state,
/// so two `Node`s for the same ref are always consistent with each other
/// (there is nothing to go stale).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    log_ref: Ref,
}

impl Node {
    pub fn new(log_ref: Ref) -> Self {
        Node { log_ref }
    }

    /// The ref of this node's inode log — its stable identity.
    pub fn log_ref(&self) -> Ref {
        self.log_ref
    }

    /// Reads the most recently appended inode snapshot.
    ///
    /// Fails with [`Error::NotFound`] if the log has no records yet.
    pub fn current_inode(&self, store: &dyn ObjectStore) -> Result<InodeRecord> {
        let bytes = store
            .fetch_tail(&self.log_ref, INODE_RECORD_SIZE)
            .map_err(|e| match e {
                Error::ObjectDoesNotExist => Error::NotFound,
                other => other,
            })?;
        InodeRecord::decode(&bytes)
    }

    /// Appends one inode snapshot. The backend serializes concurrent
    /// appends to the same log; whichever order they land in, every
    /// subsequent [`Node::current_inode`] observes the last one (§5).
    pub fn update(&self, store: &dyn ObjectStore, inode: &InodeRecord) -> Result<()> {
        store.append(&self.log_ref, inode.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryStore;
    use crate::inode::FileType;

    #[test]
    fn current_inode_on_fresh_log_is_not_found() {
        let store = MemoryStore::new();
        let node = Node::new(Ref::generate());
        assert!(matches!(node.current_inode(&store), Err(Error::NotFound)));
    }

    #[test]
    fn update_then_current_inode_sees_latest() {
        let store = MemoryStore::new();
        let node = Node::new(Ref::generate());
        let mut inode = InodeRecord::new(FileType::File, 0o644, 0, 0, (0, 0));
        node.update(&store, &inode).unwrap();
        inode.size = 42;
        node.update(&store, &inode).unwrap();

        let current = node.current_inode(&store).unwrap();
        assert_eq!(current.size, 42);
    }

    #[test]
    fn history_is_preserved_across_updates() {
        // Appends never overwrite; `fetch_tail` always reads the most
        // recent record regardless of how many came before it.
        let store = MemoryStore::new();
        let node = Node::new(Ref::generate());
        let inode = InodeRecord::new(FileType::File, 0o644, 0, 0, (0, 0));
        for i in 0..5u64 {
            let mut rec = inode;
            rec.size = i;
            node.update(&store, &rec).unwrap();
        }
        assert_eq!(node.current_inode(&store).unwrap().size, 4);
    }
}
