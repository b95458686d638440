//! The path resolver and POSIX operation surface (§4.2–§4.9).
//!
//! [`Filesystem`] is the one long-lived value a process mounts once and
//! then passes by shared reference into every operation (§9,
//! "process-wide filesystem handle") — there is no hidden global and no
//! state cached across calls (§5).

pub mod ops;
pub mod resolve;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::{ObjectStore, Ref};
use crate::config::MountConfig;
use crate::dirent;
use crate::error::Result;
use crate::inode::{FileType, InodeRecord};
use crate::node::Node;
use crate::perm::Caller;

/// Stat information returned by [`Filesystem::getattr`]/`fgetattr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attr {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub nlink: u32,
    pub blocks: u64,
    pub atime: (i64, u32),
    pub mtime: (i64, u32),
    pub ctime: (i64, u32),
    pub file_type: FileType,
}

impl From<InodeRecord> for Attr {
    fn from(inode: InodeRecord) -> Self {
        Attr {
            mode: inode.mode,
            uid: inode.uid,
            gid: inode.gid,
            size: inode.size,
            nlink: inode.nlink,
            blocks: inode.blocks(),
            atime: (inode.atime_sec, inode.atime_nsec),
            mtime: (inode.mtime_sec, inode.mtime_nsec),
            ctime: (inode.ctime_sec, inode.ctime_nsec),
            file_type: inode.file_type().unwrap_or(FileType::File),
        }
    }
}

pub(crate) fn now() -> (i64, u32) {
    let d = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    (d.as_secs() as i64, d.subsec_nanos())
}

/// The mounted filesystem: a backend handle plus the ref of its root
/// inode log.
pub struct Filesystem<S: ObjectStore> {
    store: S,
    root: Ref,
}

impl<S: ObjectStore> Filesystem<S> {
    /// Mounts `store` under `config`.
    ///
    /// If the root log's tail read fails (first mount against this
    /// prefix), writes an empty directory blob and an initial `DIR`
    /// inode owned by `caller`, then appends it (§3.6).
    pub fn mount(store: S, config: &MountConfig, caller: Caller) -> Result<Self> {
        let root = config.root_log_ref();
        let root_node = Node::new(root);
        match root_node.current_inode(&store) {
            Ok(_) => {}
            Err(crate::error::Error::NotFound) => {
                log::debug!("mounting fresh filesystem at root prefix {:?}", config.root_prefix);
                let dir_ref = Ref::generate();
                store.store(&dir_ref, &dirent::encode(&[]))?;

                let mut inode = InodeRecord::new(FileType::Dir, config.root_mode, caller.uid, caller.gid, now());
                inode.nlink = 1;
                inode.set_data_ref(dir_ref);
                root_node.update(&store, &inode)?;
            }
            Err(e) => return Err(e),
        }
        Ok(Filesystem { store, root })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn root(&self) -> Ref {
        self.root
    }

    pub fn getattr(&self, path: &str, caller: Caller) -> Result<Attr> {
        ops::attr::getattr(self, path, caller)
    }

    pub fn access(&self, path: &str, caller: Caller, mode: u32) -> Result<()> {
        ops::attr::access(self, path, caller, mode)
    }

    pub fn chmod(&self, path: &str, caller: Caller, mode: u32) -> Result<()> {
        ops::attr::chmod(self, path, caller, mode)
    }

    pub fn chown(&self, path: &str, caller: Caller, uid: Option<u32>, gid: Option<u32>) -> Result<()> {
        ops::attr::chown(self, path, caller, uid, gid)
    }

    pub fn utimens(&self, path: &str, caller: Caller, atime: (i64, u32), mtime: (i64, u32)) -> Result<()> {
        ops::attr::utimens(self, path, caller, atime, mtime)
    }

    pub fn read(&self, path: &str, caller: Caller, size: usize, offset: u64) -> Result<Vec<u8>> {
        ops::data::read(self, path, caller, size, offset)
    }

    pub fn write(&self, path: &str, caller: Caller, buf: &[u8], offset: u64) -> Result<usize> {
        ops::data::write(self, path, caller, buf, offset)
    }

    pub fn truncate(&self, path: &str, caller: Caller, size: u64) -> Result<()> {
        ops::data::truncate(self, path, caller, size)
    }

    pub fn create(&self, path: &str, caller: Caller, mode: u32) -> Result<()> {
        ops::dir::create(self, path, caller, mode)
    }

    pub fn mkdir(&self, path: &str, caller: Caller, mode: u32) -> Result<()> {
        ops::dir::mkdir(self, path, caller, mode)
    }

    pub fn symlink(&self, target: &str, linkpath: &str, caller: Caller) -> Result<()> {
        ops::dir::symlink(self, target, linkpath, caller)
    }

    pub fn link(&self, existing: &str, newpath: &str, caller: Caller) -> Result<()> {
        ops::dir::link(self, existing, newpath, caller)
    }

    pub fn unlink(&self, path: &str, caller: Caller) -> Result<()> {
        ops::dir::unlink(self, path, caller)
    }

    pub fn rmdir(&self, path: &str, caller: Caller) -> Result<()> {
        ops::dir::rmdir(self, path, caller)
    }

    pub fn readlink(&self, path: &str, caller: Caller, buf_size: usize) -> Result<Vec<u8>> {
        ops::dir::readlink(self, path, caller, buf_size)
    }

    pub fn readdir(&self, path: &str, caller: Caller) -> Result<Vec<String>> {
        ops::dir::readdir(self, path, caller)
    }

    pub fn rename(&self, source: &str, dest: &str, caller: Caller) -> Result<()> {
        ops::rename::rename(self, source, dest, caller)
    }

    pub fn getxattr(&self, path: &str, caller: Caller, name: &str, val_size: usize) -> Result<Vec<u8>> {
        ops::xattr::getxattr(self, path, caller, name, val_size)
    }

    pub fn setxattr(&self, path: &str, caller: Caller, name: &str, value: &[u8]) -> Result<()> {
        ops::xattr::setxattr(self, path, caller, name, value)
    }

    pub fn removexattr(&self, path: &str, caller: Caller, name: &str) -> Result<()> {
        ops::xattr::removexattr(self, path, caller, name)
    }

    pub fn listxattr(&self, path: &str, caller: Caller) -> Result<Vec<String>> {
        ops::xattr::listxattr(self, path, caller)
    }

    pub fn fsync(&self) -> Result<()> {
        ops::misc::fsync()
    }

    pub fn flush(&self) -> Result<()> {
        ops::misc::flush()
    }

    pub fn lock(&self, cmd: ops::misc::LockCommand) -> Result<()> {
        ops::misc::lock(cmd)
    }

    pub fn statfs(&self) -> Result<ops::misc::StatFs> {
        ops::misc::statfs()
    }
}
