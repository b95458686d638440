//! `create`, `mkdir`, `symlink`, `link`, `unlink`, `rmdir`, `readlink`,
//! `readdir` (§4.5).

use crate::backend::{ObjectStore, Ref};
use crate::dirent::{self, DirEntry};
use crate::error::{Error, Result};
use crate::fs::{now, Filesystem};
use crate::inode::{FileType, InodeRecord};
use crate::node::Node;
use crate::perm::{self, mask, Caller};
use crate::xattr;

use super::super::resolve;

const MAX_NAME_LEN: usize = 4096;

/// Rewrites `parent`'s directory blob to `entries`, publishing a fresh
/// data ref and appending the updated parent inode. Shared by every
/// directory mutation (§4.5, "all directory mutations share a rewrite
/// pattern").
pub(super) fn publish_dir<S: ObjectStore>(fs: &Filesystem<S>, parent: &Node, mut inode: InodeRecord, entries: &[DirEntry]) -> Result<()> {
    let bytes = dirent::encode(entries);
    let fresh = Ref::generate();
    fs.store().store(&fresh, &bytes)?;

    inode.set_data_ref(fresh);
    inode.size = bytes.len() as u64;
    let t = now();
    inode.mtime_sec = t.0;
    inode.mtime_nsec = t.1;
    inode.atime_sec = t.0;
    inode.atime_nsec = t.1;
    parent.update(fs.store(), &inode)
}

pub(super) fn require_dir_w_ok<S: ObjectStore>(fs: &Filesystem<S>, parent: &Node, caller: Caller) -> Result<InodeRecord> {
    let inode = parent.current_inode(fs.store())?;
    if inode.file_type()? != FileType::Dir {
        return Err(Error::NotADirectory);
    }
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::W_OK)?;
    Ok(inode)
}

pub(super) fn dir_entries<S: ObjectStore>(fs: &Filesystem<S>, inode: &InodeRecord) -> Result<Vec<DirEntry>> {
    let bytes = fs.store().fetch(&inode.data_ref())?;
    dirent::decode(&bytes)
}

pub fn create<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, mode: u32) -> Result<()> {
    let (parent, name) = resolve::resolve_parent(fs, path, caller)?;
    let parent_inode = require_dir_w_ok(fs, &parent, caller)?;
    let entries = dir_entries(fs, &parent_inode)?;
    if dirent::find(&entries, &name).is_some() {
        return Err(Error::FileExists);
    }

    let data_ref = Ref::generate();
    fs.store().store(&data_ref, &[])?;
    let xattr_ref = Ref::generate();
    fs.store().store(&xattr_ref, &xattr::encode(&[]))?;

    let mut inode = InodeRecord::new(FileType::File, mode, caller.uid, caller.gid, now());
    inode.set_data_ref(data_ref);
    inode.set_xattr_ref(xattr_ref);

    let child = Node::new(Ref::generate());
    child.update(fs.store(), &inode)?;

    let mut new_entries = entries;
    new_entries.push(DirEntry { name, log_ref: child.log_ref() });
    publish_dir(fs, &parent, parent_inode, &new_entries)
}

pub fn mkdir<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, mode: u32) -> Result<()> {
    let (parent, name) = resolve::resolve_parent(fs, path, caller)?;
    let parent_inode = require_dir_w_ok(fs, &parent, caller)?;
    let entries = dir_entries(fs, &parent_inode)?;
    if dirent::find(&entries, &name).is_some() {
        return Err(Error::FileExists);
    }

    let dir_ref = Ref::generate();
    fs.store().store(&dir_ref, &dirent::encode(&[]))?;

    let mut inode = InodeRecord::new(FileType::Dir, mode, caller.uid, caller.gid, now());
    inode.set_data_ref(dir_ref);

    let child = Node::new(Ref::generate());
    child.update(fs.store(), &inode)?;

    let mut new_entries = entries;
    new_entries.push(DirEntry { name, log_ref: child.log_ref() });
    publish_dir(fs, &parent, parent_inode, &new_entries)
}

/// `mode` is not caller-supplied (§4.5): new symlinks are always
/// `S_IFLNK | 0777`.
pub fn symlink<S: ObjectStore>(fs: &Filesystem<S>, target: &str, linkpath: &str, caller: Caller) -> Result<()> {
    if target.len() >= MAX_NAME_LEN || linkpath.len() >= MAX_NAME_LEN {
        return Err(Error::NameTooLong);
    }

    let (parent, name) = resolve::resolve_parent(fs, linkpath, caller)?;
    let parent_inode = require_dir_w_ok(fs, &parent, caller)?;
    let entries = dir_entries(fs, &parent_inode)?;
    if dirent::find(&entries, &name).is_some() {
        return Err(Error::FileExists);
    }

    let target_ref = Ref::generate();
    fs.store().store(&target_ref, target.as_bytes())?;

    let mut inode = InodeRecord::new(FileType::Sym, 0o777, caller.uid, caller.gid, now());
    inode.size = target.len() as u64;
    inode.set_data_ref(target_ref);

    let child = Node::new(Ref::generate());
    child.update(fs.store(), &inode)?;

    let mut new_entries = entries;
    new_entries.push(DirEntry { name, log_ref: child.log_ref() });
    publish_dir(fs, &parent, parent_inode, &new_entries)
}

pub fn link<S: ObjectStore>(fs: &Filesystem<S>, existing: &str, newpath: &str, caller: Caller) -> Result<()> {
    let existing_node = resolve::resolve(fs, existing, caller)?;
    let mut existing_inode = existing_node.current_inode(fs.store())?;

    let (parent, name) = resolve::resolve_parent(fs, newpath, caller)?;
    let parent_inode = require_dir_w_ok(fs, &parent, caller)?;
    let entries = dir_entries(fs, &parent_inode)?;
    if dirent::find(&entries, &name).is_some() {
        return Err(Error::FileExists);
    }

    existing_inode.nlink += 1;
    let t = now();
    existing_inode.ctime_sec = t.0;
    existing_inode.ctime_nsec = t.1;
    existing_node.update(fs.store(), &existing_inode)?;

    let mut new_entries = entries;
    new_entries.push(DirEntry { name, log_ref: existing_node.log_ref() });
    publish_dir(fs, &parent, parent_inode, &new_entries)
}

pub fn unlink<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller) -> Result<()> {
    let (parent, name) = resolve::resolve_parent(fs, path, caller)?;
    let parent_inode = require_dir_w_ok(fs, &parent, caller)?;
    let entries = dir_entries(fs, &parent_inode)?;
    let target = dirent::find(&entries, &name).ok_or(Error::NotFound)?.clone();

    let child = Node::new(target.log_ref);
    let mut child_inode = child.current_inode(fs.store())?;
    child_inode.nlink = child_inode.nlink.saturating_sub(1);
    let t = now();
    child_inode.ctime_sec = t.0;
    child_inode.ctime_nsec = t.1;
    child.update(fs.store(), &child_inode)?;

    let new_entries = dirent::without(&entries, &name);
    publish_dir(fs, &parent, parent_inode, &new_entries)
}

pub fn rmdir<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let inode = node.current_inode(fs.store())?;
    if inode.file_type()? != FileType::Dir {
        return Err(Error::NotADirectory);
    }
    let entries = dir_entries(fs, &inode)?;
    if !entries.is_empty() {
        return Err(Error::NotEmpty);
    }
    unlink(fs, path, caller)
}

pub fn readlink<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, buf_size: usize) -> Result<Vec<u8>> {
    let node = resolve::resolve(fs, path, caller)?;
    let inode = node.current_inode(fs.store())?;
    let target = fs.store().fetch(&inode.data_ref())?;

    let take = buf_size.saturating_sub(1).min(target.len());
    let mut out = target[..take].to_vec();
    out.push(0);
    Ok(out)
}

pub fn readdir<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller) -> Result<Vec<String>> {
    let node = resolve::resolve(fs, path, caller)?;
    let inode = node.current_inode(fs.store())?;
    if inode.file_type()? != FileType::Dir {
        return Err(Error::NotADirectory);
    }
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::R_OK)?;

    let entries = dir_entries(fs, &inode)?;
    Ok(entries.into_iter().map(|e| e.name).collect())
}
