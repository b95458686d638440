//! `read`, `write`, `truncate` (§4.4).

use crate::backend::{ObjectStore, Ref};
use crate::error::{Error, Result};
use crate::fs::{now, Filesystem};
use crate::inode::FileType;
use crate::perm::{self, mask, Caller};

use super::super::resolve;

/// Reads up to `size` bytes starting at `offset`.
///
/// The backend has no partial-read primitive (§6.1), so this always
/// fetches the whole data blob and slices it in memory.
pub fn read<S: ObjectStore>(
    fs: &Filesystem<S>,
    path: &str,
    caller: Caller,
    size: usize,
    offset: u64,
) -> Result<Vec<u8>> {
    let node = resolve::resolve(fs, path, caller)?;
    let inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::R_OK)?;

    match inode.file_type()? {
        FileType::Dir => return Err(Error::IsADirectory),
        FileType::Sym => return Err(Error::BadDescriptor),
        FileType::File => {}
    }

    if offset >= inode.size {
        return Ok(Vec::new());
    }
    let data = fs.store().fetch(&inode.data_ref())?;
    let start = offset as usize;
    let end = core::cmp::min(data.len(), start + size);
    Ok(data[start..end].to_vec())
}

/// Writes `buf` at `offset`, returning the number of bytes consumed
/// (always `buf.len()`).
///
/// If `offset` equals the current size, appends to the data blob in
/// place; otherwise rewrites the whole blob under a fresh ref, padding
/// with zeros on extension and truncating on shortening before the
/// write (§4.4).
pub fn write<S: ObjectStore>(
    fs: &Filesystem<S>,
    path: &str,
    caller: Caller,
    buf: &[u8],
    offset: u64,
) -> Result<usize> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::W_OK)?;

    if offset == inode.size {
        fs.store().append(&inode.data_ref(), buf)?;
        inode.size += buf.len() as u64;
    } else {
        let mut data = fs.store().fetch(&inode.data_ref())?;
        data.resize(offset as usize, 0);
        data.extend_from_slice(buf);

        let fresh = Ref::generate();
        fs.store().store(&fresh, &data)?;
        inode.set_data_ref(fresh);
        inode.size = data.len() as u64;
    }

    let t = now();
    inode.mtime_sec = t.0;
    inode.mtime_nsec = t.1;
    inode.atime_sec = t.0;
    inode.atime_nsec = t.1;
    node.update(fs.store(), &inode)?;

    Ok(buf.len())
}

/// Resizes the file's data to exactly `off` bytes. A no-op if `off`
/// already equals the current size.
pub fn truncate<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, off: u64) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::W_OK)?;

    if off == inode.size {
        return Ok(());
    }

    let mut data = fs.store().fetch(&inode.data_ref())?;
    data.resize(off as usize, 0);

    let fresh = Ref::generate();
    fs.store().store(&fresh, &data)?;
    inode.set_data_ref(fresh);
    inode.size = off;

    let t = now();
    inode.mtime_sec = t.0;
    inode.mtime_nsec = t.1;
    node.update(fs.store(), &inode)
}
