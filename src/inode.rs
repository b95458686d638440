//! The fixed-size inode snapshot record (§3.2).
//!
//! A snapshot is laid out for raw copy-in/copy-out, the same way the
//! reference ext2 implementation this crate's encoding style is grounded
//! on lays out its on-disk inode (`Ext2INode`, `#[repr(C, packed)]`,
//! read/written through a raw byte cast). `InodeRecord` follows the same
//! idea through `bytemuck`: fields are ordered largest-alignment first so
//! the struct contains no implicit padding, which keeps `Pod` honest and
//! makes the 128-byte record a direct, portable byte image.

use bytemuck::{Pod, Zeroable};

use crate::backend::Ref;
use crate::error::{Error, Result};

/// The type of file an inode snapshot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Dir,
    File,
    Sym,
}

const TYPE_DIR: u32 = 0;
const TYPE_FILE: u32 = 1;
const TYPE_SYM: u32 = 2;

impl FileType {
    fn to_raw(self) -> u32 {
        match self {
            FileType::Dir => TYPE_DIR,
            FileType::File => TYPE_FILE,
            FileType::Sym => TYPE_SYM,
        }
    }

    fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            TYPE_DIR => Ok(FileType::Dir),
            TYPE_FILE => Ok(FileType::File),
            TYPE_SYM => Ok(FileType::Sym),
            _ => Err(Error::Backend(format!("corrupt inode: unknown type tag {raw}"))),
        }
    }
}

/// POSIX mode bit for a directory (`S_IFDIR`).
pub const S_IFDIR: u32 = 0o040000;
/// POSIX mode bit for a regular file (`S_IFREG`).
pub const S_IFREG: u32 = 0o100000;
/// POSIX mode bit for a symbolic link (`S_IFLNK`).
pub const S_IFLNK: u32 = 0o120000;

/// The fixed-size, 128-byte inode snapshot record (§3.2).
///
/// One snapshot is appended to a node's inode log on every mutation; the
/// current inode of a node is the last snapshot in its log (§3.3).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct InodeRecord {
    pub size: u64,
    pub atime_sec: i64,
    pub mtime_sec: i64,
    pub ctime_sec: i64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u32,
    pub atime_nsec: u32,
    pub mtime_nsec: u32,
    pub ctime_nsec: u32,
    /// Raw `FileType` discriminant; see [`FileType::from_raw`].
    pub file_type: u32,
    pub data_ref: [u8; 32],
    pub xattr_ref: [u8; 32],
}

pub const INODE_RECORD_SIZE: usize = core::mem::size_of::<InodeRecord>();

impl InodeRecord {
    pub fn new(
        file_type: FileType,
        mode: u32,
        uid: u32,
        gid: u32,
        now: (i64, u32),
    ) -> Self {
        let type_bits = match file_type {
            FileType::Dir => S_IFDIR,
            FileType::File => S_IFREG,
            FileType::Sym => S_IFLNK,
        };
        InodeRecord {
            size: 0,
            atime_sec: now.0,
            mtime_sec: now.0,
            ctime_sec: now.0,
            mode: mode | type_bits,
            uid,
            gid,
            nlink: 1,
            atime_nsec: now.1,
            mtime_nsec: now.1,
            ctime_nsec: now.1,
            file_type: file_type.to_raw(),
            data_ref: *Ref::ZERO.as_bytes(),
            xattr_ref: *Ref::ZERO.as_bytes(),
        }
    }

    pub fn file_type(&self) -> Result<FileType> {
        FileType::from_raw(self.file_type)
    }

    pub fn data_ref(&self) -> Ref {
        Ref(self.data_ref)
    }

    pub fn set_data_ref(&mut self, r: Ref) {
        self.data_ref = r.0;
    }

    pub fn xattr_ref(&self) -> Ref {
        Ref(self.xattr_ref)
    }

    pub fn set_xattr_ref(&mut self, r: Ref) {
        self.xattr_ref = r.0;
    }

    /// `blocks` as reported by `getattr`: `ceil(size / 512)` (§4.8).
    pub fn blocks(&self) -> u64 {
        (self.size + 511) / 512
    }

    pub fn encode(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != INODE_RECORD_SIZE {
            return Err(Error::Backend(format!(
                "corrupt inode snapshot: expected {INODE_RECORD_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        bytemuck::try_pod_read_unaligned(bytes)
            .map_err(|e| Error::Backend(format!("corrupt inode snapshot: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_implicit_padding() {
        // Pod's derive would refuse to compile if this didn't hold, but
        // pin it down explicitly since the byte layout is load-bearing.
        assert_eq!(INODE_RECORD_SIZE, 128);
    }

    #[test]
    fn roundtrip() {
        let inode = InodeRecord::new(FileType::File, 0o644, 1000, 1000, (12345, 6789));
        let bytes = inode.encode().to_vec();
        let decoded = InodeRecord::decode(&bytes).unwrap();
        assert_eq!(inode, decoded);
        assert_eq!(decoded.file_type().unwrap(), FileType::File);
        assert_eq!(decoded.mode & S_IFREG, S_IFREG);
    }

    #[test]
    fn blocks_rounds_up() {
        let mut inode = InodeRecord::new(FileType::File, 0o644, 0, 0, (0, 0));
        inode.size = 513;
        assert_eq!(inode.blocks(), 2);
    }
}
