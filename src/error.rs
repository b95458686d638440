//! The internal error taxonomy and its mapping to POSIX errno values.

/// Every fallible operation in this crate returns one of these variants.
///
/// Each variant maps deterministically to a single POSIX errno at the
/// boundary (see [`Error::to_errno`]); no variant is introduced that does
/// not have a caller needing to distinguish it from the others.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no such file or directory")]
    NotFound,
    #[error("not a directory")]
    NotADirectory,
    #[error("permission denied")]
    PermissionDenied,
    #[error("file exists")]
    FileExists,
    #[error("directory not empty")]
    NotEmpty,
    #[error("file name too long")]
    NameTooLong,
    #[error("result too large for buffer")]
    RangeError,
    #[error("no data available")]
    NoData,
    #[error("bad file descriptor")]
    BadDescriptor,
    #[error("is a directory")]
    IsADirectory,
    #[error("object does not exist in backend")]
    ObjectDoesNotExist,
    #[error("backend I/O error: {0}")]
    Backend(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Maps this error to a negative POSIX errno, as returned to the
    /// filesystem bridge.
    ///
    /// `ObjectDoesNotExist` has no single canonical mapping: a lookup
    /// walking the inode log maps it to `ENOENT`, while a read of an
    /// xattr blob that was never written maps it to `ENODATA`. Both of
    /// those call sites convert the backend error explicitly before it
    /// reaches this function; by the time it gets here, `ObjectDoesNotExist`
    /// is treated as the lookup case.
    pub fn to_errno(&self) -> i32 {
        let errno = match self {
            Error::NotFound => libc::ENOENT,
            Error::NotADirectory => libc::ENOTDIR,
            Error::PermissionDenied => libc::EACCES,
            Error::FileExists => libc::EEXIST,
            Error::NotEmpty => libc::ENOTEMPTY,
            Error::NameTooLong => libc::ENAMETOOLONG,
            Error::RangeError => libc::ERANGE,
            Error::NoData => libc::ENODATA,
            Error::BadDescriptor => libc::EBADF,
            Error::IsADirectory => libc::EISDIR,
            Error::ObjectDoesNotExist => libc::ENOENT,
            Error::Backend(_) => libc::EIO,
        };
        -errno
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping_is_negative() {
        assert_eq!(Error::NotFound.to_errno(), -libc::ENOENT);
        assert_eq!(Error::NotEmpty.to_errno(), -libc::ENOTEMPTY);
        assert_eq!(Error::Backend("timeout".into()).to_errno(), -libc::EIO);
    }
}
