//! POSIX DAC permission checking (§4.3).
//!
//! The class ordering here — world, then group, then owner — is
//! deliberately not the POSIX-standard owner/group/other order. It is
//! preserved because it is how the system this crate's behavior is
//! grounded on actually resolves permissions; replacing it with the
//! textbook ordering would be a silent behavior change, not a cleanup.

use crate::error::{Error, Result};

/// Requested access bits, matching the `access(2)` mask values.
pub mod mask {
    pub const F_OK: u32 = 0;
    pub const X_OK: u32 = 1;
    pub const W_OK: u32 = 2;
    pub const R_OK: u32 = 4;
}

/// The identity of the caller performing an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
    pub uid: u32,
    pub gid: u32,
}

const S_IRWXO: u32 = 0o007;
const S_IRWXG: u32 = 0o070;
const S_IRWXU: u32 = 0o700;

/// Checks `want` (a combination of the `*_OK` bits) against `mode` for
/// `caller`, given the file's `file_uid`/`file_gid`.
///
/// `F_OK` is always satisfied (callers only reach this function once the
/// path has already resolved). For any other combination, the first
/// matching class wins, in this order:
/// 1. world bits cover `want`, or the world `rwx` triple is fully set;
/// 2. the caller's gid matches `file_gid` and the group bits cover `want`;
/// 3. the caller's uid matches `file_uid` and the owner bits cover `want`;
/// 4. otherwise, [`Error::PermissionDenied`].
pub fn check(mode: u32, file_uid: u32, file_gid: u32, caller: Caller, want: u32) -> Result<()> {
    if want == mask::F_OK {
        return Ok(());
    }

    let world_bits = mode & S_IRWXO;
    if (world_bits & want) == want || world_bits == S_IRWXO {
        return Ok(());
    }

    if caller.gid == file_gid {
        let group_bits = (mode & S_IRWXG) >> 3;
        if (group_bits & want) == want {
            return Ok(());
        }
    }

    if caller.uid == file_uid {
        let owner_bits = (mode & S_IRWXU) >> 6;
        if (owner_bits & want) == want {
            return Ok(());
        }
    }

    Err(Error::PermissionDenied)
}

/// Whether `caller` owns the file — used by the `chmod`/`chown`/`utimens`
/// overrides, which bypass or relax [`check`] (§4.3).
pub fn is_owner(file_uid: u32, caller: Caller) -> bool {
    caller.uid == file_uid
}

/// The relaxed rule for `utimens`: fall back to allowed if the standard
/// check fails but the caller owns the file.
pub fn check_utimens(mode: u32, file_uid: u32, file_gid: u32, caller: Caller, want: u32) -> Result<()> {
    match check(mode, file_uid, file_gid, caller, want) {
        Ok(()) => Ok(()),
        Err(Error::PermissionDenied) if is_owner(file_uid, caller) => Ok(()),
        Err(e) => Err(e),
    }
}

/// The owner-only rule for `chmod`/`chown`: the standard check never
/// applies, only ownership does.
pub fn check_owner_only(file_uid: u32, caller: Caller) -> Result<()> {
    if is_owner(file_uid, caller) {
        Ok(())
    } else {
        Err(Error::PermissionDenied)
    }
}
