//! End-to-end scenarios against `backend::memory::MemoryStore` (§8).

use blobfs::backend::memory::MemoryStore;
use blobfs::config::MountConfig;
use blobfs::{Caller, Error, Filesystem};

fn mounted(prefix: &str) -> (Filesystem<MemoryStore>, Caller) {
    let caller = Caller { uid: 1000, gid: 1000 };
    let fs = Filesystem::mount(MemoryStore::new(), &MountConfig::new(prefix), caller).unwrap();
    (fs, caller)
}

#[test]
fn scenario_1_fresh_mount_root_attrs() {
    let (fs, caller) = mounted("scenario-1");
    let attr = fs.getattr("/", caller).unwrap();
    assert_eq!(attr.mode, blobfs::inode::S_IFDIR | 0o755);
    assert_eq!(attr.nlink, 1);
    assert_eq!(attr.size, 4); // an empty directory blob is a 4-byte zero count
}

#[test]
fn scenario_2_create_write_read() {
    let (fs, caller) = mounted("scenario-2");
    fs.create("/a", caller, 0o644).unwrap();
    assert_eq!(fs.write("/a", caller, b"hello", 0).unwrap(), 5);
    assert_eq!(fs.read("/a", caller, 5, 0).unwrap(), b"hello");
    assert_eq!(fs.getattr("/a", caller).unwrap().size, 5);
}

#[test]
fn scenario_3_overwrite_at_offset_zero() {
    let (fs, caller) = mounted("scenario-3");
    fs.create("/a", caller, 0o644).unwrap();
    fs.write("/a", caller, b"hello", 0).unwrap();
    fs.write("/a", caller, b"WORLD", 0).unwrap();
    assert_eq!(fs.read("/a", caller, 5, 0).unwrap(), b"WORLD");
    assert_eq!(fs.getattr("/a", caller).unwrap().size, 5);
}

#[test]
fn scenario_4_mkdir_create_rename_readdir() {
    let (fs, caller) = mounted("scenario-4");
    fs.mkdir("/d", caller, 0o755).unwrap();
    fs.create("/d/f", caller, 0o644).unwrap();
    fs.rename("/d/f", "/d/g", caller).unwrap();
    assert_eq!(fs.readdir("/d", caller).unwrap(), vec!["g".to_string()]);
}

#[test]
fn scenario_5_symlink_readlink_read_is_bad_descriptor() {
    let (fs, caller) = mounted("scenario-5");
    fs.symlink("target", "/s", caller).unwrap();
    assert_eq!(fs.readlink("/s", caller, 64).unwrap(), b"target\0".to_vec());
    assert!(matches!(fs.read("/s", caller, 4, 0), Err(Error::BadDescriptor)));
}

#[test]
fn scenario_6_setxattr_getxattr_removexattr() {
    let (fs, caller) = mounted("scenario-6");
    fs.create("/a", caller, 0o644).unwrap();
    fs.setxattr("/a", caller, "user.x", b"v").unwrap();
    assert_eq!(fs.getxattr("/a", caller, "user.x", 16).unwrap(), b"v");
    fs.removexattr("/a", caller, "user.x").unwrap();
    assert!(matches!(fs.getxattr("/a", caller, "user.x", 16), Err(Error::NoData)));
}

#[test]
fn idempotent_rename_to_self() {
    let (fs, caller) = mounted("rename-self");
    fs.create("/a", caller, 0o644).unwrap();
    let before = fs.getattr("/a", caller).unwrap();
    fs.rename("/a", "/a", caller).unwrap();
    let after = fs.getattr("/a", caller).unwrap();
    assert_eq!(before, after);
}

#[test]
fn unlink_then_lookup_fails() {
    let (fs, caller) = mounted("unlink-lookup");
    fs.create("/a", caller, 0o644).unwrap();
    fs.unlink("/a", caller).unwrap();
    assert!(matches!(fs.getattr("/a", caller), Err(Error::NotFound)));
}

#[test]
fn hardlink_equivalence() {
    let (fs, caller) = mounted("hardlink-eq");
    fs.create("/a", caller, 0o644).unwrap();
    fs.write("/a", caller, b"shared", 0).unwrap();
    fs.link("/a", "/b", caller).unwrap();
    assert_eq!(fs.read("/a", caller, 6, 0).unwrap(), fs.read("/b", caller, 6, 0).unwrap());
    fs.write("/b", caller, b"mutated!", 0).unwrap();
    assert_eq!(fs.read("/a", caller, 8, 0).unwrap(), b"mutated!");
}

#[test]
fn permission_classes_for_mode_0600() {
    let (fs, caller) = mounted("perm-classes");
    fs.create("/a", caller, 0o600).unwrap();

    assert_eq!(fs.read("/a", caller, 0, 0).unwrap(), Vec::<u8>::new());

    let same_group_other_uid = Caller { uid: caller.uid + 1, gid: caller.gid };
    assert!(matches!(fs.write("/a", same_group_other_uid, b"x", 0), Err(Error::PermissionDenied)));
}
