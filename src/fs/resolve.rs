//! The path resolver (§4.2).
//!
//! Splits on `/`, discarding empty components so leading, trailing, and
//! repeated `/` are all handled uniformly, then walks from the root one
//! component at a time, re-fetching the current inode of every directory
//! along the way. A walk commits to whatever state each directory blob
//! held at the moment it was fetched — a concurrent rename of a deeper
//! ancestor is simply not observed (§5).

use crate::backend::ObjectStore;
use crate::dirent;
use crate::error::{Error, Result};
use crate::fs::Filesystem;
use crate::inode::FileType;
use crate::node::Node;
use crate::perm::{self, mask, Caller};

/// Splits `path` into its non-empty components.
pub fn split_components(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty()).collect()
}

/// Walks `path` from the filesystem root and returns the node at the
/// leaf (§4.2).
pub fn resolve<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller) -> Result<Node> {
    let mut current = Node::new(fs.root());
    for component in split_components(path) {
        current = step(fs, &current, component, caller)?;
    }
    Ok(current)
}

/// Resolves one path component from `current`, which must be a directory
/// the caller may traverse.
fn step<S: ObjectStore>(
    fs: &Filesystem<S>,
    current: &Node,
    component: &str,
    caller: Caller,
) -> Result<Node> {
    let inode = current.current_inode(fs.store())?;
    if inode.file_type()? != FileType::Dir {
        return Err(Error::NotADirectory);
    }
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::X_OK)?;

    let dir_bytes = fs.store().fetch(&inode.data_ref())?;
    let entries = dirent::decode(&dir_bytes)?;
    let entry = dirent::find(&entries, component).ok_or(Error::NotFound)?;
    Ok(Node::new(entry.log_ref))
}

/// Splits `path` into its parent directory path and final component,
/// used by every operation that mutates a directory entry.
///
/// Fails with [`Error::NotFound`] for the root path itself, which has no
/// parent-relative name to create or remove.
pub fn split_parent(path: &str) -> Result<(String, String)> {
    let components = split_components(path);
    let (name, parent_components) = components
        .split_last()
        .ok_or(Error::NotFound)?;
    let parent_path = format!("/{}", parent_components.join("/"));
    Ok((parent_path, (*name).to_string()))
}

/// Resolves the parent directory of `path` and returns it along with the
/// final path component. The parent must already be a directory; callers
/// still need to perm-check `W_OK` themselves before mutating it.
pub fn resolve_parent<S: ObjectStore>(
    fs: &Filesystem<S>,
    path: &str,
    caller: Caller,
) -> Result<(Node, String)> {
    let (parent_path, name) = split_parent(path)?;
    let parent = resolve(fs, &parent_path, caller)?;
    Ok((parent, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_components_collapses_slashes() {
        assert_eq!(split_components("/a//b/c/"), vec!["a", "b", "c"]);
        assert_eq!(split_components("/"), Vec::<&str>::new());
        assert_eq!(split_components(""), Vec::<&str>::new());
    }

    #[test]
    fn split_parent_basic() {
        let (parent, name) = split_parent("/d/f").unwrap();
        assert_eq!(parent, "/d");
        assert_eq!(name, "f");
    }

    #[test]
    fn split_parent_top_level() {
        let (parent, name) = split_parent("/a").unwrap();
        assert_eq!(parent, "/");
        assert_eq!(name, "a");
    }

    #[test]
    fn split_parent_root_is_not_found() {
        assert!(matches!(split_parent("/"), Err(Error::NotFound)));
    }
}
