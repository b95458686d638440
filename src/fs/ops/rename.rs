//! `rename` (§4.6).

use crate::backend::ObjectStore;
use crate::dirent::{self, DirEntry};
use crate::error::{Error, Result};
use crate::fs::Filesystem;
use crate::perm::Caller;

use super::super::resolve;
use super::dir::{dir_entries, publish_dir, require_dir_w_ok};

pub fn rename<S: ObjectStore>(fs: &Filesystem<S>, source: &str, dest: &str, caller: Caller) -> Result<()> {
    if source == dest {
        return Ok(());
    }

    let (source_parent, source_name) = resolve::resolve_parent(fs, source, caller)?;
    let (dest_parent, dest_name) = resolve::resolve_parent(fs, dest, caller)?;

    if source_parent.log_ref() == dest_parent.log_ref() {
        let parent_inode = require_dir_w_ok(fs, &source_parent, caller)?;
        let entries = dir_entries(fs, &parent_inode)?;

        let source_ref = dirent::find(&entries, &source_name).ok_or(Error::NotFound)?.log_ref;

        let mut new_entries: Vec<DirEntry> = entries
            .into_iter()
            .filter(|e| e.name != source_name && e.name != dest_name)
            .collect();
        new_entries.push(DirEntry { name: dest_name, log_ref: source_ref });

        publish_dir(fs, &source_parent, parent_inode, &new_entries)
    } else {
        let source_parent_inode = require_dir_w_ok(fs, &source_parent, caller)?;
        let source_entries = dir_entries(fs, &source_parent_inode)?;
        let source_ref = dirent::find(&source_entries, &source_name).ok_or(Error::NotFound)?.log_ref;
        let new_source_entries = dirent::without(&source_entries, &source_name);

        let dest_parent_inode = require_dir_w_ok(fs, &dest_parent, caller)?;
        let dest_entries = dir_entries(fs, &dest_parent_inode)?;
        let mut new_dest_entries = dirent::without(&dest_entries, &dest_name);
        new_dest_entries.push(DirEntry { name: dest_name, log_ref: source_ref });

        publish_dir(fs, &source_parent, source_parent_inode, &new_source_entries)?;
        publish_dir(fs, &dest_parent, dest_parent_inode, &new_dest_entries)
    }
}
