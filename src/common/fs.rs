//! Directory walking for payload copies
//!
//! A payload copy happens in two steps: [`plan_tree_copy`] walks the source tree and
//! creates the destination directories, producing a flat list of [`CopyAction`]s;
//! the list is then handed to the copy engine as one unit of work.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::copy_engine::CopyAction;
use crate::error::{Result, copy, fs as fs_error};

#[derive(Default, Clone)]
pub struct CopyOptions {
    /// File names to leave out; directories with these names are still copied
    pub exclude: Vec<String>,
}

impl CopyOptions {
    pub fn excluding<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: names.into_iter().map(Into::into).collect(),
        }
    }

    fn is_excluded(&self, name: &std::ffi::OsStr) -> bool {
        self.exclude.iter().any(|e| name.to_str() == Some(e.as_str()))
    }
}

/// Walk `src` and mirror its directories under `dst`, returning the file copies left to do
///
/// Symlinks are followed: a link to a directory becomes a directory, a link to a file
/// becomes a copied file. Other entry kinds are skipped. `dst` must already exist.
///
/// # Errors
///
/// Returns `StoreError::CopyFailed` if the walk fails or a directory cannot be created.
pub fn plan_tree_copy<P1, P2>(src: P1, dst: P2, options: &CopyOptions) -> Result<Vec<CopyAction>>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();
    let mut actions = Vec::new();

    for entry in WalkDir::new(src_ref).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(src_ref).to_path_buf();
            copy::failed(at.display().to_string(), dst_ref.display().to_string(), e.to_string())
        })?;
        let relative = entry.path().strip_prefix(src_ref).map_err(|e| {
            fs_error::io_error(format!("{}: {e}", entry.path().display()))
        })?;
        let target: PathBuf = dst_ref.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir(&target).map_err(|e| copy::from_io(entry.path(), &target, &e))?;
        } else if file_type.is_file() {
            if options.is_excluded(entry.file_name()) {
                continue;
            }
            actions.push(CopyAction::new(entry.path(), target));
        }
    }

    Ok(actions)
}
