//! Bin shim generation seam
//!
//! The installer decides *where* shims go and *which* scripts they point at; how a shim
//! is written is up to a [`ShimGenerator`]. [`LinkShim`] is the default: an executable
//! script reached through a symlink.

use std::fs;
use std::io;
use std::path::Path;

/// Creates an executable entry at `shim` that runs `script`
pub trait ShimGenerator: Send + Sync {
    /// Write the shim, replacing anything already at `shim`
    ///
    /// # Errors
    ///
    /// Returns the underlying io error; the installer adds the bin name and path.
    fn generate(&self, script: &Path, shim: &Path) -> io::Result<()>;
}

/// Symlink shims pointing straight at the script
///
/// The script itself gains execute bits on unix when it lacks any of them. For a node
/// kept in place the script is the user's own file, so its permissions change in the
/// source tree; use another [`ShimGenerator`] where that matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkShim;

impl ShimGenerator for LinkShim {
    fn generate(&self, script: &Path, shim: &Path) -> io::Result<()> {
        if fs::symlink_metadata(shim).is_ok() {
            fs::remove_file(shim)?;
        }
        make_executable(script)?;
        symlink_file(script, shim)
    }
}

#[cfg(unix)]
fn make_executable(script: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(script)?.permissions();
    let mode = permissions.mode();
    if mode & 0o111 != 0o111 {
        permissions.set_mode(mode | 0o111);
        fs::set_permissions(script, permissions)?;
    }
    Ok(())
}

#[cfg(windows)]
fn make_executable(_script: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn symlink_file(script: &Path, shim: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(script, shim)
}

#[cfg(windows)]
fn symlink_file(script: &Path, shim: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(script, shim)
}
