//! Volume enumeration and resolution module
//!
//! Translates a user-supplied volume identifier (drive letter or mount
//! path) into a writable directory on that volume, failing fast when the
//! volume is not mounted.

use crate::{Result, SpeedTestError};
use std::path::{Path, PathBuf};

/// A resolved benchmark target on a mounted volume
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// Directory the test file will be created in
    pub dir: PathBuf,
    /// Sanity flag for diagnostics: whether `dir` is an existing directory
    pub is_dir: bool,
    /// Normalized identifier of the matched volume
    pub volume: String,
}

/// Enumerate the mountpoints of all currently mounted volumes.
#[cfg(unix)]
pub fn mounted_volumes() -> Vec<PathBuf> {
    let mut mounts = Vec::new();

    if let Ok(table) = std::fs::read_to_string("/proc/mounts") {
        for line in table.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                let mnt = PathBuf::from(parts[1]);
                if mnt.is_dir() && !mounts.contains(&mnt) {
                    mounts.push(mnt);
                }
            }
        }
    }

    // The root filesystem is mounted even where /proc is unavailable
    let root = PathBuf::from("/");
    if !mounts.contains(&root) {
        mounts.insert(0, root);
    }

    mounts.sort();
    mounts
}

/// Enumerate the mountpoints of all currently mounted volumes.
#[cfg(windows)]
pub fn mounted_volumes() -> Vec<PathBuf> {
    let mut mounts = Vec::new();

    unsafe {
        extern "system" {
            fn GetLogicalDrives() -> u32;
        }
        let mask = GetLogicalDrives();
        for i in 0..26 {
            if (mask & (1 << i)) != 0 {
                let drive = (b'A' + i as u8) as char;
                let path = PathBuf::from(format!("{}:\\", drive));
                if path.exists() {
                    mounts.push(path);
                }
            }
        }
    }

    if mounts.is_empty() {
        for drive in 'C'..='Z' {
            let path = PathBuf::from(format!("{}:\\", drive));
            if path.exists() {
                mounts.push(path);
            }
        }
    }

    mounts
}

/// Normalize a volume identifier for case-insensitive comparison.
///
/// Lowercases the identifier, strips trailing path separators (keeping a
/// bare root), and strips the colon of a drive-letter form, so that
/// `"C:\"`, `"c:"` and `"c"` all compare equal.
pub fn normalize_identifier(identifier: &str) -> String {
    let mut id = identifier.trim().to_lowercase();

    while id.ends_with('/') || id.ends_with('\\') {
        if id.len() == 1 {
            return id;
        }
        id.pop();
    }
    if id.ends_with(':') {
        id.pop();
    }

    id
}

/// Resolve a requested volume identifier against the mount table.
///
/// The match is case-insensitive over normalized identifiers. When the
/// program's own install directory sits on the requested volume, that
/// directory is reused instead of the volume root, so the test does not
/// need write permission at the mountpoint itself.
pub fn resolve(requested: &str, install_dir: &Path, mounts: &[PathBuf]) -> Result<ResolvedTarget> {
    let requested_id = normalize_identifier(requested);
    let normalized: Vec<String> = mounts
        .iter()
        .map(|m| normalize_identifier(&m.to_string_lossy()))
        .collect();

    let position = normalized
        .iter()
        .position(|id| *id == requested_id)
        .ok_or_else(|| SpeedTestError::VolumeNotMounted {
            requested: requested_id.clone(),
            mounted: normalized.clone(),
        })?;

    let install_volume =
        volume_containing(install_dir, mounts).map(|m| normalize_identifier(&m.to_string_lossy()));

    let dir = if install_volume.as_deref() == Some(requested_id.as_str()) {
        install_dir.to_path_buf()
    } else {
        mounts[position].clone()
    };

    let is_dir = dir.is_dir();
    Ok(ResolvedTarget {
        dir,
        is_dir,
        volume: requested_id,
    })
}

/// The mountpoint of the volume containing `path`: the longest mountpoint
/// that is a prefix of it.
fn volume_containing<'a>(path: &Path, mounts: &'a [PathBuf]) -> Option<&'a PathBuf> {
    mounts
        .iter()
        .filter(|m| path.starts_with(m))
        .max_by_key(|m| m.as_os_str().len())
}
