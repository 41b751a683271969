//! Capability-based UTF-8 filesystem helpers shared by the converter and its
//! command-line front end.
//!
//! Every helper resolves an ambient base directory once and performs the
//! actual operation relative to it through `cap-std`.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open a UTF-8 file path for reading.
///
/// # Errors
/// Propagates the underlying I/O error.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Open the directory containing `path` and return it with the file name.
///
/// # Errors
/// Fails when `path` has no file name or its parent cannot be opened.
pub fn open_parent_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} should include a file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether `path` is a regular file.
///
/// Paths without a file name (`.`, `..`, `out/..`, `/`) can only name
/// directories, so they report `false` once they are known to exist.
///
/// # Errors
/// Fails with [`io::ErrorKind::NotFound`] when `path` or its parent is
/// absent, and propagates any other metadata error.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    if path.file_name().is_none() {
        fs_utf8::Dir::open_ambient_dir(path, ambient_authority())?;
        return Ok(false);
    }
    let (dir, name) = open_parent_dir(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create `path` and any missing ancestors.
///
/// # Errors
/// Propagates failures to open the base directory or create the tree.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    if path.as_str().is_empty() || path == Utf8Path::new("/") {
        return Ok(());
    }
    if path.file_name().is_none() {
        return fs_utf8::Dir::open_ambient_dir(path, ambient_authority()).map(drop);
    }
    let (base_dir, relative) = split_ambient_base(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Write `contents` to `path`, replacing any existing file.
///
/// The parent directory must already exist.
///
/// # Errors
/// Propagates failures to open the parent directory or write the file.
pub fn write_file(path: &Utf8Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let (dir, name) = open_parent_dir(path)?;
    dir.write(name.as_str(), contents)
}

/// Split a path into an ambient base directory and the path relative to it.
///
/// Absolute paths resolve from the root (or drive prefix on Windows),
/// relative ones from the current directory.
fn split_ambient_base(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();

    let (base, relative) = match std_path.components().next() {
        // Drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_path.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_path
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_path.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative =
        Utf8PathBuf::from_path_buf(relative).map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((dir, relative))
}
