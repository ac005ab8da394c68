//! # Runtime Directory Bootstrap
//!
//! Wayland sessions need `XDG_RUNTIME_DIR` to point at a private, per-user
//! directory. FreeBSD does not provide one by default, so startup creates
//!
//! ```text
//! <tmp>/<euid>-runtime-dir   (mode 0700)
//! ```
//!
//! and exports it before the UI starts.
//!
//! ## Existing directories
//!
//! An existing entry is reused only if it is a real directory (not a symlink)
//! owned by the effective user. Anything else is a [`RuntimeDirError`] and
//! aborts startup. A directory with group/other permission bits is reused
//! with a warning.

use nix::unistd::geteuid;
use std::fs::{self, DirBuilder, Metadata};
use std::io;
use std::os::unix::fs::{DirBuilderExt, MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variable exported by [`init_runtime_env`].
pub const RUNTIME_DIR_VAR: &str = "XDG_RUNTIME_DIR";

static RUNTIME_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Fatal startup conditions for the runtime directory.
#[derive(Debug, Error)]
pub enum RuntimeDirError {
    #[error("failed to create runtime directory {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to inspect runtime directory {}: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("runtime directory {} exists but is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
    #[error("runtime directory {} is owned by uid {owner}, expected uid {expected}", .path.display())]
    OwnershipMismatch {
        path: PathBuf,
        owner: u32,
        expected: u32,
    },
}

/// Runtime directory path for `euid` under `base`.
pub fn runtime_dir_path(base: &Path, euid: u32) -> PathBuf {
    base.join(format!("{}-runtime-dir", euid))
}

/// Create or verify the runtime directory for `euid` under `base`.
pub fn prepare_runtime_dir(base: &Path, euid: u32) -> Result<PathBuf, RuntimeDirError> {
    let path = runtime_dir_path(base, euid);

    match fs::symlink_metadata(&path) {
        Ok(metadata) => verify_existing(&path, &metadata, euid)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            match DirBuilder::new().mode(0o700).create(&path) {
                Ok(()) => log::info!("Created runtime directory {}", path.display()),
                // Lost a race with another process; judge what it made
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    let metadata =
                        fs::symlink_metadata(&path).map_err(|source| RuntimeDirError::Inspect {
                            path: path.clone(),
                            source,
                        })?;
                    verify_existing(&path, &metadata, euid)?;
                }
                Err(source) => return Err(RuntimeDirError::Create { path, source }),
            }
        }
        Err(source) => return Err(RuntimeDirError::Inspect { path, source }),
    }

    Ok(path)
}

fn verify_existing(path: &Path, metadata: &Metadata, euid: u32) -> Result<(), RuntimeDirError> {
    if !metadata.file_type().is_dir() {
        return Err(RuntimeDirError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    if metadata.uid() != euid {
        return Err(RuntimeDirError::OwnershipMismatch {
            path: path.to_path_buf(),
            owner: metadata.uid(),
            expected: euid,
        });
    }

    let mode = metadata.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        log::warn!(
            "Runtime directory {} has mode {:o}, expected 700",
            path.display(),
            mode
        );
    }

    log::info!("Reusing runtime directory {}", path.display());
    Ok(())
}

/// Prepare the runtime directory for the effective user and export
/// [`RUNTIME_DIR_VAR`]. Runs once; later calls return the first result.
///
/// Call before any other thread is started.
pub fn init_runtime_env() -> Result<&'static Path, RuntimeDirError> {
    if let Some(dir) = RUNTIME_DIR.get() {
        return Ok(dir);
    }

    let dir = prepare_runtime_dir(&std::env::temp_dir(), geteuid().as_raw())?;
    std::env::set_var(RUNTIME_DIR_VAR, &dir);
    log::info!("{}={}", RUNTIME_DIR_VAR, dir.display());

    Ok(RUNTIME_DIR.get_or_init(|| dir))
}

/// The directory exported by [`init_runtime_env`], if it has run.
pub fn runtime_dir() -> Option<&'static Path> {
    RUNTIME_DIR.get().map(PathBuf::as_path)
}
