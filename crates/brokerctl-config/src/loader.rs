//! Finding, reading, and writing `redpanda.yaml`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::RedpandaYaml;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "redpanda.yaml";

/// System-wide location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/redpanda/redpanda.yaml";

/// Maximum allowed config file size (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Decide which file to operate on.
///
/// An explicit path always wins. Otherwise `redpanda.yaml` in `cwd` is used
/// if it exists, then [`DEFAULT_CONFIG_PATH`].
#[must_use]
pub fn locate(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        debug!(path = %local.display(), "using config file in working directory");
        return local;
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Load the document at `path`.
///
/// A missing or empty file yields [`RedpandaYaml::dev_default`].
///
/// # Errors
///
/// - [`ConfigError::LoadError`] if the file cannot be read or is too large.
/// - [`ConfigError::ParseError`] if it is not a valid document.
pub fn load(path: &Path) -> ConfigResult<RedpandaYaml> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config file not found, using development defaults");
            return Ok(RedpandaYaml::dev_default());
        },
        Err(e) => {
            return Err(ConfigError::LoadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    // Checked after reading to avoid a stat/read race.
    let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::LoadError {
            path: path.display().to_string(),
            source: io::Error::new(
                io::ErrorKind::InvalidData,
                format!("config file is {size} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"),
            ),
        });
    }

    if content.trim().is_empty() {
        info!(path = %path.display(), "config file is empty, using development defaults");
        return Ok(RedpandaYaml::dev_default());
    }

    let doc = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(path = %path.display(), "loaded config file");
    Ok(doc)
}

/// Write `doc` to `path`, replacing any existing file atomically.
///
/// The parent directory is created if needed. An existing file keeps its
/// permissions; a new file is created readable by everyone.
///
/// # Errors
///
/// - [`ConfigError::SerializeError`] if the document cannot be rendered.
/// - [`ConfigError::WriteError`] for any filesystem failure.
pub fn write(path: &Path, doc: &RedpandaYaml) -> ConfigResult<()> {
    let body = serde_yaml::to_string(doc).map_err(|e| ConfigError::SerializeError { source: e })?;
    let write_err = |source: io::Error| ConfigError::WriteError {
        path: path.display().to_string(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let permissions = match std::fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(write_err(e)),
    };

    // Write to a temp file in the same directory, then atomically rename.
    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(body.as_bytes()).map_err(write_err)?;
    match permissions {
        Some(perms) => tmp.as_file().set_permissions(perms).map_err(write_err)?,
        None => set_new_file_permissions(tmp.as_file()).map_err(write_err)?,
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), "wrote config file");
    Ok(())
}

#[cfg(unix)]
fn set_new_file_permissions(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn set_new_file_permissions(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}
