//! # File I/O Module
//!
//! Project file operations:
//! - **Atomic saves**: write to a `.tmp` sibling, sync, then rename over the
//!   target so an interrupted save never leaves a half-written project
//! - **Version validation**: refuse files written by an incompatible schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::file_io::{load_project, save_project};
//! use takeoff_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Estimator", "25-001", "Client");
//! let path = Path::new("takeoff.json");
//!
//! save_project(&project, path)?;
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.meta.job_id, "25-001");
//! # Ok::<(), takeoff_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Temp file used while saving `path`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Write bytes to `path` atomically (temp file, fsync, rename).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    let written = tmp_file
        .write_all(bytes)
        .map_err(|e| {
            CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })
        .and_then(|_| {
            tmp_file.sync_all().map_err(|e| {
                CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
            })
        })
        .and_then(|_| {
            fs::rename(&tmp_path, path).map_err(|e| {
                CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
            })
        });

    if written.is_err() {
        drop(tmp_file);
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

/// Save a project as pretty-printed JSON with atomic write semantics.
///
/// # Example
///
/// ```rust,no_run
/// use takeoff_core::file_io::save_project;
/// use takeoff_core::project::Project;
/// use std::path::Path;
///
/// let project = Project::new("Estimator", "25-001", "Client");
/// save_project(&project, Path::new("takeoff.json"))?;
/// # Ok::<(), takeoff_core::errors::CalcError>(())
/// ```
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    write_atomic(path, json.as_bytes())?;
    tracing::debug!(
        "Saved project {} ({} items) to {}",
        project.meta.job_id,
        project.item_count(),
        path.display()
    );
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let project = parse_project(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid project file {}: {}", path.display(), reason),
        },
        other => other,
    })?;

    tracing::info!(
        "Loaded project {} ({} items) from {}",
        project.meta.job_id,
        project.item_count(),
        path.display()
    );
    Ok(project)
}

/// Parse project JSON and check its schema version.
pub fn parse_project(json: &str) -> CalcResult<Project> {
    let project: Project = serde_json::from_str(json)?;
    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(|p| p.parse().map_err(|_| mismatch()))
        .collect::<CalcResult<_>>()?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first())
    else {
        return Err(mismatch());
    };

    if file_major != current_major {
        return Err(mismatch());
    }

    // Within 0.x, a newer minor may carry breaking changes
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PanelType;
    use crate::items::WallInput;
    use std::env::temp_dir;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("takeoff_test_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let mut project = Project::new("Test Estimator", "TEST-001", "Test Client");
        project.add_item(WallInput::new(PanelType::Normal).with_segment(3.0, 2.4).into());
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.estimator, "Test Estimator");
        assert_eq!(loaded.meta.job_id, "TEST-001");
        assert_eq!(loaded.items, project.items);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_project_path("atomic");
        let tmp_path = tmp_path_for(&path);

        let project = Project::new("Test", "TEST", "Client");
        save_project(&project, &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_save_leaves_no_tmp_file() {
        // The target is an existing directory, so the final rename fails
        let dir = temp_dir().join(format!("takeoff_test_dir_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("keep.txt"), b"x").unwrap();

        let err = write_atomic(&dir, b"{}").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert!(!tmp_path_for(&dir).exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path_for(Path::new("/jobs/takeoff.json")),
            Path::new("/jobs/takeoff.json.tmp")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_project(&temp_project_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_project_path("invalid");
        fs::write(&path, "{ not json").unwrap();

        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("banana").is_err());
    }

    #[test]
    fn test_parse_rejects_newer_schema() {
        let mut project = Project::default();
        project.meta.version = "0.9.0".to_string();
        let json = serde_json::to_string(&project).unwrap();

        let err = parse_project(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }
}
