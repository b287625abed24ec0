//! Tool export and import
//!
//! Tools travel as zip archives whose entries are rooted at
//! `<kind>/<name>/`, so an archive carries its own identity and lands in
//! the right place on import. Python bytecode caches are never packaged.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::registry::discovery::TOOL_EXT;
use crate::types::{LauncherError, Result, ToolKind};

/// Result of an import attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The tool was installed; holds its name
    Imported(String),
    /// A tool with the same identity already exists and overwrite was not
    /// requested; holds its name
    Exists(String),
}

fn is_junk(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == "__pycache__")
        || path.extension().is_some_and(|ext| ext == "pyc")
}

/// Package a tool directory into `exports_dir`, returning the archive
/// path. The archive name carries a timestamp so repeated exports never
/// clobber each other.
pub fn export_tool_dir(tool_dir: &Path, kind: ToolKind, exports_dir: &Path) -> Result<PathBuf> {
    let stem = tool_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LauncherError::internal("tool directory has no name"))?
        .to_string();

    fs::create_dir_all(exports_dir)?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let archive_path = exports_dir.join(format!("{stem}_{stamp}.zip"));

    let file = File::create(&archive_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let arc_root = PathBuf::from(kind.dir_name()).join(&stem);
    for entry in WalkDir::new(tool_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            LauncherError::internal(format!("walking {}: {e}", tool_dir.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(tool_dir)
            .map_err(|e| LauncherError::internal(format!("bad walk prefix: {e}")))?;
        if is_junk(rel) {
            continue;
        }
        let arc_name = arc_root.join(rel);
        writer.start_file(arc_name.to_string_lossy(), options)?;
        let mut src = File::open(entry.path())?;
        io::copy(&mut src, &mut writer)?;
    }
    writer.finish()?;

    tracing::info!(archive = %archive_path.display(), "exported tool");
    Ok(archive_path)
}

/// Install a tool from a zip archive or a plain directory into
/// `tools_dir`.
pub fn import_tool(tools_dir: &Path, source: &Path, overwrite: bool) -> Result<ImportOutcome> {
    if source.is_dir() {
        import_from_dir(tools_dir, source, overwrite)
    } else if source.extension().is_some_and(|ext| ext == "zip") {
        import_from_zip(tools_dir, source, overwrite)
    } else {
        Err(LauncherError::UnrecognizedArchive(source.to_path_buf()))
    }
}

/// Read the identity of an archive: the `(kind, stem, entry prefix)` of
/// the first entry shaped like `<kind>/<stem>/<stem>.py`, or the legacy
/// shape `<stem>/<stem>.py` which defaults to a standard tool.
fn archive_identity(archive: &ZipArchive<File>) -> Option<(ToolKind, String, PathBuf)> {
    for i in 0..archive.len() {
        let name = archive.name_for_index(i)?;
        let parts: Vec<String> = Path::new(name)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        match parts.as_slice() {
            [kind_dir, stem, leaf] => {
                if let Some(kind) = ToolKind::from_dir_name(kind_dir) {
                    if *leaf == format!("{stem}.{TOOL_EXT}") {
                        let prefix = PathBuf::from(kind_dir).join(stem);
                        return Some((kind, stem.clone(), prefix));
                    }
                }
            }
            [stem, leaf] => {
                if *leaf == format!("{stem}.{TOOL_EXT}") {
                    return Some((ToolKind::Standard, stem.clone(), PathBuf::from(stem)));
                }
            }
            _ => {}
        }
    }
    None
}

fn import_from_zip(tools_dir: &Path, source: &Path, overwrite: bool) -> Result<ImportOutcome> {
    let file = File::open(source)?;
    let mut archive = ZipArchive::new(file)?;

    let (kind, stem, prefix) = archive_identity(&archive)
        .ok_or_else(|| LauncherError::InvalidImportSource(source.to_path_buf()))?;
    let tool = format!("{stem}.{TOOL_EXT}");

    let target = tools_dir.join(kind.dir_name()).join(&stem);
    if target.exists() {
        if !overwrite {
            return Ok(ImportOutcome::Exists(tool));
        }
        fs::remove_dir_all(&target)?;
    }
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(enclosed) = entry.enclosed_name() else {
            return Err(LauncherError::InvalidImportSource(source.to_path_buf()));
        };
        let Ok(rel) = enclosed.strip_prefix(&prefix) else {
            continue;
        };
        let dest = target.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&dest)?;
            continue;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest)?;
        io::copy(&mut entry, &mut out)?;
    }

    Ok(ImportOutcome::Imported(tool))
}

fn import_from_dir(tools_dir: &Path, source: &Path, overwrite: bool) -> Result<ImportOutcome> {
    let stem = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LauncherError::InvalidImportSource(source.to_path_buf()))?
        .to_string();
    let tool = format!("{stem}.{TOOL_EXT}");

    if !source.join(&tool).is_file() {
        return Err(LauncherError::InvalidImportSource(source.to_path_buf()));
    }

    // A directory shipping an app.sh wrapper installs as a shell tool
    let kind = if source.join("app.sh").is_file() {
        ToolKind::ShellWrapped
    } else {
        ToolKind::Standard
    };

    let target = tools_dir.join(kind.dir_name()).join(&stem);
    if target.exists() {
        if !overwrite {
            return Ok(ImportOutcome::Exists(tool));
        }
        fs::remove_dir_all(&target)?;
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            LauncherError::internal(format!("walking {}: {e}", source.display()))
        })?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| LauncherError::internal(format!("bad walk prefix: {e}")))?;
        if is_junk(rel) {
            continue;
        }
        let dest = target.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }
    }

    Ok(ImportOutcome::Imported(tool))
}
