//! Single-file zip archives.

use crate::fs::Filesystem;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::CompressionMethod;

/// Size above which zip64 extensions are required for an entry
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Path of the archive created for `source`: the full path with ".zip" appended
pub fn archive_path(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_owned();
    path.push(".zip");
    PathBuf::from(path)
}

/// Convert a modification time to the DOS timestamp stored in zip headers.
/// Times outside the representable range (1980-2107) fall back to the zip epoch.
fn zip_timestamp(modified: SystemTime) -> zip::DateTime {
    let local: DateTime<Local> = modified.into();
    u16::try_from(local.year())
        .ok()
        .and_then(|year| {
            zip::DateTime::from_date_and_time(
                year,
                local.month() as u8,
                local.day() as u8,
                local.hour() as u8,
                local.minute() as u8,
                local.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

/// Write `<source>.zip` holding `source` as its only, deflated entry.
///
/// Returns the path of the archive that was written.
pub fn zip_file(fs: &dyn Filesystem, source: &Path) -> ZipResult<PathBuf> {
    let target = archive_path(source);

    let info = fs.stat(source)?;
    let entry_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let reader = fs.open(source)?;
    let writer = fs.create(&target)?;

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip_timestamp(info.modified))
        .large_file(info.size >= ZIP64_THRESHOLD);

    if let Err(err) = write_entry(writer, reader, entry_name, options) {
        // Don't leave a truncated archive next to the original
        if let Err(remove_err) = fs.remove(&target) {
            warn!(
                "[ZIP] Failed to remove partial archive {}: {}",
                target.display(),
                remove_err
            );
        }
        return Err(err);
    }

    Ok(target)
}

fn write_entry<W: Write + Seek>(
    writer: W,
    mut reader: impl Read,
    entry_name: String,
    options: FileOptions,
) -> ZipResult<()> {
    let mut zip = zip::ZipWriter::new(writer);
    zip.start_file(entry_name, options)?;
    io::copy(&mut reader, &mut zip)?;
    zip.finish()?;
    Ok(())
}
