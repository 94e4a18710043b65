//! Candidate selection before any strategy runs: extension rules and keep-latest.

use crate::fs::{FileEntry, Filesystem};

/// Check whether an extension (with leading dot) is in a configured list.
/// List entries may be written with or without the dot.
pub fn includes_extension(extensions: &[String], file_ext: &str) -> bool {
    extensions.iter().any(|ext| {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        file_ext.strip_prefix('.') == Some(ext)
    })
}

/// Apply include/exclude rules to the files of a cleanup directory.
///
/// Anything that isn't a regular file is dropped. If `include` is set it alone decides,
/// even when `exclude` is also given; otherwise files with an excluded extension are dropped.
pub fn filter_files(
    fs: &dyn Filesystem,
    files: Vec<FileEntry>,
    include: Option<&[String]>,
    exclude: &[String],
) -> Vec<FileEntry> {
    files
        .into_iter()
        .filter(|file| file.is_file())
        .filter(|file| {
            let file_ext = fs.ext(file);
            match include {
                Some(include) => includes_extension(include, &file_ext),
                None => !includes_extension(exclude, &file_ext),
            }
        })
        .collect()
}

/// Exempt the `latest` most recently modified files from cleanup.
///
/// Ties on modification time go to the file scanned first. The remaining files are
/// returned in their original order.
pub fn apply_keep_latest(files: Vec<FileEntry>, latest: i64) -> Vec<FileEntry> {
    if latest < 1 {
        return files;
    }
    let latest = usize::try_from(latest).unwrap_or(usize::MAX);
    if files.len() <= latest {
        return Vec::new();
    }

    // Stable sort, newest first
    let mut order: Vec<usize> = (0..files.len()).collect();
    order.sort_by(|&a, &b| files[b].modified.cmp(&files[a].modified));

    let mut exempt = vec![false; files.len()];
    for &index in &order[..latest] {
        exempt[index] = true;
    }

    files
        .into_iter()
        .zip(exempt)
        .filter_map(|(file, exempt)| if exempt { None } else { Some(file) })
        .collect()
}
