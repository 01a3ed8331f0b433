use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::{MatcherError, Result};
use crate::services::batch::RunResult;

pub const MATCHES_FILE: &str = "output_matches.txt";
pub const PARTIAL_FILE: &str = "output_partial.txt";
pub const UNMATCHED_FILE: &str = "output_unmatched.txt";
pub const FAILED_FILE: &str = "output_failed.txt";

/// Read a playlist file, one song per line.
///
/// Lines are returned raw; blank lines and carriage returns are dealt
/// with by the batch runner. Bytes that are not valid UTF-8 are replaced
/// with U+FFFD rather than failing the whole run.
pub fn read_playlist(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| MatcherError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let contents = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(_) = contents {
        log::warn!(
            "{} is not valid UTF-8, invalid bytes were replaced",
            path.display()
        );
    }
    Ok(contents.split('\n').map(str::to_string).collect())
}

/// Write the result buffers into `output_dir`, returning the files written.
///
/// The matches, partial and unmatched files are always written, even when
/// empty. The failed file only exists if some query errored.
pub fn write_results(output_dir: &Path, result: &RunResult) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|source| MatcherError::Output {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut files = vec![
        (PARTIAL_FILE, result.partials.clone()),
        (UNMATCHED_FILE, result.unmatched.clone()),
        (MATCHES_FILE, result.matches.clone()),
    ];
    if !result.failed.is_empty() {
        let failed: String = result.failed.iter().map(|q| format!("{}\n", q)).collect();
        files.push((FAILED_FILE, failed));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = output_dir.join(name);
        std::fs::write(&path, contents).map_err(|source| MatcherError::Output {
            path: path.clone(),
            source,
        })?;
        log::debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
