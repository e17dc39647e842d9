//! Snapshot loading from the source set.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TableError};
use crate::table::parser::parse_line;

/// A complete key → value table for one loaded snapshot.
pub type Mapping = HashMap<String, String>;

/// Read every source, in order, into one mapping.
///
/// Later files and later lines overwrite earlier identical keys. A missing
/// file contributes no entries. Any unreadable file or malformed line fails
/// the whole load.
pub fn load_snapshot(sources: &[PathBuf]) -> Result<Mapping> {
    let mut mapping = Mapping::new();
    for path in sources {
        read_source(path, &mut mapping)?;
    }
    Ok(mapping)
}

/// Merge the entries of one file into `into`.
///
/// Returns the number of entries the file contributed, which is zero for a
/// missing file.
pub fn read_source(path: &Path, into: &mut Mapping) -> Result<usize> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "source file absent, contributing no entries");
            return Ok(0);
        }
        Err(source) => {
            return Err(TableError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
    let mut count = 0;
    for (i, line) in contents.lines().enumerate() {
        let entry = parse_line(line).map_err(|reason| TableError::Parse {
            path: path.to_path_buf(),
            line_no: i + 1,
            line: line.to_string(),
            reason,
        })?;
        if let Some(entry) = entry {
            into.insert(entry.key, entry.value);
            count += 1;
        }
    }

    Ok(count)
}
