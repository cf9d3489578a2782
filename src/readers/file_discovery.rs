use crate::error::{ProcessingError, Result};
use crate::models::InputSelection;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::debug;

/// Resolves an [`InputSelection`] to the ordered list of track files to read.
pub struct FileDiscovery<'a> {
    selection: &'a InputSelection,
}

impl<'a> FileDiscovery<'a> {
    pub fn new(selection: &'a InputSelection) -> Self {
        Self { selection }
    }

    /// Expand every `<directory>/<filter>` pattern, then append the names read
    /// from `stdin` when the selection asks for it. Fails if nothing is found.
    pub fn discover<R: BufRead>(&self, stdin: R) -> Result<Vec<PathBuf>> {
        let mut files = self.glob_files()?;

        if self.selection.read_stdin {
            files.extend(read_filenames(stdin)?);
        }

        let files = dedup_preserving_order(files);
        if files.is_empty() {
            return Err(ProcessingError::Discovery(self.describe()));
        }

        debug!(count = files.len(), "discovered track files");
        Ok(files)
    }

    fn glob_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for directory in &self.selection.directories {
            for filter in &self.selection.filters {
                let pattern = directory.join(filter);
                let pattern = pattern.to_string_lossy();

                // Unreadable entries are skipped, the same as a shell glob would
                let matches = glob::glob(&pattern)?
                    .filter_map(|entry| entry.ok())
                    .filter(|path| path.is_file());

                let before = files.len();
                files.extend(matches);
                debug!(%pattern, matched = files.len() - before, "expanded file filter");
            }
        }

        Ok(files)
    }

    fn describe(&self) -> String {
        let directories: Vec<String> = self
            .selection
            .directories
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        let mut message = format!(
            "no files matching [{}] in [{}]",
            self.selection.filters.join(", "),
            directories.join(", ")
        );
        if self.selection.read_stdin {
            message.push_str(" and none named on standard input");
        }
        message
    }
}

/// One filename per line; blank lines are ignored
fn read_filenames<R: BufRead>(reader: R) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            files.push(PathBuf::from(name));
        }
    }
    Ok(files)
}

fn dedup_preserving_order(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::with_capacity(files.len());
    files
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
