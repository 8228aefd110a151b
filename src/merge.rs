//! Flatten a source tree into one text file.
//!
//! The output lists every file first, then the contents of the files whose
//! extensions are selected, each wrapped in start/end markers.

use crate::error::{EvalError, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub const STRUCTURE_HEADER: &str = "=== PROJECT FILE STRUCTURE ===";
pub const CONTENTS_HEADER: &str = "=== FILE CONTENTS ===";

/// What to walk and what to merge.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Extensions whose contents are merged, with leading dot.
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk.
    pub ignore_dirs: Vec<String>,
    /// File names left out entirely.
    pub ignore_files: Vec<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            extensions: [".js", ".jsx", ".ts", ".tsx", ".css", ".json"]
                .map(String::from)
                .to_vec(),
            ignore_dirs: ["node_modules", ".git", "dist", "build", ".vscode"]
                .map(String::from)
                .to_vec(),
            ignore_files: ["package-lock.json", "yarn.lock"].map(String::from).to_vec(),
        }
    }
}

impl MergeOptions {
    /// Replace the extension set. Accepts `ts` or `.ts`.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| {
                let e = e.as_ref().trim();
                if e.starts_with('.') {
                    e.to_string()
                } else {
                    format!(".{}", e)
                }
            })
            .collect();
        self
    }

    fn merges(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                self.extensions
                    .iter()
                    .any(|x| x.strip_prefix('.').unwrap_or(x) == e)
            })
            .unwrap_or(false)
    }

    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|n| self.ignore_dirs.iter().any(|d| d == n))
                .unwrap_or(false)
    }

    fn is_ignored_file(&self, entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|n| self.ignore_files.iter().any(|f| f == n))
            .unwrap_or(false)
    }
}

/// Counts reported after a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Files in the structure listing.
    pub listed: usize,
    /// Files whose contents were merged.
    pub merged: usize,
    /// Merged files that could not be read as text.
    pub unreadable: usize,
}

/// Walk `root` and write the merged text to `output`.
pub fn merge_sources(root: &Path, output: &Path, options: &MergeOptions) -> Result<MergeStats> {
    if !root.is_dir() {
        return Err(EvalError::InvalidConfig(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    // Create the output up front so it can be recognized during the walk.
    std::fs::write(output, "").map_err(|e| EvalError::io(output, e))?;
    let output_abs = output.canonicalize().map_err(|e| EvalError::io(output, e))?;

    let files = collect_files(root, options, &output_abs);
    let mut stats = MergeStats {
        listed: files.len(),
        ..Default::default()
    };

    let mut text = String::new();
    let _ = writeln!(text, "{}", STRUCTURE_HEADER);
    for path in &files {
        let _ = writeln!(text, "{}", path.display());
    }
    let _ = write!(text, "\n\n{}\n\n", CONTENTS_HEADER);

    for path in files.iter().filter(|p| options.merges(p)) {
        stats.merged += 1;
        let _ = writeln!(text, "\n\n--- START OF FILE: {} ---", path.display());
        match std::fs::read_to_string(path) {
            Ok(content) => text.push_str(&content),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                stats.unreadable += 1;
                let _ = write!(text, "Error reading file: {}", e);
            }
        }
        let _ = writeln!(text, "\n--- END OF FILE: {} ---", path.display());
    }

    std::fs::write(output, text).map_err(|e| EvalError::io(output, e))?;
    Ok(stats)
}

/// Non-ignored files under `root` in walk order, excluding `output`.
fn collect_files(root: &Path, options: &MergeOptions, output: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !options.is_ignored_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && !options.is_ignored_file(e))
        .filter(|e| {
            e.path()
                .canonicalize()
                .map(|p| p != output)
                .unwrap_or(true)
        })
        .map(DirEntry::into_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("src/app.tsx"), "export default App;").unwrap();
        fs::write(root.join("src/components/Card.jsx"), "<Card />").unwrap();
        fs::write(root.join("src/logo.svg"), "<svg/>").unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();
        fs::write(root.join("package-lock.json"), "{}").unwrap();
        fs::write(root.join("node_modules/react/index.js"), "react").unwrap();
        dir
    }

    #[test]
    fn test_merge_lists_and_wraps_files() {
        let dir = project();
        let output = dir.path().join("context.txt");

        let stats = merge_sources(dir.path(), &output, &MergeOptions::default()).unwrap();
        let text = fs::read_to_string(&output).unwrap();

        assert!(text.starts_with(STRUCTURE_HEADER));
        assert!(text.contains(CONTENTS_HEADER));
        // package.json, app.tsx, Card.jsx, logo.svg
        assert_eq!(stats.listed, 4);
        assert_eq!(stats.merged, 3);
        assert_eq!(stats.unreadable, 0);

        let app = dir.path().join("src/app.tsx");
        assert!(text.contains(&format!(
            "--- START OF FILE: {} ---\nexport default App;\n--- END OF FILE: {} ---",
            app.display(),
            app.display()
        )));
        assert!(text.contains("logo.svg"));
        assert!(!text.contains("<svg/>"));
    }

    #[test]
    fn test_ignored_entries_and_output_are_skipped() {
        let dir = project();
        let output = dir.path().join("context.txt");
        merge_sources(dir.path(), &output, &MergeOptions::default()).unwrap();
        let text = fs::read_to_string(&output).unwrap();

        assert!(!text.contains("node_modules"));
        assert!(!text.contains("package-lock.json"));
        assert!(!text.contains("context.txt"));
    }

    #[test]
    fn test_extension_override() {
        let dir = project();
        let output = dir.path().join("out.txt");
        let options = MergeOptions::default().with_extensions(["svg"]);

        let stats = merge_sources(dir.path(), &output, &options).unwrap();
        let text = fs::read_to_string(&output).unwrap();

        assert_eq!(stats.merged, 1);
        assert!(text.contains("<svg/>"));
        assert!(!text.contains("export default App;"));
    }

    #[test]
    fn test_unreadable_file_gets_error_line() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.ts"), [0xff, 0xfe, 0x00]).unwrap();
        let output = dir.path().join("out.txt");

        let stats = merge_sources(dir.path(), &output, &MergeOptions::default()).unwrap();
        let text = fs::read_to_string(&output).unwrap();

        assert_eq!(stats.unreadable, 1);
        assert!(text.contains("Error reading file: "));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = merge_sources(
            &dir.path().join("nope"),
            &dir.path().join("out.txt"),
            &MergeOptions::default(),
        );
        assert!(result.is_err());
    }
}
