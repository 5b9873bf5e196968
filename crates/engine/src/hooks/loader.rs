//! Script discovery and command resolution
//!
//! Walks the configured search roots for scripts with the target extension and
//! matches logical command names against what was found.

use hookscript_config::PluginOptions;
use hookscript_core::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discover scripts under a set of search roots
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    roots: Vec<PathBuf>,
    extension: String,
}

impl ScriptLoader {
    /// Create a loader for the given roots and extension (leading dot optional)
    #[must_use]
    pub fn new(roots: &[PathBuf], extension: &str) -> Self {
        Self {
            roots: roots.to_vec(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Create a loader for the search roots and extension of the options
    #[must_use]
    pub fn from_options(options: &PluginOptions) -> Self {
        Self::new(&options.paths, &options.extension)
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Walk every root and collect matching scripts
    ///
    /// Roots are walked in order, depth first, each directory in the order the
    /// filesystem lists it. Symbolic links below a root are neither followed
    /// nor reported. Relative roots are made absolute against the current
    /// working directory, so every returned path is absolute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Walk`] if a root or any directory below it cannot be
    /// read. No partial result is returned.
    pub fn walk(&self) -> Result<DiscoveredScripts> {
        let mut scripts = Vec::new();

        for root in &self.roots {
            let root = std::path::absolute(root).map_err(|source| Error::Walk {
                path: root.clone(),
                source,
            })?;
            tracing::debug!("Walking search root: {}", root.display());

            for entry in WalkDir::new(&root).follow_links(false) {
                let entry = entry.map_err(|e| walk_error(&root, e))?;

                if entry.depth() == 0 && !entry.file_type().is_dir() {
                    return Err(Error::Walk {
                        path: root,
                        source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
                    });
                }

                if entry.file_type().is_file() && self.matches(entry.path()) {
                    scripts.push(entry.into_path());
                }
            }
        }

        tracing::debug!(count = scripts.len(), "Discovered scripts");
        Ok(DiscoveredScripts(scripts))
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.extension.as_str())
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    Error::Walk { path, source }
}

/// Scripts found by one walk, in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredScripts(Vec<PathBuf>);

impl DiscoveredScripts {
    /// Find the script for a logical command name
    ///
    /// See [`resolve`].
    #[must_use]
    pub fn resolve(&self, command: &str) -> Option<&Path> {
        resolve(&self.0, command)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PathBuf>> for DiscoveredScripts {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }
}

impl<'a> IntoIterator for &'a DiscoveredScripts {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Return the first discovered path whose string form ends with `command`
///
/// This is a plain suffix match, not a path-segment match: `build.py` also
/// matches `/scripts/prebuild.py`. When several paths match, walk order
/// decides. Use a longer suffix such as `/build.py` or `tools/build.py` to
/// pin a specific script.
#[must_use]
pub fn resolve<'a>(discovered: &'a [PathBuf], command: &str) -> Option<&'a Path> {
    discovered
        .iter()
        .find(|path| path.to_string_lossy().ends_with(command))
        .map(PathBuf::as_path)
}
