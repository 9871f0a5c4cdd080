use crate::app::models::MatchedFile;
use crate::app::paths::to_slash;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

/// Enumerates the files under a source root that match the selection pattern.
pub struct Scanner {
    root: PathBuf,
    select: GlobMatcher,
    ignore: IgnoreRules,
}

/// Ignore entries are tested against both the full path and the path relative
/// to the source root. A bare name also covers everything below it.
#[derive(Clone)]
struct IgnoreRules {
    root: PathBuf,
    set: GlobSet,
}

impl IgnoreRules {
    fn is_ignored(&self, path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        if self.set.is_match(to_slash(path)) {
            return true;
        }
        diff_paths(path, &self.root)
            .map(|relative| self.set.is_match(to_slash(&relative)))
            .unwrap_or(false)
    }
}

impl Scanner {
    /// `pattern` is appended to the root as written, e.g. `/**/*.*`.
    pub fn new(root: &Path, pattern: &str, ignore: &[String]) -> Result<Self> {
        let full_pattern = format!("{}{}", to_slash(root), pattern);
        Ok(Self {
            root: root.to_path_buf(),
            select: build_glob(&full_pattern)?.compile_matcher(),
            ignore: IgnoreRules {
                root: root.to_path_buf(),
                set: build_globset(ignore)?,
            },
        })
    }

    /// Lazily walks the tree; entries come back sorted by name within each directory.
    pub fn scan(&self) -> impl Iterator<Item = MatchedFile> + '_ {
        let rules = self.ignore.clone();
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(true) // Dot files stay out, as with shell globbing
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !rules.is_ignored(entry.path()))
            .build();

        walker.filter_map(move |result| match result {
            Ok(entry) => self.process_entry(&entry),
            Err(err) => {
                log::warn!("Error walking entry: {}", err);
                None
            }
        })
    }

    fn process_entry(&self, entry: &DirEntry) -> Option<MatchedFile> {
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            return None;
        }

        let path = entry.path();
        if !self.select.is_match(to_slash(path)) {
            return None;
        }

        let relative = diff_paths(path, &self.root)?;
        Some(MatchedFile {
            path: path.to_path_buf(),
            relative_path: to_slash(&relative),
        })
    }
}

/// `*` stays within one path segment; `**` spans any number of them.
fn build_glob(pattern: &str) -> Result<globset::Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Invalid glob pattern: {}", pattern))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let pat = pat.trim_end_matches('/');
        if pat.is_empty() {
            continue;
        }
        builder.add(build_glob(pat)?);
        if !pat.ends_with("**") {
            builder.add(build_glob(&format!("{}/**", pat))?);
        }
    }
    Ok(builder.build()?)
}
