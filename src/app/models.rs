use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Represents the final configuration after merging the base file and the local override.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub render: RenderOptions,
    pub paths: PathSettings,
}

/// Options handed to the rendering engine for every document.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    pub command: String,
    /// Arguments placed before the engine options, e.g. `["exec", "asciidoctor"]` for `bundle`.
    #[serde(default)]
    pub command_args: Vec<String>,
    pub show_title: bool,
    pub numbered_headings: bool,
    pub toc: bool,
    pub safe_mode: String,
    pub header_footer: bool,
    pub doctype: String,
    pub backend: String,
    pub mkdirs: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathSettings {
    pub mapping: PathMapping,
}

/// How a matched source path is turned into a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMapping {
    /// Strip the source root component by component.
    Segments,
    /// Replace the first occurrence of the source root string.
    Literal,
}

/// Everything a single mirroring run needs, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub stylesheet: Option<PathBuf>,
    pub silent: bool,
    pub pattern: String,
    pub ignore: Vec<String>,
}

/// A regular file under the source root selected by the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub path: PathBuf,
    pub relative_path: String, // Relative to the source root, `/`-separated
}

/// Counts reported once a run has completed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub assets: usize,
}
