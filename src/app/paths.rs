use crate::app::models::PathMapping;
use anyhow::{Context, Result};
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

/// Renders a path with `/` separators regardless of host conventions.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically normalizes a user-supplied path: `\` becomes `/`, `.` segments are
/// dropped and `..` folds into its parent where one is available.
pub fn normalize_path(input: &str) -> PathBuf {
    let unified = input.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // Nothing above the filesystem root.
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => PathBuf::from(format!("/{}", joined)),
        (false, true) => PathBuf::from("."),
        (false, false) => PathBuf::from(joined),
    }
}

/// Computes where a matched source file lands under the destination root.
///
/// When the source root cannot be substituted the matched path comes back
/// unchanged; callers are expected to pass paths that live under `source_root`.
pub fn map_output_path(
    matched: &Path,
    source_root: &Path,
    dest_root: &Path,
    mapping: PathMapping,
) -> PathBuf {
    match mapping {
        PathMapping::Segments => match matched.strip_prefix(source_root) {
            Ok(rest) => dest_root.join(rest),
            Err(_) => matched.to_path_buf(),
        },
        PathMapping::Literal => {
            // Plain substring replacement: a root that recurs earlier in the
            // path is replaced there instead.
            let matched = matched.to_string_lossy();
            let source = source_root.to_string_lossy();
            PathBuf::from(matched.replacen(source.as_ref(), &dest_root.to_string_lossy(), 1))
        }
    }
}

/// Parent directory in lexical normal form, with the current directory as an
/// empty path so it never pairs up against a real segment.
fn parent_dir(file: &Path) -> PathBuf {
    let parent = file.parent().unwrap_or(Path::new(""));
    let dir = normalize_path(&to_slash(parent));
    if dir == Path::new(".") {
        PathBuf::new()
    } else {
        dir
    }
}

/// Path of `css_file` as seen from the directory holding `output_file`, `/`-separated.
pub fn relative_ref(output_file: &Path, css_file: &Path) -> Result<String> {
    let output_dir = parent_dir(output_file);
    let css_dir = parent_dir(css_file);
    let css_name = css_file
        .file_name()
        .with_context(|| format!("Stylesheet path has no file name: {}", css_file.display()))?;

    let relative = diff_paths(&css_dir, &output_dir).with_context(|| {
        format!(
            "Cannot reach {} from {}",
            css_file.display(),
            output_dir.display()
        )
    })?;

    Ok(to_slash(&relative.join(css_name)))
}
