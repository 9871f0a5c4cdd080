use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Mirror a directory tree, rendering AsciiDoc documents to HTML"
)]
pub struct Cli {
    /// Directory to read documents and assets from
    #[arg(required_unless_present = "test")]
    pub source_dir: Option<String>,

    /// Directory to write the mirrored tree into
    #[arg(required_unless_present = "test")]
    pub destination_dir: Option<String>,

    /// A css file to link from every rendered document, relative to the destination dir
    #[arg(short, long)]
    pub css: Option<String>,

    /// Run silently
    #[arg(short, long)]
    pub silent: bool,

    /// Pattern appended to the source dir to select files
    #[arg(short, long, default_value = "/**/*.*")]
    pub pattern: String,

    /// Comma-separated list of folders/files to ignore
    #[arg(short, long)]
    pub ignore: Option<String>,

    /// Run the built-in self-check instead of a conversion
    #[arg(short, long)]
    pub test: bool,

    /// Local configuration override (defaults to ~/.config/adoc_mirror/local.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Splits `--ignore` on commas, dropping empty entries.
    pub fn ignore_list(&self) -> Vec<String> {
        self.ignore
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_args_and_defaults() {
        let cli = Cli::parse_from(["adoc_mirror", "docs", "site"]);
        assert_eq!(cli.source_dir.as_deref(), Some("docs"));
        assert_eq!(cli.destination_dir.as_deref(), Some("site"));
        assert_eq!(cli.pattern, "/**/*.*");
        assert!(!cli.silent);
        assert!(cli.css.is_none());
        assert!(cli.ignore_list().is_empty());
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from([
            "adoc_mirror",
            "docs",
            "site",
            "-c",
            "css/style.css",
            "-s",
            "-p",
            "/**/*.adoc",
            "-i",
            "drafts/**, ,*.tmp",
        ]);
        assert_eq!(cli.css.as_deref(), Some("css/style.css"));
        assert!(cli.silent);
        assert_eq!(cli.pattern, "/**/*.adoc");
        assert_eq!(cli.ignore_list(), vec!["drafts/**", "*.tmp"]);
    }

    #[test]
    fn positionals_are_required_without_test() {
        assert!(Cli::try_parse_from(["adoc_mirror", "docs"]).is_err());
        assert!(Cli::try_parse_from(["adoc_mirror"]).is_err());
    }

    #[test]
    fn test_flag_needs_no_positionals() {
        let cli = Cli::try_parse_from(["adoc_mirror", "--test"]).unwrap();
        assert!(cli.test);
        assert!(cli.source_dir.is_none());
    }
}
