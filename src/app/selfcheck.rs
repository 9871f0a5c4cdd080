use crate::app::links::retarget_links;
use crate::app::mirror::{DOCUMENT_EXTENSION, HYPERTEXT_EXTENSION};
use crate::app::models::{PathMapping, Settings};
use crate::app::paths::{map_output_path, normalize_path, relative_ref};
use crate::app::renderer::{RenderConfig, Renderer};
use anyhow::{bail, ensure, Result};
use std::path::{Path, PathBuf};

const SAMPLE_DOCUMENT: &str = "= Self check\n\n\
    Plain paragraph.\n\n\
    ++++\n\
    <a href=\"sibling.adoc\">sibling</a> <a href=\"sibling.adoc#top\">top</a>\n\
    ++++\n";

fn check_mapping(
    matched: &str,
    source: &str,
    dest: &str,
    mapping: PathMapping,
    expected: &str,
) -> Result<()> {
    let mapped = map_output_path(
        Path::new(matched),
        Path::new(source),
        Path::new(dest),
        mapping,
    );
    ensure!(
        mapped == PathBuf::from(expected),
        "expected {} but got {}",
        expected,
        mapped.display()
    );
    Ok(())
}

fn output_paths_literal() -> Result<()> {
    check_mapping(
        ".\\test\\adoc-manual\\it-IT\\adoc\\test_1.adoc",
        ".\\test\\adoc-manual",
        ".\\test\\html-manual",
        PathMapping::Literal,
        ".\\test\\html-manual\\it-IT\\adoc\\test_1.adoc",
    )?;
    check_mapping(
        "test\\adoc-manual\\it-IT\\adoc\\test_1.adoc",
        "test\\adoc-manual",
        "test\\html-manual",
        PathMapping::Literal,
        "test\\html-manual\\it-IT\\adoc\\test_1.adoc",
    )?;
    check_mapping(
        "test\\adoc-manual\\it-IT\\adoc\\test_1.adoc",
        "test",
        "testTarget",
        PathMapping::Literal,
        "testTarget\\adoc-manual\\it-IT\\adoc\\test_1.adoc",
    )
}

fn output_paths_segments() -> Result<()> {
    let normalized = |p: &str| normalize_path(p).to_string_lossy().into_owned();
    check_mapping(
        &normalized(".\\test\\adoc-manual\\it-IT\\adoc\\test_1.adoc"),
        &normalized(".\\test\\adoc-manual"),
        &normalized(".\\test\\html-manual"),
        PathMapping::Segments,
        "test/html-manual/it-IT/adoc/test_1.adoc",
    )?;
    check_mapping(
        "test/adoc-manual/it-IT/adoc/test_1.adoc",
        "test",
        "testTarget",
        PathMapping::Segments,
        "testTarget/adoc-manual/it-IT/adoc/test_1.adoc",
    )
}

fn stylesheet_reference() -> Result<()> {
    for (output, css) in [
        (
            "./test/html-manual/it-IT/adoc/aggiungere_documenti.html",
            "./test/html-manual/css/style.css",
        ),
        (
            "test/html-manual/it-IT/adoc/aggiungere_documenti.html",
            "test/html-manual/css/style.css",
        ),
    ] {
        let relative = relative_ref(&normalize_path(output), &normalize_path(css))?;
        ensure!(
            relative == "../../css/style.css",
            "expected ../../css/style.css but got {}",
            relative
        );
    }
    Ok(())
}

fn link_retargeting() -> Result<()> {
    let html = retarget_links(
        r#"<a href="other.adoc">one</a><a href="other.adoc">two</a>"#,
        DOCUMENT_EXTENSION,
        HYPERTEXT_EXTENSION,
    )?;
    ensure!(
        html == r#"<a href="other.html">one</a><a href="other.html">two</a>"#,
        "unexpected output {}",
        html
    );
    Ok(())
}

fn engine_round_trip(settings: &Settings, renderer: &impl Renderer) -> Result<()> {
    let stylesheet = relative_ref(
        Path::new("check/html/guide/page.html"),
        Path::new("check/html/css/style.css"),
    )?;
    let config = RenderConfig::new(&settings.render, Some(stylesheet));
    let rendered = renderer.render(SAMPLE_DOCUMENT, &config)?;
    let html = retarget_links(&rendered, DOCUMENT_EXTENSION, HYPERTEXT_EXTENSION)?;

    ensure!(
        html.contains(r#"href="sibling.html""#) && html.contains(r#"href="sibling.html#top""#),
        "cross-document links were not retargeted"
    );
    ensure!(
        !html.contains(r#"href="sibling.adoc"#),
        "a link still points at the source document"
    );
    Ok(())
}

/// Runs every check, reporting each one, and fails if any of them did.
pub fn run(settings: &Settings, renderer: &impl Renderer) -> Result<()> {
    let checks: Vec<(&str, Result<()>)> = vec![
        ("output paths (literal)", output_paths_literal()),
        ("output paths (segments)", output_paths_segments()),
        ("stylesheet reference", stylesheet_reference()),
        ("link retargeting", link_retargeting()),
        ("rendering engine", engine_round_trip(settings, renderer)),
    ];

    let mut failed = 0;
    for (name, outcome) in &checks {
        match outcome {
            Ok(()) => println!("{}: ok", name),
            Err(err) => {
                failed += 1;
                println!("{}: FAILED ({:#})", name, err);
            }
        }
    }
    println!("done!");

    if failed > 0 {
        bail!("{} of {} self-checks failed", failed, checks.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{PathSettings, RenderOptions};
    use std::collections::BTreeMap;

    struct PassThrough;

    impl Renderer for PassThrough {
        fn render(&self, source: &str, _config: &RenderConfig<'_>) -> Result<String> {
            Ok(source.to_string())
        }
    }

    struct Failing;

    impl Renderer for Failing {
        fn render(&self, _source: &str, _config: &RenderConfig<'_>) -> Result<String> {
            bail!("engine unavailable")
        }
    }

    fn settings() -> Settings {
        Settings {
            render: RenderOptions {
                command: "unused".to_string(),
                command_args: Vec::new(),
                show_title: false,
                numbered_headings: false,
                toc: false,
                safe_mode: "unsafe".to_string(),
                header_footer: false,
                doctype: "article".to_string(),
                backend: "html5".to_string(),
                mkdirs: true,
                attributes: BTreeMap::new(),
            },
            paths: PathSettings {
                mapping: PathMapping::Segments,
            },
        }
    }

    #[test]
    fn pure_checks_pass() {
        output_paths_literal().unwrap();
        output_paths_segments().unwrap();
        stylesheet_reference().unwrap();
        link_retargeting().unwrap();
    }

    #[test]
    fn passes_with_a_working_engine() {
        assert!(run(&settings(), &PassThrough).is_ok());
    }

    #[test]
    fn engine_failure_fails_the_run() {
        let err = run(&settings(), &Failing).unwrap_err();
        assert!(err.to_string().contains("1 of 5"));
    }
}
