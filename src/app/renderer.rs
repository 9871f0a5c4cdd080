use crate::app::models::RenderOptions;
use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Options for one document: the shared base plus the stylesheet reference
/// computed for that document's location.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    pub base: &'a RenderOptions,
    pub stylesheet: Option<String>,
}

impl<'a> RenderConfig<'a> {
    pub fn new(base: &'a RenderOptions, stylesheet: Option<String>) -> Self {
        Self { base, stylesheet }
    }

    /// Document attributes in the order they are handed to the engine.
    pub fn attributes(&self) -> Vec<String> {
        let mut attributes = Vec::new();
        if self.base.show_title {
            attributes.push("showtitle".to_string());
        }
        if self.base.numbered_headings {
            attributes.push("sectnums".to_string());
        }
        if self.base.toc {
            attributes.push("toc".to_string());
        }
        for (name, value) in &self.base.attributes {
            if value.is_empty() {
                attributes.push(name.clone());
            } else {
                attributes.push(format!("{}={}", name, value));
            }
        }
        if let Some(stylesheet) = &self.stylesheet {
            attributes.push("linkcss".to_string());
            attributes.push(format!("stylesheet={}", stylesheet));
        }
        attributes
    }
}

/// Turns raw document text into rendered markup.
pub trait Renderer {
    fn render(&self, source: &str, config: &RenderConfig<'_>) -> Result<String>;
}

/// Drives the `asciidoctor` executable (or whatever `render.command` names),
/// streaming the document through stdin and reading HTML back from stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct Asciidoctor;

impl Asciidoctor {
    fn args(config: &RenderConfig<'_>) -> Vec<String> {
        let base = config.base;
        let mut args = base.command_args.clone();
        args.extend([
            "-b".to_string(),
            base.backend.clone(),
            "-d".to_string(),
            base.doctype.clone(),
            "-S".to_string(),
            base.safe_mode.clone(),
        ]);
        if !base.header_footer {
            args.push("-s".to_string());
        }
        for attribute in config.attributes() {
            args.push("-a".to_string());
            args.push(attribute);
        }
        args.extend(["-o".to_string(), "-".to_string(), "-".to_string()]);
        args
    }
}

impl Renderer for Asciidoctor {
    fn render(&self, source: &str, config: &RenderConfig<'_>) -> Result<String> {
        let command = &config.base.command;
        let args = Self::args(config);
        log::debug!("Invoking {} {}", command, args.join(" "));

        let mut child = Command::new(command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start rendering engine `{}`", command))?;

        let mut stdin = child
            .stdin
            .take()
            .context("Rendering engine stdin is unavailable")?;
        // Feed stdin from its own thread so a large document cannot deadlock
        // against a full stdout pipe.
        let input = source.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for rendering engine `{}`", command))?;

        if !output.status.success() {
            bail!(
                "Rendering engine `{}` exited with {}: {}",
                command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        writer
            .join()
            .map_err(|_| anyhow!("Rendering engine input writer panicked"))?
            .context("Failed to send document to rendering engine")?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            log::warn!("{}", stderr.trim());
        }

        String::from_utf8(output.stdout).context("Rendering engine produced invalid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn options() -> RenderOptions {
        RenderOptions {
            command: "asciidoctor".to_string(),
            command_args: Vec::new(),
            show_title: true,
            numbered_headings: true,
            toc: true,
            safe_mode: "unsafe".to_string(),
            header_footer: true,
            doctype: "help-article".to_string(),
            backend: "html5".to_string(),
            mkdirs: true,
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn base_attributes_without_stylesheet() {
        let base = options();
        let config = RenderConfig::new(&base, None);
        assert_eq!(config.attributes(), vec!["showtitle", "sectnums", "toc"]);
    }

    #[test]
    fn stylesheet_adds_linkcss_directive() {
        let base = options();
        let config = RenderConfig::new(&base, Some("../css/style.css".to_string()));
        let attributes = config.attributes();
        assert!(attributes.contains(&"linkcss".to_string()));
        assert!(attributes.contains(&"stylesheet=../css/style.css".to_string()));
        // The base is shared, not modified.
        assert!(base.attributes.is_empty());
    }

    #[test]
    fn disabled_flags_and_extra_attributes() {
        let mut base = options();
        base.show_title = false;
        base.toc = false;
        base.attributes.insert("icons".to_string(), "font".to_string());
        base.attributes.insert("experimental".to_string(), String::new());
        let config = RenderConfig::new(&base, None);
        assert_eq!(
            config.attributes(),
            vec!["sectnums", "experimental", "icons=font"]
        );
    }

    #[test]
    fn engine_arguments() {
        let mut base = options();
        base.header_footer = false;
        let config = RenderConfig::new(&base, None);
        let args = Asciidoctor::args(&config);
        assert_eq!(
            &args[..6],
            &["-b", "html5", "-d", "help-article", "-S", "unsafe"]
        );
        assert!(args.contains(&"-s".to_string()));
        assert_eq!(&args[args.len() - 3..], &["-o", "-", "-"]);
    }

    #[test]
    fn command_args_come_first() {
        let mut base = options();
        base.command = "bundle".to_string();
        base.command_args = vec!["exec".to_string(), "asciidoctor".to_string()];
        let config = RenderConfig::new(&base, None);
        let args = Asciidoctor::args(&config);
        assert_eq!(&args[..4], &["exec", "asciidoctor", "-b", "html5"]);
    }

    #[test]
    fn missing_engine_is_an_error() {
        let mut base = options();
        base.command = "adoc-mirror-no-such-engine".to_string();
        let config = RenderConfig::new(&base, None);
        assert!(Asciidoctor.render("= Title", &config).is_err());
    }
}
