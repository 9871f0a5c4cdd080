use crate::app::links::retarget_links;
use crate::app::models::{RunPlan, RunSummary, Settings};
use crate::app::paths::{map_output_path, relative_ref};
use crate::app::renderer::{RenderConfig, Renderer};
use crate::app::scanner::Scanner;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DOCUMENT_EXTENSION: &str = "adoc";
pub const HYPERTEXT_EXTENSION: &str = "html";

/// What happens to a matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Document,
    Asset,
}

/// Documents are recognised by their exact, case-sensitive extension.
pub fn route(path: &Path) -> Route {
    match path.extension() {
        Some(ext) if ext == DOCUMENT_EXTENSION => Route::Document,
        _ => Route::Asset,
    }
}

/// Walks the source tree and writes its mirror, one file at a time.
pub struct Mirror<'a, R: Renderer> {
    plan: &'a RunPlan,
    settings: &'a Settings,
    renderer: R,
}

impl<'a, R: Renderer> Mirror<'a, R> {
    pub fn new(plan: &'a RunPlan, settings: &'a Settings, renderer: R) -> Self {
        Self {
            plan,
            settings,
            renderer,
        }
    }

    /// Stops at the first failure; files already written stay in place.
    pub fn run(&self) -> Result<RunSummary> {
        let plan = self.plan;
        let scanner = Scanner::new(&plan.source_root, &plan.pattern, &plan.ignore)?;
        let mut summary = RunSummary::default();

        for file in scanner.scan() {
            let output = map_output_path(
                &file.path,
                &plan.source_root,
                &plan.dest_root,
                self.settings.paths.mapping,
            );

            if !plan.silent {
                println!("Running on -> {}", file.path.display());
            }

            match route(&file.path) {
                Route::Document => {
                    let output = output.with_extension(HYPERTEXT_EXTENSION);
                    log::debug!("{} -> {} (document)", file.relative_path, output.display());
                    self.convert_document(&file.path, &output)?;
                    summary.documents += 1;
                }
                Route::Asset => {
                    log::debug!("{} -> {} (asset)", file.relative_path, output.display());
                    self.copy_asset(&file.path, &output)?;
                    summary.assets += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Renders one document and retargets its links to sibling documents.
    pub fn convert_document(&self, source: &Path, output: &Path) -> Result<()> {
        let stylesheet = match &self.plan.stylesheet {
            Some(css) => Some(relative_ref(output, css)?),
            None => None,
        };
        let config = RenderConfig::new(&self.settings.render, stylesheet);

        let raw = fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let rendered = self
            .renderer
            .render(&raw, &config)
            .with_context(|| format!("Failed to render {}", source.display()))?;
        let html = retarget_links(&rendered, DOCUMENT_EXTENSION, HYPERTEXT_EXTENSION)?;

        if config.base.mkdirs {
            ensure_parent(output)?;
        }
        fs::write(output, html).with_context(|| format!("Failed to write {}", output.display()))
    }

    /// Copies bytes verbatim, creating the destination directory first.
    pub fn copy_asset(&self, source: &Path, output: &Path) -> Result<()> {
        ensure_parent(output)?;
        fs::copy(source, output).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                source.display(),
                output.display()
            )
        })?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}
