// Declare modules
pub mod cli;
pub mod config;
pub mod links;
pub mod mirror;
pub mod models;
pub mod paths;
pub mod renderer;
pub mod scanner;
pub mod selfcheck;

use anyhow::{Context, Result};
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::mirror::Mirror;
use self::models::RunPlan;
use self::paths::{normalize_path, to_slash};
use self::renderer::Asciidoctor;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let settings = resolve_config(args.config.as_deref())?;

    if args.test {
        return selfcheck::run(&settings, &Asciidoctor);
    }

    // 3. Validate roots
    let source = args
        .source_dir
        .as_deref()
        .context("source-dir is required")?;
    let destination = args
        .destination_dir
        .as_deref()
        .context("destination-dir is required")?;

    let source_root = normalize_path(source);
    if !source_root.exists() {
        log::error!("Source directory does not exist: {}", to_slash(&source_root));
        return Ok(());
    }
    let dest_root = normalize_path(destination);

    // 4. Build the run plan
    let plan = RunPlan {
        stylesheet: args
            .css
            .as_deref()
            .map(|css| normalize_path(&to_slash(&dest_root.join(css)))),
        ignore: args.ignore_list(),
        source_root,
        dest_root,
        silent: args.silent,
        pattern: args.pattern,
    };

    // 5. Mirror the tree
    let summary = Mirror::new(&plan, &settings, Asciidoctor).run()?;

    if !plan.silent {
        println!(
            "Done: {} documents rendered, {} files copied into {}",
            summary.documents,
            summary.assets,
            to_slash(&plan.dest_root)
        );
    }

    Ok(())
}
