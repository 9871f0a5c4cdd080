use anyhow::{Context, Result};
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Swaps a trailing `.{from}` for `.{to}` in the path part of `target`,
/// leaving any query string or fragment behind it untouched.
fn retarget(target: &str, from: &str, to: &str) -> Option<String> {
    let path_end = target.find(['?', '#']).unwrap_or(target.len());
    let (path, suffix) = target.split_at(path_end);
    let stem = path.strip_suffix(from)?;
    Some(format!("{}{}{}", stem, to, suffix))
}

/// Rewrites every `href` attribute whose path ends in `.{from_ext}` to end in
/// `.{to_ext}` instead. Query strings and fragments are kept. Only attributes
/// of elements are touched; text, comments and script bodies pass through.
pub fn retarget_links(html: &str, from_ext: &str, to_ext: &str) -> Result<String> {
    let from = format!(".{}", from_ext);
    let to = format!(".{}", to_ext);

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[href]", |el| {
                let retargeted = el
                    .get_attribute("href")
                    .and_then(|target| retarget(&target, &from, &to));
                if let Some(target) = retargeted {
                    el.set_attribute("href", &target)?;
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
    .context("Failed to rewrite links in rendered HTML");
    rewritten
}
