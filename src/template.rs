//! Template loading and resource rewriting
//!
//! The preview template references its scripts and stylesheets with paths
//! relative to the content folder. A surface can only load resources through
//! addresses the host hands out, so every such reference is rewritten through
//! a [`ResourceUris`] mapping before the template is assigned as content.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{PreviewError, PreviewResult};

static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>").expect("valid script tag pattern"));
static LINK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid link tag pattern"));
static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid src pattern")
});
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\shref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid href pattern")
});
static STYLESHEET_REL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\srel\s*=\s*["']?stylesheet\b"#).expect("valid rel pattern")
});

/// Host mapping from a file under the content folder to an address the
/// surface can load. Must be collision-free and return absolute URIs.
pub trait ResourceUris {
    fn resource_uri(&self, path: &Path) -> String;
}

impl<F> ResourceUris for F
where
    F: Fn(&Path) -> String,
{
    fn resource_uri(&self, path: &Path) -> String {
        self(path)
    }
}

/// Loads templates from a content folder and rewrites their resource references
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    content_folder: PathBuf,
}

impl TemplateResolver {
    pub fn new(content_folder: impl Into<PathBuf>) -> Self {
        Self {
            content_folder: content_folder.into(),
        }
    }

    /// Read `template_name` from the content folder and rewrite its resources
    ///
    /// A failed read is reported immediately as [`PreviewError::TemplateRead`].
    pub fn render(&self, template_name: &str, uris: &dyn ResourceUris) -> PreviewResult<String> {
        let path = self.content_folder.join(template_name);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| PreviewError::template_read(&path, &e))?;
        Ok(self.rewrite(&text, uris))
    }

    /// Rewrite every relative `<script src>` and stylesheet `<link href>`
    ///
    /// References that already carry a scheme are left alone, so running this
    /// on its own output changes nothing.
    pub fn rewrite(&self, html: &str, uris: &dyn ResourceUris) -> String {
        let scripts_done = SCRIPT_TAG.replace_all(html, |caps: &Captures| {
            rewrite_attribute(&caps[0], &SRC_ATTR, |r| self.map_reference(r, uris))
        });

        LINK_TAG
            .replace_all(&scripts_done, |caps: &Captures| {
                let tag = &caps[0];
                if STYLESHEET_REL.is_match(tag) {
                    rewrite_attribute(tag, &HREF_ATTR, |r| self.map_reference(r, uris))
                } else {
                    tag.to_string()
                }
            })
            .into_owned()
    }

    fn map_reference(&self, reference: &str, uris: &dyn ResourceUris) -> Option<String> {
        if reference.is_empty() || is_absolute_reference(reference) {
            return None;
        }

        let split = reference.find(['?', '#']).unwrap_or(reference.len());
        let (path_part, suffix) = reference.split_at(split);

        let mut path = self.content_folder.clone();
        for segment in path_part.split('/') {
            if !segment.is_empty() && segment != "." {
                path.push(segment);
            }
        }
        Some(format!("{}{}", uris.resource_uri(&path), suffix))
    }
}

/// Replace the value of the first matching attribute, keeping everything
/// else in the tag (quotes, other attributes, spacing) as written
fn rewrite_attribute(
    tag: &str,
    attribute: &Regex,
    map: impl Fn(&str) -> Option<String>,
) -> String {
    let Some(value) = attribute
        .captures(tag)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
    else {
        return tag.to_string();
    };

    match map(value.as_str()) {
        Some(uri) => format!("{}{}{}", &tag[..value.start()], uri, &tag[value.end()..]),
        None => tag.to_string(),
    }
}

/// `scheme:...` (two or more scheme chars, so `C:` drive paths don't count)
/// or protocol-relative `//host/...`
fn is_absolute_reference(reference: &str) -> bool {
    if reference.starts_with("//") {
        return true;
    }
    match reference.find(':') {
        Some(idx) if idx >= 2 => {
            let scheme = &reference[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Embed the document text into rendered template content
///
/// The text becomes a JSON string literal assigned to
/// `window.__DOT_SOURCE__`, placed right before `</head>`.
pub fn inject_source(html: &str, source: &str) -> String {
    let literal = serde_json::to_string(source)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/");
    let script = format!("<script>window.__DOT_SOURCE__ = {};</script>\n", literal);

    match html.to_ascii_lowercase().find("</head>") {
        Some(idx) => format!("{}{}{}", &html[..idx], script, &html[idx..]),
        None => format!("{}{}", script, html),
    }
}
