//! Integration tests for template loading and resource rewriting

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use dotview::config::PreviewConfig;
use dotview::template::{inject_source, TemplateResolver};
use dotview::PreviewError;

fn uri_for(path: &Path) -> String {
    format!("res://{}", path.display())
}

fn content_folder_with(template: &str) -> tempfile::TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("index.html"), template).unwrap();
    dir
}

// ============================================================================
// Rewriting
// ============================================================================

#[test]
fn test_relative_script_and_stylesheet_are_rewritten() {
    let dir = content_folder_with(
        r#"<html><head>
<link rel="stylesheet" href="css/preview.css">
<script src="js/preview.js"></script>
</head></html>"#,
    );
    let resolver = TemplateResolver::new(dir.path());

    let html = resolver.render("index.html", &uri_for).unwrap();

    let css = dir.path().join("css").join("preview.css");
    let js = dir.path().join("js").join("preview.js");
    assert!(html.contains(&format!(r#"href="{}""#, uri_for(&css))));
    assert!(html.contains(&format!(r#"src="{}""#, uri_for(&js))));
}

#[test]
fn test_absolute_references_are_left_alone() {
    let template = r#"<head>
<script src="https://cdn.example.com/viz.js"></script>
<script src="//cdn.example.com/other.js"></script>
<link rel="stylesheet" href="http://example.com/a.css">
</head>"#;
    let dir = content_folder_with(template);
    let resolver = TemplateResolver::new(dir.path());

    let html = resolver.render("index.html", &uri_for).unwrap();

    assert_eq!(html, template);
}

#[test]
fn test_non_stylesheet_links_are_left_alone() {
    let template = r#"<link rel="icon" href="icon.png"><link rel="stylesheet" href="a.css">"#;
    let resolver = TemplateResolver::new("/content");

    let html = resolver.rewrite(template, &uri_for);

    assert!(html.contains(r#"<link rel="icon" href="icon.png">"#));
    assert!(html.contains(&format!(r#"href="{}""#, uri_for(Path::new("/content/a.css")))));
}

#[test]
fn test_inline_scripts_are_left_alone() {
    let template = "<script>console.log('hi')</script>";
    let resolver = TemplateResolver::new("/content");

    assert_eq!(resolver.rewrite(template, &uri_for), template);
}

#[test]
fn test_rewriting_is_idempotent() {
    let template = r#"<script src="js/a.js"></script><link href="b.css" rel="stylesheet">"#;
    let resolver = TemplateResolver::new("/content");

    let once = resolver.rewrite(template, &uri_for);
    let twice = resolver.rewrite(&once, &uri_for);

    assert_ne!(once, template);
    assert_eq!(once, twice);
}

#[test]
fn test_query_and_fragment_survive_rewriting() {
    let resolver = TemplateResolver::new("/content");

    let html = resolver.rewrite(r#"<script src="js/a.js?v=2#main"></script>"#, &uri_for);

    assert!(html.contains(&format!(
        r#"src="{}?v=2#main""#,
        uri_for(Path::new("/content/js/a.js"))
    )));
}

#[test]
fn test_single_quoted_attributes_are_rewritten() {
    let resolver = TemplateResolver::new("/content");

    let html = resolver.rewrite("<script type='module' src='a.js'></script>", &uri_for);

    assert_eq!(
        html,
        format!(
            "<script type='module' src='{}'></script>",
            uri_for(Path::new("/content/a.js"))
        )
    );
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_missing_template_reports_read_error() {
    let dir = tempdir().unwrap();
    let resolver = TemplateResolver::new(dir.path());

    let err = resolver.render("index.html", &uri_for).unwrap_err();

    match err {
        PreviewError::TemplateRead { path, .. } => {
            assert_eq!(path, dir.path().join("index.html"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_shipped_template_only_points_at_content_folder_or_absolute_urls() {
    let config = PreviewConfig::default();
    let resolver = TemplateResolver::new(&config.content_folder);

    let html = resolver.render(&config.template, &uri_for).unwrap();

    let local: Vec<PathBuf> = [("css", "preview.css"), ("js", "preview.js")]
        .iter()
        .map(|(dir, file)| config.content_folder.join(dir).join(file))
        .collect();
    for path in local {
        assert!(path.is_file(), "{} missing", path.display());
        assert!(html.contains(&uri_for(&path)));
    }
    assert!(!html.contains(r#"src="js/"#));
    assert!(!html.contains(r#"href="css/"#));
}

// ============================================================================
// Source injection
// ============================================================================

#[test]
fn test_source_is_injected_before_head_close() {
    let html = inject_source("<html><head><title>x</title></head><body></body></html>", "digraph { a }");

    let script_at = html.find("window.__DOT_SOURCE__").unwrap();
    let head_close = html.find("</head>").unwrap();
    assert!(script_at < head_close);
    assert!(html.contains(r#"window.__DOT_SOURCE__ = "digraph { a }";"#));
}

#[test]
fn test_injected_source_cannot_close_script_tag() {
    let html = inject_source("<head></head>", r#"digraph { a [label="</script>"] }"#);

    assert_eq!(html.matches("</script>").count(), 1);
}

#[test]
fn test_source_is_prepended_without_head() {
    let html = inject_source("<div></div>", "graph {}");

    assert!(html.starts_with("<script>"));
    assert!(html.ends_with("<div></div>"));
}
