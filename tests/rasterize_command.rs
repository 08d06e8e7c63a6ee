//! Vector figures go through an external rasterizer.
//!
//! These tests spawn processes; they live in their own test binary so no
//! other test forks while a freshly written script is still open.

use std::fs;
use std::path::Path;

use paperfix::ast::{Attr, Block, Document, Inline};
use paperfix::{filter_document, ConversionError, FilterOptions, PassKind};
use pretty_assertions::assert_eq;

fn figure_doc(url: &str) -> Document {
    Document::new(vec![Block::Figure(
        Attr::with_id("fig:brain"),
        Default::default(),
        vec![Block::Plain(vec![Inline::Image(
            Attr::default().with_attribute("width", "0.5\\textwidth"),
            vec![],
            (url.to_string(), String::new()),
        )])],
    )])
}

fn images_only(root: &Path, rasterizer: String) -> FilterOptions {
    FilterOptions {
        resource_root: root.to_path_buf(),
        rasterizer,
        disable: PassKind::STANDARD
            .into_iter()
            .filter(|kind| *kind != PassKind::ImageRasterization)
            .collect(),
        ..FilterOptions::default()
    }
}

fn image_url(doc: &Document) -> &str {
    let Block::Figure(_, _, body) = &doc.blocks[0] else {
        panic!("figure missing");
    };
    let Block::Plain(inlines) = &body[0] else {
        panic!("plain missing");
    };
    let Inline::Image(_, _, (url, _)) = &inlines[0] else {
        panic!("image missing");
    };
    url
}

#[cfg(unix)]
fn script(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

/// Stands in for `pdftoppm -scale-to N -png -singlefile <source> <stem>`.
#[cfg(unix)]
fn fake_pdftoppm(dir: &Path) -> String {
    script(
        dir,
        "fake-pdftoppm",
        "echo \"$@\" >> \"$(dirname \"$0\")/calls.log\"\n: > \"$6.png\"\n",
    )
}

#[cfg(unix)]
#[test]
fn test_pdf_rasterized_once_and_cached() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("figures")).unwrap();
    fs::write(dir.path().join("figures/brain.pdf"), b"%PDF-1.5").unwrap();
    let options = images_only(dir.path(), fake_pdftoppm(tools.path()));

    let mut doc = figure_doc("figures/brain.pdf");
    let report = filter_document(&mut doc, &options).unwrap();
    let derived = dir.path().join("figures/brain.png");
    assert!(derived.exists());
    assert_eq!(image_url(&doc), derived.to_string_lossy());
    assert_eq!(report.rasterized, vec!["figures/brain.pdf".to_string()]);

    let calls = fs::read_to_string(tools.path().join("calls.log")).unwrap();
    assert_eq!(calls.lines().count(), 1);
    assert!(calls.starts_with("-scale-to 1024 -png -singlefile "), "got {}", calls);

    let mut again = figure_doc("figures/brain.pdf");
    let report = filter_document(&mut again, &options).unwrap();
    assert!(report.rasterized.is_empty());
    assert_eq!(image_url(&again), derived.to_string_lossy());
    let calls = fs::read_to_string(tools.path().join("calls.log")).unwrap();
    assert_eq!(calls.lines().count(), 1);
}

#[cfg(unix)]
#[test]
fn test_crashed_rasterizer_output_not_reused() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tempfile::tempdir().unwrap();
    let crashy = script(
        tools.path(),
        "crashy",
        "echo run >> \"$(dirname \"$0\")/calls.log\"\nprintf partial > \"$6.png\"\nexit 1\n",
    );
    let options = images_only(dir.path(), crashy);
    let derived = dir.path().join("figures/brain.png");
    fs::create_dir_all(dir.path().join("figures")).unwrap();

    let err = filter_document(&mut figure_doc("figures/brain.pdf"), &options).unwrap_err();
    assert!(matches!(err, ConversionError::RasterizeError { .. }), "got {:?}", err);
    assert!(!derived.exists());

    let err = filter_document(&mut figure_doc("figures/brain.pdf"), &options).unwrap_err();
    assert!(matches!(err, ConversionError::RasterizeError { .. }), "got {:?}", err);
    let calls = fs::read_to_string(tools.path().join("calls.log")).unwrap();
    assert_eq!(calls.lines().count(), 2);
}

#[cfg(target_os = "linux")]
#[test]
fn test_rasterizer_stdout_kept_off_the_document_stream() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tempfile::tempdir().unwrap();
    let chatty = script(
        tools.path(),
        "chatty",
        "[ \"$(readlink /proc/$$/fd/1)\" = /dev/null ] || exit 3\n\
         echo 'page 1 of 1'\n: > \"$6.png\"\n",
    );
    let options = images_only(dir.path(), chatty);
    fs::create_dir_all(dir.path().join("figures")).unwrap();

    let report = filter_document(&mut figure_doc("figures/brain.pdf"), &options).unwrap();
    assert_eq!(report.rasterized, vec!["figures/brain.pdf".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_rasterizer_without_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let options = images_only(dir.path(), "true".to_string());

    let mut doc = figure_doc("figures/brain.pdf");
    let err = filter_document(&mut doc, &options).unwrap_err();
    assert!(matches!(err, ConversionError::RasterizeError { .. }), "got {:?}", err);
}

#[test]
fn test_missing_rasterizer_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let options = images_only(dir.path(), "paperfix-no-such-rasterizer".to_string());

    let mut doc = figure_doc("figures/brain.pdf");
    let err = filter_document(&mut doc, &options).unwrap_err();
    assert!(matches!(err, ConversionError::RasterizeError { .. }), "got {:?}", err);
    assert!(err.to_string().contains("paperfix-no-such-rasterizer"));
}

#[test]
fn test_png_images_never_rasterized() {
    let dir = tempfile::tempdir().unwrap();
    let options = images_only(dir.path(), "paperfix-no-such-rasterizer".to_string());

    let mut doc = figure_doc("figures/photo.png");
    let report = filter_document(&mut doc, &options).unwrap();
    assert_eq!(image_url(&doc), "figures/photo.png");
    assert!(report.rasterized.is_empty());
}
