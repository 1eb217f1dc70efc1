//! Integration tests for multi-format loading.
//!
//! Asserts: docx notes are searchable, docx uploads are stored and searchable,
//! JSON notes are searched as pretty-printed text, and broken files are
//! treated as empty instead of failing the search.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn nh_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.push("nh");
    path
}

fn minimal_docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        let xml = format!(
            "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
            body
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

fn setup_file_support_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let notes = root.join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::create_dir_all(root.join("config")).unwrap();

    fs::write(
        notes.join("meeting.docx"),
        minimal_docx_with_paragraphs(&["Quarterly planning meeting.", "Budget approval is pending."]),
    )
    .unwrap();
    fs::write(
        notes.join("inventory.json"),
        r#"{"warehouse":"north","items":["lanterns","rope"]}"#,
    )
    .unwrap();
    fs::write(notes.join("broken.docx"), b"this is not a zip archive").unwrap();
    fs::write(notes.join("broken.pdf"), b"this is not a pdf").unwrap();

    let config_path = root.join("config/nh.toml");
    fs::write(
        &config_path,
        format!(
            "[db]\npath = \"{root}/data/nh.sqlite\"\n\n[notes]\nroot = \"{root}/notes\"\n",
            root = root.display()
        ),
    )
    .unwrap();

    (tmp, config_path)
}

fn run_nh(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(nh_binary())
        .arg("--config")
        .arg(config_path)
        .args(args)
        .output()
        .expect("failed to run nh");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_docx_note_is_searchable() {
    let (_tmp, config_path) = setup_file_support_env();

    let (stdout, stderr, success) = run_nh(&config_path, &["search", "budget approval"]);
    assert!(success, "search failed: stderr={}", stderr);
    assert!(stdout.contains("File: meeting.docx"));
    // paragraphs are separate sentences of one chunk
    assert!(stdout.contains("Quarterly planning meeting. Budget approval is pending."));
}

#[test]
fn test_json_note_is_searchable() {
    let (_tmp, config_path) = setup_file_support_env();

    let (stdout, _, success) = run_nh(&config_path, &["search", "lanterns"]);
    assert!(success);
    assert!(stdout.contains("File: inventory.json"));
    assert!(stdout.contains("\"warehouse\": \"north\""));
}

#[test]
fn test_broken_files_do_not_fail_search() {
    let (_tmp, config_path) = setup_file_support_env();

    let (stdout, stderr, success) = run_nh(&config_path, &["search", "zip archive pdf"]);
    assert!(success, "broken files must not fail the search: {}", stderr);
    assert!(!stdout.contains("broken.docx"));
    assert!(!stdout.contains("broken.pdf"));
    assert!(stderr.contains("failed to read document"));
}

#[test]
fn test_docx_upload_roundtrip() {
    let (tmp, config_path) = setup_file_support_env();
    run_nh(&config_path, &["init"]);

    let upload = tmp.path().join("policy.docx");
    fs::write(
        &upload,
        minimal_docx_with_paragraphs(&["Remote work is allowed on Fridays.", "Managers approve exceptions."]),
    )
    .unwrap();

    let (stdout, stderr, success) = run_nh(&config_path, &["upload", upload.to_str().unwrap()]);
    assert!(success, "upload failed: {}", stderr);
    assert!(stdout.contains("Upload policy.docx"));

    let (stdout, _, success) =
        run_nh(&config_path, &["search", "remote fridays", "--user", "default"]);
    assert!(success);
    assert!(stdout.contains("File: policy.docx"));
}
