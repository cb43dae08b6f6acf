//! Loading post-processor styles from disk
use std::fs;

use gcodegen::error::StyleError;
use gcodegen::post::StyleConfig;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write style file");
    path
}

#[test]
fn test_toml_style_overrides_and_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "post.toml",
        r#"
decimal_separator = ","
precision = 2
footer_template = ["M30"]
"#,
    );

    let style = StyleConfig::from_path(&path).expect("style loads");
    assert_eq!(style.decimal_separator, ",");
    assert_eq!(style.precision, 2);
    assert_eq!(style.footer_template, vec!["M30".to_string()]);
    assert!(style.line_numbers);
    assert_eq!(style.spindle_on_cmd, "M3 S{spindle}");
    assert_eq!(style.format_number(-1.005), "-1,00");
}

#[test]
fn test_json_style_by_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(
        &dir,
        "post.JSON",
        r#"{ "line_numbers": false, "coolant_on_cmd": "M7" }"#,
    );

    let style = StyleConfig::from_path(&path).expect("style loads");
    assert!(!style.line_numbers);
    assert_eq!(style.coolant_on_cmd, "M7");
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "empty.toml", "");
    assert_eq!(
        StyleConfig::from_path(&path).expect("style loads"),
        StyleConfig::default()
    );
}

#[test]
fn test_unknown_field_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "post.toml", "line_numbres = false\n");
    assert!(matches!(
        StyleConfig::from_path(&path),
        Err(StyleError::Toml(_))
    ));

    let path = write(&dir, "post.json", r#"{ "precison": 2 }"#);
    assert!(matches!(
        StyleConfig::from_path(&path),
        Err(StyleError::Json(_))
    ));
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(&dir, "sep.toml", "decimal_separator = \"..\"\n");
    assert!(matches!(
        StyleConfig::from_path(&path),
        Err(StyleError::Invalid(_))
    ));

    let path = write(&dir, "step.toml", "line_step = 0\n");
    assert!(matches!(
        StyleConfig::from_path(&path),
        Err(StyleError::Invalid(_))
    ));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = StyleConfig::from_path(&path).expect_err("missing file fails");
    assert!(matches!(err, StyleError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
