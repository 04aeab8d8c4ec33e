//! Integration tests for loading an export from disk and configuring the reader.

use std::io::Write;

use archive_reader::config::Config;
use archive_reader::query::{SortKey, SortOrder};
use archive_reader::{load_posts, LoadError, QueryEngine};
use serial_test::serial;
use tempfile::NamedTempFile;

fn write_export(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write export");
    file
}

#[tokio::test]
async fn test_load_and_page() {
    let file = write_export(
        r#"[
            {"timestamp": 3, "data": [{"post": "third"}]},
            {"timestamp": 1, "data": [{}, {"post": "first"}]},
            {"created_time": 2, "title": "second"}
        ]"#,
    );

    let posts = load_posts(file.path()).await.expect("Failed to load export");
    assert_eq!(posts.len(), 3);

    let engine = QueryEngine::new(posts, default_config().sort());
    let page = engine.paginate(1.0, 10.0);
    let texts: Vec<_> = page.items.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_non_array_export_is_empty() {
    let file = write_export(r#"{"status_updates": []}"#);
    let posts = load_posts(file.path()).await.expect("Failed to load export");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = load_posts(&dir.path().join("missing.json")).await;
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let file = write_export("[{\"timestamp\": ");
    let result = load_posts(file.path()).await;
    assert!(matches!(result, Err(LoadError::Json { .. })));
}

fn default_config() -> Config {
    Config {
        data_path: "posts.json".into(),
        page_size: 20,
        sort_key: SortKey::Timestamp,
        sort_order: SortOrder::Asc,
    }
}

fn clear_env() {
    for name in ["DATA_PATH", "PAGE_SIZE", "SORT_BY", "SORT_ORDER"] {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_config_defaults() {
    clear_env();
    let config = Config::from_env().expect("Failed to create config");
    assert_eq!(config.data_path, std::path::PathBuf::from("./data/your_posts.json"));
    assert_eq!(config.page_size, 20);
    assert_eq!(config.sort_key, SortKey::Timestamp);
    assert_eq!(config.sort_order, SortOrder::Asc);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_config_from_env() {
    clear_env();
    std::env::set_var("DATA_PATH", "/tmp/export.json");
    std::env::set_var("PAGE_SIZE", "50");
    std::env::set_var("SORT_BY", "title");
    std::env::set_var("SORT_ORDER", "desc");

    let config = Config::from_env().expect("Failed to create config");
    assert_eq!(config.page_size, 50);
    assert_eq!(config.sort_key, SortKey::Title);
    assert_eq!(config.sort_order, SortOrder::Desc);
    clear_env();
}

#[test]
#[serial]
fn test_config_rejects_bad_values() {
    clear_env();
    std::env::set_var("PAGE_SIZE", "lots");
    assert!(Config::from_env().is_err());

    clear_env();
    std::env::set_var("SORT_BY", "likes");
    assert!(Config::from_env().is_err());

    clear_env();
    std::env::set_var("PAGE_SIZE", "0");
    let config = Config::from_env().expect("Failed to create config");
    assert!(config.validate().is_err());
    clear_env();
}
