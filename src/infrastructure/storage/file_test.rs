use anyhow::Result;

use super::FileStorage;
use crate::domain::models::Storage;

#[tokio::test]
async fn it_reads_nothing_before_the_first_write() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().join("future-hn-tokens.json"));

    assert_eq!(storage.read().await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_round_trips_payloads() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().join("future-hn-tokens.json"));

    storage.write(r#"{"tokens":[]}"#).await?;
    assert_eq!(storage.read().await?, Some(r#"{"tokens":[]}"#.to_string()));

    storage.write(r#"{"tokens":[1]}"#).await?;
    assert_eq!(storage.read().await?, Some(r#"{"tokens":[1]}"#.to_string()));
    return Ok(());
}

#[tokio::test]
async fn it_creates_missing_parent_directories() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("nested/futurehn/future-hn-tokens.json");
    let storage = FileStorage::new(file_path.clone());

    storage.write("{}").await?;
    assert!(file_path.exists());
    return Ok(());
}

#[tokio::test]
async fn it_replaces_files_without_leaving_temp_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("future-hn-tokens.json");
    let storage = FileStorage::new(file_path.clone());

    storage.write(r#"{"tokens":[]}"#).await?;
    storage.write(r#"{"tokens":[2]}"#).await?;

    let entries = std::fs::read_dir(dir.path())?.count();
    assert_eq!(entries, 1);
    assert_eq!(storage.read().await?, Some(r#"{"tokens":[2]}"#.to_string()));
    return Ok(());
}

#[tokio::test]
async fn it_backs_up_the_current_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::new(dir.path().join("future-hn-tokens.json"));

    storage.backup().await?;
    assert!(!storage.backup_path().exists());

    storage.write(r#"{"tokens":[1],}"#).await?;
    storage.backup().await?;
    storage.write(r#"{"tokens":[]}"#).await?;

    assert_eq!(
        std::fs::read_to_string(storage.backup_path())?,
        r#"{"tokens":[1],}"#
    );
    assert!(storage
        .backup_path()
        .to_string_lossy()
        .ends_with("future-hn-tokens.json.bak"));
    return Ok(());
}
