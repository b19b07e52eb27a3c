//! Tests for line streaming through FileHandle::read_lines.

use std::fs;

use futures::StreamExt;
use omni_file::{FileHandle, HandleConfig, LineReader, OpenMode, Operation};
use tempfile::TempDir;
use tokio::io::BufReader;

#[tokio::test]
async fn test_reads_lines_in_order() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("lines.txt");
    fs::write(&p, "line1\nline2\nline3\n").unwrap();

    let mut handle = FileHandle::new();
    handle.open(&p, OpenMode::Read).unwrap();

    let lines: Vec<String> = handle
        .read_lines()
        .unwrap()
        .map(|line| line.unwrap())
        .collect()
        .await;
    assert_eq!(lines, ["line1", "line2", "line3"]);

    handle.close().unwrap();
}

#[tokio::test]
async fn test_reader_over_in_memory_source() {
    let mut reader = LineReader::new(BufReader::new(&b"line1\nline2\nline3"[..]));
    let mut lines = Vec::new();
    while let Some(line) = reader.next_line().await.unwrap() {
        lines.push(line);
    }
    assert_eq!(lines, ["line1", "line2", "line3"]);
}

#[tokio::test]
async fn test_crlf_file_with_tiny_buffer() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("crlf.txt");
    fs::write(&p, "first\r\nsecond\rthird\n\r\nfifth").unwrap();

    let mut handle = FileHandle::with_config(HandleConfig {
        read_buffer_capacity: 1,
        ..HandleConfig::default()
    });
    handle.open(&p, OpenMode::Read).unwrap();

    let mut stream = handle.read_lines().unwrap();
    let mut lines = Vec::new();
    while let Some(line) = stream.next_line().await.unwrap() {
        lines.push(line);
    }
    assert_eq!(lines, ["first", "second", "third", "", "fifth"]);
}

#[tokio::test]
async fn test_oversized_buffer_config_still_reads() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("handle.json");
    fs::write(&config_path, r#"{ "read_buffer_capacity": 18446744073709551615 }"#).unwrap();
    let p = dir.path().join("lines.txt");
    fs::write(&p, "one\ntwo\n").unwrap();

    let mut handle = FileHandle::with_config(HandleConfig::from_json_file(&config_path).unwrap());
    handle.open(&p, OpenMode::Read).unwrap();

    let lines: Vec<String> = handle
        .read_lines()
        .unwrap()
        .map(|line| line.unwrap())
        .collect()
        .await;
    assert_eq!(lines, ["one", "two"]);
}

#[tokio::test]
async fn test_not_restartable() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("once.txt");
    fs::write(&p, "a\nb\n").unwrap();

    let mut handle = FileHandle::new();
    handle.open(&p, OpenMode::Read).unwrap();

    {
        let mut stream = handle.read_lines().unwrap();
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("a"));
    }
    // A new stream continues where the previous one stopped.
    {
        let mut stream = handle.read_lines().unwrap();
        assert_eq!(stream.next_line().await.unwrap().as_deref(), Some("b"));
        assert!(stream.next_line().await.unwrap().is_none());
    }
    let mut stream = handle.read_lines().unwrap();
    assert!(stream.next().await.is_none());
}

/// Diverges from the silent empty sequence: misuse is reported up front.
#[tokio::test]
async fn test_read_lines_without_reader_fails() {
    let mut handle = FileHandle::new();
    let err = handle.read_lines().unwrap_err();
    assert_eq!(err.operation(), Operation::Read);
    assert_eq!(err.description(), "file is not open for reading");
    assert!(err.is_precondition());
}

#[tokio::test]
async fn test_read_lines_after_close_fails() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("closed.txt");
    fs::write(&p, "a\n").unwrap();

    let mut handle = FileHandle::new();
    handle.open(&p, OpenMode::Read).unwrap();
    handle.close().unwrap();

    let err = handle.read_lines().unwrap_err();
    assert_eq!(err.operation(), Operation::Read);
}

#[tokio::test]
async fn test_write_close_reopen_round_trip() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("round_trip.txt");
    let text = "Hola, ¿qué tal? tabs\tand spaces";

    let mut handle = FileHandle::new();
    handle.open(&p, OpenMode::Write).unwrap();
    handle.write_to_file(text).unwrap();
    handle.close().unwrap();

    handle.open(&p, OpenMode::Read).unwrap();
    let lines: Vec<String> = handle
        .read_lines()
        .unwrap()
        .map(|line| line.unwrap())
        .collect()
        .await;
    handle.close().unwrap();

    assert_eq!(lines, [text]);
}

#[tokio::test]
async fn test_empty_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("empty.txt");
    fs::write(&p, "").unwrap();

    let mut handle = FileHandle::new();
    handle.open(&p, OpenMode::Read).unwrap();
    let mut stream = handle.read_lines().unwrap();
    assert!(stream.next_line().await.unwrap().is_none());
}
