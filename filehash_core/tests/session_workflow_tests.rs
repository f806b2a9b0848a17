//! End-to-end batch scenarios through the session store

use filehash_core::error::ValidationError;
use filehash_core::progress::NullProvider;
use filehash_core::{EngineConfig, FileRecord, HashAlgorithm, Session};
use md5::Md5;
use sha2::{Digest, Sha256};

#[test]
fn test_empty_algorithm_set_and_empty_file() {
    let session = Session::default();
    let none: [&str; 0] = [];

    let report = session.process_batch(
        &[FileRecord::from_bytes("empty.txt", Vec::new())],
        &none,
        &NullProvider,
    );

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].reason, Some(ValidationError::FileEmpty));
    assert!(matches!(
        report.batch_errors.as_slice(),
        [ValidationError::TooFewAlgorithms { .. }]
    ));
    assert!(report.appended.is_empty());
    assert_eq!(session.len(), 0);
    assert!(session.all().is_empty());
}

#[test]
fn test_two_algorithms_produce_combined_digest() {
    let session = Session::default();
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();

    let report = session.process_batch(
        &[FileRecord::from_bytes("data.bin", payload.clone())],
        &["SHA-256", "MD5"],
        &NullProvider,
    );
    assert!(report.is_clean(), "{report:?}");

    let history = session.all();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.file_name(), "data.bin");
    assert_eq!(entry.file_size(), 10_000);
    assert_eq!(entry.file_size_display(), "9.77 KB");

    let digests = entry.digests();
    assert_eq!(digests.len(), 2);
    let md5_hex = digests.get(HashAlgorithm::Md5).unwrap();
    let sha256_hex = digests.get(HashAlgorithm::Sha256).unwrap();
    assert_eq!(md5_hex.len(), 32);
    assert_eq!(sha256_hex.len(), 64);
    assert_eq!(md5_hex, hex::encode(Md5::digest(&payload)));
    assert_eq!(sha256_hex, hex::encode(Sha256::digest(&payload)));

    let expected = hex::encode(Sha256::digest(format!("{md5_hex}{sha256_hex}").as_bytes()));
    assert_eq!(entry.combined(), Some(expected.as_str()));
}

#[test]
fn test_single_algorithm_has_no_combined_digest() {
    let session = Session::default();
    session.process_batch(
        &[FileRecord::from_bytes("a.txt", b"abc".to_vec())],
        &["sha1"],
        &NullProvider,
    );

    assert_eq!(session.all()[0].combined(), None);
}

#[test]
fn test_three_appends_then_clear() {
    let session = Session::default();
    for name in ["one.txt", "two.txt", "three.txt"] {
        session.process_batch(
            &[FileRecord::from_bytes(name, name.as_bytes().to_vec())],
            &["md5"],
            &NullProvider,
        );
    }
    assert_eq!(session.len(), 3);

    session.clear();
    assert_eq!(session.len(), 0);
    assert!(session.all().is_empty());
    assert!(session.all().is_empty());
}

#[test]
fn test_mixed_batch_keeps_valid_files() {
    let config = EngineConfig {
        max_file_size: 100,
        ..EngineConfig::default()
    };
    let session = Session::new(config);
    let records = vec![
        FileRecord::from_bytes("a.txt", vec![1u8; 10]),
        FileRecord::from_bytes("big.txt", vec![1u8; 101]),
        FileRecord::from_bytes("b.txt", vec![2u8; 100]),
        FileRecord::from_bytes("empty.txt", Vec::new()),
        FileRecord::from_bytes("c.txt", vec![3u8; 1]),
    ];

    let report = session.process_batch(&records, &["md5", "blake2b"], &NullProvider);

    let names: Vec<_> = session
        .all()
        .iter()
        .map(|entry| entry.file_name().to_string())
        .collect();
    assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);

    let reasons: Vec<_> = report
        .rejected
        .iter()
        .map(|outcome| outcome.reason.clone().unwrap().to_string())
        .collect();
    assert_eq!(reasons, ["File size exceeds 100.00 B limit", "File is empty"]);
    assert!(report.batch_errors.is_empty());
}

#[test]
fn test_json_round_trip_of_history() {
    let session = Session::default();
    session.process_batch(
        &[FileRecord::from_bytes("a.txt", b"abc".to_vec())],
        &["md5", "sha1"],
        &NullProvider,
    );

    let history = session.all();
    let json = serde_json::to_value(&*history[0]).unwrap();
    assert_eq!(json["file_name"], "a.txt");
    assert_eq!(json["digests"]["MD5"], "900150983cd24fb0d6963f7d28e17f72");
    assert!(json["combined"].is_string());
}

#[test]
fn test_unrenderable_timestamp_format_still_hashes() {
    let session = Session::new(EngineConfig {
        timestamp_format: "%Q".to_string(),
        ..EngineConfig::default()
    });

    let report = session.process_batch(
        &[FileRecord::from_bytes("a.txt", b"abc".to_vec())],
        &["md5"],
        &NullProvider,
    );

    assert_eq!(report.appended.len(), 1);
    // Falls back to YYYY-MM-DD HH:MM:SS
    assert_eq!(report.appended[0].timestamp().len(), 19);
}
