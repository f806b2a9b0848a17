use filehash_cli::progress::{
    ChannelProvider, ProgressRenderer, create_progress_infrastructure, format_throughput,
    throughput_mbps,
};
use filehash_core::{FileRecord, ProgressProvider, ProgressUpdate, Session};
use std::time::Duration;
use tokio::sync::mpsc;

#[test]
fn test_renderer_tracks_file_and_batch_bars() {
    let mut renderer = ProgressRenderer::hidden();

    renderer.handle_update(ProgressUpdate::BatchProgress {
        current: 1,
        total: 3,
        current_file: Some("a.bin".to_string()),
    });
    renderer.handle_update(ProgressUpdate::HashProgress {
        bytes_processed: 512,
        total_bytes: 1024,
    });
    assert_eq!(renderer.file_position(), Some(512));
    assert_eq!(renderer.batch_position(), Some(0));

    // Next file drops the byte bar
    renderer.handle_update(ProgressUpdate::BatchProgress {
        current: 2,
        total: 3,
        current_file: Some("b.bin".to_string()),
    });
    assert_eq!(renderer.file_position(), None);
    assert_eq!(renderer.batch_position(), Some(1));

    renderer.handle_update(ProgressUpdate::Status {
        message: "3 hashed, 0 rejected, 0 failed".to_string(),
    });
    assert_eq!(renderer.statuses(), ["3 hashed, 0 rejected, 0 failed"]);

    renderer.finish();
}

#[test]
fn test_single_file_batch_has_no_batch_bar() {
    let mut renderer = ProgressRenderer::hidden();
    renderer.handle_update(ProgressUpdate::BatchProgress {
        current: 1,
        total: 1,
        current_file: None,
    });
    assert_eq!(renderer.batch_position(), None);
}

#[tokio::test]
async fn test_channel_provider_forwards_until_complete() {
    let (tx, mut rx) = mpsc::channel(8);
    let provider = ChannelProvider::new(tx);

    provider.report(ProgressUpdate::HashProgress {
        bytes_processed: 1,
        total_bytes: 2,
    });
    let child = provider.create_child("SHA-256");
    child.report(ProgressUpdate::Status {
        message: "done".to_string(),
    });

    assert!(matches!(
        rx.recv().await,
        Some(ProgressUpdate::HashProgress {
            bytes_processed: 1,
            total_bytes: 2
        })
    ));
    match rx.recv().await {
        Some(ProgressUpdate::Status { message }) => assert_eq!(message, "[SHA-256] done"),
        other => panic!("unexpected update: {other:?}"),
    }

    provider.complete();
    drop(child);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_session_batch_reports_through_channel() {
    let (provider, mut rx) = create_progress_infrastructure();
    let session = Session::default();
    let records = vec![
        FileRecord::from_bytes("one.txt", b"one".to_vec()),
        FileRecord::from_bytes("two.txt", b"two".to_vec()),
    ];

    let report = session.process_batch(&records, &["md5"], provider.as_ref());
    provider.complete();
    assert_eq!(report.appended.len(), 2);

    let mut renderer = ProgressRenderer::hidden();
    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }
    assert_eq!(renderer.batch_position(), Some(1));
    assert_eq!(renderer.statuses(), ["2 hashed, 0 rejected, 0 failed"]);
}

#[test]
fn test_throughput_formatting() {
    let mbps = throughput_mbps(10 * 1024 * 1024, Duration::from_secs(2));
    assert!((mbps - 5.0).abs() < f64::EPSILON);
    assert_eq!(format_throughput(mbps), "5.0 MB/s");
}
