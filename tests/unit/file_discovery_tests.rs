use xmlns_sniff::FileDiscovery;

use crate::common::test_helpers::{create_temp_corpus, file_names};

#[tokio::test]
async fn test_discover_corpus() {
    let temp_dir = create_temp_corpus().await.unwrap();
    let files = FileDiscovery::new()
        .discover_files(temp_dir.path())
        .await
        .unwrap();

    // sorted by full path
    assert_eq!(
        file_names(&files),
        vec!["bad.xml", "catalog.xml", "ram.xml", "letter.xml", "plain.xml"]
    );
}

#[tokio::test]
async fn test_exclude_and_depth_combined() {
    let temp_dir = create_temp_corpus().await.unwrap();
    let files = FileDiscovery::new()
        .with_exclude_patterns(vec!["**/broken/**".to_string()])
        .unwrap()
        .with_max_depth(Some(1))
        .discover_files(temp_dir.path())
        .await
        .unwrap();

    assert_eq!(
        file_names(&files),
        vec!["catalog.xml", "letter.xml", "plain.xml"]
    );
}

#[tokio::test]
async fn test_depth_zero_stays_in_root() {
    let temp_dir = create_temp_corpus().await.unwrap();
    let discovery = FileDiscovery::new()
        .with_max_depth(Some(0))
        .discover(temp_dir.path())
        .await
        .unwrap();

    assert_eq!(file_names(&discovery.files), vec!["catalog.xml", "plain.xml"]);
    assert!(discovery.errors.is_empty());
}

#[tokio::test]
async fn test_extension_list() {
    let temp_dir = create_temp_corpus().await.unwrap();
    let files = FileDiscovery::new()
        .with_extensions(vec!["TXT".to_string()])
        .discover_files(temp_dir.path())
        .await
        .unwrap();

    assert_eq!(file_names(&files), vec!["notes.txt"]);
}

#[test]
fn test_discover_from_sync_context() {
    let temp_dir = tokio_test::block_on(create_temp_corpus()).unwrap();
    let letters = temp_dir.path().join("letters");

    let files = tokio_test::block_on(FileDiscovery::new().discover_files(&letters)).unwrap();
    assert_eq!(file_names(&files), vec!["ram.xml", "letter.xml"]);
}
