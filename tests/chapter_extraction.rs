//! End-to-end chapter ingestion against a mock site: discovery, extraction,
//! fragmentation, and persistence.

use std::time::Duration;

use httpmock::prelude::*;
use tempfile::tempdir;

use lexsmith::ingestion::{discover_chapters, extract_blocks, ingest_chapters};
use lexsmith::stores::{Backend, SqliteStore};

const SECTION_PAGE: &str = r#"
<html><body>
  <div class="edn_mainWrapper">
    <a href="/About-Singapore-Law/Overview/Ch-01">Ch. 01 The Singapore Legal System</a>
  </div>
</body></html>
"#;

const CHAPTER_PAGE: &str = r#"
<html><body>
  <div class="edn_article">
    <h2>SECTION 1 INTRODUCTION</h2>
    <p>1.1.1      Singapore law has its roots in English common law.</p>
    <p>    Reception of English law was formalized by statute.</p>
    <h2>SECTION 2 SOURCES OF LAW</h2>
    <p>1.2.1      The principal sources of law are legislation and case law.</p>
    <table>
      <tr><th>Source</th><th>Example</th></tr>
      <tr><td>Legislation</td><td>Companies Act</td></tr>
    </table>
    <p>The table sets out representative examples.</p>
    <p>Updated as at 30 June 2024</p>
    <p>Disclaimer: nothing here is legal advice.</p>
  </div>
</body></html>
"#;

#[tokio::test]
async fn chapters_flow_from_discovery_to_stored_fragments() {
    let server = MockServer::start_async().await;

    let section_mock = server.mock(|when, then| {
        when.method(GET).path("/About-Singapore-Law/Overview");
        then.status(200).body(SECTION_PAGE);
    });
    let chapter_mock = server.mock(|when, then| {
        when.method(GET).path("/About-Singapore-Law/Overview/Ch-01");
        then.status(200).body(CHAPTER_PAGE);
    });

    let client = reqwest::Client::new();
    let sections = vec![(
        server.url("/About-Singapore-Law/Overview"),
        "Overview".to_string(),
    )];

    let links = discover_chapters(&client, &sections).await;
    section_mock.assert();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].title, "Ch. 01 The Singapore Legal System");
    assert_eq!(links[0].section, "Overview");
    assert_eq!(links[0].id.len(), 12);

    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("etl.sqlite")).await.unwrap();

    let summary = ingest_chapters(&client, &store, None, links.clone(), Duration::ZERO)
        .await
        .unwrap();
    chapter_mock.assert();

    assert_eq!(summary.chapters_processed, 1);
    assert_eq!(summary.chapters_failed, 0);
    assert_eq!(summary.fragments_written, 2);

    let fragments = store.fragments_for_chapter(&links[0].id).await.unwrap();
    assert_eq!(fragments.len(), 2);

    // Heading joined forward, continuation joined backward.
    assert_eq!(fragments[0].id, format!("{}_1.1.1", links[0].id));
    assert!(fragments[0].content.contains("SECTION 1 INTRODUCTION"));
    assert!(fragments[0].content.contains("English common law"));
    assert!(fragments[0].content.contains("formalized by statute"));

    // Table joined backward, its explanatory note too; footer dropped.
    assert!(fragments[1].content.contains("Legislation | Companies Act"));
    assert!(fragments[1].content.contains("representative examples"));
    assert!(!fragments[1].content.contains("Disclaimer"));
    assert!(!fragments[1].content.contains("Updated as at"));

    for (i, fragment) in fragments.iter().enumerate() {
        assert_eq!(fragment.fragment_order, i);
        assert_eq!(fragment.char_count, fragment.content.chars().count());
    }

    // A second run sees the chapter URL in the store and skips it.
    let rerun = ingest_chapters(&client, &store, None, links, Duration::ZERO)
        .await
        .unwrap();
    assert_eq!(rerun.chapters_processed, 0);
    assert_eq!(rerun.chapters_skipped, 1);
}

#[tokio::test]
async fn failing_chapters_do_not_abort_the_run() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(GET).path("/About-Singapore-Law/Overview");
        then.status(200).body(
            r#"<div class="edn_mainWrapper">
                 <a href="/About-Singapore-Law/Overview/Ch-404">Ch. 04 Missing Chapter</a>
                 <a href="/About-Singapore-Law/Overview/Ch-01">Ch. 01 The Singapore Legal System</a>
               </div>"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/About-Singapore-Law/Overview/Ch-404");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET).path("/About-Singapore-Law/Overview/Ch-01");
        then.status(200).body(CHAPTER_PAGE);
    });

    let client = reqwest::Client::new();
    let sections = vec![(
        server.url("/About-Singapore-Law/Overview"),
        "Overview".to_string(),
    )];
    let links = discover_chapters(&client, &sections).await;
    assert_eq!(links.len(), 2);

    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("etl.sqlite")).await.unwrap();

    let summary = ingest_chapters(&client, &store, None, links, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.chapters_failed, 1);
    assert_eq!(summary.chapters_processed, 1);
    assert_eq!(store.fragment_count().await.unwrap(), 2);
}

#[test]
fn extractor_output_drives_the_engine_directly() {
    let blocks = extract_blocks(CHAPTER_PAGE).unwrap();
    let fragments = lexsmith::fragment_blocks("chapter01", blocks);

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].id, "chapter01_1.1.1");
    assert_eq!(fragments[1].id, "chapter01_1.2.1");
}
