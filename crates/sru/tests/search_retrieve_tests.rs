//! searchRetrieve endpoint tests.

mod common;

use axum::http::StatusCode;

use biblio_sru::ServerConfig;
use common::*;

// ============================================================================
// Parameter Validation
// ============================================================================

#[tokio::test]
async fn test_missing_query_is_diagnostic_7() {
    let harness = SruTestHarness::new();
    let response = harness.sru(&[("operation", "searchRetrieve")]).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_diagnostic(&response, 7);
    let body = response.text();
    assert_eq!(element_text(&body, "diag:details"), Some("query"));
    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("0"));
}

#[tokio::test]
async fn test_start_record_out_of_range_is_diagnostic_6() {
    let harness = SruTestHarness::new();
    for start in ["0", "10001", "abc"] {
        let response = harness
            .sru(&[
                ("operation", "searchRetrieve"),
                ("query", "moby"),
                ("startRecord", start),
            ])
            .await;
        assert_diagnostic(&response, 6);
    }
}

#[tokio::test]
async fn test_malformed_maximum_records_is_diagnostic_6() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "moby"),
            ("maximumRecords", "-3"),
        ])
        .await;
    assert_diagnostic(&response, 6);
}

#[tokio::test]
async fn test_bad_cql_is_diagnostic_10() {
    let harness = SruTestHarness::new();
    let response = harness.search("dc.title = moby AND (whale").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_diagnostic(&response, 10);
}

#[tokio::test]
async fn test_unknown_schema_is_diagnostic_66() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "moby"),
            ("recordSchema", "onix"),
        ])
        .await;
    assert_diagnostic(&response, 66);
}

#[tokio::test]
async fn test_unknown_packing_is_diagnostic_71() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "moby"),
            ("recordPacking", "json"),
        ])
        .await;
    assert_diagnostic(&response, 71);
}

#[tokio::test]
async fn test_bad_sort_direction_is_diagnostic_6() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "harr"),
            ("sortKeys", "dc.title,sideways"),
        ])
        .await;
    assert_diagnostic(&response, 6);
}

#[tokio::test]
async fn test_unknown_index_searches_anywhere_by_default() {
    let harness = SruTestHarness::new();
    let response = harness.search("marc.245 = moby").await;

    assert!(diagnostic_uri(&response.text()).is_none());
    assert_eq!(
        element_text(&response.text(), "srw:numberOfRecords"),
        Some("1")
    );
}

#[tokio::test]
async fn test_strict_indexes_reject_unknown_index() {
    let harness = SruTestHarness::with_config(ServerConfig {
        strict_indexes: true,
        ..ServerConfig::for_testing()
    });
    let response = harness.search("marc.245 = moby").await;

    assert_diagnostic(&response, 16);
    assert_eq!(
        element_text(&response.text(), "diag:details"),
        Some("marc.245")
    );
}

// ============================================================================
// Results
// ============================================================================

#[tokio::test]
async fn test_search_returns_marcxml_by_default() {
    let harness = SruTestHarness::new();
    let response = harness.search("dc.title = moby").await;
    let body = response.text();

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(body.contains("<srw:searchRetrieveResponse"));
    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("1"));
    assert_eq!(
        element_text(&body, "srw:recordSchema"),
        Some("info:srw/schema/1/marcxml-v1.1")
    );
    assert_eq!(element_text(&body, "srw:recordPacking"), Some("xml"));
    assert_eq!(element_text(&body, "srw:recordPosition"), Some("1"));
    assert!(body.contains("<record xmlns=\"http://www.loc.gov/MARC21/slim\">"));
    assert!(body.contains("tag=\"245\""));
    assert!(body.contains("<subfield code=\"a\">Moby Dick</subfield>"));
    assert!(body.contains("<subfield code=\"a\">9780142437247</subfield>"));
    assert!(body.contains("<subfield code=\"p\">INV-001</subfield>"));
    assert!(body.contains("<srw:echoedSearchRetrieveRequest>"));
    assert!(!body.contains("srw:nextRecordPosition"));
}

#[tokio::test]
async fn test_no_hits() {
    let harness = SruTestHarness::new();
    let response = harness.search("dc.title = zanzibar").await;
    let body = response.text();

    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("0"));
    assert!(!body.contains("<srw:records>"));
    assert!(diagnostic_uri(&body).is_none());
}

#[tokio::test]
async fn test_not_matches_records_without_subtitle() {
    let harness = SruTestHarness::new();
    let response = harness.search("NOT dc.title = moby").await;
    let body = response.text();

    assert!(diagnostic_uri(&body).is_none());
    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("3"));
    assert!(!body.contains("Moby Dick"));
}

#[tokio::test]
async fn test_pagination_and_next_record_position() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "dc.date > 0"),
            ("startRecord", "2"),
            ("maximumRecords", "2"),
            ("recordSchema", "dc"),
        ])
        .await;
    let body = response.text();

    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("4"));
    assert_eq!(body.matches("<srw:record>").count(), 2);
    assert_eq!(element_text(&body, "srw:recordPosition"), Some("2"));
    assert!(body.contains("<srw:recordPosition>3</srw:recordPosition>"));
    assert_eq!(element_text(&body, "srw:nextRecordPosition"), Some("4"));
    assert!(body.contains("<dc:title>Harry Potter and the Philosopher"));
}

#[tokio::test]
async fn test_last_page_has_no_next_position() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "dc.date > 0"),
            ("startRecord", "3"),
            ("maximumRecords", "2"),
        ])
        .await;
    let body = response.text();

    assert_eq!(body.matches("<srw:record>").count(), 2);
    assert!(!body.contains("srw:nextRecordPosition"));
}

#[tokio::test]
async fn test_maximum_records_zero_counts_only() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "harr"),
            ("maximumRecords", "0"),
        ])
        .await;
    let body = response.text();

    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("2"));
    assert!(!body.contains("<srw:records>"));
    assert!(!body.contains("srw:nextRecordPosition"));
}

#[tokio::test]
async fn test_maximum_records_is_capped() {
    let harness = SruTestHarness::with_config(ServerConfig {
        max_maximum_records: 1,
        ..ServerConfig::for_testing()
    });
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "harr"),
            ("maximumRecords", "50"),
        ])
        .await;
    let body = response.text();

    assert!(diagnostic_uri(&body).is_none());
    assert_eq!(body.matches("<srw:record>").count(), 1);
    assert_eq!(element_text(&body, "srw:nextRecordPosition"), Some("2"));
    assert_eq!(element_text(&body, "srw:maximumRecords"), Some("1"));
}

#[tokio::test]
async fn test_sort_keys_order_results() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "dc.date > 0"),
            ("sortKeys", "dc.date,desc"),
            ("recordSchema", "dc"),
        ])
        .await;
    let body = response.text();

    let potter = body.find("Harry Potter").unwrap();
    let jets = body.find("Harrier Jets").unwrap();
    let moby = body.find("Moby Dick").unwrap();
    assert!(potter < jets && jets < moby);
    assert_eq!(element_text(&body, "srw:sortKeys"), Some("dc.date,desc"));
}

#[tokio::test]
async fn test_mods_schema() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "dc.creator = eco"),
            ("recordSchema", "mods"),
        ])
        .await;
    let body = response.text();

    assert_eq!(
        element_text(&body, "srw:recordSchema"),
        Some("info:srw/schema/1/mods-v3.7")
    );
    assert!(body.contains("<title>Il nome della rosa</title>"));
    assert!(body.contains("<namePart>Umberto Eco</namePart>"));
}

#[tokio::test]
async fn test_schema_matched_by_identifier() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "moby"),
            ("recordSchema", "info:srw/schema/1/dc-v1.1"),
        ])
        .await;

    assert!(response.text().contains("<dc:title>Moby Dick: or, The Whale</dc:title>"));
}

#[tokio::test]
async fn test_string_packing_escapes_record() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&[
            ("operation", "searchRetrieve"),
            ("query", "moby"),
            ("recordPacking", "string"),
        ])
        .await;
    let body = response.text();

    assert_eq!(element_text(&body, "srw:recordPacking"), Some("string"));
    assert!(body.contains("&lt;record xmlns="));
    assert!(!body.contains("<record xmlns="));
}

#[tokio::test]
async fn test_query_is_echoed_escaped() {
    let harness = SruTestHarness::new();
    let response = harness.search("dc.title = \"a & b\"").await;
    let body = response.text();

    assert!(body.contains("<srw:query>dc.title = \"a &amp; b\"</srw:query>")
        || body.contains("<srw:query>dc.title = &quot;a &amp; b&quot;</srw:query>"));
}
