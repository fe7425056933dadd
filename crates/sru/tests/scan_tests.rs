//! scan endpoint tests.

mod common;

use axum::http::StatusCode;

use common::*;

fn scan_params<'a>(clause: &'a str, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut params = vec![("operation", "scan"), ("scanClause", clause)];
    params.extend_from_slice(extra);
    params
}

#[tokio::test]
async fn test_scan_titles_from_prefix() {
    let harness = SruTestHarness::new();
    let response = harness.sru(&scan_params("dc.title = harr", &[])).await;
    let body = response.text();

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(body.contains("<srw:scanResponse"));
    assert_eq!(body.matches("<srw:term>").count(), 2);
    assert_eq!(element_text(&body, "srw:value"), Some("Harrier Jets"));
    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("1"));
    assert!(body.contains("<position>1</position>"));
    assert!(body.contains("<position>2</position>"));
    assert_eq!(element_text(&body, "srw:scanClause"), Some("dc.title = harr"));
}

#[tokio::test]
async fn test_scan_positions_start_at_response_position() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&scan_params(
            "dc.creator = \"\"",
            &[("responsePosition", "5"), ("maximumTerms", "2")],
        ))
        .await;
    let body = response.text();

    assert_eq!(body.matches("<srw:term>").count(), 2);
    assert_eq!(element_text(&body, "srw:value"), Some("Anne Brown"));
    assert!(body.contains("<position>5</position>"));
    assert!(body.contains("<position>6</position>"));
    assert_eq!(element_text(&body, "srw:maximumTerms"), Some("2"));
}

#[tokio::test]
async fn test_scan_availability_counts_records() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&scan_params("library.available = disp", &[]))
        .await;
    let body = response.text();

    assert_eq!(element_text(&body, "srw:value"), Some("disponibile"));
    assert_eq!(element_text(&body, "srw:numberOfRecords"), Some("2"));
}

#[tokio::test]
async fn test_scan_maximum_terms_is_capped() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&scan_params("dc.title = \"\"", &[("maximumTerms", "500")]))
        .await;
    let body = response.text();

    assert!(diagnostic_uri(&body).is_none());
    assert_eq!(element_text(&body, "srw:maximumTerms"), Some("100"));
}

#[tokio::test]
async fn test_scan_without_clause_is_diagnostic_7() {
    let harness = SruTestHarness::new();
    let response = harness.sru(&[("operation", "scan")]).await;

    assert_diagnostic(&response, 7);
    assert_eq!(
        element_text(&response.text(), "diag:details"),
        Some("scanClause")
    );
}

#[tokio::test]
async fn test_scan_rejects_boolean_clause() {
    let harness = SruTestHarness::new();
    let response = harness
        .sru(&scan_params("dc.title = a AND dc.title = b", &[]))
        .await;

    assert_diagnostic(&response, 10);
}

#[tokio::test]
async fn test_scan_bad_maximum_terms_is_diagnostic_6() {
    let harness = SruTestHarness::new();
    for value in ["0", "many"] {
        let response = harness
            .sru(&scan_params("dc.title = a", &[("maximumTerms", value)]))
            .await;
        assert_diagnostic(&response, 6);
    }
}
