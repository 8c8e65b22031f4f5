//! Round trips against a live Wikibase stack. All ignored by default;
//! run with `cargo test -- --ignored` next to a running deployment.

use scholium_wikibase::{QueryService, SparqlClient};

const QUERY_SERVICE_URL: &str = "http://localhost:8834/proxy/wdqs/bigdata/namespace/wdq/sparql";

#[tokio::test]
#[ignore]
async fn test_live_query_service_answers() {
    let client = SparqlClient::new(QUERY_SERVICE_URL).unwrap();

    let rows = client
        .run_query("SELECT ?s ?p ?o WHERE { ?s ?p ?o } LIMIT 5")
        .await
        .unwrap();

    assert!(rows.len() <= 5);
}

#[tokio::test]
#[ignore]
async fn test_live_query_service_rejects_bad_query() {
    let client = SparqlClient::new(QUERY_SERVICE_URL).unwrap();

    let result = client.run_query("SELECT WHERE garbage").await;
    assert!(result.is_err());
}
