//! Abstract backfill tests against mocked lookup endpoints.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_collector::client::HttpClient;
use paper_collector::config::HttpConfig;
use paper_collector::models::{NormalizedPaper, SourceApi};
use paper_collector::pipeline::Enricher;
use paper_collector::providers::{CrossrefProvider, SemanticScholarProvider};

fn setup(mock_server: &MockServer) -> (CrossrefProvider, SemanticScholarProvider) {
    let config = HttpConfig::for_testing(&mock_server.uri());
    let client = HttpClient::new(&config).unwrap();
    (
        CrossrefProvider::new(client.clone(), &config),
        SemanticScholarProvider::new(client, &config),
    )
}

fn paper(doi: &str, summary: &str) -> NormalizedPaper {
    NormalizedPaper {
        title: format!("Paper {doi}"),
        authors: vec![],
        year: 2020,
        venue: String::new(),
        identifier: doi.into(),
        citation_count: 10,
        summary: summary.into(),
        publication_type: "article".into(),
        matched_keywords: vec!["k".into()],
        source: SourceApi::OpenAlex,
        url: String::new(),
        is_trusted_venue: false,
    }
}

#[tokio::test]
async fn test_enrichment_is_idempotent_over_http() {
    let mock_server = MockServer::start().await;

    // Exactly one lookup allowed: the second pass must not hit the network.
    Mock::given(method("GET"))
        .and(path("/crossref/v1/works/10.1/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": {"abstract": "Filled."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (crossref, semantic_scholar) = setup(&mock_server);
    let enricher = Enricher::new(vec![&crossref, &semantic_scholar]);

    let mut papers = vec![paper("10.1/a", "")];

    let first = enricher.enrich_all(papers.iter_mut(), None).await;
    assert_eq!(first.get(&SourceApi::Crossref), Some(&1));
    assert_eq!(papers[0].summary, "Filled.");

    let second = enricher.enrich_all(papers.iter_mut(), None).await;
    assert!(second.is_empty());
    assert_eq!(papers[0].summary, "Filled.");
}

#[tokio::test]
async fn test_enrichment_falls_back_to_second_source() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crossref/v1/works/10.1/a"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/DOI:10.1/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"abstract": "From S2."})))
        .mount(&mock_server)
        .await;

    let (crossref, semantic_scholar) = setup(&mock_server);
    let enricher = Enricher::new(vec![&crossref, &semantic_scholar]);

    let mut papers = vec![paper("10.1/a", "")];
    let filled = enricher.enrich_all(papers.iter_mut(), None).await;

    assert_eq!(filled.get(&SourceApi::SemanticScholar), Some(&1));
    assert_eq!(papers[0].summary, "From S2.");
}

#[tokio::test]
async fn test_enrichment_failure_leaves_record_and_continues() {
    let mock_server = MockServer::start().await;

    // Every lookup for the first DOI fails outright.
    Mock::given(method("GET"))
        .and(path("/crossref/v1/works/10.1/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/DOI:10.1/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/crossref/v1/works/10.1/found"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": {"abstract": "Recovered."}
        })))
        .mount(&mock_server)
        .await;

    let (crossref, semantic_scholar) = setup(&mock_server);
    let enricher = Enricher::new(vec![&crossref, &semantic_scholar]);

    let mut papers = vec![paper("10.1/gone", ""), paper("10.1/found", "")];
    let filled = enricher.enrich_all(papers.iter_mut(), None).await;

    // The batch never aborts: the miss stays empty, the hit is filled.
    assert_eq!(filled.values().sum::<usize>(), 1);
    assert_eq!(papers[0].summary, "");
    assert_eq!(papers[1].summary, "Recovered.");
}

#[tokio::test]
async fn test_enrichment_prefers_first_source_in_chain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/crossref/v1/works/10.1/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": {"abstract": "Crossref wins."}
        })))
        .mount(&mock_server)
        .await;

    // Semantic Scholar must never be consulted when Crossref delivers.
    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/DOI:10.1/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"abstract": "Unused"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (crossref, semantic_scholar) = setup(&mock_server);
    let enricher = Enricher::new(vec![&crossref, &semantic_scholar]);

    let mut papers = vec![paper("10.1/a", "")];
    enricher.enrich_all(papers.iter_mut(), None).await;

    assert_eq!(papers[0].summary, "Crossref wins.");
}
