//! Tabular adapter tests

mod helpers;

use classyfire::services::{ColumnSelection, Row};
use classyfire::{ClientConfig, FailurePolicy};
use futures::StreamExt;
use helpers::{compound_json, test_client, FakeTransport, Reply, ASPIRIN_INCHIKEY, ASPIRIN_SMILES};
use std::io::Write;
use std::sync::Arc;

const ETHANOL_KEY: &str = "InChIKey=LFQSCWFLJHTTHZ-UHFFFAOYSA-N";

fn row(cells: &[(&str, &str)]) -> Row {
    cells
        .iter()
        .map(|(c, v)| (c.to_string(), v.to_string()))
        .collect()
}

fn aspirin() -> Reply {
    Reply::Json(compound_json(ASPIRIN_SMILES, ASPIRIN_INCHIKEY, "Organic compounds"))
}

fn ethanol() -> Reply {
    Reply::Json(compound_json("CCO", ETHANOL_KEY, "Organic compounds"))
}

#[tokio::test(start_paused = true)]
async fn test_identifier_shared_across_columns_fetched_once() {
    let transport = Arc::new(
        FakeTransport::new()
            .script(ASPIRIN_INCHIKEY, vec![aspirin()])
            .script(ASPIRIN_SMILES, vec![aspirin()]),
    );
    let client = test_client(ClientConfig::default(), transport.clone());

    let rows = vec![
        row(&[
            ("inchikey1", "BSYNRYMUTXBXSQ-UHFFFAOYSA-N"),
            ("inchikey2", ASPIRIN_INCHIKEY),
            ("smiles", ASPIRIN_SMILES),
        ]),
        row(&[
            ("inchikey1", ASPIRIN_INCHIKEY),
            ("inchikey2", ""),
            ("smiles", ""),
        ]),
    ];

    let results: Vec<_> = client
        .classify_rows(rows, ColumnSelection::Auto)
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    let first = results[0].as_ref().unwrap();
    assert_eq!(
        first.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["inchikey1", "inchikey2", "smiles"]
    );
    assert_eq!(first["inchikey1"], first["inchikey2"]);

    let second = results[1].as_ref().unwrap();
    assert_eq!(second.len(), 1);

    assert_eq!(transport.calls_for(ASPIRIN_INCHIKEY), 1);
    assert_eq!(transport.calls_for(ASPIRIN_SMILES), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rows_keep_order_across_retry() {
    let transport = Arc::new(
        FakeTransport::new()
            .script(ETHANOL_KEY, vec![Reply::Empty, ethanol()])
            .script(ASPIRIN_INCHIKEY, vec![aspirin()]),
    );
    let client = test_client(ClientConfig::default(), transport.clone());

    let rows = vec![
        row(&[("name", "ethanol"), ("key", ETHANOL_KEY)]),
        row(&[("name", "aspirin"), ("key", ASPIRIN_INCHIKEY)]),
    ];
    let results: Vec<_> = client
        .classify_rows(rows, ColumnSelection::Auto)
        .collect()
        .await;

    let keys: Vec<_> = results
        .iter()
        .map(|r| r.as_ref().unwrap()["key"].compound().unwrap().inchikey.clone())
        .collect();
    assert_eq!(keys, vec![ETHANOL_KEY, ASPIRIN_INCHIKEY]);
    assert_eq!(transport.calls_for(ETHANOL_KEY), 2);
}

#[tokio::test(start_paused = true)]
async fn test_designated_columns_only() {
    let transport = Arc::new(FakeTransport::new().script("CCO", vec![ethanol()]));
    let client = test_client(ClientConfig::default(), transport.clone());

    let rows = vec![row(&[("structure", "CCO"), ("key", ASPIRIN_INCHIKEY)])];
    let selection = ColumnSelection::designated(vec![], vec!["structure".to_string()]);

    let results: Vec<_> = client.classify_rows(rows, selection).collect().await;

    let classified = results[0].as_ref().unwrap();
    assert!(classified.contains_key("structure"));
    assert!(!classified.contains_key("key"));
    assert_eq!(transport.calls(), vec!["CCO"]);
}

#[tokio::test(start_paused = true)]
async fn test_skip_leaves_failed_cell_out() {
    let transport = Arc::new(
        FakeTransport::new()
            .script(ASPIRIN_INCHIKEY, vec![aspirin()])
            .script(ETHANOL_KEY, vec![Reply::Status(502)]),
    );
    let config = ClientConfig {
        failure_policy: FailurePolicy::Skip,
        ..ClientConfig::default()
    };
    let client = test_client(config, transport);

    let rows = vec![row(&[("a", ASPIRIN_INCHIKEY), ("b", ETHANOL_KEY)])];
    let results: Vec<_> = client
        .classify_rows(rows, ColumnSelection::Auto)
        .collect()
        .await;

    let classified = results[0].as_ref().unwrap();
    assert!(classified.contains_key("a"));
    assert!(!classified.contains_key("b"));
}

#[tokio::test(start_paused = true)]
async fn test_classify_tsv_file_without_header() {
    let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
    writeln!(file, "aspirin\t{}", ASPIRIN_INCHIKEY).unwrap();
    writeln!(file, "ethanol\t{}", ETHANOL_KEY).unwrap();
    file.flush().unwrap();

    let transport = Arc::new(
        FakeTransport::new()
            .script(ASPIRIN_INCHIKEY, vec![aspirin()])
            .script(ETHANOL_KEY, vec![ethanol()]),
    );
    let client = test_client(ClientConfig::default(), transport.clone());

    let results: Vec<_> = client
        .classify_csv(file.path(), None, false, ColumnSelection::Auto)
        .unwrap()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.as_ref().unwrap().contains_key("1")));
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn test_missing_file_rejected() {
    let client = test_client(ClientConfig::default(), Arc::new(FakeTransport::new()));
    let result = client.classify_csv(
        std::path::Path::new("/nonexistent/compounds.csv"),
        None,
        true,
        ColumnSelection::Auto,
    );
    assert!(result.is_err());
}
