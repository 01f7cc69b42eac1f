mod common;

use std::{fs, time::Duration};

use alma_batch_rs::{
    config::Credential,
    core::{
        item::{RecordMutator, RecordResolver},
        job::JobRunner,
        record::RemoteRecord,
    },
    error::RowError,
    item::alma::AlmaClient,
};
use common::{
    server::{closed_url, TestServer},
    write_upload,
};
use serde_json::{json, Value};

fn item(barcode: &str) -> String {
    json!({
        "bib_data": { "mms_id": "991", "title": "Rust in Action" },
        "holding_data": { "holding_id": "221" },
        "item_data": { "pid": "231", "barcode": barcode, "internal_note_1": "old" }
    })
    .to_string()
}

fn client(url: &str) -> AlmaClient {
    AlmaClient::new(url, Duration::from_secs(5)).unwrap()
}

fn secret() -> Credential {
    Credential::new("secret")
}

#[test]
fn resolve_fetches_the_item_by_barcode() {
    let server = TestServer::start(vec![(200, item("B001"))]);

    let record = client(&server.url).resolve("B001", &secret()).unwrap();

    assert_eq!(record.keys().item_pid, "231");
    assert_eq!(record.item_field("barcode"), Some(&json!("B001")));

    let exchanges = server.finish();
    let request = &exchanges[0].request_line;
    assert!(request.starts_with("GET /almaws/v1/items?"), "{request}");
    assert!(request.contains("apikey=secret"));
    assert!(request.contains("item_barcode=B001"));
    assert!(request.contains("format=json"));
}

#[test]
fn resolve_reports_status_and_catalog_message() {
    let body = json!({
        "errorsExist": true,
        "errorList": {
            "error": [{
                "errorCode": "401689",
                "errorMessage": "No items found for barcode B999."
            }]
        }
    });
    let server = TestServer::start(vec![(404, body.to_string())]);

    let error = client(&server.url).resolve("B999", &secret()).unwrap_err();

    assert_eq!(
        error,
        RowError::Resolve("HTTP 404 Not Found: No items found for barcode B999.".to_string())
    );
    server.finish();
}

#[test]
fn resolve_rejects_malformed_bodies() {
    let server = TestServer::start(vec![
        (200, "<html>maintenance</html>".to_string()),
        (200, json!({ "item_data": { "pid": "1" } }).to_string()),
    ]);
    let client = client(&server.url);

    match client.resolve("B001", &secret()) {
        Err(RowError::Resolve(message)) => assert!(message.starts_with("invalid item record")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        client.resolve("B001", &secret()).unwrap_err(),
        RowError::Resolve("item record is missing bib_data.mms_id".to_string())
    );
    server.finish();
}

#[test]
fn transport_errors_do_not_leak_the_api_key() {
    let error = client(&closed_url()).resolve("B001", &secret()).unwrap_err();

    match error {
        RowError::Resolve(message) => assert!(!message.contains("secret"), "{message}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn mutate_puts_the_full_record_to_its_own_address() {
    let server = TestServer::start(vec![(200, item("B001"))]);
    let record = RemoteRecord::from_value(serde_json::from_str(&item("B001")).unwrap()).unwrap();

    client(&server.url)
        .mutate(record, "internal_note_1", "new note", &secret())
        .unwrap();

    let exchanges = server.finish();
    assert_eq!(
        exchanges[0].request_line,
        "PUT /almaws/v1/bibs/991/holdings/221/items/231?apikey=secret HTTP/1.1"
    );
    let sent: Value = serde_json::from_str(&exchanges[0].body).unwrap();
    assert_eq!(sent["item_data"]["internal_note_1"], json!("new note"));
    assert_eq!(sent["bib_data"]["title"], json!("Rust in Action"));
}

#[test]
fn mutate_reports_rejected_writes() {
    let server = TestServer::start(vec![(400, String::new())]);
    let record = RemoteRecord::from_value(serde_json::from_str(&item("B001")).unwrap()).unwrap();

    let error = client(&server.url)
        .mutate(record, "shelf_color", "red", &secret())
        .unwrap_err();

    assert_eq!(error, RowError::Mutate("HTTP 400 Bad Request".to_string()));
    server.finish();
}

#[test]
fn runner_drives_the_rest_api_row_by_row() {
    let server = TestServer::start(vec![
        (200, item("B001")),
        (200, item("B001")),
        (404, String::new()),
        (200, item("B003")),
        (200, item("B003")),
    ]);
    let client = client(&server.url);
    let path = write_upload(b"B001,first\nB999,second\nB003,third\n");

    let result = JobRunner::new(&client, &client)
        .run(&path, "internal_note_1", &secret())
        .unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(
        result.errors,
        vec!["Error finding Barcode B999 in row 2: HTTP 404 Not Found"]
    );

    let methods: Vec<String> = server
        .finish()
        .into_iter()
        .map(|exchange| exchange.request_line.split(' ').next().unwrap().to_string())
        .collect();
    assert_eq!(methods, vec!["GET", "PUT", "GET", "GET", "PUT"]);
    fs::remove_file(path).unwrap();
}
