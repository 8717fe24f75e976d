use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, Uri},
    routing::post,
    Json, Router,
};
use publiccommons_lib::{
    core::{
        config::KvsConfig,
        types::{MatchCriterion, UpsertRecord},
    },
    providers::nckvs::{KvsClient, RecordStore},
    xml::{record::NestedRecord, NamespaceContext},
};
use serde_json::{json, Value};

#[derive(Clone)]
struct MockKvs {
    reply: Value,
    requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
}

async fn record_request(
    State(mock): State<MockKvs>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    mock.requests
        .lock()
        .expect("lock")
        .push((uri.path().to_string(), content_type, body));
    Json(mock.reply.clone())
}

async fn spawn_kvs(reply: Value) -> (String, MockKvs) {
    let mock = MockKvs {
        reply,
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/data/search/", post(record_request))
        .route("/data/set/", post(record_request))
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock kvs");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock kvs");
    });
    (format!("http://{addr}"), mock)
}

fn config(base_url: &str) -> KvsConfig {
    KvsConfig {
        base_url: base_url.to_string(),
        login_name: "user".to_string(),
        login_pass: "pass".to_string(),
        app_servername: "appname".to_string(),
        app_username: "appuser".to_string(),
        timezone: String::new(),
        datatypename: "commonstest1".to_string(),
        datatypeversion: 1,
        timeout_secs: 5,
    }
}

fn system_param() -> Value {
    json!({
        "login_name": "user",
        "login_pass": "pass",
        "app_servername": "appname",
        "app_username": "appuser",
        "timezone": ""
    })
}

fn sample_record() -> UpsertRecord {
    let mut raw = NestedRecord::aliased(NamespaceContext::empty());
    raw.insert_text("distributionStatus", Some("Actual".to_string()));
    UpsertRecord {
        status: "Actual".to_string(),
        document_id: "doc-1".to_string(),
        revision: "1".to_string(),
        category: "EvacuationOrder".to_string(),
        area_code: "282103".to_string(),
        title: "title".to_string(),
        summary: "summary".to_string(),
        raw,
        id: Some(Value::from("-1")),
    }
}

#[tokio::test]
async fn search_posts_matching_query_with_system_block() {
    let (base_url, mock) = spawn_kvs(json!({
        "code": "200",
        "datalist": [{"id": 12, "revision": "2", "document_id": "doc-1"}]
    }))
    .await;
    let client = KvsClient::new(&config(&base_url)).expect("client");

    let response = client
        .search(&[MatchCriterion::exact("document_id", "doc-1")])
        .await
        .expect("search");

    assert_eq!(response.datalist.len(), 1);
    assert_eq!(response.datalist[0].id, json!(12));
    assert_eq!(response.datalist[0].revision_number().expect("revision"), 2);
    assert_eq!(response.datalist[0].fields["document_id"], "doc-1");

    let requests = mock.requests.lock().expect("lock").clone();
    assert_eq!(requests.len(), 1);
    let (path, content_type, body) = &requests[0];
    assert_eq!(path, "/data/search/");
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        body,
        &json!({
            "system": system_param(),
            "query": {
                "datatypename": "commonstest1",
                "dataversion": "*",
                "limit": 0,
                "sortorder": [],
                "matching": [{"key": "document_id", "value": "doc-1", "pattern": "cmp"}]
            }
        })
    );
}

#[tokio::test]
async fn set_posts_datalist_with_datatype_version() {
    let (base_url, mock) = spawn_kvs(json!({"code": "200", "count": 1})).await;
    let client = KvsClient::new(&config(&format!("{base_url}/"))).expect("client");

    let ack = client.set(&[sample_record()]).await.expect("set");
    assert_eq!(ack.code, "200");
    assert_eq!(ack.body["count"], 1);

    let requests = mock.requests.lock().expect("lock").clone();
    let (path, _, body) = &requests[0];
    assert_eq!(path, "/data/set/");
    assert_eq!(body["system"], system_param());
    assert_eq!(body["query"]["datatypename"], "commonstest1");
    assert_eq!(body["query"]["datatypeversion"], 1);
    assert_eq!(body["query"]["datalist"][0]["id"], "-1");
    assert_eq!(
        body["query"]["datalist"][0]["raw"],
        json!({"distributionStatus": "Actual"})
    );
}

#[tokio::test]
async fn non_success_code_becomes_rpc_error() {
    let (base_url, _mock) = spawn_kvs(json!({"code": "400", "message": "invalid"})).await;
    let client = KvsClient::new(&config(&base_url)).expect("client");

    let err = client
        .search(&[MatchCriterion::exact("document_id", "doc-1")])
        .await
        .expect_err("expected rpc error");

    assert_eq!(err.code(), "REMOTE_STORE_ERROR");
    assert_eq!(err.to_string(), "RPCError: 400 invalid");
}

#[tokio::test]
async fn search_reply_without_datalist_is_rejected() {
    let (base_url, _mock) = spawn_kvs(json!({"code": "200"})).await;
    let client = KvsClient::new(&config(&base_url)).expect("client");

    let err = client
        .search(&[MatchCriterion::exact("document_id", "doc-1")])
        .await
        .expect_err("expected malformed reply");

    assert_eq!(err.code(), "REMOTE_STORE_ERROR");
    assert!(err.to_string().starts_with("RPCError: 200 unexpected response shape"));
    assert!(err.to_string().contains("datalist"));
}

#[tokio::test]
async fn unreachable_store_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = KvsClient::new(&config(&format!("http://{addr}"))).expect("client");
    let err = client.set(&[sample_record()]).await.expect_err("expected network error");
    assert_eq!(err.code(), "NETWORK_ERROR");
}
