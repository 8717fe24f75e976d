#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use publiccommons_lib::{
    core::{
        errors::{AppError, AppResult},
        types::{MatchCriterion, SearchResponse, StoreAck, StoredMatch, UpsertRecord},
    },
    providers::nckvs::RecordStore,
};
use serde_json::{Map, Value};

pub const IB3_BULLETIN: &str = include_str!("../fixtures/bulletins/evacuation_ib3.xml");
pub const IB4_BULLETIN: &str = include_str!("../fixtures/bulletins/shelter_ib4.xml");

pub const IB3_DOCUMENT_ID: &str = "7e57c0de-0000-4000-8000-000000000001";

/// Wraps a bulletin in a SOAP 1.1 `publish` request.
pub fn publish_envelope(bulletin: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:soap="http://soap.publiccommons.ne.jp/">"#,
            "<soapenv:Header/><soapenv:Body><soap:publish><soap:message>{}</soap:message></soap:publish></soapenv:Body>",
            "</soapenv:Envelope>"
        ),
        bulletin
    )
}

#[derive(Default)]
struct MemoryStoreInner {
    stored: Vec<StoredMatch>,
    searches: Vec<Vec<MatchCriterion>>,
    writes: Vec<Value>,
    set_failure: Option<(String, String)>,
}

/// In-memory [`RecordStore`] that records every call.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

impl MemoryStore {
    pub fn with_stored(document_id: &str, id: Value, revision: Value) -> Self {
        let store = Self::default();
        let mut fields = Map::new();
        fields.insert("document_id".to_string(), Value::from(document_id));
        store.inner.lock().expect("lock").stored.push(StoredMatch {
            id,
            revision,
            fields,
        });
        store
    }

    pub fn failing_set(code: &str, message: &str) -> Self {
        let store = Self::default();
        store.inner.lock().expect("lock").set_failure = Some((code.to_string(), message.to_string()));
        store
    }

    pub fn searches(&self) -> Vec<Vec<MatchCriterion>> {
        self.inner.lock().expect("lock").searches.clone()
    }

    /// Every record passed to `set`, serialized the way the client would send it.
    pub fn writes(&self) -> Vec<Value> {
        self.inner.lock().expect("lock").writes.clone()
    }
}

impl RecordStore for MemoryStore {
    async fn search(&self, criteria: &[MatchCriterion]) -> AppResult<SearchResponse> {
        let mut inner = self.inner.lock().expect("lock");
        inner.searches.push(criteria.to_vec());
        let datalist = inner
            .stored
            .iter()
            .filter(|stored| {
                criteria.iter().all(|criterion| {
                    stored.fields.get(&criterion.key).and_then(Value::as_str) == Some(criterion.value.as_str())
                })
            })
            .cloned()
            .collect();
        Ok(SearchResponse {
            code: "200".to_string(),
            datalist,
            message: None,
        })
    }

    async fn set(&self, records: &[UpsertRecord]) -> AppResult<StoreAck> {
        let mut inner = self.inner.lock().expect("lock");
        if let Some((code, message)) = inner.set_failure.clone() {
            return Err(AppError::RemoteStore { code, message });
        }
        for record in records {
            inner
                .writes
                .push(serde_json::to_value(record).expect("record serializes"));
        }
        Ok(StoreAck {
            code: "200".to_string(),
            body: Map::new(),
        })
    }
}
