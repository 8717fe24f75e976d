pub mod extract;
pub mod upsert;

use crate::{
    core::{errors::AppResult, types::UpsertOutcome},
    providers::nckvs::RecordStore,
    xml::{convert::convert_str, record::NestedRecord},
};

/// Extract-then-upsert pipeline for one bulletin.
#[derive(Debug, Clone)]
pub struct BulletinPublisher<S> {
    store: S,
}

impl<S> BulletinPublisher<S>
where
    S: RecordStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn publish(&self, message: &NestedRecord) -> AppResult<UpsertOutcome> {
        let record = extract::extract(message)?;
        upsert::upsert(&self.store, record).await
    }

    /// Same as [`publish`](Self::publish) for a bare bulletin document.
    pub async fn publish_xml(&self, xml: &str) -> AppResult<UpsertOutcome> {
        let message = convert_str(xml)?;
        self.publish(&message).await
    }
}
