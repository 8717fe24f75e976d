use serde_json::Value;

use crate::{
    core::{
        errors::AppResult,
        types::{MatchCriterion, StoredMatch, UpsertOutcome, UpsertRecord, NEW_RECORD_ID},
    },
    providers::nckvs::RecordStore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertDecision {
    Create,
    Update { id: Value },
    Skip { stored_revision: i64 },
}

/// Chooses what to do with `record` given the store's first match for the
/// same document. Revisions are only compared when a match exists; a stored
/// revision equal to the incoming one counts as already stored.
pub fn decide(record: &UpsertRecord, existing: Option<&StoredMatch>) -> AppResult<UpsertDecision> {
    let Some(existing) = existing else {
        return Ok(UpsertDecision::Create);
    };
    let incoming_revision = record.revision_number()?;
    let stored_revision = existing.revision_number()?;
    if stored_revision >= incoming_revision {
        Ok(UpsertDecision::Skip { stored_revision })
    } else {
        Ok(UpsertDecision::Update {
            id: existing.id.clone(),
        })
    }
}

/// Writes `record` unless the store already holds the same or a newer revision.
pub async fn upsert<S>(store: &S, mut record: UpsertRecord) -> AppResult<UpsertOutcome>
where
    S: RecordStore,
{
    let criteria = [MatchCriterion::exact("document_id", record.document_id.clone())];
    let matches = store.search(&criteria).await?.datalist;

    let document_key = record.document_key();
    match decide(&record, matches.first())? {
        UpsertDecision::Create => {
            tracing::info!("new document: {document_key}");
            record.id = Some(Value::String(NEW_RECORD_ID.to_string()));
            let ack = store.set(std::slice::from_ref(&record)).await?;
            Ok(UpsertOutcome::Created(ack))
        }
        UpsertDecision::Skip { stored_revision } => {
            tracing::info!(stored_revision, "same document exists: {document_key}");
            Ok(UpsertOutcome::Unchanged)
        }
        UpsertDecision::Update { id } => {
            tracing::info!(id = %id, "update document: {document_key}");
            record.id = Some(id);
            let ack = store.set(std::slice::from_ref(&record)).await?;
            Ok(UpsertOutcome::Updated(ack))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{record::NestedRecord, NamespaceContext};

    fn stored(id: Value, revision: Value) -> StoredMatch {
        StoredMatch {
            id,
            revision,
            fields: Default::default(),
        }
    }

    fn incoming(revision: &str) -> UpsertRecord {
        UpsertRecord {
            status: "Actual".to_string(),
            document_id: "doc-1".to_string(),
            revision: revision.to_string(),
            category: "EvacuationOrder".to_string(),
            area_code: "011002".to_string(),
            title: "title".to_string(),
            summary: "summary".to_string(),
            raw: NestedRecord::aliased(NamespaceContext::empty()),
            id: None,
        }
    }

    #[test]
    fn equal_revision_is_skipped() {
        let existing = stored(Value::from(5), Value::from("1"));
        assert_eq!(
            decide(&incoming("1"), Some(&existing)).expect("decide"),
            UpsertDecision::Skip { stored_revision: 1 }
        );
    }

    #[test]
    fn older_revision_is_updated_in_place() {
        let existing = stored(Value::from("abc"), Value::from(0));
        assert_eq!(
            decide(&incoming("1"), Some(&existing)).expect("decide"),
            UpsertDecision::Update { id: Value::from("abc") }
        );
    }

    #[test]
    fn revision_is_not_parsed_without_a_match() {
        assert_eq!(
            decide(&incoming("1a"), None).expect("decide"),
            UpsertDecision::Create
        );
    }

    #[test]
    fn non_numeric_incoming_revision_is_a_client_fault() {
        let existing = stored(Value::from(1), Value::from("1"));
        let err = decide(&incoming("1a"), Some(&existing)).expect_err("expected invalid revision");
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(err.is_client_fault());
    }

    #[test]
    fn non_numeric_stored_revision_is_a_server_fault() {
        let existing = stored(Value::from(1), Value::from("draft"));
        let err = decide(&incoming("1"), Some(&existing)).expect_err("expected invalid revision");
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(!err.is_client_fault());
    }
}
