//! Reads the stored fields out of a converted EDXL-DE bulletin.

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::UpsertRecord,
    },
    xml::{
        namespace::qualified,
        record::{NestedRecord, RecordValue},
    },
};

pub const NS_EDXLDE: &str = "urn:oasis:names:tc:emergency:EDXL:DE:1.0";
pub const NS_COMMONS: &str = "http://xml.publiccommons.ne.jp/xml/edxl/";
pub const NS_INFORMATION_BASIS3: &str = "http://xml.publiccommons.ne.jp/pcxml1/informationBasis3/";
pub const NS_INFORMATION_BASIS4: &str = "http://xml.publiccommons.ne.jp/pcxml1/informationBasis4/";

/// Schema the embedded report body is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentSchema {
    pub alias: &'static str,
    pub uri: &'static str,
}

impl ContentSchema {
    pub fn name(&self, local: &str) -> String {
        qualified(Some(self.uri), local)
    }
}

pub const INFORMATION_BASIS3: ContentSchema = ContentSchema {
    alias: "pcx_ib",
    uri: NS_INFORMATION_BASIS3,
};

pub const INFORMATION_BASIS4: ContentSchema = ContentSchema {
    alias: "pcx_cns_i3",
    uri: NS_INFORMATION_BASIS4,
};

/// Probe order. The first schema with a non-empty `Title` in the embedded
/// content is used for every body lookup.
pub const CONTENT_SCHEMAS: [ContentSchema; 2] = [INFORMATION_BASIS3, INFORMATION_BASIS4];

fn edxlde(local: &str) -> String {
    qualified(Some(NS_EDXLDE), local)
}

fn commons(local: &str) -> String {
    qualified(Some(NS_COMMONS), local)
}

/// Builds the store record for a converted bulletin root.
///
/// The returned record has no `id`; that is assigned by the upsert decision.
pub fn extract(root: &NestedRecord) -> AppResult<UpsertRecord> {
    let content = require_record(root, &commons("contentObject"))?;
    let embedded_key = edxlde("embeddedXMLContent");
    let document = content
        .find(&embedded_key)
        .and_then(RecordValue::as_record)
        .ok_or_else(|| AppError::missing(embedded_key))?;
    let schema = detect_schema(document)?;

    let title_key = schema.name("Title");
    let title = document
        .find(&title_key)
        .and_then(RecordValue::as_text)
        .ok_or_else(|| AppError::missing(title_key))?
        .to_string();

    let headline_key = schema.name("Headline");
    let headline = document
        .find(&headline_key)
        .and_then(RecordValue::as_record)
        .ok_or_else(|| AppError::missing(headline_key))?;

    let target_area = require_record(root, &commons("targetArea"))?;

    Ok(UpsertRecord {
        status: require_text(root, &edxlde("distributionStatus"))?,
        document_id: require_text(content, &commons("documentID"))?,
        revision: require_text(content, &commons("documentRevision"))?,
        category: require_text(content, &commons("category"))?,
        area_code: require_text(target_area, &commons("jisX0402"))?,
        title,
        summary: require_text(headline, &schema.name("Text"))?,
        raw: root.shorten(),
        id: None,
    })
}

pub fn detect_schema(document: &NestedRecord) -> AppResult<ContentSchema> {
    CONTENT_SCHEMAS
        .iter()
        .copied()
        .find(|schema| {
            document
                .find(&schema.name("Title"))
                .is_some_and(|title| !title.is_empty())
        })
        .ok_or_else(|| {
            let probes: Vec<String> = CONTENT_SCHEMAS.iter().map(|schema| schema.name("Title")).collect();
            AppError::missing(probes.join(" | "))
        })
}

fn require_record<'a>(record: &'a NestedRecord, key: &str) -> AppResult<&'a NestedRecord> {
    match record.get(key) {
        Some(RecordValue::Record(child)) => Ok(child),
        Some(RecordValue::Text(_)) => Err(AppError::MissingField(format!("{key} has no child elements"))),
        None => Err(AppError::missing(key)),
    }
}

/// Text of a direct child. Elements present without text read as "".
fn require_text(record: &NestedRecord, key: &str) -> AppResult<String> {
    match record.get(key) {
        Some(RecordValue::Text(text)) => Ok(text.clone().unwrap_or_default()),
        Some(RecordValue::Record(_)) => Err(AppError::MissingField(format!("{key} is not a text element"))),
        None => Err(AppError::missing(key)),
    }
}
