//! Order-preserving mapping produced from an XML element tree.
//!
//! A [`NestedRecord`] keeps its keys either as Clark-notation qualified names
//! (`{uri}local`, the form produced by the converter) or as alias-shortened
//! names (`alias:local`, the form produced by [`NestedRecord::shorten`] and
//! written to the store). Each record carries the namespace context of the
//! element it was built from, so shortening can be done per subtree.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::xml::namespace::NamespaceContext;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Text of a leaf element. `None` for elements without any text.
    Text(Option<String>),
    Record(NestedRecord),
}

impl RecordValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Some(value.into()))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => text.as_deref(),
            Self::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&NestedRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Text(_) => None,
        }
    }

    /// Missing text, empty text and records without entries are all empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.as_deref().map_or(true, str::is_empty),
            Self::Record(record) => record.is_empty(),
        }
    }
}

impl From<NestedRecord> for RecordValue {
    fn from(value: NestedRecord) -> Self {
        Self::Record(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStyle {
    /// Keys are stored exactly as inserted.
    #[default]
    Qualified,
    /// Keys are rewritten to `alias:local` on insert.
    Aliased,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRecord {
    namespaces: NamespaceContext,
    style: KeyStyle,
    entries: Vec<(String, RecordValue)>,
}

impl NestedRecord {
    pub fn new(namespaces: NamespaceContext) -> Self {
        Self {
            namespaces,
            style: KeyStyle::Qualified,
            entries: Vec::new(),
        }
    }

    pub fn aliased(namespaces: NamespaceContext) -> Self {
        Self {
            namespaces,
            style: KeyStyle::Aliased,
            entries: Vec::new(),
        }
    }

    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    pub fn style(&self) -> KeyStyle {
        self.style
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Resolves a qualified name against this record's own namespace context.
    pub fn resolve(&self, name: &str) -> String {
        self.namespaces.resolve(name)
    }

    /// Stores `value` under `raw_key`, returning the value it replaced.
    ///
    /// In an aliased record a nested record's key is resolved against the
    /// nested record's context, since a default namespace declared on an
    /// element also applies to that element's own tag. Text values resolve
    /// against this record's context. A replaced key keeps its position.
    pub fn insert(&mut self, raw_key: impl Into<String>, value: impl Into<RecordValue>) -> Option<RecordValue> {
        let raw_key = raw_key.into();
        let value = value.into();
        let key = match (self.style, &value) {
            (KeyStyle::Qualified, _) => raw_key,
            (KeyStyle::Aliased, RecordValue::Record(child)) => child.resolve(&raw_key),
            (KeyStyle::Aliased, RecordValue::Text(_)) => self.resolve(&raw_key),
        };

        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn insert_text(&mut self, raw_key: impl Into<String>, text: Option<String>) -> Option<RecordValue> {
        self.insert(raw_key, RecordValue::Text(text))
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RecordValue::as_text)
    }

    pub fn get_record(&self, key: &str) -> Option<&NestedRecord> {
        self.get(key).and_then(RecordValue::as_record)
    }

    /// Looks `key` up at any depth.
    ///
    /// A key present at this level is returned as-is, even when empty.
    /// Otherwise nested records are searched depth-first in insertion order
    /// and the first non-empty hit wins; empty hits inside a subtree are
    /// skipped in favour of later subtrees.
    pub fn find(&self, key: &str) -> Option<&RecordValue> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }

        self.entries
            .iter()
            .filter_map(|(_, value)| value.as_record())
            .filter_map(|child| child.find(key))
            .find(|hit| !hit.is_empty())
    }

    /// Copy of this tree with every key rewritten to `alias:local` form,
    /// each subtree using its own namespace context.
    pub fn shorten(&self) -> NestedRecord {
        let mut short = NestedRecord::aliased(self.namespaces.clone());
        for (key, value) in &self.entries {
            let value = match value {
                RecordValue::Record(child) => RecordValue::Record(child.shorten()),
                RecordValue::Text(text) => RecordValue::Text(text.clone()),
            };
            short.insert(key.clone(), value);
        }
        short
    }
}

impl Serialize for RecordValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Text(Some(text)) => serializer.serialize_str(text),
            Self::Text(None) => serializer.serialize_none(),
            Self::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for NestedRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
