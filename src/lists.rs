//! Structured data lists per RFC 6313: `basicList`, `subTemplateList`, and
//! `subTemplateMultiList`.
//!
//! Containers own their decoded contents. Decoders clear a container before
//! reuse so stale entries from a longer earlier record never survive into a
//! shorter later one.

use crate::info_model::InfoElement;
use crate::record::Record;
use crate::template::Template;
use crate::values::Value;
use crate::{Error, Result};

use serde::Serialize;

use std::sync::Arc;

/// In-memory size charged for a variable-length field (a length + pointer
/// pair) when computing a template's in-memory record length.
pub const VARFIELD_MEM_SIZE: u32 = 16;
/// In-memory size charged for a `basicList` container.
pub const BASIC_LIST_MEM_SIZE: u32 = 32;
/// In-memory size charged for a `subTemplateList` container.
pub const SUB_TEMPLATE_LIST_MEM_SIZE: u32 = 32;
/// In-memory size charged for a `subTemplateMultiList` container.
pub const SUB_TEMPLATE_MULTI_LIST_MEM_SIZE: u32 = 16;

/// List semantics from the RFC 6313 registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[repr(u8)]
pub enum ListSemantic {
    NoneOf = 0x00,
    ExactlyOneOf = 0x01,
    OneOrMoreOf = 0x02,
    AllOf = 0x03,
    Ordered = 0x04,
    #[default]
    Undefined = 0xFF,
}

impl ListSemantic {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<ListSemantic> {
        use ListSemantic::*;
        Some(match code {
            0x00 => NoneOf,
            0x01 => ExactlyOneOf,
            0x02 => OneOrMoreOf,
            0x03 => AllOf,
            0x04 => Ordered,
            0xFF => Undefined,
            _ => return None,
        })
    }

    /// The registry accepts 0xFF and 0x00 through 0x04 only.
    pub fn is_valid_code(code: u8) -> bool {
        Self::from_code(code).is_some()
    }
}

/// Repeated values of a single information element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasicList {
    pub semantic: ListSemantic,
    element: Option<Arc<InfoElement>>,
    field_len: u16,
    values: Vec<Value>,
}

impl BasicList {
    /// Creates a list of the given element at its default field length.
    pub fn new(element: &Arc<InfoElement>, semantic: ListSemantic) -> Self {
        Self::with_len(element, semantic, element.len)
    }

    /// Creates a list with an explicit per-value field length (reduced
    /// length, or [`crate::VARLEN`]).
    pub fn with_len(element: &Arc<InfoElement>, semantic: ListSemantic, field_len: u16) -> Self {
        Self {
            semantic,
            element: Some(element.clone()),
            field_len,
            values: Vec::new(),
        }
    }

    pub fn element(&self) -> Option<&Arc<InfoElement>> {
        self.element.as_ref()
    }

    /// Per-value wire length.
    pub fn field_len(&self) -> u16 {
        self.field_len
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        let element = self
            .element
            .as_ref()
            .ok_or_else(|| Error::Setup("basic list has no element".into()))?;
        if value.data_type() != element.data_type {
            return Err(Error::Setup(format!(
                "value type {} does not match basic list element {}",
                value.data_type().name(),
                element.name()
            )));
        }
        self.values.push(value);
        Ok(())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drops the values, keeping the element and semantic.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub(crate) fn push_unchecked(&mut self, value: Value) {
        self.values.push(value);
    }
}

/// Records of one nested template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubTemplateList {
    pub semantic: ListSemantic,
    tid: u16,
    #[serde(skip)]
    template: Option<Arc<Template>>,
    records: Vec<Record>,
}

impl SubTemplateList {
    /// Creates a list whose records follow `template`, identified on the
    /// wire by `tid` (which must be registered as an external template on
    /// the exporting session for a collector to decode it).
    pub fn new(tid: u16, template: &Arc<Template>, semantic: ListSemantic) -> Self {
        Self {
            semantic,
            tid,
            template: Some(template.clone()),
            records: Vec::new(),
        }
    }

    /// A decoded list whose nested template was mapped to "skip": no
    /// template, no records.
    pub(crate) fn skipped(tid: u16, semantic: ListSemantic) -> Self {
        Self {
            semantic,
            tid,
            template: None,
            records: Vec::new(),
        }
    }

    pub fn tid(&self) -> u16 {
        self.tid
    }

    pub fn template(&self) -> Option<&Arc<Template>> {
        self.template.as_ref()
    }

    pub fn push(&mut self, record: Record) -> Result<()> {
        match &self.template {
            Some(tmpl) if Arc::ptr_eq(record.template(), tmpl) => {
                self.records.push(record);
                Ok(())
            }
            Some(_) => Err(Error::Setup(
                "record template does not match the list template".into(),
            )),
            None => Err(Error::Setup("sub-template list has no template".into())),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops the records, keeping the template and semantic.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn push_unchecked(&mut self, record: Record) {
        self.records.push(record);
    }
}

/// Lists compare by semantic, template ID, and records; the template
/// reference itself does not participate.
impl PartialEq for SubTemplateList {
    fn eq(&self, other: &Self) -> bool {
        self.semantic == other.semantic && self.tid == other.tid && self.records == other.records
    }
}

/// One entry of a [`SubTemplateMultiList`]: its own template and records.
#[derive(Debug, Clone, Serialize)]
pub struct MultiListEntry {
    tid: u16,
    #[serde(skip)]
    template: Option<Arc<Template>>,
    records: Vec<Record>,
}

impl MultiListEntry {
    pub fn new(tid: u16, template: &Arc<Template>) -> Self {
        Self {
            tid,
            template: Some(template.clone()),
            records: Vec::new(),
        }
    }

    pub(crate) fn skipped(tid: u16) -> Self {
        Self {
            tid,
            template: None,
            records: Vec::new(),
        }
    }

    pub fn tid(&self) -> u16 {
        self.tid
    }

    pub fn template(&self) -> Option<&Arc<Template>> {
        self.template.as_ref()
    }

    pub fn push(&mut self, record: Record) -> Result<()> {
        match &self.template {
            Some(tmpl) if Arc::ptr_eq(record.template(), tmpl) => {
                self.records.push(record);
                Ok(())
            }
            Some(_) => Err(Error::Setup(
                "record template does not match the entry template".into(),
            )),
            None => Err(Error::Setup("multi-list entry has no template".into())),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push_unchecked(&mut self, record: Record) {
        self.records.push(record);
    }
}

impl PartialEq for MultiListEntry {
    fn eq(&self, other: &Self) -> bool {
        self.tid == other.tid && self.records == other.records
    }
}

/// A list of entries, each carrying its own nested template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubTemplateMultiList {
    pub semantic: ListSemantic,
    entries: Vec<MultiListEntry>,
}

impl SubTemplateMultiList {
    pub fn new(semantic: ListSemantic) -> Self {
        Self {
            semantic,
            entries: Vec::new(),
        }
    }

    pub fn push_entry(&mut self, entry: MultiListEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MultiListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the entries, keeping the semantic.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
