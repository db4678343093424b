//! Transcode plans: per-(external, internal) template programs moving
//! record fields between the wire and memory.
//!
//! A plan lines the external template's fields up against the internal
//! template by (enterprise, id, repetition): matched fields copy (with
//! endian conversion and reduced-length expansion falling out of the typed
//! decode), external-only fields are skipped, and internal-only slots keep
//! their zero value. The three structured-data types recurse through the
//! session's template-pair map, and the sub-plans they instantiate are
//! cached alongside the top-level plans.

use crate::lists::{BasicList, ListSemantic, MultiListEntry, SubTemplateList, SubTemplateMultiList};
use crate::record::Record;
use crate::session::Session;
use crate::template::{Template, TemplateField};
use crate::values::{self, DataType, VARLEN, Value};
use crate::{Error, Result};

use lru::LruCache;

use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cached plans kept per message buffer.
const PLAN_CACHE_CAPACITY: usize = 128;

/// A compiled field program for one (external, internal) template pair.
pub(crate) struct TranscodePlan {
    pub ext: Arc<Template>,
    pub int: Arc<Template>,
    /// Per external field: the matching internal slot, if any.
    pub slots: Vec<Option<usize>>,
}

impl TranscodePlan {
    fn build(ext: &Arc<Template>, int: &Arc<Template>) -> Self {
        let slots = ext
            .fields()
            .iter()
            .map(|f| int.position_of(f.key(), f.midx))
            .collect();
        Self {
            ext: ext.clone(),
            int: int.clone(),
            slots,
        }
    }
}

/// LRU cache of transcode plans.
///
/// Keys are the template pair's identities (their addresses), not IDs:
/// the same numeric ID can name different templates in the internal and
/// external tables, or across domains. A plan holds its templates alive,
/// so a key can never be reused for a different template while its entry
/// exists.
pub(crate) struct PlanCache {
    cache: LruCache<(usize, usize), Arc<TranscodePlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self {
            cache: LruCache::new(
                NonZeroUsize::new(PLAN_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    fn key(ext: &Arc<Template>, int: &Arc<Template>) -> (usize, usize) {
        (Arc::as_ptr(ext) as usize, Arc::as_ptr(int) as usize)
    }

    pub fn get_or_build(&mut self, ext: &Arc<Template>, int: &Arc<Template>) -> Arc<TranscodePlan> {
        let key = Self::key(ext, int);
        if let Some(plan) = self.cache.get(&key) {
            return plan.clone();
        }
        let plan = Arc::new(TranscodePlan::build(ext, int));
        self.cache.put(key, plan.clone());
        plan
    }

    /// Drops every plan referring to a removed template.
    pub fn invalidate(&mut self, tmpl: &Arc<Template>) {
        let stale: Vec<(usize, usize)> = self
            .cache
            .iter()
            .filter(|(_, plan)| Arc::ptr_eq(&plan.ext, tmpl) || Arc::ptr_eq(&plan.int, tmpl))
            .map(|(&key, _)| key)
            .collect();
        for key in stale {
            self.cache.pop(&key);
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

// ---- encoding: memory to wire ---------------------------------------------

/// Encodes a record through a plan: external fields pull from their matched
/// internal slots, unmatched external fields encode as zero values.
pub(crate) fn encode_record(plan: &TranscodePlan, rec: &Record, out: &mut Vec<u8>) -> Result<()> {
    if !Arc::ptr_eq(rec.template(), &plan.int) {
        return Err(Error::Setup(
            "record was not built on the active internal template".into(),
        ));
    }
    for (field, slot) in plan.ext.fields().iter().zip(&plan.slots) {
        match slot {
            Some(i) => encode_field(field, &rec.values()[*i], out)?,
            None => encode_field(field, &Value::default_for(field.element().data_type), out)?,
        }
    }
    Ok(())
}

/// Encodes a record against its own template, as nested list records are.
pub(crate) fn encode_record_identity(
    tmpl: &Arc<Template>,
    rec: &Record,
    out: &mut Vec<u8>,
) -> Result<()> {
    if !Arc::ptr_eq(rec.template(), tmpl) {
        return Err(Error::Setup(
            "record was not built on the list's template".into(),
        ));
    }
    for (field, value) in tmpl.fields().iter().zip(rec.values()) {
        encode_field(field, value, out)?;
    }
    Ok(())
}

fn encode_field(field: &TemplateField, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    if field.is_varlen() {
        let content = varlen_content(value)?;
        values::write_varlen_prefix(out, content.len());
        out.extend_from_slice(&content);
        Ok(())
    } else if value.data_type().is_list() {
        Err(Error::Setup(format!(
            "list field {} must be variable-length",
            field.element().name()
        )))
    } else {
        value.write(out, field.len)
    }
}

fn varlen_content(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::BasicList(list) => encode_basic_list(list),
        Value::SubTemplateList(list) => encode_sub_template_list(list),
        Value::SubTemplateMultiList(list) => encode_multi_list(list),
        other => match other.varlen_bytes() {
            Some(bytes) => Ok(bytes.to_vec()),
            None => {
                // a numeric value in a varlen field encodes at natural width
                let mut tmp = Vec::new();
                other.write(&mut tmp, other.data_type().default_len())?;
                Ok(tmp)
            }
        },
    }
}

fn encode_basic_list(list: &BasicList) -> Result<Vec<u8>> {
    let Some(element) = list.element() else {
        // a never-initialized list encodes as zero content
        if list.is_empty() {
            return Ok(Vec::new());
        }
        return Err(Error::Setup("basic list has no element".into()));
    };
    let mut out = Vec::new();
    out.push(list.semantic.code());
    let id = if element.ent != 0 {
        element.num | 0x8000
    } else {
        element.num
    };
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&list.field_len().to_be_bytes());
    if element.ent != 0 {
        out.extend_from_slice(&element.ent.to_be_bytes());
    }
    for value in list.values() {
        if list.field_len() == VARLEN {
            let content = varlen_content(value)?;
            values::write_varlen_prefix(&mut out, content.len());
            out.extend_from_slice(&content);
        } else {
            value.write(&mut out, list.field_len())?;
        }
    }
    Ok(out)
}

fn encode_sub_template_list(list: &SubTemplateList) -> Result<Vec<u8>> {
    let Some(tmpl) = list.template() else {
        if list.is_empty() {
            return Ok(Vec::new());
        }
        return Err(Error::Setup("sub-template list has no template".into()));
    };
    let mut out = Vec::new();
    out.push(list.semantic.code());
    out.extend_from_slice(&list.tid().to_be_bytes());
    for rec in list.records() {
        encode_record_identity(tmpl, rec, &mut out)?;
    }
    Ok(out)
}

fn encode_multi_list(list: &SubTemplateMultiList) -> Result<Vec<u8>> {
    if list.is_empty() && list.semantic == ListSemantic::Undefined {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    out.push(list.semantic.code());
    for entry in list.entries() {
        let Some(tmpl) = entry.template() else {
            return Err(Error::Setup("multi-list entry has no template".into()));
        };
        let mut body = Vec::new();
        for rec in entry.records() {
            encode_record_identity(tmpl, rec, &mut body)?;
        }
        out.extend_from_slice(&entry.tid().to_be_bytes());
        // RFC 6313: the entry length covers its own 4-octet header
        out.extend_from_slice(&((body.len() + 4) as u16).to_be_bytes());
        out.extend_from_slice(&body);
    }
    Ok(out)
}

// ---- decoding: wire to memory ---------------------------------------------

/// Decodes one record through a plan, returning it and the octets
/// consumed. Internal-only slots keep their zero values.
pub(crate) fn decode_record(
    plan: &TranscodePlan,
    input: &[u8],
    session: &Session,
    plans: &mut PlanCache,
) -> Result<(Record, usize)> {
    let mut rec = Record::new(&plan.int);
    let mut buf = input;
    for (field, slot) in plan.ext.fields().iter().zip(&plan.slots) {
        if field.is_varlen() {
            let (content, rest) = values::read_varlen(buf)?;
            buf = rest;
            if let Some(i) = slot {
                let value =
                    decode_content(field.element().data_type, content, session, plans)?;
                rec.put(*i, value);
            }
        } else if let Some(i) = slot {
            let (value, rest) = Value::read(buf, field.element().data_type, field.len)?;
            rec.put(*i, value);
            buf = rest;
        } else {
            let len = usize::from(field.len);
            if buf.len() < len {
                return Err(Error::InvalidIpfix(format!(
                    "field of {len} octets overruns its set ({} left)",
                    buf.len()
                )));
            }
            buf = &buf[len..];
        }
    }
    Ok((rec, input.len() - buf.len()))
}

fn decode_content(
    ty: DataType,
    content: &[u8],
    session: &Session,
    plans: &mut PlanCache,
) -> Result<Value> {
    match ty {
        DataType::BasicList => Ok(Value::BasicList(decode_basic_list(content, session, plans)?)),
        DataType::SubTemplateList => Ok(Value::SubTemplateList(decode_sub_template_list(
            content, session, plans,
        )?)),
        DataType::SubTemplateMultiList => Ok(Value::SubTemplateMultiList(decode_multi_list(
            content, session, plans,
        )?)),
        DataType::String => Ok(Value::String(String::from_utf8_lossy(content).into_owned())),
        DataType::OctetArray => Ok(Value::OctetArray(content.to_vec())),
        other => Value::read(content, other, content.len() as u16).map(|(v, _)| v),
    }
}

fn read_semantic(byte: u8) -> ListSemantic {
    ListSemantic::from_code(byte).unwrap_or_else(|| {
        log::warn!("invalid list semantic {byte:#04x}, treating as undefined");
        ListSemantic::Undefined
    })
}

fn decode_basic_list(
    content: &[u8],
    session: &Session,
    plans: &mut PlanCache,
) -> Result<BasicList> {
    if content.is_empty() {
        return Ok(BasicList::default());
    }
    if content.len() < 5 {
        return Err(Error::InvalidIpfix("truncated basic list header".into()));
    }
    let semantic = read_semantic(content[0]);
    let raw_id = u16::from_be_bytes([content[1], content[2]]);
    let field_len = u16::from_be_bytes([content[3], content[4]]);
    let mut rest = &content[5..];
    let ent = if raw_id & 0x8000 != 0 {
        if rest.len() < 4 {
            return Err(Error::InvalidIpfix("truncated basic list header".into()));
        }
        let ent = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        rest = &rest[4..];
        ent
    } else {
        0
    };
    let element = session.model().get_or_alien(ent, raw_id & 0x7FFF, field_len);
    let mut list = BasicList::with_len(&element, semantic, field_len);

    if field_len == VARLEN {
        while !rest.is_empty() {
            let (value_content, next) = values::read_varlen(rest)?;
            rest = next;
            list.push_unchecked(decode_content(element.data_type, value_content, session, plans)?);
        }
    } else if field_len > 0 {
        while rest.len() >= usize::from(field_len) {
            let (value, next) = Value::read(rest, element.data_type, field_len)?;
            rest = next;
            list.push_unchecked(value);
        }
    }
    Ok(list)
}

fn decode_sub_template_list(
    content: &[u8],
    session: &Session,
    plans: &mut PlanCache,
) -> Result<SubTemplateList> {
    if content.is_empty() {
        return Ok(SubTemplateList::default());
    }
    if content.len() < 3 {
        return Err(Error::InvalidIpfix("truncated sub-template list header".into()));
    }
    let semantic = read_semantic(content[0]);
    let tid = u16::from_be_bytes([content[1], content[2]]);
    let mut rest = &content[3..];

    let mapped = session.lookup_template_pair(tid);
    if mapped == 0 {
        return Ok(SubTemplateList::skipped(tid, semantic));
    }
    let Some((plan, int_tmpl)) = resolve_nested(tid, mapped, session, plans) else {
        return Ok(SubTemplateList::skipped(tid, semantic));
    };

    let mut list = SubTemplateList::new(tid, &int_tmpl, semantic);
    let min = usize::from(plan.ext.wire_min_len()).max(1);
    while rest.len() >= min {
        let (rec, consumed) = decode_record(&plan, rest, session, plans)?;
        if consumed == 0 {
            break;
        }
        rest = &rest[consumed..];
        list.push_unchecked(rec);
    }
    Ok(list)
}

fn decode_multi_list(
    content: &[u8],
    session: &Session,
    plans: &mut PlanCache,
) -> Result<SubTemplateMultiList> {
    if content.is_empty() {
        return Ok(SubTemplateMultiList::default());
    }
    let semantic = read_semantic(content[0]);
    let mut rest = &content[1..];
    let mut list = SubTemplateMultiList::new(semantic);

    while rest.len() >= 4 {
        let tid = u16::from_be_bytes([rest[0], rest[1]]);
        let entry_len = usize::from(u16::from_be_bytes([rest[2], rest[3]]));
        // RFC 6313: the entry length covers its own 4-octet header
        if entry_len < 4 || entry_len > rest.len() {
            return Err(Error::InvalidIpfix(format!(
                "multi-list entry length {entry_len} overruns the list"
            )));
        }
        let body = &rest[4..entry_len];
        rest = &rest[entry_len..];

        let mapped = session.lookup_template_pair(tid);
        if mapped == 0 {
            list.push_entry(MultiListEntry::skipped(tid));
            continue;
        }
        let Some((plan, int_tmpl)) = resolve_nested(tid, mapped, session, plans) else {
            list.push_entry(MultiListEntry::skipped(tid));
            continue;
        };

        let mut entry = MultiListEntry::new(tid, &int_tmpl);
        let mut body_rest = body;
        let min = usize::from(plan.ext.wire_min_len()).max(1);
        while body_rest.len() >= min {
            let (rec, consumed) = decode_record(&plan, body_rest, session, plans)?;
            if consumed == 0 {
                break;
            }
            body_rest = &body_rest[consumed..];
            entry.push_unchecked(rec);
        }
        list.push_entry(entry);
    }
    Ok(list)
}

/// Resolves a nested external template and its paired internal layout,
/// building (or fetching) the plan for the pair. `mapped == tid` decodes
/// the external template as its own layout.
fn resolve_nested(
    tid: u16,
    mapped: u16,
    session: &Session,
    plans: &mut PlanCache,
) -> Option<(Arc<TranscodePlan>, Arc<Template>)> {
    let ext = match session.get_template(false, tid) {
        Ok(t) => t,
        Err(_) => {
            log::warn!("nested template {tid:#06x} is unknown, skipping list contents");
            return None;
        }
    };
    let int = if mapped == tid {
        ext.clone()
    } else {
        match session.get_template(true, mapped) {
            Ok(t) => t,
            Err(_) => {
                log::warn!(
                    "nested pair {tid:#06x} -> {mapped:#06x} names a missing internal template"
                );
                return None;
            }
        }
    };
    Some((plans.get_or_build(&ext, &int), int))
}
