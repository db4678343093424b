//! Options templates and records describing the metadata this library can
//! export about itself: information element definitions (RFC 5610) and
//! template names/descriptions.

use crate::info_model::{InfoElement, InfoElementSpec, InfoModel};
use crate::record::Record;
use crate::template::{Template, TemplateMetadata};
use crate::values::{DataType, Semantic, Unit, VARLEN, Value};
use crate::Result;

use std::sync::Arc;

/// Spec flag marking fields carried only in the internal layout.
pub(crate) const SPEC_INTERNAL: u32 = 1;

/// RFC 5610 information element definition record, scoped by
/// (privateEnterpriseNumber, informationElementId).
pub(crate) static ELEMENT_TYPE_SPEC: &[InfoElementSpec] = &[
    InfoElementSpec::new("privateEnterpriseNumber", 4, 0),
    InfoElementSpec::new("informationElementId", 2, 0),
    InfoElementSpec::new("informationElementDataType", 1, 0),
    InfoElementSpec::new("informationElementSemantics", 1, 0),
    InfoElementSpec::new("informationElementUnits", 2, 0),
    InfoElementSpec::new("paddingOctets", 6, SPEC_INTERNAL),
    InfoElementSpec::new("informationElementRangeBegin", 8, 0),
    InfoElementSpec::new("informationElementRangeEnd", 8, 0),
    InfoElementSpec::new("informationElementName", VARLEN, 0),
    InfoElementSpec::new("informationElementDescription", VARLEN, 0),
];

/// Template metadata record, scoped by templateId.
pub(crate) static TEMPLATE_METADATA_SPEC: &[InfoElementSpec] = &[
    InfoElementSpec::new("templateId", 2, 0),
    InfoElementSpec::new("paddingOctets", 6, SPEC_INTERNAL),
    InfoElementSpec::new("templateName", VARLEN, 0),
    InfoElementSpec::new("templateDescription", VARLEN, 0),
];

/// The RFC 5610 options template. The padding is carried on the wire too,
/// so the same template serves internally and externally.
pub(crate) fn element_type_template(model: Arc<InfoModel>) -> Result<Template> {
    let mut tmpl = Template::new(model);
    tmpl.append_spec_array(ELEMENT_TYPE_SPEC, !0)?;
    tmpl.set_options_scope(2)?;
    Ok(tmpl)
}

/// The template-metadata options template; the internal variant includes
/// the padding field, the external one does not.
pub(crate) fn template_metadata_template(model: Arc<InfoModel>, internal: bool) -> Result<Template> {
    let mut tmpl = Template::new(model);
    tmpl.append_spec_array(TEMPLATE_METADATA_SPEC, if internal { !0 } else { 0 })?;
    tmpl.set_options_scope(1)?;
    Ok(tmpl)
}

/// True when an external template from the wire carries an RFC 5610
/// element definition record.
pub(crate) fn is_element_type_template(tmpl: &Template) -> bool {
    tmpl.is_options() && tmpl.contains_all_flagged_specs(ELEMENT_TYPE_SPEC, 0)
}

/// True when an external template from the wire carries a template
/// metadata record.
pub(crate) fn is_template_metadata_template(tmpl: &Template) -> bool {
    tmpl.is_options() && tmpl.contains_all_flagged_specs(TEMPLATE_METADATA_SPEC, 0)
}

/// Builds the RFC 5610 record describing one element.
pub(crate) fn element_record(tmpl: &Arc<Template>, element: &InfoElement) -> Result<Record> {
    let mut rec = Record::new(tmpl);
    rec.set("privateEnterpriseNumber", Value::Unsigned32(element.ent))?;
    rec.set("informationElementId", Value::Unsigned16(element.num))?;
    rec.set(
        "informationElementDataType",
        Value::Unsigned8(element.data_type.code()),
    )?;
    rec.set(
        "informationElementSemantics",
        Value::Unsigned8(element.semantic.code()),
    )?;
    rec.set("informationElementUnits", Value::Unsigned16(element.unit.code()))?;
    rec.set(
        "informationElementRangeBegin",
        Value::Unsigned64(element.range_min),
    )?;
    rec.set("informationElementRangeEnd", Value::Unsigned64(element.range_max))?;
    rec.set(
        "informationElementName",
        Value::String(element.name().to_owned()),
    )?;
    rec.set(
        "informationElementDescription",
        Value::String(element.description().unwrap_or_default().to_owned()),
    )?;
    Ok(rec)
}

/// Rebuilds an element definition from a decoded RFC 5610 record. Returns
/// `None` (logged) when the record is unusable.
pub(crate) fn element_from_record(rec: &Record) -> Option<InfoElement> {
    let ent = match rec.get("privateEnterpriseNumber") {
        Some(Value::Unsigned32(v)) => *v,
        _ => return None,
    };
    let num = match rec.get("informationElementId") {
        Some(Value::Unsigned16(v)) => *v,
        _ => return None,
    };
    let type_code = match rec.get("informationElementDataType") {
        Some(Value::Unsigned8(v)) => *v,
        _ => return None,
    };
    let Some(data_type) = DataType::from_code(type_code) else {
        log::warn!("element definition {ent}/{num} has unknown data type {type_code}");
        return None;
    };
    let name = match rec.get("informationElementName") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            log::warn!("element definition {ent}/{num} has no name");
            return None;
        }
    };

    let mut element = InfoElement::new(name, ent, num, data_type);
    if let Some(Value::Unsigned8(code)) = rec.get("informationElementSemantics") {
        if let Some(semantic) = Semantic::from_code(*code) {
            element = element.with_semantic(semantic);
        }
    }
    if let Some(Value::Unsigned16(code)) = rec.get("informationElementUnits") {
        if let Some(unit) = Unit::from_code(*code) {
            element = element.with_unit(unit);
        }
    }
    if let (Some(Value::Unsigned64(min)), Some(Value::Unsigned64(max))) = (
        rec.get("informationElementRangeBegin"),
        rec.get("informationElementRangeEnd"),
    ) {
        element = element.with_range(*min, *max);
    }
    if let Some(Value::String(desc)) = rec.get("informationElementDescription") {
        if !desc.is_empty() {
            element = element.with_description(desc.as_str());
        }
    }
    Some(element)
}

/// Builds the metadata record for a named template.
pub(crate) fn template_metadata_record(
    tmpl: &Arc<Template>,
    tid: u16,
    meta: &TemplateMetadata,
) -> Result<Record> {
    let mut rec = Record::new(tmpl);
    rec.set("templateId", Value::Unsigned16(tid))?;
    rec.set("templateName", Value::String(meta.name.clone()))?;
    rec.set(
        "templateDescription",
        Value::String(meta.description.clone().unwrap_or_default()),
    )?;
    Ok(rec)
}

/// Rebuilds (template id, metadata) from a decoded metadata record.
pub(crate) fn template_metadata_from_record(rec: &Record) -> Option<(u16, TemplateMetadata)> {
    let tid = match rec.get("templateId") {
        Some(Value::Unsigned16(v)) => *v,
        _ => return None,
    };
    let name = match rec.get("templateName") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return None,
    };
    let description = match rec.get("templateDescription") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };
    Some((tid, TemplateMetadata { name, description }))
}
