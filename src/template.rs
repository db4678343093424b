//! Templates: ordered lists of information element references that give
//! records their wire layout.
//!
//! A template is built up mutably (append elements, set an options scope),
//! then handed to a [`Session`](crate::Session) behind an `Arc`, which marks
//! it active; an active template never changes again. Templates cache the
//! sizes the transcoder needs: minimum on-wire record length, in-memory
//! record length, and the length of their own template record.

use crate::info_model::{ElementKey, InfoElement, InfoElementSpec, InfoModel};
use crate::lists::{
    BASIC_LIST_MEM_SIZE, SUB_TEMPLATE_LIST_MEM_SIZE, SUB_TEMPLATE_MULTI_LIST_MEM_SIZE,
    VARFIELD_MEM_SIZE,
};
use crate::values::{DataType, VARLEN};
use crate::{Error, Result};

use serde::Serialize;

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

/// One field of a template: a resolved element reference, the field's wire
/// length, and the repetition index distinguishing repeated elements.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateField {
    element: Arc<InfoElement>,
    /// Wire length in octets, or [`VARLEN`].
    pub len: u16,
    /// 0-based count of prior occurrences of the same element in this
    /// template.
    pub midx: u16,
}

impl TemplateField {
    pub fn element(&self) -> &Arc<InfoElement> {
        &self.element
    }

    pub fn key(&self) -> ElementKey {
        self.element.key()
    }

    pub fn is_varlen(&self) -> bool {
        self.len == VARLEN
    }

    /// Octets this field contributes to the minimum on-wire record length.
    /// A variable-length field counts only its 1-octet minimum prefix.
    pub fn wire_min_size(&self) -> u16 {
        if self.is_varlen() { 1 } else { self.len }
    }

    /// Octets this field contributes to the in-memory record length, using
    /// the semantic container size for variable-length fields.
    pub fn mem_size(&self) -> u32 {
        if !self.is_varlen() {
            return u32::from(self.len);
        }
        match self.element.data_type {
            DataType::BasicList => BASIC_LIST_MEM_SIZE,
            DataType::SubTemplateList => SUB_TEMPLATE_LIST_MEM_SIZE,
            DataType::SubTemplateMultiList => SUB_TEMPLATE_MULTI_LIST_MEM_SIZE,
            _ => VARFIELD_MEM_SIZE,
        }
    }
}

/// Name and optional description attached to a template, exported as an
/// options record scoped by the template ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: Option<String>,
}

/// An ordered list of information element references.
pub struct Template {
    model: Arc<InfoModel>,
    fields: Vec<TemplateField>,
    scope_count: u16,
    wire_min_len: u16,
    mem_len: u32,
    template_record_len: u16,
    varlen: bool,
    active: AtomicBool,
    metadata: RwLock<Option<TemplateMetadata>>,
    context: OnceLock<Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("fields", &self.fields)
            .field("scope_count", &self.scope_count)
            .field("wire_min_len", &self.wire_min_len)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Template {
    /// Creates an empty template on the given model.
    pub fn new(model: Arc<InfoModel>) -> Self {
        Self {
            model,
            fields: Vec::new(),
            scope_count: 0,
            wire_min_len: 0,
            mem_len: 0,
            // template id + field count
            template_record_len: 4,
            varlen: false,
            active: AtomicBool::new(false),
            metadata: RwLock::new(None),
            context: OnceLock::new(),
        }
    }

    pub fn model(&self) -> &Arc<InfoModel> {
        &self.model
    }

    /// Appends an element by example. The element is resolved against the
    /// model by `(enterprise, id)` — an unknown key synthesizes an alien
    /// element — and `example.len` is used as the field length (0 selects
    /// the resolved element's default).
    pub fn append(&mut self, example: &InfoElement) -> Result<()> {
        self.append_key(example.ent, example.num, example.len)
    }

    /// Appends an element looked up by name, with an optional length
    /// override (0 selects the element's default length).
    pub fn append_by_name(&mut self, name: &str, len_override: u16) -> Result<()> {
        let element = self.model.require_by_name(name)?;
        let len = if len_override == 0 { element.len } else { len_override };
        self.push_field(element, len)
    }

    /// Appends one spec if its flags match; returns whether it was
    /// included.
    pub fn append_spec(&mut self, spec: &InfoElementSpec, flags: u32) -> Result<bool> {
        if !spec.matches(flags) {
            return Ok(false);
        }
        self.append_by_name(spec.name, spec.len_override)?;
        Ok(true)
    }

    /// Appends every spec in the array whose flags match.
    pub fn append_spec_array(&mut self, specs: &[InfoElementSpec], flags: u32) -> Result<()> {
        for spec in specs {
            self.append_spec(spec, flags)?;
        }
        Ok(())
    }

    /// Appends a field as it appeared on the wire, synthesizing an alien
    /// element for an unknown key.
    pub(crate) fn append_key(&mut self, ent: u32, num: u16, len: u16) -> Result<()> {
        let element = self.model.get_or_alien(ent, num, len);
        let len = if len == 0 { element.len } else { len };
        self.push_field(element, len)
    }

    fn push_field(&mut self, element: Arc<InfoElement>, len: u16) -> Result<()> {
        if self.is_active() {
            return Err(Error::Setup("template is active and immutable".into()));
        }
        if self.fields.len() >= usize::from(u16::MAX) {
            return Err(Error::Setup("template already has 65535 fields".into()));
        }
        if !element.data_type.valid_len(len) {
            if self.model.strict_lengths() {
                return Err(Error::InvalidLength {
                    element: element.name().to_owned(),
                    len,
                });
            }
            log::warn!(
                "length {len} is not valid for {} ({}); keeping it",
                element.name(),
                element.data_type.name()
            );
        }

        let key = element.key();
        let midx = self.fields.iter().filter(|f| f.key() == key).count() as u16;
        let field = TemplateField { element, len, midx };

        let record_cost = if field.element.ent != 0 { 8 } else { 4 };
        let (Some(template_record_len), Some(wire_min_len)) = (
            self.template_record_len.checked_add(record_cost),
            self.wire_min_len.checked_add(field.wire_min_size()),
        ) else {
            return Err(Error::Setup(
                "template exceeds the 65535-octet record limit".into(),
            ));
        };
        self.template_record_len = template_record_len;
        self.wire_min_len = wire_min_len;
        self.mem_len += field.mem_size();
        if field.is_varlen() {
            self.varlen = true;
        }
        self.fields.push(field);
        Ok(())
    }

    /// Declares the leading `scope_count` fields to be scope, making this
    /// an options template. 0 puts every field in scope.
    pub fn set_options_scope(&mut self, scope_count: u16) -> Result<()> {
        if self.is_active() {
            return Err(Error::Setup("template is active and immutable".into()));
        }
        if self.scope_count != 0 {
            return Err(Error::Setup("options scope is already set".into()));
        }
        if self.fields.is_empty() {
            return Err(Error::Setup("options scope requires at least one field".into()));
        }
        if usize::from(scope_count) > self.fields.len() {
            return Err(Error::Setup(format!(
                "scope count {scope_count} exceeds field count {}",
                self.fields.len()
            )));
        }
        self.scope_count = if scope_count == 0 {
            self.fields.len() as u16
        } else {
            scope_count
        };
        // scope field count in the options template record
        self.template_record_len += 2;
        Ok(())
    }

    pub fn field_count(&self) -> u16 {
        self.fields.len() as u16
    }

    pub fn scope_count(&self) -> u16 {
        self.scope_count
    }

    /// Options templates are exactly those with a non-zero scope.
    pub fn is_options(&self) -> bool {
        self.scope_count > 0
    }

    pub fn field(&self, index: usize) -> Option<&TemplateField> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[TemplateField] {
        &self.fields
    }

    /// Index of the `midx`-th occurrence of `(enterprise, id)`.
    pub(crate) fn position_of(&self, key: ElementKey, midx: u16) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.key() == key && f.midx == midx)
    }

    /// Index of the first field with the given element name.
    pub(crate) fn position_of_name(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.element.name() == name)
    }

    pub fn contains_element(&self, key: ElementKey) -> bool {
        self.fields.iter().any(|f| f.key() == key)
    }

    pub fn contains_spec(&self, spec: &InfoElementSpec) -> bool {
        self.model
            .get_by_name(spec.name)
            .is_some_and(|e| self.contains_element(e.key()))
    }

    /// True when every spec whose flags match is present in the template.
    pub fn contains_all_flagged_specs(&self, specs: &[InfoElementSpec], flags: u32) -> bool {
        specs
            .iter()
            .filter(|s| s.matches(flags))
            .all(|s| self.contains_spec(s))
    }

    /// Minimum on-wire length of a record described by this template, with
    /// every variable-length field at its 1-octet minimum.
    pub fn wire_min_len(&self) -> u16 {
        self.wire_min_len
    }

    /// In-memory record length, counting semantic containers for
    /// variable-length fields.
    pub fn mem_len(&self) -> u32 {
        self.mem_len
    }

    /// On-wire length of this template's (options) template record.
    pub fn template_record_len(&self) -> u16 {
        self.template_record_len
    }

    pub fn has_varlen(&self) -> bool {
        self.varlen
    }

    /// True once the template has been attached to a session or used on
    /// the wire; the field list is immutable from then on.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Attaches a name and optional description, exported as an options
    /// record scoped by the template ID when metadata export is enabled.
    pub fn set_metadata(&self, name: impl Into<String>, description: Option<&str>) {
        let meta = TemplateMetadata {
            name: name.into(),
            description: description.map(str::to_owned),
        };
        *self.metadata.write().unwrap_or_else(|e| e.into_inner()) = Some(meta);
    }

    pub fn metadata(&self) -> Option<TemplateMetadata> {
        self.metadata.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Stores an application context on the template. Returns false if a
    /// context was already set. The context is dropped with the template;
    /// a `Drop` impl on the stored type is the cleanup hook.
    pub fn set_context(&self, context: Box<dyn Any + Send + Sync>) -> bool {
        self.context.set(context).is_ok()
    }

    /// Borrows the stored context, if any, downcast to `T`.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.get().and_then(|c| c.downcast_ref())
    }
}

#[cfg(test)]
mod template_tests {
    use super::*;
    use crate::values::Semantic;

    fn model() -> Arc<InfoModel> {
        Arc::new(InfoModel::new())
    }

    #[test]
    fn derived_lengths_track_appends() {
        let mut tmpl = Template::new(model());
        tmpl.append_by_name("sourceIPv4Address", 0).unwrap();
        assert_eq!(tmpl.template_record_len(), 4 + 4);
        assert_eq!(tmpl.wire_min_len(), 4);
        assert_eq!(tmpl.mem_len(), 4);
        assert!(!tmpl.has_varlen());

        tmpl.append_by_name("applicationName", 0).unwrap();
        assert_eq!(tmpl.template_record_len(), 4 + 4 + 4);
        assert_eq!(tmpl.wire_min_len(), 4 + 1);
        assert_eq!(tmpl.mem_len(), 4 + VARFIELD_MEM_SIZE);
        assert!(tmpl.has_varlen());
    }

    #[test]
    fn enterprise_element_costs_eight_in_template_record() {
        let m = model();
        m.add(crate::InfoElement::new("vendorCounter", 4242, 1, DataType::Unsigned64));
        let mut tmpl = Template::new(m);
        tmpl.append_by_name("vendorCounter", 0).unwrap();
        assert_eq!(tmpl.template_record_len(), 4 + 8);
    }

    #[test]
    fn repeated_elements_get_repetition_indices() {
        let mut tmpl = Template::new(model());
        tmpl.append_by_name("octetDeltaCount", 0).unwrap();
        tmpl.append_by_name("packetDeltaCount", 0).unwrap();
        tmpl.append_by_name("octetDeltaCount", 0).unwrap();
        assert_eq!(tmpl.field(0).unwrap().midx, 0);
        assert_eq!(tmpl.field(1).unwrap().midx, 0);
        assert_eq!(tmpl.field(2).unwrap().midx, 1);
        let key = tmpl.field(0).unwrap().key();
        assert_eq!(tmpl.position_of(key, 1), Some(2));
    }

    #[test]
    fn spec_array_filtering_by_flags() {
        static SPECS: &[InfoElementSpec] = &[
            InfoElementSpec::new("sourceIPv4Address", 0, 0),
            InfoElementSpec::new("destinationIPv4Address", 0, 0),
            InfoElementSpec::new("octetDeltaCount", 0, 0x1),
            InfoElementSpec::new("packetDeltaCount", 0, 0x2),
        ];
        let mut tmpl = Template::new(model());
        tmpl.append_spec_array(SPECS, 0x1).unwrap();
        assert_eq!(tmpl.field_count(), 3);
        assert!(tmpl.contains_all_flagged_specs(SPECS, 0x1));
        assert!(!tmpl.contains_all_flagged_specs(SPECS, 0x3));
        let included = SPECS.iter().filter(|s| s.matches(0x1)).count();
        assert_eq!(usize::from(tmpl.field_count()), included);
    }

    #[test]
    fn reduced_length_override_accepted_for_integers() {
        let mut tmpl = Template::new(model());
        tmpl.append_by_name("octetTotalCount", 4).unwrap();
        assert_eq!(tmpl.field(0).unwrap().len, 4);
        assert_eq!(tmpl.wire_min_len(), 4);
    }

    #[test]
    fn illegal_override_fails_in_strict_mode() {
        let m = model();
        m.set_strict_lengths(true);
        let mut tmpl = Template::new(m.clone());
        assert!(matches!(
            tmpl.append_by_name("sourceIPv4Address", 2),
            Err(Error::InvalidLength { .. })
        ));
        m.set_strict_lengths(false);
        tmpl.append_by_name("sourceIPv4Address", 2).unwrap();
    }

    #[test]
    fn options_scope_zero_means_all_fields() {
        let mut tmpl = Template::new(model());
        tmpl.append_by_name("templateId", 0).unwrap();
        tmpl.append_by_name("observationDomainId", 0).unwrap();
        tmpl.set_options_scope(0).unwrap();
        assert!(tmpl.is_options());
        assert_eq!(tmpl.scope_count(), 2);
        assert!(tmpl.set_options_scope(1).is_err());
    }

    #[test]
    fn active_template_is_immutable() {
        let mut tmpl = Template::new(model());
        tmpl.append_by_name("octetDeltaCount", 0).unwrap();
        tmpl.activate();
        assert!(tmpl.append_by_name("packetDeltaCount", 0).is_err());
    }

    #[test]
    fn context_is_set_once() {
        let tmpl = Template::new(model());
        assert!(tmpl.set_context(Box::new(41u32)));
        assert!(!tmpl.set_context(Box::new(42u32)));
        assert_eq!(tmpl.context::<u32>(), Some(&41));
        assert_eq!(tmpl.context::<String>(), None);
    }

    #[test]
    fn metadata_round_trip() {
        let tmpl = Template::new(model());
        assert!(tmpl.metadata().is_none());
        tmpl.set_metadata("flows", Some("per-flow records"));
        let meta = tmpl.metadata().unwrap();
        assert_eq!(meta.name, "flows");
        assert_eq!(meta.description.as_deref(), Some("per-flow records"));
    }

    #[test]
    fn semantics_preserved_from_model() {
        let mut tmpl = Template::new(model());
        tmpl.append_by_name("octetDeltaCount", 0).unwrap();
        assert_eq!(
            tmpl.field(0).unwrap().element().semantic,
            Semantic::DeltaCounter
        );
    }
}
