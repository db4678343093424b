//! The information model: the registry of known information elements.
//!
//! A model maps `(enterprise, id)` pairs to [`InfoElement`] definitions and
//! indexes them by name. One model is typically created per process and
//! shared by every [`Session`](crate::Session) via `Arc`; its storage is
//! append-only (re-adding a key updates the stored definition in place).
//!
//! Models come preloaded with the IANA-standard elements. Additional
//! elements can be added one at a time, in bulk, or from an IANA-format XML
//! registry (see [`InfoModel::read_xml_data`]).

use crate::iana;
use crate::values::{DataType, Semantic, Unit, VARLEN};
use crate::{Error, REVERSE_ID_BIT, REVERSE_PEN, Result};

use serde::Serialize;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Name given to elements synthesized for unknown `(enterprise, id)` pairs
/// referenced by incoming templates.
pub const ALIEN_ELEMENT_NAME: &str = "_alienInformationElement";

/// Identity of an information element within a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementKey {
    /// Private enterprise number; 0 for IANA-standard elements.
    pub ent: u32,
    /// Element ID. The on-wire enterprise bit (0x8000) is never stored.
    pub num: u16,
}

impl ElementKey {
    pub fn new(ent: u32, num: u16) -> Self {
        Self { ent, num }
    }
}

/// One information element definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoElement {
    name: Arc<str>,
    description: Option<Arc<str>>,
    /// Private enterprise number; 0 for IANA-standard elements.
    pub ent: u32,
    /// Element ID (15 bits on the wire; the top bit flags an enterprise
    /// element there and is not stored here).
    pub num: u16,
    /// Default field length in octets, or [`VARLEN`].
    pub len: u16,
    pub data_type: DataType,
    pub semantic: Semantic,
    pub unit: Unit,
    pub range_min: u64,
    pub range_max: u64,
    /// Multi-octet content is big-endian on the wire.
    pub endian: bool,
    /// A reverse counterpart exists per RFC 5103.
    pub reversible: bool,
    /// Synthesized for an unknown key found in an incoming template.
    pub alien: bool,
}

impl InfoElement {
    /// Creates an element with the type's default length, inferred
    /// endianness, and no reverse counterpart.
    pub fn new(name: impl Into<Arc<str>>, ent: u32, num: u16, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            description: None,
            ent,
            num,
            len: data_type.default_len(),
            data_type,
            semantic: Semantic::Default,
            unit: Unit::None,
            range_min: 0,
            range_max: 0,
            endian: data_type.endian_sensitive(),
            reversible: false,
            alien: false,
        }
    }

    pub fn with_len(mut self, len: u16) -> Self {
        self.len = len;
        self
    }

    pub fn with_semantic(mut self, semantic: Semantic) -> Self {
        self.semantic = semantic;
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_range(mut self, min: u64, max: u64) -> Self {
        self.range_min = min;
        self.range_max = max;
        self
    }

    pub fn with_description(mut self, description: impl Into<Arc<str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn key(&self) -> ElementKey {
        ElementKey::new(self.ent, self.num)
    }

    pub fn is_varlen(&self) -> bool {
        self.len == VARLEN
    }

    pub(crate) fn interned_name(&self) -> Arc<str> {
        self.name.clone()
    }
}

/// A named element reference used to build templates, with an optional
/// length override and application-defined inclusion flags.
///
/// The flags follow the all-bits-set contract: a spec is included by an
/// append or containment check called with flags `f` iff `spec.flags == 0`
/// or `spec.flags & f == spec.flags`. What the bits mean is up to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InfoElementSpec {
    pub name: &'static str,
    /// 0 means the element's default length; [`VARLEN`] is accepted for
    /// variable-length-capable types.
    pub len_override: u16,
    pub flags: u32,
}

impl InfoElementSpec {
    pub const fn new(name: &'static str, len_override: u16, flags: u32) -> Self {
        Self { name, len_override, flags }
    }

    /// The all-bits-set inclusion test.
    pub fn matches(&self, flags: u32) -> bool {
        self.flags == 0 || (self.flags & flags) == self.flags
    }
}

#[derive(Default)]
struct Inner {
    by_key: HashMap<ElementKey, Arc<InfoElement>>,
    by_name: HashMap<Arc<str>, Arc<InfoElement>>,
}

/// Registry of known information elements, shared by sessions and
/// templates.
///
/// Interior locking keeps lookups `&self` so a model can sit behind an
/// `Arc` shared by many sessions; the lock scope is a single map operation.
pub struct InfoModel {
    inner: RwLock<Inner>,
    strict_lengths: AtomicBool,
}

impl Default for InfoModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InfoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoModel")
            .field("elements", &self.len())
            .finish()
    }
}

impl InfoModel {
    /// Creates a model preloaded with the IANA-standard elements.
    pub fn new() -> Self {
        let model = Self {
            inner: RwLock::new(Inner::default()),
            strict_lengths: AtomicBool::new(false),
        };
        iana::preload(&model);
        model
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Adds an element, replacing any existing definition with the same
    /// `(enterprise, id)`. The by-name index is rewritten only if the name
    /// changed. A reversible element also inserts its RFC 5103 reverse
    /// counterpart by the same rules.
    pub fn add(&self, element: InfoElement) {
        let reverse = element.reversible.then(|| Self::reversify(&element));
        {
            let mut inner = self.write();
            Self::insert_one(&mut inner, element);
            if let Some(rev) = reverse {
                Self::insert_one(&mut inner, rev);
            }
        }
    }

    /// Adds several elements at once.
    pub fn add_all(&self, elements: impl IntoIterator<Item = InfoElement>) {
        for element in elements {
            self.add(element);
        }
    }

    fn insert_one(inner: &mut Inner, element: InfoElement) {
        let element = Arc::new(element);
        let key = element.key();
        if let Some(old) = inner.by_key.insert(key, element.clone()) {
            // Keep the name index consistent when a re-add renames the key.
            if old.name != element.name
                && inner
                    .by_name
                    .get(&old.name)
                    .is_some_and(|cur| cur.key() == key)
            {
                inner.by_name.remove(&old.name);
            }
        }
        inner.by_name.insert(element.interned_name(), element);
    }

    /// The reverse counterpart of a reversible element: enterprise 29305
    /// for an IANA element, otherwise bit 0x4000 set in the element ID, and
    /// the name prefixed with "reverse" (original first letter
    /// capitalized).
    fn reversify(element: &InfoElement) -> InfoElement {
        let mut rev = element.clone();
        if element.ent == 0 {
            rev.ent = REVERSE_PEN;
        } else {
            rev.num |= REVERSE_ID_BIT;
        }
        let mut name = String::with_capacity(element.name.len() + 7);
        name.push_str("reverse");
        let mut chars = element.name.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        rev.name = name.into();
        rev
    }

    /// Looks up an element by `(enterprise, id)`.
    pub fn get(&self, ent: u32, num: u16) -> Option<Arc<InfoElement>> {
        self.read().by_key.get(&ElementKey::new(ent, num)).cloned()
    }

    /// Looks up an element by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<InfoElement>> {
        self.read().by_name.get(name).cloned()
    }

    /// Like [`InfoModel::get_by_name`] but failing with
    /// [`Error::NoSuchElement`].
    pub fn require_by_name(&self, name: &str) -> Result<Arc<InfoElement>> {
        self.get_by_name(name)
            .ok_or_else(|| Error::NoSuchElement(name.to_owned()))
    }

    /// Number of elements in the model (reverse counterparts included).
    pub fn len(&self) -> usize {
        self.read().by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_key.is_empty()
    }

    /// Snapshot of all elements, in unspecified order.
    pub fn elements(&self) -> Vec<Arc<InfoElement>> {
        self.read().by_key.values().cloned().collect()
    }

    /// Resolves a key from an incoming template, synthesizing an alien
    /// element if the model does not know it so decoding can proceed.
    pub(crate) fn get_or_alien(&self, ent: u32, num: u16, len: u16) -> Arc<InfoElement> {
        if let Some(found) = self.get(ent, num) {
            return found;
        }
        log::debug!("synthesizing alien element {ent}/{num} (len {len})");
        let mut alien = InfoElement::new(ALIEN_ELEMENT_NAME, ent, num, DataType::OctetArray)
            .with_len(len);
        alien.alien = true;
        alien.endian = false;
        {
            let mut inner = self.write();
            Self::insert_one(&mut inner, alien);
        }
        // Present after the insert above.
        self.get(ent, num).unwrap_or_else(|| {
            Arc::new({
                let mut ie = InfoElement::new(ALIEN_ELEMENT_NAME, ent, num, DataType::OctetArray);
                ie.alien = true;
                ie
            })
        })
    }

    /// When true, template field lengths incompatible with their element's
    /// type fail with [`Error::InvalidLength`] instead of being accepted
    /// with a logged warning. Off by default.
    pub fn set_strict_lengths(&self, strict: bool) {
        self.strict_lengths.store(strict, Ordering::Relaxed);
    }

    pub(crate) fn strict_lengths(&self) -> bool {
        self.strict_lengths.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn preloaded_standard_elements() {
        let model = InfoModel::new();
        let octets = model.get_by_name("octetDeltaCount").unwrap();
        assert_eq!(octets.num, 1);
        assert_eq!(octets.data_type, DataType::Unsigned64);
        assert_eq!(octets.unit, Unit::Octets);
        assert!(model.get(0, 152).is_some()); // flowStartMilliseconds
        assert!(model.get(0, 291).is_some()); // basicList
    }

    #[test]
    fn reversible_iana_element_gets_pen_29305_sibling() {
        let model = InfoModel::new();
        let rev = model.get(REVERSE_PEN, 1).unwrap();
        assert_eq!(rev.name(), "reverseOctetDeltaCount");
        assert_eq!(model.get_by_name("reverseOctetDeltaCount").unwrap().key(), rev.key());
    }

    #[test]
    fn reversible_enterprise_element_sets_bit_0x4000() {
        let model = InfoModel::new();
        model.add(
            InfoElement::new("vendorThing", 9999, 42, DataType::Unsigned32).reversible(true),
        );
        let rev = model.get(9999, 42 | REVERSE_ID_BIT).unwrap();
        assert_eq!(rev.name(), "reverseVendorThing");
        assert_eq!(rev.ent, 9999);
    }

    #[test]
    fn re_add_updates_in_place_and_rewrites_name_index() {
        let model = InfoModel::new();
        model.add(InfoElement::new("firstName", 7777, 1, DataType::Unsigned32));
        model.add(InfoElement::new("secondName", 7777, 1, DataType::Unsigned64));

        let found = model.get(7777, 1).unwrap();
        assert_eq!(found.name(), "secondName");
        assert_eq!(found.data_type, DataType::Unsigned64);
        assert!(model.get_by_name("firstName").is_none());
        assert!(model.get_by_name("secondName").is_some());
    }

    #[test]
    fn alien_synthesis() {
        let model = InfoModel::new();
        let alien = model.get_or_alien(4321, 77, 6);
        assert!(alien.alien);
        assert_eq!(alien.name(), ALIEN_ELEMENT_NAME);
        assert_eq!(alien.len, 6);
        // inserted for later lookups
        assert!(model.get(4321, 77).is_some());
    }

    #[test]
    fn spec_flag_filter_contract() {
        let spec = InfoElementSpec::new("octetDeltaCount", 0, 0b0110);
        assert!(spec.matches(0b0110));
        assert!(spec.matches(0b1111));
        assert!(!spec.matches(0b0010));
        let unflagged = InfoElementSpec::new("octetDeltaCount", 0, 0);
        assert!(unflagged.matches(0));
    }
}
