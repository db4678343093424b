//! In-memory records.
//!
//! A [`Record`] pairs an internal template with one [`Value`] slot per
//! template field. This replaces the C convention of overlaying a struct on
//! a byte buffer: the transcoder reads and writes slots by field position,
//! and repeated elements are addressed by their repetition index.

use crate::template::Template;
use crate::values::Value;
use crate::{Error, Result};

use serde::Serialize;

use std::sync::Arc;

/// A decoded or to-be-encoded record laid out by an internal template.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    #[serde(skip)]
    template: Arc<Template>,
    values: Vec<Value>,
}

impl Record {
    /// Creates a record with every slot holding its type's zero value.
    pub fn new(template: &Arc<Template>) -> Self {
        let values = template
            .fields()
            .iter()
            .map(|f| Value::default_for(f.element().data_type))
            .collect();
        Self {
            template: template.clone(),
            values,
        }
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// First slot holding the named element.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.template
            .position_of_name(name)
            .and_then(|i| self.values.get(i))
    }

    /// Slot holding the `midx`-th occurrence of the named element.
    pub fn get_indexed(&self, name: &str, midx: u16) -> Option<&Value> {
        let key = self
            .template
            .fields()
            .iter()
            .find(|f| f.element().name() == name)?
            .key();
        self.template
            .position_of(key, midx)
            .and_then(|i| self.values.get(i))
    }

    /// Sets the first slot holding the named element.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index = self
            .template
            .position_of_name(name)
            .ok_or_else(|| Error::NoSuchElement(name.to_owned()))?;
        self.set_at(index, value)
    }

    /// Sets the slot holding the `midx`-th occurrence of the named element.
    pub fn set_indexed(&mut self, name: &str, midx: u16, value: Value) -> Result<()> {
        let key = self
            .template
            .fields()
            .iter()
            .find(|f| f.element().name() == name)
            .ok_or_else(|| Error::NoSuchElement(name.to_owned()))?
            .key();
        let index = self
            .template
            .position_of(key, midx)
            .ok_or_else(|| Error::NoSuchElement(format!("{name}[{midx}]")))?;
        self.set_at(index, value)
    }

    /// Sets a slot by field position, checking the value's type against the
    /// template.
    pub fn set_at(&mut self, index: usize, value: Value) -> Result<()> {
        let field = self
            .template
            .field(index)
            .ok_or_else(|| Error::Setup(format!("field index {index} out of range")))?;
        let expected = field.element().data_type;
        if value.data_type() != expected {
            return Err(Error::Setup(format!(
                "value type {} does not match {} ({})",
                value.data_type().name(),
                field.element().name(),
                expected.name()
            )));
        }
        self.values[index] = value;
        Ok(())
    }

    /// Resets every slot to its zero value. Decoders do this before reuse
    /// so stale list contents never leak into shorter records.
    pub fn clear(&mut self) {
        for (slot, field) in self.values.iter_mut().zip(self.template.fields()) {
            *slot = Value::default_for(field.element().data_type);
        }
    }

    /// Slot store without a type check, for the transcoder which decodes by
    /// template type.
    pub(crate) fn put(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }
}

/// Records compare by their values, positionally. Two records decoded from
/// the same wire data against structurally equal templates are equal even
/// when the template objects differ.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;
    use crate::info_model::InfoModel;

    fn template() -> Arc<Template> {
        let model = Arc::new(InfoModel::new());
        let mut tmpl = Template::new(model);
        tmpl.append_by_name("sourceIPv4Address", 0).unwrap();
        tmpl.append_by_name("octetDeltaCount", 0).unwrap();
        tmpl.append_by_name("octetDeltaCount", 0).unwrap();
        Arc::new(tmpl)
    }

    #[test]
    fn zero_filled_on_creation() {
        let rec = Record::new(&template());
        assert_eq!(rec.get("octetDeltaCount"), Some(&Value::Unsigned64(0)));
    }

    #[test]
    fn set_and_get_by_name_and_occurrence() {
        let mut rec = Record::new(&template());
        rec.set("octetDeltaCount", Value::Unsigned64(1)).unwrap();
        rec.set_indexed("octetDeltaCount", 1, Value::Unsigned64(2)).unwrap();
        assert_eq!(rec.get("octetDeltaCount"), Some(&Value::Unsigned64(1)));
        assert_eq!(
            rec.get_indexed("octetDeltaCount", 1),
            Some(&Value::Unsigned64(2))
        );
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut rec = Record::new(&template());
        assert!(rec.set("octetDeltaCount", Value::Unsigned32(1)).is_err());
        assert!(rec.set("noSuchThing", Value::Unsigned64(1)).is_err());
    }

    #[test]
    fn clear_resets_slots() {
        let mut rec = Record::new(&template());
        rec.set("octetDeltaCount", Value::Unsigned64(9)).unwrap();
        rec.clear();
        assert_eq!(rec.get("octetDeltaCount"), Some(&Value::Unsigned64(0)));
    }
}
