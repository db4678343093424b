//! Loads information elements from an IANA-format XML registry.
//!
//! The document layout follows the IANA "ipfix.xml" registry: an outer
//! `<registry>` containing sub-registries for the elements themselves and
//! for the three value registries (data types, semantics, units) that
//! translate textual fields into codes. Two extension fields are
//! recognized on element records: `enterpriseId` and `reversible`.
//!
//! Records without an `enterpriseId` are ignored — the IANA-standard
//! elements are already preloaded into every model.

use crate::info_model::{InfoElement, InfoModel};
use crate::values::{DataType, Semantic, Unit};
use crate::{Error, Result};

use quick_xml::Reader;
use quick_xml::events::Event;

use std::collections::HashMap;
use std::path::Path;

const ELEMENTS_REGISTRY: &str = "ipfix-information-elements";
const DATA_TYPES_REGISTRY: &str = "ipfix-information-element-data-types";
const SEMANTICS_REGISTRY: &str = "ipfix-information-element-semantics";
const UNITS_REGISTRY: &str = "ipfix-information-element-units";

/// Element IDs whose records default to non-reversible.
const NON_REVERSIBLE_IDS: &[u16] = &[137, 145, 148, 149, 210, 239];

/// Group names whose records default to non-reversible.
const NON_REVERSIBLE_GROUPS: &[&str] = &["config", "processCounter", "netflow v9"];

#[derive(Debug)]
struct RawRecord {
    registry: String,
    fields: HashMap<String, String>,
}

impl RawRecord {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str).filter(|s| !s.is_empty())
    }
}

impl InfoModel {
    /// Loads element definitions from an IANA-format XML registry file.
    /// Returns the number of elements added.
    pub fn read_xml_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let data = std::fs::read_to_string(path)?;
        self.read_xml_data(&data)
    }

    /// Loads element definitions from in-memory registry XML. Returns the
    /// number of elements added.
    pub fn read_xml_data(&self, xml: &str) -> Result<usize> {
        let records = scan_records(xml)?;

        let data_types = value_registry(&records, DATA_TYPES_REGISTRY);
        let semantics = value_registry(&records, SEMANTICS_REGISTRY);
        let units = value_registry(&records, UNITS_REGISTRY);

        let mut added = 0;
        for record in records.iter().filter(|r| r.registry == ELEMENTS_REGISTRY) {
            if let Some(element) = element_from_raw(record, &data_types, &semantics, &units) {
                self.add(element);
                added += 1;
            }
        }
        Ok(added)
    }
}

/// One pass over the document, collecting every `<record>` together with
/// the id of the registry it sits in.
fn scan_records(xml: &str) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut registry_stack: Vec<String> = Vec::new();
    let mut current: Option<RawRecord> = None;
    // element names open inside the current record
    let mut field_stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if name == "registry" {
                    let mut id = String::new();
                    for attr in start.attributes().flatten() {
                        if attr.key.as_ref() == b"id" {
                            id = String::from_utf8_lossy(&attr.value).into_owned();
                        }
                    }
                    registry_stack.push(id);
                } else if name == "record" && current.is_none() {
                    current = Some(RawRecord {
                        registry: registry_stack.last().cloned().unwrap_or_default(),
                        fields: HashMap::new(),
                    });
                    field_stack.clear();
                } else if current.is_some() {
                    field_stack.push(name);
                }
            }
            Ok(Event::Empty(empty)) => {
                // a self-closing field carries no text; record its presence
                if let Some(record) = &mut current {
                    let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                    record.fields.entry(name).or_default();
                }
            }
            Ok(Event::End(end)) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if name == "registry" {
                    registry_stack.pop();
                } else if name == "record" {
                    if let Some(record) = current.take() {
                        records.push(record);
                    }
                } else if current.is_some() && !field_stack.is_empty() {
                    field_stack.pop();
                }
            }
            Ok(Event::Text(text)) => {
                if let (Some(record), Some(field)) = (&mut current, field_stack.first()) {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::Setup(format!("registry xml: {e}")))?;
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let entry = record.fields.entry(field.clone()).or_default();
                        if !entry.is_empty() {
                            entry.push(' ');
                        }
                        entry.push_str(trimmed);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(Error::Setup(format!("registry xml: {e}"))),
        }
    }
    Ok(records)
}

/// name -> numeric code map from one of the value registries.
fn value_registry(records: &[RawRecord], registry: &str) -> HashMap<String, u16> {
    let mut map = HashMap::new();
    for record in records.iter().filter(|r| r.registry == registry) {
        let (Some(name), Some(value)) = (record.get("name"), record.get("value")) else {
            continue;
        };
        if let Ok(code) = value.parse::<u16>() {
            map.insert(name.to_owned(), code);
        }
    }
    map
}

fn element_from_raw(
    record: &RawRecord,
    data_types: &HashMap<String, u16>,
    semantics: &HashMap<String, u16>,
    units: &HashMap<String, u16>,
) -> Option<InfoElement> {
    // standard elements are preloaded; only extension records matter
    let ent: u32 = record.get("enterpriseId")?.parse().ok()?;
    let name = record.get("name")?;
    let num: u16 = record.get("elementId")?.parse().ok()?;

    let data_type = record
        .get("dataType")
        .and_then(|text| {
            data_types
                .get(text)
                .and_then(|&code| DataType::from_code(code as u8))
                .or_else(|| DataType::from_name(text))
        })
        .unwrap_or(DataType::OctetArray);

    let semantic = record
        .get("dataTypeSemantics")
        .and_then(|text| {
            semantics
                .get(text)
                .and_then(|&code| Semantic::from_code(code as u8))
                .or_else(|| Semantic::from_name(text))
        })
        .unwrap_or(default_semantic(data_type));

    let unit = record
        .get("units")
        .and_then(|text| {
            units
                .get(text)
                .and_then(|&code| Unit::from_code(code))
                .or_else(|| Unit::from_name(text))
        })
        .unwrap_or(Unit::None);

    let reversible = record
        .get("reversible")
        .map(|text| matches!(text, "true" | "yes" | "1"))
        .unwrap_or_else(|| default_reversible(num, record.get("group")));

    let mut element = InfoElement::new(name, ent, num, data_type)
        .with_semantic(semantic)
        .with_unit(unit)
        .reversible(reversible);

    if let Some((min, max)) = record.get("range").and_then(parse_range) {
        element = element.with_range(min, max);
    }
    if let Some(description) = record.get("description") {
        element = element.with_description(description);
    }
    Some(element)
}

fn default_semantic(data_type: DataType) -> Semantic {
    if data_type.is_list() {
        Semantic::List
    } else if data_type.is_integer()
        || matches!(data_type, DataType::Float32 | DataType::Float64)
    {
        Semantic::Quantity
    } else {
        Semantic::Default
    }
}

fn default_reversible(num: u16, group: Option<&str>) -> bool {
    if NON_REVERSIBLE_IDS.contains(&num) {
        return false;
    }
    if group.is_some_and(|g| NON_REVERSIBLE_GROUPS.contains(&g)) {
        return false;
    }
    true
}

fn parse_range(text: &str) -> Option<(u64, u64)> {
    let (min, max) = text.split_once('-')?;
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

#[cfg(test)]
mod xml_tests {
    use super::*;
    use crate::REVERSE_ID_BIT;

    const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry xmlns="http://www.iana.org/assignments" id="ipfix">
  <registry id="ipfix-information-elements">
    <record>
      <name>standardOnlyThing</name>
      <dataType>unsigned32</dataType>
      <elementId>401</elementId>
    </record>
    <record>
      <name>meterReading</name>
      <dataType>unsigned64</dataType>
      <dataTypeSemantics>totalCounter</dataTypeSemantics>
      <units>octets</units>
      <elementId>15</elementId>
      <enterpriseId>32473</enterpriseId>
      <range>0-1000000</range>
      <description>
        <paragraph>Total meter reading.</paragraph>
      </description>
    </record>
    <record>
      <name>meterConfigFlag</name>
      <dataType>boolean</dataType>
      <group>config</group>
      <elementId>16</elementId>
      <enterpriseId>32473</enterpriseId>
    </record>
    <record>
      <name>meterString</name>
      <dataType>string</dataType>
      <elementId>17</elementId>
      <enterpriseId>32473</enterpriseId>
      <reversible>false</reversible>
    </record>
  </registry>
  <registry id="ipfix-information-element-data-types">
    <record><name>unsigned64</name><value>4</value></record>
    <record><name>boolean</name><value>11</value></record>
    <record><name>string</name><value>13</value></record>
  </registry>
  <registry id="ipfix-information-element-semantics">
    <record><name>totalCounter</name><value>2</value></record>
  </registry>
  <registry id="ipfix-information-element-units">
    <record><name>octets</name><value>2</value></record>
  </registry>
</registry>
"#;

    #[test]
    fn loads_enterprise_records_only() {
        let model = InfoModel::new();
        let before = model.len();
        let added = model.read_xml_data(REGISTRY).unwrap();
        assert_eq!(added, 3);
        // no (0, 401) from the record without an enterpriseId
        assert!(model.get(0, 401).is_none());
        // reversible default generated a sibling for meterReading
        assert!(model.len() > before + 3);
    }

    #[test]
    fn element_fields_translate_through_value_registries() {
        let model = InfoModel::new();
        model.read_xml_data(REGISTRY).unwrap();
        let meter = model.get(32473, 15).unwrap();
        assert_eq!(meter.name(), "meterReading");
        assert_eq!(meter.data_type, DataType::Unsigned64);
        assert_eq!(meter.semantic, Semantic::TotalCounter);
        assert_eq!(meter.unit, Unit::Octets);
        assert_eq!(meter.len, 8);
        assert_eq!((meter.range_min, meter.range_max), (0, 1_000_000));
        assert!(meter.description().unwrap().contains("meter reading"));
    }

    #[test]
    fn reversibility_defaults_and_denylist() {
        let model = InfoModel::new();
        model.read_xml_data(REGISTRY).unwrap();
        // default: reversible, so the 0x4000 sibling exists
        assert!(model.get(32473, 15 | REVERSE_ID_BIT).is_some());
        // group "config" suppresses the default
        assert!(model.get(32473, 16 | REVERSE_ID_BIT).is_none());
        // explicit reversible=false
        assert!(model.get(32473, 17 | REVERSE_ID_BIT).is_none());
    }

    #[test]
    fn semantic_defaults_by_type() {
        assert_eq!(default_semantic(DataType::Unsigned8), Semantic::Quantity);
        assert_eq!(default_semantic(DataType::BasicList), Semantic::List);
        assert_eq!(default_semantic(DataType::String), Semantic::Default);
    }
}
