//! Load enterprise elements from registry XML, export their definitions
//! per RFC 5610, and watch a collector learn them automatically.
//!
//! ```sh
//! cargo run --example element_registry
//! ```

use ipfix_codec::{CollectBuffer, ExportBuffer, InfoModel, Session, TID_AUTO};

use std::sync::Arc;

const REGISTRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry id="ipfix">
  <registry id="ipfix-information-elements">
    <record>
      <name>meterReading</name>
      <dataType>unsigned64</dataType>
      <dataTypeSemantics>totalCounter</dataTypeSemantics>
      <units>octets</units>
      <elementId>15</elementId>
      <enterpriseId>32473</enterpriseId>
    </record>
    <record>
      <name>meterLocation</name>
      <dataType>string</dataType>
      <elementId>16</elementId>
      <enterpriseId>32473</enterpriseId>
    </record>
  </registry>
</registry>
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let export_model = Arc::new(InfoModel::new());
    let added = export_model.read_xml_data(REGISTRY)?;
    println!("loaded {added} elements from the registry");

    let mut session = Session::new(export_model);
    session.enable_type_metadata(TID_AUTO)?;

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(session, &mut wire);
    export.export_templates()?;
    export.emit()?;
    drop(export);

    let collect_model = Arc::new(InfoModel::new());
    let mut collect = CollectBuffer::from_bytes(Session::new(collect_model.clone()), wire);
    collect.set_auto_insert(true);
    while collect.next().is_ok() {}

    for (ent, num) in [(32473u32, 15u16), (32473, 16)] {
        match collect_model.get(ent, num) {
            Some(e) => println!(
                "collector learned {}/{num}: {} ({})",
                ent,
                e.name(),
                e.data_type.name()
            ),
            None => println!("collector is missing {ent}/{num}"),
        }
    }
    Ok(())
}
