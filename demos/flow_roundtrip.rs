//! Export a handful of flow records to an in-memory wire, read them back,
//! and print the decoded records as JSON.
//!
//! ```sh
//! cargo run --example flow_roundtrip
//! ```

use ipfix_codec::{
    CollectBuffer, ExportBuffer, InfoModel, Record, Session, TID_AUTO, Template, Value,
};

use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let model = Arc::new(InfoModel::new());
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("flowStartMilliseconds", 0)?;
    tmpl.append_by_name("flowEndMilliseconds", 0)?;
    tmpl.append_by_name("sourceIPv4Address", 0)?;
    tmpl.append_by_name("destinationIPv4Address", 0)?;
    tmpl.append_by_name("protocolIdentifier", 0)?;
    tmpl.append_by_name("octetDeltaCount", 0)?;
    let tmpl = Arc::new(tmpl);

    // exporter
    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone())?;
    let ext = export.add_external_template(0, tmpl.clone())?;
    export.set_internal_template(int)?;
    export.set_export_template(ext)?;

    for (i, octets) in [1500u64, 9300, 64].into_iter().enumerate() {
        let mut rec = Record::new(&tmpl);
        rec.set(
            "flowStartMilliseconds",
            Value::DateTimeMilliseconds(1_700_000_000_000 + i as u64),
        )?;
        rec.set(
            "flowEndMilliseconds",
            Value::DateTimeMilliseconds(1_700_000_005_000 + i as u64),
        )?;
        rec.set("sourceIPv4Address", Value::Ipv4Address([192, 168, 1, 10].into()))?;
        rec.set(
            "destinationIPv4Address",
            Value::Ipv4Address([10, 20, 30, 40 + i as u8].into()),
        )?;
        rec.set("protocolIdentifier", Value::Unsigned8(6))?;
        rec.set("octetDeltaCount", Value::Unsigned64(octets))?;
        export.append(&rec)?;
    }
    export.emit()?;
    drop(export);
    println!("exported {} octets of IPFIX", wire.len());

    // collector
    let mut session = Session::new(model.clone());
    let int = session.add_internal_template(TID_AUTO, {
        let mut t = Template::new(model);
        t.append_by_name("flowStartMilliseconds", 0)?;
        t.append_by_name("flowEndMilliseconds", 0)?;
        t.append_by_name("sourceIPv4Address", 0)?;
        t.append_by_name("destinationIPv4Address", 0)?;
        t.append_by_name("protocolIdentifier", 0)?;
        t.append_by_name("octetDeltaCount", 0)?;
        t
    })?;
    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int)?;

    loop {
        match collect.next() {
            Ok(rec) => println!("{}", serde_json::to_string(&rec)?),
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
