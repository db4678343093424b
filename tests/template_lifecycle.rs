//! Template registration, revocation, and withdrawal across a live stream.

use ipfix_codec::{
    CollectBuffer, Error, ExportBuffer, InfoModel, Record, Session, TID_AUTO, Template, Value,
};

use std::sync::Arc;

fn model() -> Arc<InfoModel> {
    Arc::new(InfoModel::new())
}

fn schema(model: &Arc<InfoModel>) -> Arc<Template> {
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("sourceIPv4Address", 0).unwrap();
    tmpl.append_by_name("octetDeltaCount", 0).unwrap();
    Arc::new(tmpl)
}

fn record(tmpl: &Arc<Template>, octets: u64) -> Record {
    let mut rec = Record::new(tmpl);
    rec.set("sourceIPv4Address", Value::Ipv4Address([10, 0, 0, 9].into()))
        .unwrap();
    rec.set("octetDeltaCount", Value::Unsigned64(octets)).unwrap();
    rec
}

#[test]
fn revocation_mid_stream() {
    let model = model();
    let tmpl = schema(&model);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
    export.add_external_template(300, tmpl.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(300).unwrap();
    export.append(&record(&tmpl, 1)).unwrap();
    export.emit().unwrap();

    // revoke 300: a withdrawal goes out, appends against it now fail
    export.remove_template(false, 300).unwrap();
    match export.append(&record(&tmpl, 2)) {
        Err(Error::MissingTemplate { tid, internal }) => {
            assert_eq!(tid, 300);
            assert!(!internal);
        }
        other => panic!("unexpected: {other:?}"),
    }

    // same schema under a fresh ID keeps the stream going
    export.add_external_template(301, tmpl.clone()).unwrap();
    export.set_export_template(301).unwrap();
    export.append(&record(&tmpl, 2)).unwrap();
    export.emit().unwrap();
    drop(export);

    let mut session = Session::new(model);
    let int = session.add_internal_template(TID_AUTO, schema(session.model())).unwrap();
    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();

    let first = collect.next().unwrap();
    assert_eq!(first.get("octetDeltaCount"), Some(&Value::Unsigned64(1)));
    assert!(collect.session().has_template(false, 300));

    let second = collect.next().unwrap();
    assert_eq!(second.get("octetDeltaCount"), Some(&Value::Unsigned64(2)));
    // the second message withdrew 300 and introduced 301
    assert!(!collect.session().has_template(false, 300));
    assert!(collect.session().has_template(false, 301));

    assert!(collect.next().unwrap_err().is_end_of_stream());
}

#[test]
fn replacing_a_template_id_withdraws_first() {
    let model = model();
    let tmpl = schema(&model);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    export.add_external_template(320, tmpl.clone()).unwrap();

    let mut other = Template::new(model.clone());
    other.append_by_name("destinationIPv4Address", 0).unwrap();
    export.add_external_template(320, other).unwrap();
    export.emit().unwrap();
    drop(export);

    // one template set holding: template 320, withdrawal (count 0), template 320
    let set_len = u16::from_be_bytes([wire[18], wire[19]]) as usize;
    let body = &wire[20..16 + set_len];
    assert_eq!(&body[0..2], &320u16.to_be_bytes());
    assert_eq!(&body[2..4], &2u16.to_be_bytes());
    let withdrawal = &body[12..16];
    assert_eq!(withdrawal, &[1, 64, 0, 0]); // 320, count 0
}

#[test]
fn unknown_data_set_is_skipped() {
    let model = model();
    let tmpl = schema(&model);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
    export.add_external_template(300, tmpl.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(300).unwrap();
    export.append(&record(&tmpl, 7)).unwrap();
    export.emit().unwrap();
    drop(export);

    // strip the template set so the collector has no schema for set 300
    let set_len = u16::from_be_bytes([wire[18], wire[19]]) as usize;
    let mut stripped: Vec<u8> = Vec::new();
    stripped.extend_from_slice(&wire[..16]);
    stripped.extend_from_slice(&wire[16 + set_len..]);
    let new_len = (stripped.len() as u16).to_be_bytes();
    stripped[2..4].copy_from_slice(&new_len);

    let mut session = Session::new(model);
    let int = session.add_internal_template(TID_AUTO, schema(session.model())).unwrap();
    let mut collect = CollectBuffer::from_bytes(session, stripped);
    collect.set_internal_template(int).unwrap();
    assert!(collect.next().unwrap_err().is_end_of_stream());
}

#[test]
fn export_templates_replays_the_current_domain() {
    let model = model();
    let tmpl = schema(&model);

    // templates registered off-wire, as after a reconnect
    let mut session = Session::new(model.clone());
    session.add_external_template(300, tmpl.clone()).unwrap();
    session.add_external_template(301, tmpl.clone()).unwrap();

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(session, &mut wire);
    export.export_templates().unwrap();
    export.emit().unwrap();
    drop(export);

    let mut collect = CollectBuffer::from_bytes(Session::new(model), wire);
    // drive template processing; no data records follow
    assert!(collect.next().unwrap_err().is_end_of_stream());
    assert_eq!(collect.session().external_template_ids(), vec![300, 301]);
}

#[test]
fn sequence_gap_is_tolerated() {
    let model = model();
    let tmpl = schema(&model);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
    export.add_external_template(300, tmpl.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(300).unwrap();
    export.append(&record(&tmpl, 1)).unwrap();
    export.emit().unwrap();
    drop(export);

    // forge a surprising sequence number; the record still decodes
    wire[8..12].copy_from_slice(&90u32.to_be_bytes());

    let mut session = Session::new(model);
    let int = session.add_internal_template(TID_AUTO, schema(session.model())).unwrap();
    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();
    let rec = collect.next().unwrap();
    assert_eq!(rec.get("octetDeltaCount"), Some(&Value::Unsigned64(1)));
    // expectation resynced to the message's value plus its records
    assert_eq!(collect.session().sequence(), 91);
}
