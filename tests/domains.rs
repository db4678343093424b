//! Observation domains partition external templates and sequence numbers,
//! both on the wire and in the session tables.

use ipfix_codec::{
    CollectBuffer, ExportBuffer, InfoModel, Record, Session, TID_AUTO, Template, Value,
};

use std::sync::Arc;

fn model() -> Arc<InfoModel> {
    Arc::new(InfoModel::new())
}

fn schema(model: &Arc<InfoModel>) -> Arc<Template> {
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("octetDeltaCount", 0).unwrap();
    Arc::new(tmpl)
}

fn record(tmpl: &Arc<Template>, octets: u64) -> Record {
    let mut rec = Record::new(tmpl);
    rec.set("octetDeltaCount", Value::Unsigned64(octets)).unwrap();
    rec
}

#[test]
fn domains_scope_templates_and_sequences_across_the_wire() {
    let model = model();
    let tmpl = schema(&model);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
    export.set_internal_template(int).unwrap();

    // domain 0: two records
    export.add_external_template(300, tmpl.clone()).unwrap();
    export.set_export_template(300).unwrap();
    export.append(&record(&tmpl, 1)).unwrap();
    export.append(&record(&tmpl, 2)).unwrap();
    export.emit().unwrap();

    // domain 5 has its own template table; 300 must be registered again
    export.set_domain(5);
    export.add_external_template(300, tmpl.clone()).unwrap();
    export.set_export_template(300).unwrap();
    export.append(&record(&tmpl, 3)).unwrap();
    export.emit().unwrap();

    // back to domain 0: template still registered, sequence continues at 2
    export.set_domain(0);
    export.set_export_template(300).unwrap();
    export.append(&record(&tmpl, 4)).unwrap();
    export.emit().unwrap();
    drop(export);

    // wire-level domains and sequences
    let mut offsets = Vec::new();
    let mut at = 0;
    while at < wire.len() {
        offsets.push(at);
        at += u16::from_be_bytes([wire[at + 2], wire[at + 3]]) as usize;
    }
    let headers: Vec<(u32, u32)> = offsets
        .iter()
        .map(|&o| {
            (
                u32::from_be_bytes([wire[o + 8], wire[o + 9], wire[o + 10], wire[o + 11]]),
                u32::from_be_bytes([wire[o + 12], wire[o + 13], wire[o + 14], wire[o + 15]]),
            )
        })
        .collect();
    assert_eq!(headers, vec![(0, 0), (0, 5), (2, 0)]);

    // a collector rebuilds the same partitioning
    let mut session = Session::new(model.clone());
    let int = session.add_internal_template(TID_AUTO, schema(&model)).unwrap();
    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();

    let mut seen = Vec::new();
    while let Ok(rec) = collect.next() {
        let Some(Value::Unsigned64(v)) = rec.get("octetDeltaCount") else {
            panic!("missing counter");
        };
        seen.push((collect.message_info().unwrap().domain, *v));
    }
    assert_eq!(seen, vec![(0, 1), (0, 2), (5, 3), (0, 4)]);

    let session = collect.session_mut();
    session.set_domain(0);
    assert!(session.has_template(false, 300));
    assert_eq!(session.sequence(), 3);
    session.set_domain(5);
    assert!(session.has_template(false, 300));
    assert_eq!(session.sequence(), 1);
}

#[test]
fn forked_sessions_collect_independent_peers() {
    let model = model();
    let tmpl = schema(&model);

    // two exporters that both use template 300 with different schemas'
    // worth of data
    let make_wire = |octets: u64| {
        let mut wire = Vec::new();
        let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
        let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
        export.add_external_template(300, tmpl.clone()).unwrap();
        export.set_internal_template(int).unwrap();
        export.set_export_template(300).unwrap();
        export.append(&record(&tmpl, octets)).unwrap();
        export.emit().unwrap();
        drop(export);
        wire
    };

    // base session as a UDP collector would configure it once
    let mut base = Session::new(model.clone());
    let int = base.add_internal_template(TID_AUTO, schema(&model)).unwrap();
    base.on_new_template(|event| {
        event.template.set_context(Box::new(event.tid));
    });

    for octets in [10u64, 20] {
        // one fork per (peer, domain)
        let mut collect = CollectBuffer::from_bytes(base.fork(), make_wire(octets));
        collect.set_internal_template(int).unwrap();
        let rec = collect.next().unwrap();
        assert_eq!(rec.get("octetDeltaCount"), Some(&Value::Unsigned64(octets)));
        // the callback ran on this fork and attached its context
        let learned = collect.session().get_template(false, 300).unwrap();
        assert_eq!(learned.context::<u16>(), Some(&300));
    }
    // the base session never saw the external templates
    assert!(!base.has_template(false, 300));
}
