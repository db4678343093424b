//! Structured data lists over the wire: basic lists, sub-template lists
//! with the session pair map, and multi-lists.

use ipfix_codec::{
    BasicList, CollectBuffer, ExportBuffer, InfoModel, ListSemantic, MultiListEntry, Record,
    Session, SubTemplateList, SubTemplateMultiList, TID_AUTO, Template, Value,
};

use std::sync::Arc;

fn model() -> Arc<InfoModel> {
    Arc::new(InfoModel::new())
}

fn interface_pair(model: &Arc<InfoModel>) -> Arc<Template> {
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("ingressInterface", 0).unwrap();
    tmpl.append_by_name("egressInterface", 0).unwrap();
    Arc::new(tmpl)
}

fn outer_with_list(model: &Arc<InfoModel>) -> Arc<Template> {
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("sourceIPv4Address", 0).unwrap();
    tmpl.append_by_name("subTemplateList", 0).unwrap();
    Arc::new(tmpl)
}

fn entry_record(tmpl: &Arc<Template>, a: u32, b: u32) -> Record {
    let mut rec = Record::new(tmpl);
    rec.set("ingressInterface", Value::Unsigned32(a)).unwrap();
    rec.set("egressInterface", Value::Unsigned32(b)).unwrap();
    rec
}

/// Exports one outer record holding a 3-entry sub-template list, twice
/// (two messages), so the collector can change its pair map in between.
fn export_nested(model: &Arc<InfoModel>) -> (Vec<u8>, Record) {
    let outer = outer_with_list(model);
    let inner = interface_pair(model);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, outer.clone()).unwrap();
    export.add_external_template(310, outer.clone()).unwrap();
    export.add_external_template(311, inner.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(310).unwrap();

    let mut list = SubTemplateList::new(311, &inner, ListSemantic::Ordered);
    list.push(entry_record(&inner, 1, 2)).unwrap();
    list.push(entry_record(&inner, 3, 4)).unwrap();
    list.push(entry_record(&inner, 5, 6)).unwrap();

    let mut rec = Record::new(&outer);
    rec.set("sourceIPv4Address", Value::Ipv4Address([172, 16, 0, 1].into()))
        .unwrap();
    rec.set("subTemplateList", Value::SubTemplateList(list)).unwrap();

    export.append(&rec).unwrap();
    export.emit().unwrap();
    export.append(&rec).unwrap();
    export.emit().unwrap();
    drop(export);
    (wire, rec)
}

#[test]
fn nested_sub_template_list_with_pair_map() {
    let model = model();
    let (wire, original) = export_nested(&model);

    let mut session = Session::new(model.clone());
    let int = session
        .add_internal_template(TID_AUTO, outer_with_list(session.model()))
        .unwrap();
    // decode list entries as their external template
    session.add_template_pair(311, 311);

    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();

    let decoded = collect.next().unwrap();
    assert_eq!(decoded, original);
    let Some(Value::SubTemplateList(list)) = decoded.get("subTemplateList") else {
        panic!("missing list");
    };
    assert_eq!(list.len(), 3);
    assert_eq!(list.semantic, ListSemantic::Ordered);
    assert_eq!(
        list.records()[2].get("egressInterface"),
        Some(&Value::Unsigned32(6))
    );

    // remap the nested template to "skip": the same wire shape now decodes
    // to an empty list
    collect.session_mut().add_template_pair(311, 0);
    let skipped = collect.next().unwrap();
    let Some(Value::SubTemplateList(list)) = skipped.get("subTemplateList") else {
        panic!("missing list");
    };
    assert_eq!(list.len(), 0);
    assert!(list.template().is_none());
}

#[test]
fn nested_list_decodes_into_a_paired_internal_template() {
    let model = model();
    let (wire, _) = export_nested(&model);

    // internal layout keeps only the ingress interface
    let mut narrow = Template::new(model.clone());
    narrow.append_by_name("ingressInterface", 0).unwrap();

    let mut session = Session::new(model.clone());
    let int = session
        .add_internal_template(TID_AUTO, outer_with_list(session.model()))
        .unwrap();
    let narrow_tid = session.add_internal_template(TID_AUTO, narrow).unwrap();
    session.add_template_pair(311, narrow_tid);

    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();
    let decoded = collect.next().unwrap();
    let Some(Value::SubTemplateList(list)) = decoded.get("subTemplateList") else {
        panic!("missing list");
    };
    assert_eq!(list.len(), 3);
    let entry = &list.records()[1];
    assert_eq!(entry.get("ingressInterface"), Some(&Value::Unsigned32(3)));
    assert_eq!(entry.get("egressInterface"), None);
}

#[test]
fn basic_list_of_varlen_strings_round_trips() {
    let model = model();
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("sourceIPv4Address", 0).unwrap();
    tmpl.append_by_name("basicList", 0).unwrap();
    let tmpl = Arc::new(tmpl);

    let name_element = model.get_by_name("interfaceName").unwrap();
    let mut list = BasicList::new(&name_element, ListSemantic::AllOf);
    list.push(Value::String("eth0".into())).unwrap();
    list.push(Value::String("eth1".into())).unwrap();

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
    export.add_external_template(330, tmpl.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(330).unwrap();

    let mut rec = Record::new(&tmpl);
    rec.set("sourceIPv4Address", Value::Ipv4Address([10, 0, 0, 2].into()))
        .unwrap();
    rec.set("basicList", Value::BasicList(list)).unwrap();
    export.append(&rec).unwrap();
    export.emit().unwrap();
    drop(export);

    let mut session = Session::new(model);
    let int = session
        .add_internal_template(TID_AUTO, {
            let mut t = Template::new(session.model().clone());
            t.append_by_name("sourceIPv4Address", 0).unwrap();
            t.append_by_name("basicList", 0).unwrap();
            t
        })
        .unwrap();
    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();
    let decoded = collect.next().unwrap();

    let Some(Value::BasicList(list)) = decoded.get("basicList") else {
        panic!("missing list");
    };
    assert_eq!(list.semantic, ListSemantic::AllOf);
    assert_eq!(list.element().unwrap().name(), "interfaceName");
    assert_eq!(
        list.values(),
        &[Value::String("eth0".into()), Value::String("eth1".into())]
    );
}

#[test]
fn basic_list_of_fixed_width_values_round_trips() {
    let model = model();
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("basicList", 0).unwrap();
    let tmpl = Arc::new(tmpl);

    let port_element = model.get_by_name("sourceTransportPort").unwrap();
    let mut list = BasicList::new(&port_element, ListSemantic::OneOrMoreOf);
    for port in [53u16, 80, 443] {
        list.push(Value::Unsigned16(port)).unwrap();
    }

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone()).unwrap();
    export.add_external_template(331, tmpl.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(331).unwrap();

    let mut rec = Record::new(&tmpl);
    rec.set("basicList", Value::BasicList(list)).unwrap();
    export.append(&rec).unwrap();
    export.emit().unwrap();
    drop(export);

    let mut session = Session::new(model);
    let int = session
        .add_internal_template(TID_AUTO, {
            let mut t = Template::new(session.model().clone());
            t.append_by_name("basicList", 0).unwrap();
            t
        })
        .unwrap();
    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();
    let decoded = collect.next().unwrap();
    let Some(Value::BasicList(list)) = decoded.get("basicList") else {
        panic!("missing list");
    };
    assert_eq!(
        list.values(),
        &[
            Value::Unsigned16(53),
            Value::Unsigned16(80),
            Value::Unsigned16(443)
        ]
    );
}

#[test]
fn multi_list_entries_keep_their_own_templates() {
    let model = model();
    let inner_a = interface_pair(&model);
    let mut inner_b = Template::new(model.clone());
    inner_b.append_by_name("octetDeltaCount", 0).unwrap();
    let inner_b = Arc::new(inner_b);

    let mut outer = Template::new(model.clone());
    outer.append_by_name("subTemplateMultiList", 0).unwrap();
    let outer = Arc::new(outer);

    let mut multi = SubTemplateMultiList::new(ListSemantic::AllOf);
    let mut entry_one = MultiListEntry::new(341, &inner_a);
    entry_one.push(entry_record(&inner_a, 7, 8)).unwrap();
    entry_one.push(entry_record(&inner_a, 9, 10)).unwrap();
    multi.push_entry(entry_one);
    let mut entry_two = MultiListEntry::new(342, &inner_b);
    let mut counted = Record::new(&inner_b);
    counted.set("octetDeltaCount", Value::Unsigned64(4242)).unwrap();
    entry_two.push(counted).unwrap();
    multi.push_entry(entry_two);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, outer.clone()).unwrap();
    export.add_external_template(340, outer.clone()).unwrap();
    export.add_external_template(341, inner_a.clone()).unwrap();
    export.add_external_template(342, inner_b.clone()).unwrap();
    export.set_internal_template(int).unwrap();
    export.set_export_template(340).unwrap();

    let mut rec = Record::new(&outer);
    rec.set("subTemplateMultiList", Value::SubTemplateMultiList(multi))
        .unwrap();
    export.append(&rec).unwrap();
    export.emit().unwrap();
    drop(export);

    let mut session = Session::new(model);
    let int = session
        .add_internal_template(TID_AUTO, {
            let mut t = Template::new(session.model().clone());
            t.append_by_name("subTemplateMultiList", 0).unwrap();
            t
        })
        .unwrap();

    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int).unwrap();
    let decoded = collect.next().unwrap();
    let Some(Value::SubTemplateMultiList(multi)) = decoded.get("subTemplateMultiList") else {
        panic!("missing list");
    };
    assert_eq!(multi.len(), 2);
    assert_eq!(multi.entries()[0].len(), 2);
    assert_eq!(
        multi.entries()[0].records()[1].get("egressInterface"),
        Some(&Value::Unsigned32(10))
    );
    assert_eq!(
        multi.entries()[1].records()[0].get("octetDeltaCount"),
        Some(&Value::Unsigned64(4242))
    );
}
