//! Watch templates arrive on the collect side and attach per-template
//! context from the new-template callback.
//!
//! ```sh
//! cargo run --example template_hooks
//! ```

use ipfix_codec::{
    CollectBuffer, ExportBuffer, InfoModel, Record, Session, TID_AUTO, Template, Value,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let model = Arc::new(InfoModel::new());
    let mut tmpl = Template::new(model.clone());
    tmpl.append_by_name("sourceIPv4Address", 0)?;
    tmpl.append_by_name("octetDeltaCount", 0)?;
    let tmpl = Arc::new(tmpl);

    let mut wire = Vec::new();
    let mut export = ExportBuffer::new(Session::new(model.clone()), &mut wire);
    let int = export.add_internal_template(TID_AUTO, tmpl.clone())?;
    export.add_external_template(300, tmpl.clone())?;
    export.add_external_template(301, tmpl.clone())?;
    export.set_internal_template(int)?;
    export.set_export_template(300)?;
    let mut rec = Record::new(&tmpl);
    rec.set("octetDeltaCount", Value::Unsigned64(1234))?;
    export.append(&rec)?;
    export.emit()?;
    drop(export);

    let learned = Arc::new(AtomicUsize::new(0));
    let counter = learned.clone();

    let mut session = Session::new(model.clone());
    let int = session.add_internal_template(TID_AUTO, {
        let mut t = Template::new(model);
        t.append_by_name("sourceIPv4Address", 0)?;
        t.append_by_name("octetDeltaCount", 0)?;
        t
    })?;
    session.on_new_template(move |event| {
        counter.fetch_add(1, Ordering::SeqCst);
        println!(
            "learned template {:#06x} in domain {} ({} fields)",
            event.tid,
            event.domain,
            event.template.field_count()
        );
        event.template.set_context(Box::new(format!("seen-as-{:#06x}", event.tid)));
    });

    let mut collect = CollectBuffer::from_bytes(session, wire);
    collect.set_internal_template(int)?;
    while let Ok(rec) = collect.next() {
        println!("record: {}", serde_json::to_string(&rec)?);
    }

    println!("callback fired {} times", learned.load(Ordering::SeqCst));
    for tid in collect.session().external_template_ids() {
        let tmpl = collect.session().get_template(false, tid)?;
        if let Some(ctx) = tmpl.context::<String>() {
            println!("template {tid:#06x} context: {ctx}");
        }
    }
    Ok(())
}
