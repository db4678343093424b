//! Message buffers: the export and collect sides of the transcoder.
//!
//! [`ExportBuffer`] assembles records into IPFIX messages against an active
//! (internal, external) template pair and emits them to a writer.
//! [`CollectBuffer`] parses messages from a reader (or byte buffer),
//! maintains the session's external template tables from template sets, and
//! decodes data records into the caller's internal layout.
//!
//! Both run in automatic mode by default: an export buffer emits when a
//! record no longer fits, and a collect buffer loads the next message when
//! the current one is exhausted. In manual mode those boundaries surface as
//! [`Error::EndOfMessage`].
//!
//! Message framing (RFC 7011):
//!
//! | part | octets |
//! |------|--------|
//! | message header | version=10 (2), length (2), export time (4), sequence (4), domain (4) |
//! | set header | set id (2), length (2) |
//! | template record | id (2), field count (2), scope count (2, options only), fields |
//! | field specifier | element id (2), length (2), enterprise number (4, enterprise only) |

mod transcode;

use crate::metadata;
use crate::record::Record;
use crate::session::Session;
use crate::template::Template;
use crate::{
    Error, IPFIX_VERSION, MIN_TEMPLATE_ID, MSG_HEADER_LEN, MSG_MAX_LEN,
    OPTIONS_TEMPLATE_SET_ID, REVERSE_PEN, Result, SET_HEADER_LEN, TEMPLATE_SET_ID,
};

use nom_derive::{Nom, Parse};
use serde::Serialize;

use transcode::{PlanCache, TranscodePlan};

use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parsed message header fields of the message currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageInfo {
    pub length: u16,
    pub export_time: u32,
    pub sequence: u32,
    pub domain: u32,
}

#[derive(Debug, Clone, Copy, Nom)]
struct WireHeader {
    version: u16,
    length: u16,
    export_time: u32,
    sequence: u32,
    domain: u32,
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

/// Assembles records into IPFIX messages and emits them to a writer.
///
/// The buffer owns its [`Session`]; template registration must go through
/// the buffer's add/remove operations so template records and withdrawals
/// reach the wire in order.
pub struct ExportBuffer<W: Write> {
    session: Session,
    writer: W,
    msg: Vec<u8>,
    mtu: usize,
    automatic: bool,
    int_tid: u16,
    ext_tid: u16,
    active_plan: Option<Arc<TranscodePlan>>,
    /// (set id, offset of the set header) of the currently open set.
    open_set: Option<(u16, usize)>,
    /// data records appended since the last emit (options records do not
    /// count, matching the sequence number semantics).
    data_records: u32,
    plans: PlanCache,
}

impl<W: Write> std::fmt::Debug for ExportBuffer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportBuffer")
            .field("session", &self.session)
            .field("msg_len", &self.msg.len())
            .field("mtu", &self.mtu)
            .field("automatic", &self.automatic)
            .finish()
    }
}

impl<W: Write> ExportBuffer<W> {
    pub fn new(session: Session, writer: W) -> Self {
        Self {
            session,
            writer,
            msg: vec![0; MSG_HEADER_LEN],
            mtu: MSG_MAX_LEN,
            automatic: true,
            int_tid: 0,
            ext_tid: 0,
            active_plan: None,
            open_set: None,
            data_records: 0,
            plans: PlanCache::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct session access. Adding or removing external templates here
    /// bypasses the wire; prefer the buffer's template operations while
    /// exporting.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// In automatic mode (the default) a record that does not fit emits the
    /// pending message and starts a new one; in manual mode it returns
    /// [`Error::EndOfMessage`].
    pub fn set_automatic(&mut self, automatic: bool) {
        self.automatic = automatic;
    }

    /// Caps emitted messages below the protocol's 65535-octet limit, e.g.
    /// to a transport MTU.
    pub fn set_mtu(&mut self, mtu: usize) -> Result<()> {
        let mtu = mtu.min(MSG_MAX_LEN);
        if mtu < MSG_HEADER_LEN + SET_HEADER_LEN + 4 {
            return Err(Error::Setup(format!("mtu {mtu} cannot hold any record")));
        }
        if mtu < self.msg.len() {
            return Err(Error::Setup(
                "cannot shrink mtu below the pending message".into(),
            ));
        }
        self.mtu = mtu;
        Ok(())
    }

    /// Switches the observation domain. Emit the pending message first:
    /// a message carries exactly one domain in its header.
    pub fn set_domain(&mut self, domain: u32) {
        self.session.set_domain(domain);
    }

    fn remaining(&self) -> usize {
        self.mtu - self.msg.len()
    }

    // ---- active templates ----

    /// Selects the internal template describing records passed to
    /// [`ExportBuffer::append`].
    pub fn set_internal_template(&mut self, tid: u16) -> Result<()> {
        self.session.get_template(true, tid)?;
        self.int_tid = tid;
        self.refresh_plan()
    }

    /// Selects the external template describing the wire layout of
    /// appended records.
    pub fn set_export_template(&mut self, tid: u16) -> Result<()> {
        self.session.get_template(false, tid)?;
        self.ext_tid = tid;
        self.refresh_plan()
    }

    fn refresh_plan(&mut self) -> Result<()> {
        if self.session.take_changed() {
            self.plans.clear();
        }
        self.active_plan = None;
        if self.int_tid != 0 && self.ext_tid != 0 {
            let int = self.session.get_template(true, self.int_tid)?;
            let ext = self.session.get_template(false, self.ext_tid)?;
            self.active_plan = Some(self.plans.get_or_build(&ext, &int));
        }
        Ok(())
    }

    // ---- template registration ----

    /// Adds an internal template to the session (nothing is written).
    pub fn add_internal_template(
        &mut self,
        tid: u16,
        template: impl Into<Arc<Template>>,
    ) -> Result<u16> {
        let tid = self.session.add_template(true, tid, template)?;
        let _ = self.session.take_changed();
        if self.int_tid == tid {
            self.refresh_plan()?;
        }
        Ok(tid)
    }

    /// Adds an external template in the current domain and writes its
    /// template record. A template already at that ID is revoked first
    /// (emitting a withdrawal). Returns the (possibly auto-assigned) ID.
    pub fn add_external_template(
        &mut self,
        tid: u16,
        template: impl Into<Arc<Template>>,
    ) -> Result<u16> {
        self.add_external(tid, template.into(), None)
    }

    /// [`ExportBuffer::add_external_template`] plus template metadata; the
    /// metadata options record is written first when template metadata
    /// export is enabled on the session.
    pub fn add_external_template_with_metadata(
        &mut self,
        tid: u16,
        template: impl Into<Arc<Template>>,
        name: &str,
        description: Option<&str>,
    ) -> Result<u16> {
        self.add_external(tid, template.into(), Some((name, description)))
    }

    fn add_external(
        &mut self,
        tid: u16,
        template: Arc<Template>,
        meta: Option<(&str, Option<&str>)>,
    ) -> Result<u16> {
        let tid = self.session.resolve_tid(false, tid)?;
        if self.session.has_template(false, tid) {
            self.remove_template(false, tid)?;
        }
        if let Some((name, description)) = meta {
            template.set_metadata(name, description);
        }
        if let (Some(meta_tid), Some(meta)) =
            (self.session.template_metadata_tid(), template.metadata())
        {
            self.write_metadata_record(meta_tid, tid, &meta)?;
        }
        self.write_template_record(tid, &template, false)?;
        self.session.insert_template(false, tid, template);
        let _ = self.session.take_changed();
        if self.ext_tid == tid {
            self.refresh_plan()?;
        }
        Ok(tid)
    }

    /// Removes a template; an external removal writes a withdrawal record.
    pub fn remove_template(&mut self, internal: bool, tid: u16) -> Result<()> {
        let template = self.session.remove_template(internal, tid)?;
        if !internal {
            self.write_template_record(tid, &template, true)?;
        }
        let _ = self.session.take_changed();
        self.plans.invalidate(&template);
        if (internal && self.int_tid == tid) || (!internal && self.ext_tid == tid) {
            // the next append will fail with MissingTemplate until a
            // template is selected again
            self.active_plan = None;
        }
        Ok(())
    }

    /// Writes the template records (and metadata, when enabled) for every
    /// external template of the current domain: first the metadata
    /// templates and element-definition records, then the data templates.
    pub fn export_templates(&mut self) -> Result<()> {
        let type_tid = self.session.type_metadata_tid();
        let meta_tid = self.session.template_metadata_tid();

        if let Some(tid) = type_tid {
            let ext = self.session.get_template(false, tid)?;
            self.write_template_record(tid, &ext, false)?;
            let int = self.session.get_template(true, tid)?;
            let plan = self.plans.get_or_build(&ext, &int);
            for element in self.session.model().elements() {
                // standard and reverse-standard elements need no definition
                if element.ent == 0 || element.ent == REVERSE_PEN || element.alien {
                    continue;
                }
                let rec = metadata::element_record(&int, &element)?;
                let mut body = Vec::new();
                transcode::encode_record(&plan, &rec, &mut body)?;
                self.push_body(tid, &body)?;
            }
        }
        if let Some(tid) = meta_tid {
            let ext = self.session.get_template(false, tid)?;
            self.write_template_record(tid, &ext, false)?;
        }
        for tid in self.session.external_template_ids() {
            if Some(tid) == type_tid || Some(tid) == meta_tid {
                continue;
            }
            self.export_template(tid)?;
        }
        Ok(())
    }

    /// Writes one external template's record, preceded by its metadata
    /// record when present and enabled.
    pub fn export_template(&mut self, tid: u16) -> Result<()> {
        let template = self.session.get_template(false, tid)?;
        if let (Some(meta_tid), Some(meta)) =
            (self.session.template_metadata_tid(), template.metadata())
        {
            self.write_metadata_record(meta_tid, tid, &meta)?;
        }
        self.write_template_record(tid, &template, false)
    }

    fn write_template_record(
        &mut self,
        tid: u16,
        template: &Arc<Template>,
        withdrawal: bool,
    ) -> Result<()> {
        let set_id = if template.is_options() {
            OPTIONS_TEMPLATE_SET_ID
        } else {
            TEMPLATE_SET_ID
        };
        let mut body = Vec::with_capacity(usize::from(template.template_record_len()));
        body.extend_from_slice(&tid.to_be_bytes());
        if withdrawal {
            body.extend_from_slice(&0u16.to_be_bytes());
        } else {
            body.extend_from_slice(&template.field_count().to_be_bytes());
            if template.is_options() {
                body.extend_from_slice(&template.scope_count().to_be_bytes());
            }
            for field in template.fields() {
                let element = field.element();
                let id = if element.ent != 0 {
                    element.num | 0x8000
                } else {
                    element.num
                };
                body.extend_from_slice(&id.to_be_bytes());
                body.extend_from_slice(&field.len.to_be_bytes());
                if element.ent != 0 {
                    body.extend_from_slice(&element.ent.to_be_bytes());
                }
            }
        }
        self.push_body(set_id, &body)
    }

    fn write_metadata_record(
        &mut self,
        meta_tid: u16,
        tid: u16,
        meta: &crate::template::TemplateMetadata,
    ) -> Result<()> {
        let int = self.session.get_template(true, meta_tid)?;
        let ext = self.session.get_template(false, meta_tid)?;
        let rec = metadata::template_metadata_record(&int, tid, meta)?;
        let plan = self.plans.get_or_build(&ext, &int);
        let mut body = Vec::new();
        transcode::encode_record(&plan, &rec, &mut body)?;
        self.push_body(meta_tid, &body)
    }

    /// Places `body` into a set of `set_id`, opening or continuing the set
    /// and handling the end-of-message boundary per the automatic mode.
    fn push_body(&mut self, set_id: u16, body: &[u8]) -> Result<()> {
        let largest_fit = self.mtu - MSG_HEADER_LEN - SET_HEADER_LEN;
        if body.len() > largest_fit {
            return Err(Error::BufferTooSmall {
                needed: body.len(),
                available: largest_fit,
            });
        }
        let set_open = self.open_set.map(|(id, _)| id) == Some(set_id);
        let needed = body.len() + if set_open { 0 } else { SET_HEADER_LEN };
        if needed > self.remaining() {
            if !self.automatic {
                return Err(Error::EndOfMessage);
            }
            self.emit()?;
        }
        self.ensure_set(set_id);
        self.msg.extend_from_slice(body);
        Ok(())
    }

    fn ensure_set(&mut self, set_id: u16) {
        if self.open_set.map(|(id, _)| id) == Some(set_id) {
            return;
        }
        self.close_set();
        let pos = self.msg.len();
        self.msg.extend_from_slice(&set_id.to_be_bytes());
        self.msg.extend_from_slice(&[0, 0]);
        self.open_set = Some((set_id, pos));
    }

    fn close_set(&mut self) {
        if let Some((_, pos)) = self.open_set.take() {
            let len = (self.msg.len() - pos) as u16;
            self.msg[pos + 2..pos + 4].copy_from_slice(&len.to_be_bytes());
        }
    }

    // ---- records ----

    /// Transcodes a record from the active internal template's layout to
    /// the active external template's wire form and places it in the
    /// message.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        if self.session.take_changed() {
            self.plans.clear();
            self.active_plan = None;
        }
        if self.active_plan.is_none() {
            self.refresh_plan()?;
        }
        let plan = self
            .active_plan
            .clone()
            .ok_or_else(|| Error::Setup("set internal and export templates before appending".into()))?;

        let mut body = Vec::with_capacity(usize::from(plan.ext.wire_min_len()));
        transcode::encode_record(&plan, record, &mut body)?;
        self.push_body(self.ext_tid, &body)?;
        if !plan.ext.is_options() {
            self.data_records += 1;
        }
        Ok(())
    }

    /// Finishes the pending message and writes it out: patches the set and
    /// message lengths, stamps the export time (the session's configured
    /// time or the wall clock) and the domain's sequence number, then
    /// advances the sequence by the number of data records emitted.
    ///
    /// An empty message (no sets) is not written.
    pub fn emit(&mut self) -> Result<()> {
        self.close_set();
        if self.msg.len() == MSG_HEADER_LEN {
            return Ok(());
        }
        let export_time = self.session.export_time().unwrap_or_else(wall_clock_seconds);
        let len = self.msg.len() as u16;
        self.msg[0..2].copy_from_slice(&IPFIX_VERSION.to_be_bytes());
        self.msg[2..4].copy_from_slice(&len.to_be_bytes());
        self.msg[4..8].copy_from_slice(&export_time.to_be_bytes());
        self.msg[8..12].copy_from_slice(&self.session.sequence().to_be_bytes());
        self.msg[12..16].copy_from_slice(&self.session.domain().to_be_bytes());

        self.writer.write_all(&self.msg)?;
        self.session.advance_sequence(self.data_records);
        self.data_records = 0;
        self.msg.clear();
        self.msg.resize(MSG_HEADER_LEN, 0);
        Ok(())
    }

    /// Emits the pending message and returns the session and writer.
    pub fn finish(mut self) -> Result<(Session, W)> {
        self.emit()?;
        Ok((self.session, self.writer))
    }

    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.writer)
    }
}

fn wall_clock_seconds() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// collect
// ---------------------------------------------------------------------------

/// Parses IPFIX messages and decodes data records into the active internal
/// template's layout.
pub struct CollectBuffer<R: Read> {
    session: Session,
    reader: R,
    /// body of the current message (without the 16-octet header)
    msg: Vec<u8>,
    pos: usize,
    set_end: usize,
    set_tid: u16,
    int_tid: u16,
    cur_plan: Option<Arc<TranscodePlan>>,
    automatic: bool,
    auto_insert: bool,
    plans: PlanCache,
    info: Option<MessageInfo>,
    loaded: bool,
    meta_type_int: Option<Arc<Template>>,
    meta_tmpl_int: Option<Arc<Template>>,
    /// metadata that arrived ahead of its template record
    pending_metadata: std::collections::HashMap<u16, crate::template::TemplateMetadata>,
}

impl<R: Read> std::fmt::Debug for CollectBuffer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectBuffer")
            .field("session", &self.session)
            .field("info", &self.info)
            .field("pos", &self.pos)
            .field("automatic", &self.automatic)
            .finish()
    }
}

impl CollectBuffer<Cursor<Vec<u8>>> {
    /// Collects from an in-memory buffer of concatenated messages.
    pub fn from_bytes(session: Session, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(session, Cursor::new(bytes.into()))
    }
}

impl<R: Read> CollectBuffer<R> {
    pub fn new(session: Session, reader: R) -> Self {
        Self {
            session,
            reader,
            msg: Vec::new(),
            pos: 0,
            set_end: 0,
            set_tid: 0,
            int_tid: 0,
            cur_plan: None,
            automatic: true,
            auto_insert: false,
            plans: PlanCache::new(),
            info: None,
            loaded: false,
            meta_type_int: None,
            meta_tmpl_int: None,
            pending_metadata: std::collections::HashMap::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// In automatic mode (the default) [`CollectBuffer::next`] loads the
    /// next message when the current one is exhausted; in manual mode the
    /// boundary surfaces as [`Error::EndOfMessage`].
    pub fn set_automatic(&mut self, automatic: bool) {
        self.automatic = automatic;
    }

    /// Decode RFC 5610 element-definition options records into the
    /// session's information model as they arrive.
    pub fn set_auto_insert(&mut self, auto_insert: bool) {
        self.auto_insert = auto_insert;
    }

    /// Header fields of the message currently being decoded.
    pub fn message_info(&self) -> Option<&MessageInfo> {
        self.info.as_ref()
    }

    /// Selects the internal template that decoded records are laid out by.
    pub fn set_internal_template(&mut self, tid: u16) -> Result<()> {
        self.session.get_template(true, tid)?;
        self.int_tid = tid;
        self.cur_plan = None;
        Ok(())
    }

    pub fn into_parts(self) -> (Session, R) {
        (self.session, self.reader)
    }

    /// Reads the next message header and body from the reader, updating
    /// the session's domain and sequence expectation. A sequence mismatch
    /// is a logged warning, not an error.
    pub fn next_message(&mut self) -> Result<()> {
        self.loaded = false;
        self.info = None;
        self.pos = 0;
        self.set_end = 0;
        self.set_tid = 0;
        self.cur_plan = None;

        let mut header = [0u8; MSG_HEADER_LEN];
        let got = read_full(&mut self.reader, &mut header)?;
        if got == 0 {
            return Err(Error::EndOfStream);
        }
        if got < MSG_HEADER_LEN {
            return Err(Error::InvalidIpfix(format!(
                "truncated message header ({got} of {MSG_HEADER_LEN} octets)"
            )));
        }
        let (_, hdr) = WireHeader::parse(&header)
            .map_err(|_| Error::InvalidIpfix("unreadable message header".into()))?;
        if hdr.version != IPFIX_VERSION {
            return Err(Error::InvalidIpfix(format!(
                "version {} is not IPFIX",
                hdr.version
            )));
        }
        if usize::from(hdr.length) < MSG_HEADER_LEN {
            return Err(Error::InvalidIpfix(format!(
                "message length {} below the header size",
                hdr.length
            )));
        }

        let body_len = usize::from(hdr.length) - MSG_HEADER_LEN;
        self.msg.clear();
        self.msg.resize(body_len, 0);
        let got = read_full(&mut self.reader, &mut self.msg)?;
        if got < body_len {
            return Err(Error::InvalidIpfix(format!(
                "truncated message body ({got} of {body_len} octets)"
            )));
        }

        self.session.set_domain(hdr.domain);
        if hdr.sequence != self.session.sequence() {
            log::warn!(
                "sequence gap in domain {}: expected {}, message says {}",
                hdr.domain,
                self.session.sequence(),
                hdr.sequence
            );
            self.session.resync_sequence(hdr.sequence);
        }

        self.info = Some(MessageInfo {
            length: hdr.length,
            export_time: hdr.export_time,
            sequence: hdr.sequence,
            domain: hdr.domain,
        });
        self.loaded = true;
        Ok(())
    }

    /// Decodes the next data record. Template sets encountered on the way
    /// update the session (firing the new-template callback); unknown and
    /// reserved sets are skipped with a log message.
    pub fn next(&mut self) -> Result<Record> {
        if self.session.take_changed() {
            self.plans.clear();
            self.cur_plan = None;
        }
        loop {
            if !self.loaded {
                if !self.automatic {
                    return Err(Error::EndOfMessage);
                }
                self.next_message()?;
                continue;
            }
            if self.pos >= self.set_end {
                if self.msg.len() - self.pos < SET_HEADER_LEN {
                    self.loaded = false;
                    continue;
                }
                self.begin_set()?;
                continue;
            }

            if self.cur_plan.is_none() && self.set_tid != 0 && self.int_tid != 0 {
                // the internal template changed mid-set
                let ext = self.session.get_template(false, self.set_tid)?;
                let int = self.session.get_template(true, self.int_tid)?;
                self.cur_plan = Some(self.plans.get_or_build(&ext, &int));
            }
            let Some(plan) = self.cur_plan.clone() else {
                self.pos = self.set_end;
                self.set_tid = 0;
                continue;
            };
            let min = usize::from(plan.ext.wire_min_len()).max(1);
            if self.set_end - self.pos < min {
                // set padding
                self.pos = self.set_end;
                self.set_tid = 0;
                continue;
            }
            let (record, consumed) = transcode::decode_record(
                &plan,
                &self.msg[self.pos..self.set_end],
                &self.session,
                &mut self.plans,
            )?;
            if consumed == 0 {
                self.pos = self.set_end;
                continue;
            }
            self.pos += consumed;
            if !plan.ext.is_options() {
                self.session.advance_sequence(1);
            }
            return Ok(record);
        }
    }

    fn begin_set(&mut self) -> Result<()> {
        if self.session.take_changed() {
            self.plans.clear();
            self.cur_plan = None;
        }
        let id = u16::from_be_bytes([self.msg[self.pos], self.msg[self.pos + 1]]);
        let len = usize::from(u16::from_be_bytes([
            self.msg[self.pos + 2],
            self.msg[self.pos + 3],
        ]));
        if len < SET_HEADER_LEN || self.pos + len > self.msg.len() {
            return Err(Error::InvalidIpfix(format!(
                "set length {len} overruns the message"
            )));
        }
        self.set_end = self.pos + len;
        self.pos += SET_HEADER_LEN;
        self.set_tid = 0;
        self.cur_plan = None;

        if id == TEMPLATE_SET_ID || id == OPTIONS_TEMPLATE_SET_ID {
            self.process_template_set(id == OPTIONS_TEMPLATE_SET_ID)?;
            self.pos = self.set_end;
            return Ok(());
        }
        if id < MIN_TEMPLATE_ID {
            log::warn!("skipping reserved set {id}");
            self.pos = self.set_end;
            return Ok(());
        }

        let ext = match self.session.get_template(false, id) {
            Ok(t) => t,
            Err(_) => {
                log::warn!(
                    "no template for data set {id:#06x} in domain {}, skipping",
                    self.session.domain()
                );
                self.pos = self.set_end;
                return Ok(());
            }
        };
        if self.auto_insert && metadata::is_element_type_template(&ext) {
            self.consume_element_definitions(&ext)?;
            self.pos = self.set_end;
            return Ok(());
        }
        if metadata::is_template_metadata_template(&ext) {
            self.consume_template_metadata(&ext)?;
            self.pos = self.set_end;
            return Ok(());
        }
        if self.int_tid == 0 {
            return Err(Error::Setup(
                "set an internal template before collecting records".into(),
            ));
        }
        let int = self.session.get_template(true, self.int_tid)?;
        self.cur_plan = Some(self.plans.get_or_build(&ext, &int));
        self.set_tid = id;
        Ok(())
    }

    /// Applies every readable template record of the set; a malformed
    /// record drops the rest of the set but keeps the good ones, matching
    /// the protocol's tolerance for vendor quirks.
    fn process_template_set(&mut self, options: bool) -> Result<()> {
        let body = self.msg[self.pos..self.set_end].to_vec();
        let mut rest = body.as_slice();

        while rest.len() >= 4 {
            let tid = u16::from_be_bytes([rest[0], rest[1]]);
            let count = u16::from_be_bytes([rest[2], rest[3]]);
            rest = &rest[4..];

            if count == 0 {
                self.apply_withdrawal(tid, options);
                continue;
            }
            if tid < MIN_TEMPLATE_ID {
                log::warn!("template record with illegal id {tid}, dropping rest of set");
                break;
            }

            let scope = if options {
                if rest.len() < 2 {
                    log::warn!("truncated options template {tid:#06x}, dropping rest of set");
                    break;
                }
                let scope = u16::from_be_bytes([rest[0], rest[1]]);
                rest = &rest[2..];
                scope
            } else {
                0
            };
            if options && (scope == 0 || scope > count) {
                log::warn!(
                    "options template {tid:#06x} has scope {scope} of {count} fields, dropping rest of set"
                );
                break;
            }

            let mut template = Template::new(self.session.model().clone());
            let mut well_formed = true;
            for _ in 0..count {
                if rest.len() < 4 {
                    well_formed = false;
                    break;
                }
                let raw_id = u16::from_be_bytes([rest[0], rest[1]]);
                let field_len = u16::from_be_bytes([rest[2], rest[3]]);
                rest = &rest[4..];
                let ent = if raw_id & 0x8000 != 0 {
                    if rest.len() < 4 {
                        well_formed = false;
                        break;
                    }
                    let ent = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
                    rest = &rest[4..];
                    ent
                } else {
                    0
                };
                if template.append_key(ent, raw_id & 0x7FFF, field_len).is_err() {
                    well_formed = false;
                    break;
                }
            }
            if !well_formed {
                log::warn!("malformed template record {tid:#06x}, dropping rest of set");
                break;
            }
            if options && template.set_options_scope(scope).is_err() {
                log::warn!("unusable scope on template {tid:#06x}, dropping rest of set");
                break;
            }

            self.session.insert_template(false, tid, Arc::new(template));
            if let Some(meta) = self.pending_metadata.remove(&tid) {
                if let Ok(described) = self.session.get_template(false, tid) {
                    described.set_metadata(meta.name, meta.description.as_deref());
                }
            }
            self.session.fire_new_template(tid);
        }
        let _ = self.session.take_changed();
        Ok(())
    }

    fn apply_withdrawal(&mut self, tid: u16, options: bool) {
        match self.session.get_template(false, tid) {
            Ok(t) if t.is_options() == options => {
                if let Ok(removed) = self.session.remove_template(false, tid) {
                    self.plans.invalidate(&removed);
                }
                log::debug!("withdrew external template {tid:#06x}");
            }
            Ok(_) => {
                log::warn!(
                    "withdrawal for {tid:#06x} arrived in the wrong set kind, ignoring"
                );
            }
            Err(_) => {
                log::debug!("withdrawal for unknown template {tid:#06x}, ignoring");
            }
        }
    }

    fn meta_type_template(&mut self) -> Result<Arc<Template>> {
        if let Some(t) = &self.meta_type_int {
            return Ok(t.clone());
        }
        let t = Arc::new(metadata::element_type_template(self.session.model().clone())?);
        t.activate();
        self.meta_type_int = Some(t.clone());
        Ok(t)
    }

    fn meta_tmpl_template(&mut self) -> Result<Arc<Template>> {
        if let Some(t) = &self.meta_tmpl_int {
            return Ok(t.clone());
        }
        let t = Arc::new(metadata::template_metadata_template(
            self.session.model().clone(),
            true,
        )?);
        t.activate();
        self.meta_tmpl_int = Some(t.clone());
        Ok(t)
    }

    /// Decodes RFC 5610 element-definition records and adds them to the
    /// model. The records are consumed, not surfaced.
    fn consume_element_definitions(&mut self, ext: &Arc<Template>) -> Result<()> {
        let int = self.meta_type_template()?;
        let plan = self.plans.get_or_build(ext, &int);
        let body = self.msg[self.pos..self.set_end].to_vec();
        let mut rest = body.as_slice();
        let min = usize::from(plan.ext.wire_min_len()).max(1);
        while rest.len() >= min {
            let Ok((record, consumed)) =
                transcode::decode_record(&plan, rest, &self.session, &mut self.plans)
            else {
                log::warn!("malformed element definition record, dropping rest of set");
                break;
            };
            if consumed == 0 {
                break;
            }
            rest = &rest[consumed..];
            if let Some(element) = metadata::element_from_record(&record) {
                log::debug!(
                    "learned element {} ({}/{}) from type record",
                    element.name(),
                    element.ent,
                    element.num
                );
                self.session.model().add(element);
            }
        }
        Ok(())
    }

    /// Decodes template-metadata records and attaches the names to the
    /// referenced external templates. The records are consumed, not
    /// surfaced.
    fn consume_template_metadata(&mut self, ext: &Arc<Template>) -> Result<()> {
        let int = self.meta_tmpl_template()?;
        let plan = self.plans.get_or_build(ext, &int);
        let body = self.msg[self.pos..self.set_end].to_vec();
        let mut rest = body.as_slice();
        let min = usize::from(plan.ext.wire_min_len()).max(1);
        while rest.len() >= min {
            let Ok((record, consumed)) =
                transcode::decode_record(&plan, rest, &self.session, &mut self.plans)
            else {
                log::warn!("malformed template metadata record, dropping rest of set");
                break;
            };
            if consumed == 0 {
                break;
            }
            rest = &rest[consumed..];
            if let Some((tid, meta)) = metadata::template_metadata_from_record(&record) {
                match self.session.get_template(false, tid) {
                    Ok(described) => {
                        described.set_metadata(meta.name, meta.description.as_deref())
                    }
                    // the metadata record may precede its template record
                    Err(_) => {
                        self.pending_metadata.insert(tid, meta);
                    }
                }
            }
        }
        Ok(())
    }
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
