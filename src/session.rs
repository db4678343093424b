//! Per-transport-session state: template tables, observation domains,
//! sequence numbers, and the template-pair map driving nested decoding.
//!
//! A session owns one internal template table (domain-independent) and one
//! external template table per observation domain. Template IDs 0-255 are
//! reserved on the wire; [`TID_AUTO`] asks the session to assign an ID —
//! internal IDs are assigned downward from 65535, external IDs upward from
//! 256, so hand-picked low external IDs and automatic internal IDs rarely
//! collide.

use crate::info_model::InfoModel;
use crate::metadata;
use crate::template::Template;
use crate::{Error, MIN_TEMPLATE_ID, Result};

use std::collections::HashMap;
use std::sync::Arc;

/// Passing this to an add-template operation assigns an unused ID.
pub const TID_AUTO: u16 = 0;

/// A template table holds at most this many entries (IDs 256-65535).
const TABLE_CAPACITY: usize = (u16::MAX - (MIN_TEMPLATE_ID - 1)) as usize;

/// Fired after a template record from the wire is inserted into the
/// external table.
pub struct NewTemplateEvent<'a> {
    pub tid: u16,
    pub domain: u32,
    pub template: &'a Arc<Template>,
}

/// Callback invoked for each new external template learned on collect.
///
/// The hook may attach a per-template context via
/// [`Template::set_context`]; the context is dropped with the template,
/// which is the place to hang cleanup. Hooks are copied to session forks.
pub type NewTemplateHook = Arc<dyn Fn(&NewTemplateEvent<'_>) + Send + Sync>;

/// Template tables and sequence state for one transport session.
pub struct Session {
    model: Arc<InfoModel>,
    internal: HashMap<u16, Arc<Template>>,
    domains: HashMap<u32, HashMap<u16, Arc<Template>>>,
    domain_seq: HashMap<u32, u32>,
    domain: u32,
    sequence: u32,
    /// external TID -> internal TID for nested records; 0 means skip.
    pairs: HashMap<u16, u16>,
    hook: Option<NewTemplateHook>,
    next_int_tid: u16,
    next_ext_tid: u16,
    /// (tid, mem_len) of the largest internal template, for sizing decode
    /// buffers.
    largest_internal: Option<(u16, u32)>,
    type_metadata_tid: Option<u16>,
    template_metadata_tid: Option<u16>,
    internal_changed: bool,
    external_changed: bool,
    export_time: Option<u32>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("domain", &self.domain)
            .field("sequence", &self.sequence)
            .field("internal_templates", &self.internal.len())
            .field("domains", &self.domains.len())
            .field("pairs", &self.pairs.len())
            .finish()
    }
}

impl Session {
    pub fn new(model: Arc<InfoModel>) -> Self {
        let mut domains = HashMap::new();
        domains.insert(0, HashMap::new());
        Self {
            model,
            internal: HashMap::new(),
            domains,
            domain_seq: HashMap::new(),
            domain: 0,
            sequence: 0,
            pairs: HashMap::new(),
            hook: None,
            next_int_tid: u16::MAX,
            next_ext_tid: MIN_TEMPLATE_ID,
            largest_internal: None,
            type_metadata_tid: None,
            template_metadata_tid: None,
            internal_changed: false,
            external_changed: false,
            export_time: None,
        }
    }

    pub fn model(&self) -> &Arc<InfoModel> {
        &self.model
    }

    // ---- template tables -------------------------------------------------

    /// Adds a template to the internal or external table, first revoking
    /// any template already at that ID, and returns the (possibly
    /// auto-assigned) ID. The template becomes active and immutable.
    ///
    /// Adding through a bare session never writes to the wire; use the
    /// [`ExportBuffer`](crate::ExportBuffer) add operations while exporting
    /// so external templates and withdrawals are emitted.
    pub fn add_template(
        &mut self,
        internal: bool,
        tid: u16,
        template: impl Into<Arc<Template>>,
    ) -> Result<u16> {
        let template = template.into();
        let tid = self.resolve_tid(internal, tid)?;
        self.insert_template(internal, tid, template);
        Ok(tid)
    }

    /// [`Session::add_template`] for the internal table.
    pub fn add_internal_template(
        &mut self,
        tid: u16,
        template: impl Into<Arc<Template>>,
    ) -> Result<u16> {
        self.add_template(true, tid, template)
    }

    /// [`Session::add_template`] for the current domain's external table.
    pub fn add_external_template(
        &mut self,
        tid: u16,
        template: impl Into<Arc<Template>>,
    ) -> Result<u16> {
        self.add_template(false, tid, template)
    }

    /// Validates a requested template ID or assigns an unused one.
    pub(crate) fn resolve_tid(&mut self, internal: bool, tid: u16) -> Result<u16> {
        let table_len = if internal {
            self.internal.len()
        } else {
            self.external_table().map_or(0, HashMap::len)
        };
        if table_len >= TABLE_CAPACITY {
            return Err(Error::Setup("template table is full, no IDs left".into()));
        }
        if tid != TID_AUTO {
            if tid < MIN_TEMPLATE_ID {
                return Err(Error::Setup(format!("illegal template id {tid}")));
            }
            return Ok(tid);
        }
        if internal {
            // downward from 65535
            let mut candidate = self.next_int_tid;
            while self.has_template(true, candidate) {
                candidate = if candidate == MIN_TEMPLATE_ID {
                    u16::MAX
                } else {
                    candidate - 1
                };
            }
            self.next_int_tid = if candidate == MIN_TEMPLATE_ID {
                u16::MAX
            } else {
                candidate - 1
            };
            Ok(candidate)
        } else {
            // upward from 256
            let mut candidate = self.next_ext_tid;
            while self.has_template(false, candidate) {
                candidate = if candidate == u16::MAX {
                    MIN_TEMPLATE_ID
                } else {
                    candidate + 1
                };
            }
            self.next_ext_tid = if candidate == u16::MAX {
                MIN_TEMPLATE_ID
            } else {
                candidate + 1
            };
            Ok(candidate)
        }
    }

    /// Inserts at a resolved ID, silently replacing an existing template.
    pub(crate) fn insert_template(&mut self, internal: bool, tid: u16, template: Arc<Template>) {
        let _ = self.remove_template(internal, tid);
        template.activate();
        if internal {
            let mem = template.mem_len();
            if self.largest_internal.is_none_or(|(_, max)| mem > max) {
                self.largest_internal = Some((tid, mem));
            }
            self.internal.insert(tid, template);
            self.internal_changed = true;
        } else {
            self.domains.entry(self.domain).or_default().insert(tid, template);
            self.external_changed = true;
        }
        log::debug!(
            "added {} template {tid:#06x} in domain {}",
            if internal { "internal" } else { "external" },
            self.domain
        );
    }

    /// Removes a template, clears its template-pair entry, and returns it.
    /// The caller is responsible for emitting a withdrawal when exporting.
    pub fn remove_template(&mut self, internal: bool, tid: u16) -> Result<Arc<Template>> {
        let removed = if internal {
            self.internal.remove(&tid)
        } else {
            self.domains.get_mut(&self.domain).and_then(|t| t.remove(&tid))
        }
        .ok_or(Error::MissingTemplate { tid, internal })?;

        if internal {
            self.internal_changed = true;
        } else {
            self.external_changed = true;
        }
        self.remove_template_pair(tid);
        if internal && self.largest_internal.is_some_and(|(l, _)| l == tid) {
            self.largest_internal = self
                .internal
                .iter()
                .map(|(&id, t)| (id, t.mem_len()))
                .max_by_key(|&(_, mem)| mem);
        }
        Ok(removed)
    }

    /// Looks up a template by direction and ID.
    pub fn get_template(&self, internal: bool, tid: u16) -> Result<Arc<Template>> {
        let found = if internal {
            self.internal.get(&tid)
        } else {
            self.external_table().and_then(|t| t.get(&tid))
        };
        found.cloned().ok_or(Error::MissingTemplate { tid, internal })
    }

    pub fn has_template(&self, internal: bool, tid: u16) -> bool {
        self.get_template(internal, tid).is_ok()
    }

    fn external_table(&self) -> Option<&HashMap<u16, Arc<Template>>> {
        self.domains.get(&self.domain)
    }

    /// Sorted IDs of the current domain's external templates.
    pub fn external_template_ids(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self
            .external_table()
            .map(|t| t.keys().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Sorted IDs of the internal templates.
    pub fn internal_template_ids(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self.internal.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// (ID, in-memory length) of the largest internal template.
    pub fn largest_internal_template(&self) -> Option<(u16, u32)> {
        self.largest_internal
    }

    /// True when a template table changed since the last call; clears the
    /// flags. Buffers use this to drop stale transcode plans.
    pub(crate) fn take_changed(&mut self) -> bool {
        let changed = self.internal_changed || self.external_changed;
        self.internal_changed = false;
        self.external_changed = false;
        changed
    }

    // ---- observation domains and sequence numbers ------------------------

    /// Switches the current observation domain, stashing the sequence
    /// number of the old domain and loading (or zero-initializing) the new
    /// one. Does not emit anything: when exporting, emit the pending
    /// message first.
    pub fn set_domain(&mut self, domain: u32) {
        if domain == self.domain {
            return;
        }
        self.domain_seq.insert(self.domain, self.sequence);
        self.sequence = self.domain_seq.get(&domain).copied().unwrap_or(0);
        self.domains.entry(domain).or_default();
        self.domain = domain;
        // a different external table is now visible
        self.external_changed = true;
    }

    pub fn domain(&self) -> u32 {
        self.domain
    }

    /// Next sequence number for the current domain: the count of data
    /// records exported so far (modulo 2^32), or the expected count on
    /// collect.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub(crate) fn advance_sequence(&mut self, records: u32) {
        self.sequence = self.sequence.wrapping_add(records);
    }

    pub(crate) fn resync_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }

    /// Export time stamped on emitted messages; `None` uses the wall
    /// clock.
    pub fn set_export_time(&mut self, seconds: Option<u32>) {
        self.export_time = seconds;
    }

    pub(crate) fn export_time(&self) -> Option<u32> {
        self.export_time
    }

    // ---- template pairs --------------------------------------------------

    /// Declares how nested records described by external template `ext`
    /// decode: into internal template `int`, as-is when `int == ext`, or
    /// not at all when `int == 0` (the collector yields an empty list).
    ///
    /// A differing `int` must name an existing internal template or the
    /// pair is ignored.
    pub fn add_template_pair(&mut self, ext: u16, int: u16) {
        if ext == int || int == 0 || self.has_template(true, int) {
            self.pairs.insert(ext, int);
        } else {
            log::warn!("ignoring template pair {ext:#06x} -> missing internal {int:#06x}");
        }
    }

    pub fn remove_template_pair(&mut self, ext: u16) {
        self.pairs.remove(&ext);
    }

    /// Resolves a nested external template ID. With no pairs registered
    /// every template decodes as itself; once any pair exists, unmapped
    /// templates are skipped.
    pub fn lookup_template_pair(&self, ext: u16) -> u16 {
        if self.pairs.is_empty() {
            ext
        } else {
            self.pairs.get(&ext).copied().unwrap_or(0)
        }
    }

    // ---- collect callback ------------------------------------------------

    /// Registers the new-template callback fired as external templates are
    /// learned on collect.
    pub fn on_new_template<F>(&mut self, hook: F)
    where
        F: Fn(&NewTemplateEvent<'_>) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
    }

    pub fn set_new_template_hook(&mut self, hook: NewTemplateHook) {
        self.hook = Some(hook);
    }

    pub fn new_template_hook(&self) -> Option<&NewTemplateHook> {
        self.hook.as_ref()
    }

    pub(crate) fn fire_new_template(&self, tid: u16) {
        let (Some(hook), Ok(template)) = (&self.hook, self.get_template(false, tid)) else {
            return;
        };
        hook(&NewTemplateEvent {
            tid,
            domain: self.domain,
            template: &template,
        });
    }

    // ---- metadata export -------------------------------------------------

    /// Registers the RFC 5610 element-definition options template (as both
    /// internal and external at the same ID) and enables element metadata
    /// export. Returns the template ID used.
    pub fn enable_type_metadata(&mut self, tid: u16) -> Result<u16> {
        let tmpl = Arc::new(metadata::element_type_template(self.model.clone())?);
        let tid = self.resolve_tid(false, tid)?;
        self.insert_template(false, tid, tmpl.clone());
        self.insert_template(true, tid, tmpl);
        self.type_metadata_tid = Some(tid);
        Ok(tid)
    }

    /// Registers the template-metadata options template (internal variant
    /// with padding, external without) and enables template metadata
    /// export. Returns the template ID used.
    pub fn enable_template_metadata(&mut self, tid: u16) -> Result<u16> {
        let external = Arc::new(metadata::template_metadata_template(self.model.clone(), false)?);
        let internal = Arc::new(metadata::template_metadata_template(self.model.clone(), true)?);
        let tid = self.resolve_tid(false, tid)?;
        self.insert_template(false, tid, external);
        self.insert_template(true, tid, internal);
        self.template_metadata_tid = Some(tid);
        Ok(tid)
    }

    pub fn type_metadata_tid(&self) -> Option<u16> {
        self.type_metadata_tid
    }

    pub fn template_metadata_tid(&self) -> Option<u16> {
        self.template_metadata_tid
    }

    // ---- cloning ---------------------------------------------------------

    /// Creates a session sharing this one's model, internal templates, and
    /// new-template callback, with fresh external state. This is the
    /// per-peer session setup used by UDP collectors that keep one session
    /// per (peer, domain).
    pub fn fork(&self) -> Session {
        let mut fork = Session::new(self.model.clone());
        fork.internal = self.internal.clone();
        fork.hook = self.hook.clone();
        fork.next_int_tid = self.next_int_tid;
        fork.next_ext_tid = self.next_ext_tid;
        fork.largest_internal = self.largest_internal;
        fork.type_metadata_tid = self.type_metadata_tid;
        fork.template_metadata_tid = self.template_metadata_tid;
        fork
    }
}
