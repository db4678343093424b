#![doc = include_str!("../README.md")]

pub mod info_model;
pub mod lists;
pub mod message;
pub mod record;
pub mod session;
pub mod template;
pub mod values;

mod iana;
mod metadata;
mod xml_registry;

pub use info_model::{ElementKey, InfoElement, InfoElementSpec, InfoModel};
pub use lists::{BasicList, ListSemantic, MultiListEntry, SubTemplateList, SubTemplateMultiList};
pub use message::{CollectBuffer, ExportBuffer, MessageInfo};
pub use record::Record;
pub use session::{NewTemplateEvent, NewTemplateHook, Session, TID_AUTO};
pub use template::{Template, TemplateField, TemplateMetadata};
pub use values::{DataType, Semantic, Unit, VARLEN, Value};

use thiserror::Error;

/// Protocol version carried in every message header.
pub const IPFIX_VERSION: u16 = 10;

/// Message header size in octets.
pub const MSG_HEADER_LEN: usize = 16;

/// Set header size in octets.
pub const SET_HEADER_LEN: usize = 4;

/// Largest possible IPFIX message (the length field's limit).
pub const MSG_MAX_LEN: usize = 65535;

/// Set ID of a template set.
pub const TEMPLATE_SET_ID: u16 = 2;

/// Set ID of an options template set.
pub const OPTIONS_TEMPLATE_SET_ID: u16 = 3;

/// Smallest template ID (and data set ID) allowed on the wire.
/// Values 4-255 are reserved.
pub const MIN_TEMPLATE_ID: u16 = 256;

/// Private enterprise number holding reverse counterparts of IANA-standard
/// information elements (RFC 5103).
pub const REVERSE_PEN: u32 = 29305;

/// Bit set in the element ID of the reverse counterpart of an
/// enterprise-specific information element (RFC 5103).
pub const REVERSE_ID_BIT: u16 = 0x4000;

/// Errors returned by every fallible operation in this crate.
///
/// Stream-level anomalies that IPFIX practice tolerates (unknown templates
/// on receive, sequence gaps, malformed records inside an otherwise good
/// template set) are logged via the [`log`] facade and do not surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced template ID is not installed in the expected
    /// direction/domain.
    #[error("missing template {tid:#06x} (internal: {internal})")]
    MissingTemplate { tid: u16, internal: bool },

    /// Boundary signal in manual mode: the current message is full (export)
    /// or exhausted (collect). Emit or load the next message and retry.
    #[error("end of message")]
    EndOfMessage,

    /// The collector's source has no further messages.
    #[error("end of stream")]
    EndOfStream,

    /// Malformed message header, set, or variable-length prefix.
    #[error("invalid IPFIX: {0}")]
    InvalidIpfix(String),

    /// A record or message cannot fit the available buffer space.
    #[error("buffer too small: need {needed} octets, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// The requested feature is not available in this build.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection setup or teardown failed in a transport collaborator.
    #[error("connection error: {0}")]
    Connection(String),

    /// Name lookup miss in the information model.
    #[error("no such information element {0:?}")]
    NoSuchElement(String),

    /// A template field length is not compatible with its element's type.
    #[error("invalid length {len} for {element}")]
    InvalidLength { element: String, len: u16 },

    /// API misuse, e.g. appending before templates are selected.
    #[error("setup error: {0}")]
    Setup(String),
}

impl Error {
    /// True for the manual-mode end-of-message boundary signal.
    pub fn is_end_of_message(&self) -> bool {
        matches!(self, Error::EndOfMessage)
    }

    /// True when the collector's source is exhausted.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
