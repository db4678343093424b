//! Abstract data types and runtime field values.
//!
//! Every information element carries one of the abstract data types from the
//! RFC 5610 registry. A decoded field is a [`Value`] — one variant per
//! abstract type — and the codec here handles reduced-length encoding for
//! integers (RFC 7011 section 6.2) plus the 1- and 3-octet variable-length
//! prefixes.

use crate::lists::{BasicList, SubTemplateList, SubTemplateMultiList};
use crate::{Error, Result};

use serde::Serialize;

use std::net::{Ipv4Addr, Ipv6Addr};

/// Field length sentinel marking a variable-length information element.
pub const VARLEN: u16 = u16::MAX;

/// Abstract data types from the IANA "informationElementDataType" registry
/// (RFC 5610). Discriminants are the registry codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DataType {
    OctetArray = 0,
    Unsigned8 = 1,
    Unsigned16 = 2,
    Unsigned32 = 3,
    Unsigned64 = 4,
    Signed8 = 5,
    Signed16 = 6,
    Signed32 = 7,
    Signed64 = 8,
    Float32 = 9,
    Float64 = 10,
    Boolean = 11,
    MacAddress = 12,
    String = 13,
    DateTimeSeconds = 14,
    DateTimeMilliseconds = 15,
    DateTimeMicroseconds = 16,
    DateTimeNanoseconds = 17,
    Ipv4Address = 18,
    Ipv6Address = 19,
    BasicList = 20,
    SubTemplateList = 21,
    SubTemplateMultiList = 22,
}

impl DataType {
    /// Registry code of this type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Translates a registry code back into a type.
    pub fn from_code(code: u8) -> Option<DataType> {
        use DataType::*;
        Some(match code {
            0 => OctetArray,
            1 => Unsigned8,
            2 => Unsigned16,
            3 => Unsigned32,
            4 => Unsigned64,
            5 => Signed8,
            6 => Signed16,
            7 => Signed32,
            8 => Signed64,
            9 => Float32,
            10 => Float64,
            11 => Boolean,
            12 => MacAddress,
            13 => String,
            14 => DateTimeSeconds,
            15 => DateTimeMilliseconds,
            16 => DateTimeMicroseconds,
            17 => DateTimeNanoseconds,
            18 => Ipv4Address,
            19 => Ipv6Address,
            20 => BasicList,
            21 => SubTemplateList,
            22 => SubTemplateMultiList,
            _ => return None,
        })
    }

    /// Registry name, as it appears in the IANA XML registry.
    pub fn name(self) -> &'static str {
        use DataType::*;
        match self {
            OctetArray => "octetArray",
            Unsigned8 => "unsigned8",
            Unsigned16 => "unsigned16",
            Unsigned32 => "unsigned32",
            Unsigned64 => "unsigned64",
            Signed8 => "signed8",
            Signed16 => "signed16",
            Signed32 => "signed32",
            Signed64 => "signed64",
            Float32 => "float32",
            Float64 => "float64",
            Boolean => "boolean",
            MacAddress => "macAddress",
            String => "string",
            DateTimeSeconds => "dateTimeSeconds",
            DateTimeMilliseconds => "dateTimeMilliseconds",
            DateTimeMicroseconds => "dateTimeMicroseconds",
            DateTimeNanoseconds => "dateTimeNanoseconds",
            Ipv4Address => "ipv4Address",
            Ipv6Address => "ipv6Address",
            BasicList => "basicList",
            SubTemplateList => "subTemplateList",
            SubTemplateMultiList => "subTemplateMultiList",
        }
    }

    /// Reverse of [`DataType::name`].
    pub fn from_name(name: &str) -> Option<DataType> {
        (0..=22).filter_map(DataType::from_code).find(|t| t.name() == name)
    }

    /// Default on-wire length in octets, or [`VARLEN`] for types without a
    /// fixed width.
    pub fn default_len(self) -> u16 {
        use DataType::*;
        match self {
            Unsigned8 | Signed8 | Boolean => 1,
            Unsigned16 | Signed16 => 2,
            Unsigned32 | Signed32 | Float32 | DateTimeSeconds | Ipv4Address => 4,
            MacAddress => 6,
            Unsigned64 | Signed64 | Float64 | DateTimeMilliseconds | DateTimeMicroseconds
            | DateTimeNanoseconds => 8,
            Ipv6Address => 16,
            OctetArray | String | BasicList | SubTemplateList | SubTemplateMultiList => VARLEN,
        }
    }

    pub fn is_unsigned(self) -> bool {
        use DataType::*;
        matches!(self, Unsigned8 | Unsigned16 | Unsigned32 | Unsigned64)
    }

    pub fn is_signed(self) -> bool {
        use DataType::*;
        matches!(self, Signed8 | Signed16 | Signed32 | Signed64)
    }

    pub fn is_integer(self) -> bool {
        self.is_unsigned() || self.is_signed()
    }

    /// One of the three RFC 6313 structured-data types.
    pub fn is_list(self) -> bool {
        use DataType::*;
        matches!(self, BasicList | SubTemplateList | SubTemplateMultiList)
    }

    /// True for types whose multi-octet wire form is big-endian and must be
    /// byte-swapped on little-endian hosts.
    pub fn endian_sensitive(self) -> bool {
        use DataType::*;
        self.is_integer()
            || matches!(
                self,
                Float32
                    | Float64
                    | DateTimeSeconds
                    | DateTimeMilliseconds
                    | DateTimeMicroseconds
                    | DateTimeNanoseconds
            )
    }

    /// Checks a template field length override against this type.
    ///
    /// Integers accept any reduced length between 1 and their natural width;
    /// `float64` additionally accepts 4 (encoded as an f32); the
    /// variable-length-capable types accept anything including the [`VARLEN`]
    /// sentinel; everything else must match the natural width exactly.
    pub fn valid_len(self, len: u16) -> bool {
        use DataType::*;
        match self {
            OctetArray | String | BasicList | SubTemplateList | SubTemplateMultiList => true,
            Float64 => len == 4 || len == 8,
            _ if self.is_integer() => len >= 1 && len <= self.default_len(),
            _ => len == self.default_len(),
        }
    }
}

/// Data semantics from the IANA "informationElementSemantics" registry
/// (RFC 5610).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[repr(u8)]
pub enum Semantic {
    #[default]
    Default = 0,
    Quantity = 1,
    TotalCounter = 2,
    DeltaCounter = 3,
    Identifier = 4,
    Flags = 5,
    List = 6,
    SnmpCounter = 7,
    SnmpGauge = 8,
}

impl Semantic {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Semantic> {
        use Semantic::*;
        Some(match code {
            0 => Default,
            1 => Quantity,
            2 => TotalCounter,
            3 => DeltaCounter,
            4 => Identifier,
            5 => Flags,
            6 => List,
            7 => SnmpCounter,
            8 => SnmpGauge,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        use Semantic::*;
        match self {
            Default => "default",
            Quantity => "quantity",
            TotalCounter => "totalCounter",
            DeltaCounter => "deltaCounter",
            Identifier => "identifier",
            Flags => "flags",
            List => "list",
            SnmpCounter => "snmpCounter",
            SnmpGauge => "snmpGauge",
        }
    }

    pub fn from_name(name: &str) -> Option<Semantic> {
        (0..=8).filter_map(Semantic::from_code).find(|s| s.name() == name)
    }
}

/// Data units from the IANA "informationElementUnits" registry (RFC 5610).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[repr(u16)]
pub enum Unit {
    #[default]
    None = 0,
    Bits = 1,
    Octets = 2,
    Packets = 3,
    Flows = 4,
    Seconds = 5,
    Milliseconds = 6,
    Microseconds = 7,
    Nanoseconds = 8,
    FourOctetWords = 9,
    Messages = 10,
    Hops = 11,
    Entries = 12,
    Frames = 13,
    Ports = 14,
    Inferred = 15,
}

impl Unit {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Unit> {
        use Unit::*;
        Some(match code {
            0 => None,
            1 => Bits,
            2 => Octets,
            3 => Packets,
            4 => Flows,
            5 => Seconds,
            6 => Milliseconds,
            7 => Microseconds,
            8 => Nanoseconds,
            9 => FourOctetWords,
            10 => Messages,
            11 => Hops,
            12 => Entries,
            13 => Frames,
            14 => Ports,
            15 => Inferred,
            _ => return Option::None,
        })
    }

    pub fn name(self) -> &'static str {
        use Unit::*;
        match self {
            None => "none",
            Bits => "bits",
            Octets => "octets",
            Packets => "packets",
            Flows => "flows",
            Seconds => "seconds",
            Milliseconds => "milliseconds",
            Microseconds => "microseconds",
            Nanoseconds => "nanoseconds",
            FourOctetWords => "4-octet words",
            Messages => "messages",
            Hops => "hops",
            Entries => "entries",
            Frames => "frames",
            Ports => "ports",
            Inferred => "inferred",
        }
    }

    pub fn from_name(name: &str) -> Option<Unit> {
        (0..=15).filter_map(Unit::from_code).find(|u| u.name() == name)
    }
}

/// One decoded field value.
///
/// Variable-length content decoded from the wire is owned by the value; the
/// message buffer it came from may be reused freely afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    OctetArray(Vec<u8>),
    Unsigned8(u8),
    Unsigned16(u16),
    Unsigned32(u32),
    Unsigned64(u64),
    Signed8(i8),
    Signed16(i16),
    Signed32(i32),
    Signed64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    MacAddress([u8; 6]),
    String(String),
    DateTimeSeconds(u32),
    DateTimeMilliseconds(u64),
    DateTimeMicroseconds(u64),
    DateTimeNanoseconds(u64),
    Ipv4Address(Ipv4Addr),
    Ipv6Address(Ipv6Addr),
    BasicList(BasicList),
    SubTemplateList(SubTemplateList),
    SubTemplateMultiList(SubTemplateMultiList),
}

impl Value {
    /// The abstract data type this value belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::OctetArray(_) => DataType::OctetArray,
            Value::Unsigned8(_) => DataType::Unsigned8,
            Value::Unsigned16(_) => DataType::Unsigned16,
            Value::Unsigned32(_) => DataType::Unsigned32,
            Value::Unsigned64(_) => DataType::Unsigned64,
            Value::Signed8(_) => DataType::Signed8,
            Value::Signed16(_) => DataType::Signed16,
            Value::Signed32(_) => DataType::Signed32,
            Value::Signed64(_) => DataType::Signed64,
            Value::Float32(_) => DataType::Float32,
            Value::Float64(_) => DataType::Float64,
            Value::Boolean(_) => DataType::Boolean,
            Value::MacAddress(_) => DataType::MacAddress,
            Value::String(_) => DataType::String,
            Value::DateTimeSeconds(_) => DataType::DateTimeSeconds,
            Value::DateTimeMilliseconds(_) => DataType::DateTimeMilliseconds,
            Value::DateTimeMicroseconds(_) => DataType::DateTimeMicroseconds,
            Value::DateTimeNanoseconds(_) => DataType::DateTimeNanoseconds,
            Value::Ipv4Address(_) => DataType::Ipv4Address,
            Value::Ipv6Address(_) => DataType::Ipv6Address,
            Value::BasicList(_) => DataType::BasicList,
            Value::SubTemplateList(_) => DataType::SubTemplateList,
            Value::SubTemplateMultiList(_) => DataType::SubTemplateMultiList,
        }
    }

    /// The zero value of a type, used when an internal-only field has no
    /// external counterpart to decode from.
    pub fn default_for(ty: DataType) -> Value {
        match ty {
            DataType::OctetArray => Value::OctetArray(Vec::new()),
            DataType::Unsigned8 => Value::Unsigned8(0),
            DataType::Unsigned16 => Value::Unsigned16(0),
            DataType::Unsigned32 => Value::Unsigned32(0),
            DataType::Unsigned64 => Value::Unsigned64(0),
            DataType::Signed8 => Value::Signed8(0),
            DataType::Signed16 => Value::Signed16(0),
            DataType::Signed32 => Value::Signed32(0),
            DataType::Signed64 => Value::Signed64(0),
            DataType::Float32 => Value::Float32(0.0),
            DataType::Float64 => Value::Float64(0.0),
            DataType::Boolean => Value::Boolean(false),
            DataType::MacAddress => Value::MacAddress([0; 6]),
            DataType::String => Value::String(String::new()),
            DataType::DateTimeSeconds => Value::DateTimeSeconds(0),
            DataType::DateTimeMilliseconds => Value::DateTimeMilliseconds(0),
            DataType::DateTimeMicroseconds => Value::DateTimeMicroseconds(0),
            DataType::DateTimeNanoseconds => Value::DateTimeNanoseconds(0),
            DataType::Ipv4Address => Value::Ipv4Address(Ipv4Addr::UNSPECIFIED),
            DataType::Ipv6Address => Value::Ipv6Address(Ipv6Addr::UNSPECIFIED),
            DataType::BasicList => Value::BasicList(BasicList::default()),
            DataType::SubTemplateList => Value::SubTemplateList(SubTemplateList::default()),
            DataType::SubTemplateMultiList => {
                Value::SubTemplateMultiList(SubTemplateMultiList::default())
            }
        }
    }

    /// Reads one fixed-length field of type `ty` occupying `len` octets.
    ///
    /// Reduced-length integers expand to the type's natural width
    /// (sign-extended for the signed types); a `float64` at 4 octets reads an
    /// f32. List types are handled by the transcoder, not here.
    pub fn read(buf: &[u8], ty: DataType, len: u16) -> Result<(Value, &[u8])> {
        let len = len as usize;
        if buf.len() < len {
            return Err(Error::InvalidIpfix(format!(
                "field of {len} octets overruns its set ({} left)",
                buf.len()
            )));
        }
        let (bytes, rest) = buf.split_at(len);
        let value = match ty {
            DataType::OctetArray => Value::OctetArray(bytes.to_vec()),
            DataType::Unsigned8 => Value::Unsigned8(read_unsigned(bytes) as u8),
            DataType::Unsigned16 => Value::Unsigned16(read_unsigned(bytes) as u16),
            DataType::Unsigned32 => Value::Unsigned32(read_unsigned(bytes) as u32),
            DataType::Unsigned64 => Value::Unsigned64(read_unsigned(bytes)),
            DataType::Signed8 => Value::Signed8(read_signed(bytes) as i8),
            DataType::Signed16 => Value::Signed16(read_signed(bytes) as i16),
            DataType::Signed32 => Value::Signed32(read_signed(bytes) as i32),
            DataType::Signed64 => Value::Signed64(read_signed(bytes)),
            DataType::Float32 => {
                let raw = fixed::<4>(bytes)?;
                Value::Float32(f32::from_be_bytes(raw))
            }
            DataType::Float64 => {
                if bytes.len() == 4 {
                    let raw = fixed::<4>(bytes)?;
                    Value::Float64(f64::from(f32::from_be_bytes(raw)))
                } else {
                    let raw = fixed::<8>(bytes)?;
                    Value::Float64(f64::from_be_bytes(raw))
                }
            }
            // RFC 7011 section 6.1.5: 1 encodes true, 2 encodes false.
            DataType::Boolean => Value::Boolean(bytes.first().copied() == Some(1)),
            DataType::MacAddress => Value::MacAddress(fixed::<6>(bytes)?),
            DataType::String => {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
                Value::String(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }
            DataType::DateTimeSeconds => Value::DateTimeSeconds(read_unsigned(bytes) as u32),
            DataType::DateTimeMilliseconds => Value::DateTimeMilliseconds(read_unsigned(bytes)),
            DataType::DateTimeMicroseconds => Value::DateTimeMicroseconds(read_unsigned(bytes)),
            DataType::DateTimeNanoseconds => Value::DateTimeNanoseconds(read_unsigned(bytes)),
            DataType::Ipv4Address => Value::Ipv4Address(Ipv4Addr::from(fixed::<4>(bytes)?)),
            DataType::Ipv6Address => Value::Ipv6Address(Ipv6Addr::from(fixed::<16>(bytes)?)),
            DataType::BasicList | DataType::SubTemplateList | DataType::SubTemplateMultiList => {
                return Err(Error::InvalidIpfix(
                    "structured data must be decoded through a session".into(),
                ));
            }
        };
        Ok((value, rest))
    }

    /// Writes this value as a fixed-length field of `len` octets.
    ///
    /// Integers truncate to the reduced length big-endian; strings and octet
    /// arrays pad with zeroes or truncate to fit.
    pub fn write(&self, out: &mut Vec<u8>, len: u16) -> Result<()> {
        let len = len as usize;
        match self {
            Value::OctetArray(bytes) => write_padded(out, bytes, len),
            Value::Unsigned8(v) => write_unsigned(out, u64::from(*v), len),
            Value::Unsigned16(v) => write_unsigned(out, u64::from(*v), len),
            Value::Unsigned32(v) => write_unsigned(out, u64::from(*v), len),
            Value::Unsigned64(v) => write_unsigned(out, *v, len),
            Value::Signed8(v) => write_unsigned(out, *v as u64, len),
            Value::Signed16(v) => write_unsigned(out, *v as u64, len),
            Value::Signed32(v) => write_unsigned(out, *v as u64, len),
            Value::Signed64(v) => write_unsigned(out, *v as u64, len),
            Value::Float32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Value::Float64(v) => {
                if len == 4 {
                    out.extend_from_slice(&(*v as f32).to_be_bytes());
                } else {
                    out.extend_from_slice(&v.to_be_bytes());
                }
            }
            Value::Boolean(v) => out.push(if *v { 1 } else { 2 }),
            Value::MacAddress(mac) => out.extend_from_slice(mac),
            Value::String(s) => write_padded(out, s.as_bytes(), len),
            Value::DateTimeSeconds(v) => write_unsigned(out, u64::from(*v), len),
            Value::DateTimeMilliseconds(v)
            | Value::DateTimeMicroseconds(v)
            | Value::DateTimeNanoseconds(v) => write_unsigned(out, *v, len),
            Value::Ipv4Address(ip) => out.extend_from_slice(&ip.octets()),
            Value::Ipv6Address(ip) => out.extend_from_slice(&ip.octets()),
            Value::BasicList(_) | Value::SubTemplateList(_) | Value::SubTemplateMultiList(_) => {
                return Err(Error::Setup(
                    "structured data must be encoded through a session".into(),
                ));
            }
        }
        Ok(())
    }

    /// Content bytes of a variable-length string or octet array.
    pub(crate) fn varlen_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetArray(bytes) => Some(bytes),
            Value::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| Error::InvalidIpfix(format!("expected {N} octets, found {}", bytes.len())))
}

fn read_unsigned(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn read_signed(bytes: &[u8]) -> i64 {
    if bytes.is_empty() {
        return 0;
    }
    let raw = read_unsigned(bytes);
    let bits = bytes.len() as u32 * 8;
    if bits >= 64 {
        raw as i64
    } else if raw & (1 << (bits - 1)) != 0 {
        // sign-extend
        (raw | !((1u64 << bits) - 1)) as i64
    } else {
        raw as i64
    }
}

fn write_unsigned(out: &mut Vec<u8>, value: u64, len: usize) {
    let be = value.to_be_bytes();
    let len = len.min(8);
    out.extend_from_slice(&be[8 - len..]);
}

fn write_padded(out: &mut Vec<u8>, bytes: &[u8], len: usize) {
    if bytes.len() >= len {
        out.extend_from_slice(&bytes[..len]);
    } else {
        out.extend_from_slice(bytes);
        out.resize(out.len() + (len - bytes.len()), 0);
    }
}

/// Reads a variable-length prefix: one octet below 255, otherwise 0xFF
/// followed by the real length in two octets.
pub(crate) fn read_varlen(buf: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = match buf {
        [0xFF, hi, lo, rest @ ..] => (usize::from(u16::from_be_bytes([*hi, *lo])), rest),
        [len, rest @ ..] if *len < 0xFF => (usize::from(*len), rest),
        _ => {
            return Err(Error::InvalidIpfix(
                "truncated variable-length prefix".into(),
            ));
        }
    };
    if rest.len() < len {
        return Err(Error::InvalidIpfix(format!(
            "variable-length field of {len} octets overruns its set ({} left)",
            rest.len()
        )));
    }
    Ok(rest.split_at(len))
}

/// Writes the variable-length prefix for `len` content octets.
pub(crate) fn write_varlen_prefix(out: &mut Vec<u8>, len: usize) {
    if len < 0xFF {
        out.push(len as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn reduced_length_unsigned_expands() {
        let wire = [0xDE, 0xAD, 0xBE, 0xEF];
        let (v, rest) = Value::read(&wire, DataType::Unsigned64, 4).unwrap();
        assert!(rest.is_empty());
        assert_eq!(v, Value::Unsigned64(0x0000_0000_DEAD_BEEF));
    }

    #[test]
    fn reduced_length_signed_sign_extends() {
        let (v, _) = Value::read(&[0xFF, 0xFE], DataType::Signed32, 2).unwrap();
        assert_eq!(v, Value::Signed32(-2));
        let (v, _) = Value::read(&[0x00, 0x7F], DataType::Signed32, 2).unwrap();
        assert_eq!(v, Value::Signed32(127));
    }

    #[test]
    fn reduced_length_write_truncates() {
        let mut out = Vec::new();
        Value::Unsigned64(0xDEAD_BEEF).write(&mut out, 4).unwrap();
        assert_eq!(out, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn boolean_wire_values() {
        let mut out = Vec::new();
        Value::Boolean(true).write(&mut out, 1).unwrap();
        Value::Boolean(false).write(&mut out, 1).unwrap();
        assert_eq!(out, vec![1, 2]);
        assert_eq!(
            Value::read(&[1], DataType::Boolean, 1).unwrap().0,
            Value::Boolean(true)
        );
        assert_eq!(
            Value::read(&[2], DataType::Boolean, 1).unwrap().0,
            Value::Boolean(false)
        );
    }

    #[test]
    fn float64_at_four_octets() {
        let mut out = Vec::new();
        Value::Float64(1.5).write(&mut out, 4).unwrap();
        assert_eq!(out.len(), 4);
        let (v, _) = Value::read(&out, DataType::Float64, 4).unwrap();
        assert_eq!(v, Value::Float64(1.5));
    }

    #[test]
    fn fixed_string_pads_and_trims() {
        let mut out = Vec::new();
        Value::String("ab".into()).write(&mut out, 4).unwrap();
        assert_eq!(out, b"ab\0\0");
        let (v, _) = Value::read(&out, DataType::String, 4).unwrap();
        assert_eq!(v, Value::String("ab".into()));
    }

    #[test]
    fn varlen_prefix_forms() {
        let mut short = Vec::new();
        write_varlen_prefix(&mut short, 254);
        assert_eq!(short, vec![254]);

        let mut long = Vec::new();
        write_varlen_prefix(&mut long, 255);
        assert_eq!(long, vec![0xFF, 0x00, 0xFF]);

        let mut buf = vec![3];
        buf.extend_from_slice(b"abc");
        let (content, rest) = read_varlen(&buf).unwrap();
        assert_eq!(content, b"abc");
        assert!(rest.is_empty());
    }

    #[test]
    fn varlen_truncated_content_rejected() {
        let buf = [5, b'a', b'b'];
        assert!(matches!(read_varlen(&buf), Err(Error::InvalidIpfix(_))));
        let buf = [0xFF, 0x01];
        assert!(matches!(read_varlen(&buf), Err(Error::InvalidIpfix(_))));
    }

    #[test]
    fn valid_len_rules() {
        assert!(DataType::Unsigned64.valid_len(4));
        assert!(DataType::Unsigned64.valid_len(8));
        assert!(!DataType::Unsigned64.valid_len(9));
        assert!(!DataType::Unsigned64.valid_len(0));
        assert!(DataType::Float64.valid_len(4));
        assert!(!DataType::Float64.valid_len(6));
        assert!(!DataType::Ipv4Address.valid_len(2));
        assert!(DataType::String.valid_len(VARLEN));
        assert!(DataType::String.valid_len(32));
        assert!(!DataType::DateTimeMilliseconds.valid_len(4));
    }

    #[test]
    fn registry_name_round_trips() {
        for code in 0..=22 {
            let ty = DataType::from_code(code).unwrap();
            assert_eq!(DataType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(DataType::from_code(23), None);
        assert_eq!(Semantic::from_name("deltaCounter"), Some(Semantic::DeltaCounter));
        assert_eq!(Unit::from_name("octets"), Some(Unit::Octets));
    }
}
