//! IANA-standard information elements preloaded into every model.
//!
//! A practical subset of the IANA "IPFIX Information Elements" registry:
//! the flow core, counters, timestamps, the RFC 6313 structured-data
//! elements, and the RFC 5610 type-information elements. Anything else can
//! be added at runtime or loaded from the registry XML.

use crate::info_model::{InfoElement, InfoModel};
use crate::values::{DataType as T, Semantic as S, Unit as U, VARLEN};

/// Private enterprise number of CERT/SEI, which defines the template
/// metadata elements.
pub(crate) const CERT_PEN: u32 = 6871;

type Def = (&'static str, u16, u16, T, S, U, bool);

#[rustfmt::skip]
static IANA_ELEMENTS: &[Def] = &[
    // name, id, len, type, semantic, units, reversible
    ("octetDeltaCount",                  1,      8, T::Unsigned64,            S::DeltaCounter, U::Octets,   true),
    ("packetDeltaCount",                 2,      8, T::Unsigned64,            S::DeltaCounter, U::Packets,  true),
    ("protocolIdentifier",               4,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("ipClassOfService",                 5,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("tcpControlBits",                   6,      2, T::Unsigned16,            S::Flags,        U::None,     true),
    ("sourceTransportPort",              7,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("sourceIPv4Address",                8,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("sourceIPv4PrefixLength",           9,      1, T::Unsigned8,             S::Quantity,     U::None,     false),
    ("ingressInterface",                10,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("destinationTransportPort",        11,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("destinationIPv4Address",          12,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("destinationIPv4PrefixLength",     13,      1, T::Unsigned8,             S::Quantity,     U::None,     false),
    ("egressInterface",                 14,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("ipNextHopIPv4Address",            15,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("bgpSourceAsNumber",               16,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("bgpDestinationAsNumber",          17,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("bgpNextHopIPv4Address",           18,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("postMCastPacketDeltaCount",       19,      8, T::Unsigned64,            S::DeltaCounter, U::Packets,  true),
    ("postMCastOctetDeltaCount",        20,      8, T::Unsigned64,            S::DeltaCounter, U::Octets,   true),
    ("flowEndSysUpTime",                21,      4, T::Unsigned32,            S::Quantity,     U::Milliseconds, false),
    ("flowStartSysUpTime",              22,      4, T::Unsigned32,            S::Quantity,     U::Milliseconds, false),
    ("postOctetDeltaCount",             23,      8, T::Unsigned64,            S::DeltaCounter, U::Octets,   true),
    ("postPacketDeltaCount",            24,      8, T::Unsigned64,            S::DeltaCounter, U::Packets,  true),
    ("minimumIpTotalLength",            25,      8, T::Unsigned64,            S::Quantity,     U::Octets,   true),
    ("maximumIpTotalLength",            26,      8, T::Unsigned64,            S::Quantity,     U::Octets,   true),
    ("sourceIPv6Address",               27,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("destinationIPv6Address",          28,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("sourceIPv6PrefixLength",          29,      1, T::Unsigned8,             S::Quantity,     U::None,     false),
    ("destinationIPv6PrefixLength",     30,      1, T::Unsigned8,             S::Quantity,     U::None,     false),
    ("flowLabelIPv6",                   31,      4, T::Unsigned32,            S::Identifier,   U::None,     true),
    ("icmpTypeCodeIPv4",                32,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("igmpType",                        33,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("samplingInterval",                34,      4, T::Unsigned32,            S::Quantity,     U::Packets,  false),
    ("samplingAlgorithm",               35,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("flowActiveTimeout",               36,      2, T::Unsigned16,            S::Quantity,     U::Seconds,  false),
    ("flowIdleTimeout",                 37,      2, T::Unsigned16,            S::Quantity,     U::Seconds,  false),
    ("engineType",                      38,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("engineId",                        39,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("exportedOctetTotalCount",         40,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   false),
    ("exportedMessageTotalCount",       41,      8, T::Unsigned64,            S::TotalCounter, U::Messages, false),
    ("exportedFlowRecordTotalCount",    42,      8, T::Unsigned64,            S::TotalCounter, U::Flows,    false),
    ("sourceIPv4Prefix",                44,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("destinationIPv4Prefix",           45,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("mplsTopLabelType",                46,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("mplsTopLabelIPv4Address",         47,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("samplerId",                       48,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("samplerMode",                     49,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("samplerRandomInterval",           50,      4, T::Unsigned32,            S::Quantity,     U::None,     false),
    ("classId",                         51,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("minimumTTL",                      52,      1, T::Unsigned8,             S::Quantity,     U::Hops,     true),
    ("maximumTTL",                      53,      1, T::Unsigned8,             S::Quantity,     U::Hops,     true),
    ("fragmentIdentification",          54,      4, T::Unsigned32,            S::Identifier,   U::None,     true),
    ("postIpClassOfService",            55,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("sourceMacAddress",                56,      6, T::MacAddress,            S::Identifier,   U::None,     false),
    ("postDestinationMacAddress",       57,      6, T::MacAddress,            S::Identifier,   U::None,     false),
    ("vlanId",                          58,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("postVlanId",                      59,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("ipVersion",                       60,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("flowDirection",                   61,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("ipNextHopIPv6Address",            62,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("bgpNextHopIPv6Address",           63,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("ipv6ExtensionHeaders",            64,      4, T::Unsigned32,            S::Flags,        U::None,     true),
    ("mplsTopLabelStackSection",        70,      3, T::OctetArray,            S::Default,      U::None,     true),
    ("destinationMacAddress",           80,      6, T::MacAddress,            S::Identifier,   U::None,     false),
    ("postSourceMacAddress",            81,      6, T::MacAddress,            S::Identifier,   U::None,     false),
    ("interfaceName",                   82, VARLEN, T::String,                S::Default,      U::None,     false),
    ("interfaceDescription",            83, VARLEN, T::String,                S::Default,      U::None,     false),
    ("samplerName",                     84, VARLEN, T::String,                S::Default,      U::None,     false),
    ("octetTotalCount",                 85,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   true),
    ("packetTotalCount",                86,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("fragmentOffset",                  88,      2, T::Unsigned16,            S::Quantity,     U::None,     true),
    ("forwardingStatus",                89,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("mplsVpnRouteDistinguisher",       90,      8, T::OctetArray,            S::Identifier,   U::None,     false),
    ("mplsTopLabelPrefixLength",        91,      1, T::Unsigned8,             S::Quantity,     U::None,     false),
    ("srcTrafficIndex",                 92,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("dstTrafficIndex",                 93,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("applicationDescription",          94, VARLEN, T::String,                S::Default,      U::None,     false),
    ("applicationId",                   95, VARLEN, T::OctetArray,            S::Identifier,   U::None,     false),
    ("applicationName",                 96, VARLEN, T::String,                S::Default,      U::None,     false),
    ("postIpDiffServCodePoint",         98,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("multicastReplicationFactor",      99,      4, T::Unsigned32,            S::Quantity,     U::None,     true),
    ("classificationEngineId",         101,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("layer2packetSectionOffset",      102,      2, T::Unsigned16,            S::Quantity,     U::Octets,   false),
    ("layer2packetSectionSize",        103,      2, T::Unsigned16,            S::Quantity,     U::Octets,   false),
    ("layer2packetSectionData",        104, VARLEN, T::OctetArray,            S::Default,      U::None,     false),
    ("bgpNextAdjacentAsNumber",        128,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("bgpPrevAdjacentAsNumber",        129,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("exporterIPv4Address",            130,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("exporterIPv6Address",            131,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("droppedOctetDeltaCount",         132,      8, T::Unsigned64,            S::DeltaCounter, U::Octets,   true),
    ("droppedPacketDeltaCount",        133,      8, T::Unsigned64,            S::DeltaCounter, U::Packets,  true),
    ("droppedOctetTotalCount",         134,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   true),
    ("droppedPacketTotalCount",        135,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("flowEndReason",                  136,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("commonPropertiesId",             137,      8, T::Unsigned64,            S::Identifier,   U::None,     false),
    ("observationPointId",             138,      8, T::Unsigned64,            S::Identifier,   U::None,     false),
    ("icmpTypeCodeIPv6",               139,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("mplsTopLabelIPv6Address",        140,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("lineCardId",                     141,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("portId",                         142,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("meteringProcessId",              143,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("exportingProcessId",             144,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("templateId",                     145,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    ("wlanChannelId",                  146,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("wlanSSID",                       147, VARLEN, T::String,                S::Default,      U::None,     false),
    ("flowId",                         148,      8, T::Unsigned64,            S::Identifier,   U::None,     false),
    ("observationDomainId",            149,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("flowStartSeconds",               150,      4, T::DateTimeSeconds,       S::Default,      U::Seconds,  false),
    ("flowEndSeconds",                 151,      4, T::DateTimeSeconds,       S::Default,      U::Seconds,  false),
    ("flowStartMilliseconds",          152,      8, T::DateTimeMilliseconds,  S::Default,      U::Milliseconds, false),
    ("flowEndMilliseconds",            153,      8, T::DateTimeMilliseconds,  S::Default,      U::Milliseconds, false),
    ("flowStartMicroseconds",          154,      8, T::DateTimeMicroseconds,  S::Default,      U::Microseconds, false),
    ("flowEndMicroseconds",            155,      8, T::DateTimeMicroseconds,  S::Default,      U::Microseconds, false),
    ("flowStartNanoseconds",           156,      8, T::DateTimeNanoseconds,   S::Default,      U::Nanoseconds, false),
    ("flowEndNanoseconds",             157,      8, T::DateTimeNanoseconds,   S::Default,      U::Nanoseconds, false),
    ("flowStartDeltaMicroseconds",     158,      4, T::Unsigned32,            S::Quantity,     U::Microseconds, false),
    ("flowEndDeltaMicroseconds",       159,      4, T::Unsigned32,            S::Quantity,     U::Microseconds, false),
    ("systemInitTimeMilliseconds",     160,      8, T::DateTimeMilliseconds,  S::Default,      U::Milliseconds, false),
    ("flowDurationMilliseconds",       161,      4, T::Unsigned32,            S::Quantity,     U::Milliseconds, true),
    ("flowDurationMicroseconds",       162,      4, T::Unsigned32,            S::Quantity,     U::Microseconds, true),
    ("observedFlowTotalCount",         163,      8, T::Unsigned64,            S::TotalCounter, U::Flows,    false),
    ("ignoredPacketTotalCount",        164,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  false),
    ("ignoredOctetTotalCount",         165,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   false),
    ("notSentFlowTotalCount",          166,      8, T::Unsigned64,            S::TotalCounter, U::Flows,    false),
    ("notSentPacketTotalCount",        167,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  false),
    ("notSentOctetTotalCount",         168,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   false),
    ("destinationIPv6Prefix",          169,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("sourceIPv6Prefix",               170,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("postOctetTotalCount",            171,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   true),
    ("postPacketTotalCount",           172,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("flowKeyIndicator",               173,      8, T::Unsigned64,            S::Flags,        U::None,     false),
    ("postMCastPacketTotalCount",      174,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("postMCastOctetTotalCount",       175,      8, T::Unsigned64,            S::TotalCounter, U::Octets,   true),
    ("icmpTypeIPv4",                   176,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("icmpCodeIPv4",                   177,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("icmpTypeIPv6",                   178,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("icmpCodeIPv6",                   179,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("udpSourcePort",                  180,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("udpDestinationPort",             181,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("tcpSourcePort",                  182,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("tcpDestinationPort",             183,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("tcpSequenceNumber",              184,      4, T::Unsigned32,            S::Quantity,     U::None,     true),
    ("tcpAcknowledgementNumber",       185,      4, T::Unsigned32,            S::Quantity,     U::None,     true),
    ("tcpWindowSize",                  186,      2, T::Unsigned16,            S::Quantity,     U::None,     true),
    ("tcpUrgentPointer",               187,      2, T::Unsigned16,            S::Quantity,     U::None,     true),
    ("tcpHeaderLength",                188,      1, T::Unsigned8,             S::Quantity,     U::Octets,   true),
    ("ipHeaderLength",                 189,      1, T::Unsigned8,             S::Quantity,     U::Octets,   true),
    ("totalLengthIPv4",                190,      2, T::Unsigned16,            S::Quantity,     U::Octets,   true),
    ("payloadLengthIPv6",              191,      2, T::Unsigned16,            S::Quantity,     U::Octets,   true),
    ("ipTTL",                          192,      1, T::Unsigned8,             S::Quantity,     U::Hops,     true),
    ("nextHeaderIPv6",                 193,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("mplsPayloadLength",              194,      4, T::Unsigned32,            S::Quantity,     U::Octets,   true),
    ("ipDiffServCodePoint",            195,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("ipPrecedence",                   196,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("fragmentFlags",                  197,      1, T::Unsigned8,             S::Flags,        U::None,     true),
    ("octetDeltaSumOfSquares",         198,      8, T::Unsigned64,            S::DeltaCounter, U::None,     true),
    ("octetTotalSumOfSquares",         199,      8, T::Unsigned64,            S::TotalCounter, U::None,     true),
    ("mplsTopLabelTTL",                200,      1, T::Unsigned8,             S::Quantity,     U::Hops,     true),
    ("mplsLabelStackLength",           201,      4, T::Unsigned32,            S::Quantity,     U::Octets,   true),
    ("mplsLabelStackDepth",            202,      4, T::Unsigned32,            S::Quantity,     U::Entries,  true),
    ("mplsTopLabelExp",                203,      1, T::Unsigned8,             S::Flags,        U::None,     true),
    ("ipPayloadLength",                204,      4, T::Unsigned32,            S::Quantity,     U::Octets,   true),
    ("udpMessageLength",               205,      2, T::Unsigned16,            S::Quantity,     U::Octets,   true),
    ("isMulticast",                    206,      1, T::Unsigned8,             S::Flags,        U::None,     true),
    ("ipv4IHL",                        207,      1, T::Unsigned8,             S::Quantity,     U::FourOctetWords, true),
    ("ipv4Options",                    208,      4, T::Unsigned32,            S::Flags,        U::None,     true),
    ("tcpOptions",                     209,      8, T::Unsigned64,            S::Flags,        U::None,     true),
    ("paddingOctets",                  210, VARLEN, T::OctetArray,            S::Default,      U::None,     false),
    ("collectorIPv4Address",           211,      4, T::Ipv4Address,           S::Default,      U::None,     false),
    ("collectorIPv6Address",           212,     16, T::Ipv6Address,           S::Default,      U::None,     false),
    ("exportInterface",                213,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("exportProtocolVersion",          214,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("exportTransportProtocol",        215,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("collectorTransportPort",         216,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("exporterTransportPort",          217,      2, T::Unsigned16,            S::Identifier,   U::Ports,    false),
    ("tcpSynTotalCount",               218,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("tcpFinTotalCount",               219,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("tcpRstTotalCount",               220,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("tcpPshTotalCount",               221,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("tcpAckTotalCount",               222,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("tcpUrgTotalCount",               223,      8, T::Unsigned64,            S::TotalCounter, U::Packets,  true),
    ("ipTotalLength",                  224,      8, T::Unsigned64,            S::Quantity,     U::Octets,   true),
    ("postNATSourceIPv4Address",       225,      4, T::Ipv4Address,           S::Default,      U::None,     true),
    ("postNATDestinationIPv4Address",  226,      4, T::Ipv4Address,           S::Default,      U::None,     true),
    ("postNAPTSourceTransportPort",    227,      2, T::Unsigned16,            S::Identifier,   U::Ports,    true),
    ("postNAPTDestinationTransportPort", 228,    2, T::Unsigned16,            S::Identifier,   U::Ports,    true),
    ("natOriginatingAddressRealm",     229,      1, T::Unsigned8,             S::Flags,        U::None,     true),
    ("natEvent",                       230,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("initiatorOctets",                231,      8, T::Unsigned64,            S::DeltaCounter, U::Octets,   true),
    ("responderOctets",                232,      8, T::Unsigned64,            S::DeltaCounter, U::Octets,   true),
    ("firewallEvent",                  233,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("ingressVRFID",                   234,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("egressVRFID",                    235,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("biflowDirection",                239,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("ethernetHeaderLength",           240,      1, T::Unsigned8,             S::Quantity,     U::Octets,   true),
    ("ethernetPayloadLength",          241,      2, T::Unsigned16,            S::Quantity,     U::Octets,   true),
    ("ethernetTotalLength",            242,      2, T::Unsigned16,            S::Quantity,     U::Octets,   true),
    ("dot1qVlanId",                    243,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("dot1qPriority",                  244,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("dot1qCustomerVlanId",            245,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("metroEvcId",                     246, VARLEN, T::String,                S::Default,      U::None,     true),
    ("metroEvcType",                   247,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("pseudoWireId",                   248,      4, T::Unsigned32,            S::Identifier,   U::None,     true),
    ("pseudoWireType",                 249,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("pseudoWireControlWord",          250,      4, T::Unsigned32,            S::Flags,        U::None,     true),
    ("ingressPhysicalInterface",       251,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("egressPhysicalInterface",        252,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
    ("postDot1qVlanId",                254,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("postDot1qCustomerVlanId",        255,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("ethernetType",                   256,      2, T::Unsigned16,            S::Identifier,   U::None,     true),
    ("collectionTimeMilliseconds",     258,      8, T::DateTimeMilliseconds,  S::Default,      U::Milliseconds, false),
    ("exportSctpStreamId",             259,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    ("maxExportSeconds",               260,      4, T::DateTimeSeconds,       S::Default,      U::Seconds,  false),
    ("maxFlowEndSeconds",              261,      4, T::DateTimeSeconds,       S::Default,      U::Seconds,  false),
    ("messageMD5Checksum",             262,     16, T::OctetArray,            S::Default,      U::None,     false),
    ("messageScope",                   263,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("minExportSeconds",               264,      4, T::DateTimeSeconds,       S::Default,      U::Seconds,  false),
    ("minFlowStartSeconds",            265,      4, T::DateTimeSeconds,       S::Default,      U::Seconds,  false),
    ("opaqueOctets",                   266, VARLEN, T::OctetArray,            S::Default,      U::None,     false),
    ("sessionScope",                   267,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("maxFlowEndMicroseconds",         268,      8, T::DateTimeMicroseconds,  S::Default,      U::Microseconds, false),
    ("maxFlowEndMilliseconds",         269,      8, T::DateTimeMilliseconds,  S::Default,      U::Milliseconds, false),
    ("maxFlowEndNanoseconds",          270,      8, T::DateTimeNanoseconds,   S::Default,      U::Nanoseconds, false),
    ("minFlowStartMicroseconds",       271,      8, T::DateTimeMicroseconds,  S::Default,      U::Microseconds, false),
    ("minFlowStartMilliseconds",       272,      8, T::DateTimeMilliseconds,  S::Default,      U::Milliseconds, false),
    ("minFlowStartNanoseconds",        273,      8, T::DateTimeNanoseconds,   S::Default,      U::Nanoseconds, false),
    ("collectorCertificate",           274, VARLEN, T::OctetArray,            S::Default,      U::None,     false),
    ("exporterCertificate",            275, VARLEN, T::OctetArray,            S::Default,      U::None,     false),
    ("dataRecordsReliability",         276,      1, T::Boolean,               S::Default,      U::None,     false),
    ("observationPointType",           277,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("newConnectionDeltaCount",        278,      4, T::Unsigned32,            S::DeltaCounter, U::None,     true),
    ("connectionSumDurationSeconds",   279,      8, T::Unsigned64,            S::Quantity,     U::Seconds,  true),
    ("connectionTransactionId",        280,      8, T::Unsigned64,            S::Identifier,   U::None,     true),
    ("postNATSourceIPv6Address",       281,     16, T::Ipv6Address,           S::Default,      U::None,     true),
    ("postNATDestinationIPv6Address",  282,     16, T::Ipv6Address,           S::Default,      U::None,     true),
    ("natPoolId",                      283,      4, T::Unsigned32,            S::Identifier,   U::None,     true),
    ("natPoolName",                    284, VARLEN, T::String,                S::Default,      U::None,     true),
    ("anonymizationFlags",             285,      2, T::Unsigned16,            S::Flags,        U::None,     false),
    ("anonymizationTechnique",         286,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    ("informationElementIndex",        287,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    // RFC 6313 structured data
    ("basicList",                      291, VARLEN, T::BasicList,             S::List,         U::None,     false),
    ("subTemplateList",                292, VARLEN, T::SubTemplateList,       S::List,         U::None,     false),
    ("subTemplateMultiList",           293, VARLEN, T::SubTemplateMultiList,  S::List,         U::None,     false),
    ("bgpValidityState",               294,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("IPSecSPI",                       295,      4, T::Unsigned32,            S::Identifier,   U::None,     true),
    ("greKey",                         296,      4, T::Unsigned32,            S::Identifier,   U::None,     true),
    ("natType",                        297,      1, T::Unsigned8,             S::Identifier,   U::None,     true),
    ("initiatorPackets",               298,      8, T::Unsigned64,            S::DeltaCounter, U::Packets,  true),
    ("responderPackets",               299,      8, T::Unsigned64,            S::DeltaCounter, U::Packets,  true),
    ("observationDomainName",          300, VARLEN, T::String,                S::Default,      U::None,     false),
    ("selectionSequenceId",            301,      8, T::Unsigned64,            S::Identifier,   U::None,     false),
    ("selectorId",                     302,      8, T::Unsigned64,            S::Identifier,   U::None,     false),
    ("informationElementId",           303,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    ("selectorAlgorithm",              304,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    ("samplingPacketInterval",         305,      4, T::Unsigned32,            S::Quantity,     U::Packets,  false),
    ("samplingPacketSpace",            306,      4, T::Unsigned32,            S::Quantity,     U::Packets,  false),
    // RFC 5610 information element type information
    ("informationElementDataType",     339,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("informationElementDescription",  340, VARLEN, T::String,                S::Default,      U::None,     false),
    ("informationElementName",         341, VARLEN, T::String,                S::Default,      U::None,     false),
    ("informationElementRangeBegin",   342,      8, T::Unsigned64,            S::Quantity,     U::None,     false),
    ("informationElementRangeEnd",     343,      8, T::Unsigned64,            S::Quantity,     U::None,     false),
    ("informationElementSemantics",    344,      1, T::Unsigned8,             S::Identifier,   U::None,     false),
    ("informationElementUnits",        345,      2, T::Unsigned16,            S::Identifier,   U::None,     false),
    ("privateEnterpriseNumber",        346,      4, T::Unsigned32,            S::Identifier,   U::None,     false),
];

#[rustfmt::skip]
static CERT_ELEMENTS: &[Def] = &[
    ("templateName",                  1000, VARLEN, T::String,                S::Default,      U::None,     false),
    ("templateDescription",           1001, VARLEN, T::String,                S::Default,      U::None,     false),
];

pub(crate) fn preload(model: &InfoModel) {
    for &(name, num, len, ty, sem, unit, rev) in IANA_ELEMENTS {
        model.add(
            InfoElement::new(name, 0, num, ty)
                .with_len(len)
                .with_semantic(sem)
                .with_unit(unit)
                .reversible(rev),
        );
    }
    for &(name, num, len, ty, sem, unit, rev) in CERT_ELEMENTS {
        model.add(
            InfoElement::new(name, CERT_PEN, num, ty)
                .with_len(len)
                .with_semantic(sem)
                .with_unit(unit)
                .reversible(rev),
        );
    }
}
