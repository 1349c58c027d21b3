use std::fmt::Display;

use log::{debug, trace};

use crate::{
    bits::{read_bit, read_bits, take, Bits},
    error::{DecodeError, EvalError},
};

pub const LITERAL_PACKET_TYPE: u8 = 4;

const VERSION_WIDTH: usize = 3;
const TYPE_ID_WIDTH: usize = 3;
const HEADER_WIDTH: usize = VERSION_WIDTH + TYPE_ID_WIDTH;
const LITERAL_GROUP_WIDTH: usize = 5;
const TOTAL_LENGTH_WIDTH: usize = 15;
const SUBPACKET_COUNT_WIDTH: usize = 11;

/// Fewer remaining bits than this at the top level are never a packet.
const MIN_PACKET_WIDTH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Sum,
    Product,
    Minimum,
    Maximum,
    GreaterThan,
    LessThan,
    EqualTo,
}

impl Operator {
    const SUM_PACKET_TYPE: u8 = 0;
    const PRODUCT_PACKET_TYPE: u8 = 1;
    const MIN_PACKET_TYPE: u8 = 2;
    const MAX_PACKET_TYPE: u8 = 3;
    const GREATER_THAN_PACKET_TYPE: u8 = 5;
    const LESS_THAN_PACKET_TYPE: u8 = 6;
    const EQUALS_PACKET_TYPE: u8 = 7;

    /// Fails for the literal type and anything outside the 3-bit range.
    pub fn from_type_id(type_id: u8) -> Result<Self, EvalError> {
        match type_id {
            Self::SUM_PACKET_TYPE => Ok(Self::Sum),
            Self::PRODUCT_PACKET_TYPE => Ok(Self::Product),
            Self::MIN_PACKET_TYPE => Ok(Self::Minimum),
            Self::MAX_PACKET_TYPE => Ok(Self::Maximum),
            Self::GREATER_THAN_PACKET_TYPE => Ok(Self::GreaterThan),
            Self::LESS_THAN_PACKET_TYPE => Ok(Self::LessThan),
            Self::EQUALS_PACKET_TYPE => Ok(Self::EqualTo),
            _ => Err(EvalError::UnknownOperator { type_id }),
        }
    }

    pub fn type_id(self) -> u8 {
        match self {
            Self::Sum => Self::SUM_PACKET_TYPE,
            Self::Product => Self::PRODUCT_PACKET_TYPE,
            Self::Minimum => Self::MIN_PACKET_TYPE,
            Self::Maximum => Self::MAX_PACKET_TYPE,
            Self::GreaterThan => Self::GREATER_THAN_PACKET_TYPE,
            Self::LessThan => Self::LESS_THAN_PACKET_TYPE,
            Self::EqualTo => Self::EQUALS_PACKET_TYPE,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sum => "sum",
            Self::Product => "product",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::GreaterThan => "greater-than",
            Self::LessThan => "less-than",
            Self::EqualTo => "equal-to",
        };

        write!(f, "{} (type {})", name, self.type_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketData {
    Literal(u64),
    Operator {
        operator: Operator,
        children: Vec<Packet>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    version: u8,

    data: PacketData,
}

impl Packet {
    pub fn literal(version: u8, value: u64) -> Self {
        Self {
            version,
            data: PacketData::Literal(value),
        }
    }

    pub fn operator(version: u8, operator: Operator, children: Vec<Packet>) -> Self {
        Self {
            version,
            data: PacketData::Operator { operator, children },
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn type_id(&self) -> u8 {
        match &self.data {
            PacketData::Literal(_) => LITERAL_PACKET_TYPE,
            PacketData::Operator { operator, .. } => operator.type_id(),
        }
    }

    pub fn data(&self) -> &PacketData {
        &self.data
    }

    pub fn children(&self) -> &[Packet] {
        match &self.data {
            PacketData::Literal(_) => &[],
            PacketData::Operator { children, .. } => children,
        }
    }

    /// Depth-first walk over this packet and all of its descendants.
    pub fn iter(&self) -> PacketIterator<'_> {
        PacketIterator::new(self)
    }
}

/// Decodes the packet whose header starts at `offset`, returning it together
/// with the number of bits it occupies, descendants included.
pub fn decode_packet(bits: &Bits, offset: usize) -> Result<(Packet, usize), DecodeError> {
    let version = read_bits(bits, offset, VERSION_WIDTH)? as u8;
    let type_id = read_bits(bits, offset + VERSION_WIDTH, TYPE_ID_WIDTH)? as u8;
    trace!("bit {}: version {}, type {}", offset, version, type_id);

    let body = offset + HEADER_WIDTH;
    let (packet, consumed) = if type_id == LITERAL_PACKET_TYPE {
        let (value, consumed) = read_literal_content(bits, body)?;
        trace!("bit {}: literal {}", offset, value);
        (Packet::literal(version, value), consumed)
    } else {
        let operator = Operator::from_type_id(type_id)?;
        let (children, consumed) = read_subpackets(bits, body)?;
        (Packet::operator(version, operator, children), consumed)
    };

    Ok((packet, HEADER_WIDTH + consumed))
}

fn read_literal_content(bits: &Bits, offset: usize) -> Result<(u64, usize), DecodeError> {
    let mut number = 0u64;
    let mut cursor = offset;

    loop {
        let block = read_bits(bits, cursor, LITERAL_GROUP_WIDTH)?;
        cursor += LITERAL_GROUP_WIDTH;

        if number.leading_zeros() < 4 {
            return Err(DecodeError::LiteralOverflow { offset });
        }
        number = (number << 4) | (block & 0b1111);

        if block & 0b10000 == 0 {
            break;
        }
    }

    Ok((number, cursor - offset))
}

fn read_subpackets(bits: &Bits, offset: usize) -> Result<(Vec<Packet>, usize), DecodeError> {
    let length_type_id = read_bit(bits, offset)?;
    let mut cursor = offset + 1;

    let subpackets = if !length_type_id {
        // length-based subpacket definition, next 15 bits
        let declared = read_bits(bits, cursor, TOTAL_LENGTH_WIDTH)? as usize;
        cursor += TOTAL_LENGTH_WIDTH;
        debug!("bit {}: descending into {} bits of sub-packets", offset, declared);

        // The bound keeps absolute offsets while forbidding reads past the declared range.
        let start = cursor;
        take(bits, start, declared)?;
        let bounded = &bits[..start + declared];

        let mut subpackets = Vec::new();
        while cursor < start + declared {
            let (packet, consumed) = decode_packet(bounded, cursor).map_err(|err| match err {
                DecodeError::TruncatedStream { .. } => DecodeError::MalformedPacket {
                    offset: start,
                    declared,
                    consumed: cursor - start,
                },
                other => other,
            })?;
            subpackets.push(packet);
            cursor += consumed;
        }

        subpackets
    } else {
        // count-based subpacket definition, next 11 bits
        let count = read_bits(bits, cursor, SUBPACKET_COUNT_WIDTH)? as usize;
        cursor += SUBPACKET_COUNT_WIDTH;
        debug!("bit {}: descending into {} sub-packets", offset, count);

        let mut subpackets = Vec::with_capacity(count);
        for _ in 0..count {
            let (packet, consumed) = decode_packet(bits, cursor)?;
            subpackets.push(packet);
            cursor += consumed;
        }

        subpackets
    };
    debug!("bit {}: ascending with {} sub-packets", offset, subpackets.len());

    Ok((subpackets, cursor - offset))
}

/// Decodes top-level packets from the start of the stream. Decoding stops
/// once the remainder is too short for a packet or holds only zero padding.
pub fn decode_transmission(bits: &Bits) -> Result<Vec<Packet>, DecodeError> {
    let mut packets = Vec::new();
    let mut offset = 0;

    while bits.len() - offset >= MIN_PACKET_WIDTH && bits[offset..].count_ones() > 0 {
        let (packet, consumed) = decode_packet(bits, offset)?;
        debug!("top-level packet of {} bits at bit {}", consumed, offset);
        packets.push(packet);
        offset += consumed;
    }
    debug!(
        "decoded {} top-level packets, {} trailing bits",
        packets.len(),
        bits.len() - offset
    );

    Ok(packets)
}

pub struct PacketIterator<'a> {
    stack: Vec<&'a Packet>,
}

impl<'a> PacketIterator<'a> {
    fn new(start: &'a Packet) -> Self {
        Self { stack: vec![start] }
    }
}

impl<'a> Iterator for PacketIterator<'a> {
    type Item = &'a Packet;

    fn next(&mut self) -> Option<Self::Item> {
        let packet = self.stack.pop()?;
        self.stack.extend(packet.children().iter().rev());
        Some(packet)
    }
}
