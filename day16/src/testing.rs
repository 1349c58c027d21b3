//! Packet encoders used to build bit streams for tests.

use crate::{
    bits::{BitBuffer, Bits},
    packet::LITERAL_PACKET_TYPE,
};

pub fn push_bits(bits: &mut BitBuffer, value: u64, width: usize) {
    for shift in (0..width).rev() {
        bits.push((value >> shift) & 1 == 1);
    }
}

fn push_slice(bits: &mut BitBuffer, other: &Bits) {
    bits.extend(other.iter().map(|b| *b));
}

fn push_header(bits: &mut BitBuffer, version: u8, type_id: u8) {
    push_bits(bits, version.into(), 3);
    push_bits(bits, type_id.into(), 3);
}

pub fn encode_literal(version: u8, value: u64) -> BitBuffer {
    let mut bits = BitBuffer::new();
    push_header(&mut bits, version, LITERAL_PACKET_TYPE);

    let significant = 64 - value.leading_zeros() as usize;
    let groups = ((significant + 3) / 4).max(1);
    for group in (0..groups).rev() {
        push_bits(&mut bits, (group != 0) as u64, 1);
        push_bits(&mut bits, (value >> (4 * group)) & 0b1111, 4);
    }

    bits
}

/// Frames `children` with an explicit total length, which need not match them.
pub fn encode_by_length(
    version: u8,
    type_id: u8,
    declared: usize,
    children: &[BitBuffer],
) -> BitBuffer {
    let mut bits = BitBuffer::new();
    push_header(&mut bits, version, type_id);
    push_bits(&mut bits, 0, 1);
    push_bits(&mut bits, declared as u64, 15);
    for child in children {
        push_slice(&mut bits, child);
    }

    bits
}

pub fn encode_by_count(version: u8, type_id: u8, children: &[BitBuffer]) -> BitBuffer {
    let mut bits = BitBuffer::new();
    push_header(&mut bits, version, type_id);
    push_bits(&mut bits, 1, 1);
    push_bits(&mut bits, children.len() as u64, 11);
    for child in children {
        push_slice(&mut bits, child);
    }

    bits
}
