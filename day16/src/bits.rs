use bitvec::prelude::*;

use crate::error::DecodeError;

pub type Bits = BitSlice<u8, Msb0>;
pub type BitBuffer = BitVec<u8, Msb0>;

/// Expands every hex digit into exactly four bits, most significant first.
pub fn parse_hex(content: &str) -> Result<BitBuffer, DecodeError> {
    let content = content.trim();
    let mut bits = BitBuffer::with_capacity(content.len() * 4);

    for (position, character) in content.chars().enumerate() {
        let nibble = character
            .to_digit(16)
            .ok_or(DecodeError::InvalidHexDigit {
                position,
                character,
            })?;

        for shift in (0..4).rev() {
            bits.push((nibble >> shift) & 1 == 1);
        }
    }

    Ok(bits)
}

pub fn take(bits: &Bits, offset: usize, width: usize) -> Result<&Bits, DecodeError> {
    let available = bits.len().saturating_sub(offset);
    if width > available {
        return Err(DecodeError::TruncatedStream {
            offset,
            wanted: width,
            available,
        });
    }

    Ok(&bits[offset..offset + width])
}

/// Loads `width` (at most 64) bits starting at `offset` as a big-endian integer.
pub fn read_bits(bits: &Bits, offset: usize, width: usize) -> Result<u64, DecodeError> {
    debug_assert!(width <= 64, "{}", width);

    let field = take(bits, offset, width)?;
    if field.is_empty() {
        return Ok(0);
    }

    Ok(field.load_be::<u64>())
}

pub fn read_bit(bits: &Bits, offset: usize) -> Result<bool, DecodeError> {
    Ok(take(bits, offset, 1)?[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_hex_msb_first() {
        let bits = parse_hex("D2FE28").unwrap();
        assert_eq!(bits.len(), 24);

        let rendered: String = bits.iter().map(|b| if *b { '1' } else { '0' }).collect();
        assert_eq!(rendered, "110100101111111000101000");
    }

    #[test]
    fn accepts_lowercase_and_odd_length() {
        let bits = parse_hex("a1f\n").unwrap();
        assert_eq!(bits.len(), 12);
        assert_eq!(read_bits(&bits, 0, 12).unwrap(), 0xA1F);
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(
            parse_hex("12G4").unwrap_err(),
            DecodeError::InvalidHexDigit {
                position: 2,
                character: 'G'
            }
        );
    }

    #[test]
    fn reads_fields_across_byte_boundaries() {
        let bits = parse_hex("38006F45291200").unwrap();

        assert_eq!(read_bits(&bits, 0, 3).unwrap(), 1);
        assert_eq!(read_bits(&bits, 3, 3).unwrap(), 6);
        assert!(!read_bit(&bits, 6).unwrap());
        assert_eq!(read_bits(&bits, 7, 15).unwrap(), 27);
    }

    #[test]
    fn reports_truncation() {
        let bits = parse_hex("F").unwrap();

        assert_eq!(
            read_bits(&bits, 2, 3).unwrap_err(),
            DecodeError::TruncatedStream {
                offset: 2,
                wanted: 3,
                available: 2
            }
        );
        assert_eq!(
            read_bit(&bits, 9).unwrap_err(),
            DecodeError::TruncatedStream {
                offset: 9,
                wanted: 1,
                available: 0
            }
        );
    }
}
