use num_bigint::{BigInt, BigUint, Sign};
use starknet_types_core::felt::Felt;

use crate::error::{ConversionError, TypesResult};

/// Bytes carried by one `ByteArray` word.
pub const BYTES_PER_WORD: usize = 31;

pub fn felt_from_prefixed_hex(hex_str: &str) -> TypesResult<Felt> {
    if !hex_str.starts_with("0x") {
        return Err(ConversionError::CustomFromHexError(format!("missing 0x prefix: {hex_str}"))
            .into());
    }

    Felt::from_hex(hex_str)
        .map_err(|err| ConversionError::CustomFromHexError(err.to_string()).into())
}

/// Parses a felt from a `0x` hex literal or a decimal literal.
pub fn felt_from_str(value: &str) -> TypesResult<Felt> {
    if value.starts_with("0x") {
        return felt_from_prefixed_hex(value);
    }

    Felt::from_dec_str(value)
        .map_err(|err| ConversionError::CustomFromDecError(err.to_string()).into())
}

/// The field prime P.
pub fn felt_prime() -> BigUint {
    Felt::MAX.to_biguint() + 1_u8
}

/// Converts an integer into a felt; negative values are reduced modulo P.
pub fn felt_from_bigint(value: &BigInt) -> Result<Felt, ConversionError> {
    let magnitude = value.magnitude();
    if magnitude >= &felt_prime() {
        return Err(ConversionError::OutOfRangeError(format!("{value} does not fit in a felt")));
    }

    let felt = Felt::from_bytes_be_slice(&magnitude.to_bytes_be());
    Ok(if value.sign() == Sign::Minus { -felt } else { felt })
}

/// Lowercase `0x`-prefixed hex without padding.
pub fn biguint_to_hex(value: &BigUint) -> String {
    format!("{value:#x}")
}

/// Decodes `0x`-prefixed hex into one character per byte. Strings that are too short or of odd
/// length decode to an empty string.
pub fn hex_to_ascii(hex_str: &str) -> String {
    if hex_str.len() <= 2 || hex_str.len() % 2 != 0 {
        return String::new();
    }

    let digits = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    digits
        .as_bytes()
        .chunks(2)
        .filter_map(|pair| std::str::from_utf8(pair).ok())
        .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
        .map(char::from)
        .collect()
}

/// Returns (high, low)
pub fn split_biguint(biguint: BigUint) -> (Felt, Felt) {
    let high = Felt::from_bytes_be_slice(&(&biguint >> 128_u32).to_bytes_be());
    let low_mask: BigUint = (BigUint::from(1_u8) << 128) - 1_u8;
    let low = Felt::from_bytes_be_slice(&(biguint & low_mask).to_bytes_be());
    (high, low)
}

/// Splits into four 128 bit limbs, least significant first.
pub fn split_u512(biguint: &BigUint) -> [Felt; 4] {
    let limb_mask = (BigUint::from(1_u8) << 128) - 1_u8;
    let mut limbs = [Felt::ZERO; 4];
    for (index, limb) in limbs.iter_mut().enumerate() {
        let shifted = biguint >> (128 * index);
        *limb = Felt::from_bytes_be_slice(&(shifted & &limb_mask).to_bytes_be());
    }
    limbs
}

/// Serializes a string the way Cairo lays out a `ByteArray`:
/// `[full_words_len, full_words..., pending_word, pending_word_len]`.
pub fn byte_array_to_felts(value: &str) -> Vec<Felt> {
    let bytes = value.as_bytes();
    let full_words = bytes.len() / BYTES_PER_WORD;
    let (full, pending) = bytes.split_at(full_words * BYTES_PER_WORD);

    let mut felts = Vec::with_capacity(full_words + 3);
    felts.push(Felt::from(full_words as u64));
    felts.extend(full.chunks(BYTES_PER_WORD).map(Felt::from_bytes_be_slice));
    felts.push(if pending.is_empty() { Felt::ZERO } else { Felt::from_bytes_be_slice(pending) });
    felts.push(Felt::from(pending.len() as u64));
    felts
}
