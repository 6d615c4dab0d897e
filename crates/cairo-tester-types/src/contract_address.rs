use std::fmt::{Display, LowerHex};

use num_bigint::BigUint;
use starknet_rs_core::utils::starknet_keccak;
use starknet_types_core::felt::Felt;

use crate::error::{ConversionError, TypesResult};
use crate::felt::felt_from_str;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractAddress(pub(crate) Felt);

impl ContractAddress {
    pub fn new(felt: Felt) -> Self {
        Self(felt)
    }

    /// Constructs a zero address
    pub fn zero() -> Self {
        Self(Felt::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Felt::ZERO
    }

    pub fn from_biguint(value: &BigUint) -> TypesResult<Self> {
        if value > &Felt::MAX.to_biguint() {
            return Err(ConversionError::OutOfRangeError(format!(
                "{value:#x} is not a valid address"
            ))
            .into());
        }
        Ok(Self(Felt::from_bytes_be_slice(&value.to_bytes_be())))
    }

    pub fn to_fixed_hex_string(&self) -> String {
        self.0.to_fixed_hex_string()
    }

    /// Mixed-case hex of the 64 digit padded address. A digit is uppercased when the matching
    /// nibble of the starknet keccak of the address bytes is 8 or more.
    pub fn to_checksum_string(&self) -> String {
        let padded = self.to_fixed_hex_string();
        let digits = padded.trim_start_matches("0x");

        let address_bytes = self.0.to_biguint().to_bytes_be();
        let hash = starknet_keccak(&address_bytes).to_bytes_be();

        let mut checksummed = String::with_capacity(66);
        checksummed.push_str("0x");
        for (index, digit) in digits.chars().enumerate() {
            let hash_byte = hash[index / 2];
            let nibble = if index % 2 == 0 { hash_byte >> 4 } else { hash_byte & 0x0f };
            if nibble >= 8 {
                checksummed.push(digit.to_ascii_uppercase());
            } else {
                checksummed.push(digit);
            }
        }
        checksummed
    }
}

impl std::str::FromStr for ContractAddress {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(felt_from_str(s)?))
    }
}

impl From<ContractAddress> for Felt {
    fn from(value: ContractAddress) -> Self {
        value.0
    }
}

impl LowerHex for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.to_hex_string().as_str())
    }
}

impl Display for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}
