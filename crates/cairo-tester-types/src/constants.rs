pub const FELT252: &str = "core::felt252";
pub const BOOL: &str = "core::bool";
pub const U256: &str = "core::integer::u256";
pub const NON_ZERO_U256: &str = "core::zeroable::NonZero::<core::integer::u256>";
pub const U512: &str = "core::integer::u512";
pub const CONTRACT_ADDRESS: &str = "core::starknet::contract_address::ContractAddress";
pub const ETH_ADDRESS: &str = "core::starknet::eth_address::EthAddress";
pub const CLASS_HASH: &str = "core::starknet::class_hash::ClassHash";
pub const BYTES31: &str = "core::bytes_31::bytes31";
pub const BYTE_ARRAY: &str = "core::byte_array::ByteArray";
pub const SECP256K1_POINT: &str = "core::starknet::secp256k1::Secp256k1Point";
pub const VOID: &str = "()";

pub const ARRAY_PREFIX: &str = "core::array";
pub const SPAN_PREFIX: &str = "core::array::Span";
pub const OPTION_PREFIX: &str = "core::option";
pub const RESULT_PREFIX: &str = "core::result";
pub const INTEGER_PREFIX: &str = "core::integer::";

/// Types that never need an ABI lookup to be decoded.
pub const BASE_TYPES: [&str; 21] = [
    CONTRACT_ADDRESS,
    ETH_ADDRESS,
    CLASS_HASH,
    FELT252,
    U512,
    U256,
    NON_ZERO_U256,
    "core::integer::u128",
    "core::integer::u64",
    "core::integer::u32",
    "core::integer::u16",
    "core::integer::u8",
    "core::integer::i256",
    "core::integer::i128",
    "core::integer::i64",
    "core::integer::i32",
    "core::integer::i16",
    "core::integer::i8",
    BOOL,
    BYTES31,
    BYTE_ARRAY,
];

/// Default capacity of the per-ABI type classification cache.
pub const CLASSIFIER_CACHE_CAPACITY: usize = 256;

/// Largest magnitude (2^53 - 1) decoded as a plain number; bigger values are decoded as text.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;
