//! Classification of Cairo ABI type strings.
//!
//! The `is_*` predicates match on substrings of the fully qualified type path, so they also work
//! on form keys that embed a type. [`CairoType::classify`] is the closed classification used by
//! the encoder, decoder and calldata compiler; [`TypeClassifier`] memoizes it per type string.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::constants::{
    ARRAY_PREFIX, BOOL, BYTE_ARRAY, BYTES31, CLASS_HASH, CLASSIFIER_CACHE_CAPACITY,
    CONTRACT_ADDRESS, ETH_ADDRESS, FELT252, INTEGER_PREFIX, NON_ZERO_U256, OPTION_PREFIX,
    RESULT_PREFIX, SECP256K1_POINT, SPAN_PREFIX, VOID,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerType {
    pub bits: u16,
    pub signed: bool,
}

impl IntegerType {
    /// 8, 16 and 32 bit integers.
    pub fn is_small(&self) -> bool {
        matches!(self.bits, 8 | 16 | 32)
    }

    /// 64 and 128 bit integers.
    pub fn is_big(&self) -> bool {
        matches!(self.bits, 64 | 128)
    }

    pub fn is_u256(&self) -> bool {
        !self.signed && self.bits == 256
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CairoType {
    Integer(IntegerType),
    Felt,
    Bool,
    ContractAddress,
    ClassHash,
    EthAddress,
    Bytes31,
    ByteArray,
    Secp256k1Point,
    Function,
    Void,
    Tuple,
    Array,
    Span,
    Option,
    Result,
    /// A user defined struct or enum, resolved against the ABI by name.
    Named,
}

impl CairoType {
    /// Array-like and tuple shapes are checked before scalars, and only on the outermost path, so
    /// generic arguments never decide the outer kind. Anything unrecognised names a struct or an
    /// enum.
    pub fn classify(type_str: &str) -> Self {
        let ty = type_str.trim().trim_start_matches('@');

        if ty.starts_with(SPAN_PREFIX) {
            return CairoType::Span;
        }
        if ty.starts_with(ARRAY_PREFIX) {
            return CairoType::Array;
        }
        if ty.starts_with(OPTION_PREFIX) {
            return CairoType::Option;
        }
        if ty.starts_with(RESULT_PREFIX) {
            return CairoType::Result;
        }
        if ty.starts_with('(') {
            return if ty == VOID { CairoType::Void } else { CairoType::Tuple };
        }
        if ty == NON_ZERO_U256 {
            return CairoType::Integer(IntegerType { bits: 256, signed: false });
        }
        if let Some(integer) = integer_type(ty) {
            return CairoType::Integer(integer);
        }

        match ty {
            FELT252 => CairoType::Felt,
            BOOL => CairoType::Bool,
            CONTRACT_ADDRESS => CairoType::ContractAddress,
            CLASS_HASH => CairoType::ClassHash,
            ETH_ADDRESS => CairoType::EthAddress,
            BYTES31 => CairoType::Bytes31,
            BYTE_ARRAY => CairoType::ByteArray,
            SECP256K1_POINT => CairoType::Secp256k1Point,
            "function" => CairoType::Function,
            _ => CairoType::Named,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CairoType::Integer(_) | CairoType::Felt)
    }

    /// Address-like felts: contract address, class hash and eth address.
    pub fn is_address_like(&self) -> bool {
        matches!(self, CairoType::ContractAddress | CairoType::ClassHash | CairoType::EthAddress)
    }

    /// Rendered as a single text input rather than a nested form.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            CairoType::Tuple
                | CairoType::Array
                | CairoType::Span
                | CairoType::Option
                | CairoType::Result
                | CairoType::Named
        )
    }
}

/// Parses `core::integer::{u,i}{bits}` at the end of a type path.
pub fn integer_type(type_str: &str) -> Option<IntegerType> {
    let start = type_str.rfind(INTEGER_PREFIX)? + INTEGER_PREFIX.len();
    let suffix = &type_str[start..];
    let signed = match suffix.chars().next()? {
        'u' => false,
        'i' => true,
        _ => return None,
    };
    let digits = &suffix[1..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let bits = digits.parse::<u16>().ok()?;
    Some(IntegerType { bits, signed })
}

pub fn is_int(type_str: &str) -> bool {
    integer_type(type_str).is_some_and(|integer| integer.is_small())
}

pub fn is_big_int(type_str: &str) -> bool {
    integer_type(type_str).is_some_and(|integer| integer.is_big())
}

pub fn is_u256(type_str: &str) -> bool {
    type_str.ends_with(NON_ZERO_U256)
        || integer_type(type_str).is_some_and(|integer| integer.is_u256())
}

pub fn is_contract_address(type_str: &str) -> bool {
    type_str.contains(CONTRACT_ADDRESS)
}

pub fn is_eth_address(type_str: &str) -> bool {
    type_str.contains(ETH_ADDRESS)
}

pub fn is_class_hash(type_str: &str) -> bool {
    type_str.contains(CLASS_HASH)
}

pub fn is_function(type_str: &str) -> bool {
    type_str.contains("function")
}

pub fn is_void(type_str: &str) -> bool {
    type_str.contains(VOID)
}

pub fn is_bool(type_str: &str) -> bool {
    type_str.contains(BOOL)
}

pub fn is_bytes31(type_str: &str) -> bool {
    type_str.contains(BYTES31)
}

pub fn is_byte_array(type_str: &str) -> bool {
    type_str.contains(BYTE_ARRAY)
}

pub fn is_secp256k1_point(type_str: &str) -> bool {
    type_str.contains(SECP256K1_POINT)
}

pub fn is_felt(type_str: &str) -> bool {
    type_str.contains(FELT252)
}

/// True when the string holds a non-empty parenthesized group, e.g. `(core::felt252, core::bool)`.
pub fn is_tuple(type_str: &str) -> bool {
    type_str.char_indices().filter(|(_, c)| *c == '(').any(|(open, _)| {
        type_str[open + 1..].find(')').is_some_and(|close_offset| close_offset > 0)
    })
}

pub fn is_array(type_str: &str) -> bool {
    type_str.contains(ARRAY_PREFIX)
}

pub fn is_span(type_str: &str) -> bool {
    type_str.contains(SPAN_PREFIX)
}

pub fn is_option(type_str: &str) -> bool {
    type_str.contains(OPTION_PREFIX)
}

pub fn is_result(type_str: &str) -> bool {
    type_str.contains(RESULT_PREFIX)
}

/// Any scalar or tuple-like kind, i.e. everything that is not looked up as a struct or enum.
pub fn is_cairo_type(type_str: &str) -> bool {
    is_int(type_str)
        || is_big_int(type_str)
        || is_u256(type_str)
        || is_contract_address(type_str)
        || is_eth_address(type_str)
        || is_class_hash(type_str)
        || is_function(type_str)
        || is_void(type_str)
        || is_bool(type_str)
        || is_bytes31(type_str)
        || is_byte_array(type_str)
        || is_secp256k1_point(type_str)
        || is_felt(type_str)
        || is_tuple(type_str)
        || is_span(type_str)
}

/// Memoizes [`CairoType::classify`] per type string.
pub struct TypeClassifier {
    cache: Mutex<LruCache<String, CairoType>>,
}

impl TypeClassifier {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { cache: Mutex::new(LruCache::new(capacity)) }
    }

    pub fn classify(&self, type_str: &str) -> CairoType {
        let mut cache = self.cache.lock();
        if let Some(cairo_type) = cache.get(type_str) {
            return *cairo_type;
        }

        let cairo_type = CairoType::classify(type_str);
        trace!("Classified {type_str} as {cairo_type:?}");
        cache.put(type_str.to_string(), cairo_type);
        cairo_type
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new(CLASSIFIER_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for TypeClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeClassifier").field("cached", &self.len()).finish()
    }
}
