pub mod calldata;
pub mod contract;
pub mod decoder;
pub mod display;
pub mod encoder;
pub mod error;
pub mod form;
pub mod form_errors;
pub mod type_parser;
#[cfg(not(feature = "test_utils"))]
mod utils;
#[cfg(feature = "test_utils")]
pub mod utils;
pub mod validation;

pub use calldata::CalldataCompiler;
pub use contract::{Callable, ContractAbi, TypeDescriptor};
pub use decoder::{
    decode_contract_response, DecodeOptions, DecodedResponse, DecodedValue, ResponseDecoder,
    ResponseValue,
};
pub use encoder::{encode_form, EncodedValue};
pub use form::{initial_form_state, validate_submission, FlatForm, FormKey, FormValue};
pub use form_errors::FormErrors;
pub use utils::{is_valid_hex_number, is_valid_number, parse_integer_literal};
