pub mod abi;
pub mod cairo_type;
pub mod constants;
pub mod contract_address;
pub mod contract_class;
pub mod error;
pub mod felt;
pub mod serde_helpers;

// Re export libraries
pub use {num_bigint, starknet_types_core};
