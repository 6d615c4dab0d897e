#![cfg(test)]

mod common;

mod test_abi_loading;
mod test_calldata;
mod test_decoding;
mod test_encoding;
