use thiserror::Error;

use crate::decoder::DecodedValue;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    EncodeError(#[from] EncodeError),
    #[error(transparent)]
    DecodeError(#[from] DecodeError),
    #[error(transparent)]
    CalldataError(#[from] CalldataError),
    #[error(transparent)]
    FormError(#[from] FormError),
    #[error("Types error: {0}")]
    TypesError(#[from] tester_types::error::Error),
    #[error("Function {name} not found in the ABI")]
    FunctionNotFound { name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Field {field}: expected {expected}, got {got}")]
    UnexpectedValue { field: String, expected: &'static str, got: &'static str },
    #[error("Field {field}: tuple type has {expected} elements, value has {got}")]
    TupleArity { field: String, expected: usize, got: usize },
    #[error("Field {field}: {value:?} is not a boolean")]
    InvalidBool { field: String, value: String },
    #[error("Field {field}: no enum variant selected")]
    NoActiveVariant { field: String },
}

/// Shape of a value, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    Tuple,
    List,
    Record,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValueKind::Text => "text",
            ValueKind::Number => "number",
            ValueKind::Tuple => "tuple",
            ValueKind::List => "list",
            ValueKind::Record => "record",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Type {ty}: expected a {expected} response, got {got}")]
    UnexpectedShape { ty: String, expected: ValueKind, got: String },
    #[error("Type {ty}: expected {expected} tuple elements, got {got}")]
    TupleArity { ty: String, expected: usize, got: usize },
    #[error("Type {ty} is neither a base type nor declared in the ABI")]
    UnknownType { ty: String },
    #[error("Type {ty}: response value is missing")]
    Missing { ty: String },
}

impl DecodeError {
    /// Best-effort value shown in place of a response that could not be decoded: an empty list or
    /// record where one was expected, the response as text for other shapes, empty text otherwise.
    pub fn fallback(&self) -> DecodedValue {
        match self {
            DecodeError::UnexpectedShape { expected: ValueKind::List, .. } => {
                DecodedValue::List(vec![])
            }
            DecodeError::UnexpectedShape { expected: ValueKind::Record, .. } => {
                DecodedValue::Record(Default::default())
            }
            DecodeError::UnexpectedShape { got, .. } => DecodedValue::Text(got.clone()),
            DecodeError::TupleArity { .. }
            | DecodeError::UnknownType { .. }
            | DecodeError::Missing { .. } => DecodedValue::Text(String::new()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalldataError {
    #[error("Type {ty} is not declared in the ABI")]
    UnknownType { ty: String },
    #[error("Type {ty}: value {value} does not match the type")]
    ValueMismatch { ty: String, value: String },
    #[error("Type {ty}: value {value} is out of range")]
    OutOfRange { ty: String, value: String },
    #[error("Type {ty}: invalid literal {value:?}")]
    InvalidLiteral { ty: String, value: String },
    #[error("Struct {ty}: member {member} is missing")]
    MissingMember { ty: String, member: String },
    #[error("Enum {ty}: unknown variant {variant}")]
    UnknownVariant { ty: String, variant: String },
    #[error("Type {ty} cannot be serialized into calldata")]
    Unsupported { ty: String },
    #[error("Expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown form key {key}")]
    UnknownKey { key: String },
    #[error("Expected {expected} values, got {got}")]
    MissingInput { expected: usize, got: usize },
    #[error("Values not filled completely: {key} is empty")]
    EmptyValue { key: String },
    #[error("Zero address value not allowed")]
    ZeroAddress { key: String },
    #[error("Invalid address value for {key}")]
    InvalidAddress { key: String },
    #[error("Invalid number input for {key}")]
    InvalidInteger { key: String },
    #[error("Invalid form JSON: {msg}")]
    InvalidJson { msg: String },
}

pub type TesterResult<T, E = Error> = Result<T, E>;
