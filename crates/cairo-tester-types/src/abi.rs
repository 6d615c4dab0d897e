use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// One entry of a Sierra contract ABI.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AbiEntry {
    Function(AbiFunction),
    Constructor(AbiConstructor),
    L1Handler(AbiFunction),
    Struct(AbiStruct),
    Enum(AbiEnum),
    Interface(AbiInterface),
    Impl(AbiImpl),
    Event(AbiEvent),
}

impl AbiEntry {
    pub fn name(&self) -> &str {
        match self {
            AbiEntry::Function(function) | AbiEntry::L1Handler(function) => &function.name,
            AbiEntry::Constructor(constructor) => &constructor.name,
            AbiEntry::Struct(abi_struct) => &abi_struct.name,
            AbiEntry::Enum(abi_enum) => &abi_enum.name,
            AbiEntry::Interface(interface) => &interface.name,
            AbiEntry::Impl(abi_impl) => &abi_impl.name,
            AbiEntry::Event(event) => &event.name,
        }
    }
}

/// A named slot: function input, struct member or enum variant.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct AbiParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

impl AbiParameter {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self { name: name.into(), r#type: r#type.into() }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiOutput {
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StateMutability {
    #[default]
    View,
    External,
}

impl Display for StateMutability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StateMutability::View => "view",
            StateMutability::External => "external",
        })
    }
}

impl FromStr for StateMutability {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Ok(StateMutability::View),
            "external" => Ok(StateMutability::External),
            _ => Err(ConversionError::InvalidInternalStructure(format!(
                "unknown state mutability: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParameter>,
    #[serde(default)]
    pub outputs: Vec<AbiOutput>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiConstructor {
    #[serde(default = "constructor_name")]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParameter>,
}

fn constructor_name() -> String {
    "constructor".to_string()
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiStruct {
    pub name: String,
    #[serde(default)]
    pub members: Vec<AbiParameter>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiEnum {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<AbiParameter>,
}

impl AbiEnum {
    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|variant| variant.name == name)
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiInterface {
    pub name: String,
    #[serde(default)]
    pub items: Vec<AbiEntry>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiImpl {
    pub name: String,
    pub interface_name: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiEvent {
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<AbiEventMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<AbiEventMember>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct AbiEventMember {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub kind: String,
}

/// A struct or enum definition that owns a nested sub-form.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AbiComposite<'a> {
    Struct(&'a AbiStruct),
    Enum(&'a AbiEnum),
}

impl<'a> AbiComposite<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            AbiComposite::Struct(abi_struct) => &abi_struct.name,
            AbiComposite::Enum(abi_enum) => &abi_enum.name,
        }
    }

    /// Struct members or enum variants, in declaration order.
    pub fn fields(&self) -> &'a [AbiParameter] {
        match self {
            AbiComposite::Struct(abi_struct) => &abi_struct.members,
            AbiComposite::Enum(abi_enum) => &abi_enum.variants,
        }
    }
}
