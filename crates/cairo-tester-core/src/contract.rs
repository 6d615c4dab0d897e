use tester_types::abi::{
    AbiComposite, AbiConstructor, AbiEntry, AbiEnum, AbiFunction, AbiOutput, AbiParameter,
    AbiStruct, StateMutability,
};
use tester_types::cairo_type::{CairoType, TypeClassifier};
use tester_types::constants::BASE_TYPES;
use tester_types::contract_class::SierraArtifact;
use tracing::debug;

use crate::error::{Error, TesterResult};

/// A loaded contract ABI together with the classification cache of its type strings. Built once
/// per artifact and passed by reference to everything that walks the ABI.
#[derive(Debug, Default)]
pub struct ContractAbi {
    entries: Vec<AbiEntry>,
    classifier: TypeClassifier,
}

/// Anything a form can be built for: a function or the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callable<'a> {
    pub name: &'a str,
    pub inputs: &'a [AbiParameter],
    pub outputs: &'a [AbiOutput],
    pub state_mutability: Option<StateMutability>,
}

impl<'a> From<&'a AbiFunction> for Callable<'a> {
    fn from(function: &'a AbiFunction) -> Self {
        Self {
            name: &function.name,
            inputs: &function.inputs,
            outputs: &function.outputs,
            state_mutability: Some(function.state_mutability),
        }
    }
}

impl<'a> From<&'a AbiConstructor> for Callable<'a> {
    fn from(constructor: &'a AbiConstructor) -> Self {
        Self {
            name: &constructor.name,
            inputs: &constructor.inputs,
            outputs: &[],
            state_mutability: None,
        }
    }
}

/// What a type string refers to when decoding a value of that type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDescriptor<'a> {
    /// Arrays, flat tuples and core scalars; decoded without an ABI lookup.
    Base(&'a str),
    Struct(&'a AbiStruct),
    Enum(&'a AbiEnum),
    Unknown(&'a str),
}

impl ContractAbi {
    pub fn new(entries: Vec<AbiEntry>) -> Self {
        Self { entries, classifier: TypeClassifier::default() }
    }

    /// Accepts a Sierra contract class or a bare ABI array.
    pub fn from_json_str(json_str: &str) -> TesterResult<Self> {
        let entries = SierraArtifact::abi_from_json_str(json_str)?;
        debug!("Loaded ABI with {} entries", entries.len());
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[AbiEntry] {
        &self.entries
    }

    pub fn classify(&self, type_str: &str) -> CairoType {
        self.classifier.classify(type_str)
    }

    /// Functions declared at the top level and inside interfaces, in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &AbiFunction> {
        self.entries.iter().flat_map(|entry| match entry {
            AbiEntry::Function(function) => vec![function],
            AbiEntry::Interface(interface) => interface
                .items
                .iter()
                .filter_map(|item| match item {
                    AbiEntry::Function(function) => Some(function),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        })
    }

    pub fn functions_by_state_mutability(
        &self,
        state_mutability: StateMutability,
    ) -> Vec<&AbiFunction> {
        self.functions().filter(|function| function.state_mutability == state_mutability).collect()
    }

    pub fn constructor(&self) -> Option<&AbiConstructor> {
        self.entries.iter().find_map(|entry| match entry {
            AbiEntry::Constructor(constructor) => Some(constructor),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions().find(|function| function.name == name)
    }

    /// Looks up a function, or the constructor when `name` is `constructor` and no function of
    /// that name exists.
    pub fn callable(&self, name: &str) -> TesterResult<Callable<'_>> {
        if let Some(function) = self.function(name) {
            return Ok(function.into());
        }

        match self.constructor() {
            Some(constructor) if constructor.name == name => Ok(constructor.into()),
            _ => Err(Error::FunctionNotFound { name: name.to_string() }),
        }
    }

    pub fn find_struct(&self, name: &str) -> Option<&AbiStruct> {
        self.entries.iter().find_map(|entry| match entry {
            AbiEntry::Struct(abi_struct) if abi_struct.name == name => Some(abi_struct),
            _ => None,
        })
    }

    pub fn find_enum(&self, name: &str) -> Option<&AbiEnum> {
        self.entries.iter().find_map(|entry| match entry {
            AbiEntry::Enum(abi_enum) if abi_enum.name == name => Some(abi_enum),
            _ => None,
        })
    }

    /// The struct or enum declared under `name`; a leading snapshot marker is ignored.
    pub fn composite(&self, name: &str) -> Option<AbiComposite<'_>> {
        let name = name.trim_start_matches('@');
        self.find_struct(name)
            .map(AbiComposite::Struct)
            .or_else(|| self.find_enum(name).map(AbiComposite::Enum))
    }

    /// Arrays, flat tuples and core scalars are base types even when the ABI also declares them,
    /// everything else is looked up by name.
    pub fn resolve<'a>(&'a self, type_str: &'a str) -> TypeDescriptor<'a> {
        if type_str.starts_with("core::array::Array")
            || is_flat_tuple(type_str)
            || BASE_TYPES.contains(&type_str)
        {
            return TypeDescriptor::Base(type_str);
        }

        match self.composite(type_str) {
            Some(AbiComposite::Struct(abi_struct)) => TypeDescriptor::Struct(abi_struct),
            Some(AbiComposite::Enum(abi_enum)) => TypeDescriptor::Enum(abi_enum),
            None => TypeDescriptor::Unknown(type_str),
        }
    }
}

/// `(a, b)` with no nested parentheses.
pub(crate) fn is_flat_tuple(type_str: &str) -> bool {
    type_str
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(|inner| !inner.contains(['(', ')']))
}
