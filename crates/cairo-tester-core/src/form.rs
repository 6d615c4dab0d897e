//! Editable form state derived from ABI inputs.
//!
//! A form maps one [`FormKey`] per input to a [`FormValue`] tree. Leaves hold the text typed by
//! the user; structs, enums and arrays nest sub-forms the way the ABI nests types.

use std::fmt::Display;

use indexmap::IndexMap;
use num_traits::Zero;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tester_types::abi::{AbiComposite, AbiEnum, AbiParameter, AbiStruct};
use tester_types::cairo_type::CairoType;

use crate::contract::{Callable, ContractAbi};
use crate::error::FormError;
use crate::form_errors::FormErrors;
use crate::type_parser::{parse_generic_type, parse_tuple, tuple_types};
use crate::utils::parse_integer_literal;
use crate::validation::is_valid_integer;

/// Identifies one input of an owner (function, struct or enum). Renders as
/// `{owner}_{name}_{type}`, with `input_{index}_` standing in for a missing name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormKey {
    owner: String,
    name: String,
    ty: String,
}

impl FormKey {
    pub fn new(owner: &str, parameter: &AbiParameter, index: usize) -> Self {
        Self {
            owner: owner.to_string(),
            name: slot_name(parameter, index),
            ty: parameter.r#type.clone(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }
}

impl Display for FormKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.owner, self.name, self.ty)
    }
}

impl Serialize for FormKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

pub fn get_form_key(owner: &str, parameter: &AbiParameter, index: usize) -> FormKey {
    FormKey::new(owner, parameter, index)
}

fn slot_name(parameter: &AbiParameter, index: usize) -> String {
    if parameter.name.is_empty() { format!("input_{index}_") } else { parameter.name.clone() }
}

/// One node of the form tree. In JSON a leaf is a string, an array a list, an enum
/// `{"variant": {name: slot}}` and a struct `{member: slot}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Leaf(String),
    Array(Vec<FormValue>),
    Enum(EnumForm),
    Struct(IndexMap<String, FormSlot>),
}

impl FormValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FormValue::Leaf(_) => "text",
            FormValue::Array(_) => "array",
            FormValue::Enum(_) => "enum",
            FormValue::Struct(_) => "struct",
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            FormValue::Leaf(text) => Some(text),
            _ => None,
        }
    }

    /// Only an empty leaf counts as not filled in.
    pub fn is_empty(&self) -> bool {
        matches!(self, FormValue::Leaf(text) if text.is_empty())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Leaf(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Leaf(value)
    }
}

/// A struct member or enum variant: its declared type and, unless inactive, its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSlot {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FormValue>,
}

impl FormSlot {
    pub fn new(r#type: impl Into<String>, value: Option<FormValue>) -> Self {
        Self { r#type: r#type.into(), value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumForm {
    pub variant: IndexMap<String, FormSlot>,
}

impl EnumForm {
    /// The first variant carrying a value.
    pub fn active(&self) -> Option<(&str, &FormSlot)> {
        self.variant
            .iter()
            .find(|(_, slot)| slot.value.is_some())
            .map(|(name, slot)| (name.as_str(), slot))
    }

    pub fn slot(&self, name: &str) -> Option<&FormSlot> {
        self.variant.get(name)
    }
}

/// Form state of one owner, ordered like the owner's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatForm(IndexMap<FormKey, FormValue>);

impl FlatForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FormKey, value: FormValue) -> Option<FormValue> {
        self.0.insert(key, value)
    }

    /// Replaces the value of an existing key.
    pub fn set(&mut self, key: &FormKey, value: FormValue) -> Result<(), FormError> {
        match self.0.get_mut(key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FormError::UnknownKey { key: key.to_string() }),
        }
    }

    pub fn get(&self, key: &FormKey) -> Option<&FormValue> {
        self.0.get(key)
    }

    pub fn get_index(&self, index: usize) -> Option<(&FormKey, &FormValue)> {
        self.0.get_index(index)
    }

    pub fn key_by_name(&self, name: &str) -> Option<&FormKey> {
        self.0.keys().find(|key| key.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FormKey, &FormValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FormKey> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rebuilds a form from its JSON object. Keys are derived from `inputs`, so the result keeps
    /// the ABI input order whatever the order in `json`; keys no input produces are rejected.
    pub fn from_json(
        owner: &str,
        inputs: &[AbiParameter],
        json: &serde_json::Value,
    ) -> Result<Self, FormError> {
        let object = json.as_object().ok_or_else(|| FormError::InvalidJson {
            msg: format!("expected an object, got {json}"),
        })?;

        let expected_keys: Vec<FormKey> = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| FormKey::new(owner, input, index))
            .collect();

        if let Some(unknown) = object
            .keys()
            .find(|json_key| !expected_keys.iter().any(|key| key.to_string() == **json_key))
        {
            return Err(FormError::UnknownKey { key: unknown.clone() });
        }

        let mut form = FlatForm::new();
        for key in expected_keys {
            if let Some(json_value) = object.get(&key.to_string()) {
                let value = serde_json::from_value(json_value.clone())
                    .map_err(|err| FormError::InvalidJson { msg: format!("{key}: {err}") })?;
                form.insert(key, value);
            }
        }

        Ok(form)
    }
}

impl Serialize for FlatForm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One empty leaf per input. Nested structs and arrays get their own sub-forms later.
pub fn initial_form_state(callable: &Callable<'_>) -> FlatForm {
    let mut form = FlatForm::new();
    for (index, input) in callable.inputs.iter().enumerate() {
        form.insert(FormKey::new(callable.name, input, index), FormValue::from(""));
    }
    form
}

/// Sub-form of a struct (one leaf per member) or an enum (one leaf per variant).
pub fn initial_tuple_form_state(composite: AbiComposite<'_>) -> FlatForm {
    let mut form = FlatForm::new();
    for (index, field) in composite.fields().iter().enumerate() {
        form.insert(FormKey::new(composite.name(), field, index), FormValue::from(""));
    }
    form
}

/// Folds a struct sub-form into the value its parent stores. Values are taken positionally.
pub fn struct_value(abi_struct: &AbiStruct, sub_form: &FlatForm) -> FormValue {
    let members = abi_struct
        .members
        .iter()
        .enumerate()
        .map(|(index, member)| {
            let value = sub_form.get_index(index).map(|(_, value)| value.clone());
            (slot_name(member, index), FormSlot::new(member.r#type.clone(), value))
        })
        .collect();

    FormValue::Struct(members)
}

/// Folds an enum sub-form into the value its parent stores. Only the variant at `active_index`
/// keeps its value.
pub fn enum_value(abi_enum: &AbiEnum, sub_form: &FlatForm, active_index: usize) -> FormValue {
    let variant = abi_enum
        .variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let value = if index == active_index {
                sub_form.get_index(index).map(|(_, value)| value.clone())
            } else {
                None
            };
            (slot_name(variant, index), FormSlot::new(variant.r#type.clone(), value))
        })
        .collect();

    FormValue::Enum(EnumForm { variant })
}

/// Array container of the filled in items; removed items are skipped.
pub fn array_value(items: impl IntoIterator<Item = Option<FormValue>>) -> FormValue {
    FormValue::Array(items.into_iter().flatten().collect())
}

/// Checks a form right before it is encoded: one value per input, no empty leaf, contract
/// addresses `0x` prefixed and non-zero, integers within their declared width.
pub fn validate_submission(
    abi: &ContractAbi,
    callable: &Callable<'_>,
    form: &FlatForm,
) -> Result<(), FormError> {
    if form.len() != callable.inputs.len() {
        return Err(FormError::MissingInput { expected: callable.inputs.len(), got: form.len() });
    }

    for (key, value) in form.iter() {
        if value.is_empty() {
            return Err(FormError::EmptyValue { key: key.to_string() });
        }
        check_field(abi, key, value)?;
    }

    Ok(())
}

/// Per-field errors of a form, keyed like the input widgets key them; a failing nested value is
/// keyed by its own sub-form key. Unlike [`validate_submission`] every field is checked.
pub fn field_errors(abi: &ContractAbi, form: &FlatForm) -> FormErrors {
    let mut errors = FormErrors::new();
    for (key, value) in form.iter() {
        match check_field(abi, key, value) {
            Err(err @ FormError::ZeroAddress { .. }) => {
                errors.add_error("zero_address_error", err.to_string())
            }
            Err(err) => {
                let field = match &err {
                    FormError::InvalidInteger { key } | FormError::InvalidAddress { key } => {
                        key.clone()
                    }
                    _ => key.to_string(),
                };
                errors.add_error(format!("intError{field}"), err.to_string())
            }
            Ok(()) => {}
        }
    }
    errors
}

fn check_field(abi: &ContractAbi, key: &FormKey, value: &FormValue) -> Result<(), FormError> {
    check_value(abi, key.ty(), value, &key.to_string())
}

/// Walks struct members, the active enum variant, array items and tuple elements. Nested values
/// are keyed `{parent type}_{name}_{type}` like the sub-forms they come from.
fn check_value(
    abi: &ContractAbi,
    ty: &str,
    value: &FormValue,
    key: &str,
) -> Result<(), FormError> {
    match value {
        FormValue::Leaf(text) => check_leaf(abi, ty, text, key),
        FormValue::Struct(members) => {
            members.iter().try_for_each(|(name, slot)| check_slot(abi, ty, name, slot))
        }
        FormValue::Enum(form) => match form.active() {
            Some((name, slot)) => check_slot(abi, ty, name, slot),
            None => Ok(()),
        },
        FormValue::Array(items) => {
            let args = parse_generic_type(ty);
            let item_type = args.first();
            items.iter().enumerate().try_for_each(|(index, item)| {
                check_value(abi, item_type, item, &format!("{ty}_{index}_{item_type}"))
            })
        }
    }
}

fn check_slot(
    abi: &ContractAbi,
    parent_type: &str,
    name: &str,
    slot: &FormSlot,
) -> Result<(), FormError> {
    match &slot.value {
        Some(value) => {
            let key = format!("{parent_type}_{name}_{}", slot.r#type);
            check_value(abi, &slot.r#type, value, &key)
        }
        None => Ok(()),
    }
}

fn check_leaf(abi: &ContractAbi, ty: &str, text: &str, key: &str) -> Result<(), FormError> {
    match abi.classify(ty) {
        CairoType::ContractAddress => {
            let address = parse_integer_literal(text)
                .ok_or_else(|| FormError::InvalidAddress { key: key.to_string() })?;
            if address.is_zero() {
                return Err(FormError::ZeroAddress { key: key.to_string() });
            }
            if !text.starts_with("0x") {
                return Err(FormError::InvalidAddress { key: key.to_string() });
            }
            Ok(())
        }
        CairoType::Integer(_) if !text.is_empty() && !is_valid_integer(ty, text) => {
            Err(FormError::InvalidInteger { key: key.to_string() })
        }
        // arity mismatches are reported by the encoder
        CairoType::Tuple => {
            let types = tuple_types(ty);
            let values = parse_tuple(text);
            if types.len() != values.len() {
                return Ok(());
            }
            types.iter().zip(&values).enumerate().try_for_each(|(index, (item_type, item))| {
                check_leaf(abi, item_type, item, &format!("{ty}_{index}_{item_type}"))
            })
        }
        _ => Ok(()),
    }
}
