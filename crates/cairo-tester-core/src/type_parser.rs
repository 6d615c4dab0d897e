//! Splitting of generic and tuple type strings into their component parts.

/// Arguments found between the outermost angle brackets of a type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericArgs {
    /// Comma separated arguments, e.g. the `T, E` of `Result::<T, E>`.
    Types(Vec<String>),
    /// A single tuple argument, kept whole.
    Tuple(String),
    /// No `<...>` in the input; the input string unchanged.
    Plain(String),
}

impl GenericArgs {
    /// The first argument. A tuple argument or a plain string is returned whole.
    pub fn first(&self) -> &str {
        match self {
            GenericArgs::Types(types) => types.first().map(String::as_str).unwrap_or_default(),
            GenericArgs::Tuple(tuple) | GenericArgs::Plain(tuple) => tuple,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            GenericArgs::Types(types) => types.get(index).map(String::as_str),
            GenericArgs::Tuple(_) | GenericArgs::Plain(_) if index == 0 => Some(self.first()),
            GenericArgs::Tuple(_) | GenericArgs::Plain(_) => None,
        }
    }
}

/// Extracts the content of the outermost `<...>`. A tuple content is kept as one string,
/// anything else is split on commas that are not nested in parentheses or angle brackets.
pub fn parse_generic_type(type_str: &str) -> GenericArgs {
    let Some(content) = outermost_angle_content(type_str) else {
        return GenericArgs::Plain(type_str.to_string());
    };

    if content.starts_with('(') && content.ends_with(')') {
        return GenericArgs::Tuple(content.to_string());
    }

    GenericArgs::Types(split_top_level(content).into_iter().map(str::to_string).collect())
}

fn outermost_angle_content(type_str: &str) -> Option<&str> {
    let open = type_str.find('<')?;
    let mut depth = 0_usize;
    for (offset, c) in type_str[open..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&type_str[open + 1..open + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

fn split_top_level(content: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0_i32;
    let mut start = 0;
    for (index, c) in content.char_indices() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(content[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(content[start..].trim());
    parts
}

/// Splits a parenthesized tuple into its top level elements, e.g. `(1,(2,3),4)` into
/// `["1", "(2,3)", "4"]`. Commas only separate elements directly inside the outermost parentheses.
pub fn parse_tuple(value: &str) -> Vec<String> {
    let mut values = vec![];
    let mut depth = 0_usize;
    let mut current = String::new();

    for c in value.chars() {
        match c {
            '(' => {
                if depth > 0 {
                    current.push(c);
                }
                depth += 1;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                if depth > 0 {
                    current.push(c);
                } else {
                    values.push(current.trim().to_string());
                    current.clear();
                }
            }
            ',' if depth == 1 => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    values
}

/// Component types of a tuple type, ignoring anything before its opening parenthesis. Commas
/// inside generic arguments do not split, e.g. in `(core::result::Result::<u8, felt252>, bool)`.
pub fn tuple_types(type_str: &str) -> Vec<String> {
    let Some(open) = type_str.find('(') else {
        return vec![];
    };
    let Some(close) = type_str.rfind(')').filter(|close| *close > open) else {
        return vec![];
    };

    let content = &type_str[open + 1..close];
    if content.trim().is_empty() {
        return vec![];
    }
    split_top_level(content).into_iter().map(str::to_string).collect()
}
