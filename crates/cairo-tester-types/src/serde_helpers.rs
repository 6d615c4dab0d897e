pub mod sierra_abi {
    use serde::{Deserialize, Deserializer};

    use crate::abi::AbiEntry;

    /// Sierra artifacts ship the ABI either as an array or as a JSON-encoded string holding that
    /// array. An empty string means no ABI.
    pub fn deserialize_abi<'de, D>(deserializer: D) -> Result<Vec<AbiEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let abi_value = serde_json::Value::deserialize(deserializer)?;
        match abi_value {
            serde_json::Value::String(abi_string) if abi_string.is_empty() => Ok(vec![]),
            serde_json::Value::String(abi_string) => {
                serde_json::from_str(&abi_string).map_err(serde::de::Error::custom)
            }
            serde_json::Value::Null => Ok(vec![]),
            other => serde_json::from_value(other).map_err(serde::de::Error::custom),
        }
    }

}

pub mod bigint_string {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Big integers travel as decimal strings so JSON consumers never lose precision.
    pub fn serialize<S>(value: &BigInt, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let text = match value {
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(number) => number.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!("expected an integer, got {other}")));
            }
        };
        text.parse::<BigInt>().map_err(serde::de::Error::custom)
    }

}
