//! Sensor readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One observation from the gas sensor.
///
/// `is_leak` travels as the integer `0` or `1`. The timestamp is assigned
/// by the server when the reading is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Gas concentration in PPM.
    pub check_value: f64,
    #[serde(with = "leak_flag")]
    pub is_leak: bool,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Create a reading stamped with the current time.
    ///
    /// Non-finite and negative concentrations are clamped to zero.
    pub fn new(check_value: f64, is_leak: bool) -> Self {
        Self::at(check_value, is_leak, Utc::now())
    }

    pub fn at(check_value: f64, is_leak: bool, timestamp: DateTime<Utc>) -> Self {
        let check_value = if check_value.is_finite() && check_value > 0.0 {
            check_value
        } else {
            0.0
        };
        Self {
            check_value,
            is_leak,
            timestamp,
        }
    }

    /// Gas supply state derived from the leak flag.
    pub fn gas_supply(&self) -> GasSupply {
        if self.is_leak {
            GasSupply::Closed
        } else {
            GasSupply::Open
        }
    }

    /// Copy of this reading with a new leak flag and a fresh timestamp.
    pub fn with_leak(&self, is_leak: bool) -> Self {
        Self {
            check_value: self.check_value,
            is_leak,
            timestamp: Utc::now(),
        }
    }
}

/// Gas supply valve state. `1` means open, `0` means closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasSupply {
    Open,
    Closed,
}

impl GasSupply {
    pub fn as_value(&self) -> u8 {
        match self {
            Self::Open => 1,
            Self::Closed => 0,
        }
    }

    /// Parse the wire value. Anything other than `0` or `1` is rejected.
    pub fn from_value(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::Open),
            0 => Ok(Self::Closed),
            other => Err(Error::Validation(format!(
                "Invalid gas supply value {}: must be 0 or 1",
                other
            ))),
        }
    }
}

/// Parse a leak flag given as an integer. Only `0` and `1` are accepted.
pub fn leak_from_value(value: i64) -> Result<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::Validation(format!(
            "Invalid isLeak value {}: must be 0 or 1",
            other
        ))),
    }
}

/// Serde adapter for the `0|1` leak flag. Deserialization also accepts booleans.
pub mod leak_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(i64),
        Bool(bool),
    }

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Int(i) => super::leak_from_value(i).map_err(serde::de::Error::custom),
        }
    }
}
