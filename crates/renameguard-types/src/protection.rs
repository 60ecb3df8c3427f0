use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tri-state protection marker on a declaration.
///
/// In the tree document this is the optional `protected` field: absent
/// (`Unset`), `0` (`Off`), or `1` (`On`). The distinction between `Unset`
/// and `Off` is load-bearing: automated passes may only assert `On` over an
/// explicit `Off`, never over a node they were never asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Protection {
    Unset,
    Off,
    On,
}

impl Protection {
    /// Decode the document field value.
    pub fn from_field(value: Option<i64>) -> Self {
        match value {
            None => Protection::Unset,
            Some(1) => Protection::On,
            Some(_) => Protection::Off,
        }
    }

    /// Encode back into the document field value (`None` means absent).
    pub fn as_field(self) -> Option<i64> {
        match self {
            Protection::Unset => None,
            Protection::Off => Some(0),
            Protection::On => Some(1),
        }
    }

    pub fn is_on(self) -> bool {
        self == Protection::On
    }
}
