use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of the negative status codes the platform audio
/// subsystem returns in place of a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformStatus {
    /// Generic operation failure (`-1`).
    Error,
    /// Invalid parameter or parameter combination (`-2`).
    BadValue,
    /// Method used in the wrong state (`-3`).
    InvalidOperation,
    /// The reporting object died and must be recreated (`-6`).
    DeadObject,
    /// Any other negative code.
    Unknown(i32),
}

impl PlatformStatus {
    pub const ERROR: i32 = -1;
    pub const ERROR_BAD_VALUE: i32 = -2;
    pub const ERROR_INVALID_OPERATION: i32 = -3;
    pub const ERROR_DEAD_OBJECT: i32 = -6;

    pub fn from_code(code: i32) -> Self {
        match code {
            Self::ERROR => Self::Error,
            Self::ERROR_BAD_VALUE => Self::BadValue,
            Self::ERROR_INVALID_OPERATION => Self::InvalidOperation,
            Self::ERROR_DEAD_OBJECT => Self::DeadObject,
            other => Self::Unknown(other),
        }
    }

    /// Interpret a raw byte-count-or-sentinel return value.
    pub fn check(raw: i32) -> Result<usize, Self> {
        if raw < 0 {
            Err(Self::from_code(raw))
        } else {
            Ok(raw as usize)
        }
    }

    /// The raw code as the platform reports it.
    pub fn code(&self) -> i32 {
        match self {
            Self::Error => Self::ERROR,
            Self::BadValue => Self::ERROR_BAD_VALUE,
            Self::InvalidOperation => Self::ERROR_INVALID_OPERATION,
            Self::DeadObject => Self::ERROR_DEAD_OBJECT,
            Self::Unknown(code) => *code,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Error => "Denotes a generic operation failure.",
            Self::BadValue => "Denotes a failure due to the use of an invalid value.",
            Self::InvalidOperation => "Denotes a failure due to the improper use of a method.",
            Self::DeadObject => {
                "An error code indicating that the object reporting it is no longer valid and needs to be recreated."
            }
            Self::Unknown(_) => "Unable to get Audio Track min buffer size",
        }
    }
}

impl fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
