use crate::decoder::{Instruction, Word};
use crate::instructions::ImmPolicy;
use serde::{Deserialize, Serialize};

/// Terminal status of one encode or decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    NoError,
    WrongCommand,
    MissingReg,
    InvalidParam,
    InvalidReg,
    InvalidImmed,
    CompleteEncode,
    CompleteDecode,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::NoError | Outcome::CompleteEncode | Outcome::CompleteDecode)
    }
}

impl From<&Result<Word, CodecError>> for Outcome {
    fn from(r: &Result<Word, CodecError>) -> Self {
        match r {
            Ok(_) => Outcome::CompleteEncode,
            Err(e) => e.outcome(),
        }
    }
}

impl From<&Result<Instruction, CodecError>> for Outcome {
    fn from(r: &Result<Instruction, CodecError>) -> Self {
        match r {
            Ok(_) => Outcome::CompleteDecode,
            Err(e) => e.outcome(),
        }
    }
}

/// Why an encode or decode call produced nothing. Slots are 1-based,
/// in printed operand order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unknown mnemonic {mnemonic:?}")]
    WrongCommand { mnemonic: String },
    #[error("no instruction matches word {word}")]
    Unmatched { word: Word },
    #[error("operand {slot} must be a register")]
    MissingReg { slot: usize },
    #[error("operand {slot} is not an immediate the instruction accepts")]
    InvalidParam { slot: usize },
    #[error("operand {slot}: register {value} is outside 0..=31")]
    InvalidReg { slot: usize, value: u32 },
    #[error("operand {slot}: immediate {value} is outside the {policy} range")]
    InvalidImmed { slot: usize, value: i64, policy: ImmPolicy },
}

impl CodecError {
    pub fn outcome(&self) -> Outcome {
        match self {
            CodecError::WrongCommand { .. } | CodecError::Unmatched { .. } => Outcome::WrongCommand,
            CodecError::MissingReg { .. } => Outcome::MissingReg,
            CodecError::InvalidParam { .. } => Outcome::InvalidParam,
            CodecError::InvalidReg { .. } => Outcome::InvalidReg,
            CodecError::InvalidImmed { .. } => Outcome::InvalidImmed,
        }
    }
}
