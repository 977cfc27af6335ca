use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-bit encoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(pub u32);

impl From<u32> for Word {
    fn from(raw: u32) -> Self {
        Word(raw)
    }
}

impl From<Word> for u32 {
    fn from(w: Word) -> Self {
        w.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
    Add,
    And,
    Or,
    Sub,
    Slt,
    Div,
    Mult,
    Mfhi,
    Mflo,
    Addi,
    Andi,
    Ori,
    Slti,
    Lui,
    Beq,
    Bne,
    Lw,
    Sw,
}

impl Mnemonic {
    pub const ALL: [Mnemonic; 18] = [
        Mnemonic::Add,
        Mnemonic::And,
        Mnemonic::Or,
        Mnemonic::Sub,
        Mnemonic::Slt,
        Mnemonic::Div,
        Mnemonic::Mult,
        Mnemonic::Mfhi,
        Mnemonic::Mflo,
        Mnemonic::Addi,
        Mnemonic::Andi,
        Mnemonic::Ori,
        Mnemonic::Slti,
        Mnemonic::Lui,
        Mnemonic::Beq,
        Mnemonic::Bne,
        Mnemonic::Lw,
        Mnemonic::Sw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Add => "ADD",
            Mnemonic::And => "AND",
            Mnemonic::Or => "OR",
            Mnemonic::Sub => "SUB",
            Mnemonic::Slt => "SLT",
            Mnemonic::Div => "DIV",
            Mnemonic::Mult => "MULT",
            Mnemonic::Mfhi => "MFHI",
            Mnemonic::Mflo => "MFLO",
            Mnemonic::Addi => "ADDI",
            Mnemonic::Andi => "ANDI",
            Mnemonic::Ori => "ORI",
            Mnemonic::Slti => "SLTI",
            Mnemonic::Lui => "LUI",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bne => "BNE",
            Mnemonic::Lw => "LW",
            Mnemonic::Sw => "SW",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive lookup: `"add"` is not a mnemonic.
impl FromStr for Mnemonic {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mnemonic::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CodecError::WrongCommand { mnemonic: s.to_string() })
    }
}

/// One operand slot as produced by a parser or by the decoder.
///
/// Values are kept wide so that out-of-range input survives until
/// validation can report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operand {
    Register(u32),
    Immediate(i64),
    #[default]
    Empty,
}

impl Operand {
    pub fn is_empty(&self) -> bool {
        matches!(self, Operand::Empty)
    }
}

/// Operands in canonical (printed) order; unused trailing slots are `Empty`.
pub type Operands = [Operand; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: Operands,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, ops: &[Operand]) -> Self {
        let mut operands = Operands::default();
        for (slot, op) in operands.iter_mut().zip(ops) {
            *slot = *op;
        }
        Self { mnemonic, operands }
    }

    /// Number of leading non-empty operands.
    pub fn arity(&self) -> usize {
        self.operands.iter().take_while(|op| !op.is_empty()).count()
    }
}

pub trait Encoder {
    fn encode(&self, mnemonic: &str, operands: &[Operand]) -> Result<Word, CodecError>;

    fn encode_instruction(&self, instr: &Instruction) -> Result<Word, CodecError> {
        self.encode(instr.mnemonic.as_str(), &instr.operands)
    }
}

pub trait Decoder {
    fn decode(&self, word: Word) -> Result<Instruction, CodecError>;
}
