use tracing::{debug, trace};

use crate::bits;
use crate::decoder::{Decoder, Encoder, Instruction, Operand, Operands, Word};
use crate::error::CodecError;
use crate::instructions::{InstrDesc, Role, SlotKind, TABLE};

/// MIPS32 subset codec driven entirely by a descriptor table.
///
/// Holds no mutable state, so one instance can be shared freely between
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct Mips32 {
    table: &'static [InstrDesc],
}

impl Mips32 {
    pub fn new() -> Self {
        Self::with_table(TABLE)
    }

    pub fn with_table(table: &'static [InstrDesc]) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'static [InstrDesc] {
        self.table
    }

    /// Descriptor whose match pattern `word` satisfies; first match wins.
    pub fn descriptor_for(&self, word: u32) -> Option<&'static InstrDesc> {
        self.table.iter().find(|d| d.matches_word(word))
    }

    fn lookup(&self, mnemonic: &str) -> Option<&'static InstrDesc> {
        self.table.iter().find(|d| d.mnemonic.as_str() == mnemonic)
    }
}

impl Default for Mips32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for Mips32 {
    fn encode(&self, mnemonic: &str, operands: &[Operand]) -> Result<Word, CodecError> {
        let res = match self.lookup(mnemonic) {
            Some(desc) => validate(desc, operands).map(|()| Word(pack(desc, operands))),
            None => Err(CodecError::WrongCommand { mnemonic: mnemonic.to_string() }),
        };
        match &res {
            Ok(word) => trace!(%mnemonic, %word, "encoded"),
            Err(e) => debug!(%mnemonic, outcome = ?e.outcome(), "encode rejected: {e}"),
        }
        res
    }
}

impl Decoder for Mips32 {
    fn decode(&self, word: Word) -> Result<Instruction, CodecError> {
        let Some(desc) = self.descriptor_for(word.0) else {
            debug!(%word, "no descriptor matches");
            return Err(CodecError::Unmatched { word });
        };
        let instr = Instruction { mnemonic: desc.mnemonic, operands: unpack(desc, word.0) };
        trace!(%word, mnemonic = %instr.mnemonic, "decoded");
        Ok(instr)
    }
}

fn operand_at(operands: &[Operand], idx: usize) -> Operand {
    operands.get(idx).copied().unwrap_or_default()
}

/// Checks operand kinds, then register numbers, then immediate ranges,
/// each pass in slot order. The first failure is the one reported.
fn validate(desc: &InstrDesc, operands: &[Operand]) -> Result<(), CodecError> {
    let slots = desc.slots();
    let len = operands.len().max(slots.len());

    for idx in 0..len {
        let slot = idx + 1;
        let expected = slots.get(idx).copied().flatten();
        match (expected, operand_at(operands, idx)) {
            (Some(SlotKind::Register), Operand::Register(_)) => {}
            (Some(SlotKind::Immediate(_)), Operand::Immediate(_)) => {}
            (None, Operand::Empty) => {}
            (Some(SlotKind::Register), _) => return Err(CodecError::MissingReg { slot }),
            (Some(SlotKind::Immediate(_)), _) | (None, _) => {
                return Err(CodecError::InvalidParam { slot })
            }
        }
    }

    for (idx, op) in operands.iter().enumerate() {
        if let Operand::Register(value) = *op {
            if value > 31 {
                return Err(CodecError::InvalidReg { slot: idx + 1, value });
            }
        }
    }

    for (idx, kind) in slots.iter().enumerate() {
        if let (Some(SlotKind::Immediate(policy)), Operand::Immediate(value)) =
            (*kind, operand_at(operands, idx))
        {
            if !policy.contains(value) {
                return Err(CodecError::InvalidImmed { slot: idx + 1, value, policy });
            }
        }
    }
    Ok(())
}

/// Applies the descriptor's fields in declaration order to an all-zero word.
/// Operands must already have passed `validate`.
fn pack(desc: &InstrDesc, operands: &[Operand]) -> u32 {
    desc.fields.iter().fold(0u32, |word, f| match f.role {
        Role::Opcode(lit) | Role::Funct(lit) | Role::Filler(lit) => {
            bits::set_field_literal(word, f.hi, lit)
        }
        Role::Reg(slot) => match operand_at(operands, usize::from(slot).wrapping_sub(1)) {
            Operand::Register(n) => bits::set_field(word, f.hi, f.width, n),
            _ => word,
        },
        Role::Imm(slot, policy) => match operand_at(operands, usize::from(slot).wrapping_sub(1)) {
            Operand::Immediate(v) => bits::set_field(word, f.hi, f.width, policy.to_raw(v)),
            _ => word,
        },
    })
}

/// Extracts every operand field into its canonical slot.
fn unpack(desc: &InstrDesc, word: u32) -> Operands {
    let mut operands = Operands::default();
    for f in desc.fields {
        let (slot, value) = match f.role {
            Role::Reg(slot) => (slot, Operand::Register(bits::get_field(word, f.hi, f.width))),
            Role::Imm(slot, policy) => {
                (slot, Operand::Immediate(policy.from_raw(bits::get_field(word, f.hi, f.width))))
            }
            _ => continue,
        };
        if let Some(op) = operands.get_mut(usize::from(slot).wrapping_sub(1)) {
            *op = value;
        }
    }
    operands
}
