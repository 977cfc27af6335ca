pub mod bits;
pub mod decoder;
pub mod error;
pub mod instructions;

pub mod isa {
    pub mod mips32; // table-driven MIPS32 subset
}

pub use decoder::{Decoder, Encoder, Instruction, Mnemonic, Operand, Operands, Word};
pub use error::{CodecError, Outcome};
pub use instructions::{Field, Format, ImmPolicy, InstrDesc, MatchOn, Role, TABLE};
pub use isa::mips32::Mips32;
