use pretty_assertions::assert_eq;

use mips_translatron::decoder::Operand::{Immediate as I, Register as R};
use mips_translatron::{CodecError, Decoder, Instruction, Mips32, Mnemonic, Outcome, Word};

fn dec(raw: u32) -> Result<Instruction, CodecError> {
    Mips32::new().decode(Word(raw))
}

#[test]
fn reference_words() {
    assert_eq!(dec(0x014B_4820), Ok(Instruction::new(Mnemonic::Add, &[R(9), R(10), R(11)])));
    assert_eq!(dec(0x2128_000A), Ok(Instruction::new(Mnemonic::Addi, &[R(8), R(9), I(0xA)])));
    assert_eq!(dec(0x8E28_0004), Ok(Instruction::new(Mnemonic::Lw, &[R(8), I(4), R(17)])));
    assert_eq!(dec(0x1211_0020), Ok(Instruction::new(Mnemonic::Beq, &[R(16), R(17), I(0x20)])));
}

#[test]
fn shared_opcode_split_by_funct() {
    assert_eq!(dec(0x0043_0822).unwrap().mnemonic, Mnemonic::Sub);
    assert_eq!(dec(0x0043_0824).unwrap().mnemonic, Mnemonic::And);
    assert_eq!(dec(0x0043_0825).unwrap().mnemonic, Mnemonic::Or);
    assert_eq!(dec(0x0043_082A).unwrap().mnemonic, Mnemonic::Slt);
    assert_eq!(dec(0x0085_0018), Ok(Instruction::new(Mnemonic::Mult, &[R(4), R(5)])));
    assert_eq!(dec(0x016C_001A), Ok(Instruction::new(Mnemonic::Div, &[R(11), R(12)])));
    assert_eq!(dec(0x0000_1010), Ok(Instruction::new(Mnemonic::Mfhi, &[R(2)])));
    assert_eq!(dec(0x0000_1812), Ok(Instruction::new(Mnemonic::Mflo, &[R(3)])));
}

#[test]
fn move_from_special_requires_zero_fillers() {
    // MFHI with rs != 0
    assert_eq!(dec(0x0020_1010), Err(CodecError::Unmatched { word: Word(0x0020_1010) }));
    // MFLO with shamt != 0
    assert!(dec(0x0000_1052).is_err());
}

#[test]
fn canonical_slot_differs_from_field_order() {
    // LW stores base in rs but prints it last
    let d = dec(0x8FA8_FFFC).unwrap();
    assert_eq!(d.operands, [R(8), I(-4), R(29), mips_translatron::Operand::Empty]);
    // SW with the same layout
    let d = dec(0xAE28_0008).unwrap();
    assert_eq!(d, Instruction::new(Mnemonic::Sw, &[R(8), I(8), R(17)]));
    // I-type puts rt first
    let d = dec(0x3272_00FF).unwrap();
    assert_eq!(d, Instruction::new(Mnemonic::Andi, &[R(18), R(19), I(0xFF)]));
    // LUI
    assert_eq!(dec(0x3C04_1000), Ok(Instruction::new(Mnemonic::Lui, &[R(4), I(0x1000)])));
}

#[test]
fn unknown_words_are_wrong_command() {
    for raw in [0xFC00_0000u32, 0x0000_003F, 0x0000_0000, 0xFFFF_FFFF, 0x0800_0000] {
        let res = dec(raw);
        assert_eq!(Outcome::from(&res), Outcome::WrongCommand, "{raw:#010x}");
    }
    assert_eq!(Outcome::from(&dec(0x014B_4820)), Outcome::CompleteDecode);
}

#[test]
fn unsigned_immediates_are_not_sign_extended() {
    let d = dec(0x2041_FFFF).unwrap();
    assert_eq!(d.operands[2], I(0xFFFF));
    let d = dec(0x1653_8000).unwrap();
    assert_eq!(d, Instruction::new(Mnemonic::Bne, &[R(18), R(19), I(0x8000)]));
}
