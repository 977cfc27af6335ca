use crate::bits;
use crate::decoder::Mnemonic;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// `op rs rt rd 00000 funct`
    RType,
    /// `op rs rt 0000000000 funct`
    RTypeNoRd,
    /// `op 0000000000 rd 00000 funct`
    RTypeSingle,
    IType,
    Branch,
    LoadStore,
}

/// How a 16-bit immediate field maps to an operand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImmPolicy {
    /// 0..=0xFFFF
    Unsigned16,
    /// -0x8000..=0x7FFF, stored two's complement
    Signed16,
}

impl ImmPolicy {
    pub fn range(self) -> RangeInclusive<i64> {
        match self {
            ImmPolicy::Unsigned16 => 0..=0xFFFF,
            ImmPolicy::Signed16 => -0x8000..=0x7FFF,
        }
    }

    pub fn contains(self, value: i64) -> bool {
        self.range().contains(&value)
    }

    /// Field bits for an in-range value.
    pub fn to_raw(self, value: i64) -> u32 {
        (value as u32) & bits::mask(16)
    }

    pub fn from_raw(self, raw: u32) -> i64 {
        match self {
            ImmPolicy::Unsigned16 => i64::from(raw & bits::mask(16)),
            ImmPolicy::Signed16 => i64::from(bits::sign_extend(raw, 16)),
        }
    }
}

impl fmt::Display for ImmPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImmPolicy::Unsigned16 => f.write_str("unsigned 16-bit"),
            ImmPolicy::Signed16 => f.write_str("signed 16-bit"),
        }
    }
}

/// What a field holds. Register and immediate roles name the canonical
/// operand slot (1-based, printed order) they are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Opcode(&'static str),
    Funct(&'static str),
    Filler(&'static str),
    Reg(u8),
    Imm(u8, ImmPolicy),
}

impl Role {
    /// The constant bits this role pins, if any.
    pub fn literal(&self) -> Option<&'static str> {
        match *self {
            Role::Opcode(b) | Role::Funct(b) | Role::Filler(b) => Some(b),
            Role::Reg(_) | Role::Imm(..) => None,
        }
    }

    fn match_kind(&self) -> MatchOn {
        match self {
            Role::Opcode(_) => MatchOn::OPCODE,
            Role::Funct(_) => MatchOn::FUNCT,
            Role::Filler(_) => MatchOn::FILLER,
            Role::Reg(_) | Role::Imm(..) => MatchOn::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub hi: u8,
    pub width: u8,
    pub role: Role,
}

impl Field {
    pub fn lo(&self) -> u8 {
        self.hi + 1 - self.width
    }

    pub fn mask(&self) -> u32 {
        bits::mask(self.width) << self.lo()
    }
}

bitflags! {
/// Which constant fields decode checks for a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOn: u8 {
const OPCODE = 1 << 0;
const FUNCT = 1 << 1;
const FILLER = 1 << 2;
}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Register,
    Immediate(ImmPolicy),
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct InstrDesc {
    pub mnemonic: Mnemonic,
    pub format: Format,
    /// Packing order for encode; together the fields cover bits 31..=0.
    pub fields: &'static [Field],
    pub matches: MatchOn,
}

impl InstrDesc {
    /// `(hi, pattern)` pairs a word must satisfy to decode as this instruction.
    pub fn pattern(&self) -> impl Iterator<Item = (u8, &'static str)> + '_ {
        self.fields.iter().filter_map(move |f| {
            let lit = f.role.literal()?;
            self.matches.contains(f.role.match_kind()).then_some((f.hi, lit))
        })
    }

    pub fn matches_word(&self, word: u32) -> bool {
        self.pattern().all(|(hi, pat)| bits::match_field(word, hi, pat))
    }

    /// The `(mask, value)` equivalent of [`pattern`](Self::pattern):
    /// a word matches iff `word & mask == value`.
    pub fn match_mask(&self) -> (u32, u32) {
        self.pattern().fold((0, 0), |(mask, value), (hi, pat)| {
            let width = pat.len() as u8;
            let m = bits::set_field(0, hi, width, bits::mask(width));
            (mask | m, bits::set_field_literal(value, hi, pat))
        })
    }

    /// Expected operand kind per canonical slot.
    pub fn slots(&self) -> [Option<SlotKind>; 4] {
        let mut slots = [None; 4];
        for f in self.fields {
            let (slot, kind) = match f.role {
                Role::Reg(s) => (s, SlotKind::Register),
                Role::Imm(s, policy) => (s, SlotKind::Immediate(policy)),
                _ => continue,
            };
            if let Some(entry) = slots.get_mut(usize::from(slot).wrapping_sub(1)) {
                *entry = Some(kind);
            }
        }
        slots
    }

    pub fn arity(&self) -> usize {
        self.slots().iter().filter(|s| s.is_some()).count()
    }

    pub fn imm_policy(&self) -> Option<ImmPolicy> {
        self.fields.iter().find_map(|f| match f.role {
            Role::Imm(_, policy) => Some(policy),
            _ => None,
        })
    }
}

const fn opcode(bits: &'static str) -> Field {
    Field { hi: 31, width: 6, role: Role::Opcode(bits) }
}
const fn funct(bits: &'static str) -> Field {
    Field { hi: 5, width: 6, role: Role::Funct(bits) }
}
const fn filler(hi: u8, bits: &'static str) -> Field {
    Field { hi, width: bits.len() as u8, role: Role::Filler(bits) }
}
const fn rs(slot: u8) -> Field {
    Field { hi: 25, width: 5, role: Role::Reg(slot) }
}
const fn rt(slot: u8) -> Field {
    Field { hi: 20, width: 5, role: Role::Reg(slot) }
}
const fn rd(slot: u8) -> Field {
    Field { hi: 15, width: 5, role: Role::Reg(slot) }
}
const fn imm16(slot: u8, policy: ImmPolicy) -> Field {
    Field { hi: 15, width: 16, role: Role::Imm(slot, policy) }
}

const BY_FUNCT: MatchOn = MatchOn::OPCODE.union(MatchOn::FUNCT);
const BY_FUNCT_AND_FILLER: MatchOn = BY_FUNCT.union(MatchOn::FILLER);

use ImmPolicy::{Signed16, Unsigned16};

/// Decode tries entries in this order; patterns are mutually exclusive so
/// the order only matters for speed.
pub const TABLE: &[InstrDesc] = &[
    // R-type, printed `Rd, Rs, Rt`
    InstrDesc {
        mnemonic: Mnemonic::Add,
        format: Format::RType,
        fields: &[opcode("000000"), rs(2), rt(3), rd(1), filler(10, "00000"), funct("100000")],
        matches: BY_FUNCT,
    },
    InstrDesc {
        mnemonic: Mnemonic::Sub,
        format: Format::RType,
        fields: &[opcode("000000"), rs(2), rt(3), rd(1), filler(10, "00000"), funct("100010")],
        matches: BY_FUNCT,
    },
    InstrDesc {
        mnemonic: Mnemonic::And,
        format: Format::RType,
        fields: &[opcode("000000"), rs(2), rt(3), rd(1), filler(10, "00000"), funct("100100")],
        matches: BY_FUNCT,
    },
    InstrDesc {
        mnemonic: Mnemonic::Or,
        format: Format::RType,
        fields: &[opcode("000000"), rs(2), rt(3), rd(1), filler(10, "00000"), funct("100101")],
        matches: BY_FUNCT,
    },
    InstrDesc {
        mnemonic: Mnemonic::Slt,
        format: Format::RType,
        fields: &[opcode("000000"), rs(2), rt(3), rd(1), filler(10, "00000"), funct("101010")],
        matches: BY_FUNCT,
    },
    // R-type without Rd, printed `Rs, Rt`
    InstrDesc {
        mnemonic: Mnemonic::Mult,
        format: Format::RTypeNoRd,
        fields: &[opcode("000000"), rs(1), rt(2), filler(15, "0000000000"), funct("011000")],
        matches: BY_FUNCT,
    },
    InstrDesc {
        mnemonic: Mnemonic::Div,
        format: Format::RTypeNoRd,
        fields: &[opcode("000000"), rs(1), rt(2), filler(15, "0000000000"), funct("011010")],
        matches: BY_FUNCT,
    },
    // Move from HI/LO, printed `Rd`
    InstrDesc {
        mnemonic: Mnemonic::Mfhi,
        format: Format::RTypeSingle,
        fields: &[opcode("000000"), filler(25, "0000000000"), rd(1), filler(10, "00000"), funct("010000")],
        matches: BY_FUNCT_AND_FILLER,
    },
    InstrDesc {
        mnemonic: Mnemonic::Mflo,
        format: Format::RTypeSingle,
        fields: &[opcode("000000"), filler(25, "0000000000"), rd(1), filler(10, "00000"), funct("010010")],
        matches: BY_FUNCT_AND_FILLER,
    },
    // I-type, printed `Rt, Rs, imm`
    InstrDesc {
        mnemonic: Mnemonic::Addi,
        format: Format::IType,
        fields: &[opcode("001000"), rs(2), rt(1), imm16(3, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    InstrDesc {
        mnemonic: Mnemonic::Slti,
        format: Format::IType,
        fields: &[opcode("001010"), rs(2), rt(1), imm16(3, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    InstrDesc {
        mnemonic: Mnemonic::Andi,
        format: Format::IType,
        fields: &[opcode("001100"), rs(2), rt(1), imm16(3, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    InstrDesc {
        mnemonic: Mnemonic::Ori,
        format: Format::IType,
        fields: &[opcode("001101"), rs(2), rt(1), imm16(3, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    // printed `Rt, imm`
    InstrDesc {
        mnemonic: Mnemonic::Lui,
        format: Format::IType,
        fields: &[opcode("001111"), filler(25, "00000"), rt(1), imm16(2, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    // Branches, printed `Rs, Rt, offset`
    InstrDesc {
        mnemonic: Mnemonic::Beq,
        format: Format::Branch,
        fields: &[opcode("000100"), rs(1), rt(2), imm16(3, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    InstrDesc {
        mnemonic: Mnemonic::Bne,
        format: Format::Branch,
        fields: &[opcode("000101"), rs(1), rt(2), imm16(3, Unsigned16)],
        matches: MatchOn::OPCODE,
    },
    // Load/store, printed `Rt, offset, Rs(base)`
    InstrDesc {
        mnemonic: Mnemonic::Lw,
        format: Format::LoadStore,
        fields: &[opcode("100011"), rs(3), rt(1), imm16(2, Signed16)],
        matches: MatchOn::OPCODE,
    },
    InstrDesc {
        mnemonic: Mnemonic::Sw,
        format: Format::LoadStore,
        fields: &[opcode("101011"), rs(3), rt(1), imm16(2, Signed16)],
        matches: MatchOn::OPCODE,
    },
];

pub fn find(mnemonic: Mnemonic) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic == mnemonic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_tile_the_word() {
        for d in TABLE {
            let mut covered = 0u32;
            let mut total = 0u32;
            for f in d.fields {
                assert!(f.width >= 1 && f.hi < 32 && f.width <= f.hi + 1, "{}: bad field {f:?}", d.mnemonic);
                assert_eq!(covered & f.mask(), 0, "{}: overlapping field {f:?}", d.mnemonic);
                if let Some(lit) = f.role.literal() {
                    assert_eq!(lit.len(), usize::from(f.width), "{}: literal width", d.mnemonic);
                }
                covered |= f.mask();
                total += u32::from(f.width);
            }
            assert_eq!(covered, u32::MAX, "{}: fields leave gaps", d.mnemonic);
            assert_eq!(total, 32, "{}", d.mnemonic);
        }
    }

    #[test]
    fn every_mnemonic_has_one_descriptor() {
        for m in Mnemonic::ALL {
            assert_eq!(TABLE.iter().filter(|d| d.mnemonic == m).count(), 1, "{m}");
        }
        assert_eq!(TABLE.len(), Mnemonic::ALL.len());
    }

    #[test]
    fn slots_are_dense_and_unique() {
        for d in TABLE {
            let bound: Vec<u8> = d
                .fields
                .iter()
                .filter_map(|f| match f.role {
                    Role::Reg(s) | Role::Imm(s, _) => Some(s),
                    _ => None,
                })
                .collect();
            let mut sorted = bound.clone();
            sorted.sort_unstable();
            let expected: Vec<u8> = (1..=bound.len() as u8).collect();
            assert_eq!(sorted, expected, "{}", d.mnemonic);
            assert!(d.slots()[..d.arity()].iter().all(Option::is_some));
        }
    }

    #[test]
    fn immediates_are_sixteen_bits() {
        for d in TABLE {
            for f in d.fields {
                if let Role::Imm(..) = f.role {
                    assert_eq!((f.hi, f.width), (15, 16), "{}", d.mnemonic);
                }
            }
        }
    }

    #[test]
    fn opcode_is_always_checked() {
        for d in TABLE {
            assert!(d.matches.contains(MatchOn::OPCODE));
            assert_eq!(d.pattern().next().map(|(hi, p)| (hi, p.len())), Some((31, 6)));
        }
    }

    #[test]
    fn match_mask_shapes() {
        let add = find(Mnemonic::Add).unwrap();
        assert_eq!(add.match_mask(), (0xFC00_003F, 0x0000_0020));
        let mfhi = find(Mnemonic::Mfhi).unwrap();
        assert_eq!(mfhi.match_mask(), (0xFFFF_07FF, 0x0000_0010));
        let lw = find(Mnemonic::Lw).unwrap();
        assert_eq!(lw.match_mask(), (0xFC00_0000, 0x8C00_0000));
    }

    #[test]
    fn policies() {
        assert_eq!(find(Mnemonic::Lw).unwrap().imm_policy(), Some(ImmPolicy::Signed16));
        assert_eq!(find(Mnemonic::Sw).unwrap().imm_policy(), Some(ImmPolicy::Signed16));
        assert_eq!(find(Mnemonic::Addi).unwrap().imm_policy(), Some(ImmPolicy::Unsigned16));
        assert_eq!(find(Mnemonic::Add).unwrap().imm_policy(), None);
        assert_eq!(ImmPolicy::Signed16.to_raw(-4), 0xFFFC);
        assert_eq!(ImmPolicy::Signed16.from_raw(0xFFFC), -4);
        assert_eq!(ImmPolicy::Unsigned16.from_raw(0xFFFC), 0xFFFC);
    }
}
