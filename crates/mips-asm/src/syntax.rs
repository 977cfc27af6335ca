use mips_translatron::instructions::{self, Format};
use mips_translatron::{Instruction, Operand};
use serde::{Deserialize, Serialize};

use crate::regs;

/// How load/store operands are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum MemForm {
    /// `LW $t0, #0x4($s1)`
    #[default]
    Paren,
    /// `LW $t0, #0x4, $s1`
    Comma,
}

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    pub mem_form: MemForm,
    /// Print `$9` instead of `$t1`.
    pub numeric_regs: bool,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("empty line")]
    MissingMnemonic,
    #[error("operand {index} is empty")]
    EmptyOperand { index: usize },
    #[error("{count} operands given, at most 4 are supported")]
    TooManyOperands { count: usize },
    #[error("unknown register {0:?}")]
    UnknownRegister(String),
    #[error("bad immediate {0:?}")]
    BadImmediate(String),
}

/// A tokenized line: mnemonic exactly as written plus operands in
/// printed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLine {
    pub mnemonic: String,
    pub operands: Vec<Operand>,
}

fn parse_num(s: &str) -> Option<i64> {
    let (neg, t) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let v = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        t.parse::<i64>().ok()?
    };
    Some(if neg { -v } else { v })
}

fn parse_operand(tok: &str) -> Result<Operand, SyntaxError> {
    if tok.starts_with('$') {
        return regs::parse(tok)
            .map(Operand::Register)
            .ok_or_else(|| SyntaxError::UnknownRegister(tok.to_string()));
    }
    let body = tok.strip_prefix('#').unwrap_or(tok);
    parse_num(body)
        .map(Operand::Immediate)
        .ok_or_else(|| SyntaxError::BadImmediate(tok.to_string()))
}

/// Splits `MN a, b, c` into a mnemonic and operands. `#off($base)` is
/// expanded into two operands, offset then base.
pub fn parse_line(line: &str) -> Result<ParsedLine, SyntaxError> {
    let line = line.trim();
    let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
        Some((mn, rest)) => (mn, rest.trim()),
        None => (line, ""),
    };
    if mnemonic.is_empty() {
        return Err(SyntaxError::MissingMnemonic);
    }

    let mut operands = Vec::new();
    if !rest.is_empty() {
        for (index, tok) in rest.split(',').map(str::trim).enumerate() {
            if tok.is_empty() {
                return Err(SyntaxError::EmptyOperand { index: index + 1 });
            }
            match tok.strip_suffix(')').and_then(|t| t.split_once('(')) {
                Some((off, base)) => {
                    operands.push(parse_operand(off.trim())?);
                    operands.push(parse_operand(base.trim())?);
                }
                None => operands.push(parse_operand(tok)?),
            }
        }
    }
    if operands.len() > 4 {
        return Err(SyntaxError::TooManyOperands { count: operands.len() });
    }
    Ok(ParsedLine { mnemonic: mnemonic.to_string(), operands })
}

fn fmt_operand(out: &mut String, op: &Operand, style: &Style) {
    match *op {
        Operand::Register(n) => match regs::name(n) {
            Some(name) if !style.numeric_regs => out.push_str(name),
            _ => out.push_str(&format!("${n}")),
        },
        Operand::Immediate(v) if v < 0 => out.push_str(&format!("#-0x{:X}", v.unsigned_abs())),
        Operand::Immediate(v) => out.push_str(&format!("#0x{v:X}")),
        Operand::Empty => {}
    }
}

pub fn render(instr: &Instruction, style: &Style) -> String {
    let mut out = instr.mnemonic.to_string();
    let ops: Vec<&Operand> = instr.operands.iter().take_while(|op| !op.is_empty()).collect();
    let mem = instructions::find(instr.mnemonic).map(|d| d.format) == Some(Format::LoadStore);

    for (i, op) in ops.iter().enumerate() {
        if mem && style.mem_form == MemForm::Paren && i == 2 {
            out.push('(');
            fmt_operand(&mut out, op, style);
            out.push(')');
            continue;
        }
        out.push_str(if i == 0 { " " } else { ", " });
        fmt_operand(&mut out, op, style);
    }
    out
}
