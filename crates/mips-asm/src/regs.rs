//! Register number <-> `$name` mapping.

const NAMES: [&str; 32] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", //
    "$t0", "$t1", "$t2", "$t3", "$t4", "$t5", "$t6", "$t7", //
    "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", //
    "$t8", "$t9", "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

pub fn name(n: u32) -> Option<&'static str> {
    NAMES.get(n as usize).copied()
}

/// Accepts `$t1` style names and `$9` style numbers. Numbers are not
/// range-checked here; the encoder reports anything above 31.
pub fn parse(tok: &str) -> Option<u32> {
    let body = tok.strip_prefix('$')?;
    if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
        return body.parse().ok();
    }
    NAMES.iter().position(|n| &n[1..] == body).map(|i| i as u32)
}
