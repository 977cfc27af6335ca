use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mips_translatron::{Decoder, Encoder, Mips32, Outcome, Word};
use mips_asm::bench::{run_suite, DEFAULT_SUITE};
use mips_asm::syntax::{parse_line, render, MemForm, Style};

#[derive(Parser, Debug)]
#[command(author, version, about = "MIPS subset assembler/disassembler", long_about = None)]
struct Cli {
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    /// How load/store operands are printed
    #[arg(long, value_enum, default_value_t = MemForm::Paren, global = true)]
    mem_form: MemForm,
    /// Print registers as `$N` instead of by name
    #[arg(long, global = true)]
    numeric_regs: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode one assembly line, e.g. "ADD $t1, $t2, $t3"
    Encode { line: String },
    /// Decode one machine word (hex or dec)
    Decode { word: String },
    /// Round-trip every line of FILE (default: built-in suite)
    Bench {
        #[arg(value_name = "FILE")]
        input: Option<String>,
    },
    /// List the instruction table
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(&hex.replace('_', ""), 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

#[derive(serde::Serialize)]
struct EncodeOut<'a> {
    line: &'a str,
    word: Word,
    outcome: Outcome,
}

#[derive(serde::Serialize)]
struct DecodeOut {
    word: Word,
    text: String,
    instruction: mips_translatron::Instruction,
    outcome: Outcome,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let style = Style { mem_form: cli.mem_form, numeric_regs: cli.numeric_regs };
    let codec = Mips32::new();

    match cli.cmd {
        Command::Encode { line } => {
            let parsed = parse_line(&line)?;
            let word = codec
                .encode(&parsed.mnemonic, &parsed.operands)
                .map_err(|e| anyhow!("{:?}: {e}", e.outcome()))?;
            match cli.format {
                OutputFormat::Text => println!("{word}"),
                OutputFormat::Json => {
                    let out = EncodeOut { line: line.trim(), word, outcome: Outcome::CompleteEncode };
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
        }
        Command::Decode { word } => {
            let word = Word(parse_u32(&word)?);
            let instr = codec.decode(word).map_err(|e| anyhow!("{:?}: {e}", e.outcome()))?;
            let text = render(&instr, &style);
            match cli.format {
                OutputFormat::Text => println!("{text}"),
                OutputFormat::Json => {
                    let out = DecodeOut { word, text, instruction: instr, outcome: Outcome::CompleteDecode };
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
        }
        Command::Bench { input } => {
            let src = match &input {
                Some(path) => std::fs::read_to_string(path)?,
                None => DEFAULT_SUITE.join("\n"),
            };
            let reports = run_suite(src.lines(), &style);
            let passed = reports.iter().filter(|r| r.passed).count();
            match cli.format {
                OutputFormat::Text => {
                    for r in &reports {
                        let status = if r.passed { "PASS" } else { "FAIL" };
                        let word = r.word.map(|w| w.to_string()).unwrap_or_else(|| "-".into());
                        println!("{status} {word:<10} {}", r.input);
                        if !r.passed {
                            if let Some(out) = &r.output {
                                println!("     got: {out}");
                            }
                            if let Some(err) = &r.error {
                                println!("     error: {err}");
                            }
                        }
                    }
                    println!("{passed}/{} passed", reports.len());
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            }
            anyhow::ensure!(passed == reports.len(), "{} case(s) failed", reports.len() - passed);
        }
        Command::Table => match cli.format {
            OutputFormat::Text => {
                println!("{:<6} {:<12} {:<12} {:<12}", "name", "format", "mask", "value");
                for d in codec.table() {
                    let (mask, value) = d.match_mask();
                    println!(
                        "{:<6} {:<12} {mask:#010x}   {value:#010x}",
                        d.mnemonic.as_str(),
                        format!("{:?}", d.format)
                    );
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(codec.table())?),
        },
    }

    Ok(())
}
