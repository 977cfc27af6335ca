pub mod bench;
pub mod regs;
pub mod syntax;

// Re-export commonly used types/functions for consumers
pub use bench::{run_case, run_suite, CaseReport, DEFAULT_SUITE};
pub use syntax::{parse_line, render, MemForm, ParsedLine, Style, SyntaxError};
