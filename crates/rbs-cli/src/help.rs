// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - Deterministic formatter for RBS signature files",
        output::title("rbsfmt"),
        output::version("0.1.0")
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("rbsfmt"),
        output::arg("<command>"),
        output::arg("[args]")
    );
    println!();
    println!("{}", output::section_header("Formatting:"));
    println!("  {} {}    Format a file and print to stdout", output::command("fmt"), output::arg("<file>"));
    println!("  {} {}  Format files in place", output::command("write"), output::arg("<file>..."));
    println!("  {} {}  Exit non-zero if any file is not formatted", output::command("check"), output::arg("<file>..."));
    println!();
    println!("{}", output::section_header("Debugging:"));
    println!("  {} {}    Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}  Parse a file and print the syntax tree", output::command("parse"), output::arg("<file>"));
    println!();
    println!("{}", output::section_header("Other:"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {}  Maximum line width (default 80)", output::arg("--width <n>"));
}
