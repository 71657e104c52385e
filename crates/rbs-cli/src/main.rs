// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! rbsfmt CLI - format RBS signature files.

use std::env;
use std::fs;
use std::process;

use rbs_ast::LineMap;
use rbs_fmt::{FormatConfig, ParseError};

mod help;
mod output;

fn main() {
    output::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = match take_config(&mut args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}: {}", output::error_label(), message);
            process::exit(1);
        }
    };

    if args.is_empty() {
        help::print_usage();
        return;
    }

    match args[0].as_str() {
        "fmt" => {
            require_files(&args, "Usage: rbsfmt fmt <file.rbs>");
            cmd_fmt(&args[1], &config);
        }
        "write" => {
            require_files(&args, "Usage: rbsfmt write <file.rbs>...");
            cmd_write(&args[1..], &config);
        }
        "check" => {
            require_files(&args, "Usage: rbsfmt check <file.rbs>...");
            cmd_check(&args[1..], &config);
        }
        "lex" => {
            require_files(&args, "Usage: rbsfmt lex <file.rbs>");
            cmd_lex(&args[1]);
        }
        "parse" => {
            require_files(&args, "Usage: rbsfmt parse <file.rbs>");
            cmd_parse(&args[1]);
        }
        "help" | "--help" | "-h" => {
            help::print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("rbsfmt 0.1.0");
        }
        other => {
            // Treat as filename
            if other.ends_with(".rbs") {
                cmd_fmt(other, &config);
            } else {
                eprintln!("Unknown command: {}", other);
                help::print_usage();
                process::exit(1);
            }
        }
    }
}

/// Pull `--width <n>` out of the argument list, leaving the rest.
fn take_config(args: &mut Vec<String>) -> Result<FormatConfig, String> {
    let mut config = FormatConfig::default();
    while let Some(i) = args.iter().position(|a| a == "--width") {
        if i + 1 >= args.len() {
            return Err("--width needs a value".to_string());
        }
        config.max_line_width = args[i + 1]
            .parse()
            .map_err(|_| format!("invalid width '{}'", args[i + 1]))?;
        args.drain(i..i + 2);
    }
    Ok(config)
}

fn require_files(args: &[String], usage: &str) {
    if args.len() < 2 {
        eprintln!("{}", usage);
        process::exit(1);
    }
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn format_or_exit(path: &str, source: &str, config: &FormatConfig) -> String {
    match rbs_fmt::format_source_with_config(source, config) {
        Ok(formatted) => formatted,
        Err(e) => {
            show_error(source, path, &e);
            process::exit(1);
        }
    }
}

fn cmd_fmt(path: &str, config: &FormatConfig) {
    let source = read_source(path);
    print!("{}", format_or_exit(path, &source, config));
}

fn cmd_write(paths: &[String], config: &FormatConfig) {
    for path in paths {
        let source = read_source(path);
        let formatted = format_or_exit(path, &source, config);
        if formatted == source {
            continue;
        }
        if let Err(e) = fs::write(path, &formatted) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
        println!("{}", output::file_path(path));
    }
}

fn cmd_check(paths: &[String], config: &FormatConfig) {
    let mut dirty = 0;
    for path in paths {
        let source = read_source(path);
        let formatted = format_or_exit(path, &source, config);
        if formatted == source {
            println!("{} {}", output::status_pass(), path);
        } else {
            println!("{} {}", output::status_fail(), output::file_path(path));
            dirty += 1;
        }
    }
    if dirty > 0 {
        eprintln!(
            "\n{} file(s) would be reformatted; run 'rbsfmt write' to fix",
            dirty
        );
        process::exit(1);
    }
}

fn cmd_lex(path: &str) {
    let source = read_source(path);
    let result = match rbs_lexer::Lexer::new(&source).tokenize() {
        Ok(output) => output,
        Err(e) => {
            show_error(&source, path, &ParseError::from(e));
            process::exit(1);
        }
    };

    println!("=== Tokens ({}) ===\n", result.tokens.len());
    for tok in &result.tokens {
        println!("{:4}:{:<4} {:?}", tok.span.start, tok.span.end, tok.kind);
    }
    if !result.comments.is_empty() {
        println!("\n=== Comments ({}) ===\n", result.comments.len());
        for comment in &result.comments {
            println!("{:4}:{:<4} {:?}", comment.span.start, comment.span.end, comment.text);
        }
    }
}

fn cmd_parse(path: &str) {
    let source = read_source(path);
    match rbs_parser::parse(&source) {
        Ok(root) => {
            println!("=== Declarations ({}) ===\n", root.decls.len());
            for (i, decl) in root.decls.iter().enumerate() {
                println!("--- Declaration {} ---", i + 1);
                println!("{:#?}", decl);
                println!();
            }
        }
        Err(e) => {
            show_error(&source, path, &e);
            process::exit(1);
        }
    }
}

/// Show an error with a source excerpt and caret.
fn show_error(source: &str, path: &str, error: &ParseError) {
    let line_map = LineMap::new(source);
    let (line, col) = line_map.offset_to_line_col(error.span.start);
    let text = line_map.line_text(source, line).unwrap_or("");

    eprintln!();
    eprintln!("{}: {}", output::error_label(), error.message);
    eprintln!("  {} {}:{}:{}", output::error_arrow(), path, line, col);
    eprintln!("    {}", output::pipe());
    eprintln!("{} {} {}", output::line_number(line), output::pipe(), text);
    eprintln!(
        "    {} {}{}",
        output::pipe(),
        " ".repeat((col as usize).saturating_sub(1)),
        output::caret()
    );

    if let Some(hint) = &error.hint {
        eprintln!("    {}", output::pipe());
        eprintln!(
            "    {} {}: {}",
            output::hint_equals(),
            output::hint_label(),
            output::hint_text(hint)
        );
    }
}
