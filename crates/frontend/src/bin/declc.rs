//! `declc` — parses a sequence of C declarations from a file (or stdin)
//! and prints the resulting symbol types, driving the declaration
//! pipeline exactly as the front end proper would, minus code generation.

use std::io::Read;
use std::process::ExitCode;

use c65_frontend::{DefaultParser, Options};
use c65_types::StorageClass;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut ansi = false;
    let mut path = None;
    for arg in args {
        match arg.as_str() {
            "--ansi" => ansi = true,
            other => path = Some(other.to_string()),
        }
    }

    let source = match path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("declc: cannot read {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("declc: cannot read stdin: {e}");
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let options = Options {
        ansi,
        default_char_signed: true,
    };
    let mut parser = DefaultParser::new_default(&source, options);

    while !matches!(parser.cursor.current(), c65_frontend::lexer::Token::Eof) {
        let decl = parser.parse_top_level_decl(StorageClass::EXTERN);
        match decl.ident {
            Some(ident) => println!("{ident}: {}", decl.ty),
            None => println!("<anonymous>: {}", decl.ty),
        }
    }

    if parser.diags.has_errors() {
        for diag in parser.diags.errors() {
            eprintln!("error: {} at {:?}", diag.error, diag.span);
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
