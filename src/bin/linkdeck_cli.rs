//! CLI tool for linkdeck - parses a links workbook and outputs card JSON
//!
//! Usage:
//!   linkdeck_cli <links.xlsx>                      # Output JSON to stdout
//!   linkdeck_cli <links.xlsx> --sheet Other        # Read another sheet
//!   linkdeck_cli <links.xlsx> -o cards.json        # Output JSON to file

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use linkdeck::aggregate::aggregate;
use linkdeck::normalize::normalize_rows;
use linkdeck::reader::read_rows;
use linkdeck::LINKS_SHEET_NAME;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: linkdeck_cli <links.xlsx> [--sheet NAME] [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let mut sheet_name = LINKS_SHEET_NAME.to_string();
    let mut output_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--sheet" if i + 1 < args.len() => {
                sheet_name = args[i + 1].clone();
                i += 2;
            }
            "-o" if i + 1 < args.len() => {
                output_path = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    // Read input file
    let data = match fs::read(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Decode and aggregate
    let records = match read_rows(&data, &sheet_name) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading workbook: {}", e);
            std::process::exit(1);
        }
    };
    let cards = aggregate(normalize_rows(&records));

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&cards) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
