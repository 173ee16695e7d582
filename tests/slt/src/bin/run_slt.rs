//! Run fedsql record files
//!
//! Usage: cargo run --bin run_slt [test_file_or_directory]

use fedsql_slt::TestRunner;
use std::env;
use std::path::Path;

const DEFAULT_CASES: &str = "tests/slt/cases";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let test_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CASES);
    let verbose = env::var("VERBOSE").is_ok();

    println!("=== fedsql record-file run ===\n");

    let path = Path::new(test_path);
    let mut runner = TestRunner::new().with_verbose(verbose);
    let result = if path.is_file() {
        println!("Running: {}", path.display());
        runner.run_file(path)
    } else if path.is_dir() {
        println!("Scanning directory: {}\n", path.display());
        runner.run_directory(path)
    } else {
        eprintln!("Error: Path '{}' does not exist", test_path);
        std::process::exit(1);
    };

    match result {
        Ok(report) => {
            println!("\nResults:");
            println!("  Passed: {}", report.passed);
            println!("  Failed: {}", report.failed);
            println!("  Skipped: {}", report.skipped);
            println!("  Pass rate: {:.1}%", report.pass_rate() * 100.0);
            if report.failed > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error running tests: {}", e);
            std::process::exit(1);
        }
    }
}
