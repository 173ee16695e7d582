//! fedsql CLI - Command-line interface
//!
//! A REPL that normalizes SELECT lists and expressions and prints the
//! regenerated SQL, optionally with the expression tree as JSON.

use fedsql::binder::SessionContext;
use fedsql::common::{BuilderConfig, Result};
use fedsql::Frontend;
use std::io::{self, BufRead, Write};
use std::time::Instant;

struct Repl {
    frontend: Frontend,
    show_tree: bool,
}

fn main() {
    env_logger::init();

    let config = match BuilderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("fedsql v{}", env!("CARGO_PKG_VERSION"));
    println!("SQL function and expression normalization");
    println!("Type .help for help, .quit to exit");
    println!();

    let mut repl = Repl {
        frontend: Frontend::new(config, SessionContext::default()),
        show_tree: false,
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut multi_line_buffer = String::new();

    loop {
        // Show different prompt for multi-line input
        if multi_line_buffer.is_empty() {
            print!("fedsql> ");
        } else {
            print!("     -> ");
        }
        if let Err(e) = stdout.flush() {
            eprintln!("Error writing prompt: {}", e);
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        multi_line_buffer.push_str(line.trim_end());

        // Statements end with a semicolon; dot commands end with the line
        if !multi_line_buffer.trim().ends_with(';') && !multi_line_buffer.trim().starts_with('.') {
            multi_line_buffer.push(' ');
            continue;
        }

        let input = multi_line_buffer.trim().to_string();
        multi_line_buffer.clear();

        if input.is_empty() {
            continue;
        }

        if input.starts_with('.') {
            if !repl.handle_dot_command(&input) {
                break;
            }
            continue;
        }

        let sql = input.trim_end_matches(';').trim();
        let start = Instant::now();
        match repl.normalize(sql) {
            Ok(()) => {
                println!("normalized in {:.3}s", start.elapsed().as_secs_f64());
                println!();
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
            }
        }
    }

    println!("Goodbye!");
}

impl Repl {
    fn normalize(&self, sql: &str) -> Result<()> {
        let is_select = sql
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("SELECT"));

        if is_select {
            let projection = self.frontend.normalize_projection(sql)?;
            println!("{}", projection.to_table_string());
            println!("SELECT {}", projection.to_sql());
            if self.show_tree {
                println!("{}", serde_json::to_string_pretty(&projection.columns)?);
            }
        } else {
            let node = self.frontend.normalize_expression(sql)?;
            println!("{}", node.to_sql());
            if self.show_tree {
                println!("{}", serde_json::to_string_pretty(&node)?);
            }
        }
        Ok(())
    }

    /// Returns false when the REPL should exit
    fn handle_dot_command(&mut self, input: &str) -> bool {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");
        let argument = parts.get(1).copied();

        match command {
            ".quit" | ".exit" | ".q" => return false,

            ".help" | ".h" => {
                println!("Available commands:");
                println!("  .help              Show this help message");
                println!("  .quit              Exit the CLI");
                println!("  .tree on|off       Print the expression tree as JSON");
                println!("  .user <name>       Set the session user");
                println!("  .database <name>   Set the session database");
                println!("  .schema <name>     Set the session schema");
                println!("  .depth <n>         Set the maximum expression nesting depth");
                println!("  .function <name>   Show the catalog entry for a function");
                println!("  .session           Show the session values");
                println!();
            }

            ".tree" => match argument {
                Some("on") => self.show_tree = true,
                Some("off") => self.show_tree = false,
                _ => println!("Usage: .tree on|off"),
            },

            ".user" | ".database" | ".schema" => match argument {
                Some(value) => {
                    let session = self.frontend.session_mut();
                    let slot = match command {
                        ".user" => &mut session.user,
                        ".database" => &mut session.database,
                        _ => &mut session.schema,
                    };
                    *slot = Some(value.to_string());
                }
                None => println!("Usage: {} <name>", command),
            },

            ".session" => {
                let session = self.frontend.session();
                let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "(unset)".to_string());
                println!("  user:     {}", show(&session.user));
                println!("  database: {}", show(&session.database));
                println!("  schema:   {}", show(&session.schema));
                println!();
            }

            ".depth" => match argument.map(str::parse::<usize>) {
                Some(Ok(depth)) => {
                    if let Err(e) = self.frontend.set_max_nesting_depth(depth) {
                        eprintln!("Error: {}", e);
                    }
                }
                _ => println!(
                    "Usage: .depth <n> (currently {})",
                    self.frontend.config().max_nesting_depth
                ),
            },

            ".function" | ".f" => match argument.and_then(|name| self.frontend.catalog_entry(name)) {
                Some(entry) => {
                    println!("  {} {}", entry.id, entry.canonical_name);
                    println!("  class: {:?}", entry.class);
                    println!("  arguments: {}", entry.arity.describe());
                    println!();
                }
                None => eprintln!("Unknown function. Usage: .function <name>"),
            },

            _ => {
                eprintln!("Unknown command: {}", command);
                eprintln!("Type .help for available commands.");
            }
        }
        true
    }
}
