//! Record-file runner for fedsql
//!
//! Record files use a sqllogictest-like format:
//!
//! ```text
//! statement ok|error
//! <sql>
//!
//! query [rowsort]
//! <sql>
//! ----
//! <regenerated column 1>
//! <regenerated column 2>
//!
//! set user|database|schema <value>
//! set depth <n>
//! ```
//!
//! A `query` passes when the regenerated projection list, one column per
//! line, matches the expected block.

use fedsql::binder::{render_projection, SessionContext};
use fedsql::common::BuilderConfig;
use fedsql::Frontend;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error("Normalization failed: {0}")]
    Normalization(#[from] fedsql::common::Error),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type TestResult<T> = Result<T, TestError>;

/// A test runner for record files
pub struct TestRunner {
    frontend: Frontend,
    verbose: bool,
}

impl TestRunner {
    pub fn new() -> Self {
        TestRunner {
            frontend: Frontend::default(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reset configuration and session for a new file
    pub fn reset(&mut self) {
        self.frontend = Frontend::new(BuilderConfig::default(), SessionContext::default());
    }

    /// Run a single test file
    pub fn run_file(&mut self, path: &Path) -> TestResult<TestReport> {
        let content = fs::read_to_string(path)?;
        self.run_tests(&content)
    }

    /// Run tests from a string
    pub fn run_tests(&mut self, content: &str) -> TestResult<TestReport> {
        let mut report = TestReport::default();

        for test in parse_records(content)? {
            match self.run_test(&test) {
                Ok(Outcome::Passed) => report.passed += 1,
                Ok(Outcome::Failed) => report.failed += 1,
                Ok(Outcome::Skipped) => report.skipped += 1,
                Ok(Outcome::Halted) => break,
                Err(e) => {
                    if self.verbose {
                        eprintln!("Test error: {}", e);
                    }
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Run a single test case
    fn run_test(&mut self, test: &TestCase) -> TestResult<Outcome> {
        match test {
            TestCase::Statement { sql, expected_error } => {
                let result = self.frontend.normalize_projection(sql);
                match (result, expected_error) {
                    (Ok(_), false) | (Err(_), true) => Ok(Outcome::Passed),
                    (Ok(_), true) => {
                        if self.verbose {
                            eprintln!("Expected error but got success for: {}", sql);
                        }
                        Ok(Outcome::Failed)
                    }
                    (Err(e), false) => {
                        if self.verbose {
                            eprintln!("Unexpected error for '{}': {}", sql, e);
                        }
                        Ok(Outcome::Failed)
                    }
                }
            }
            TestCase::Query {
                sql,
                expected,
                sort_mode,
            } => match self.frontend.normalize_projection(sql) {
                Ok(projection) => {
                    let mut actual: Vec<String> = projection
                        .columns
                        .iter()
                        .map(|column| render_projection(std::slice::from_ref(column)))
                        .collect();
                    let mut expected = expected.clone();

                    if *sort_mode == SortMode::RowSort {
                        actual.sort();
                        expected.sort();
                    }

                    if actual == expected {
                        Ok(Outcome::Passed)
                    } else {
                        if self.verbose {
                            eprintln!("Regenerated SQL mismatch for: {}", sql);
                            eprintln!("Expected:\n{}", expected.join("\n"));
                            eprintln!("Actual:\n{}", actual.join("\n"));
                        }
                        Ok(Outcome::Failed)
                    }
                }
                Err(e) => {
                    if self.verbose {
                        eprintln!("Query error for '{}': {}", sql, e);
                    }
                    Ok(Outcome::Failed)
                }
            },
            TestCase::Set { setting, value } => {
                self.apply_setting(*setting, value)?;
                Ok(Outcome::Passed)
            }
            TestCase::Halt => Ok(Outcome::Halted),
            TestCase::Skip => Ok(Outcome::Skipped),
        }
    }

    fn apply_setting(&mut self, setting: Setting, value: &str) -> TestResult<()> {
        log::debug!("set {:?} = {}", setting, value);
        match setting {
            Setting::User => self.frontend.session_mut().user = Some(value.to_string()),
            Setting::Database => self.frontend.session_mut().database = Some(value.to_string()),
            Setting::Schema => self.frontend.session_mut().schema = Some(value.to_string()),
            Setting::Depth => {
                let depth = value.parse().map_err(|_| {
                    fedsql::common::Error::Config(format!("depth must be a positive integer, got '{}'", value))
                })?;
                self.frontend.set_max_nesting_depth(depth)?;
            }
        }
        Ok(())
    }

    /// Run all record files under a directory, resetting between files
    pub fn run_directory(&mut self, dir: &Path) -> TestResult<TestReport> {
        let mut total = TestReport::default();
        for path in collect_test_files(dir)? {
            self.reset();
            let report = self.run_file(&path)?;
            if self.verbose {
                println!("{}: {} passed, {} failed", path.display(), report.passed, report.failed);
            }
            total.merge(&report);
        }
        Ok(total)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Record files (`.test`, `.slt`) under `dir`, sorted by path
pub fn collect_test_files(dir: &Path) -> TestResult<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|e| e == "slt" || e == "test") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

enum Outcome {
    Passed,
    Failed,
    Skipped,
    Halted,
}

/// Report from running tests
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TestReport {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.passed as f64 / self.total() as f64
        }
    }

    pub fn merge(&mut self, other: &TestReport) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Sort mode for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    NoSort,
    RowSort,
}

/// Session or configuration value changed by a `set` record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    User,
    Database,
    Schema,
    Depth,
}

/// A single record from a test file
#[derive(Debug, Clone, PartialEq)]
pub enum TestCase {
    Statement {
        sql: String,
        expected_error: bool,
    },
    Query {
        sql: String,
        expected: Vec<String>,
        sort_mode: SortMode,
    },
    Set {
        setting: Setting,
        value: String,
    },
    Halt,
    Skip,
}

/// Parse a record file
pub fn parse_records(content: &str) -> TestResult<Vec<TestCase>> {
    let mut tests = Vec::new();
    let mut lines = content.lines().enumerate().peekable();

    while let Some((index, line)) = lines.next() {
        let line = line.trim();
        let line_number = index + 1;

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("statement") => {
                let expected_error = match words.next() {
                    Some("ok") => false,
                    Some("error") => true,
                    other => {
                        return Err(TestError::ParseError {
                            line: line_number,
                            message: format!("expected 'ok' or 'error', got {:?}", other),
                        })
                    }
                };
                let mut sql_lines = Vec::new();
                while let Some((_, sql_line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
                    sql_lines.push(sql_line.to_string());
                }
                if !sql_lines.is_empty() {
                    tests.push(TestCase::Statement {
                        sql: sql_lines.join("\n"),
                        expected_error,
                    });
                }
            }

            Some("query") => {
                let sort_mode = match words.next() {
                    Some("rowsort") => SortMode::RowSort,
                    _ => SortMode::NoSort,
                };

                // SQL runs until the ---- separator
                let mut sql_lines = Vec::new();
                let mut separated = false;
                while let Some((_, sql_line)) = lines.next() {
                    if sql_line.trim() == "----" {
                        separated = true;
                        break;
                    }
                    if !sql_line.trim().is_empty() {
                        sql_lines.push(sql_line.to_string());
                    }
                }
                if !separated {
                    return Err(TestError::ParseError {
                        line: line_number,
                        message: "query without a ---- separator".to_string(),
                    });
                }

                // Expected block runs until an empty line
                let mut expected = Vec::new();
                while let Some((_, result_line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
                    expected.push(result_line.trim().to_string());
                }

                tests.push(TestCase::Query {
                    sql: sql_lines.join("\n"),
                    expected,
                    sort_mode,
                });
            }

            Some("set") => {
                let setting = match words.next() {
                    Some("user") => Setting::User,
                    Some("database") => Setting::Database,
                    Some("schema") => Setting::Schema,
                    Some("depth") => Setting::Depth,
                    other => {
                        return Err(TestError::ParseError {
                            line: line_number,
                            message: format!("unknown setting {:?}", other),
                        })
                    }
                };
                let value = words.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    return Err(TestError::ParseError {
                        line: line_number,
                        message: "set without a value".to_string(),
                    });
                }
                tests.push(TestCase::Set { setting, value });
            }

            Some("halt") => {
                tests.push(TestCase::Halt);
                break;
            }

            // The record that follows is skipped
            Some("skipif") | Some("onlyif") => {
                while lines.next_if(|(_, l)| !l.trim().is_empty()).is_some() {}
                tests.push(TestCase::Skip);
            }

            Some(other) => {
                return Err(TestError::ParseError {
                    line: line_number,
                    message: format!("unknown directive '{}'", other),
                })
            }
            None => {}
        }
    }

    Ok(tests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_statement() {
        let mut runner = TestRunner::new().with_verbose(true);
        let content = r#"
statement ok
SELECT 1
"#;
        let report = runner.run_tests(content).unwrap();
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_simple_query() {
        let mut runner = TestRunner::new().with_verbose(true);
        let content = r#"
query
SELECT POWER(a, 2) AS sq, TRIM(LEADING 'x' FROM b) FROM t
----
POWER(a, 2) AS sq
TRIM(LEADING 'x' FROM b)
"#;
        let report = runner.run_tests(content).unwrap();
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_expected_error() {
        let mut runner = TestRunner::new().with_verbose(true);
        let content = r#"
statement error
SELECT NO_SUCH_FUNCTION(1)

statement error
SELECT ABS(1, 2)
"#;
        let report = runner.run_tests(content).unwrap();
        assert_eq!(report.passed, 2);
    }

    #[test]
    fn test_mismatch_counts_as_failure() {
        let mut runner = TestRunner::new();
        let content = r#"
query
SELECT a
----
b
"#;
        let report = runner.run_tests(content).unwrap();
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_settings() {
        let mut runner = TestRunner::new().with_verbose(true);
        let content = r#"
set user alice

query
SELECT CURRENT_USER
----
'alice'

set depth 2

statement error
SELECT ABS(ABS(ABS(x)))
"#;
        let report = runner.run_tests(content).unwrap();
        assert_eq!(report.passed, 4);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_rowsort_and_halt() {
        let mut runner = TestRunner::new();
        let content = r#"
query rowsort
SELECT b, a
----
a
b

halt

statement ok
SELECT 1
"#;
        let report = runner.run_tests(content).unwrap();
        assert_eq!(report.passed, 1);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_skipif_skips_next_record() {
        let tests = parse_records("skipif other\nstatement ok\nSELECT 1\n").unwrap();
        assert_eq!(tests, vec![TestCase::Skip]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_records("statement maybe\nSELECT 1\n"),
            Err(TestError::ParseError { line: 1, .. })
        ));
        assert!(matches!(
            parse_records("query\nSELECT 1\n"),
            Err(TestError::ParseError { .. })
        ));
        assert!(matches!(
            parse_records("\nfrobnicate\n"),
            Err(TestError::ParseError { line: 2, .. })
        ));
    }
}
