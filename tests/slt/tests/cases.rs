use fedsql_slt::TestRunner;
use std::path::Path;

#[test]
fn record_files_pass() {
    let cases = Path::new(env!("CARGO_MANIFEST_DIR")).join("cases");
    let report = TestRunner::new()
        .with_verbose(true)
        .run_directory(&cases)
        .unwrap();
    assert!(report.total() > 0);
    assert_eq!(report.failed, 0);
}
