use super::*;

#[test]
fn combined_joins_stdout_then_stderr() {
    let output = CommandOutput { success: false, code: Some(1), stdout: "out\n".into(), stderr: "err\n".into() };
    assert_eq!(output.combined(), "out\nerr\n");
}

#[test]
fn find_on_path_locates_file_in_search_list() {
    let empty = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    let tool = bin.path().join("fake-tool");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    make_executable(&tool);

    let search = std::env::join_paths([empty.path(), bin.path()]).unwrap();
    assert_eq!(find_on_path("fake-tool", Some(search)), Some(tool));
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) {}

#[cfg(unix)]
#[test]
fn find_on_path_skips_files_without_execute_bit() {
    use std::os::unix::fs::PermissionsExt;

    let bin = tempfile::tempdir().unwrap();
    let tool = bin.path().join("trivy");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();

    let search = std::env::join_paths([bin.path()]).unwrap();
    assert_eq!(find_on_path("trivy", Some(search)), None);
}

#[test]
fn find_on_path_misses_unknown_program() {
    let bin = tempfile::tempdir().unwrap();
    let search = std::env::join_paths([bin.path()]).unwrap();
    assert_eq!(find_on_path("definitely-not-here", Some(search)), None);
    assert_eq!(find_on_path("definitely-not-here", None), None);
}

#[test]
fn find_on_path_ignores_directories() {
    let bin = tempfile::tempdir().unwrap();
    std::fs::create_dir(bin.path().join("trivy")).unwrap();
    let search = std::env::join_paths([bin.path()]).unwrap();
    assert_eq!(find_on_path("trivy", Some(search)), None);
}

#[cfg(unix)]
#[tokio::test]
async fn system_runner_captures_exit_status_and_output() {
    let runner = SystemRunner;
    let output = runner
        .run("sh", &["-c".to_owned(), "echo hello; echo oops >&2; exit 3".to_owned()])
        .await
        .unwrap();
    assert!(!output.success);
    assert_eq!(output.code, Some(3));
    assert_eq!(output.stdout, "hello\n");
    assert_eq!(output.stderr, "oops\n");
}

#[tokio::test]
async fn system_runner_reports_missing_program() {
    let runner = SystemRunner;
    assert!(runner.run("syncx-no-such-binary", &[]).await.is_err());
    assert!(!runner.is_installed("syncx-no-such-binary"));
}
