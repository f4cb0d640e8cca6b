use super::*;
use crate::services::command::CommandOutput;
use crate::state::test_helpers::FakeRunner;

#[test]
fn validate_project_name_accepts_portable_names() {
    for name in ["docs", "api-docs", "site_v2", "handbook.old", "A1"] {
        assert!(validate_project_name(name).is_ok(), "{name} should be valid");
    }
}

#[test]
fn validate_project_name_rejects_path_tricks() {
    for name in ["", ".", "..", ".hidden", "a/b", "../escape", "with space", "semi;colon"] {
        assert!(
            matches!(validate_project_name(name), Err(HostingError::InvalidName(_))),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn validate_project_name_rejects_overlong_names() {
    let name = "a".repeat(MAX_PROJECT_NAME_LEN + 1);
    assert!(validate_project_name(&name).is_err());
    assert!(validate_project_name(&"a".repeat(MAX_PROJECT_NAME_LEN)).is_ok());
}

#[test]
fn initialize_creates_missing_directory() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("projects");
    initialize(&dir).unwrap();
    assert!(dir.is_dir());
    initialize(&dir).unwrap();
}

#[test]
fn hosted_url_uses_last_path_component() {
    assert_eq!(hosted_url("./projects/docs").as_deref(), Some("/projects/docs/"));
    assert_eq!(hosted_url("/srv/projects/handbook").as_deref(), Some("/projects/handbook/"));
    assert_eq!(hosted_url(""), None);
}

#[tokio::test]
async fn clone_project_runs_git_clone_into_named_dir() {
    let root = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();

    let path = clone_project(&runner, root.path(), "docs", "https://example.com/docs.git")
        .await
        .unwrap();

    assert_eq!(path, root.path().join("docs"));
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let target = path.display().to_string();
    assert_eq!(calls[0].0, "git");
    assert_eq!(calls[0].1, vec!["clone", "--", "https://example.com/docs.git", target.as_str()]);
}

#[tokio::test]
async fn clone_project_rejects_option_like_urls() {
    let root = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();

    let err = clone_project(&runner, root.path(), "docs", "--upload-pack=evil").await.unwrap_err();
    assert!(matches!(err, HostingError::InvalidRepoUrl(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn clone_project_refuses_populated_directory() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("docs")).unwrap();
    std::fs::write(root.path().join("docs/README.md"), "hi").unwrap();
    let runner = FakeRunner::new();

    let err = clone_project(&runner, root.path(), "docs", "https://example.com/docs.git")
        .await
        .unwrap_err();
    assert!(matches!(err, HostingError::AlreadyExists(_)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn clone_project_allows_empty_existing_directory() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("docs")).unwrap();
    let runner = FakeRunner::new();

    assert!(clone_project(&runner, root.path(), "docs", "https://example.com/docs.git").await.is_ok());
}

#[tokio::test]
async fn clone_project_surfaces_git_stderr() {
    let root = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new();
    runner.push_output(CommandOutput {
        success: false,
        code: Some(128),
        stdout: String::new(),
        stderr: "fatal: repository not found\n".into(),
    });

    let err = clone_project(&runner, root.path(), "docs", "https://example.com/missing.git")
        .await
        .unwrap_err();
    match err {
        HostingError::Git { stderr } => assert_eq!(stderr, "fatal: repository not found"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn update_project_pulls_in_project_dir() {
    let runner = FakeRunner::new();
    runner.push_output(CommandOutput {
        success: true,
        code: Some(0),
        stdout: "Already up to date.\n".into(),
        stderr: String::new(),
    });

    update_project(&runner, Path::new("/srv/projects/docs")).await.unwrap();
    assert_eq!(runner.calls()[0].1, vec!["-C", "/srv/projects/docs", "pull"]);
}

#[tokio::test]
async fn update_project_reports_pull_failure() {
    let runner = FakeRunner::new();
    runner.push_output(CommandOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
        stderr: "error: cannot pull with rebase\n".into(),
    });

    assert!(matches!(
        update_project(&runner, Path::new("/srv/projects/docs")).await,
        Err(HostingError::Git { .. })
    ));
}

#[test]
fn validate_repo_url_rejects_option_like_and_spaced_urls() {
    assert!(validate_repo_url("https://example.com/docs.git").is_ok());
    for url in ["", "   ", "--upload-pack=touch", "https://example.com/a b.git"] {
        assert!(
            matches!(validate_repo_url(url), Err(HostingError::InvalidRepoUrl(_))),
            "{url:?} should be rejected"
        );
    }
}

#[test]
fn hidden_paths_cover_dot_segments_and_encoded_dots() {
    assert!(is_hidden_path("/docs/.git/config"));
    assert!(is_hidden_path("/.env"));
    assert!(is_hidden_path("/docs/%2egit/config"));
    assert!(is_hidden_path("/docs/%2Egit/HEAD"));
    assert!(!is_hidden_path("/docs/"));
    assert!(!is_hidden_path("/docs/site.v2/index.html"));
}

#[test]
fn clone_claims_block_same_name_until_released() {
    let claims = CloneClaims::default();
    let first = claims.claim("docs").expect("first claim should succeed");
    assert!(claims.claim("docs").is_none());
    assert!(claims.claim("handbook").is_some());

    drop(first);
    assert!(claims.claim("docs").is_some());
}

#[tokio::test]
async fn remove_checkout_deletes_tree_and_tolerates_missing() {
    let dir = tempfile::tempdir().unwrap();
    let checkout = dir.path().join("docs");
    std::fs::create_dir_all(checkout.join(".git")).unwrap();
    std::fs::write(checkout.join("index.html"), "x").unwrap();

    remove_checkout(&checkout).await.unwrap();
    assert!(!checkout.exists());
    remove_checkout(&checkout).await.unwrap();
}
