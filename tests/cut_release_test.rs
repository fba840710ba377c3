mod common;

use common::{checkout_at, RecordingHook};
use release_tools::build::MockBuildTool;
use release_tools::command::CommandLog;
use release_tools::domain::Version;
use release_tools::git::MockRepository;
use release_tools::release::{CutRelease, NoManifestEdits};
use release_tools::ReleaseError;

const SANITIZE: [&str; 4] = [
    "git status -s",
    "git checkout master",
    "git pull --ff-only upstream master",
    "git fetch upstream",
];

fn version(text: &str) -> Version {
    Version::parse_release(text).unwrap()
}

fn repository(directory: &std::path::Path, log: &CommandLog, tags: &[&str]) -> MockRepository {
    let mut repository = MockRepository::new(directory).with_command_log(log.clone());
    for tag in tags {
        repository.add_tag(*tag);
    }
    repository
}

#[test]
fn test_cut_release() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.230", "0.231"]);
    let maven = MockBuildTool::new(log.clone());

    let branch = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap();

    assert_eq!(branch.name, "release-0.232");
    assert_eq!(branch.version, version("0.232"));
    let mut expected: Vec<&str> = SANITIZE.to_vec();
    expected.extend([
        "git tag",
        "git ls-remote --heads upstream release-0.232",
        "mvn versions:set -DnewVersion=0.233-SNAPSHOT",
        "git add .",
        "git commit -m \"Prepare for next development iteration - 0.233-SNAPSHOT\"",
        "git push upstream -u master:master",
        "git checkout -b release-0.232 HEAD~1",
        "git push upstream -u release-0.232:release-0.232",
    ]);
    assert_eq!(log.commands(), expected);
}

#[test]
fn test_cut_release_with_matching_expected_version() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.231"]);
    let maven = MockBuildTool::new(log.clone());

    let result = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .expect_version(Some(version("0.232")))
        .run();
    assert!(result.is_ok());
}

#[test]
fn test_cut_release_version_mismatch() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.231"]);
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .expect_version(Some(version("0.233")))
        .run()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Specified release version (0.233) mismatches pom version (0.232)"
    );
    assert_eq!(log.commands(), SANITIZE.to_vec());
}

#[test]
fn test_cut_release_requires_previous_tag() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.230"]);
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Release version is [0.232], but tag [0.231] is not found."
    );
    assert!(!log.commands().iter().any(|c| c.starts_with("mvn")));
}

#[test]
fn test_cut_release_rejects_existing_tag() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.231", "0.232"]);
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap_err();
    assert!(matches!(err, ReleaseError::TagAlreadyExists { .. }));
}

#[test]
fn test_cut_release_already_cut() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let mut repository = repository(dir.path(), &log, &["0.231"]);
    repository.add_upstream_head("release-0.232");
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap_err();
    assert_eq!(err.to_string(), "Release 0.232 is already cut");
    assert_eq!(
        log.commands().last().unwrap(),
        "git ls-remote --heads upstream release-0.232"
    );
}

#[test]
fn test_cut_release_with_uncommitted_changes() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let mut repository = repository(dir.path(), &log, &["0.231"]);
    repository.set_status(vec!["?? notes.txt".to_string()]);
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap_err();
    assert_eq!(err.to_string(), "Uncommitted local changes are not allowed.");
    assert_eq!(log.commands(), vec!["git status -s"]);
}

#[test]
fn test_cut_release_stops_when_trunk_push_fails() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let mut repository = repository(dir.path(), &log, &["0.231"]);
    repository.fail_on("git push upstream -u master");
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap_err();
    assert!(err.is_command_failure());
    assert_eq!(
        log.commands().last().unwrap(),
        "git push upstream -u master:master"
    );
}

#[test]
fn test_cut_release_runs_manifest_hook_before_version_bump() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.231"]);
    let maven = MockBuildTool::new(log.clone());
    let hook = RecordingHook(log.clone());

    CutRelease::new(&repository, &maven, &hook, "master")
        .run()
        .unwrap();

    let commands = log.commands();
    let hook_index = commands.iter().position(|c| c == "hook on_cut 0.232").unwrap();
    assert_eq!(
        commands[hook_index + 1],
        "mvn versions:set -DnewVersion=0.233-SNAPSHOT"
    );
}

#[test]
fn test_cut_release_without_pom() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = CommandLog::new();
    let repository = repository(dir.path(), &log, &["0.231"]);
    let maven = MockBuildTool::new(log.clone());

    let err = CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("pom.xml does not exists"));
}

#[test]
fn test_cut_release_at_last_representable_version() {
    let top = format!("0.{}", u32::MAX);
    let dir = checkout_at(&format!("{}-SNAPSHOT", top));
    let log = CommandLog::new();
    let previous = format!("0.{}", u32::MAX - 1);
    let repository = repository(dir.path(), &log, &[previous.as_str()]);
    let maven = MockBuildTool::new(log.clone());
    let hook = RecordingHook(log.clone());

    let err = CutRelease::new(&repository, &maven, &hook, "master")
        .run()
        .unwrap_err();

    assert!(matches!(err, ReleaseError::InvalidVersionNumber(_)));
    assert_eq!(
        log.commands().last().unwrap(),
        &format!("git ls-remote --heads upstream release-{}", top)
    );
}

#[test]
fn test_cut_release_with_custom_remote_names() {
    let dir = checkout_at("0.232-SNAPSHOT");
    let log = CommandLog::new();
    let mut repository = MockRepository::new(dir.path())
        .with_command_log(log.clone())
        .with_remote_names("prestodb", "fork");
    repository.add_tag("0.231");
    let maven = MockBuildTool::new(log.clone());

    CutRelease::new(&repository, &maven, &NoManifestEdits, "master")
        .run()
        .unwrap();

    let commands = log.commands();
    for expected in [
        "git pull --ff-only prestodb master",
        "git fetch prestodb",
        "git ls-remote --heads prestodb release-0.232",
        "git push prestodb -u master:master",
        "git push prestodb -u release-0.232:release-0.232",
    ] {
        assert!(
            commands.contains(&expected.to_string()),
            "missing {} in {:?}",
            expected,
            commands
        );
    }
    assert!(!commands.iter().any(|c| c.contains("upstream")));
}
