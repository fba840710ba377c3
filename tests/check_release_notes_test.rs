use release_tools::cli::orchestration::check_release_notes;
use release_tools::notes::ReleaseNotesChecker;
use release_tools::ReleaseError;

fn violations(description: &str) -> Vec<String> {
    match ReleaseNotesChecker::new().unwrap().check(description) {
        Err(ReleaseError::InvalidReleaseNotes(errors)) => errors,
        Err(other) => panic!("unexpected error: {}", other),
        Ok(items) => panic!("expected violations, found {} notes", items.len()),
    }
}

#[test]
fn test_accepts_multi_line_notes() {
    let items = check_release_notes(
        "Some context.\n\n== RELEASE NOTES ==\n\nGeneral Changes\n* Fix a crash when\n  reading empty files\n\nSPI Changes\n* Deprecate ``ConnectorMetadata.getTableLayout``\n"
            .as_bytes(),
    )
    .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].section(), "General");
    assert_eq!(items[0].line(), "Fix a crash when reading empty files.");
    assert_eq!(items[1].section(), "SPI");
}

#[test]
fn test_accepts_opt_out() {
    let items = check_release_notes("Refactoring only.\n\n== NO RELEASE NOTE ==\n".as_bytes()).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_rejects_unknown_section() {
    let found = violations("== RELEASE NOTES ==\n\nFoo Changes\n* Fix a thing\n");
    assert_eq!(found.len(), 1);
    assert!(found[0].starts_with("The release note section 'Foo' must match one of the valid regex patterns"));
}

#[test]
fn test_rejects_line_without_valid_verb() {
    let found = violations("== RELEASE NOTES ==\n\nHive Connector Changes\n* Support for new types\n");
    assert_eq!(
        found,
        vec!["The release note line 'Support for new types.' must start with one of the valid verbs: Fix,Improve,Add,Replace,Rename,Remove,Upgrade,Downgrade,Update,Deprecate"]
    );
}

#[test]
fn test_rejects_section_without_notes() {
    let found = violations("== RELEASE NOTES ==\n\nGeneral Changes\n\nHive Connector Changes\n* Fix a thing\n");
    assert_eq!(found.len(), 2);
    assert!(found[0].contains("no release note for section [general]"));
    assert_eq!(found[1], "Release notes not found");
}

#[test]
fn test_rejects_missing_marker() {
    assert_eq!(violations("Fixes #1234"), vec!["Release notes not found"]);
}
