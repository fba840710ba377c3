#![allow(dead_code)]

use release_tools::command::CommandLog;
use release_tools::domain::{PomFile, Version};
use release_tools::release::ManifestHook;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn pom(version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <modelVersion>4.0.0</modelVersion>
    <parent>
        <groupId>com.facebook.airlift</groupId>
        <artifactId>airbase</artifactId>
        <version>97</version>
    </parent>

    <groupId>com.facebook.presto</groupId>
    <artifactId>presto-root</artifactId>
    <version>{}</version>
    <packaging>pom</packaging>
</project>
"#,
        version
    )
}

pub fn write_pom(directory: &Path, version: &str) {
    fs::write(directory.join("pom.xml"), pom(version)).unwrap();
}

/// A scratch checkout holding a pom at `version`
pub fn checkout_at(version: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_pom(dir.path(), version);
    dir
}

/// Records manifest hook calls into a command log
pub struct RecordingHook(pub CommandLog);

impl ManifestHook for RecordingHook {
    fn on_cut(&self, _pom: &PomFile, version: &Version) -> release_tools::Result<()> {
        self.0.log("hook", &["on_cut".to_string(), version.to_string()]);
        Ok(())
    }

    fn before_prepare(&self, _pom: &PomFile, version: &Version) -> release_tools::Result<()> {
        self.0
            .log("hook", &["before_prepare".to_string(), version.to_string()]);
        Ok(())
    }

    fn after_prepare(&self, _pom: &PomFile, version: &Version) -> release_tools::Result<()> {
        self.0
            .log("hook", &["after_prepare".to_string(), version.to_string()]);
        Ok(())
    }
}
