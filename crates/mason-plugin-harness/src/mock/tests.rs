//! Unit tests for the mock plugin generator.

use super::*;

#[test]
fn default_mock_declares_both_build_hooks() {
    let mock = MockPlugin::default();
    assert_eq!(mock.name(), "mock");
    assert_eq!(mock.version(), "1.0.0");
    assert_eq!(mock.capabilities(), ["build.pre_hook", "build.post_hook"]);
}

#[test]
fn rendered_script_embeds_identity_and_capabilities() {
    let script = MockPlugin::new("fake", "2.3.4").render().expect("render");
    assert!(script.starts_with("#!/usr/bin/env python3"));
    assert!(script.contains("\"name\": \"fake\""));
    assert!(script.contains("\"version\": \"2.3.4\""));
    assert!(script.contains("[\"build.pre_hook\",\"build.post_hook\"]"));
}

#[test]
fn rendered_script_answers_the_reserved_errors() {
    let script = MockPlugin::default().render().expect("render");
    assert!(script.contains("-32601"));
    assert!(script.contains("-32700"));
    assert!(script.contains("\"id\": 0"));
}

#[test]
fn write_executable_creates_the_script_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mock-plugin");
    MockPlugin::default()
        .write_executable(&path)
        .expect("write mock");

    let written = std::fs::read_to_string(&path).expect("read back");
    assert!(written.contains("plugin.info"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn custom_capabilities_replace_the_defaults() {
    let mock =
        MockPlugin::default().with_capabilities(vec![String::from("build.lint")]);
    let script = mock.render().expect("render");
    assert!(script.contains("[\"build.lint\"]"));
}
