//! End-to-end scenarios against the public `apply_patch` entry point, one
//! per concrete case plus the add/delete symmetry property.

use indoc::indoc;
use std::path::{Path, PathBuf};

use unipatch::{apply_patch, DiffError, InMemoryBackend};

#[test]
fn add_writes_new_file_with_exact_content() {
    let backend = InMemoryBackend::new();
    let text = indoc! {r#"
        *** Begin Patch
        *** Add File: new_file.py
        +def hello():
        +    print("Hello, world!")
        *** End Patch
    "#};
    apply_patch(text, &backend).unwrap();
    assert_eq!(
        backend.read(Path::new("new_file.py")).unwrap(),
        "def hello():\n    print(\"Hello, world!\")"
    );
}

#[test]
fn simple_update_replaces_one_line() {
    let backend = InMemoryBackend::with_files([(
        PathBuf::from("test.py"),
        "def example():\n    pass".to_string(),
    )]);
    let text = indoc! {"
        *** Begin Patch
        *** Update File: test.py
        -    pass
        +    return 123
        *** End Patch
    "};
    apply_patch(text, &backend).unwrap();
    assert_eq!(
        backend.read(Path::new("test.py")).unwrap(),
        "def example():\n    return 123"
    );
}

#[test]
fn anchored_update_touches_only_the_named_method() {
    let original = indoc! {"
        class Example:
            def method1(self):
                return 1

            def method2(self):
                pass

            def method3(self):
                return 3"};
    let backend = InMemoryBackend::with_files([(PathBuf::from("test.py"), original.to_string())]);
    let text = indoc! {"
        *** Begin Patch
        *** Update File: test.py
        @@ def method2(self):
        -        pass
        +        return 2
        *** End Patch
    "};
    apply_patch(text, &backend).unwrap();
    let updated = backend.read(Path::new("test.py")).unwrap();
    assert!(updated.contains("    def method1(self):\n        return 1"));
    assert!(updated.contains("    def method2(self):\n        return 2"));
    assert!(updated.contains("    def method3(self):\n        return 3"));
}

#[test]
fn move_and_update_ends_with_only_the_new_path() {
    let backend = InMemoryBackend::with_files([(
        PathBuf::from("old_path.py"),
        "def function():\n    old_implementation()".to_string(),
    )]);
    let text = indoc! {"
        *** Begin Patch
        *** Update File: old_path.py
        *** Move File To: new_path.py
        -    old_implementation()
        +    new_implementation()
        *** End Patch
    "};
    apply_patch(text, &backend).unwrap();
    assert!(backend.read(Path::new("old_path.py")).is_err());
    assert_eq!(
        backend.read(Path::new("new_path.py")).unwrap(),
        "def function():\n    new_implementation()"
    );
}

#[test]
fn multi_op_patch_commits_update_delete_and_add_together() {
    let backend = InMemoryBackend::with_files([
        (PathBuf::from("update_me.py"), "old content".to_string()),
        (PathBuf::from("delete_me.py"), "goodbye".to_string()),
    ]);
    let text = indoc! {"
        *** Begin Patch
        *** Update File: update_me.py
        -old content
        +new content
        *** Delete File: delete_me.py
        *** Add File: create_me.py
        +new file content
        *** End Patch
    "};
    apply_patch(text, &backend).unwrap();
    assert_eq!(backend.read(Path::new("update_me.py")).unwrap(), "new content");
    assert!(backend.read(Path::new("delete_me.py")).is_err());
    assert_eq!(backend.read(Path::new("create_me.py")).unwrap(), "new file content");
}

#[test]
fn multi_op_patch_applies_nothing_when_one_section_fails_to_parse() {
    let backend = InMemoryBackend::with_files([(PathBuf::from("a.py"), "unchanged".to_string())]);
    let text = indoc! {"
        *** Begin Patch
        *** Update File: a.py
        -unchanged
        +changed
        *** Delete File: does_not_exist.py
        *** End Patch
    "};
    let err = apply_patch(text, &backend).unwrap_err();
    assert!(matches!(err, DiffError::FileNotFound { .. }));
    assert_eq!(backend.read(Path::new("a.py")).unwrap(), "unchanged");
}

#[test]
fn bad_context_is_reported_and_nothing_is_written() {
    let backend = InMemoryBackend::with_files([(
        PathBuf::from("test.py"),
        "def function():\n    return 1".to_string(),
    )]);
    let text = indoc! {"
        *** Begin Patch
        *** Update File: test.py
         this context does not exist
        -old line
        +new line
        *** End Patch
    "};
    let err = apply_patch(text, &backend).unwrap_err();
    assert!(err.to_string().contains("Invalid Context"));
    assert_eq!(
        backend.read(Path::new("test.py")).unwrap(),
        "def function():\n    return 1"
    );
}

#[test]
fn add_then_delete_in_separate_patches_restores_original_state() {
    let backend = InMemoryBackend::new();
    let add_text = indoc! {"
        *** Begin Patch
        *** Add File: ephemeral.py
        +temporary content
        *** End Patch
    "};
    apply_patch(add_text, &backend).unwrap();
    assert_eq!(backend.read(Path::new("ephemeral.py")).unwrap(), "temporary content");

    let delete_text = indoc! {"
        *** Begin Patch
        *** Delete File: ephemeral.py
        *** End Patch
    "};
    apply_patch(delete_text, &backend).unwrap();
    assert!(backend.read(Path::new("ephemeral.py")).is_err());
}

#[test]
fn duplicate_path_across_sections_is_rejected() {
    let backend = InMemoryBackend::with_files([(PathBuf::from("a.py"), "x".to_string())]);
    let text = indoc! {"
        *** Begin Patch
        *** Delete File: a.py
        *** Delete File: a.py
        *** End Patch
    "};
    let err = apply_patch(text, &backend).unwrap_err();
    assert!(matches!(err, DiffError::DuplicatePath { .. }));
}
