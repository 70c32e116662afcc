// tests/fs_abstraction.rs

use std::io::Read;
use std::path::Path;

use assetdag::fs::mock::MockFileSystem;
use assetdag::fs::{FileSystem, RealFileSystem};

#[test]
fn test_mock_fs_entries() {
    let fs = MockFileSystem::new();
    fs.add_file("assets/sql/query.sql", "select 1");
    fs.add_dir("empty_dir");

    assert!(fs.is_file(Path::new("assets/sql/query.sql")));
    assert!(fs.is_dir(Path::new("assets/sql")));
    assert!(fs.is_dir(Path::new("assets")));
    assert!(fs.is_dir(Path::new("empty_dir")));
    assert!(!fs.exists(Path::new("assets/other.sql")));

    assert_eq!(
        fs.read_to_string(Path::new("assets/sql/query.sql")).unwrap(),
        "select 1"
    );
    assert!(fs.read_to_string(Path::new("assets")).is_err());
}

#[test]
fn test_mock_fs_unreadable_file() {
    let fs = MockFileSystem::new();
    fs.add_unreadable_file("secret.py", "print(1)");

    assert!(fs.exists(Path::new("secret.py")));
    let err = fs.open_read(Path::new("secret.py")).err().unwrap();
    assert!(err.to_string().contains("Permission denied"));
}

#[test]
fn test_real_fs_reads_through_trait_object() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("run.sh");
    std::fs::write(&file, "echo hi").unwrap();

    let fs: &dyn FileSystem = &RealFileSystem;
    assert!(fs.is_file(&file));
    assert!(fs.is_dir(dir.path()));

    let mut buf = String::new();
    fs.open_read(&file).unwrap().read_to_string(&mut buf).unwrap();
    assert_eq!(buf, "echo hi");

    let err = fs.read_to_string(&dir.path().join("missing")).unwrap_err();
    assert!(err.to_string().contains("reading file"));
}
