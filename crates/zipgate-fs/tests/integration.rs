use zipgate_fs::{Workspace, copy_file, ensure_dir, remove_file, resolve};
use tempfile::tempdir;

#[test]
fn test_copy_into_nested_destination() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("report.pdf");
    std::fs::write(&src, b"%PDF-1.4").unwrap();

    let dest_dir = ensure_dir(dir.path().join("out/docs")).unwrap();
    let dest = dest_dir.join("report.pdf");
    copy_file(&src, &dest).unwrap();

    let realized = resolve(&dest).unwrap();
    assert!(realized.starts_with(&dest_dir));
    assert_eq!(std::fs::read(realized).unwrap(), b"%PDF-1.4");
}

#[test]
fn test_workspace_survives_file_removal() {
    let dir = tempdir().unwrap();
    let workspace = Workspace::new(dir.path().join("tmp")).unwrap();
    let file = workspace.join("a.txt");
    std::fs::write(&file, "a").unwrap();

    remove_file(&file).unwrap();
    assert!(!file.exists());
    assert!(workspace.path().is_dir());
}

#[cfg(unix)]
#[test]
fn test_ensure_dir_resolves_symlinks() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    std::fs::create_dir(&real).unwrap();
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    assert_eq!(ensure_dir(&link).unwrap(), resolve(&real).unwrap());
}
