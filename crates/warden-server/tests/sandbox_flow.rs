// sandbox_flow.rs — End-to-end integration test for the sandboxed
// filesystem flow.
//
// This single test walks the full life of an agent session against two
// allowed roots:
//
//   1. Resolve the allow-list at startup (server construction)
//   2. Write a file through the validator
//   3. Edit it with a whitespace-tolerant batch → fenced unified diff
//   4. Listing, tree, and search all reflect the change
//   5. Copy the file, then move the copy
//   6. Soft-delete into <root>/Trash; a second delete of the same name
//      gets a distinct timestamped entry
//   7. Re-deleting the trashed item is refused
//   8. Paths outside both roots, sibling-prefix paths, and symlink
//      escapes never validate
//
// VERIFY:
//   - every mutation lands inside an allowed root
//   - the trash preserves earlier content on collision
//   - each refusal carries the right error kind
//
// This proves the core contract: no operation, however it is spelled,
// touches a path the sandbox has not cleared.

use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use warden_files as files;
use warden_patch::{apply_edits, Edit, PatchError};
use warden_sandbox::{AllowedRoots, PathValidator, SandboxError};
use warden_server::{ServerConfig, WardenServer};
use warden_trash::{Quarantine, TrashError, TRASH_DIR_NAME};
use warden_walk as walk;

#[test]
fn full_sandbox_flow() {
    let workspace = tempdir().unwrap();
    let scratch = tempdir().unwrap();
    let outside = tempdir().unwrap();

    // 1. Startup: both roots resolve; the server reports them back.
    let config = ServerConfig::new(vec![
        workspace.path().to_path_buf(),
        scratch.path().to_path_buf(),
    ]);
    let server = WardenServer::new(config).unwrap();
    assert_eq!(server.allowed_roots().paths().len(), 2);

    let roots = Arc::new(
        AllowedRoots::new(vec![
            workspace.path().to_path_buf(),
            scratch.path().to_path_buf(),
        ])
        .unwrap(),
    );
    let validator = PathValidator::new(Arc::clone(&roots));
    let quarantine = Quarantine::new(Arc::clone(&roots));

    // 2. Write a tab-indented source file.
    let main_rs = workspace.path().join("src").join("main.rs");
    fs::create_dir_all(main_rs.parent().unwrap()).unwrap();
    let target = validator.validate(&main_rs).unwrap();
    assert!(!target.exists());
    files::write_file(&target, "fn main() {\n\tgreet();\n\tfarewell();\n}\n").unwrap();

    // 3. Edit with space-indented old text; the window strategy must
    //    keep the file's tabs. The batch yields one fenced diff.
    let target = validator.validate(&main_rs).unwrap();
    let edits = vec![Edit {
        old_text: "  greet();\n  farewell();".into(),
        new_text: "  greet();\n  wave();".into(),
    }];
    let diff = apply_edits(&target, &edits, false).unwrap();
    assert!(diff.fenced.starts_with("```diff\n"));
    assert!(diff.diff.contains("+\twave();"));
    assert_eq!(
        fs::read_to_string(&main_rs).unwrap(),
        "fn main() {\n\tgreet();\n\twave();\n}\n"
    );

    // 4. The hierarchy reflects it: list, tree, search.
    let src_dir = validator.validate(main_rs.parent().unwrap()).unwrap();
    let listing = walk::list(&src_dir).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "main.rs");

    let root_dir = validator.validate(workspace.path()).unwrap();
    let nodes = walk::tree(&validator, &root_dir).unwrap();
    assert_eq!(nodes[0].name, "src");
    let src_children = nodes[0].children.as_ref().unwrap();
    assert_eq!(src_children[0].name, "main.rs");
    assert!(src_children[0].children.is_none());

    let hits = walk::search(&validator, &root_dir, "MAIN", &[]).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].ends_with("src/main.rs"));

    // 5. Copy into the second root, then move the copy.
    let copied = scratch.path().join("main-copy.rs");
    files::copy_path(&target, &validator.validate(&copied).unwrap()).unwrap();
    let moved = scratch.path().join("main-final.rs");
    files::move_path(
        &validator.validate(&copied).unwrap(),
        &validator.validate(&moved).unwrap(),
    )
    .unwrap();
    assert!(!copied.exists());
    assert!(main_rs.exists());
    assert_eq!(
        fs::read_to_string(&moved).unwrap(),
        fs::read_to_string(&main_rs).unwrap()
    );

    // 6. Soft-delete twice: the second entry must not clobber the first.
    let first = quarantine
        .move_to_trash(&validator.validate(&moved).unwrap())
        .unwrap();
    fs::write(&moved, "replacement").unwrap();
    let second = quarantine
        .move_to_trash(&validator.validate(&moved).unwrap())
        .unwrap();

    let scratch_root = scratch.path().canonicalize().unwrap();
    assert!(first.trashed_to.starts_with(scratch_root.join(TRASH_DIR_NAME)));
    assert_ne!(first.trashed_to, second.trashed_to);
    assert!(fs::read_to_string(&first.trashed_to)
        .unwrap()
        .contains("wave();"));
    assert_eq!(fs::read_to_string(&second.trashed_to).unwrap(), "replacement");

    // 7. The trash is a one-way door.
    let retrash = quarantine.move_to_trash(&validator.validate(&first.trashed_to).unwrap());
    assert!(matches!(retrash, Err(TrashError::AlreadyTrashed { .. })));

    // 8. Escapes never validate, whatever the spelling.
    let denied = validator.validate(outside.path().join("secret.txt"));
    assert!(matches!(denied, Err(SandboxError::AccessDenied { .. })));

    let traversal = workspace
        .path()
        .join("src")
        .join("..")
        .join("..")
        .join("somewhere-else");
    assert!(validator.validate(&traversal).is_err());

    #[cfg(unix)]
    {
        let link = workspace.path().join("innocent.txt");
        let secret = outside.path().join("secret.txt");
        fs::write(&secret, "secret").unwrap();
        std::os::unix::fs::symlink(&secret, &link).unwrap();
        let escape = validator.validate(&link);
        assert!(matches!(escape, Err(SandboxError::AccessDenied { .. })));
    }

    // A failed edit batch never leaves partial writes behind.
    let stable = workspace.path().join("stable.txt");
    fs::write(&stable, "alpha\nbeta\n").unwrap();
    let stable_path = validator.validate(&stable).unwrap();
    let bad_batch = vec![
        Edit {
            old_text: "alpha".into(),
            new_text: "ALPHA".into(),
        },
        Edit {
            old_text: "gamma".into(),
            new_text: "GAMMA".into(),
        },
    ];
    let failure = apply_edits(&stable_path, &bad_batch, false);
    assert!(matches!(
        failure,
        Err(PatchError::EditNotFound { ref old_text }) if old_text == "gamma"
    ));
    assert_eq!(fs::read_to_string(&stable).unwrap(), "alpha\nbeta\n");
}

#[test]
fn startup_contract_requires_existing_directories() {
    let dir = tempdir().unwrap();

    let missing = ServerConfig::new(vec![dir.path().join("not-there")]);
    assert!(WardenServer::new(missing).is_err());

    let file = dir.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    let not_a_dir = ServerConfig::new(vec![file]);
    assert!(WardenServer::new(not_a_dir).is_err());

    let empty = ServerConfig::new(Vec::new());
    assert!(WardenServer::new(empty).is_err());
}
