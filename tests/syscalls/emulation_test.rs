/*!
 * Emulation Tests
 * Claimed calls executed against the real host filesystem
 */

use nix::errno::Errno;
use nix::fcntl::OFlag;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use syscall_virt::syscalls::emulation::STATFS_EXCLUDED;
use syscall_virt::{CallContext, Plugin, ResultTuple, SyscallArgs, SyscallId};
use tempfile::TempDir;

fn plugin() -> Plugin {
    Plugin::builder().build().unwrap()
}

fn call(plugin: &Plugin, id: SyscallId, args: SyscallArgs) -> ResultTuple {
    let context = match args.path() {
        Some(path) => CallContext::for_path(path),
        None => CallContext::new(),
    };
    plugin.syscall(id, &args, &context)
}

fn path_args(path: &Path) -> SyscallArgs {
    SyscallArgs::Path {
        path: path.to_path_buf(),
    }
}

fn stat_args(path: &Path) -> SyscallArgs {
    SyscallArgs::StatPath {
        path: path.to_path_buf(),
    }
}

fn errno(e: Errno) -> i32 {
    e as i32
}

#[test]
fn test_open_close_round_trip() {
    let dir = TempDir::new().unwrap();
    let plugin = plugin();

    let opened = call(
        &plugin,
        SyscallId::Open,
        SyscallArgs::Open {
            path: dir.path().join("passwd"),
            flags: (OFlag::O_CREAT | OFlag::O_WRONLY).bits(),
            mode: 0o644,
        },
    );
    assert_eq!(opened.errno, 0);
    assert!(opened.value >= 0);
    assert!(dir.path().join("passwd").exists());

    let closed = call(
        &plugin,
        SyscallId::Close,
        SyscallArgs::Close {
            fd: opened.value as i32,
        },
    );
    assert_eq!(closed.pair(), (0, 0));

    // the descriptor is gone now
    let again = call(
        &plugin,
        SyscallId::Close,
        SyscallArgs::Close {
            fd: opened.value as i32,
        },
    );
    assert_eq!(again.pair(), (-1, errno(Errno::EBADF)));
}

#[test]
fn test_open_missing_read_only() {
    let dir = TempDir::new().unwrap();
    let result = call(
        &plugin(),
        SyscallId::Open,
        SyscallArgs::Open {
            path: dir.path().join("missing"),
            flags: OFlag::O_RDONLY.bits(),
            mode: 0,
        },
    );
    assert_eq!(result.pair(), (-1, errno(Errno::ENOENT)));
    assert_eq!(result.arity(), 2);
}

#[test]
fn test_unlink_is_not_idempotent() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("victim");
    File::create(&file).unwrap();
    let plugin = plugin();

    assert_eq!(call(&plugin, SyscallId::Unlink, path_args(&file)).pair(), (0, 0));
    assert!(!file.exists());
    assert_eq!(
        call(&plugin, SyscallId::Unlink, path_args(&file)).pair(),
        (-1, errno(Errno::ENOENT))
    );
}

#[test]
fn test_rmdir_is_not_idempotent() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    let plugin = plugin();

    assert_eq!(call(&plugin, SyscallId::Rmdir, path_args(&sub)).pair(), (0, 0));
    assert_eq!(
        call(&plugin, SyscallId::Rmdir, path_args(&sub)).pair(),
        (-1, errno(Errno::ENOENT))
    );
}

#[test]
fn test_unlink_and_rmdir_never_cross_invoke() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file");
    let sub = dir.path().join("sub");
    File::create(&file).unwrap();
    std::fs::create_dir(&sub).unwrap();
    let plugin = plugin();

    // rmdir on a regular file must not fall back to unlink
    let result = call(&plugin, SyscallId::Rmdir, path_args(&file));
    assert_eq!(result.pair(), (-1, errno(Errno::ENOTDIR)));
    assert!(file.exists());

    // unlink on a directory must not fall back to rmdir
    let result = call(&plugin, SyscallId::Unlink, path_args(&sub));
    assert_eq!(result.value, -1);
    assert_ne!(result.errno, 0);
    assert!(sub.exists());
}

#[test]
fn test_fstat_zero_byte_file() {
    let dir = TempDir::new().unwrap();
    let file = File::create(dir.path().join("empty")).unwrap();
    let plugin = plugin();

    for id in [SyscallId::Fstat, SyscallId::Fstat64] {
        let result = call(
            &plugin,
            id,
            SyscallArgs::StatFd {
                fd: file.as_raw_fd(),
            },
        );
        assert_eq!(result.pair(), (0, 0));
        assert_eq!(result.arity(), 3);

        let fields = result.fields().unwrap();
        assert_eq!(fields["st_size"], 0);
        assert!(fields.keys().all(|k| k.starts_with("st_")));
    }
}

#[test]
fn test_stat_and_lstat_on_symlink() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("target");
    let link = dir.path().join("link");
    std::fs::write(&target, b"12345").unwrap();
    let plugin = plugin();

    let made = call(
        &plugin,
        SyscallId::Symlink,
        SyscallArgs::PathPair {
            oldpath: target.clone(),
            newpath: link.clone(),
        },
    );
    assert_eq!(made.pair(), (0, 0));

    let followed = call(&plugin, SyscallId::Stat64, stat_args(&link));
    assert_eq!(followed.fields().unwrap()["st_size"], 5);

    let own = call(&plugin, SyscallId::Lstat64, stat_args(&link));
    let mode = own.fields().unwrap()["st_mode"];
    assert_eq!(mode & nix::libc::S_IFMT as i64, nix::libc::S_IFLNK as i64);
}

#[test]
fn test_hard_link_bumps_link_count() {
    let dir = TempDir::new().unwrap();
    let original = dir.path().join("a");
    let alias = dir.path().join("b");
    File::create(&original).unwrap();
    let plugin = plugin();

    let linked = call(
        &plugin,
        SyscallId::Link,
        SyscallArgs::PathPair {
            oldpath: original.clone(),
            newpath: alias.clone(),
        },
    );
    assert_eq!(linked.pair(), (0, 0));

    let stat = call(&plugin, SyscallId::Stat, stat_args(&alias));
    assert_eq!(stat.fields().unwrap()["st_nlink"], 2);

    let duplicate = call(
        &plugin,
        SyscallId::Link,
        SyscallArgs::PathPair {
            oldpath: original,
            newpath: alias,
        },
    );
    assert_eq!(duplicate.pair(), (-1, errno(Errno::EEXIST)));
}

#[test]
fn test_chmod_then_stat() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("mode");
    File::create(&file).unwrap();
    let plugin = plugin();

    let changed = call(
        &plugin,
        SyscallId::Chmod,
        SyscallArgs::PathMode {
            path: file.clone(),
            mode: 0o600,
        },
    );
    assert_eq!(changed.pair(), (0, 0));

    let stat = call(&plugin, SyscallId::Stat, stat_args(&file));
    assert_eq!(stat.fields().unwrap()["st_mode"] & 0o777, 0o600);
}

#[test]
fn test_access_missing_path() {
    let dir = TempDir::new().unwrap();
    let result = call(
        &plugin(),
        SyscallId::Access,
        SyscallArgs::PathMode {
            path: dir.path().join("nope"),
            mode: 0,
        },
    );
    assert_eq!(result.pair(), (-1, errno(Errno::ENOENT)));
}

#[test]
fn test_access_unknown_mode_bits_rejected_by_host() {
    let result = call(
        &plugin(),
        SyscallId::Access,
        SyscallArgs::PathMode {
            path: "/".into(),
            mode: 8,
        },
    );
    assert_eq!(result.pair(), (-1, errno(Errno::EINVAL)));
}

#[test]
fn test_ownership_left_unchanged() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("owned");
    File::create(&file).unwrap();
    let plugin = plugin();

    for id in [SyscallId::Chown, SyscallId::Lchown] {
        let result = call(
            &plugin,
            id,
            SyscallArgs::PathOwner {
                path: file.clone(),
                uid: None,
                gid: None,
            },
        );
        assert_eq!(result.pair(), (0, 0));
    }

    let missing = call(
        &plugin,
        SyscallId::Chown,
        SyscallArgs::PathOwner {
            path: dir.path().join("missing"),
            uid: None,
            gid: None,
        },
    );
    assert_eq!(missing.pair(), (-1, errno(Errno::ENOENT)));
}

#[test]
fn test_statfs_narrowed_fields() {
    let dir = TempDir::new().unwrap();
    let native = nix::sys::statvfs::statvfs(dir.path()).unwrap();
    let plugin = plugin();

    for id in [SyscallId::Statfs, SyscallId::Statfs64] {
        let result = call(
            &plugin,
            id,
            SyscallArgs::Statfs {
                path: dir.path().to_path_buf(),
            },
        );
        assert_eq!(result.pair(), (0, 0));

        let fields = result.fields().unwrap();
        assert_eq!(fields["f_namelen"], native.name_max() as i64);
        for excluded in STATFS_EXCLUDED {
            assert!(!fields.contains_key(excluded), "{} leaked", excluded);
        }
        assert!(fields.contains_key("f_bsize"));
        assert!(fields.contains_key("f_blocks"));
    }
}

#[test]
fn test_statfs_missing_path() {
    let result = call(
        &plugin(),
        SyscallId::Statfs,
        SyscallArgs::Statfs {
            path: "/nonexistent/scvirt/statfs".into(),
        },
    );
    assert_eq!(result.pair(), (-1, errno(Errno::ENOENT)));
    assert!(result.extra.is_none());
}
