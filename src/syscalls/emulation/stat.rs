/*!
 * Stat Emulation
 * stat/lstat/fstat and statfs, reported as attribute mappings
 */

use super::{mismatched_args, unsupported_primitive};
use crate::syscalls::normalizer::normalize_with;
use crate::syscalls::primitive::Primitive;
use crate::syscalls::types::{AttrMap, CallContext, Extra, ResultTuple, SyscallArgs};

use log::trace;
use nix::errno::Errno;
use nix::sys::stat::{self, FileStat};
use nix::sys::statvfs::{self, Statvfs};

/// Native statvfs fields withheld from the guest (fragment size, free inodes
/// for unprivileged users, mount flags, name max). The name max value is
/// reported as `f_namelen` instead.
pub const STATFS_EXCLUDED: [&str; 4] = ["f_frsize", "f_favail", "f_flag", "f_namemax"];

/// Stat family: `stat`/`lstat` by path, `fstat` by descriptor
///
/// Timestamps are whole seconds; sub-second parts are dropped. A value that
/// does not fit in `i64` fails the call with EOVERFLOW.
pub fn sys_stats(primitive: Primitive, args: &SyscallArgs, _context: &CallContext) -> ResultTuple {
    let outcome = match (primitive, args) {
        (Primitive::Stat, SyscallArgs::StatPath { path }) => {
            trace!("calling stat({:?})", path);
            stat::stat(path.as_path())
        }
        (Primitive::Lstat, SyscallArgs::StatPath { path }) => {
            trace!("calling lstat({:?})", path);
            stat::lstat(path.as_path())
        }
        (Primitive::Fstat, SyscallArgs::StatFd { fd }) => {
            trace!("calling fstat({})", fd);
            stat::fstat(*fd)
        }
        (Primitive::Stat | Primitive::Lstat | Primitive::Fstat, _) => {
            return mismatched_args(primitive, args);
        }
        (other, _) => return unsupported_primitive("stat", other),
    };

    normalize_with(
        primitive.name(),
        outcome.and_then(|st| stat_fields(&st)),
        Extra::Stat,
    )
}

/// `statfs(path)`
pub fn sys_statfs(primitive: Primitive, args: &SyscallArgs, _context: &CallContext) -> ResultTuple {
    if primitive != Primitive::Statfs {
        return unsupported_primitive("statfs", primitive);
    }
    let SyscallArgs::Statfs { path } = args else {
        return mismatched_args(primitive, args);
    };

    trace!("calling statfs({:?})", path);
    normalize_with(
        primitive.name(),
        statvfs::statvfs(path.as_path()).and_then(|vfs| statfs_fields(&vfs)),
        Extra::Statfs,
    )
}

/// Native value as an attribute; EOVERFLOW when it does not fit in `i64`
#[inline]
fn attr<T: TryInto<i64>>(value: T) -> Result<i64, Errno> {
    value.try_into().map_err(|_| Errno::EOVERFLOW)
}

fn stat_fields(st: &FileStat) -> Result<AttrMap, Errno> {
    let fields: [(&str, i64); 13] = [
        ("st_dev", attr(st.st_dev)?),
        ("st_ino", attr(st.st_ino)?),
        ("st_mode", attr(st.st_mode)?),
        ("st_nlink", attr(st.st_nlink)?),
        ("st_uid", attr(st.st_uid)?),
        ("st_gid", attr(st.st_gid)?),
        ("st_rdev", attr(st.st_rdev)?),
        ("st_size", attr(st.st_size)?),
        ("st_blksize", attr(st.st_blksize)?),
        ("st_blocks", attr(st.st_blocks)?),
        ("st_atime", attr(st.st_atime)?),
        ("st_mtime", attr(st.st_mtime)?),
        ("st_ctime", attr(st.st_ctime)?),
    ];
    Ok(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn statfs_fields(vfs: &Statvfs) -> Result<AttrMap, Errno> {
    let native: [(&str, i64); 10] = [
        ("f_bsize", attr(vfs.block_size())?),
        ("f_frsize", attr(vfs.fragment_size())?),
        ("f_blocks", attr(vfs.blocks())?),
        ("f_bfree", attr(vfs.blocks_free())?),
        ("f_bavail", attr(vfs.blocks_available())?),
        ("f_files", attr(vfs.files())?),
        ("f_ffree", attr(vfs.files_free())?),
        ("f_favail", attr(vfs.files_available())?),
        ("f_flag", attr(vfs.flags().bits())?),
        ("f_namemax", attr(vfs.name_max())?),
    ];

    let mut fields: AttrMap = native
        .into_iter()
        .filter(|(k, _)| !STATFS_EXCLUDED.contains(k))
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    fields.insert("f_namelen".to_string(), attr(vfs.name_max())?);
    Ok(fields)
}
