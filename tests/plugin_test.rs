/*!
 * Plugin Tests
 * Host protocol: capability declaration, claim, dispatch
 */

use nix::errno::Errno;
use nix::fcntl::OFlag;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use syscall_virt::{
    CallContext, CtlClass, DispatchTable, Family, FilterConfig, InterceptFilter, Plugin,
    PluginConfig, PluginError, SentinelPathFilter, SyscallArgs, SyscallId,
};
use tempfile::TempDir;

/// Claims everything and counts how often it was asked
#[derive(Default)]
struct CountingFilter {
    calls: AtomicUsize,
}

impl InterceptFilter for CountingFilter {
    fn decide(&self, _context: &CallContext) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

fn sentinel_plugin(sentinel: &std::path::Path) -> Plugin {
    Plugin::builder()
        .with_filter(Arc::new(SentinelPathFilter::new(sentinel)))
        .build()
        .unwrap()
}

#[test]
fn test_claimed_open_close() {
    let dir = TempDir::new().unwrap();
    let sentinel = dir.path().join("passwd");
    let plugin = sentinel_plugin(&sentinel);

    let args = SyscallArgs::Open {
        path: sentinel.clone(),
        flags: (OFlag::O_CREAT | OFlag::O_WRONLY).bits(),
        mode: 0o600,
    };
    let opened = plugin
        .intercept(SyscallId::Open, &args, &CallContext::for_path(&sentinel))
        .expect("sentinel is claimed");
    assert_eq!(opened.errno, 0);
    assert!(opened.value >= 0);

    let closed = plugin
        .intercept(
            SyscallId::Close,
            &SyscallArgs::Close {
                fd: opened.value as i32,
            },
            &CallContext::for_path(&sentinel),
        )
        .unwrap();
    assert_eq!(closed.pair(), (0, 0));
}

#[test]
fn test_unclaimed_path_falls_back() {
    let dir = TempDir::new().unwrap();
    let plugin = sentinel_plugin(&dir.path().join("passwd"));

    let other = dir.path().join("shadow");
    let result = plugin.intercept(
        SyscallId::Open,
        &SyscallArgs::Open {
            path: other.clone(),
            flags: (OFlag::O_CREAT | OFlag::O_WRONLY).bits(),
            mode: 0o600,
        },
        &CallContext::for_path(&other),
    );
    assert!(result.is_none());
    // nothing was executed on the host
    assert!(!other.exists());
}

#[test]
fn test_read_write_never_reach_the_plugin() {
    let filter = Arc::new(CountingFilter::default());
    let plugin = Plugin::builder()
        .with_filter(filter.clone())
        .build()
        .unwrap();

    assert!(plugin.table().contains(SyscallId::Read));
    assert!(plugin.table().contains(SyscallId::Write));

    for id in [SyscallId::Read, SyscallId::Write] {
        assert!(!plugin.offers(id));
        let result = plugin.intercept(id, &SyscallArgs::Close { fd: 0 }, &CallContext::new());
        assert!(result.is_none());
    }
    assert_eq!(filter.calls.load(Ordering::SeqCst), 0);

    // an emulated identity does consult the filter
    let missing = SyscallArgs::StatPath {
        path: "/nonexistent/scvirt/plugin".into(),
    };
    let result = plugin
        .intercept(SyscallId::Stat, &missing, &CallContext::new())
        .unwrap();
    assert_eq!(result.pair(), (-1, Errno::ENOENT as i32));
    assert_eq!(filter.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_managed_set_prunes_before_filter() {
    let filter = Arc::new(CountingFilter::default());
    let plugin = Plugin::builder()
        .with_filter(filter.clone())
        .with_managed_syscalls([SyscallId::Open, SyscallId::Close])
        .build()
        .unwrap();

    assert!(plugin.offers(SyscallId::Open));
    assert!(!plugin.offers(SyscallId::Stat));
    let result = plugin.intercept(
        SyscallId::Stat,
        &SyscallArgs::StatPath { path: "/".into() },
        &CallContext::for_path("/"),
    );
    assert!(result.is_none());
    assert_eq!(filter.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_custom_table_restricts_repertoire() {
    let table = DispatchTable::builder()
        .emulate(SyscallId::Stat, Family::Stats)
        .emulate(SyscallId::Statfs64, Family::Statfs)
        .build()
        .unwrap();
    let plugin = Plugin::builder()
        .with_filter(Arc::new(CountingFilter::default()))
        .with_table(table)
        .build()
        .unwrap();

    assert!(plugin.offers(SyscallId::Statfs64));
    assert!(!plugin.offers(SyscallId::Statfs));
    assert!(!plugin.offers(SyscallId::Open));

    let result = plugin.syscall(
        SyscallId::Open,
        &SyscallArgs::Close { fd: 0 },
        &CallContext::new(),
    );
    assert_eq!(result.pair(), (-1, Errno::ENOSYS as i32));
}

#[test]
fn test_capabilities_serialize() {
    let plugin = Plugin::builder()
        .with_managed_syscalls([SyscallId::Stat64, SyscallId::Open])
        .with_ctl_classes([CtlClass::Process, CtlClass::Mount])
        .build()
        .unwrap();

    let json = serde_json::to_value(plugin.capabilities()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "managed_syscalls": ["open", "stat64"],
            "ctl_classes": ["proc", "mount"],
        })
    );

    let everything = Plugin::builder().build().unwrap();
    let json = serde_json::to_value(everything.capabilities()).unwrap();
    assert!(json.get("managed_syscalls").is_none());
}

#[test]
fn test_from_config_validates_names() {
    let config = PluginConfig {
        managed_syscalls: Some(vec!["open".into(), "openat2".into()]),
        ..PluginConfig::default()
    };
    assert_eq!(
        Plugin::from_config(&config).err(),
        Some(PluginError::UnknownSyscall("openat2".into()))
    );

    let config = PluginConfig {
        ctl_classes: vec!["proc".into(), "net".into()],
        ..PluginConfig::default()
    };
    assert_eq!(
        Plugin::from_config(&config).err(),
        Some(PluginError::UnknownCtlClass("net".into()))
    );
}

#[test]
fn test_from_config_prefix_policy() {
    let config = PluginConfig::from_json_str(
        r#"{"filter": {"policy": "prefix", "prefix": "/unreal"}, "ctl_classes": ["module"]}"#,
    )
    .unwrap();
    let plugin = Plugin::from_config(&config).unwrap();

    assert_eq!(plugin.filter_name(), "path_prefix");
    assert!(plugin.decide(&CallContext::for_path("/unreal/etc/hosts")));
    assert!(!plugin.decide(&CallContext::for_path("/tmp/passwd")));
    assert_eq!(
        plugin.capabilities().ctl_classes(),
        &BTreeSet::from([CtlClass::Module])
    );
}

#[test]
#[serial]
fn test_from_env_overrides() {
    std::env::remove_var("SCVIRT_CONFIG");
    std::env::remove_var("SCVIRT_PREFIX");
    std::env::set_var("SCVIRT_SENTINEL", "/tmp/scvirt-sentinel");
    std::env::set_var("SCVIRT_MANAGED", "stat, lstat64");
    std::env::set_var("SCVIRT_CTL", "proc,mount");

    let config = PluginConfig::from_env().unwrap();

    std::env::remove_var("SCVIRT_SENTINEL");
    std::env::remove_var("SCVIRT_MANAGED");
    std::env::remove_var("SCVIRT_CTL");

    assert_eq!(
        config.filter,
        FilterConfig::Sentinel {
            path: "/tmp/scvirt-sentinel".into()
        }
    );
    let plugin = Plugin::from_config(&config).unwrap();
    assert!(plugin.offers(SyscallId::Lstat64));
    assert!(!plugin.offers(SyscallId::Lstat));
    assert!(plugin.capabilities().observes(CtlClass::Mount));
}

#[test]
#[serial]
fn test_from_env_config_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("scvirt.json");
    std::fs::write(
        &file,
        r#"{
            "filter": {"policy": "sentinel", "path": "/srv/secret"},
            "managed_syscalls": ["unlink"]
        }"#,
    )
    .unwrap();

    std::env::set_var("SCVIRT_CONFIG", &file);
    let config = PluginConfig::from_env();
    std::env::remove_var("SCVIRT_CONFIG");

    let config = config.unwrap();
    assert_eq!(config.managed_syscalls, Some(vec!["unlink".to_string()]));
    assert_eq!(config.ctl_classes, vec!["proc"]);

    std::env::set_var("SCVIRT_CONFIG", dir.path().join("missing.json"));
    let missing = PluginConfig::from_env();
    std::env::remove_var("SCVIRT_CONFIG");
    assert!(matches!(missing, Err(PluginError::Config(_))));
}
