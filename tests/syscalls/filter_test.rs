/*!
 * Interception Filter Tests
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use syscall_virt::{CallContext, InterceptFilter, PathPrefixFilter, SentinelPathFilter};

#[test]
fn test_sentinel_scenarios() {
    let filter = SentinelPathFilter::new("/tmp/passwd");
    assert!(filter.decide(&CallContext::for_path("/tmp/passwd")));
    assert!(!filter.decide(&CallContext::for_path("/etc/passwd")));
    assert!(!filter.decide(&CallContext::new()));
    assert_eq!(filter.name(), "sentinel_path");
}

#[test]
fn test_filters_through_trait_object() {
    let filters: Vec<Box<dyn InterceptFilter>> = vec![
        Box::new(SentinelPathFilter::new("/unreal/etc/hosts")),
        Box::new(PathPrefixFilter::new("/unreal")),
    ];
    let context = CallContext::for_path("/unreal/etc/hosts");
    assert!(filters.iter().all(|f| f.decide(&context)));

    let context = CallContext::for_path("/unreal/etc/passwd");
    let claimed: Vec<_> = filters
        .iter()
        .filter(|f| f.decide(&context))
        .map(|f| f.name())
        .collect();
    assert_eq!(claimed, vec!["path_prefix"]);
}

proptest! {
    #[test]
    fn prop_pathless_context_never_claimed(
        socket in proptest::option::of(0i32..1024),
        fstype in proptest::option::of("[a-z0-9]{1,8}"),
        sc in proptest::option::of(any::<i64>()),
    ) {
        let mut context = CallContext::new();
        if let Some(socket) = socket {
            context = context.with_socket(socket);
        }
        if let Some(fstype) = fstype {
            context = context.with_fstype(fstype);
        }
        if let Some(sc) = sc {
            context = context.with_sc(sc);
        }

        prop_assert!(!SentinelPathFilter::new("/tmp/passwd").decide(&context));
        prop_assert!(!PathPrefixFilter::new("/").decide(&context));
    }

    #[test]
    fn prop_only_sentinel_claimed(path in "/[a-z]{1,6}(/[a-z]{1,6}){0,3}") {
        let filter = SentinelPathFilter::new("/tmp/passwd");
        let context = CallContext::for_path(&path);
        let first = filter.decide(&context);

        prop_assert_eq!(first, path == "/tmp/passwd");
        // no hidden state between calls
        prop_assert_eq!(first, filter.decide(&context));
    }

    #[test]
    fn prop_prefix_claims_descendants(tail in "[a-z]{1,6}(/[a-z]{1,6}){0,3}") {
        let filter = PathPrefixFilter::new("/unreal");
        let inside = format!("/unreal/{}", tail);
        let beside = format!("/unreal{}", tail);
        prop_assert!(filter.decide(&CallContext::for_path(&inside)));
        prop_assert!(!filter.decide(&CallContext::for_path(&beside)));
    }
}
