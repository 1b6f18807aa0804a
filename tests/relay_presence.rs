//! End-to-end behaviour of relay pairs mounted in a tree.
//!
//! Each test runs on its own thread, so the thread-local engine state starts
//! empty; `reset_registry` is still called for clarity.

use spark_relay::engine::observer::observation_count;
use spark_relay::{
    collect_text, create_relay_pair, create_relay_pair_with, find_node_by_id, get_allocated_count,
    mount, reset_registry, with_environment, Derivation, Environment, IdentityAllocator,
    PortalError, RelayProps, TargetInstance, TargetProps,
};

fn root_text(handle: &spark_relay::MountHandle) -> Vec<String> {
    collect_text(handle.root().expect("mounted"))
}

#[test]
fn target_alone_renders_fallback() {
    reset_registry();
    let pair = create_relay_pair(None);

    let handle = mount(|| {
        pair.target.render(TargetProps::text("nothing relayed"));
        Ok(())
    })
    .expect("mount");

    assert_eq!(root_text(&handle), vec!["nothing relayed"]);

    // Unrelated updates do not disturb it
    handle.update(|| {
        spark_relay::text(spark_relay::TextProps { content: "other".into(), ..Default::default() });
    });
    assert_eq!(root_text(&handle), vec!["nothing relayed", "other"]);
}

#[test]
fn relay_in_same_commit_replaces_fallback() {
    reset_registry();
    let pair = create_relay_pair(None);

    let handle = mount(|| {
        pair.target.render(TargetProps::text("nothing relayed"));
        let _relay = pair.relay.render(RelayProps::text("hello"))?;
        Ok(())
    })
    .expect("mount");

    assert_eq!(root_text(&handle), vec!["hello"]);
}

#[test]
fn relay_unmount_restores_fallback() {
    reset_registry();
    let pair = create_relay_pair(None);

    let handle = mount(|| {
        pair.target.render(TargetProps::text("nothing relayed"));
        Ok(())
    })
    .expect("mount");

    let cleanup = handle
        .update(|| pair.relay.render(RelayProps::text("hello")))
        .expect("target is mounted");
    assert_eq!(root_text(&handle), vec!["hello"]);

    cleanup();
    assert_eq!(root_text(&handle), vec!["nothing relayed"]);
}

#[test]
fn presence_tracks_relay_mount_state_at_quiescence() {
    for derivation in [Derivation::ChildCount, Derivation::Counter] {
        reset_registry();
        let pair = create_relay_pair(None);
        let target = pair.target.clone().with_derivation(derivation);

        let mut instance: Option<TargetInstance> = None;
        let handle = mount(|| {
            instance = Some(target.mount(TargetProps::text("empty")));
            Ok(())
        })
        .expect("mount");
        let instance = instance.expect("target rendered");

        let relay = handle.update(|| pair.relay.instance(RelayProps::text("hello")));
        assert!(!instance.has_content());

        // (mount?, batched?) steps
        let steps = [
            (true, false),
            (false, false),
            (true, true),
            (true, true),
            (false, true),
            (false, false),
            (true, false),
        ];
        for (step, (mounted, batched)) in steps.into_iter().enumerate() {
            let apply = || {
                if mounted {
                    relay.mount().expect("target is mounted");
                } else {
                    relay.unmount();
                }
            };
            if batched {
                handle.update(apply);
            } else {
                apply();
            }

            assert_eq!(instance.has_content(), mounted, "{derivation:?} step {step}");
            assert_eq!(instance.is_showing_fallback(), !mounted, "{derivation:?} step {step}");
        }
    }
}

#[test]
fn independent_pairs_do_not_interfere() {
    reset_registry();
    let allocator = IdentityAllocator::new("pair-", 0);
    let left = create_relay_pair_with(&allocator, None);
    let right = create_relay_pair_with(&allocator, None);
    assert_ne!(left.id(), right.id());

    let mut targets = Vec::new();
    let handle = mount(|| {
        targets.push(left.target.mount(TargetProps::text("left empty")));
        targets.push(right.target.mount(TargetProps::text("right empty")));
        let _relay = left.relay.render(RelayProps::text("left content"))?;
        Ok(())
    })
    .expect("mount");

    assert!(targets[0].has_content());
    assert!(!targets[1].has_content());
    assert_eq!(root_text(&handle), vec!["left content", "right empty"]);
}

#[test]
fn explicit_ids_shaped_like_component_ids_still_resolve() {
    // Component IDs are generated as `c<n>`; mount ids must not collide with them
    for n in 0..8 {
        reset_registry();
        let explicit = format!("c{n}");
        let pair = create_relay_pair(Some(&explicit));

        let mut instance: Option<TargetInstance> = None;
        let handle = mount(|| {
            instance = Some(pair.target.mount(TargetProps::text("empty")));
            let _relay = pair.relay.render(RelayProps::text("hello"))?;
            Ok(())
        })
        .expect("mount");
        let instance = instance.expect("target rendered");

        assert_eq!(find_node_by_id(&explicit), Some(instance.node()), "{explicit}");
        assert!(instance.has_content(), "{explicit}: relay reached its target");
        assert_eq!(root_text(&handle), vec!["hello"], "{explicit}");
    }
}

#[test]
fn relay_before_target_fails() {
    reset_registry();
    let pair = create_relay_pair(Some("late-target"));

    let result = mount(|| {
        let _relay = pair.relay.render(RelayProps::text("too early"))?;
        pair.target.render(TargetProps::text("fallback"));
        Ok(())
    });

    match result {
        Err(PortalError::TargetNotFound { id }) => assert_eq!(id.as_str(), "late-target"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("relay mounted without a target"),
    }
    assert_eq!(get_allocated_count(), 0, "the failed mount releases everything");
    assert_eq!(observation_count(), 0);
}

#[test]
fn static_environment_renders_fallback_only() {
    reset_registry();
    let pair = create_relay_pair(None);

    with_environment(Environment::Static, || {
        let handle = mount(|| {
            pair.target.render(TargetProps::text("fallback"));
            Ok(())
        })
        .expect("mount");
        let before = get_allocated_count();

        let cleanup = handle
            .update(|| pair.relay.render(RelayProps::text("hello")))
            .expect("relay degrades silently");

        assert_eq!(get_allocated_count(), before, "relay touched nothing");
        assert_eq!(observation_count(), 0, "targets do not observe");
        assert_eq!(root_text(&handle), vec!["fallback"]);
        cleanup();
    });
}

#[test]
fn target_unmount_with_relay_attached_leaks_nothing() {
    reset_registry();
    let pair = create_relay_pair(None);

    let mut instance: Option<TargetInstance> = None;
    let handle = mount(|| {
        instance = Some(pair.target.mount(TargetProps::text("empty")));
        Ok(())
    })
    .expect("mount");
    let relay_cleanup = handle
        .update(|| pair.relay.render(RelayProps::text("hello")))
        .expect("mount relay");

    instance.expect("target rendered").unmount();
    assert_eq!(observation_count(), 0);
    assert_eq!(find_node_by_id(pair.id().as_str()), None);

    relay_cleanup();
    assert_eq!(get_allocated_count(), 1, "only the root is left");
}

#[test]
fn unmounting_tree_releases_relays_and_targets() {
    reset_registry();
    let pair = create_relay_pair(None);

    let handle = mount(|| {
        pair.target.render(TargetProps::text("empty"));
        // Cleanup intentionally dropped: the tree owns the relay now
        let _ = pair.relay.render(RelayProps::text("hello"))?;
        Ok(())
    })
    .expect("mount");
    assert!(get_allocated_count() > 0);

    handle.unmount();
    assert_eq!(get_allocated_count(), 0);
    assert_eq!(observation_count(), 0);
}

#[test]
fn reused_explicit_id_resolves_to_one_target() {
    // Misuse: two live pairs sharing an id. Which target receives the relay
    // is unspecified; it only has to be one of them.
    reset_registry();
    let first = create_relay_pair(Some("shared"));
    let second = create_relay_pair(Some("shared"));

    let mut targets = Vec::new();
    let _handle = mount(|| {
        targets.push(first.target.mount(TargetProps::text("first")));
        targets.push(second.target.mount(TargetProps::text("second")));
        let _relay = first.relay.render(RelayProps::text("content"))?;
        Ok(())
    })
    .expect("mount");

    let resolved = find_node_by_id("shared").expect("some target claims the id");
    assert!(targets.iter().any(|t| t.node() == resolved));
    assert_eq!(targets.iter().filter(|t| t.has_content()).count(), 1);
}
