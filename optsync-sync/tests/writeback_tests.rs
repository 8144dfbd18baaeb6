mod common;

use common::{Fixture, CONSTRAIN_KEY, HSIZE_KEY, INITIATE_KEY};
use optsync_store::{ConfigStore, StoreValue};
use optsync_sync::writeback::{after_option_set, persist_option};
use optsync_sync::{HostTree, WriteBack};
use optsync_types::{KeyBinding, Modifiers, OptionDescriptor, OptionValue};
use pretty_assertions::assert_eq;

/// Fixture whose initial reload ran against an offline store, leaving the
/// store empty and no reload pending.
fn empty_store() -> Fixture {
    let mut fx = common::fixture();
    fx.store.set_available(false);
    fx.fire_timers();
    fx.store.set_available(true);
    assert_eq!(fx.store.write_count(), 0);
    fx
}

fn set_local(fx: &mut Fixture, plugin: &str, option: &str, value: OptionValue) -> WriteBack {
    let object = if plugin == "decoration" || option == "active_plugins" {
        fx.screen
    } else {
        fx.display
    };
    assert!(fx.host.set_option(object, plugin, option, value));
    after_option_set(&fx.ctx, &fx.host, object, plugin, option)
}

// ── Writes ────────────────────────────────────────────────────────

#[test]
fn first_local_change_writes_once() {
    let mut fx = empty_store();

    let outcome = set_local(&mut fx, "move", "constrain_y", OptionValue::Bool(true));

    assert_eq!(
        outcome,
        WriteBack::Written {
            key: CONSTRAIN_KEY.to_string()
        }
    );
    assert_eq!(
        fx.store.writes(),
        vec![(CONSTRAIN_KEY.to_string(), StoreValue::bool(true))]
    );
}

#[test]
fn changed_value_overwrites_stored_one() {
    let mut fx = common::fixture();
    fx.settle();

    set_local(&mut fx, "core", "hsize", OptionValue::Int(2));

    assert_eq!(fx.store.write_count(), 1);
    assert_eq!(fx.store.get(HSIZE_KEY).unwrap(), Some(StoreValue::int(2)));
}

#[test]
fn list_order_is_significant() {
    let mut fx = common::fixture();
    fx.settle();

    set_local(
        &mut fx,
        "core",
        "active_plugins",
        OptionValue::string_list(["core", "move"]),
    );
    let outcome = set_local(
        &mut fx,
        "core",
        "active_plugins",
        OptionValue::string_list(["move", "core"]),
    );

    assert!(matches!(outcome, WriteBack::Written { .. }));
    assert_eq!(fx.store.write_count(), 2);
}

#[test]
fn bindings_are_resolved_through_the_display() {
    let mut fx = common::fixture();
    fx.settle();
    assert_eq!(
        fx.store.get(INITIATE_KEY).unwrap(),
        Some(StoreValue::string("<Alt>F1"))
    );

    set_local(
        &mut fx,
        "move",
        "initiate_key",
        OptionValue::Key(KeyBinding::new(Modifiers::CONTROL, 113)),
    );
    assert_eq!(
        fx.store.get(INITIATE_KEY).unwrap(),
        Some(StoreValue::string("<Control>Left"))
    );
}

// ── Suppression ───────────────────────────────────────────────────

#[test]
fn unchanged_nan_float_is_not_rewritten() {
    let mut fx = common::fixture();
    fx.settle();
    let display = fx.display;
    fx.host.add_option(
        "core",
        display,
        OptionDescriptor::new("zoom_factor", OptionValue::Float(0.5)),
    );

    let first = set_local(&mut fx, "core", "zoom_factor", OptionValue::Float(f32::NAN));
    let second = set_local(&mut fx, "core", "zoom_factor", OptionValue::Float(f32::NAN));

    assert!(matches!(first, WriteBack::Written { .. }));
    assert!(matches!(second, WriteBack::Unchanged { .. }));
    assert_eq!(fx.store.write_count(), 1);
}

#[test]
fn identical_value_is_not_rewritten() {
    let mut fx = common::fixture();
    fx.settle();

    let outcome = set_local(&mut fx, "core", "hsize", OptionValue::Int(4));

    assert_eq!(
        outcome,
        WriteBack::Unchanged {
            key: HSIZE_KEY.to_string()
        }
    );
    assert_eq!(fx.store.write_count(), 0);
}

#[test]
fn pending_reload_bypasses_write_back() {
    let mut fx = common::fixture();
    assert!(fx.ctx.pending_reload().is_some());

    let outcome = set_local(&mut fx, "core", "hsize", OptionValue::Int(7));

    assert_eq!(outcome, WriteBack::Bypassed);
    assert_eq!(fx.store.write_count(), 0);
}

#[test]
fn inbound_guard_bypasses_write_back() {
    let mut fx = common::fixture();
    fx.settle();
    assert!(fx.host.set_option(fx.display, "core", "hsize", OptionValue::Int(9)));

    let display = fx.display;
    let outcome = fx
        .ctx
        .with_inbound(|ctx| after_option_set(ctx, &fx.host, display, "core", "hsize"));

    assert_eq!(outcome, WriteBack::Bypassed);
    assert!(!fx.ctx.is_inbound());
    assert_eq!(fx.store.write_count(), 0);
}

// ── Failures ──────────────────────────────────────────────────────

#[test]
fn unknown_option_is_reported() {
    let mut fx = common::fixture();
    fx.settle();
    let outcome = after_option_set(&fx.ctx, &fx.host, fx.display, "move", "no_such_option");
    assert_eq!(outcome, WriteBack::UnknownOption);
}

#[test]
fn binding_without_display_is_not_written() {
    let mut fx = common::fixture();
    fx.settle();
    let root = fx.host.root();
    let descriptor = OptionDescriptor::new(
        "run_key",
        OptionValue::Key(KeyBinding::new(Modifiers::ALT, 38)),
    );

    let outcome = persist_option(&fx.ctx, &fx.host, root, "core", &descriptor);

    assert_eq!(outcome, WriteBack::Unencodable);
    assert_eq!(fx.store.write_count(), 0);
}

#[test]
fn read_only_key_drops_the_write() {
    let mut fx = common::fixture();
    fx.settle();
    fx.store.set_writable(HSIZE_KEY, false);

    let outcome = set_local(&mut fx, "core", "hsize", OptionValue::Int(3));

    assert_eq!(
        outcome,
        WriteBack::Failed {
            key: HSIZE_KEY.to_string()
        }
    );
    assert_eq!(fx.store.get(HSIZE_KEY).unwrap(), Some(StoreValue::int(4)));
}
