#![allow(dead_code)]

use optsync_store::{MemoryStore, StoreNotification};
use optsync_sync::host::mock::{Keymap, MockHost};
use optsync_sync::{reload, ManualScheduler, ReloadReport, SyncConfig, SyncContext};
use optsync_types::{
    ButtonBinding, Color, KeyBinding, MatchExpr, MatchTerm, Modifiers, ObjectId,
    OptionDescriptor, OptionType, OptionValue, ValueList,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub const HSIZE_KEY: &str = "/apps/compiz/general/allscreens/options/hsize";
pub const SCREEN_PLUGINS_KEY: &str = "/apps/compiz/plugins/core/screen0/options/active_plugins";
pub const INITIATE_KEY: &str = "/apps/compiz/plugins/move/allscreens/options/initiate_key";
pub const CONSTRAIN_KEY: &str = "/apps/compiz/plugins/move/allscreens/options/constrain_y";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn keymap() -> Keymap {
    Keymap::new()
        .with_key("Left", 113)
        .with_key("F1", 67)
        .with_key("a", 38)
        .with_key("Tab", 23)
}

/// Handles into the standard test host.
pub struct Tree {
    pub host: MockHost,
    pub display: ObjectId,
    pub screen: ObjectId,
    pub window: ObjectId,
}

/// Core root, one display with screen `0` and one window, and four plugins:
/// `core` and `move` on the display, `core` and `decoration` on the screen,
/// and `regex` which has no options.
pub fn tree() -> Tree {
    let mut host = MockHost::new();
    let display = host.add_display();
    host.set_keymap(display, keymap());
    let screen = host.add_screen(display, "0");
    let window = host.add_window(screen, "4194305");

    host.add_plugin("core", true);
    host.add_plugin("move", true);
    host.add_plugin("decoration", true);
    host.add_plugin("regex", false);

    host.add_option("core", display, OptionDescriptor::new("hsize", OptionValue::Int(4)));
    host.add_option(
        "core",
        display,
        OptionDescriptor::new("audible_bell", OptionValue::Bell(true)),
    );
    host.add_option(
        "core",
        screen,
        OptionDescriptor::new("active_plugins", OptionValue::string_list(["core"])),
    );
    host.add_option(
        "core",
        screen,
        OptionDescriptor::new("detect_outputs", OptionValue::Bool(false)),
    );

    host.add_option(
        "move",
        display,
        OptionDescriptor::new(
            "initiate_key",
            OptionValue::Key(KeyBinding::new(Modifiers::ALT, 67)),
        ),
    );
    host.add_option(
        "move",
        display,
        OptionDescriptor::new(
            "initiate_button",
            OptionValue::Button(ButtonBinding::new(Modifiers::ALT, 1)),
        ),
    );
    host.add_option(
        "move",
        display,
        OptionDescriptor::new("constrain_y", OptionValue::Bool(false)),
    );
    host.add_option("move", display, OptionDescriptor::new("opacity", OptionValue::Int(100)));

    host.add_option(
        "decoration",
        screen,
        OptionDescriptor::new("active_color", OptionValue::Color(Color::rgba8(0, 0, 0, 0x80))),
    );
    host.add_option(
        "decoration",
        screen,
        OptionDescriptor::new(
            "shadow_match",
            OptionValue::Match(MatchExpr::new().and(MatchTerm::expr("any"))),
        ),
    );
    host.add_option(
        "decoration",
        screen,
        OptionDescriptor::new(
            "shadow_radius",
            OptionValue::List(ValueList::new(OptionType::Float).unwrap()),
        ),
    );

    Tree {
        host,
        display,
        screen,
        window,
    }
}

/// Everything one synchronization test needs.
pub struct Fixture {
    pub host: MockHost,
    pub display: ObjectId,
    pub screen: ObjectId,
    pub window: ObjectId,
    pub store: Arc<MemoryStore>,
    pub scheduler: ManualScheduler,
    pub ctx: SyncContext,
}

/// Attaches to an empty store. The initial reload is pending, not run.
pub fn fixture() -> Fixture {
    fixture_with_store(MemoryStore::new())
}

pub fn fixture_with_store(store: MemoryStore) -> Fixture {
    init_tracing();
    let Tree {
        host,
        display,
        screen,
        window,
    } = tree();
    let store = Arc::new(store);
    let scheduler = ManualScheduler::new();
    let ctx = SyncContext::attach(
        SyncConfig::default(),
        store.clone(),
        Arc::new(scheduler.clone()),
        Box::new(|_: StoreNotification| {}),
    )
    .unwrap();
    Fixture {
        host,
        display,
        screen,
        window,
        store,
        scheduler,
        ctx,
    }
}

impl Fixture {
    /// Delivers every due timer and returns the passes that ran.
    pub fn fire_timers(&mut self) -> Vec<ReloadReport> {
        self.scheduler
            .take_due()
            .into_iter()
            .filter_map(|token| reload::on_timer(&mut self.ctx, &mut self.host, token))
            .collect()
    }

    /// Runs the pending initial reload and forgets what it did.
    pub fn settle(&mut self) {
        self.fire_timers();
        self.host.clear_applied();
        self.store.clear_writes();
    }
}
