//! Host option tree capability.
//!
//! The engine never owns the option tree. It walks and updates it through
//! [`HostTree`], which a host implements over its own object model.

use optsync_types::{KeyResolver, ObjectId, ObjectType, OptionDescriptor, OptionValue};

/// A plugin loaded into the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: String,
    /// Whether the plugin can enumerate options.
    pub has_options: bool,
}

/// Capability set of the host's object and option tree.
pub trait HostTree {
    /// The canonical root object.
    fn root(&self) -> ObjectId;

    fn object_type(&self, object: ObjectId) -> Option<ObjectType>;

    /// Instance discriminator. Empty for singleton objects.
    fn object_name(&self, object: ObjectId) -> Option<String>;

    fn parent(&self, object: ObjectId) -> Option<ObjectId>;

    fn children(&self, object: ObjectId) -> Vec<ObjectId>;

    /// Finds a direct child of `parent` by type and, if given, discriminator.
    fn find_object(
        &self,
        parent: ObjectId,
        object_type: ObjectType,
        name: Option<&str>,
    ) -> Option<ObjectId>;

    fn loaded_plugins(&self) -> Vec<PluginInfo>;

    /// Returns the plugin if it is currently active.
    fn find_active_plugin(&self, name: &str) -> Option<PluginInfo>;

    /// Options a plugin exposes on an object, or `None` if it has none there.
    fn enumerate_options(&self, plugin: &str, object: ObjectId) -> Option<Vec<OptionDescriptor>>;

    /// Applies a value. Returns whether the host accepted it.
    fn set_option(
        &mut self,
        object: ObjectId,
        plugin: &str,
        option: &str,
        value: OptionValue,
    ) -> bool;

    /// Key resolver of a display object.
    fn display_context(&self, display: ObjectId) -> Option<&dyn KeyResolver>;
}

/// Walks up from `object` to the closest display, including `object` itself.
pub fn nearest_display(host: &dyn HostTree, object: ObjectId) -> Option<ObjectId> {
    let mut current = Some(object);
    while let Some(id) = current {
        if host.object_type(id)? == ObjectType::Display {
            return Some(id);
        }
        current = host.parent(id);
    }
    None
}

/// Key resolver of the display above `object`, if there is one.
pub fn resolver_for(host: &dyn HostTree, object: ObjectId) -> Option<&dyn KeyResolver> {
    nearest_display(host, object).and_then(|display| host.display_context(display))
}

/// Every object reachable from the root, parents before children.
pub fn walk(host: &dyn HostTree) -> Vec<ObjectId> {
    let mut out = Vec::new();
    let mut stack = vec![host.root()];
    while let Some(object) = stack.pop() {
        out.push(object);
        let mut children = host.children(object);
        children.reverse();
        stack.extend(children);
    }
    out
}

/// In-memory host tree for tests and embedders.
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed name/code keymap used as a display's key resolver.
    #[derive(Debug, Clone, Default)]
    pub struct Keymap {
        codes: BTreeMap<String, u32>,
    }

    impl Keymap {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_key(mut self, name: impl Into<String>, code: u32) -> Self {
            self.codes.insert(name.into(), code);
            self
        }
    }

    impl KeyResolver for Keymap {
        fn key_name(&self, keycode: u32) -> Option<String> {
            self.codes
                .iter()
                .find(|(_, code)| **code == keycode)
                .map(|(name, _)| name.clone())
        }

        fn keycode(&self, name: &str) -> Option<u32> {
            self.codes.get(name).copied()
        }
    }

    /// A value the host accepted through [`HostTree::set_option`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct AppliedSet {
        pub object: ObjectId,
        pub plugin: String,
        pub option: String,
        pub value: OptionValue,
    }

    #[derive(Debug)]
    struct Node {
        object_type: ObjectType,
        name: String,
        parent: Option<ObjectId>,
        children: Vec<ObjectId>,
    }

    /// A host tree built by hand: one core root, displays, screens and
    /// windows, plugins with per-object option sets.
    #[derive(Debug)]
    pub struct MockHost {
        nodes: BTreeMap<ObjectId, Node>,
        next_id: u32,
        plugins: Vec<PluginInfo>,
        inactive: BTreeSet<String>,
        options: BTreeMap<(String, ObjectId), Vec<OptionDescriptor>>,
        keymaps: BTreeMap<ObjectId, Keymap>,
        rejected: BTreeSet<String>,
        applied: Vec<AppliedSet>,
        lookups: AtomicUsize,
    }

    impl Default for MockHost {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockHost {
        /// Creates a host containing only the core object.
        pub fn new() -> Self {
            let root = ObjectId::new(0);
            let mut nodes = BTreeMap::new();
            nodes.insert(
                root,
                Node {
                    object_type: ObjectType::Core,
                    name: String::new(),
                    parent: None,
                    children: Vec::new(),
                },
            );
            Self {
                nodes,
                next_id: 1,
                plugins: Vec::new(),
                inactive: BTreeSet::new(),
                options: BTreeMap::new(),
                keymaps: BTreeMap::new(),
                rejected: BTreeSet::new(),
                applied: Vec::new(),
                lookups: AtomicUsize::new(0),
            }
        }

        fn add_node(&mut self, parent: ObjectId, object_type: ObjectType, name: &str) -> ObjectId {
            let id = ObjectId::new(self.next_id);
            self.next_id += 1;
            self.nodes.insert(
                id,
                Node {
                    object_type,
                    name: name.to_string(),
                    parent: Some(parent),
                    children: Vec::new(),
                },
            );
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.push(id);
            }
            id
        }

        /// Adds a display under the root with an empty keymap.
        pub fn add_display(&mut self) -> ObjectId {
            let root = ObjectId::new(0);
            let id = self.add_node(root, ObjectType::Display, "");
            self.keymaps.insert(id, Keymap::new());
            id
        }

        pub fn add_screen(&mut self, display: ObjectId, name: &str) -> ObjectId {
            self.add_node(display, ObjectType::Screen, name)
        }

        pub fn add_window(&mut self, screen: ObjectId, name: &str) -> ObjectId {
            self.add_node(screen, ObjectType::Window, name)
        }

        pub fn set_keymap(&mut self, display: ObjectId, keymap: Keymap) {
            self.keymaps.insert(display, keymap);
        }

        /// Loads and activates a plugin.
        pub fn add_plugin(&mut self, name: &str, has_options: bool) {
            self.plugins.push(PluginInfo {
                name: name.to_string(),
                has_options,
            });
        }

        /// Keeps a plugin loaded but reports it as inactive.
        pub fn deactivate_plugin(&mut self, name: &str) {
            self.inactive.insert(name.to_string());
        }

        pub fn add_option(&mut self, plugin: &str, object: ObjectId, descriptor: OptionDescriptor) {
            self.options
                .entry((plugin.to_string(), object))
                .or_default()
                .push(descriptor);
        }

        /// Makes `set_option` refuse every value for the named option.
        pub fn reject_option(&mut self, option: &str) {
            self.rejected.insert(option.to_string());
        }

        pub fn option_value(&self, object: ObjectId, plugin: &str, option: &str) -> Option<&OptionValue> {
            self.options
                .get(&(plugin.to_string(), object))?
                .iter()
                .find(|d| d.name == option)
                .map(|d| &d.value)
        }

        /// Every accepted `set_option`, in order.
        pub fn applied(&self) -> &[AppliedSet] {
            &self.applied
        }

        pub fn clear_applied(&mut self) {
            self.applied.clear();
        }

        /// Number of object, plugin and option lookups performed so far.
        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::Relaxed)
        }

        fn count_lookup(&self) {
            self.lookups.fetch_add(1, Ordering::Relaxed);
        }
    }

    impl HostTree for MockHost {
        fn root(&self) -> ObjectId {
            ObjectId::new(0)
        }

        fn object_type(&self, object: ObjectId) -> Option<ObjectType> {
            self.nodes.get(&object).map(|n| n.object_type)
        }

        fn object_name(&self, object: ObjectId) -> Option<String> {
            self.nodes.get(&object).map(|n| n.name.clone())
        }

        fn parent(&self, object: ObjectId) -> Option<ObjectId> {
            self.nodes.get(&object)?.parent
        }

        fn children(&self, object: ObjectId) -> Vec<ObjectId> {
            self.count_lookup();
            self.nodes
                .get(&object)
                .map(|n| n.children.clone())
                .unwrap_or_default()
        }

        fn find_object(
            &self,
            parent: ObjectId,
            object_type: ObjectType,
            name: Option<&str>,
        ) -> Option<ObjectId> {
            self.count_lookup();
            self.nodes.get(&parent)?.children.iter().copied().find(|id| {
                self.nodes.get(id).is_some_and(|n| {
                    n.object_type == object_type && name.is_none_or(|name| n.name == name)
                })
            })
        }

        fn loaded_plugins(&self) -> Vec<PluginInfo> {
            self.plugins.clone()
        }

        fn find_active_plugin(&self, name: &str) -> Option<PluginInfo> {
            self.count_lookup();
            if self.inactive.contains(name) {
                return None;
            }
            self.plugins.iter().find(|p| p.name == name).cloned()
        }

        fn enumerate_options(&self, plugin: &str, object: ObjectId) -> Option<Vec<OptionDescriptor>> {
            self.count_lookup();
            self.options.get(&(plugin.to_string(), object)).cloned()
        }

        fn set_option(
            &mut self,
            object: ObjectId,
            plugin: &str,
            option: &str,
            value: OptionValue,
        ) -> bool {
            if self.rejected.contains(option) {
                return false;
            }
            let Some(descriptor) = self
                .options
                .get_mut(&(plugin.to_string(), object))
                .and_then(|opts| opts.iter_mut().find(|d| d.name == option))
            else {
                return false;
            };

            let same_shape = descriptor.option_type() == value.option_type()
                && descriptor.list_type() == value.as_list().map(|l| l.element_type());
            if !same_shape {
                return false;
            }

            descriptor.value = value.clone();
            self.applied.push(AppliedSet {
                object,
                plugin: plugin.to_string(),
                option: option.to_string(),
                value,
            });
            true
        }

        fn display_context(&self, display: ObjectId) -> Option<&dyn KeyResolver> {
            self.keymaps.get(&display).map(|k| k as &dyn KeyResolver)
        }
    }
}
