//! Store key layout.
//!
//! Keys look like
//! `/<namespace>/<app>/general/<object>/options/<option>` for the host's
//! built-in plugin and
//! `/<namespace>/<app>/plugins/<plugin>/<object>/options/<option>` for every
//! other plugin. The object segment is `allscreens` for the display and
//! `screen<name>` for a screen.
//!
//! No escaping is done. Plugin names, option names and instance names must
//! not contain `/`.

use crate::config::SyncConfig;
use crate::host::HostTree;
use optsync_types::{ObjectId, ObjectType};
use std::fmt;

const GENERAL: &str = "general";
const PLUGINS: &str = "plugins";
const OPTIONS: &str = "options";
const ALL_SCREENS: &str = "allscreens";
const SCREEN: &str = "screen";

/// Most segments a key is split into, counting the empty one before the
/// leading `/`.
const MAX_SEGMENTS: usize = 8;

/// Store path segment of one live object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    type_name: String,
    discriminator: String,
}

impl ObjectPath {
    /// Path of the display scope.
    pub fn all_screens() -> Self {
        Self {
            type_name: ALL_SCREENS.to_string(),
            discriminator: String::new(),
        }
    }

    pub fn screen(name: impl Into<String>) -> Self {
        Self {
            type_name: SCREEN.to_string(),
            discriminator: name.into(),
        }
    }

    /// Derives the path of a live object, or `None` if the host does not
    /// know it.
    pub fn of(host: &dyn HostTree, object: ObjectId) -> Option<Self> {
        let object_type = host.object_type(object)?;
        if object_type == ObjectType::Display {
            return Some(Self::all_screens());
        }
        Some(Self {
            type_name: object_type.type_name().to_string(),
            discriminator: host.object_name(object)?,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_name, self.discriminator)
    }
}

impl From<&ObjectScope> for ObjectPath {
    fn from(scope: &ObjectScope) -> Self {
        match scope {
            ObjectScope::AllScreens => Self::all_screens(),
            ObjectScope::Screen(name) => Self::screen(name.clone()),
        }
    }
}

/// Object addressed by a decoded key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectScope {
    AllScreens,
    Screen(String),
}

/// A store key split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedKey {
    /// Plugin name. The `general` branch decodes to the core plugin's name.
    pub plugin: String,
    pub scope: ObjectScope,
    pub option: String,
}

/// Builds the key of one option of one plugin on one object.
pub fn encode_key(config: &SyncConfig, path: &ObjectPath, plugin: &str, option: &str) -> String {
    if plugin == config.core_plugin {
        format!(
            "/{}/{}/{GENERAL}/{path}/{OPTIONS}/{option}",
            config.namespace, config.app_name
        )
    } else {
        format!(
            "/{}/{}/{PLUGINS}/{plugin}/{path}/{OPTIONS}/{option}",
            config.namespace, config.app_name
        )
    }
}

/// Key of an option on a live object, or `None` if the host does not know
/// the object.
pub fn key_for(
    config: &SyncConfig,
    host: &dyn HostTree,
    object: ObjectId,
    plugin: &str,
    option: &str,
) -> Option<String> {
    ObjectPath::of(host, object).map(|path| encode_key(config, &path, plugin, option))
}

/// Splits a store key. Returns `None` for anything that is not an option
/// key of this application.
pub fn decode_key(config: &SyncConfig, key: &str) -> Option<DecodedKey> {
    let segments: Vec<&str> = key.splitn(MAX_SEGMENTS, '/').collect();
    if segments.len() < 7
        || !segments[0].is_empty()
        || segments[1] != config.namespace
        || segments[2] != config.app_name
    {
        return None;
    }

    let (plugin, rest) = match segments[3] {
        GENERAL if segments.len() == 7 => (config.core_plugin.clone(), &segments[4..]),
        PLUGINS if segments.len() == 8 && !segments[4].is_empty() => {
            (segments[4].to_string(), &segments[5..])
        }
        _ => return None,
    };

    let [object, options, option] = rest else {
        return None;
    };
    if *options != OPTIONS || option.is_empty() || option.contains('/') {
        return None;
    }

    Some(DecodedKey {
        plugin,
        scope: decode_scope(object)?,
        option: option.to_string(),
    })
}

fn decode_scope(segment: &str) -> Option<ObjectScope> {
    if segment == ALL_SCREENS {
        return Some(ObjectScope::AllScreens);
    }
    match segment.strip_prefix(SCREEN) {
        Some(name) if !name.is_empty() => Some(ObjectScope::Screen(name.to_string())),
        _ => None,
    }
}
