//! Capability catalog for known controller families.
//!
//! Hosts report devices through free-form identifier strings, frequently with
//! vendor-appended serial suffixes. The catalog resolves those identifiers to
//! a named style and a schema describing which raw axis slots form named
//! pairs, what each button is called, and which button is primary.
//!
//! Resolution is substring containment against the raw identifier, checked in
//! catalog-definition order. Devices without a match stay fully usable with
//! synthesized generic names.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Normalized device family resolved from a raw hardware identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControllerStyle {
    Daydream,
    Gearvr,
    OculusGo,
    OculusTouchLeft,
    OculusTouchRight,
    OculusRemote,
    Vive,
    WindowsMotion,
    Xbox,
}

impl ControllerStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerStyle::Daydream => "daydream",
            ControllerStyle::Gearvr => "gearvr",
            ControllerStyle::OculusGo => "oculus-go",
            ControllerStyle::OculusTouchLeft => "oculus-touch-left",
            ControllerStyle::OculusTouchRight => "oculus-touch-right",
            ControllerStyle::OculusRemote => "oculus-remote",
            ControllerStyle::Vive => "vive",
            ControllerStyle::WindowsMotion => "windows-motion",
            ControllerStyle::Xbox => "xbox",
        }
    }
}

impl fmt::Display for ControllerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named axis pair: which two raw axis slots it reads and whether it
/// behaves like a thumbstick (dead-zone filtering plus directional presses).
#[derive(Debug, Clone, Copy)]
pub struct AxisPairSchema {
    pub name: &'static str,
    pub indexes: (usize, usize),
    pub thumbstick: bool,
}

/// Full schema for one controller family.
///
/// `buttons` is positional: the name at index N labels the host's raw button
/// record N. Devices reporting more buttons than the schema names fall back
/// to generic names for the extras.
#[derive(Debug, Clone)]
pub struct ControllerSchema {
    pub style: ControllerStyle,
    pub axes: &'static [AxisPairSchema],
    pub buttons: &'static [&'static str],
    pub primary: Option<&'static str>,
}

const THUMBPAD: &[AxisPairSchema] = &[AxisPairSchema {
    name: "thumbpad",
    indexes: (0, 1),
    thumbstick: true,
}];

const THUMBSTICK: &[AxisPairSchema] = &[AxisPairSchema {
    name: "thumbstick",
    indexes: (0, 1),
    thumbstick: true,
}];

const WINDOWS_MOTION_AXES: &[AxisPairSchema] = &[
    AxisPairSchema {
        name: "thumbstick",
        indexes: (0, 1),
        thumbstick: true,
    },
    AxisPairSchema {
        name: "touchpad",
        indexes: (2, 3),
        thumbstick: true,
    },
];

const XBOX_AXES: &[AxisPairSchema] = &[
    AxisPairSchema {
        name: "thumbstick_left",
        indexes: (0, 1),
        thumbstick: true,
    },
    AxisPairSchema {
        name: "thumbstick_right",
        indexes: (2, 3),
        thumbstick: true,
    },
];

// Standard gamepad button order: face buttons, bumpers, triggers, meta,
// stick clicks, d-pad, guide.
const XBOX_BUTTONS: &[&str] = &[
    "a",
    "b",
    "x",
    "y",
    "leftbumper",
    "rightbumper",
    "lefttrigger",
    "righttrigger",
    "back",
    "start",
    "leftstick",
    "rightstick",
    "dpadup",
    "dpaddown",
    "dpadleft",
    "dpadright",
    "guide",
];

/// Immutable lookup table from raw identifier substrings to schemas.
///
/// Built once at session start; aliasing (several XInput-style identifiers
/// sharing one xbox schema) happens only inside [`CapabilityCatalog::builtin`].
#[derive(Debug, Clone)]
pub struct CapabilityCatalog {
    entries: Vec<(&'static str, ControllerSchema)>,
}

impl CapabilityCatalog {
    /// The built-in catalog of supported controller families.
    pub fn builtin() -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
        };

        catalog.register(
            "Daydream Controller",
            ControllerSchema {
                style: ControllerStyle::Daydream,
                axes: THUMBPAD,
                buttons: &["thumbpad"],
                primary: Some("thumbpad"),
            },
        );
        catalog.register(
            "Gear VR",
            ControllerSchema {
                style: ControllerStyle::Gearvr,
                axes: THUMBPAD,
                buttons: &["thumbpad", "trigger"],
                primary: Some("trigger"),
            },
        );
        catalog.register(
            "Oculus Go",
            ControllerSchema {
                style: ControllerStyle::OculusGo,
                axes: THUMBPAD,
                buttons: &["thumbpad", "trigger"],
                primary: Some("trigger"),
            },
        );
        catalog.register(
            "OpenVR Gamepad",
            ControllerSchema {
                style: ControllerStyle::Vive,
                axes: THUMBPAD,
                buttons: &["thumbpad", "trigger", "grip", "menu"],
                primary: Some("trigger"),
            },
        );
        catalog.register(
            "Oculus Touch (Left)",
            ControllerSchema {
                style: ControllerStyle::OculusTouchLeft,
                axes: THUMBSTICK,
                buttons: &["thumbstick", "trigger", "grip", "x", "y", "thumbrest"],
                primary: Some("trigger"),
            },
        );
        catalog.register(
            "Oculus Touch (Right)",
            ControllerSchema {
                style: ControllerStyle::OculusTouchRight,
                axes: THUMBSTICK,
                buttons: &["thumbstick", "trigger", "grip", "a", "b", "thumbrest"],
                primary: Some("trigger"),
            },
        );
        catalog.register(
            "Oculus Remote",
            ControllerSchema {
                style: ControllerStyle::OculusRemote,
                axes: &[],
                buttons: &["click", "back", "up", "down", "left", "right"],
                primary: Some("click"),
            },
        );
        catalog.register(
            "Spatial Controller",
            ControllerSchema {
                style: ControllerStyle::WindowsMotion,
                axes: WINDOWS_MOTION_AXES,
                buttons: &["thumbstick", "trigger", "grip", "menu", "touchpad"],
                primary: Some("trigger"),
            },
        );

        // Gamepad-style identifiers all share one xbox schema.
        let xbox = ControllerSchema {
            style: ControllerStyle::Xbox,
            axes: XBOX_AXES,
            buttons: XBOX_BUTTONS,
            primary: Some("a"),
        };
        for alias in [
            "Xbox One Wired Controller",
            "Xbox Wireless Controller",
            "Xbox 360 Controller",
            "xinput",
            "XInput",
        ] {
            catalog.register(alias, xbox.clone());
        }

        catalog
    }

    fn register(&mut self, key: &'static str, schema: ControllerSchema) {
        self.entries.push((key, schema));
    }

    /// Resolves a raw device identifier to a schema.
    ///
    /// Identifiers may carry vendor-appended suffixes (serial numbers,
    /// product revisions), so matching is substring containment rather than
    /// equality. The first matching key in definition order wins.
    pub fn lookup(&self, raw_id: &str) -> Option<&ControllerSchema> {
        let schema = self
            .entries
            .iter()
            .find(|(key, _)| raw_id.contains(key))
            .map(|(_, schema)| schema);
        match schema {
            Some(schema) => debug!("Resolved \"{}\" to style {}", raw_id, schema.style),
            None => debug!("No catalog match for \"{}\"", raw_id),
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_vendor_suffixes() {
        let catalog = CapabilityCatalog::builtin();
        let schema = catalog
            .lookup("OpenVR Gamepad (Vendor: 0x28de, Serial: LHR-F84FA42B)")
            .expect("vive identifier should resolve");
        assert_eq!(schema.style, ControllerStyle::Vive);
        assert_eq!(schema.primary, Some("trigger"));
    }

    #[test]
    fn lookup_distinguishes_touch_hands() {
        let catalog = CapabilityCatalog::builtin();
        let left = catalog.lookup("Oculus Touch (Left)").unwrap();
        let right = catalog.lookup("Oculus Touch (Right)").unwrap();
        assert_eq!(left.style, ControllerStyle::OculusTouchLeft);
        assert_eq!(right.style, ControllerStyle::OculusTouchRight);
        assert!(left.buttons.contains(&"x"));
        assert!(right.buttons.contains(&"a"));
    }

    #[test]
    fn xinput_aliases_share_the_xbox_schema() {
        let catalog = CapabilityCatalog::builtin();
        for id in [
            "Xbox One Wired Controller",
            "Xbox Wireless Controller (STANDARD GAMEPAD)",
            "xinput style device",
        ] {
            let schema = catalog.lookup(id).expect("gamepad identifier");
            assert_eq!(schema.style, ControllerStyle::Xbox);
            assert_eq!(schema.axes.len(), 2);
        }
    }

    #[test]
    fn unknown_identifiers_resolve_to_none() {
        let catalog = CapabilityCatalog::builtin();
        assert!(catalog.lookup("Mystery Wand 3000").is_none());
    }

    #[test]
    fn daydream_primary_is_its_only_button() {
        let catalog = CapabilityCatalog::builtin();
        let schema = catalog.lookup("Daydream Controller").unwrap();
        assert_eq!(schema.buttons, &["thumbpad"]);
        assert_eq!(schema.primary, Some("thumbpad"));
    }
}
