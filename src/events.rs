use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::catalog::ControllerStyle;
use crate::host::Dof;

// Hand classification reported by the host
//
// Devices may resolve their handedness after connection, so this is
// re-checked on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[default]
    Unknown,
    Left,
    Right,
}

impl Hand {
    /// Parses the free-form hand hint strings hosts tend to report.
    pub fn from_hint(hint: &str) -> Self {
        match hint {
            "left" | "Left" | "LEFT" => Hand::Left,
            "right" | "Right" | "RIGHT" => Hand::Right,
            _ => Hand::Unknown,
        }
    }
}

// Digital press directions derived from thumbstick/thumbpad axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PadDirection {
    pub const ALL: [PadDirection; 4] = [
        PadDirection::Up,
        PadDirection::Down,
        PadDirection::Left,
        PadDirection::Right,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            PadDirection::Up => 0,
            PadDirection::Down => 1,
            PadDirection::Left => 2,
            PadDirection::Right => 3,
        }
    }
}

/// Identifies which button an event refers to.
///
/// The designated primary button emits its named record first, then a
/// mirrored record under [`ButtonRef::Primary`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ButtonRef {
    Named(String),
    Primary,
}

// Per-controller change notification with precise chrono timestamps
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    AxesChanged {
        pair: String,
        x: f32,
        y: f32,
        timestamp: DateTime<Local>,
    },
    PadPressBegan {
        pair: String,
        direction: PadDirection,
        timestamp: DateTime<Local>,
    },
    PadPressEnded {
        pair: String,
        direction: PadDirection,
        timestamp: DateTime<Local>,
    },
    ButtonValueChanged {
        button: ButtonRef,
        value: f32,
        timestamp: DateTime<Local>,
    },
    ButtonTouchBegan {
        button: ButtonRef,
        timestamp: DateTime<Local>,
    },
    ButtonTouchEnded {
        button: ButtonRef,
        timestamp: DateTime<Local>,
    },
    ButtonPressBegan {
        button: ButtonRef,
        timestamp: DateTime<Local>,
    },
    ButtonPressEnded {
        button: ButtonRef,
        timestamp: DateTime<Local>,
    },
    HandChanged {
        hand: Hand,
        timestamp: DateTime<Local>,
    },
    Disconnected {
        timestamp: DateTime<Local>,
    },
}

/// Identity summary of a tracked controller, carried by connection events.
#[derive(Debug, Clone)]
pub struct ControllerProfile {
    pub name: String,
    pub slot: usize,
    pub style: Option<ControllerStyle>,
    pub dof: Dof,
    pub hand: Hand,
}

// Session-level lifecycle notification
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ControllerConnected {
        slot: usize,
        profile: ControllerProfile,
        timestamp: DateTime<Local>,
    },
    ControllerDisconnected {
        slot: usize,
        name: String,
        timestamp: DateTime<Local>,
    },
}
