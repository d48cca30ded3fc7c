//! gilrs-backed [`DeviceHost`] for plain gamepads.
//!
//! Gamepads report no pose, so adapters built over this host classify as
//! 0-DOF and only exercise the axis/button/event half of the core. Slot
//! indexes are assigned on first sight of a gamepad id and stay stable for
//! the whole session, so a reconnecting pad lands back in its old slot.

use gilrs::{Axis, Button, Gamepad, GamepadId, Gilrs};
use tracing::{debug, info, warn};

use super::{DeviceHost, DeviceSnapshot, RawButton};
use crate::events::Hand;

// Raw button record order; kept aligned with the xbox catalog schema.
const BUTTON_ORDER: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

// Raw axis slot order: left stick pair, right stick pair.
const AXIS_ORDER: [Axis; 4] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
];

// Host errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Failed to initialize input backend: {0}")]
    Initialization(String),
}

pub struct GilrsHost {
    gilrs: Gilrs,
    slots: Vec<Option<GamepadId>>,
}

impl GilrsHost {
    pub fn new() -> Result<Self, HostError> {
        info!("Initializing gilrs input backend");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                warn!("Failed to initialize gilrs: {}", e);
                return Err(HostError::Initialization(e.to_string()));
            }
        };

        Ok(Self {
            gilrs,
            slots: Vec::new(),
        })
    }

    fn slot_for(&mut self, id: GamepadId) -> usize {
        if let Some(slot) = self.slots.iter().position(|entry| *entry == Some(id)) {
            return slot;
        }
        // Reuse a vacated slot before growing the table.
        if let Some(slot) = self.slots.iter().position(|entry| entry.is_none()) {
            self.slots[slot] = Some(id);
            return slot;
        }
        self.slots.push(Some(id));
        self.slots.len() - 1
    }

    fn snapshot(gamepad: &Gamepad<'_>) -> DeviceSnapshot {
        let axes = AXIS_ORDER
            .iter()
            .enumerate()
            .map(|(i, axis)| {
                let value = gamepad.axis_data(*axis).map(|d| d.value()).unwrap_or(0.0);
                // gilrs reports stick Y up-positive; the wire convention is
                // down-positive.
                if i % 2 == 1 {
                    -value
                } else {
                    value
                }
            })
            .collect();

        let buttons = BUTTON_ORDER
            .iter()
            .map(|button| match gamepad.button_data(*button) {
                Some(data) => RawButton {
                    value: data.value(),
                    touched: data.is_pressed() || data.value() > 0.0,
                    pressed: data.is_pressed(),
                },
                None => RawButton::default(),
            })
            .collect();

        DeviceSnapshot {
            id: gamepad.name().to_string(),
            hand: Hand::Unknown,
            axes,
            buttons,
            // Gamepads advertise no pose capability and expose no actuator
            // through this backend; vibration scheduling still runs, the
            // hardware command is just never issued.
            ..DeviceSnapshot::default()
        }
    }
}

impl DeviceHost for GilrsHost {
    fn refresh(&mut self) {
        // Drain the event queue so cached gamepad state is current.
        while let Some(event) = self.gilrs.next_event() {
            debug!("gilrs event: {:?}", event);
        }

        let ids: Vec<GamepadId> = self.gilrs.gamepads().map(|(id, _)| id).collect();
        for id in ids {
            let slot = self.slot_for(id);
            debug!("Gamepad {} mapped to slot {}", id, slot);
        }
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn device(&self, slot: usize) -> Option<DeviceSnapshot> {
        let id = (*self.slots.get(slot)?)?;
        let gamepad = self.gilrs.connected_gamepad(id)?;
        Some(Self::snapshot(&gamepad))
    }
}
