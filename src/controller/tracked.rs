//! Tracked controller adapter.
//!
//! Wraps one host device slot: named axes/buttons with change detection,
//! vibration scheduling, and spatial pose. All state mutation happens inside
//! the once-per-tick [`TrackedController::update`] call; notifications are
//! delivered synchronously, in order, to per-controller subscribers.

use chrono::Local;
use glam::{Mat4, Quat, Vec3};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::arm::ArmModel;
use crate::catalog::{ControllerSchema, ControllerStyle};
use crate::config::TrackingSettings;
use crate::events::{ButtonRef, ControllerEvent, ControllerProfile, Hand};
use crate::host::{DeviceSnapshot, Dof, HapticPulse};

use super::axes::TrackedAxisPair;
use super::buttons::{build_buttons, TrackedButton};
use super::haptics::{VibeChannels, VibeScheduler};

/// Result of one adapter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Tracked,
    /// The device stopped reporting pose data after having posed; the
    /// registry slot should be cleared.
    Disconnected,
}

/// Head pose injected by the rendering collaborator; required for 3-DOF
/// controllers.
#[derive(Debug, Clone, Copy)]
pub struct HeadPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for HeadPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug)]
pub struct TrackedController {
    name: String,
    slot: usize,
    style: Option<ControllerStyle>,
    dof: Dof,
    hand: Hand,
    axis_pairs: Vec<TrackedAxisPair>,
    buttons: Vec<TrackedButton>,
    vibes: VibeChannels,
    settings: TrackingSettings,

    position: Vec3,
    rotation: Quat,
    standing_transform: Mat4,
    head_pose: Option<HeadPose>,
    arm_model: Option<ArmModel>,
    has_posed: bool,
    visible: bool,
    world_transform: Mat4,
    world_dirty: bool,
    missing_head_warned: bool,

    subscribers: Vec<mpsc::UnboundedSender<ControllerEvent>>,
}

impl TrackedController {
    /// Builds an adapter for a newly observed device slot.
    ///
    /// Axis/button state is primed from this snapshot, so the first poll
    /// over the same data emits nothing. DOF is classified here, from the
    /// capability flags, and never changes afterwards.
    pub fn from_snapshot(
        slot: usize,
        snapshot: &DeviceSnapshot,
        schema: Option<&ControllerSchema>,
        settings: TrackingSettings,
    ) -> Self {
        let style = schema.map(|s| s.style);
        let dof = Dof::from_caps(snapshot.caps);

        let mut axis_pairs: Vec<TrackedAxisPair> = match schema {
            Some(schema) => schema
                .axes
                .iter()
                .map(|pair_schema| {
                    // Vive's thumbpad Y-axis convention is opposite to every
                    // other supported device.
                    let invert_y = schema.style == ControllerStyle::Vive
                        && pair_schema.name == "thumbpad";
                    TrackedAxisPair::from_schema(pair_schema, invert_y)
                })
                .collect(),
            // No schema: pair raw slots (0,1), (2,3), ... with generic
            // names; an odd leftover axis is not modeled.
            None => (0..snapshot.axes.len() / 2)
                .map(|i| TrackedAxisPair::generic(i + 1, (2 * i, 2 * i + 1)))
                .collect(),
        };
        for pair in &mut axis_pairs {
            pair.prime(
                &snapshot.axes,
                settings.axis_deadzone,
                settings.pad_press_threshold,
            );
        }

        let buttons = build_buttons(&snapshot.buttons, schema);

        info!(
            "Tracking controller \"{}\" in slot {} (style: {}, DOF: {:?})",
            snapshot.id,
            slot,
            style.map(|s| s.as_str()).unwrap_or("generic"),
            dof
        );

        Self {
            name: snapshot.id.clone(),
            slot,
            style,
            dof,
            hand: snapshot.hand,
            axis_pairs,
            buttons,
            vibes: VibeChannels::new(),
            settings,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            standing_transform: Mat4::IDENTITY,
            head_pose: None,
            arm_model: None,
            has_posed: false,
            visible: false,
            world_transform: Mat4::IDENTITY,
            world_dirty: true,
            missing_head_warned: false,
            subscribers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn style(&self) -> Option<ControllerStyle> {
        self.style
    }

    pub fn dof(&self) -> Dof {
        self.dof
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn has_posed(&self) -> bool {
        self.has_posed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn profile(&self) -> ControllerProfile {
        ControllerProfile {
            name: self.name.clone(),
            slot: self.slot,
            style: self.style,
            dof: self.dof,
            hand: self.hand,
        }
    }

    pub fn axis_pairs(&self) -> &[TrackedAxisPair] {
        &self.axis_pairs
    }

    pub fn axis_pair(&self, name: &str) -> Option<&TrackedAxisPair> {
        self.axis_pairs.iter().find(|pair| pair.name() == name)
    }

    pub fn buttons(&self) -> &[TrackedButton] {
        &self.buttons
    }

    pub fn button(&self, name: &str) -> Option<&TrackedButton> {
        self.buttons.iter().find(|button| button.name() == name)
    }

    pub fn primary_button(&self) -> Option<&TrackedButton> {
        self.buttons.iter().find(|button| button.is_primary())
    }

    /// Registers a subscriber for this controller's notifications. Dropping
    /// the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ControllerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: ControllerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// World-alignment correction supplied by the rendering collaborator.
    pub fn set_standing_transform(&mut self, transform: Mat4) {
        self.standing_transform = transform;
        self.world_dirty = true;
    }

    /// Head pose source; required before 3-DOF pose synthesis is meaningful.
    pub fn set_head_pose(&mut self, head: HeadPose) {
        self.head_pose = Some(head);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Device-local transform composed from the current pose at unit scale.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::ONE, self.rotation, self.position)
    }

    /// World-ready transform: standing transform times the local transform,
    /// re-derived lazily after each update.
    pub fn world_transform(&mut self) -> Mat4 {
        if self.world_dirty {
            self.world_transform = self.standing_transform * self.local_transform();
            self.world_dirty = false;
        }
        self.world_transform
    }

    /// Schedules vibration on the reserved unnamed channel.
    pub fn set_vibe(&mut self, intensity: f32, now: Instant) -> VibeScheduler<'_> {
        self.vibes.select(None, Some(intensity), now)
    }

    /// Schedules vibration on a named channel, creating it on first use.
    /// Reselecting an existing channel clears its queued commands while its
    /// in-flight intensity persists.
    pub fn set_vibe_channel(
        &mut self,
        name: &str,
        intensity: Option<f32>,
        now: Instant,
    ) -> VibeScheduler<'_> {
        self.vibes.select(Some(name), intensity, now)
    }

    /// Aggregate vibration intensity from the last render pass.
    pub fn vibe_intensity(&self) -> f32 {
        self.vibes.intensity()
    }

    pub(crate) fn take_pending_pulse(&mut self) -> Option<HapticPulse> {
        self.vibes.take_pending()
    }

    /// Broadcasts the disconnect notification on this adapter. Used by both
    /// disconnect paths: the slot-emptiness check in the poll loop and the
    /// null-pose check inside [`TrackedController::update`].
    pub(crate) fn emit_disconnected(&mut self) {
        warn!(
            "Controller \"{}\" (slot {}) disconnected",
            self.name, self.slot
        );
        self.emit(ControllerEvent::Disconnected {
            timestamp: Local::now(),
        });
    }

    /// Compares tracked state against a fresh snapshot and emits one
    /// notification per actual change.
    pub fn poll_for_changes(&mut self, snapshot: &DeviceSnapshot) {
        let now = Local::now();
        let mut events = Vec::new();

        let deadzone = self.settings.axis_deadzone;
        let press_threshold = self.settings.pad_press_threshold;
        for pair in &mut self.axis_pairs {
            let (x, y) = pair.filtered(&snapshot.axes, deadzone);
            if x != pair.x || y != pair.y {
                pair.x = x;
                pair.y = y;
                events.push(ControllerEvent::AxesChanged {
                    pair: pair.name().to_string(),
                    x,
                    y,
                    timestamp: now,
                });
            }
            if pair.is_thumbstick() {
                // Directional presses key off the raw deflection, not the
                // filtered values.
                let (raw_x, raw_y) = pair.read_raw(&snapshot.axes);
                for (direction, began) in pair.update_directions(raw_x, raw_y, press_threshold) {
                    events.push(if began {
                        ControllerEvent::PadPressBegan {
                            pair: pair.name().to_string(),
                            direction,
                            timestamp: now,
                        }
                    } else {
                        ControllerEvent::PadPressEnded {
                            pair: pair.name().to_string(),
                            direction,
                            timestamp: now,
                        }
                    });
                }
            }
        }

        // Value, touch, and press are compared independently; the primary
        // button mirrors every named notification.
        for (index, button) in self.buttons.iter_mut().enumerate() {
            let Some(raw) = snapshot.buttons.get(index).copied() else {
                continue;
            };
            let mut refs = vec![ButtonRef::Named(button.name().to_string())];
            if button.primary {
                refs.push(ButtonRef::Primary);
            }

            if raw.value != button.value {
                button.value = raw.value;
                for button_ref in &refs {
                    events.push(ControllerEvent::ButtonValueChanged {
                        button: button_ref.clone(),
                        value: raw.value,
                        timestamp: now,
                    });
                }
            }
            if raw.touched != button.touched {
                button.touched = raw.touched;
                for button_ref in &refs {
                    events.push(if raw.touched {
                        ControllerEvent::ButtonTouchBegan {
                            button: button_ref.clone(),
                            timestamp: now,
                        }
                    } else {
                        ControllerEvent::ButtonTouchEnded {
                            button: button_ref.clone(),
                            timestamp: now,
                        }
                    });
                }
            }
            if raw.pressed != button.pressed {
                button.pressed = raw.pressed;
                for button_ref in &refs {
                    events.push(if raw.pressed {
                        ControllerEvent::ButtonPressBegan {
                            button: button_ref.clone(),
                            timestamp: now,
                        }
                    } else {
                        ControllerEvent::ButtonPressEnded {
                            button: button_ref.clone(),
                            timestamp: now,
                        }
                    });
                }
            }
        }

        if snapshot.hand != self.hand {
            debug!(
                "Hand changed on \"{}\": {:?} -> {:?}",
                self.name, self.hand, snapshot.hand
            );
            self.hand = snapshot.hand;
            events.push(ControllerEvent::HandChanged {
                hand: snapshot.hand,
                timestamp: now,
            });
        }

        for event in events {
            self.emit(event);
        }
    }

    /// One full adapter tick: change detection, then haptic servicing, then
    /// pose computation.
    pub fn update(&mut self, snapshot: &DeviceSnapshot, now: Instant) -> UpdateOutcome {
        self.poll_for_changes(snapshot);

        self.vibes.render(now);
        self.vibes
            .apply(snapshot.actuators, self.settings.max_pulse_ms, now);

        let pose = snapshot.pose.filter(|pose| !pose.is_empty());
        let Some(pose) = pose else {
            // A powered-off device may keep its slot occupied with stale
            // data; a fully absent pose after having posed is the only
            // in-adapter disconnect signal.
            if self.has_posed {
                self.emit_disconnected();
                return UpdateOutcome::Disconnected;
            }
            return UpdateOutcome::Tracked;
        };

        if !self.has_posed {
            self.has_posed = true;
            self.visible = true;
            debug!("Controller \"{}\" reported its first pose", self.name);
        }

        if let Some(orientation) = pose.orientation {
            self.rotation = Quat::from_array(orientation);
        }

        if let Some(position) = pose.position {
            self.position = Vec3::from_array(position);
        } else {
            // Orientation-only device: synthesize position through the arm
            // model. Construction happens at most once per adapter.
            if self.arm_model.is_none() {
                debug!("Creating arm model for \"{}\"", self.name);
                self.arm_model = Some(ArmModel::new(now));
            }
            if self.head_pose.is_none() && !self.missing_head_warned {
                warn!(
                    "No head pose injected for 3-DOF controller \"{}\"; \
                     synthesized positions assume an origin head",
                    self.name
                );
                self.missing_head_warned = true;
            }
            let head = self.head_pose.unwrap_or_default();
            if let Some(arm) = self.arm_model.as_mut() {
                arm.set_head_position(head.position);
                arm.set_head_orientation(head.orientation);
                arm.set_controller_orientation(self.rotation);
                arm.update(now);
                self.rotation = arm.pose_orientation();
                self.position = arm.pose_position();
            }
        }

        self.world_dirty = true;
        UpdateOutcome::Tracked
    }
}
