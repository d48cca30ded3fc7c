//! Biomechanical arm model for orientation-only controllers.
//!
//! Estimates a plausible hand position from head pose plus controller
//! orientation history: the torso is assumed to follow head yaw, the elbow
//! hangs at a fixed offset from the head, and the controller orientation is
//! split between elbow and wrist joints whose composed offsets place the
//! wrist. Deterministic given the same inputs and timestamps; the only state
//! carried between updates is the previous controller orientation, the
//! previous timestamp, and the root orientation.

use glam::{EulerRot, Quat, Vec3};
use std::time::Instant;

// Joint offsets in meters, relative to the head.
const HEAD_ELBOW_OFFSET: Vec3 = Vec3::new(0.155, -0.465, -0.15);
const ELBOW_WRIST_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -0.25);
const WRIST_CONTROLLER_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 0.05);
// Extra reach applied as the user raises the controller into view.
const ARM_EXTENSION_OFFSET: Vec3 = Vec3::new(-0.08, 0.14, 0.08);

// Rotation split between elbow and wrist.
const ELBOW_BEND_RATIO: f32 = 0.4;
const EXTENSION_RATIO_WEIGHT: f32 = 0.4;

// Angular speed (rad/s, ~35 deg/s) above which torso rotation is assumed.
const MIN_ANGULAR_SPEED: f32 = 0.61;
// Root follows head yaw at angle_delta / this when the user is turning.
const ROOT_FOLLOW_ATTENUATION: f32 = 10.0;

// Controller pitch range (degrees) mapped onto extension ratio 0..1.
const MIN_EXTENSION_ANGLE_DEG: f32 = 11.0;
const MAX_EXTENSION_ANGLE_DEG: f32 = 50.0;

/// Pose estimator for one 3-DOF controller.
#[derive(Debug, Clone)]
pub struct ArmModel {
    controller_q: Quat,
    last_controller_q: Quat,
    head_q: Quat,
    head_pos: Vec3,
    root_q: Quat,
    elbow_pos: Vec3,
    last_update: Instant,
    pose_orientation: Quat,
    pose_position: Vec3,
}

impl ArmModel {
    pub fn new(now: Instant) -> Self {
        Self {
            controller_q: Quat::IDENTITY,
            last_controller_q: Quat::IDENTITY,
            head_q: Quat::IDENTITY,
            head_pos: Vec3::ZERO,
            root_q: Quat::IDENTITY,
            elbow_pos: Vec3::ZERO,
            last_update: now,
            pose_orientation: Quat::IDENTITY,
            pose_position: Vec3::ZERO,
        }
    }

    pub fn set_controller_orientation(&mut self, q: Quat) {
        self.controller_q = q;
    }

    pub fn set_head_orientation(&mut self, q: Quat) {
        self.head_q = q;
    }

    pub fn set_head_position(&mut self, pos: Vec3) {
        self.head_pos = pos;
    }

    /// Estimated controller orientation; passes the raw orientation through.
    pub fn pose_orientation(&self) -> Quat {
        self.pose_orientation
    }

    /// Estimated controller position (the wrist position).
    pub fn pose_position(&self) -> Vec3 {
        self.pose_position
    }

    pub fn elbow_position(&self) -> Vec3 {
        self.elbow_pos
    }

    /// Runs one estimation step against the inputs set beforehand.
    pub fn update(&mut self, now: Instant) {
        let dt = now.duration_since(self.last_update).as_secs_f32();

        // The torso is assumed to follow head yaw only. While the controller
        // itself is swinging fast the user is probably turning their whole
        // body, so the root eases toward head yaw instead of snapping.
        let head_yaw_q = yaw_only(self.head_q);
        let angle_delta = self.last_controller_q.angle_between(self.controller_q);
        let angular_speed = if dt > 0.0 { angle_delta / dt } else { 0.0 };
        if angular_speed > MIN_ANGULAR_SPEED {
            self.root_q = self
                .root_q
                .slerp(head_yaw_q, (angle_delta / ROOT_FOLLOW_ATTENUATION).min(1.0));
        } else {
            self.root_q = head_yaw_q;
        }

        // Arm extension grows as the controller pitches up into view.
        let (_, pitch, _) = self.controller_q.to_euler(EulerRot::YXZ);
        let pitch_deg = pitch.to_degrees();
        let extension_ratio = ((pitch_deg - MIN_EXTENSION_ANGLE_DEG)
            / (MAX_EXTENSION_ANGLE_DEG - MIN_EXTENSION_ANGLE_DEG))
            .clamp(0.0, 1.0);

        // Controller orientation in camera (root) space.
        let controller_camera_q = self.root_q.inverse() * self.controller_q;

        self.elbow_pos = self.head_pos + HEAD_ELBOW_OFFSET + ARM_EXTENSION_OFFSET * extension_ratio;

        // Split the camera-space rotation between elbow and wrist: 40/60
        // base, weighted toward the wrist as the arm extends, with the blend
        // damped by a quartic falloff so large swings stay mostly rigid.
        let total_angle_deg = controller_camera_q
            .angle_between(Quat::IDENTITY)
            .to_degrees();
        let lerp_suppression = 1.0 - (total_angle_deg / 180.0).powi(4);
        let lerp_value = lerp_suppression
            * (ELBOW_BEND_RATIO + (1.0 - ELBOW_BEND_RATIO) * extension_ratio * EXTENSION_RATIO_WEIGHT);
        let wrist_q = Quat::IDENTITY.slerp(controller_camera_q, lerp_value);
        let elbow_q = controller_camera_q * wrist_q.inverse();

        // Chain the fixed forearm/wrist offsets through the joint rotations,
        // then out of camera space through the root.
        let mut wrist = wrist_q * WRIST_CONTROLLER_OFFSET;
        wrist += ELBOW_WRIST_OFFSET;
        wrist = elbow_q * wrist;
        wrist = self.root_q * wrist;

        self.pose_position = self.elbow_pos + wrist;
        self.pose_orientation = self.controller_q;

        self.last_controller_q = self.controller_q;
        self.last_update = now;
    }
}

/// Strips pitch and roll, keeping only the yaw component.
fn yaw_only(q: Quat) -> Quat {
    let (yaw, _, _) = q.to_euler(EulerRot::YXZ);
    Quat::from_rotation_y(yaw)
}
