//! End-to-end session tests over a scripted host.

use std::time::{Duration, Instant};

use glam::{Mat4, Quat, Vec3};
use tokio::sync::mpsc::UnboundedReceiver;

use openwand::{
    ControllerEvent, ControllerStyle, DeviceHost, DeviceSnapshot, Dof, HapticPulse, HeadPose,
    InputSession, PoseCaps, RawButton, RawPose, SessionEvent, TrackingSettings,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Scripted host: tests mutate `slots` between ticks.
#[derive(Default)]
struct MockHost {
    available: bool,
    slots: Vec<Option<DeviceSnapshot>>,
    pulses: Vec<(usize, HapticPulse)>,
}

impl MockHost {
    fn new() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }
}

impl DeviceHost for MockHost {
    fn is_available(&self) -> bool {
        self.available
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn device(&self, slot: usize) -> Option<DeviceSnapshot> {
        self.slots.get(slot).and_then(|entry| entry.clone())
    }

    fn pulse(&mut self, slot: usize, pulse: HapticPulse) {
        self.pulses.push((slot, pulse));
    }
}

fn drain_session(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn drain_controller(rx: &mut UnboundedReceiver<ControllerEvent>) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn vive_snapshot() -> DeviceSnapshot {
    DeviceSnapshot {
        id: "OpenVR Gamepad (Serial: LHR-F84FA42B)".to_string(),
        axes: vec![0.0, 0.0],
        buttons: vec![RawButton::default(); 4],
        caps: PoseCaps {
            has_orientation: true,
            has_position: true,
        },
        pose: Some(RawPose {
            orientation: Some([0.0, 0.0, 0.0, 1.0]),
            position: Some([0.2, 1.1, -0.4]),
        }),
        actuators: 1,
        ..DeviceSnapshot::default()
    }
}

fn daydream_snapshot() -> DeviceSnapshot {
    DeviceSnapshot {
        id: "Daydream Controller".to_string(),
        axes: vec![0.0, 0.0],
        buttons: vec![RawButton::default()],
        caps: PoseCaps {
            has_orientation: true,
            has_position: false,
        },
        pose: Some(RawPose {
            orientation: Some([0.0, 0.0, 0.0, 1.0]),
            position: None,
        }),
        ..DeviceSnapshot::default()
    }
}

#[test]
fn connection_is_announced_before_the_first_update() {
    init_tracing();
    let mut session = InputSession::create(None).initialize();
    let mut events = session.subscribe();
    let mut host = MockHost::new();
    host.slots = vec![Some(vive_snapshot())];

    session.tick(&mut host, Instant::now());

    let announced = drain_session(&mut events);
    assert_eq!(announced.len(), 1);
    match &announced[0] {
        SessionEvent::ControllerConnected { slot, profile, .. } => {
            assert_eq!(*slot, 0);
            assert_eq!(profile.style, Some(ControllerStyle::Vive));
            assert_eq!(profile.dof, Dof::Six);
        }
        other => panic!("expected connection event, got {:?}", other),
    }

    // The first update already adopted the 6-DOF pose.
    let controller = session.registry().get(0).expect("adapter registered");
    assert!(controller.has_posed());
    assert_eq!(controller.position(), Vec3::new(0.2, 1.1, -0.4));
}

#[test]
fn null_pose_disconnect_round_trip() {
    init_tracing();
    let mut session = InputSession::create(None).initialize();
    let mut events = session.subscribe();
    let mut host = MockHost::new();
    host.slots = vec![Some(vive_snapshot())];

    let base = Instant::now();
    session.tick(&mut host, base);
    drain_session(&mut events);
    let mut controller_events = session
        .registry_mut()
        .get_mut(0)
        .expect("adapter registered")
        .subscribe();

    // The powered-off device keeps its slot occupied but stops posing.
    let mut stale = vive_snapshot();
    stale.pose = Some(RawPose::default());
    host.slots = vec![Some(stale)];
    session.tick(&mut host, base + Duration::from_millis(16));

    let adapter_events = drain_controller(&mut controller_events);
    assert_eq!(
        adapter_events
            .iter()
            .filter(|event| matches!(event, ControllerEvent::Disconnected { .. }))
            .count(),
        1
    );
    let session_events = drain_session(&mut events);
    assert!(matches!(
        session_events.as_slice(),
        [SessionEvent::ControllerDisconnected { slot: 0, .. }]
    ));

    // By the next tick the slot is absent and the device reconnects as a
    // fresh adapter.
    assert!(session.registry().get(0).is_none());
    host.slots = vec![Some(vive_snapshot())];
    session.tick(&mut host, base + Duration::from_millis(32));
    let reconnect = drain_session(&mut events);
    assert!(matches!(
        reconnect.as_slice(),
        [SessionEvent::ControllerConnected { slot: 0, .. }]
    ));
}

#[test]
fn empty_slot_disconnect_round_trip() {
    let mut session = InputSession::create(None).initialize();
    let mut events = session.subscribe();
    let mut host = MockHost::new();
    host.slots = vec![Some(vive_snapshot())];

    let base = Instant::now();
    session.tick(&mut host, base);
    drain_session(&mut events);

    host.slots = vec![None];
    session.tick(&mut host, base + Duration::from_millis(16));

    let session_events = drain_session(&mut events);
    assert!(matches!(
        session_events.as_slice(),
        [SessionEvent::ControllerDisconnected { slot: 0, .. }]
    ));
    assert_eq!(session.registry().connected_count(), 0);
}

#[test]
fn unavailable_host_is_a_silent_noop() {
    let mut session = InputSession::create(None).initialize();
    let mut events = session.subscribe();
    let mut host = MockHost::new();
    host.available = false;
    host.slots = vec![Some(vive_snapshot())];

    session.tick(&mut host, Instant::now());

    assert!(drain_session(&mut events).is_empty());
    assert_eq!(session.registry().connected_count(), 0);
}

#[test]
fn three_dof_controller_gets_a_synthesized_world_pose() {
    let mut session = InputSession::create(None).initialize();
    let mut host = MockHost::new();
    host.slots = vec![Some(daydream_snapshot())];

    let base = Instant::now();
    session.tick(&mut host, base);

    let controller = session.registry_mut().get_mut(0).expect("adapter");
    assert_eq!(controller.dof(), Dof::Three);
    controller.set_head_pose(HeadPose {
        position: Vec3::new(0.0, 1.6, 0.0),
        orientation: Quat::IDENTITY,
    });
    controller.set_standing_transform(Mat4::from_translation(Vec3::new(0.0, 0.1, 0.0)));

    session.tick(&mut host, base + Duration::from_millis(16));

    let controller = session.registry_mut().get_mut(0).expect("adapter");
    let position = controller.position();
    assert!(position.y > 0.5 && position.y < 1.6, "y = {}", position.y);
    assert!(position.z < 0.0, "z = {}", position.z);

    // World transform folds in the standing transform.
    let world = controller.world_transform();
    let world_position = world.transform_point3(Vec3::ZERO);
    assert!((world_position.y - (position.y + 0.1)).abs() < 1e-5);
}

#[test]
fn input_changes_surface_as_named_events() {
    let mut session = InputSession::create(None).initialize();
    let mut host = MockHost::new();
    host.slots = vec![Some(vive_snapshot())];

    let base = Instant::now();
    session.tick(&mut host, base);
    let mut controller_events = session
        .registry_mut()
        .get_mut(0)
        .expect("adapter")
        .subscribe();

    let mut moved = vive_snapshot();
    moved.axes = vec![0.3, 0.7];
    moved.buttons[1] = RawButton {
        value: 1.0,
        touched: true,
        pressed: true,
    };
    host.slots = vec![Some(moved)];
    session.tick(&mut host, base + Duration::from_millis(16));

    let events = drain_controller(&mut controller_events);
    // Vive thumbpad delivers with Y inverted.
    assert!(events.iter().any(|event| matches!(
        event,
        ControllerEvent::AxesChanged { pair, x, y, .. }
            if pair == "thumbpad" && *x == 0.3 && *y == -0.7
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        ControllerEvent::ButtonPressBegan {
            button: openwand::ButtonRef::Primary,
            ..
        }
    )));

    // A no-op tick emits nothing further.
    session.tick(&mut host, base + Duration::from_millis(32));
    assert!(drain_controller(&mut controller_events).is_empty());
}

#[test]
fn haptic_pulses_reach_the_host_hardware() {
    let mut session = InputSession::create(Some(TrackingSettings::default())).initialize();
    let mut host = MockHost::new();
    host.slots = vec![Some(vive_snapshot())];

    let base = Instant::now();
    session.tick(&mut host, base);
    host.pulses.clear();

    session
        .registry_mut()
        .get_mut(0)
        .expect("adapter")
        .set_vibe(0.5, base + Duration::from_millis(16));
    session.tick(&mut host, base + Duration::from_millis(16));

    assert_eq!(host.pulses.len(), 1);
    let (slot, pulse) = host.pulses[0];
    assert_eq!(slot, 0);
    assert_eq!(pulse.intensity, 0.5);
    assert_eq!(pulse.duration_ms, 5000);

    // Steady intensity inside the refresh window issues no further command.
    session.tick(&mut host, base + Duration::from_millis(32));
    assert_eq!(host.pulses.len(), 1);
}
