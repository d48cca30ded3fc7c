//! Vibration scheduling.
//!
//! Intensity commands are queued per named channel and applied as their
//! timestamps elapse; the delivered hardware intensity is the clamped sum of
//! all channel intensities. A reserved unnamed channel always exists.
//!
//! Hardware actuators auto-decay after a pulse's duration, so a steady
//! intensity is sustained by re-commanding once half the pulse window has
//! elapsed; an intensity change re-commands immediately.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::host::HapticPulse;

#[derive(Debug, Clone, Copy)]
struct VibeCommand {
    at: Instant,
    intensity: f32,
}

#[derive(Debug)]
struct VibeChannel {
    name: Option<String>,
    intensity: f32,
    queue: VecDeque<VibeCommand>,
}

impl VibeChannel {
    fn new(name: Option<String>) -> Self {
        Self {
            name,
            intensity: 0.0,
            queue: VecDeque::new(),
        }
    }
}

/// Builder for timed intensity sequences on one channel.
///
/// `set` appends a command at the current cursor time; `wait` advances the
/// cursor without emitting. Commands therefore land in non-decreasing time
/// order and are consumed oldest-first.
#[derive(Debug)]
pub struct VibeScheduler<'a> {
    channel: &'a mut VibeChannel,
    cursor: Instant,
}

impl VibeScheduler<'_> {
    pub fn set(self, intensity: f32) -> Self {
        self.channel.queue.push_back(VibeCommand {
            at: self.cursor,
            intensity,
        });
        self
    }

    pub fn wait(mut self, duration: Duration) -> Self {
        self.cursor += duration;
        self
    }
}

/// All vibration channels of one controller.
#[derive(Debug)]
pub struct VibeChannels {
    channels: Vec<VibeChannel>,
    /// Aggregate intensity from the last render pass
    intensity: f32,
    last_command: Option<(f32, Instant)>,
    pending: Option<HapticPulse>,
}

impl VibeChannels {
    pub(crate) fn new() -> Self {
        Self {
            channels: vec![VibeChannel::new(None)],
            intensity: 0.0,
            last_command: None,
            pending: None,
        }
    }

    /// Selects a channel for scheduling; `None` is the reserved unnamed
    /// channel. Selecting creates missing channels, clears any pending
    /// commands, and leaves the in-flight intensity untouched. An initial
    /// intensity schedules at the call time.
    pub(crate) fn select(
        &mut self,
        name: Option<&str>,
        intensity: Option<f32>,
        now: Instant,
    ) -> VibeScheduler<'_> {
        let index = match name {
            None => 0,
            Some(name) => match self
                .channels
                .iter()
                .position(|c| c.name.as_deref() == Some(name))
            {
                Some(index) => index,
                None => {
                    self.channels.push(VibeChannel::new(Some(name.to_string())));
                    self.channels.len() - 1
                }
            },
        };
        self.channels[index].queue.clear();

        let scheduler = VibeScheduler {
            channel: &mut self.channels[index],
            cursor: now,
        };
        match intensity {
            Some(intensity) => scheduler.set(intensity),
            None => scheduler,
        }
    }

    /// Applies every elapsed command in queue order and recomputes the
    /// aggregate intensity, clamped to [0, 1].
    pub(crate) fn render(&mut self, now: Instant) -> f32 {
        for channel in &mut self.channels {
            while let Some(command) = channel.queue.front().copied() {
                if command.at > now {
                    break;
                }
                channel.queue.pop_front();
                channel.intensity = if command.intensity.is_finite() {
                    command.intensity
                } else {
                    0.0
                };
            }
        }

        let sum: f32 = self
            .channels
            .iter()
            .map(|c| if c.intensity.is_finite() { c.intensity } else { 0.0 })
            .sum();
        self.intensity = sum.clamp(0.0, 1.0);
        self.intensity
    }

    /// Decides whether the hardware needs a fresh pulse command.
    ///
    /// Devices without an actuator are skipped silently; scheduling still
    /// succeeded logically.
    pub(crate) fn apply(&mut self, actuators: usize, max_pulse_ms: u64, now: Instant) {
        if actuators == 0 {
            if self.intensity > 0.0 {
                debug!("No haptic actuator; skipping hardware command");
            }
            return;
        }

        let recommand_after = Duration::from_millis(max_pulse_ms / 2);
        let stale = match self.last_command {
            None => true,
            Some((commanded, at)) => {
                self.intensity != commanded || now.duration_since(at) > recommand_after
            }
        };
        if stale {
            self.pending = Some(HapticPulse {
                intensity: self.intensity,
                duration_ms: max_pulse_ms,
            });
            self.last_command = Some((self.intensity, now));
        }
    }

    pub(crate) fn take_pending(&mut self) -> Option<HapticPulse> {
        self.pending.take()
    }

    /// Aggregate intensity from the last render pass.
    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_commands_apply_as_their_time_elapses() {
        let base = Instant::now();
        let mut vibes = VibeChannels::new();
        vibes
            .select(Some("x"), Some(0.5), base)
            .wait(Duration::from_millis(100))
            .set(0.0);

        assert_eq!(vibes.render(base + Duration::from_millis(50)), 0.5);
        assert_eq!(vibes.render(base + Duration::from_millis(150)), 0.0);
    }

    #[test]
    fn aggregate_is_the_clamped_sum_of_channels() {
        let base = Instant::now();
        let mut vibes = VibeChannels::new();
        vibes.select(Some("a"), Some(0.6), base);
        vibes.select(Some("b"), Some(0.7), base);
        assert_eq!(vibes.render(base), 1.0);
    }

    #[test]
    fn reselecting_clears_the_queue_but_keeps_intensity() {
        let base = Instant::now();
        let mut vibes = VibeChannels::new();
        vibes
            .select(Some("x"), Some(0.8), base)
            .wait(Duration::from_millis(50))
            .set(0.2);
        assert_eq!(vibes.render(base), 0.8);

        // Reselect before the 0.2 command elapses: the queued ramp is gone,
        // the in-flight 0.8 persists.
        vibes.select(Some("x"), None, base + Duration::from_millis(10));
        assert_eq!(vibes.render(base + Duration::from_millis(100)), 0.8);
    }

    #[test]
    fn default_channel_always_exists() {
        let base = Instant::now();
        let mut vibes = VibeChannels::new();
        vibes.select(None, Some(0.4), base);
        assert_eq!(vibes.render(base), 0.4);
    }

    #[test]
    fn pulse_commands_only_on_change_or_refresh_window() {
        let base = Instant::now();
        let mut vibes = VibeChannels::new();
        vibes.select(None, Some(0.5), base);
        vibes.render(base);

        vibes.apply(1, 5000, base);
        assert_eq!(
            vibes.take_pending(),
            Some(HapticPulse {
                intensity: 0.5,
                duration_ms: 5000
            })
        );

        // Unchanged intensity inside the refresh window: no new command.
        vibes.render(base + Duration::from_millis(1000));
        vibes.apply(1, 5000, base + Duration::from_millis(1000));
        assert_eq!(vibes.take_pending(), None);

        // Past half the pulse duration the command is refreshed.
        vibes.render(base + Duration::from_millis(2600));
        vibes.apply(1, 5000, base + Duration::from_millis(2600));
        assert!(vibes.take_pending().is_some());
    }

    #[test]
    fn missing_actuator_skips_hardware_commands() {
        let base = Instant::now();
        let mut vibes = VibeChannels::new();
        vibes.select(None, Some(0.9), base);
        vibes.render(base);
        vibes.apply(0, 5000, base);
        assert_eq!(vibes.take_pending(), None);
        // Scheduling still succeeded logically.
        assert_eq!(vibes.intensity(), 0.9);
    }
}
