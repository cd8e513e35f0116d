//! Clock input tracking.

use crate::config::EngineConfig;
use crate::node::ControlStage;
use crate::patch::{ClockSource, Patch};

/// Internal tempo when nothing is patched into the clock input.
pub const INTERNAL_BPM: f32 = 120.0;
/// Shortest and longest external period accepted, in seconds.
const MIN_PERIOD_SECONDS: f32 = 0.02;
const MAX_PERIOD_SECONDS: f32 = 4.0;

/// Measures the period between rising edges on the clock input.
///
/// Two edges inside the accepted range switch the patch to
/// [`ClockSource::External`]. If no edge arrives within the longest period
/// the clock falls back to the internal tempo. Publishes `clock_tick` (one
/// block long) and `clock_period` in samples.
pub struct Clock {
    internal_period: f32,
    min_period: f32,
    max_period: f32,
    since_edge: f32,
    seen_edge: bool,
    last_level: bool,
    external_period: f32,
    internal_elapsed: f32,
}

impl Clock {
    pub fn new(config: &EngineConfig) -> Self {
        let sr = config.sample_rate;
        Clock {
            internal_period: sr * 60.0 / INTERNAL_BPM,
            min_period: sr * MIN_PERIOD_SECONDS,
            max_period: sr * MAX_PERIOD_SECONDS,
            since_edge: 0.0,
            seen_edge: false,
            last_level: false,
            external_period: 0.0,
            internal_elapsed: 0.0,
        }
    }

    pub fn internal_period(&self) -> f32 {
        self.internal_period
    }
}

impl ControlStage for Clock {
    fn process(&mut self, patch: &mut Patch, frames: usize) {
        let state = &mut patch.state;
        let frames = frames as f32;
        let rising = state.sync_in && !self.last_level;
        self.last_level = state.sync_in;
        state.clock_tick = false;
        self.since_edge += frames;

        if rising {
            if self.seen_edge && (self.min_period..=self.max_period).contains(&self.since_edge) {
                self.external_period = self.since_edge;
                if state.clock_source != ClockSource::External {
                    log::debug!("external clock locked, period {} samples", self.external_period);
                }
                state.clock_source = ClockSource::External;
            }
            self.seen_edge = true;
            self.since_edge = 0.0;
            state.clock_tick = state.clock_source == ClockSource::External;
        } else if self.since_edge > self.max_period {
            if state.clock_source == ClockSource::External {
                log::debug!("external clock lost");
            }
            state.clock_source = ClockSource::Internal;
            self.seen_edge = false;
        }

        match state.clock_source {
            ClockSource::External => {
                state.clock_period = self.external_period;
                self.internal_elapsed = 0.0;
            }
            ClockSource::Internal => {
                state.clock_period = self.internal_period;
                self.internal_elapsed += frames;
                if self.internal_elapsed >= self.internal_period {
                    self.internal_elapsed -= self.internal_period;
                    state.clock_tick = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::testing::small_config;

    fn run(clock: &mut Clock, patch: &mut Patch, blocks: usize, pulse_every: usize) -> usize {
        let mut ticks = 0;
        for b in 0..blocks {
            patch.state.sync_in = pulse_every > 0 && b % pulse_every == 0;
            clock.process(patch, 32);
            ticks += patch.state.clock_tick as usize;
        }
        ticks
    }

    #[test]
    fn internal_tempo_without_input() {
        let config = small_config();
        let mut patch = Patch::new(&config);
        let mut clock = Clock::new(&config);
        // 2 s at 48 kHz in 32-frame blocks.
        let ticks = run(&mut clock, &mut patch, 3_000, 0);
        assert_eq!(ticks, 4);
        assert_eq!(patch.state.clock_source, ClockSource::Internal);
        assert_eq!(patch.state.clock_period, 24_000.0);
    }

    #[test]
    fn locks_to_external_pulses() {
        let config = small_config();
        let mut patch = Patch::new(&config);
        let mut clock = Clock::new(&config);
        run(&mut clock, &mut patch, 100, 50);
        assert_eq!(patch.state.clock_source, ClockSource::External);
        assert_eq!(patch.state.clock_period, 1_600.0);
    }

    #[test]
    fn held_level_is_one_edge() {
        let config = small_config();
        let mut patch = Patch::new(&config);
        let mut clock = Clock::new(&config);
        patch.state.sync_in = true;
        clock.process(&mut patch, 32);
        clock.process(&mut patch, 32);
        clock.process(&mut patch, 32);
        assert_eq!(patch.state.clock_source, ClockSource::Internal);
    }

    #[test]
    fn falls_back_when_pulses_stop() {
        let config = small_config();
        let mut patch = Patch::new(&config);
        let mut clock = Clock::new(&config);
        run(&mut clock, &mut patch, 101, 50);
        assert_eq!(patch.state.clock_source, ClockSource::External);
        // Longer than the 4 s ceiling.
        run(&mut clock, &mut patch, 6_100, 0);
        assert_eq!(patch.state.clock_source, ClockSource::Internal);
        assert_eq!(patch.state.clock_period, clock.internal_period());
    }
}
