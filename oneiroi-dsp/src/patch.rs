//! Shared control and state.
//!
//! Every stage reads the same [`Patch`]: knob values in [`PatchCtrls`],
//! control-voltage inputs in [`PatchCvs`] and engine-wide derived state in
//! [`PatchState`]. Controls are written by the parameter handler between
//! blocks, already scaled to the units the stages expect, and stay constant
//! for the duration of a block.

use crate::config::EngineConfig;
use crate::constants::{BASE_PITCH_HZ, C5_HZ};

/// Continuous controls, pre-scaled to each stage's natural unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchCtrls {
    /// Input gain, 0..1.
    pub input_vol: f32,

    /// Oscillator frequency in Hz (semitone, fine and V/oct already folded in).
    pub osc_pitch: f32,
    /// Spread between the two detuned voices, -1..1.
    pub osc_detune: f32,
    /// Unison offset, roughly -0.1..0.1; exactly zero in the centre dead zone.
    pub osc_unison: f32,
    /// Sine oscillator level.
    pub osc1_vol: f32,
    /// Super-saw / wavetable oscillator level.
    pub osc2_vol: f32,
    /// Above 0.5 the second oscillator plays the wavetable instead of the super-saw.
    pub osc_use_wavetable: f32,

    pub filter_vol: f32,
    /// Four equal bands: low-pass, band-pass, high-pass, comb.
    pub filter_mode: f32,
    /// Cutoff as a fraction of 22 kHz.
    pub filter_cutoff: f32,
    pub filter_resonance: f32,
    /// Four equal bands selecting where in the chain the filter sits.
    pub filter_position: f32,

    pub looper_vol: f32,
    /// Sound-on-sound: how much of the old loop survives an overdub.
    pub looper_sos: f32,
    /// Tilt of the playback filter; 0.5 is flat.
    pub looper_filter: f32,
    /// Playback rate, -2..2; negative plays backwards.
    pub looper_speed: f32,
    /// Start of the loop window as a fraction of the tape.
    pub looper_start: f32,
    /// Length of the loop window as a fraction of the tape.
    pub looper_length: f32,
    /// Above 0.5 the looper records.
    pub looper_recording: f32,
    /// Above 0.5 the looper records the engine's previous output instead of the input.
    pub looper_resampling: f32,

    pub resonator_vol: f32,
    /// Tuning offset in octaves, -1..1.
    pub resonator_tune: f32,
    pub resonator_feedback: f32,
    pub resonator_dissonance: f32,

    pub echo_vol: f32,
    /// Delay time as a fraction of the echo memory (or of the clock period when synced).
    pub echo_density: f32,
    pub echo_repeats: f32,
    /// Tilt of the feedback path; 0.5 is flat.
    pub echo_filter: f32,

    pub ambience_vol: f32,
    pub ambience_decay: f32,
    /// Room size.
    pub ambience_spacetime: f32,
    /// Above 0.5 the wet signal is panned by the modulation LFO.
    pub ambience_auto_pan: f32,

    /// LFO shape morph, 0..0.8 across sine, triangle, saw, square, sample-and-hold.
    pub mod_type: f32,
    pub mod_speed: f32,
    /// LFO depth; the LFO stops advancing at zero.
    pub mod_level: f32,

    pub osc_pitch_mod_amount: f32,
    pub osc_detune_mod_amount: f32,
    pub filter_cutoff_mod_amount: f32,
    pub filter_resonance_mod_amount: f32,
    pub looper_speed_mod_amount: f32,
    pub looper_start_mod_amount: f32,
    pub looper_length_mod_amount: f32,
    pub resonator_tune_mod_amount: f32,
    pub resonator_feedback_mod_amount: f32,
    pub echo_density_mod_amount: f32,
    pub echo_repeats_mod_amount: f32,
    pub ambience_decay_mod_amount: f32,
    pub ambience_spacetime_mod_amount: f32,

    pub osc_pitch_cv_amount: f32,
    pub osc_detune_cv_amount: f32,
    pub filter_cutoff_cv_amount: f32,
    pub filter_resonance_cv_amount: f32,
    pub looper_speed_cv_amount: f32,
    pub looper_start_cv_amount: f32,
    pub looper_length_cv_amount: f32,
    pub resonator_tune_cv_amount: f32,
    pub echo_density_cv_amount: f32,
    pub ambience_spacetime_cv_amount: f32,
}

impl Default for PatchCtrls {
    fn default() -> Self {
        PatchCtrls {
            input_vol: 0.0,

            osc_pitch: BASE_PITCH_HZ,
            osc_detune: 0.0,
            osc_unison: 0.0,
            osc1_vol: 0.0,
            osc2_vol: 0.9,
            osc_use_wavetable: 0.0,

            filter_vol: 0.0,
            filter_mode: 0.0,
            filter_cutoff: 20_000.0 / 22_000.0,
            filter_resonance: 0.0,
            filter_position: 0.0,

            looper_vol: 0.0,
            looper_sos: 0.0,
            // Flat sits slightly above the knob's mid travel.
            looper_filter: 0.55,
            looper_speed: 1.0,
            looper_start: 0.0,
            looper_length: 1.0,
            looper_recording: 0.0,
            looper_resampling: 0.0,

            resonator_vol: 0.0,
            resonator_tune: 0.0,
            resonator_feedback: 0.0,
            resonator_dissonance: 0.0,

            echo_vol: 0.0,
            echo_density: 0.5,
            echo_repeats: 0.5,
            echo_filter: 0.55,

            ambience_vol: 0.0,
            ambience_decay: 0.5,
            ambience_spacetime: 0.5,
            ambience_auto_pan: 0.0,

            mod_type: 0.0,
            mod_speed: 0.5,
            mod_level: 0.0,

            osc_pitch_mod_amount: 0.0,
            osc_detune_mod_amount: 0.0,
            filter_cutoff_mod_amount: 0.5,
            filter_resonance_mod_amount: 0.0,
            looper_speed_mod_amount: 0.0,
            looper_start_mod_amount: 0.0,
            looper_length_mod_amount: 0.0,
            resonator_tune_mod_amount: 0.0,
            resonator_feedback_mod_amount: 0.0,
            echo_density_mod_amount: 0.0,
            echo_repeats_mod_amount: 0.0,
            ambience_decay_mod_amount: 0.0,
            ambience_spacetime_mod_amount: 0.0,

            osc_pitch_cv_amount: 1.0,
            osc_detune_cv_amount: 1.0,
            filter_cutoff_cv_amount: 1.0,
            filter_resonance_cv_amount: 0.0,
            looper_speed_cv_amount: 1.0,
            looper_start_cv_amount: 1.0,
            looper_length_cv_amount: 1.0,
            resonator_tune_cv_amount: 1.0,
            echo_density_cv_amount: 1.0,
            ambience_spacetime_cv_amount: 1.0,
        }
    }
}

/// Control-voltage inputs, combined with the matching control inside each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PatchCvs {
    pub osc_pitch: f32,
    pub osc_detune: f32,
    pub filter_cutoff: f32,
    pub filter_resonance: f32,
    pub looper_speed: f32,
    pub looper_start: f32,
    pub looper_length: f32,
    pub resonator_tune: f32,
    pub echo_density: f32,
    pub ambience_spacetime: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartupPhase {
    /// Output is muted.
    #[default]
    Start,
    /// Reserved for a fade-in ramp; output stays muted.
    FadeIn,
    /// Normal operation.
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockSource {
    #[default]
    Internal,
    External,
}

/// Engine-wide derived and transient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchState {
    pub sample_rate: f32,
    /// Largest block size.
    pub block_size: usize,
    /// Blocks per second.
    pub block_rate: f32,

    pub startup_phase: StartupPhase,
    pub clock_source: ClockSource,
    /// Rising edge seen on the clock input this block.
    pub sync_in: bool,
    /// The clock stage produced a tick this block.
    pub clock_tick: bool,
    /// Current clock period in samples.
    pub clock_period: f32,
    /// Raised for exactly one block after the filter position changes.
    pub filter_position_flag: bool,
    /// Final output gain once startup is done.
    pub out_level: f32,
    /// Latest LFO output, bipolar.
    pub mod_value: f32,

    pub osc_unison_center_flag: bool,
    pub c5: f32,
    pub pitch_zero: f32,
    pub speed_zero: f32,
    pub mod_attenuverters: bool,
    pub cv_attenuverters: bool,

    pub debug: [f32; 4],
}

impl PatchState {
    pub fn new(config: &EngineConfig) -> Self {
        PatchState {
            sample_rate: config.sample_rate,
            block_size: config.max_block_size,
            block_rate: config.block_rate(),
            ..Self::default()
        }
    }
}

impl Default for PatchState {
    fn default() -> Self {
        let config = EngineConfig::default();
        PatchState {
            sample_rate: config.sample_rate,
            block_size: config.max_block_size,
            block_rate: config.block_rate(),
            startup_phase: StartupPhase::Start,
            clock_source: ClockSource::Internal,
            sync_in: false,
            clock_tick: false,
            clock_period: 0.0,
            filter_position_flag: false,
            out_level: crate::constants::DEFAULT_OUT_LEVEL,
            mod_value: 0.0,
            osc_unison_center_flag: false,
            c5: C5_HZ,
            pitch_zero: 0.0,
            speed_zero: 0.0,
            mod_attenuverters: false,
            cv_attenuverters: false,
            debug: [0.0; 4],
        }
    }
}

/// Everything a stage may read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Patch {
    pub ctrls: PatchCtrls,
    pub cvs: PatchCvs,
    pub state: PatchState,
}

impl Patch {
    pub fn new(config: &EngineConfig) -> Self {
        Patch {
            ctrls: PatchCtrls::default(),
            cvs: PatchCvs::default(),
            state: PatchState::new(config),
        }
    }

    /// `base` offset by the LFO and a CV input, each through its own amount.
    #[inline]
    pub fn modulated(&self, base: f32, mod_amount: f32, cv: f32, cv_amount: f32) -> f32 {
        base + self.state.mod_value * mod_amount + cv * cv_amount
    }

    /// [`modulated`](Self::modulated) clamped to `0..=1`.
    #[inline]
    pub fn modulated_unit(&self, base: f32, mod_amount: f32, cv: f32, cv_amount: f32) -> f32 {
        self.modulated(base, mod_amount, cv, cv_amount).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_config() {
        let config = EngineConfig::new(44_100.0, 64);
        let patch = Patch::new(&config);
        assert_eq!(patch.state.sample_rate, 44_100.0);
        assert_eq!(patch.state.block_size, 64);
        assert!((patch.state.block_rate - 689.0625).abs() < 1e-3);
        assert_eq!(patch.state.startup_phase, StartupPhase::Start);
        assert_eq!(patch.ctrls.osc_pitch, BASE_PITCH_HZ);
    }

    #[test]
    fn modulation_adds_lfo_and_cv() {
        let mut patch = Patch::default();
        patch.state.mod_value = 0.5;
        assert_eq!(patch.modulated(0.2, 0.4, 1.0, 0.1), 0.2 + 0.2 + 0.1);
        assert_eq!(patch.modulated_unit(0.9, 1.0, 0.0, 0.0), 1.0);
    }
}
