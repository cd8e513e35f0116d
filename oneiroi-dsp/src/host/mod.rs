//! Plug-in host adapter.
//!
//! The host owns a flat bus array of `NUM_BUSES` channels and calls into the
//! engine through four entry points:
//!
//! | Entry point                          | Job                                             |
//! |--------------------------------------|-------------------------------------------------|
//! | [`calculate_requirements`]           | parameter count and memory the host must reserve |
//! | [`Algorithm::construct`]             | build the engine in the host's memory regions   |
//! | [`Algorithm::step`]                  | route buses in, run one block, route buses out  |
//! | [`Algorithm::set_parameter`]         | store a raw value and push it into the patch    |
//!
//! [`Algorithm::diagnostics`] returns what the host's display shows.

mod params;


pub use params::{
    Page, ParamId, Parameter, Scaling, Unit, NUM_BUSES, PAGES, PARAMETERS, PARAM_COUNT,
};

use core::ops::Range;

use crate::arena::{Arena, ArenaUsage};
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::constants::{
    BASE_PITCH_HZ, BULK_POOL_BYTES, CLOCK_THRESHOLD, FAST_POOL_BYTES, LEFT_CHANNEL, RIGHT_CHANNEL,
};
use crate::dsp::helpers::{map_expo, semitones_to_ratio};
use crate::engine::Engine;
use crate::error::Result;
use crate::patch::StartupPhase;

/// Unison values this close to zero snap to exactly zero.
const UNISON_DEAD_ZONE: f32 = 0.0003;

/// What the host has to provide before [`Algorithm::construct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub param_count: usize,
    pub fast_pool_bytes: usize,
    pub bulk_pool_bytes: usize,
}

pub fn calculate_requirements() -> Requirements {
    Requirements {
        param_count: PARAM_COUNT,
        fast_pool_bytes: FAST_POOL_BYTES,
        bulk_pool_bytes: BULK_POOL_BYTES,
    }
}

/// Memory handed over by the host, sized per [`Requirements`].
pub struct MemoryRegions<'a> {
    pub fast: &'a mut [u8],
    pub bulk: &'a mut [u8],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostGlobals {
    pub sample_rate: f32,
    pub max_frames_per_step: usize,
}

/// Values for the host display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    /// Free-form values any stage may publish through `PatchState::debug`.
    pub debug: [f32; 4],
    pub fast_utilization: f32,
    pub bulk_utilization: f32,
}

/// One running instance of the engine bound to the host's buses.
pub struct Algorithm<'a> {
    engine: Engine<'a>,
    buffer: StereoBuffer<'a>,
    values: [i16; PARAM_COUNT],
    usage: ArenaUsage,

    semitones: f32,
    fine_cents: f32,
    volts: f32,
    last_clock: f32,
}

impl<'a> Algorithm<'a> {
    /// Build with the default memory sizes for the host's rate and block size.
    pub fn construct(regions: MemoryRegions<'a>, globals: HostGlobals) -> Result<Self> {
        let config = EngineConfig::new(globals.sample_rate, globals.max_frames_per_step);
        Self::construct_with_config(regions, &config)
    }

    /// Build the engine and the host-facing stereo buffer, then apply every
    /// parameter default. Startup is complete when this returns.
    pub fn construct_with_config(regions: MemoryRegions<'a>, config: &EngineConfig) -> Result<Self> {
        let mut arena = Arena::new(regions.fast, regions.bulk);
        let engine = Engine::new(config, &mut arena)?;
        let buffer = StereoBuffer::create(&mut arena, config.max_block_size)?;

        let mut values = [0i16; PARAM_COUNT];
        for (value, param) in values.iter_mut().zip(PARAMETERS.iter()) {
            *value = param.default;
        }

        let mut algorithm = Algorithm {
            engine,
            buffer,
            values,
            usage: arena.usage(),
            semitones: 0.0,
            fine_cents: 0.0,
            volts: 0.0,
            last_clock: 0.0,
        };
        for index in 0..PARAM_COUNT {
            algorithm.parameter_changed(index);
        }
        algorithm.engine.patch_mut().state.startup_phase = StartupPhase::Done;

        log::info!(
            "algorithm constructed: {} parameters, fast {:.1}%, bulk {:.1}%",
            PARAM_COUNT,
            algorithm.usage.fast_utilization() * 100.0,
            algorithm.usage.bulk_utilization() * 100.0
        );
        Ok(algorithm)
    }

    pub fn engine(&self) -> &Engine<'a> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<'a> {
        &mut self.engine
    }

    /// Raw value currently stored for a parameter.
    pub fn value(&self, id: ParamId) -> i16 {
        self.values[id.index()]
    }

    /// Store a raw value, clamped to the parameter's range, and apply it.
    ///
    /// Returns `false` for an unknown index.
    pub fn set_parameter(&mut self, index: usize, value: i16) -> bool {
        let Some(id) = ParamId::from_index(index) else {
            log::warn!("ignoring unknown parameter {}", index);
            return false;
        };
        self.values[index] = id.info().clamp(value);
        self.parameter_changed(index);
        true
    }

    /// Push the stored raw value of one parameter into the patch.
    pub fn parameter_changed(&mut self, index: usize) {
        let Some(id) = ParamId::from_index(index) else {
            return;
        };
        let raw = self.values[index] as f32;
        let unit = raw / 1000.0;
        let patch = self.engine.patch_mut();
        let c = &mut patch.ctrls;

        match id {
            // Routing is read directly in `step`.
            ParamId::LeftOutput
            | ParamId::LeftOutputMode
            | ParamId::RightOutput
            | ParamId::RightOutputMode
            | ParamId::LeftInput
            | ParamId::RightInput
            | ParamId::ClockInput => {}

            ParamId::InputLevel => c.input_vol = unit,
            ParamId::OutputLevel => patch.state.out_level = unit,

            ParamId::OscSemi => self.semitones = raw,
            ParamId::OscFine => self.fine_cents = raw,
            ParamId::OscV8c => self.volts = unit,
            ParamId::OscDetune => c.osc_detune = unit,
            ParamId::OscPitchModAmount => c.osc_pitch_mod_amount = unit,
            ParamId::OscUnison => {
                let unison = raw / 10_000.0;
                let centred = unison.abs() <= UNISON_DEAD_ZONE;
                patch.state.osc_unison_center_flag = centred;
                c.osc_unison = if centred { 0.0 } else { unison };
            }
            ParamId::OscDetuneModAmount => c.osc_detune_mod_amount = unit,
            ParamId::SineVol => c.osc1_vol = map_expo(unit),
            ParamId::SuperSawVol => c.osc2_vol = map_expo(unit),
            ParamId::SuperSawWavetable => c.osc_use_wavetable = raw,

            ParamId::FilterVol => c.filter_vol = map_expo(unit),
            ParamId::FilterMode => c.filter_mode = band_centre(raw),
            ParamId::FilterCutoff => c.filter_cutoff = raw / 22_000.0,
            ParamId::FilterCutoffModAmount => c.filter_cutoff_mod_amount = unit,
            ParamId::FilterResonance => c.filter_resonance = unit,
            ParamId::FilterResonanceModAmount => c.filter_resonance_mod_amount = unit,
            ParamId::FilterPosition => c.filter_position = band_centre(raw),

            ParamId::LooperVol => c.looper_vol = map_expo(unit),
            ParamId::LooperSos => c.looper_sos = unit,
            ParamId::LooperFilter => c.looper_filter = unit,
            ParamId::LooperSpeed => c.looper_speed = unit,
            ParamId::LooperSpeedModAmount => c.looper_speed_mod_amount = unit,
            ParamId::LooperStart => c.looper_start = unit,
            ParamId::LooperStartModAmount => c.looper_start_mod_amount = unit,
            ParamId::LooperLength => c.looper_length = unit,
            ParamId::LooperLengthModAmount => c.looper_length_mod_amount = unit,
            ParamId::LooperRecording => c.looper_recording = raw,
            ParamId::LooperResampling => c.looper_resampling = raw,

            ParamId::ResonatorVol => c.resonator_vol = map_expo(unit),
            ParamId::ResonatorTune => c.resonator_tune = raw / 1200.0,
            ParamId::ResonatorFeedback => c.resonator_feedback = unit,
            ParamId::ResonatorDissonance => c.resonator_dissonance = unit,

            ParamId::EchoVol => c.echo_vol = map_expo(unit),
            ParamId::EchoDensity => c.echo_density = unit,
            ParamId::EchoRepeats => c.echo_repeats = unit,
            ParamId::EchoFilter => c.echo_filter = unit,

            ParamId::AmbienceVol => c.ambience_vol = map_expo(unit),
            ParamId::AmbienceDecay => c.ambience_decay = unit,
            ParamId::AmbienceSpacetime => c.ambience_spacetime = unit,
            ParamId::AmbienceAutoPan => c.ambience_auto_pan = raw,

            ParamId::ModType => c.mod_type = unit,
            ParamId::ModSpeed => c.mod_speed = unit,
            ParamId::ModLevel => c.mod_level = unit,
        }

        if matches!(id, ParamId::OscSemi | ParamId::OscFine | ParamId::OscV8c) {
            self.update_pitch();
        }
    }

    /// Fold semitones, cents and V/oct into one frequency.
    fn update_pitch(&mut self) {
        let ratio = semitones_to_ratio(self.semitones)
            * semitones_to_ratio(self.fine_cents / 100.0)
            * semitones_to_ratio(self.volts * 12.0);
        self.engine.patch_mut().ctrls.osc_pitch = BASE_PITCH_HZ * ratio;
    }

    /// Process one block of `frames_by_4 * 4` frames.
    ///
    /// `bus` holds every host bus back to back, each `frames_by_4 * 4` samples
    /// long. Frames past the engine's block capacity are left untouched.
    /// Inputs are read only when both are routed; each output either adds to
    /// or replaces its bus according to its own mode.
    pub fn step(&mut self, bus: &mut [f32], frames_by_4: usize) {
        // Buses are laid out with the host's block length; only the part
        // that fits the engine's buffer is processed.
        let layout = BusLayout {
            stride: frames_by_4 * 4,
            frames: (frames_by_4 * 4).min(self.buffer.capacity()),
            len: bus.len(),
        };
        self.buffer.set_size(layout.frames);
        self.buffer.clear();

        let left_in = layout.range(self.value(ParamId::LeftInput));
        let right_in = layout.range(self.value(ParamId::RightInput));
        if let (Some(left), Some(right)) = (left_in, right_in) {
            let (l, r) = self.buffer.stereo_mut();
            l.copy_from_slice(&bus[left]);
            r.copy_from_slice(&bus[right]);
        }

        if let Some(clock) = layout.range(self.value(ParamId::ClockInput)) {
            let level = bus[clock].first().copied().unwrap_or(0.0);
            let pulse = self.last_clock < CLOCK_THRESHOLD && level >= CLOCK_THRESHOLD;
            self.last_clock = level;
            self.engine.patch_mut().state.sync_in = pulse;
        } else {
            self.engine.patch_mut().state.sync_in = false;
        }

        self.engine.process(&mut self.buffer);

        let routes = [
            (ParamId::LeftOutput, ParamId::LeftOutputMode, LEFT_CHANNEL),
            (ParamId::RightOutput, ParamId::RightOutputMode, RIGHT_CHANNEL),
        ];
        for (output, mode, channel) in routes {
            let Some(range) = layout.range(self.value(output)) else {
                continue;
            };
            let source = self.buffer.samples_ref(channel);
            let dest = &mut bus[range];
            if self.value(mode) == 1 {
                dest.copy_from_slice(source);
            } else {
                for (d, s) in dest.iter_mut().zip(source) {
                    *d += *s;
                }
            }
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            debug: self.engine.patch().state.debug,
            fast_utilization: self.usage.fast_utilization(),
            bulk_utilization: self.usage.bulk_utilization(),
        }
    }
}

/// Enum index `i` of four mapped into the middle-low of band `i`.
fn band_centre(index: f32) -> f32 {
    index / 4.0 + 0.01
}

/// Where each bus sits in the host's flat bus array for one step.
#[derive(Clone, Copy)]
struct BusLayout {
    /// Samples per bus as laid out by the host.
    stride: usize,
    /// Samples per bus the engine processes, at most `stride`.
    frames: usize,
    /// Length of the whole bus array.
    len: usize,
}

impl BusLayout {
    /// Processed range of a 1-based bus, `None` when unrouted or out of bounds.
    fn range(&self, bus: i16) -> Option<Range<usize>> {
        if bus < 1 {
            return None;
        }
        let start = (bus as usize - 1) * self.stride;
        (start + self.stride <= self.len).then_some(start..start + self.frames)
    }
}
