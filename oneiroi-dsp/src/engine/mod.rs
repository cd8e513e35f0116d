//! The block orchestrator.
//!
//! [`Engine`] owns one instance of every stage, the scratch buffers the
//! signal path needs and the shared [`Patch`]. Each call to
//! [`process`](Engine::process) runs the whole chain over one block:
//!
//! 1. input gain and DC removal;
//! 2. LFO (only while the modulation level is above zero) and clock;
//! 3. looper, summed with a copy of the input;
//! 4. sine and super-saw / wavetable oscillators, summed, then makeup gain;
//! 5. resonator, echo and ambience, with the filter inserted at one of four
//!    slots chosen by the filter-position control;
//! 6. output DC removal, makeup gain and soft limiting;
//! 7. output level (or silence until startup is done), and a copy of the
//!    block kept for resampling on the next call.
//!
//! Every stage after the clock is skipped while its volume control is
//! exactly zero.

mod position;


pub use position::FilterPosition;

use crate::arena::Arena;
use crate::buffer::StereoBuffer;
use crate::config::EngineConfig;
use crate::constants::{OUTPUT_MAKEUP_GAIN, SOURCES_MAKEUP_GAIN};
use crate::error::Result;
use crate::node::{ControlStage, StereoGenerator, StereoProcessor};
use crate::nodes::{
    Ambience, Clock, Echo, Filter, Limiter, Looper, Modulation, Resonator, StereoDcBlockingFilter,
    StereoSineOscillator, StereoSuperSaw, StereoWaveTableOscillator,
};
use crate::patch::{Patch, StartupPhase};

pub struct Engine<'a> {
    config: EngineConfig,
    patch: Patch,

    looper: Looper<'a>,
    sine: StereoSineOscillator<'a>,
    saw: StereoSuperSaw,
    wavetable: StereoWaveTableOscillator,
    filter: Filter<'a>,
    resonator: Resonator<'a>,
    echo: Echo<'a>,
    ambience: Ambience<'a>,
    modulation: Modulation,
    clock: Clock,
    limiter: Limiter,
    input_dc: StereoDcBlockingFilter,
    output_dc: StereoDcBlockingFilter,

    input: StereoBuffer<'a>,
    resample: StereoBuffer<'a>,
    osc1_out: StereoBuffer<'a>,
    osc2_out: StereoBuffer<'a>,

    filter_position: FilterPosition,
    last_filter_position: FilterPosition,
}

impl<'a> Engine<'a> {
    /// Place every stage and scratch buffer into `arena`.
    ///
    /// This is the only place the engine allocates. The patch starts in
    /// [`StartupPhase::Start`], so output stays silent until the owner marks
    /// startup as done.
    pub fn new(config: &EngineConfig, arena: &mut Arena<'a>) -> Result<Self> {
        config.validate()?;
        let block = config.max_block_size;
        let engine = Engine {
            config: *config,
            patch: Patch::new(config),

            looper: Looper::create(arena, config)?,
            sine: StereoSineOscillator::create(arena, config)?,
            saw: StereoSuperSaw::new(config),
            wavetable: StereoWaveTableOscillator::new(config),
            filter: Filter::create(arena, config)?,
            resonator: Resonator::create(arena, config)?,
            echo: Echo::create(arena, config)?,
            ambience: Ambience::create(arena, config)?,
            modulation: Modulation::new(config),
            clock: Clock::new(config),
            limiter: Limiter::new(),
            input_dc: StereoDcBlockingFilter::new(),
            output_dc: StereoDcBlockingFilter::new(),

            input: StereoBuffer::create(arena, block)?,
            resample: StereoBuffer::create(arena, block)?,
            osc1_out: StereoBuffer::create(arena, block)?,
            osc2_out: StereoBuffer::create(arena, block)?,

            filter_position: FilterPosition::Position1,
            last_filter_position: FilterPosition::Position1,
        };
        let usage = arena.usage();
        log::info!(
            "engine ready: {} Hz, {} frames/block, fast pool {}/{} bytes, bulk pool {}/{} bytes",
            config.sample_rate,
            block,
            usage.fast_used,
            usage.fast_capacity,
            usage.bulk_used,
            usage.bulk_capacity
        );
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    /// Controls and state are written here between blocks.
    pub fn patch_mut(&mut self) -> &mut Patch {
        &mut self.patch
    }

    /// Position used for the most recent block.
    pub fn filter_position(&self) -> FilterPosition {
        self.filter_position
    }

    pub fn looper(&self) -> &Looper<'a> {
        &self.looper
    }

    /// Re-derive the filter slot and raise the change flag for one block.
    fn update_filter_position(&mut self) {
        self.filter_position = FilterPosition::from_control(self.patch.ctrls.filter_position);
        if self.filter_position != self.last_filter_position {
            log::debug!(
                "filter position {:?} -> {:?}",
                self.last_filter_position,
                self.filter_position
            );
            self.last_filter_position = self.filter_position;
            self.patch.state.filter_position_flag = true;
        } else {
            self.patch.state.filter_position_flag = false;
        }
    }

    fn filter_at(&mut self, slot: FilterPosition, buffer: &mut StereoBuffer<'_>) {
        if self.filter_position == slot && self.patch.ctrls.filter_vol > 0.0 {
            self.filter.process(&self.patch, buffer);
        }
    }

    /// Run the whole chain over `buffer.size()` frames in place.
    pub fn process(&mut self, buffer: &mut StereoBuffer<'_>) {
        let frames = buffer.size();
        for scratch in [
            &mut self.input,
            &mut self.resample,
            &mut self.osc1_out,
            &mut self.osc2_out,
        ] {
            scratch.set_size(frames);
        }

        buffer.multiply(self.patch.ctrls.input_vol);
        self.input_dc.process(&self.patch, buffer);

        if self.patch.ctrls.mod_level > 0.0 {
            self.modulation.process(&mut self.patch, frames);
        }
        self.clock.process(&mut self.patch, frames);

        self.input.copy_from(buffer);

        let ctrls = self.patch.ctrls;
        if ctrls.looper_vol > 0.0 {
            if ctrls.looper_resampling > 0.5 {
                self.looper.process(&self.patch, &self.resample, buffer);
            } else {
                self.looper.process(&self.patch, &self.input, buffer);
            }
        }
        buffer.add(&self.input);

        if ctrls.osc1_vol > 0.0 {
            self.sine.generate(&self.patch, &mut self.osc1_out);
            buffer.add(&self.osc1_out);
        }

        self.osc2_out.clear();
        if ctrls.osc2_vol > 0.0 {
            if ctrls.osc_use_wavetable > 0.5 {
                self.wavetable
                    .generate(&self.patch, self.looper.tape(), &mut self.osc2_out);
            } else {
                self.saw.generate(&self.patch, &mut self.osc2_out);
            }
            buffer.add(&self.osc2_out);
        }

        buffer.multiply(SOURCES_MAKEUP_GAIN);

        self.update_filter_position();

        self.filter_at(FilterPosition::Position1, buffer);
        if ctrls.resonator_vol > 0.0 {
            self.resonator.process(&self.patch, buffer);
        }
        self.filter_at(FilterPosition::Position2, buffer);
        if ctrls.echo_vol > 0.0 {
            self.echo.process(&self.patch, buffer);
        }
        self.filter_at(FilterPosition::Position3, buffer);
        if ctrls.ambience_vol > 0.0 {
            self.ambience.process(&self.patch, buffer);
        }
        self.filter_at(FilterPosition::Position4, buffer);

        self.output_dc.process(&self.patch, buffer);
        buffer.multiply(OUTPUT_MAKEUP_GAIN);
        self.limiter.process(&self.patch, buffer);

        if self.patch.state.startup_phase == StartupPhase::Done {
            buffer.multiply(self.patch.state.out_level);
        } else {
            // TODO: ramp in over StartupPhase::FadeIn instead of muting.
            buffer.clear();
        }

        self.resample.copy_from(buffer);
    }
}
