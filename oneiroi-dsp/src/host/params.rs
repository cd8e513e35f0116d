//! Host parameter table.
//!
//! Parameters are raw integers as the host stores them. [`PARAMETERS`] gives
//! each one its range, default, display unit and scaling; the conversion to
//! engine units happens in
//! [`Algorithm::parameter_changed`](super::Algorithm::parameter_changed).

/// Number of audio buses the host exposes.
pub const NUM_BUSES: i16 = 28;

/// Parameter indices, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ParamId {
    LeftOutput,
    LeftOutputMode,
    RightOutput,
    RightOutputMode,
    LeftInput,
    RightInput,
    ClockInput,

    InputLevel,
    OutputLevel,

    OscSemi,
    OscFine,
    OscV8c,
    OscDetune,
    OscPitchModAmount,
    OscUnison,
    OscDetuneModAmount,
    SineVol,
    SuperSawVol,
    SuperSawWavetable,

    FilterVol,
    FilterMode,
    FilterCutoff,
    FilterCutoffModAmount,
    FilterResonance,
    FilterResonanceModAmount,
    FilterPosition,

    LooperVol,
    LooperSos,
    LooperFilter,
    LooperSpeed,
    LooperSpeedModAmount,
    LooperStart,
    LooperStartModAmount,
    LooperLength,
    LooperLengthModAmount,
    LooperRecording,
    LooperResampling,

    ResonatorVol,
    ResonatorTune,
    ResonatorFeedback,
    ResonatorDissonance,

    EchoVol,
    EchoDensity,
    EchoRepeats,
    EchoFilter,

    AmbienceVol,
    AmbienceDecay,
    AmbienceSpacetime,
    AmbienceAutoPan,

    ModType,
    ModSpeed,
    ModLevel,
}

pub const PARAM_COUNT: usize = ParamId::ModLevel as usize + 1;

impl ParamId {
    pub fn from_index(index: usize) -> Option<Self> {
        PARAMETERS.get(index).map(|p| p.id)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static Parameter {
        &PARAMETERS[self as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    None,
    Percent,
    Semitones,
    Cents,
    Volts,
    Db,
    Hz,
    Enum,
    AudioInput,
    AudioOutput,
    OutputMode,
}

/// How the host displays the raw integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scaling {
    None,
    /// Shown divided by 1000.
    Thousandths,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub id: ParamId,
    pub name: &'static str,
    pub min: i16,
    pub max: i16,
    pub default: i16,
    pub unit: Unit,
    pub scaling: Scaling,
    pub enum_strings: Option<&'static [&'static str]>,
}

impl Parameter {
    pub fn clamp(&self, value: i16) -> i16 {
        value.clamp(self.min, self.max)
    }
}

const fn param(
    id: ParamId,
    name: &'static str,
    min: i16,
    max: i16,
    default: i16,
    unit: Unit,
    scaling: Scaling,
) -> Parameter {
    Parameter {
        id,
        name,
        min,
        max,
        default,
        unit,
        scaling,
        enum_strings: None,
    }
}

const fn choice(id: ParamId, name: &'static str, default: i16, strings: &'static [&'static str]) -> Parameter {
    Parameter {
        id,
        name,
        min: 0,
        max: strings.len() as i16 - 1,
        default,
        unit: Unit::Enum,
        scaling: Scaling::None,
        enum_strings: Some(strings),
    }
}

/// 0..1000, shown as 0.000..1.000.
const fn level(id: ParamId, name: &'static str, default: i16, unit: Unit) -> Parameter {
    param(id, name, 0, 1000, default, unit, Scaling::Thousandths)
}

/// -1000..1000 modulation depth.
const fn depth(id: ParamId, name: &'static str) -> Parameter {
    param(id, name, -1000, 1000, 0, Unit::None, Scaling::Thousandths)
}

pub const OUTPUT_MODES: &[&str] = &["Add", "Replace"];
pub const FILTER_MODES: &[&str] = &["Low-pass", "Band-pass", "High-pass", "Comb filter"];
pub const ON_OFF: &[&str] = &["Off", "On"];
pub const FILTER_POSITIONS: &[&str] = &["After oscs", "Res <-> Echo", "Echo <-> Amb", "End of chain"];
pub const SECOND_OSCILLATOR: &[&str] = &["SuperSaw", "WaveTable"];

use ParamId as P;
use Scaling::{None as Raw, Thousandths};

pub static PARAMETERS: [Parameter; PARAM_COUNT] = [
    param(P::LeftOutput, "Left Output", 1, NUM_BUSES, 13, Unit::AudioOutput, Raw),
    Parameter {
        unit: Unit::OutputMode,
        ..choice(P::LeftOutputMode, "Left Output mode", 0, OUTPUT_MODES)
    },
    param(P::RightOutput, "Right Output", 1, NUM_BUSES, 14, Unit::AudioOutput, Raw),
    Parameter {
        unit: Unit::OutputMode,
        ..choice(P::RightOutputMode, "Right Output mode", 0, OUTPUT_MODES)
    },
    param(P::LeftInput, "Left Input", 0, NUM_BUSES, 1, Unit::AudioInput, Raw),
    param(P::RightInput, "Right Input", 0, NUM_BUSES, 2, Unit::AudioInput, Raw),
    param(P::ClockInput, "Clock Input", 0, NUM_BUSES, 0, Unit::AudioInput, Raw),
    level(P::InputLevel, "Input Level", 700, Unit::Percent),
    level(P::OutputLevel, "Output Level", 700, Unit::Percent),
    // Oscillators
    param(P::OscSemi, "Semi", -48, 48, 0, Unit::Semitones, Raw),
    param(P::OscFine, "Fine", -50, 50, 0, Unit::Cents, Raw),
    param(P::OscV8c, "Volt/Octave", -5000, 5000, 0, Unit::Volts, Thousandths),
    param(P::OscDetune, "Detune", -1000, 1000, 0, Unit::None, Thousandths),
    depth(P::OscPitchModAmount, "Pitch mod amount"),
    param(P::OscUnison, "Unison", -1000, 1000, 0, Unit::None, Thousandths),
    depth(P::OscDetuneModAmount, "Detune mod amount"),
    level(P::SineVol, "Sine Vol", 750, Unit::Db),
    level(P::SuperSawVol, "SS/WT Vol", 750, Unit::Db),
    choice(P::SuperSawWavetable, "SS/WT Switch", 0, SECOND_OSCILLATOR),
    // Filter
    level(P::FilterVol, "Vol", 750, Unit::Db),
    choice(P::FilterMode, "Mode", 0, FILTER_MODES),
    param(P::FilterCutoff, "Cutoff", 0, 22000, 22000, Unit::Hz, Raw),
    depth(P::FilterCutoffModAmount, "Cutoff Mod"),
    level(P::FilterResonance, "Resonance", 0, Unit::None),
    depth(P::FilterResonanceModAmount, "Res Mod"),
    choice(P::FilterPosition, "Position", 0, FILTER_POSITIONS),
    // Looper
    level(P::LooperVol, "Vol", 750, Unit::Db),
    level(P::LooperSos, "Sound on Sound", 0, Unit::Percent),
    level(P::LooperFilter, "Filter", 550, Unit::Db),
    param(P::LooperSpeed, "Speed", -2000, 2000, 1000, Unit::Percent, Thousandths),
    depth(P::LooperSpeedModAmount, "SpeedModAmount"),
    level(P::LooperStart, "Start Position", 0, Unit::Percent),
    depth(P::LooperStartModAmount, "StartModAmount"),
    level(P::LooperLength, "Loop Length", 1000, Unit::Percent),
    depth(P::LooperLengthModAmount, "LengthModAmount"),
    choice(P::LooperRecording, "Recording", 0, ON_OFF),
    choice(P::LooperResampling, "Resampling", 0, ON_OFF),
    // Resonator
    level(P::ResonatorVol, "Resonator Vol", 500, Unit::Db),
    param(P::ResonatorTune, "Resonator Tune", -1200, 1200, 0, Unit::Cents, Raw),
    level(P::ResonatorFeedback, "Resonator Feedback", 0, Unit::None),
    level(P::ResonatorDissonance, "Resonator Dissonance", 0, Unit::None),
    // Echo
    level(P::EchoVol, "Echo Vol", 250, Unit::Db),
    level(P::EchoDensity, "Echo Density", 500, Unit::Percent),
    level(P::EchoRepeats, "Echo Repeats", 500, Unit::Percent),
    level(P::EchoFilter, "Echo Filter", 550, Unit::Db),
    // Ambience
    level(P::AmbienceVol, "Ambience Vol", 175, Unit::Db),
    level(P::AmbienceDecay, "Ambience Decay", 500, Unit::Percent),
    level(P::AmbienceSpacetime, "Ambience Spacetime", 500, Unit::Percent),
    choice(P::AmbienceAutoPan, "Ambience Auto Pan", 0, ON_OFF),
    // Modulation
    param(P::ModType, "Mod Type", 0, 800, 0, Unit::Percent, Thousandths),
    level(P::ModSpeed, "Mod Speed", 500, Unit::Percent),
    level(P::ModLevel, "Mod Level", 250, Unit::Percent),
];

/// A named group of parameters shown together.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    pub name: &'static str,
    pub params: &'static [ParamId],
}

pub static PAGES: [Page; 8] = [
    Page {
        name: "Oscillators",
        params: &[
            P::OscSemi,
            P::OscFine,
            P::OscV8c,
            P::OscDetune,
            P::OscPitchModAmount,
            P::OscUnison,
            P::OscDetuneModAmount,
            P::SuperSawVol,
            P::SineVol,
            P::SuperSawWavetable,
        ],
    },
    Page {
        name: "Filters",
        params: &[
            P::FilterMode,
            P::FilterCutoff,
            P::FilterCutoffModAmount,
            P::FilterResonance,
            P::FilterResonanceModAmount,
            P::FilterPosition,
            P::FilterVol,
        ],
    },
    Page {
        name: "Looper",
        params: &[
            P::LooperVol,
            P::LooperSos,
            P::LooperFilter,
            P::LooperSpeed,
            P::LooperSpeedModAmount,
            P::LooperStart,
            P::LooperStartModAmount,
            P::LooperLength,
            P::LooperLengthModAmount,
            P::LooperRecording,
            P::LooperResampling,
        ],
    },
    Page {
        name: "Resonator",
        params: &[
            P::ResonatorVol,
            P::ResonatorTune,
            P::ResonatorFeedback,
            P::ResonatorDissonance,
        ],
    },
    Page {
        name: "Echo",
        params: &[P::EchoVol, P::EchoDensity, P::EchoRepeats, P::EchoFilter],
    },
    Page {
        name: "Ambience",
        params: &[
            P::AmbienceVol,
            P::AmbienceDecay,
            P::AmbienceSpacetime,
            P::AmbienceAutoPan,
        ],
    },
    Page {
        name: "Modulation",
        params: &[P::ModType, P::ModSpeed, P::ModLevel],
    },
    Page {
        name: "Routing",
        params: &[
            P::LeftOutput,
            P::LeftOutputMode,
            P::RightOutput,
            P::RightOutputMode,
            P::LeftInput,
            P::RightInput,
            P::ClockInput,
            P::InputLevel,
            P::OutputLevel,
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_in_id_order() {
        for (i, p) in PARAMETERS.iter().enumerate() {
            assert_eq!(p.id.index(), i, "{} out of place", p.name);
            assert!(p.min <= p.default && p.default <= p.max, "{} default out of range", p.name);
        }
        assert_eq!(PARAM_COUNT, 52);
        assert_eq!(ParamId::from_index(PARAM_COUNT), None);
        assert_eq!(ParamId::from_index(20), Some(ParamId::FilterMode));
    }

    #[test]
    fn every_parameter_is_on_exactly_one_page() {
        let mut seen = [0usize; PARAM_COUNT];
        for page in PAGES.iter() {
            for id in page.params {
                seen[id.index()] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn enum_ranges_follow_their_strings() {
        assert_eq!(ParamId::FilterMode.info().max, 3);
        assert_eq!(ParamId::LooperRecording.info().max, 1);
        assert_eq!(ParamId::LeftOutputMode.info().unit, Unit::OutputMode);
        assert_eq!(ParamId::FilterPosition.info().enum_strings, Some(FILTER_POSITIONS));
    }
}
