//! Synthesized sound effects.
//!
//! Each effect is rendered into a sample buffer up front and handed to a
//! detached rodio sink, so playback never blocks the game thread.

use fundsp::prelude64::*;
use rodio::buffer::SamplesBuffer;
use rodio::mixer::Mixer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::state::Event;

const SAMPLE_RATE: u32 = 44_100;

const FLAP_SECS: f64 = 0.1;
const SCORE_SECS: f64 = 0.18;
const DEATH_SECS: f64 = 0.5;

/// Linear ramp from `from` to `to` over `secs`, holding `to` afterwards.
fn ramp(from: f64, to: f64, secs: f64) -> impl Fn(f64) -> f64 + Clone + Send + Sync {
    move |t: f64| from + (to - from) * (t / secs).min(1.0)
}

fn render(mut unit: impl AudioUnit, seconds: f64) -> SamplesBuffer {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f64 * seconds).round() as usize;
    let samples: Vec<f32> = (0..n).map(|_| unit.get_mono()).collect();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

/// Short upward chirp.
fn flap_chirp() -> SamplesBuffer {
    let freq = lfo(ramp(300.0, 700.0, 0.08));
    let gain = lfo(ramp(0.08, 0.0, FLAP_SECS));
    render((freq >> sine()) * gain, FLAP_SECS)
}

/// Two-note blip.
fn score_blip() -> SamplesBuffer {
    let freq = lfo(|t: f64| if t < 0.06 { 880.0f64 } else { 1320.0 });
    let gain = lfo(ramp(0.1, 0.0, SCORE_SECS));
    render((freq >> square()) * gain, SCORE_SECS)
}

/// Falling sawtooth, 400Hz down to 80Hz.
fn death_slide() -> SamplesBuffer {
    let freq = lfo(ramp(400.0, 80.0, 0.4));
    let gain = lfo(ramp(0.15, 0.0, DEATH_SECS));
    render((freq >> saw()) * gain, DEATH_SECS)
}

fn play(mixer: &Mixer, source: SamplesBuffer) {
    let sink = Sink::connect_new(mixer);
    sink.append(source);
    sink.detach();
}

/// Owns the output stream; dropping it silences everything.
pub struct Sfx {
    stream: OutputStream,
}

impl Sfx {
    pub fn open() -> Result<Self, rodio::StreamError> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);
        log::info!("audio output opened");
        Ok(Self { stream })
    }

    pub fn on_event(&self, event: &Event) {
        let mixer = self.stream.mixer();
        match event {
            Event::Flapped => play(mixer, flap_chirp()),
            Event::Scored { .. } => play(mixer, score_blip()),
            Event::Died { .. } => play(mixer, death_slide()),
            Event::Started { .. } => {}
        }
    }
}
