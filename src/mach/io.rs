use super::Calibration;
use crate::lang::Special;

/// Hardware collaborators reached while operators are evaluated.
///
/// Channels are zero-based. Every method has a no-op default so an
/// implementation only overrides what its hardware provides.
pub trait Io {
    /// Milliseconds since start, wrapping.
    fn ticks(&self) -> u32 {
        0
    }
    /// `value` already includes the channel offset and is within `0..=CV_MAX`.
    fn cv(&mut self, _channel: usize, _value: i16, _slew: bool) {}
    fn cv_slew(&mut self, _channel: usize, _ms: i16) {}
    fn cv_off(&mut self, _channel: usize, _offset: i16) {}
    fn tr(&mut self, _channel: usize, _high: bool) {}
    /// Starts a pulse that ends with `Scene::tr_pulse_end` after `ms`.
    fn tr_pulse(&mut self, _channel: usize, _ms: i16) {}
    fn tr_pulse_clear(&mut self, _channel: usize) {}
    fn tr_pulse_time(&mut self, _channel: usize, _ms: i16) {}
    fn ii_tx(&mut self, _addr: u8, _data: &[u8]) {}
    fn ii_rx(&mut self, _addr: u8, _data: &mut [u8]) {}
    /// Raw reading in `0..=CV_MAX`.
    fn adc(&mut self, _input: Special) -> u16 {
        0
    }
    fn input_state(&self, _input: usize) -> bool {
        false
    }
    fn metro_updated(&mut self, _ms: i16, _active: bool) {}
    fn metro_reset(&mut self) {}
    fn mutes_updated(&mut self) {}
    fn vars_updated(&mut self) {}
    fn kill(&mut self) {}
    /// Requests a scene change; the firmware performs the load.
    fn load_scene(&mut self, _slot: usize) {}
    fn save_calibration(&mut self, _calibration: &Calibration) {}
    fn device_flip(&mut self) {}
    fn grid_updated(&mut self) {}
}

/// Discards every request.
#[derive(Debug, Default)]
pub struct NullIo;

impl Io for NullIo {}

/// A request made through `Io`, as kept by `Recorder`.
#[derive(Debug, PartialEq, Clone)]
pub enum Event {
    Cv(usize, i16, bool),
    CvSlew(usize, i16),
    CvOff(usize, i16),
    Tr(usize, bool),
    TrPulse(usize, i16),
    TrPulseClear(usize),
    TrPulseTime(usize, i16),
    IiTx(u8, Vec<u8>),
    IiRx(u8),
    Metro(i16, bool),
    MetroReset,
    MutesUpdated,
    VarsUpdated,
    Kill,
    LoadScene(usize),
    SaveCalibration(Calibration),
    DeviceFlip,
    GridUpdated,
}

/// Records requests and serves readings from its public fields.
#[derive(Debug, Default)]
pub struct Recorder {
    pub now: u32,
    pub adc_in: u16,
    pub adc_param: u16,
    pub inputs: [bool; super::TRIGGER_COUNT],
    pub ii_reply: [u8; 2],
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// The last value sent to a CV channel.
    pub fn last_cv(&self, channel: usize) -> Option<i16> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Cv(ch, value, _) if *ch == channel => Some(*value),
            _ => None,
        })
    }
}

impl Io for Recorder {
    fn ticks(&self) -> u32 {
        self.now
    }
    fn cv(&mut self, channel: usize, value: i16, slew: bool) {
        self.events.push(Event::Cv(channel, value, slew));
    }
    fn cv_slew(&mut self, channel: usize, ms: i16) {
        self.events.push(Event::CvSlew(channel, ms));
    }
    fn cv_off(&mut self, channel: usize, offset: i16) {
        self.events.push(Event::CvOff(channel, offset));
    }
    fn tr(&mut self, channel: usize, high: bool) {
        self.events.push(Event::Tr(channel, high));
    }
    fn tr_pulse(&mut self, channel: usize, ms: i16) {
        self.events.push(Event::TrPulse(channel, ms));
    }
    fn tr_pulse_clear(&mut self, channel: usize) {
        self.events.push(Event::TrPulseClear(channel));
    }
    fn tr_pulse_time(&mut self, channel: usize, ms: i16) {
        self.events.push(Event::TrPulseTime(channel, ms));
    }
    fn ii_tx(&mut self, addr: u8, data: &[u8]) {
        self.events.push(Event::IiTx(addr, data.to_vec()));
    }
    fn ii_rx(&mut self, addr: u8, data: &mut [u8]) {
        self.events.push(Event::IiRx(addr));
        for (d, r) in data.iter_mut().zip(self.ii_reply.iter()) {
            *d = *r;
        }
    }
    fn adc(&mut self, input: Special) -> u16 {
        match input {
            Special::In => self.adc_in,
            Special::Param => self.adc_param,
        }
    }
    fn input_state(&self, input: usize) -> bool {
        self.inputs.get(input).copied().unwrap_or(false)
    }
    fn metro_updated(&mut self, ms: i16, active: bool) {
        self.events.push(Event::Metro(ms, active));
    }
    fn metro_reset(&mut self) {
        self.events.push(Event::MetroReset);
    }
    fn mutes_updated(&mut self) {
        self.events.push(Event::MutesUpdated);
    }
    fn vars_updated(&mut self) {
        self.events.push(Event::VarsUpdated);
    }
    fn kill(&mut self) {
        self.events.push(Event::Kill);
    }
    fn load_scene(&mut self, slot: usize) {
        self.events.push(Event::LoadScene(slot));
    }
    fn save_calibration(&mut self, calibration: &Calibration) {
        self.events.push(Event::SaveCalibration(calibration.clone()));
    }
    fn device_flip(&mut self) {
        self.events.push(Event::DeviceFlip);
    }
    fn grid_updated(&mut self) {
        self.events.push(Event::GridUpdated);
    }
}
