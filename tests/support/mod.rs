//! Host-side stand-ins for the timer and the shift register chain.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use myrtio_shift_pwm::{CompareTimer, Prescaler, ShiftOutput};

#[derive(Debug, Default)]
pub struct TimerLog {
    pub prescaler: Option<Prescaler>,
    pub compare: Vec<u16>,
    pub enabled: bool,
}

/// Timer that records everything the driver programs
#[derive(Debug, Clone, Default)]
pub struct MockTimer(pub Arc<Mutex<TimerLog>>);

impl MockTimer {
    pub fn last_compare(&self) -> Option<u16> {
        self.0.lock().unwrap().compare.last().copied()
    }

    pub fn compare_count(&self) -> usize {
        self.0.lock().unwrap().compare.len()
    }

    pub fn enabled(&self) -> bool {
        self.0.lock().unwrap().enabled
    }

    pub fn prescaler(&self) -> Option<Prescaler> {
        self.0.lock().unwrap().prescaler
    }
}

impl CompareTimer for MockTimer {
    fn configure(&mut self, prescaler: Prescaler) {
        self.0.lock().unwrap().prescaler = Some(prescaler);
    }

    fn set_compare(&mut self, ticks: u16) {
        self.0.lock().unwrap().compare.push(ticks);
    }

    fn enable_interrupt(&mut self) {
        self.0.lock().unwrap().enabled = true;
    }

    fn disable_interrupt(&mut self) {
        self.0.lock().unwrap().enabled = false;
    }

    fn is_interrupt_enabled(&self) -> bool {
        self.enabled()
    }
}

#[derive(Debug, Default)]
pub struct OutputLog {
    pub resets: usize,
    pub frames: Vec<(Vec<u8>, usize)>,
}

/// Shift output that records every latched frame
#[derive(Debug, Clone, Default)]
pub struct MockOutput(pub Arc<Mutex<OutputLog>>);

impl MockOutput {
    pub fn resets(&self) -> usize {
        self.0.lock().unwrap().resets
    }

    pub fn frame_count(&self) -> usize {
        self.0.lock().unwrap().frames.len()
    }

    /// Last latched mask as position bits
    pub fn last_mask(&self) -> Option<u32> {
        let log = self.0.lock().unwrap();
        let (data, _) = log.frames.last()?;
        Some(u32::from_le_bytes(data.as_slice().try_into().unwrap()))
    }

    pub fn last_bits(&self) -> Option<usize> {
        self.0.lock().unwrap().frames.last().map(|(_, bits)| *bits)
    }
}

impl ShiftOutput for MockOutput {
    fn reset(&mut self) {
        self.0.lock().unwrap().resets += 1;
    }

    fn shift_out(&mut self, data: &[u8], bits: usize) {
        self.0.lock().unwrap().frames.push((data.to_vec(), bits));
    }
}
