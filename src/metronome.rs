//! Metronome timer management
//!
//! The metronome owns at most one interval timer. The tick itself (the audio
//! cue) belongs to the host; this module only guarantees that a tempo change
//! replaces the running interval rather than stacking a second one.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};
use crate::models::{DEFAULT_TEMPO_BPM, MAX_TEMPO_BPM, MIN_TEMPO_BPM};

/// Handle of a host interval timer
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TimerId(pub i32);

/// Host facility for periodic callbacks
pub trait TimerHost {
    fn start_interval(&mut self, period_ms: u32) -> Result<TimerId>;

    fn clear_interval(&mut self, id: TimerId);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metronome {
    tempo_bpm: u32,
    timer: Option<TimerId>,
}

impl Default for Metronome {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPO_BPM)
    }
}

/// Tick period for a tempo
pub fn period_ms(tempo_bpm: u32) -> u32 {
    60_000 / tempo_bpm.max(1)
}

impl Metronome {
    pub fn new(tempo_bpm: u32) -> Self {
        Self {
            tempo_bpm,
            timer: None,
        }
    }

    pub fn tempo_bpm(&self) -> u32 {
        self.tempo_bpm
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn start(&mut self, host: &mut impl TimerHost) -> Result<()> {
        if self.timer.is_some() {
            return Ok(());
        }
        let id = host.start_interval(period_ms(self.tempo_bpm))?;
        log::info!("metronome started at {} bpm", self.tempo_bpm);
        self.timer = Some(id);
        Ok(())
    }

    pub fn stop(&mut self, host: &mut impl TimerHost) {
        if let Some(id) = self.timer.take() {
            host.clear_interval(id);
            log::info!("metronome stopped");
        }
    }

    /// Change the tempo. A running metronome swaps its interval: the old one
    /// is cleared before the new one starts. If the new interval cannot be
    /// started the metronome is left stopped at its previous tempo.
    pub fn set_tempo(&mut self, tempo_bpm: u32, host: &mut impl TimerHost) -> Result<()> {
        if !(MIN_TEMPO_BPM..=MAX_TEMPO_BPM).contains(&tempo_bpm) {
            return Err(ScoreError::Settings(
                crate::error::SettingsError::TempoOutOfRange(tempo_bpm),
            ));
        }
        if tempo_bpm == self.tempo_bpm {
            return Ok(());
        }
        let Some(old) = self.timer.take() else {
            self.tempo_bpm = tempo_bpm;
            return Ok(());
        };
        host.clear_interval(old);
        match host.start_interval(period_ms(tempo_bpm)) {
            Ok(id) => {
                self.tempo_bpm = tempo_bpm;
                self.timer = Some(id);
                log::debug!("metronome interval replaced ({} ms)", period_ms(tempo_bpm));
                Ok(())
            }
            Err(e) => {
                log::warn!("metronome stopped: {}", e);
                Err(ScoreError::MetronomeStopped(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeTimers {
        next: i32,
        live: HashMap<TimerId, u32>,
        refuse: bool,
    }

    impl TimerHost for FakeTimers {
        fn start_interval(&mut self, period_ms: u32) -> Result<TimerId> {
            if self.refuse {
                return Err(ScoreError::Timer("interval refused".to_string()));
            }
            let id = TimerId(self.next);
            self.next += 1;
            self.live.insert(id, period_ms);
            Ok(id)
        }

        fn clear_interval(&mut self, id: TimerId) {
            self.live.remove(&id);
        }
    }

    #[test]
    fn test_period() {
        assert_eq!(period_ms(120), 500);
        assert_eq!(period_ms(60), 1000);
    }

    #[test]
    fn test_start_twice_keeps_one_timer() {
        let mut timers = FakeTimers::default();
        let mut metronome = Metronome::default();
        metronome.start(&mut timers).unwrap();
        metronome.start(&mut timers).unwrap();
        assert_eq!(timers.live.len(), 1);
        metronome.stop(&mut timers);
        assert!(timers.live.is_empty());
        assert!(!metronome.is_running());
    }

    #[test]
    fn test_tempo_change_replaces_running_timer() {
        let mut timers = FakeTimers::default();
        let mut metronome = Metronome::new(120);
        metronome.start(&mut timers).unwrap();
        metronome.set_tempo(150, &mut timers).unwrap();

        assert_eq!(timers.live.len(), 1);
        assert_eq!(timers.live.values().copied().collect::<Vec<_>>(), vec![400]);
    }

    #[test]
    fn test_tempo_change_while_stopped_starts_nothing() {
        let mut timers = FakeTimers::default();
        let mut metronome = Metronome::new(120);
        metronome.set_tempo(90, &mut timers).unwrap();
        assert!(timers.live.is_empty());
        assert_eq!(metronome.tempo_bpm(), 90);
    }

    #[test]
    fn test_invalid_tempo_rejected() {
        let mut timers = FakeTimers::default();
        let mut metronome = Metronome::new(120);
        assert!(metronome.set_tempo(0, &mut timers).is_err());
        assert_eq!(metronome.tempo_bpm(), 120);
    }

    #[test]
    fn test_failed_restart_leaves_metronome_stopped() {
        let mut timers = FakeTimers::default();
        let mut metronome = Metronome::new(120);
        metronome.start(&mut timers).unwrap();

        timers.refuse = true;
        assert!(matches!(
            metronome.set_tempo(60, &mut timers),
            Err(ScoreError::MetronomeStopped(_))
        ));
        assert!(!metronome.is_running());
        assert_eq!(metronome.tempo_bpm(), 120);
        assert!(timers.live.is_empty());
    }
}
