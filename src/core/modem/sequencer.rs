use crate::core::communication::{Pause, Transport};
use crate::core::modem::commands::AtCommand;
use crate::domain::config::PacingConfig;
use crate::domain::error::ModemResult;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Writes AT command scripts with a settle delay between consecutive commands
#[derive(Debug)]
pub struct AtSequencer<P: Pause> {
    pause: P,
    pacing: PacingConfig,
}

impl<P: Pause> AtSequencer<P> {
    pub fn new(pause: P, pacing: PacingConfig) -> Self {
        Self { pause, pacing }
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    pub fn set_pacing(&mut self, pacing: PacingConfig) {
        self.pacing = pacing;
    }

    /// Write every command in order, stopping at the first failed write.
    ///
    /// No delay follows the last command.
    pub fn run<T: Transport + ?Sized>(
        &mut self,
        link: &mut T,
        script: &[AtCommand],
    ) -> ModemResult<()> {
        let settle = self.pacing.settle();
        for (index, command) in script.iter().enumerate() {
            if index > 0 {
                self.pause.pause(settle);
            }
            debug!("-> {}", command);
            link.write_all(&command.to_bytes())?;
        }
        Ok(())
    }

    /// Block for a random interval before a message sequence
    pub fn pace<R: Rng>(&mut self, rng: &mut R) -> Duration {
        let interval = jitter(&self.pacing, rng);
        debug!("Waiting {:.2}s before sending", interval.as_secs_f64());
        self.pause.pause(interval);
        interval
    }
}

/// Uniform draw from `[jitter_min_ms, jitter_max_ms]` at 10 ms resolution
pub fn jitter<R: Rng>(pacing: &PacingConfig, rng: &mut R) -> Duration {
    let low = pacing.jitter_min_ms / 10;
    let high = (pacing.jitter_max_ms / 10).max(low);
    Duration::from_millis(rng.gen_range(low..=high) * 10)
}
