//! Run both parties of the protocol in a single process.

use super::{IntersectionSum, PartyOne, PartyTwo};
use crate::{Error, Result};
use rand::{CryptoRng, RngCore};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Drives a [`PartyOne`] and a [`PartyTwo`] through the key hand-off, the three
/// rounds, and the decryption of the sum by party two on behalf of party one.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    timeout: Option<Duration>,
}

impl Orchestrator {
    /// Create an orchestrator without deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the run with [`Error::Timeout`] when it takes longer than
    /// `timeout`. The deadline is checked after every round.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the deadline, if any.
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn check_deadline(&self, start: Instant, round: &str) -> Result<()> {
        match self.timeout {
            Some(timeout) if start.elapsed() > timeout => {
                debug!(round, "Protocol run exceeded its deadline");
                Err(Error::Timeout(timeout))
            }
            _ => Ok(()),
        }
    }

    /// Run the protocol between `p1` and `p2`.
    pub fn run<R: RngCore + CryptoRng>(
        &self,
        p1: &mut PartyOne,
        p2: &mut PartyTwo,
        rng: &mut R,
    ) -> Result<IntersectionSum> {
        let start = Instant::now();

        p1.receive_public_key(p2.public_key())?;

        let r1 = p2.round1(rng)?;
        self.check_deadline(start, "round 1")?;

        let r2 = p1.round2(r1, rng)?;
        self.check_deadline(start, "round 2")?;

        let r3 = p2.round3(r2, rng)?;
        self.check_deadline(start, "round 3")?;

        let output = p1.finalize(r3, p2)?;
        self.check_deadline(start, "finalization")?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Protocol run completed"
        );
        Ok(output)
    }
}

/// Run the protocol between `p1` and `p2` without deadline.
pub fn run_protocol<R: RngCore + CryptoRng>(
    p1: &mut PartyOne,
    p2: &mut PartyTwo,
    rng: &mut R,
) -> Result<IntersectionSum> {
    Orchestrator::new().run(p1, p2, rng)
}
