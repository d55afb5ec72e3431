//! Request pacing for the listing and product endpoints.
//!
//! The API has no documented rate limit but starts refusing clients that
//! hammer it, so every listing and detail request is followed by a pause.
//! The policy is injected into [`crate::SimpleWineClient`] so tests can run
//! with [`Pacing::None`].

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// No pause at all.
    #[default]
    None,
    /// The same pause after every request.
    Fixed(Duration),
    /// `base` plus a uniformly random extra in `0..=jitter`.
    Jittered { base: Duration, jitter: Duration },
}

impl Pacing {
    /// Builds a policy from millisecond settings; zero disables the
    /// corresponding part.
    #[must_use]
    pub fn from_millis(delay_ms: u64, jitter_ms: u64) -> Self {
        match (delay_ms, jitter_ms) {
            (0, 0) => Self::None,
            (delay, 0) => Self::Fixed(Duration::from_millis(delay)),
            (delay, jitter) => Self::Jittered {
                base: Duration::from_millis(delay),
                jitter: Duration::from_millis(jitter),
            },
        }
    }

    /// Length of the next pause.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Jittered { base, jitter } => {
                let max_ms = u64::try_from(jitter.as_millis()).unwrap_or(u64::MAX);
                let extra_ms = rand::rng().random_range(0..=max_ms);
                base.saturating_add(Duration::from_millis(extra_ms))
            }
        }
    }

    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
