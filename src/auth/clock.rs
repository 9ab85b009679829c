//! Wall clock abstraction used for token issuance and expiry checks

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Token issuance and verification read the time only through this trait,
/// so expiry behaviour can be exercised without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
