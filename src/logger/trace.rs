use chrono::{DateTime, SecondsFormat, Utc};

/// Length in bytes of every correlation identifier.
pub const ID_BYTES: usize = 16;

/// A fresh correlation identifier: 16 random bytes as lowercase hex.
pub fn random_id() -> String {
    hex::encode(rand::random::<[u8; ID_BYTES]>())
}

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `2024-01-18T10:00:00.000Z`
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
