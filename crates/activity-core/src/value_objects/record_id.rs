//! Record identifiers - time-ordered 64-bit ids
//!
//! Layout:
//! - Bits 63-22: milliseconds since [`RecordId::EPOCH`]
//! - Bits 21-12: worker id (0-1023)
//! - Bits 11-0:  per-millisecond sequence (0-4095)

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier shared by users, reports, comments and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordId(i64);

impl RecordId {
    /// 2024-01-01 00:00:00 UTC in milliseconds
    pub const EPOCH: i64 = 1_704_067_200_000;

    const WORKER_BITS: i64 = 10;
    const SEQUENCE_BITS: i64 = 12;
    const SEQUENCE_MASK: i64 = (1 << Self::SEQUENCE_BITS) - 1;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was minted
    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        (self.0 >> (Self::WORKER_BITS + Self::SEQUENCE_BITS)) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> Self::SEQUENCE_BITS) & ((1 << Self::WORKER_BITS) - 1)) as u16
    }

    pub fn minted_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis()).single()
    }

    pub fn parse(s: &str) -> Result<Self, RecordIdError> {
        s.trim()
            .parse::<i64>()
            .map(RecordId)
            .map_err(|_| RecordIdError::InvalidFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordIdError {
    #[error("invalid record id: {0}")]
    InvalidFormat(String),

    #[error("worker id {0} out of range (0-1023)")]
    WorkerOutOfRange(u16),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl std::str::FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

// Strings in JSON so browsers don't lose precision above 2^53
impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct RecordIdVisitor;

        impl Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a record id as string or integer")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<RecordId, E> {
                Ok(RecordId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<RecordId, E> {
                i64::try_from(value)
                    .map(RecordId)
                    .map_err(|_| E::custom("record id out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RecordId, E> {
                RecordId::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}

struct Clock {
    last_millis: i64,
    sequence: i64,
}

/// Mints unique, monotonically increasing [`RecordId`]s for one worker.
pub struct IdGenerator {
    worker_id: u16,
    clock: Mutex<Clock>,
}

impl IdGenerator {
    pub fn new(worker_id: u16) -> Result<Self, RecordIdError> {
        if worker_id >= 1 << RecordId::WORKER_BITS {
            return Err(RecordIdError::WorkerOutOfRange(worker_id));
        }
        Ok(Self {
            worker_id,
            clock: Mutex::new(Clock {
                last_millis: 0,
                sequence: 0,
            }),
        })
    }

    pub fn next_id(&self) -> RecordId {
        let now = Utc::now().timestamp_millis();
        let mut clock = self.clock.lock();

        // A clock that steps backwards keeps minting from the last seen millisecond.
        let millis = now.max(clock.last_millis);
        if millis == clock.last_millis {
            clock.sequence = (clock.sequence + 1) & RecordId::SEQUENCE_MASK;
            if clock.sequence == 0 {
                clock.last_millis += 1;
            }
        } else {
            clock.last_millis = millis;
            clock.sequence = 0;
        }

        let id = ((clock.last_millis - RecordId::EPOCH)
            << (RecordId::WORKER_BITS + RecordId::SEQUENCE_BITS))
            | (i64::from(self.worker_id) << RecordId::SEQUENCE_BITS)
            | clock.sequence;
        RecordId::new(id)
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("worker_id", &self.worker_id)
            .finish()
    }
}
