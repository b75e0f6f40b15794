//! KeyGenerator port - notification key 生成の抽象化
//!
//! Callers that do not supply a key get one generated here. The generated key
//! is returned from `upsert_notification` so the caller can send follow-up
//! updates.
//!
//! # 実装
//! - **UlidKeyGenerator**: ULID ベース（時刻でソート可能）

use std::sync::Arc;

use ulid::Ulid;

use crate::domain::NotificationKey;
use crate::ports::Clock;

pub trait KeyGenerator: Send + Sync {
    fn generate_key(&self) -> NotificationKey;
}

/// UlidKeyGenerator は ULID ベースの key 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// テスト時に FixedClock を使うと timestamp 部分が決定的になります。
pub struct UlidKeyGenerator {
    clock: Arc<dyn Clock>,
}

impl UlidKeyGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl KeyGenerator for UlidKeyGenerator {
    fn generate_key(&self) -> NotificationKey {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        NotificationKey::generated(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn generates_unique_keys() {
        let keys = UlidKeyGenerator::new(Arc::new(SystemClock));

        let k1 = keys.generate_key();
        let k2 = keys.generate_key();
        let k3 = keys.generate_key();

        assert_ne!(k1, k2);
        assert_ne!(k2, k3);
        assert_ne!(k1, k3);
        assert!(k1.starts_with("notification-"));
    }

    #[test]
    fn fixed_clock_pins_the_timestamp_part() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let keys = UlidKeyGenerator::new(Arc::new(FixedClock::new(fixed_time)));

        let k1 = keys.generate_key();
        let k2 = keys.generate_key();
        // ランダム部分があるので key は異なる
        assert_ne!(k1, k2);

        let timestamp = |key: &NotificationKey| {
            let raw = key.as_str().trim_start_matches("notification-");
            Ulid::from_string(raw).unwrap().timestamp_ms()
        };
        assert_eq!(timestamp(&k1), fixed_time.timestamp_millis() as u64);
        assert_eq!(timestamp(&k1), timestamp(&k2));
    }
}
