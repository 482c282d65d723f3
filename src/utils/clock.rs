use chrono::{DateTime, Utc};

/// 时间来源
///
/// 所有与截止时间相关的判断都从这里读取当前时间。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时间
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        // 存储精度为秒
        DateTime::<Utc>::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_else(Utc::now)
    }
}

/// 两个时间点之间相差的小时数，不截断
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_between() {
        let due = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(hours_between(due, due), 0.0);
        assert_eq!(hours_between(due, due + chrono::Duration::minutes(90)), 1.5);
        assert!(hours_between(due, due + chrono::Duration::seconds(1)) > 0.0);
        assert!(hours_between(due, due - chrono::Duration::hours(2)) < 0.0);
    }

    #[test]
    fn test_system_clock_has_second_precision() {
        assert_eq!(SystemClock.now().timestamp_subsec_nanos(), 0);
    }
}
