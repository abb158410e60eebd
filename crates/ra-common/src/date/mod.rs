pub mod age;

use chrono::{FixedOffset, NaiveDate, Utc};

pub use age::{age_from_birth_date, age_on, parse_birth_date};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// 日本時間での今日の日付。年齢計算の基準日。
pub fn today_jst() -> NaiveDate {
    let now = Utc::now();
    match FixedOffset::east_opt(JST_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}
