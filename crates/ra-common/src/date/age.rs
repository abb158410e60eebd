use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref DATE_RE: Regex =
        Regex::new(r"^(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})\s*日?").unwrap();
    static ref COMPACT_DATE_RE: Regex = Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap();
}

/// 生年月日の文字列を日付に変換する
///
/// - "1994-06-16" / "1994/6/16" / "1994.06.16" / "1994年6月16日" / "19940616"
/// - 全角数字は NFKC で半角に寄せる
/// - 時刻部分（"1994-06-16T00:00:00" など）は無視
/// - 解釈できない・存在しない日付は None
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let normalized: String = raw.nfkc().collect();
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }

    let caps = DATE_RE
        .captures(trimmed)
        .or_else(|| COMPACT_DATE_RE.captures(trimmed))?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// 満年齢。今年の誕生日をまだ迎えていなければ 1 を引く。
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year() - birth.year());
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// 生年月日文字列から満年齢を求める。空・解釈不能なら None。
pub fn age_from_birth_date(raw: Option<&str>, today: NaiveDate) -> Option<i64> {
    raw.and_then(parse_birth_date)
        .map(|birth| age_on(birth, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birthday_not_yet_reached_subtracts_one() {
        let today = date(2024, 6, 15);
        assert_eq!(age_on(date(1994, 6, 16), today), 29);
        assert_eq!(age_on(date(1994, 6, 15), today), 30);
        assert_eq!(age_on(date(1994, 1, 1), today), 30);
        assert_eq!(age_on(date(1994, 12, 31), today), 29);
    }

    #[test]
    fn leap_day_birthday_counts_after_feb_28() {
        assert_eq!(age_on(date(2000, 2, 29), date(2024, 2, 28)), 23);
        assert_eq!(age_on(date(2000, 2, 29), date(2024, 2, 29)), 24);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn parses_common_formats() {
        let expected = Some(date(1994, 6, 16));
        assert_eq!(parse_birth_date("1994-06-16"), expected);
        assert_eq!(parse_birth_date("1994/6/16"), expected);
        assert_eq!(parse_birth_date("1994年6月16日"), expected);
        assert_eq!(parse_birth_date("１９９４年６月１６日"), expected);
        assert_eq!(parse_birth_date("19940616"), expected);
        assert_eq!(parse_birth_date("1994-06-16T09:00:00+09:00"), expected);
    }

    #[test]
    fn rejects_empty_or_invalid_dates() {
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("不明"), None);
        assert_eq!(parse_birth_date("1994-02-30"), None);
        assert_eq!(age_from_birth_date(None, date(2024, 6, 15)), None);
        assert_eq!(age_from_birth_date(Some("abc"), date(2024, 6, 15)), None);
    }
}
