/// 数値ファセット（年齢・年収・社会人経験）のレコード側の値
///
/// 欠損時の扱いはファセットごとに異なるため、レコード側で `Absent`（除外）と
/// `Unquestioned`（不問として通過）を明示的に使い分ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeValue {
    /// 値がなく、境界が指定されたら除外する
    Absent,
    /// 値がなく、条件を問わない（常に通過）
    Unquestioned,
    /// 単一値（人材の希望年収・年齢など）
    Point(i64),
    /// 範囲（求人の年齢制限・想定年収など）。片側欠損はその側を不問とみなす
    Span { min: Option<i64>, max: Option<i64> },
}

impl RangeValue {
    /// 求人側の範囲。両端とも未設定なら `when_empty` を返す。
    pub fn span_or(min: Option<i64>, max: Option<i64>, when_empty: RangeValue) -> Self {
        match (min, max) {
            (None, None) => when_empty,
            (min, max) => RangeValue::Span { min, max },
        }
    }

    pub fn point_or_absent(value: Option<i64>) -> Self {
        value.map_or(RangeValue::Absent, RangeValue::Point)
    }
}

/// 下限条件の判定。範囲の場合は上端が下限以上なら重なりありとして通過。
pub fn satisfies_lower(lower: Option<i64>, value: RangeValue) -> bool {
    let Some(lower) = lower else {
        return true;
    };

    match value {
        RangeValue::Absent => false,
        RangeValue::Unquestioned => true,
        RangeValue::Point(v) => v >= lower,
        RangeValue::Span { min, max } => match (min, max) {
            (_, Some(max)) => max >= lower,
            // 上端なし: 下端がいくつでも下限条件とは重なる
            (_, None) => true,
        },
    }
}

/// 上限条件の判定。範囲の場合は下端が上限以下なら重なりありとして通過。
pub fn satisfies_upper(upper: Option<i64>, value: RangeValue) -> bool {
    let Some(upper) = upper else {
        return true;
    };

    match value {
        RangeValue::Absent => false,
        RangeValue::Unquestioned => true,
        RangeValue::Point(v) => v <= upper,
        RangeValue::Span { min, .. } => min.is_none_or(|min| min <= upper),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_bound_is_no_constraint() {
        assert!(satisfies_lower(None, RangeValue::Absent));
        assert!(satisfies_upper(None, RangeValue::Absent));
    }

    #[test]
    fn absent_value_is_excluded_but_unquestioned_passes() {
        assert!(!satisfies_lower(Some(300), RangeValue::Absent));
        assert!(!satisfies_upper(Some(300), RangeValue::Absent));
        assert!(satisfies_lower(Some(300), RangeValue::Unquestioned));
        assert!(satisfies_upper(Some(300), RangeValue::Unquestioned));
    }

    #[test]
    fn point_values_are_inclusive() {
        assert!(satisfies_lower(Some(400), RangeValue::Point(400)));
        assert!(!satisfies_lower(Some(401), RangeValue::Point(400)));
        assert!(satisfies_upper(Some(400), RangeValue::Point(400)));
        assert!(!satisfies_upper(Some(399), RangeValue::Point(400)));
    }

    #[test]
    fn spans_use_overlap() {
        let span = RangeValue::Span {
            min: Some(350),
            max: Some(500),
        };
        assert!(satisfies_lower(Some(450), span));
        assert!(!satisfies_lower(Some(501), span));
        assert!(satisfies_upper(Some(350), span));
        assert!(!satisfies_upper(Some(349), span));

        let open_top = RangeValue::Span {
            min: Some(35),
            max: None,
        };
        assert!(satisfies_lower(Some(60), open_top));
        assert!(!satisfies_upper(Some(30), open_top));
    }

    #[test]
    fn empty_span_falls_back() {
        assert_eq!(
            RangeValue::span_or(None, None, RangeValue::Unquestioned),
            RangeValue::Unquestioned
        );
        assert_eq!(
            RangeValue::span_or(Some(1), None, RangeValue::Absent),
            RangeValue::Span {
                min: Some(1),
                max: None
            }
        );
    }
}
