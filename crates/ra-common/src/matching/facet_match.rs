use std::collections::BTreeMap;

/// OR 判定: レコード値のいずれかが要求値のいずれかと一致する、またはワイルドカード値なら true
///
/// 要求値が空なら制約なしとして true。レコード値が空なら false。
pub fn match_any<S: AsRef<str>>(requested: &[String], record_values: &[S], wildcards: &[&str]) -> bool {
    if requested.is_empty() {
        return true;
    }

    record_values.iter().any(|value| {
        let value = value.as_ref();
        wildcards.contains(&value) || requested.iter().any(|req| req == value)
    })
}

/// AND 判定: 要求値すべてが、保有値のいずれかによって満たされる場合のみ true
///
/// 要求値ごとに found フラグを持つ追跡マップを作り、全て true になったときだけ受け入れる。
/// `satisfies(held, required)` で保有値と要求値の対応（同値・資格の上位互換など）を判定する。
pub fn match_all<S, F>(requested: &[String], possessed: &[S], satisfies: F) -> bool
where
    S: AsRef<str>,
    F: Fn(&str, &str) -> bool,
{
    if requested.is_empty() {
        return true;
    }
    if possessed.is_empty() {
        return false;
    }

    let mut found: BTreeMap<&str, bool> = requested.iter().map(|r| (r.as_str(), false)).collect();

    for required in requested {
        if possessed
            .iter()
            .any(|held| satisfies(held.as_ref(), required))
        {
            found.insert(required.as_str(), true);
        }
    }

    found.values().all(|hit| *hit)
}
