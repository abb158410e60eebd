/// 日本国籍かどうかの簡易判定
///
/// - "日本" を含む（例: "日本国籍", "日本人"）
/// - 英語表記の "japan", "japanese" を含む（大文字小文字無視）
/// - 前後の空白・全角空白は無視
pub fn is_japanese_nationality(value: &str) -> bool {
    let normalized = value
        .trim()
        .to_lowercase()
        .replace([' ', '\t', '\n', '\r', '\u{3000}'], "");

    !normalized.is_empty() && (normalized.contains("日本") || normalized.contains("japan"))
}

/// 国籍を比較用に正規化する。日本国籍の表記揺れは "日本" に寄せ、"不問" はそのまま残す。
pub fn normalize_nationality(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_japanese_nationality(trimmed) {
        return Some("日本".to_string());
    }

    Some(trimmed.to_string())
}
