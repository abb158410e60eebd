/// 性別の「不問」。求人側でのみ使われる。
pub const GENDER_UNQUESTIONED: &str = "不問";

/// 性別ENUM: ["男性", "女性", "その他/無回答"]（求人側は "不問" も許容）
pub fn correct_gender(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let valid = ["男性", "女性", "その他/無回答", GENDER_UNQUESTIONED];
    if valid.contains(&trimmed) {
        return Some(trimmed.to_string());
    }

    if trimmed.contains("不問") || trimmed.contains("問わず") {
        return Some(GENDER_UNQUESTIONED.to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    if trimmed.contains('男') || lower == "m" || lower == "male" {
        return Some("男性".to_string());
    }
    if trimmed.contains('女') || lower == "f" || lower == "female" {
        return Some("女性".to_string());
    }

    Some("その他/無回答".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrects_gender_aliases() {
        assert_eq!(correct_gender("男"), Some("男性".into()));
        assert_eq!(correct_gender("Female"), Some("女性".into()));
        assert_eq!(correct_gender("性別不問"), Some("不問".into()));
        assert_eq!(correct_gender("回答しない"), Some("その他/無回答".into()));
        assert_eq!(correct_gender(" "), None);
    }
}
