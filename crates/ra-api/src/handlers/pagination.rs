use crate::error::ApiError;

pub const MAX_PAGE: usize = 10_000;

/// `?page=` の解釈。未指定・数値でない・0 以下は 1 ページ目。
/// 数字だけで整数に収まらない値は範囲外として扱う。
pub fn validate_page(raw: Option<&str>) -> Result<usize, ApiError> {
    let Some(value) = raw.map(str::trim) else {
        return Ok(1);
    };

    let page = match value.parse::<i64>() {
        Ok(page) if page >= 1 => usize::try_from(page).unwrap_or(usize::MAX),
        Ok(_) => 1,
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => usize::MAX,
        Err(_) => 1,
    };

    if page > MAX_PAGE {
        return Err(ApiError::PageOutOfRange(page));
    }

    Ok(page)
}
