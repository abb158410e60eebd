/// 勤務地の「全国」指定。どの都道府県・エリアの要求も満たす。
pub const NATIONWIDE: &str = "全国";

/// 現行のエリア区分
pub const AREAS: [&str; 8] = ["北海道", "東北", "関東", "中部", "関西", "中国", "四国", "九州"];

/// (正式名称, エリア)。都道府県コード順。
const PREFECTURES: [(&str, &str); 47] = [
    ("北海道", "北海道"),
    ("青森県", "東北"),
    ("岩手県", "東北"),
    ("宮城県", "東北"),
    ("秋田県", "東北"),
    ("山形県", "東北"),
    ("福島県", "東北"),
    ("茨城県", "関東"),
    ("栃木県", "関東"),
    ("群馬県", "関東"),
    ("埼玉県", "関東"),
    ("千葉県", "関東"),
    ("東京都", "関東"),
    ("神奈川県", "関東"),
    ("新潟県", "中部"),
    ("富山県", "中部"),
    ("石川県", "中部"),
    ("福井県", "中部"),
    ("山梨県", "中部"),
    ("長野県", "中部"),
    ("岐阜県", "中部"),
    ("静岡県", "中部"),
    ("愛知県", "中部"),
    ("三重県", "中部"),
    ("滋賀県", "関西"),
    ("京都府", "関西"),
    ("大阪府", "関西"),
    ("兵庫県", "関西"),
    ("奈良県", "関西"),
    ("和歌山県", "関西"),
    ("鳥取県", "中国"),
    ("島根県", "中国"),
    ("岡山県", "中国"),
    ("広島県", "中国"),
    ("山口県", "中国"),
    ("徳島県", "四国"),
    ("香川県", "四国"),
    ("愛媛県", "四国"),
    ("高知県", "四国"),
    ("福岡県", "九州"),
    ("佐賀県", "九州"),
    ("長崎県", "九州"),
    ("熊本県", "九州"),
    ("大分県", "九州"),
    ("宮崎県", "九州"),
    ("鹿児島県", "九州"),
    ("沖縄県", "九州"),
];

/// 先頭 2 文字。47 都道府県で重複しない。
fn stem(name: &str) -> &str {
    name.char_indices()
        .nth(2)
        .map_or(name, |(index, _)| &name[..index])
}

/// 都道府県補正: "東京" "神奈" "大阪市北区" のような短縮形・住所から正式名称に変換
pub fn correct_todofuken(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    PREFECTURES
        .iter()
        .find(|(name, _)| trimmed.starts_with(stem(name)))
        .map(|(name, _)| name.to_string())
}

/// 都道府県（正式名称）が属するエリア
pub fn area_of(prefecture: &str) -> Option<&'static str> {
    PREFECTURES
        .iter()
        .find(|(name, _)| *name == prefecture)
        .map(|(_, area)| *area)
}

/// エリア名の補正。旧区分の名称も現行エリアに寄せる。
pub fn correct_area(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if AREAS.contains(&trimmed) {
        return Some(trimmed.to_string());
    }

    let area = match trimmed {
        "北海道・東北" => "北海道",
        "甲信越" | "北陸" | "東海" | "甲信越・北陸" => "中部",
        "近畿" => "関西",
        "中国・四国" => "中国",
        "九州・沖縄" => "九州",
        "首都圏" => "関東",
        _ => return None,
    };
    Some(area.to_string())
}

/// 勤務地の値を比較用に正規化する
///
/// - "全国" / "全国可" は `NATIONWIDE` に寄せる
/// - エリア名はエリアとして残す（都道府県より先に判定）
/// - それ以外は都道府県の正式名称、補正できなければ trim のみ
pub fn normalize_work_location(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with(NATIONWIDE) {
        return Some(NATIONWIDE.to_string());
    }

    correct_area(trimmed)
        .or_else(|| correct_todofuken(trimmed))
        .or_else(|| Some(trimmed.to_string()))
}

/// 保有側の勤務地が要求された勤務地を満たすか
///
/// 同一値、保有側が全国、または要求がエリアで保有側の都道府県がそのエリアに属する場合に true。
pub fn location_satisfies(held: &str, required: &str) -> bool {
    if held == required || held == NATIONWIDE {
        return true;
    }

    AREAS.contains(&required) && area_of(held) == Some(required)
}
