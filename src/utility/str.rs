use crate::ruby_txt::error::ErrorKind;

// 青空文庫に向けた文字種別
// 仝々〆〇ヶ は漢字扱い (https://www.aozora.gr.jp/annotation/etc.html#ruby)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Hiragana,
    Katakana,
    Kanji,
    Other,
}

impl CharType {
    pub fn from(c: char) -> Self {
        let u = c as u32;

        if matches!(c, '仝' | '々' | '〆' | '〇' | 'ヶ') {
            Self::Kanji
        } else if (0x3041..=0x309f).contains(&u) {
            Self::Hiragana
        } else if (0x30a1..=0x30f4).contains(&u) {
            // ァ から ヴ まで。長音符や中黒は区切りになる
            Self::Katakana
        } else if (0x3400..=0x4dbf).contains(&u)
            || (0x4e00..=0x9fff).contains(&u)
            || (0xf900..=0xfaff).contains(&u)
        {
            Self::Kanji
        } else {
            Self::Other
        }
    }
}

/// Parses a count written with ASCII digits, full-width digits, kanji digits
/// (一 to 九) or any mix of them, e.g. `"１2"` or `"四"`.
pub fn parse_number(s: &str) -> Result<usize, ErrorKind> {
    if s.is_empty() {
        return Err(ErrorKind::Format(format!("Not a number: {:?}", s)));
    }

    let mut ret: usize = 0;
    for c in s.chars() {
        let d = match c {
            '0'..='9' => c as usize - '0' as usize,
            '０'..='９' => c as usize - '０' as usize,
            '一' => 1,
            '二' => 2,
            '三' => 3,
            '四' => 4,
            '五' => 5,
            '六' => 6,
            '七' => 7,
            '八' => 8,
            '九' => 9,
            _ => return Err(ErrorKind::Format(format!("Not a number: {:?}", s))),
        };

        ret = ret
            .checked_mul(10)
            .and_then(|r| r.checked_add(d))
            .ok_or_else(|| ErrorKind::Format(format!("Number too large: {:?}", s)))?;
    }
    Ok(ret)
}
