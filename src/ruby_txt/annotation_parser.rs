use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    ruby_txt::{
        error::ErrorKind,
        gaiji::{parse_jis, parse_unicode},
        tree::BlockKind,
        utility::MidashiLevel,
    },
    utility::str::parse_number,
};

// 全角・半角・漢数字
const NUMS: &str = "[０-９0-9一二三四五六七八九]";

/// A recognized `［＃...］` directive without a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    // ［＃ページの左右中央］
    HorizontalCenter,
    // ［＃ここから○字下げ、●字詰め、ページの左右中央に］
    CenteredTop {
        level: usize,
        fill: Option<usize>,
    },
    // ［＃ここから○字下げ］
    Top {
        level: usize,
        fill: Option<usize>,
    },
    // ［＃ここから○字下げ、折り返して●字下げ］
    TopWithTurn {
        level: Option<usize>,
        turned_level: usize,
        fill: Option<usize>,
    },
    // ［＃ここで字下げ終わり］
    TopEnd,
    // ［＃ここから地付き］, ［＃ここから地から○字上げ］
    Bottom {
        offset: Option<usize>,
    },
    // ［＃ここで地付き終わり］
    BottomEnd,
    PageBreak,
    SheetBreak,
    ParagraphBreak,
    // ［＃○字下げ］ その行だけ
    OneLineTop {
        level: usize,
    },
    // ［＃地付き］, ［＃地から○字上げ］ その行だけ
    OneLineBottom {
        offset: Option<usize>,
    },
}

pub fn parse_directive(whole: &str) -> Result<Option<Directive>, ErrorKind> {
    static REGEX_HORIZONTAL_CENTER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^ページの左右中央$").unwrap());
    if REGEX_HORIZONTAL_CENTER.is_match(whole) {
        return Ok(Some(Directive::HorizontalCenter));
    }

    static REGEX_CENTERED_TOP: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^ここから(?P<level>{n}+)字下げ、(?:、?(?P<fill>{n}+)字詰め、)?(?:ページの)?左右中央に?$",
            n = NUMS
        ))
        .unwrap()
    });
    if let Some(caps) = REGEX_CENTERED_TOP.captures(whole) {
        return Ok(Some(Directive::CenteredTop {
            level: parse_number(&caps["level"])?,
            fill: parse_optional_number(caps.name("fill"))?,
        }));
    }

    static REGEX_TOP: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^ここから(?:引用文、?)?(?P<level>{n}+)字下げ?(?:、?(?P<fill>{n}+)字詰め)?$",
            n = NUMS
        ))
        .unwrap()
    });
    if let Some(caps) = REGEX_TOP.captures(whole) {
        return Ok(Some(Directive::Top {
            level: parse_number(&caps["level"])?,
            fill: parse_optional_number(caps.name("fill"))?,
        }));
    }

    static REGEX_TOP_WITH_TURN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^ここから(?:改行)?(?:天付き|(?P<level>{n}+)字下げ?)、?折り返して、?(?P<turned_level>{n}+)字下げ?(?:、?(?P<fill>{n}+)字詰め)?$",
            n = NUMS
        ))
        .unwrap()
    });
    if let Some(caps) = REGEX_TOP_WITH_TURN.captures(whole) {
        return Ok(Some(Directive::TopWithTurn {
            level: parse_optional_number(caps.name("level"))?,
            turned_level: parse_number(&caps["turned_level"])?,
            fill: parse_optional_number(caps.name("fill"))?,
        }));
    }

    static REGEX_TOP_END: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:ここで字下げ|引用文)(?:終わ?り|、.+終わ?り)$").unwrap());
    if REGEX_TOP_END.is_match(whole) {
        return Ok(Some(Directive::TopEnd));
    }

    static REGEX_BOTTOM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^ここ(?:から|より)(?:地付き|、?地(?:から|より))(?:(?P<offset>{n}+)字(?:空き|上げ|アキ))?$",
            n = NUMS
        ))
        .unwrap()
    });
    if let Some(caps) = REGEX_BOTTOM.captures(whole) {
        return Ok(Some(Directive::Bottom {
            offset: parse_optional_number(caps.name("offset"))?,
        }));
    }

    static REGEX_BOTTOM_END: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^ここで、?(?:地付き|、?地上げ|字上げ)終わ?り$").unwrap());
    if REGEX_BOTTOM_END.is_match(whole) {
        return Ok(Some(Directive::BottomEnd));
    }

    if whole == "改ページ" || whole == "改頁" {
        return Ok(Some(Directive::PageBreak));
    }

    if whole == "改丁" {
        return Ok(Some(Directive::SheetBreak));
    }

    if whole == "改段" {
        return Ok(Some(Directive::ParagraphBreak));
    }

    static REGEX_ONE_LINE_TOP: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(r"^(?:天から)?(?P<level>{n}+)字下げ?$", n = NUMS)).unwrap()
    });
    if let Some(caps) = REGEX_ONE_LINE_TOP.captures(whole) {
        return Ok(Some(Directive::OneLineTop {
            level: parse_number(&caps["level"])?,
        }));
    }

    // 後ろに何か続いてもよいので最後に見る
    static REGEX_ONE_LINE_BOTTOM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(&format!(
            r"^(?:地付き|、?地(?:から|より))(?:(?P<offset>{n}+)字(?:空き|上げ|アキ))?",
            n = NUMS
        ))
        .unwrap()
    });
    if let Some(caps) = REGEX_ONE_LINE_BOTTOM.captures(whole) {
        return Ok(Some(Directive::OneLineBottom {
            offset: parse_optional_number(caps.name("offset"))?,
        }));
    }

    Ok(None)
}

/// Block kind for a `［＃「target」は spec］` directive, if `spec` names one.
pub fn parse_targeted(spec: &str) -> Option<BlockKind> {
    match spec {
        "太字" => return Some(BlockKind::Bold),
        "傍点" => return Some(BlockKind::Dots),
        "傍線" => return Some(BlockKind::Line),
        "縦中横" => return Some(BlockKind::Yoko),
        _ => {}
    }

    static REGEX_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<level>.)見出し$").unwrap());
    if let Some(caps) = REGEX_HEADING.captures(spec) {
        let level = MidashiLevel::of(&caps["level"])?;
        return Some(BlockKind::Heading { level });
    }

    static REGEX_WINDOW_HEADING: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^窓(?P<level>.)見出し$").unwrap());
    if let Some(caps) = REGEX_WINDOW_HEADING.captures(spec) {
        let level = MidashiLevel::of(&caps["level"])?;
        return Some(BlockKind::WindowHeading { level });
    }

    None
}

/// Block kind for the directive following `※`: an external character by
/// Unicode or JIS code, or a plain note.
pub fn parse_note(whole: &str) -> Result<BlockKind, ErrorKind> {
    static REGEX_UNICODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)unicode").unwrap());
    static REGEX_JIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"水準|[0-9]+-[0-9]+").unwrap());

    let spec = whole.to_owned();
    if REGEX_UNICODE.is_match(whole) {
        let char = parse_unicode(whole)?;
        Ok(BlockKind::Unicode { spec, char })
    } else if REGEX_JIS.is_match(whole) {
        let char = parse_jis(whole)?;
        Ok(BlockKind::Jis { spec, char })
    } else {
        Ok(BlockKind::Note { spec })
    }
}

fn parse_optional_number(m: Option<regex::Match>) -> Result<Option<usize>, ErrorKind> {
    m.map(|m| parse_number(m.as_str())).transpose()
}
