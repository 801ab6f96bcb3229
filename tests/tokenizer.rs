use aozora_tree::ruby_txt::{
    error::ErrorKind,
    lex,
    tokenizer::{Annotation, TokenKind},
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn kinds(text: &str) -> Vec<TokenKind> {
    lex(text).unwrap().into_iter().map(|t| t.kind).collect()
}

fn other(text: &str) -> TokenKind {
    TokenKind::OtherText(text.to_owned())
}

fn annotation(whole: &str) -> TokenKind {
    TokenKind::Annotation(Annotation::new(whole))
}

#[rstest]
#[case("猫なめ", None, None)]
#[case("「猫」は太字", Some("猫"), Some("太字"))]
#[case("「ねこ」に傍点", Some("ねこ"), Some("傍点"))]
#[case("も「猫」は太字", None, None)]
#[case("「猫」", None, None)]
fn test_annotation_target(
    #[case] whole: &str,
    #[case] target: Option<&str>,
    #[case] spec: Option<&str>,
) {
    let a = Annotation::new(whole);
    assert_eq!(a.whole, whole);
    assert_eq!(a.target.as_deref(), target);
    assert_eq!(a.spec.as_deref(), spec);
}

#[test]
fn test_line_break() {
    assert_eq!(
        kinds("いちぎょうめ\nにぎょうめ"),
        vec![
            TokenKind::Hiragana("いちぎょうめ".to_owned()),
            TokenKind::LineBreak,
            TokenKind::Hiragana("にぎょうめ".to_owned()),
        ]
    );

    // CR+LF も LF と同じ
    assert_eq!(kinds("あ\r\nい"), kinds("あ\nい"));
}

#[test]
fn test_char_types() {
    assert_eq!(
        kinds("私はネコを舐める"),
        vec![
            TokenKind::Kanji("私".to_owned()),
            TokenKind::Hiragana("は".to_owned()),
            TokenKind::Katakana("ネコ".to_owned()),
            TokenKind::Hiragana("を".to_owned()),
            TokenKind::Kanji("舐".to_owned()),
            TokenKind::Hiragana("める".to_owned()),
        ]
    );

    assert_eq!(kinds("人々"), vec![TokenKind::Kanji("人々".to_owned())]);
}

#[test]
fn test_marks() {
    assert_eq!(
        kinds("foo｜※bar"),
        vec![
            other("foo"),
            TokenKind::RubyBar,
            TokenKind::RiceMark,
            other("bar"),
        ]
    );
}

#[test]
fn test_ruby_reading() {
    assert_eq!(
        kinds("猫《ねこ》"),
        vec![
            TokenKind::Kanji("猫".to_owned()),
            TokenKind::RubyReading("ねこ".to_owned()),
        ]
    );

    // 読みが空ならただの文字
    assert_eq!(
        kinds("猫《》"),
        vec![TokenKind::Kanji("猫".to_owned()), other("《》")]
    );

    // 長音符はカタカナに含めない
    assert_eq!(
        kinds("ラーメン《らーめん》"),
        vec![
            TokenKind::Katakana("ラ".to_owned()),
            other("ー"),
            TokenKind::Katakana("メン".to_owned()),
            TokenKind::RubyReading("らーめん".to_owned()),
        ]
    );
}

#[test]
fn test_line_numbers() {
    let lines: Vec<usize> = lex("hoge\nmoge\nmige\n")
        .unwrap()
        .iter()
        .map(|t| t.line)
        .collect();
    assert_eq!(lines, vec![1, 1, 2, 2, 3, 3]);
}

#[test]
fn test_without_notes() {
    let tokens = lex("first line\nsecond line\nthird line\nforth line\n").unwrap();
    assert_eq!(tokens.len(), 8);
}

#[test]
fn test_skip_notes() {
    let text = "\
first line
second line
-------------------------------------------------------
【テキスト中に現れる記号について】

《》：ルビ
（例）沽券《こけん》

［＃］：入力者注　主に外字の説明や、傍点の位置の指定
　　　（数字は、JIS X 0213の面区点番号、または底本のページと行数）
（例）2［＃「2」はローマ数字、1-13-22］
-------------------------------------------------------
third line
forth line
";
    let tokens = lex(text).unwrap();
    assert_eq!(tokens.len(), 8);
    assert_eq!(tokens[0].text(), Some("first line"));
    assert_eq!(tokens[1].kind, TokenKind::LineBreak);
    assert_eq!(tokens[4].text(), Some("third line"));
    assert_eq!(tokens[4].line, 13);
    assert_eq!(tokens[6].text(), Some("forth line"));
}

#[test]
fn test_image_tag_line() {
    let tokens = lex("first line\nsecond line\n<img src=\"img/00.jpg\">\nthird line\n").unwrap();
    assert_eq!(tokens.len(), 7);
    assert_eq!(tokens[0].text(), Some("first line"));
    assert_eq!(tokens[4].kind, TokenKind::Image("img/00.jpg".to_owned()));
    assert_eq!(tokens[5].text(), Some("third line"));
}

#[test]
fn test_nested_annotation() {
    let text = "ひっ［＃「ひっ」に傍点］外して［＃「ひっ［＃「ひっ」に傍点］外して」は底本では「ひっ外［＃「っ外」に傍点］して」］右へ\n";
    assert_eq!(
        kinds(text),
        vec![
            TokenKind::Hiragana("ひっ".to_owned()),
            annotation("「ひっ」に傍点"),
            TokenKind::Kanji("外".to_owned()),
            TokenKind::Hiragana("して".to_owned()),
            annotation("「ひっ［＃「ひっ」に傍点］外して」は底本では「ひっ外［＃「っ外」に傍点］して」"),
            TokenKind::Kanji("右".to_owned()),
            TokenKind::Hiragana("へ".to_owned()),
            TokenKind::LineBreak,
        ]
    );
}

#[rstest]
#[case("ほんぶん1\nほんぶん2\n底本：「現代日本思想大系」筑摩書房\n入力：土屋隆\n")]
#[case("ほんぶん1\nほんぶん2\n底本:「現代日本思想大系」筑摩書房\n入力：土屋隆\n")]
fn test_stop_at_footer(#[case] text: &str) {
    assert_eq!(
        kinds(text),
        vec![
            TokenKind::Hiragana("ほんぶん".to_owned()),
            other("1"),
            TokenKind::LineBreak,
            TokenKind::Hiragana("ほんぶん".to_owned()),
            other("2"),
            TokenKind::LineBreak,
        ]
    );
}

#[test]
fn test_unterminated_annotation() {
    let e = lex("ねこ\nなめ［＃「なめ」に傍点\n").unwrap_err();
    assert_eq!(e.line, Some(2));
    assert!(matches!(e.kind, ErrorKind::Format(_)));
    assert!(e.to_string().ends_with("at L2"), "{}", e);
}
