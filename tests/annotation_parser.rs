use aozora_tree::ruby_txt::{
    annotation_parser::{parse_directive, parse_note, parse_targeted, Directive},
    tree::{BlockClass, BlockKind},
    utility::MidashiLevel,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("ページの左右中央", Directive::HorizontalCenter)]
#[case(
    "ここから５字下げ、２９字詰め、ページの左右中央に",
    Directive::CenteredTop { level: 5, fill: Some(29) }
)]
#[case("ここから３字下げ、左右中央", Directive::CenteredTop { level: 3, fill: None })]
#[case("ここから３字下げ", Directive::Top { level: 3, fill: None })]
#[case("ここから引用文、２字下げ", Directive::Top { level: 2, fill: None })]
#[case("ここから８字下げ、３０字詰め", Directive::Top { level: 8, fill: Some(30) })]
#[case(
    "ここから１字下げ、折り返して３字下げ",
    Directive::TopWithTurn { level: Some(1), turned_level: 3, fill: None }
)]
#[case(
    "ここから改行天付き、折り返して２字下げ",
    Directive::TopWithTurn { level: None, turned_level: 2, fill: None }
)]
#[case(
    "ここから６字下げ、折り返して７字下げ、２１字詰め",
    Directive::TopWithTurn { level: Some(6), turned_level: 7, fill: Some(21) }
)]
#[case("ここで字下げ終わり", Directive::TopEnd)]
#[case("ここで字下げ終り", Directive::TopEnd)]
#[case("引用文終わり", Directive::TopEnd)]
#[case("ここから地付き", Directive::Bottom { offset: None })]
#[case("ここから地から２字上げ", Directive::Bottom { offset: Some(2) })]
#[case("ここで地付き終わり", Directive::BottomEnd)]
#[case("ここで字上げ終わり", Directive::BottomEnd)]
#[case("改ページ", Directive::PageBreak)]
#[case("改頁", Directive::PageBreak)]
#[case("改丁", Directive::SheetBreak)]
#[case("改段", Directive::ParagraphBreak)]
#[case("３字下げ", Directive::OneLineTop { level: 3 })]
#[case("天から１７字下げ", Directive::OneLineTop { level: 17 })]
#[case("二字下げ", Directive::OneLineTop { level: 2 })]
#[case("地付き", Directive::OneLineBottom { offset: None })]
#[case("地から１2字上げ", Directive::OneLineBottom { offset: Some(12) })]
#[case("地付きにする", Directive::OneLineBottom { offset: None })]
#[case("地から３字上げで", Directive::OneLineBottom { offset: Some(3) })]
#[case("地より２字アキ、本文とは別", Directive::OneLineBottom { offset: Some(2) })]
fn test_parse_directive(#[case] whole: &str, #[case] expected: Directive) {
    assert_eq!(parse_directive(whole).unwrap(), Some(expected));
}

#[rstest]
#[case("うちゅうだ！それはうちゅうだ！")]
#[case("tは下ドット付き")]
#[case("天付きにする")]
#[case("改ページする")]
fn test_parse_directive_unknown(#[case] whole: &str) {
    assert_eq!(parse_directive(whole).unwrap(), None);
}

#[rstest]
#[case("太字", Some(BlockKind::Bold))]
#[case("傍点", Some(BlockKind::Dots))]
#[case("傍線", Some(BlockKind::Line))]
#[case("縦中横", Some(BlockKind::Yoko))]
#[case("大見出し", Some(BlockKind::Heading { level: MidashiLevel::Oh }))]
#[case("小見出し", Some(BlockKind::Heading { level: MidashiLevel::Ko }))]
#[case("窓中見出し", Some(BlockKind::WindowHeading { level: MidashiLevel::Naka }))]
#[case("超見出し", None)]
#[case("白ゴマ傍点", None)]
#[case("うちゅうさ", None)]
fn test_parse_targeted(#[case] spec: &str, #[case] expected: Option<BlockKind>) {
    assert_eq!(parse_targeted(spec), expected);
}

#[rstest]
#[case("「ころもへん＋庫」、unicode8932", BlockClass::Unicode)]
#[case("「廴＋囘」、第4水準2-12-11", BlockClass::Jis)]
#[case("「口＋世」、1-14-92", BlockClass::Jis)]
#[case("ねこ", BlockClass::Note)]
fn test_parse_note(#[case] whole: &str, #[case] expected: BlockClass) {
    let kind = parse_note(whole).unwrap();
    assert_eq!(kind.class(), expected);
}
