use aozora_tree::{
    ruby_txt::error::ErrorKind,
    utility::str::{parse_number, CharType},
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("3", 3)]
#[case("12", 12)]
#[case("３", 3)]
#[case("１2", 12)]
#[case("四", 4)]
fn test_parse_number(#[case] input: &str, #[case] expected: usize) {
    assert_eq!(parse_number(input).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("十")]
#[case("3a")]
#[case("一〇")]
#[case("99999999999999999999999999")]
fn test_parse_number_error(#[case] input: &str) {
    assert!(matches!(parse_number(input), Err(ErrorKind::Format(_))));
}

#[rstest]
#[case('あ', CharType::Hiragana)]
#[case('ゝ', CharType::Hiragana)]
#[case('ア', CharType::Katakana)]
#[case('ヴ', CharType::Katakana)]
#[case('ー', CharType::Other)]
#[case('ヽ', CharType::Other)]
#[case('・', CharType::Other)]
#[case('猫', CharType::Kanji)]
#[case('々', CharType::Kanji)]
#[case('〆', CharType::Kanji)]
#[case('ヶ', CharType::Kanji)]
#[case('〇', CharType::Kanji)]
#[case('a', CharType::Other)]
#[case('。', CharType::Other)]
#[case('※', CharType::Other)]
fn test_char_type(#[case] c: char, #[case] expected: CharType) {
    assert_eq!(CharType::from(c), expected);
}
