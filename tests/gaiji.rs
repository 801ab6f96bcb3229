use aozora_tree::{
    jis_x_0213::{JisLookup, JisX0213Table},
    ruby_txt::{
        error::ErrorKind,
        gaiji::{parse_jis, parse_unicode, JisChar},
    },
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parts(first: &str, rest: &str) -> Option<(String, String)> {
    Some((first.to_owned(), rest.to_owned()))
}

#[rstest]
#[case("「ねこみみ＋囘」、第4水準2-12-11", vec![2, 12, 11], Some(4), parts("ねこみみ", "囘"))]
#[case("「てへん＋丑」、第四水準2-12-93", vec![2, 12, 93], Some(4), parts("てへん", "丑"))]
#[case("「口＋世」、第３水準1-14-92", vec![1, 14, 92], Some(3), parts("口", "世"))]
#[case("「二の字点」、13-27", vec![13, 27], None, None)]
fn test_parse_jis(
    #[case] spec: &str,
    #[case] code: Vec<usize>,
    #[case] level: Option<usize>,
    #[case] parts: Option<(String, String)>,
) {
    assert_eq!(parse_jis(spec).unwrap(), JisChar { code, level, parts });
}

#[rstest]
#[case("2+12+11")]
#[case("「ねこみみ＋囘」、第4水準")]
fn test_parse_jis_error(#[case] spec: &str) {
    let e = parse_jis(spec).unwrap_err();
    assert!(matches!(&e, ErrorKind::Format(m) if m.starts_with("Cannot convert to JIS char")));
}

#[rstest]
#[case("「ころもへん＋庫」、unicode8932", 0x8932, parts("ころもへん", "庫"))]
#[case("「ころもへん＋庫」、UNICODE8932", 0x8932, parts("ころもへん", "庫"))]
#[case("「弓＋椁のつくり」、U+5F34", 0x5f34, parts("弓", "椁のつくり"))]
fn test_parse_unicode(
    #[case] spec: &str,
    #[case] code: u32,
    #[case] parts: Option<(String, String)>,
) {
    let c = parse_unicode(spec).unwrap();
    assert_eq!(c.code, code);
    assert_eq!(c.parts, parts);
    assert_eq!(c.to_char(), char::from_u32(code));
}

#[rstest]
#[case("unicode89x2")]
#[case("「ころもへん＋庫」")]
fn test_parse_unicode_error(#[case] spec: &str) {
    let e = parse_unicode(spec).unwrap_err();
    assert!(matches!(&e, ErrorKind::Format(m) if m.starts_with("Cannot convert to Unicode char")));
}

#[test]
fn test_jis_to_char() {
    let table = |plane: usize, row: usize, cell: usize| match (plane, row, cell) {
        (1, 4, 2) => Some('あ'),
        (2, 12, 11) => Some('𢌞'),
        _ => None,
    };

    let c = parse_jis("「ねこみみ＋囘」、第4水準2-12-11").unwrap();
    assert_eq!(c.to_char(&table), Some('𢌞'));

    // 面がなければ第 1 面
    let c = parse_jis("「あ」、4-2").unwrap();
    assert_eq!(c.to_char(&table), Some('あ'));

    let c = parse_jis("「口＋世」、第３水準1-14-92").unwrap();
    assert_eq!(c.to_char(&table), None);
}

#[test]
fn test_jis_table() {
    let json = r#"[
        {"plane": 1, "row": 4, "cell": 2, "char": "あ"},
        {"plane": 1, "row": 4, "cell": 87, "char": "か゚"},
        {"plane": 2, "row": 12, "cell": 11, "char": "𢌞"}
    ]"#;
    let table = JisX0213Table::from_json(json).unwrap();

    // 結合文字列の区点は読み込まない
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup(1, 4, 2), Some('あ'));
    assert_eq!(table.lookup(1, 4, 87), None);
    assert_eq!(table.lookup(2, 12, 11), Some('𢌞'));

    assert!(JisX0213Table::from_json("{}").is_err());
}
