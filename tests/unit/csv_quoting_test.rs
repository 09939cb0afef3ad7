//! Tests for CSV quoting and escaping

use tabconv::conversion::{ConversionConfig, ConversionEngine, DelimiterType};
use tabconv::{read_table, write_table, Format, TabularData, Value};

fn single_column(values: &[&str]) -> TabularData {
    TabularData::from_rows(
        ["value"],
        values.iter().map(|v| vec![Value::from(*v)]).collect(),
    )
    .unwrap()
}

fn csv_text(table: &TabularData) -> String {
    String::from_utf8(write_table(table, "csv").unwrap()).unwrap()
}

#[test]
fn test_plain_values_are_not_quoted() {
    let table = single_column(&["Ada", "two words", "it's"]);
    assert_eq!(csv_text(&table), "value\nAda\ntwo words\nit's\n");
}

#[test]
fn test_delimiter_and_quote_are_quoted() {
    let table = single_column(&["Smith, John", "say \"hi\""]);
    let text = csv_text(&table);

    assert_eq!(text, "value\n\"Smith, John\"\n\"say \"\"hi\"\"\"\n");
    assert_eq!(read_table(text.as_bytes(), "csv").unwrap(), table);
}

#[test]
fn test_embedded_newline_is_quoted() {
    let table = single_column(&["line one\nline two"]);
    let text = csv_text(&table);

    assert_eq!(text, "value\n\"line one\nline two\"\n");
    assert_eq!(read_table(text.as_bytes(), "csv").unwrap(), table);
}

#[test]
fn test_quoted_header_names() {
    let table = TabularData::from_rows(
        ["last, first", "id"],
        vec![vec!["Lovelace, Ada".into(), "1".into()]],
    )
    .unwrap();
    let text = csv_text(&table);

    assert_eq!(text, "\"last, first\",id\n\"Lovelace, Ada\",1\n");
    assert_eq!(read_table(text.as_bytes(), "csv").unwrap(), table);
}

#[test]
fn test_quoting_follows_delimiter() {
    let engine = ConversionEngine::new(
        ConversionConfig::default().with_delimiter(DelimiterType::Semicolon),
    );
    let table = TabularData::from_rows(
        ["a", "b"],
        vec![vec!["1,5".into(), "x;y".into()]],
    )
    .unwrap();

    let bytes = engine.write(&table, Format::Csv).unwrap();
    assert_eq!(bytes, b"a;b\n1,5;\"x;y\"\n".to_vec());
    assert_eq!(engine.read(&bytes, Format::Csv).unwrap(), table);
}

#[test]
fn test_quoted_input_fields_are_unescaped() {
    let table = read_table(b"name,quote\n\"Ada\",\"She said \"\"no\"\"\"\n", "csv").unwrap();
    assert_eq!(
        table.rows(),
        &[vec![Value::from("Ada"), Value::from("She said \"no\"")]]
    );
}
