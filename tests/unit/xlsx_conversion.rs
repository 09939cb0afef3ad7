//! Tests for spreadsheet input and output

use rust_xlsxwriter::{ExcelDateTime, Format as CellFormat, Workbook};
use tabconv::conversion::{ConversionConfig, ConversionEngine, SheetSelector};
use tabconv::{convert, read_table, write_table, ConversionError, Format, TabularData, Value};

fn two_sheet_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary").unwrap();
    summary.write_string(0, 0, "total").unwrap();
    summary.write_number(1, 0, 3).unwrap();

    let people = workbook.add_worksheet();
    people.set_name("People").unwrap();
    people.write_string(0, 0, "name").unwrap();
    people.write_string(0, 1, "joined").unwrap();
    let date = CellFormat::new().set_num_format("yyyy-mm-dd");
    people.write_string(1, 0, "Ada").unwrap();
    people
        .write_datetime_with_format(1, 1, &ExcelDateTime::from_ymd(2024, 3, 15).unwrap(), &date)
        .unwrap();

    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_first_sheet_is_default() {
    let table = read_table(&two_sheet_workbook(), "xlsx").unwrap();
    assert_eq!(table.columns(), &["total"]);
    assert_eq!(table.rows(), &[vec![Value::from(3i64)]]);
}

#[test]
fn test_sheet_selection_and_dates() {
    let bytes = two_sheet_workbook();
    for selector in [SheetSelector::Index(1), SheetSelector::Name("People".to_string())] {
        let engine = ConversionEngine::new(ConversionConfig::default().with_sheet(selector));
        let table = engine.read(&bytes, Format::Xlsx).unwrap();

        assert_eq!(table.columns(), &["name", "joined"]);
        assert_eq!(
            table.rows(),
            &[vec![Value::from("Ada"), Value::from("2024-03-15")]]
        );
    }
}

#[test]
fn test_unknown_sheet_is_malformed_input() {
    let engine = ConversionEngine::new(
        ConversionConfig::default().with_sheet(SheetSelector::Name("Missing".to_string())),
    );
    let result = engine.read(&two_sheet_workbook(), Format::Xlsx);
    assert!(matches!(
        result,
        Err(ConversionError::MalformedInput {
            format: Format::Xlsx,
            ..
        })
    ));
}

#[test]
fn test_csv_to_xlsx_to_json() {
    let xlsx = convert(b"name,age\nAda,36\n", "csv", "xlsx").unwrap();
    assert!(xlsx.starts_with(b"PK"));

    let engine = ConversionEngine::new(ConversionConfig::default().with_indent_size(0).unwrap());
    let json = engine.convert_bytes(&xlsx, Format::Xlsx, Format::Json).unwrap();
    assert_eq!(json.as_bytes(), br#"[{"name":"Ada","age":"36"}]"#);
}

#[test]
fn test_typed_values_survive_xlsx() {
    let table = TabularData::from_rows(
        ["name", "score", "ratio", "active", "note"],
        vec![
            vec!["Ada".into(), 36i64.into(), 0.5.into(), true.into(), Value::Null],
            vec!["Lin".into(), (-2i64).into(), 1.25.into(), false.into(), "ok".into()],
        ],
    )
    .unwrap();

    let bytes = write_table(&table, "xlsx").unwrap();
    assert_eq!(read_table(&bytes, "xlsx").unwrap(), table);
}

#[test]
fn test_xlsx_output_is_deterministic() {
    let input = b"name,age\nAda,36\nLin,29\n";
    let first = convert(input, "csv", "xlsx").unwrap();
    let second = convert(input, "csv", "xlsx").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_sheet_name() {
    let engine = ConversionEngine::new(ConversionConfig::default().with_sheet_name("Export"));
    let bytes = engine
        .convert_bytes(b"a\n1\n", Format::Csv, Format::Xlsx)
        .unwrap()
        .into_bytes();

    let by_name = ConversionEngine::new(
        ConversionConfig::default().with_sheet(SheetSelector::Name("Export".to_string())),
    );
    assert_eq!(by_name.read(&bytes, Format::Xlsx).unwrap().row_count(), 1);
}

#[test]
fn test_excel_aliases() {
    let bytes = convert(br#"[{"a": 1}]"#, "json", "Excel").unwrap();
    let table = read_table(&bytes, "xls").unwrap();
    assert_eq!(table.columns(), &["a"]);
}

#[test]
fn test_integers_up_to_two_pow_53_stay_integers() {
    let json = br#"[{"n": 9007199254740992}, {"n": -9007199254740992}, {"n": 12}]"#;
    let xlsx = convert(json, "json", "xlsx").unwrap();
    let table = read_table(&xlsx, "xlsx").unwrap();

    assert_eq!(
        table.rows(),
        &[
            vec![Value::from(9_007_199_254_740_992i64)],
            vec![Value::from(-9_007_199_254_740_992i64)],
            vec![Value::from(12i64)],
        ]
    );
}
