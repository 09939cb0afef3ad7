//! Round-trip tests: table -> format -> table

use proptest::prelude::*;
use tabconv::conversion::{ConversionConfig, ConversionEngine};
use tabconv::{read_table, write_table, Format, TabularData, Value};

fn text_value() -> impl Strategy<Value = Value> {
    "[a-zA-Z0-9 ,;'|.\"-]{0,12}".prop_map(Value::String)
}

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        text_value(),
    ]
}

fn table_of<F, S>(cell: F) -> impl Strategy<Value = TabularData>
where
    F: Fn() -> S + 'static,
    S: Strategy<Value = Value> + 'static,
{
    (1usize..5, 1usize..8).prop_flat_map(move |(columns, rows)| {
        proptest::collection::vec(proptest::collection::vec(cell(), columns), rows).prop_map(
            move |rows| {
                TabularData::from_rows((0..columns).map(|c| format!("col{}", c)), rows).unwrap()
            },
        )
    })
}

proptest! {
    #[test]
    fn json_round_trip_preserves_table(table in table_of(scalar_value)) {
        let bytes = write_table(&table, "json").unwrap();
        let back = read_table(&bytes, "json").unwrap();
        prop_assert_eq!(back, table);
    }

    #[test]
    fn csv_round_trip_preserves_text(table in table_of(text_value)) {
        let bytes = write_table(&table, "csv").unwrap();
        let back = read_table(&bytes, "csv").unwrap();
        prop_assert_eq!(back, table);
    }

    #[test]
    fn csv_round_trip_recovers_integers_with_inference(
        table in table_of(|| any::<i64>().prop_map(Value::from))
    ) {
        let engine = ConversionEngine::new(ConversionConfig::default().with_infer_types(true));
        let bytes = engine.write(&table, Format::Csv).unwrap();
        let back = engine.read(&bytes, Format::Csv).unwrap();
        prop_assert_eq!(back, table);
    }
}

#[cfg(test)]
mod round_trip_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_csv_numbers_come_back_as_text_without_inference() {
        let table =
            TabularData::from_rows(["n", "f"], vec![vec![Value::from(42i64), Value::from(2.5)]])
                .unwrap();
        let back = read_table(&write_table(&table, "csv").unwrap(), "csv").unwrap();

        assert_eq!(back.rows(), &[vec![Value::from("42"), Value::from("2.5")]]);
    }

    #[test]
    fn test_json_to_csv_to_json_with_inference() {
        let engine = ConversionEngine::new(
            ConversionConfig::default()
                .with_infer_types(true)
                .with_indent_size(0)
                .unwrap(),
        );
        let original = br#"[{"id":1,"name":"Ada","ok":true,"ratio":0.25,"note":null}]"#;

        let csv = engine.convert_bytes(original, Format::Json, Format::Csv).unwrap();
        assert_eq!(csv.as_bytes(), b"id,name,ok,ratio,note\n1,Ada,true,0.25,\n");

        let json = engine.convert_bytes(csv.as_bytes(), Format::Csv, Format::Json).unwrap();
        assert_eq!(json.as_bytes(), original);
    }

    #[test]
    fn test_every_format_pair_preserves_text_table() {
        let table = TabularData::from_rows(
            ["city", "country"],
            vec![
                vec!["Oslo".into(), "Norway".into()],
                vec!["Lyon".into(), "France".into()],
            ],
        )
        .unwrap();

        let engine = ConversionEngine::default();
        for from in Format::ALL {
            let input = engine.write(&table, from).unwrap();
            for to in Format::ALL {
                let output = engine.convert_bytes(&input, from, to).unwrap();
                let back = engine.read(output.as_bytes(), to).unwrap();
                assert_eq!(back, table, "{} -> {}", from, to);
            }
        }
    }
}
