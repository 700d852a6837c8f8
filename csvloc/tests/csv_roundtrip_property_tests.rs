use csvloc::csv::{Reader, Writer};
use proptest::prelude::*;

fn cell_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ąść,\"\n\r]{0,12}").expect("valid cell regex")
}

/// Cells without carriage returns, which generic CSV readers treat as line breaks.
fn portable_cell_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ąść,\"\n]{0,12}").expect("valid cell regex")
}

fn rows_strategy(cell: BoxedStrategy<String>) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(cell, 1..5), 0..8)
}

fn write_rows(rows: &[Vec<String>]) -> String {
    let mut writer = Writer::new();
    for row in rows {
        writer.add_row(row.as_slice()).expect("non-empty row");
    }
    writer.render().to_string()
}

fn read_rows(text: &str) -> Result<Vec<Vec<String>>, csvloc::Error> {
    Reader::from_text(text).rows().collect()
}

fn read_rows_with_csv_crate(text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
        .records()
        .map(|record| {
            record
                .expect("valid record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

fn write_rows_with_csv_crate(rows: &[Vec<String>]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).expect("write record");
    }
    String::from_utf8(writer.into_inner().expect("flush")).expect("utf-8")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn writer_then_reader_reproduces_rows(rows in rows_strategy(cell_strategy().boxed())) {
        let text = write_rows(&rows);
        let decoded = read_rows(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded, rows);
    }

    #[test]
    fn read_column_matches_read_row(rows in rows_strategy(cell_strategy().boxed()), column in 0usize..6) {
        let text = write_rows(&rows);
        let mut reader = Reader::from_text(&text);
        for row in &rows {
            let value = reader
                .read_column(column)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(value.as_ref(), row.get(column));
        }
        prop_assert!(reader.is_exhausted().map_err(|e| TestCaseError::fail(e.to_string()))?);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn csv_crate_reads_our_output(rows in rows_strategy(portable_cell_strategy().boxed())) {
        let text = write_rows(&rows);
        prop_assert_eq!(read_rows_with_csv_crate(&text), rows);
    }

    #[test]
    fn we_read_csv_crate_output(rows in rows_strategy(cell_strategy().boxed())) {
        let text = write_rows_with_csv_crate(&rows);
        let decoded = read_rows(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(decoded, rows);
    }
}

#[test]
fn test_unterminated_quote_at_end_of_blob() {
    let err = read_rows("K1,ok\nK2,\"unterminated").unwrap_err();
    assert!(matches!(err, csvloc::Error::Format { line: 2, .. }));
}
