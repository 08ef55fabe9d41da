use std::io::Write;

use lawd_table::{DistrictRow, DistrictTable, TableError};
use tempfile::NamedTempFile;

fn write_table(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_rows_from_named_columns() {
    let file = write_table(
        "법정동코드\t법정동명\n1168010100\t서울특별시 강남구 역삼동\n1168010300\t서울특별시 강남구 개포동\n",
    );
    let table = DistrictTable::load_from_file(file.path()).expect("load table");
    assert_eq!(table.len(), 2);
    let row = table.find_exact("서울특별시 강남구 역삼동").expect("exact hit");
    assert_eq!(row.code, "1168010100");
}

#[test]
fn ignores_column_order_and_extra_columns() {
    let file = write_table(
        "폐지여부\t법정동명\t법정동코드\n존재\t서울특별시 강남구 역삼동\t1168010100\n",
    );
    let table = DistrictTable::load_from_file(file.path()).expect("load table");
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].code, "1168010100");
    assert_eq!(table.rows()[0].name, "서울특별시 강남구 역삼동");
}

#[test]
fn strips_bom_and_skips_blank_and_partial_lines() {
    let file = write_table(
        "\u{feff}법정동코드\t법정동명\n\n1168010100\t서울특별시  강남구\u{3000}역삼동\n\t이름없는행\n4159000000\t\n",
    );
    let table = DistrictTable::load_from_file(file.path()).expect("load table");
    assert_eq!(table.len(), 1);
    // Names are canonicalized at load time.
    assert_eq!(table.rows()[0].name, "서울특별시 강남구 역삼동");
}

#[test]
fn missing_name_column_is_an_error() {
    let file = write_table("법정동코드\t동명\n1168010100\t역삼동\n");
    let err = DistrictTable::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, TableError::MissingColumn(col) if col == "법정동명"));
}

#[test]
fn empty_file_is_an_error() {
    let file = write_table("");
    assert!(matches!(
        DistrictTable::load_from_file(file.path()).unwrap_err(),
        TableError::MissingHeader
    ));
}

#[test]
fn header_without_rows_is_an_error() {
    let file = write_table("법정동코드\t법정동명\n");
    assert!(matches!(
        DistrictTable::load_from_file(file.path()).unwrap_err(),
        TableError::Empty
    ));
}

fn make_table(rows: &[(&str, &str)]) -> std::sync::Arc<DistrictTable> {
    DistrictTable::from_rows(
        rows.iter()
            .map(|(code, name)| DistrictRow {
                code: (*code).to_string(),
                name: (*name).to_string(),
            })
            .collect(),
    )
}

#[test]
fn search_prefers_exact_over_substring() {
    let table = make_table(&[("1000000000", "역삼강남동"), ("2000000000", "강남동")]);
    let hits = table.search("강남동");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, "2000000000");
}

#[test]
fn search_suffix_tier_orders_by_descending_name_length() {
    let table = make_table(&[
        ("1000000000", "경기도 수원시 신촌동"),
        ("2000000000", "서울특별시 마포구 대흥동 신촌동"),
        ("3000000000", "인천광역시 신촌동"),
    ]);
    let hits = table.search("신촌동");
    let codes: Vec<&str> = hits.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["2000000000", "1000000000", "3000000000"]);
}

#[test]
fn search_substring_tier_only_when_suffix_misses() {
    let table = make_table(&[
        ("1000000000", "서울특별시 종로구 신문로1가"),
        ("2000000000", "서울특별시 신문로1가동"),
    ]);
    // "신문로" is a suffix of neither name, so both are substring hits,
    // longest first.
    let hits = table.search("신문로");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].code, "1000000000");

    // A suffix hit hides the substring-only row.
    let hits = table.search("신문로1가동");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].code, "2000000000");
}

#[test]
fn search_normalizes_the_query() {
    let table = make_table(&[("1168010100", "서울특별시 강남구 역삼동")]);
    let hits = table.search("서울특별시\u{3000}강남구  역삼동");
    assert_eq!(hits.len(), 1);
}

#[test]
fn search_with_empty_query_finds_nothing() {
    let table = make_table(&[("1168010100", "서울특별시 강남구 역삼동")]);
    assert!(table.search("   ").is_empty());
    assert!(table.find_exact("").is_none());
}

#[test]
fn shared_handle_is_cached_per_process() {
    let file = write_table("법정동코드\t법정동명\n1168010100\t서울특별시 강남구 역삼동\n");
    let first = DistrictTable::shared(file.path()).expect("first load");
    let second = DistrictTable::shared("does/not/exist.tsv").expect("cached load");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}
