//! Terminal rendering of parsed columns and the format registry.

use chtype::format::Format;
use chtype::{ColumnDescriptor, TypeDetails};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use itertools::Itertools;

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

/// One row per column with the facts encoders look at.
pub fn columns_table(columns: &[ColumnDescriptor]) -> Table {
    let mut table = new_table(vec![
        "Name",
        "Type",
        "Data type",
        "Nullable",
        "Low cardinality",
        "Fixed length",
        "Estimated length",
    ]);
    for column in columns {
        table.add_row(vec![
            column.name().to_string(),
            column.original_type_name().to_string(),
            column.data_type().to_string(),
            yes_no(column.is_nullable()).to_string(),
            yes_no(column.is_low_cardinality()).to_string(),
            yes_no(column.is_fixed_length()).to_string(),
            column.estimated_length().to_string(),
        ]);
    }
    table
}

/// Kind-specific facts as a short `key: value` list.
fn describe_details(column: &ColumnDescriptor) -> String {
    match column.details() {
        TypeDetails::None => String::new(),
        TypeDetails::Decimal { precision, scale } => {
            format!("precision: {precision}, scale: {scale}")
        }
        TypeDetails::FixedString { length } => format!("length: {length}"),
        TypeDetails::DateTime {
            precision,
            timezone,
        } => [
            precision.map(|p| format!("precision: {p}")),
            timezone.as_ref().map(|tz| format!("timezone: {tz}")),
        ]
        .into_iter()
        .flatten()
        .join(", "),
        TypeDetails::Enum { constants } => constants
            .iter()
            .map(|(name, code)| format!("'{name}' = {code}"))
            .join(", "),
        TypeDetails::Aggregate {
            function,
            signature,
        } => format!("{signature} ({function})"),
    }
}

fn tree_rows(column: &ColumnDescriptor, depth: usize, rows: &mut Vec<Vec<String>>) {
    let label = if column.name().is_empty() {
        column.original_type_name().to_string()
    } else {
        format!("{} {}", column.name(), column.original_type_name())
    };
    rows.push(vec![
        format!("{}{}", "  ".repeat(depth), label),
        column.data_type().to_string(),
        yes_no(column.is_nullable()).to_string(),
        yes_no(column.is_fixed_length()).to_string(),
        column.estimated_length().to_string(),
        describe_details(column),
    ]);
    for nested in column.nested_columns() {
        tree_rows(nested, depth + 1, rows);
    }
}

/// The descriptor and all nested descriptors, indented by depth.
pub fn descriptor_table(column: &ColumnDescriptor) -> Table {
    let mut table = new_table(vec![
        "Column",
        "Data type",
        "Nullable",
        "Fixed length",
        "Estimated length",
        "Details",
    ]);
    let mut rows = Vec::new();
    tree_rows(column, 0, &mut rows);
    for row in rows {
        table.add_row(row);
    }
    table
}

pub fn formats_table<'a>(formats: impl IntoIterator<Item = &'a Format>) -> Table {
    let mut table = new_table(vec![
        "Format",
        "Input",
        "Output",
        "Binary",
        "Header",
        "Row based",
        "Default input",
    ]);
    for format in formats {
        table.add_row(vec![
            format.name().to_string(),
            yes_no(format.supports_input()).to_string(),
            yes_no(format.supports_output()).to_string(),
            yes_no(format.is_binary()).to_string(),
            yes_no(format.has_header()).to_string(),
            yes_no(format.is_row_based()).to_string(),
            format.default_input_format().to_string(),
        ]);
    }
    table
}

/// One-line summary of a format, printed under column tables.
pub fn format_summary(format: Format) -> String {
    format!(
        "Format {}: {}, {}, {} header, default input {}",
        format,
        if format.is_binary() { "binary" } else { "text" },
        if format.is_row_based() {
            "row based"
        } else {
            "block based"
        },
        if format.has_header() { "with" } else { "no" },
        format.default_input_format()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_table_lists_every_column() {
        let columns = chtype::parse("a UInt8 null, `b b` LowCardinality(String)").unwrap();
        let rendered = columns_table(&columns).to_string();
        assert!(rendered.contains("UInt8 null"));
        assert!(rendered.contains("b b"));
        assert!(rendered.contains("LowCardinality(String)"));
    }

    #[test]
    fn test_descriptor_table_shows_details() {
        let column = ColumnDescriptor::of("e", "Array(Enum8('a' = 1, 'b' = 2))").unwrap();
        let rendered = descriptor_table(&column).to_string();
        assert!(rendered.contains("e Array(Enum8('a' = 1, 'b' = 2))"));
        assert!(rendered.contains("'b' = 2"));

        let column = ColumnDescriptor::of("q", "AggregateFunction(quantiles(0.5, 0.9), UInt64)")
            .unwrap();
        assert_eq!(describe_details(&column), "quantiles(0.5,0.9) (quantiles)");
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(
            format_summary(Format::RowBinaryWithNamesAndTypes),
            "Format RowBinaryWithNamesAndTypes: binary, row based, with header, default input RowBinary"
        );
    }
}
