//! # Data Formats
//!
//! The closed set of formats the server reads and writes, with the capability
//! flags a client needs to pick one: whether it can be sent or received,
//! binary or text, whether output starts with a names/types header, and
//! whether it is row or block oriented.
//!
//! Formats that cannot be used for input resolve to a related input format
//! through [`Format::default_input_format`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown format '{0}'")]
pub struct UnknownFormat(pub String);

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[default]
    RowBinary,
    RowBinaryWithNamesAndTypes,
    TabSeparated,
    TabSeparatedRaw,
    TabSeparatedWithNames,
    TabSeparatedWithNamesAndTypes,
    Arrow,
    ArrowStream,
    Avro,
    AvroConfluent,
    CSV,
    CSVWithNames,
    CapnProto,
    CustomSeparated,
    CustomSeparatedIgnoreSpaces,
    JSONCompactEachRow,
    JSONCompactEachRowWithNamesAndTypes,
    JSON,
    JSONAsString,
    JSONCompact,
    JSONCompactStringsEachRow,
    JSONCompactStringsEachRowWithNamesAndTypes,
    JSONCompactStrings,
    JSONEachRow,
    JSONEachRowWithProgress,
    JSONStringsEachRow,
    JSONStringsEachRowWithProgress,
    JSONStringEachRow,
    JSONStrings,
    LineAsString,
    Markdown,
    MsgPack,
    MySQLWire,
    Native,
    Null,
    ODBCDriver2,
    ORC,
    Parquet,
    PostgreSQLWire,
    Pretty,
    PrettyCompact,
    PrettyCompactMonoBlock,
    PrettyCompactNoEscapes,
    PrettyNoEscapes,
    PrettySpace,
    PrettySpaceNoEscapes,
    Protobuf,
    ProtobufSingle,
    RawBLOB,
    Regexp,
    TSKV,
    TSV,
    TSVRaw,
    TSVWithNames,
    TSVWithNamesAndTypes,
    Template,
    TemplateIgnoreSpaces,
    Values,
    Vertical,
    XML,
}

/// Capability flags of a [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatCapabilities {
    pub supports_input: bool,
    pub supports_output: bool,
    pub is_binary: bool,
    /// Only set for output formats.
    pub has_header: bool,
    pub is_row_based: bool,
    #[serde(skip)]
    default_input: Option<Format>,
}

impl FormatCapabilities {
    const fn new(
        input: bool,
        output: bool,
        binary: bool,
        header: bool,
        row_based: bool,
        default_input: Option<Format>,
    ) -> Self {
        Self {
            supports_input: input,
            supports_output: output,
            is_binary: binary,
            has_header: output && header,
            is_row_based: row_based,
            default_input,
        }
    }
}

impl Format {
    pub const ALL: &'static [Format] = &[
        Format::RowBinary,
        Format::RowBinaryWithNamesAndTypes,
        Format::TabSeparated,
        Format::TabSeparatedRaw,
        Format::TabSeparatedWithNames,
        Format::TabSeparatedWithNamesAndTypes,
        Format::Arrow,
        Format::ArrowStream,
        Format::Avro,
        Format::AvroConfluent,
        Format::CSV,
        Format::CSVWithNames,
        Format::CapnProto,
        Format::CustomSeparated,
        Format::CustomSeparatedIgnoreSpaces,
        Format::JSONCompactEachRow,
        Format::JSONCompactEachRowWithNamesAndTypes,
        Format::JSON,
        Format::JSONAsString,
        Format::JSONCompact,
        Format::JSONCompactStringsEachRow,
        Format::JSONCompactStringsEachRowWithNamesAndTypes,
        Format::JSONCompactStrings,
        Format::JSONEachRow,
        Format::JSONEachRowWithProgress,
        Format::JSONStringsEachRow,
        Format::JSONStringsEachRowWithProgress,
        Format::JSONStringEachRow,
        Format::JSONStrings,
        Format::LineAsString,
        Format::Markdown,
        Format::MsgPack,
        Format::MySQLWire,
        Format::Native,
        Format::Null,
        Format::ODBCDriver2,
        Format::ORC,
        Format::Parquet,
        Format::PostgreSQLWire,
        Format::Pretty,
        Format::PrettyCompact,
        Format::PrettyCompactMonoBlock,
        Format::PrettyCompactNoEscapes,
        Format::PrettyNoEscapes,
        Format::PrettySpace,
        Format::PrettySpaceNoEscapes,
        Format::Protobuf,
        Format::ProtobufSingle,
        Format::RawBLOB,
        Format::Regexp,
        Format::TSKV,
        Format::TSV,
        Format::TSVRaw,
        Format::TSVWithNames,
        Format::TSVWithNamesAndTypes,
        Format::Template,
        Format::TemplateIgnoreSpaces,
        Format::Values,
        Format::Vertical,
        Format::XML,
    ];

    /// Format name as the server spells it in `FORMAT` clauses.
    pub fn name(&self) -> &'static str {
        match self {
            Format::RowBinary => "RowBinary",
            Format::RowBinaryWithNamesAndTypes => "RowBinaryWithNamesAndTypes",
            Format::TabSeparated => "TabSeparated",
            Format::TabSeparatedRaw => "TabSeparatedRaw",
            Format::TabSeparatedWithNames => "TabSeparatedWithNames",
            Format::TabSeparatedWithNamesAndTypes => "TabSeparatedWithNamesAndTypes",
            Format::Arrow => "Arrow",
            Format::ArrowStream => "ArrowStream",
            Format::Avro => "Avro",
            Format::AvroConfluent => "AvroConfluent",
            Format::CSV => "CSV",
            Format::CSVWithNames => "CSVWithNames",
            Format::CapnProto => "CapnProto",
            Format::CustomSeparated => "CustomSeparated",
            Format::CustomSeparatedIgnoreSpaces => "CustomSeparatedIgnoreSpaces",
            Format::JSONCompactEachRow => "JSONCompactEachRow",
            Format::JSONCompactEachRowWithNamesAndTypes => {
                "JSONCompactEachRowWithNamesAndTypes"
            }
            Format::JSON => "JSON",
            Format::JSONAsString => "JSONAsString",
            Format::JSONCompact => "JSONCompact",
            Format::JSONCompactStringsEachRow => "JSONCompactStringsEachRow",
            Format::JSONCompactStringsEachRowWithNamesAndTypes => {
                "JSONCompactStringsEachRowWithNamesAndTypes"
            }
            Format::JSONCompactStrings => "JSONCompactStrings",
            Format::JSONEachRow => "JSONEachRow",
            Format::JSONEachRowWithProgress => "JSONEachRowWithProgress",
            Format::JSONStringsEachRow => "JSONStringsEachRow",
            Format::JSONStringsEachRowWithProgress => "JSONStringsEachRowWithProgress",
            Format::JSONStringEachRow => "JSONStringEachRow",
            Format::JSONStrings => "JSONStrings",
            Format::LineAsString => "LineAsString",
            Format::Markdown => "Markdown",
            Format::MsgPack => "MsgPack",
            Format::MySQLWire => "MySQLWire",
            Format::Native => "Native",
            Format::Null => "Null",
            Format::ODBCDriver2 => "ODBCDriver2",
            Format::ORC => "ORC",
            Format::Parquet => "Parquet",
            Format::PostgreSQLWire => "PostgreSQLWire",
            Format::Pretty => "Pretty",
            Format::PrettyCompact => "PrettyCompact",
            Format::PrettyCompactMonoBlock => "PrettyCompactMonoBlock",
            Format::PrettyCompactNoEscapes => "PrettyCompactNoEscapes",
            Format::PrettyNoEscapes => "PrettyNoEscapes",
            Format::PrettySpace => "PrettySpace",
            Format::PrettySpaceNoEscapes => "PrettySpaceNoEscapes",
            Format::Protobuf => "Protobuf",
            Format::ProtobufSingle => "ProtobufSingle",
            Format::RawBLOB => "RawBLOB",
            Format::Regexp => "Regexp",
            Format::TSKV => "TSKV",
            Format::TSV => "TSV",
            Format::TSVRaw => "TSVRaw",
            Format::TSVWithNames => "TSVWithNames",
            Format::TSVWithNamesAndTypes => "TSVWithNamesAndTypes",
            Format::Template => "Template",
            Format::TemplateIgnoreSpaces => "TemplateIgnoreSpaces",
            Format::Values => "Values",
            Format::Vertical => "Vertical",
            Format::XML => "XML",
        }
    }

    #[rustfmt::skip]
    pub fn capabilities(&self) -> FormatCapabilities {
        match self {
            Format::RowBinary => FormatCapabilities::new(true, true, true, false, true, None),
            Format::RowBinaryWithNamesAndTypes => FormatCapabilities::new(true, true, true, true, true, Some(Format::RowBinary)),
            Format::TabSeparated => FormatCapabilities::new(true, true, false, false, true, None),
            Format::TabSeparatedRaw => FormatCapabilities::new(true, true, false, false, true, None),
            Format::TabSeparatedWithNames => FormatCapabilities::new(true, true, false, true, true, Some(Format::TabSeparated)),
            Format::TabSeparatedWithNamesAndTypes => FormatCapabilities::new(true, true, false, true, true, Some(Format::TabSeparated)),
            Format::Arrow => FormatCapabilities::new(true, true, true, true, false, None),
            Format::ArrowStream => FormatCapabilities::new(true, true, true, true, false, None),
            Format::Avro => FormatCapabilities::new(true, true, true, true, false, None),
            Format::AvroConfluent => FormatCapabilities::new(true, false, true, false, false, None),
            Format::CSV => FormatCapabilities::new(true, true, false, false, true, None),
            Format::CSVWithNames => FormatCapabilities::new(true, true, false, true, true, Some(Format::CSV)),
            Format::CapnProto => FormatCapabilities::new(true, false, true, false, false, None),
            Format::CustomSeparated => FormatCapabilities::new(true, true, false, false, true, None),
            Format::CustomSeparatedIgnoreSpaces => FormatCapabilities::new(true, true, false, false, true, None),
            Format::JSONCompactEachRow => FormatCapabilities::new(true, true, false, false, true, None),
            Format::JSONCompactEachRowWithNamesAndTypes => FormatCapabilities::new(true, true, false, true, true, None),
            Format::JSON => FormatCapabilities::new(false, true, false, false, false, Some(Format::JSONCompactEachRow)),
            Format::JSONAsString => FormatCapabilities::new(true, false, false, false, false, None),
            Format::JSONCompact => FormatCapabilities::new(false, true, false, false, false, Some(Format::JSONCompactEachRow)),
            Format::JSONCompactStringsEachRow => FormatCapabilities::new(true, true, false, false, true, None),
            Format::JSONCompactStringsEachRowWithNamesAndTypes => FormatCapabilities::new(true, true, false, true, true, Some(Format::JSONCompactStringsEachRow)),
            Format::JSONCompactStrings => FormatCapabilities::new(false, true, false, false, false, Some(Format::JSONCompactStringsEachRow)),
            Format::JSONEachRow => FormatCapabilities::new(true, true, false, false, true, None),
            Format::JSONEachRowWithProgress => FormatCapabilities::new(false, true, false, false, true, Some(Format::JSONEachRow)),
            Format::JSONStringsEachRow => FormatCapabilities::new(true, true, false, false, true, None),
            Format::JSONStringsEachRowWithProgress => FormatCapabilities::new(false, true, false, false, true, Some(Format::JSONStringsEachRow)),
            Format::JSONStringEachRow => FormatCapabilities::new(false, false, false, false, true, Some(Format::JSONStringsEachRow)),
            Format::JSONStrings => FormatCapabilities::new(false, true, false, false, false, Some(Format::JSONStringsEachRow)),
            Format::LineAsString => FormatCapabilities::new(true, false, false, false, true, None),
            Format::Markdown => FormatCapabilities::new(false, true, false, false, true, None),
            Format::MsgPack => FormatCapabilities::new(true, true, true, false, false, None),
            Format::MySQLWire => FormatCapabilities::new(false, true, true, false, false, None),
            Format::Native => FormatCapabilities::new(true, true, true, true, false, None),
            Format::Null => FormatCapabilities::new(false, true, false, false, false, None),
            Format::ODBCDriver2 => FormatCapabilities::new(false, true, true, false, false, None),
            Format::ORC => FormatCapabilities::new(true, false, true, true, false, None),
            Format::Parquet => FormatCapabilities::new(true, true, true, true, false, None),
            Format::PostgreSQLWire => FormatCapabilities::new(false, true, true, false, false, None),
            Format::Pretty => FormatCapabilities::new(false, true, false, false, false, None),
            Format::PrettyCompact => FormatCapabilities::new(false, true, false, false, false, None),
            Format::PrettyCompactMonoBlock => FormatCapabilities::new(false, true, false, false, false, None),
            Format::PrettyCompactNoEscapes => FormatCapabilities::new(false, true, false, false, false, None),
            Format::PrettyNoEscapes => FormatCapabilities::new(false, true, false, false, false, None),
            Format::PrettySpace => FormatCapabilities::new(false, true, false, false, false, None),
            Format::PrettySpaceNoEscapes => FormatCapabilities::new(false, true, false, false, false, None),
            Format::Protobuf => FormatCapabilities::new(true, true, true, true, false, None),
            Format::ProtobufSingle => FormatCapabilities::new(true, true, true, true, false, None),
            Format::RawBLOB => FormatCapabilities::new(true, true, true, false, false, None),
            Format::Regexp => FormatCapabilities::new(true, false, false, false, false, None),
            Format::TSKV => FormatCapabilities::new(true, true, false, false, false, None),
            Format::TSV => FormatCapabilities::new(true, true, false, false, true, None),
            Format::TSVRaw => FormatCapabilities::new(true, true, false, false, true, None),
            Format::TSVWithNames => FormatCapabilities::new(true, true, false, true, true, Some(Format::TSV)),
            Format::TSVWithNamesAndTypes => FormatCapabilities::new(true, true, false, true, true, Some(Format::TSV)),
            Format::Template => FormatCapabilities::new(true, true, false, true, true, None),
            Format::TemplateIgnoreSpaces => FormatCapabilities::new(true, false, false, true, true, None),
            Format::Values => FormatCapabilities::new(true, true, false, false, true, None),
            Format::Vertical => FormatCapabilities::new(false, true, false, false, false, None),
            Format::XML => FormatCapabilities::new(false, true, false, false, false, None),
        }
    }

    pub fn supports_input(&self) -> bool {
        self.capabilities().supports_input
    }

    pub fn supports_output(&self) -> bool {
        self.capabilities().supports_output
    }

    pub fn is_binary(&self) -> bool {
        self.capabilities().is_binary
    }

    pub fn is_text(&self) -> bool {
        !self.is_binary()
    }

    pub fn has_header(&self) -> bool {
        self.capabilities().has_header
    }

    pub fn is_row_based(&self) -> bool {
        self.capabilities().is_row_based
    }

    /// The format to send data in when this one is used for a query's output.
    ///
    /// An explicitly paired format wins; otherwise an input-capable format is
    /// its own default, and the rest fall back to `RowBinary` or
    /// `TabSeparated` depending on whether they are binary.
    pub fn default_input_format(&self) -> Format {
        let capabilities = self.capabilities();
        match capabilities.default_input {
            Some(format) => format,
            None if capabilities.supports_input => *self,
            None if capabilities.is_binary => Format::RowBinary,
            None => Format::TabSeparated,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Format::ALL
            .iter()
            .find(|format| format.name() == name)
            .or_else(|| {
                Format::ALL
                    .iter()
                    .find(|format| format.name().eq_ignore_ascii_case(name))
            })
            .copied()
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        assert_eq!(Format::ALL.len(), 60);
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), *format);
            assert_eq!(format.to_string(), format.name());
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case() {
        assert_eq!("rowbinary".parse::<Format>().unwrap(), Format::RowBinary);
        assert_eq!(" TSV ".parse::<Format>().unwrap(), Format::TSV);
        assert_eq!(
            "Excel".parse::<Format>().unwrap_err(),
            UnknownFormat("Excel".to_string())
        );
    }

    #[test]
    fn test_capabilities() {
        assert!(Format::RowBinary.is_binary());
        assert!(Format::RowBinary.is_row_based());
        assert!(!Format::RowBinary.has_header());
        assert!(Format::RowBinaryWithNamesAndTypes.has_header());
        assert!(Format::CSV.is_text());
        assert!(!Format::Native.is_row_based());
        assert!(!Format::JSON.supports_input());
        // header only counts for output formats
        assert!(!Format::ORC.supports_output());
        assert!(!Format::ORC.has_header());
    }

    #[test]
    fn test_default_input_format() {
        assert_eq!(Format::RowBinary.default_input_format(), Format::RowBinary);
        assert_eq!(
            Format::RowBinaryWithNamesAndTypes.default_input_format(),
            Format::RowBinary
        );
        assert_eq!(Format::JSON.default_input_format(), Format::JSONCompactEachRow);
        assert_eq!(Format::Pretty.default_input_format(), Format::TabSeparated);
        assert_eq!(Format::MySQLWire.default_input_format(), Format::RowBinary);
        assert_eq!(Format::CSV.default_input_format(), Format::CSV);
        for format in Format::ALL {
            assert!(format.default_input_format().supports_input(), "{format}");
        }
    }

    #[test]
    fn test_serde_uses_format_names() {
        assert_eq!(
            serde_json::to_string(&Format::TabSeparatedWithNames).unwrap(),
            "\"TabSeparatedWithNames\""
        );
        let format: Format = serde_json::from_str("\"Parquet\"").unwrap();
        assert_eq!(format, Format::Parquet);
    }
}
