//! # Data Types
//!
//! The closed set of ClickHouse data types a column descriptor can carry, along
//! with the keyword registry used to resolve type names while parsing.
//!
//! Type names resolve case-insensitively. Besides the canonical names the
//! registry knows the SQL-standard and MySQL-compatible aliases accepted by the
//! server, some of which span several words (`TINYINT SIGNED`,
//! `DOUBLE PRECISION`, `NATIONAL CHARACTER VARYING`).

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Whether a type takes a parenthesized parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameters {
    None,
    Optional,
    Required,
}

/// Storage width of a single value of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Always this many bytes.
    Fixed(usize),
    /// Fixed, but the byte count depends on the declared parameters.
    Parameterized,
    Variable,
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Int128,
    UInt128,
    Int256,
    UInt256,
    Float32,
    Float64,
    BFloat16,
    Decimal,
    Decimal32,
    Decimal64,
    Decimal128,
    Decimal256,
    String,
    FixedString,
    Date,
    Date32,
    DateTime,
    DateTime32,
    DateTime64,
    IntervalNanosecond,
    IntervalMicrosecond,
    IntervalMillisecond,
    IntervalSecond,
    IntervalMinute,
    IntervalHour,
    IntervalDay,
    IntervalWeek,
    IntervalMonth,
    IntervalQuarter,
    IntervalYear,
    UUID,
    IPv4,
    IPv6,
    Enum8,
    Enum16,
    Point,
    Ring,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    Nothing,
    JSON,
    Object,
    Dynamic,
    Array,
    Tuple,
    Map,
    Nested,
    Nullable,
    LowCardinality,
    Variant,
    AggregateFunction,
    SimpleAggregateFunction,
}

const ALL_TYPES: &[DataType] = &[
    DataType::Bool,
    DataType::Int8,
    DataType::UInt8,
    DataType::Int16,
    DataType::UInt16,
    DataType::Int32,
    DataType::UInt32,
    DataType::Int64,
    DataType::UInt64,
    DataType::Int128,
    DataType::UInt128,
    DataType::Int256,
    DataType::UInt256,
    DataType::Float32,
    DataType::Float64,
    DataType::BFloat16,
    DataType::Decimal,
    DataType::Decimal32,
    DataType::Decimal64,
    DataType::Decimal128,
    DataType::Decimal256,
    DataType::String,
    DataType::FixedString,
    DataType::Date,
    DataType::Date32,
    DataType::DateTime,
    DataType::DateTime32,
    DataType::DateTime64,
    DataType::IntervalNanosecond,
    DataType::IntervalMicrosecond,
    DataType::IntervalMillisecond,
    DataType::IntervalSecond,
    DataType::IntervalMinute,
    DataType::IntervalHour,
    DataType::IntervalDay,
    DataType::IntervalWeek,
    DataType::IntervalMonth,
    DataType::IntervalQuarter,
    DataType::IntervalYear,
    DataType::UUID,
    DataType::IPv4,
    DataType::IPv6,
    DataType::Enum8,
    DataType::Enum16,
    DataType::Point,
    DataType::Ring,
    DataType::LineString,
    DataType::MultiLineString,
    DataType::Polygon,
    DataType::MultiPolygon,
    DataType::Nothing,
    DataType::JSON,
    DataType::Object,
    DataType::Dynamic,
    DataType::Array,
    DataType::Tuple,
    DataType::Map,
    DataType::Nested,
    DataType::Nullable,
    DataType::LowCardinality,
    DataType::Variant,
    DataType::AggregateFunction,
    DataType::SimpleAggregateFunction,
];

/// Aliases accepted in place of canonical type names.
const ALIASES: &[(&str, DataType)] = &[
    ("BOOLEAN", DataType::Bool),
    ("BYTE", DataType::Int8),
    ("INT1", DataType::Int8),
    ("INT1 SIGNED", DataType::Int8),
    ("TINYINT", DataType::Int8),
    ("TINYINT SIGNED", DataType::Int8),
    ("INT1 UNSIGNED", DataType::UInt8),
    ("TINYINT UNSIGNED", DataType::UInt8),
    ("SMALLINT", DataType::Int16),
    ("SMALLINT SIGNED", DataType::Int16),
    ("SMALLINT UNSIGNED", DataType::UInt16),
    ("YEAR", DataType::UInt16),
    ("INT", DataType::Int32),
    ("INTEGER", DataType::Int32),
    ("MEDIUMINT", DataType::Int32),
    ("INT SIGNED", DataType::Int32),
    ("INTEGER SIGNED", DataType::Int32),
    ("MEDIUMINT SIGNED", DataType::Int32),
    ("INT UNSIGNED", DataType::UInt32),
    ("INTEGER UNSIGNED", DataType::UInt32),
    ("MEDIUMINT UNSIGNED", DataType::UInt32),
    ("BIGINT", DataType::Int64),
    ("BIGINT SIGNED", DataType::Int64),
    ("BIGINT UNSIGNED", DataType::UInt64),
    ("FLOAT", DataType::Float32),
    ("REAL", DataType::Float32),
    ("SINGLE", DataType::Float32),
    ("DOUBLE", DataType::Float64),
    ("DOUBLE PRECISION", DataType::Float64),
    ("DEC", DataType::Decimal),
    ("NUMERIC", DataType::Decimal),
    ("FIXED", DataType::Decimal),
    ("BINARY", DataType::FixedString),
    ("BINARY LARGE OBJECT", DataType::String),
    ("BINARY VARYING", DataType::String),
    ("BLOB", DataType::String),
    ("BYTEA", DataType::String),
    ("CHAR", DataType::String),
    ("CHAR LARGE OBJECT", DataType::String),
    ("CHAR VARYING", DataType::String),
    ("CHARACTER", DataType::String),
    ("CHARACTER LARGE OBJECT", DataType::String),
    ("CHARACTER VARYING", DataType::String),
    ("CLOB", DataType::String),
    ("LONGBLOB", DataType::String),
    ("LONGTEXT", DataType::String),
    ("MEDIUMBLOB", DataType::String),
    ("MEDIUMTEXT", DataType::String),
    ("NATIONAL CHAR", DataType::String),
    ("NATIONAL CHAR VARYING", DataType::String),
    ("NATIONAL CHARACTER", DataType::String),
    ("NATIONAL CHARACTER LARGE OBJECT", DataType::String),
    ("NATIONAL CHARACTER VARYING", DataType::String),
    ("NCHAR", DataType::String),
    ("NCHAR LARGE OBJECT", DataType::String),
    ("NCHAR VARYING", DataType::String),
    ("NVARCHAR", DataType::String),
    ("TEXT", DataType::String),
    ("TINYBLOB", DataType::String),
    ("TINYTEXT", DataType::String),
    ("VARBINARY", DataType::String),
    ("VARCHAR", DataType::String),
    ("VARCHAR2", DataType::String),
    ("TIMESTAMP", DataType::DateTime),
    ("INET4", DataType::IPv4),
    ("INET6", DataType::IPv6),
    // Width is picked from the declared codes.
    ("ENUM", DataType::Enum8),
];

lazy_static! {
    static ref KEYWORDS: HashMap<String, DataType> = {
        let mut keywords = HashMap::with_capacity(ALL_TYPES.len() + ALIASES.len());
        for data_type in ALL_TYPES {
            keywords.insert(data_type.name().to_ascii_uppercase(), *data_type);
        }
        for (alias, data_type) in ALIASES {
            keywords.insert((*alias).to_string(), *data_type);
        }
        keywords
    };
    static ref MAX_KEYWORD_WORDS: usize = ALIASES
        .iter()
        .map(|(alias, _)| alias.split(' ').count())
        .max()
        .unwrap_or(1);
}

/// Resolves a (possibly multi-word) type keyword. Words may be separated by
/// any run of whitespace and compare case-insensitively.
pub fn resolve_keyword(keyword: &str) -> Option<DataType> {
    let normalized = keyword
        .split_ascii_whitespace()
        .map(|word| word.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ");
    KEYWORDS.get(&normalized).copied()
}

/// The largest number of words any registered keyword spans.
pub fn max_keyword_words() -> usize {
    *MAX_KEYWORD_WORDS
}

impl DataType {
    /// Type named by a keyword or alias, e.g. `bigint unsigned`.
    pub fn from_keyword(keyword: &str) -> Option<DataType> {
        resolve_keyword(keyword)
    }

    /// Canonical type name as the server prints it.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "Bool",
            DataType::Int8 => "Int8",
            DataType::UInt8 => "UInt8",
            DataType::Int16 => "Int16",
            DataType::UInt16 => "UInt16",
            DataType::Int32 => "Int32",
            DataType::UInt32 => "UInt32",
            DataType::Int64 => "Int64",
            DataType::UInt64 => "UInt64",
            DataType::Int128 => "Int128",
            DataType::UInt128 => "UInt128",
            DataType::Int256 => "Int256",
            DataType::UInt256 => "UInt256",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
            DataType::BFloat16 => "BFloat16",
            DataType::Decimal => "Decimal",
            DataType::Decimal32 => "Decimal32",
            DataType::Decimal64 => "Decimal64",
            DataType::Decimal128 => "Decimal128",
            DataType::Decimal256 => "Decimal256",
            DataType::String => "String",
            DataType::FixedString => "FixedString",
            DataType::Date => "Date",
            DataType::Date32 => "Date32",
            DataType::DateTime => "DateTime",
            DataType::DateTime32 => "DateTime32",
            DataType::DateTime64 => "DateTime64",
            DataType::IntervalNanosecond => "IntervalNanosecond",
            DataType::IntervalMicrosecond => "IntervalMicrosecond",
            DataType::IntervalMillisecond => "IntervalMillisecond",
            DataType::IntervalSecond => "IntervalSecond",
            DataType::IntervalMinute => "IntervalMinute",
            DataType::IntervalHour => "IntervalHour",
            DataType::IntervalDay => "IntervalDay",
            DataType::IntervalWeek => "IntervalWeek",
            DataType::IntervalMonth => "IntervalMonth",
            DataType::IntervalQuarter => "IntervalQuarter",
            DataType::IntervalYear => "IntervalYear",
            DataType::UUID => "UUID",
            DataType::IPv4 => "IPv4",
            DataType::IPv6 => "IPv6",
            DataType::Enum8 => "Enum8",
            DataType::Enum16 => "Enum16",
            DataType::Point => "Point",
            DataType::Ring => "Ring",
            DataType::LineString => "LineString",
            DataType::MultiLineString => "MultiLineString",
            DataType::Polygon => "Polygon",
            DataType::MultiPolygon => "MultiPolygon",
            DataType::Nothing => "Nothing",
            DataType::JSON => "JSON",
            DataType::Object => "Object",
            DataType::Dynamic => "Dynamic",
            DataType::Array => "Array",
            DataType::Tuple => "Tuple",
            DataType::Map => "Map",
            DataType::Nested => "Nested",
            DataType::Nullable => "Nullable",
            DataType::LowCardinality => "LowCardinality",
            DataType::Variant => "Variant",
            DataType::AggregateFunction => "AggregateFunction",
            DataType::SimpleAggregateFunction => "SimpleAggregateFunction",
        }
    }

    pub fn width(&self) -> Width {
        match self {
            DataType::Bool | DataType::Int8 | DataType::UInt8 | DataType::Enum8 => Width::Fixed(1),
            DataType::Int16
            | DataType::UInt16
            | DataType::BFloat16
            | DataType::Date
            | DataType::Enum16 => Width::Fixed(2),
            DataType::Int32
            | DataType::UInt32
            | DataType::Float32
            | DataType::Decimal32
            | DataType::Date32
            | DataType::DateTime
            | DataType::DateTime32
            | DataType::IPv4 => Width::Fixed(4),
            DataType::Int64
            | DataType::UInt64
            | DataType::Float64
            | DataType::Decimal64
            | DataType::DateTime64
            | DataType::IntervalNanosecond
            | DataType::IntervalMicrosecond
            | DataType::IntervalMillisecond
            | DataType::IntervalSecond
            | DataType::IntervalMinute
            | DataType::IntervalHour
            | DataType::IntervalDay
            | DataType::IntervalWeek
            | DataType::IntervalMonth
            | DataType::IntervalQuarter
            | DataType::IntervalYear => Width::Fixed(8),
            DataType::Int128
            | DataType::UInt128
            | DataType::Decimal128
            | DataType::UUID
            | DataType::IPv6 => Width::Fixed(16),
            DataType::Int256 | DataType::UInt256 | DataType::Decimal256 => Width::Fixed(32),
            DataType::Decimal | DataType::FixedString => Width::Parameterized,
            DataType::String
            | DataType::Point
            | DataType::Ring
            | DataType::LineString
            | DataType::MultiLineString
            | DataType::Polygon
            | DataType::MultiPolygon
            | DataType::Nothing
            | DataType::JSON
            | DataType::Object
            | DataType::Dynamic
            | DataType::Array
            | DataType::Tuple
            | DataType::Map
            | DataType::Nested
            | DataType::Nullable
            | DataType::LowCardinality
            | DataType::Variant
            | DataType::AggregateFunction
            | DataType::SimpleAggregateFunction => Width::Variable,
        }
    }

    pub fn parameters(&self) -> Parameters {
        match self {
            DataType::Decimal
            | DataType::Decimal32
            | DataType::Decimal64
            | DataType::Decimal128
            | DataType::Decimal256
            | DataType::FixedString
            | DataType::DateTime64
            | DataType::Enum8
            | DataType::Enum16
            | DataType::Array
            | DataType::Tuple
            | DataType::Map
            | DataType::Nested
            | DataType::Nullable
            | DataType::LowCardinality
            | DataType::Variant
            | DataType::AggregateFunction
            | DataType::SimpleAggregateFunction => Parameters::Required,
            // String accepts (and ignores) a length, as in VARCHAR(255)
            DataType::String
            | DataType::DateTime
            | DataType::DateTime32
            | DataType::JSON
            | DataType::Object
            | DataType::Dynamic => Parameters::Optional,
            _ => Parameters::None,
        }
    }

    /// Composite types must be declared with a parenthesized parameter list.
    pub fn is_composite(&self) -> bool {
        self.parameters() == Parameters::Required
    }

    /// Intrinsic byte width, if it does not depend on parameters.
    pub fn byte_length(&self) -> Option<usize> {
        match self.width() {
            Width::Fixed(n) => Some(n),
            Width::Parameterized | Width::Variable => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, DataType::Enum8 | DataType::Enum16)
    }

    pub fn is_decimal(&self) -> bool {
        matches!(
            self,
            DataType::Decimal
                | DataType::Decimal32
                | DataType::Decimal64
                | DataType::Decimal128
                | DataType::Decimal256
        )
    }

    pub fn is_aggregate_function(&self) -> bool {
        matches!(
            self,
            DataType::AggregateFunction | DataType::SimpleAggregateFunction
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
