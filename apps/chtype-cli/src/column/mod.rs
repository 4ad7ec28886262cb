//! # Column Descriptors
//!
//! A [`ColumnDescriptor`] is the parsed, immutable description of one column
//! type: its declared name, the declaration text it was read from, the data
//! type, and the facts encoders and decoders need on the hot path (nullability,
//! fixed width, estimated size, array depth, enum code table, aggregate
//! function signature).
//!
//! Descriptors are only built by the parser, through one constructor per kind
//! of type. Each constructor checks the arity and parameter rules of its kind
//! and then computes the derived properties once.
//!
//! ## Sizing policy
//!
//! Only types whose every value has the same width report `fixed_length`:
//! numbers, dates, UUID, IP addresses, enums, `FixedString(N)` and decimals.
//! Wrapper and container types (`Nullable`, `LowCardinality`, `Array`,
//! `Tuple`, `Map`, `Nested`, `Variant`, aggregate states) are always variable
//! length, even when all their members are fixed width. Variable length types
//! report an estimated length of 1.
//!
//! A trailing `NULL` modifier marks the column nullable without changing its
//! width policy; an explicit `Nullable(...)` wrapper does.

mod aggregate;
mod enum_values;

pub use aggregate::AggregateFunction;
pub use enum_values::{EnumConstantError, EnumConstants};

use crate::data_type::{DataType, Width};
use crate::errors::TypeParseError;
use crate::parser::{self, ParserOptions};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Estimated length reported for variable length types.
pub const DEFAULT_ESTIMATED_LENGTH: usize = 1;

/// Kind-specific facts carried by a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDetails {
    None,
    Decimal {
        precision: u8,
        scale: u8,
    },
    FixedString {
        length: usize,
    },
    DateTime {
        precision: Option<u8>,
        timezone: Option<String>,
    },
    Enum {
        constants: EnumConstants,
    },
    Aggregate {
        function: AggregateFunction,
        signature: String,
    },
}

impl TypeDetails {
    fn is_none(&self) -> bool {
        matches!(self, TypeDetails::None)
    }
}

/// What the parser knows about a declaration before its kind is built.
#[derive(Debug, Clone)]
pub(crate) struct Declaration {
    pub(crate) name: String,
    pub(crate) original_type_name: String,
    pub(crate) span: Range<usize>,
    /// `Some(true)` for a trailing `NULL`, `Some(false)` for `NOT NULL`.
    pub(crate) nullable_modifier: Option<bool>,
}

impl Declaration {
    fn invalid(&self, message: impl Into<String>) -> TypeParseError {
        TypeParseError::validation(message, self.span.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    name: String,
    original_type_name: String,
    data_type: DataType,
    nullable: bool,
    low_cardinality: bool,
    fixed_length: bool,
    estimated_length: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nested_columns: Vec<ColumnDescriptor>,
    #[serde(skip_serializing_if = "TypeDetails::is_none")]
    details: TypeDetails,
    #[serde(skip_serializing_if = "is_zero")]
    array_nested_level: usize,
}

fn is_zero(level: &usize) -> bool {
    *level == 0
}

// =========================================================
// Construction, one function per kind
// =========================================================

impl ColumnDescriptor {
    fn build(
        decl: Declaration,
        data_type: DataType,
        nested_columns: Vec<ColumnDescriptor>,
        details: TypeDetails,
    ) -> Self {
        let nullable = match data_type {
            DataType::Nullable => true,
            DataType::LowCardinality => {
                nested_columns.iter().any(|c| c.nullable)
                    || decl.nullable_modifier.unwrap_or(false)
            }
            _ => decl.nullable_modifier.unwrap_or(false),
        };
        let low_cardinality = match data_type {
            DataType::LowCardinality => true,
            DataType::Nullable => nested_columns.iter().any(|c| c.low_cardinality),
            _ => false,
        };
        let byte_length = match (data_type.width(), &details) {
            (Width::Fixed(n), _) => Some(n),
            (Width::Parameterized, TypeDetails::FixedString { length }) => Some(*length),
            (Width::Parameterized, TypeDetails::Decimal { precision, .. }) => {
                Some(decimal_width(*precision))
            }
            _ => None,
        };
        let array_nested_level = match (data_type, nested_columns.first()) {
            (DataType::Array, Some(element)) => element.array_nested_level + 1,
            _ => 0,
        };

        ColumnDescriptor {
            name: decl.name,
            original_type_name: decl.original_type_name,
            data_type,
            nullable,
            low_cardinality,
            fixed_length: byte_length.is_some(),
            estimated_length: byte_length.unwrap_or(DEFAULT_ESTIMATED_LENGTH),
            nested_columns,
            details,
            array_nested_level,
        }
    }

    /// Types declared without parameters.
    pub(crate) fn simple(decl: Declaration, data_type: DataType) -> Result<Self, TypeParseError> {
        if data_type.is_composite() {
            return Err(decl.invalid(format!("{data_type} requires parameters")));
        }
        Ok(Self::build(decl, data_type, Vec::new(), TypeDetails::None))
    }

    pub(crate) fn date_time(
        decl: Declaration,
        data_type: DataType,
        precision: Option<u8>,
        timezone: Option<String>,
    ) -> Result<Self, TypeParseError> {
        match (data_type, precision) {
            (DataType::DateTime64, Some(p)) if p <= 9 => {}
            (DataType::DateTime64, Some(p)) => {
                return Err(decl.invalid(format!(
                    "DateTime64 precision must be between 0 and 9, got {p}"
                )))
            }
            (DataType::DateTime64, None) => {
                return Err(decl.invalid("DateTime64 requires a precision"))
            }
            (DataType::DateTime | DataType::DateTime32, None) => {}
            (other, _) => {
                return Err(decl.invalid(format!("{other} does not take a precision")));
            }
        }
        Ok(Self::build(
            decl,
            data_type,
            Vec::new(),
            TypeDetails::DateTime {
                precision,
                timezone,
            },
        ))
    }

    /// `Decimal(P, S)` takes both values; `DecimalN(S)` only the scale.
    pub(crate) fn decimal(
        decl: Declaration,
        data_type: DataType,
        precision: Option<u64>,
        scale: u64,
    ) -> Result<Self, TypeParseError> {
        let precision = match (data_type, precision) {
            (DataType::Decimal, Some(p)) if (1..=76).contains(&p) => p,
            (DataType::Decimal, Some(p)) => {
                return Err(decl.invalid(format!(
                    "Decimal precision must be between 1 and 76, got {p}"
                )))
            }
            (DataType::Decimal32, None) => 9,
            (DataType::Decimal64, None) => 18,
            (DataType::Decimal128, None) => 38,
            (DataType::Decimal256, None) => 76,
            (other, _) => {
                return Err(decl.invalid(format!("unexpected parameters for {other}")));
            }
        };
        if scale > precision {
            return Err(decl.invalid(format!(
                "scale {scale} exceeds precision {precision} of {data_type}"
            )));
        }
        // both bounded by 76 above
        let details = TypeDetails::Decimal {
            precision: precision as u8,
            scale: scale as u8,
        };
        Ok(Self::build(decl, data_type, Vec::new(), details))
    }

    pub(crate) fn fixed_string(decl: Declaration, length: u64) -> Result<Self, TypeParseError> {
        let length = usize::try_from(length)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| decl.invalid(format!("invalid FixedString length {length}")))?;
        Ok(Self::build(
            decl,
            DataType::FixedString,
            Vec::new(),
            TypeDetails::FixedString { length },
        ))
    }

    pub(crate) fn enumeration(
        decl: Declaration,
        data_type: DataType,
        constants: EnumConstants,
    ) -> Result<Self, TypeParseError> {
        match data_type {
            DataType::Enum8 if !constants.fits_in_8_bits() => {
                return Err(decl.invalid("Enum8 values must fit in a signed byte"));
            }
            DataType::Enum8 | DataType::Enum16 => {}
            other => return Err(decl.invalid(format!("{other} is not an enum type"))),
        }
        if constants.is_empty() {
            return Err(decl.invalid(format!("{data_type} requires at least one constant")));
        }
        Ok(Self::build(
            decl,
            data_type,
            Vec::new(),
            TypeDetails::Enum { constants },
        ))
    }

    /// `Array(T)`, `Nullable(T)` and `LowCardinality(T)` wrap exactly one type.
    pub(crate) fn wrapper(
        decl: Declaration,
        data_type: DataType,
        inner: Vec<ColumnDescriptor>,
    ) -> Result<Self, TypeParseError> {
        if !matches!(
            data_type,
            DataType::Array | DataType::Nullable | DataType::LowCardinality
        ) {
            return Err(decl.invalid(format!("{data_type} is not a wrapper type")));
        }
        if inner.len() != 1 {
            return Err(decl.invalid(format!(
                "{data_type} takes exactly one type argument, got {}",
                inner.len()
            )));
        }
        Ok(Self::build(decl, data_type, inner, TypeDetails::None))
    }

    pub(crate) fn tuple(
        decl: Declaration,
        elements: Vec<ColumnDescriptor>,
    ) -> Result<Self, TypeParseError> {
        Ok(Self::build(decl, DataType::Tuple, elements, TypeDetails::None))
    }

    pub(crate) fn nested(
        decl: Declaration,
        fields: Vec<ColumnDescriptor>,
    ) -> Result<Self, TypeParseError> {
        if fields.is_empty() {
            return Err(decl.invalid("Nested requires at least one field"));
        }
        if let Some(position) = fields.iter().position(|f| f.name.is_empty()) {
            return Err(decl.invalid(format!("Nested field #{} has no name", position + 1)));
        }
        Ok(Self::build(decl, DataType::Nested, fields, TypeDetails::None))
    }

    pub(crate) fn map(
        decl: Declaration,
        key_value: Vec<ColumnDescriptor>,
    ) -> Result<Self, TypeParseError> {
        if key_value.len() != 2 {
            return Err(decl.invalid(format!(
                "Map takes a key and a value type, got {} type arguments",
                key_value.len()
            )));
        }
        Ok(Self::build(decl, DataType::Map, key_value, TypeDetails::None))
    }

    pub(crate) fn variant(
        decl: Declaration,
        alternatives: Vec<ColumnDescriptor>,
    ) -> Result<Self, TypeParseError> {
        if alternatives.is_empty() {
            return Err(decl.invalid("Variant requires at least one type"));
        }
        Ok(Self::build(
            decl,
            DataType::Variant,
            alternatives,
            TypeDetails::None,
        ))
    }

    pub(crate) fn aggregate(
        decl: Declaration,
        data_type: DataType,
        function: AggregateFunction,
        signature: String,
        arguments: Vec<ColumnDescriptor>,
    ) -> Result<Self, TypeParseError> {
        match data_type {
            DataType::SimpleAggregateFunction if arguments.is_empty() => {
                return Err(decl.invalid("SimpleAggregateFunction requires an argument type"));
            }
            DataType::AggregateFunction | DataType::SimpleAggregateFunction => {}
            other => return Err(decl.invalid(format!("{other} is not an aggregate type"))),
        }
        Ok(Self::build(
            decl,
            data_type,
            arguments,
            TypeDetails::Aggregate {
                function,
                signature,
            },
        ))
    }
}

impl ColumnDescriptor {
    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

fn decimal_width(precision: u8) -> usize {
    match precision {
        0..=9 => 4,
        10..=18 => 8,
        19..=38 => 16,
        _ => 32,
    }
}

// =========================================================
// Entry points and accessors
// =========================================================

impl ColumnDescriptor {
    /// Parses a single type declaration for a column called `name`.
    pub fn of(name: &str, type_name: &str) -> Result<Self, TypeParseError> {
        parser::of(name, type_name)
    }

    /// Parses a comma-separated list of `name Type` declarations.
    pub fn parse(declaration: &str) -> Result<Vec<Self>, TypeParseError> {
        parser::parse(declaration)
    }

    pub fn parse_with(
        declaration: &str,
        options: &ParserOptions,
    ) -> Result<Vec<Self>, TypeParseError> {
        parser::parse_with(declaration, options)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trimmed declaration text this descriptor was read from, excluding
    /// the column name and any `DEFAULT`/`MATERIALIZED` clause.
    pub fn original_type_name(&self) -> &str {
        &self.original_type_name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_low_cardinality(&self) -> bool {
        self.low_cardinality
    }

    pub fn is_fixed_length(&self) -> bool {
        self.fixed_length
    }

    pub fn estimated_length(&self) -> usize {
        self.estimated_length
    }

    pub fn nested_columns(&self) -> &[ColumnDescriptor] {
        &self.nested_columns
    }

    pub fn details(&self) -> &TypeDetails {
        &self.details
    }

    pub fn key_info(&self) -> Option<&ColumnDescriptor> {
        match self.data_type {
            DataType::Map => self.nested_columns.first(),
            _ => None,
        }
    }

    pub fn value_info(&self) -> Option<&ColumnDescriptor> {
        match self.data_type {
            DataType::Map => self.nested_columns.get(1),
            _ => None,
        }
    }

    /// Number of directly nested `Array` layers, 0 for non-array types.
    pub fn array_nested_level(&self) -> usize {
        self.array_nested_level
    }

    /// The innermost non-array element type, `None` for non-array types.
    pub fn array_base_column(&self) -> Option<&ColumnDescriptor> {
        if self.data_type != DataType::Array {
            return None;
        }
        let mut column = self;
        while column.data_type == DataType::Array {
            column = column.nested_columns.first()?;
        }
        Some(column)
    }

    /// The descriptor below any `Nullable`/`LowCardinality` wrappers.
    pub fn unwrapped(&self) -> &ColumnDescriptor {
        let mut column = self;
        while matches!(
            column.data_type,
            DataType::Nullable | DataType::LowCardinality
        ) {
            match column.nested_columns.first() {
                Some(inner) => column = inner,
                None => break,
            }
        }
        column
    }

    pub fn enum_constants(&self) -> Option<&EnumConstants> {
        match &self.details {
            TypeDetails::Enum { constants } => Some(constants),
            _ => None,
        }
    }

    pub fn aggregate_function(&self) -> Option<AggregateFunction> {
        match &self.details {
            TypeDetails::Aggregate { function, .. } => Some(*function),
            _ => None,
        }
    }

    /// Normalized function signature, e.g. `quantiles(0.5,0.9)`.
    pub fn function(&self) -> Option<&str> {
        match &self.details {
            TypeDetails::Aggregate { signature, .. } => Some(signature),
            _ => None,
        }
    }

    pub fn precision(&self) -> Option<u8> {
        match &self.details {
            TypeDetails::Decimal { precision, .. } => Some(*precision),
            TypeDetails::DateTime { precision, .. } => *precision,
            _ => None,
        }
    }

    pub fn scale(&self) -> Option<u8> {
        match &self.details {
            TypeDetails::Decimal { scale, .. } => Some(*scale),
            _ => None,
        }
    }

    pub fn timezone(&self) -> Option<&str> {
        match &self.details {
            TypeDetails::DateTime { timezone, .. } => timezone.as_deref(),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        self.data_type == DataType::Array
    }

    pub fn is_tuple(&self) -> bool {
        self.data_type == DataType::Tuple
    }

    pub fn is_map(&self) -> bool {
        self.data_type == DataType::Map
    }

    pub fn is_nested(&self) -> bool {
        self.data_type == DataType::Nested
    }

    pub fn is_enum(&self) -> bool {
        self.data_type.is_enum()
    }

    pub fn is_aggregate_function(&self) -> bool {
        self.data_type.is_aggregate_function()
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.original_type_name)
        } else {
            write!(
                f,
                "{} {}",
                quote_identifier(&self.name),
                self.original_type_name
            )
        }
    }
}

/// Backtick-quotes `name` unless it is a plain identifier.
pub fn quote_identifier(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(original: &str) -> Declaration {
        Declaration {
            name: String::new(),
            original_type_name: original.to_string(),
            span: 0..original.len(),
            nullable_modifier: None,
        }
    }

    fn uint8() -> ColumnDescriptor {
        ColumnDescriptor::simple(decl("UInt8"), DataType::UInt8).unwrap()
    }

    #[test]
    fn test_simple_fixed_width() {
        let column = uint8();
        assert!(column.is_fixed_length());
        assert_eq!(column.estimated_length(), 1);
        assert!(!column.is_nullable());
        assert_eq!(column.array_nested_level(), 0);
        assert!(column.array_base_column().is_none());
    }

    #[test]
    fn test_trailing_null_keeps_width() {
        let mut d = decl("UInt8 null");
        d.nullable_modifier = Some(true);
        let column = ColumnDescriptor::simple(d, DataType::UInt8).unwrap();
        assert!(column.is_nullable());
        assert!(column.is_fixed_length());
        assert_eq!(column.estimated_length(), 1);
    }

    #[test]
    fn test_wrappers_are_variable_length() {
        let nullable =
            ColumnDescriptor::wrapper(decl("Nullable(UInt8)"), DataType::Nullable, vec![uint8()])
                .unwrap();
        assert!(nullable.is_nullable());
        assert!(!nullable.is_fixed_length());
        assert_eq!(nullable.estimated_length(), DEFAULT_ESTIMATED_LENGTH);

        let mut not_null = decl("LowCardinality(Nullable(UInt8)) NOT NULL");
        not_null.nullable_modifier = Some(false);
        let low = ColumnDescriptor::wrapper(not_null, DataType::LowCardinality, vec![nullable])
            .unwrap();
        assert!(low.is_low_cardinality());
        assert!(low.is_nullable());
        assert_eq!(low.unwrapped().data_type(), DataType::UInt8);
    }

    #[test]
    fn test_wrapper_arity() {
        let err = ColumnDescriptor::wrapper(
            decl("Array(UInt8, UInt8)"),
            DataType::Array,
            vec![uint8(), uint8()],
        )
        .unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn test_map_requires_two_arguments() {
        assert!(ColumnDescriptor::map(decl("Map(UInt8)"), vec![uint8()]).is_err());
        let map = ColumnDescriptor::map(decl("Map(UInt8, UInt8)"), vec![uint8(), uint8()]).unwrap();
        assert_eq!(map.key_info().unwrap().data_type(), DataType::UInt8);
        assert!(map.value_info().is_some());
        assert!(!map.is_fixed_length());
        assert!(uint8().key_info().is_none());
    }

    #[test]
    fn test_tuple_of_fixed_members_is_variable_length() {
        let tuple =
            ColumnDescriptor::tuple(decl("Tuple(UInt8, UInt8)"), vec![uint8(), uint8()]).unwrap();
        assert!(!tuple.is_fixed_length());
        assert_eq!(tuple.estimated_length(), 1);
    }

    #[test]
    fn test_decimal_widths() {
        let d = ColumnDescriptor::decimal(decl("Decimal(10, 2)"), DataType::Decimal, Some(10), 2)
            .unwrap();
        assert!(d.is_fixed_length());
        assert_eq!(d.estimated_length(), 8);
        assert_eq!(d.precision(), Some(10));
        assert_eq!(d.scale(), Some(2));

        let d = ColumnDescriptor::decimal(decl("Decimal128(4)"), DataType::Decimal128, None, 4)
            .unwrap();
        assert_eq!(d.estimated_length(), 16);
        assert_eq!(d.precision(), Some(38));

        assert!(
            ColumnDescriptor::decimal(decl("Decimal(3, 5)"), DataType::Decimal, Some(3), 5)
                .is_err()
        );
        assert!(
            ColumnDescriptor::decimal(decl("Decimal(80, 5)"), DataType::Decimal, Some(80), 5)
                .is_err()
        );
    }

    #[test]
    fn test_fixed_string_length() {
        let fs = ColumnDescriptor::fixed_string(decl("FixedString(233)"), 233).unwrap();
        assert!(fs.is_fixed_length());
        assert_eq!(fs.estimated_length(), 233);
        assert!(ColumnDescriptor::fixed_string(decl("FixedString(0)"), 0).is_err());
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("k1"), "k1");
        assert_eq!(quote_identifier("b b"), "`b b`");
        assert_eq!(quote_identifier("a`b"), "`a``b`");
        assert_eq!(quote_identifier("1a"), "`1a`");
    }
}
