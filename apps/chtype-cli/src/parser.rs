//! # Column Declaration Parser
//!
//! Recursive descent over a declaration string such as
//!
//! ```text
//! id UInt64, tags Array(LowCardinality(String)), state AggregateFunction(uniq, UInt64)
//! ```
//!
//! Each call to [`read_column`] consumes one `[name] Type [modifiers]`
//! declaration and stops at the next top-level `,` or `)`. Composite types
//! recurse on the byte window between their parentheses, so no substring is
//! copied until a descriptor field needs an owned value.
//!
//! Column names are only looked for where the server allows them: at the top
//! level and inside `Tuple(...)`/`Nested(...)`. A leading identifier is taken
//! as a name when the following word starts a type keyword, which keeps
//! multi-word aliases such as `INT1 UNSIGNED` and columns named after types
//! (`Date Date`) apart.

use crate::column::{AggregateFunction, ColumnDescriptor, Declaration, EnumConstants};
use crate::data_type::{max_keyword_words, DataType};
use crate::errors::TypeParseError;
use crate::scanner::{Scanner, Token};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, trace};

pub const DEFAULT_MAX_DEPTH: usize = 64;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Deepest type nesting accepted before failing.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Words that may follow a column type without being part of it.
const MODIFIERS: &[&str] = &[
    "NULL",
    "NOT",
    "DEFAULT",
    "MATERIALIZED",
    "ALIAS",
    "EPHEMERAL",
    "CODEC",
    "TTL",
    "COMMENT",
];

/// Clauses that are skipped up to the next top-level delimiter.
const CLAUSES: &[&str] = &[
    "DEFAULT",
    "MATERIALIZED",
    "ALIAS",
    "EPHEMERAL",
    "CODEC",
    "TTL",
    "COMMENT",
];

fn is_one_of(word: &str, words: &[&str]) -> bool {
    words.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// Parses one declaration starting at `start` and appends it to `columns`.
///
/// Returns the index of the top-level `,` or `)` that ended the declaration,
/// or `end` when the window was consumed. `parent` is the composite type whose
/// argument list is being read, `None` at the top level.
pub fn read_column(
    text: &str,
    start: usize,
    end: usize,
    parent: Option<DataType>,
    columns: &mut Vec<ColumnDescriptor>,
) -> Result<usize, TypeParseError> {
    let options = ParserOptions::default();
    let builder = Builder::new(text, &options);
    builder.read(
        start,
        end.min(text.len()),
        parent,
        NameRule::Optional,
        0,
        columns,
    )
}

/// Parses a comma-separated list of column declarations.
pub fn parse(declaration: &str) -> Result<Vec<ColumnDescriptor>, TypeParseError> {
    parse_with(declaration, &ParserOptions::default())
}

pub fn parse_with(
    declaration: &str,
    options: &ParserOptions,
) -> Result<Vec<ColumnDescriptor>, TypeParseError> {
    let builder = Builder::new(declaration, options);
    let end = declaration.len();
    let mut columns = Vec::new();
    let mut pos = builder.scanner.skip_spaces(0, end);
    if pos >= end {
        return Ok(columns);
    }

    loop {
        let next = builder.read(pos, end, None, NameRule::Optional, 0, &mut columns)?;
        match builder.scanner.byte_at(next, end) {
            None => break,
            Some(b',') => pos = next + 1,
            Some(_) => {
                return Err(TypeParseError::syntax(
                    "unbalanced ')' in column list",
                    next..next + 1,
                ))
            }
        }
    }

    debug!("Parsed {} column(s) from '{}'", columns.len(), declaration);
    Ok(columns)
}

/// Parses a single type declaration for the column `name`. The text is never
/// scanned for a name prefix, and anything after the type other than
/// `NULL`/`NOT NULL` or a default-value clause is an error.
pub fn of(name: &str, type_name: &str) -> Result<ColumnDescriptor, TypeParseError> {
    of_with(name, type_name, &ParserOptions::default())
}

pub fn of_with(
    name: &str,
    type_name: &str,
    options: &ParserOptions,
) -> Result<ColumnDescriptor, TypeParseError> {
    let builder = Builder::new(type_name, options);
    let end = type_name.len();
    let mut columns = Vec::with_capacity(1);
    let next = builder.read(0, end, None, NameRule::Forbidden, 0, &mut columns)?;
    if next < end {
        return Err(TypeParseError::syntax(
            format!("unexpected '{}' after type", &type_name[next..]),
            next..end,
        ));
    }
    let column = columns
        .pop()
        .ok_or_else(|| TypeParseError::syntax("empty type declaration", 0..end))?;
    debug!("Parsed column '{}' of type {}", name, column.data_type());
    Ok(column.with_name(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameRule {
    Optional,
    Forbidden,
}

/// A resolved type keyword, possibly spanning several words.
#[derive(Debug, Clone)]
struct Keyword {
    data_type: DataType,
    span: Range<usize>,
    words: usize,
}

/// What follows the core type up to the end of the declaration.
#[derive(Debug)]
struct Tail {
    type_end: usize,
    next: usize,
    nullable: Option<bool>,
}

struct Builder<'a> {
    scanner: Scanner<'a>,
    text: &'a str,
    options: &'a ParserOptions,
}

impl<'a> Builder<'a> {
    fn new(text: &'a str, options: &'a ParserOptions) -> Self {
        Self {
            scanner: Scanner::new(text),
            text,
            options,
        }
    }

    fn read(
        &self,
        start: usize,
        end: usize,
        parent: Option<DataType>,
        names: NameRule,
        depth: usize,
        columns: &mut Vec<ColumnDescriptor>,
    ) -> Result<usize, TypeParseError> {
        if depth > self.options.max_depth {
            return Err(TypeParseError::validation(
                format!(
                    "type nesting exceeds the maximum depth of {}",
                    self.options.max_depth
                ),
                start..end,
            ));
        }

        let mut pos = self.scanner.skip_spaces(start, end);
        let names_allowed = names == NameRule::Optional
            && matches!(parent, None | Some(DataType::Tuple) | Some(DataType::Nested));
        let mut name = String::new();
        if names_allowed {
            if let Some((column_name, next)) = self.read_column_name(pos, end)? {
                name = column_name;
                pos = self.scanner.skip_spaces(next, end);
            }
        }

        let keyword = self.read_keyword(pos, end)?;
        let (params, core_end) = self.read_parameters(&keyword, end)?;
        let tail = self.read_tail(core_end, end)?;

        let span = keyword.span.start..tail.type_end;
        let decl = Declaration {
            name,
            original_type_name: self.text[span.clone()].trim().to_string(),
            span,
            nullable_modifier: tail.nullable,
        };
        let column = self.build(decl, &keyword, params, depth)?;
        trace!(
            "Read {} '{}' at depth {}",
            column.data_type(),
            column.original_type_name(),
            depth
        );
        columns.push(column);
        Ok(tail.next)
    }

    /// Returns the column name at `pos` if the declaration starts with one.
    fn read_column_name(
        &self,
        pos: usize,
        end: usize,
    ) -> Result<Option<(String, usize)>, TypeParseError> {
        match self.scanner.next_token(pos, end)? {
            Some((Token::BacktickQuoted(_) | Token::DoubleQuoted(_), _)) => {
                let (name, next) = self.scanner.read_identifier(pos, end)?;
                Ok(Some((name.into_owned(), next)))
            }
            Some((Token::Identifier(word), span)) => {
                let here = self.keyword_at(span.start, end)?;
                if here.as_ref().is_some_and(|k| k.words > 1) {
                    return Ok(None);
                }
                let named = match self.scanner.next_token(span.end, end)? {
                    Some((Token::Identifier(next_word), next_span)) => {
                        self.keyword_at(next_span.start, end)?.is_some()
                            || (here.is_none() && !is_one_of(next_word, MODIFIERS))
                    }
                    _ => false,
                };
                Ok(named.then(|| (word.to_string(), span.end)))
            }
            _ => Ok(None),
        }
    }

    /// Longest registered keyword made of the words starting at `pos`.
    fn keyword_at(&self, pos: usize, end: usize) -> Result<Option<Keyword>, TypeParseError> {
        let mut words: Vec<Range<usize>> = Vec::new();
        let mut cursor = pos;
        while words.len() < max_keyword_words() {
            match self.scanner.next_token(cursor, end)? {
                Some((Token::Identifier(_), span)) => {
                    cursor = span.end;
                    words.push(span);
                }
                _ => break,
            }
        }

        for count in (1..=words.len()).rev() {
            let span = words[0].start..words[count - 1].end;
            if let Some(data_type) = DataType::from_keyword(&self.text[span.clone()]) {
                return Ok(Some(Keyword {
                    data_type,
                    span,
                    words: count,
                }));
            }
        }
        Ok(None)
    }

    fn read_keyword(&self, pos: usize, end: usize) -> Result<Keyword, TypeParseError> {
        if let Some(keyword) = self.keyword_at(pos, end)? {
            return Ok(keyword);
        }
        match self.scanner.next_token(pos, end)? {
            Some((Token::Identifier(word), span)) => Err(TypeParseError::unknown_type(word, span)),
            Some((token, span)) => Err(TypeParseError::syntax(
                format!("expected type name, found {}", token.describe()),
                span,
            )),
            None => Err(TypeParseError::syntax(
                "expected type name, found end of input",
                end..end,
            )),
        }
    }

    /// Finds the parenthesized parameter window following a keyword, if any.
    /// Returns the window and the index just past the closing parenthesis.
    fn read_parameters(
        &self,
        keyword: &Keyword,
        end: usize,
    ) -> Result<(Option<Range<usize>>, usize), TypeParseError> {
        match self.scanner.next_token(keyword.span.end, end)? {
            Some((Token::LeftParen, open)) => {
                let close = self.find_closing_paren(open.clone(), end)?;
                Ok((Some(open.end..close), close + 1))
            }
            _ => Ok((None, keyword.span.end)),
        }
    }

    fn find_closing_paren(&self, open: Range<usize>, end: usize) -> Result<usize, TypeParseError> {
        let close = self.scanner.find_top_level_delimiter(open.end, end, b")")?;
        if close >= end {
            return Err(TypeParseError::syntax("unclosed parenthesis", open.start..end));
        }
        Ok(close)
    }

    fn read_tail(&self, start: usize, end: usize) -> Result<Tail, TypeParseError> {
        let mut tail = Tail {
            type_end: start,
            next: end,
            nullable: None,
        };
        let mut pos = start;
        while let Some((token, span)) = self.scanner.next_token(pos, end)? {
            match token {
                Token::Comma | Token::RightParen => {
                    tail.next = span.start;
                    return Ok(tail);
                }
                Token::Identifier(word) if word.eq_ignore_ascii_case("NULL") => {
                    tail.nullable = Some(true);
                    tail.type_end = span.end;
                    pos = span.end;
                }
                Token::Identifier(word) if word.eq_ignore_ascii_case("NOT") => {
                    match self.scanner.next_token(span.end, end)? {
                        Some((Token::Identifier(null), null_span))
                            if null.eq_ignore_ascii_case("NULL") =>
                        {
                            tail.nullable = Some(false);
                            tail.type_end = null_span.end;
                            pos = null_span.end;
                        }
                        _ => return Err(TypeParseError::syntax("expected NULL after NOT", span)),
                    }
                }
                Token::Identifier(word) if is_one_of(word, CLAUSES) => {
                    tail.next = self
                        .scanner
                        .find_top_level_delimiter(span.end, end, b",)")?;
                    return Ok(tail);
                }
                other => {
                    return Err(TypeParseError::syntax(
                        format!("unexpected {} after column type", other.describe()),
                        span,
                    ))
                }
            }
        }
        Ok(tail)
    }

    fn build(
        &self,
        decl: Declaration,
        keyword: &Keyword,
        params: Option<Range<usize>>,
        depth: usize,
    ) -> Result<ColumnDescriptor, TypeParseError> {
        let data_type = keyword.data_type;
        let Some(params) = params else {
            return ColumnDescriptor::simple(decl, data_type);
        };

        match data_type {
            DataType::Array | DataType::Nullable | DataType::LowCardinality => {
                let inner = self.read_arguments(params, data_type, depth)?;
                ColumnDescriptor::wrapper(decl, data_type, inner)
            }
            DataType::Tuple => {
                let elements = self.read_arguments(params, data_type, depth)?;
                ColumnDescriptor::tuple(decl, elements)
            }
            DataType::Nested => {
                let fields = self.read_arguments(params, data_type, depth)?;
                ColumnDescriptor::nested(decl, fields)
            }
            DataType::Map => {
                let key_value = self.read_arguments(params, data_type, depth)?;
                ColumnDescriptor::map(decl, key_value)
            }
            DataType::Variant => {
                let alternatives = self.read_arguments(params, data_type, depth)?;
                ColumnDescriptor::variant(decl, alternatives)
            }
            _ if data_type.is_decimal() => self.build_decimal(decl, data_type, params),
            DataType::FixedString => {
                let length = match self.split_top_level(params)?.as_slice() {
                    [piece] => self.read_unsigned(piece.clone(), "FixedString length")?,
                    _ => {
                        return Err(TypeParseError::validation(
                            "FixedString takes exactly one length parameter",
                            decl.span,
                        ))
                    }
                };
                ColumnDescriptor::fixed_string(decl, length)
            }
            DataType::DateTime | DataType::DateTime32 | DataType::DateTime64 => {
                self.build_date_time(decl, data_type, params)
            }
            DataType::Enum8 | DataType::Enum16 => self.build_enum(decl, keyword, params),
            DataType::AggregateFunction | DataType::SimpleAggregateFunction => {
                self.build_aggregate(decl, data_type, params, depth)
            }
            // VARCHAR(255) and JSON(max_dynamic_paths = 10) parameters carry no type information
            DataType::String | DataType::JSON | DataType::Object | DataType::Dynamic => {
                ColumnDescriptor::simple(decl, data_type)
            }
            other => Err(TypeParseError::validation(
                format!("{other} does not take parameters"),
                decl.span,
            )),
        }
    }

    /// Reads the comma-separated type arguments of a composite type.
    fn read_arguments(
        &self,
        params: Range<usize>,
        parent: DataType,
        depth: usize,
    ) -> Result<Vec<ColumnDescriptor>, TypeParseError> {
        let mut columns = Vec::new();
        let mut pos = params.start;
        if self.scanner.skip_spaces(pos, params.end) >= params.end {
            return Ok(columns);
        }

        loop {
            let next = self.read(
                pos,
                params.end,
                Some(parent),
                NameRule::Optional,
                depth + 1,
                &mut columns,
            )?;
            match self.scanner.byte_at(next, params.end) {
                None => return Ok(columns),
                Some(b',') => pos = next + 1,
                Some(_) => {
                    return Err(TypeParseError::syntax(
                        format!("unexpected ')' in {parent} arguments"),
                        next..next + 1,
                    ))
                }
            }
        }
    }

    /// Splits a parameter window at top-level commas into trimmed pieces.
    fn split_top_level(&self, params: Range<usize>) -> Result<Vec<Range<usize>>, TypeParseError> {
        let mut pieces = Vec::new();
        if self.scanner.skip_spaces(params.start, params.end) >= params.end {
            return Ok(pieces);
        }

        let mut pos = params.start;
        loop {
            let delimiter = self
                .scanner
                .find_top_level_delimiter(pos, params.end, b",")?;
            let start = self.scanner.skip_spaces(pos, delimiter);
            let trimmed = self.text[start..delimiter].trim_end().len();
            pieces.push(start..start + trimmed);
            if delimiter >= params.end {
                return Ok(pieces);
            }
            pos = delimiter + 1;
        }
    }

    fn read_integer(&self, piece: Range<usize>, what: &str) -> Result<i64, TypeParseError> {
        let piece = self.scanner.skip_spaces(piece.start, piece.end)..piece.end;
        match self.scanner.next_token(piece.start, piece.end)? {
            Some((Token::Number(number), span)) if span.end == piece.end => {
                number.parse::<i64>().map_err(|_| {
                    TypeParseError::validation(
                        format!("{what} must be an integer, found {number}"),
                        span,
                    )
                })
            }
            _ => Err(TypeParseError::validation(
                format!(
                    "{what} must be an integer, found '{}'",
                    &self.text[piece.clone()]
                ),
                piece,
            )),
        }
    }

    fn read_unsigned(&self, piece: Range<usize>, what: &str) -> Result<u64, TypeParseError> {
        let value = self.read_integer(piece.clone(), what)?;
        u64::try_from(value).map_err(|_| {
            TypeParseError::validation(format!("{what} must not be negative, found {value}"), piece)
        })
    }

    fn read_timezone(&self, piece: Range<usize>) -> Result<String, TypeParseError> {
        let (timezone, next) = self
            .scanner
            .read_single_quoted_literal(piece.start, piece.end)?;
        self.expect_end(next, piece.end)?;
        Ok(timezone)
    }

    fn expect_end(&self, pos: usize, end: usize) -> Result<(), TypeParseError> {
        match self.scanner.next_token(pos, end)? {
            None => Ok(()),
            Some((token, span)) => Err(TypeParseError::syntax(
                format!("unexpected {}", token.describe()),
                span,
            )),
        }
    }

    fn build_decimal(
        &self,
        decl: Declaration,
        data_type: DataType,
        params: Range<usize>,
    ) -> Result<ColumnDescriptor, TypeParseError> {
        let values = self
            .split_top_level(params)?
            .into_iter()
            .map(|piece| self.read_unsigned(piece, "Decimal parameter"))
            .collect::<Result<Vec<_>, _>>()?;
        let (precision, scale) = match (data_type, values.as_slice()) {
            (DataType::Decimal, [precision]) => (Some(*precision), 0),
            (DataType::Decimal, [precision, scale]) => (Some(*precision), *scale),
            (DataType::Decimal, _) => {
                return Err(TypeParseError::validation(
                    "Decimal takes a precision and an optional scale",
                    decl.span,
                ))
            }
            (_, [scale]) => (None, *scale),
            (other, _) => {
                return Err(TypeParseError::validation(
                    format!("{other} takes exactly one scale parameter"),
                    decl.span,
                ))
            }
        };
        ColumnDescriptor::decimal(decl, data_type, precision, scale)
    }

    fn build_date_time(
        &self,
        decl: Declaration,
        data_type: DataType,
        params: Range<usize>,
    ) -> Result<ColumnDescriptor, TypeParseError> {
        let pieces = self.split_top_level(params)?;
        let (precision, timezone) = match (data_type, pieces.as_slice()) {
            (DataType::DateTime64, [precision]) => (Some(precision.clone()), None),
            (DataType::DateTime64, [precision, timezone]) => {
                (Some(precision.clone()), Some(timezone.clone()))
            }
            (DataType::DateTime64, _) => {
                return Err(TypeParseError::validation(
                    "DateTime64 takes a precision and an optional time zone",
                    decl.span,
                ))
            }
            (_, []) => (None, None),
            (_, [timezone]) => (None, Some(timezone.clone())),
            (other, _) => {
                return Err(TypeParseError::validation(
                    format!("{other} takes at most one time zone parameter"),
                    decl.span,
                ))
            }
        };

        let precision = match precision {
            Some(piece) => {
                let value = self.read_unsigned(piece, "DateTime64 precision")?;
                Some(u8::try_from(value).unwrap_or(u8::MAX))
            }
            None => None,
        };
        let timezone = timezone
            .map(|piece| self.read_timezone(piece))
            .transpose()?;
        ColumnDescriptor::date_time(decl, data_type, precision, timezone)
    }

    fn build_enum(
        &self,
        decl: Declaration,
        keyword: &Keyword,
        params: Range<usize>,
    ) -> Result<ColumnDescriptor, TypeParseError> {
        let mut constants = EnumConstants::default();
        for piece in self.split_top_level(params)? {
            self.read_enum_constant(piece, &mut constants)?;
        }

        let data_type = if self.text[keyword.span.clone()].eq_ignore_ascii_case("Enum") {
            if constants.fits_in_8_bits() {
                DataType::Enum8
            } else {
                DataType::Enum16
            }
        } else {
            keyword.data_type
        };
        ColumnDescriptor::enumeration(decl, data_type, constants)
    }

    /// Reads one `'name' = code` pair.
    fn read_enum_constant(
        &self,
        piece: Range<usize>,
        constants: &mut EnumConstants,
    ) -> Result<(), TypeParseError> {
        let (name, pos) = match self.scanner.next_token(piece.start, piece.end)? {
            Some((Token::StringLiteral(_), _)) => self
                .scanner
                .read_single_quoted_literal(piece.start, piece.end)?,
            _ => {
                return Err(TypeParseError::validation(
                    format!(
                        "enum constant name must be a quoted string, found '{}'",
                        &self.text[piece.clone()]
                    ),
                    piece,
                ))
            }
        };

        let pos = match self.scanner.next_token(pos, piece.end)? {
            Some((Token::Equals, span)) => span.end,
            _ => {
                return Err(TypeParseError::validation(
                    format!("expected '=' after enum constant '{name}'"),
                    piece,
                ))
            }
        };

        let value = self.read_integer(pos..piece.end, "enum value")?;
        let code = i16::try_from(value).map_err(|_| {
            TypeParseError::validation(
                format!("enum value {value} is out of range"),
                piece.clone(),
            )
        })?;
        constants
            .insert(name, code)
            .map_err(|e| TypeParseError::validation(e.to_string(), piece))
    }

    fn build_aggregate(
        &self,
        decl: Declaration,
        data_type: DataType,
        params: Range<usize>,
        depth: usize,
    ) -> Result<ColumnDescriptor, TypeParseError> {
        let split = self
            .scanner
            .find_top_level_delimiter(params.start, params.end, b",")?;
        let (function, signature) = self.read_function(params.start..split)?;
        let arguments = if split < params.end {
            let rest = split + 1..params.end;
            if self.scanner.skip_spaces(rest.start, rest.end) >= rest.end {
                return Err(TypeParseError::syntax(
                    "expected type name, found end of input",
                    rest.end..rest.end,
                ));
            }
            self.read_arguments(rest, data_type, depth)?
        } else {
            Vec::new()
        };
        ColumnDescriptor::aggregate(decl, data_type, function, signature, arguments)
    }

    /// Reads `name` or `name(params)` and returns the function with its
    /// whitespace-free signature.
    fn read_function(
        &self,
        range: Range<usize>,
    ) -> Result<(AggregateFunction, String), TypeParseError> {
        let (name, name_span) = match self.scanner.next_token(range.start, range.end)? {
            Some((Token::Identifier(name), span)) => (name, span),
            Some((token, span)) => {
                return Err(TypeParseError::syntax(
                    format!("expected aggregate function name, found {}", token.describe()),
                    span,
                ))
            }
            None => {
                return Err(TypeParseError::syntax(
                    "expected aggregate function name",
                    range,
                ))
            }
        };
        let function = AggregateFunction::resolve_or_other(name);
        if function == AggregateFunction::Other {
            debug!("Aggregate function '{}' is not in the function table", name);
        }

        let mut signature = name.to_string();
        let mut pos = name_span.end;
        if let Some((Token::LeftParen, open)) = self.scanner.next_token(pos, range.end)? {
            let close = self.find_closing_paren(open.clone(), range.end)?;
            signature.push('(');
            let mut cursor = open.end;
            while let Some((_, span)) = self.scanner.next_token(cursor, close)? {
                signature.push_str(&self.text[span.clone()]);
                cursor = span.end;
            }
            signature.push(')');
            pos = close + 1;
        }
        self.expect_end(pos, range.end)?;
        Ok((function, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::TypeDetails;
    use crate::errors::ErrorKind;

    fn parse_one(declaration: &str) -> ColumnDescriptor {
        let mut columns = parse(declaration).unwrap();
        assert_eq!(columns.len(), 1, "{declaration}");
        columns.remove(0)
    }

    #[test]
    fn test_read_column_at_successive_offsets() {
        let text =
            "AggregateFunction(max, UInt64), cc LowCardinality(Nullable(String)), a UInt8 null";
        let mut columns = Vec::new();

        let first = read_column(text, 0, text.len(), None, &mut columns).unwrap();
        assert_eq!(&text[first..first + 1], ",");
        let second = read_column(text, first + 1, text.len(), None, &mut columns).unwrap();
        assert_eq!(&text[second..second + 1], ",");
        let third = read_column(text, second + 1, text.len(), None, &mut columns).unwrap();
        assert_eq!(third, text.len());

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].name(), "");
        assert_eq!(columns[0].data_type(), DataType::AggregateFunction);
        assert_eq!(columns[0].function(), Some("max"));
        assert_eq!(columns[1].name(), "cc");
        assert!(columns[1].is_low_cardinality());
        assert!(columns[1].is_nullable());
        assert_eq!(columns[2].name(), "a");
        assert_eq!(columns[2].data_type(), DataType::UInt8);
        assert!(columns[2].is_nullable());
        assert!(columns[2].is_fixed_length());
        assert_eq!(columns[2].estimated_length(), 1);
        assert_eq!(columns[2].original_type_name(), "UInt8 null");
    }

    #[test]
    fn test_read_column_stops_at_enclosing_paren() {
        let text = "Map(String, UInt8)";
        let mut columns = Vec::new();
        let next = read_column(text, 4, text.len(), Some(DataType::Map), &mut columns).unwrap();
        assert_eq!(next, 10);
        let next = read_column(text, 11, text.len(), Some(DataType::Map), &mut columns).unwrap();
        assert_eq!(next, 17);
        assert_eq!(columns[1].original_type_name(), "UInt8");
    }

    #[test]
    fn test_read_column_with_surrounding_spaces() {
        let text = " Tuple(UInt8, String) ";
        let mut columns = Vec::new();
        let next = read_column(text, 1, text.len(), None, &mut columns).unwrap();
        assert_eq!(next, text.len());
        assert_eq!(columns[0].original_type_name(), "Tuple(UInt8, String)");
    }

    #[test]
    fn test_names_only_where_allowed() {
        let text = "a UInt8";
        let mut columns = Vec::new();
        let err =
            read_column(text, 0, text.len(), Some(DataType::Array), &mut columns).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);

        let tuple = parse_one("t Tuple(a UInt8, `b b` String)");
        assert_eq!(tuple.name(), "t");
        assert_eq!(tuple.nested_columns()[0].name(), "a");
        assert_eq!(tuple.nested_columns()[1].name(), "b b");
    }

    #[test]
    fn test_columns_named_after_types() {
        let columns = parse("Date Date, String Nullable(String), INT1 unsigned").unwrap();
        assert_eq!(columns[0].name(), "Date");
        assert_eq!(columns[0].data_type(), DataType::Date);
        assert_eq!(columns[1].name(), "String");
        assert!(columns[1].is_nullable());
        assert_eq!(columns[2].name(), "");
        assert_eq!(columns[2].data_type(), DataType::UInt8);
        assert_eq!(columns[2].original_type_name(), "INT1 unsigned");
    }

    #[test]
    fn test_multi_word_alias_after_name() {
        let column = parse_one("price DOUBLE PRECISION NOT NULL");
        assert_eq!(column.name(), "price");
        assert_eq!(column.data_type(), DataType::Float64);
        assert!(!column.is_nullable());
        assert_eq!(column.original_type_name(), "DOUBLE PRECISION NOT NULL");
    }

    #[test]
    fn test_default_clause_is_skipped() {
        let columns =
            parse("a UInt8 DEFAULT 1, b String MATERIALIZED concat('x,', toString(a)), c Int8")
                .unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].original_type_name(), "UInt8");
        assert_eq!(columns[1].original_type_name(), "String");
        assert_eq!(columns[2].name(), "c");
    }

    #[test]
    fn test_explicit_wrapper_wins_over_modifier() {
        let column = of("n", "Nullable(UInt8) NOT NULL").unwrap();
        assert!(column.is_nullable());
        let column = of("n", "UInt8 NOT NULL").unwrap();
        assert!(!column.is_nullable());
    }

    #[test]
    fn test_unknown_type_span() {
        let err = parse("a UInt7").unwrap_err();
        assert_eq!(
            err,
            TypeParseError::UnknownType {
                type_name: "UInt7".to_string(),
                span: 2..7
            }
        );
        let err = parse("Foo").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
    }

    #[test]
    fn test_enum_constants() {
        let column = of("e", r"Enum8('Query''Start' = 1, 'Query\'Finish' = 10)").unwrap();
        let constants = column.enum_constants().unwrap();
        assert_eq!(constants.value("Query'Start").unwrap(), 1);
        assert_eq!(constants.value("Query'Finish").unwrap(), 10);
        assert_eq!(constants.name(10).unwrap(), "Query'Finish");
        assert!(column.is_fixed_length());
        assert_eq!(column.estimated_length(), 1);
    }

    #[test]
    fn test_enum_errors() {
        let err = of("e", "Enum8('Query''Start' = a)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum8('a' 1)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum8(a = 1)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum8('a' = 1, 'a' = 2)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum16('a' = 1, 'b' = 1)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum8('a' = 200)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum16('a' = 40000)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("e", "Enum8('a = 1)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_bare_enum_picks_width() {
        assert_eq!(
            of("e", "Enum('a' = 1, 'b' = -2)").unwrap().data_type(),
            DataType::Enum8
        );
        let wide = of("e", "Enum('a' = 1, 'b' = 1000)").unwrap();
        assert_eq!(wide.data_type(), DataType::Enum16);
        assert_eq!(wide.estimated_length(), 2);
    }

    #[test]
    fn test_aggregate_function_signature() {
        let column = of("q", "AggregateFunction(quantiles(0.5, 0.9), UInt64)").unwrap();
        assert_eq!(column.aggregate_function(), Some(AggregateFunction::Quantiles));
        assert_eq!(column.function(), Some("quantiles(0.5,0.9)"));
        assert_eq!(column.nested_columns().len(), 1);
        assert!(!column.is_fixed_length());

        let column = of("s", "SimpleAggregateFunction(sumIf, UInt64, UInt8)").unwrap();
        assert_eq!(column.aggregate_function(), Some(AggregateFunction::Sum));
        assert_eq!(column.function(), Some("sumIf"));
        assert_eq!(column.nested_columns().len(), 2);

        let column = of("c", "AggregateFunction(count)").unwrap();
        assert!(column.nested_columns().is_empty());
    }

    #[test]
    fn test_unlisted_aggregate_functions() {
        let column =
            of("w", "AggregateFunction(quantilesExactWeighted(0.5), UInt64, UInt8)").unwrap();
        assert_eq!(column.aggregate_function(), Some(AggregateFunction::Other));
        assert_eq!(column.function(), Some("quantilesExactWeighted(0.5)"));
        assert_eq!(column.nested_columns().len(), 2);

        let column = of("s", "AggregateFunction(sequenceMatch('(?1)(?2)'), DateTime, UInt8)")
            .unwrap();
        assert_eq!(column.function(), Some("sequenceMatch('(?1)(?2)')"));

        let columns = parse(
            "a AggregateFunction(groupArrayLast(3), String), \
             b AggregateFunction(uniqUpTo(10), UInt64), \
             c AggregateFunction(windowFunnel(3600), DateTime, UInt8), \
             d AggregateFunction(retention, UInt8, UInt8)",
        )
        .unwrap();
        let signatures: Vec<_> = columns.iter().filter_map(|c| c.function()).collect();
        assert_eq!(
            signatures,
            vec!["groupArrayLast(3)", "uniqUpTo(10)", "windowFunnel(3600)", "retention"]
        );
    }

    #[test]
    fn test_aggregate_function_errors() {
        let err = of("x", "AggregateFunction(sum,)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.span(), 22..22);
        let err = of("x", "AggregateFunction(sum, )").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        let err = of("x", "AggregateFunction(1, UInt8)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        let err = of("x", "SimpleAggregateFunction(sum)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = of("x", "AggregateFunction(quantile(0.5, UInt8)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_decimal_and_fixed_string() {
        let column = of("d", "Decimal(18, 4)").unwrap();
        assert_eq!(column.precision(), Some(18));
        assert_eq!(column.scale(), Some(4));
        assert_eq!(column.estimated_length(), 8);
        assert!(matches!(column.details(), TypeDetails::Decimal { .. }));

        let column = of("d", "Decimal64(3)").unwrap();
        assert_eq!(column.precision(), Some(18));
        assert_eq!(column.scale(), Some(3));

        assert_eq!(of("d", "Decimal(1.5, 1)").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(of("d", "Decimal32(1, 2)").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(of("f", "FixedString(16)").unwrap().estimated_length(), 16);
        assert_eq!(of("f", "FixedString(-1)").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(of("f", "FixedString").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_date_time_parameters() {
        let column = of("t", "DateTime64(3, 'Asia/Shanghai')").unwrap();
        assert_eq!(column.precision(), Some(3));
        assert_eq!(column.timezone(), Some("Asia/Shanghai"));
        assert!(column.is_fixed_length());
        assert_eq!(column.estimated_length(), 8);

        let column = of("t", "DateTime('UTC')").unwrap();
        assert_eq!(column.timezone(), Some("UTC"));
        assert_eq!(column.estimated_length(), 4);
        assert!(of("t", "DateTime").unwrap().timezone().is_none());

        assert_eq!(of("t", "DateTime64(12)").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(of("t", "DateTime(3, 'UTC')").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_ignored_parameters() {
        let column = parse_one("name VARCHAR(255)");
        assert_eq!(column.data_type(), DataType::String);
        assert_eq!(column.original_type_name(), "VARCHAR(255)");
        let column = of("j", "JSON(max_dynamic_paths = 10, a.b UInt32)").unwrap();
        assert_eq!(column.data_type(), DataType::JSON);
        let column = of("d", "Dynamic(max_types = 10)").unwrap();
        assert_eq!(column.data_type(), DataType::Dynamic);
        assert_eq!(column.original_type_name(), "Dynamic(max_types = 10)");
        assert!(!column.is_fixed_length());
        let columns = parse("id UInt64, d Dynamic(max_types=4), s String").unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1].data_type(), DataType::Dynamic);
        assert_eq!(of("u", "UInt8(3)").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_map_and_nested() {
        let column = of("m", "Map(String, Tuple(UInt8, Nullable(String), UInt16 null))").unwrap();
        assert_eq!(column.key_info().unwrap().original_type_name(), "String");
        let value = column.value_info().unwrap();
        assert_eq!(value.nested_columns().len(), 3);
        assert!(value.nested_columns()[2].is_nullable());

        assert_eq!(of("m", "Map(String)").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(
            of("m", "Map(String, UInt8, UInt8)").unwrap_err().kind(),
            ErrorKind::Validation
        );

        let nested = of("n", "Nested(a UInt8, b Array(String))").unwrap();
        assert!(nested.is_nested());
        assert_eq!(nested.nested_columns()[1].name(), "b");
        assert_eq!(of("n", "Nested(UInt8)").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_of_rejects_trailing_content() {
        assert_eq!(of("a", "UInt8, UInt8").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(
            of("arr", "Nullable(Array(Nullable(UInt8))").unwrap_err().kind(),
            ErrorKind::Syntax
        );
        assert_eq!(of("a", "UInt8 garbage").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(parse("a UInt8)").unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
        assert_eq!(of("a", "").unwrap_err().kind(), ErrorKind::Syntax);
        assert_eq!(parse("a UInt8,").unwrap_err().kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_max_depth() {
        let options = ParserOptions { max_depth: 2 };
        assert!(parse_with("Array(Array(UInt8))", &options).is_ok());
        let err = parse_with("Array(Array(Array(UInt8)))", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let deep = format!("{}UInt8{}", "Array(".repeat(200), ")".repeat(200));
        assert_eq!(parse(&deep).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ParserOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ParserOptions::default());
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }
}
