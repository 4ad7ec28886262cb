//! Parser for ClickHouse column type declarations.
//!
//! ```
//! let columns = chtype::parse("id UInt64, tags Array(LowCardinality(String))").unwrap();
//! assert_eq!(columns[1].name(), "tags");
//! assert_eq!(columns[1].array_nested_level(), 1);
//! ```

pub mod column;
pub mod data_type;
pub mod errors;
pub mod format;
pub mod parser;
pub mod response;
pub mod scanner;

pub use column::{AggregateFunction, ColumnDescriptor, EnumConstants, TypeDetails};
pub use data_type::DataType;
pub use errors::{ErrorKind, TypeParseError};
pub use format::Format;
pub use parser::{parse, read_column, ParserOptions};
