//! # CLI Commands
//! A module for all the commands that can be run from the CLI

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a comma-separated list of column declarations, e.g. the output of DESCRIBE TABLE
    Parse {
        /// Column declarations such as "id UInt64, tags Array(String)", or - to read stdin
        declaration: String,

        /// Print the parsed columns as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a single column type and show its full descriptor tree
    Type {
        /// Type declaration such as "Map(String, Nullable(UInt64))"
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Column name to attach to the descriptor
        #[arg(short, long, default_value = "")]
        name: String,

        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the data formats the server reads and writes
    Formats {
        /// Only formats that can be used to send data
        #[arg(long)]
        input: bool,

        /// Only formats the server can return
        #[arg(long)]
        output: bool,

        /// Only binary formats
        #[arg(long)]
        binary: bool,
    },
}
