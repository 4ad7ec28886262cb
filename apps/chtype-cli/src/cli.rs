pub mod commands;
pub mod display;
pub mod logger;
pub mod settings;

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chtype::format::Format;
use chtype::parser::{of_with, parse_with};
use chtype::TypeParseError;
use clap::Parser;
use commands::Commands;
use settings::Settings;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help(true))]
pub struct Cli {
    /// Turn debugging information on
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Config file to read instead of ~/.chtype/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Points at the part of a single-line `input` an error refers to.
fn locate(input: &str, error: &TypeParseError) -> Option<String> {
    if input.contains('\n') {
        return None;
    }
    let start = error.span().start.min(input.len());
    let offset = input.get(..start)?.chars().count();
    let width = error.snippet(input).chars().count().max(1);
    Some(format!(
        "  {input}\n  {}{}",
        " ".repeat(offset),
        "^".repeat(width)
    ))
}

fn parse_failure(what: &str, input: &str, error: TypeParseError) -> anyhow::Error {
    let message = match locate(input, &error) {
        Some(location) => format!("Failed to parse {what}\n{location}"),
        None => format!("Failed to parse {what}"),
    };
    anyhow::Error::new(error).context(message)
}

fn read_declaration(declaration: &str) -> Result<String> {
    if declaration != "-" {
        return Ok(declaration.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read declarations from stdin")?;
    Ok(buffer)
}

pub fn top_command_handler(
    settings: &Settings,
    command: &Commands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Parse { declaration, json } => {
            let declaration = read_declaration(declaration)?;
            info!("Running parse command on {} byte(s)", declaration.len());

            let columns = parse_with(&declaration, &settings.parser)
                .map_err(|e| parse_failure("column declarations", &declaration, e))?;

            if *json {
                serde_json::to_writer_pretty(&mut *out, &columns)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", display::columns_table(&columns))?;
                writeln!(
                    out,
                    "{}",
                    display::format_summary(settings.display.default_format)
                )?;
            }
        }
        Commands::Type {
            type_name,
            name,
            json,
        } => {
            info!("Running type command on '{}'", type_name);

            let column = of_with(name, type_name, &settings.parser)
                .map_err(|e| parse_failure("type", type_name, e))?;

            if *json {
                serde_json::to_writer_pretty(&mut *out, &column)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", display::descriptor_table(&column))?;
            }
        }
        Commands::Formats {
            input,
            output,
            binary,
        } => {
            let formats: Vec<&Format> = Format::ALL
                .iter()
                .filter(|f| !*input || f.supports_input())
                .filter(|f| !*output || f.supports_output())
                .filter(|f| !*binary || f.is_binary())
                .collect();
            debug!("Listing {} of {} formats", formats.len(), Format::ALL.len());
            writeln!(out, "{}", display::formats_table(formats))?;
        }
    }
    Ok(())
}
