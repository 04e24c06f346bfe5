#![forbid(unsafe_code)]

use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mamlgen", version)]
struct Cli {
    /// YAML help document stream; one document per command.
    #[arg(short = 'i', long = "input", value_name = "PATH", default_value = "-")]
    input: String,

    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    #[arg(short = 'e', long = "encoding", value_enum, default_value = "utf8")]
    encoding: EncodingArg,

    #[arg(long = "validate")]
    validate: bool,

    #[arg(long = "schema", value_name = "PATH")]
    schema: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EncodingArg {
    Utf8,
    Utf8Bom,
    Utf16le,
}

impl From<EncodingArg> for mamlgen::OutputEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => mamlgen::OutputEncoding::Utf8,
            EncodingArg::Utf8Bom => mamlgen::OutputEncoding::Utf8Bom,
            EncodingArg::Utf16le => mamlgen::OutputEncoding::Utf16Le,
        }
    }
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let input = read_input(&cli.input)?;

    if cli.validate {
        match &cli.schema {
            Some(path) => mamlgen::validate_yaml_with_schema(&input, path)?,
            None => mamlgen::validate_yaml_with_schema_str(&input, mamlgen::BUILTIN_SCHEMA)?,
        }
    }

    let commands = mamlgen::load_command_help_documents(&input)?;
    let items = mamlgen::convert_help_items(&commands)?;

    match cli.output {
        Some(path) => mamlgen::write_maml_file(&items, &path, cli.encoding.into())?,
        None => print!("{}", mamlgen::render_maml(&items)?),
    }
    Ok(())
}
