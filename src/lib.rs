#![forbid(unsafe_code)]
//! Mamlgen converts structured command help documents into MAML XML help
//! files, the legacy schema consumed by a shell's built-in help engine.
//!
//! # Example
//!
//! ```
//! let yaml = "title: Get-Widget\nsynopsis: Gets widgets.\n";
//! let xml = mamlgen::convert_yaml_to_maml(yaml)?;
//! assert!(xml.contains("<command:verb>Get</command:verb>"));
//! # Ok::<(), mamlgen::MamlError>(())
//! ```

use std::error::Error;
use std::fmt;

pub mod example;
pub mod maml;
pub mod model;
pub mod segment;
pub mod xml;

pub use example::{ExampleBody, parse_example_body};
pub use maml::{
    AlertItem, Command, CommandDetails, CommandExample, CommandValue, HelpItems, MamlParameter,
    NavigationLink, ParameterValue, SyntaxItem, convert_command, convert_help_items,
    resolve_syntax_types,
};
pub use model::{
    CommandHelp, Example, InputOutput, Link, Parameter, ParameterSet, SyntaxParameter,
    SyntaxVariant, load_command_help, load_command_help_documents, validate_yaml_with_schema,
    validate_yaml_with_schema_str,
};
pub use segment::{TextBlock, segment};
pub use xml::{OutputEncoding, render_maml, write_maml_file};

pub const BUILTIN_SCHEMA: &str = include_str!("../data/help_schema.yml");

#[derive(Debug)]
pub enum MamlError {
    /// Command title without a verb-noun separator.
    MalformedTitle(String),
    /// A syntax line references a parameter the command never declares.
    UnknownSyntaxParameter { command: String, parameter: String },
    Yaml(String),
    Schema(String),
    Xml(String),
    Io(std::io::Error),
}

impl fmt::Display for MamlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MamlError::MalformedTitle(title) => {
                write!(f, "command title '{title}' has no verb-noun separator")
            }
            MamlError::UnknownSyntaxParameter { command, parameter } => {
                write!(
                    f,
                    "syntax of '{command}' references undeclared parameter '{parameter}'"
                )
            }
            MamlError::Yaml(msg) => write!(f, "yaml parse error: {msg}"),
            MamlError::Schema(msg) => write!(f, "schema validation error: {msg}"),
            MamlError::Xml(msg) => write!(f, "xml serialization error: {msg}"),
            MamlError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl Error for MamlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MamlError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MamlError {
    fn from(err: std::io::Error) -> Self {
        MamlError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, MamlError>;

/// Convert a YAML stream of help documents into one rendered MAML document.
///
/// Each YAML document in the stream describes one command; the output wraps
/// them all in a single `helpItems` element.
pub fn convert_yaml_to_maml(yaml: &str) -> Result<String> {
    let commands = model::load_command_help_documents(yaml)?;
    let items = maml::convert_help_items(&commands)?;
    xml::render_maml(&items)
}
