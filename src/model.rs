//! The read-only help model, its YAML reader, and schema validation.
//!
//! A help document is one YAML mapping per command; a multi-document stream
//! describes a command collection. The conversion core never mutates a
//! loaded model.

use crate::{MamlError, Result};
use jsonschema::validator_for;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use std::fs;
use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader, yaml::Hash};

/// One command's documentation, fully populated before conversion runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHelp {
    /// `Verb-Noun` command title.
    pub title: String,
    pub module_name: String,
    pub locale: String,
    pub synopsis: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub syntax: Vec<SyntaxVariant>,
    pub parameters: Vec<Parameter>,
    pub examples: Vec<Example>,
    pub inputs: Vec<InputOutput>,
    pub outputs: Vec<InputOutput>,
    pub related_links: Vec<Link>,
}

/// One parameter-set-specific invocation signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxVariant {
    /// May carry trailing disambiguation text after the first space.
    pub command_name: String,
    pub parameters: Vec<SyntaxParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxParameter {
    pub name: String,
    /// Locally declared type; may be empty when the variant inherits the
    /// type another variant declared.
    pub parameter_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub parameter_type: String,
    pub parameter_sets: Vec<ParameterSet>,
    pub supports_wildcards: bool,
    pub variable_length: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    pub name: String,
    pub required: bool,
    /// `None` renders as the `named` sentinel.
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Example {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOutput {
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub uri: String,
}

/// Load every document in a YAML stream as a command collection.
pub fn load_command_help_documents(yaml: &str) -> Result<Vec<CommandHelp>> {
    let docs =
        YamlLoader::load_from_str(yaml).map_err(|err| MamlError::Yaml(err.to_string()))?;
    if docs.is_empty() {
        return Err(MamlError::Yaml("empty yaml input".to_string()));
    }
    docs.iter().map(load_command_help).collect()
}

/// Load one command help document from a parsed YAML value.
pub fn load_command_help(doc: &Yaml) -> Result<CommandHelp> {
    let root = ensure_mapping(doc, "help document")?;
    let mut help = CommandHelp {
        title: require_string(root, "title")?,
        module_name: map_get_string(root, "module")?.unwrap_or_default(),
        locale: map_get_string(root, "locale")?.unwrap_or_else(|| "en-US".to_string()),
        synopsis: require_string(root, "synopsis")?,
        description: map_get_string(root, "description")?,
        notes: map_get_string(root, "notes")?,
        ..CommandHelp::default()
    };

    if let Some(variants) = map_get_sequence(root, "syntax")? {
        for variant in variants {
            let map = ensure_mapping(variant, "syntax item")?;
            let mut parsed = SyntaxVariant {
                command_name: require_string(map, "command")?,
                parameters: Vec::new(),
            };
            if let Some(parameters) = map_get_sequence(map, "parameters")? {
                for parameter in parameters {
                    let map = ensure_mapping(parameter, "syntax parameter")?;
                    parsed.parameters.push(SyntaxParameter {
                        name: require_string(map, "name")?,
                        parameter_type: map_get_string(map, "type")?.unwrap_or_default(),
                    });
                }
            }
            help.syntax.push(parsed);
        }
    }

    if let Some(parameters) = map_get_sequence(root, "parameters")? {
        for parameter in parameters {
            let map = ensure_mapping(parameter, "parameter")?;
            let mut parsed = Parameter {
                name: require_string(map, "name")?,
                parameter_type: require_string(map, "type")?,
                supports_wildcards: map_get_bool(map, "wildcards")?.unwrap_or(false),
                variable_length: map_get_bool(map, "variable-length")?.unwrap_or(false),
                description: map_get_string(map, "description")?,
                parameter_sets: Vec::new(),
            };
            if let Some(sets) = map_get_sequence(map, "sets")? {
                for set in sets {
                    let map = ensure_mapping(set, "parameter set")?;
                    parsed.parameter_sets.push(ParameterSet {
                        name: map_get_string(map, "name")?.unwrap_or_default(),
                        required: map_get_bool(map, "required")?.unwrap_or(false),
                        position: map_get_integer(map, "position")?,
                    });
                }
            }
            help.parameters.push(parsed);
        }
    }

    if let Some(examples) = map_get_sequence(root, "examples")? {
        for example in examples {
            let map = ensure_mapping(example, "example")?;
            help.examples.push(Example {
                title: require_string(map, "title")?,
                body: map_get_string(map, "body")?.unwrap_or_default(),
            });
        }
    }

    help.inputs = load_input_output(root, "inputs")?;
    help.outputs = load_input_output(root, "outputs")?;

    if let Some(links) = map_get_sequence(root, "links")? {
        for link in links {
            let map = ensure_mapping(link, "link")?;
            help.related_links.push(Link {
                text: require_string(map, "text")?,
                uri: require_string(map, "uri")?,
            });
        }
    }

    Ok(help)
}

fn load_input_output(root: &Hash, key: &str) -> Result<Vec<InputOutput>> {
    let mut parsed = Vec::new();
    if let Some(entries) = map_get_sequence(root, key)? {
        for entry in entries {
            let map = ensure_mapping(entry, key)?;
            parsed.push(InputOutput {
                type_name: require_string(map, "type")?,
                description: map_get_string(map, "description")?.unwrap_or_default(),
            });
        }
    }
    Ok(parsed)
}

/// Validate a YAML help stream against a schema file on disk.
pub fn validate_yaml_with_schema<P: AsRef<Path>>(yaml: &str, schema_path: P) -> Result<()> {
    let schema_source = fs::read_to_string(schema_path.as_ref())
        .map_err(|err| MamlError::Schema(err.to_string()))?;
    validate_yaml_with_schema_str(yaml, &schema_source)
}

/// Validate every document in a YAML help stream against a schema source.
pub fn validate_yaml_with_schema_str(yaml: &str, schema_source: &str) -> Result<()> {
    let docs =
        YamlLoader::load_from_str(yaml).map_err(|err| MamlError::Yaml(err.to_string()))?;
    if docs.is_empty() {
        return Err(MamlError::Yaml("empty yaml input".to_string()));
    }
    let schema_docs = YamlLoader::load_from_str(schema_source)
        .map_err(|err| MamlError::Schema(err.to_string()))?;
    let schema_yaml = schema_docs
        .first()
        .ok_or_else(|| MamlError::Schema("empty schema document".to_string()))?;
    let validator = validator_for(&yaml_to_json(schema_yaml))
        .map_err(|err| MamlError::Schema(err.to_string()))?;
    for doc in &docs {
        let instance = yaml_to_json(doc);
        if let Err(error) = validator.validate(&instance) {
            return Err(MamlError::Schema(error.to_string()));
        }
    }
    Ok(())
}

fn ensure_mapping<'a>(value: &'a Yaml, context: &str) -> Result<&'a Hash> {
    value
        .as_hash()
        .ok_or_else(|| MamlError::Yaml(format!("expected mapping for {context}")))
}

fn require_string(map: &Hash, key: &str) -> Result<String> {
    map_get_string(map, key)?
        .ok_or_else(|| MamlError::Yaml(format!("missing required key '{key}'")))
}

fn map_get_string(map: &Hash, key: &str) -> Result<Option<String>> {
    match map.get(&Yaml::String(key.to_string())) {
        None | Some(Yaml::Null) => Ok(None),
        Some(Yaml::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(MamlError::Yaml(format!(
            "expected string for key '{key}', found {}",
            yaml_type_name(other)
        ))),
    }
}

fn map_get_sequence<'a>(map: &'a Hash, key: &str) -> Result<Option<&'a [Yaml]>> {
    match map.get(&Yaml::String(key.to_string())) {
        None | Some(Yaml::Null) => Ok(None),
        Some(Yaml::Array(values)) => Ok(Some(values)),
        Some(other) => Err(MamlError::Yaml(format!(
            "expected sequence for key '{key}', found {}",
            yaml_type_name(other)
        ))),
    }
}

fn map_get_bool(map: &Hash, key: &str) -> Result<Option<bool>> {
    match map.get(&Yaml::String(key.to_string())) {
        None | Some(Yaml::Null) => Ok(None),
        Some(Yaml::Boolean(value)) => Ok(Some(*value)),
        Some(other) => Err(MamlError::Yaml(format!(
            "expected boolean for key '{key}', found {}",
            yaml_type_name(other)
        ))),
    }
}

fn map_get_integer(map: &Hash, key: &str) -> Result<Option<i64>> {
    match map.get(&Yaml::String(key.to_string())) {
        None | Some(Yaml::Null) => Ok(None),
        Some(Yaml::Integer(value)) => Ok(Some(*value)),
        Some(other) => Err(MamlError::Yaml(format!(
            "expected integer for key '{key}', found {}",
            yaml_type_name(other)
        ))),
    }
}

fn yaml_type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Boolean(_) => "bool",
        Yaml::Integer(_) => "int",
        Yaml::Real(_) => "float",
        Yaml::String(_) => "string",
        Yaml::Array(_) => "sequence",
        Yaml::Hash(_) => "mapping",
        Yaml::Alias(_) => "alias",
        Yaml::BadValue => "bad",
    }
}

fn yaml_to_json(value: &Yaml) -> JsonValue {
    match value {
        Yaml::Null | Yaml::Alias(_) | Yaml::BadValue => JsonValue::Null,
        Yaml::Boolean(value) => JsonValue::Bool(*value),
        Yaml::Integer(value) => JsonValue::Number(JsonNumber::from(*value)),
        Yaml::Real(value) => value
            .parse::<f64>()
            .ok()
            .and_then(JsonNumber::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(value.clone())),
        Yaml::String(value) => JsonValue::String(value.clone()),
        Yaml::Array(values) => JsonValue::Array(values.iter().map(yaml_to_json).collect()),
        Yaml::Hash(map) => {
            let mut out = JsonMap::new();
            for (key, value) in map.iter() {
                if let Yaml::String(key) = key {
                    out.insert(key.clone(), yaml_to_json(value));
                }
            }
            JsonValue::Object(out)
        }
    }
}
