//! The MAML output tree and the conversion from a help model.
//!
//! Conversion is a pure, single-pass transformation: one `Command` tree per
//! `CommandHelp`, no state shared across commands. A conversion failure
//! discards the partial tree.

use crate::example::{decorate_title, parse_example_body};
use crate::model::{CommandHelp, Example, InputOutput, Parameter, SyntaxVariant};
use crate::segment::{TextBlock, segment};
use crate::{MamlError, Result};
use std::collections::HashMap;

/// Position attribute for parameters outside any positional slot.
pub const NAMED_POSITION: &str = "named";

/// Types whose parameters never render a `command:parameterValue` element.
const SWITCH_TYPES: &[&str] = &[
    "SwitchParameter",
    "System.Management.Automation.SwitchParameter",
];

const NULLABLE_PREFIX: &str = "System.Nullable`1[";

/// Root of the serialized document: one entry per converted command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpItems {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub details: CommandDetails,
    pub description: Vec<TextBlock>,
    pub alert_set: Vec<AlertItem>,
    pub syntax: Vec<SyntaxItem>,
    pub parameters: Vec<MamlParameter>,
    pub examples: Vec<CommandExample>,
    pub input_types: Vec<CommandValue>,
    pub return_values: Vec<CommandValue>,
    pub related_links: Vec<NavigationLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandDetails {
    pub name: String,
    pub verb: String,
    pub noun: String,
    pub synopsis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertItem {
    pub remarks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxItem {
    pub command_name: String,
    pub parameters: Vec<MamlParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MamlParameter {
    pub name: String,
    pub mandatory: bool,
    pub globbing: bool,
    pub position: String,
    pub value: Option<ParameterValue>,
    pub type_name: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterValue {
    pub data_type: String,
    pub mandatory: bool,
    pub variable_length: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandExample {
    /// 1-based position in the command's example list.
    pub number: usize,
    pub title: String,
    pub introduction: Vec<String>,
    pub code: String,
    pub remarks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandValue {
    pub type_name: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationLink {
    pub link_text: String,
    pub uri: String,
}

/// Convert a command collection into one serializable tree.
pub fn convert_help_items(commands: &[CommandHelp]) -> Result<HelpItems> {
    let mut items = HelpItems::default();
    for command in commands {
        items.commands.push(convert_command(command)?);
    }
    Ok(items)
}

/// Convert one help model into a complete output tree.
pub fn convert_command(help: &CommandHelp) -> Result<Command> {
    let mut command = Command {
        details: convert_details(help)?,
        ..Command::default()
    };

    if let Some(description) = &help.description {
        command.description = segment(description);
    }

    // Notes stay one paragraph; re-segmenting would break their formatting.
    if let Some(notes) = &help.notes {
        command.alert_set.push(AlertItem {
            remarks: vec![notes.clone()],
        });
    }

    let types = resolve_syntax_types(&help.syntax);
    for variant in &help.syntax {
        command.syntax.push(convert_syntax(help, variant, &types)?);
    }

    for (index, example) in help.examples.iter().enumerate() {
        command.examples.push(convert_example(example, index + 1));
    }

    for parameter in &help.parameters {
        command.parameters.push(convert_parameter(parameter, None));
    }

    for input in &help.inputs {
        command.input_types.push(convert_input_output(input));
    }
    for output in &help.outputs {
        command.return_values.push(convert_input_output(output));
    }

    for link in &help.related_links {
        command.related_links.push(NavigationLink {
            link_text: link.text.clone(),
            uri: link.uri.clone(),
        });
    }

    Ok(command)
}

fn convert_details(help: &CommandHelp) -> Result<CommandDetails> {
    let (verb, noun) = help
        .title
        .split_once('-')
        .ok_or_else(|| MamlError::MalformedTitle(help.title.clone()))?;
    Ok(CommandDetails {
        name: help.title.clone(),
        verb: verb.to_string(),
        noun: noun.to_string(),
        synopsis: help.synopsis.clone(),
    })
}

/// Map each parameter name to one resolved type across all syntax variants.
///
/// First occurrence wins, deliberately: later variants that redeclare a name
/// with a different type do not change how the parameter renders anywhere.
pub fn resolve_syntax_types(variants: &[SyntaxVariant]) -> HashMap<String, String> {
    let mut types = HashMap::new();
    for variant in variants {
        for parameter in &variant.parameters {
            types
                .entry(parameter.name.clone())
                .or_insert_with(|| parameter.parameter_type.clone());
        }
    }
    types
}

fn convert_syntax(
    help: &CommandHelp,
    variant: &SyntaxVariant,
    types: &HashMap<String, String>,
) -> Result<SyntaxItem> {
    // Only the text before the first space is the syntax label.
    let command_name = variant
        .command_name
        .split(' ')
        .next()
        .unwrap_or(&variant.command_name);
    let mut item = SyntaxItem {
        command_name: command_name.to_string(),
        parameters: Vec::new(),
    };
    for occurrence in &variant.parameters {
        let resolved = types.get(&occurrence.name).ok_or_else(|| {
            MamlError::UnknownSyntaxParameter {
                command: help.title.clone(),
                parameter: occurrence.name.clone(),
            }
        })?;
        let declaration = help
            .parameters
            .iter()
            .find(|parameter| parameter.name == occurrence.name)
            .ok_or_else(|| MamlError::UnknownSyntaxParameter {
                command: help.title.clone(),
                parameter: occurrence.name.clone(),
            })?;
        item.parameters
            .push(convert_parameter(declaration, Some(resolved)));
    }
    Ok(item)
}

fn convert_parameter(parameter: &Parameter, syntax_type: Option<&str>) -> MamlParameter {
    let position = parameter
        .parameter_sets
        .first()
        .map(|set| {
            set.position
                .map_or_else(|| NAMED_POSITION.to_string(), |value| value.to_string())
        })
        .unwrap_or_else(|| NAMED_POSITION.to_string());
    let description = parameter
        .description
        .as_deref()
        .map(|text| {
            text.split("\n\n")
                .map(|piece| piece.trim().to_string())
                .collect()
        })
        .unwrap_or_default();
    MamlParameter {
        name: parameter.name.clone(),
        mandatory: parameter.parameter_sets.iter().any(|set| set.required),
        globbing: parameter.supports_wildcards,
        position,
        value: parameter_value(parameter, syntax_type),
        type_name: parameter.parameter_type.clone(),
        description,
    }
}

fn parameter_value(parameter: &Parameter, syntax_type: Option<&str>) -> Option<ParameterValue> {
    if SWITCH_TYPES.contains(&parameter.parameter_type.as_str()) {
        return None;
    }
    // A syntax-specific type overrides unmodified; the parameter's own type
    // only unwraps its nullable wrapper.
    let data_type = match syntax_type {
        Some(resolved) => resolved.to_string(),
        None => unwrap_nullable(&parameter.parameter_type).to_string(),
    };
    Some(ParameterValue {
        data_type,
        mandatory: true,
        variable_length: parameter.variable_length,
    })
}

fn unwrap_nullable(type_name: &str) -> &str {
    // `get` keeps a multi-byte character straddling the prefix length from
    // panicking the slice.
    let wrapped = type_name.len() > NULLABLE_PREFIX.len() + 1
        && type_name.ends_with(']')
        && type_name
            .get(..NULLABLE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(NULLABLE_PREFIX));
    if wrapped {
        &type_name[NULLABLE_PREFIX.len()..type_name.len() - 1]
    } else {
        type_name
    }
}

fn convert_example(example: &Example, number: usize) -> CommandExample {
    let body = parse_example_body(&example.body);
    CommandExample {
        number,
        title: decorate_title(&example.title),
        introduction: body.introduction,
        code: body.code,
        remarks: body.remarks,
    }
}

fn convert_input_output(entry: &InputOutput) -> CommandValue {
    let description = if entry.description.is_empty() {
        Vec::new()
    } else {
        vec![entry.description.clone()]
    };
    CommandValue {
        type_name: entry.type_name.clone(),
        description,
    }
}
