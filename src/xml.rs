//! Serializes the MAML output tree to its namespaced XML document.
//!
//! The element vocabulary and namespace prefixes are a fixed external
//! contract; only the text encoding is caller-specified.

use crate::maml::{
    Command, CommandDetails, CommandExample, CommandValue, HelpItems, MamlParameter,
    NavigationLink, SyntaxItem,
};
use crate::segment::TextBlock;
use crate::{MamlError, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const MSH_NS: &str = "http://msh";
const MAML_NS: &str = "http://schemas.microsoft.com/maml/2004/10";
const COMMAND_NS: &str = "http://schemas.microsoft.com/maml/dev/command/2004/10";
const DEV_NS: &str = "http://schemas.microsoft.com/maml/dev/2004/10";
const MSHELP_NS: &str = "http://msdn.microsoft.com/mshelp";

/// Text encoding of the serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
}

impl OutputEncoding {
    fn xml_label(self) -> &'static str {
        match self {
            OutputEncoding::Utf8 | OutputEncoding::Utf8Bom => "utf-8",
            OutputEncoding::Utf16Le => "utf-16",
        }
    }
}

/// Render the tree as a UTF-8 XML string.
pub fn render_maml(items: &HelpItems) -> Result<String> {
    render_labeled(items, OutputEncoding::Utf8.xml_label())
}

/// Write the tree to a file in the requested encoding.
///
/// The file handle is scoped to this call and flushed before returning.
pub fn write_maml_file(items: &HelpItems, path: &Path, encoding: OutputEncoding) -> Result<()> {
    let rendered = render_labeled(items, encoding.xml_label())?;
    let mut out = BufWriter::new(File::create(path)?);
    match encoding {
        OutputEncoding::Utf8 => out.write_all(rendered.as_bytes())?,
        OutputEncoding::Utf8Bom => {
            out.write_all(&[0xEF, 0xBB, 0xBF])?;
            out.write_all(rendered.as_bytes())?;
        }
        OutputEncoding::Utf16Le => {
            out.write_all(&[0xFF, 0xFE])?;
            for unit in rendered.encode_utf16() {
                out.write_all(&unit.to_le_bytes())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn render_labeled(items: &HelpItems, encoding_label: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding_label), None)))?;
    write_help_items(&mut writer, items)?;
    String::from_utf8(writer.into_inner()).map_err(|err| MamlError::Xml(err.to_string()))
}

type XmlResult = std::io::Result<()>;

fn write_help_items<W: Write>(writer: &mut Writer<W>, items: &HelpItems) -> XmlResult {
    let mut root = BytesStart::new("helpItems");
    root.push_attribute(("schema", "maml"));
    root.push_attribute(("xmlns", MSH_NS));
    writer.write_event(Event::Start(root))?;
    for command in &items.commands {
        write_command(writer, command)?;
    }
    writer.write_event(Event::End(BytesEnd::new("helpItems")))
}

fn write_command<W: Write>(writer: &mut Writer<W>, command: &Command) -> XmlResult {
    let mut start = BytesStart::new("command:command");
    start.push_attribute(("xmlns:maml", MAML_NS));
    start.push_attribute(("xmlns:command", COMMAND_NS));
    start.push_attribute(("xmlns:dev", DEV_NS));
    start.push_attribute(("xmlns:MSHelp", MSHELP_NS));
    writer.write_event(Event::Start(start))?;

    write_details(writer, &command.details)?;
    write_paras(
        writer,
        "maml:description",
        command.description.iter().map(TextBlock::text),
    )?;
    if !command.alert_set.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("maml:alertSet")))?;
        for alert in &command.alert_set {
            write_paras(writer, "maml:alert", alert.remarks.iter().map(String::as_str))?;
        }
        writer.write_event(Event::End(BytesEnd::new("maml:alertSet")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("command:syntax")))?;
    for item in &command.syntax {
        write_syntax_item(writer, item)?;
    }
    writer.write_event(Event::End(BytesEnd::new("command:syntax")))?;

    writer.write_event(Event::Start(BytesStart::new("command:parameters")))?;
    for parameter in &command.parameters {
        write_parameter(writer, parameter)?;
    }
    writer.write_event(Event::End(BytesEnd::new("command:parameters")))?;

    write_values(writer, "command:inputTypes", "command:inputType", &command.input_types)?;
    write_values(
        writer,
        "command:returnValues",
        "command:returnValue",
        &command.return_values,
    )?;

    writer.write_event(Event::Start(BytesStart::new("command:examples")))?;
    for example in &command.examples {
        write_example(writer, example)?;
    }
    writer.write_event(Event::End(BytesEnd::new("command:examples")))?;

    writer.write_event(Event::Start(BytesStart::new("command:relatedLinks")))?;
    for link in &command.related_links {
        write_link(writer, link)?;
    }
    writer.write_event(Event::End(BytesEnd::new("command:relatedLinks")))?;

    writer.write_event(Event::End(BytesEnd::new("command:command")))
}

fn write_details<W: Write>(writer: &mut Writer<W>, details: &CommandDetails) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("command:details")))?;
    write_text_element(writer, "command:name", &details.name)?;
    write_text_element(writer, "command:verb", &details.verb)?;
    write_text_element(writer, "command:noun", &details.noun)?;
    write_paras(
        writer,
        "maml:description",
        std::iter::once(details.synopsis.as_str()),
    )?;
    writer.write_event(Event::End(BytesEnd::new("command:details")))
}

fn write_syntax_item<W: Write>(writer: &mut Writer<W>, item: &SyntaxItem) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("command:syntaxItem")))?;
    write_text_element(writer, "maml:name", &item.command_name)?;
    for parameter in &item.parameters {
        write_parameter(writer, parameter)?;
    }
    writer.write_event(Event::End(BytesEnd::new("command:syntaxItem")))
}

fn write_parameter<W: Write>(writer: &mut Writer<W>, parameter: &MamlParameter) -> XmlResult {
    let mut start = BytesStart::new("command:parameter");
    start.push_attribute(("required", bool_attr(parameter.mandatory)));
    start.push_attribute(("globbing", bool_attr(parameter.globbing)));
    start.push_attribute(("position", parameter.position.as_str()));
    writer.write_event(Event::Start(start))?;
    write_text_element(writer, "maml:name", &parameter.name)?;
    write_paras(
        writer,
        "maml:description",
        parameter.description.iter().map(String::as_str),
    )?;
    if let Some(value) = &parameter.value {
        let mut element = BytesStart::new("command:parameterValue");
        element.push_attribute(("required", bool_attr(value.mandatory)));
        element.push_attribute(("variableLength", bool_attr(value.variable_length)));
        writer.write_event(Event::Start(element))?;
        writer.write_event(Event::Text(BytesText::new(&value.data_type)))?;
        writer.write_event(Event::End(BytesEnd::new("command:parameterValue")))?;
    }
    write_dev_type(writer, &parameter.type_name)?;
    writer.write_event(Event::End(BytesEnd::new("command:parameter")))
}

fn write_values<W: Write>(
    writer: &mut Writer<W>,
    container: &str,
    element: &str,
    values: &[CommandValue],
) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(container)))?;
    for value in values {
        writer.write_event(Event::Start(BytesStart::new(element)))?;
        write_dev_type(writer, &value.type_name)?;
        write_paras(
            writer,
            "maml:description",
            value.description.iter().map(String::as_str),
        )?;
        writer.write_event(Event::End(BytesEnd::new(element)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(container)))
}

fn write_example<W: Write>(writer: &mut Writer<W>, example: &CommandExample) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("command:example")))?;
    write_text_element(writer, "maml:title", &example.title)?;
    write_paras(
        writer,
        "maml:introduction",
        example.introduction.iter().map(String::as_str),
    )?;
    write_text_element(writer, "dev:code", &example.code)?;
    write_paras(writer, "dev:remarks", example.remarks.iter().map(String::as_str))?;
    writer.write_event(Event::End(BytesEnd::new("command:example")))
}

fn write_link<W: Write>(writer: &mut Writer<W>, link: &NavigationLink) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("maml:navigationLink")))?;
    write_text_element(writer, "maml:linkText", &link.link_text)?;
    write_text_element(writer, "maml:uri", &link.uri)?;
    writer.write_event(Event::End(BytesEnd::new("maml:navigationLink")))
}

fn write_dev_type<W: Write>(writer: &mut Writer<W>, type_name: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new("dev:type")))?;
    write_text_element(writer, "maml:name", type_name)?;
    writer.write_event(Event::Empty(BytesStart::new("maml:uri")))?;
    writer.write_event(Event::End(BytesEnd::new("dev:type")))
}

fn write_paras<'a, W, I>(writer: &mut Writer<W>, element: &str, paras: I) -> XmlResult
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    writer.write_event(Event::Start(BytesStart::new(element)))?;
    for para in paras {
        write_text_element(writer, "maml:para", para)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element)))
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, element: &str, text: &str) -> XmlResult {
    writer.write_event(Event::Start(BytesStart::new(element)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(element)))
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
