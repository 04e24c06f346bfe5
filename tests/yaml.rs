use mamlgen::convert_yaml_to_maml;

fn rendered_fixture() -> String {
    let yaml = include_str!("fixtures/get_widget.yml");
    convert_yaml_to_maml(yaml).expect("convert fixture")
}

/// The parameter element for `name`, attributes through closing tag.
fn parameter_slice(xml: &str, name: &str) -> String {
    let marker = format!("<maml:name>{name}</maml:name>");
    let start = xml.find(&marker).expect("parameter present");
    let head = xml[..start]
        .rfind("<command:parameter ")
        .expect("parameter element");
    let end = xml[start..]
        .find("</command:parameter>")
        .expect("parameter close")
        + start;
    xml[head..end].to_string()
}

#[test]
fn renders_details_and_truncated_syntax_names() {
    let xml = rendered_fixture();
    assert!(xml.contains("<command:name>Get-Widget</command:name>"));
    assert!(xml.contains("<command:verb>Get</command:verb>"));
    assert!(xml.contains("<command:noun>Widget</command:noun>"));
    // Disambiguation text after the first space never reaches the output.
    assert!(xml.contains("<maml:name>Get-Widget</maml:name>"));
    assert!(!xml.contains("Get-Widget (Default)"));
    assert!(!xml.contains("Get-Widget (ByName)"));
}

#[test]
fn structural_description_block_keeps_line_breaks() {
    let xml = rendered_fixture();
    assert!(xml.contains("<maml:para>- local\n- remote</maml:para>"));
    assert!(xml.contains("<maml:para>Gets one or more widgets.</maml:para>"));
}

#[test]
fn switch_parameter_has_no_value_element() {
    let xml = rendered_fixture();
    let force = parameter_slice(&xml, "Force");
    assert!(!force.contains("command:parameterValue"));
    assert!(force.contains("System.Management.Automation.SwitchParameter"));
}

#[test]
fn nullable_parameter_value_is_unwrapped() {
    let xml = rendered_fixture();
    let count = parameter_slice(&xml, "Count");
    assert!(count.contains(">System.Int32</command:parameterValue>"));
    // dev:type keeps the declared wrapper type.
    assert!(count.contains("System.Nullable`1[System.Int32]"));
}

#[test]
fn id_renders_the_first_seen_syntax_type_in_both_variants() {
    let xml = rendered_fixture();
    // The second variant declares Id as Object; first-seen String wins.
    let mut remainder = xml.as_str();
    let mut syntax_values = Vec::new();
    while let Some(start) = remainder.find("<command:syntaxItem>") {
        let end = remainder[start..]
            .find("</command:syntaxItem>")
            .expect("syntax close")
            + start;
        let item = &remainder[start..end];
        if item.contains("<maml:name>Id</maml:name>") {
            assert!(item.contains(">String</command:parameterValue>"));
            syntax_values.push(item.to_string());
        }
        remainder = &remainder[end..];
    }
    assert_eq!(syntax_values.len(), 2);
    assert!(!xml.contains(">Object</command:parameterValue>"));
}

#[test]
fn examples_are_decorated_and_numbered_by_order() {
    let xml = rendered_fixture();
    let first = xml
        .find("<maml:title>--------- Get a widget by id ---------</maml:title>")
        .expect("first example");
    let second = xml
        .find("<maml:title>--------- Get all widgets ---------</maml:title>")
        .expect("second example");
    assert!(first < second);
    assert!(xml.contains("<dev:code>Get-Widget -Id 1</dev:code>"));
    assert!(xml.contains("<maml:para>The widget is written to the pipeline.</maml:para>"));
}

#[test]
fn notes_inputs_outputs_and_links_are_projected() {
    let xml = rendered_fixture();
    assert!(xml.contains("<maml:para>This cmdlet touches only the local cache.\n</maml:para>"));
    assert!(xml.contains("<maml:para>Widget identifiers can be piped.</maml:para>"));
    assert!(xml.contains("<maml:name>Widgets.Widget</maml:name>"));
    assert!(xml.contains("<maml:linkText>Online Version</maml:linkText>"));
    assert!(xml.contains("<maml:uri>https://example.com/help/get-widget</maml:uri>"));
}
