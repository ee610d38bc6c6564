//! Tests for `Visitor` and `Transformer` traversals

use std::collections::BTreeSet;

use mf2::parse;
use mf2::parser::ast::{
    Attribute, Declaration, InputDeclaration, LocalDeclaration, Markup, NamedOption, VariableRef,
};
use mf2::parser::visit::{Transformer, Visitor, walk_markup};

#[derive(Default)]
struct Collector {
    variables: Vec<String>,
    markup: Vec<String>,
    text: String,
}

impl Visitor for Collector {
    fn visit_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn visit_markup(&mut self, markup: &Markup) {
        self.markup.push(markup.name.clone());
        walk_markup(self, markup);
    }

    fn visit_variable(&mut self, variable: &VariableRef) {
        self.variables.push(variable.name.clone());
    }
}

fn collect(source: &str) -> Collector {
    let mut collector = Collector::default();
    collector.visit_message(&parse(source).unwrap());
    collector
}

#[test]
fn test_collects_variables_in_order() {
    let collector = collect(
        ".input {$a :number}\n\
         .local $b = {|x| :fn opt=$c @attr=$d}\n\
         .match {$b}\n\
         one {{{$e}}}\n\
         *   {{{#link href=$f}go{/link}}}",
    );
    assert_eq!(collector.variables, ["a", "c", "d", "b", "e", "f"]);
    assert_eq!(collector.markup, ["link", "link"]);
    assert_eq!(collector.text, "go");
}

#[test]
fn test_variables_in_unsupported_statements() {
    let collector = collect(".unknown {$x} {$y :fn} {{{$z}}}");
    assert_eq!(collector.variables, ["x", "y", "z"]);
}

#[test]
fn test_override_without_walk_stops_descent() {
    struct TopLevelOnly(usize);
    impl Visitor for TopLevelOnly {
        fn visit_markup(&mut self, _markup: &Markup) {
            self.0 += 1;
        }
        fn visit_variable(&mut self, _variable: &VariableRef) {
            panic!("markup options must not be visited");
        }
    }
    let mut visitor = TopLevelOnly(0);
    visitor.visit_message(&parse("{#b x=$y}bold{/b}").unwrap());
    assert_eq!(visitor.0, 2);
}

/// Prefixes every variable name, declared names included.
struct Prefix(&'static str);

impl Transformer for Prefix {
    fn transform_declaration(&mut self, declaration: Declaration) -> Option<Declaration> {
        Some(match declaration {
            Declaration::Input(input) => {
                let value = self.transform_variable_expression(input.value);
                Declaration::Input(InputDeclaration {
                    name: value.arg.name.clone(),
                    value,
                })
            }
            Declaration::Local(local) => Declaration::Local(LocalDeclaration {
                name: format!("{}{}", self.0, local.name),
                value: self.transform_expression(local.value),
            }),
            Declaration::Unsupported(statement) => Declaration::Unsupported(statement),
        })
    }

    fn transform_variable(&mut self, variable: VariableRef) -> VariableRef {
        VariableRef::new(format!("{}{}", self.0, variable.name))
    }
}

struct Identity;

impl Transformer for Identity {}

#[test]
fn test_transformer_renames_variables() {
    let message = parse(".input {$x :number}\n.local $y = {$x}\n{{{$x} {$y} {#a href=$x /}}}")
        .unwrap();
    let renamed = Prefix("p_").transform_message(message);
    assert_eq!(
        renamed.to_string(),
        ".input {$p_x :number}\n.local $p_y = {$p_x}\n{{{$p_x} {$p_y} {#a href=$p_x /}}}"
    );
}

/// Removes options and attributes whose names are listed.
struct Strip(BTreeSet<&'static str>);

impl Transformer for Strip {
    fn transform_option(&mut self, option: NamedOption) -> Option<NamedOption> {
        (!self.0.contains(option.name.as_str())).then_some(option)
    }

    fn transform_attribute(&mut self, attribute: Attribute) -> Option<Attribute> {
        (!self.0.contains(attribute.name.as_str())).then_some(attribute)
    }
}

#[test]
fn test_transformer_removes_elements() {
    let message = parse("{$x :number style=percent digits=2 @debug} {#b debug=1 keep=2}").unwrap();
    let stripped = Strip(BTreeSet::from(["style", "debug"])).transform_message(message);
    assert_eq!(
        stripped.to_string(),
        "{$x :number digits=2} {#b keep=2}"
    );
}

#[test]
fn test_default_transformer_is_identity() {
    let message = parse(
        ".local $a = {1 :number}\n.match {$a}\n1 {{one {$a}}}\n* {{{#i}other{/i}}}",
    )
    .unwrap();
    assert_eq!(Identity.transform_message(message.clone()), message);
}
