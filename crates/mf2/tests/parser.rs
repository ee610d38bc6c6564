//! Integration tests for message parsing

use mf2::parser::ast::{
    Annotation, Attribute, Declaration, Expression, FunctionAnnotation, Literal, Markup,
    MarkupKind, Message, NamedOption, Operand, PatternPart, VariableRef, VariantKey,
};
use mf2::{MessageError, ParseError, parse, parse_message};

fn pattern_parts(source: &str) -> Vec<PatternPart> {
    match parse(source).unwrap() {
        Message::Pattern(message) => message.pattern.parts,
        Message::Select(_) => panic!("expected pattern message"),
    }
}

fn single_expression(source: &str) -> Expression {
    let parts = pattern_parts(source);
    let [PatternPart::Expression(expression)] = parts.as_slice() else {
        panic!("expected a single expression, got {parts:?}");
    };
    expression.clone()
}

// =============================================================================
// Simple Messages
// =============================================================================

#[test]
fn test_empty_message() {
    assert!(pattern_parts("").is_empty());
}

#[test]
fn test_plain_text() {
    assert_eq!(
        pattern_parts("Hello, World!"),
        vec![PatternPart::from("Hello, World!")]
    );
}

#[test]
fn test_text_around_variable() {
    let parts = pattern_parts("Hello, {$name}!");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], PatternPart::from("Hello, "));
    assert_eq!(parts[2], PatternPart::from("!"));
    let PatternPart::Expression(Expression::Variable(expr)) = &parts[1] else {
        panic!("expected variable expression");
    };
    assert_eq!(expr.arg, VariableRef::new("name"));
    assert!(expr.annotation.is_none());
}

#[test]
fn test_adjacent_placeholders() {
    let parts = pattern_parts("{$first}{$last}");
    assert_eq!(parts.len(), 2);
}

#[test]
fn test_text_escapes_are_decoded_and_merged() {
    assert_eq!(
        pattern_parts(r"\\ backslash escape \\"),
        vec![PatternPart::from(r"\ backslash escape \")]
    );
    assert_eq!(
        pattern_parts(r"\{ brace escape \}"),
        vec![PatternPart::from("{ brace escape }")]
    );
}

#[test]
fn test_leading_whitespace_keeps_keywords_as_text() {
    assert_eq!(pattern_parts(" .input"), vec![PatternPart::from(" .input")]);
    let parts = pattern_parts(" .match {$count} This looks illegal");
    assert_eq!(parts.len(), 3);
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn test_function_expression_with_namespace_and_attribute() {
    let Expression::Function(expr) = single_expression("{:namespace:function @attr}") else {
        panic!("expected function expression");
    };
    assert_eq!(expr.annotation.name, "namespace:function");
    assert_eq!(
        expr.attributes,
        vec![Attribute {
            name: "attr".into(),
            value: None
        }]
    );
}

#[test]
fn test_variable_with_options() {
    let expression = single_expression("{$name :capitalize arg=yes opt=$variable}");
    assert_eq!(
        expression.function(),
        Some(&FunctionAnnotation {
            name: "capitalize".into(),
            options: vec![
                NamedOption {
                    name: "arg".into(),
                    value: Operand::Literal(Literal::new("yes")),
                },
                NamedOption {
                    name: "opt".into(),
                    value: Operand::Variable(VariableRef::new("variable")),
                },
            ],
        })
    );
}

#[test]
fn test_attributes_with_values() {
    let expression = single_expression("{$name @attr1=$variable @attr2=yes}");
    assert_eq!(
        expression.attributes(),
        [
            Attribute {
                name: "attr1".into(),
                value: Some(Operand::Variable(VariableRef::new("variable"))),
            },
            Attribute {
                name: "attr2".into(),
                value: Some(Operand::Literal(Literal::new("yes"))),
            },
        ]
    );
}

#[test]
fn test_literal_kinds() {
    for (source, value) in [
        ("{1.23 :round}", "1.23"),
        ("{John :capitalize @attr}", "John"),
        ("{|quoted| :capitalize}", "quoted"),
        (r"{|escaped \| \\ literal|}", r"escaped | \ literal"),
        ("{-2.5e3}", "-2.5e3"),
    ] {
        let Expression::Literal(expr) = single_expression(source) else {
            panic!("expected literal expression for {source}");
        };
        assert_eq!(expr.arg.value, value, "{source}");
    }
}

#[test]
fn test_whitespace_inside_braces() {
    let Expression::Variable(expr) = single_expression("{  $x   :number  }") else {
        panic!("expected variable expression");
    };
    assert_eq!(expr.arg.name, "x");
    assert_eq!(expr.annotation.unwrap().to_string(), ":number");
}

#[test]
fn test_unsupported_annotations_keep_source() {
    for (source, annotation) in [
        ("{!reserved}", "!reserved"),
        ("{!reserved opt=42}", "!reserved opt=42"),
        ("{^private}", "^private"),
        (r"{^private |pipe escape: \| |}", r"^private |pipe escape: \| |"),
        (r"{^private |backslash escape: \\ |}", r"^private |backslash escape: \\ |"),
    ] {
        let Expression::Unsupported(expr) = single_expression(source) else {
            panic!("expected unsupported expression for {source}");
        };
        assert_eq!(expr.annotation.source, annotation);
    }
}

#[test]
fn test_unsupported_annotation_on_operand() {
    let Expression::Variable(expr) = single_expression("{$x !horse}") else {
        panic!("expected variable expression");
    };
    assert!(matches!(expr.annotation, Some(Annotation::Unsupported(_))));
}

// =============================================================================
// Markup
// =============================================================================

#[test]
fn test_open_and_close_markup() {
    let parts = pattern_parts("Hello, {#strong opt=42 @attr}John{/strong}!");
    let PatternPart::Markup(open) = &parts[1] else {
        panic!("expected markup");
    };
    assert_eq!(open.kind, MarkupKind::Open);
    assert_eq!(open.name, "strong");
    assert_eq!(open.options.len(), 1);
    assert_eq!(open.attributes.len(), 1);
    assert_eq!(parts[2], PatternPart::from("John"));
    assert_eq!(
        parts[3],
        PatternPart::Markup(Markup {
            kind: MarkupKind::Close,
            name: "strong".into(),
            options: Vec::new(),
            attributes: Vec::new(),
        })
    );
}

#[test]
fn test_standalone_markup() {
    let parts = pattern_parts("Hello, {#strong text=|John| /}!");
    let PatternPart::Markup(markup) = &parts[1] else {
        panic!("expected markup");
    };
    assert_eq!(markup.kind, MarkupKind::Standalone);
}

#[test]
fn test_markup_allows_one_space_before_sigil() {
    let parts = pattern_parts("{ #b}x{ /b}");
    assert!(matches!(parts[0], PatternPart::Markup(_)));
    assert!(matches!(parts[2], PatternPart::Markup(_)));
}

// =============================================================================
// Complex Messages
// =============================================================================

#[test]
fn test_declarations_then_quoted_pattern() {
    let message = parse(
        ".input {$date :datetime weekday=long month=medium day=short}\n\
         .local $numPigs = {$pigs :integer}\n\
         {{On {$date} you had this many pigs: {$numPigs}}}",
    )
    .unwrap();
    let Message::Pattern(message) = message else {
        panic!("expected pattern message");
    };
    assert_eq!(message.declarations.len(), 2);
    assert_eq!(message.declarations[0].name(), Some("date"));
    assert_eq!(message.declarations[1].name(), Some("numPigs"));
    assert_eq!(message.pattern.parts.len(), 4);
}

#[test]
fn test_input_allows_whitespace_inside_braces() {
    let message = parse(".input { $x :number } {{{$x}}}").unwrap();
    let Declaration::Input(input) = &message.declarations()[0] else {
        panic!("expected input declaration");
    };
    assert_eq!(input.name, "x");
}

#[test]
fn test_quoted_pattern_without_declarations() {
    let message = parse("{{.starts with a dot}}").unwrap();
    let Message::Pattern(message) = message else {
        panic!("expected pattern message");
    };
    assert!(message.declarations.is_empty());
    assert_eq!(
        message.pattern.parts,
        vec![PatternPart::from(".starts with a dot")]
    );
}

#[test]
fn test_trailing_whitespace_after_body() {
    parse(".local $x = {1} {{x}}\n\n").unwrap();
}

#[test]
fn test_matcher() {
    let message = parse(
        ".match {$count :integer}\n\
         0   {{You have no notifications.}}\n\
         one {{You have {$count} notification.}}\n\
         *   {{You have {$count} notifications.}}",
    )
    .unwrap();
    let Message::Select(message) = message else {
        panic!("expected select message");
    };
    assert_eq!(message.selectors.len(), 1);
    assert_eq!(message.variants.len(), 3);
    assert_eq!(
        message.variants[0].keys,
        vec![VariantKey::Literal(Literal::new("0"))]
    );
    assert_eq!(message.variants[2].keys, vec![VariantKey::Catchall]);
    assert!(message.variants[2].is_fallback());
}

#[test]
fn test_matcher_with_two_selectors() {
    let message = parse(".match {$a :integer} {$b :integer}\n* * {{a = {$a}, b = {$b}}}").unwrap();
    let Message::Select(message) = message else {
        panic!("expected select message");
    };
    assert_eq!(message.selectors.len(), 2);
    assert_eq!(message.variants[0].keys.len(), 2);
}

#[test]
fn test_unsupported_statement() {
    let message = parse(
        ".unknown reserved-body |literal| {$x ^private @attr}\n\
         .match {$count :integer}\n\
         * {{Reserved statement}}",
    )
    .unwrap();
    let Declaration::Unsupported(statement) = &message.declarations()[0] else {
        panic!("expected unsupported statement");
    };
    assert_eq!(statement.keyword, "unknown");
    assert_eq!(statement.body.as_deref(), Some("reserved-body |literal|"));
    assert_eq!(statement.expressions.len(), 1);
    assert_eq!(message.declarations()[0].name(), None);
}

#[test]
fn test_unsupported_statement_before_quoted_pattern() {
    let message = parse(".unknown {$x} {$y} {{body}}").unwrap();
    let Declaration::Unsupported(statement) = &message.declarations()[0] else {
        panic!("expected unsupported statement");
    };
    assert!(statement.body.is_none());
    assert_eq!(statement.expressions.len(), 2);
}

#[test]
fn test_keywords_match_whole_names_only() {
    for (source, keyword) in [
        (".inputs {$x} {{body}}", "inputs"),
        (".locale {$x} {{body}}", "locale"),
        (".matches {$x} {{body}}", "matches"),
    ] {
        let message = parse(source).unwrap();
        let Declaration::Unsupported(statement) = &message.declarations()[0] else {
            panic!("expected unsupported statement for {source}");
        };
        assert_eq!(statement.keyword, keyword);
    }
}

#[test]
fn test_keyword_followed_by_brace() {
    let message = parse(".input{$x :number}.match{$x} * {{ok}}").unwrap();
    assert!(matches!(message.declarations()[0], Declaration::Input(_)));
    assert!(matches!(message, Message::Select(_)));
}

#[test]
fn test_parse_message_skips_validation() {
    let source = ".match {$a} {$b}\n* * {{a = {$a}, b = {$b}}}";
    assert!(parse_message(source).is_ok());
    assert!(matches!(parse(source), Err(MessageError::DataModel(_))));
}

// =============================================================================
// Syntax Errors
// =============================================================================

#[test]
fn test_syntax_errors() {
    for source in [
        "}",
        " }}",
        "{$42var}",
        "{{Missing end braces",
        "{{Missing one end brace}",
        "Unknown {{expression}}",
        ".local $var = {|no message body|}",
        ".local $var = invalid",
        ".match {$count} {{Missing variants}}",
        ".match {$count} *",
        ".match {{$count}}",
        "{:func @}",
        "{:func :func}",
        "{:func @2}",
        "{:func @attr=}",
        "{:func @attr opt=2}",
        "{|unterminated}",
    ] {
        assert!(
            matches!(parse(source), Err(MessageError::Parse(_))),
            "expected a parse error for {source:?}"
        );
    }
}

#[test]
fn test_error_position() {
    let err = parse_message("Hello\n{$x :fn opt}").unwrap_err();
    let ParseError::Syntax {
        line,
        message,
        remaining,
        ..
    } = &err
    else {
        panic!("expected syntax error, got {err:?}");
    };
    assert_eq!(*line, 2);
    assert_eq!(message, "option 'opt' is missing '='");
    assert_eq!(remaining, "}");
    assert_eq!(err.position(), (2, 12));
}

#[test]
fn test_unexpected_end_of_input() {
    let err = parse_message("{$x").unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEof { line: 1, column: 4 });
}

#[test]
fn test_error_display() {
    let err = parse_message("}").unwrap_err();
    assert!(err.to_string().starts_with("syntax error at 1:1: "));
}
