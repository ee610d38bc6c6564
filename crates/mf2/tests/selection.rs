//! Integration tests for `.match` variant selection

use mf2::{
    FormatError, FunctionError, Inputs, Locale, Options, Registry, Value, format_message, inputs,
    locale, parse, parse_message,
};
use proptest::prelude::*;

fn format_with(
    source: &str,
    inputs: &Inputs,
    locale: &Locale,
) -> Result<String, FormatError> {
    let message = parse(source).unwrap();
    format_message(&message, locale, inputs, &Registry::with_defaults())
}

fn format(source: &str, inputs: &Inputs) -> Result<String, FormatError> {
    format_with(source, inputs, &locale!("en"))
}

// =============================================================================
// Custom Selectors
// =============================================================================

fn plain(operand: Option<&Value>, _: &Locale, _: &Options) -> Result<Value, FunctionError> {
    operand
        .cloned()
        .ok_or_else(|| FunctionError::OperandMismatch("missing operand".into()))
}

/// Claims to match `1` and then `one`, whatever the operand.
fn eager_select(
    _: Option<&Value>,
    _: &Locale,
    _: &Options,
    _: &[String],
) -> Result<Vec<String>, FunctionError> {
    Ok(vec!["1".into(), "one".into()])
}

fn custom_registry() -> Registry {
    Registry::new()
        .with_formatter("integer", plain)
        .with_selector("integer", eager_select)
}

#[test]
fn test_selector_preference_order_wins_over_variant_order() {
    let message = parse(
        ".match {$count :integer}\n\
         one {{You have {$count} notification.}}\n\
         1   {{You have one notification.}}\n\
         *   {{You have {$count} notifications.}}",
    )
    .unwrap();
    let text = format_message(
        &message,
        &locale!("en"),
        &inputs! { "count" => 1 },
        &custom_registry(),
    )
    .unwrap();
    assert_eq!(text, "You have one notification.");
}

#[test]
fn test_catchall_when_no_key_matches() {
    let message = parse(
        ".match {$count :integer}\n\
         xxx {{You have one notification.}}\n\
         yyy {{You have no notifications.}}\n\
         *   {{You have {$count} notifications.}}",
    )
    .unwrap();
    let text = format_message(
        &message,
        &locale!("en"),
        &inputs! { "count" => 42 },
        &custom_registry(),
    )
    .unwrap();
    assert_eq!(text, "You have 42 notifications.");
}

// =============================================================================
// Default Functions
// =============================================================================

const NOTIFICATIONS: &str = ".match {$count :integer}\n\
                             0   {{You have no notifications.}}\n\
                             one {{You have {$count} notification.}}\n\
                             *   {{You have {$count} notifications.}}";

#[test]
fn test_plural_categories() {
    for (count, expected) in [
        (Value::from(0), "You have no notifications."),
        (Value::from(1), "You have 1 notification."),
        (Value::from(7), "You have 7 notifications."),
        (Value::from("1"), "You have 1 notification."),
    ] {
        assert_eq!(
            format(NOTIFICATIONS, &inputs! { "count" => count }).unwrap(),
            expected
        );
    }
}

#[test]
fn test_integer_truncates_before_selecting() {
    assert_eq!(
        format(NOTIFICATIONS, &inputs! { "count" => 1.7 }).unwrap(),
        "You have 1.7 notification."
    );
}

#[test]
fn test_fractional_number_is_other_in_english() {
    let source = ".match {$n :number} one {{one}} * {{other}}";
    assert_eq!(format(source, &inputs! { "n" => 1 }).unwrap(), "one");
    assert_eq!(format(source, &inputs! { "n" => 1.5 }).unwrap(), "other");
}

#[test]
fn test_ordinal_selection() {
    let source = ".match {$n :number select=ordinal}\n\
                  one {{{$n}st}}\n\
                  two {{{$n}nd}}\n\
                  few {{{$n}rd}}\n\
                  *   {{{$n}th}}";
    let rendered: Vec<String> = [1, 2, 3, 4, 11, 22, 103]
        .into_iter()
        .map(|n| format(source, &inputs! { "n" => n }).unwrap())
        .collect();
    assert_eq!(
        rendered,
        ["1st", "2nd", "3rd", "4th", "11th", "22nd", "103rd"]
    );
}

#[test]
fn test_exact_selection_ignores_categories() {
    let source = ".match {$n :number select=exact} one {{category}} * {{other}}";
    assert_eq!(format(source, &inputs! { "n" => 1 }).unwrap(), "other");
    let source = ".match {$n :number select=exact} 1 {{exact}} * {{other}}";
    assert_eq!(format(source, &inputs! { "n" => 1 }).unwrap(), "exact");
}

#[test]
fn test_exact_key_beats_category() {
    let source = ".match {$n :integer} one {{category}} 1 {{exact}} * {{other}}";
    assert_eq!(format(source, &inputs! { "n" => 1 }).unwrap(), "exact");
}

#[test]
fn test_russian_plural_categories() {
    let source = ".match {$n :integer}\n\
                  one  {{{$n} файл}}\n\
                  few  {{{$n} файла}}\n\
                  many {{{$n} файлов}}\n\
                  *    {{{$n} файла}}";
    let ru = locale!("ru");
    let cases = [(1, "1 файл"), (3, "3 файла"), (5, "5 файлов"), (21, "21 файл")];
    for (n, expected) in cases {
        assert_eq!(
            format_with(source, &inputs! { "n" => n }, &ru).unwrap(),
            expected
        );
    }
}

#[test]
fn test_string_selector() {
    let source = ".match {$pet :string} cat {{meow}} dog {{woof}} * {{...}}";
    assert_eq!(format(source, &inputs! { "pet" => "dog" }).unwrap(), "woof");
    assert_eq!(format(source, &inputs! { "pet" => "fish" }).unwrap(), "...");
}

#[test]
fn test_annotation_from_input_declaration() {
    let source = ".input {$count :integer}\n.match {$count}\none {{one}}\n* {{other}}";
    assert_eq!(format(source, &inputs! { "count" => 1 }).unwrap(), "one");
}

#[test]
fn test_selected_pattern_sees_declarations() {
    let source = ".local $total = {$count :integer}\n\
                  .match {$total}\n\
                  one {{just {$total}}}\n\
                  *   {{{$total} in all}}";
    assert_eq!(
        format(source, &inputs! { "count" => 9 }).unwrap(),
        "9 in all"
    );
}

// =============================================================================
// Multiple Selectors
// =============================================================================

#[test]
fn test_first_selector_is_most_significant() {
    let source = ".match {$a :string} {$b :string}\n\
                  x y {{xy}}\n\
                  * y {{_y}}\n\
                  x * {{x_}}\n\
                  * * {{__}}";
    for (a, b, expected) in [("x", "y", "xy"), ("x", "z", "x_"), ("w", "y", "_y"), ("w", "z", "__")]
    {
        assert_eq!(
            format(source, &inputs! { "a" => a, "b" => b }).unwrap(),
            expected,
            "a={a} b={b}"
        );
    }
}

#[test]
fn test_repeated_keys_pick_first_variant() {
    let source = ".match {$x :string} a {{first}} a {{second}} * {{other}}";
    assert_eq!(format(source, &inputs! { "x" => "a" }).unwrap(), "first");
}

// =============================================================================
// Selection Errors
// =============================================================================

#[test]
fn test_unannotated_selector() {
    let message = parse_message(".match {$count}\n* {{x}}").unwrap();
    let err = format_message(
        &message,
        &locale!("en"),
        &inputs! { "count" => 1 },
        &Registry::with_defaults(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FormatError::UnannotatedSelector { ref selector } if selector == "{$count}"
    ));
    assert!(err.is_selection_error());
}

#[test]
fn test_no_matching_variant() {
    let message = parse_message(".match {$n :integer}\n0 {{zero}}").unwrap();
    let err = format_message(
        &message,
        &locale!("en"),
        &inputs! { "n" => 5 },
        &Registry::with_defaults(),
    )
    .unwrap_err();
    assert!(matches!(err, FormatError::NoMatchingVariant));
    assert!(err.is_selection_error());
}

#[test]
fn test_selector_failures_are_wrapped() {
    let err = format(
        ".match {$n :number select=bogus} * {{x}}",
        &inputs! { "n" => 1 },
    )
    .unwrap_err();
    let FormatError::Selection { function, source } = &err else {
        panic!("expected selection error, got {err:?}");
    };
    assert_eq!(function, "number");
    assert!(matches!(source, FunctionError::InvalidExpression(_)));

    let err = format(NOTIFICATIONS, &inputs! { "count" => "many" }).unwrap_err();
    assert!(matches!(err, FormatError::Selection { .. }));
}

#[test]
fn test_formatter_without_selector() {
    let registry = Registry::new().with_formatter("plain", plain);
    let message = parse(".match {$x :plain} * {{x}}").unwrap();
    let err = format_message(&message, &locale!("en"), &inputs! { "x" => 1 }, &registry)
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::UnknownFunction { ref name, .. } if name == "plain"
    ));
}

#[test]
fn test_missing_selector_operand() {
    let err = format(".match {$missing :integer} * {{x}}", &inputs! {}).unwrap_err();
    assert!(matches!(err, FormatError::UnresolvedVariable { .. }));
    assert!(err.is_resolution_error());
}

// =============================================================================
// Selection Properties
// =============================================================================

/// Matches the space-separated keys its operand lists, in that order.
fn listed(
    operand: Option<&Value>,
    _: &Locale,
    _: &Options,
    _: &[String],
) -> Result<Vec<String>, FunctionError> {
    let listed = operand.map(ToString::to_string).unwrap_or_default();
    Ok(listed.split_whitespace().map(String::from).collect())
}

/// Selector count, variant key rows, and the keys each selector reports.
type MatchCase = (usize, Vec<Vec<&'static str>>, Vec<Vec<&'static str>>);

fn match_case() -> impl Strategy<Value = MatchCase> {
    (1..=3usize).prop_flat_map(|width| {
        let row = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "*"]), width);
        let reported = prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 0..4);
        (
            Just(width),
            prop::collection::vec(row, 0..8),
            prop::collection::vec(reported, width),
        )
    })
}

/// Variant `i` reads `v{i}`; the trailing catch-all reads `fallback`.
fn match_source(width: usize, rows: &[Vec<&str>]) -> String {
    let selectors: Vec<String> = (0..width).map(|i| format!("{{$s{i} :listed}}")).collect();
    let mut source = format!(".match {}\n", selectors.join(" "));
    for (index, row) in rows.iter().enumerate() {
        source.push_str(&format!("{} {{{{v{index}}}}}\n", row.join(" ")));
    }
    source.push_str(&format!("{} {{{{fallback}}}}", vec!["*"; width].join(" ")));
    source
}

proptest! {
    #[test]
    fn selection_picks_one_eligible_variant((width, rows, reported) in match_case()) {
        let message = parse(&match_source(width, &rows)).unwrap();
        let registry = Registry::new().with_selector("listed", listed);
        let inputs: Inputs = reported
            .iter()
            .enumerate()
            .map(|(i, keys)| (format!("s{i}"), Value::from(keys.join(" "))))
            .collect();
        let en = locale!("en");

        let first = format_message(&message, &en, &inputs, &registry);
        prop_assert!(first.is_ok(), "{:?}", first);
        let first = first.unwrap();
        if let Some(index) = first.strip_prefix('v') {
            let row = &rows[index.parse::<usize>().unwrap()];
            prop_assert!(
                row.iter().zip(&reported).all(|(key, keys)| *key == "*" || keys.contains(key)),
                "{} is not eligible", first
            );
        } else {
            prop_assert_eq!(first.as_str(), "fallback");
        }

        let second = format_message(&message, &en, &inputs, &registry).unwrap();
        prop_assert_eq!(first, second);
    }
}
