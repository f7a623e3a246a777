use cas_attrs::ErrorKind;
use cas_error::{Error, ErrorKind};

#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown variable `{}`", name),
    labels = ["this variable", "first use"],
    help = "define the variable before using it",
)]
struct UnknownVariable {
    name: String,
}

#[derive(Debug, ErrorKind)]
#[error(message = "something went wrong")]
struct Unlabeled;

#[test]
fn derived_message() {
    let kind = UnknownVariable { name: "x".to_string() };
    assert_eq!(kind.message(), "unknown variable `x`");
    assert_eq!(Unlabeled.message(), "something went wrong");
}

#[test]
fn display_includes_first_span() {
    let err = Error::new(vec![4..5], UnknownVariable { name: "y".to_string() });
    assert_eq!(err.to_string(), "unknown variable `y` (at 4..5)");

    let err = Error::new(Vec::new(), Unlabeled);
    assert_eq!(err.to_string(), "something went wrong");
}

#[test]
fn report_contains_labels_and_help() {
    let input = "2 + y";
    let err = Error::new(vec![4..5], UnknownVariable { name: "y".to_string() });
    let report = err.report_to_string("input", input);
    let plain = String::from_utf8(strip_ansi_escapes::strip(report.as_bytes())).unwrap();

    assert!(plain.contains("unknown variable `y`"));
    assert!(plain.contains("this variable"));
    assert!(plain.contains("define the variable before using it"));

    // only one span was given, so the second label is dropped
    assert!(!plain.contains("first use"));
}
