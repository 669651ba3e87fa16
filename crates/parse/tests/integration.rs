use gale_core::{Config, PropertyDescriptor};
use gale_parse::escape::ESCAPED_CHARS;
use gale_parse::{escape, unescape, ClassParser};
use pretty_assertions::assert_eq;

fn parser() -> ClassParser {
    let config = Config::from_json(
        r#"{
            "property": {
                "p": "padding",
                "pt": "padding-top",
                "m": "margin",
                "mx": "margin-inline",
                "bg": "background",
                "w": "width"
            },
            "classes": {
                "display": { "flex": "flex", "inline-flex": "inline-flex" },
                "alignItems": { "items-center": "center" }
            },
            "safelist": ["card"]
        }"#,
    )
    .expect("Failed to load config");
    ClassParser::new(&config).expect("Failed to build pattern")
}

#[test]
fn test_escape_round_trip() {
    let mut samples: Vec<String> = vec![
        "md:bg-blue".into(),
        "w-[calc(100%_-_2px)]".into(),
        "2xl:p-4".into(),
        "9".into(),
        "(&:hover):bg-red/50".into(),
        "a b#c{d}e.f;g?h%i&j,k@l+m*n~o'p\"q!r^s$t=u>v|w/x".into(),
    ];
    samples.push(ESCAPED_CHARS.iter().collect());
    samples.push(format!("1{}", ESCAPED_CHARS.iter().collect::<String>()));

    for sample in samples {
        assert_eq!(unescape(&escape(&sample)), sample, "{}", sample);
    }
}

#[test]
fn test_escape_leading_digit() {
    assert_eq!(escape("2xl"), "\\32 xl");
    assert_eq!(escape("x2"), "x2");
    assert_eq!(unescape("\\32 xl\\:p-4"), "2xl:p-4");
}

#[test]
fn test_parse_fields() {
    let parsed = parser().parse("md:bg-red-500/40").unwrap();
    assert_eq!(parsed.prefix.as_deref(), Some("md"));
    assert_eq!(parsed.utility, "bg");
    assert_eq!(parsed.value, "red-500");
    assert_eq!(parsed.unit, "");
    assert_eq!(parsed.second_value.as_deref(), Some("40"));
    assert_eq!(parsed.second_unit, None);
    assert_eq!(parsed.raw, "md:bg-red-500/40");
}

#[test]
fn test_longest_type_first() {
    let parser = parser();
    assert_eq!(parser.parse("pt-4px").unwrap().utility, "pt");
    assert_eq!(parser.parse("mx-auto").unwrap().utility, "mx");
    assert_eq!(parser.parse("m-auto").unwrap().utility, "m");
}

#[test]
fn test_named_classes_short_circuit() {
    let parser = parser();
    let parsed = parser.parse("inline-flex").unwrap();
    assert_eq!(parsed.utility, "inline-flex");
    assert_eq!(parsed.value, "");

    let parsed = parser.parse("hover:items-center").unwrap();
    assert_eq!(parsed.prefix.as_deref(), Some("hover"));
    assert_eq!(parsed.utility, "items-center");
}

#[test]
fn test_safelist_fallback() {
    let parsed = parser().parse("card").unwrap();
    assert_eq!(parsed.utility, "card");
    assert_eq!(parsed.value, "");
}

#[test]
fn test_property_list_is_matched_whole() {
    let parsed = parser().parse("[p,marginTop]-2rem").unwrap();
    assert!(parsed.is_property_list());
    assert_eq!(parsed.utility, "[p,marginTop]");
    assert_eq!((parsed.value.as_str(), parsed.unit.as_str()), ("2", "rem"));
}

#[test]
fn test_rebuilt_pattern_sees_new_types() {
    let config = Config::new().with_property("bg", PropertyDescriptor::Property("background".into()));
    assert!(ClassParser::new(&config).unwrap().parse("gap-2").is_none());

    let config = config.with_property("gap", PropertyDescriptor::Property("gap".into()));
    assert_eq!(ClassParser::new(&config).unwrap().parse("gap-2").unwrap().utility, "gap");
}
