//! Reading the sample definition files end to end

use rstest::rstest;
use unpick::unpick::ast::{
    DataType, DisplayFormat, Expression, FieldRef, GroupKind, GroupScope, Item, Literal, Radix,
    TargetField, TargetMethod,
};
use unpick::unpick::loader::{DslLoader, LoaderError};
use unpick::unpick::testing::Samples;
use unpick::unpick::{ParseErrorKind, Tree};

#[rstest]
#[case("colors.unpick", 2)]
#[case("flags.unpick", 1)]
#[case("formats.unpick", 4)]
#[case("targets.unpick", 7)]
#[case("kitchen.unpick", 6)]
fn test_samples_parse(#[case] name: &str, #[case] items: usize) {
    assert_eq!(Samples::tree(name).items.len(), items);
}

#[test]
fn test_colors_sample() {
    let tree = Samples::tree("colors.unpick");
    let group = tree.groups().next().expect("one group");

    assert_eq!(group.scope, GroupScope::Class("Example".to_string()));
    assert_eq!(group.kind, GroupKind::Const);
    assert_eq!(group.data_type, DataType::Int);
    assert_eq!(group.name, None);
    assert_eq!(
        group.constants[0].key,
        Literal::Integer {
            value: 0xFF0000,
            radix: Radix::Hex
        }
    );
    assert_eq!(
        group.constants[2].value,
        Expression::field("Example", "PINK")
    );
}

#[test]
fn test_targets_sample() {
    let tree = Samples::tree("targets.unpick");

    let ratios: Vec<_> = tree
        .groups()
        .filter(|group| group.name.as_deref() == Some("ratio"))
        .collect();
    assert_eq!(ratios.len(), 2);
    assert!(ratios[0].strict);
    assert!(!ratios[1].strict);

    let targets: Vec<_> = tree.target_methods().collect();
    assert_eq!(
        targets[0],
        &TargetMethod::new("com.example.Painter", "setColor", "(I)V").with_param(0, "color")
    );
    assert_eq!(targets[1].return_group.as_deref(), Some("color"));

    assert_eq!(
        tree.target_fields().collect::<Vec<_>>(),
        vec![&TargetField {
            class: "com.example.Painter".to_string(),
            field: "color".to_string(),
            descriptor: "I".to_string(),
            group: "color".to_string(),
        }]
    );
}

#[test]
fn test_kitchen_sample() {
    let tree = Samples::tree("kitchen.unpick");
    let groups: Vec<_> = tree.groups().collect();

    assert_eq!(
        groups[0].constants[1].key,
        Literal::string("tab\there")
    );

    assert_eq!(groups[1].scope, GroupScope::Package("com.example".to_string()));
    assert_eq!(
        groups[1].constants[1].value,
        Expression::binary(
            Expression::field("com.example.Bits", "B"),
            unpick::unpick::ast::BinaryOp::BitOr,
            Expression::Field(
                FieldRef::new("com.example.Bits", "A").with_type(DataType::Long)
            ),
        )
    );

    let sizes = groups[2];
    assert_eq!(
        sizes.scope,
        GroupScope::Method {
            class: "com.example.Widget".to_string(),
            name: "<init>".to_string(),
            descriptor: "(ILjava/lang/String;)V".to_string(),
        }
    );
    assert!(sizes.strict);
    assert_eq!(sizes.constants[0].key, Literal::int(-1));
    assert_eq!(
        sizes.constants[3].value,
        Expression::binary(
            Expression::Field(
                FieldRef::new("com.example.Widget", "size")
                    .instance()
                    .with_type(DataType::Int)
            ),
            unpick::unpick::ast::BinaryOp::Ushr,
            Expression::Literal(Literal::int(2)),
        )
    );

    assert_eq!(groups[3].format, Some(DisplayFormat::Char));
    assert_eq!(groups[3].constants[0].key, Literal::Character(u16::from(b'a')));
    assert_eq!(groups[4].constants[0].key, Literal::Float(1.5));

    let widget = tree.target_methods().next().expect("target method");
    assert_eq!(widget.param_group(1), Some("greetings"));
}

#[test]
fn test_tokenize_ends_with_eof() {
    let tokens = Samples::loader("flags.unpick")
        .tokenize()
        .expect("sample tokenizes");
    assert_eq!(
        tokens.last().map(|spanned| &spanned.token),
        Some(&unpick::unpick::lexing::Token::Eof)
    );
}

#[test]
fn test_merging_samples() {
    let merged = Tree::merge_all([
        Samples::tree("targets.unpick"),
        DslLoader::from_string("unpick v3\n\nconst int color\n\t0xFFFFFF = com.example.Colors.WHITE\n")
            .parse()
            .expect("valid definitions"),
    ]);
    let colors: Vec<_> = merged
        .groups()
        .filter(|group| group.name.as_deref() == Some("color"))
        .collect();
    assert_eq!(colors.len(), 1);
    assert_eq!(colors[0].constants.len(), 4);
    assert!(merged
        .items
        .iter()
        .any(|item| matches!(item, Item::TargetField(_))));
}

#[test]
fn test_load_all_reports_the_failing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let broken = dir.path().join("broken.unpick");
    std::fs::write(&broken, "unpick v3\n\nconst int\n\t1 = a.B.X\n\t1 = a.B.Y\n").expect("write");

    let error = unpick::unpick::loader::load_all([Samples::path("colors.unpick"), broken.clone()])
        .expect_err("duplicate key");
    match &error {
        LoaderError::Parse { origin, error } => {
            assert_eq!(origin, &broken.display().to_string());
            assert!(matches!(error.kind, ParseErrorKind::DuplicateKey(_)));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(error.to_string().ends_with("5:2: duplicate constant key 1"));
}
