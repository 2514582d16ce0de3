use choice_form::ChoiceError;
use choice_form::choice_list::{
    ChoiceEntry, ChoiceLabelResolver, ChoiceSource, ChoiceValueResolver, ChoiceViewNode,
    PreferredChoices,
};
use choice_form::form::fields::{
    ChoiceField, ChoiceFieldOptions, ChoiceFieldOptionsBuilder, ChoiceInputKind,
    ChoiceTranslationDomain, PLACEHOLDER_NAME, Placeholder,
};
use choice_form::form::{
    FieldData, FormFieldOptions, FormFieldValidationError, ParentView, RawInput,
    TranslationDomain, ViewData,
};
use serde::Serialize;
use serde_json::{Value, json};

const AUTHORS: [(&str, &str); 5] = [
    ("Bernhard", "a"),
    ("Fabien", "b"),
    ("Kris", "c"),
    ("Jon", "d"),
    ("Roman", "e"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Author {
    id: u32,
    name: &'static str,
}

fn authors() -> Vec<Author> {
    ["Bernhard", "Fabien", "Kris", "Jon", "Roman"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Author { id, name })
        .collect()
}

fn grouped_authors() -> Vec<ChoiceEntry<&'static str>> {
    vec![
        ChoiceEntry::group(
            "Symfony",
            [
                ChoiceEntry::labeled("Bernhard", "a"),
                ChoiceEntry::labeled("Fabien", "b"),
                ChoiceEntry::labeled("Kris", "c"),
            ],
        ),
        ChoiceEntry::group(
            "Doctrine",
            [
                ChoiceEntry::labeled("Jon", "d"),
                ChoiceEntry::labeled("Roman", "e"),
            ],
        ),
    ]
}

fn field_options(required: bool) -> FormFieldOptions {
    FormFieldOptions {
        required,
        ..FormFieldOptions::new("author")
    }
}

fn author_field(multiple: bool, expanded: bool, required: bool) -> ChoiceField<&'static str> {
    ChoiceField::new(
        field_options(required),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::labeled(AUTHORS))
            .multiple(multiple)
            .expanded(expanded)
            .build(),
    )
    .unwrap()
}

fn checked<'a>(field: &'a ChoiceField<&'static str>) -> Vec<&'a str> {
    field
        .children()
        .iter()
        .filter(|child| child.data())
        .map(|child| child.name())
        .collect()
}

#[test]
fn submit_single_collapsed() {
    let mut field = author_field(false, false, true);

    field.submit("b").unwrap();

    assert_eq!(field.data(), Some(&FieldData::Single("b")));
    assert_eq!(field.view_data(), &ViewData::Text("b".to_owned()));
    assert!(field.is_synchronized());
    assert!(field.extra_data().is_empty());
}

#[test]
fn submit_single_collapsed_unknown_value() {
    let mut field = author_field(false, false, true);

    field.submit("foobar").unwrap();

    assert_eq!(field.data(), None);
    assert_eq!(field.view_data(), &ViewData::Text("foobar".to_owned()));
    assert!(!field.is_synchronized());
    assert_eq!(
        field.synchronization_error(),
        Some(&FormFieldValidationError::invalid_value("foobar"))
    );
}

#[test]
fn submit_single_collapsed_nothing() {
    for input in [RawInput::Null, RawInput::False, RawInput::from("")] {
        let mut field = author_field(false, false, true);

        field.submit(input.clone()).unwrap();

        assert_eq!(field.data(), None, "{input:?}");
        assert_eq!(field.view_data(), &ViewData::Text(String::new()), "{input:?}");
        assert!(field.is_synchronized(), "{input:?}");
    }
}

#[test]
fn submit_single_collapsed_nothing_without_choices() {
    let mut field = ChoiceField::<&str>::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::default(),
    )
    .unwrap();

    field.submit(None::<&str>).unwrap();

    assert_eq!(field.data(), None);
    assert!(field.is_synchronized());
}

#[test]
fn submit_single_collapsed_explicit_empty_choice() {
    let mut field = ChoiceField::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::labeled([("Empty", "EMPTY_CHOICE")]))
            .choice_value(ChoiceValueResolver::callback(|_: &&str| String::new()))
            .build(),
    )
    .unwrap();

    field.submit("").unwrap();

    assert_eq!(field.data(), Some(&FieldData::Single("EMPTY_CHOICE")));
    assert_eq!(field.view_data(), &ViewData::Text(String::new()));
    assert!(field.is_synchronized());
}

#[test]
fn submit_single_collapsed_rejects_lists() {
    let mut field = author_field(false, false, true);

    field.submit(["a", "b"]).unwrap();

    assert_eq!(field.data(), None);
    assert!(!field.is_synchronized());
    assert_eq!(
        field.synchronization_error(),
        Some(&FormFieldValidationError::ExpectedScalar)
    );
}

#[test]
fn submit_multiple_collapsed() {
    let mut field = author_field(true, false, true);

    field.submit(["a", "b"]).unwrap();

    assert_eq!(field.data(), Some(&FieldData::Multiple(vec!["a", "b"])));
    assert_eq!(
        field.view_data(),
        &ViewData::List(vec!["a".to_owned(), "b".to_owned()])
    );
    assert!(field.is_synchronized());
}

#[test]
fn submit_multiple_collapsed_nothing() {
    for input in [RawInput::Null, RawInput::List(Vec::new())] {
        let mut field = author_field(true, false, true);

        field.submit(input).unwrap();

        assert_eq!(field.data(), Some(&FieldData::Multiple(Vec::new())));
        assert_eq!(field.view_data(), &ViewData::List(Vec::new()));
        assert!(field.is_synchronized());
    }
}

#[test]
fn submit_multiple_is_all_or_nothing() {
    let mut field = author_field(true, false, true);

    field.submit(["a", "foobar"]).unwrap();

    assert_eq!(field.data(), None);
    assert_eq!(
        field.view_data(),
        &ViewData::List(vec!["a".to_owned(), "foobar".to_owned()])
    );
    assert!(!field.is_synchronized());
}

#[test]
fn submit_multiple_rejects_scalars() {
    let mut field = author_field(true, true, true);

    field.submit("foobar").unwrap();

    assert_eq!(field.data(), None);
    assert_eq!(field.view_data(), &ViewData::Text("foobar".to_owned()));
    assert!(!field.is_synchronized());
    assert_eq!(
        field.synchronization_error(),
        Some(&FormFieldValidationError::ExpectedList)
    );
    assert!(checked(&field).is_empty());
}

#[test]
fn submit_single_expanded_required() {
    let mut field = author_field(false, true, true);
    assert_eq!(field.len(), 5);
    assert!(!field.has_child(PLACEHOLDER_NAME));

    field.submit("b").unwrap();

    assert_eq!(field.data(), Some(&FieldData::Single("b")));
    assert_eq!(field.view_data(), &ViewData::Text("b".to_owned()));
    assert!(field.is_synchronized());
    assert_eq!(checked(&field), ["1"]);
    assert_eq!(field.child("1").and_then(|child| child.view_data()), Some("b"));
    assert_eq!(field.child("0").and_then(|child| child.view_data()), None);
    assert!(
        field
            .children()
            .iter()
            .all(|child| child.kind() == ChoiceInputKind::Radio && child.is_required())
    );
}

#[test]
fn submit_single_expanded_not_required() {
    let mut field = author_field(false, true, false);
    assert_eq!(field.len(), 6);
    assert_eq!(field.children()[0].name(), PLACEHOLDER_NAME);

    field.submit("b").unwrap();

    assert_eq!(field.data(), Some(&FieldData::Single("b")));
    assert_eq!(checked(&field), ["1"]);
    assert_eq!(
        field.child(PLACEHOLDER_NAME).and_then(|child| child.view_data()),
        None
    );
}

#[test]
fn submit_single_expanded_invalid_choice_checks_nothing() {
    let mut field = author_field(false, true, false);

    field.submit("foobar").unwrap();

    assert_eq!(field.data(), None);
    assert_eq!(field.view_data(), &ViewData::Text("foobar".to_owned()));
    assert!(!field.is_synchronized());
    assert!(checked(&field).is_empty());
}

#[test]
fn submit_single_expanded_nothing() {
    for input in [RawInput::Null, RawInput::False, RawInput::from("")] {
        let mut field = author_field(false, true, false);

        field.submit(input.clone()).unwrap();

        assert_eq!(field.data(), None, "{input:?}");
        assert_eq!(field.view_data(), &ViewData::Empty, "{input:?}");
        assert!(field.is_synchronized(), "{input:?}");
        assert_eq!(checked(&field), [PLACEHOLDER_NAME], "{input:?}");
        assert_eq!(
            field.child(PLACEHOLDER_NAME).and_then(|child| child.view_data()),
            Some("")
        );
    }
}

#[test]
fn submit_single_expanded_nothing_required() {
    let mut field = author_field(false, true, true);

    field.submit(None::<&str>).unwrap();

    assert_eq!(field.data(), None);
    assert_eq!(field.view_data(), &ViewData::Empty);
    assert!(field.is_synchronized());
    assert!(checked(&field).is_empty());
}

#[test]
fn submit_single_expanded_with_empty_choice() {
    let mut field = ChoiceField::new(
        FormFieldOptions::new("choice"),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::labeled([
                ("Empty", json!("")),
                ("Not empty", json!(1)),
            ]))
            .expanded(true)
            .build(),
    )
    .unwrap();

    field.submit("").unwrap();

    assert_eq!(field.data(), None);
    assert!(field.is_synchronized());
    assert!(field.child("0").is_some_and(|child| child.data()));
    assert!(field.child("1").is_some_and(|child| !child.data()));
    assert_eq!(field.child("0").and_then(|child| child.view_data()), Some(""));
    assert_eq!(field.child("1").and_then(|child| child.view_data()), None);
}

#[test]
fn submit_multiple_expanded() {
    let mut field = author_field(true, true, true);
    assert_eq!(field.len(), 5);
    assert!(
        field
            .children()
            .iter()
            .all(|child| child.kind() == ChoiceInputKind::Checkbox && !child.is_required())
    );

    field.submit(["a", "c"]).unwrap();

    assert_eq!(field.data(), Some(&FieldData::Multiple(vec!["a", "c"])));
    assert!(field.is_synchronized());
    assert_eq!(checked(&field), ["0", "2"]);
    assert_eq!(field.child("2").and_then(|child| child.view_data()), Some("c"));
}

#[test]
fn submit_multiple_expanded_with_empty_choice() {
    let mut field = ChoiceField::new(
        FormFieldOptions::new("choice"),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::labeled([
                ("Empty", json!("")),
                ("Not Empty", json!(1)),
                ("Not Empty 2", json!(2)),
            ]))
            .multiple(true)
            .expanded(true)
            .build(),
    )
    .unwrap();

    field.submit(["", "2"]).unwrap();

    assert_eq!(
        field.data(),
        Some(&FieldData::Multiple(vec![json!(""), json!(2)]))
    );
    assert!(field.is_synchronized());
    assert_eq!(field.child("0").and_then(|child| child.view_data()), Some(""));
    assert_eq!(field.child("1").and_then(|child| child.view_data()), None);
    assert_eq!(field.child("2").and_then(|child| child.view_data()), Some("2"));
}

#[test]
fn expanded_children_skip_placeholder_when_empty_choice_exists() {
    let field = ChoiceField::new(
        field_options(false),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::labeled([("Empty", ""), ("A", "a")]))
            .expanded(true)
            .build(),
    )
    .unwrap();

    assert_eq!(field.len(), 2);
    assert!(!field.has_child(PLACEHOLDER_NAME));
}

#[test]
fn object_choices_with_property_paths() {
    let options = || {
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::positional(authors()))
            .choice_value(ChoiceValueResolver::property("id"))
            .choice_label(ChoiceLabelResolver::property("name"))
            .clone()
    };

    let mut single = ChoiceField::new(
        FormFieldOptions::new("author"),
        options().expanded(true).build(),
    )
    .unwrap();
    single.submit("2").unwrap();
    assert_eq!(single.data(), Some(&FieldData::Single(authors()[1].clone())));
    assert_eq!(single.child("1").and_then(|child| child.label()), Some("Fabien"));
    assert_eq!(single.child("1").and_then(|child| child.view_data()), Some("2"));

    let mut multiple = ChoiceField::new(
        FormFieldOptions::new("author"),
        options().multiple(true).build(),
    )
    .unwrap();
    multiple.submit(["1", "2"]).unwrap();
    assert_eq!(
        multiple.data(),
        Some(&FieldData::Multiple(authors()[..2].to_vec()))
    );
}

#[test]
fn initial_data_selects_choices() {
    let authors = authors();
    let field = ChoiceField::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::positional(authors.clone()))
            .choice_value(ChoiceValueResolver::property("id"))
            .choice_label(ChoiceLabelResolver::property("name"))
            .build(),
    )
    .unwrap()
    .with_data(FieldData::Single(authors[3].clone()))
    .unwrap();

    let view = field.create_view(None).unwrap();
    assert_eq!(view.value, ViewData::Text("4".to_owned()));
    assert!(view.is_choice_selected("4"));
    assert!(!view.is_choice_selected("1"));
}

#[test]
fn initial_data_must_be_a_choice() {
    let mut field = author_field(false, false, true);

    assert!(matches!(
        field.set_data(Some(FieldData::Single("foobar"))),
        Err(ChoiceError::UnknownChoice(_))
    ));
    assert!(matches!(
        field.set_data(Some(FieldData::Multiple(vec!["a"]))),
        Err(ChoiceError::InvalidConfiguration(_))
    ));
}

#[test]
fn initial_data_checks_expanded_children() {
    let mut field = author_field(true, true, true)
        .with_data(FieldData::Multiple(vec!["b", "d"]))
        .unwrap();
    assert_eq!(checked(&field), ["1", "3"]);

    field.set_data(None).unwrap();
    assert!(checked(&field).is_empty());
    assert_eq!(field.view_data(), &ViewData::List(Vec::new()));
}

#[test]
fn view_choices() {
    let field = author_field(false, false, true);

    let view = field.create_view(None).unwrap();

    assert_eq!(view.choices.len(), 5);
    let labels: Vec<_> = (0..5)
        .filter_map(|index| view.choice(index))
        .map(|choice| (choice.value.as_str(), choice.label.as_deref()))
        .collect();
    assert_eq!(
        labels,
        [
            ("a", Some("Bernhard")),
            ("b", Some("Fabien")),
            ("c", Some("Kris")),
            ("d", Some("Jon")),
            ("e", Some("Roman")),
        ]
    );
    assert!(view.preferred_choices.is_empty());
}

#[test]
fn view_preferred_choices_keep_their_indices() {
    let field = ChoiceField::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::builder()
            .source(ChoiceSource::labeled(AUTHORS))
            .preferred_choices(PreferredChoices::values(["b", "d"]))
            .build(),
    )
    .unwrap();

    let view = field.create_view(None).unwrap();

    let indices = |nodes: &[ChoiceViewNode<'_, &str>]| -> Vec<usize> {
        nodes
            .iter()
            .filter_map(|node| match node {
                ChoiceViewNode::Choice { index, .. } => Some(*index),
                ChoiceViewNode::Group(_) => None,
            })
            .collect()
    };
    assert_eq!(indices(&view.choices), [0, 2, 4]);
    assert_eq!(indices(&view.preferred_choices), [1, 3]);
}

#[test]
fn view_grouped_choices() {
    let field = ChoiceField::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::builder()
            .source(grouped_authors())
            .preferred_choices(PreferredChoices::values(["b", "d"]))
            .build(),
    )
    .unwrap();

    let view = field.create_view(None).unwrap();

    let groups: Vec<_> = view
        .choices
        .iter()
        .filter_map(ChoiceViewNode::as_group)
        .map(|group| (group.label.as_str(), group.choices.len()))
        .collect();
    assert_eq!(groups, [("Symfony", 2), ("Doctrine", 1)]);

    let preferred: Vec<_> = view
        .preferred_choices
        .iter()
        .filter_map(ChoiceViewNode::as_group)
        .map(|group| (group.label.as_str(), group.choices.len()))
        .collect();
    assert_eq!(preferred, [("Symfony", 1), ("Doctrine", 1)]);
    assert_eq!(view.choice(3).map(|choice| choice.value.as_str()), Some("d"));
}

#[test]
fn grouped_choices_are_flattened() {
    let mut field = ChoiceField::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::builder()
            .source(grouped_authors())
            .expanded(true)
            .build(),
    )
    .unwrap();

    assert_eq!(field.len(), 5);
    assert_eq!(
        field
            .children()
            .iter()
            .filter_map(|child| child.label())
            .collect::<Vec<_>>(),
        ["Bernhard", "Fabien", "Kris", "Jon", "Roman"]
    );

    field.submit("e").unwrap();
    assert_eq!(checked(&field), ["4"]);
}

#[test]
fn placeholder_table() {
    // (multiple, expanded, required, placeholder, expected)
    let cases: Vec<(bool, bool, bool, Placeholder, Option<&str>)> = vec![
        (false, false, false, "foobar".into(), Some("foobar")),
        (false, false, false, "".into(), Some("")),
        (false, false, false, Placeholder::Unset, None),
        (false, false, false, Placeholder::Disabled, None),
        (false, false, true, "foobar".into(), Some("foobar")),
        (false, false, true, "".into(), Some("")),
        (false, false, true, Placeholder::Unset, None),
        (false, false, true, Placeholder::Disabled, None),
        (false, true, false, "foobar".into(), Some("foobar")),
        (false, true, false, "".into(), Some("None")),
        (false, true, false, Placeholder::Unset, None),
        (false, true, false, Placeholder::Disabled, None),
        (false, true, true, "foobar".into(), Some("foobar")),
        (false, true, true, "".into(), Some("None")),
        (false, true, true, Placeholder::Unset, None),
        (false, true, true, Placeholder::Disabled, None),
    ];
    let multiple_cases = [true].into_iter().flat_map(|multiple| {
        [false, true].into_iter().flat_map(move |expanded| {
            [false, true].into_iter().flat_map(move |required| {
                [
                    Placeholder::from("foobar"),
                    Placeholder::from(""),
                    Placeholder::Unset,
                    Placeholder::Disabled,
                ]
                .into_iter()
                .map(move |placeholder| (multiple, expanded, required, placeholder, None))
            })
        })
    });

    for (multiple, expanded, required, placeholder, expected) in
        cases.into_iter().chain(multiple_cases)
    {
        let case = format!("{multiple} {expanded} {required} {placeholder:?}");
        let field = ChoiceField::new(
            field_options(required),
            ChoiceFieldOptions::builder()
                .source(ChoiceSource::labeled(AUTHORS))
                .multiple(multiple)
                .expanded(expanded)
                .placeholder(placeholder.clone())
                .build(),
        )
        .unwrap();
        let view = field.create_view(None).unwrap();
        assert_eq!(view.placeholder.as_deref(), expected, "{case}");
        assert!(!view.placeholder_in_choices, "{case}");

        let with_empty = ChoiceField::new(
            field_options(required),
            ChoiceFieldOptions::builder()
                .source(ChoiceSource::labeled([("A", "a"), ("Empty", "")]))
                .multiple(multiple)
                .expanded(expanded)
                .placeholder(placeholder)
                .build(),
        )
        .unwrap();
        let view = with_empty.create_view(None).unwrap();
        assert_eq!(view.placeholder, None, "{case}");
        assert!(view.placeholder_in_choices, "{case}");
    }
}

#[test]
fn placeholder_defaults_to_empty_when_not_required() {
    let view_placeholder = |required| {
        let field = author_field(false, false, required);
        field.create_view(None).unwrap().placeholder
    };

    assert_eq!(view_placeholder(false), Some(String::new()));
    assert_eq!(view_placeholder(true), None);
}

#[test]
fn full_name_of_multiple_collapsed_fields() {
    let parent = ParentView::new("article");
    let full_name = |multiple, expanded| {
        author_field(multiple, expanded, true)
            .create_view(Some(&parent))
            .unwrap()
            .full_name
    };

    assert_eq!(full_name(true, false), "article[author][]");
    assert_eq!(full_name(true, true), "article[author]");
    assert_eq!(full_name(false, false), "article[author]");
    assert_eq!(
        author_field(true, false, true)
            .create_view(None)
            .unwrap()
            .full_name,
        "author[]"
    );
}

#[test]
fn choice_translation_domain() {
    let view_domain = |field_domain: Option<&str>,
                       parent_domain: Option<&str>,
                       choice_domain: ChoiceTranslationDomain| {
        let field = ChoiceField::new(
            FormFieldOptions {
                translation_domain: field_domain.map(str::to_owned),
                ..FormFieldOptions::new("author")
            },
            ChoiceFieldOptionsBuilder::default()
                .source(ChoiceSource::labeled(AUTHORS))
                .choice_translation_domain(choice_domain)
                .build(),
        )
        .unwrap();
        let parent = parent_domain
            .map(|domain| ParentView::new("form").with_translation_domain(domain));
        field
            .create_view(parent.as_ref())
            .unwrap()
            .choice_translation_domain
    };

    assert_eq!(
        view_domain(None, None, ChoiceTranslationDomain::Inherit),
        TranslationDomain::Default
    );
    assert_eq!(
        view_domain(None, Some("parent"), ChoiceTranslationDomain::Inherit),
        TranslationDomain::Named("parent".to_owned())
    );
    assert_eq!(
        view_domain(Some("field"), Some("parent"), ChoiceTranslationDomain::Inherit),
        TranslationDomain::Named("field".to_owned())
    );
    assert_eq!(
        view_domain(Some("field"), None, ChoiceTranslationDomain::Disabled),
        TranslationDomain::Disabled
    );
    assert_eq!(
        view_domain(Some("field"), None, "choices".into()),
        TranslationDomain::Named("choices".to_owned())
    );
}

#[test]
fn submit_children() {
    let mut field = author_field(true, true, true);

    field
        .submit_children([("0", "a"), ("3", "d"), ("foo", "bar")])
        .unwrap();

    assert_eq!(field.data(), Some(&FieldData::Multiple(vec!["a", "d"])));
    assert!(field.is_synchronized());
    assert_eq!(checked(&field), ["0", "3"]);
    assert_eq!(
        field.extra_data().get("foo").map(String::as_str),
        Some("bar")
    );
}

#[test]
fn submit_children_placeholder() {
    let mut field = author_field(false, true, false);

    field.submit_children([(PLACEHOLDER_NAME, "")]).unwrap();

    assert_eq!(field.data(), None);
    assert!(field.is_synchronized());
    assert_eq!(checked(&field), [PLACEHOLDER_NAME]);
    assert!(field.extra_data().is_empty());

    field.submit("c").unwrap();
    assert!(field.extra_data().is_empty());
    assert_eq!(checked(&field), ["2"]);
}

#[test]
fn json_choices() {
    let source = ChoiceSource::<Value>::from_json(json!({
        "Symfony": {"Bernhard": "a", "Fabien": "b"},
        "Kris": "c",
    }))
    .unwrap();
    let mut field = ChoiceField::new(
        FormFieldOptions::new("author"),
        ChoiceFieldOptions::builder().source(source).build(),
    )
    .unwrap();

    field.submit("c").unwrap();

    assert_eq!(field.data(), Some(&FieldData::Single(json!("c"))));
    let view = field.create_view(None).unwrap();
    assert_eq!(
        view.choices
            .iter()
            .filter_map(ChoiceViewNode::as_group)
            .map(|group| group.label.as_str())
            .collect::<Vec<_>>(),
        ["Symfony"]
    );
}
