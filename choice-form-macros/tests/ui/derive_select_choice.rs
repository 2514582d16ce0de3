use choice_form::form::fields::SelectChoice;
use choice_form_macros::SelectChoice;

#[derive(SelectChoice, Debug, Clone, PartialEq, Eq, serde::Serialize)]
enum Status {
    Draft,
    Published,
    Archived,
}

#[derive(SelectChoice, Debug, Clone, PartialEq, Eq, serde::Serialize)]
enum WithOverrides {
    #[select_choice(value = "custom", label = "Custom Display")]
    Custom,
    #[select_choice(label = "Bar Human")]
    Bar,
    #[select_choice(value = "baz_id")]
    Baz,
    Default,
}

fn main() {
    assert_eq!(Status::Draft.value(), "Draft");
    assert_eq!(Status::Published.label(), "Published");
    assert_eq!(
        Status::default_choices(),
        vec![Status::Draft, Status::Published, Status::Archived]
    );

    assert_eq!(WithOverrides::Custom.value(), "custom");
    assert_eq!(WithOverrides::Custom.label(), "Custom Display");
    assert_eq!(WithOverrides::Bar.value(), "Bar");
    assert_eq!(WithOverrides::Bar.label(), "Bar Human");
    assert_eq!(WithOverrides::Baz.value(), "baz_id");
    assert_eq!(WithOverrides::Baz.label(), "Baz");
    assert_eq!(WithOverrides::Default.value(), "Default");
}
