use super::*;

fn templates() -> TemplateConfig {
    TemplateConfig::default()
}

#[test]
fn normalize_trims_lowercases_and_collapses() {
    assert_eq!(normalize("  Words  That\tCONNECT \n"), "words that connect");
    assert_eq!(normalize("already clean"), "already clean");
    assert_eq!(normalize("   "), "");
}

#[test]
fn build_produces_all_three_views() {
    let views = TextViews::build(
        "  Words that are both Nouns and Verbs ",
        "Dual  part of speech",
        &templates(),
    )
    .expect("valid inputs should build");

    assert_eq!(views.raw_theme, "words that are both nouns and verbs");
    assert_eq!(views.raw_guess, "dual part of speech");

    // Both processed sides carry the same wrapper.
    assert!(
        views
            .processed_theme
            .contains("words that are both nouns and verbs")
    );
    assert!(views.processed_guess.contains("dual part of speech"));
    let wrapper = views.processed_theme.replace(&views.raw_theme, "{}");
    assert_eq!(wrapper, views.processed_guess.replace(&views.raw_guess, "{}"));
}

#[test]
fn entailment_views_cover_both_orderings() {
    let views = TextViews::build("theme text", "guess text", &templates()).unwrap();

    assert!(views.forward.premise.contains("theme text"));
    assert!(views.forward.hypothesis.contains("guess text"));
    assert!(views.reverse.premise.contains("guess text"));
    assert!(views.reverse.hypothesis.contains("theme text"));
    assert_ne!(views.forward, views.reverse);
}

#[test]
fn premise_and_hypothesis_templates_differ_by_role() {
    let views = TextViews::build("same text", "same text", &templates()).unwrap();
    // Same underlying text, but the role templates frame it differently.
    assert_ne!(views.forward.premise, views.forward.hypothesis);
}

#[test]
fn empty_theme_is_rejected() {
    let err = TextViews::build("   \t ", "a guess", &templates()).unwrap_err();
    assert_eq!(err, InputError::EmptyTheme);
}

#[test]
fn empty_guess_is_rejected() {
    let err = TextViews::build("a theme", "", &templates()).unwrap_err();
    assert_eq!(err, InputError::EmptyGuess);
}
