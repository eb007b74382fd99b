use super::*;

#[test]
fn builtin_presets_all_compile() {
    let lib = PresetLibrary::builtin();
    assert_eq!(lib.len(), BUILTIN_PRESETS.len());
    assert!(!lib.is_empty());
    assert_eq!(lib.invalid_entries(), Vec::<(usize, String)>::new());
}

#[test]
fn default_expression_is_in_the_library() {
    let lib = PresetLibrary::builtin();
    assert!(lib.iter().any(|s| s == DEFAULT_EXPRESSION));
}

#[test]
fn empty_library_is_rejected() {
    assert!(PresetLibrary::new(Vec::new()).is_err());
}

#[test]
fn order_is_preserved() {
    let lib = PresetLibrary::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
    assert_eq!(lib.get(0), Some("a"));
    assert_eq!(lib.get(2), Some("c"));
    assert_eq!(lib.get(3), None);
    assert_eq!(lib.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn invalid_entries_are_reported_by_index() {
    let lib = PresetLibrary::new(vec!["x".into(), "x+".into(), "0/0".into()]).unwrap();
    let bad: Vec<usize> = lib.invalid_entries().into_iter().map(|(i, _)| i).collect();
    assert_eq!(bad, vec![1, 2]);
}
