use semtypes::dataitem::DataItemKind;
use semtypes::datavalue::{BOOL_VALUE, NUMBER_VALUE, STRING_VALUE, URI_VALUE};
use semtypes::error::SemtypesError;
use semtypes::language::LanguageTables;
use semtypes::registry::{TypeRegistry, is_hidden_type, is_internal_type};

fn english() -> TypeRegistry {
    TypeRegistry::new(&LanguageTables::english())
}

#[test]
fn labelled_built_ins_round_trip() {
    let registry = english();
    let labels = registry.known_type_labels();
    assert!(!labels.is_empty());
    for type_id in labels.keys() {
        let label = registry.find_type_label(type_id);
        assert!(!label.is_empty());
        assert_eq!(registry.find_type_id(label, true), type_id, "label {label} should resolve to {type_id}");
    }
}

#[test]
fn boolean_type() {
    let registry = english();
    assert_eq!(registry.data_item_id("_boo"), DataItemKind::Boolean);
    assert_eq!(registry.data_type_class_by_id("_boo"), Some(BOOL_VALUE));
    assert_eq!(registry.find_type_id(registry.find_type_label("_boo"), true), "_boo");
}

#[test]
fn hidden_types_have_no_label() {
    let registry = english();
    for type_id in ["__key", "__con", "__pro", "__red", "__imp", "__typ", "__pls"] {
        assert!(registry.has_data_type_class_by_id(type_id), "{type_id} should be bound");
        assert_eq!(registry.find_type_label(type_id), "");
    }
    assert_eq!(registry.data_item_id("__con"), DataItemKind::Concept);
    assert_eq!(registry.data_item_id("__pro"), DataItemKind::Property);
    assert_eq!(registry.data_item_id("__err"), DataItemKind::Error);
    // unknown and unlabelled identifiers look the same
    assert_eq!(registry.find_type_label("__not_a_real_type__"), registry.find_type_label("__key"));
}

#[test]
fn unknown_identifier() {
    let registry = english();
    assert_eq!(registry.data_item_id("__not_a_real_type__"), DataItemKind::NoType);
    assert!(!registry.has_data_type_class_by_id("__not_a_real_type__"));
    assert!(registry.data_type_class_by_id("__not_a_real_type__").is_none());
}

#[test]
fn unknown_or_empty_label() {
    let registry = english();
    assert_eq!(registry.find_type_id("", true), "");
    assert_eq!(registry.find_type_id("", false), "");
    assert_eq!(registry.find_type_id("Nonexistent type", true), "");
    // lookups are exact
    assert_eq!(registry.find_type_id("number", true), "");
}

#[test]
fn primary_label_beats_alias() {
    let mut registry = english();
    registry.register_data_type_alias("_txt", "Number");
    assert_eq!(registry.find_type_id("Number", true), "_num");
    assert_eq!(registry.find_type_id("Number", false), "_num");
}

#[test]
fn alias_opt_out() {
    let mut registry = TypeRegistry::new(&LanguageTables::empty());
    registry.register_data_type_alias("_uri", "URL");
    assert_eq!(registry.find_type_id("URL", true), "_uri");
    assert_eq!(registry.find_type_id("URL", false), "");
}

#[test]
fn built_in_aliases() {
    let registry = english();
    assert_eq!(registry.find_type_id("Float", true), "_num");
    assert_eq!(registry.find_type_id("Integer", true), "_num");
    assert_eq!(registry.find_type_id("Float", false), "");
    assert_eq!(registry.known_type_aliases().get("URI").map(String::as_str), Some("_uri"));
}

#[test]
fn dangling_alias_is_allowed() {
    let mut registry = english();
    registry.register_data_type_alias("_later", "Later");
    assert_eq!(registry.find_type_id("Later", true), "_later");
    assert_eq!(registry.data_item_id("_later"), DataItemKind::NoType);
    registry.register_data_type("_later", STRING_VALUE, DataItemKind::Blob, None);
    assert_eq!(registry.data_item_id("_later"), DataItemKind::Blob);
}

#[test]
fn registration_overwrites_handler_and_kind() {
    let mut registry = english();
    assert_eq!(registry.data_type_class_by_id("_num"), Some(NUMBER_VALUE));
    registry.register_data_type("_num", URI_VALUE, DataItemKind::Uri, None);
    assert_eq!(registry.data_type_class_by_id("_num"), Some(URI_VALUE));
    assert_eq!(registry.data_item_id("_num"), DataItemKind::Uri);
    // no label given, so the old one stays
    assert_eq!(registry.find_type_label("_num"), "Number");
}

#[test]
fn registration_with_label() {
    let mut registry = english();
    registry.register_data_type("_isbn", STRING_VALUE, DataItemKind::Blob, Some("ISBN"));
    assert_eq!(registry.find_type_id("ISBN", false), "_isbn");
    assert_eq!(registry.find_type_label("_isbn"), "ISBN");
    registry.register_data_type("_isbn2", STRING_VALUE, DataItemKind::Blob, Some(""));
    assert_eq!(registry.find_type_label("_isbn2"), "");
}

#[test]
fn known_labels_are_a_copy() {
    let registry = english();
    let mut labels = registry.known_type_labels();
    labels.insert(String::from("_num"), String::from("Tampered"));
    labels.remove("_txt");
    assert_eq!(registry.find_type_label("_num"), "Number");
    assert_eq!(registry.find_type_label("_txt"), "Text");
}

#[test]
fn default_types_cover_every_real_kind() {
    let registry = english();
    for kind in DataItemKind::ALL {
        match registry.default_data_item_type_id(kind) {
            Ok(type_id) => {
                assert!(!kind.is_sentinel());
                assert!(!type_id.is_empty());
                assert_eq!(registry.data_item_id(type_id), kind, "default type of {kind} has another kind");
                assert_eq!(registry.defaulted_kind(type_id), Some(kind));
            }
            Err(SemtypesError::NoDefaultType(k)) => {
                assert_eq!(k, kind);
                assert!(kind.is_sentinel());
            }
            Err(e) => panic!("unexpected error {e}"),
        }
    }
}

#[test]
fn user_type_labels_exclude_hidden_types() {
    let mut registry = english();
    registry.register_data_type("__secret", STRING_VALUE, DataItemKind::Blob, Some("Secret"));
    let labels = registry.user_type_labels();
    assert!(labels.contains(&String::from("Number")));
    assert!(!labels.contains(&String::from("Secret")));
    let mut sorted = labels.clone();
    sorted.sort();
    assert_eq!(labels, sorted);
}

#[test]
fn identifier_conventions() {
    assert!(is_internal_type("_txt"));
    assert!(!is_internal_type("__key"));
    assert!(is_hidden_type("__key"));
    assert!(!is_hidden_type("_txt"));
    assert!(!is_internal_type("Text"));
}

#[test]
fn german_labels() {
    let registry = TypeRegistry::new(&LanguageTables::german());
    assert_eq!(registry.language(), "de");
    assert_eq!(registry.find_type_id("Zahl", true), "_num");
    assert_eq!(registry.find_type_id("Number", true), "");
    assert_eq!(registry.find_type_label("_boo"), "Wahrheitswert");
}

#[test]
fn kind_codes() {
    assert_eq!(DataItemKind::NoType.code(), 0);
    assert_eq!(DataItemKind::WikiPage.code(), 9);
    assert_eq!(DataItemKind::from_code(12), Some(DataItemKind::Error));
    assert_eq!(DataItemKind::from_code(3), None);
}
