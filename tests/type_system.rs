use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use semtypes::dataitem::DataItemKind;
use semtypes::datavalue::{NUMBER_VALUE, STRING_VALUE, TEMPERATURE_VALUE, URI_VALUE};
use semtypes::language::LanguageTables;
use semtypes::system::{ExtensionPoint, TypeSystem};

fn probed() -> (TypeSystem, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let mut system = TypeSystem::new(LanguageTables::english());
    system.register_initializer(ExtensionPoint::Current, move |registry| {
        counter.fetch_add(1, Ordering::SeqCst);
        registry.register_data_type("_probe", STRING_VALUE, DataItemKind::Blob, Some("Probe"));
    });
    (system, builds)
}

#[test]
fn instance_is_built_once() {
    let (system, builds) = probed();
    assert!(!system.is_initialized().unwrap());
    let first = system.instance().unwrap();
    let second = system.instance().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(system.is_initialized().unwrap());
}

#[test]
fn clear_rebuilds_with_extensions() {
    let (system, builds) = probed();
    let before = system.instance().unwrap();
    before.write().unwrap().register_data_type_alias("_probe", "Transient");
    system.clear().unwrap();
    assert!(!system.is_initialized().unwrap());

    let after = system.instance().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(builds.load(Ordering::SeqCst), 2);
    let registry = after.read().unwrap();
    assert_eq!(registry.find_type_id("Probe", true), "_probe");
    assert_eq!(registry.find_type_id("Transient", true), "");
    // the old handle is untouched by the clear
    assert_eq!(before.read().unwrap().find_type_id("Transient", true), "_probe");
}

#[test]
fn legacy_initializers_run_first() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut system = TypeSystem::new(LanguageTables::english());
    let log = Arc::clone(&order);
    system.register_initializer(ExtensionPoint::Current, move |registry| {
        log.lock().unwrap().push("current");
        registry.register_data_type("_num", TEMPERATURE_VALUE, DataItemKind::Number, None);
    });
    let log = Arc::clone(&order);
    system.register_initializer(ExtensionPoint::Legacy, move |registry| {
        log.lock().unwrap().push("legacy");
        registry.register_data_type("_num", URI_VALUE, DataItemKind::Uri, None);
    });
    let registry = system.instance().unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["legacy", "current"]);
    let registry = registry.read().unwrap();
    assert_eq!(registry.data_type_class_by_id("_num"), Some(TEMPERATURE_VALUE));
    assert_eq!(registry.data_item_id("_num"), DataItemKind::Number);
}

#[test]
fn later_initializers_overwrite_earlier_ones() {
    let mut system = TypeSystem::new(LanguageTables::english());
    system.register_initializer(ExtensionPoint::Current, |registry| {
        registry.register_data_type("_ext", STRING_VALUE, DataItemKind::Blob, Some("Extension"));
    });
    system.register_initializer(ExtensionPoint::Current, |registry| {
        registry.register_data_type("_ext", NUMBER_VALUE, DataItemKind::Number, None);
    });
    let registry = system.instance().unwrap();
    let registry = registry.read().unwrap();
    assert_eq!(registry.data_type_class_by_id("_ext"), Some(NUMBER_VALUE));
    assert_eq!(registry.data_item_id("_ext"), DataItemKind::Number);
    assert_eq!(registry.find_type_id("Extension", true), "_ext");
}

#[test]
fn overwrite_after_initialization_is_visible_immediately() {
    let system = TypeSystem::new(LanguageTables::english());
    let shared = system.instance().unwrap();
    shared.write().unwrap().register_data_type("_num", STRING_VALUE, DataItemKind::Number, None);
    let again = system.instance().unwrap();
    assert_eq!(again.read().unwrap().data_type_class_by_id("_num"), Some(STRING_VALUE));
}

#[test]
fn language_change_rebuilds() {
    let mut system = TypeSystem::new(LanguageTables::english());
    let english = system.instance().unwrap();
    assert_eq!(english.read().unwrap().find_type_id("Number", true), "_num");
    system.set_language(LanguageTables::german()).unwrap();
    let german = system.instance().unwrap();
    assert_eq!(german.read().unwrap().find_type_id("Zahl", true), "_num");
    assert_eq!(german.read().unwrap().find_type_id("Number", true), "");
}

#[test]
fn concurrent_first_access_builds_once() {
    let (system, builds) = probed();
    let system = Arc::new(system);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let system = Arc::clone(&system);
            thread::spawn(move || system.instance().unwrap())
        })
        .collect();
    let registries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(registries.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}
