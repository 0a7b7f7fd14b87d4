// used to keep the one-to-one mapping between data item kinds and their default types
use bimap::BiMap;

// other lookups use HashMap with a fast hasher, since keys are short identifiers
use core::hash::BuildHasherDefault;
use std::collections::HashMap;
use seahash::SeaHasher;

use tracing::debug;

use crate::dataitem::DataItemKind;
use crate::datavalue::*;
use crate::error::{Result, SemtypesError};
use crate::language::LanguageTables;

pub type IdHasher = BuildHasherDefault<SeaHasher>;
pub type TypeLabels = HashMap<String, String, IdHasher>;

/// Marks an internal identifier, e.g. `_txt`.
pub const INTERNAL_MARKER: char = '_';
/// Marks a hidden system identifier, e.g. `__key`.
pub const HIDDEN_MARKER: &str = "__";

// ------------- Built-in types -------------
const BUILT_IN_TYPES: [(&str, HandlerRef, DataItemKind); 37] = [
    ("_txt", STRING_VALUE, DataItemKind::Blob),
    ("_cod", STRING_VALUE, DataItemKind::Blob),
    ("_str", STRING_VALUE, DataItemKind::Blob),
    ("_ema", URI_VALUE, DataItemKind::Uri),
    ("_uri", URI_VALUE, DataItemKind::Uri),
    ("_anu", URI_VALUE, DataItemKind::Uri),
    ("_tel", URI_VALUE, DataItemKind::Uri),
    ("_wpg", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("_wpp", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("_wpc", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("_wpf", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("_num", NUMBER_VALUE, DataItemKind::Number),
    ("_tem", TEMPERATURE_VALUE, DataItemKind::Number),
    ("_qty", QUANTITY_VALUE, DataItemKind::Number),
    ("_dat", TIME_VALUE, DataItemKind::Time),
    ("_boo", BOOL_VALUE, DataItemKind::Boolean),
    ("_rec", RECORD_VALUE, DataItemKind::Container),
    ("_geo", GEO_VALUE, DataItemKind::Geo),
    // hidden types are not available to users and have no label
    ("__typ", TYPES_VALUE, DataItemKind::Uri),
    ("__pls", PROPERTY_LIST_VALUE, DataItemKind::Blob),
    ("__con", CONCEPT_VALUE, DataItemKind::Concept),
    ("__sps", STRING_VALUE, DataItemKind::Blob),
    ("__spu", URI_VALUE, DataItemKind::Uri),
    ("__sob", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("__sup", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("__suc", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("__spp", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("__sin", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("__red", WIKI_PAGE_VALUE, DataItemKind::WikiPage),
    ("__err", ERROR_VALUE, DataItemKind::Error),
    ("__errt", ERROR_VALUE, DataItemKind::Error),
    ("__imp", IMPORT_VALUE, DataItemKind::Blob),
    ("__pro", PROPERTY_VALUE, DataItemKind::Property),
    ("__key", STRING_VALUE, DataItemKind::Blob),
    ("__mdat", TIME_VALUE, DataItemKind::Time),
    ("__cdat", TIME_VALUE, DataItemKind::Time),
    ("__lcs", NUMBER_VALUE, DataItemKind::Number),
];

const DEFAULT_TYPES: [(DataItemKind, &str); 10] = [
    (DataItemKind::Blob, "_txt"),
    (DataItemKind::Uri, "_uri"),
    (DataItemKind::WikiPage, "_wpg"),
    (DataItemKind::Number, "_num"),
    (DataItemKind::Time, "_dat"),
    (DataItemKind::Boolean, "_boo"),
    (DataItemKind::Container, "_rec"),
    (DataItemKind::Geo, "_geo"),
    (DataItemKind::Concept, "__con"),
    (DataItemKind::Property, "__pro"),
];

// ------------- Binding -------------
/// A handler and the storage kind backing it, always replaced together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    handler: HandlerRef,
    kind: DataItemKind,
}
impl Binding {
    pub fn new(handler: HandlerRef, kind: DataItemKind) -> Self {
        Self { handler, kind }
    }
    pub fn handler(&self) -> HandlerRef {
        self.handler
    }
    pub fn kind(&self) -> DataItemKind {
        self.kind
    }
}

// ------------- TypeRegistry -------------
/// Resolves between type labels, type identifiers, value handlers and data
/// item kinds.
///
/// A registry is built from one snapshot of language tables and the built-in
/// types. Extensions register further types through a
/// [`TypeSystem`](crate::system::TypeSystem) initializer, or directly on a
/// registry they own.
#[derive(Debug)]
pub struct TypeRegistry {
    language: String,
    // identifier -> primary label
    type_labels: TypeLabels,
    // alias -> identifier
    type_aliases: TypeLabels,
    bindings: HashMap<String, Binding, IdHasher>,
    defaults: BiMap<DataItemKind, String>,
}

impl TypeRegistry {
    pub fn new(language: &LanguageTables) -> Self {
        let mut registry = Self {
            language: language.code().to_owned(),
            type_labels: language.labels().iter().cloned().collect(),
            type_aliases: language.aliases().iter().cloned().collect(),
            bindings: HashMap::default(),
            defaults: BiMap::new(),
        };
        registry.init_datatypes();
        registry
    }
    fn init_datatypes(&mut self) {
        for (type_id, handler, kind) in BUILT_IN_TYPES {
            self.bindings.insert(type_id.to_owned(), Binding::new(handler, kind));
        }
        for (kind, type_id) in DEFAULT_TYPES {
            self.defaults.insert(kind, type_id.to_owned());
        }
    }
    pub fn language(&self) -> &str {
        &self.language
    }
    /// Binds `type_id` to a handler and kind, replacing any earlier binding.
    /// A non-empty `label` also replaces the primary label.
    pub fn register_data_type(
        &mut self,
        type_id: &str,
        handler: HandlerRef,
        kind: DataItemKind,
        label: Option<&str>,
    ) {
        debug!(type_id, handler = handler.name(), kind = %kind, "registering data type");
        self.bindings.insert(type_id.to_owned(), Binding::new(handler, kind));
        if let Some(label) = label.filter(|l| !l.is_empty()) {
            self.type_labels.insert(type_id.to_owned(), label.to_owned());
        }
    }
    /// Adds an alias for `type_id`. The identifier does not have to be bound yet.
    pub fn register_data_type_alias(&mut self, type_id: &str, label: &str) {
        debug!(type_id, label, "registering data type alias");
        self.type_aliases.insert(label.to_owned(), type_id.to_owned());
    }
    /// Returns the identifier for a label, or `""` when the label is unknown.
    ///
    /// Primary labels are searched first, so they shadow aliases of the same
    /// text. Should two identifiers share a primary label, whichever the map
    /// yields first wins.
    pub fn find_type_id(&self, label: &str, use_alias: bool) -> &str {
        if label.is_empty() {
            return "";
        }
        if let Some((type_id, _)) = self.type_labels.iter().find(|(_, l)| l.as_str() == label) {
            return type_id;
        }
        if use_alias {
            if let Some(type_id) = self.type_aliases.get(label) {
                return type_id;
            }
        }
        ""
    }
    /// Returns the primary label, or `""` for unknown and for unlabelled types alike.
    pub fn find_type_label(&self, type_id: &str) -> &str {
        self.type_labels.get(type_id).map(String::as_str).unwrap_or("")
    }
    pub fn known_type_labels(&self) -> TypeLabels {
        self.type_labels.clone()
    }
    pub fn known_type_aliases(&self) -> TypeLabels {
        self.type_aliases.clone()
    }
    /// Sorted labels of the types a user may choose for a property.
    pub fn user_type_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .type_labels
            .iter()
            .filter(|(type_id, _)| !is_hidden_type(type_id))
            .map(|(_, label)| label.clone())
            .collect();
        labels.sort();
        labels
    }
    pub fn data_item_id(&self, type_id: &str) -> DataItemKind {
        self.bindings
            .get(type_id)
            .map(|binding| binding.kind())
            .unwrap_or(DataItemKind::NoType)
    }
    /// The type used for values of `kind` when no property type is declared.
    ///
    /// Asking for the default of [`DataItemKind::NoType`] or
    /// [`DataItemKind::Error`] is a programming error and yields
    /// [`SemtypesError::NoDefaultType`].
    pub fn default_data_item_type_id(&self, kind: DataItemKind) -> Result<&str> {
        self.defaults
            .get_by_left(&kind)
            .map(String::as_str)
            .ok_or(SemtypesError::NoDefaultType(kind))
    }
    /// The kind for which `type_id` is the default type, if any.
    pub fn defaulted_kind(&self, type_id: &str) -> Option<DataItemKind> {
        self.defaults.get_by_right(type_id).copied()
    }
    pub fn data_type_class_by_id(&self, type_id: &str) -> Option<HandlerRef> {
        self.bindings.get(type_id).map(|binding| binding.handler())
    }
    pub fn has_data_type_class_by_id(&self, type_id: &str) -> bool {
        self.bindings.contains_key(type_id)
    }
    pub fn binding(&self, type_id: &str) -> Option<Binding> {
        self.bindings.get(type_id).copied()
    }
    /// All bound identifiers, sorted.
    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

pub fn is_hidden_type(type_id: &str) -> bool {
    type_id.starts_with(HIDDEN_MARKER)
}

pub fn is_internal_type(type_id: &str) -> bool {
    type_id.starts_with(INTERNAL_MARKER) && !is_hidden_type(type_id)
}
