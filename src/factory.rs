//! Creating and formatting values through the registry.
//!
//! These helpers are the usual way of reaching a value handler: they look up
//! the binding, instantiate the handler for the requested identifier and turn
//! failures into error data items rather than propagating them, since a bad
//! value on a page must not stop the page from being processed.

use tracing::{debug, warn};

use crate::dataitem::DataItem;
use crate::datavalue::DataValue;
use crate::error::Result;
use crate::registry::TypeRegistry;

pub fn handler_for(registry: &TypeRegistry, type_id: &str) -> Option<Box<dyn DataValue>> {
    registry
        .data_type_class_by_id(type_id)
        .map(|handler| handler.instantiate(type_id))
}

/// Parses `text` as a value of `type_id`.
pub fn new_type_id_value(registry: &TypeRegistry, type_id: &str, text: &str) -> DataItem {
    let Some(handler) = handler_for(registry, type_id) else {
        warn!(type_id, "no handler for type");
        return DataItem::error(format!("unknown type \"{}\"", type_id));
    };
    match handler.parse(text) {
        Ok(item) => item,
        Err(e) => {
            debug!(type_id, error = %e, "value rejected");
            DataItem::error(e.to_string())
        }
    }
}

/// Parses `text` as a value of the type a user refers to by `label`.
pub fn new_label_value(registry: &TypeRegistry, label: &str, text: &str) -> DataItem {
    match registry.find_type_id(label, true) {
        "" => DataItem::error(format!("unknown type label \"{}\"", label)),
        type_id => new_type_id_value(registry, type_id, text),
    }
}

/// Formats `item` with the handler of `type_id`, or with the default type of
/// the item's kind when no type is given. Items of an unbound type fall back
/// to their serialization.
pub fn new_data_item_value(registry: &TypeRegistry, item: &DataItem, type_id: Option<&str>) -> Result<String> {
    let type_id = match type_id {
        Some(type_id) => type_id,
        None => registry.default_data_item_type_id(item.kind())?,
    };
    Ok(match handler_for(registry, type_id) {
        Some(handler) => handler.format(item),
        None => item.serialization(),
    })
}

/// Validation messages for `text` as a value of `type_id`.
pub fn validate_value(registry: &TypeRegistry, type_id: &str, text: &str) -> Vec<String> {
    match handler_for(registry, type_id) {
        Some(handler) => handler.validate(text),
        None => vec![format!("unknown type \"{}\"", type_id)],
    }
}
