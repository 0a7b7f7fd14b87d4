//! Value handlers: the per-type implementations that turn user text into
//! [`DataItem`]s and back.
//!
//! The registry never constructs handlers. It only hands out [`HandlerRef`]s,
//! and callers instantiate a handler for a concrete type identifier through
//! [`HandlerRef::instantiate`]. Several identifiers share one handler (for
//! example `_uri`, `_ema` and `_tel` all use [`UriValue`]), so each handler
//! receives the identifier it was created for and adapts to it.

// so regular expressions don't have to be recompiled
use lazy_static::lazy_static;
use regex::Regex;

// used for unit conversions of temperatures
use bigdecimal::BigDecimal;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::dataitem::{
    DataItem, Decimal, GeoCoord, Time, WikiPage, NS_CATEGORY, NS_CONCEPT, NS_FORM, NS_MAIN,
    NS_PROPERTY,
};
use crate::error::{Result, SemtypesError};

/// Base URI under which type declarations (`__typ`) are stored.
pub const TYPE_URI_BASE: &str = "http://semantic-mediawiki.org/swivt/1.0#";

lazy_static! {
    static ref URI_SCHEME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").unwrap();
    static ref EMAIL: Regex = Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$"
    )
    .unwrap();
    static ref PHONE: Regex = Regex::new(r"^\+?[0-9][0-9 ()./\-]*[0-9]$").unwrap();
    static ref PHONE_SEPARATORS: Regex = Regex::new(r"[ ()./\-]+").unwrap();
    static ref NUMBER_WITH_UNIT: Regex = Regex::new(
        r"^\s*([+\-]?[0-9][0-9,]*(?:\.[0-9]+)?(?:[eE][+\-]?[0-9]+)?)\s*((?:[\w°%µ²³/·^.\-]+(?:\s+[\w°%µ²³/·^.\-]+)*)?)\s*$"
    )
    .unwrap();
    static ref GEO: Regex = Regex::new(
        r"^\s*(-?[0-9]+(?:\.[0-9]+)?)\s*°?\s*([NSns])?\s*[,;]\s*(-?[0-9]+(?:\.[0-9]+)?)\s*°?\s*([EWew])?\s*$"
    )
    .unwrap();
    static ref ILLEGAL_TITLE_CHARS: Regex = Regex::new(r"[\[\]{}|<>]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"[\s_]+").unwrap();
}

/// The capability set every value type implements.
pub trait DataValue: Send + Sync {
    /// The type identifier this handler was instantiated for.
    fn type_id(&self) -> &str;
    fn parse(&self, text: &str) -> Result<DataItem>;
    fn format(&self, item: &DataItem) -> String {
        item.serialization()
    }
    /// Error messages for `text`; empty when the text is a valid value.
    fn validate(&self, text: &str) -> Vec<String> {
        match self.parse(text) {
            Ok(DataItem::Error(messages)) => messages,
            Ok(_) => Vec::new(),
            Err(e) => vec![e.to_string()],
        }
    }
    fn compare(&self, a: &DataItem, b: &DataItem) -> Ordering {
        a.compare(b)
    }
}

pub type HandlerFactory = fn(&str) -> Box<dyn DataValue>;

/// Opaque reference to a value handler implementation.
///
/// References compare by name, so overriding a binding with a different
/// handler is observable through [`HandlerRef::name`].
#[derive(Clone, Copy)]
pub struct HandlerRef {
    name: &'static str,
    factory: HandlerFactory,
}
impl HandlerRef {
    pub const fn new(name: &'static str, factory: HandlerFactory) -> Self {
        Self { name, factory }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn instantiate(&self, type_id: &str) -> Box<dyn DataValue> {
        (self.factory)(type_id)
    }
}
impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for HandlerRef {}
impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HandlerRef({})", self.name)
    }
}
impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

macro_rules! value_handler {
    ($handler:ident, $reference:ident) => {
        #[derive(Debug)]
        pub struct $handler {
            type_id: String,
        }
        impl $handler {
            pub fn create(type_id: &str) -> Box<dyn DataValue> {
                Box::new($handler {
                    type_id: type_id.to_owned(),
                })
            }
        }
        pub const $reference: HandlerRef = HandlerRef::new(stringify!($handler), $handler::create);
    };
}

value_handler!(StringValue, STRING_VALUE);
value_handler!(UriValue, URI_VALUE);
value_handler!(WikiPageValue, WIKI_PAGE_VALUE);
value_handler!(NumberValue, NUMBER_VALUE);
value_handler!(TemperatureValue, TEMPERATURE_VALUE);
value_handler!(QuantityValue, QUANTITY_VALUE);
value_handler!(TimeValue, TIME_VALUE);
value_handler!(BoolValue, BOOL_VALUE);
value_handler!(RecordValue, RECORD_VALUE);
value_handler!(GeoValue, GEO_VALUE);
value_handler!(TypesValue, TYPES_VALUE);
value_handler!(PropertyListValue, PROPERTY_LIST_VALUE);
value_handler!(ConceptValue, CONCEPT_VALUE);
value_handler!(ImportValue, IMPORT_VALUE);
value_handler!(PropertyValue, PROPERTY_VALUE);
value_handler!(ErrorValue, ERROR_VALUE);

/// Normalizes a page title to its storage key: trimmed, whitespace collapsed
/// to underscores, first letter upper-cased.
pub fn normalize_title(text: &str) -> Option<String> {
    let collapsed = WHITESPACE.replace_all(text.trim(), "_");
    let collapsed = collapsed.trim_matches('_');
    if collapsed.is_empty() || collapsed.len() > 255 || ILLEGAL_TITLE_CHARS.is_match(collapsed) {
        return None;
    }
    let mut chars = collapsed.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}

fn require_text<'t>(type_id: &str, text: &'t str) -> Result<&'t str> {
    let text = text.trim();
    if text.is_empty() {
        Err(SemtypesError::parse(type_id, "no value given"))
    } else {
        Ok(text)
    }
}

fn parse_number(type_id: &str, digits: &str) -> Result<Decimal> {
    Decimal::from_str(&digits.replace(',', ""))
        .ok_or_else(|| SemtypesError::parse(type_id, format!("\"{}\" is not a number", digits)))
}

// ------------- Text --------------
impl DataValue for StringValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        Ok(DataItem::Blob(text.to_owned()))
    }
}

// ------------- URI family --------------
impl DataValue for UriValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        match self.type_id.as_str() {
            "_ema" => {
                let address = text.strip_prefix("mailto:").unwrap_or(text);
                if !EMAIL.is_match(address) {
                    return Err(SemtypesError::parse(
                        &self.type_id,
                        format!("\"{}\" is not a valid email address", address),
                    ));
                }
                Ok(DataItem::Uri(format!("mailto:{}", address)))
            }
            "_tel" => {
                let number = text.strip_prefix("tel:").unwrap_or(text);
                if !PHONE.is_match(number) {
                    return Err(SemtypesError::parse(
                        &self.type_id,
                        format!("\"{}\" is not a valid telephone number", number),
                    ));
                }
                let number = PHONE_SEPARATORS.replace_all(number, "-");
                Ok(DataItem::Uri(format!("tel:{}", number)))
            }
            _ => {
                if !URI_SCHEME.is_match(text) {
                    return Err(SemtypesError::parse(
                        &self.type_id,
                        format!("\"{}\" is not a valid URI", text),
                    ));
                }
                Ok(DataItem::Uri(text.to_owned()))
            }
        }
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Uri(uri) => match self.type_id.as_str() {
                "_ema" => uri.trim_start_matches("mailto:").to_owned(),
                "_tel" => uri.trim_start_matches("tel:").to_owned(),
                _ => uri.clone(),
            },
            other => other.serialization(),
        }
    }
}

// ------------- Wiki pages --------------
fn namespace_prefix(namespace: i32) -> Option<&'static str> {
    match namespace {
        NS_CATEGORY => Some("Category"),
        NS_PROPERTY => Some("Property"),
        NS_CONCEPT => Some("Concept"),
        NS_FORM => Some("Form"),
        _ => None,
    }
}

impl WikiPageValue {
    fn default_namespace(&self) -> i32 {
        match self.type_id.as_str() {
            "_wpp" | "__spp" | "__sup" => NS_PROPERTY,
            "_wpc" | "__suc" | "__sin" => NS_CATEGORY,
            "_wpf" => NS_FORM,
            _ => NS_MAIN,
        }
    }
}

impl DataValue for WikiPageValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let (title, subobject) = match text.split_once('#') {
            Some((title, subobject)) => (title, subobject.trim()),
            None => (text, ""),
        };
        let mut namespace = self.default_namespace();
        let mut title = title;
        if let Some((prefix, rest)) = title.split_once(':') {
            let known = [NS_CATEGORY, NS_PROPERTY, NS_CONCEPT, NS_FORM]
                .into_iter()
                .find(|ns| namespace_prefix(*ns).is_some_and(|p| p.eq_ignore_ascii_case(prefix.trim())));
            if let Some(ns) = known {
                namespace = ns;
                title = rest;
            }
        }
        let dbkey = normalize_title(title).ok_or_else(|| {
            SemtypesError::parse(&self.type_id, format!("\"{}\" is not a valid page title", text))
        })?;
        Ok(DataItem::WikiPage(WikiPage::new(dbkey, namespace, subobject.to_owned())))
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::WikiPage(page) => {
                let mut s = match namespace_prefix(page.namespace()) {
                    Some(prefix) if page.namespace() != self.default_namespace() => {
                        format!("{}:{}", prefix, page.title())
                    }
                    _ => page.title(),
                };
                if !page.subobject().is_empty() {
                    s.push('#');
                    s.push_str(page.subobject());
                }
                s
            }
            other => other.serialization(),
        }
    }
}

// ------------- Numbers --------------
impl DataValue for NumberValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        Ok(DataItem::Number(parse_number(&self.type_id, text)?))
    }
}

impl TemperatureValue {
    // converts to kelvin, the unit temperatures are stored in
    fn to_kelvin(&self, value: BigDecimal, unit: &str) -> Result<BigDecimal> {
        let unit = unit.trim_start_matches(['°', 'º']).trim();
        let kelvin = match unit {
            "" | "K" => value,
            "C" => value + BigDecimal::new(27315.into(), 2),
            "F" => {
                (value + BigDecimal::new(45967.into(), 2)) * BigDecimal::from(5_i64)
                    / BigDecimal::from(9_i64)
            }
            "R" => value * BigDecimal::from(5_i64) / BigDecimal::from(9_i64),
            other => {
                return Err(SemtypesError::parse(
                    &self.type_id,
                    format!("unknown temperature unit \"{}\"", other),
                ));
            }
        };
        Ok(kelvin.round(6))
    }
}

impl DataValue for TemperatureValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let captures = NUMBER_WITH_UNIT
            .captures(text)
            .ok_or_else(|| SemtypesError::parse(&self.type_id, format!("\"{}\" is not a temperature", text)))?;
        let value = parse_number(&self.type_id, &captures[1])?.into_inner();
        let kelvin = self.to_kelvin(value, &captures[2])?;
        if kelvin < BigDecimal::from(0_i64) {
            return Err(SemtypesError::parse(&self.type_id, "temperature below absolute zero"));
        }
        Ok(DataItem::Number(Decimal::new(kelvin)))
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Number(n) => format!("{} K", n),
            other => other.serialization(),
        }
    }
}

// Unit conversion factors are declared on properties, not on the type, so
// the unit is accepted here and only the magnitude is kept.
impl DataValue for QuantityValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let captures = NUMBER_WITH_UNIT
            .captures(text)
            .ok_or_else(|| SemtypesError::parse(&self.type_id, format!("\"{}\" is not a quantity", text)))?;
        Ok(DataItem::Number(parse_number(&self.type_id, &captures[1])?))
    }
}

// ------------- Time --------------
impl DataValue for TimeValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        Time::new_datetime_from(text)
            .or_else(|| Time::new_date_from(text))
            .or_else(|| Time::new_year_month_from(text))
            .or_else(|| Time::new_year_from(text))
            .map(DataItem::Time)
            .ok_or_else(|| SemtypesError::parse(&self.type_id, format!("\"{}\" is not a valid date", text)))
    }
}

// ------------- Boolean --------------
impl DataValue for BoolValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        match text.to_lowercase().as_str() {
            "true" | "yes" | "t" | "y" | "1" => Ok(DataItem::Boolean(true)),
            "false" | "no" | "f" | "n" | "0" => Ok(DataItem::Boolean(false)),
            _ => Err(SemtypesError::parse(
                &self.type_id,
                format!("\"{}\" is not a boolean value", text),
            )),
        }
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Boolean(b) => b.to_string(),
            other => other.serialization(),
        }
    }
}

// ------------- Records --------------
impl DataValue for RecordValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let fields: Vec<Option<DataItem>> = text
            .split(';')
            .map(str::trim)
            .map(|field| match field {
                "" | "?" => None,
                field => Some(DataItem::Blob(field.to_owned())),
            })
            .collect();
        if fields.iter().all(Option::is_none) {
            return Err(SemtypesError::parse(&self.type_id, "record has no values"));
        }
        Ok(DataItem::Container(fields))
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Container(fields) => fields
                .iter()
                .map(|field| match field {
                    Some(value) => value.serialization(),
                    None => String::from("?"),
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.serialization(),
        }
    }
}

// ------------- Geographic coordinates --------------
impl DataValue for GeoValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let invalid = || SemtypesError::parse(&self.type_id, format!("\"{}\" is not a coordinate", text));
        let captures = GEO.captures(text).ok_or_else(invalid)?;
        let mut lat = f64::from_str(&captures[1]).map_err(|_| invalid())?;
        let mut lon = f64::from_str(&captures[3]).map_err(|_| invalid())?;
        if captures.get(2).is_some_and(|m| m.as_str().eq_ignore_ascii_case("s")) {
            lat = -lat;
        }
        if captures.get(4).is_some_and(|m| m.as_str().eq_ignore_ascii_case("w")) {
            lon = -lon;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(SemtypesError::parse(&self.type_id, "coordinate out of range"));
        }
        Ok(DataItem::Geo(GeoCoord { lat, lon }))
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Geo(g) => format!("{}, {}", g.lat, g.lon),
            other => other.serialization(),
        }
    }
}

// ------------- System types --------------
impl DataValue for TypesValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let key = WHITESPACE.replace_all(text, "_");
        Ok(DataItem::Uri(format!("{}{}", TYPE_URI_BASE, key)))
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Uri(uri) => uri.trim_start_matches(TYPE_URI_BASE).replace('_', " "),
            other => other.serialization(),
        }
    }
}

impl DataValue for PropertyListValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let keys = text
            .split(';')
            .map(|name| {
                normalize_title(name).ok_or_else(|| {
                    SemtypesError::parse(&self.type_id, format!("\"{}\" is not a valid property", name.trim()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DataItem::Blob(keys.join(";")))
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Blob(keys) => keys.replace('_', " ").replace(';', "; "),
            other => other.serialization(),
        }
    }
}

impl DataValue for ConceptValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        Ok(DataItem::Concept(text.to_owned()))
    }
}

impl DataValue for ImportValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    // vocabulary imports look like "foaf:name" or "foaf:name|Type:Text"
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let term = text.split('|').next().unwrap_or_default();
        match term.split_once(':') {
            Some((prefix, local)) if !prefix.trim().is_empty() && !local.trim().is_empty() => {
                Ok(DataItem::Blob(text.to_owned()))
            }
            _ => Err(SemtypesError::parse(
                &self.type_id,
                format!("\"{}\" is not a vocabulary term of the form prefix:name", text),
            )),
        }
    }
}

impl DataValue for PropertyValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        let text = require_text(&self.type_id, text)?;
        let (name, inverse) = match text.strip_prefix('-') {
            Some(name) => (name, true),
            None => (text, false),
        };
        // predefined properties keep their internal key untouched
        let key = if name.starts_with('_') {
            Some(name.to_owned())
        } else {
            normalize_title(name)
        };
        let key = key.ok_or_else(|| {
            SemtypesError::parse(&self.type_id, format!("\"{}\" is not a valid property", text))
        })?;
        Ok(DataItem::Property { key, inverse })
    }
    fn format(&self, item: &DataItem) -> String {
        match item {
            DataItem::Property { key, inverse } => {
                let name = key.replace('_', " ");
                if *inverse { format!("-{}", name) } else { name }
            }
            other => other.serialization(),
        }
    }
}

impl DataValue for ErrorValue {
    fn type_id(&self) -> &str {
        &self.type_id
    }
    fn parse(&self, text: &str) -> Result<DataItem> {
        Ok(DataItem::error(text.trim()))
    }
}
