//! The boundary between an API request and an external query engine.
//!
//! Parsing the query language and executing queries is the engine's job.
//! This module only turns a request into a [`QueryDescription`], hands it to
//! a [`QueryEngine`] and formats the returned [`ResultSet`] into a
//! serializable [`AskOutput`], using the registry to format every value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tracing::info;

use crate::dataitem::{DataItem, WikiPage};
use crate::error::{Result, SemtypesError};
use crate::factory::new_data_item_value;
use crate::registry::TypeRegistry;
use crate::system::SharedRegistry;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub printouts: Vec<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// A requested result column: `?Height` or `?Height=Size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Printout {
    pub property: String,
    pub label: String,
}

/// What an engine is asked to build a query from.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescription {
    pub query: String,
    pub printouts: Vec<Printout>,
    pub parameters: BTreeMap<String, String>,
    pub limit: usize,
    pub offset: usize,
}

impl QueryRequest {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_owned(),
            ..Default::default()
        }
    }
    pub fn with_printout(mut self, printout: &str) -> Self {
        self.printouts.push(printout.to_owned());
        self
    }
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.insert(name.to_owned(), value.to_owned());
        self
    }
    fn numeric_parameter(&self, name: &str, default: usize) -> Result<usize> {
        match self.parameters.get(name) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| SemtypesError::Query(format!("parameter {} must be a number, got \"{}\"", name, value))),
        }
    }
    /// Requested page size, kept within `1..=`[`MAX_LIMIT`].
    pub fn limit(&self) -> Result<usize> {
        Ok(self.numeric_parameter("limit", DEFAULT_LIMIT)?.clamp(1, MAX_LIMIT))
    }
    pub fn offset(&self) -> Result<usize> {
        self.numeric_parameter("offset", 0)
    }
    pub fn printout_columns(&self) -> Vec<Printout> {
        self.printouts
            .iter()
            .map(|p| p.trim().trim_start_matches('?').trim())
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once('=') {
                Some((property, label)) if !label.trim().is_empty() => Printout {
                    property: property.trim().to_owned(),
                    label: label.trim().to_owned(),
                },
                Some((property, _)) => Printout {
                    property: property.trim().to_owned(),
                    label: property.trim().to_owned(),
                },
                None => Printout {
                    property: p.to_owned(),
                    label: p.to_owned(),
                },
            })
            .collect()
    }
    pub fn describe(&self) -> Result<QueryDescription> {
        if self.query.trim().is_empty() {
            return Err(SemtypesError::Query(String::from("empty query")));
        }
        Ok(QueryDescription {
            query: self.query.trim().to_owned(),
            printouts: self.printout_columns(),
            parameters: self.parameters.clone(),
            limit: self.limit()?,
            offset: self.offset()?,
        })
    }
}

// ------------- Results -------------
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCell {
    /// Declared type of the printout property; values of undeclared
    /// properties are formatted with the default type of their kind.
    pub type_id: Option<String>,
    pub values: Vec<DataItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub subject: WikiPage,
    pub cells: Vec<ResultCell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub rows: Vec<ResultRow>,
    pub has_further_results: bool,
}

/// An external engine able to build and run queries.
pub trait QueryEngine {
    type Query;
    fn build(&self, description: &QueryDescription) -> Result<Self::Query>;
    fn execute(&self, query: &Self::Query) -> Result<ResultSet>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskOutput {
    pub results: Vec<Value>,
    pub count: usize,
    /// Offset to request the next page with; only present when there is one.
    #[serde(rename = "query-continue-offset", skip_serializing_if = "Option::is_none")]
    pub continue_offset: Option<usize>,
}

impl AskOutput {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct AskApi<E: QueryEngine> {
    engine: E,
    registry: SharedRegistry,
}

impl<E: QueryEngine> AskApi<E> {
    pub fn new(engine: E, registry: SharedRegistry) -> Self {
        Self { engine, registry }
    }
    pub fn engine(&self) -> &E {
        &self.engine
    }
    /// Builds, executes and formats a query. In raw mode values are emitted
    /// in their serialized form instead of being formatted for display.
    pub fn run(&self, request: &QueryRequest, raw_mode: bool) -> Result<AskOutput> {
        let description = request.describe()?;
        let query = self.engine.build(&description)?;
        let result = self.engine.execute(&query)?;
        let registry = self.registry.read()?;
        let results = result
            .rows
            .iter()
            .map(|row| format_row(&registry, &description.printouts, row, raw_mode))
            .collect::<Result<Vec<_>>>()?;
        let count = results.len();
        let continue_offset = if result.has_further_results {
            let next = description.offset.checked_add(count).ok_or_else(|| {
                SemtypesError::Query(format!("offset {} cannot be continued", description.offset))
            })?;
            Some(next)
        } else {
            None
        };
        info!(rows = count, raw = raw_mode, further = result.has_further_results, "ask query complete");
        Ok(AskOutput {
            results,
            count,
            continue_offset,
        })
    }
}

fn format_item(registry: &TypeRegistry, item: &DataItem, type_id: Option<&str>, raw_mode: bool) -> Result<Value> {
    if let DataItem::Error(messages) = item {
        return Ok(serde_json::json!({ "error": messages }));
    }
    if raw_mode {
        return Ok(Value::String(item.serialization()));
    }
    Ok(Value::String(new_data_item_value(registry, item, type_id)?))
}

fn format_row(registry: &TypeRegistry, printouts: &[Printout], row: &ResultRow, raw_mode: bool) -> Result<Value> {
    let subject = DataItem::WikiPage(row.subject.clone());
    let mut columns = Map::new();
    for (printout, cell) in printouts.iter().zip(row.cells.iter()) {
        let values = cell
            .values
            .iter()
            .map(|item| format_item(registry, item, cell.type_id.as_deref(), raw_mode))
            .collect::<Result<Vec<_>>>()?;
        columns.insert(printout.label.clone(), Value::Array(values));
    }
    let mut output = Map::new();
    output.insert(String::from("fulltext"), format_item(registry, &subject, None, raw_mode)?);
    output.insert(String::from("printouts"), Value::Object(columns));
    Ok(Value::Object(output))
}
