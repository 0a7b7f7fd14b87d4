//! Localized datatype labels and aliases.
//!
//! A registry takes one snapshot of these tables when it is built; changing
//! the language later requires rebuilding the registry.

use crate::error::{Result, SemtypesError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageTables {
    code: String,
    // identifier -> primary label
    labels: Vec<(String, String)>,
    // alias -> identifier
    aliases: Vec<(String, String)>,
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(left, right)| (left.to_string(), right.to_string()))
        .collect()
}

impl LanguageTables {
    pub fn new(code: &str, labels: Vec<(String, String)>, aliases: Vec<(String, String)>) -> Self {
        Self {
            code: code.to_owned(),
            labels,
            aliases,
        }
    }
    /// Tables without any labels, leaving every type unlabelled.
    pub fn empty() -> Self {
        Self::new("und", Vec::new(), Vec::new())
    }
    pub fn english() -> Self {
        Self::new(
            "en",
            pairs(&[
                ("_wpg", "Page"),
                ("_txt", "Text"),
                ("_cod", "Code"),
                ("_boo", "Boolean"),
                ("_num", "Number"),
                ("_geo", "Geographic coordinate"),
                ("_tem", "Temperature"),
                ("_dat", "Date"),
                ("_ema", "Email"),
                ("_uri", "URL"),
                ("_anu", "Annotation URI"),
                ("_tel", "Telephone number"),
                ("_rec", "Record"),
                ("_qty", "Quantity"),
            ]),
            pairs(&[
                ("URI", "_uri"),
                ("Float", "_num"),
                ("Integer", "_num"),
                ("Enumeration", "_txt"),
                ("String", "_txt"),
                ("Phone number", "_tel"),
                ("E-mail", "_ema"),
                ("Geographic coordinates", "_geo"),
                ("Geo", "_geo"),
            ]),
        )
    }
    pub fn german() -> Self {
        Self::new(
            "de",
            pairs(&[
                ("_wpg", "Seite"),
                ("_txt", "Text"),
                ("_cod", "Quellcode"),
                ("_boo", "Wahrheitswert"),
                ("_num", "Zahl"),
                ("_geo", "Geografische Koordinaten"),
                ("_tem", "Temperatur"),
                ("_dat", "Datum"),
                ("_ema", "E-Mail"),
                ("_uri", "URL"),
                ("_anu", "URI der Annotation"),
                ("_tel", "Telefonnummer"),
                ("_rec", "Verbund"),
                ("_qty", "Maß"),
            ]),
            pairs(&[
                ("URI", "_uri"),
                ("Ganze Zahl", "_num"),
                ("Dezimalzahl", "_num"),
                ("Aufzählung", "_txt"),
                ("Zeichenkette", "_txt"),
                ("Telefon", "_tel"),
                ("Email", "_ema"),
            ]),
        )
    }
    pub fn for_code(code: &str) -> Result<Self> {
        match code.to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::english()),
            "de" | "de-de" | "de-at" | "de-ch" => Ok(Self::german()),
            other => Err(SemtypesError::UnknownLanguage(other.to_owned())),
        }
    }
    pub fn code(&self) -> &str {
        &self.code
    }
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }
    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }
}
