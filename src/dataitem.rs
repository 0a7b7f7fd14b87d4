// used for timestamps in the time data item
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
// used for decimal numbers
use bigdecimal::BigDecimal;

// used when parsing a string to a number or a timestamp
use std::str::FromStr;
// used to print out readable forms of a data item
use std::fmt;
// custom made ordering for data items
use std::cmp::Ordering;
use std::ops;

/// The closed set of primitive representations every semantic value reduces to.
///
/// The numeric codes are stable and used when data items are persisted, so a
/// new variant must never reuse an existing code.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum DataItemKind {
    NoType = 0,
    Number = 1,
    Blob = 2,
    Boolean = 4,
    Uri = 5,
    Time = 6,
    Geo = 7,
    Container = 8,
    WikiPage = 9,
    Concept = 10,
    Property = 11,
    Error = 12,
}

impl DataItemKind {
    pub const ALL: [DataItemKind; 12] = [
        DataItemKind::NoType,
        DataItemKind::Number,
        DataItemKind::Blob,
        DataItemKind::Boolean,
        DataItemKind::Uri,
        DataItemKind::Time,
        DataItemKind::Geo,
        DataItemKind::Container,
        DataItemKind::WikiPage,
        DataItemKind::Concept,
        DataItemKind::Property,
        DataItemKind::Error,
    ];
    pub fn code(&self) -> u8 {
        *self as u8
    }
    pub fn from_code(code: u8) -> Option<DataItemKind> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }
    /// The two sentinel kinds never back a real value and have no default type.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, DataItemKind::NoType | DataItemKind::Error)
    }
    pub fn name(&self) -> &'static str {
        match self {
            DataItemKind::NoType => "notype",
            DataItemKind::Number => "number",
            DataItemKind::Blob => "blob",
            DataItemKind::Boolean => "boolean",
            DataItemKind::Uri => "uri",
            DataItemKind::Time => "time",
            DataItemKind::Geo => "geo",
            DataItemKind::Container => "container",
            DataItemKind::WikiPage => "wikipage",
            DataItemKind::Concept => "concept",
            DataItemKind::Property => "property",
            DataItemKind::Error => "error",
        }
    }
}
impl fmt::Display for DataItemKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- Decimal --------------
#[derive(Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct Decimal(BigDecimal);

impl Decimal {
    pub fn from_str(s: &str) -> Option<Decimal> {
        match BigDecimal::from_str(s) {
            Ok(decimal) => Some(Decimal(decimal)),
            _ => None,
        }
    }
    pub fn new(decimal: BigDecimal) -> Decimal {
        Decimal(decimal)
    }
    pub fn into_inner(self) -> BigDecimal {
        self.0
    }
}
impl fmt::Display for Decimal {
    // trailing zeros of the fraction are noise once a conversion has run
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let plain = self.0.to_string();
        if plain.contains('.') && !plain.contains(['e', 'E']) {
            let trimmed = plain.trim_end_matches('0').trim_end_matches('.');
            write!(f, "{}", trimmed)
        } else {
            write!(f, "{}", plain)
        }
    }
}
impl ops::Deref for Decimal {
    type Target = BigDecimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ------------- Time --------------
#[derive(Eq, PartialEq, Debug, Hash, Clone)]
pub enum TimeType {
    Year(i32),
    YearMonth(i32, u8),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}
#[derive(Eq, PartialEq, Debug, Hash, Clone)]
pub struct Time {
    moment: TimeType,
}
impl Time {
    pub fn new(moment: TimeType) -> Time {
        Time { moment }
    }
    pub fn moment(&self) -> &TimeType {
        &self.moment
    }
    pub fn new_year_from(d: &str) -> Option<Time> {
        let year = d.trim().parse::<i32>().ok()?;
        NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some(Time { moment: TimeType::Year(year) })
    }
    pub fn new_year_month_from(d: &str) -> Option<Time> {
        let (year, month) = d.trim().split_once('-')?;
        let year = year.parse::<i32>().ok()?;
        let month = month.parse::<u8>().ok()?;
        NaiveDate::from_ymd_opt(year, month as u32, 1)?;
        Some(Time { moment: TimeType::YearMonth(year, month) })
    }
    pub fn new_date_from(d: &str) -> Option<Time> {
        NaiveDate::from_str(d.trim())
            .ok()
            .map(|date| Time { moment: TimeType::Date(date) })
    }
    pub fn new_datetime_from(d: &str) -> Option<Time> {
        let d = d.trim();
        NaiveDateTime::from_str(d)
            .or_else(|_| NaiveDateTime::parse_from_str(d, "%Y-%m-%d %H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(d, "%Y-%m-%d %H:%M"))
            .ok()
            .map(|datetime| Time { moment: TimeType::DateTime(datetime) })
    }
    // the earliest instant covered by this (possibly imprecise) time
    fn start(&self) -> Option<NaiveDateTime> {
        let date = match self.moment {
            TimeType::Year(y) => NaiveDate::from_ymd_opt(y, 1, 1)?,
            TimeType::YearMonth(y, m) => NaiveDate::from_ymd_opt(y, m as u32, 1)?,
            TimeType::Date(d) => d,
            TimeType::DateTime(d) => return Some(d),
        };
        Some(date.and_time(NaiveTime::MIN))
    }
    fn precision(&self) -> u8 {
        match self.moment {
            TimeType::Year(_) => 0,
            TimeType::YearMonth(_, _) => 1,
            TimeType::Date(_) => 2,
            TimeType::DateTime(_) => 3,
        }
    }
    fn month(&self) -> u8 {
        match self.moment {
            TimeType::Year(_) => 0,
            TimeType::YearMonth(_, m) => m,
            TimeType::Date(d) => d.month() as u8,
            TimeType::DateTime(d) => d.month() as u8,
        }
    }
    pub fn year(&self) -> i32 {
        match self.moment {
            TimeType::Year(y) | TimeType::YearMonth(y, _) => y,
            TimeType::Date(d) => d.year(),
            TimeType::DateTime(d) => d.year(),
        }
    }
}
impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        // year and month first, so times chrono cannot place still order
        (self.year(), self.month(), self.start(), self.precision()).cmp(&(
            other.year(),
            other.month(),
            other.start(),
            other.precision(),
        ))
    }
}
impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.moment {
            TimeType::Year(y) => write!(f, "{}", y),
            TimeType::YearMonth(y, m) => write!(f, "{}-{:02}", y, m),
            TimeType::Date(d) => write!(f, "{}", d),
            TimeType::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

// ------------- WikiPage --------------
pub const NS_MAIN: i32 = 0;
pub const NS_CATEGORY: i32 = 14;
pub const NS_PROPERTY: i32 = 102;
pub const NS_CONCEPT: i32 = 108;
pub const NS_FORM: i32 = 106;

#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct WikiPage {
    dbkey: String,
    namespace: i32,
    subobject: String,
}
impl WikiPage {
    pub fn new(dbkey: String, namespace: i32, subobject: String) -> Self {
        Self {
            dbkey,
            namespace,
            subobject,
        }
    }
    pub fn dbkey(&self) -> &str {
        &self.dbkey
    }
    pub fn namespace(&self) -> i32 {
        self.namespace
    }
    pub fn subobject(&self) -> &str {
        &self.subobject
    }
    pub fn title(&self) -> String {
        self.dbkey.replace('_', " ")
    }
}

// ------------- Geo --------------
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

// ------------- DataItem --------------
/// A primitive value as it is stored and compared, independent of the type
/// that produced it.
#[derive(PartialEq, Clone, Debug)]
pub enum DataItem {
    Number(Decimal),
    Blob(String),
    Boolean(bool),
    Uri(String),
    Time(Time),
    Geo(GeoCoord),
    Container(Vec<Option<DataItem>>),
    WikiPage(WikiPage),
    Concept(String),
    Property { key: String, inverse: bool },
    Error(Vec<String>),
}

impl DataItem {
    pub fn kind(&self) -> DataItemKind {
        match self {
            DataItem::Number(_) => DataItemKind::Number,
            DataItem::Blob(_) => DataItemKind::Blob,
            DataItem::Boolean(_) => DataItemKind::Boolean,
            DataItem::Uri(_) => DataItemKind::Uri,
            DataItem::Time(_) => DataItemKind::Time,
            DataItem::Geo(_) => DataItemKind::Geo,
            DataItem::Container(_) => DataItemKind::Container,
            DataItem::WikiPage(_) => DataItemKind::WikiPage,
            DataItem::Concept(_) => DataItemKind::Concept,
            DataItem::Property { .. } => DataItemKind::Property,
            DataItem::Error(_) => DataItemKind::Error,
        }
    }
    pub fn error(message: impl Into<String>) -> DataItem {
        DataItem::Error(vec![message.into()])
    }
    pub fn is_error(&self) -> bool {
        matches!(self, DataItem::Error(_))
    }
    /// Stable string form, used for raw output and as the fallback sort key.
    pub fn serialization(&self) -> String {
        match self {
            DataItem::Number(n) => n.to_string(),
            DataItem::Blob(s) | DataItem::Uri(s) | DataItem::Concept(s) => s.clone(),
            DataItem::Boolean(b) => String::from(if *b { "t" } else { "f" }),
            DataItem::Time(t) => t.to_string(),
            DataItem::Geo(g) => format!("{},{}", g.lat, g.lon),
            DataItem::Container(fields) => fields
                .iter()
                .map(|field| field.as_ref().map(|f| f.serialization()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(";"),
            DataItem::WikiPage(p) => format!("{}#{}##{}", p.dbkey, p.namespace, p.subobject),
            DataItem::Property { key, inverse } => {
                if *inverse {
                    format!("-{}", key)
                } else {
                    key.clone()
                }
            }
            DataItem::Error(messages) => messages.join(" "),
        }
    }
    /// Items of different kinds order by kind code; items of the same kind
    /// order naturally where a natural order exists.
    pub fn compare(&self, other: &DataItem) -> Ordering {
        match (self, other) {
            (DataItem::Number(a), DataItem::Number(b)) => a.cmp(b),
            (DataItem::Boolean(a), DataItem::Boolean(b)) => a.cmp(b),
            (DataItem::Time(a), DataItem::Time(b)) => a.cmp(b),
            (DataItem::Geo(a), DataItem::Geo(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (DataItem::WikiPage(a), DataItem::WikiPage(b)) => a.cmp(b),
            (a, b) if a.kind() == b.kind() => a.serialization().cmp(&b.serialization()),
            (a, b) => a.kind().code().cmp(&b.kind().code()),
        }
    }
}
impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::<{}>", self.serialization(), self.kind())
    }
}
