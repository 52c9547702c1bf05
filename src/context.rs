//! Per-invocation document context.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::reports::ReportType;
use crate::style::StyleDictionary;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// The date and time a report is generated "as of".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsOf {
    /// Long Spanish date, e.g. `19 de octubre de 2026`.
    pub date: String,
    /// Time of day, e.g. `15:11:07`.
    pub time: String,
}

impl AsOf {
    /// Caller-supplied date and time, for reproducible output.
    pub fn fixed(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }

    /// The current local date and time.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    /// Formats `moment` the way the Mexican Spanish locale prints long dates.
    pub fn from_datetime(moment: NaiveDateTime) -> Self {
        let month = MONTHS[moment.month0() as usize];
        Self {
            date: format!("{:02} de {} de {}", moment.day(), month, moment.year()),
            time: format!(
                "{:02}:{:02}:{:02}",
                moment.hour(),
                moment.minute(),
                moment.second()
            ),
        }
    }
}

/// Identification lines printed at the top of every student list page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSheet {
    pub department: String,
    pub subject: String,
    pub teacher: String,
    pub period: String,
    pub group: String,
    pub unit: String,
    pub subject_key: String,
    pub students: String,
}

/// Immutable inputs shared by every page of one report.
///
/// Built before generation starts and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct DocumentContext {
    pub report: ReportType,
    pub as_of: AsOf,
    /// Career, teacher or group the report is about, where applicable.
    pub entity: Option<String>,
    /// Group details of the student list header.
    pub group_sheet: Option<GroupSheet>,
    pub styles: StyleDictionary,
    pub config: ReportConfig,
}

impl DocumentContext {
    /// Context with the report's default style dictionary.
    pub fn new(report: ReportType, as_of: AsOf, config: ReportConfig) -> Self {
        Self {
            report,
            as_of,
            entity: None,
            group_sheet: None,
            styles: StyleDictionary::for_report(report),
            config,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_group_sheet(mut self, sheet: GroupSheet) -> Self {
        self.group_sheet = Some(sheet);
        self
    }

    /// The entity name, or `fallback` when none was given.
    pub fn entity_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.entity.as_deref().unwrap_or(fallback)
    }
}
