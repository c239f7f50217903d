//! Query item wire types and the directory-hierarchy prefix they map to.

use crate::query::error::QueryError;
use bon::Builder;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Datatypes resolved through the flat downscaling candidate check instead
/// of the date walk.
pub(crate) const DOWNSCALING_DATATYPES: [&str; 2] =
    ["downscaling_rainfall", "downscaling_temperature"];

/// Inclusive date bounds as ISO-8601-parseable strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        DateRange {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parses both bounds into calendar-aware values.
    pub fn bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime), QueryError> {
        Ok((parse_bound(&self.start)?, parse_bound(&self.end)?))
    }
}

/// One filter describing a logical file family.
///
/// The six hierarchy fields map to directory segments in the fixed order
/// `datatype / production / aggregation / period / extent / fill`; absent
/// fields contribute no segment. Each entry in `files` names a file-type
/// tag resolved as its own subtree walk beneath that prefix.
///
/// # Examples
///
/// ```
/// use climafs::{DateRange, QueryItem};
///
/// let item = QueryItem::builder()
///     .datatype("rainfall")
///     .production("new")
///     .aggregation("avg")
///     .period("month")
///     .extent("statewide")
///     .fill("raw")
///     .files(vec!["data_map".to_string()])
///     .range(DateRange::new("2010-01-01", "2010-02-28"))
///     .build();
/// assert!(!item.is_downscaling());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct QueryItem {
    /// Top hierarchy level, e.g. "rainfall". The two reserved downscaling
    /// datatypes switch the item to candidate-check resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub datatype: Option<String>,
    /// Production line, e.g. "new" or "legacy".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub production: Option<String>,
    /// Aggregation applied to the data, e.g. "avg", "min", "max".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub aggregation: Option<String>,
    /// Reporting period, e.g. "month" or "day". Doubles as the downscaling
    /// scenario selector ("present" vs a projection).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub period: Option<String>,
    /// Spatial extent, e.g. "statewide" or an island code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub extent: Option<String>,
    /// Gap-fill level, e.g. "raw" or "filled".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub fill: Option<String>,
    /// Downscaling method (downscaling items only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub dsm: Option<String>,
    /// Downscaling season (downscaling rainfall only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub season: Option<String>,
    /// Climate model identifier for projected downscaling products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,
    /// Measurement units override; each downscaling datatype has a default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub units: Option<String>,
    /// File-type tags, each resolved independently.
    pub files: Vec<String>,
    /// Inclusive date range for date-walk items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
}

impl QueryItem {
    /// Whether this item resolves through the flat downscaling candidate
    /// check instead of the date walk.
    pub fn is_downscaling(&self) -> bool {
        self.datatype
            .as_deref()
            .is_some_and(|datatype| DOWNSCALING_DATATYPES.contains(&datatype))
    }

    /// Builds the hierarchy prefix under `root`. Absent fields contribute
    /// no segment, so differently-shaped items can land on the same
    /// directory; that collision is accepted behavior.
    pub(crate) fn base_dir(&self, root: &Path) -> PathBuf {
        let mut dir = root.to_path_buf();
        let hierarchy = [
            &self.datatype,
            &self.production,
            &self.aggregation,
            &self.period,
            &self.extent,
            &self.fill,
        ];
        for value in hierarchy.into_iter().flatten() {
            dir.push(value);
        }
        dir
    }

    /// Assembles an item from a flat field map, as produced by packaged
    /// expansion. Unknown field names are dropped.
    pub(crate) fn from_fields(
        files: Vec<String>,
        range: Option<DateRange>,
        mut fields: BTreeMap<String, String>,
    ) -> Self {
        QueryItem {
            datatype: fields.remove("datatype"),
            production: fields.remove("production"),
            aggregation: fields.remove("aggregation"),
            period: fields.remove("period"),
            extent: fields.remove("extent"),
            fill: fields.remove("fill"),
            dsm: fields.remove("dsm"),
            season: fields.remove("season"),
            model: fields.remove("model"),
            units: fields.remove("units"),
            files,
            range,
        }
    }
}

/// Parses a range bound the way the original service accepted them: RFC
/// 3339, a plain datetime, a date, a year-month, or a bare year, with
/// omitted fields defaulting to the start of the period.
pub(crate) fn parse_bound(text: &str) -> Result<NaiveDateTime, QueryError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    let date = if let Ok(parsed) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Some(parsed)
    } else {
        match text.split('-').collect::<Vec<_>>().as_slice() {
            [year] => year
                .parse()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
            [year, month] => match (year.parse().ok(), month.parse().ok()) {
                (Some(year), Some(month)) => NaiveDate::from_ymd_opt(year, month, 1),
                _ => None,
            },
            _ => None,
        }
    };
    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| QueryError::InvalidDate(text.to_string()))
}
