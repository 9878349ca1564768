//! Payload — typed widget data parsed from the envelope's `data` field.
//!
//! The JSON shape depends on the widget kind:
//!
//! | Kind | Shape |
//! |------|-------|
//! | `card` | `{ section: { "type": "stacked-bar-chart" \| "table", ... } }` |
//! | `chart` | `{ "series": [ { "name" } ] }` |
//! | `list` | `{ "items": [ { "title", "summary"?, "author", "meta" } ] }` |
//! | `digital` | `{ "time"?, "date"?, "weekday"? }` |
//! | `generic` | anything |

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::widget::WidgetKind;

/// Nested `type` of a card section drawn as a proportional bar.
pub const STACKED_BAR_CHART: &str = "stacked-bar-chart";

/// Nested `type` of a card section drawn as a two-column table.
pub const TABLE: &str = "table";

/// Widget data, one variant per [`WidgetKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Card(CardData),
    Chart(ChartData),
    List(ListData),
    Digital(DigitalData),
    Generic(Value),
}

impl WidgetData {
    /// Interpret raw JSON according to the widget kind.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the value does not fit the kind's shape
    /// or a stacked bar has an unusable total or value.
    pub fn parse(kind: WidgetKind, value: Value) -> Result<Self, RenderError> {
        Ok(match kind {
            WidgetKind::Card => Self::Card(CardData::parse(value)?),
            WidgetKind::Chart => Self::Chart(serde_json::from_value(value)?),
            WidgetKind::List => Self::List(serde_json::from_value(value)?),
            WidgetKind::Digital => Self::Digital(serde_json::from_value(value)?),
            WidgetKind::Generic => Self::Generic(value),
        })
    }
}

/// Ordered sections of a card widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardData {
    pub sections: Vec<CardSection>,
}

/// One named section of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSection {
    pub name: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    StackedBar(StackedBar),
    /// Field name and value pairs, in payload order.
    Table(Vec<(String, Value)>),
}

impl CardData {
    /// Parse a card payload, keeping sections in insertion order.
    ///
    /// Entries that are not objects, or whose nested `type` is not a known
    /// section kind, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Shape`] when the payload is not an object, or
    /// a stacked-bar error for a malformed bar section.
    pub fn parse(value: Value) -> Result<Self, RenderError> {
        let entries: Map<String, Value> = serde_json::from_value(value)?;
        let mut sections = Vec::with_capacity(entries.len());

        for (name, entry) in entries {
            let Value::Object(mut fields) = entry else {
                continue;
            };
            let Some(Value::String(section_type)) = fields.remove("type") else {
                continue;
            };
            let body = match section_type.as_str() {
                STACKED_BAR_CHART => SectionBody::StackedBar(StackedBar::parse(&name, fields)?),
                TABLE => SectionBody::Table(fields.into_iter().collect()),
                _ => continue,
            };
            sections.push(CardSection { name, body });
        }

        Ok(Self { sections })
    }
}

/// Named quantities drawn against a total.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBar {
    pub total: f64,
    pub items: Vec<(String, f64)>,
}

/// One explicit segment of a stacked bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub label: String,
    pub value: f64,
    /// Share of the bar in percent.
    pub width: f64,
}

/// Computed geometry of a stacked bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub segments: Vec<BarSegment>,
    /// Width of the transparent remainder, when the items leave any.
    pub filler: Option<f64>,
}

impl BarLayout {
    /// Sum of every width, filler included.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.segments.iter().map(|s| s.width).sum::<f64>() + self.filler.unwrap_or(0.0)
    }
}

impl StackedBar {
    fn parse(section: &str, mut fields: Map<String, Value>) -> Result<Self, RenderError> {
        let total = match fields.remove("total") {
            None | Some(Value::Null) => {
                return Err(RenderError::MissingTotal {
                    section: section.to_string(),
                });
            }
            Some(raw) => match raw.as_f64() {
                Some(total) if total.is_finite() && total > 0.0 => total,
                _ => {
                    return Err(RenderError::InvalidTotal {
                        section: section.to_string(),
                        total: raw,
                    });
                }
            },
        };

        let items = fields
            .into_iter()
            .map(|(item, value)| match value.as_f64() {
                Some(v) if v.is_finite() => Ok((item, v)),
                _ => Err(RenderError::NonNumericValue {
                    section: section.to_string(),
                    item,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { total, items })
    }

    /// Compute segment widths.
    ///
    /// Each item takes `value / total * 100` percent, clamped so the running
    /// sum never exceeds 100. Whatever the items leave of the total becomes
    /// the filler.
    #[must_use]
    pub fn layout(&self) -> BarLayout {
        let mut used = 0.0_f64;
        let mut sum = 0.0_f64;
        let mut segments = Vec::with_capacity(self.items.len());

        for (label, value) in &self.items {
            let value = *value;
            let room = (100.0 - used).max(0.0);
            let width = (value / self.total * 100.0).max(0.0).min(room);
            used += width;
            sum += value.max(0.0);
            segments.push(BarSegment {
                label: label.clone(),
                value,
                width,
            });
        }

        let remainder = (self.total - sum).max(0.0);
        let filler = (remainder > 0.0).then(|| remainder / self.total * 100.0);

        BarLayout { segments, filler }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub series: Option<Vec<ChartSeries>>,
}

impl ChartData {
    /// Series to list in the legend; empty when the payload has none.
    #[must_use]
    pub fn entries(&self) -> &[ChartSeries] {
        self.series.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub items: Option<Vec<ListItem>>,
}

impl ListData {
    /// Items to show; empty when the payload has none.
    #[must_use]
    pub fn entries(&self) -> &[ListItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListItem {
    pub title: String,
    pub summary: Option<String>,
    pub author: String,
    pub meta: String,
}

/// Time shown when a digital payload carries none.
pub const TIME_PLACEHOLDER: &str = "--:--:--";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DigitalData {
    pub time: Option<String>,
    pub date: Option<String>,
    pub weekday: Option<String>,
}

impl DigitalData {
    /// The time, or [`TIME_PLACEHOLDER`] when absent or empty.
    #[must_use]
    pub fn display_time(&self) -> &str {
        self.time
            .as_deref()
            .filter(|time| !time.is_empty())
            .unwrap_or(TIME_PLACEHOLDER)
    }

    #[must_use]
    pub fn display_date(&self) -> &str {
        self.date.as_deref().unwrap_or_default()
    }

    /// The weekday, unless absent or empty.
    #[must_use]
    pub fn display_weekday(&self) -> Option<&str> {
        self.weekday.as_deref().filter(|weekday| !weekday.is_empty())
    }
}
