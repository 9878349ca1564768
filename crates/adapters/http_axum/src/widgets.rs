//! Widget fragments — askama templates for each widget kind.
//!
//! Every value coming from a payload goes through the template's HTML
//! escaper; the dashboard page embeds the rendered fragments as-is.

use askama::Template;
use serde_json::Value;

use dashdeck_domain::content::WidgetContent;
use dashdeck_domain::payload::{
    CardData, ChartData, DigitalData, ListData, SectionBody, StackedBar, WidgetData,
};
use dashdeck_domain::widget::WidgetName;

/// Legend colours, cycled by series index.
pub const PALETTE: [&str; 5] = ["#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6"];

/// Text of the placeholder shown for an empty list.
pub const EMPTY_PLACEHOLDER: &str = "No data";

#[must_use]
pub fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Id of the chart canvas; one chart per widget keeps it unique.
#[must_use]
pub fn canvas_id(widget: &WidgetName) -> String {
    format!("chart-{widget}")
}

/// Render what a widget's content node holds.
///
/// # Errors
///
/// Returns the template error when a fragment fails to render.
pub fn render(widget: &WidgetName, content: &WidgetContent) -> askama::Result<String> {
    match content {
        WidgetContent::Failure(message) => ErrorTemplate { message }.render(),
        WidgetContent::Data(WidgetData::Card(card)) => CardTemplate::from(card).render(),
        WidgetContent::Data(WidgetData::Chart(chart)) => ChartTemplate::new(chart, widget).render(),
        WidgetContent::Data(WidgetData::List(list)) => ListTemplate::from(list).render(),
        WidgetContent::Data(WidgetData::Digital(digital)) => DigitalTemplate::from(digital).render(),
        WidgetContent::Data(WidgetData::Generic(raw)) => GenericTemplate::from(raw).render(),
    }
}

#[derive(Template)]
#[template(path = "widgets/error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "widgets/card.html")]
struct CardTemplate {
    sections: Vec<CardSectionView>,
}

struct CardSectionView {
    name: String,
    body: SectionView,
}

enum SectionView {
    Bar(BarView),
    Table(Vec<RowView>),
}

struct BarView {
    segments: Vec<SegmentView>,
    filler: Option<String>,
}

struct SegmentView {
    width: String,
    title: String,
}

struct RowView {
    field: String,
    value: String,
}

impl From<&CardData> for CardTemplate {
    fn from(card: &CardData) -> Self {
        let sections = card
            .sections
            .iter()
            .map(|section| CardSectionView {
                name: section.name.clone(),
                body: match &section.body {
                    SectionBody::StackedBar(bar) => SectionView::Bar(BarView::from(bar)),
                    SectionBody::Table(rows) => SectionView::Table(
                        rows.iter()
                            .map(|(field, value)| RowView {
                                field: field.clone(),
                                value: display_value(value),
                            })
                            .collect(),
                    ),
                },
            })
            .collect();
        Self { sections }
    }
}

impl From<&StackedBar> for BarView {
    fn from(bar: &StackedBar) -> Self {
        let layout = bar.layout();
        Self {
            segments: layout
                .segments
                .iter()
                .map(|segment| SegmentView {
                    width: format!("{:.2}", segment.width),
                    title: format!("{}: {}", segment.label, segment.value),
                })
                .collect(),
            filler: layout.filler.map(|width| format!("{width:.2}")),
        }
    }
}

/// Strings as-is, everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Template)]
#[template(path = "widgets/chart.html")]
struct ChartTemplate<'a> {
    canvas_id: String,
    legend: Vec<LegendEntry<'a>>,
}

struct LegendEntry<'a> {
    name: &'a str,
    color: &'static str,
}

impl<'a> ChartTemplate<'a> {
    fn new(chart: &'a ChartData, widget: &WidgetName) -> Self {
        Self {
            canvas_id: canvas_id(widget),
            legend: chart
                .entries()
                .iter()
                .enumerate()
                .map(|(index, series)| LegendEntry {
                    name: &series.name,
                    color: color(index),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "widgets/list.html")]
struct ListTemplate<'a> {
    placeholder: &'static str,
    items: Vec<ListItemView<'a>>,
}

struct ListItemView<'a> {
    title: &'a str,
    summary: &'a str,
    author: &'a str,
    meta: &'a str,
}

impl<'a> From<&'a ListData> for ListTemplate<'a> {
    fn from(list: &'a ListData) -> Self {
        Self {
            placeholder: EMPTY_PLACEHOLDER,
            items: list
                .entries()
                .iter()
                .map(|item| ListItemView {
                    title: &item.title,
                    summary: item.summary.as_deref().unwrap_or_default(),
                    author: &item.author,
                    meta: &item.meta,
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "widgets/digital.html")]
struct DigitalTemplate<'a> {
    time: &'a str,
    date: &'a str,
    weekday: Option<&'a str>,
}

impl<'a> From<&'a DigitalData> for DigitalTemplate<'a> {
    fn from(digital: &'a DigitalData) -> Self {
        Self {
            time: digital.display_time(),
            date: digital.display_date(),
            weekday: digital.display_weekday(),
        }
    }
}

#[derive(Template)]
#[template(path = "widgets/generic.html")]
struct GenericTemplate {
    json: String,
}

impl From<&Value> for GenericTemplate {
    fn from(raw: &Value) -> Self {
        Self {
            json: serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string()),
        }
    }
}
