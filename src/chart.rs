//! Highcharts configuration rendering
//!
//! Turns a reduced [`Report`] into a chart configuration: sorted
//! categories, one series per subgroup (or a single series without
//! one), and a title/subtitle resolved from chart parameters, field
//! translations, and the report date range.

use crate::params::{FieldTranslation, ReportArgs, ReportParams};
use crate::report::{generate_report, GroupCount, Report};
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};

/// One registered data source: a field name and its counts
#[derive(Debug, Clone)]
struct ChartSource {
    field: String,
    data: HashMap<String, GroupCount>,
}

/// Chart configuration builder
#[derive(Debug, Default)]
pub struct ChartBuilder {
    id: String,
    chart_type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub sort_order: String,
    pub translations: HashMap<String, FieldTranslation>,
    sources: Vec<ChartSource>,
}

impl ChartBuilder {
    pub fn new(id: &str, chart_type: &str) -> Self {
        Self {
            id: id.to_string(),
            chart_type: chart_type.to_string(),
            sort_order: "desc".to_string(),
            ..Default::default()
        }
    }

    /// Register a data source. The first source drives the category
    /// axis; a second one names and orders the subgroup series.
    pub fn add_series(&mut self, field: &str, data: HashMap<String, GroupCount>) {
        self.sources.push(ChartSource {
            field: field.to_string(),
            data,
        });
    }

    /// Display label for a field: translation title first, then a
    /// built-in label, then a prettified field name
    pub fn label_for(&self, field: &str) -> String {
        if let Some(title) = self.translations.get(field).and_then(|t| t.title.clone()) {
            return title;
        }
        default_label(field)
    }

    /// Display name for one bucket key of a field
    fn name_for(&self, field: &str, key: &str) -> String {
        self.translations
            .get(field)
            .and_then(|t| t.names.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Produce the final chart configuration
    pub fn build(&self) -> Value {
        let primary = match self.sources.first() {
            Some(source) => source,
            None => return json!({"id": self.id, "type": self.chart_type}),
        };

        let categories = self.sorted_categories(primary);
        let series = if primary.data.values().any(|c| matches!(c, GroupCount::Breakdown(_))) {
            self.subgroup_series(primary, &categories)
        } else {
            self.single_series(primary, &categories)
        };

        let category_names: Vec<String> = categories
            .iter()
            .map(|key| self.name_for(&primary.field, key))
            .collect();

        let mut config = Map::new();
        config.insert("id".to_string(), json!(self.id));
        config.insert("type".to_string(), json!(self.chart_type));
        config.insert("chart".to_string(), json!({"type": self.chart_type}));
        config.insert(
            "title".to_string(),
            json!({"text": self.title.clone().unwrap_or_default()}),
        );
        if let Some(subtitle) = &self.subtitle {
            config.insert("subtitle".to_string(), json!({"text": subtitle}));
        }
        config.insert(
            "xAxis".to_string(),
            json!({
                "title": {"text": self.label_for(&primary.field)},
                "categories": category_names,
            }),
        );
        config.insert(
            "yAxis".to_string(),
            json!({"title": {"text": "Published Stories"}}),
        );
        config.insert("series".to_string(), Value::Array(series));

        Value::Object(config)
    }

    /// Category keys ordered by count, ties broken alphabetically
    fn sorted_categories(&self, primary: &ChartSource) -> Vec<String> {
        let mut keys: Vec<String> = primary.data.keys().cloned().collect();
        keys.sort_by(|a, b| {
            let ca = primary.data.get(a).map(GroupCount::total).unwrap_or(0);
            let cb = primary.data.get(b).map(GroupCount::total).unwrap_or(0);
            let by_count = if self.sort_order == "asc" {
                ca.cmp(&cb)
            } else {
                cb.cmp(&ca)
            };
            by_count.then_with(|| a.cmp(b))
        });
        keys
    }

    fn single_series(&self, primary: &ChartSource, categories: &[String]) -> Vec<Value> {
        let data: Vec<u64> = categories
            .iter()
            .map(|key| primary.data.get(key).map(GroupCount::total).unwrap_or(0))
            .collect();
        vec![json!({"name": self.label_for(&primary.field), "data": data})]
    }

    /// One series per subgroup key, ordered by the subgroup totals
    /// when a second source was registered
    fn subgroup_series(&self, primary: &ChartSource, categories: &[String]) -> Vec<Value> {
        let subgroup_field = self.sources.get(1).map(|s| s.field.clone());

        let sub_keys: Vec<String> = match self.sources.get(1) {
            Some(source) => {
                let mut totals: Vec<(String, u64)> = source
                    .data
                    .iter()
                    .map(|(key, count)| (key.clone(), count.total()))
                    .collect();
                totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                totals.into_iter().map(|(key, _)| key).collect()
            }
            None => {
                let mut keys: HashSet<String> = HashSet::new();
                for count in primary.data.values() {
                    if let GroupCount::Breakdown(map) = count {
                        keys.extend(map.keys().cloned());
                    }
                }
                let mut keys: Vec<String> = keys.into_iter().collect();
                keys.sort();
                keys
            }
        };

        sub_keys
            .into_iter()
            .map(|sub| {
                let data: Vec<u64> = categories
                    .iter()
                    .map(|key| match primary.data.get(key) {
                        Some(GroupCount::Breakdown(map)) => map.get(&sub).copied().unwrap_or(0),
                        _ => 0,
                    })
                    .collect();
                let name = match &subgroup_field {
                    Some(field) => self.name_for(field, &sub),
                    None => sub.clone(),
                };
                json!({"name": name, "data": data})
            })
            .collect()
    }
}

/// Reduce a raw aggregation response and attach a rendered chart
pub fn generate_chart_config(raw: &Value, args: &ReportArgs) -> Report {
    let mut report = generate_report(raw, args);

    let params = args.params.clone().unwrap_or_default();
    let chart = params.chart.clone().unwrap_or_default();

    // The default query aggregates on `source`, so label the chart
    // accordingly when no grouping field was requested.
    let group_field = args.group_field().unwrap_or("source").to_string();

    let mut builder = ChartBuilder::new(
        "content_publishing",
        chart.chart_type.as_deref().unwrap_or("bar"),
    );
    builder.translations = args.translations.clone();
    if let Some(order) = chart.sort_order.clone() {
        builder.sort_order = order;
    }

    builder.add_series(&group_field, report.groups.clone());

    if let Some(subgroups) = report.subgroups.as_ref().filter(|s| !s.is_empty()) {
        if let Some(subgroup_field) = args.subgroup_field() {
            let totals = subgroups
                .iter()
                .map(|(key, count)| (key.clone(), GroupCount::Total(*count)))
                .collect();
            builder.add_series(subgroup_field, totals);
        }
    }

    builder.title = Some(chart.title.clone().unwrap_or_else(|| {
        let group_title = builder.label_for(&group_field);
        match args.subgroup_field() {
            Some(subgroup_field) => format!(
                "Published Stories per {} with {} breakdown",
                group_title,
                builder.label_for(subgroup_field)
            ),
            None => format!("Published Stories per {}", group_title),
        }
    }));
    builder.subtitle = chart.subtitle.clone().or_else(|| subtitle_for_dates(&params));

    report.highcharts = Some(vec![builder.build()]);
    report
}

/// Subtitle describing the report date range
pub fn subtitle_for_dates(params: &ReportParams) -> Option<String> {
    match params.date_filter.as_deref() {
        Some("range") => {
            let start = format_date(params.start_date.as_deref()?)?;
            let end = format_date(params.end_date.as_deref()?)?;
            Some(format!("{} - {}", start, end))
        }
        Some("day") => format_date(params.date.as_deref()?),
        Some("yesterday") => Some("Yesterday".to_string()),
        Some("last_week") => Some("Last Week".to_string()),
        Some("last_month") => Some("Last Month".to_string()),
        Some("last_year") => Some("Last Year".to_string()),
        _ => None,
    }
}

fn format_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%b %-d, %Y").to_string())
}

fn default_label(field: &str) -> String {
    match field {
        "source" => "Source".to_string(),
        "urgency" => "Urgency".to_string(),
        "language" => "Language".to_string(),
        "anpa_category.qcode" => "Category".to_string(),
        "genre.qcode" => "Genre".to_string(),
        "subject.qcode" => "Subject".to_string(),
        "authors.parent" => "Author".to_string(),
        _ => prettify(field),
    }
}

/// Fallback label: strip a `.qcode` suffix, space out underscores,
/// capitalize the first letter
fn prettify(field: &str) -> String {
    let base = field.strip_suffix(".qcode").unwrap_or(field);
    let spaced = base.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> ReportArgs {
        serde_json::from_value(value).unwrap()
    }

    fn flat_raw() -> Value {
        json!({
            "aggregations": {"parent": {"buckets": [
                {"key": "AP", "doc_count": 5},
                {"key": "Reuters", "doc_count": 3},
                {"key": "AFP", "doc_count": 8}
            ]}}
        })
    }

    // ===================================================================
    // Titles
    // ===================================================================

    #[test]
    fn test_default_title() {
        let report = generate_chart_config(
            &flat_raw(),
            &args(json!({"aggs": {"group": {"field": "source"}}})),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(config["title"]["text"], json!("Published Stories per Source"));
    }

    #[test]
    fn test_title_with_subgroup_breakdown() {
        let raw = json!({
            "aggregations": {"parent": {"buckets": [
                {"key": "AP", "child": {"buckets": [{"key": "3", "doc_count": 5}]}}
            ]}}
        });
        let report = generate_chart_config(
            &raw,
            &args(json!({
                "aggs": {"group": {"field": "source"}, "subgroup": {"field": "urgency"}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(
            config["title"]["text"],
            json!("Published Stories per Source with Urgency breakdown")
        );
    }

    #[test]
    fn test_caller_title_wins() {
        let report = generate_chart_config(
            &flat_raw(),
            &args(json!({
                "aggs": {"group": {"field": "source"}},
                "params": {"chart": {"title": "Custom"}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(config["title"]["text"], json!("Custom"));
    }

    #[test]
    fn test_translation_title_used_in_label() {
        let report = generate_chart_config(
            &flat_raw(),
            &args(json!({
                "aggs": {"group": {"field": "source"}},
                "translations": {"source": {"title": "News Service"}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(
            config["title"]["text"],
            json!("Published Stories per News Service")
        );
    }

    // ===================================================================
    // Series and category ordering
    // ===================================================================

    #[test]
    fn test_single_series_sorted_desc_by_default() {
        let report = generate_chart_config(
            &flat_raw(),
            &args(json!({"aggs": {"group": {"field": "source"}}})),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(
            config["xAxis"]["categories"],
            json!(["AFP", "AP", "Reuters"])
        );
        assert_eq!(config["series"], json!([{"name": "Source", "data": [8, 5, 3]}]));
        assert_eq!(config["chart"]["type"], json!("bar"));
    }

    #[test]
    fn test_sort_order_asc() {
        let report = generate_chart_config(
            &flat_raw(),
            &args(json!({
                "aggs": {"group": {"field": "source"}},
                "params": {"chart": {"sort_order": "asc"}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(
            config["xAxis"]["categories"],
            json!(["Reuters", "AP", "AFP"])
        );
    }

    #[test]
    fn test_subgroup_series_aligned_to_categories() {
        let raw = json!({
            "aggregations": {"parent": {"buckets": [
                {"key": "AP", "child": {"buckets": [
                    {"key": "en", "doc_count": 5},
                    {"key": "fr", "doc_count": 3}
                ]}},
                {"key": "Reuters", "child": {"buckets": [
                    {"key": "en", "doc_count": 2}
                ]}}
            ]}}
        });
        let report = generate_chart_config(
            &raw,
            &args(json!({
                "aggs": {"group": {"field": "source"}, "subgroup": {"field": "language"}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];

        // AP totals 8, Reuters 2.
        assert_eq!(config["xAxis"]["categories"], json!(["AP", "Reuters"]));
        // "en" totals 7 across groups, "fr" 3.
        assert_eq!(
            config["series"],
            json!([
                {"name": "en", "data": [5, 2]},
                {"name": "fr", "data": [3, 0]}
            ])
        );
    }

    #[test]
    fn test_subgroup_names_translated() {
        let raw = json!({
            "aggregations": {"parent": {"buckets": [
                {"key": "AP", "child": {"buckets": [{"key": "3", "doc_count": 5}]}}
            ]}}
        });
        let report = generate_chart_config(
            &raw,
            &args(json!({
                "aggs": {"group": {"field": "source"}, "subgroup": {"field": "urgency"}},
                "translations": {"urgency": {"names": {"3": "Normal"}}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(config["series"][0]["name"], json!("Normal"));
    }

    #[test]
    fn test_chart_type_from_params() {
        let report = generate_chart_config(
            &flat_raw(),
            &args(json!({
                "aggs": {"group": {"field": "source"}},
                "params": {"chart": {"type": "column"}}
            })),
        );
        let config = &report.highcharts.unwrap()[0];
        assert_eq!(config["chart"]["type"], json!("column"));
        assert_eq!(config["id"], json!("content_publishing"));
    }

    // ===================================================================
    // Subtitles
    // ===================================================================

    #[test]
    fn test_subtitle_for_range() {
        let params: ReportParams = serde_json::from_value(json!({
            "date_filter": "range",
            "start_date": "2024-06-01",
            "end_date": "2024-06-30"
        }))
        .unwrap();
        assert_eq!(
            subtitle_for_dates(&params),
            Some("Jun 1, 2024 - Jun 30, 2024".to_string())
        );
    }

    #[test]
    fn test_subtitle_for_day_and_relative_filters() {
        let day: ReportParams = serde_json::from_value(json!({
            "date_filter": "day",
            "date": "2024-06-15"
        }))
        .unwrap();
        assert_eq!(subtitle_for_dates(&day), Some("Jun 15, 2024".to_string()));

        let last_week: ReportParams =
            serde_json::from_value(json!({"date_filter": "last_week"})).unwrap();
        assert_eq!(subtitle_for_dates(&last_week), Some("Last Week".to_string()));
    }

    #[test]
    fn test_subtitle_missing_dates() {
        let params: ReportParams =
            serde_json::from_value(json!({"date_filter": "range"})).unwrap();
        assert_eq!(subtitle_for_dates(&params), None);
        assert_eq!(subtitle_for_dates(&ReportParams::default()), None);
    }

    // ===================================================================
    // Labels
    // ===================================================================

    #[test]
    fn test_default_labels() {
        assert_eq!(default_label("anpa_category.qcode"), "Category");
        assert_eq!(default_label("urgency"), "Urgency");
        assert_eq!(default_label("desk_transitions.qcode"), "Desk transitions");
        assert_eq!(default_label("word_count"), "Word count");
    }
}
