use serde_json::Value;

use crate::types::{CostLineItem, MetricSummary};

static NULL_CELL: Value = Value::Null;

/// Reads a numeric cell. BigQuery encodes NUMERIC/FLOAT64 results as
/// strings; plain JSON numbers are accepted too. Null becomes `None`.
pub fn parse_numeric_cell(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn parse_string_cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decodes one `{"f": [{"v": service}, {"v": sku}, {"v": cost}]}` row.
pub fn parse_cost_row(row: &Value) -> Option<CostLineItem> {
    let cells = row.get("f")?.as_array()?;
    if cells.len() < 3 {
        return None;
    }
    let cell = |idx: usize| cells.get(idx).and_then(|c| c.get("v")).unwrap_or(&NULL_CELL);
    Some(CostLineItem {
        service: parse_string_cell(cell(0)),
        sku: parse_string_cell(cell(1)),
        cost: parse_numeric_cell(cell(2)).unwrap_or(0.0),
    })
}

/// Extracts the number from a Cloud Monitoring `TypedValue`. Points may be
/// encoded as `doubleValue` or as `int64Value` (a JSON string).
pub fn parse_point_value(value: &Value) -> Option<f64> {
    if let Some(d) = value.get("doubleValue").and_then(parse_numeric_cell) {
        return Some(d);
    }
    value.get("int64Value").and_then(parse_numeric_cell)
}

/// Reduces pooled samples to average/max/min; `None` when there are no samples.
pub fn summarize(values: &[f64]) -> Option<MetricSummary> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    Some(MetricSummary {
        average: sum / values.len() as f64,
        maximum,
        minimum,
    })
}

pub fn bytes_to_gigabytes(bytes: f64) -> f64 {
    bytes / (1024.0 * 1024.0 * 1024.0)
}
