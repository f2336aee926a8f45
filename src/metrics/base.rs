use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// The resource metrics sampled for the daily report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMetric {
    CpuUtilization,
    StorageBytes,
    SqlMemoryUtilization,
}

impl ResourceMetric {
    pub const ALL: [ResourceMetric; 3] = [
        ResourceMetric::CpuUtilization,
        ResourceMetric::StorageBytes,
        ResourceMetric::SqlMemoryUtilization,
    ];

    pub fn metric_type(&self) -> &'static str {
        match self {
            ResourceMetric::CpuUtilization => "compute.googleapis.com/instance/cpu/utilization",
            ResourceMetric::StorageBytes => "storage.googleapis.com/storage/total_bytes",
            ResourceMetric::SqlMemoryUtilization => "cloudsql.googleapis.com/database/memory/utilization",
        }
    }
}

/// Half-open UTC day: `[date 00:00, date+1 00:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn rfc3339(&self) -> (String, String) {
        (
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }
}
