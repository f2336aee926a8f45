use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::StatusCode;
use tracing::{error, info};

use crate::error::DeliveryError;
use crate::parsing::bytes_to_gigabytes;
use crate::types::{CostReport, Embed, EmbedField, EmbedFooter, NotificationPayload, ResourceUsage};

/// Google blue.
pub const EMBED_COLOR: u32 = 0x4285F4;
pub const FOOTER_TEXT: &str = "GCP Cost Monitoring";
/// Number of line items shown in the breakdown field.
pub const TOP_SERVICES_SHOWN: usize = 5;

fn field(name: &str, value: String, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value,
        inline,
    }
}

pub fn build_discord_payload(cost: &CostReport, usage: &ResourceUsage, date: NaiveDate) -> NotificationPayload {
    build_discord_payload_at(cost, usage, date, Utc::now())
}

/// Builds the report embed. `generated_at` becomes the embed timestamp; the
/// covered day only appears in the title.
pub fn build_discord_payload_at(
    cost: &CostReport,
    usage: &ResourceUsage,
    date: NaiveDate,
    generated_at: DateTime<Utc>,
) -> NotificationPayload {
    let mut fields: Vec<EmbedField> = Vec::new();

    fields.push(field("💰 Total Cost", format!("${:.2} USD", cost.total_cost), false));

    if !cost.items.is_empty() {
        let top_lines: Vec<String> = cost
            .items
            .iter()
            .take(TOP_SERVICES_SHOWN)
            .map(|item| format!("• {}: ${:.2}", item.service, item.cost))
            .collect();
        fields.push(field("📋 Top Services by Cost", top_lines.join("\n"), false));
    }

    if let Some(cpu) = &usage.cpu {
        fields.push(field(
            "🖥️ CPU Utilization",
            format!("Avg: {:.1}%\nMax: {:.1}%", cpu.average, cpu.maximum),
            true,
        ));
    }

    if let Some(storage) = &usage.storage {
        fields.push(field(
            "💾 Storage Usage",
            format!("{:.2} GB", bytes_to_gigabytes(storage.average)),
            true,
        ));
    }

    if let Some(sql) = &usage.sql_memory {
        fields.push(field("🗄️ Cloud SQL Memory", format!("Avg: {:.1}%", sql.average), true));
    }

    NotificationPayload {
        embeds: vec![Embed {
            title: format!("📊 GCP Daily Report - {}", date.format("%Y-%m-%d")),
            color: EMBED_COLOR,
            fields,
            footer: EmbedFooter {
                text: FOOTER_TEXT.to_string(),
            },
            timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }],
    }
}

/// Posts the payload once. Discord answers a plain webhook execution with
/// `204 No Content`; every other status is a failed delivery.
pub async fn send_to_discord(
    client: &reqwest::Client,
    webhook_url: &str,
    payload: &NotificationPayload,
) -> Result<(), DeliveryError> {
    let res = client.post(webhook_url).json(payload).send().await?;
    if res.status() != StatusCode::NO_CONTENT {
        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        error!("Discord webhook failed: {} - {}", status, body);
        return Err(DeliveryError::UnexpectedStatus { status, body });
    }
    info!("report delivered to Discord");
    Ok(())
}
