// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solara add | list | remove | clear`: manual management of the appliance list.

use colored::Colorize;
use solara_core::types::format_number;
use solara_core::{ApplianceId, ApplianceRecord, SolaraError};
use solara_session::MAX_RECORDS;

use crate::app::App;

/// Fields of a manually entered appliance.
#[derive(Debug, Clone, clap::Args)]
pub struct ManualEntry {
    /// Appliance name, e.g. "freezer".
    #[arg(long)]
    pub name: String,
    /// How many of the appliance there are.
    #[arg(long, default_value_t = 1)]
    pub quantity: u32,
    /// Hours of use during the day.
    #[arg(long, default_value_t = 0.0)]
    pub day_hours: f64,
    /// Hours of use at night.
    #[arg(long, default_value_t = 0.0)]
    pub night_hours: f64,
    /// Power rating in watts.
    #[arg(long)]
    pub wattage: f64,
}

impl From<ManualEntry> for ApplianceRecord {
    fn from(entry: ManualEntry) -> Self {
        ApplianceRecord {
            name: Some(entry.name.trim().to_string()),
            quantity: entry.quantity,
            day_hours: entry.day_hours,
            night_hours: entry.night_hours,
            wattage: Some(entry.wattage),
            ..ApplianceRecord::new()
        }
    }
}

/// Adds an appliance; day and night hours together may not exceed 24.
pub async fn run_add(app: &App, entry: ManualEntry) -> Result<(), SolaraError> {
    let mut form = app.form().await;
    let record = ApplianceRecord::from(entry);
    form.add_manual(record.clone())?;
    form.persist(app.store.as_ref()).await?;
    println!("{} {}", "added".green(), describe(&record));
    if form.records().len() == MAX_RECORDS {
        println!(
            "{}",
            format!("the list holds at most {MAX_RECORDS} appliances; adding more drops the oldest")
                .dimmed()
        );
    }
    Ok(())
}

pub async fn run_list(app: &App, json: bool) -> Result<(), SolaraError> {
    let form = app.form().await;
    if json {
        let out = serde_json::to_string_pretty(form.records())
            .map_err(|e| SolaraError::Internal(format!("failed to encode appliance list: {e}")))?;
        println!("{out}");
        return Ok(());
    }
    if form.records().is_empty() {
        println!("No appliances yet. Run {} or {}.", "solara intake".bold(), "solara add".bold());
        return Ok(());
    }
    for record in form.records() {
        println!("{}  {}", record.id.as_str().dimmed(), describe(record));
    }
    Ok(())
}

pub async fn run_remove(app: &App, id: &str) -> Result<(), SolaraError> {
    let mut form = app.form().await;
    match form.remove(&ApplianceId::from(id)) {
        Some(record) => {
            form.persist(app.store.as_ref()).await?;
            println!("{} {}", "removed".yellow(), describe(&record));
            Ok(())
        }
        None => Err(SolaraError::Validation(format!("no appliance with id `{id}`"))),
    }
}

pub async fn run_clear(app: &App) -> Result<(), SolaraError> {
    let mut form = app.form().await;
    let count = form.records().len();
    form.clear();
    form.persist(app.store.as_ref()).await?;
    println!("cleared {count} appliance(s)");
    Ok(())
}

/// One-line description, e.g. `2 x freezer, 150 W, 12 h day / 12 h night`.
pub fn describe(record: &ApplianceRecord) -> String {
    format!(
        "{} x {}, {} W, {} h day / {} h night",
        record.quantity,
        record.name.as_deref().unwrap_or("(unnamed)"),
        record.wattage.map(format_number).unwrap_or_else(|| "?".into()),
        format_number(record.day_hours),
        format_number(record.night_hours),
    )
}
