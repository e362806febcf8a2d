// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-progress appliance draft plus the finalized appliance list.

use solara_core::{ApplianceId, ApplianceRecord, FieldName, KeyValueStore, SolaraError};
use solara_storage::{keys, load_json, save_json};
use tracing::{debug, info, warn};

/// Most recent finalized appliances kept in the list.
pub const MAX_RECORDS: usize = 10;

/// The single owner of the appliance draft and the finalized list.
///
/// [`set`](Self::set) is the only way to change the draft, so every field
/// value passes per-field validation.
#[derive(Debug, Clone, Default)]
pub struct ApplianceForm {
    draft: ApplianceRecord,
    records: Vec<ApplianceRecord>,
}

impl ApplianceForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The appliance currently being described.
    pub fn get(&self) -> &ApplianceRecord {
        &self.draft
    }

    /// Validates and stores one field of the draft.
    pub fn set(&mut self, field: FieldName, value: &str) -> Result<(), SolaraError> {
        self.draft.set_field(field, value)?;
        debug!(field = %field, value, "draft field set");
        Ok(())
    }

    /// Appends the draft to the finalized list and starts a fresh draft.
    ///
    /// Requires the draft to have a name and a wattage.
    pub fn finalize(&mut self) -> Result<ApplianceRecord, SolaraError> {
        if !self.draft.is_complete() {
            return Err(SolaraError::Validation(
                "an appliance needs a name and a wattage before it can be saved".into(),
            ));
        }
        let record = std::mem::take(&mut self.draft);
        info!(
            id = %record.id,
            name = record.name.as_deref().unwrap_or_default(),
            quantity = record.quantity,
            "appliance finalized"
        );
        self.push(record.clone());
        Ok(record)
    }

    /// Adds a manually entered appliance after [`validate_manual`].
    pub fn add_manual(&mut self, record: ApplianceRecord) -> Result<(), SolaraError> {
        validate_manual(&record)?;
        self.push(record);
        Ok(())
    }

    /// Writes the finalized list to `store`.
    pub async fn persist(&self, store: &dyn KeyValueStore) -> Result<(), SolaraError> {
        save_json(store, keys::APPLIANCES, &self.records).await?;
        debug!(count = self.records.len(), "appliance list persisted");
        Ok(())
    }

    /// Replaces the finalized list with the one in `store`.
    ///
    /// A malformed payload is discarded and the list starts empty; records
    /// missing a name or wattage are dropped. Only the most recent
    /// [`MAX_RECORDS`] are kept.
    pub async fn restore(&mut self, store: &dyn KeyValueStore) {
        let loaded: Vec<ApplianceRecord> = load_json(store, keys::APPLIANCES)
            .await
            .unwrap_or_default();
        let total = loaded.len();
        let mut records: Vec<ApplianceRecord> =
            loaded.into_iter().filter(|r| r.is_complete()).collect();
        if records.len() < total {
            warn!(
                dropped = total - records.len(),
                "discarded incomplete stored appliances"
            );
        }
        if records.len() > MAX_RECORDS {
            records.drain(..records.len() - MAX_RECORDS);
        }
        debug!(count = records.len(), "appliance list restored");
        self.records = records;
    }

    /// Discards the draft and starts describing a new appliance.
    pub fn start_new(&mut self) {
        self.draft = ApplianceRecord::new();
    }

    /// Removes a finalized appliance by id.
    pub fn remove(&mut self, id: &ApplianceId) -> Option<ApplianceRecord> {
        let index = self.records.iter().position(|r| &r.id == id)?;
        Some(self.records.remove(index))
    }

    /// Removes every finalized appliance.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Finalized appliances, oldest first.
    pub fn records(&self) -> &[ApplianceRecord] {
        &self.records
    }

    fn push(&mut self, record: ApplianceRecord) {
        self.records.push(record);
        if self.records.len() > MAX_RECORDS {
            let dropped = self.records.remove(0);
            debug!(id = %dropped.id, "oldest appliance dropped from list");
        }
    }
}

/// Validation for the manual-entry path.
///
/// Stricter than voice entry: day and night hours together must not exceed
/// 24.
pub fn validate_manual(record: &ApplianceRecord) -> Result<(), SolaraError> {
    if record.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        return Err(SolaraError::Validation("appliance name is required".into()));
    }
    if record.quantity < 1 {
        return Err(SolaraError::Validation("quantity must be at least 1".into()));
    }
    if !record.wattage.is_some_and(|w| w.is_finite() && w > 0.0) {
        return Err(SolaraError::Validation(
            "wattage must be greater than zero".into(),
        ));
    }
    for (label, hours) in [("day", record.day_hours), ("night", record.night_hours)] {
        if !(0.0..=24.0).contains(&hours) {
            return Err(SolaraError::Validation(format!(
                "{label} hours must be between 0 and 24"
            )));
        }
    }
    if record.total_hours() > 24.0 {
        return Err(SolaraError::Validation(format!(
            "day and night hours add up to {}, which is more than 24",
            record.total_hours()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solara_storage::MemoryStore;

    fn filled(name: &str, watts: &str) -> ApplianceForm {
        let mut form = ApplianceForm::new();
        form.set(FieldName::Name, name).unwrap();
        form.set(FieldName::Wattage, watts).unwrap();
        form
    }

    #[test]
    fn finalize_requires_name_and_wattage() {
        let mut form = ApplianceForm::new();
        form.set(FieldName::Name, "freezer").unwrap();
        assert!(form.finalize().is_err());
        assert!(form.records().is_empty());

        form.set(FieldName::Wattage, "150").unwrap();
        let record = form.finalize().unwrap();
        assert_eq!(record.name.as_deref(), Some("freezer"));
        assert_eq!(form.records().len(), 1);
        assert!(form.get().name.is_none(), "a fresh draft starts after finalize");
        assert_ne!(form.get().id, record.id);
    }

    #[test]
    fn invalid_set_leaves_draft_unchanged() {
        let mut form = ApplianceForm::new();
        form.set(FieldName::Quantity, "3").unwrap();
        assert!(form.set(FieldName::Quantity, "-1").is_err());
        assert!(form.set(FieldName::DayHours, "25").is_err());
        assert_eq!(form.get().quantity, 3);
        assert_eq!(form.get().day_hours, 0.0);
    }

    #[test]
    fn list_keeps_most_recent_ten() {
        let mut form = ApplianceForm::new();
        for i in 0..12 {
            form.set(FieldName::Name, &format!("item {i}")).unwrap();
            form.set(FieldName::Wattage, "10").unwrap();
            form.finalize().unwrap();
        }
        assert_eq!(form.records().len(), MAX_RECORDS);
        assert_eq!(form.records()[0].name.as_deref(), Some("item 2"));
        assert_eq!(form.records()[9].name.as_deref(), Some("item 11"));
    }

    #[test]
    fn remove_by_id() {
        let mut form = filled("fan", "75");
        let id = form.finalize().unwrap().id;
        assert!(form.remove(&ApplianceId::from("missing")).is_none());
        assert_eq!(form.remove(&id).unwrap().id, id);
        assert!(form.records().is_empty());
    }

    #[test]
    fn start_new_discards_draft() {
        let mut form = filled("fan", "75");
        form.start_new();
        assert!(form.get().name.is_none());
        assert!(form.get().wattage.is_none());
    }

    #[test]
    fn manual_entry_enforces_daily_total() {
        let mut record = ApplianceRecord::new();
        record.name = Some("pump".into());
        record.wattage = Some(750.0);
        record.day_hours = 16.0;
        record.night_hours = 10.0;
        assert!(validate_manual(&record).is_err());

        record.night_hours = 8.0;
        assert!(validate_manual(&record).is_ok());

        let mut form = ApplianceForm::new();
        form.add_manual(record).unwrap();
        assert_eq!(form.records().len(), 1);
    }

    #[test]
    fn voice_path_does_not_enforce_daily_total() {
        let mut form = filled("freezer", "150");
        form.set(FieldName::DayHours, "20").unwrap();
        form.set(FieldName::NightHours, "12").unwrap();
        assert!(form.finalize().is_ok());
    }

    #[tokio::test]
    async fn persist_then_restore() {
        let store = MemoryStore::new();
        let mut form = filled("television", "120");
        form.finalize().unwrap();
        form.persist(&store).await.unwrap();

        let mut restored = ApplianceForm::new();
        restored.restore(&store).await;
        assert_eq!(restored.records(), form.records());
    }

    #[tokio::test]
    async fn restore_from_malformed_payload_resets_to_empty() {
        let store = MemoryStore::new();
        store.set(keys::APPLIANCES, "not json at all").await.unwrap();

        let mut form = filled("fan", "75");
        form.finalize().unwrap();
        form.restore(&store).await;
        assert!(form.records().is_empty());
        assert_eq!(store.get(keys::APPLIANCES).await.unwrap(), None);
    }

    #[tokio::test]
    async fn restore_drops_incomplete_and_caps_list() {
        let store = MemoryStore::new();
        let mut items: Vec<serde_json::Value> = (0..12)
            .map(|i| {
                serde_json::json!({
                    "id": format!("id-{i}"),
                    "name": format!("item {i}"),
                    "quantity": 1,
                    "dayHours": 4,
                    "nightHours": 0,
                    "wattage": 60
                })
            })
            .collect();
        items.push(serde_json::json!({"id": "no-watts", "name": "mystery"}));
        store
            .set(keys::APPLIANCES, &serde_json::to_string(&items).unwrap())
            .await
            .unwrap();

        let mut form = ApplianceForm::new();
        form.restore(&store).await;
        assert_eq!(form.records().len(), MAX_RECORDS);
        assert_eq!(form.records()[0].id.as_str(), "id-2");
        assert_eq!(form.records()[9].id.as_str(), "id-11");
    }
}
