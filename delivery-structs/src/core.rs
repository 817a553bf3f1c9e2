use crate::serializable_struct_with_getters;
use anyhow::{anyhow, Context, Result};
use delivery_utils::{from_json_value, KeyValueStore};
use serde::{Deserialize, Serialize};

pub const DELIVERY_STOPS_TABLE: &str = "DeliveryStops";
pub const RESULTS_TABLE: &str = "Results";

serializable_struct_with_getters! {
    StopRecord {
        #[serde(rename = "X")]
        x: i32,
        #[serde(rename = "Y")]
        y: i32,
    }
}

serializable_struct_with_getters! {
    StopSet {
        #[serde(rename = "StopsSetID")]
        stops_set_id: u64,
        #[serde(rename = "Locations")]
        locations: Vec<StopRecord>,
    }
}

impl StopSet {
    pub fn load(store: &dyn KeyValueStore, stops_set_id: u64) -> Result<Self> {
        let value = store
            .get(DELIVERY_STOPS_TABLE, &stops_set_id.to_string())?
            .ok_or_else(|| anyhow!("Stop set {} not found", stops_set_id))?;
        let stop_set: StopSet = from_json_value(value)
            .with_context(|| format!("Stop set {} is malformed", stops_set_id))?;
        log::info!(
            "Loaded {} delivery stops from set {}",
            stop_set.locations.len(),
            stops_set_id
        );
        Ok(stop_set)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.put(
            DELIVERY_STOPS_TABLE,
            &self.stops_set_id.to_string(),
            &serde_json::to_value(self)?,
        )
    }
}

serializable_struct_with_getters! {
    RunResult {
        #[serde(rename = "GUID")]
        guid: String,
        #[serde(rename = "Completed")]
        completed: String,
        #[serde(rename = "Path")]
        path: Vec<usize>,
        #[serde(rename = "Score")]
        score: u64,
        #[serde(rename = "Pop")]
        population_size: usize,
        #[serde(rename = "Crossover")]
        crossover_rate: f64,
        #[serde(rename = "Elitism")]
        elitism_rate: f64,
        #[serde(rename = "Mutation")]
        mutation_rate: f64,
        #[serde(rename = "Tourney")]
        tourney_size: usize,
        #[serde(rename = "NumStops")]
        num_stops: usize,
        #[serde(rename = "Generations")]
        generations: Option<usize>,
        #[serde(rename = "FoundAtGeneration")]
        found_at_generation: Option<usize>,
    }
}

impl RunResult {
    /// Fresh GUID and a local completion timestamp.
    pub fn new_guid() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn completed_now() -> String {
        chrono::Local::now().format("%c").to_string()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store
            .put(RESULTS_TABLE, &self.guid, &serde_json::to_value(self)?)
            .with_context(|| format!("Failed to write result {}", self.guid))
    }

    pub fn load(store: &dyn KeyValueStore, guid: &str) -> Result<Option<Self>> {
        match store.get(RESULTS_TABLE, guid)? {
            Some(value) => Ok(Some(from_json_value(value)?)),
            None => Ok(None),
        }
    }
}
