//! Output sinks receiving the field batch

use crate::models::{FieldBatch, OutputField};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Destination for the nine output fields. Implementations apply a batch as
/// one operation; no reader may observe half of it.
pub trait OutputSink: Send + Sync {
    fn write_batch(&self, batch: &FieldBatch);
}

/// In-memory field store, addressed by field identifier
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    fields: BTreeMap<OutputField, String>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of every field that has been written so far
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<OutputField, String> {
        self.state().fields.clone()
    }

    #[must_use]
    pub fn get(&self, field: OutputField) -> Option<String> {
        self.state().fields.get(&field).cloned()
    }

    /// Number of batches applied
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state().writes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().fields.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write_batch(&self, batch: &FieldBatch) {
        let mut state = self.state();
        for (field, value) in batch.iter() {
            state.fields.insert(field, value.to_string());
        }
        state.writes += 1;
    }
}

/// Renders each batch to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    pub json: bool,
}

impl ConsoleSink {
    /// Text for one batch, either aligned `id: value` lines or a JSON object
    #[must_use]
    pub fn render(&self, batch: &FieldBatch) -> String {
        if self.json {
            let object: Map<String, Value> = batch
                .iter()
                .map(|(field, value)| (field.id().to_string(), Value::String(value.to_string())))
                .collect();
            Value::Object(object).to_string()
        } else {
            batch
                .iter()
                .map(|(field, value)| {
                    let shown = if value.is_empty() { "-" } else { value };
                    format!("{:>10}: {}", field.id(), shown)
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

impl OutputSink for ConsoleSink {
    fn write_batch(&self, batch: &FieldBatch) {
        println!("{}", self.render(batch));
    }
}
