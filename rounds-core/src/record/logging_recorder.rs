use super::{AggregateRecorder, Record, RecordStorage, Recorder};
use log::{debug, log_enabled, Level};

/// Aggregates records and writes them with the `log` crate at debug level.
///
/// Nothing is printed with the default `info` filter, which keeps training
/// quiet unless `RUST_LOG=debug` is given.
pub struct LoggingRecorder {
    name: String,
    storage: RecordStorage,
}

impl LoggingRecorder {
    /// Constructs a recorder. `name` is prepended to every line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: RecordStorage::new(),
        }
    }
}

impl Recorder for LoggingRecorder {
    fn write(&mut self, record: Record) {
        if !log_enabled!(Level::Debug) || record.is_empty() {
            return;
        }
        let mut items = record
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>();
        items.sort();
        debug!("[{}] {}", self.name, items.join(", "));
    }
}

impl AggregateRecorder for LoggingRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let mut record = self.storage.aggregate();
        record.insert("env_steps", super::RecordValue::Scalar(step as f32));
        self.write(record);
    }
}
