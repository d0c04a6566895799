use std::path::PathBuf;
use std::sync::Mutex;

use log::{Level, Metadata, Record};
use path_macro::path;

pub const WORLD_TILE_MAP: &str = include_str!("../tests/data/world.xml");

pub fn tms_test_data_dir() -> PathBuf {
    path!(env!("CARGO_MANIFEST_DIR") / "tests" / "data")
}

/// Keeps the records it receives so tests can inspect the reported failures
#[derive(Default)]
pub struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl CapturingLogger {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records
            .lock()
            .map(|records| records.iter().filter(|(lvl, _)| *lvl == level).map(|(_, msg)| msg.clone()).collect())
            .unwrap_or_default()
    }
}

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}
