mod mock_ports;

pub use mock_ports::{poll_use_case, RecordingStore, ScriptedFetcher};
