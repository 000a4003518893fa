#![allow(dead_code)]
use serde_json::{json, Map, Value};
use unbound_exporter_domain::StatsSnapshot;

pub struct SnapshotBuilder {
    document: Map<String, Value>,
    top: Map<String, Value>,
    top_blocked: Map<String, Value>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            document: Map::new(),
            top: Map::new(),
            top_blocked: Map::new(),
        }
    }

    pub fn total(mut self, total: u64) -> Self {
        self.document.insert("total".into(), json!(total));
        self
    }

    pub fn passed(mut self, passed: u64) -> Self {
        self.document.insert("passed".into(), json!(passed));
        self
    }

    pub fn blocklist_size(mut self, size: u64) -> Self {
        self.document.insert("blocklist_size".into(), json!(size));
        self
    }

    pub fn breakdown(mut self, name: &str, total: u64, pcnt: Option<f64>) -> Self {
        let mut members = Map::new();
        members.insert("total".into(), json!(total));
        if let Some(pcnt) = pcnt {
            members.insert("pcnt".into(), json!(pcnt));
        }
        self.document.insert(name.into(), Value::Object(members));
        self
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.document.insert(name.into(), value);
        self
    }

    pub fn top(mut self, domain: &str, total: u64) -> Self {
        self.top.insert(domain.into(), json!({ "total": total }));
        self
    }

    pub fn top_blocked(mut self, domain: &str, total: u64, blocklist: &str) -> Self {
        self.top_blocked.insert(
            domain.into(),
            json!({ "total": total, "blocklist": blocklist }),
        );
        self
    }

    pub fn to_value(&self) -> Value {
        let mut document = self.document.clone();
        if !self.top.is_empty() {
            document.insert("top".into(), Value::Object(self.top.clone()));
        }
        if !self.top_blocked.is_empty() {
            document.insert("top_blocked".into(), Value::Object(self.top_blocked.clone()));
        }
        Value::Object(document)
    }

    pub fn build(self) -> StatsSnapshot {
        StatsSnapshot::from_value(self.to_value()).unwrap()
    }
}
