mod builders;

pub use builders::SnapshotBuilder;
