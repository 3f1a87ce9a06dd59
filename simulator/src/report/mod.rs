pub mod export;
pub mod summary;

pub use export::write_json;
pub use summary::RunSummary;
