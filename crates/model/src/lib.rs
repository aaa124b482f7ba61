use crate::index::GsiSpec;

pub mod env;
pub mod event;
pub mod index;
pub mod outcome;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// One provisioning run over a single table.
/// Built once per lifecycle event and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub table_name: String,
    pub indexes: Vec<GsiSpec>,
}

impl ProvisioningRequest {
    pub fn new(table_name: String, indexes: Vec<GsiSpec>) -> Self {
        ProvisioningRequest {
            table_name,
            indexes,
        }
    }
}
