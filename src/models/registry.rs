use serde::{Deserialize, Serialize};

/// An entry of the application registry; only the name is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryApp {
    pub app_name: String,
}
