use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrainer {
    pub name: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTrainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
}
