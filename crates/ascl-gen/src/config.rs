use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Pages of linear memory reserved up front. Grown as needed to hold
    /// the literal data.
    pub initial_pages: u32,
    pub max_pages: Option<u32>,
    /// Address of the first byte of literal data.
    pub data_offset: u32,
    /// Export public functions under their own name.
    pub export_public: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            initial_pages: 1,
            max_pages: None,
            data_offset: 0,
            export_public: true,
        }
    }
}
