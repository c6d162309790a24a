use serde::{Deserialize, Serialize};

/// A customer as served by the external customer directory.
///
/// Field names follow the directory's JSON (`cus_id`, `cus_fName`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    #[serde(rename = "cus_id")]
    pub id: String,
    #[serde(rename = "cus_fName")]
    pub first_name: String,
    #[serde(rename = "cus_lName")]
    pub last_name: String,
    #[serde(rename = "cus_phoneNum", default)]
    pub phone: String,
    #[serde(rename = "cus_address", default)]
    pub address: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// A directory entry is only usable for autofill when both names are present.
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }
}
