pub mod models;
pub mod pii;
pub mod phone;

pub use models::{ApiEnvelope, Customer, ShopSelection};
pub use pii::Masked;
