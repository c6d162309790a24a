pub mod customer;
pub mod envelope;
pub mod events;
pub mod shop;

pub use customer::Customer;
pub use envelope::ApiEnvelope;
pub use shop::ShopSelection;
