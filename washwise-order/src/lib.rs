pub mod models;
pub mod payment;
pub mod record_id;
pub mod manager;

pub use models::{LaundryRecord, RecordDraft, RecordStatus};
pub use payment::{PaymentEntry, PaymentMethod, PaymentState, PaymentStatus};
pub use record_id::RecordIdGenerator;
pub use manager::{RecordError, RecordManager};
