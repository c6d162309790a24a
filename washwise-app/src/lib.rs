pub mod dashboard;
pub mod error;
pub mod search_box;
pub mod seed;
pub mod state;

pub use dashboard::{QuickStats, TileView};
pub use error::AppError;
pub use search_box::SearchBox;
pub use state::{ActionOutcome, AppState, RecordView, Repositories};
