pub mod collection;
pub mod occupancy;
pub mod placement;

pub use collection::Placements;
pub use occupancy::{CellKey, OccupancyIndex, is_valid};
pub use placement::find_first_fit;
