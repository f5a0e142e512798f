//! Aurora scoring core
//!
//! Pure functions over immutable snapshots:
//! - Proximity search over the sparse aurora grid
//! - Aurora chance percentage from intensity, cloud cover and latitude
//! - Viewing location scoring and top-5 ranking

pub mod chance;
pub mod proximity;
pub mod viewing;

pub use chance::{aurora_chance, chance_for_entry, latitude_factor, score};
pub use proximity::nearest_sample;
pub use viewing::{
    MAX_VIEWING_LOCATIONS, fallback_elevation, format_candidate, rank_candidates, rank_locations,
    resolve_candidates, viewing_score,
};
