pub mod gender;
pub mod nationality;
pub mod todofuken;

pub use gender::correct_gender;
pub use nationality::normalize_nationality;
pub use todofuken::{location_satisfies, normalize_work_location};
