pub mod derangement;
pub mod name_match;
pub mod single_flight;

pub use derangement::{DEFAULT_MAX_ATTEMPTS, DrawError, DrawPair, generate_assignment};
pub use name_match::{match_participant, names_conflict, normalize_name};
pub use single_flight::DrawLocks;
