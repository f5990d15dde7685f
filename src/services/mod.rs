pub mod draw_service;
pub mod event_service;
pub mod exclusion_service;
pub mod participant_service;
pub mod seed_service;

pub use draw_service::*;
pub use event_service::*;
pub use exclusion_service::*;
pub use participant_service::*;
pub use seed_service::*;
