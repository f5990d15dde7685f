pub mod admin;
pub mod draw;
pub mod participant;

pub use admin::admin_config;
pub use draw::draw_config;
pub use participant::participant_config;
