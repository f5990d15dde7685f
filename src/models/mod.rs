pub mod common;
pub mod draw;
pub mod event;
pub mod exclusion;
pub mod participant;

pub use common::*;
pub use draw::*;
pub use event::*;
pub use exclusion::*;
pub use participant::*;
