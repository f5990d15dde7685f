pub mod draw_results;
pub mod events;
pub mod exclusion_rules;
pub mod participant_aliases;
pub mod participants;
pub mod seed_versions;

pub use draw_results as draw_result_entity;
pub use events as event_entity;
pub use exclusion_rules as exclusion_rule_entity;
pub use participant_aliases as participant_alias_entity;
pub use participants as participant_entity;
pub use seed_versions as seed_version_entity;
