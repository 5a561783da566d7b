// Job openings: registration, lookup and the description template.

pub mod handlers;
pub mod registry;
pub mod template;
