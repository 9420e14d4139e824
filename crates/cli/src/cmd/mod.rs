mod items;
mod projects;
mod strip;

pub use items::cmd_items;
pub use projects::cmd_projects;
pub use strip::{StripArgs, cmd_strip};
