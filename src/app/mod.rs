// Collaborator layer: interactive input and terminal display around the core.

pub mod display;
pub mod prompt;

pub use display::render_summary;
pub use prompt::Prompter;
