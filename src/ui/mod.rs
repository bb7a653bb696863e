pub mod theme;
pub mod prompter;
pub mod progress;

pub use theme::Theme;
pub use prompter::{Prompter, InteractivePrompter, ScriptedPrompter, is_affirmative};
pub use progress::spinner;
