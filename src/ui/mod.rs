mod detail;
mod help;
mod inbox;
mod loading;
mod pane;
mod settings;
mod tabs;

pub use detail::*;
pub use help::*;
pub use inbox::*;
pub use loading::*;
pub use pane::*;
pub use settings::*;
pub use tabs::*;
