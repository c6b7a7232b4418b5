//! Panel domain: template model, atomic store, per-client display registry,
//! built-in presets.

mod presets;
mod registry;
mod store;
mod template;

pub use presets::{Preset, find_preset, presets};
pub use registry::{DisplayLine, DisplayRegistry, DisplayState, MAX_LINE_LEN};
pub use store::TemplateStore;
pub use template::PanelTemplate;
