//! Narration for the social simulation.
//!
//! Structured line templates, the built-in template tables, and the reply
//! narrator that wraps an optional external phrase renderer in a timeout and a
//! local fallback chain.

pub mod config;
pub mod render;
pub mod template;
pub mod templates;

pub use config::{ConfigError, NarratorConfig};
pub use render::{
    LineSource, PhraseRenderer, RenderError, RenderRequest, RenderedLine, ResponseNarrator,
};
pub use template::{Slot, SlotResolver, SlotValues, Template, TemplateError};
pub use templates::{default_templates, NarrationTemplates};
