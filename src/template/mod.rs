//! Template rendering for issue titles and bodies

mod render;

pub use render::TemplateRenderer;
