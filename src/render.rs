//! Template rendering – expands a Jinja template with the resume data.
//!
//! Rendering goes through the [`Renderer`] trait so the build pipeline can be
//! driven by a canned renderer in tests. [`TemplateRenderer`] is the real one,
//! backed by `minijinja`.

use std::fs;
use std::path::Path;

use minijinja::{context, path_loader, AutoEscape, Environment};

use crate::data::ResumeData;
use crate::error::{BuildError, Result};
use crate::templates::{base_template, index_template, BASE_NAME, INDEX_NAME};

/// Turns resume data into a text document.
pub trait Renderer {
    fn render(&self, data: &ResumeData) -> Result<String>;
}

/// Jinja renderer with a fixed entry template. The data document is exposed
/// to templates as `data`.
pub struct TemplateRenderer {
    env: Environment<'static>,
    entry: String,
}

impl TemplateRenderer {
    /// Load templates lazily from `dir`; `{% extends %}` and `{% include %}`
    /// resolve relative to it.
    pub fn from_dir(dir: &Path, entry: impl Into<String>) -> Result<Self> {
        let meta = fs::metadata(dir).map_err(|e| BuildError::io(dir, e))?;
        if !meta.is_dir() {
            return Err(BuildError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let mut env = environment();
        env.set_loader(path_loader(dir.to_path_buf()));
        Ok(Self {
            env,
            entry: entry.into(),
        })
    }

    /// Renderer over the templates compiled into the crate.
    pub fn builtin() -> Result<Self> {
        let mut env = environment();
        env.add_template(BASE_NAME, base_template())?;
        env.add_template(INDEX_NAME, index_template())?;
        Ok(Self {
            env,
            entry: INDEX_NAME.to_string(),
        })
    }

    /// Name of the template rendered by [`Renderer::render`].
    pub fn entry(&self) -> &str {
        &self.entry
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, data: &ResumeData) -> Result<String> {
        log::debug!("rendering template '{}'", self.entry);
        let template = self.env.get_template(&self.entry)?;
        Ok(template.render(context! { data => data })?)
    }
}

// Emphasis markup and raw HTML in data values must reach the output as-is,
// so nothing is escaped regardless of the template's extension.
fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(false);
    env
}
