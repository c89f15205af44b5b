//! Pipeline – ties together data loading, template rendering, tag
//! normalization, output, and PDF conversion into a single build run.

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::convert::{ChromeConverter, ConversionReport, Converter};
use crate::data::{load_data, ResumeData};
use crate::error::{BuildError, Result};
use crate::output::BuildDir;
use crate::render::{Renderer, TemplateRenderer};
use crate::tags::{count_tags, normalize_tags};
use crate::templates::INDEX_NAME;

/// Template directory used when none is configured.
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

/// Where templates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A directory on disk plus the entry template name inside it.
    Directory { dir: PathBuf, entry: String },
    /// The templates compiled into the crate.
    Builtin,
}

impl Default for TemplateSource {
    fn default() -> Self {
        TemplateSource::Directory {
            dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            entry: INDEX_NAME.to_string(),
        }
    }
}

/// Configuration for a build run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Resume data file (default: `data.yaml`).
    pub data_path: PathBuf,
    /// Template location (default: `template/index.html`).
    pub templates: TemplateSource,
    /// Parent of the per-run build directories (default: `<cwd>/build`).
    pub build_root: PathBuf,
    /// Rewrite `<%…%>` emphasis markup (default: on).
    pub normalize_tags: bool,
    /// Run the browser after writing HTML (default: on).
    pub pdf: bool,
    /// Browser path or name; `None` searches the usual locations.
    pub browser: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            data_path: PathBuf::from("data.yaml"),
            templates: TemplateSource::default(),
            build_root: cwd.join("build"),
            normalize_tags: true,
            pdf: true,
            browser: None,
        }
    }
}

/// Everything a finished build run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub id: Uuid,
    pub directory: PathBuf,
    pub html_path: PathBuf,
    /// Set when the conversion stage ran.
    pub pdf_path: Option<PathBuf>,
    pub conversion: Option<ConversionReport>,
}

impl BuildOutput {
    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One renderer, one converter, one config.
///
/// Stages run strictly in order; the build directory is only created once
/// the document has rendered and normalized cleanly.
pub struct Pipeline<R, C> {
    renderer: R,
    converter: C,
    config: PipelineConfig,
}

impl<R: Renderer, C: Converter> Pipeline<R, C> {
    pub fn new(renderer: R, converter: C, config: PipelineConfig) -> Self {
        Self {
            renderer,
            converter,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Render the document and, if enabled, normalize its emphasis markup.
    pub fn render_html(&self, data: &ResumeData) -> Result<String> {
        let rendered = self.renderer.render(data)?;
        if !self.config.normalize_tags {
            return Ok(rendered);
        }
        Ok(normalize_tags(&rendered)?)
    }

    /// Run the whole build for `data`.
    pub fn run(&self, data: &ResumeData) -> Result<BuildOutput> {
        let html = self.render_html(data)?;

        let dir = BuildDir::create(&self.config.build_root)?;
        let html_path = dir.write_html(&html)?;

        let (pdf_path, conversion) = if self.config.pdf {
            let pdf = dir.pdf_path();
            let report = self.converter.convert(&html_path, &pdf)?;
            (Some(pdf), Some(report))
        } else {
            (None, None)
        };

        Ok(BuildOutput {
            id: dir.id(),
            directory: dir.path().to_path_buf(),
            html_path,
            pdf_path,
            conversion,
        })
    }
}

/// Build the renderer described by `source`.
pub fn renderer_for(source: &TemplateSource) -> Result<TemplateRenderer> {
    match source {
        TemplateSource::Directory { dir, entry } => TemplateRenderer::from_dir(dir, entry.clone()),
        TemplateSource::Builtin => TemplateRenderer::builtin(),
    }
}

/// Load data, render, normalize, write, and convert, using the real
/// template renderer and browser.
pub fn build_resume(config: &PipelineConfig) -> Result<BuildOutput> {
    let data = load_data(&config.data_path)?;
    let renderer = renderer_for(&config.templates)?;

    // Only look for a browser when one will actually run.
    let converter = if config.pdf {
        ChromeConverter::locate(config.browser.as_deref())?
    } else {
        ChromeConverter::new(config.browser.clone().unwrap_or_default())
    };

    Pipeline::new(renderer, converter, config.clone()).run(&data)
}

/// Render `data` and validate its emphasis markup without writing anything.
/// Returns the number of tag pairs found.
pub fn check_markup(data: &ResumeData, source: &TemplateSource) -> Result<usize> {
    let html = renderer_for(source)?.render(data)?;
    count_tags(&html).map_err(BuildError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_yaml;
    use crate::tags::TagError;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    struct Fixed(&'static str);

    impl Renderer for Fixed {
        fn render(&self, _data: &ResumeData) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl Converter for Recorder {
        fn convert(&self, html: &Path, pdf: &Path) -> Result<ConversionReport> {
            self.calls
                .borrow_mut()
                .push((html.to_path_buf(), pdf.to_path_buf()));
            Ok(ConversionReport {
                success: true,
                exit_code: Some(0),
                stderr: String::new(),
            })
        }
    }

    fn config_in(root: &Path) -> PipelineConfig {
        PipelineConfig {
            build_root: root.to_path_buf(),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn pipeline_basic() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            Fixed("<p><%Rust%></p>"),
            Recorder::default(),
            config_in(tmp.path()),
        );
        let out = pipeline.run(&parse_yaml("").unwrap()).unwrap();

        assert_eq!(
            fs::read_to_string(&out.html_path).unwrap(),
            "<p><b>Rust</b></p>"
        );
        assert_eq!(out.directory, tmp.path().join(out.id.to_string()));
        assert_eq!(out.pdf_path, Some(out.directory.join("resume.pdf")));
        let calls = pipeline.converter.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, out.html_path);
    }

    #[test]
    fn tag_error_aborts_before_output() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Fixed("a%>b"), Recorder::default(), config_in(tmp.path()));
        let err = pipeline.run(&parse_yaml("").unwrap()).unwrap_err();

        assert!(matches!(
            err,
            BuildError::Tags(TagError::UnmatchedClose { position: 1 })
        ));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
        assert!(pipeline.converter.calls.borrow().is_empty());
    }

    #[test]
    fn normalization_can_be_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            normalize_tags: false,
            ..config_in(tmp.path())
        };
        let pipeline = Pipeline::new(Fixed("<%a%> and %>"), Recorder::default(), config);
        assert_eq!(
            pipeline.render_html(&parse_yaml("").unwrap()).unwrap(),
            "<%a%> and %>"
        );
    }

    #[test]
    fn pdf_stage_can_be_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            pdf: false,
            ..config_in(tmp.path())
        };
        let pipeline = Pipeline::new(Fixed("x"), Recorder::default(), config);
        let out = pipeline.run(&parse_yaml("").unwrap()).unwrap();
        assert!(out.pdf_path.is_none());
        assert!(out.conversion.is_none());
        assert!(pipeline.converter.calls.borrow().is_empty());
    }

    #[test]
    fn check_markup_counts_pairs() {
        let data = parse_yaml(crate::templates::sample_data()).unwrap();
        let pairs = check_markup(&data, &TemplateSource::Builtin).unwrap();
        // summary + two highlights + two roles + one degree
        assert_eq!(pairs, 6);
    }

    #[test]
    fn output_serialises_to_json() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(Fixed("x"), Recorder::default(), config_in(tmp.path()));
        let out = pipeline.run(&parse_yaml("").unwrap()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out.to_json()).unwrap();
        assert_eq!(json["id"], out.id.to_string());
        assert_eq!(json["conversion"]["success"], true);
    }
}
