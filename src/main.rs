//! resume-forge – build a resume PDF from a data file and Jinja templates.
//!
//! Usage:
//!   resume-forge [data.yaml] [--templates DIR] [--template NAME] [--builtin]
//!                [--out DIR] [--browser PATH] [--raw] [--html-only]
//!                [--check] [--json]
//!
//! Each run writes `<out>/<uuid>/resume.html` and `<out>/<uuid>/resume.pdf`,
//! with `<out>` defaulting to `./build`.

use std::{env, path::PathBuf, process};

use resume_forge::data::load_data;
use resume_forge::pipeline::{
    build_resume, check_markup, PipelineConfig, TemplateSource, DEFAULT_TEMPLATE_DIR,
};
use resume_forge::templates::INDEX_NAME;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = PipelineConfig::default();
    let mut template_dir: Option<PathBuf> = None;
    let mut template_name: Option<String> = None;
    let mut builtin = false;
    let mut check = false;
    let mut json = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--templates" | "-T" => template_dir = Some(PathBuf::from(value(&mut iter, arg, &args[0]))),
            "--template" | "-t" => template_name = Some(value(&mut iter, arg, &args[0])),
            "--out" | "-o" => config.build_root = PathBuf::from(value(&mut iter, arg, &args[0])),
            "--browser" | "-b" => config.browser = Some(PathBuf::from(value(&mut iter, arg, &args[0]))),
            "--builtin" => builtin = true,
            "--raw" => config.normalize_tags = false,
            "--html-only" => config.pdf = false,
            "--check" => check = true,
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    config.data_path = PathBuf::from(path);
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    if builtin {
        config.templates = TemplateSource::Builtin;
    } else if template_dir.is_some() || template_name.is_some() {
        config.templates = TemplateSource::Directory {
            dir: template_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_DIR)),
            entry: template_name.unwrap_or_else(|| INDEX_NAME.to_string()),
        };
    }

    if check {
        let data = match load_data(&config.data_path) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        };
        match check_markup(&data, &config.templates) {
            Ok(pairs) => {
                println!(
                    "{}: {} emphasis tag{} OK",
                    config.data_path.display(),
                    pairs,
                    if pairs == 1 { "" } else { "s" }
                );
                return;
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }

    match build_resume(&config) {
        Ok(output) => {
            if json {
                println!("{}", output.to_json());
            } else {
                println!("Rendered HTML saved to {}", output.html_path.display());
                if let Some(pdf) = &output.pdf_path {
                    println!("PDF saved to: {}", pdf.display());
                }
            }
            if let Some(report) = output.conversion.as_ref().filter(|r| !r.success) {
                let code = report
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                eprintln!("Warning: browser exited unsuccessfully ({code}); the PDF may be missing");
            }
        }
        Err(e) => {
            eprintln!("Error building resume: {e}");
            process::exit(1);
        }
    }
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("resume-forge – resume data to HTML and PDF");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} [data.yaml] [flags]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [data.yaml]        Resume data, YAML or .json (default: data.yaml)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --templates, -T    Template directory (default: template)");
    eprintln!("  --template, -t     Entry template name (default: index.html)");
    eprintln!("  --builtin          Use the bundled templates instead of a directory");
    eprintln!("  --out, -o          Build root; each run gets <out>/<uuid>/ (default: ./build)");
    eprintln!("  --browser, -b      Chrome/Chromium binary path or name on PATH");
    eprintln!("  --raw              Leave <% %> emphasis markup untouched");
    eprintln!("  --html-only        Skip the PDF conversion step");
    eprintln!("  --check            Validate emphasis markup without writing anything");
    eprintln!("  --json             Print the build summary as JSON");
    eprintln!("  --help             Print this message");
}
