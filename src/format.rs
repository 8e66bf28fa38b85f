use std::collections::HashMap;
use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tera::{Context, Tera, Value};

use crate::utils::strip_ansi;

const INLINE_TEMPLATE_NAME: &str = "formatComment";

lazy_static! {
    // `{{.}}`, `{{- . -}}` and `{{ . | filter }}` all refer to the comment itself
    static ref BARE_DOT: Regex =
        Regex::new(r"\{\{(-?)\s*\.\s*(-?\}\}|\|)").expect("valid pattern");
}

/// Where the comment template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    File(PathBuf),
}

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("Failed to read template file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to render comment template '{name}': {}", describe(.source))]
    Template { name: String, source: tera::Error },
}

/// Formats the raw comment text into the body that gets posted.
///
/// Without a template the text passes through untouched. With one, the text is
/// rendered as the template's only value (`{{ comment }}`, or `{{.}}`) and any
/// ANSI escape codes in the result are stripped.
#[derive(Debug, Clone, Default)]
pub struct CommentFormatter {
    template: Option<TemplateSource>,
}

impl CommentFormatter {
    pub fn new(template: Option<TemplateSource>) -> Self {
        Self { template }
    }

    pub fn format(&self, comment: &str) -> Result<String, FormatError> {
        let Some(template) = &self.template else {
            return Ok(comment.to_string());
        };

        let (name, source) = match template {
            TemplateSource::Inline(source) => (INLINE_TEMPLATE_NAME.to_string(), source.clone()),
            TemplateSource::File(path) => (template_name(path), read_template(path)?),
        };
        log::debug!("Rendering comment with template '{}'", name);

        let rendered = render(&name, &source, comment)
            .map_err(|source| FormatError::Template { name, source })?;

        Ok(strip_ansi(&rendered))
    }
}

fn template_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn read_template(path: &Path) -> Result<String, FormatError> {
    fs::read_to_string(path).map_err(|source| FormatError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn render(name: &str, source: &str, comment: &str) -> tera::Result<String> {
    let source = BARE_DOT.replace_all(source, "{{${1} comment ${2}");

    let mut tera = engine();
    tera.add_raw_template(name, &source)?;

    let mut context = Context::new();
    context.insert("comment", comment);

    tera.render(name, &context)
}

fn engine() -> Tera {
    let mut tera = Tera::default();
    // comments are markdown, not html
    tera.autoescape_on(vec![]);

    tera.register_filter("trunc", trunc);
    tera.register_filter("quote", quote);
    tera.register_filter("squote", squote);
    tera.register_filter("nindent", nindent);
    tera.register_filter("replace_regex", replace_regex);
    tera.register_function("env", env);

    tera
}

fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn string_arg(value: &Value, filter: &str) -> tera::Result<String> {
    tera::from_value::<String>(value.clone())
        .map_err(|_| tera::Error::msg(format!("Filter `{filter}` was used on a non-string value")))
}

fn usize_arg(args: &HashMap<String, Value>, filter: &str, key: &str) -> tera::Result<usize> {
    match args.get(key) {
        Some(value) => tera::from_value::<usize>(value.clone()).map_err(|_| {
            tera::Error::msg(format!(
                "Filter `{filter}` expects `{key}` to be a non-negative integer"
            ))
        }),
        None => Err(tera::Error::msg(format!(
            "Filter `{filter}` expected an arg called `{key}`"
        ))),
    }
}

/// Value of an environment variable, empty when unset
fn env(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("Function `env` expected an arg called `name`"))?;
    Ok(Value::String(std::env::var(name).unwrap_or_default()))
}

/// Keep only the first `length` characters
fn trunc(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = string_arg(value, "trunc")?;
    let length = usize_arg(args, "trunc", "length")?;
    Ok(Value::String(text.chars().take(length).collect()))
}

fn quote(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = string_arg(value, "quote")?;
    Ok(Value::String(format!("\"{text}\"")))
}

fn squote(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = string_arg(value, "squote")?;
    Ok(Value::String(format!("'{text}'")))
}

/// Newline, then every line indented by `width` spaces
fn nindent(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = string_arg(value, "nindent")?;
    let pad = " ".repeat(usize_arg(args, "nindent", "width")?);
    Ok(Value::String(format!(
        "\n{pad}{}",
        text.replace('\n', &format!("\n{pad}"))
    )))
}

fn replace_regex(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = string_arg(value, "replace_regex")?;
    let pattern = args
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("Filter `replace_regex` expected an arg called `pattern`"))?;
    let with = args.get("with").and_then(Value::as_str).unwrap_or_default();

    let regex = Regex::new(pattern)
        .map_err(|e| tera::Error::msg(format!("Invalid pattern `{pattern}`: {e}")))?;
    Ok(Value::String(regex.replace_all(&text, with).into_owned()))
}
