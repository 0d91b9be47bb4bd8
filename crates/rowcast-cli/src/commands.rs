use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info, info_span, warn};

use rowcast_core::{CoerceOptions, Coercer, Format, Template};
use rowcast_ingest::{
    AbortOnError, DefinitionOptions, ErrorHandler, ProcessSummary, Processor, ProcessorOptions,
    SkipInvalid, UnknownTypePolicy, load_definitions, parse_field_spec, template_from_definitions,
};

/// Inputs that resolve to a [`Template`].
#[derive(Debug, Clone, Default)]
pub struct TemplateSource {
    pub fields: Vec<String>,
    pub definitions: Option<PathBuf>,
    pub strict_definitions: bool,
}

/// Everything `convert` needs besides its streams.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub template: TemplateSource,
    pub coerce: CoerceOptions,
    pub skip_errors: bool,
    pub log_data: bool,
}

/// Build the template from a definition file and field specs.
///
/// Definitions are declared first; field specs follow, and a spec naming an
/// already declared field changes its format in place.
pub fn load_template(source: &TemplateSource) -> Result<Template> {
    let mut template = match &source.definitions {
        Some(path) => {
            let definitions = load_definitions(path)
                .with_context(|| format!("load definitions from {}", path.display()))?;
            let policy = if source.strict_definitions {
                UnknownTypePolicy::Reject
            } else {
                UnknownTypePolicy::Ignore
            };
            template_from_definitions(
                &definitions,
                &DefinitionOptions::default().with_unknown_types(policy),
            )
            .with_context(|| format!("build template from {}", path.display()))?
        }
        None => Template::new(),
    };
    for spec in &source.fields {
        let (name, format) = parse_field_spec(spec).context("parse field spec")?;
        template = template.with_field(name, format);
    }
    Ok(template)
}

/// Convert JSON Lines from `reader` to `writer`.
pub fn run_convert<R, W>(options: &ConvertOptions, reader: R, writer: W) -> Result<ProcessSummary>
where
    R: BufRead,
    W: Write,
{
    let template = load_template(&options.template)?
        .with_coercer(Arc::new(Coercer::new(options.coerce.clone())));
    if template.is_empty() {
        warn!("no fields declared, records pass through auto-typed");
    }
    let processor = Processor::new(template)
        .with_options(ProcessorOptions::default().with_log_values(options.log_data));
    let mut handler: Box<dyn ErrorHandler> = if options.skip_errors {
        Box::new(SkipInvalid)
    } else {
        Box::new(AbortOnError)
    };
    let summary = processor
        .run(reader, writer, handler.as_mut())
        .context("convert records")?;
    Ok(summary)
}

/// Convert between files, falling back to stdin and stdout.
pub fn run_convert_paths(
    options: &ConvertOptions,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<ProcessSummary> {
    let span = info_span!(
        "convert",
        input = %display_path(input, "<stdin>"),
        output = %display_path(output, "<stdout>")
    );
    let _guard = span.enter();

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open input {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let summary = run_convert(options, reader, writer)?;
    if summary.skipped > 0 {
        info!(skipped = summary.skipped, "some lines were skipped");
    }
    Ok(summary)
}

fn display_path(path: Option<&Path>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |path| path.display().to_string())
}

/// One row of `describe` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    /// 1-based position, dotted for nested fields (`2.1`).
    pub position: String,
    /// Field name, dotted for nested fields (`studio.name`).
    pub name: String,
    pub format: String,
}

/// Flatten a template into rows, nested templates included.
pub fn describe_rows(template: &Template) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    collect_rows(template, "", "", &mut rows);
    rows
}

fn collect_rows(template: &Template, position: &str, prefix: &str, rows: &mut Vec<FieldRow>) {
    for (index, (name, format)) in template.fields().enumerate() {
        let position = format!("{position}{}", index + 1);
        let name = format!("{prefix}{name}");
        rows.push(FieldRow {
            position: position.clone(),
            name: name.clone(),
            format: format.to_string(),
        });
        if let Format::Nested(nested) = format {
            collect_rows(nested, &format!("{position}."), &format!("{name}."), rows);
        }
    }
}

/// Render the template as a table.
pub fn describe_table(template: &Template) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec!["#", "Field", "Format"]);
    for row in describe_rows(template) {
        table.add_row(vec![
            Cell::new(row.position).set_alignment(CellAlignment::Right),
            Cell::new(row.name),
            Cell::new(row.format),
        ]);
    }
    table
}

/// Render an error with its causes, dropping causes their parent already quotes.
pub fn render_error(error: &anyhow::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in error.chain() {
        let text = cause.to_string();
        if parts.last().is_some_and(|last| last.ends_with(&text)) {
            continue;
        }
        parts.push(text);
    }
    parts.join(": ")
}

pub fn run_describe(source: &TemplateSource) -> Result<()> {
    let template = load_template(source)?;
    println!("{}", describe_table(&template));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_specs_override_in_place() {
        let source = TemplateSource {
            fields: vec!["a:int8".into(), "b".into(), "a:string".into()],
            ..TemplateSource::default()
        };
        let template = load_template(&source).unwrap();
        let rows = describe_rows(&template);
        assert_eq!(
            rows.iter().map(|row| (row.name.as_str(), row.format.as_str())).collect::<Vec<_>>(),
            vec![("a", "string"), ("b", "auto")]
        );
    }

    #[test]
    fn test_bad_field_spec_has_context() {
        let source = TemplateSource {
            fields: vec!["a:int7".into()],
            ..TemplateSource::default()
        };
        let err = load_template(&source).unwrap_err();
        assert!(render_error(&err).starts_with("parse field spec: "));
    }

    #[test]
    fn test_render_error_skips_quoted_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = anyhow::Error::new(rowcast_ingest::IngestError::from(io)).context("load");
        assert_eq!(render_error(&err), "load: I/O error: gone");
    }
}
