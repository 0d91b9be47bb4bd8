//! Line-by-line conversion of JSON Lines through a template.
//!
//! Each input line is independent: it is decoded, stamped out through the
//! template and fully serialized before anything is written, so a failing
//! line never leaves partial output behind. What happens after a failure is
//! up to the [`ErrorHandler`].

use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use rowcast_core::{Input, REDACTED, Record, Template};

use crate::error::{IngestError, Result};
use crate::stream::{JsonLinesReader, JsonLinesWriter, is_blank};

/// Decision returned by an [`ErrorHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Stop and return the error.
    Abort,
    /// Drop the line and continue.
    Skip,
}

/// Per-line error hook.
pub trait ErrorHandler {
    fn handle(&mut self, error: &IngestError) -> ErrorAction;
}

/// Stops at the first invalid line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorHandler for AbortOnError {
    fn handle(&mut self, _error: &IngestError) -> ErrorAction {
        ErrorAction::Abort
    }
}

/// Skips invalid lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipInvalid;

impl ErrorHandler for SkipInvalid {
    fn handle(&mut self, _error: &IngestError) -> ErrorAction {
        ErrorAction::Skip
    }
}

impl<F> ErrorHandler for F
where
    F: FnMut(&IngestError) -> ErrorAction,
{
    fn handle(&mut self, error: &IngestError) -> ErrorAction {
        self(error)
    }
}

/// Options for [`Processor`].
#[derive(Debug, Clone, Default)]
pub struct ProcessorOptions {
    /// Include record values in log events.
    pub log_values: bool,
}

impl ProcessorOptions {
    /// Enable or disable logging of record values.
    #[must_use]
    pub fn with_log_values(mut self, enabled: bool) -> Self {
        self.log_values = enabled;
        self
    }
}

/// Counters for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Lines read, blank lines included.
    pub lines: usize,
    /// Records written.
    pub records: usize,
    /// Lines dropped by the error handler.
    pub skipped: usize,
}

/// Converts JSON Lines through a [`Template`].
#[derive(Debug, Clone)]
pub struct Processor {
    template: Template,
    options: ProcessorOptions,
}

impl Processor {
    /// Create a processor with default options.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            options: ProcessorOptions::default(),
        }
    }

    /// Replace the processor options.
    #[must_use]
    pub fn with_options(mut self, options: ProcessorOptions) -> Self {
        self.options = options;
        self
    }

    /// The template every line is converted through.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Convert one line: arrays bind by position, objects by name.
    pub fn convert_line(&self, line: usize, bytes: &[u8]) -> Result<Record> {
        Input::from_json(bytes)
            .and_then(|input| self.template.create_row(input))
            .map_err(|err| IngestError::at_line(line, err))
    }

    /// Convert and serialize one line.
    fn encode_line(&self, line: usize, bytes: &[u8]) -> Result<Vec<u8>> {
        self.convert_line(line, bytes)?
            .to_json_vec()
            .map_err(|err| IngestError::at_line(line, err))
    }

    /// Process every line of `reader`, writing one JSON object per record.
    ///
    /// Blank lines are ignored. I/O errors always abort; conversion errors
    /// go to `handler`.
    pub fn run<R, W, H>(&self, reader: R, writer: W, handler: &mut H) -> Result<ProcessSummary>
    where
        R: BufRead,
        W: Write,
        H: ErrorHandler + ?Sized,
    {
        let span = info_span!("process", fields = self.template.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut summary = ProcessSummary::default();
        let mut output = JsonLinesWriter::new(writer);
        for item in JsonLinesReader::new(reader) {
            let (line, bytes) = item?;
            summary.lines += 1;
            if is_blank(&bytes) {
                continue;
            }
            match self.encode_line(line, &bytes) {
                Ok(json) => {
                    output.write_line(&json)?;
                    summary.records += 1;
                    let shown = if self.options.log_values {
                        String::from_utf8_lossy(&json)
                    } else {
                        Cow::Borrowed(REDACTED)
                    };
                    debug!(line, record = %shown, "converted record");
                }
                Err(err) => match handler.handle(&err) {
                    ErrorAction::Skip => {
                        summary.skipped += 1;
                        warn!(line, error = %self.describe(&err), "skipping invalid line");
                    }
                    ErrorAction::Abort => {
                        output.flush()?;
                        return Err(err);
                    }
                },
            }
        }
        output.flush()?;

        info!(
            lines = summary.lines,
            records = summary.records,
            skipped = summary.skipped,
            duration_ms = start.elapsed().as_millis(),
            "processing complete"
        );
        Ok(summary)
    }

    fn describe(&self, err: &IngestError) -> String {
        if self.options.log_values {
            err.to_string()
        } else {
            err.redacted()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> Processor {
        Processor::new(Template::new().with_string("name").with_uint8("age"))
    }

    fn run_with<H: ErrorHandler>(input: &str, handler: &mut H) -> (Result<ProcessSummary>, String) {
        let mut output = Vec::new();
        let result = processor().run(input.as_bytes(), &mut output, handler);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_converts_arrays_and_objects() {
        let (summary, output) = run_with(
            "[\"Toto\", 3]\n\n{\"age\":\"4\",\"name\":\"Dorothy\"}\n",
            &mut AbortOnError,
        );
        assert_eq!(
            summary.unwrap(),
            ProcessSummary {
                lines: 3,
                records: 2,
                skipped: 0
            }
        );
        assert_eq!(
            output,
            "{\"name\":\"Toto\",\"age\":3}\n{\"name\":\"Dorothy\",\"age\":4}\n"
        );
    }

    #[test]
    fn test_abort_keeps_earlier_output() {
        let (result, output) = run_with("[\"a\", 1]\n[\"b\", 999]\n[\"c\", 2]\n", &mut AbortOnError);
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(output, "{\"name\":\"a\",\"age\":1}\n");
    }

    #[test]
    fn test_skip_continues() {
        let (summary, output) = run_with("[\"a\", 1]\nnot json\n\"text\"\n[\"c\", 2]\n", &mut SkipInvalid);
        assert_eq!(
            summary.unwrap(),
            ProcessSummary {
                lines: 4,
                records: 2,
                skipped: 2
            }
        );
        assert_eq!(output, "{\"name\":\"a\",\"age\":1}\n{\"name\":\"c\",\"age\":2}\n");
    }

    #[test]
    fn test_closure_handler_sees_every_error() {
        let mut seen = Vec::new();
        let mut handler = |err: &IngestError| {
            seen.push(err.line());
            ErrorAction::Skip
        };
        let (summary, _) = run_with("[1, 2, 3]\n{\"age\":-1}\n[\"ok\"]\n", &mut handler);
        assert_eq!(summary.unwrap().records, 1);
        assert_eq!(seen, vec![Some(1), Some(2)]);
    }
}
