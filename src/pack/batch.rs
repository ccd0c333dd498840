use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{
    foundation::error::{RespackError, RespackResult},
    pack::{
        emit::emit_header,
        manifest::{PackInput, PackOptions},
        record::{ResourceRecord, build_record, default_name, sanitize_identifier},
    },
};

/// A record that could not be packed. The rest of the batch still runs.
#[derive(Debug)]
pub struct RecordFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: RespackError,
}

/// Outcome of [`pack_batch`].
#[derive(Debug)]
pub struct PackReport {
    /// Header text: freshly generated, or the previous output when `up_to_date`.
    pub text: String,
    pub records: Vec<ResourceRecord>,
    pub failures: Vec<RecordFailure>,
    /// `update_only` found the previous output newer than every input.
    pub up_to_date: bool,
}

impl PackReport {
    /// `false` when any record failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pack every input and render the header text.
///
/// With `update_only`, an existing `previous_output` newer than every input is returned as-is.
/// Per-record failures are logged and collected; they never abort the batch.
#[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
pub fn pack_batch(
    inputs: &[PackInput],
    opts: &PackOptions,
    previous_output: Option<&Path>,
) -> RespackResult<PackReport> {
    opts.validate()?;

    if opts.update_only
        && let Some(output) = previous_output
        && is_up_to_date(output, inputs)
    {
        let text = std::fs::read_to_string(output)
            .map_err(|e| RespackError::io(format!("read '{}'", output.display()), e))?;
        tracing::info!(output = %output.display(), "output is up to date");
        return Ok(PackReport {
            text,
            records: Vec::new(),
            failures: Vec::new(),
            up_to_date: true,
        });
    }

    let mut records = Vec::with_capacity(inputs.len());
    let mut failures = Vec::new();
    let mut taken = HashSet::new();

    for input in inputs {
        let base = match &input.name {
            Some(name) => sanitize_identifier(name),
            None => default_name(&input.path),
        };
        let name = unique_name(&base, &mut taken);

        match build_record(&name, &input.path, opts) {
            Ok(record) => {
                tracing::debug!(
                    name = %record.name,
                    raw = record.raw_length(),
                    encoded = record.blob.len(),
                    sections = record.sections.len(),
                    "packed resource"
                );
                records.push(record);
            }
            Err(error) => {
                tracing::warn!(file = %input.path.display(), %error, "failed to pack resource");
                failures.push(RecordFailure {
                    name,
                    path: input.path.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        packed = records.len(),
        failed = failures.len(),
        stages = opts.stages(),
        "batch packed"
    );

    Ok(PackReport {
        text: emit_header(&records, opts),
        records,
        failures,
        up_to_date: false,
    })
}

/// Run [`pack_batch`] and write its text to `output` unless it is already up to date.
pub fn write_batch(
    inputs: &[PackInput],
    opts: &PackOptions,
    output: &Path,
) -> RespackResult<PackReport> {
    let report = pack_batch(inputs, opts, Some(output))?;
    if report.up_to_date {
        return Ok(report);
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            RespackError::io(format!("create output dir '{}'", parent.display()), e)
        })?;
    }
    std::fs::write(output, &report.text)
        .map_err(|e| RespackError::io(format!("write '{}'", output.display()), e))?;
    tracing::info!(output = %output.display(), bytes = report.text.len(), "wrote header");
    Ok(report)
}

/// An output counts as current only when it exists and is strictly newer than every input.
fn is_up_to_date(output: &Path, inputs: &[PackInput]) -> bool {
    let Some(out_time) = modified(output) else {
        return false;
    };
    inputs
        .iter()
        .all(|input| modified(&input.path).is_some_and(|t| t < out_time))
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("{base}_{n}");
        n += 1;
    }
    name
}
