//! JSON import and export for sample groups and catalogs.
//!
//! Files are written pretty-printed with a trailing newline so they diff
//! cleanly under version control. Reads are lenient: unknown fields are
//! ignored and omitted optional fields fall back to their defaults.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::sample::{SampleExpressionGroup, SampleGroupCatalog};

/// Reads sample groups from a JSON file.
pub fn read_sample_groups_from_json_file(
    path: impl AsRef<Path>,
) -> Result<Vec<SampleExpressionGroup>, ExportError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    read_sample_groups(reader)
}

/// Reads sample groups from any JSON source, e.g. an embedded resource.
pub fn read_sample_groups(reader: impl Read) -> Result<Vec<SampleExpressionGroup>, ExportError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes sample groups to a JSON file, replacing any existing content.
pub fn write_sample_groups_to_json_file(
    groups: &[SampleExpressionGroup],
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, groups)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), groups = groups.len(), "wrote sample groups");
    Ok(())
}

/// Writes the catalog (per-group sample counts plus totals) for the given
/// groups to a JSON file.
pub fn write_group_catalog_to_json_file(
    groups: &[SampleExpressionGroup],
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let catalog = SampleGroupCatalog::from_groups(groups);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &catalog)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(
        path = %path.display(),
        samples = catalog.number_of_samples,
        "wrote sample group catalog"
    );
    Ok(())
}
