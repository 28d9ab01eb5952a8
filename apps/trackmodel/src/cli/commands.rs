//! # CLI Command Implementations
//!
//! File handling and the `print`, `check` and `convert` commands.

use super::OutputMode;
use std::path::{Path, PathBuf};
use trackmodel_core::{
    HasMetadata, Model, SnapshotHeader, TrackError, check, model_from_bytes, model_to_bytes,
    primitives::MAX_SNAPSHOT_SIZE, read_model, write_model,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum layout file size, either format (64 MB).
const MAX_INPUT_FILE_SIZE: u64 = MAX_SNAPSHOT_SIZE as u64;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrackError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrackError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TrackError::InvalidFormat(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, TrackError> {
    let canonical = path.canonicalize().map_err(|e| {
        TrackError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TrackError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path against its canonical parent directory.
fn validate_output_path(path: &Path) -> Result<PathBuf, TrackError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TrackError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(TrackError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TrackError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// LOADING AND SAVING
// =============================================================================

/// On-disk layout encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    Json,
    Snapshot,
}

impl LayoutFormat {
    /// Parse a `--to` argument.
    pub fn parse(name: &str) -> Result<Self, TrackError> {
        match name {
            "json" => Ok(Self::Json),
            "snapshot" => Ok(Self::Snapshot),
            _ => Err(TrackError::InvalidFormat(format!(
                "Unknown format: {}. Use: json, snapshot",
                name
            ))),
        }
    }

    /// Detect the encoding of `bytes` from the snapshot magic.
    pub fn detect(bytes: &[u8]) -> Self {
        if SnapshotHeader::is_snapshot(bytes) {
            Self::Snapshot
        } else {
            Self::Json
        }
    }
}

/// Decode a model from raw file contents.
pub fn decode_model(bytes: &[u8]) -> Result<Model, TrackError> {
    match LayoutFormat::detect(bytes) {
        LayoutFormat::Snapshot => model_from_bytes(bytes),
        LayoutFormat::Json => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                TrackError::InvalidFormat(format!("Document is not valid UTF-8: {}", e))
            })?;
            read_model(text)
        }
    }
}

/// Encode a model in the given format.
pub fn encode_model(model: &Model, format: LayoutFormat) -> Result<Vec<u8>, TrackError> {
    match format {
        LayoutFormat::Json => write_model(model).map(String::into_bytes),
        LayoutFormat::Snapshot => model_to_bytes(model),
    }
}

/// Read and decode a layout file of either format.
pub fn load_model(path: &Path) -> Result<Model, TrackError> {
    let validated_path = validate_file_path(path)?;
    validate_file_size(&validated_path, MAX_INPUT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| TrackError::IoError(format!("Read file: {}", e)))?;

    let model = decode_model(&data)?;
    tracing::debug!(
        path = %validated_path.display(),
        nodes = model.node_count(),
        sections = model.section_count(),
        "layout loaded"
    );
    Ok(model)
}

/// Encode and write a layout file. Returns the number of bytes written.
pub fn save_model(model: &Model, path: &Path, format: LayoutFormat) -> Result<usize, TrackError> {
    let validated_output = validate_output_path(path)?;
    let data = encode_model(model, format)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| TrackError::IoError(format!("Write file: {}", e)))?;
    Ok(data.len())
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// PRINT COMMAND
// =============================================================================

/// List the nodes and sections of a layout.
pub fn cmd_print(file: &Path, mode: OutputMode) -> Result<(), TrackError> {
    let model = load_model(file)?;

    if mode.json {
        let nodes: Vec<_> = model
            .nodes()
            .map(|node| {
                serde_json::json!({
                    "id": node.id(),
                    "type": node.node_type().name(),
                    "connectors": node.connectors().collect::<Vec<_>>(),
                    "metadata": node.metadata(),
                })
            })
            .collect();
        let sections: Vec<_> = model
            .sections()
            .map(|section| {
                serde_json::json!({
                    "id": section.id(),
                    "start": section.start(),
                    "end": section.end(),
                    "dir": section.directionality().name(),
                    "length": section.length(),
                    "dest": section.destination().map(|dest| serde_json::json!({
                        "address": dest.address(),
                        "name": dest.name(),
                    })),
                    "metadata": section.metadata(),
                })
            })
            .collect();
        print_json(&serde_json::json!({ "nodes": nodes, "sections": sections }));
        return Ok(());
    }

    if !mode.quiet {
        println!("Nodes ({})", model.node_count());
    }
    for node in model.nodes() {
        println!("{}", node);
        if mode.verbose {
            for (key, value) in node.metadata() {
                println!("    {} = {}", key, value);
            }
        }
    }

    if !mode.quiet {
        println!();
        println!("Sections ({})", model.section_count());
    }
    for section in model.sections() {
        let mut line = format!("{} {}", section, section.directionality());
        if let Some(length) = section.length() {
            line.push_str(&format!(" length={}", length));
        }
        if let Some(dest) = section.destination() {
            line.push_str(&format!(" dest={} \"{}\"", dest.address(), dest.name()));
        }
        println!("{}", line);
        if mode.verbose {
            for (key, value) in section.metadata() {
                println!("    {} = {}", key, value);
            }
        }
    }

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Check a layout. Returns whether it is correct.
pub fn cmd_check(file: &Path, mode: OutputMode) -> Result<bool, TrackError> {
    let model = load_model(file)?;
    let report = check(&model);
    let correct = report.is_correct();

    if mode.json {
        print_json(&serde_json::json!({
            "complete": report.is_complete(),
            "correct": correct,
            "incomplete_nodes": report.incomplete_nodes,
            "unlinked_sections": report.unlinked_sections,
            "incorrect_nodes": report.incorrect_nodes,
        }));
        return Ok(correct);
    }

    println!("Complete: {}", if report.is_complete() { "yes" } else { "no" });
    println!("Correct:  {}", if correct { "yes" } else { "no" });

    if !mode.quiet {
        let defects = [
            ("Incomplete nodes", &report.incomplete_nodes),
            ("Unlinked sections", &report.unlinked_sections),
            ("Incorrect nodes", &report.incorrect_nodes),
        ];
        for (label, ids) in defects {
            if !ids.is_empty() {
                println!();
                println!("{}:", label);
                for id in ids {
                    println!("  {}", id);
                }
            }
        }
    }

    if !correct {
        tracing::info!(file = %file.display(), "layout is not correct");
    }
    Ok(correct)
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Re-encode a layout in another format.
pub fn cmd_convert(
    input: &Path,
    output: &Path,
    to: &str,
    mode: OutputMode,
) -> Result<(), TrackError> {
    let format = LayoutFormat::parse(to)?;
    let model = load_model(input)?;
    let written = save_model(&model, output, format)?;

    if mode.json {
        print_json(&serde_json::json!({
            "output": output.to_string_lossy(),
            "format": to,
            "bytes": written,
        }));
    } else if !mode.quiet {
        println!("Wrote {} bytes to {}", written, output.display());
    }

    Ok(())
}
