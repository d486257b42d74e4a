//! Marker configuration file.
//!
//! One record per line, fields separated by `;`, no header:
//!
//! ```text
//! Background;<h>;<s>;<v>
//! <marker name>;<h>;<s>;<v>
//! ```
//!
//! Channels are the sampled 8-bit HSV values. The background record, when
//! present, is always first and uses the reserved label `Background`.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::{BACKGROUND_LABEL, FIELD_DELIMITER};
use crate::format::error::FormatError;
use crate::model::{BackgroundEntry, Hsv, Marker};

/// Writes the background and committed markers to a marker file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigWriter;

impl ConfigWriter {
    /// Serialize the records without touching the filesystem.
    pub fn serialize(&self, background: Option<&BackgroundEntry>, markers: &[Marker]) -> String {
        let mut out = String::new();
        if let Some(bg) = background {
            push_record(&mut out, bg.label(), bg.color.hsv);
        }
        for marker in markers {
            push_record(&mut out, &marker.name, marker.color.hsv);
        }
        out
    }

    /// Write the records to `path`, replacing any existing file.
    ///
    /// Returns the number of records written (background included).
    pub fn write(
        &self,
        path: &Path,
        background: Option<&BackgroundEntry>,
        markers: &[Marker],
    ) -> Result<usize, FormatError> {
        log::info!("Writing marker configuration to {:?}", path);

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.serialize(background, markers).as_bytes())?;
        writer.flush()?;

        let records = markers.len() + usize::from(background.is_some());
        log::info!(
            "Wrote {} records ({} markers, background: {})",
            records,
            markers.len(),
            background.is_some()
        );
        Ok(records)
    }
}

fn push_record(out: &mut String, label: &str, hsv: Hsv) {
    let [h, s, v] = hsv.channels();
    let d = FIELD_DELIMITER;
    // Writing into a String cannot fail
    let _ = writeln!(out, "{label}{d}{h}{d}{s}{d}{v}");
}

/// One named record of a marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRecord {
    /// Marker name
    pub name: String,
    /// Sampled HSV color
    pub color: Hsv,
}

/// Parsed contents of a marker file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerFile {
    /// Background color, if the file has a background record
    pub background: Option<Hsv>,
    /// Markers in file order
    pub markers: Vec<MarkerRecord>,
}

impl MarkerFile {
    /// Parse marker file text. Accepts LF and CRLF line endings.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut file = MarkerFile::default();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
            let [label, h, s, v] = fields.as_slice() else {
                return Err(FormatError::invalid_record(
                    line_no,
                    format!("expected 4 fields, found {}", fields.len()),
                ));
            };

            let color = Hsv::new(
                parse_channel(line_no, h)?,
                parse_channel(line_no, s)?,
                parse_channel(line_no, v)?,
            );

            if *label == BACKGROUND_LABEL {
                if file.background.is_some() || !file.markers.is_empty() {
                    return Err(FormatError::invalid_record(
                        line_no,
                        "background record must be the first record",
                    ));
                }
                file.background = Some(color);
            } else if label.is_empty() {
                return Err(FormatError::invalid_record(line_no, "empty marker name"));
            } else {
                file.markers.push(MarkerRecord {
                    name: (*label).to_string(),
                    color,
                });
            }
        }

        Ok(file)
    }

    /// Read and parse a marker file.
    pub fn read(path: &Path) -> Result<Self, FormatError> {
        log::debug!("Reading marker configuration from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

fn parse_channel(line: usize, field: &str) -> Result<u8, FormatError> {
    field.trim().parse::<u8>().map_err(|e| {
        FormatError::invalid_record(line, format!("channel {field:?} is not 0-255: {e}"))
    })
}
