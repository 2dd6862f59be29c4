// SPDX-License-Identifier: LGPL-3.0-or-later

//! Table rows and their CSV/JSON rendering.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use csv::WriterBuilder;
use fracdelay_units::design::{OrderDesign, ToneCheck};
use serde::Serialize;

/// Output format of table commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Csv,
    Json,
}

/// A table row that can be written as CSV fields.
pub trait Row: Serialize {
    fn fields(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapsRow {
    pub order: usize,
    pub channel: usize,
    pub group: usize,
    pub delay_seconds: f64,
    pub delay_samples: f64,
    pub taps: Vec<f64>,
}

impl Row for TapsRow {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.order.to_string(),
            self.channel.to_string(),
            self.group.to_string(),
            self.delay_seconds.to_string(),
            self.delay_samples.to_string(),
        ];
        fields.extend(self.taps.iter().map(f64::to_string));
        fields
    }
}

pub fn taps_rows(designs: &[OrderDesign]) -> (Vec<String>, Vec<TapsRow>) {
    let width = designs.iter().map(|d| d.order).max().unwrap_or(0);
    let mut header: Vec<String> = ["order", "channel", "group", "delay_s", "delay_samples"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend((0..width).map(|k| format!("tap{k}")));

    let rows = designs
        .iter()
        .flat_map(|d| {
            d.channels.iter().map(move |c| TapsRow {
                order: d.order,
                channel: c.channel,
                group: c.group,
                delay_seconds: c.delay_seconds,
                delay_samples: c.delay_samples,
                taps: c.taps.clone(),
            })
        })
        .collect();
    (header, rows)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub order: usize,
    pub channel: usize,
    pub frequency: f64,
    pub magnitude_db: f64,
    pub phase_deg: f64,
}

impl Row for SweepRow {
    fn fields(&self) -> Vec<String> {
        vec![
            self.order.to_string(),
            self.channel.to_string(),
            self.frequency.to_string(),
            self.magnitude_db.to_string(),
            self.phase_deg.to_string(),
        ]
    }
}

/// Sweep rows of the selected channels, or of all channels when
/// `channels` is empty.
pub fn sweep_rows(designs: &[OrderDesign], channels: &[usize]) -> (Vec<String>, Vec<SweepRow>) {
    let header = ["order", "channel", "frequency_hz", "magnitude_db", "phase_deg"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = designs
        .iter()
        .flat_map(|d| {
            d.channels
                .iter()
                .filter(move |c| channels.is_empty() || channels.contains(&c.channel))
                .flat_map(move |c| {
                    c.response.iter().map(move |(f, m, p)| SweepRow {
                        order: d.order,
                        channel: c.channel,
                        frequency: f,
                        magnitude_db: m,
                        phase_deg: p,
                    })
                })
        })
        .collect();
    (header, rows)
}

/// Per order and group: worst in-band errors of the group's channels and
/// the test-tone errors with and without correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRow {
    pub order: usize,
    pub group: usize,
    pub delay_samples: f64,
    pub max_magnitude_error_db: f64,
    pub max_phase_error_deg: f64,
    pub tone_error: f64,
    pub uncorrected_tone_error: f64,
}

impl Row for CheckRow {
    fn fields(&self) -> Vec<String> {
        vec![
            self.order.to_string(),
            self.group.to_string(),
            self.delay_samples.to_string(),
            self.max_magnitude_error_db.to_string(),
            self.max_phase_error_deg.to_string(),
            self.tone_error.to_string(),
            self.uncorrected_tone_error.to_string(),
        ]
    }
}

pub fn check_rows(design: &OrderDesign, tones: &[ToneCheck]) -> Vec<CheckRow> {
    tones
        .iter()
        .map(|tone| {
            let summary = design
                .channels
                .iter()
                .filter(|c| c.group == tone.group)
                .map(|c| c.summary)
                .reduce(|a, b| a.worst(b));
            CheckRow {
                order: design.order,
                group: tone.group,
                delay_samples: tone.delay_samples,
                max_magnitude_error_db: summary.map_or(0.0, |s| s.max_magnitude_error_db),
                max_phase_error_deg: summary.map_or(0.0, |s| s.max_phase_error_deg),
                tone_error: tone.max_error,
                uncorrected_tone_error: tone.uncorrected_error,
            }
        })
        .collect()
}

pub fn check_header() -> Vec<String> {
    [
        "order",
        "group",
        "delay_samples",
        "max_magnitude_error_db",
        "max_phase_error_deg",
        "tone_error",
        "uncorrected_tone_error",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Write `rows` to `out` in `format`. CSV rows may be shorter than the
/// header.
pub fn write_rows<W: Write, R: Row>(
    mut out: W,
    format: Format,
    header: &[String],
    rows: &[R],
) -> Result<()> {
    match format {
        Format::Csv => {
            let mut wtr = WriterBuilder::new().flexible(true).from_writer(out);
            wtr.write_record(header)?;
            for row in rows {
                wtr.write_record(row.fields())?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
