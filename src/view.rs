//! Presentation of the session to the operator.
//!
//! The session never draws. Each step the main loop captures a `SessionView`
//! snapshot and hands it to a `RenderSink`, which decides how to show it.

use image::Rgb;

use crate::color_utils::hsv_display_units;
use crate::constants::CONTROL_PANEL_HEIGHT;
use crate::data::frame_dimensions;
use crate::keybindings::KeyBindings;
use crate::model::{Dimensions, Hsv, Point, Region};
use crate::state::{MarkerSession, SessionMode};

/// A marker color swatch in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// Marker index (the open marker has the highest index)
    pub index: usize,
    /// Color as it appears in the preview
    pub color: Rgb<u8>,
}

/// Everything the operator sees for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub mode: SessionMode,
    /// What to do next
    pub instruction: String,
    /// Key help for the current mode
    pub controls: String,
    /// Background color as shown in the preview
    pub background: Option<Rgb<u8>>,
    /// Color being edited (background or open marker) as stored
    pub current_color: Option<Hsv>,
    /// Committed names and the open name
    pub names: String,
    /// One swatch per marker that has a color
    pub swatches: Vec<Swatch>,
    /// Where the last sample was taken, in display pixels
    pub last_swatch: Option<Point>,
    /// Rectangle being dragged in the region step
    pub region: Option<Region>,
    pub error: Option<String>,
    pub saved: Option<String>,
    /// Preview size; the control panel sits below it
    pub preview: Dimensions,
}

impl SessionView {
    /// Snapshot a session.
    pub fn capture(session: &MarkerSession, bindings: &KeyBindings) -> Self {
        let mode = session.mode();

        let current_color = match mode {
            SessionMode::SelectingBackground => session.background().map(|bg| bg.color.hsv),
            SessionMode::DefiningMarkers => session.open_color().map(|c| c.hsv),
            SessionMode::SelectingRegion | SessionMode::Terminated => None,
        };

        let mut swatches: Vec<Swatch> = session
            .markers()
            .iter()
            .enumerate()
            .map(|(index, marker)| Swatch {
                index,
                color: marker.color.display,
            })
            .collect();
        if let Some(open) = session.open_color() {
            swatches.push(Swatch {
                index: session.markers().len(),
                color: open.display,
            });
        }

        Self {
            mode,
            instruction: instruction(mode).to_string(),
            controls: bindings.controls_line(mode),
            background: session.background().map(|bg| bg.color.display),
            current_color,
            names: session.name_buffer(),
            swatches,
            last_swatch: session.last_swatch(),
            region: session.region_preview(),
            error: session.status().error().map(str::to_string),
            saved: session.status().save_message().map(str::to_string),
            preview: frame_dimensions(session.display_frame()),
        }
    }

    /// Full display area: preview plus control panel.
    pub fn window_size(&self) -> Dimensions {
        Dimensions::new(self.preview.width, self.preview.height + CONTROL_PANEL_HEIGHT)
    }

    /// The panel text, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.instruction.clone(), self.controls.clone()];

        match self.mode {
            SessionMode::SelectingRegion => {
                if let Some(r) = self.region {
                    lines.push(format!("Region: ({}, {}) {}x{}", r.x, r.y, r.width, r.height));
                }
            }
            SessionMode::SelectingBackground => {
                lines.push(color_line(self.current_color));
            }
            SessionMode::DefiningMarkers => {
                lines.push(format!("Markers: {}", self.names));
                lines.push(color_line(self.current_color));
            }
            SessionMode::Terminated => {}
        }

        lines.extend(self.error.iter().cloned());
        lines.extend(self.saved.iter().cloned());
        lines
    }
}

fn instruction(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::SelectingRegion => "Drag a rectangle around the region to configure.",
        SessionMode::SelectingBackground => {
            "Click on a pixel in the window to define the background."
        }
        SessionMode::DefiningMarkers => "Click on a pixel in the window to define a new marker.",
        SessionMode::Terminated => "Session ended.",
    }
}

fn color_line(color: Option<Hsv>) -> String {
    match color.map(hsv_display_units) {
        Some((h, s, v)) => format!("Current color (HSV 360/100/100): {h} {s} {v}"),
        None => "Current color (HSV 360/100/100): -".to_string(),
    }
}

/// Presents session snapshots to the operator.
pub trait RenderSink {
    /// Show the snapshot.
    fn present(&mut self, view: &SessionView);
}

/// Render sink that writes panel lines to the log when they change.
#[derive(Debug, Default)]
pub struct LogSink {
    last: Vec<String>,
}

impl LogSink {
    /// Create a new log sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, view: &SessionView) {
        let lines = view.lines();
        if lines == self.last {
            return;
        }

        for line in lines.iter().filter(|line| !self.last.contains(line)) {
            log::info!("{}", line);
        }
        self.last = lines;
    }
}
