//! The interactive configuration session.
//!
//! A session walks through up to three steps on a single still frame:
//!
//! 1. `SelectingRegion`: drag a rectangle to crop the frame (optional)
//! 2. `SelectingBackground`: click the background color (optional)
//! 3. `DefiningMarkers`: click a color, type a name, commit, repeat, save
//!
//! Cancelling from any step ends the session. Validation and save failures
//! never escape: they are logged and shown in the status line.

use std::path::PathBuf;

use image::RgbImage;

use crate::constants::{
    BACKGROUND_LABEL, DEFAULT_MAX_PREVIEW_HEIGHT, DEFAULT_MAX_PREVIEW_WIDTH,
    DEFAULT_OUTPUT_FILENAME, SAVE_CONFIRMATION,
};
use crate::coordinate_mapper::CoordinateMapper;
use crate::data::{FrameError, FrameSource, frame_dimensions, render_preview};
use crate::format::ConfigWriter;
use crate::message::PointerState;
use crate::model::{BackgroundEntry, Dimensions, Marker, Point, Region, RegionSelector, SampledColor};
use crate::state::error::{SessionError, ValidationError};
use crate::state::name_ledger::NameLedger;
use crate::state::sampler::ColorSampler;

/// The step the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    SelectingRegion,
    SelectingBackground,
    DefiningMarkers,
    Terminated,
}

impl SessionMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            SessionMode::SelectingRegion => "Select Region",
            SessionMode::SelectingBackground => "Select Background",
            SessionMode::DefiningMarkers => "Define Markers",
            SessionMode::Terminated => "Terminated",
        }
    }
}

/// Which optional steps a session runs and where it saves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Start with the region-of-interest step
    pub enable_region_selection: bool,
    /// Ask for a background color before the markers
    pub enable_background_step: bool,
    /// Destination of the marker file
    pub output_path: PathBuf,
    /// Largest preview the display can show
    pub max_preview: Dimensions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            enable_region_selection: true,
            enable_background_step: true,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            max_preview: Dimensions::new(DEFAULT_MAX_PREVIEW_WIDTH, DEFAULT_MAX_PREVIEW_HEIGHT),
        }
    }
}

impl SessionOptions {
    /// Set the output path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Enable or disable the region step.
    pub fn region_selection(mut self, enabled: bool) -> Self {
        self.enable_region_selection = enabled;
        self
    }

    /// Enable or disable the background step.
    pub fn background_step(mut self, enabled: bool) -> Self {
        self.enable_background_step = enabled;
        self
    }

    /// Set the largest preview size.
    pub fn max_preview(mut self, max: Dimensions) -> Self {
        self.max_preview = max;
        self
    }
}

/// Operator-facing status lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    error: Option<String>,
    saved: Option<String>,
}

impl Status {
    /// The last validation or save error, until the next successful action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The save confirmation, until the configuration changes.
    pub fn save_message(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    fn clear(&mut self) {
        self.error = None;
        self.saved = None;
    }
}

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Saving is not possible in the current mode
    NotAvailable,
    /// No marker is complete; nothing was written
    NothingToSave,
    /// The file was written with this many markers (background not counted)
    Saved { markers: usize },
    /// Writing failed; the reason is in the status line
    Failed,
}

/// One interactive configuration session over a single frame.
pub struct MarkerSession {
    options: SessionOptions,
    mode: SessionMode,
    /// Full-resolution frame colors are sampled from
    source: RgbImage,
    /// Preview the operator points at
    display: RgbImage,
    mapper: CoordinateMapper,
    selector: RegionSelector,
    crop: Option<Region>,
    sampler: ColorSampler,
    writer: ConfigWriter,
    ledger: NameLedger,
    markers: Vec<Marker>,
    open_color: Option<SampledColor>,
    background: Option<BackgroundEntry>,
    last_swatch: Option<Point>,
    status: Status,
}

impl MarkerSession {
    /// Start a session on `frame`.
    pub fn new(frame: RgbImage, options: SessionOptions) -> Self {
        let display = render_preview(&frame, None, options.max_preview);
        let mapper =
            CoordinateMapper::new(frame_dimensions(&frame), frame_dimensions(&display), None);

        let mode = if options.enable_region_selection {
            SessionMode::SelectingRegion
        } else if options.enable_background_step {
            SessionMode::SelectingBackground
        } else {
            SessionMode::DefiningMarkers
        };

        log::info!(
            "Session started on {}x{} frame (preview {}x{}), mode: {}",
            frame.width(),
            frame.height(),
            display.width(),
            display.height(),
            mode.name()
        );

        Self {
            options,
            mode,
            source: frame,
            display,
            mapper,
            selector: RegionSelector::new(),
            crop: None,
            sampler: ColorSampler,
            writer: ConfigWriter,
            ledger: NameLedger::new(),
            markers: Vec::new(),
            open_color: None,
            background: None,
            last_swatch: None,
            status: Status::default(),
        }
    }

    /// Start a session on the current frame of `source`.
    pub fn from_source(
        source: &mut dyn FrameSource,
        options: SessionOptions,
    ) -> Result<Self, FrameError> {
        let frame = source.current_frame()?;
        Ok(Self::new(frame, options))
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Feed a pointer transition at a display position.
    ///
    /// Returns true if the transition changed the session.
    pub fn on_pointer(&mut self, state: PointerState, position: Point) -> bool {
        match (self.mode, state) {
            (SessionMode::SelectingRegion, PointerState::Pressed) => {
                self.selector.on_pointer_down(position);
                true
            }
            (SessionMode::SelectingRegion, PointerState::Held) => {
                let dragging = self.selector.is_dragging();
                self.selector.on_pointer_drag(position);
                dragging
            }
            (SessionMode::SelectingRegion, PointerState::Released) => {
                let dragging = self.selector.is_dragging();
                self.selector.on_pointer_up(position);
                dragging
            }
            (
                SessionMode::SelectingBackground | SessionMode::DefiningMarkers,
                PointerState::Pressed | PointerState::Held,
            ) => self.on_color_sample(position),
            _ => false,
        }
    }

    /// Sample the color under `display_point` for the background or the open marker.
    ///
    /// Points outside the preview (for example on the control panel) are
    /// ignored. Returns true if a color was taken.
    pub fn on_color_sample(&mut self, display_point: Point) -> bool {
        if !matches!(
            self.mode,
            SessionMode::SelectingBackground | SessionMode::DefiningMarkers
        ) {
            return false;
        }
        if !frame_dimensions(&self.display).contains(display_point) {
            log::trace!("Ignoring sample outside the preview at {:?}", display_point);
            return false;
        }

        let source_point = self.mapper.to_source(display_point);
        let Some(sample) =
            self.sampler
                .sample(&self.source, &self.display, source_point, display_point)
        else {
            return false;
        };

        if self.mode == SessionMode::SelectingBackground {
            self.background = Some(BackgroundEntry::new(sample));
            log::debug!("Background sampled: {:?}", sample.hsv);
        } else {
            self.open_color = Some(sample);
            log::debug!(
                "Marker {} sampled: {:?} at source {:?}",
                self.markers.len(),
                sample.hsv,
                source_point
            );
        }
        self.last_swatch = Some(display_point);
        self.status.clear();
        true
    }

    /// Confirm the region or background step and move on.
    pub fn on_confirm(&mut self) -> bool {
        match self.mode {
            SessionMode::SelectingRegion => {
                self.finalize_region();
                self.mode = if self.options.enable_background_step {
                    SessionMode::SelectingBackground
                } else {
                    SessionMode::DefiningMarkers
                };
                self.status.clear();
                log::debug!("Mode -> {}", self.mode.name());
                true
            }
            SessionMode::SelectingBackground => {
                if self.background.is_none() {
                    self.report(ValidationError::BackgroundNotSet.into());
                    return false;
                }
                self.mode = SessionMode::DefiningMarkers;
                self.last_swatch = None;
                self.status.clear();
                log::debug!("Mode -> {}", self.mode.name());
                true
            }
            SessionMode::DefiningMarkers | SessionMode::Terminated => false,
        }
    }

    /// Commit the open marker and open the next one.
    ///
    /// Fails (non-fatally) with "color not set" before "name not set".
    pub fn on_commit_marker(&mut self) -> bool {
        if self.mode != SessionMode::DefiningMarkers {
            return false;
        }
        match self.try_commit_marker() {
            Ok(()) => {
                self.status.clear();
                true
            }
            Err(e) => {
                self.report(e.into());
                false
            }
        }
    }

    /// Delete the last character of the open name. No-op at an empty name.
    pub fn on_backspace(&mut self) -> bool {
        if self.mode != SessionMode::DefiningMarkers || !self.ledger.backspace() {
            return false;
        }
        self.status.clear();
        true
    }

    /// Type a character into the open name. Characters outside the name class are ignored.
    pub fn on_type_char(&mut self, c: char) -> bool {
        if self.mode != SessionMode::DefiningMarkers {
            return false;
        }
        match self.ledger.append_char(c) {
            Ok(()) => {
                self.status.clear();
                true
            }
            Err(e) => {
                log::trace!("Ignoring key: {}", e);
                false
            }
        }
    }

    /// Write the background and all complete markers to the output file.
    ///
    /// Complete markers are the committed ones plus the open marker if it has
    /// both a name and a color. An incomplete open marker is silently left out.
    /// When no marker is complete nothing is written.
    pub fn on_save_request(&mut self) -> SaveOutcome {
        if self.mode != SessionMode::DefiningMarkers {
            return SaveOutcome::NotAvailable;
        }

        let markers = self.committable_markers();
        if markers.is_empty() {
            log::debug!("Save requested with no complete marker, nothing written");
            return SaveOutcome::NothingToSave;
        }

        match self
            .writer
            .write(&self.options.output_path, self.background.as_ref(), &markers)
        {
            Ok(_) => {
                self.status.error = None;
                self.status.saved = Some(SAVE_CONFIRMATION.to_string());
                SaveOutcome::Saved {
                    markers: markers.len(),
                }
            }
            Err(e) => {
                self.status.saved = None;
                self.report(SessionError::Save(e));
                SaveOutcome::Failed
            }
        }
    }

    /// End the session. All unsaved state is discarded.
    pub fn cancel(&mut self) {
        if self.mode == SessionMode::Terminated {
            return;
        }
        log::info!(
            "Session cancelled in mode {} ({} committed markers discarded from memory)",
            self.mode.name(),
            self.markers.len()
        );
        self.mode = SessionMode::Terminated;
        self.selector = RegionSelector::new();
        self.ledger = NameLedger::new();
        self.markers.clear();
        self.open_color = None;
        self.background = None;
        self.last_swatch = None;
        self.status = Status::default();
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Whether the session has ended.
    pub fn is_terminated(&self) -> bool {
        self.mode == SessionMode::Terminated
    }

    /// Options the session was started with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Committed markers in commit order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Number of markers including the open one.
    pub fn marker_count(&self) -> usize {
        self.markers.len() + 1
    }

    /// Name typed so far for the open marker.
    pub fn open_name(&self) -> &str {
        self.ledger.open_name()
    }

    /// Color sampled for the open marker, if any.
    pub fn open_color(&self) -> Option<SampledColor> {
        self.open_color
    }

    /// Whether the open marker has a color.
    pub fn color_set(&self) -> bool {
        self.open_color.is_some()
    }

    /// The committed names and the open name joined the way the panel shows them.
    pub fn name_buffer(&self) -> String {
        self.ledger.display_buffer()
    }

    /// The background entry, if one was sampled.
    pub fn background(&self) -> Option<&BackgroundEntry> {
        self.background.as_ref()
    }

    /// Full-resolution frame.
    pub fn source_frame(&self) -> &RgbImage {
        &self.source
    }

    /// Preview frame.
    pub fn display_frame(&self) -> &RgbImage {
        &self.display
    }

    /// The preview-to-source mapping in effect.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// The crop applied to the source, in source pixels.
    pub fn crop(&self) -> Option<Region> {
        self.crop
    }

    /// Rectangle being dragged in the region step.
    pub fn region_preview(&self) -> Option<Region> {
        (self.mode == SessionMode::SelectingRegion)
            .then(|| self.selector.preview())
            .flatten()
    }

    /// Display position of the last sample, for drawing the swatch.
    pub fn last_swatch(&self) -> Option<Point> {
        self.last_swatch
    }

    /// Status lines.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Number of markers a save would write right now.
    pub fn committable_count(&self) -> usize {
        self.markers.len() + usize::from(self.open_marker_complete())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn try_commit_marker(&mut self) -> Result<(), ValidationError> {
        let color = self.open_color.ok_or(ValidationError::ColorNotSet)?;

        if self.ledger.open_name() == BACKGROUND_LABEL {
            return Err(ValidationError::ReservedName(BACKGROUND_LABEL.to_string()));
        }

        let name = self.ledger.commit_open_name().map_err(|e| match e {
            ValidationError::NameEmpty => ValidationError::NameNotSet,
            other => other,
        })?;

        log::info!("Committed marker {} {:?}: {:?}", self.markers.len(), name, color.hsv);
        self.markers.push(Marker::new(name, color));
        self.open_color = None;
        self.last_swatch = None;
        Ok(())
    }

    fn open_marker_complete(&self) -> bool {
        let name = self.ledger.open_name();
        self.open_color.is_some() && !name.is_empty() && name != BACKGROUND_LABEL
    }

    fn committable_markers(&self) -> Vec<Marker> {
        let mut markers = self.markers.clone();
        if let Some(color) = self.open_color.filter(|_| self.open_marker_complete()) {
            markers.push(Marker::new(self.ledger.open_name(), color));
        }
        markers
    }

    fn finalize_region(&mut self) {
        let source = frame_dimensions(&self.source);
        let display = frame_dimensions(&self.display);
        let scale = f64::from(source.height) / f64::from(display.height.max(1));

        let Some(crop) = self
            .selector
            .region()
            .and_then(|region| region.to_source(scale, source))
        else {
            log::info!("No region selected, using the whole frame");
            return;
        };

        self.display = render_preview(&self.source, Some(crop), self.options.max_preview);
        self.mapper = CoordinateMapper::new(source, frame_dimensions(&self.display), Some(crop));
        self.crop = Some(crop);
        log::info!(
            "Cropped to ({}, {}) {}x{}, preview {}x{}",
            crop.x,
            crop.y,
            crop.width,
            crop.height,
            self.display.width(),
            self.display.height()
        );
    }

    fn report(&mut self, error: SessionError) {
        log::warn!("{}", error);
        self.status.error = Some(error.to_string());
    }
}
