//! Global constants for the RoundPen configurator

/// Maximum preview width in display pixels
pub const DEFAULT_MAX_PREVIEW_WIDTH: u32 = 1900;

/// Maximum preview height in display pixels
pub const DEFAULT_MAX_PREVIEW_HEIGHT: u32 = 780;

/// Height of the control panel drawn below the preview
pub const CONTROL_PANEL_HEIGHT: u32 = 200;

/// Default destination of the marker configuration
pub const DEFAULT_OUTPUT_FILENAME: &str = "markers.csv";

/// Reserved label of the background record
pub const BACKGROUND_LABEL: &str = "Background";

/// Separator between fields of one record
pub const FIELD_DELIMITER: char = ';';

/// Separator between committed names in the name buffer
pub const NAME_DELIMITER: char = ',';

/// Status text shown after a successful save
pub const SAVE_CONFIRMATION: &str = "Configuration saved.";
