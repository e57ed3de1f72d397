pub mod assemble;
pub mod barcode;
pub mod config;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod logo;
pub mod outline;
pub mod raster;
pub mod record;
pub mod render;
pub mod sheet;
pub mod spec;
pub mod surface;
pub mod tiler;

pub use assemble::{Artifact, Assembler, SkippedRecord};
pub use barcode::{BarcodeError, BarcodeOptions, Code128};
pub use config::{CutGuides, EncodingPolicy, LabelStyle, Preset, StickerConfig};
pub use error::{AssetLoadError, ConfigurationError, FontLoadError, Result, StickerError};
pub use fonts::{BitmapFont, LabelFont, TrueTypeFont};
pub use layout::{centered_x, Frame, LabelLayout};
pub use logo::Logo;
pub use raster::{RasterCanvas, RenderedLabel};
pub use record::{normalize_column, read_records, read_records_file, LabelRecord};
pub use render::LabelRenderer;
pub use spec::{LabelSpec, PageSpec};
pub use surface::LabelSurface;
pub use tiler::{positions, Grid, GridPosition, Positions};
