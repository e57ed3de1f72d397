pub mod objects;
pub mod writer;
pub mod document;
pub mod graphics;
pub mod images;

pub use document::PdfDocument;
pub use graphics::{Color, PathOp};
pub use images::{ColorSpace, ImageData, ImageId};
