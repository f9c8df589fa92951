//! Deflicker Image I/O
//!
//! Everything that touches the filesystem on behalf of the deflicker:
//! - **Discovery:** Sorted, non-recursive listing of input images
//! - **Codec:** Decoding files into [`Frame`]s and encoding them back
//!
//! [`Frame`]: deflicker_frame_model::Frame

pub mod codec;
pub mod discovery;

pub use codec::{decode_frame, encode_frame, output_path_for};
pub use discovery::find_images;
