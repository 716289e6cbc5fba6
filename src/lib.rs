//! Compression and decompression of Pokemon Gen I sprites.
//!
//! ```no_run
//! let compressed = std::fs::read("bulbasaur.pic").unwrap();
//! let sprite = pokemon_pic::Sprite::decode(&compressed).unwrap();
//!
//! println!("{}x{} pixels", sprite.width(), sprite.height());
//! ```

mod bitstream;
pub mod error;
pub mod gen1;
pub mod rom;
pub mod sprite;

pub use error::{DecodeError, LayoutError, RomError};
pub use gen1::{compress, decompress, Header, Mode};
pub use sprite::Sprite;
