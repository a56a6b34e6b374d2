//! Library XML store
//!
//! Reads and writes the single XML file that backs the command-line tool:
//! catalog, local collection, folders and playlists with their custom orders.

mod reader;
mod writer;

pub use reader::{load_library, read_library};
pub use writer::{save_library, write_library};
