//! Pack directories of static assets into a single compressed blob, plus a
//! generated Rust index describing where each asset lives inside it.
//!
//! This crate lets a program embed arbitrary files without depending on a
//! runtime filesystem, while keeping `rustc` away from thousands of
//! `include_bytes!` invocations.
//!
//! ## How It Works
//!
//! 1.  **Collect:** every regular file directly inside each input directory is
//!     assigned a logical name (its path, with an optional prefix stripped and
//!     a codec suffix such as `.gz` appended).
//! 2.  **Compress:** files are compressed independently on a bounded pool of
//!     worker threads, each into its own temporary file.
//! 3.  **Assemble:** the temporary files are concatenated, in discovery order,
//!     into one blob. The blob has no header or delimiters.
//! 4.  **Emit:** a Rust source file is generated that maps every name to its
//!     `(offset, size)` inside the blob, and records the total blob size.
//!
//! ## Usage
//!
//! From the command line:
//!
//! ```text
//! $ gen-bindata --prefix assets --pkg assets -o ./assets.bin --rsfile ./src/assets.rs assets
//! ```
//!
//! Or from a `build.rs` script:
//!
//! ```no_run
//! // build.rs
//! let out_dir = std::env::var("OUT_DIR").unwrap();
//! gen_bindata::Config::new(["assets"])
//!     .prefix("assets")
//!     .output(format!("{out_dir}/bindata"))
//!     .source_output(format!("{out_dir}/bindata.rs"))
//!     .cargo_rerun(true)
//!     .build()
//!     .expect("Failed to pack assets");
//! ```
//!
//! The consumer then includes both outputs:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/bindata.rs"));
//! static BLOB: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/bindata"));
//!
//! let (offset, size) = bindata::bin_data("/logo.png.gz").unwrap();
//! let compressed = &BLOB[offset as usize..(offset + size) as usize];
//! ```

pub mod assemble;
mod build;
pub mod collect;
pub mod compress;
pub mod emit;
pub mod leader;

pub use assemble::{Bindata, PackedAsset};
pub use build::{
    Config, DEFAULT_OUTPUT, DEFAULT_PACKAGE, DEFAULT_SOURCE_OUTPUT, Error, Result,
};
pub use compress::Codec;
