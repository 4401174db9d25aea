//! Rendering of the Rust index that describes a blob.
use std::{io::Write, path::Path};

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::Ident;

use crate::{
    Bindata, Error, Result,
    build::{persist, staging_file},
};

/// First line of every generated file.
pub const MARKER: &str = "// Code generated by gen-bindata; DO NOT EDIT.";

/// Parses `package` as the name of the module wrapping the index.
///
/// # Errors
/// Returns [`Error::InvalidPackage`] if `package` is not a plain Rust
/// identifier (keywords are rejected).
pub fn module_ident(package: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(package).map_err(|_| Error::InvalidPackage(package.to_owned()))
}

/// Renders the index source for `bindata`, stored at `data_file`.
///
/// The module contains `DATA_FILE`, `BIN_DATA` (every asset as
/// `(name, offset, size)`), `BIN_DATA_SIZE` and a `bin_data(name)` lookup,
/// formatted like `rustfmt` would.
///
/// # Errors
/// Returns [`Error::Render`] if the generated tokens do not form a Rust file.
pub fn render(data_file: &Path, module: &Ident, bindata: &Bindata) -> Result<String> {
    let data_file = data_file.display().to_string();
    let file = syn::parse2::<syn::File>(index_tokens(&data_file, module, bindata)).map_err(Error::Render)?;
    let body = prettyplease::unparse(&file);
    Ok(format!("{MARKER}\n\n// datafile: {data_file}\n\n{body}"))
}

fn index_tokens(data_file: &str, module: &Ident, bindata: &Bindata) -> TokenStream {
    let names: Vec<&str> = bindata.assets.iter().map(|a| a.name.as_str()).collect();
    let offsets: Vec<Literal> = bindata.assets.iter().map(|a| Literal::u64_unsuffixed(a.offset)).collect();
    let sizes: Vec<Literal> = bindata.assets.iter().map(|a| Literal::u64_unsuffixed(a.size)).collect();
    let total_size = Literal::u64_unsuffixed(bindata.total_size);

    quote! {
        #[allow(dead_code)]
        pub mod #module {
            /// Path of the blob this index describes, as given to the packer.
            pub const DATA_FILE: &str = #data_file;

            /// `(name, offset, size)` of every packed asset.
            pub const BIN_DATA: &[(&str, u64, u64)] = &[#((#names, #offsets, #sizes)),*];

            /// Length of the blob in bytes.
            pub const BIN_DATA_SIZE: u64 = #total_size;

            /// Returns `(offset, size)` of the named asset inside the blob.
            pub fn bin_data(name: &str) -> Option<(u64, u64)> {
                match name {
                    #(#names => Some((#offsets, #sizes)),)*
                    _ => None,
                }
            }
        }
    }
}

/// Writes rendered index `source` to `path`.
///
/// # Errors
/// Returns [`Error::WriteOutput`] if the file cannot be written.
pub fn write_index(path: &Path, source: &str) -> Result<()> {
    let mut staged = staging_file(path)?;
    staged.write_all(source.as_bytes()).map_err(|e| Error::WriteOutput {
        path: path.to_path_buf(),
        source: e,
    })?;
    persist(staged, path)?;
    Ok(())
}
