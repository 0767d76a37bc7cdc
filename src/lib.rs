//! # dexview
//!
//! A bounds-checked, read-only decoder for Android dex files.
//!
//! ```no_run
//! use dexview::dex::DexFile;
//!
//! let dex = DexFile::from_vec(std::fs::read("classes.dex").unwrap()).unwrap();
//! let sig = dex.method_signature(0).unwrap();
//! println!("{}->{}{}", sig.declaring_type, sig.name, sig.descriptor());
//! ```

pub mod dex;
pub mod types;

#[cfg(test)]
mod tests;
