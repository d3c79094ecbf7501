pub mod codec;
pub mod config;
pub mod ds_n_a;
pub mod error;
mod io_utils;
pub mod model;
pub mod protocol;

pub use codec::*;
pub use config::CodecConfig;
pub use error::{CodecError, Result};
