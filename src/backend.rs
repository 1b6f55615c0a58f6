//! Strategy selection.
//!
//! Whether the drawing library is available is decided at compile time by
//! the `render` feature. The check happens once, before the size loop, and
//! yields one [`IconEncoder`] that is used for every size.

use crate::{
    config::{Framing, IconConfig},
    raw_png::RawEncoder,
};
use anyhow::Result;
use std::fmt;

/// Turns an icon size into the bytes of a PNG file
pub trait IconEncoder {
    fn name(&self) -> &'static str;

    fn encode(&self, size: u32) -> Result<Vec<u8>>;
}

/// Strategy requested on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendChoice {
    /// Use the renderer when it is compiled in, otherwise the raw writer
    #[default]
    Auto,
    /// Gradient renderer (requires the `render` feature)
    Render,
    /// Codec-free raw writer
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Render,
    Raw,
}

impl Backend {
    pub const fn render_available() -> bool {
        cfg!(feature = "render")
    }

    /// Resolve a request against what this build supports
    pub fn select(choice: BackendChoice) -> Result<Self> {
        match choice {
            BackendChoice::Auto if Self::render_available() => Ok(Backend::Render),
            BackendChoice::Auto => {
                log::info!("Renderer not compiled in, falling back to the raw PNG writer");
                Ok(Backend::Raw)
            }
            BackendChoice::Render if Self::render_available() => Ok(Backend::Render),
            BackendChoice::Render => Err(MissingBackend { backend: "render" }.into()),
            BackendChoice::Raw => Ok(Backend::Raw),
        }
    }

    pub fn encoder<'a>(self, config: &'a IconConfig) -> Result<Box<dyn IconEncoder + 'a>> {
        match self {
            #[cfg(feature = "render")]
            Backend::Render => Ok(Box::new(crate::render::RenderEncoder::new(config))),
            #[cfg(not(feature = "render"))]
            Backend::Render => Err(MissingBackend { backend: "render" }.into()),
            Backend::Raw => {
                if config.framing == Framing::Legacy {
                    log::warn!(
                        "Raw PNG output uses placeholder checksums and uncompressed image data; \
                         strict PNG readers will reject it (use --strict-png for conforming files)"
                    );
                }
                Ok(Box::new(RawEncoder::new(config.framing)))
            }
        }
    }
}

/// The requested strategy is not part of this build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingBackend {
    pub backend: &'static str,
}

impl fmt::Display for MissingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The {} backend is not available in this build",
            self.backend
        )
    }
}

impl MissingBackend {
    /// What the user can do about it
    pub fn hint(&self) -> &'static str {
        "Rebuild with `--features render` or run with `--backend raw`"
    }
}

impl std::error::Error for MissingBackend {}
