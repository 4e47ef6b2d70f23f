//! Bundled template assets
//!
//! Template files are compiled into the binary and copied verbatim into
//! target projects.

use std::borrow::Cow;

use rust_embed::RustEmbed;

use crate::error::{Error, Result};
use crate::types::TemplateFile;

/// Embedded template files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/templates/"]
struct BundledTemplates;

/// Raw bytes of a bundled template
pub fn contents(file: &TemplateFile) -> Result<Cow<'static, [u8]>> {
    BundledTemplates::get(file.source)
        .map(|f| f.data)
        .ok_or_else(|| Error::template_not_found(file.source))
}
