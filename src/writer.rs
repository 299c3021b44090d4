//! ssh_config serialization.
//!
//! Each emitted layer becomes a block: the `Host`/`Match` header, one indented
//! `Keyword value` line per declaration, and a blank separator line.

use crate::core::LayerError;
use crate::layer::Layer;

/// Indentation of option lines inside a block.
const INDENT: &str = "    ";

/// Serialize `layers` in order into ssh_config text. Template-only layers are skipped.
///
/// The text is built in memory; on error nothing is returned, so callers never see a
/// partially written file.
pub fn write_layers<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Result<String, LayerError> {
    let mut out = String::new();
    for layer in layers {
        let Some(header) = layer.header_line()? else {
            continue;
        };
        let decls = layer.declarations()?;
        tracing::trace!("Writing '{}' with {} line(s)", header, decls.len());

        out.push_str(&header);
        out.push('\n');
        for (option, value) in decls {
            out.push_str(&format!("{INDENT}{option} {}\n", maybe_quote(&value)?));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Quote a value that spans several whitespace-separated words.
///
/// Single-word values are returned as is. A multi-word value that already contains `"`
/// is rejected, since the SSH client's escaping rules would make the result ambiguous.
pub fn maybe_quote(value: &str) -> Result<String, LayerError> {
    if value.split_whitespace().nth(1).is_none() {
        return Ok(value.to_string());
    }

    if value.contains('"') {
        return Err(LayerError::QuoteInValue {
            value: value.to_string(),
        });
    }

    Ok(format!("\"{value}\""))
}
