use unicode_segmentation::UnicodeSegmentation;

use crate::formatter::{Formatted, FormatterContext, ParameterFormatter};
use crate::interpreter::FormatError;
use crate::types::{Text, Value, trim_spaces};

const DEFAULT_CLIP_SIZE: i64 = 64;
const MIN_CLIP_SIZE: i64 = 8;
const ELLIPSIS: &str = "...";

/// Named formatter `clip`: limits the formatted text to `clip-size`
/// grapheme clusters.
///
/// The value is first formatted through its type chain. Clipped text ends
/// in `...`, which counts towards the size. Sizes below 8 are raised to 8.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipFormatter;

impl ParameterFormatter for ClipFormatter {
    fn name(&self) -> Option<&str> {
        Some("clip")
    }

    fn format(
        &self,
        ctx: &FormatterContext<'_>,
        value: Option<&Value>,
    ) -> Result<Formatted, FormatError> {
        let text = ctx.format_value(value)?;
        let size = ctx
            .config_number("clip-size")
            .unwrap_or(DEFAULT_CLIP_SIZE)
            .max(MIN_CLIP_SIZE);
        let size = usize::try_from(size).unwrap_or(usize::MAX);

        let graphemes: Vec<&str> = text.text().graphemes(true).collect();
        if graphemes.len() <= size {
            return Ok(Formatted::Produced(text));
        }

        let kept = graphemes[..size - ELLIPSIS.len()].concat();
        let clipped = format!("{}{ELLIPSIS}", trim_spaces(&kept));
        Ok(Formatted::Produced(Text::new(
            clipped,
            text.space_before(),
            text.space_after(),
        )))
    }
}
