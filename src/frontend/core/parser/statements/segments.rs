//! Segment markers: `data:`, `logic:`, `system:`, `layout:`

use crate::frontend::core::lexer::Token;
use crate::frontend::core::parser::{ParseError, ParserState};
use crate::frontend::state::Segment;
use crate::util::diagnostic::Result;

/// Switch the segment mode
pub fn parse_segment_marker<'src>(
    state: &mut ParserState<'src, '_>,
    marker: &Token<'src>,
) -> Result<()> {
    let segment = match marker.text {
        "data" => Segment::Data,
        "logic" => Segment::Logic,
        "system" | "layout" => {
            return Err(ParseError::UnimplementedSegment {
                name: marker.text.to_string(),
                span: marker.span,
            }
            .into());
        }
        other => {
            return Err(ParseError::NotASegment {
                name: other.to_string(),
                span: marker.span,
            }
            .into());
        }
    };
    tracing::debug!("Entering {:?} segment at {}", segment, marker.span);
    state.state.segment = segment;
    Ok(())
}
