//! The `;a-b;c-d;` pair grammar used by episode mappings and special
//! episode positions.

use tracing::debug;

/// Parse every well-formed `a-b` segment, in document order.
///
/// Segments are independent: one with the wrong token count or a
/// non-numeric side is dropped without affecting its siblings.
pub(crate) fn parse_pairs(raw: Option<&str>) -> Vec<(u32, u32)> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let pair = parse_segment(segment);
            if pair.is_none() {
                debug!(segment, "Skipping malformed episode pair");
            }
            pair
        })
        .collect()
}

fn parse_segment(segment: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = segment.split('-').collect();
    if parts.len() != 2 {
        return None;
    }
    let left = parts[0].trim().parse().ok()?;
    let right = parts[1].trim().parse().ok()?;
    Some((left, right))
}
