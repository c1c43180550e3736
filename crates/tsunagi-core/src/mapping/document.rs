//! Reader for the community anime-list XML format.
//!
//! ```xml
//! <anime-list>
//!   <anime anidbid="23" tvdbid="76885" defaulttvdbseason="1" episodeoffset="" tmdbid="" imdbid="">
//!     <name>Cowboy Bebop</name>
//!     <mapping-list>
//!       <mapping anidbseason="0" tvdbseason="0">;1-2;</mapping>
//!     </mapping-list>
//!     <before>;1-25;</before>
//!   </anime>
//! </anime-list>
//! ```

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::MappingError;
use crate::mapping::raw::{RawAnimeList, RawGroupMapping, RawSeriesEntry};

/// Which element's text is currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Name,
    Mapping,
    Before,
}

/// Parse an anime-list document into raw, unvalidated entries.
pub fn parse_anime_list(xml: &[u8]) -> Result<RawAnimeList, MappingError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut list = RawAnimeList::default();
    let mut buf = Vec::new();

    let mut current: Option<RawSeriesEntry> = None;
    let mut current_group: Option<RawGroupMapping> = None;
    let mut target: Option<TextTarget> = None;
    // Only direct children of <anime> carry mapping data.
    let mut nested_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"anime" => current = Some(series_entry(&e)?),
                _ if current.is_none() => {}
                b"mapping-list" if nested_depth == 0 => {}
                b"mapping" if nested_depth == 0 => {
                    current_group = Some(group_mapping(&e)?);
                    target = Some(TextTarget::Mapping);
                }
                b"name" if nested_depth == 0 => target = Some(TextTarget::Name),
                b"before" if nested_depth == 0 => target = Some(TextTarget::Before),
                _ => nested_depth += 1,
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"anime" => list.entries.push(series_entry(&e)?),
                b"mapping" if nested_depth == 0 => {
                    if let Some(entry) = current.as_mut() {
                        entry.group_mappings.push(group_mapping(&e)?);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                target = None;
                match e.name().as_ref() {
                    b"anime" => {
                        nested_depth = 0;
                        if let Some(entry) = current.take() {
                            list.entries.push(entry);
                        }
                    }
                    b"mapping" if nested_depth == 0 => {
                        if let (Some(entry), Some(group)) = (current.as_mut(), current_group.take())
                        {
                            entry.group_mappings.push(group);
                        }
                    }
                    b"mapping-list" | b"name" | b"before" if nested_depth == 0 => {}
                    _ if current.is_some() => nested_depth = nested_depth.saturating_sub(1),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                let (Some(target), Some(entry)) = (target, current.as_mut()) else {
                    buf.clear();
                    continue;
                };
                let text = e
                    .unescape()
                    .map_err(|e| MappingError::Xml(e.to_string()))?;
                match target {
                    TextTarget::Name => push_text(&mut entry.name, &text),
                    TextTarget::Before => push_text(&mut entry.special_positions, &text),
                    TextTarget::Mapping => {
                        if let Some(group) = current_group.as_mut() {
                            push_text(&mut group.episode_mappings, &text);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MappingError::Xml(format!(
                    "anime-list parse error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(list)
}

fn series_entry(e: &BytesStart<'_>) -> Result<RawSeriesEntry, MappingError> {
    let mut attrs = attributes(e)?;
    Ok(RawSeriesEntry {
        anidb_id: attrs.remove("anidbid").unwrap_or_default(),
        tvdb_id: attrs.remove("tvdbid"),
        tmdb_id: attrs.remove("tmdbid"),
        imdb_id: attrs.remove("imdbid"),
        default_tvdb_season: attrs.remove("defaulttvdbseason"),
        episode_offset: attrs.remove("episodeoffset"),
        ..Default::default()
    })
}

fn group_mapping(e: &BytesStart<'_>) -> Result<RawGroupMapping, MappingError> {
    let mut attrs = attributes(e)?;
    Ok(RawGroupMapping {
        anidb_season: attrs.remove("anidbseason").unwrap_or_default(),
        tvdb_season: attrs.remove("tvdbseason").unwrap_or_default(),
        start: attrs.remove("start"),
        end: attrs.remove("end"),
        offset: attrs.remove("offset"),
        episode_mappings: None,
    })
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, MappingError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MappingError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MappingError::Xml(e.to_string()))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn push_text(slot: &mut Option<String>, text: &str) {
    slot.get_or_insert_with(String::new).push_str(text);
}
