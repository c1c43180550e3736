//! Reader for the AniDB title dump (`anime-titles.xml`).

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::MappingError;
use crate::titles::index::TitleEntry;

/// Parse `<animetitles><anime aid><title xml:lang>…</title></anime>` into
/// one entry per title. Anime elements without a numeric `aid` are skipped.
pub fn parse_title_dump(xml: &[u8]) -> Result<Vec<TitleEntry>, MappingError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut series_id: Option<u32> = None;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"anime" => {
                    series_id = attribute(&e, b"aid")?.and_then(|aid| aid.trim().parse().ok());
                    if series_id.is_none() {
                        debug!("Skipping title group without a valid aid");
                    }
                }
                b"title" if series_id.is_some() => {
                    let language = attribute(&e, b"xml:lang")?.unwrap_or_default();
                    current = Some((language, String::new()));
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some((_, title)) = current.as_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| MappingError::Xml(e.to_string()))?;
                    title.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"title" => {
                    if let (Some(id), Some((language, title))) = (series_id, current.take()) {
                        if !title.is_empty() {
                            entries.push(TitleEntry {
                                series_id: id,
                                title,
                                language,
                            });
                        }
                    }
                }
                b"anime" => series_id = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(MappingError::Xml(format!(
                    "title dump parse error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, MappingError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MappingError::Xml(e.to_string()))?;
        if attr.key.as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| MappingError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
