//! Image index documents.
//!
//! The index CGI answers with
//! `<list><img>KTLX_20130815235056_DB_DBZ_0.5.svg</img>...</list>`.
//! Only `img` elements directly under the root count.

use crate::{NavError, NavResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use sigmet_core::ImageIndex;

/// Join an index entry to the image root
pub fn image_url(image_root: &str, name: &str) -> String {
    format!("{}/{}", image_root.trim_end_matches('/'), name)
}

/// Parse an index document into image URLs, in document order
pub fn parse_index_xml(xml: &str, image_root: &str) -> NavResult<ImageIndex> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<String> = None;
    let mut images = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                saw_root = true;
                if depth == 2 && e.name().as_ref() == b"img" {
                    current = Some(String::new());
                }
            }
            Event::Empty(_) => saw_root = true,
            Event::Text(t) if depth == 2 => {
                if let Some(name) = current.as_mut() {
                    name.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) if depth == 2 => {
                if let Some(name) = current.as_mut() {
                    name.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(name) = current.take() {
                        let name = name.trim();
                        if !name.is_empty() {
                            images.push(image_url(image_root, name));
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(NavError::MissingRoot);
    }
    if depth != 0 {
        return Err(NavError::Truncated);
    }

    Ok(ImageIndex::new(images))
}
