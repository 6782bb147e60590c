//! Streaming descriptor parse.

use std::fs;
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::{DescriptorError, ParseContext};

/// Element whose character data the scanner cares about.
#[derive(Clone, Copy, PartialEq)]
enum Field {
    Name,
    Val,
    Other,
}

/// Parse one descriptor file into `ctx`.
///
/// ScanR descriptors contain unmarked ISO-8859-1 text, so the raw bytes
/// are decoded as Latin-1 before the XML scan.
pub fn parse_descriptor_file(path: &Path, ctx: &mut ParseContext) -> Result<(), DescriptorError> {
    let bytes = fs::read(path)?;
    let text: String = bytes.iter().map(|&b| b as char).collect();
    parse_descriptor(&text, ctx)
}

/// Parse descriptor XML into `ctx`.
///
/// The document is a flat stream of `Name`/`Val` element pairs: a `Name`
/// element's text becomes the pending key, and every following `Val` text
/// is dispatched against that key until the next `Name` appears. Element
/// nesting, attributes and all other element names are ignored.
pub fn parse_descriptor(xml: &str, ctx: &mut ParseContext) -> Result<(), DescriptorError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut field = Field::Other;
    let mut key: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                field = match start.name().as_ref() {
                    b"Name" => Field::Name,
                    b"Val" => Field::Val,
                    _ => Field::Other,
                };
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if text.is_empty() {
                    continue;
                }
                match field {
                    Field::Name => key = Some(text.into_owned()),
                    Field::Val => match &key {
                        Some(key) => ctx.apply_value(key, &text)?,
                        None => {
                            debug!("descriptor value {text:?} with no preceding key; ignored");
                        }
                    },
                    Field::Other => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}
