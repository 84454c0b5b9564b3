// XML response tree and field mapping for vmrest payloads
use crate::error::XmlError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
        // Text is trimmed per element on close; trimming each text event would
        // eat the spaces around entity references
        let mut reader = Reader::from_str(xml);

        // Open elements, innermost last
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event().map_err(|e| XmlError::Parse {
                position: reader.error_position(),
                message: e.to_string(),
            })?;

            match event {
                Event::Start(e) => {
                    let element = start_element(&e, reader.buffer_position())?;
                    stack.push(element);
                }
                Event::Empty(e) => {
                    let element = start_element(&e, reader.buffer_position())?;
                    close_element(element, &mut stack, &mut root);
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    match stack.pop() {
                        Some(element) if element.name == name => {
                            close_element(element, &mut stack, &mut root)
                        }
                        _ => return Err(XmlError::Unbalanced(name)),
                    }
                }
                Event::Text(e) => {
                    let raw = std::str::from_utf8(&e).map_err(|err| XmlError::Parse {
                        position: reader.buffer_position(),
                        message: err.to_string(),
                    })?;
                    let text = unescape(raw).map_err(|err| XmlError::Parse {
                        position: reader.buffer_position(),
                        message: err.to_string(),
                    })?;
                    append_text(&mut stack, &text);
                }
                Event::GeneralRef(e) => {
                    // Entity references arrive separately from the surrounding text
                    let name = String::from_utf8_lossy(&e).into_owned();
                    let reference = format!("&{};", name);
                    let text = unescape(&reference).map_err(|err| XmlError::Parse {
                        position: reader.buffer_position(),
                        message: err.to_string(),
                    })?;
                    append_text(&mut stack, &text);
                }
                Event::CData(e) => {
                    append_text(&mut stack, &String::from_utf8_lossy(&e));
                }
                Event::Eof => break,
                _ => (),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Parse {
                position: reader.buffer_position(),
                message: format!("unclosed element {}", open.name),
            });
        }

        root.ok_or(XmlError::NoRootElement)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

fn start_element(e: &BytesStart<'_>, position: u64) -> Result<XmlElement, XmlError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(e.local_name().as_ref()));

    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::Parse {
            position,
            message: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_err(|err| XmlError::Parse {
            position,
            message: err.to_string(),
        })?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn close_element(
    mut element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) {
    let trimmed = element.text.trim();
    if trimmed.len() != element.text.len() {
        element.text = trimmed.to_string();
    }

    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            // Only the first top-level element counts as the document root
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}

// Best-effort: unknown names are ignored, unmatched fields stay default
pub trait FieldMap: Default {
    fn set_field(&mut self, name: &str, value: &str);

    fn from_element(element: &XmlElement) -> Self {
        let mut entity = Self::default();
        for child in &element.children {
            entity.set_field(&child.name, &child.text);
        }
        entity
    }
}

pub trait PropertyDump {
    fn properties(&self) -> Vec<(&'static str, String)>;

    fn dump_all_props(&self) -> String {
        self.properties()
            .into_iter()
            .map(|(name, value)| format!("{}: {}\n", name, value))
            .collect()
    }
}

// Numeric fields that fail to parse keep their default
pub(crate) fn parse_or_default<T: std::str::FromStr + Default>(value: &str) -> T {
    value.trim().parse().unwrap_or_default()
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

pub fn error_details_message(root: &XmlElement) -> Option<String> {
    if root.name != "ErrorDetails" {
        return None;
    }

    root.children
        .iter()
        .filter(|c| c.name == "errors")
        .find_map(|errors| {
            let message = errors.child_text("message").unwrap_or_default();
            if message.is_empty() {
                return None;
            }
            Some(match errors.child_text("code") {
                Some(code) if !code.is_empty() => format!("{} ({})", message, code),
                _ => message.to_string(),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEZONES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<TimeZones total="2">
  <TimeZone>
    <TimeZoneId>1</TimeZoneId>
    <DisplayName>(GMT-10:00) Hawaii</DisplayName>
    <Bias>600</Bias>
  </TimeZone>
  <TimeZone>
    <TimeZoneId>4</TimeZoneId>
    <DisplayName>(GMT-08:00) Pacific Time &amp; Tijuana</DisplayName>
    <Bias>480</Bias>
  </TimeZone>
</TimeZones>"#;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        id: i32,
        name: String,
    }

    impl FieldMap for Sample {
        fn set_field(&mut self, name: &str, value: &str) {
            match name {
                "Id" => self.id = parse_or_default(value),
                "Name" => self.name = value.to_string(),
                _ => (),
            }
        }
    }

    #[test]
    fn test_parse_collection() {
        let root = XmlElement::parse(TIMEZONES_XML).unwrap();

        assert_eq!(root.name, "TimeZones");
        assert_eq!(root.attribute("total"), Some("2"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].child_text("TimeZoneId"), Some("1"));
        assert_eq!(
            root.children[1].child_text("DisplayName"),
            Some("(GMT-08:00) Pacific Time & Tijuana")
        );
    }

    #[test]
    fn test_parse_empty_element_and_attributes() {
        let root = XmlElement::parse(r#"<Servers total="0"/>"#).unwrap();
        assert_eq!(root.name, "Servers");
        assert!(!root.has_children());
        assert_eq!(root.attribute("total"), Some("0"));
    }

    #[test]
    fn test_parse_rejects_malformed_documents() {
        assert!(XmlElement::parse("<A><B></A>").is_err());
        assert!(XmlElement::parse("<A><B></B>").is_err());
        assert_eq!(XmlElement::parse(""), Err(XmlError::NoRootElement));
    }

    #[test]
    fn test_field_map_is_best_effort() {
        let mut element = XmlElement::new("Sample");
        element.children.push(XmlElement::with_text("Id", "not-a-number"));
        element.children.push(XmlElement::with_text("Name", "kept"));
        element.children.push(XmlElement::with_text("Unknown", "ignored"));

        let sample = Sample::from_element(&element);
        assert_eq!(
            sample,
            Sample {
                id: 0,
                name: "kept".to_string()
            }
        );
    }

    #[test]
    fn test_error_details_message() {
        let body = r#"<ErrorDetails><errors><code>UNAUTHORIZED</code><message>Invalid credentials</message></errors></ErrorDetails>"#;
        let root = XmlElement::parse(body).unwrap();
        assert_eq!(
            error_details_message(&root).as_deref(),
            Some("Invalid credentials (UNAUTHORIZED)")
        );

        let other = XmlElement::parse("<TimeZones/>").unwrap();
        assert_eq!(error_details_message(&other), None);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" TRUE "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }
}
