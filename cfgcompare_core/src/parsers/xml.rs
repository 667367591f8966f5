use super::FormatParser;
use cfgcompare_common::{CfgCompareError, ConfigFormat, ConfigNode};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Prefix for attribute keys, keeps `<a id="1"><id>2</id></a>` unambiguous
pub const ATTRIBUTE_PREFIX: &str = "@_";
/// Key holding an element's text when it also has children or attributes
pub const TEXT_KEY: &str = "#text";

/// XML element tree via `quick-xml`.
///
/// The document becomes a mapping keyed by the root element name. Leaf
/// elements become strings, repeated siblings become sequences, and
/// attributes are projected as `@_name` keys next to child elements.
pub struct XmlParser;

impl FormatParser for XmlParser {
    fn format(&self) -> ConfigFormat {
        ConfigFormat::Xml
    }

    fn parse(&self, content: &str) -> Result<ConfigNode, CfgCompareError> {
        parse_xml(content)
    }
}

#[derive(Default)]
struct Element {
    name: String,
    children: IndexMap<String, ConfigNode>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, CfgCompareError> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.name().as_ref()).to_string(),
            ..Default::default()
        };

        for attr in start.attributes() {
            let attr = attr.map_err(|e| CfgCompareError::parse(ConfigFormat::Xml, e))?;
            let key = format!(
                "{}{}",
                ATTRIBUTE_PREFIX,
                String::from_utf8_lossy(attr.key.as_ref())
            );
            let value = attr
                .unescape_value()
                .map_err(|e| CfgCompareError::parse(ConfigFormat::Xml, e))?;
            element.children.insert(key, ConfigNode::string(value));
        }

        Ok(element)
    }

    fn close(self) -> (String, ConfigNode) {
        let text = self.text.trim();
        let node = if self.children.is_empty() {
            ConfigNode::string(text)
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert(TEXT_KEY.to_string(), ConfigNode::string(text));
            }
            ConfigNode::Mapping(children)
        };
        (self.name, node)
    }
}

/// Insert a child element, turning repeated names into a sequence.
fn insert_child(parent: &mut IndexMap<String, ConfigNode>, name: String, node: ConfigNode) {
    match parent.get_mut(&name) {
        Some(ConfigNode::Sequence(items)) => items.push(node),
        Some(existing) => {
            let first = std::mem::replace(existing, ConfigNode::Sequence(Vec::new()));
            *existing = ConfigNode::Sequence(vec![first, node]);
        }
        None => {
            parent.insert(name, node);
        }
    }
}

pub fn parse_xml(content: &str) -> Result<ConfigNode, CfgCompareError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut document: IndexMap<String, ConfigNode> = IndexMap::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(Element::open(e)?),
            Ok(Event::Empty(ref e)) => {
                let (name, node) = Element::open(e)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, node),
                    None => insert_child(&mut document, name, node),
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    CfgCompareError::parse(ConfigFormat::Xml, "unexpected closing tag")
                })?;
                let (name, node) = element.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.children, name, node),
                    None => insert_child(&mut document, name, node),
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| CfgCompareError::parse(ConfigFormat::Xml, err))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CfgCompareError::parse(
                    ConfigFormat::Xml,
                    format!("{} at position {}", e, reader.buffer_position()),
                ));
            }
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CfgCompareError::parse(
            ConfigFormat::Xml,
            format!("unclosed element <{}>", open.name),
        ));
    }

    Ok(ConfigNode::Mapping(document))
}
