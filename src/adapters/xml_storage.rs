use crate::adapters::sanitize_key;
use crate::domain::ports::RecordStorage;
use crate::domain::record::{ExportMap, ExportRecord, ExportValue};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const ROOT_TAG: &str = "student_data";
const ITEM_TAG: &str = "item";
const INDENT: &str = "  ";

/// XML document rooted at `<student_data>`, two-space indent.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlStorage;

impl RecordStorage for XmlStorage {
    fn format_name(&self) -> &'static str {
        "XML"
    }

    fn extension(&self) -> &'static str {
        "xml"
    }

    fn render(&self, record: &ExportRecord) -> std::io::Result<Vec<u8>> {
        let mut out = String::with_capacity(1024);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        write_mapping(&mut out, ROOT_TAG, record, 0);
        Ok(out.into_bytes())
    }
}

fn write_value(out: &mut String, tag: &str, value: &ExportValue, depth: usize) {
    match value {
        ExportValue::Mapping(map) => write_mapping(out, tag, map, depth),
        ExportValue::Sequence(items) => {
            if items.is_empty() {
                write_empty(out, tag, depth);
                return;
            }
            open_tag(out, tag, depth);
            for item in items {
                write_value(out, ITEM_TAG, item, depth + 1);
            }
            close_tag(out, tag, depth);
        }
        scalar => {
            let text = scalar.scalar_text().unwrap_or_default();
            out.push_str(&INDENT.repeat(depth));
            out.push_str(&format!("<{}>{}</{}>\n", tag, escape_text(&text), tag));
        }
    }
}

fn write_mapping(out: &mut String, tag: &str, map: &ExportMap, depth: usize) {
    if map.is_empty() {
        write_empty(out, tag, depth);
        return;
    }
    open_tag(out, tag, depth);
    for (key, value) in map.iter() {
        write_value(out, &sanitize_key(key), value, depth + 1);
    }
    close_tag(out, tag, depth);
}

fn open_tag(out: &mut String, tag: &str, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&format!("<{}>\n", tag));
}

fn close_tag(out: &mut String, tag: &str, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&format!("</{}>\n", tag));
}

fn write_empty(out: &mut String, tag: &str, depth: usize) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&format!("<{} />\n", tag));
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
