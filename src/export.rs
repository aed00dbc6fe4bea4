//! Dump file export
//!
//! Renders unknown entries into a plain text document so the operator
//! can keep a copy of what is about to be deleted. The format is a
//! markup tree mirroring the value model: a root element wrapping an
//! entry list, each entry holding the key and a recursively rendered
//! value. There is no version marker.
//!
//! Floats are written with Rust's shortest round-trip representation,
//! so parsing the rendered literal reproduces the exact bit pattern.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::cleaner::UnknownPair;
use crate::error::{CleanerError, Result};
use crate::store::ConfValue;

/// Render one value as a markup tree at the given indent
pub fn render_value(value: &ConfValue, indent: usize) -> String {
    let mut out = String::new();
    render_value_into(&mut out, value, indent);
    out
}

fn render_value_into(out: &mut String, value: &ConfValue, indent: usize) {
    let ws = " ".repeat(indent);
    out.push_str(&format!("{ws}<value>\n"));
    match value {
        ConfValue::Int(v) => {
            out.push_str(&format!("{ws}  <int>{v}</int>\n"));
        }
        ConfValue::Float(v) => {
            out.push_str(&format!("{ws}  <float>{v:?}</float>\n"));
        }
        ConfValue::String(v) => {
            let escaped = escape_markup(v);
            // An entirely blank single-space string renders empty
            let text = if escaped == " " { "" } else { escaped.as_str() };
            out.push_str(&format!("{ws}  <string>{text}</string>\n"));
        }
        ConfValue::Bool(v) => {
            out.push_str(&format!("{ws}  <bool>{v}</bool>\n"));
        }
        ConfValue::List { elem, items } => {
            render_list_into(out, elem.as_str(), items, indent + 2);
        }
        ConfValue::Pair { car, cdr } => {
            render_pair_into(out, car, cdr, indent + 2);
        }
    }
    out.push_str(&format!("{ws}</value>\n"));
}

fn render_list_into(out: &mut String, elem: &str, items: &[ConfValue], indent: usize) {
    let ws = " ".repeat(indent);
    out.push_str(&format!("{ws}<list type=\"{elem}\">\n"));
    for item in items {
        render_value_into(out, item, indent + 4);
    }
    out.push_str(&format!("{ws}</list>\n"));
}

fn render_pair_into(out: &mut String, car: &ConfValue, cdr: &ConfValue, indent: usize) {
    let ws = " ".repeat(indent);
    out.push_str(&format!("{ws}<pair>\n"));
    out.push_str(&format!("{ws}  <car>\n"));
    render_value_into(out, car, indent + 4);
    out.push_str(&format!("{ws}  </car>\n"));
    out.push_str(&format!("{ws}  <cdr>\n"));
    render_value_into(out, cdr, indent + 4);
    out.push_str(&format!("{ws}  </cdr>\n"));
    out.push_str(&format!("{ws}</pair>\n"));
}

/// Render the whole dump document
pub fn render_document(base: &str, pairs: &[UnknownPair]) -> String {
    let mut out = String::new();
    out.push_str("<entryfile>\n");
    out.push_str(&format!("  <entrylist base=\"{base}\">\n"));
    for pair in pairs {
        out.push_str("    <entry>\n");
        out.push_str(&format!("      <key>{}</key>\n", pair.key));
        render_value_into(&mut out, &pair.value, 6);
        out.push_str("    </entry>\n");
    }
    out.push_str("  </entrylist>\n");
    out.push_str("</entryfile>\n");
    out
}

/// Write the dump document to a file
pub fn write_dump(path: &Path, base: &str, pairs: &[UnknownPair]) -> Result<()> {
    let document = render_document(base, pairs);
    fs::write(path, document).map_err(|source| CleanerError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {} entries to {}", pairs.len(), path.display());
    Ok(())
}

/// Timestamped default dump file name, e.g. `20260829153012.reg`
pub fn default_dump_name() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S.reg").to_string()
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ValueKind;

    #[test]
    fn test_render_int_leaf() {
        let rendered = render_value(&ConfValue::Int(5), 0);
        assert_eq!(rendered, "<value>\n  <int>5</int>\n</value>\n");
    }

    #[test]
    fn test_render_bool_and_indent() {
        let rendered = render_value(&ConfValue::Bool(true), 4);
        assert_eq!(rendered, "    <value>\n      <bool>true</bool>\n    </value>\n");
    }

    #[test]
    fn test_render_string_escaping() {
        let rendered = render_value(&ConfValue::String("a<b&c".into()), 0);
        assert!(rendered.contains("<string>a&lt;b&amp;c</string>"));
    }

    #[test]
    fn test_render_blank_string_special_case() {
        let rendered = render_value(&ConfValue::String(" ".into()), 0);
        assert!(rendered.contains("<string></string>"));

        // Two spaces are not special
        let rendered = render_value(&ConfValue::String("  ".into()), 0);
        assert!(rendered.contains("<string>  </string>"));
    }

    #[test]
    fn test_render_int_list() {
        let list = ConfValue::list(
            ValueKind::Int,
            vec![ConfValue::Int(1), ConfValue::Int(2), ConfValue::Int(3)],
        );
        let rendered = render_value(&list, 0);
        let expected = "<value>\n\
                        \x20 <list type=\"int\">\n\
                        \x20     <value>\n\
                        \x20       <int>1</int>\n\
                        \x20     </value>\n\
                        \x20     <value>\n\
                        \x20       <int>2</int>\n\
                        \x20     </value>\n\
                        \x20     <value>\n\
                        \x20       <int>3</int>\n\
                        \x20     </value>\n\
                        \x20 </list>\n\
                        </value>\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_pair_slots() {
        let pair = ConfValue::pair(ConfValue::Int(1), ConfValue::String("a".into()));
        let rendered = render_value(&pair, 0);
        assert!(rendered.contains("  <pair>\n"));
        let car_at = rendered.find("<car>").unwrap();
        let cdr_at = rendered.find("<cdr>").unwrap();
        assert!(car_at < cdr_at);
        assert!(rendered.contains("<int>1</int>"));
        assert!(rendered.contains("<string>a</string>"));
    }

    #[test]
    fn test_float_round_trip_bits() {
        for f in [0.1_f64, 1e300, -0.0] {
            let rendered = render_value(&ConfValue::Float(f), 0);
            let start = rendered.find("<float>").unwrap() + "<float>".len();
            let end = rendered.find("</float>").unwrap();
            let parsed: f64 = rendered[start..end].parse().unwrap();
            assert_eq!(parsed.to_bits(), f.to_bits(), "round trip failed for {f}");
        }
    }

    #[test]
    fn test_render_document_shape() {
        let pairs = vec![
            UnknownPair {
                key: "/a/k2".into(),
                value: ConfValue::String("x".into()),
            },
            UnknownPair {
                key: "/a/b/k3".into(),
                value: ConfValue::Bool(true),
            },
        ];
        let doc = render_document("/", &pairs);

        assert!(doc.starts_with("<entryfile>\n  <entrylist base=\"/\">\n"));
        assert!(doc.ends_with("  </entrylist>\n</entryfile>\n"));
        assert!(doc.contains("      <key>/a/k2</key>\n"));
        assert!(doc.contains("      <value>\n        <string>x</string>\n      </value>\n"));
        let first = doc.find("/a/k2").unwrap();
        let second = doc.find("/a/b/k3").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_default_dump_name() {
        let name = default_dump_name();
        assert!(name.ends_with(".reg"));
        assert_eq!(name.len(), "20070101000000.reg".len());
    }
}
