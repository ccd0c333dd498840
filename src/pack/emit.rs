use crate::pack::{
    manifest::{PackOptions, stage_label},
    record::{ResourceKind, ResourceRecord},
};

/// Wrap column for base64 string literals.
pub const BASE64_LINE_WIDTH: usize = 76;
/// Values per line for numeric byte lists.
pub const BYTES_PER_LINE: usize = 16;

pub(crate) const HEADER_BANNER: &str = "/* Generated by respack. Do not edit. */";

/// Render a whole batch as C-compatible source text.
pub fn emit_header(records: &[ResourceRecord], opts: &PackOptions) -> String {
    let mut out = String::new();
    out.push_str(HEADER_BANNER);
    out.push('\n');
    out.push_str(&format!(
        "/* respack stages: {}, section ceiling: {} */\n",
        opts.stages(),
        opts.section_ceiling
    ));
    for record in records {
        out.push('\n');
        out.push_str(&emit_record(record));
    }
    out
}

/// Render one record: a describing comment, the metadata constants, the data literal(s) and,
/// for split payloads, the ordered section table.
pub fn emit_record(record: &ResourceRecord) -> String {
    let name = &record.name;
    let blob = &record.blob;
    let stages = stage_label(blob.compressed, blob.encoded);
    let mut out = String::new();

    match record.kind {
        ResourceKind::Image {
            width,
            height,
            channels,
        } => {
            out.push_str(&format!(
                "/* {name}: image {width}x{height}, {channels} channels; {stages} */\n"
            ));
            out.push_str(&constant(name, "width", width as usize));
            out.push_str(&constant(name, "height", height as usize));
            out.push_str(&constant(name, "channels", usize::from(channels)));
        }
        ResourceKind::File { content } => {
            out.push_str(&format!(
                "/* {name}: {} file; {stages} */\n",
                content.as_str()
            ));
        }
    }

    out.push_str(&constant(name, "length", blob.len()));
    if blob.is_transformed() {
        out.push_str(&constant(name, "raw_length", blob.raw_length));
    }

    let names = record.section_names();
    for (index, section) in names.iter().enumerate() {
        let bytes = record.section_bytes(index).unwrap_or_default();
        if blob.encoded {
            out.push_str(&string_literal(section, bytes));
        } else {
            out.push_str(&byte_list(section, bytes));
        }
    }

    if names.len() > 1 {
        out.push_str(&constant(name, "section_count", names.len()));
        let lengths: Vec<String> = record.sections.iter().map(|r| r.len().to_string()).collect();
        out.push_str(&format!(
            "static const unsigned int {name}_section_lengths[] = {{ {} }};\n",
            lengths.join(", ")
        ));
        out.push_str(&format!(
            "static const void *const {name}_sections[] = {{ {} }};\n",
            names.join(", ")
        ));
    }

    out
}

fn constant(name: &str, field: &str, value: usize) -> String {
    format!("static const unsigned int {name}_{field} = {value};\n")
}

// Base64 needs no escaping inside a C string.
fn string_literal(symbol: &str, bytes: &[u8]) -> String {
    let mut out = format!("static const char {symbol}[] =\n");
    let lines: Vec<&[u8]> = bytes.chunks(BASE64_LINE_WIDTH).collect();
    for (i, line) in lines.iter().enumerate() {
        out.push_str("    \"");
        out.push_str(&String::from_utf8_lossy(line));
        out.push('"');
        if i + 1 == lines.len() {
            out.push(';');
        }
        out.push('\n');
    }
    out
}

fn byte_list(symbol: &str, bytes: &[u8]) -> String {
    let mut out = format!("static const unsigned char {symbol}[] = {{\n");
    for line in bytes.chunks(BYTES_PER_LINE) {
        out.push_str("   ");
        for b in line {
            out.push_str(&format!(" 0x{b:02x},"));
        }
        out.push('\n');
    }
    out.push_str("};\n");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pack/emit.rs"]
mod tests;
