use crate::{
    foundation::error::{RespackError, RespackResult},
    pack::{
        emit::HEADER_BANNER,
        record::{FileContent, ResourceKind},
    },
    registry::EmbeddedResource,
};

/// Read text produced by [`emit_header`](crate::pack::emit_header) back into resources.
///
/// Sections are reassembled in the order given by the `<name>_sections` table when one is
/// present, and the result is checked against the `<name>_length` constant.
pub fn parse_header(text: &str) -> RespackResult<Vec<EmbeddedResource>> {
    let mut out = Vec::new();
    let mut draft: Option<Draft> = None;
    let mut literal: Option<Literal> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if let Some(lit) = literal.as_mut() {
            if lit.feed(line, line_no)? {
                let done = literal.take().map(Literal::finish);
                let d = current(&mut draft, line_no)?;
                d.sections.extend(done);
            }
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix("/*") {
            if line == HEADER_BANNER || comment.trim_start().starts_with("respack stages:") {
                continue;
            }
            if let Some(prev) = draft.take() {
                out.push(prev.finish()?);
            }
            draft = Some(Draft::from_comment(comment, line_no)?);
            continue;
        }

        if let Some(rest) = line.strip_prefix("static const unsigned int ") {
            current(&mut draft, line_no)?.constant(rest, line_no)?;
        } else if let Some(rest) = line.strip_prefix("static const char ") {
            literal = Some(Literal::text(symbol_of(rest, "[] =", line_no)?));
        } else if let Some(rest) = line.strip_prefix("static const unsigned char ") {
            literal = Some(Literal::bytes(symbol_of(rest, "[] = {", line_no)?));
        } else if let Some(rest) = line.strip_prefix("static const void *const ") {
            let d = current(&mut draft, line_no)?;
            let (ident, values) = split_array(rest, line_no)?;
            if ident != format!("{}_sections", d.name) {
                return Err(RespackError::header(line_no, format!("unexpected table '{ident}'")));
            }
            d.order = Some(values.iter().map(|s| s.to_string()).collect());
        } else {
            return Err(RespackError::header(line_no, "unrecognised line"));
        }
    }

    if literal.is_some() {
        return Err(RespackError::header(text.lines().count(), "unterminated literal"));
    }
    if let Some(last) = draft.take() {
        out.push(last.finish()?);
    }
    Ok(out)
}

fn current(draft: &mut Option<Draft>, line: usize) -> RespackResult<&mut Draft> {
    draft
        .as_mut()
        .ok_or_else(|| RespackError::header(line, "declaration before any resource comment"))
}

fn symbol_of(rest: &str, suffix: &str, line: usize) -> RespackResult<String> {
    rest.strip_suffix(suffix)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| RespackError::header(line, format!("expected '<symbol>{suffix}'")))
}

fn parse_usize(s: &str, line: usize) -> RespackResult<usize> {
    s.trim()
        .parse()
        .map_err(|_| RespackError::header(line, format!("'{s}' is not an unsigned integer")))
}

/// `ident[] = { a, b, c };` -> (`ident`, [`a`, `b`, `c`])
fn split_array(rest: &str, line: usize) -> RespackResult<(&str, Vec<&str>)> {
    let malformed = || RespackError::header(line, "malformed array declaration");
    let (ident, body) = rest.split_once("[] =").ok_or_else(malformed)?;
    let body = body
        .trim()
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix("};"))
        .ok_or_else(malformed)?;
    let values = body
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    Ok((ident.trim(), values))
}

#[derive(Debug)]
struct Draft {
    name: String,
    line: usize,
    content: Option<FileContent>,
    width: Option<usize>,
    height: Option<usize>,
    channels: Option<usize>,
    length: Option<usize>,
    raw_length: Option<usize>,
    section_count: Option<usize>,
    section_lengths: Option<Vec<usize>>,
    sections: Vec<(String, Vec<u8>)>,
    order: Option<Vec<String>>,
}

impl Draft {
    /// `/* <name>: image WxH, C channels; stages */` or `/* <name>: text file; stages */`
    fn from_comment(comment: &str, line: usize) -> RespackResult<Self> {
        let body = comment
            .trim()
            .strip_suffix("*/")
            .ok_or_else(|| RespackError::header(line, "unterminated comment"))?;
        let (name, desc) = body
            .split_once(':')
            .ok_or_else(|| RespackError::header(line, "resource comment without ':'"))?;
        let desc = desc.trim();
        let content = if desc.starts_with("text file") {
            Some(FileContent::Text)
        } else if desc.starts_with("binary file") {
            Some(FileContent::Binary)
        } else {
            None
        };

        Ok(Self {
            name: name.trim().to_string(),
            line,
            content,
            width: None,
            height: None,
            channels: None,
            length: None,
            raw_length: None,
            section_count: None,
            section_lengths: None,
            sections: Vec::new(),
            order: None,
        })
    }

    fn constant(&mut self, rest: &str, line: usize) -> RespackResult<()> {
        let prefix = format!("{}_", self.name);
        let Some(field_decl) = rest.strip_prefix(&prefix) else {
            return Err(RespackError::header(
                line,
                format!("constant does not belong to '{}'", self.name),
            ));
        };

        if field_decl.starts_with("section_lengths[]") {
            let (_, values) = split_array(field_decl, line)?;
            let lengths = values
                .iter()
                .map(|v| parse_usize(v, line))
                .collect::<RespackResult<Vec<_>>>()?;
            self.section_lengths = Some(lengths);
            return Ok(());
        }

        let (field, value) = field_decl
            .strip_suffix(';')
            .and_then(|d| d.split_once('='))
            .ok_or_else(|| RespackError::header(line, "malformed constant"))?;
        let value = parse_usize(value, line)?;
        let slot = match field.trim() {
            "width" => &mut self.width,
            "height" => &mut self.height,
            "channels" => &mut self.channels,
            "length" => &mut self.length,
            "raw_length" => &mut self.raw_length,
            "section_count" => &mut self.section_count,
            other => {
                return Err(RespackError::header(line, format!("unknown constant '{other}'")));
            }
        };
        *slot = Some(value);
        Ok(())
    }

    fn finish(mut self) -> RespackResult<EmbeddedResource> {
        let line = self.line;
        let err = |msg: String| RespackError::header(line, format!("{}: {msg}", self.name));

        if let Some(order) = self.order.take() {
            let mut ordered = Vec::with_capacity(order.len());
            for symbol in &order {
                let pos = self
                    .sections
                    .iter()
                    .position(|(s, _)| s == symbol)
                    .ok_or_else(|| err(format!("section '{symbol}' is not defined")))?;
                ordered.push(self.sections.swap_remove(pos));
            }
            if !self.sections.is_empty() {
                return Err(err("sections missing from the section table".to_string()));
            }
            self.sections = ordered;
        }

        if let Some(count) = self.section_count
            && count != self.sections.len()
        {
            return Err(err(format!(
                "section_count is {count} but {} sections are defined",
                self.sections.len()
            )));
        }
        if let Some(lengths) = &self.section_lengths {
            let actual: Vec<usize> = self.sections.iter().map(|(_, b)| b.len()).collect();
            if lengths != &actual {
                return Err(err(format!(
                    "section lengths {lengths:?} do not match literals {actual:?}"
                )));
            }
        }

        let encoded: Vec<u8> = self.sections.into_iter().flat_map(|(_, b)| b).collect();
        let length = self
            .length
            .ok_or_else(|| err("missing length constant".to_string()))?;
        if length != encoded.len() {
            return Err(err(format!(
                "length constant is {length} but literals hold {} bytes",
                encoded.len()
            )));
        }

        let kind = match (self.width, self.height, self.channels) {
            (Some(w), Some(h), Some(c)) => ResourceKind::Image {
                width: u32::try_from(w).map_err(|_| err("width out of range".to_string()))?,
                height: u32::try_from(h).map_err(|_| err("height out of range".to_string()))?,
                channels: u8::try_from(c).map_err(|_| err("channels out of range".to_string()))?,
            },
            (None, None, None) => ResourceKind::File {
                content: self.content.unwrap_or(FileContent::Binary),
            },
            _ => return Err(err("incomplete image dimensions".to_string())),
        };

        Ok(EmbeddedResource {
            name: self.name,
            kind,
            raw_length: self.raw_length.unwrap_or(length),
            encoded,
        })
    }
}

#[derive(Debug)]
enum Literal {
    Text { symbol: String, bytes: Vec<u8> },
    Bytes { symbol: String, bytes: Vec<u8> },
}

impl Literal {
    fn text(symbol: String) -> Self {
        Self::Text {
            symbol,
            bytes: Vec::new(),
        }
    }

    fn bytes(symbol: String) -> Self {
        Self::Bytes {
            symbol,
            bytes: Vec::new(),
        }
    }

    /// Consume one line; returns `true` once the literal is closed.
    fn feed(&mut self, line: &str, line_no: usize) -> RespackResult<bool> {
        match self {
            Self::Text { bytes, .. } => {
                let (piece, closed) = match line.strip_suffix(';') {
                    Some(p) => (p, true),
                    None => (line, false),
                };
                let inner = piece
                    .strip_prefix('"')
                    .and_then(|p| p.strip_suffix('"'))
                    .ok_or_else(|| RespackError::header(line_no, "expected a quoted string"))?;
                bytes.extend_from_slice(inner.as_bytes());
                Ok(closed)
            }
            Self::Bytes { bytes, .. } => {
                if line == "};" {
                    return Ok(true);
                }
                for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let hex = token
                        .strip_prefix("0x")
                        .ok_or_else(|| RespackError::header(line_no, "expected 0x.. byte"))?;
                    let b = u8::from_str_radix(hex, 16).map_err(|_| {
                        RespackError::header(line_no, format!("'{token}' is not a byte"))
                    })?;
                    bytes.push(b);
                }
                Ok(false)
            }
        }
    }

    fn finish(self) -> (String, Vec<u8>) {
        match self {
            Self::Text { symbol, bytes } | Self::Bytes { symbol, bytes } => (symbol, bytes),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pack/parse.rs"]
mod tests;
