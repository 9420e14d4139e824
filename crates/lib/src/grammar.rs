//! Line-oriented grammar for MSBuild project manifests.
//!
//! A `.vcxproj` (or `.vcxproj.filters`) file is split into a flat sequence of
//! [`Element`]s. Only the structure needed to find and drop file entries is
//! recognized:
//!
//! - `<ItemGroup ...>` / `</ItemGroup>` boundaries
//! - `<ClCompile Include="...">` and `<ClInclude Include="...">` entries inside
//!   a group, including entries with child elements spanning several lines
//! - groups opened and closed on a single line, split into their parts
//! - `<!-- ... -->` comments, whose lines are never interpreted
//!
//! Everything else is kept as [`Element::Other`]. Each element owns its raw
//! text including line terminators, so [`serialize`] reproduces the input
//! byte for byte.
//!
//! # Example
//!
//! ```
//! use slnstrip_lib::grammar::{parse, serialize, Element, ItemKind};
//!
//! let text = "<ItemGroup>\r\n  <ClCompile Include=\"a\\foo.cpp\" />\r\n</ItemGroup>\r\n";
//! let elements = parse(text).unwrap();
//! assert!(matches!(
//!     &elements[1],
//!     Element::Item { kind: ItemKind::Compile, key, .. } if key == "a\\foo.cpp"
//! ));
//! assert_eq!(serialize(&elements), text);
//! ```

use serde::Serialize;
use thiserror::Error;

/// Which file list an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
  /// `<ClCompile>`: a translation unit handed to the compiler.
  Compile,
  /// `<ClInclude>`: a header made available for inclusion.
  Include,
}

impl ItemKind {
  pub const ALL: [ItemKind; 2] = [ItemKind::Compile, ItemKind::Include];

  /// MSBuild element name.
  pub fn tag(self) -> &'static str {
    match self {
      ItemKind::Compile => "ClCompile",
      ItemKind::Include => "ClInclude",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      ItemKind::Compile => "compile",
      ItemKind::Include => "include",
    }
  }
}

impl std::fmt::Display for ItemKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One tokenized piece of a project manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
  /// Opening `<ItemGroup>` line. `label` is its `Label` attribute, if any.
  GroupStart { label: Option<String>, raw: String },

  /// A compile or include entry. `key` is the decoded `Include` attribute.
  Item { kind: ItemKind, key: String, raw: String },

  /// Closing `</ItemGroup>` line.
  GroupEnd { raw: String },

  /// Any other line, kept verbatim.
  Other { raw: String },
}

impl Element {
  /// Original text of this element, including line terminators.
  pub fn raw(&self) -> &str {
    match self {
      Element::GroupStart { raw, .. }
      | Element::Item { raw, .. }
      | Element::GroupEnd { raw }
      | Element::Other { raw } => raw,
    }
  }
}

/// Structural errors that make a manifest unsafe to rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
  #[error("line {line}: <ItemGroup> is never closed")]
  UnclosedGroup { line: usize },

  #[error("line {line}: <{tag}> is never closed")]
  UnclosedItem { line: usize, tag: &'static str },

  #[error("line {line}: </ItemGroup> without a matching <ItemGroup>")]
  UnexpectedGroupEnd { line: usize },
}

/// Tokenize manifest text into elements.
///
/// Unknown or malformed lines never fail; they become [`Element::Other`].
/// Lines inside `<!-- ... -->` comments are always [`Element::Other`], so a
/// commented-out group or item is never recognized.
///
/// # Errors
///
/// Returns an error only when closing markers are missing or misplaced: an
/// `ItemGroup` left open at end of input (or when the next one starts), an
/// item with children that is not closed before its group ends, or a stray
/// `</ItemGroup>`.
pub fn parse(text: &str) -> Result<Vec<Element>, GrammarError> {
  let mut elements = Vec::new();
  let mut lines = text.split_inclusive('\n').enumerate().map(|(i, line)| (i + 1, line));
  let mut open_group: Option<usize> = None;
  let mut in_comment = false;

  while let Some((line_no, line)) = lines.next() {
    let trimmed = line.trim_start_matches('\u{feff}').trim();

    if in_comment || trimmed.starts_with("<!--") {
      in_comment = comment_open_at_end(line, in_comment);
      elements.push(Element::Other { raw: line.to_string() });
      continue;
    }

    match open_group {
      None => {
        if is_group_start(trimmed) {
          match split_inline_group(line, line_no)? {
            Some(inline) => elements.extend(inline),
            None => {
              open_group = Some(line_no);
              elements.push(Element::GroupStart {
                label: attribute(trimmed, "Label"),
                raw: line.to_string(),
              });
            }
          }
        } else if is_group_end(trimmed) {
          return Err(GrammarError::UnexpectedGroupEnd { line: line_no });
        } else {
          elements.push(Element::Other { raw: line.to_string() });
        }
      }
      Some(group_line) => {
        if is_group_end(trimmed) {
          open_group = None;
          elements.push(Element::GroupEnd { raw: line.to_string() });
        } else if is_group_start(trimmed) {
          return Err(GrammarError::UnclosedGroup { line: group_line });
        } else if let Some(open) = parse_item_open(trimmed) {
          let mut raw = line.to_string();
          let close = format!("</{}>", open.kind.tag());
          if !open.self_closing && !trimmed.contains(&close) {
            loop {
              let Some((_, next)) = lines.next() else {
                return Err(GrammarError::UnclosedItem {
                  line: line_no,
                  tag: open.kind.tag(),
                });
              };
              let next_trimmed = next.trim();
              if is_group_end(next_trimmed) {
                return Err(GrammarError::UnclosedItem {
                  line: line_no,
                  tag: open.kind.tag(),
                });
              }
              raw.push_str(next);
              if next_trimmed.contains(&close) {
                break;
              }
            }
          }
          elements.push(Element::Item {
            kind: open.kind,
            key: open.key,
            raw,
          });
        } else {
          elements.push(Element::Other { raw: line.to_string() });
        }
      }
    }

    // A comment may open after other content on the line just consumed.
    in_comment = elements.last().is_some_and(|e| comment_open_at_end(e.raw(), false));
  }

  match open_group {
    Some(line) => Err(GrammarError::UnclosedGroup { line }),
    None => Ok(elements),
  }
}

/// Split an `<ItemGroup>` that is closed on the line it opens into group
/// start, items, other content and group end. `None` if the group stays open.
fn split_inline_group(line: &str, line_no: usize) -> Result<Option<Vec<Element>>, GrammarError> {
  let Some(start) = line.find("<ItemGroup") else {
    return Ok(None);
  };
  let Some(body_start) = opening_tag_end(&line[start..]).map(|end| start + end + 1) else {
    return Ok(None);
  };
  let Some(close) = line[body_start..].find("</ItemGroup").map(|i| body_start + i) else {
    return Ok(None);
  };

  let mut elements = vec![Element::GroupStart {
    label: attribute(&line[start..body_start], "Label"),
    raw: line[..body_start].to_string(),
  }];

  let mut rest = &line[body_start..close];
  let mut other = String::new();
  while let Some(lt) = rest.find('<') {
    let candidate = &rest[lt..];
    let Some(open) = parse_item_open(candidate) else {
      other.push_str(&rest[..=lt]);
      rest = &rest[lt + 1..];
      continue;
    };

    let len = if open.self_closing {
      open.tag_len
    } else {
      let close_tag = format!("</{}>", open.kind.tag());
      match candidate[open.tag_len..].find(&close_tag) {
        Some(i) => open.tag_len + i + close_tag.len(),
        None => {
          return Err(GrammarError::UnclosedItem {
            line: line_no,
            tag: open.kind.tag(),
          });
        }
      }
    };

    other.push_str(&rest[..lt]);
    if !other.is_empty() {
      elements.push(Element::Other {
        raw: std::mem::take(&mut other),
      });
    }
    elements.push(Element::Item {
      kind: open.kind,
      key: open.key,
      raw: candidate[..len].to_string(),
    });
    rest = &candidate[len..];
  }
  other.push_str(rest);
  if !other.is_empty() {
    elements.push(Element::Other { raw: other });
  }

  elements.push(Element::GroupEnd {
    raw: line[close..].to_string(),
  });
  Ok(Some(elements))
}

/// Whether `text` ends inside an XML comment, given whether it started in one.
fn comment_open_at_end(text: &str, mut inside: bool) -> bool {
  let mut rest = text;
  loop {
    let marker = if inside { "-->" } else { "<!--" };
    match rest.find(marker) {
      Some(i) => {
        rest = &rest[i + marker.len()..];
        inside = !inside;
      }
      None => return inside,
    }
  }
}

/// Concatenate the raw text of `elements`.
pub fn serialize(elements: &[Element]) -> String {
  let mut out = String::with_capacity(elements.iter().map(|e| e.raw().len()).sum());
  for element in elements {
    out.push_str(element.raw());
  }
  out
}

struct ItemOpen {
  kind: ItemKind,
  key: String,
  self_closing: bool,
  /// Length of the opening tag, `>` included.
  tag_len: usize,
}

fn is_group_start(trimmed: &str) -> bool {
  starts_with_tag(trimmed, "<ItemGroup")
    && opening_tag_end(trimmed).is_none_or(|end| !trimmed[..end].ends_with('/'))
}

fn is_group_end(trimmed: &str) -> bool {
  starts_with_tag(trimmed, "</ItemGroup")
}

/// `line` starts with `prefix` followed by `>`, `/`, whitespace, or nothing.
fn starts_with_tag(line: &str, prefix: &str) -> bool {
  match line.strip_prefix(prefix) {
    Some(rest) => match rest.chars().next() {
      None => true,
      Some(c) => c == '>' || c == '/' || c.is_whitespace(),
    },
    None => false,
  }
}

fn parse_item_open(trimmed: &str) -> Option<ItemOpen> {
  let kind = ItemKind::ALL
    .into_iter()
    .find(|kind| starts_with_tag(trimmed, &format!("<{}", kind.tag())))?;
  let tag_end = opening_tag_end(trimmed)?;
  let opening = &trimmed[..=tag_end];
  let key = attribute(opening, "Include")?;
  Some(ItemOpen {
    kind,
    key,
    self_closing: opening.ends_with("/>"),
    tag_len: tag_end + 1,
  })
}

/// Byte index of the `>` that ends the opening tag, skipping quoted values.
fn opening_tag_end(line: &str) -> Option<usize> {
  let mut quote: Option<char> = None;
  for (i, c) in line.char_indices() {
    match (quote, c) {
      (Some(q), c) if c == q => quote = None,
      (Some(_), _) => {}
      (None, '"' | '\'') => quote = Some(c),
      (None, '>') => return Some(i),
      (None, _) => {}
    }
  }
  None
}

/// Value of attribute `name` within a single tag line, entity-decoded.
fn attribute(tag: &str, name: &str) -> Option<String> {
  let needle = format!("{}=", name);
  for (idx, _) in tag.match_indices(&needle) {
    let preceded_by_space = tag[..idx].chars().next_back().is_some_and(char::is_whitespace);
    if !preceded_by_space {
      continue;
    }
    let rest = &tag[idx + needle.len()..];
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
      continue;
    }
    let value = &rest[1..];
    let end = value.find(quote)?;
    return Some(decode_entities(&value[..end]));
  }
  None
}

fn decode_entities(value: &str) -> String {
  if !value.contains('&') {
    return value.to_string();
  }
  value
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&apos;", "'")
    .replace("&amp;", "&")
}
