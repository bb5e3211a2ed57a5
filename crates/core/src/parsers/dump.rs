use thiserror::Error;

use crate::views::report::{
    COUNTER_DUMP_BEGIN, COUNTER_DUMP_END, PROFILE_DUMP_BEGIN, PROFILE_DUMP_END,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DumpParseError {
    #[error("line {line}: `{marker}` opened while `{open}` is still open")]
    Nested {
        line: usize,
        marker: &'static str,
        open: &'static str,
    },
    #[error("line {line}: `{marker}` has no matching begin marker")]
    Unmatched { line: usize, marker: &'static str },
    #[error("line {line}: text outside of any section")]
    StrayText { line: usize },
    #[error("section `{0}` appears more than once")]
    Duplicate(&'static str),
    #[error("section `{0}` is never closed")]
    Unclosed(&'static str),
    #[error("no profile dump section found")]
    MissingProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Banner, comment and run summary before the first marker.
    Header,
    Profile,
    Counter,
}

impl SectionKind {
    fn begin(self) -> &'static str {
        match self {
            Self::Header => "",
            Self::Profile => PROFILE_DUMP_BEGIN,
            Self::Counter => COUNTER_DUMP_BEGIN,
        }
    }
}

/// One block of a rendered report. `body` has surrounding blank lines removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSection {
    pub kind: SectionKind,
    pub body: String,
}

enum Marker {
    Begin(SectionKind),
    End(SectionKind, &'static str),
}

fn marker(line: &str) -> Option<Marker> {
    match line {
        PROFILE_DUMP_BEGIN => Some(Marker::Begin(SectionKind::Profile)),
        COUNTER_DUMP_BEGIN => Some(Marker::Begin(SectionKind::Counter)),
        PROFILE_DUMP_END => Some(Marker::End(SectionKind::Profile, PROFILE_DUMP_END)),
        COUNTER_DUMP_END => Some(Marker::End(SectionKind::Counter, COUNTER_DUMP_END)),
        _ => None,
    }
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Split a rendered report back into its header, profile and counter blocks.
///
/// Markers must match exactly, appear at most once each, and never nest.
pub fn split_sections(text: &str) -> Result<Vec<DumpSection>, DumpParseError> {
    let mut sections: Vec<DumpSection> = Vec::new();
    let mut header: Vec<&str> = Vec::new();
    let mut seen_marker = false;
    let mut open: Option<(SectionKind, Vec<&str>)> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        match (marker(line), open.take()) {
            (Some(Marker::Begin(kind)), None) => {
                if sections.iter().any(|s| s.kind == kind) {
                    return Err(DumpParseError::Duplicate(kind.begin()));
                }
                seen_marker = true;
                open = Some((kind, Vec::new()));
            }
            (Some(Marker::Begin(kind)), Some((current, _))) => {
                return Err(DumpParseError::Nested {
                    line: line_no,
                    marker: kind.begin(),
                    open: current.begin(),
                });
            }
            (Some(Marker::End(kind, _)), Some((current, body))) if kind == current => {
                sections.push(DumpSection {
                    kind,
                    body: trim_blank_lines(&body),
                });
            }
            (Some(Marker::End(_, end_marker)), _) => {
                return Err(DumpParseError::Unmatched {
                    line: line_no,
                    marker: end_marker,
                });
            }
            (None, Some((kind, mut body))) => {
                body.push(line);
                open = Some((kind, body));
            }
            (None, None) if !seen_marker => header.push(line),
            (None, None) if line.trim().is_empty() => {}
            (None, None) => return Err(DumpParseError::StrayText { line: line_no }),
        }
    }

    if let Some((kind, _)) = open {
        return Err(DumpParseError::Unclosed(kind.begin()));
    }
    if !sections.iter().any(|s| s.kind == SectionKind::Profile) {
        return Err(DumpParseError::MissingProfile);
    }

    let header = trim_blank_lines(&header);
    if !header.is_empty() {
        sections.insert(
            0,
            DumpSection {
                kind: SectionKind::Header,
                body: header,
            },
        );
    }
    Ok(sections)
}
