//! Grammar-file surface syntax: `HEAD : body1 | body2 ;`.
//!
//! A production block spans one or more physical lines and ends at a `;`.
//! Within a block, the head and the `|`-separated alternatives are
//! separated by `:`; each alternative is whitespace-separated symbols, and
//! an empty alternative (nothing between `|`s, or between `:` and `;` for a
//! single-alternative block) is an ε-production. Grounded directly in
//! `GrammarBuilder.preprocess()`, generalized from its implicit-exception
//! parsing into explicit [`GrammarError`] variants.

use crate::error::{GrammarError, Result};
use crate::grammar::{Grammar, GrammarBuilder};
use std::path::Path;

/// Parses grammar source text into a [`Grammar`], using the head of the
/// first production block as the start symbol unless `start` overrides it.
pub fn load_str(source: &str, start: Option<&str>) -> Result<Grammar> {
    let mut builder = GrammarBuilder::new();
    if let Some(name) = start {
        builder.start(name);
    }

    let mut first_head: Option<String> = None;
    for block in split_blocks(source)? {
        let (head, alternatives) = parse_block(&block)?;
        if first_head.is_none() {
            first_head = Some(head.clone());
        }
        for alt in alternatives {
            builder.production(head.clone(), alt);
        }
    }

    if start.is_none() {
        if let Some(head) = first_head {
            builder.start(head);
        }
    }

    builder.build()
}

/// Reads `path` and parses it the same way as [`load_str`].
pub fn load_file(path: impl AsRef<Path>, start: Option<&str>) -> Result<Grammar> {
    let source = std::fs::read_to_string(path)?;
    load_str(&source, start)
}

/// Splits source text into raw `;`-terminated blocks, tracking physical
/// line numbers for diagnostics. Blank lines and `#`-prefixed comment lines
/// outside a block are skipped.
fn split_blocks(source: &str) -> Result<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut block_start_line: Option<usize> = None;

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if current.is_empty() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            block_start_line = Some(line_no);
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);

        if current.trim_end().ends_with(';') {
            blocks.push(std::mem::take(&mut current));
            block_start_line = None;
        }
    }

    if !current.trim().is_empty() {
        return Err(GrammarError::UnterminatedBlock {
            line: block_start_line.unwrap_or(0),
        });
    }

    Ok(blocks)
}

/// Parses one `HEAD : body1 | body2 ;` block into its head and its list of
/// alternative bodies (each a list of symbol names; an empty list is ε).
fn parse_block(block: &str) -> Result<(String, Vec<Vec<String>>)> {
    let trimmed = block.trim().trim_end_matches(';').trim();

    let mut parts = trimmed.splitn(2, ':');
    let head = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GrammarError::MalformedBlock {
            line: 0,
            reason: "missing non-terminal head before ':'".to_string(),
        })?;
    let bodies = parts.next().ok_or_else(|| GrammarError::MalformedBlock {
        line: 0,
        reason: format!("block for '{head}' is missing a ':' separating head and body"),
    })?;

    let alternatives = bodies
        .split('|')
        .map(|alt| alt.split_whitespace().map(String::from).collect())
        .collect();

    Ok((head.to_string(), alternatives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_single_line_grammar() {
        let src = "S : ( S ) | ( ) ;";
        let g = load_str(src, None).unwrap();
        assert_eq!(g.all_productions().count(), 2);
        assert_eq!(g.start().name(), "S");
    }

    #[test]
    fn loads_grammar_spanning_multiple_physical_lines() {
        let src = "S : A\n    B\n  ;\nA : a ;\nB : b ;";
        let g = load_str(src, None).unwrap();
        assert_eq!(g.all_productions().count(), 3);
    }

    #[test]
    fn epsilon_alternative_is_an_empty_body() {
        let src = "A : a | ;";
        let g = load_str(src, None).unwrap();
        let prods = g.productions_of(g.start());
        assert!(g.production(prods[1]).body.is_empty());
    }

    #[test]
    fn blank_lines_and_comments_between_blocks_are_skipped() {
        let src = "# a comment\nS : a ;\n\n# another\nA : b ;";
        let g = load_str(src, None).unwrap();
        assert_eq!(g.all_productions().count(), 2);
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let src = "S : a";
        assert!(matches!(
            load_str(src, None),
            Err(GrammarError::UnterminatedBlock { .. })
        ));
    }

    #[test]
    fn explicit_start_override_is_honored() {
        let src = "S : a ;\nT : b ;";
        let g = load_str(src, Some("T")).unwrap();
        assert_eq!(g.start().name(), "T");
    }

    #[test]
    fn reserved_end_token_in_source_is_rejected() {
        let src = "S : a $end ;";
        assert!(matches!(
            load_str(src, None),
            Err(GrammarError::ReservedEndToken(_))
        ));
    }
}
