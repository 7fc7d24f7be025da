//! Line-oriented reader for bore description files.
//!
//! One item per line, `#` starts a comment:
//!
//! ```text
//! bell = 0.102
//! GROUP, hole
//!   0.007, 0.007, 0.012
//!   OPEN_END
//! END_GROUP
//! MAIN
//!   0.012, 0.012, 0.35
//!   SPLIT, hole, OPEN
//!   0.012, bell, 0.15
//!   OPEN_END
//! END_MAIN
//! ```
//!
//! `MAIN`/`GROUP` open a chain and `END_MAIN`/`END_GROUP` close it.
//! Geometry rows are front diameter, back diameter and length in
//! meters; a fourth column is tolerated as a legacy comment field.
//! Junction keywords take a group name and a flow ratio. `TONEHOLE`,
//! `VALVE_OUT`, `VALVE_IN` and `JOIN` are accepted as synonyms for
//! `SPLIT`, `BRANCH` and `MERGE`; `INSERT` splices a named group in
//! place. `name = expression` lines bind variables for later rows.

use std::fs;
use std::path::Path;

use mensur_graph::{Graph, GraphBuilder, Junction, MAIN_GROUP};

use crate::error::{ParseError, ParseResult};
use crate::expr::{self, EvalError, Vars};

/// Parse a bore description into a validated graph.
pub fn parse_str(text: &str) -> ParseResult<Graph> {
    let mut builder = GraphBuilder::new();
    let mut vars = Vars::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let s = raw.split('#').next().unwrap_or("").trim();
        if s.is_empty() {
            continue;
        }

        if let Some((name, rhs)) = s.split_once('=') {
            let name = name.trim();
            if !is_ident(name) {
                return Err(ParseError::syntax(
                    line,
                    format!("bad variable name '{name}'"),
                ));
            }
            let value = eval_at(rhs, &vars, line)?;
            vars.assign(name, value);
            continue;
        }

        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let step = match fields[0] {
            "MAIN" => builder.begin_group(MAIN_GROUP),
            "GROUP" => builder.begin_group(field(&fields, 1, line, "group name")?),
            "END_MAIN" | "END_GROUP" => builder.end_group(),
            "OPEN_END" => builder.add_open_end().map(drop),
            "CLOSED_END" => builder.add_closed_end().map(drop),
            "INSERT" => builder.insert_group(field(&fields, 1, line, "group name")?),
            first => {
                if let Some(kind) = junction_keyword(first) {
                    let name = field(&fields, 1, line, "group name")?;
                    let ratio = eval_at(field(&fields, 2, line, "ratio")?, &vars, line)?;
                    builder.add_junction(kind, name, ratio).map(drop)
                } else {
                    if fields.len() < 3 {
                        return Err(ParseError::syntax(
                            line,
                            "expected 'front, back, length'",
                        ));
                    }
                    let df = eval_at(fields[0], &vars, line)?;
                    let db = eval_at(fields[1], &vars, line)?;
                    let r = eval_at(fields[2], &vars, line)?;
                    builder.add_section(df, db, r).map(drop)
                }
            }
        };
        step.map_err(|source| ParseError::Graph { line, source })?;
    }

    Ok(builder.build()?)
}

/// Read and parse a description file.
pub fn read_graph(path: impl AsRef<Path>) -> ParseResult<Graph> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&text)
}

fn junction_keyword(word: &str) -> Option<Junction> {
    match word {
        "SPLIT" | "TONEHOLE" => Some(Junction::Split),
        "BRANCH" | "VALVE_OUT" => Some(Junction::Branch),
        "MERGE" | "VALVE_IN" | "JOIN" => Some(Junction::Merge),
        "ADDON" => Some(Junction::Addon),
        _ => None,
    }
}

fn field<'a>(fields: &[&'a str], idx: usize, line: usize, what: &str) -> ParseResult<&'a str> {
    fields
        .get(idx)
        .copied()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ParseError::syntax(line, format!("missing {what}")))
}

fn eval_at(text: &str, vars: &Vars, line: usize) -> ParseResult<f64> {
    expr::eval(text, vars).map_err(|e| match e {
        EvalError::Undefined(name) => ParseError::UndefinedVariable { line, name },
        EvalError::Malformed(message) => ParseError::Syntax { line, message },
    })
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_synonyms_share_a_kind() {
        assert_eq!(junction_keyword("TONEHOLE"), Some(Junction::Split));
        assert_eq!(junction_keyword("VALVE_OUT"), Some(Junction::Branch));
        assert_eq!(junction_keyword("VALVE_IN"), Some(Junction::Merge));
        assert_eq!(junction_keyword("JOIN"), Some(Junction::Merge));
        assert_eq!(junction_keyword("OPEN_END"), None);
        assert_eq!(junction_keyword("split"), None);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let graph = parse_str(
            "# a flute, sort of\n\
             \n\
             MAIN\n\
             0.019, 0.019, 0.6   # head joint\n\
             OPEN_END\n\
             END_MAIN\n",
        )
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.segment(graph.head()).unwrap().front_dia, 0.019);
    }

    #[test]
    fn variables_feed_geometry_rows() {
        let graph = parse_str(
            "bore = 0.0145\n\
             half_len = 0.7 / 2\n\
             MAIN\n\
             bore, bore * 2, half_len\n\
             OPEN_END\n\
             END_MAIN\n",
        )
        .unwrap();
        let head = graph.segment(graph.head()).unwrap();
        assert_eq!(head.front_dia, 0.0145);
        assert_eq!(head.back_dia, 0.0145 * 2.0);
        assert_eq!(head.length, 0.7 / 2.0);
    }

    #[test]
    fn fourth_column_is_tolerated() {
        let graph = parse_str(
            "MAIN\n\
             0.012, 0.012, 0.1, mouthpipe\n\
             OPEN_END\n\
             END_MAIN\n",
        )
        .unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn malformed_row_points_at_the_line() {
        let err = parse_str("MAIN\n0.012, 0.012\nEND_MAIN\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
    }

    #[test]
    fn undefined_variable_points_at_the_line() {
        let err = parse_str("MAIN\n0.012, bell, 0.1\nOPEN_END\nEND_MAIN\n").unwrap_err();
        assert!(
            matches!(err, ParseError::UndefinedVariable { line: 2, ref name } if name == "bell")
        );
    }

    #[test]
    fn builder_rejections_carry_the_line() {
        let err = parse_str(
            "GROUP, a\n\
             0.01, 0.01, 0.1\n\
             END_GROUP\n\
             GROUP, a\n\
             0.01, 0.01, 0.1\n\
             END_GROUP\n\
             MAIN\n\
             0.012, 0.012, 0.1\n\
             OPEN_END\n\
             END_MAIN\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Graph { line: 4, .. }));
    }
}
