//! Hints for a short ref name that failed to resolve.
//!
//! A remote-tracking branch with the same last segment (`origin/topic` for
//! `topic`) is the only thing deemed similar; no edit distance is involved.

use anyhow::{Result, bail};
use std::io::{self, Write};

const REMOTES_PREFIX: &str = "refs/remotes/";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefRecord {
    /// Full ref name, e.g. `refs/remotes/origin/topic`.
    pub name: String,
    /// Object id the ref points at.
    pub id: String,
}

/// Remote-tracking refs whose last segment is exactly `short`, in input order.
pub fn guess_refs<'a, I>(short: &str, refs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a RefRecord>,
{
    refs.into_iter()
        .filter_map(|record| {
            let remote = record.name.strip_prefix(REMOTES_PREFIX)?;
            let branch = remote.rsplit('/').next()?;
            (branch == short).then(|| remote.to_string())
        })
        .collect()
}

/// Parse `<id> <refname>` lines; blank lines are ignored.
pub fn parse_ref_listing(input: &str) -> Result<Vec<RefRecord>> {
    let mut records = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(id), Some(name), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("Unable to parse ref from line {}: expected '<id> <refname>'", idx + 1);
        };
        records.push(RefRecord {
            name: name.to_string(),
            id: id.to_string(),
        });
    }
    Ok(records)
}

/// Report an unresolvable ref followed by any same-named remote branches.
pub fn help_unknown_ref<W: Write>(
    out: &mut W,
    cmd: &str,
    short: &str,
    error: &str,
    hints: &[String],
) -> io::Result<()> {
    writeln!(out, "{cmd}: {short} - {error}")?;
    if !hints.is_empty() {
        let header = if hints.len() == 1 {
            "Did you mean this?"
        } else {
            "Did you mean one of these?"
        };
        writeln!(out, "\n{header}")?;
        for hint in hints {
            writeln!(out, "\t{hint}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> RefRecord {
        RefRecord {
            name: name.to_string(),
            id: "0123abcd".to_string(),
        }
    }

    #[test]
    fn matches_remote_branches_by_last_segment() {
        let refs = vec![
            record("refs/heads/topic"),
            record("refs/remotes/origin/topic"),
            record("refs/remotes/upstream/feature/topic"),
            record("refs/remotes/origin/topical"),
            record("refs/tags/topic"),
        ];
        assert_eq!(
            guess_refs("topic", &refs),
            vec!["origin/topic", "upstream/feature/topic"]
        );
    }

    #[test]
    fn nothing_outside_remotes_is_similar() {
        let refs = vec![record("refs/heads/topic"), record("refs/tags/topic")];
        assert!(guess_refs("topic", &refs).is_empty());
    }

    #[test]
    fn parses_listing_and_rejects_garbage() {
        let records = parse_ref_listing("abc refs/remotes/origin/main\n\n def refs/heads/main \n").unwrap();
        assert_eq!(
            records,
            vec![
                RefRecord {
                    name: "refs/remotes/origin/main".into(),
                    id: "abc".into()
                },
                RefRecord {
                    name: "refs/heads/main".into(),
                    id: "def".into()
                },
            ]
        );

        let err = parse_ref_listing("abc\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
        assert!(parse_ref_listing("a b c").is_err());
    }

    #[test]
    fn report_single_and_multiple_hints() {
        let mut out = Vec::new();
        help_unknown_ref(&mut out, "merge", "topic", "not something we can merge", &["origin/topic".into()]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "merge: topic - not something we can merge\n\nDid you mean this?\n\torigin/topic\n"
        );

        let mut out = Vec::new();
        let hints = vec!["origin/topic".to_string(), "fork/topic".to_string()];
        help_unknown_ref(&mut out, "merge", "topic", "bad ref", &hints).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "merge: topic - bad ref\n\nDid you mean one of these?\n\torigin/topic\n\tfork/topic\n"
        );
    }

    #[test]
    fn report_without_hints_is_one_line() {
        let mut out = Vec::new();
        help_unknown_ref(&mut out, "merge", "topic", "bad ref", &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "merge: topic - bad ref\n");
    }
}
