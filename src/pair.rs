//! Paired-end pairing over a record stream.
//!
//! Groups adjacent records whose names differ only by a trailing `/1` vs
//! `/2` suffix. One record of lookahead, no other state: the combinator
//! is a single-pass, order-preserving stream adapter.

use crate::error::Result;
use crate::record::Record;

/// Wrap a record stream so it yields `(first, Option<second>)` pairs.
pub fn pair_records<I>(records: I) -> PairedRecords<I>
where
    I: Iterator<Item = Result<Record>>,
{
    PairedRecords {
        inner: records,
        held: None,
        done: false,
    }
}

pub struct PairedRecords<I> {
    inner: I,
    held: Option<Record>,
    done: bool,
}

fn is_left(name: &str) -> bool {
    name.ends_with("/1")
}

fn is_right(name: &str) -> bool {
    name.ends_with("/2")
}

/// Name minus its final character, the shared stem of a `/1`–`/2` pair.
fn stem(name: &str) -> &str {
    &name[..name.len() - 1]
}

impl<I> Iterator for PairedRecords<I>
where
    I: Iterator<Item = Result<Record>>,
{
    type Item = Result<(Record, Option<Record>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.inner.next() {
                None => {
                    self.done = true;
                    return self.held.take().map(|rec| Ok((rec, None)));
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(cur)) => {
                    let Some(prev) = self.held.take() else {
                        self.held = Some(cur);
                        continue;
                    };
                    if is_left(prev.name())
                        && is_right(cur.name())
                        && stem(prev.name()) == stem(cur.name())
                    {
                        return Some(Ok((prev, Some(cur))));
                    }
                    self.held = Some(cur);
                    return Some(Ok((prev, None)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Schema;

    fn records(names: &[&str]) -> Vec<Result<Record>> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Ok(Record::new(
                    Schema::fasta(),
                    i,
                    vec![name.to_string(), String::new(), "ACGT".to_string()],
                ))
            })
            .collect()
    }

    fn pair_names(names: &[&str]) -> Vec<(String, Option<String>)> {
        pair_records(records(names).into_iter())
            .map(|p| {
                let (first, second) = p.unwrap();
                (
                    first.name().to_string(),
                    second.map(|r| r.name().to_string()),
                )
            })
            .collect()
    }

    #[test]
    fn adjacent_mates_pair_up() {
        let pairs = pair_names(&["r1/1", "r1/2", "r2/1", "r3/2"]);
        assert_eq!(
            pairs,
            vec![
                ("r1/1".to_string(), Some("r1/2".to_string())),
                ("r2/1".to_string(), None),
                ("r3/2".to_string(), None),
            ]
        );
    }

    #[test]
    fn mismatched_stems_do_not_pair() {
        let pairs = pair_names(&["r1/1", "r2/2"]);
        assert_eq!(
            pairs,
            vec![
                ("r1/1".to_string(), None),
                ("r2/2".to_string(), None),
            ]
        );
    }

    #[test]
    fn unsuffixed_names_pass_through() {
        let pairs = pair_names(&["a", "b"]);
        assert_eq!(
            pairs,
            vec![("a".to_string(), None), ("b".to_string(), None)]
        );
    }

    #[test]
    fn empty_stream_yields_nothing() {
        assert!(pair_names(&[]).is_empty());
    }

    #[test]
    fn trailing_record_is_flushed() {
        let pairs = pair_names(&["r1/1"]);
        assert_eq!(pairs, vec![("r1/1".to_string(), None)]);
    }

    #[test]
    fn consecutive_pairs() {
        let pairs = pair_names(&["a/1", "a/2", "b/1", "b/2"]);
        assert_eq!(
            pairs,
            vec![
                ("a/1".to_string(), Some("a/2".to_string())),
                ("b/1".to_string(), Some("b/2".to_string())),
            ]
        );
    }
}
