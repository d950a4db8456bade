//! Canonical ordering of map entries.
//!
//! Keys are ordered by type name first, then by value for strings, numbers
//! and booleans, and by their canonical encoding for everything else. Entries
//! with equal keys (possible in dynamic maps) are ordered by the encoding of
//! their values, so the result never depends on iteration order.

use std::cmp::Ordering;

use tracing::trace;

use crate::encoder::render;
use crate::error::{ImprintError, Position};
use crate::imprint::Imprint;
use crate::options::Options;
use crate::view::{Child, View};

#[derive(Debug)]
enum Ordinal {
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Str(String),
    Canonical(Vec<u8>),
}

impl Ordinal {
    fn rank(&self) -> u8 {
        match self {
            Ordinal::Bool(_) => 0,
            Ordinal::Signed(_) => 1,
            Ordinal::Unsigned(_) => 2,
            Ordinal::Float(_) => 3,
            Ordinal::Str(_) => 4,
            Ordinal::Canonical(_) => 5,
        }
    }
}

impl Ord for Ordinal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Ordinal::Bool(a), Ordinal::Bool(b)) => a.cmp(b),
            (Ordinal::Signed(a), Ordinal::Signed(b)) => a.cmp(b),
            (Ordinal::Unsigned(a), Ordinal::Unsigned(b)) => a.cmp(b),
            (Ordinal::Float(a), Ordinal::Float(b)) => a.total_cmp(b),
            (Ordinal::Str(a), Ordinal::Str(b)) => a.cmp(b),
            (Ordinal::Canonical(a), Ordinal::Canonical(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Ordinal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ordinal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ordinal {}

/// Sort key of a single map key.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    type_name: String,
    ordinal: Ordinal,
}

/// Computes the ordinal of a key, looking through plain references so that
/// `&str` keys compare as strings.
fn ordinal(value: &dyn Imprint, hops_left: usize, options: &Options) -> Result<Ordinal, ImprintError> {
    let ordinal = match value.view() {
        View::Bool(b) => Ordinal::Bool(b),
        View::Signed(_, v) => Ordinal::Signed(v),
        View::Unsigned(_, v) => Ordinal::Unsigned(v),
        View::Float(_, v) => Ordinal::Float(v),
        View::Str(s) => Ordinal::Str(s.to_owned()),
        View::Rendered(s) => Ordinal::Str(s),
        View::Reference(reference) if reference.identity.is_none() && hops_left > 0 => {
            return ordinal(&*reference.target, hops_left - 1, options);
        }
        _ => Ordinal::Canonical(render(value, options)?),
    };
    Ok(ordinal)
}

fn sort_key(key: &dyn Imprint, options: &Options) -> Result<SortKey, ImprintError> {
    Ok(SortKey {
        type_name: key.type_name().into_owned(),
        ordinal: ordinal(key, options.max_depth, options)?,
    })
}

/// Orders map entries canonically.
pub(crate) fn canonical_order<'a>(
    entries: Vec<(Child<'a>, Child<'a>)>,
    options: &Options,
) -> Result<Vec<(Child<'a>, Child<'a>)>, ImprintError> {
    let mut keyed = entries
        .into_iter()
        .enumerate()
        .map(|(i, (k, v))| {
            let key = sort_key(&*k, options).map_err(|e| e.at(Position::Key(i)))?;
            Ok((key, None, k, v))
        })
        .collect::<Result<Vec<(SortKey, Option<Vec<u8>>, Child<'a>, Child<'a>)>, ImprintError>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    // Equal keys only occur in dynamic maps; order those entries by the
    // encoding of their values.
    let mut tied = false;
    for i in 1..keyed.len() {
        if keyed[i].0 == keyed[i - 1].0 {
            for j in [i - 1, i] {
                if keyed[j].1.is_none() {
                    let bytes = render(&*keyed[j].3, options).map_err(|e| e.at(Position::Value(j)))?;
                    keyed[j].1 = Some(bytes);
                }
            }
            tied = true;
        }
    }
    if tied {
        trace!("ordering entries with equal keys by value");
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    }

    Ok(keyed.into_iter().map(|(_, _, k, v)| (k, v)).collect())
}
