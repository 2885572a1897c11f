use quickcheck::{Arbitrary, Gen};

use crate::tree::SearchTree;

/// An enum for the various kinds of "things" to do to
/// search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<T> {
    /// Insert the value into the tree
    Insert(T),
    /// Remove the value from the tree
    Remove(T),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Inserts are
    /// twice as likely as removals so the trees actually grow.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Remove(T::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}

/// Applies `ops` one by one, checking after each of them that
///
/// * every intermediate snapshot is ordered,
/// * removing an absent value produced no steps,
/// * the size changed by exactly one (when something happened),
/// * the final snapshot satisfies all invariants of its tree kind.
pub(crate) fn apply_checked<Tr>(mut tree: Tr, ops: &[Op<Tr::Value>]) -> Result<Tr, String>
where
    Tr: SearchTree,
{
    for op in ops {
        let size = tree.size();
        let (trace, expected_size) = match op {
            Op::Insert(value) => (tree.add_with_steps(value.clone()), size + 1),
            Op::Remove(value) => {
                let present = tree.contains(value);
                let trace = tree.remove_with_steps(value);
                if !present {
                    if !trace.is_empty() {
                        return Err(format!("removing absent {value:?} produced steps"));
                    }
                    continue;
                }
                (trace, size - 1)
            }
        };

        for (snapshot, step) in &trace {
            let values = snapshot.in_order();
            if values.windows(2).any(|pair| pair[0] > pair[1]) {
                return Err(format!("{op:?}: unordered snapshot after {step:?}"));
            }
        }

        let Some((last, _)) = trace.last() else {
            return Err(format!("{op:?} produced no steps"));
        };
        last.validate().map_err(|e| format!("{op:?}: {e}"))?;
        if last.size() != expected_size {
            return Err(format!("{op:?}: size {} != {expected_size}", last.size()));
        }
        tree = last.clone();
    }

    Ok(tree)
}
