//! Phase A of reconciliation: proportional remapping of anchor positions.

use alloc::vec::Vec;

use crate::{CollisionPolicy, Error, ReconcileOptions, Result};

/// Maps each `index_before` onto the current collection proportionally.
///
/// The scaled index of `b` is `round(b * current_count / previous_count)` (halves round up),
/// clamped into `[0, current_count - 1]`. Indices that collide are shifted apart according to
/// `options.collision` so the result is strictly ascending.
///
/// `indices_before` must be strictly ascending and below `previous_count`.
pub fn scale_indices(
    options: &ReconcileOptions,
    previous_count: usize,
    current_count: usize,
    indices_before: &[usize],
) -> Result<Vec<usize>> {
    if indices_before.is_empty() {
        return Ok(Vec::new());
    }
    if indices_before.len() > current_count {
        return Err(Error::NoRoom {
            anchors: indices_before.len(),
            count: current_count,
        });
    }
    let max_index = current_count - 1;

    let mut scaled = Vec::with_capacity(indices_before.len());
    let mut previous: Option<usize> = None;
    for &index in indices_before {
        if index >= previous_count {
            return Err(Error::IndexBeforeOutOfRange {
                index,
                count: previous_count,
            });
        }
        if let Some(previous) = previous {
            if index == previous {
                return Err(Error::DuplicateIndexBefore(index));
            }
            if index < previous {
                return Err(Error::UnsortedAnchors {
                    previous,
                    next: index,
                });
            }
        }
        previous = Some(index);

        let candidate = proportional(index, previous_count, current_count);
        place(&mut scaled, candidate, max_index, options.collision)?;
    }

    fdebug!(?indices_before, ?scaled, "scaled indices");
    Ok(scaled)
}

/// `round(index * current / previous)` with halves rounded up, evaluated exactly.
fn proportional(index: usize, previous_count: usize, current_count: usize) -> usize {
    let numerator = 2 * index as u128 * current_count as u128 + previous_count as u128;
    let denominator = 2 * previous_count as u128;
    (numerator / denominator) as usize
}

/// Start of the run of consecutive values (`.., v - 2, v - 1, v`) ending at the last value.
fn run_start(values: &[usize]) -> usize {
    let mut i = values.len() - 1;
    while i > 0 && values[i - 1] + 1 == values[i] {
        i -= 1;
    }
    i
}

/// Appends `candidate` to the strictly ascending `values`, resolving a collision with the last
/// placed value.
///
/// A candidate at or below the last value collides with it (it can fall below only after an
/// earlier right shift). Shifting left decrements the whole run ending at the last value and
/// places the candidate on the freed slot; shifting right places it just past the last value.
fn place(
    values: &mut Vec<usize>,
    candidate: usize,
    max_index: usize,
    policy: CollisionPolicy,
) -> Result<usize> {
    let candidate = candidate.min(max_index);
    let Some(&last) = values.last() else {
        values.push(candidate);
        return Ok(candidate);
    };
    if candidate > last {
        values.push(candidate);
        return Ok(candidate);
    }

    let start = run_start(values);
    let can_shift_left = values[start] > 0;
    let can_shift_right = last < max_index;
    let shift_left = match policy {
        CollisionPolicy::PreferLeft if can_shift_left => true,
        CollisionPolicy::PreferRight if can_shift_right => false,
        _ if can_shift_left => true,
        _ if can_shift_right => false,
        _ => {
            return Err(Error::ScaleCollision {
                index: candidate,
                max_index,
            });
        }
    };

    let placed = if shift_left {
        for value in &mut values[start..] {
            *value -= 1;
        }
        last
    } else {
        last + 1
    };
    if shift_left != (policy == CollisionPolicy::PreferLeft) {
        fwarn!(
            candidate,
            placed,
            ?policy,
            "scaled index collision resolved against the preferred direction"
        );
    } else {
        ftrace!(candidate, placed, shift_left, run_start = start, "scaled index collision");
    }
    values.push(placed);
    Ok(placed)
}
