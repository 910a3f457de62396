//! `buildcycle`: a closed region bounded by several paths.
//!
//! Follows the plain macro package: path `i` is entered at its first meeting
//! with path `i - 1` and left at its last meeting with path `i + 1`
//! (cyclically). The pieces are then chained, with each shared cut point
//! merged into a single knot.

use tracing::debug;

use crate::error::GraphicsError;
use crate::intersection::intersection_times;
use crate::path::Path;
use crate::style::Style;
use crate::types::{Knot, index_to_scalar};

/// Build one closed path from `paths`, in order.
///
/// Fails with [`GraphicsError::TooFewPaths`] for an empty list and with
/// [`GraphicsError::BuildCycle`] when two neighbours never meet.
pub fn build_cycle(paths: &[Path]) -> Result<Path, GraphicsError> {
    let k = paths.len();
    if k == 0 {
        return Err(GraphicsError::TooFewPaths);
    }

    // ta[i]: where path i is entered; tb[i]: where it is left.
    let mut ta = vec![0.0; k];
    let mut tb = vec![0.0; k];
    for i in 0..k {
        let prev = (i + k - 1) % k;
        let back = paths[prev].reversed();
        let ix = intersection_times(&paths[i], &back).ok_or(GraphicsError::BuildCycle {
            first: prev,
            second: i,
        })?;
        ta[i] = ix.t1;
        tb[prev] = index_to_scalar(paths[prev].path_length()) - ix.t2;
    }

    let mut knots: Vec<Knot> = Vec::new();
    for (i, path) in paths.iter().enumerate() {
        let piece = path.subpath(ta[i], tb[i])?;
        append_merged(&mut knots, piece.knots());
    }

    if knots.len() > 1 {
        if let Some(last) = knots.pop() {
            knots[0].left = last.left;
        }
    }
    debug!(paths = k, knots = knots.len(), "built cycle");
    Ok(Path::from_parts(knots, true, Style::default()))
}

/// Append `piece`, fusing its first knot with the current last knot.
fn append_merged(knots: &mut Vec<Knot>, piece: &[Knot]) {
    let Some((first, rest)) = piece.split_first() else {
        return;
    };
    match knots.last_mut() {
        Some(last) => {
            last.point = first.point;
            last.right = first.right;
        }
        None => knots.push(*first),
    }
    knots.extend_from_slice(rest);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
