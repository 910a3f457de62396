//! Arc length and its inverse.
//!
//! Segment lengths and their inverses come from `kurbo`'s
//! [`ParamCurveArclen`](kurbo::ParamCurveArclen). This module adds the path
//! level: summing segments, clamping on open paths and wrapping whole turns
//! on cycles.

use super::Path;
use crate::error::GraphicsError;
use crate::types::{NEAR_ZERO, Scalar, index_to_scalar};

impl Path {
    /// Total arc length (`arclength`).
    #[must_use]
    pub fn arc_length(&self) -> Scalar {
        self.segments().map(|seg| seg.arc_length()).sum()
    }

    /// Time at which the arc length from the start reaches `len`
    /// (`arctime len of p`).
    ///
    /// Open paths clamp to `[0, path_length]`. On a cycle whole turns are
    /// added, so a length of `k` perimeters lands on time `k * path_length`.
    pub fn arc_time(&self, len: Scalar) -> Result<Scalar, GraphicsError> {
        if !len.is_finite() {
            return Err(GraphicsError::NonFinite { what: "arc length" });
        }
        let lengths: Vec<Scalar> = self.segments().map(|seg| seg.arc_length()).collect();
        let total: Scalar = lengths.iter().sum();
        let n = index_to_scalar(lengths.len());

        if total < NEAR_ZERO {
            return Ok(if len > 0.0 { n } else { 0.0 });
        }
        if !self.is_cyclic() {
            if len <= 0.0 {
                return Ok(0.0);
            }
            if len >= total {
                return Ok(n);
            }
            return Ok(self.arc_time_within(&lengths, len));
        }

        let turns = (len / total).floor();
        let rest = len - turns * total;
        Ok(turns.mul_add(n, self.arc_time_within(&lengths, rest)))
    }

    /// Time for a length in `[0, total)`, given the segment lengths.
    fn arc_time_within(&self, lengths: &[Scalar], len: Scalar) -> Scalar {
        let mut remaining = len;
        for (i, (&seg_len, seg)) in lengths.iter().zip(self.segments()).enumerate() {
            if remaining <= seg_len {
                return index_to_scalar(i) + seg.arc_time(remaining);
            }
            remaining -= seg_len;
        }
        index_to_scalar(lengths.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
