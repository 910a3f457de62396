//! Incremental linear equations over scalar unknowns.
//!
//! This is the dependency-list scheme of `mp.web` §24. Every unknown is
//! either *independent* or *dependent*, and a dependent unknown is stored as
//! a linear combination of independent ones plus a constant:
//!
//! `α₁v₁ + α₂v₂ + ... + αₖvₖ + β`
//!
//! Adding an equation first rewrites it in terms of independents only, then
//! pivots on its largest coefficient: that unknown becomes dependent and is
//! substituted away everywhere else. An unknown whose list has shrunk to the
//! constant `β` is known.

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

use knotwork_graphics::Scalar;
use tracing::trace;

// ---------------------------------------------------------------------------
// Unknowns
// ---------------------------------------------------------------------------

/// Index of one scalar unknown in a [`LinearSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnknownId(pub usize);

impl UnknownId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Linear forms
// ---------------------------------------------------------------------------

/// `Σ cᵢ·uᵢ + constant`.
///
/// Terms are kept sorted by decreasing unknown id with no repeated ids, so
/// two forms can be combined in one merge pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearForm {
    terms: Vec<(UnknownId, Scalar)>,
    constant: Scalar,
}

impl LinearForm {
    #[must_use]
    pub const fn constant(value: Scalar) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// `1 · id`.
    #[must_use]
    pub fn unknown(id: UnknownId) -> Self {
        Self::term(id, 1.0)
    }

    /// `coeff · id`.
    #[must_use]
    pub fn term(id: UnknownId, coeff: Scalar) -> Self {
        let terms = if coeff == 0.0 {
            Vec::new()
        } else {
            vec![(id, coeff)]
        };
        Self {
            terms,
            constant: 0.0,
        }
    }

    #[must_use]
    pub fn terms(&self) -> &[(UnknownId, Scalar)] {
        &self.terms
    }

    #[must_use]
    pub const fn constant_term(&self) -> Scalar {
        self.constant
    }

    /// The value of the form when it has no unknowns left.
    #[must_use]
    pub fn as_constant(&self) -> Option<Scalar> {
        self.terms.is_empty().then_some(self.constant)
    }

    /// Coefficient of `id`, zero when absent.
    #[must_use]
    pub fn coefficient(&self, id: UnknownId) -> Scalar {
        self.terms
            .iter()
            .find(|(v, _)| *v == id)
            .map_or(0.0, |&(_, c)| c)
    }

    /// `self + factor · other`, dropping coefficients whose magnitude is
    /// not above `threshold`.
    #[must_use]
    pub fn add_scaled(&self, other: &Self, factor: Scalar, threshold: Scalar) -> Self {
        let mut terms = Vec::with_capacity(self.terms.len() + other.terms.len());
        let mut push = |id: UnknownId, c: Scalar| {
            if c.abs() > threshold {
                terms.push((id, c));
            }
        };

        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            let (a, ca) = self.terms[i];
            let (b, cb) = other.terms[j];
            match a.cmp(&b) {
                Ordering::Greater => {
                    push(a, ca);
                    i += 1;
                }
                Ordering::Less => {
                    push(b, factor * cb);
                    j += 1;
                }
                Ordering::Equal => {
                    push(a, factor.mul_add(cb, ca));
                    i += 1;
                    j += 1;
                }
            }
        }
        for &(a, ca) in &self.terms[i..] {
            push(a, ca);
        }
        for &(b, cb) in &other.terms[j..] {
            push(b, factor * cb);
        }

        Self {
            terms,
            constant: factor.mul_add(other.constant, self.constant),
        }
    }

    /// Replace `id` by `replacement` wherever it occurs.
    #[must_use]
    pub fn substitute(&self, id: UnknownId, replacement: &Self, threshold: Scalar) -> Self {
        let coeff = self.coefficient(id);
        if coeff == 0.0 {
            return self.clone();
        }
        let rest = Self {
            terms: self.terms.iter().copied().filter(|(v, _)| *v != id).collect(),
            constant: self.constant,
        };
        rest.add_scaled(replacement, coeff, threshold)
    }

    /// Multiply every term and the constant by `factor`.
    pub fn scale(&mut self, factor: Scalar) {
        for (_, c) in &mut self.terms {
            *c *= factor;
        }
        self.constant *= factor;
    }

    /// The term with the largest absolute coefficient.
    fn pivot_term(&self) -> Option<(UnknownId, Scalar)> {
        self.terms
            .iter()
            .copied()
            .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
    }
}

impl Add for LinearForm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.add_scaled(&rhs, 1.0, 0.0)
    }
}

impl Sub for LinearForm {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.add_scaled(&rhs, -1.0, 0.0)
    }
}

impl Mul<Scalar> for LinearForm {
    type Output = Self;

    fn mul(mut self, rhs: Scalar) -> Self {
        if rhs == 0.0 {
            return Self::default();
        }
        self.scale(rhs);
        self
    }
}

impl Neg for LinearForm {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

// ---------------------------------------------------------------------------
// The system
// ---------------------------------------------------------------------------

/// What adding one equation did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The unknown became dependent on the remaining independents.
    Pivoted(UnknownId),
    /// The equation followed from the ones already added.
    Redundant,
    /// The equation contradicts the ones already added; the payload is how
    /// far from zero it reduced to.
    Inconsistent(Scalar),
}

/// A growing set of linear equations, each of the form `form = 0`.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// `None` for independent unknowns.
    deps: Vec<Option<LinearForm>>,
    threshold: Scalar,
    tolerance: Scalar,
}

impl LinearSystem {
    /// `unknowns` fresh independents. Coefficients at or below `threshold`
    /// are dropped; an equation that reduces to a constant larger than
    /// `tolerance` is inconsistent.
    #[must_use]
    pub fn new(unknowns: usize, threshold: Scalar, tolerance: Scalar) -> Self {
        Self {
            deps: vec![None; unknowns],
            threshold,
            tolerance,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// `form` rewritten in terms of independent unknowns only.
    #[must_use]
    pub fn reduce(&self, form: &LinearForm) -> LinearForm {
        let mut out = LinearForm::constant(form.constant);
        for &(id, c) in &form.terms {
            out = match self.deps.get(id.index()) {
                Some(Some(dep)) => out.add_scaled(dep, c, self.threshold),
                _ => out.add_scaled(&LinearForm::unknown(id), c, self.threshold),
            };
        }
        out
    }

    /// Add the equation `form = 0`.
    pub fn add_equation(&mut self, form: &LinearForm) -> Outcome {
        let reduced = self.reduce(form);
        let Some((pivot, coeff)) = reduced.pivot_term() else {
            let residual = reduced.constant;
            return if residual.abs() > self.tolerance {
                Outcome::Inconsistent(residual)
            } else {
                Outcome::Redundant
            };
        };

        // pivot = -(reduced - coeff·pivot) / coeff
        let mut dep = reduced.substitute(pivot, &LinearForm::default(), self.threshold);
        dep.scale(-1.0 / coeff);
        trace!(unknown = pivot.0, coeff, terms = dep.terms.len(), "pivot");

        for other in self.deps.iter_mut().flatten() {
            if other.coefficient(pivot) != 0.0 {
                *other = other.substitute(pivot, &dep, self.threshold);
            }
        }
        if let Some(slot) = self.deps.get_mut(pivot.index()) {
            *slot = Some(dep);
        }
        Outcome::Pivoted(pivot)
    }

    /// The value of `id` once the equations pin it down.
    #[must_use]
    pub fn value(&self, id: UnknownId) -> Option<Scalar> {
        self.deps
            .get(id.index())
            .and_then(Option::as_ref)
            .and_then(LinearForm::as_constant)
    }

    /// Whether `id` has not been pinned down yet.
    #[must_use]
    pub fn is_free(&self, id: UnknownId) -> bool {
        self.value(id).is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
