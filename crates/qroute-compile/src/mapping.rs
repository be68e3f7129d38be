//! Logical to physical qubit mapping.

use qroute_ir::{LogicalQubit, PhysicalQubit};

use crate::error::{CompileError, CompileResult};

/// A bijection between logical and physical qubits.
///
/// Stored as two inverse arrays so both directions are O(1). The only
/// mutator is [`QubitMapping::swap`], which keeps
/// `logical_of(physical_of(l)) == l` for every `l`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QubitMapping {
    /// Physical image of each logical qubit.
    physical: Vec<PhysicalQubit>,
    /// Logical preimage of each physical qubit.
    logical: Vec<LogicalQubit>,
}

impl QubitMapping {
    /// Map logical qubit `i` to physical qubit `i`.
    pub fn identity(n: u32) -> Self {
        Self {
            physical: (0..n).map(PhysicalQubit).collect(),
            logical: (0..n).map(LogicalQubit).collect(),
        }
    }

    /// Build a mapping from the physical image of each logical qubit.
    ///
    /// Fails unless `images` is a permutation of `0..images.len()`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_images(images: Vec<PhysicalQubit>) -> CompileResult<Self> {
        let n = images.len();
        let mut logical = vec![None; n];
        for (l, &p) in images.iter().enumerate() {
            let slot = logical.get_mut(p.index()).ok_or_else(|| {
                CompileError::InvalidMapping(format!(
                    "q{l} is mapped to {p}, but only {n} physical qubits exist"
                ))
            })?;
            if let Some(other) = slot {
                return Err(CompileError::InvalidMapping(format!(
                    "{other} and q{l} are both mapped to {p}"
                )));
            }
            *slot = Some(LogicalQubit(l as u32));
        }
        Ok(Self {
            physical: images,
            logical: logical.into_iter().flatten().collect(),
        })
    }

    /// Physical image of a logical qubit.
    #[inline]
    pub fn physical_of(&self, l: LogicalQubit) -> PhysicalQubit {
        self.physical[l.index()]
    }

    /// Logical preimage of a physical qubit.
    #[inline]
    pub fn logical_of(&self, p: PhysicalQubit) -> LogicalQubit {
        self.logical[p.index()]
    }

    /// Exchange the physical images of two logical qubits.
    pub fn swap(&mut self, a: LogicalQubit, b: LogicalQubit) {
        let (pa, pb) = (self.physical_of(a), self.physical_of(b));
        self.physical.swap(a.index(), b.index());
        self.logical.swap(pa.index(), pb.index());
    }

    /// Evaluate `f` with `a` and `b` swapped, then restore the mapping.
    ///
    /// The swap is undone when the guard drops, so the mapping is restored
    /// even if `f` unwinds.
    pub fn with_swap<R>(
        &mut self,
        a: LogicalQubit,
        b: LogicalQubit,
        f: impl FnOnce(&Self) -> R,
    ) -> R {
        self.swap(a, b);
        let guard = SwapGuard {
            mapping: self,
            a,
            b,
        };
        f(&*guard.mapping)
    }

    /// Physical image of every logical qubit, indexed by logical qubit.
    pub fn images(&self) -> &[PhysicalQubit] {
        &self.physical
    }

    /// Number of qubits.
    pub fn len(&self) -> usize {
        self.physical.len()
    }

    /// Check if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }
}

struct SwapGuard<'a> {
    mapping: &'a mut QubitMapping,
    a: LogicalQubit,
    b: LogicalQubit,
}

impl Drop for SwapGuard<'_> {
    fn drop(&mut self) {
        self.mapping.swap(self.a, self.b);
    }
}
