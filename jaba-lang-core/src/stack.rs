//! Native stack growth for the recursive parts of parsing, rendering and
//! evaluation.

/// Below this much remaining stack a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;

const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, first growing the native stack if it is close to running out.
/// Wrap every call that recurses once per level of the expression tree.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
