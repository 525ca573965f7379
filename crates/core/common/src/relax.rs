//! Busy-wait hint

/// Tell the processor we are spinning on a condition
///
/// Lowers to `pause` on x86 and `yield`/`isb` on ARM; a no-op elsewhere.
#[inline]
pub fn cpu_relax() {
    std::hint::spin_loop();
}

/// Spin until `ready` returns `true` or `max_spins` attempts were made
///
/// Returns `true` if the condition was observed.
pub fn spin_until(mut ready: impl FnMut() -> bool, max_spins: usize) -> bool {
    for _ in 0..max_spins {
        if ready() {
            return true;
        }
        cpu_relax();
    }
    ready()
}
