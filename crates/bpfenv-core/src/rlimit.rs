//! Best-effort `RLIMIT_MEMLOCK` escalation.
//!
//! Map and program creation charge locked memory on older kernels, so the
//! soft limit is raised once before any kernel object is touched. Every
//! failure here is reported but callers are expected to log it and carry on.

use bpfenv_common::error::{BpfEnvError, Result};
use bpfenv_common::types::LimitPair;

/// Read and write access to the process's lockable-memory limits.
pub trait LimitSource {
    /// Returns the current soft and hard limits.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the limits cannot be read.
    fn get(&self) -> std::io::Result<LimitPair>;

    /// Replaces both limits.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the kernel rejects the new limits.
    fn set(&self, limits: LimitPair) -> std::io::Result<()>;
}

/// [`LimitSource`] backed by `getrlimit(2)`/`setrlimit(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostLimits;

#[cfg(target_os = "linux")]
impl LimitSource for HostLimits {
    fn get(&self) -> std::io::Result<LimitPair> {
        use nix::sys::resource::{Resource, getrlimit};

        let (soft, hard) = getrlimit(Resource::RLIMIT_MEMLOCK)?;
        Ok(LimitPair::new(from_rlim(soft), from_rlim(hard)))
    }

    fn set(&self, limits: LimitPair) -> std::io::Result<()> {
        use nix::sys::resource::{Resource, setrlimit};

        setrlimit(
            Resource::RLIMIT_MEMLOCK,
            to_rlim(limits.soft),
            to_rlim(limits.hard),
        )?;
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
impl LimitSource for HostLimits {
    fn get(&self) -> std::io::Result<LimitPair> {
        Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
    }

    fn set(&self, _limits: LimitPair) -> std::io::Result<()> {
        Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
    }
}

#[cfg(target_os = "linux")]
fn from_rlim(value: libc::rlim_t) -> u64 {
    if value == libc::RLIM_INFINITY {
        LimitPair::UNLIMITED
    } else {
        u64::from(value)
    }
}

#[cfg(target_os = "linux")]
fn to_rlim(value: u64) -> libc::rlim_t {
    if value == LimitPair::UNLIMITED {
        libc::RLIM_INFINITY
    } else {
        libc::rlim_t::try_from(value).unwrap_or(libc::RLIM_INFINITY)
    }
}

/// Computes the limits to apply, or `None` when `current` already satisfies
/// `minimum`.
///
/// With a minimum the soft limit becomes exactly that minimum; without one
/// it doubles. The hard limit is raised to the new soft limit if needed and
/// never lowered.
///
/// # Errors
///
/// Returns `LimitUnavailable` if the soft limit is unlimited or zero.
pub fn plan_raise(current: LimitPair, minimum: Option<u64>) -> Result<Option<LimitPair>> {
    if current.is_unlimited() || current.soft == 0 {
        tracing::debug!(soft = current.soft, "current rlimit is infinity or 0, not raising");
        return Err(BpfEnvError::LimitUnavailable {
            message: "current rlimit is infinity or 0".into(),
            source: None,
        });
    }

    let soft = match minimum.filter(|&m| m > 0) {
        Some(min) if current.soft >= min => {
            tracing::debug!(soft = current.soft, minimum = min, "current rlimit already >= minimum");
            return Ok(None);
        }
        Some(min) => {
            tracing::debug!(minimum = min, "setting rlimit to minimum");
            min
        }
        None => {
            tracing::debug!(soft = current.soft, "doubling current rlimit");
            current.soft.saturating_mul(2)
        }
    };

    Ok(Some(LimitPair::new(soft, current.hard.max(soft))))
}

/// Raises the memlock soft limit through `source`.
///
/// # Errors
///
/// Returns `LimitUnavailable` if the limits cannot be read, are unlimited or
/// zero, or cannot be applied.
pub fn raise_lock_limit(source: &impl LimitSource, minimum: Option<u64>) -> Result<()> {
    let current = source.get().map_err(|e| {
        tracing::warn!(error = %e, "couldn't get current rlimit");
        BpfEnvError::LimitUnavailable {
            message: "couldn't get current rlimit".into(),
            source: Some(e),
        }
    })?;

    let Some(next) = plan_raise(current, minimum)? else {
        return Ok(());
    };

    source.set(next).map_err(|e| {
        tracing::warn!(error = %e, soft = next.soft, hard = next.hard, "couldn't raise rlimit");
        BpfEnvError::LimitUnavailable {
            message: format!("couldn't raise rlimit: {e}"),
            source: Some(e),
        }
    })?;
    tracing::debug!(soft = next.soft, hard = next.hard, "raised memlock rlimit");
    Ok(())
}
