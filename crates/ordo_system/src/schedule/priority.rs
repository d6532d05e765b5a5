//! Relative ordering directives.

use variadics_please::all_tuples;

use super::{Schedule, ScheduleError};
use crate::system::{SystemDescriptor, SystemId};

/// An ordering directive attached to a system.
///
/// A directive captures the identity of another system (its target) and is
/// applied at build time with the owning system's identity as `self`.
/// Directives are plain values and can be copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    target: SystemId,
}

impl Priority {
    /// Returns the system this directive refers to.
    #[must_use]
    pub fn target(&self) -> SystemId {
        self.target
    }

    /// Applies the directive to `schedule`, treating `self_id` as the owning
    /// system.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnknownSystem`] if `self_id` is not in the
    /// schedule, or [`ScheduleError::UnknownTarget`] if the target is not.
    pub fn apply(&self, schedule: &mut Schedule, self_id: SystemId) -> Result<(), ScheduleError> {
        move_after(schedule, self_id, self.target)
    }
}

/// Requests that the owning system run after `target`.
///
/// When applied, the positions of the owning system and the target are
/// compared. If the owner currently sits before the target the two swap
/// places; otherwise nothing changes. Only those two positions ever move, so
/// chained directives depend on the order in which they are applied, and two
/// directives that contradict each other flip the pair back and forth.
///
/// # Example
///
/// ```
/// use ordo_system::schedule::{Schedule, after};
/// use ordo_system::system::SystemDescriptor;
///
/// let s1 = SystemDescriptor::builder("s1").dependencies(()).build(|_| Ok(()));
/// let s2 = SystemDescriptor::builder("s2").dependencies(()).build(|_| Ok(()));
/// let s3 = SystemDescriptor::builder("s3").dependencies(()).build(|_| Ok(()));
///
/// let mut schedule = Schedule::new();
/// for system in [&s1, &s2, &s3] {
///     schedule.add_system(system.clone());
/// }
///
/// after(&s2).apply(&mut schedule, s1.id()).unwrap();
/// assert_eq!(schedule.priority(), &[s2.id(), s1.id(), s3.id()]);
///
/// // Already after: no change.
/// after(&s2).apply(&mut schedule, s1.id()).unwrap();
/// assert_eq!(schedule.priority(), &[s2.id(), s1.id(), s3.id()]);
/// ```
#[must_use]
pub fn after(target: &SystemDescriptor) -> Priority {
    Priority { target: target.id() }
}

fn move_after(
    schedule: &mut Schedule,
    self_id: SystemId,
    target_id: SystemId,
) -> Result<(), ScheduleError> {
    let current = schedule
        .position(self_id)
        .ok_or(ScheduleError::UnknownSystem { system: self_id })?;
    let Some(target) = schedule.position(target_id) else {
        return Err(ScheduleError::UnknownTarget {
            system: schedule.name_of(self_id),
            target: target_id,
        });
    };

    if current < target {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            system = %self_id,
            target = %target_id,
            from = current,
            to = target,
            "moving system after target"
        );
        schedule.swap(current, target);
    }
    Ok(())
}

/// Types that can be turned into a list of ordering directives.
///
/// Implemented for a single [`Priority`], `Vec<Priority>`, and tuples of up to
/// 16 directives.
pub trait IntoPriorities {
    /// Returns the directives in application order.
    fn into_priorities(self) -> Vec<Priority>;
}

impl IntoPriorities for Priority {
    fn into_priorities(self) -> Vec<Priority> {
        vec![self]
    }
}

impl IntoPriorities for Vec<Priority> {
    fn into_priorities(self) -> Vec<Priority> {
        self
    }
}

macro_rules! impl_into_priorities_for_tuple {
    ($($P:ident),*) => {
        impl<$($P: IntoPriorities),*> IntoPriorities for ($($P,)*) {
            #[expect(non_snake_case, reason = "tuple elements are bound by their type names")]
            fn into_priorities(self) -> Vec<Priority> {
                let ($($P,)*) = self;
                core::iter::empty()
                    $(.chain($P.into_priorities()))*
                    .collect()
            }
        }
    };
}

all_tuples!(impl_into_priorities_for_tuple, 1, 16, P);
