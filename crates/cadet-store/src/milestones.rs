use chrono::{DateTime, Utc};

use cadet_shared::constants::{PROGRESS_MAX, PROGRESS_MIN};
use cadet_shared::{Id, Milestone, MilestoneStatus, NewMilestone, Role, Transition, Validate};

use crate::error::{Result, StoreError};
use crate::store::{transition, Store};

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        return PROGRESS_MIN;
    }
    progress.clamp(PROGRESS_MIN, PROGRESS_MAX)
}

impl Store {
    pub fn create_milestone(&mut self, new: NewMilestone, now: DateTime<Utc>) -> Result<Milestone> {
        new.validate()?;
        self.check_user("studentId", new.student_id, Some(Role::Student))?;
        if let Some(approver) = new.approved_by {
            self.check_user("approvedBy", approver, Some(Role::Instructor))?;
        }

        let status = new.status.unwrap_or_default();
        let completion_date = match (status, new.completion_date) {
            (MilestoneStatus::Completed, None) => Some(now),
            (_, date) => date,
        };

        let milestone = self
            .milestones
            .insert_with(|id| Milestone {
                id,
                student_id: new.student_id,
                title: new.title,
                description: new.description,
                required_hours: new.required_hours,
                status,
                completion_date,
                approved_by: new.approved_by,
                progress: clamp_progress(new.progress.unwrap_or(PROGRESS_MIN)),
            })
            .clone();

        tracing::debug!(id = milestone.id, student = milestone.student_id, "milestone created");
        Ok(milestone)
    }

    pub fn get_milestone(&self, id: Id) -> Option<&Milestone> {
        self.milestones.get(id)
    }

    pub fn milestones_by_student(&self, student_id: Id) -> Vec<&Milestone> {
        self.milestones
            .values()
            .filter(|m| m.student_id == student_id)
            .collect()
    }

    /// Record progress. Without an explicit status, reaching 100 completes
    /// the milestone and any positive value marks it in progress. The
    /// completion date is stamped once and never moved.
    pub fn update_milestone_progress(
        &mut self,
        id: Id,
        progress: f64,
        status: Option<MilestoneStatus>,
        now: DateTime<Utc>,
        strict: bool,
    ) -> Result<Milestone> {
        let milestone = self
            .milestones
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Milestone", id))?;

        let progress = clamp_progress(progress);
        let next = match status {
            Some(status) => status,
            None if progress >= PROGRESS_MAX => MilestoneStatus::Completed,
            None if progress > PROGRESS_MIN => MilestoneStatus::InProgress,
            None => milestone.status,
        };
        transition(&mut milestone.status, next, strict)?;
        milestone.progress = progress;
        if milestone.status == MilestoneStatus::Completed && milestone.completion_date.is_none() {
            milestone.completion_date = Some(now);
        }

        tracing::debug!(id, progress, status = milestone.status.as_str(), "milestone progress updated");
        Ok(milestone.clone())
    }

    /// Instructor sign-off. Safe to repeat: the first completion date wins.
    pub fn complete_milestone(
        &mut self,
        id: Id,
        instructor_id: Id,
        now: DateTime<Utc>,
    ) -> Result<Milestone> {
        if !self.milestones.contains(id) {
            return Err(StoreError::not_found("Milestone", id));
        }
        self.check_user("approvedBy", instructor_id, Some(Role::Instructor))?;

        let milestone = self
            .milestones
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Milestone", id))?;
        milestone.status = MilestoneStatus::Completed;
        milestone.progress = PROGRESS_MAX;
        milestone.approved_by = Some(instructor_id);
        milestone.completion_date.get_or_insert(now);

        tracing::info!(id, instructor = instructor_id, "milestone completed");
        Ok(milestone.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, at};

    fn new_milestone(student: Id) -> NewMilestone {
        NewMilestone {
            student_id: student,
            title: "First Cross-Country Solo".into(),
            description: None,
            required_hours: Some(20.0),
            status: None,
            completion_date: None,
            approved_by: None,
            progress: None,
        }
    }

    fn setup() -> (Store, Id, Id, Id) {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let alex = testutil::student(&mut store, "alex");
        let id = store
            .create_milestone(new_milestone(alex), at(2023, 1, 1, 0))
            .unwrap()
            .id;
        (store, sarah, alex, id)
    }

    #[test]
    fn defaults_on_create() {
        let (store, _, alex, id) = setup();
        let m = store.get_milestone(id).unwrap();
        assert_eq!(m.status, MilestoneStatus::NotStarted);
        assert_eq!(m.progress, 0.0);
        assert_eq!(m.completion_date, None);
        assert_eq!(store.milestones_by_student(alex).len(), 1);
    }

    #[test]
    fn created_completed_gets_a_completion_date() {
        let mut store = Store::new();
        let alex = testutil::student(&mut store, "alex");
        let mut new = new_milestone(alex);
        new.status = Some(MilestoneStatus::Completed);
        new.progress = Some(100.0);
        let now = at(2023, 3, 15, 0);
        let m = store.create_milestone(new, now).unwrap();
        assert_eq!(m.completion_date, Some(now));
    }

    #[test]
    fn progress_derives_status() {
        let (mut store, _, _, id) = setup();
        let now = at(2023, 6, 1, 0);

        let m = store.update_milestone_progress(id, 61.0, None, now, false).unwrap();
        assert_eq!(m.status, MilestoneStatus::InProgress);
        assert_eq!(m.completion_date, None);

        let m = store.update_milestone_progress(id, 100.0, None, now, false).unwrap();
        assert_eq!(m.status, MilestoneStatus::Completed);
        assert_eq!(m.completion_date, Some(now));
        assert_eq!(m.approved_by, None);
    }

    #[test]
    fn explicit_status_wins_over_progress() {
        let (mut store, _, _, id) = setup();
        let m = store
            .update_milestone_progress(id, 100.0, Some(MilestoneStatus::InProgress), at(2023, 6, 1, 0), false)
            .unwrap();
        assert_eq!(m.status, MilestoneStatus::InProgress);
        assert_eq!(m.progress, 100.0);
    }

    #[test]
    fn progress_is_clamped() {
        let (mut store, _, _, id) = setup();
        let m = store.update_milestone_progress(id, 250.0, None, at(2023, 6, 1, 0), false).unwrap();
        assert_eq!(m.progress, 100.0);
        let m = store
            .update_milestone_progress(id, -5.0, Some(MilestoneStatus::InProgress), at(2023, 6, 1, 0), false)
            .unwrap();
        assert_eq!(m.progress, 0.0);
    }

    #[test]
    fn zero_progress_keeps_status() {
        let (mut store, _, _, id) = setup();
        let m = store.update_milestone_progress(id, 0.0, None, at(2023, 6, 1, 0), false).unwrap();
        assert_eq!(m.status, MilestoneStatus::NotStarted);
    }

    #[test]
    fn complete_is_idempotent_and_keeps_first_date() {
        let (mut store, sarah, _, id) = setup();
        let first = at(2023, 4, 2, 0);
        let later = at(2023, 9, 9, 0);

        let once = store.complete_milestone(id, sarah, first).unwrap();
        let twice = store.complete_milestone(id, sarah, later).unwrap();

        assert_eq!(once.status, MilestoneStatus::Completed);
        assert_eq!(once.progress, 100.0);
        assert_eq!(once.approved_by, Some(sarah));
        assert_eq!(once, twice);
        assert_eq!(twice.completion_date, Some(first));
    }

    #[test]
    fn complete_does_not_overwrite_progress_stamp() {
        let (mut store, sarah, _, id) = setup();
        let stamped = at(2023, 5, 1, 0);
        store.update_milestone_progress(id, 100.0, None, stamped, false).unwrap();
        let m = store.complete_milestone(id, sarah, at(2023, 5, 20, 0)).unwrap();
        assert_eq!(m.completion_date, Some(stamped));
        assert_eq!(m.approved_by, Some(sarah));
    }

    #[test]
    fn missing_milestone_is_not_found() {
        let (mut store, sarah, _, id) = setup();
        assert!(matches!(
            store.complete_milestone(id + 10, sarah, at(2023, 1, 1, 0)),
            Err(StoreError::NotFound { entity: "Milestone", .. })
        ));
        assert!(matches!(
            store.update_milestone_progress(id + 10, 5.0, None, at(2023, 1, 1, 0), false),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn strict_mode_refuses_reopening() {
        let (mut store, sarah, _, id) = setup();
        store.complete_milestone(id, sarah, at(2023, 1, 1, 0)).unwrap();
        let err = store
            .update_milestone_progress(id, 50.0, None, at(2023, 1, 2, 0), true)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
        assert_eq!(store.get_milestone(id).unwrap().progress, 100.0);
    }
}
