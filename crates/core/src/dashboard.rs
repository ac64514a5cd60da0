//! Bed-side dashboard: per-patient cards with decubitus status and the nursing task list.

use crate::constants::{NEW_TASK_DESCRIPTION, NEW_TASK_DUE_TIME, NEW_TASK_TITLE};
use crate::model::{hh_mm, DecubitusBand, Patient, Task, TaskPriority, TaskStatus};
use crate::roster::Roster;
use crate::{WardError, WardResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uti_ids::{RecordId, TimestampIdGenerator};

/// One patient's card on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientCard {
    pub patient: Patient,
    pub minutes_since_turn: u32,
    pub decubitus: DecubitusBand,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    tasks: Vec<Task>,
}

impl Dashboard {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_for<'a>(&'a self, patient_id: &'a RecordId) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| &t.patient_id == patient_id)
    }

    /// Cards for every roster patient, in roster order.
    pub fn cards(&self, roster: &Roster, now: DateTime<Utc>) -> Vec<PatientCard> {
        roster
            .all()
            .iter()
            .map(|detail| {
                let patient = &detail.patient;
                let minutes = patient.minutes_since_turn(now);
                PatientCard {
                    patient: patient.clone(),
                    minutes_since_turn: minutes,
                    decubitus: DecubitusBand::for_minutes(minutes),
                    tasks: self.tasks_for(&patient.id).cloned().collect(),
                }
            })
            .collect()
    }

    /// Appends a default pending task for the patient.
    pub fn add_task(
        &mut self,
        patient_id: RecordId,
        assigned_to: &str,
        ids: &mut TimestampIdGenerator,
        now: DateTime<Utc>,
    ) -> WardResult<&Task> {
        let due_time = hh_mm::parse(NEW_TASK_DUE_TIME)
            .map_err(|e| WardError::InvalidInput(format!("bad default due time: {e}")))?;
        let task = Task {
            id: ids.next_record_id_at(now),
            patient_id,
            title: NEW_TASK_TITLE.into(),
            description: NEW_TASK_DESCRIPTION.into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            assigned_to: assigned_to.into(),
            due_time,
            created_at: now,
        };
        tracing::info!(task_id = %task.id, patient_id = %task.patient_id, "task added");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    fn require_mut(&mut self, id: &RecordId) -> WardResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| WardError::not_found("task", id))
    }

    /// Moves a task to `status`.
    ///
    /// # Errors
    ///
    /// [`WardError::IllegalTransition`] if `status` is behind the task's current status.
    pub fn set_task_status(&mut self, id: &RecordId, status: TaskStatus) -> WardResult<&Task> {
        let task = self.require_mut(id)?;
        if !task.status.can_move_to(status) {
            tracing::warn!(task_id = %id, from = %task.status, to = %status, "rejected task transition");
            return Err(WardError::IllegalTransition {
                id: id.clone(),
                from: task.status.as_str(),
                to: status.as_str(),
            });
        }
        task.status = status;
        Ok(&*task)
    }

    /// Moves a task one step forward.
    pub fn advance_task(&mut self, id: &RecordId) -> WardResult<&Task> {
        let current = self.require_mut(id)?.status;
        match current.next() {
            Some(next) => self.set_task_status(id, next),
            None => Err(WardError::IllegalTransition {
                id: id.clone(),
                from: current.as_str(),
                to: current.as_str(),
            }),
        }
    }

    pub fn remove_task(&mut self, id: &RecordId) -> WardResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| WardError::not_found("task", id))?;
        tracing::info!(task_id = %id, "task removed");
        Ok(self.tasks.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed;
    use chrono::{NaiveTime, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 16, 0, 0).unwrap()
    }

    fn fixture() -> (Dashboard, Roster) {
        let data = seed(now()).unwrap();
        (Dashboard::new(data.tasks), Roster::new(data.patients))
    }

    fn id(raw: &str) -> RecordId {
        RecordId::parse(raw).unwrap()
    }

    #[test]
    fn cards_follow_roster_and_bands() {
        let (dashboard, roster) = fixture();
        let cards = dashboard.cards(&roster, now());
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].decubitus, DecubitusBand::Normal);
        assert_eq!(cards[0].tasks.len(), 1);
        assert_eq!(cards[2].decubitus, DecubitusBand::Critical);
        assert_eq!(cards[3].decubitus, DecubitusBand::Attention);
    }

    #[test]
    fn added_task_uses_defaults() {
        let (mut dashboard, _) = fixture();
        let mut ids = TimestampIdGenerator::new();
        let task = dashboard
            .add_task(id("3"), "Enfermeiro João", &mut ids, now())
            .unwrap()
            .clone();
        assert_eq!(task.title, "Nova Tarefa");
        assert_eq!(task.description, "Descrição da tarefa");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.due_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(task.assigned_to, "Enfermeiro João");
        assert_eq!(dashboard.tasks().last().unwrap().id, task.id);
    }

    #[test]
    fn tasks_move_forward_only() {
        let (mut dashboard, _) = fixture();
        let task = id("1");
        assert_eq!(dashboard.advance_task(&task).unwrap().status, TaskStatus::InProgress);
        assert!(matches!(
            dashboard.set_task_status(&task, TaskStatus::Pending),
            Err(WardError::IllegalTransition { .. })
        ));
        assert_eq!(
            dashboard.set_task_status(&task, TaskStatus::Completed).unwrap().status,
            TaskStatus::Completed
        );
        assert!(dashboard.advance_task(&task).is_err());
    }

    #[test]
    fn remove_task_drops_it() {
        let (mut dashboard, _) = fixture();
        let removed = dashboard.remove_task(&id("2")).unwrap();
        assert_eq!(removed.title, "Administração de medicação");
        assert_eq!(dashboard.tasks().len(), 1);
        assert!(matches!(
            dashboard.remove_task(&id("2")),
            Err(WardError::NotFound { kind: "task", .. })
        ));
    }
}
