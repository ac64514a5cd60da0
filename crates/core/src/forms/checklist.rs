use super::ExpandedSections;
use crate::checklist::{ChecklistBook, ChecklistKey, ChecklistSection, ChecklistUpdate, IndicatorChecklist};
use chrono::{DateTime, Utc};

/// The indicator checklist on the patient page.
#[derive(Clone, Debug)]
pub struct ChecklistForm {
    checklist: IndicatorChecklist,
    sections: ExpandedSections<ChecklistSection>,
}

impl ChecklistForm {
    /// Resumes the checklist saved under `key`, or starts a blank one.
    pub fn open(
        book: &ChecklistBook,
        key: ChecklistKey,
        completed_by: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let checklist = match book.get(&key) {
            Some(saved) => saved.clone(),
            None => IndicatorChecklist::blank(key.patient_id, key.date, key.shift, completed_by, now),
        };
        Self {
            checklist,
            sections: ExpandedSections::new(),
        }
    }

    pub fn checklist(&self) -> &IndicatorChecklist {
        &self.checklist
    }

    pub fn sections(&self) -> &ExpandedSections<ChecklistSection> {
        &self.sections
    }

    pub fn update(&mut self, update: ChecklistUpdate) {
        self.checklist = self.checklist.clone().apply(update);
    }

    /// Opens or closes a section. The checklist itself is unaffected.
    pub fn toggle(&mut self, section: ChecklistSection) -> bool {
        self.sections.toggle(section)
    }

    pub fn is_expanded(&self, section: ChecklistSection) -> bool {
        self.sections.is_expanded(section)
    }

    /// Signs the checklist and stores it in `book`, replacing an earlier save for the same key.
    pub fn save<'a>(
        &self,
        book: &'a mut ChecklistBook,
        completed_by: &str,
        now: DateTime<Utc>,
    ) -> &'a IndicatorChecklist {
        let mut signed = self.checklist.clone();
        signed.completed_by = completed_by.to_string();
        signed.completed_at = now;
        book.save(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{ChecklistFlag, FallType};
    use crate::model::Shift;
    use chrono::{NaiveDate, TimeZone};
    use uti_ids::RecordId;

    fn key() -> ChecklistKey {
        ChecklistKey {
            patient_id: RecordId::parse("1").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            shift: Shift::Afternoon,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 20, 17, 0, 0).unwrap()
    }

    #[test]
    fn expanding_sections_leaves_data_alone() {
        let book = ChecklistBook::new();
        let mut form = ChecklistForm::open(&book, key(), "Enfermeiro João", now());
        let before = form.checklist().clone();
        assert!(form.toggle(ChecklistSection::Phlebitis));
        assert!(form.toggle(ChecklistSection::Falls));
        assert!(!form.toggle(ChecklistSection::Phlebitis));
        assert!(form.is_expanded(ChecklistSection::Falls));
        assert_eq!(form.checklist(), &before);
    }

    #[test]
    fn saved_checklist_is_reopened_for_the_same_key() {
        let mut book = ChecklistBook::new();
        let mut form = ChecklistForm::open(&book, key(), "Enfermeiro João", now());
        form.update(ChecklistUpdate::Occurred {
            section: ChecklistSection::Falls,
            value: true,
        });
        form.update(ChecklistUpdate::Flag {
            flag: ChecklistFlag::Falls(FallType::Bed),
            value: true,
        });
        form.save(&mut book, "Enfermeira Ana", now());
        form.save(&mut book, "Enfermeira Ana", now());
        assert_eq!(book.len(), 1);

        let reopened = ChecklistForm::open(&book, key(), "Enfermeiro João", now());
        assert!(reopened.checklist().occurred(ChecklistSection::Falls));
        assert!(reopened.checklist().flag(ChecklistFlag::Falls(FallType::Bed)));
        assert_eq!(reopened.checklist().completed_by, "Enfermeira Ana");
        assert!(!reopened.is_expanded(ChecklistSection::Falls));
    }
}
