use std::collections::HashSet;

use crate::config::RosterSeed;
use crate::error::RosterError;
use crate::model::student::Student;
use crate::service::dto::StudentSummary;

#[derive(Debug, Clone)]
pub struct RosterStore {
    window_days: usize,
    students: Vec<Student>,
}

impl RosterStore {
    pub fn new(seed: RosterSeed) -> Result<Self, RosterError> {
        if seed.window_days == 0 {
            return Err(RosterError::EmptyWindow);
        }

        let mut seen = HashSet::new();
        for (pos, student) in seed.students.iter().enumerate() {
            if student.name.trim().is_empty() {
                return Err(RosterError::EmptyName(pos));
            }
            if !seen.insert(student.name.as_str()) {
                return Err(RosterError::DuplicateName(student.name.clone()));
            }
            if student.attendance.len() != seed.window_days {
                return Err(RosterError::WindowMismatch {
                    name: student.name.clone(),
                    expected: seed.window_days,
                    actual: student.attendance.len(),
                });
            }
        }

        Ok(Self {
            window_days: seed.window_days,
            students: seed.students,
        })
    }

    pub fn list(&self) -> &[Student] {
        &self.students
    }

    pub fn get(&self, name: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.students.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn group<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Student> + 'a {
        self.students.iter().filter(move |s| s.group == label)
    }

    pub fn window_days(&self) -> usize {
        self.window_days
    }

    pub fn detention_status(&self, student: &Student) -> bool {
        student.detention_triggered()
    }

    pub fn attendance_percent(&self, student: &Student) -> u8 {
        student.attendance_percent()
    }

    pub fn poor_count(&self, student: &Student) -> usize {
        student.poor_count()
    }

    pub fn behaviour_description(&self, student: &Student) -> String {
        student.behaviour_description()
    }

    pub fn summaries(&self) -> Vec<StudentSummary> {
        self.students.iter().map(StudentSummary::from_student).collect()
    }

    pub fn summary(&self, name: &str) -> Option<StudentSummary> {
        self.get(name).map(StudentSummary::from_student)
    }
}
