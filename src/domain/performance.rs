use crate::domain::record::ExportMap;
use crate::utils::error::{RecordError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use std::fmt;
use std::marker::PhantomData;

pub const MIN_GRADE: i64 = 0;
pub const MAX_GRADE: i64 = 100;

/// Semantic label of a grade sequence. Decides the export keys only.
pub trait PerformanceRole {
    const LABEL: &'static str;
    const GRADES_KEY: &'static str;
    const AVERAGE_KEY: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Real;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Desired;

impl PerformanceRole for Real {
    const LABEL: &'static str = "real";
    const GRADES_KEY: &'static str = "grades";
    const AVERAGE_KEY: &'static str = "average_grade";
}

impl PerformanceRole for Desired {
    const LABEL: &'static str = "desired";
    const GRADES_KEY: &'static str = "desired_grades";
    const AVERAGE_KEY: &'static str = "desired_average";
}

/// Subjects paired positionally with grades in `0..=100`.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance<R: PerformanceRole> {
    subjects: Vec<String>,
    grades: Vec<u8>,
    role: PhantomData<R>,
}

pub type RealPerformance = Performance<Real>;
pub type DesiredPerformance = Performance<Desired>;

impl<R: PerformanceRole> Performance<R> {
    pub fn new<S: AsRef<str>>(subjects: &[S], grades: &[i64]) -> Result<Self> {
        if subjects.is_empty() || grades.is_empty() {
            return Err(RecordError::validation(
                "subjects",
                format!("{} performance needs at least one subject and grade", R::LABEL),
            ));
        }
        if subjects.len() != grades.len() {
            return Err(RecordError::validation(
                "grades",
                format!(
                    "{} subjects but {} grades were given",
                    subjects.len(),
                    grades.len()
                ),
            ));
        }

        let mut validated_subjects = Vec::with_capacity(subjects.len());
        let mut validated_grades = Vec::with_capacity(grades.len());
        for (subject, &grade) in subjects.iter().zip(grades) {
            let subject = validate_non_empty_string("subject", subject.as_ref())?;
            validate_range(&format!("grade for '{}'", subject), grade, MIN_GRADE, MAX_GRADE)?;
            validated_subjects.push(subject);
            validated_grades.push(grade as u8);
        }

        Ok(Self {
            subjects: validated_subjects,
            grades: validated_grades,
            role: PhantomData,
        })
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn grades(&self) -> &[u8] {
        &self.grades
    }

    /// Arithmetic mean rounded to 2 decimals, `0.0` when there are no grades.
    pub fn average_grade(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.grades.iter().map(|&g| u32::from(g)).sum();
        round2(f64::from(sum) / self.grades.len() as f64)
    }

    fn export_base(&self) -> ExportMap {
        let mut map = ExportMap::new();
        map.insert("subjects", self.subjects.clone());
        map.insert(R::GRADES_KEY, self.grades.clone());
        map.insert(R::AVERAGE_KEY, self.average_grade());
        map
    }
}

impl Performance<Real> {
    pub fn letter_grade(&self) -> LetterGrade {
        LetterGrade::from_average(self.average_grade())
    }

    pub fn to_export(&self) -> ExportMap {
        let mut map = self.export_base();
        map.insert("letter_grade", self.letter_grade().as_str());
        map
    }
}

impl Performance<Desired> {
    /// `max(0, desired - real)` per subject, zipped positionally.
    pub fn improvement_over(&self, real: &RealPerformance) -> Result<ExportMap> {
        if self.subjects.len() != real.grades.len() || self.grades.len() != real.grades.len() {
            return Err(RecordError::validation(
                "desired_performance",
                "desired and real grade sequences differ in length",
            ));
        }

        let mut improvement = ExportMap::new();
        for ((subject, &desired), &actual) in
            self.subjects.iter().zip(&self.grades).zip(&real.grades)
        {
            improvement.insert(subject.as_str(), desired.saturating_sub(actual));
        }
        Ok(improvement)
    }

    pub fn to_export(&self, real: &RealPerformance) -> Result<ExportMap> {
        let mut map = self.export_base();
        map.insert("improvement_needed", self.improvement_over(real)?);
        Ok(map)
    }
}

/// Halfway values round to the even digit: 87.625 -> 87.62.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl LetterGrade {
    /// | Average | Grade |
    /// |---------|-------|
    /// | >= 90   | A     |
    /// | >= 82   | B     |
    /// | >= 75   | C     |
    /// | >= 67   | D     |
    /// | >= 60   | E     |
    /// | < 60    | F     |
    pub fn from_average(average: f64) -> Self {
        match average {
            a if a >= 90.0 => LetterGrade::A,
            a if a >= 82.0 => LetterGrade::B,
            a if a >= 75.0 => LetterGrade::C,
            a if a >= 67.0 => LetterGrade::D,
            a if a >= 60.0 => LetterGrade::E,
            _ => LetterGrade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::E => "E",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECTS: [&str; 3] = ["Math", "Physics", "Programming"];

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let real = RealPerformance::new(&SUBJECTS, &[85, 90, 88]).unwrap();
        assert_eq!(real.average_grade(), 87.67);
        assert_eq!(real.letter_grade(), LetterGrade::B);
    }

    #[test]
    fn test_average_halfway_rounds_to_even() {
        let subjects = ["S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8"];
        let real = RealPerformance::new(&subjects, &[88, 88, 88, 88, 88, 88, 88, 85]).unwrap();
        assert_eq!(real.average_grade(), 87.62);

        let desired = DesiredPerformance::new(&subjects, &[90, 90, 90, 90, 90, 90, 90, 93]).unwrap();
        assert_eq!(desired.average_grade(), 90.38);
    }

    #[test]
    fn test_letter_grade_boundaries() {
        assert_eq!(LetterGrade::from_average(100.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_average(90.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_average(89.99), LetterGrade::B);
        assert_eq!(LetterGrade::from_average(82.0), LetterGrade::B);
        assert_eq!(LetterGrade::from_average(81.99), LetterGrade::C);
        assert_eq!(LetterGrade::from_average(75.0), LetterGrade::C);
        assert_eq!(LetterGrade::from_average(67.0), LetterGrade::D);
        assert_eq!(LetterGrade::from_average(60.0), LetterGrade::E);
        assert_eq!(LetterGrade::from_average(59.99), LetterGrade::F);
        assert_eq!(LetterGrade::from_average(0.0), LetterGrade::F);
    }

    #[test]
    fn test_rejects_empty_and_mismatched() {
        let empty: [&str; 0] = [];
        assert!(RealPerformance::new(&empty, &[]).unwrap_err().is_validation());
        assert!(DesiredPerformance::new(&["Math"], &[90, 80])
            .unwrap_err()
            .is_validation());
        assert!(RealPerformance::new(&["Math", "Art"], &[90])
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_rejects_out_of_range_grade_and_blank_subject() {
        assert!(RealPerformance::new(&["Math"], &[101]).is_err());
        assert!(RealPerformance::new(&["Math"], &[-1]).is_err());
        assert!(RealPerformance::new(&["Math", "  "], &[50, 60]).is_err());
        assert!(RealPerformance::new(&["Math"], &[0]).is_ok());
        assert!(RealPerformance::new(&["Math"], &[100]).is_ok());
    }

    #[test]
    fn test_subjects_are_trimmed() {
        let desired = DesiredPerformance::new(&[" Math "], &[90]).unwrap();
        assert_eq!(desired.subjects(), &["Math".to_string()]);
    }

    #[test]
    fn test_improvement_never_negative() {
        let real = RealPerformance::new(&SUBJECTS, &[85, 90, 88]).unwrap();
        let desired = DesiredPerformance::new(&SUBJECTS, &[90, 95, 95]).unwrap();
        let improvement = desired.improvement_over(&real).unwrap();
        assert_eq!(improvement.get("Math").and_then(|v| v.as_i64()), Some(5));
        assert_eq!(improvement.get("Physics").and_then(|v| v.as_i64()), Some(5));
        assert_eq!(
            improvement.get("Programming").and_then(|v| v.as_i64()),
            Some(7)
        );

        let lower = DesiredPerformance::new(&SUBJECTS, &[80, 90, 100]).unwrap();
        let improvement = lower.improvement_over(&real).unwrap();
        assert_eq!(improvement.get("Math").and_then(|v| v.as_i64()), Some(0));
        assert_eq!(improvement.get("Physics").and_then(|v| v.as_i64()), Some(0));
    }

    #[test]
    fn test_export_keys_follow_role() {
        let real = RealPerformance::new(&SUBJECTS, &[85, 90, 88]).unwrap();
        let desired = DesiredPerformance::new(&SUBJECTS, &[90, 95, 95]).unwrap();

        let real_export = real.to_export();
        let real_keys: Vec<&str> = real_export.keys().collect();
        assert_eq!(
            real_keys,
            vec!["subjects", "grades", "average_grade", "letter_grade"]
        );
        assert!(real_export.get("grades").is_some());
        assert_eq!(
            real_export.get("letter_grade").and_then(|v| v.as_str()),
            Some("B")
        );

        let desired_export = desired.to_export(&real).unwrap();
        assert!(desired_export.get("desired_grades").is_some());
        assert_eq!(
            desired_export.get("desired_average").and_then(|v| v.as_f64()),
            Some(93.33)
        );
        assert!(desired_export.get("improvement_needed").is_some());
    }
}
