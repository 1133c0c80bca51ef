use crate::domain::performance::{DesiredPerformance, RealPerformance};
use crate::domain::record::{ExportMap, ExportRecord};
use crate::domain::student::Student;
use crate::utils::error::{RecordError, Result};

/// 聚合一位學生與其實際、期望成績
#[derive(Debug, Clone, PartialEq)]
pub struct StudentData {
    student: Student,
    real_performance: RealPerformance,
    desired_performance: DesiredPerformance,
}

impl StudentData {
    /// Fails when the desired subjects are not the real subjects in the same order.
    pub fn new(
        student: Student,
        real_performance: RealPerformance,
        desired_performance: DesiredPerformance,
    ) -> Result<Self> {
        if real_performance.subjects() != desired_performance.subjects() {
            return Err(RecordError::validation(
                "desired_performance",
                format!(
                    "subjects must match the real performance: expected [{}], got [{}]",
                    real_performance.subjects().join(", "),
                    desired_performance.subjects().join(", ")
                ),
            ));
        }

        Ok(Self {
            student,
            real_performance,
            desired_performance,
        })
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn real_performance(&self) -> &RealPerformance {
        &self.real_performance
    }

    pub fn desired_performance(&self) -> &DesiredPerformance {
        &self.desired_performance
    }

    pub fn improvement_needed(&self) -> Result<ExportMap> {
        self.desired_performance
            .improvement_over(&self.real_performance)
    }

    /// Builds the full export record, or nothing at all on failure.
    pub fn export(&self) -> Result<ExportRecord> {
        let desired = self
            .desired_performance
            .to_export(&self.real_performance)
            .map_err(|e| {
                RecordError::validation("export", format!("failed to build export record: {}", e))
            })?;

        let mut record = ExportRecord::new();
        record.insert("student", self.student.to_export());
        record.insert("real_performance", self.real_performance.to_export());
        record.insert("desired_performance", desired);

        tracing::debug!(
            "Built export record for {} ({} subjects)",
            self.student.full_name(),
            self.real_performance.subjects().len()
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SUBJECTS: [&str; 3] = ["Math", "Physics", "Programming"];

    fn student() -> Student {
        Student::new(
            "Kovalenko",
            "Olena",
            "Petrivna",
            "KN-31",
            NaiveDate::from_ymd_opt(2004, 9, 1).unwrap(),
            Some("Lviv"),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_subjects() {
        let real = RealPerformance::new(&SUBJECTS, &[85, 90, 88]).unwrap();
        let reordered =
            DesiredPerformance::new(&["Physics", "Math", "Programming"], &[90, 95, 95]).unwrap();
        let err = StudentData::new(student(), real.clone(), reordered).unwrap_err();
        assert!(err.is_validation());

        let shorter = DesiredPerformance::new(&["Math"], &[90]).unwrap();
        assert!(StudentData::new(student(), real, shorter).is_err());
    }

    #[test]
    fn test_export_layout() {
        let real = RealPerformance::new(&SUBJECTS, &[85, 90, 88]).unwrap();
        let desired = DesiredPerformance::new(&SUBJECTS, &[90, 95, 95]).unwrap();
        let data = StudentData::new(student(), real, desired).unwrap();

        let record = data.export().unwrap();
        let sections: Vec<&str> = record.keys().collect();
        assert_eq!(
            sections,
            vec!["student", "real_performance", "desired_performance"]
        );

        let real = record.get("real_performance").and_then(|v| v.as_mapping()).unwrap();
        assert_eq!(real.get("average_grade").and_then(|v| v.as_f64()), Some(87.67));
        assert_eq!(real.get("letter_grade").and_then(|v| v.as_str()), Some("B"));

        let improvement = data.improvement_needed().unwrap();
        assert_eq!(
            improvement.get("Programming").and_then(|v| v.as_i64()),
            Some(7)
        );
    }
}
