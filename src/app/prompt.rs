use crate::config::DEFAULT_PREFIX;
use crate::domain::performance::{Desired, Performance, PerformanceRole, Real};
use crate::domain::{parse_birth_date, DesiredPerformance, RealPerformance, Student, StudentData};
use crate::utils::error::{RecordError, Result};
use std::io::{BufRead, ErrorKind, Write};

/// 互動式輸入：驗證失敗時重新詢問
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RecordError::IoError(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "input ended before all data was entered",
            )));
        }
        Ok(line.trim().to_string())
    }

    fn report_retry(&mut self, error: &RecordError) -> Result<()> {
        tracing::debug!("Rejected input: {}", error);
        writeln!(self.output, "Validation error: {}", error)?;
        writeln!(self.output, "Please try again.\n")?;
        Ok(())
    }

    pub fn read_student(&mut self) -> Result<Student> {
        loop {
            writeln!(self.output, "\n=== Student details ===")?;
            let last_name = self.ask("Last name: ")?;
            let first_name = self.ask("First name: ")?;
            let middle_name = self.ask("Middle name: ")?;
            let group_number = self.ask("Group number: ")?;

            let birth_date = loop {
                let answer = self.ask("Birth date (YYYY-MM-DD): ")?;
                match parse_birth_date(&answer) {
                    Ok(date) => break date,
                    Err(e) => writeln!(self.output, "Error: {}. Try again.", e)?,
                }
            };

            let address = self.ask("Address (optional): ")?;

            match Student::new(
                &last_name,
                &first_name,
                &middle_name,
                &group_number,
                birth_date,
                Some(address.as_str()),
            ) {
                Ok(student) => return Ok(student),
                Err(e) if e.is_validation() => self.report_retry(&e)?,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_subject_count(&mut self) -> Result<usize> {
        loop {
            let answer = self.ask("Number of subjects: ")?;
            match answer.parse::<usize>() {
                Ok(0) => writeln!(self.output, "The number of subjects must be greater than 0")?,
                Ok(count) => return Ok(count),
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
    }

    fn read_grade(&mut self, subject: &str) -> Result<i64> {
        loop {
            let answer = self.ask(&format!("Grade for '{}': ", subject))?;
            match answer.parse::<i64>() {
                Ok(grade) if (0..=100).contains(&grade) => return Ok(grade),
                Ok(_) => writeln!(self.output, "The grade must be between 0 and 100")?,
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
    }

    pub fn read_performance<Role: PerformanceRole>(&mut self) -> Result<Performance<Role>> {
        loop {
            writeln!(self.output, "\n=== {} performance ===", capitalize(Role::LABEL))?;
            let count = self.read_subject_count()?;

            let mut subjects = Vec::with_capacity(count);
            let mut grades = Vec::with_capacity(count);
            for index in 1..=count {
                let mut subject = self.ask(&format!("\nSubject {}: ", index))?;
                while subject.is_empty() {
                    writeln!(self.output, "The subject name cannot be empty")?;
                    subject = self.ask(&format!("Subject {}: ", index))?;
                }
                grades.push(self.read_grade(&subject)?);
                subjects.push(subject);
            }

            match Performance::<Role>::new(&subjects, &grades) {
                Ok(performance) => return Ok(performance),
                Err(e) if e.is_validation() => self.report_retry(&e)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Re-asks until the desired subjects equal the real ones, in order.
    pub fn read_matching_desired(&mut self, real: &RealPerformance) -> Result<DesiredPerformance> {
        writeln!(
            self.output,
            "Note: enter the same subjects as for the real performance"
        )?;
        loop {
            let desired = self.read_performance::<Desired>()?;
            if desired.subjects().len() != real.subjects().len() {
                writeln!(
                    self.output,
                    "Error: the number of subjects must match the real performance"
                )?;
                continue;
            }
            if desired.subjects() != real.subjects() {
                writeln!(self.output, "Error: the subject lists must match")?;
                writeln!(self.output, "Expected: {}", real.subjects().join(", "))?;
                continue;
            }
            return Ok(desired);
        }
    }

    pub fn collect_student_data(&mut self) -> Result<StudentData> {
        let student = self.read_student()?;
        let real = self.read_performance::<Real>()?;
        let desired = self.read_matching_desired(&real)?;
        StudentData::new(student, real, desired)
    }

    pub fn read_prefix(&mut self) -> Result<String> {
        let answer = self.ask(&format!(
            "\nFile name prefix (Enter for '{}'): ",
            DEFAULT_PREFIX
        ))?;
        if answer.is_empty() {
            Ok(DEFAULT_PREFIX.to_string())
        } else {
            Ok(answer)
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
