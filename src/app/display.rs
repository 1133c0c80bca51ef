use crate::domain::record::{ExportMap, ExportRecord, ExportValue};

const WIDTH: usize = 50;

fn text(map: Option<&ExportMap>, key: &str) -> String {
    map.and_then(|m| m.get(key))
        .and_then(ExportValue::scalar_text)
        .unwrap_or_default()
}

fn scalar(value: &ExportValue) -> String {
    value.scalar_text().unwrap_or_default()
}

fn sequence<'a>(map: Option<&'a ExportMap>, key: &str) -> &'a [ExportValue] {
    map.and_then(|m| m.get(key))
        .and_then(ExportValue::as_sequence)
        .unwrap_or(&[])
}

/// 將匯出紀錄整理成終端摘要
pub fn render_summary(record: &ExportRecord) -> String {
    let student = record.get("student").and_then(ExportValue::as_mapping);
    let real = record.get("real_performance").and_then(ExportValue::as_mapping);
    let desired = record
        .get("desired_performance")
        .and_then(ExportValue::as_mapping);

    let rule = "=".repeat(WIDTH);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        format!("{:^width$}", "STUDENT INFORMATION", width = WIDTH),
        rule.clone(),
    ];

    let address = text(student, "address");
    lines.extend([
        String::new(),
        "PERSONAL DATA".to_string(),
        format!("Full name: {}", text(student, "full_name")),
        format!("Group: {}", text(student, "group_number")),
        format!("Age: {} years", text(student, "age")),
        format!(
            "Address: {}",
            if address.is_empty() { "not specified" } else { address.as_str() }
        ),
    ]);

    let real_grades = sequence(real, "grades");
    lines.push(String::new());
    lines.push("REAL PERFORMANCE".to_string());
    for (subject, grade) in sequence(real, "subjects").iter().zip(real_grades) {
        lines.push(format!("- {}: {}", scalar(subject), scalar(grade)));
    }
    lines.push(format!(
        "Average grade: {} ({})",
        text(real, "average_grade"),
        text(real, "letter_grade")
    ));

    lines.push(String::new());
    lines.push("DESIRED PERFORMANCE".to_string());
    for ((subject, grade), current) in sequence(desired, "subjects")
        .iter()
        .zip(sequence(desired, "desired_grades"))
        .zip(real_grades)
    {
        lines.push(format!(
            "- {}: {} (current: {})",
            scalar(subject),
            scalar(grade),
            scalar(current)
        ));
    }
    lines.push(format!("Desired average: {}", text(desired, "desired_average")));

    lines.push(String::new());
    lines.push("IMPROVEMENT NEEDED".to_string());
    if let Some(improvement) = desired
        .and_then(|d| d.get("improvement_needed"))
        .and_then(ExportValue::as_mapping)
    {
        for (subject, points) in improvement.iter() {
            if points.as_i64().unwrap_or(0) > 0 {
                lines.push(format!("- {}: +{} points", subject, scalar(points)));
            }
        }
    }

    lines.push(String::new());
    lines.push(rule);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
