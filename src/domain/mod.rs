// Domain layer: entities, the export record and the storage port.

pub mod performance;
pub mod ports;
pub mod record;
pub mod student;
pub mod student_data;

pub use performance::{DesiredPerformance, LetterGrade, Performance, RealPerformance};
pub use ports::RecordStorage;
pub use record::{ExportMap, ExportRecord, ExportValue};
pub use student::{parse_birth_date, Student};
pub use student_data::StudentData;
