use crate::domain::record::ExportMap;
use crate::utils::error::{RecordError, Result};
use crate::utils::validation::validate_non_empty_string;
use chrono::{Datelike, Local, NaiveDate};

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// 學生身分資料；所有欄位在指派時驗證
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    last_name: String,
    first_name: String,
    middle_name: String,
    group_number: String,
    birth_date: NaiveDate,
    address: String,
}

impl Student {
    pub fn new(
        last_name: &str,
        first_name: &str,
        middle_name: &str,
        group_number: &str,
        birth_date: NaiveDate,
        address: Option<&str>,
    ) -> Result<Self> {
        Self::new_as_of(
            last_name,
            first_name,
            middle_name,
            group_number,
            birth_date,
            address,
            today(),
        )
    }

    /// Same as [`Student::new`] with an explicit "today" for the birth-date check.
    pub fn new_as_of(
        last_name: &str,
        first_name: &str,
        middle_name: &str,
        group_number: &str,
        birth_date: NaiveDate,
        address: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            last_name: validate_non_empty_string("last_name", last_name)?,
            first_name: validate_non_empty_string("first_name", first_name)?,
            middle_name: validate_non_empty_string("middle_name", middle_name)?,
            group_number: validate_non_empty_string("group_number", group_number)?,
            birth_date: validate_birth_date(birth_date, today)?,
            address: normalize_address(address),
        })
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn middle_name(&self) -> &str {
        &self.middle_name
    }

    pub fn group_number(&self) -> &str {
        &self.group_number
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn full_name(&self) -> String {
        format!(
            "{} {} {}",
            self.last_name, self.first_name, self.middle_name
        )
    }

    pub fn age(&self) -> u32 {
        self.age_on(today())
    }

    /// Whole years from the birth date to `date`.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        let mut years = date.year() - self.birth_date.year();
        if (date.month(), date.day()) < (self.birth_date.month(), self.birth_date.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }

    pub fn set_last_name(&mut self, value: &str) -> Result<()> {
        self.last_name = validate_non_empty_string("last_name", value)?;
        Ok(())
    }

    pub fn set_first_name(&mut self, value: &str) -> Result<()> {
        self.first_name = validate_non_empty_string("first_name", value)?;
        Ok(())
    }

    pub fn set_middle_name(&mut self, value: &str) -> Result<()> {
        self.middle_name = validate_non_empty_string("middle_name", value)?;
        Ok(())
    }

    pub fn set_group_number(&mut self, value: &str) -> Result<()> {
        self.group_number = validate_non_empty_string("group_number", value)?;
        Ok(())
    }

    pub fn set_birth_date(&mut self, value: NaiveDate) -> Result<()> {
        self.birth_date = validate_birth_date(value, today())?;
        Ok(())
    }

    pub fn set_address(&mut self, value: Option<&str>) {
        self.address = normalize_address(value);
    }

    pub fn to_export(&self) -> ExportMap {
        let mut map = ExportMap::new();
        map.insert("full_name", self.full_name());
        map.insert("last_name", self.last_name.as_str());
        map.insert("first_name", self.first_name.as_str());
        map.insert("middle_name", self.middle_name.as_str());
        map.insert("group_number", self.group_number.as_str());
        map.insert(
            "birth_date",
            self.birth_date.format(BIRTH_DATE_FORMAT).to_string(),
        );
        map.insert("age", self.age());
        map.insert("address", self.address.as_str());
        map
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn normalize_address(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn validate_birth_date(value: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if value > today {
        return Err(RecordError::validation(
            "birth_date",
            format!("Birth date {} is in the future", value),
        ));
    }
    Ok(value)
}

/// 解析 `YYYY-MM-DD` 格式的出生日期，並拒絕未來日期
pub fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(input.trim(), BIRTH_DATE_FORMAT).map_err(|e| {
        RecordError::validation(
            "birth_date",
            format!("'{}' is not a valid YYYY-MM-DD date: {}", input.trim(), e),
        )
    })?;
    validate_birth_date(date, today())
}
