// ********* Survey form submissions ***********

use std::error::Error;
use std::fmt::Display;

use chrono::{NaiveDate, NaiveTime};

use crate::rating::{ColumnLabels, RatingColumn};
use crate::table::Row;

pub const DATE_COLUMN: &str = "Date";
pub const EVALUATOR_COLUMN: &str = "Evaluator";
pub const TIME_COLUMN: &str = "Time";
pub const MEAL_TYPE_COLUMN: &str = "MealType";
pub const SECTOR_COLUMN: &str = "Sector";
pub const CONSUMPTION_COLUMN: &str = "Consumption";
pub const NOTES_COLUMN: &str = "Notes";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SubmissionError {
    RatingOutOfRange { column: RatingColumn, value: u32 },
    BlankEvaluator,
    UnknownMealType(String),
    UnknownSector(String),
    UnknownConsumption(String),
    InvalidDate(String),
    InvalidTime(String),
}

impl Error for SubmissionError {}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::RatingOutOfRange { column, value } => write!(
                f,
                "Rating for {} must be between 1 and 5, got {}",
                column.name(),
                value
            ),
            SubmissionError::BlankEvaluator => write!(f, "The evaluator name is missing"),
            SubmissionError::UnknownMealType(s) => write!(f, "Unknown meal type {:?}", s),
            SubmissionError::UnknownSector(s) => write!(f, "Unknown sector {:?}", s),
            SubmissionError::UnknownConsumption(s) => {
                write!(f, "Unknown consumed percentage {:?}", s)
            }
            SubmissionError::InvalidDate(s) => write!(f, "Invalid date {:?} (expected YYYY-MM-DD)", s),
            SubmissionError::InvalidTime(s) => write!(f, "Invalid time {:?} (expected HH:MM)", s),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MealType {
    Lunch,
    Dinner,
    Breakfast,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Lunch,
        MealType::Dinner,
        MealType::Breakfast,
        MealType::Snack,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Breakfast => "Breakfast",
            MealType::Snack => "Snack",
        }
    }

    pub fn parse(s: &str) -> Result<MealType, SubmissionError> {
        MealType::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .cloned()
            .ok_or_else(|| SubmissionError::UnknownMealType(s.to_string()))
    }
}

/// The department of the person evaluating the meal.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Sector {
    Nursing,
    Physicians,
    Administrative,
    Cleaning,
    Security,
    Laboratory,
    Pharmacy,
    Reception,
    Other,
}

impl Sector {
    pub const ALL: [Sector; 9] = [
        Sector::Nursing,
        Sector::Physicians,
        Sector::Administrative,
        Sector::Cleaning,
        Sector::Security,
        Sector::Laboratory,
        Sector::Pharmacy,
        Sector::Reception,
        Sector::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sector::Nursing => "Nursing",
            Sector::Physicians => "Physicians",
            Sector::Administrative => "Administrative",
            Sector::Cleaning => "Cleaning",
            Sector::Security => "Security",
            Sector::Laboratory => "Laboratory",
            Sector::Pharmacy => "Pharmacy",
            Sector::Reception => "Reception",
            Sector::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Result<Sector, SubmissionError> {
        Sector::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .cloned()
            .ok_or_else(|| SubmissionError::UnknownSector(s.to_string()))
    }
}

/// How much of the meal was eaten, in steps of a quarter.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Consumption(u8);

impl Consumption {
    pub const FULL: Consumption = Consumption(100);

    pub fn parse(s: &str) -> Result<Consumption, SubmissionError> {
        let err = || SubmissionError::UnknownConsumption(s.to_string());
        let digits = s.trim().trim_end_matches('%');
        let pct = digits.parse::<u8>().map_err(|_| err())?;
        if pct <= 100 && pct % 25 == 0 {
            Ok(Consumption(pct))
        } else {
            Err(err())
        }
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl Display for Consumption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One filled-in survey form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Submission {
    pub date: NaiveDate,
    pub evaluator: String,
    pub time: NaiveTime,
    pub meal_type: MealType,
    pub sector: Sector,
    /// Scores in the canonical order of [RatingColumn::ALL].
    pub ratings: [u32; 7],
    pub consumption: Consumption,
    pub notes: String,
}

impl Submission {
    pub fn parse_date(s: &str) -> Result<NaiveDate, SubmissionError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map_err(|_| SubmissionError::InvalidDate(s.to_string()))
    }

    pub fn parse_time(s: &str) -> Result<NaiveTime, SubmissionError> {
        NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
            .map_err(|_| SubmissionError::InvalidTime(s.to_string()))
    }

    pub fn rating(&self, column: RatingColumn) -> u32 {
        self.ratings[column as usize]
    }

    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.evaluator.trim().is_empty() {
            return Err(SubmissionError::BlankEvaluator);
        }
        for column in RatingColumn::ALL {
            let value = self.rating(column);
            if !(1..=5).contains(&value) {
                return Err(SubmissionError::RatingOutOfRange { column, value });
            }
        }
        Ok(())
    }

    /// The row to append to the store. Rating columns are written under the
    /// given labels.
    pub fn to_row(&self, labels: &ColumnLabels) -> Result<Row, SubmissionError> {
        self.validate()?;
        let mut row = Row::new()
            .with(DATE_COLUMN, self.date.format(DATE_FORMAT).to_string())
            .with(EVALUATOR_COLUMN, self.evaluator.trim())
            .with(TIME_COLUMN, self.time.format(TIME_FORMAT).to_string())
            .with(MEAL_TYPE_COLUMN, self.meal_type.name())
            .with(SECTOR_COLUMN, self.sector.name());
        for column in RatingColumn::ALL {
            row.set(labels.label(column), self.rating(column));
        }
        row.set(CONSUMPTION_COLUMN, self.consumption.to_string());
        row.set(NOTES_COLUMN, self.notes.as_str());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellValue;

    fn sample() -> Submission {
        Submission {
            date: Submission::parse_date("2024-05-02").unwrap(),
            evaluator: "Ana Souza".to_string(),
            time: Submission::parse_time("12:30").unwrap(),
            meal_type: MealType::Lunch,
            sector: Sector::Pharmacy,
            ratings: [4, 5, 3, 4, 5, 3, 4],
            consumption: Consumption::FULL,
            notes: "".to_string(),
        }
    }

    #[test]
    fn row_layout() {
        let row = sample().to_row(&ColumnLabels::default()).unwrap();
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(
            columns,
            vec![
                "Date",
                "Evaluator",
                "Time",
                "MealType",
                "Sector",
                "Appearance",
                "Aroma",
                "Flavor",
                "Texture",
                "Temperature",
                "Portion",
                "Overall",
                "Consumption",
                "Notes"
            ]
        );
        assert_eq!(row.get("Time"), Some(&CellValue::Text("12:30".to_string())));
        assert_eq!(row.get("Flavor"), Some(&CellValue::Number(3.0)));
        assert_eq!(row.get("Consumption"), Some(&CellValue::Text("100%".to_string())));
        assert_eq!(row.get("Notes"), Some(&CellValue::Empty));
    }

    #[test]
    fn rejects_out_of_range() {
        let mut s = sample();
        s.ratings[6] = 6;
        assert_eq!(
            s.to_row(&ColumnLabels::default()),
            Err(SubmissionError::RatingOutOfRange {
                column: RatingColumn::Overall,
                value: 6
            })
        );
        s.ratings[6] = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_blank_evaluator() {
        let mut s = sample();
        s.evaluator = "  ".to_string();
        assert_eq!(s.validate(), Err(SubmissionError::BlankEvaluator));
    }

    #[test]
    fn parse_choices() {
        assert_eq!(MealType::parse("dinner"), Ok(MealType::Dinner));
        assert!(MealType::parse("brunch").is_err());
        assert_eq!(Sector::parse("Reception"), Ok(Sector::Reception));
        assert!(Sector::parse("Kitchen").is_err());
        assert_eq!(Consumption::parse("75%").map(|c| c.percent()), Ok(75));
        assert_eq!(Consumption::parse("0").map(|c| c.percent()), Ok(0));
        assert!(Consumption::parse("30%").is_err());
        assert!(Consumption::parse("125%").is_err());
        assert!(Submission::parse_date("02/05/2024").is_err());
        assert!(Submission::parse_time("25:00").is_err());
    }
}
