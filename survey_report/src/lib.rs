/*!
Collection and reporting of meal-quality surveys.

Each submitted survey is a row in an append-only table. The report reads the whole
table, averages the seven rating columns and renders the result as a one-page PDF.

```
use survey_report::*;

let mut store = MemoryStore::default();
let submission = Submission {
    date: Submission::parse_date("2024-05-02")?,
    evaluator: "Ana".to_string(),
    time: Submission::parse_time("12:30")?,
    meal_type: MealType::Lunch,
    sector: Sector::Nursing,
    ratings: [4, 5, 3, 4, 5, 3, 4],
    consumption: Consumption::FULL,
    notes: "".to_string(),
};
let builder = ReportBuilder::default();
let table = store.append(submission.to_row(builder.labels())?).unwrap();

let summary = builder.summarize(&table);
assert_eq!(summary.total, 1);
assert_eq!(summary.mean(RatingColumn::Aroma), Some(5.0));
let pdf = builder.build(&table)?;
assert!(pdf.starts_with(b"%PDF"));
# Ok::<(), Box<dyn std::error::Error>>(())
```

See the [manual] module for the command line tool.
*/

mod builder;
mod document;
pub mod manual;
mod pdf;
mod rating;
mod store;
mod submission;
mod table;

pub use crate::builder::*;
pub use crate::document::*;
pub use crate::rating::*;
pub use crate::store::*;
pub use crate::submission::*;
pub use crate::table::*;
