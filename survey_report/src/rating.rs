use log::debug;

use crate::table::{CellValue, Table};

/// Highest score of the rating scale. It is the denominator shown in the report.
pub const RATING_MAX: f64 = 5.0;

/// The seven dimensions rated by a survey, in their canonical order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum RatingColumn {
    Appearance,
    Aroma,
    Flavor,
    Texture,
    Temperature,
    Portion,
    Overall,
}

impl RatingColumn {
    pub const ALL: [RatingColumn; 7] = [
        RatingColumn::Appearance,
        RatingColumn::Aroma,
        RatingColumn::Flavor,
        RatingColumn::Texture,
        RatingColumn::Temperature,
        RatingColumn::Portion,
        RatingColumn::Overall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RatingColumn::Appearance => "Appearance",
            RatingColumn::Aroma => "Aroma",
            RatingColumn::Flavor => "Flavor",
            RatingColumn::Texture => "Texture",
            RatingColumn::Temperature => "Temperature",
            RatingColumn::Portion => "Portion",
            RatingColumn::Overall => "Overall",
        }
    }

    /// Parses the lowercase key used in configuration files (`appearance`, `portion`, ...).
    pub fn from_key(key: &str) -> Option<RatingColumn> {
        RatingColumn::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(key))
            .cloned()
    }
}

/// The header label under which each rating column is stored.
///
/// Spreadsheets filled from a localized form carry labels such as `Aparência`;
/// by default the English names are used.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnLabels {
    labels: [String; 7],
}

impl Default for ColumnLabels {
    fn default() -> Self {
        ColumnLabels {
            labels: RatingColumn::ALL.map(|c| c.name().to_string()),
        }
    }
}

impl ColumnLabels {
    pub fn with_label(mut self, column: RatingColumn, label: &str) -> ColumnLabels {
        self.labels[column as usize] = label.to_string();
        self
    }

    pub fn label(&self, column: RatingColumn) -> &str {
        self.labels[column as usize].as_str()
    }

    /// The label as printed in the document, restricted to the characters of the
    /// built-in document font.
    pub fn display_name(&self, column: RatingColumn) -> String {
        fold_to_ascii(self.label(column))
    }
}

/// Replaces accented latin letters by their closest ASCII form.
/// Characters without a reasonable replacement become `?`.
pub fn fold_to_ascii(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii() {
            res.push(c);
            continue;
        }
        let folded: &str = match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
            'æ' => "ae",
            'Æ' => "AE",
            'ç' => "c",
            'Ç' => "C",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'È' | 'É' | 'Ê' | 'Ë' => "E",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'Ì' | 'Í' | 'Î' | 'Ï' => "I",
            'ñ' => "n",
            'Ñ' => "N",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
            'ý' | 'ÿ' => "y",
            'Ý' => "Y",
            'ß' => "ss",
            _ => "?",
        };
        res.push_str(folded);
    }
    res
}

/// Interprets a cell as a rating.
///
/// Anything that cannot be read as a finite number is treated as a missing
/// answer. The range of the scale is enforced when a form is submitted, not here.
pub fn coerce_rating(cell: &CellValue) -> Option<f64> {
    let x = match cell {
        CellValue::Empty => return None,
        CellValue::Number(x) => *x,
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    if x.is_finite() {
        Some(x)
    } else {
        None
    }
}

/// The rating columns of a table, after coercion.
///
/// Each vector is aligned with the rows of the table it was built from.
#[derive(PartialEq, Debug, Clone)]
pub struct RatingColumns {
    pub columns: Vec<(RatingColumn, Vec<Option<f64>>)>,
}

impl RatingColumns {
    pub fn coerce(table: &Table, labels: &ColumnLabels) -> RatingColumns {
        let columns = RatingColumn::ALL
            .iter()
            .map(|col| {
                let label = labels.label(*col);
                let values: Vec<Option<f64>> = table
                    .column(label)
                    .enumerate()
                    .map(|(idx, cell)| {
                        let v = coerce_rating(cell);
                        if v.is_none() && !cell.is_empty() {
                            debug!(
                                "coerce: row {}: column {:?}: skipping cell {:?}",
                                idx, label, cell
                            );
                        }
                        v
                    })
                    .collect();
                (*col, values)
            })
            .collect();
        RatingColumns { columns }
    }

    pub fn stats(&self) -> Vec<ColumnStats> {
        self.columns
            .iter()
            .map(|(col, values)| ColumnStats::from_values(*col, values))
            .collect()
    }
}

/// Count and sum of the valid values of one rating column.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ColumnStats {
    pub column: RatingColumn,
    pub count: u64,
    pub sum: f64,
}

impl ColumnStats {
    pub fn from_values(column: RatingColumn, values: &[Option<f64>]) -> ColumnStats {
        let mut count: u64 = 0;
        let mut sum: f64 = 0.0;
        for x in values.iter().flatten() {
            count += 1;
            sum += x;
        }
        ColumnStats { column, count, sum }
    }

    /// The arithmetic mean, or None when the column has no valid value.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}
