use std::collections::BTreeMap;

use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use survey_report::{ColumnLabels, RatingColumn};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "reportFileName")]
    pub report_file_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "storeSettings", default)]
    pub store_settings: StoreSettings,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    /// Header label of each rating, keyed by the lowercase rating name.
    #[serde(rename = "columnLabels", default)]
    pub column_labels: BTreeMap<String, String>,
}

impl SurveyConfig {
    pub fn column_labels(&self) -> SurveyResult<ColumnLabels> {
        let mut labels = ColumnLabels::default();
        for (key, label) in self.column_labels.iter() {
            let column = RatingColumn::from_key(key).context(UnknownRatingColumnSnafu {
                key: key.clone(),
            })?;
            labels = labels.with_label(column, label);
        }
        Ok(labels)
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let js = r#"{
            "storeSettings": {"provider": "xlsx", "filePath": "responses.xlsx", "excelWorksheetName": "Form1"},
            "outputSettings": {"outputDirectory": "reports"},
            "columnLabels": {"appearance": "Aparência", "portion": "Porção"}
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.store_settings.provider.as_deref(), Some("xlsx"));
        assert_eq!(
            config.store_settings.excel_worksheet_name.as_deref(),
            Some("Form1")
        );
        assert_eq!(config.output_settings.report_file_name, None);
        let labels = config.column_labels().unwrap();
        assert_eq!(labels.label(RatingColumn::Appearance), "Aparência");
        assert_eq!(labels.label(RatingColumn::Aroma), "Aroma");
    }

    #[test]
    fn empty_config() {
        let config: SurveyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SurveyConfig::default());
    }

    #[test]
    fn unknown_rating_key() {
        let config: SurveyConfig =
            serde_json::from_str(r#"{"columnLabels": {"taste": "Sabor"}}"#).unwrap();
        assert!(matches!(
            config.column_labels(),
            Err(SurveyError::UnknownRatingColumn { .. })
        ));
    }
}
