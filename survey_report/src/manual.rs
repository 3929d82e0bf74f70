/*!

This is the long-form manual for `survey_report` and `mealrpt`.

## Recording evaluations

```bash
mealrpt --input meals.csv submit --evaluator "Ana Souza" --meal-type lunch --sector nursing \
  --appearance 4 --aroma 5 --flavor 3 --texture 4 --temperature 5 --portion 3 --overall 4 \
  --consumption 75% --notes "rice was cold"
```

The date and the time default to the current local date and time (`--date 2024-05-02`,
`--time 12:30` to override them). All the ratings are mandatory and must be between 1 and 5.

Accepted meal types: `Lunch`, `Dinner`, `Breakfast`, `Snack`.
Accepted sectors: `Nursing`, `Physicians`, `Administrative`, `Cleaning`, `Security`,
`Laboratory`, `Pharmacy`, `Reception`, `Other`.
Accepted consumed percentages: `0%`, `25%`, `50%`, `75%`, `100%`.

## Producing the report

```bash
mealrpt --input meals.csv report --out meal_report.pdf
```

The summary (number of evaluations and the average of each rating) is printed in JSON
on the standard output and the PDF is written to the output path (`meal_report.pdf` by default).

Cells that cannot be read as a number (empty cells, free text) are left out of the
average of their column. Numbers are averaged as they are, even outside the 1 to 5 scale
when the spreadsheet was edited by hand. A column without any valid
rating is shown as `N/A` in the document and as `null` in the JSON summary.

With `--reference summary.json`, the JSON summary is compared to a previously saved
summary and the program fails if they differ.

## Input formats

### `csv`

The first row is the header. The rating columns are found by name, all the other
columns are kept but not used by the report:

```text
Date,Evaluator,Time,MealType,Sector,Appearance,Aroma,Flavor,Texture,Temperature,Portion,Overall,Consumption,Notes
2024-05-02,Ana Souza,12:30,Lunch,Nursing,4,5,3,4,5,3,4,100%,
```

This is the only format that accepts new evaluations.

### `xlsx`

Excel workbook, for example the export of an online spreadsheet. The first row of the
worksheet is the header. When the workbook has several worksheets, the name of the
worksheet must be provided (`--excel-worksheet-name`). Excel inputs are read only.

## Configuration

All the options can also be provided in a JSON configuration file (`--config`):

```json
{
  "storeSettings": {
    "provider": "xlsx",
    "filePath": "responses.xlsx",
    "excelWorksheetName": "Form1"
  },
  "outputSettings": {
    "outputDirectory": "reports"
  },
  "columnLabels": {
    "appearance": "Aparência",
    "flavor": "Sabor",
    "texture": "Textura",
    "portion": "Porção",
    "overall": "Geral"
  }
}
```

Relative paths are resolved from the directory of the configuration file. Options given
on the command line take precedence.

`columnLabels` maps a rating (`appearance`, `aroma`, `flavor`, `texture`, `temperature`,
`portion`, `overall`) to the header used in the input. The document only supports plain
ASCII, so accented labels are printed without their accents (`Porção` becomes `Porcao`).

 */
