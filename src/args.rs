use clap::{Parser, Subcommand};

/// This is a meal evaluation program: it records surveys and summarizes them in a PDF report.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file describing the store of evaluations and the
    /// report output. See the manual for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The file holding the evaluations. Setting this option overrides the path that
    /// may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the only worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Summarizes all the recorded evaluations in a PDF report.
    Report {
        /// (file path or 'stdout') Where to write the PDF document. Defaults to meal_report.pdf in the
        /// output directory of the configuration.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (file path) A reference file containing a summary in JSON format. If provided, mealrpt will
        /// check that the computed summary matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
    /// Records one evaluation.
    Submit(SubmitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SubmitArgs {
    /// (YYYY-MM-DD, default today) The date of the meal.
    #[clap(long, value_parser)]
    pub date: Option<String>,
    /// The name of the person evaluating the meal.
    #[clap(long, value_parser)]
    pub evaluator: String,
    /// (HH:MM, default now) The time of the meal.
    #[clap(long, value_parser)]
    pub time: Option<String>,
    /// Lunch, Dinner, Breakfast or Snack.
    #[clap(long, value_parser)]
    pub meal_type: String,
    /// The sector of the evaluator (Nursing, Physicians, Administrative, ...).
    #[clap(long, value_parser)]
    pub sector: String,

    /// (1 to 5)
    #[clap(long, value_parser)]
    pub appearance: u32,
    /// (1 to 5)
    #[clap(long, value_parser)]
    pub aroma: u32,
    /// (1 to 5)
    #[clap(long, value_parser)]
    pub flavor: u32,
    /// (1 to 5)
    #[clap(long, value_parser)]
    pub texture: u32,
    /// (1 to 5)
    #[clap(long, value_parser)]
    pub temperature: u32,
    /// (1 to 5) The size of the portion.
    #[clap(long, value_parser)]
    pub portion: u32,
    /// (1 to 5) The overall evaluation.
    #[clap(long, value_parser)]
    pub overall: u32,

    /// (0%, 25%, 50%, 75% or 100%, default 100%) How much of the meal was eaten.
    #[clap(long, value_parser)]
    pub consumption: Option<String>,
    /// Free text comments.
    #[clap(long, value_parser)]
    pub notes: Option<String>,
}
