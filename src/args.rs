use clap::Parser;

/// Command-line collection and tabulation for the tourism perception questionnaire.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The CSV file holding the accumulated responses. It is created
    /// on the first submission and rewritten in full on each append.
    #[clap(short, long, value_parser, default_value = "responses.csv")]
    pub store: String,

    /// Record one response built from --satisfaction, --interaction, --benefits
    /// and --concerns, then exit.
    #[clap(long, takes_value = false)]
    pub submit: bool,

    /// (1 to 5) The satisfaction score of the submitted response.
    #[clap(long, value_parser)]
    pub satisfaction: Option<i64>,

    /// (Daily, Weekly, Monthly, Rarely or Never) The interaction frequency of the
    /// submitted response.
    #[clap(long, value_parser)]
    pub interaction: Option<String>,

    /// Free-text answer about the benefits of tourism in the area.
    #[clap(long, value_parser)]
    pub benefits: Option<String>,

    /// Free-text answer about the concerns raised by tourism in the area.
    #[clap(long, value_parser)]
    pub concerns: Option<String>,

    /// (default en) The display language for prompts and labels. Does not affect
    /// what is stored or computed.
    #[clap(short, long, value_parser)]
    pub locale: Option<String>,

    /// (file path) Bulk-import responses from a spreadsheet export (xlsx), one
    /// row per response, then exit.
    #[clap(long, value_parser)]
    pub import: Option<String>,

    /// When importing an Excel file, the name of the worksheet to use. Defaults
    /// to the first worksheet.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (benefits or concerns) Print the concatenated text corpus for the given
    /// field, for an external word-cloud renderer, then exit.
    #[clap(long, value_parser)]
    pub corpus: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the JSON summary of the
    /// accumulated responses.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, tourstat will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (url or empty) Endpoint of a LibreTranslate-compatible service used to
    /// translate free-text answers to English before storage. Without it,
    /// answers are stored untranslated.
    #[clap(long, value_parser)]
    pub translate_url: Option<String>,

    /// Render missing label keys verbatim instead of failing. Label keys missing
    /// from the default table are a configuration defect, so the default is to
    /// fail loudly.
    #[clap(long, takes_value = false)]
    pub lenient_labels: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
