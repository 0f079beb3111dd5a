use log::{debug, info, warn};

use survey_analytics::locale::{LocaleError, LocaleResolver, MissingKeyMode};
use survey_analytics::*;

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::store::RecordStore;
use crate::survey::translate::{LibreTranslate, Passthrough, Translate};

pub mod io_xlsx;
pub mod store;
pub mod translate;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("could not open the response store {path}"))]
    StoreOpen { source: csv::Error, path: String },

    #[snafu(display("the response store {path} is corrupt: {reason}"))]
    CorruptStore { path: String, reason: String },

    #[snafu(display("could not replace the response store {path}"))]
    StoreReplace {
        source: std::io::Error,
        path: String,
    },

    #[snafu(display("could not serialize a response row"))]
    StoreSerialize { source: csv::Error },

    #[snafu(display("error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("the workbook has no readable worksheet"))]
    EmptyExcel {},

    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },

    #[snafu(display("invalid response: {source}"))]
    InvalidResponse { source: ValidationError },

    #[snafu(display("{source}"))]
    MissingLabel { source: LocaleError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Validates one raw submission, derives the canonical text fields and
/// appends the response to the store. This is the single write path: a
/// response that fails validation is never persisted, and a translation
/// failure degrades to storing the original text rather than failing the
/// submission.
pub fn submit_response(
    store: &mut RecordStore,
    translator: &dyn Translate,
    raw: &RawResponse,
) -> SurveyResult<()> {
    let mut response = validate(raw).context(InvalidResponseSnafu {})?;
    apply_canonical_text(&mut response, translator);
    debug!("submit_response: {:?}", response);
    store.append(response)
}

pub(crate) fn apply_canonical_text(response: &mut Response, translator: &dyn Translate) {
    response.benefits_canonical = response
        .benefits
        .as_deref()
        .map(|text| canonical_or_original(translator, text));
    response.concerns_canonical = response
        .concerns
        .as_deref()
        .map(|text| canonical_or_original(translator, text));
}

fn canonical_or_original(translator: &dyn Translate, text: &str) -> String {
    match translator.translate(text) {
        Some(translated) => translated,
        None => {
            warn!("translation failed, storing the original text");
            text.to_string()
        }
    }
}

fn stats_to_json(stats: &SurveyStats) -> JSValue {
    let histogram: Vec<JSValue> = stats
        .satisfaction_histogram
        .iter()
        .map(|(score, count)| json!({"score": score, "count": count}))
        .collect();

    let interaction: Vec<JSValue> = stats
        .interaction_counts
        .iter()
        .map(|(freq, count)| {
            let mean = stats
                .mean_satisfaction_by_interaction
                .iter()
                .find(|(f, _)| f == freq)
                .map(|(_, m)| *m);
            json!({"category": freq.as_str(), "count": count, "meanSatisfaction": mean})
        })
        .collect();

    let words = |freqs: &[(String, u64)]| -> Vec<JSValue> {
        freqs
            .iter()
            .map(|(word, count)| json!({"word": word, "count": count}))
            .collect()
    };

    json!({
        "responses": stats.num_responses,
        "satisfaction": {
            "mean": stats.mean_satisfaction,
            "histogram": histogram,
        },
        "interaction": interaction,
        "topWords": {
            "benefits": words(&stats.top_benefits_words),
            "concerns": words(&stats.top_concerns_words),
        },
    })
}

fn read_reference_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn run_submit(
    args: &Args,
    store: &mut RecordStore,
    translator: &dyn Translate,
    resolver: &LocaleResolver,
    locale: &str,
) -> SurveyResult<()> {
    let satisfaction = match args.satisfaction {
        Some(x) => x,
        None => whatever!("--submit requires a --satisfaction score"),
    };
    let interaction = match args.interaction.clone() {
        Some(x) => x,
        None => whatever!("--submit requires an --interaction frequency"),
    };
    let raw = RawResponse {
        locale: locale.to_string(),
        satisfaction,
        interaction,
        benefits: args.benefits.clone().unwrap_or_default(),
        concerns: args.concerns.clone().unwrap_or_default(),
    };
    submit_response(store, translator, &raw)?;
    info!("recorded 1 response, store size: {}", store.len());
    let thanks = resolver
        .resolve(locale, "thanks")
        .context(MissingLabelSnafu {})?;
    println!("{}", thanks);
    Ok(())
}

fn run_stats(
    args: &Args,
    store: &RecordStore,
    resolver: &LocaleResolver,
    locale: &str,
) -> SurveyResult<()> {
    if store.is_empty() {
        let no_data = resolver
            .resolve(locale, "no_data")
            .context(MissingLabelSnafu {})?;
        eprintln!("{}", no_data);
    }
    let stats = run_survey_stats(store.responses());
    let result_js = stats_to_json(&stats);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match args.out.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => fs::write(path, &pretty_js_stats).context(OpeningJsonSnafu {})?,
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let summary_ref = read_reference_summary(reference_path)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }
    Ok(())
}

pub fn run(args: &Args) -> SurveyResult<()> {
    let mode = if args.lenient_labels {
        MissingKeyMode::Lenient
    } else {
        MissingKeyMode::Strict
    };
    let resolver = LocaleResolver::new(mode);
    let locale = args.locale.as_deref().unwrap_or(DEFAULT_LOCALE);

    let translator: Box<dyn Translate> = match &args.translate_url {
        Some(url) => Box::new(
            LibreTranslate::new(url)
                .whatever_context("could not initialize the translation client")?,
        ),
        None => Box::new(Passthrough),
    };

    let mut store = RecordStore::open(Path::new(&args.store))?;
    info!("store {}: {} responses loaded", &args.store, store.len());

    if args.submit {
        return run_submit(args, &mut store, translator.as_ref(), &resolver, locale);
    }

    if let Some(path) = &args.import {
        let imported = io_xlsx::import_workbook(
            &mut store,
            translator.as_ref(),
            path,
            args.excel_worksheet_name.as_deref(),
        )?;
        println!("imported {} responses, store size: {}", imported, store.len());
        return Ok(());
    }

    if let Some(field) = &args.corpus {
        let field = match field.as_str() {
            "benefits" => TextField::Benefits,
            "concerns" => TextField::Concerns,
            x => whatever!("--corpus must be 'benefits' or 'concerns', got {:?}", x),
        };
        println!("{}", text::word_cloud_corpus(store.responses(), field));
        return Ok(());
    }

    run_stats(args, &store, &resolver, locale)
}
