//! Iterated feature evaluation on a synthetic scored corpus.
//!
//! Builds a corpus whose hedging and contrast density tracks the assigned
//! score, runs the iterated experiment with the cross-validated logistic
//! learner, and reports mean and spread of the per-trial correlation and
//! reliability statistics. Prediction details land in `results.json` for
//! error analysis.

use std::error::Error;
use std::fs;

use ndarray::Array2;

use complexity_gauge::data::{Example, IdentityTransform, RawLabel, SliceCorpus};
use complexity_gauge::eval::{mean, std_dev, Experiment};
use complexity_gauge::features::default_extractors;
use complexity_gauge::learner::fit_logistic_with_crossvalidation;
use complexity_gauge::logging::DiagnosticsLog;
use complexity_gauge::ExperimentConfig;

fn synth_paragraph(score: i64, variant: usize) -> String {
    let hedges = [
        "perhaps",
        "possibly",
        "probably",
        "arguably",
        "presumably",
        "seemingly",
    ];
    let mut text = String::from("The policy question admits a straightforward reading.");
    for step in 0..score as usize {
        let hedge = hedges[(variant + step) % hedges.len()];
        text.push_str(" Yet ");
        text.push_str(hedge);
        text.push_str(" the opposing view matters; however, it could be weighed differently.");
    }
    text
}

fn synthetic_corpus() -> SliceCorpus {
    let mut examples = Vec::new();
    for score in 1..=7i64 {
        for variant in 0..8 {
            examples.push(Example::new(synth_paragraph(score, variant), RawLabel::Scored(score)));
        }
    }
    // Sentinel-labeled paragraphs the transform should drop.
    examples.push(Example::new(
        "The raters could not agree on this one.",
        RawLabel::Unscoreable,
    ));
    examples.push(Example::new(
        "This paragraph is still awaiting assessment.",
        RawLabel::Unjudged,
    ));
    SliceCorpus::new(examples)
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = ExperimentConfig::load_from_file("config/experiment.toml")
        .unwrap_or_else(|_| ExperimentConfig::default());
    let log = if config.verbose {
        DiagnosticsLog::stderr()
    } else {
        DiagnosticsLog::disabled()
    };

    println!("=== Complexity Gauge: Iterated Feature Evaluation ===\n");
    println!("Iterations: {}", config.iterations);
    println!("Train fraction: {}", config.train_fraction);

    let corpus = synthetic_corpus();
    let extractors = default_extractors();
    let train =
        |x: &Array2<f64>, y: &[i64]| fit_logistic_with_crossvalidation(x, y, &log);

    let experiment = Experiment::new(&corpus, &extractors, &IdentityTransform, &train, &log)
        .with_train_fraction(config.train_fraction)
        .with_iterations(config.iterations);
    let outcome = experiment.run()?;

    println!("\n-- AFTER COMPLETION --");
    println!(
        "Averaged correlation: {:.2} +/- {:.2}",
        mean(&outcome.correlations),
        std_dev(&outcome.correlations)
    );
    println!("All correlations: {:?}", outcome.correlations);
    println!(
        "\nAveraged Cronbach's alpha: {:.2} +/- {:.2}",
        mean(&outcome.alphas),
        std_dev(&outcome.alphas)
    );
    println!("All alphas: {:?}", outcome.alphas);
    println!("\nConfusion matrix (final trial):");
    println!("{}", outcome.confusion);

    // Truth/prediction/example records for error analysis.
    fs::write(
        "results.json",
        serde_json::to_string_pretty(&outcome.details)?,
    )?;
    println!("Wrote {} prediction records to results.json", outcome.details.len());

    Ok(())
}
