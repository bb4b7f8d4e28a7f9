use crate::{ClassPathArgs, ConfigArgs};
use bootkit_autoconfigure::ConditionEvaluationReport;
use nu_ansi_term::Color;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Condition")]
    condition: String,
    #[tabled(rename = "Match")]
    matched: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn run(config: ConfigArgs, classpath: ClassPathArgs) -> anyhow::Result<()> {
    let environment = bootkit_runtime::load_environment(config.config.as_deref())?;
    let context = bootkit_runtime::build_default_context(environment, classpath.to_classpath())?;
    print_report(context.report());
    Ok(())
}

fn print_report(report: &ConditionEvaluationReport) {
    let rows: Vec<OutcomeRow> = report
        .outcomes()
        .iter()
        .flat_map(|(source, outcomes)| {
            outcomes.iter().map(move |o| OutcomeRow {
                source: source.clone(),
                condition: o.condition.clone(),
                matched: if o.outcome.matched { "yes" } else { "no" }.to_string(),
                message: o.outcome.message.clone(),
            })
        })
        .collect();
    println!("{}", Table::new(rows));

    println!(
        "{} {}",
        Color::LightGreen.bold().paint("Positive matches:"),
        report.positive_matches().join(", ")
    );
    println!(
        "{} {}",
        Color::Red.bold().paint("Negative matches:"),
        report.negative_matches().join(", ")
    );
    if !report.exclusions().is_empty() {
        println!("Exclusions: {}", report.exclusions().join(", "));
    }
    if !report.unconditional().is_empty() {
        println!("Unconditional: {}", report.unconditional().join(", "));
    }
}
