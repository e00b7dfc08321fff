use crate::infra::decision_service;
use chrono::NaiveDate;
use clap::Args;
use scheme_eligibility::config::AppConfig;
use scheme_eligibility::eligibility::{
    ApplicantId, Application, AssessmentReport, EligibilityResult, SchemeId,
};
use scheme_eligibility::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Applicant identifier from the seed data
    #[arg(long)]
    pub(crate) applicant: u64,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the raw JSON report instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Applicant identifier from the seed data
    #[arg(long)]
    pub(crate) applicant: u64,
    /// Scheme identifier from the seed data
    #[arg(long)]
    pub(crate) scheme: u64,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = decision_service(&config.eligibility)?;
    let applicant_id = ApplicantId(args.applicant);

    let report = match args.as_of {
        Some(as_of) => service.assess_eligibility_on(applicant_id, as_of)?,
        None => service.assess_eligibility(applicant_id)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

pub(crate) fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = decision_service(&config.eligibility)?;

    let application =
        service.create_application(ApplicantId(args.applicant), SchemeId(args.scheme))?;
    print!("{}", render_application(&application));
    Ok(())
}

fn render_result(result: &EligibilityResult) -> String {
    let verdict = if result.eligible { "ELIGIBLE" } else { "not eligible" };
    let mut out = format!(
        "  [{}] {} - {verdict}\n",
        result.scheme_id, result.scheme_name
    );
    for benefit in &result.benefits {
        out.push_str(&format!(
            "      + {} for {}: {} ({:?})\n",
            benefit.name, benefit.beneficiary, benefit.amount, benefit.frequency
        ));
    }
    for reason in &result.reasons {
        out.push_str(&format!("      - {reason}\n"));
    }
    out
}

pub(crate) fn render_report(report: &AssessmentReport) -> String {
    let mut out = format!(
        "Eligibility for applicant {} as of {}\n",
        report.applicant_id, report.as_of
    );
    if report.results.is_empty() {
        out.push_str("  no schemes open on this date\n");
    }
    for result in &report.results {
        out.push_str(&render_result(result));
    }
    out.push_str(&format!(
        "{} of {} schemes eligible\n",
        report.eligible().count(),
        report.results.len()
    ));
    out
}

pub(crate) fn render_application(application: &Application) -> String {
    let mut out = format!(
        "Application {} for applicant {} / scheme {}: {}\n",
        application.id(),
        application.applicant_id(),
        application.scheme_id(),
        application.status().label()
    );
    for benefit in application.benefits() {
        out.push_str(&format!(
            "  + {} for {}: {}\n",
            benefit.name, benefit.beneficiary, benefit.amount
        ));
    }
    for reason in application.reasons() {
        out.push_str(&format!("  - {reason}\n"));
    }
    out
}
