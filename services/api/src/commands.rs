use clap::Args;
use mortgage_advisor::config::AppConfig;
use mortgage_advisor::error::AppError;
use mortgage_advisor::workflows::affordability::{evaluate, AffordabilityResult, MortgageInputs};
use mortgage_advisor::workflows::knowledge::{
    load_corpus, matching_lines, retrieve, KnowledgeCorpus, DEFAULT_DOCUMENTS,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Property price (AED)
    #[arg(long)]
    property_price: f64,
    /// Down payment (AED)
    #[arg(long)]
    down_payment: f64,
    /// Mortgage tenure in years
    #[arg(long)]
    tenure_years: u32,
    /// Years you plan to stay in the property
    #[arg(long)]
    years_planned: u32,
    /// Current or expected monthly rent (AED)
    #[arg(long)]
    monthly_rent: Option<f64>,
    /// Monthly household income (AED)
    #[arg(long)]
    monthly_income: Option<f64>,
    /// Print the JSON payload returned by the /calculate endpoint
    #[arg(long)]
    json: bool,
}

impl CalculateArgs {
    pub(crate) fn inputs(&self) -> MortgageInputs {
        MortgageInputs {
            property_price: self.property_price,
            down_payment: self.down_payment,
            tenure_years: self.tenure_years,
            years_planned: self.years_planned,
            monthly_rent: self.monthly_rent,
            monthly_income: self.monthly_income,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct FactsArgs {
    /// Question to match against the knowledge base
    #[arg(required = true)]
    words: Vec<String>,
    /// Knowledge base directory (defaults to KB_DIR)
    #[arg(long)]
    kb_dir: Option<PathBuf>,
}

impl FactsArgs {
    pub(crate) fn query(&self) -> String {
        self.words.join(" ")
    }
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let inputs = args.inputs();
    inputs.validate()?;

    let result = evaluate(&inputs);
    if args.json {
        let payload = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{payload}");
    } else {
        print!("{}", render_result(&inputs, &result));
    }

    Ok(())
}

pub(crate) fn run_facts(args: FactsArgs) -> Result<(), AppError> {
    let query = args.query();
    let directory = match args.kb_dir {
        Some(directory) => directory,
        None => AppConfig::load()?.knowledge.directory,
    };

    let corpus = load_corpus(&directory, &DEFAULT_DOCUMENTS);
    println!("Knowledge base: {}", directory.display());
    print!("{}", render_facts(&query, &corpus));

    Ok(())
}

pub(crate) fn render_result(inputs: &MortgageInputs, result: &AffordabilityResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Buy vs rent evaluation");
    let _ = writeln!(
        out,
        "Property price {:.2}, down payment {:.2}, tenure {} years, stay {} years",
        inputs.property_price, inputs.down_payment, inputs.tenure_years, inputs.years_planned
    );
    let _ = writeln!(
        out,
        "- Minimum down payment: {:.2} ({})",
        result.min_down_payment_required,
        if result.is_down_payment_sufficient {
            "met"
        } else {
            "not met"
        }
    );
    let _ = writeln!(out, "- Loan amount: {:.2}", result.loan_amount);
    let _ = writeln!(out, "- Monthly installment: {:.2}", result.installment);
    let _ = writeln!(out, "- Upfront costs: {:.2}", result.upfront_costs);
    if let Some(rent) = result.total_rent_over_period {
        let _ = writeln!(out, "- Rent over planned stay: {rent:.2}");
    }
    if let Some(ratio) = result.installment_to_income_ratio {
        let _ = writeln!(out, "- Installment to income: {ratio:.2}");
    }
    let _ = writeln!(out, "Recommendation: {}", result.recommendation.label().to_uppercase());

    out
}

pub(crate) fn render_facts(query: &str, corpus: &KnowledgeCorpus) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Documents loaded: {} of {}",
        corpus.documents().len(),
        DEFAULT_DOCUMENTS.len()
    );

    let matched = matching_lines(query, corpus).len();
    if matched == 0 {
        let _ = writeln!(out, "No line matched '{query}'; using the full knowledge base");
    } else {
        let _ = writeln!(out, "{matched} line(s) matched '{query}'");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", retrieve(query, corpus));

    out
}
