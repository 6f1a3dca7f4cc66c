//! Basic example of the filter and aggregation core.
//!
//! This example shows how to:
//! 1. Load a small metadata table
//! 2. Filter it by disease status
//! 3. Count samples per study
//! 4. Check field completeness over the full table
//!
//! Pass a TSV path to run it on your own data.

use holobiome::prelude::*;

const EXAMPLE_TSV: &str = "\
sample_id\tstudy_id\tdisease_status\thost_age\tbmi
A1\tPRJNA1\tIBD\t34\t22.5
A2\tPRJNA1\tHealthy\tNA\t24.1
A3\tPRJNA2\tIBD\t51\t
A4\tPRJNA2\tIBD\t\tNaN
A5\tPRJNA3\tT2D\t62\t31.0
";

fn main() -> Result<()> {
    let dataset = match std::env::args().nth(1) {
        Some(path) => Dataset::from_tsv(path)?,
        None => Dataset::from_reader(EXAMPLE_TSV.as_bytes(), &LoadOptions::default())?,
    };

    println!("=== Dataset ===\n");
    println!("  Samples: {}", dataset.len());
    println!("  Studies: {}", dataset.study_ids().len());
    println!();

    let options = filter_options(&dataset, "disease_status");
    println!("Disease options: {}", options.join(", "));
    println!();

    // Filtered view
    let ibd = filter(&dataset, &[Predicate::equals("disease_status", "IBD")]);
    println!("=== IBD samples per study ===\n");
    for count in study_counts(&ibd, &StudyLabels::new()) {
        println!("  {:<10} {}", count.study_id, count.samples);
    }
    println!();

    print!("{}", SummaryMetrics::compute(&ibd, "host_age", "bmi"));
    println!();

    // Completeness ignores the filter
    let fields = ["host_age", "bmi"];
    let table = completeness_by_study(&dataset, &fields);
    println!("=== Completeness (all studies) ===\n");
    println!("  {:<10} {:>9} {:>9}", "study", fields[0], fields[1]);
    for study in table.studies() {
        let row = table.row(study).unwrap_or_default();
        let cells: Vec<String> = row.iter().map(|v| format!("{:>8.0}%", v)).collect();
        println!("  {:<10} {}", study, cells.join(" "));
    }

    Ok(())
}
