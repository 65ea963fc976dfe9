use console::style;

use kmpgen::error::Result;

use super::{print_json, Context};

pub fn run(ctx: &Context, path: String) -> Result<()> {
    let report = kmpgen::validate_project(&path)?;

    if ctx.json {
        print_json(&report);
    } else {
        println!(
            "{} {}\n",
            style("Validation Results for:").bold(),
            style(&path).cyan()
        );
        if report.is_clean {
            println!("Status: {}", style("PASSED").green().bold());
            println!("No template references found in source files.");
        } else {
            println!("Status: {}", style("FAILED").red().bold());
            println!(
                "Found {} template reference(s):\n",
                report.references.len()
            );
            for (i, reference) in report.references.iter().enumerate() {
                println!("{}. {}", i + 1, reference);
            }
            println!("\nThese references should be manually reviewed and updated.");
        }
    }

    if !report.is_clean {
        std::process::exit(1);
    }
    Ok(())
}
