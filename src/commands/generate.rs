use console::style;

use kmpgen::error::Result;
use kmpgen::GenerationRequest;

use super::{print_json, Context};

pub fn run(
    ctx: &Context,
    project_name: String,
    package_name: String,
    output: String,
    bundle_id: Option<String>,
) -> Result<()> {
    let request = GenerationRequest {
        project_name,
        package_name,
        output_dir: output,
        bundle_id,
    };

    let report = ctx.generator()?.generate(&request)?;

    if ctx.json {
        print_json(&report);
        return Ok(());
    }

    println!(
        "\n{} Generated project \"{}\" at {}",
        style("✓").green().bold(),
        report.project_name,
        style(report.target_path.display()).cyan()
    );

    println!("\nConfiguration:");
    println!("  - Project Name: {}", report.project_name);
    println!("  - Package Name: {}", report.package_name);
    println!("  - iOS Bundle ID: {}", report.bundle_id);

    match (&report.scan_report, &report.scan_error) {
        (Some(scan), _) if scan.is_clean => println!(
            "\nValidation: {} - No template references found.",
            style("PASSED").green().bold()
        ),
        (Some(scan), _) => {
            println!(
                "\nValidation: {} - Found {} template references:",
                style("WARNING").yellow().bold(),
                scan.references.len()
            );
            for reference in &scan.references {
                println!("  {} {}", style("⚠").yellow(), reference);
            }
        }
        (None, Some(err)) => println!(
            "\nValidation: {} - scan could not run: {}",
            style("WARNING").yellow().bold(),
            err
        ),
        (None, None) => {}
    }

    println!("\nNext steps:");
    for (i, step) in report.next_steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    Ok(())
}
