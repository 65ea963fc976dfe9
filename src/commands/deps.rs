use console::style;

use kmpgen::error::Result;

use super::{print_json, Context};

pub fn run(ctx: &Context) -> Result<()> {
    let catalog = ctx.generator()?.list_dependencies()?;

    if ctx.json {
        print_json(&catalog);
        return Ok(());
    }

    println!("{}\n", style("Template dependencies").bold());
    println!("{}", style("Core versions").bold());
    println!("| Component | Version |");
    println!("|-----------|---------|");
    for dep in &catalog.core {
        println!("| {} | {} |", dep.name, dep.version);
    }

    println!("\n{}", style("All versions").bold());
    for dep in &catalog.all {
        println!("- {}: {}", dep.name, style(&dep.version).cyan());
    }

    Ok(())
}
