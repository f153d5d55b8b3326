use crate::cli::StepsArgs;
use crate::exit_codes;
use crate::output;
use ecg_batch::{PaddingMode, StepConfig};
use serde::Serialize;

#[derive(Serialize)]
struct StepInfo {
    op: &'static str,
    description: &'static str,
}

pub fn execute(args: StepsArgs) -> i32 {
    let steps: Vec<StepInfo> = StepConfig::catalog()
        .iter()
        .map(|&(op, description)| StepInfo { op, description })
        .collect();

    if args.json {
        return output::emit(&steps, false, None);
    }

    println!("Available pipeline steps:\n");
    println!("  {:<16} Description", "Op");
    println!("  {}", "-".repeat(72));
    for step in &steps {
        println!("  {:<16} {}", step.op, step.description);
    }
    println!();
    let modes: Vec<&str> = PaddingMode::ALL.iter().map(|m| m.name()).collect();
    println!("Convolution padding modes: {}", modes.join(", "));
    println!(r#"Example step: {{ "op": "segment", "length": 720, "step": 360 }}"#);

    exit_codes::SUCCESS
}
