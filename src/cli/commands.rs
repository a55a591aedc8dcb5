//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::PathBuf;

use crate::config::{self, NaryCallConfig, QuadraticConfig, RangeSumConfig, ScaffoldConfig, ScaffoldMode};
use crate::fixture::FixtureWriter;
use crate::generators::{
    CaseGenerator, ForeignCallGenerator, LocalCallGenerator, QuadraticGenerator, RangeSumGenerator, Scenario,
    generate_seeded,
};
use crate::manifest;

use super::{CliError, CliResult, ExitCode, GenerateArgs};

/// Reject an override that the chosen scenario does not understand.
fn reject_override<T>(value: Option<T>, flag: &str, scenario: Scenario) -> CliResult<()> {
    if value.is_some() {
        return Err(CliError::failure(format!(
            "Error: {} does not apply to scenario '{}'",
            flag, scenario
        )));
    }
    Ok(())
}

fn nary_config(base: NaryCallConfig, args: &GenerateArgs) -> NaryCallConfig {
    let mut config = base;
    if let Some(max_arity) = args.max_arity {
        config = config.with_max_arity(max_arity);
    }
    if let Some(target) = args.target {
        config = config.with_target(target);
    }
    config
}

/// Build the generator for `args.scenario` with any overrides applied.
pub fn build_generator(args: &GenerateArgs) -> CliResult<Box<dyn CaseGenerator>> {
    let scenario = args.scenario;
    match scenario {
        Scenario::ForeignCalls | Scenario::LocalSum | Scenario::LocalWeighted => {
            reject_override(args.len, "--len", scenario)?;
            reject_override(args.ops, "--ops", scenario)?;
            reject_override(args.random_cases, "--random-cases", scenario)?;
        }
        Scenario::RangeSum => {
            reject_override(args.max_arity, "--max-arity", scenario)?;
            reject_override(args.target, "--target", scenario)?;
            reject_override(args.random_cases, "--random-cases", scenario)?;
        }
        Scenario::Quadratic => {
            reject_override(args.max_arity, "--max-arity", scenario)?;
            reject_override(args.target, "--target", scenario)?;
            reject_override(args.len, "--len", scenario)?;
            reject_override(args.ops, "--ops", scenario)?;
        }
    }

    let generator: Box<dyn CaseGenerator> = match scenario {
        Scenario::ForeignCalls => Box::new(ForeignCallGenerator::new(nary_config(NaryCallConfig::foreign(), args))),
        Scenario::LocalSum => Box::new(LocalCallGenerator::new(
            scenario,
            nary_config(NaryCallConfig::local_sum(), args),
        )),
        Scenario::LocalWeighted => Box::new(LocalCallGenerator::new(
            scenario,
            nary_config(NaryCallConfig::local_weighted(), args),
        )),
        Scenario::RangeSum => {
            let mut config = RangeSumConfig::default();
            if let Some(len) = args.len {
                config = config.with_len(len);
            }
            if let Some(ops) = args.ops {
                config = config.with_ops(ops);
            }
            Box::new(RangeSumGenerator::new(config))
        }
        Scenario::Quadratic => {
            let mut config = QuadraticConfig::default();
            if let Some(random_cases) = args.random_cases {
                config = config.with_random_cases(random_cases);
            }
            Box::new(QuadraticGenerator::new(config))
        }
    };
    Ok(generator)
}

/// Generate one case and write it into `args.out`.
pub fn generate(args: &GenerateArgs) -> CliResult<ExitCode> {
    let generator = build_generator(args)?;
    let seed = config::resolve_seed(args.seed);
    tracing::info!("generating {} with seed {}", args.scenario, seed);

    let case = generate_seeded(generator.as_ref(), seed)?;
    if args.check {
        generator.check(&case)?;
        tracing::info!("check passed");
    }

    let writer = FixtureWriter::new(&args.out);
    let written = writer.write(&case)?;

    println!(
        "✓ Generated {} case in {} ({} file(s), seed {})",
        args.scenario,
        writer.dir().display(),
        written.len(),
        seed
    );
    Ok(ExitCode::SUCCESS)
}

/// Scaffold manifests below `root`.
pub fn describe(root: PathBuf, merge: bool, file_name: String) -> CliResult<ExitCode> {
    let mode = if merge { ScaffoldMode::Merge } else { ScaffoldMode::Regenerate };
    let config = ScaffoldConfig::new(root).with_mode(mode).with_file_name(file_name);

    let report = manifest::scaffold(&config)?;

    for outcome in &report.written {
        if merge {
            println!(
                "  {}: {} example(s), {} classification(s) kept",
                outcome.dir.display(),
                outcome.examples,
                outcome.preserved
            );
        } else {
            println!("  {}: {} example(s)", outcome.dir.display(), outcome.examples);
        }
    }
    for path in &report.unlisted {
        println!("  ! not listed (file name is not UTF-8): {}", path.display());
    }
    println!(
        "\n✓ {} manifest(s) written, {} empty categor{} skipped",
        report.written.len(),
        report.skipped.len(),
        if report.skipped.len() == 1 { "y" } else { "ies" }
    );
    Ok(ExitCode::SUCCESS)
}
