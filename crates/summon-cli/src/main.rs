use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use summon_image::{ArrayType, ClassType, Image, PrimitiveType, Type};
use summon_javac::JavacCheck;
use summon_plan::{Node, Plan, Solver, SolverOptions};

#[derive(Parser)]
#[command(
    name = "summon",
    version,
    about = "Synthesize a Java program that constructs an instance of a class from a set of jars"
)]
struct Cli {
    /// Type to construct: a fully qualified class name (com.example.Widget),
    /// a primitive (int), or an array of either (com.example.Widget[])
    target: String,

    /// Jar file to mine; repeat for multiple jars
    #[arg(long = "jar", value_name = "PATH")]
    jars: Vec<PathBuf>,

    /// Number of randomized search trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Abandon a trial once its accumulated cost exceeds this
    #[arg(long, default_value_t = 50)]
    cost_limit: u32,

    /// Abandon a trial once its recursion depth exceeds this
    #[arg(long, default_value_t = 16)]
    depth_limit: u32,

    /// Discard plans cheaper than this
    #[arg(long, default_value_t = 0)]
    min_cost: u32,

    /// RNG seed for reproducible plans (defaults to a random seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Write the generated source here instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Compile the generated source with javac against the jars
    #[arg(long)]
    check: bool,

    /// Print a JSON summary (plan and source) instead of bare source
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    target: String,
    seed: u64,
    cost: u32,
    steps: Vec<String>,
    source: &'a str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let target = parse_target(&cli.target)?;

    let image = Image::from_jars(&cli.jars).context("failed to load jars")?;
    tracing::info!(jars = cli.jars.len(), classes = image.len(), "image loaded");

    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, trials = cli.trials, "searching for a plan");

    let options = SolverOptions {
        trials: cli.trials,
        cost_limit: cli.cost_limit,
        depth_limit: cli.depth_limit,
        min_cost: cli.min_cost,
    };
    let mut solver = Solver::new(&image, options, Box::new(StdRng::seed_from_u64(seed)));
    let Some(plan) = solver.solve(&target) else {
        bail!(
            "no construction plan found for {} within {} trials (try raising --trials, --cost-limit, or --depth-limit)",
            cli.target,
            cli.trials
        );
    };
    tracing::info!(cost = plan.cost, steps = plan.len(), "plan found");

    let source = summon_emit::emit(&plan).context("failed to emit Java source")?;

    if let Some(path) = &cli.output {
        std::fs::write(path, &source)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "source written");
    }

    if cli.json {
        let summary = summarize(&cli.target, seed, &plan, &source);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if cli.output.is_none() {
        print!("{source}");
    }

    if cli.check {
        let check = JavacCheck::default();
        let outcome = check
            .compile(&source, &cli.jars)
            .context("failed to run javac")?;
        if !outcome.success {
            bail!("generated source failed to compile:\n{}", outcome.output);
        }
        tracing::info!("javac accepted the generated source");
    }

    Ok(())
}

fn summarize<'a>(target: &str, seed: u64, plan: &Plan, source: &'a str) -> PlanSummary<'a> {
    PlanSummary {
        target: target.to_string(),
        seed,
        cost: plan.cost,
        steps: plan
            .dependency_order
            .iter()
            .map(|dependency| dependency.to_string())
            .collect(),
        source,
    }
}

/// Parse the command-line target syntax into a construction node.
fn parse_target(input: &str) -> Result<Node> {
    let mut base = input.trim();
    let mut dimensions = 0u8;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped.trim_end();
        dimensions += 1;
    }
    if base.is_empty() {
        bail!("empty target type");
    }
    if base.contains('/') {
        bail!("target must use dotted names, not internal names: {input}");
    }

    let element = match base {
        "boolean" => Type::Primitive(PrimitiveType::Boolean),
        "byte" => Type::Primitive(PrimitiveType::Byte),
        "short" => Type::Primitive(PrimitiveType::Short),
        "char" => Type::Primitive(PrimitiveType::Char),
        "int" => Type::Primitive(PrimitiveType::Int),
        "long" => Type::Primitive(PrimitiveType::Long),
        "float" => Type::Primitive(PrimitiveType::Float),
        "double" => Type::Primitive(PrimitiveType::Double),
        name => Type::Class(ClassType::new(name)),
    };

    Ok(if dimensions == 0 {
        match element {
            Type::Primitive(p) => Node::Primitive(p),
            Type::Class(ct) => Node::Class(ct),
            Type::Array(arr) => Node::Array(arr),
        }
    } else {
        Node::Array(ArrayType::new(element, dimensions))
    })
}
