use std::process::ExitCode;

use clap::Parser;
use cubematch::{Age, CollisionStrategy, PuzzleConfig, Solver};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    // Youngest possible age
    #[arg(long, allow_negative_numbers = true)]
    #[arg(default_value_t = 2)]
    min_age: Age,
    // Oldest possible age
    #[arg(long, allow_negative_numbers = true)]
    #[arg(default_value_t = 19)]
    max_age: Age,
    // Number of children per father
    #[arg(short = 'n', long = "children")]
    #[arg(default_value_t = 3)]
    num_children: usize,
    // Years back in time the ambiguity must recur
    #[arg(short = 'y', long, allow_negative_numbers = true)]
    #[arg(default_value_t = 2)]
    year_diff: Age,

    #[arg(long, value_enum)]
    #[arg(default_value = "pairwise")]
    strategy: CollisionStrategy,
    // Print answers as a JSON array
    #[arg(long)]
    json: bool,
    // Print run counters to stderr
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = PuzzleConfig {
        min_age: args.min_age,
        max_age: args.max_age,
        num_children: args.num_children,
        year_diff: args.year_diff,
    };
    let solution = match Solver::new(config).and_then(|solver| {
        solver.with_strategy(args.strategy).solve()
    }) {
        Ok(solution) => solution,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if args.stats {
        eprintln!("{}", solution.stats);
    }
    if args.json {
        println!(
            "{}",
            serde_json::to_string(&solution.answers).expect("age sets serialise to JSON")
        );
    } else {
        for answer in &solution.answers {
            println!("{answer}");
        }
    }
    ExitCode::SUCCESS
}
