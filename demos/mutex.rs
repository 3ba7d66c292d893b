//! Checks CTL formulas against the textbook two-process mutual exclusion model.
//!
//! Each process is in one of three locations: non-critical (`n`), trying (`t`) or critical
//! (`c`). A process moves `n -> t -> c -> n`, and may enter `c` only while the other one is not
//! there. States are named after both locations, e.g. `t1c2`.
//!
//! Run with:
//! ```bash
//! cargo run --example mutex -- "AG !(c1 & c2)" "AG (t1 -> AF c1)"
//! ```

use clap::Parser;
use log::info;

use ctl_rs::{parse, CheckOptions, InitialPolicy, Model, ModelChecker, State};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Formulas to check (a default set is used when none are given).
    #[arg(value_name = "FORMULA")]
    formulas: Vec<String>,

    /// Require every initial state to satisfy a formula.
    #[clap(long)]
    all: bool,

    /// Write the model, highlighting the SAT set of the last formula, to this DOT file.
    #[clap(long, value_name = "FILE")]
    dot: Option<std::path::PathBuf>,
}

const LOCATIONS: [char; 3] = ['n', 't', 'c'];

fn name(p1: char, p2: char) -> String {
    format!("{}1{}2", p1, p2)
}

fn step(location: char) -> char {
    match location {
        'n' => 't',
        't' => 'c',
        _ => 'n',
    }
}

fn mutex_model() -> Model<String> {
    let mut model = Model::new();
    for p1 in LOCATIONS {
        for p2 in LOCATIONS {
            if p1 == 'c' && p2 == 'c' {
                continue;
            }
            let mut state = State::new(name(p1, p2))
                .with_initial(p1 == 'n' && p2 == 'n')
                .with_property(format!("{}1", p1))
                .with_property(format!("{}2", p2));
            let next1 = step(p1);
            if !(next1 == 'c' && p2 == 'c') {
                state = state.with_transition(name(next1, p2));
            }
            let next2 = step(p2);
            if !(next2 == 'c' && p1 == 'c') {
                state = state.with_transition(name(p1, next2));
            }
            model.add_state(state);
        }
    }
    model
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let formulas = if args.formulas.is_empty() {
        vec![
            "AG !(c1 & c2)".to_string(),
            "AG (t1 -> AF c1)".to_string(),
            "AG (t1 -> EF c1)".to_string(),
            "AG EF n1".to_string(),
            "EF (c1 & EX c2)".to_string(),
        ]
    } else {
        args.formulas
    };

    let model = mutex_model();
    info!("Model has {} states", model.len());

    let options = CheckOptions {
        initial: if args.all { InitialPolicy::All } else { InitialPolicy::Any },
    };
    let checker = ModelChecker::with_options(&model, options);

    let mut last_sat = None;
    for text in &formulas {
        let formula = parse(text)?;
        let sat = checker.sat(&formula)?;
        println!("{} = {}", text, checker.holds_in(&sat));
        println!("  normalized: {}", formula);
        println!("  SAT = {:?}", checker.ids(&sat));
        last_sat = Some(sat);
    }
    println!("Total fixpoint iterations: {}", checker.iterations());

    if let Some(path) = args.dot {
        let dot = model.to_dot(last_sat.as_ref())?;
        std::fs::write(&path, dot)?;
        println!("Wrote model to {}", path.display());
    }

    Ok(())
}
