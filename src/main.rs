use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use duration_human::DurationHuman;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use optimal_solver::board::{Board, BoardMove, OwnedBoard};
use optimal_solver::pattern::{build_database, Partition, PatternDatabase};
use optimal_solver::solving::algorithm::heuristics::{Heuristic, ManhattanDistance};
use optimal_solver::solving::algorithm::idastar::IdaStarSolver;
use optimal_solver::solving::algorithm::{Solver, SolvingError};
use optimal_solver::solving::movegen::{MoveGenerator, SearchOrder};

const EXIT_INVALID_INPUT: u8 = 1;
const EXIT_PDB_FAILURE: u8 = 2;
const EXIT_UNSOLVABLE: u8 = 3;
const EXIT_CANCELLED: u8 = 4;
const EXIT_BUILD_FAILURE: u8 = 5;

fn parse_search_order(s: &str) -> Result<SearchOrder, String> {
    const ORDER_LEN: usize = 4;
    let input = s.to_uppercase();
    if input == "R" {
        Ok(SearchOrder::Random)
    } else if input.len() != ORDER_LEN {
        Err(format!("Order must be {ORDER_LEN} characters"))
    } else {
        let order: Vec<BoardMove> = input
            .chars()
            .map(|c| match c {
                'U' => Ok(BoardMove::Up),
                'D' => Ok(BoardMove::Down),
                'L' => Ok(BoardMove::Left),
                'R' => Ok(BoardMove::Right),
                _ => Err(format!("Invalid character {c}")),
            })
            .collect::<Result<_, _>>()?;

        for i in 1..ORDER_LEN {
            let current = &order[i - 1];
            if order[i..].contains(current) {
                return Err(format!("Duplicate move {current}"));
            }
        }

        Ok(SearchOrder::Provided([
            order[0], order[1], order[2], order[3],
        ]))
    }
}

fn parse_partition(scheme: Option<&str>, side: u8) -> Result<Partition, String> {
    match scheme {
        None => {
            if side == 4 {
                Ok(Partition::standard_663())
            } else {
                Partition::chunked(side, side).map_err(|e| e.to_string())
            }
        }
        Some(named @ ("663" | "555" | "78")) => {
            if side != 4 {
                return Err(format!("Partition {named} only applies to 4x4 boards"));
            }
            Ok(match named {
                "663" => Partition::standard_663(),
                "555" => Partition::standard_555(),
                _ => Partition::standard_78(),
            })
        }
        Some(custom) => {
            let groups: Vec<Vec<u8>> = custom
                .split('/')
                .map(|group| {
                    group
                        .split(',')
                        .map(|label| label.trim().parse::<u8>())
                        .collect::<Result<_, _>>()
                })
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Invalid partition: {e}"))?;
            Partition::new(side, groups).map_err(|e| e.to_string())
        }
    }
}

#[derive(Parser, Debug)]
#[command(about, version, arg_required_else_help = true)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find a shortest solution for the board given on standard input
    Solve {
        /// Path of the pattern database
        #[arg(short, long, value_name = "PATH", default_value = "pattern.pdb")]
        pdb: PathBuf,

        /// Solve with the Manhattan-distance heuristic; no database is needed
        #[arg(short, long)]
        manhattan: bool,

        /// Permit solving with Manhattan distance when the database cannot be used
        #[arg(long)]
        fallback_manhattan: bool,

        /// Move ordering, e.g. ULDR, or R for random
        #[arg(short, long, value_name = "ORDER", value_parser = parse_search_order)]
        order: Option<SearchOrder>,

        /// Render the board after every move of the solution
        #[arg(long)]
        show_boards: bool,
    },
    /// Build a pattern database and write it to disk
    Build {
        /// Board side
        #[arg(short, long, default_value_t = 4)]
        size: u8,

        /// Partition scheme: 663, 555, 78, or explicit groups like 1,2,3/4,5,6,7/...
        #[arg(short, long, value_name = "SCHEME")]
        partition: Option<String>,

        /// Output path
        #[arg(short, long, value_name = "PATH", default_value = "pattern.pdb")]
        output: PathBuf,

        /// Number of build workers; 0 uses every logical CPU
        #[arg(short, long, default_value_t = 0)]
        workers: usize,
    },
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("logger initialization cannot fail");

    match cli.command {
        Command::Solve {
            pdb,
            manhattan,
            fallback_manhattan,
            order,
            show_boards,
        } => run_solve(&pdb, manhattan, fallback_manhattan, order, show_boards),
        Command::Build {
            size,
            partition,
            output,
            workers,
        } => run_build(size, partition.as_deref(), &output, workers),
    }
}

fn read_board_from_stdin() -> Result<OwnedBoard, String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| e.to_string())?;
    input.parse::<OwnedBoard>().map_err(|e| e.to_string())
}

fn select_heuristic(
    board: &OwnedBoard,
    pdb: &Path,
    manhattan: bool,
    fallback_manhattan: bool,
) -> Result<Box<dyn Heuristic>, ExitCode> {
    if manhattan {
        return Ok(Box::new(ManhattanDistance));
    }

    let loaded = PatternDatabase::load(pdb).and_then(|database| {
        database.check_side(board)?;
        Ok(database)
    });

    match loaded {
        Ok(database) => {
            log::info!(
                "using {} pattern database from {}",
                database.partition(),
                pdb.display()
            );
            Ok(Box::new(database))
        }
        Err(e) if fallback_manhattan => {
            log::warn!("{e}; falling back to Manhattan distance");
            Ok(Box::new(ManhattanDistance))
        }
        Err(e) => {
            log::error!("{e}");
            Err(ExitCode::from(EXIT_PDB_FAILURE))
        }
    }
}

fn run_solve(
    pdb: &Path,
    manhattan: bool,
    fallback_manhattan: bool,
    order: Option<SearchOrder>,
    show_boards: bool,
) -> ExitCode {
    let board = match read_board_from_stdin() {
        Ok(board) => board,
        Err(e) => {
            log::error!("Invalid board: {e}");
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let heuristic = match select_heuristic(&board, pdb, manhattan, fallback_manhattan) {
        Ok(heuristic) => heuristic,
        Err(exit_code) => return exit_code,
    };

    let move_generator = order.map(MoveGenerator::new).unwrap_or_default();
    let solver = Box::new(IdaStarSolver::new(
        board.clone(),
        heuristic,
        move_generator,
    ));

    let start = Instant::now();
    match solver.solve() {
        Ok(solution) => {
            let elapsed = DurationHuman::from(start.elapsed().as_nanos() as u64);
            log::info!("found a {}-move solution in {elapsed}", solution.len());

            let symbols: Vec<String> = solution.iter().map(ToString::to_string).collect();
            println!("{}", symbols.join(" "));

            if show_boards {
                let mut replay = board;
                println!("{replay}");
                for m in &solution {
                    replay.exec_move(*m);
                    println!();
                    println!("{replay}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(e @ SolvingError::UnsolvableBoard) => {
            log::error!("{e}");
            ExitCode::from(EXIT_UNSOLVABLE)
        }
        Err(e @ SolvingError::Cancelled) => {
            log::error!("{e}");
            ExitCode::from(EXIT_CANCELLED)
        }
    }
}

fn run_build(size: u8, scheme: Option<&str>, output: &Path, workers: usize) -> ExitCode {
    let partition = match parse_partition(scheme, size) {
        Ok(partition) => partition,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let start = Instant::now();
    let database = match build_database(&partition, workers) {
        Ok(database) => database,
        Err(e) => {
            log::error!("Build failed: {e}");
            return ExitCode::from(EXIT_BUILD_FAILURE);
        }
    };
    let elapsed = DurationHuman::from(start.elapsed().as_nanos() as u64);
    log::info!("built {partition} database in {elapsed}");

    if let Err(e) = database.save(output) {
        log::error!("Could not write {}: {e}", output.display());
        return ExitCode::from(EXIT_BUILD_FAILURE);
    }
    log::info!("written to {}", output.display());

    ExitCode::SUCCESS
}
