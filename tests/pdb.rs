use std::fs;
use std::path::PathBuf;

use optimal_solver::board::{Board, OwnedBoard};
use optimal_solver::pattern::{build_database, Partition, PatternDatabase, PdbError};
use optimal_solver::solving::algorithm::bfs::BFSSolver;
use optimal_solver::solving::algorithm::heuristics::Heuristic;
use optimal_solver::solving::algorithm::idastar::IdaStarSolver;
use optimal_solver::solving::algorithm::Solver;
use optimal_solver::solving::movegen::MoveGenerator;

use crate::shared::sample_boards;

mod shared;

fn partition_3x3() -> Partition {
    Partition::new(3, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{name}-{}.pdb", std::process::id()))
}

#[test]
fn database_is_admissible_on_3x3_boards() {
    let database = build_database(&partition_3x3(), 1).unwrap();

    for (board, optimal) in sample_boards() {
        let bound = database.evaluate(&board);
        assert!(
            bound <= optimal as u64,
            "bound {bound} exceeds the optimum {optimal}"
        );
    }
}

#[test]
fn database_dominates_manhattan_distance_on_its_tiles() {
    let partition = partition_3x3();
    let database = build_database(&partition, 1).unwrap();

    for (board, _) in sample_boards() {
        let mut group_manhattan = 0u64;
        for group in partition.groups() {
            for row in 0..board.side() {
                for column in 0..board.side() {
                    let value = board.at(row, column);
                    if group.contains(&value) {
                        let target_row = (value - 1) / board.side();
                        let target_col = (value - 1) % board.side();
                        group_manhattan += u64::from(row.abs_diff(target_row))
                            + u64::from(column.abs_diff(target_col));
                    }
                }
            }
        }
        assert!(database.evaluate(&board) >= group_manhattan);
    }
}

#[test]
fn solver_with_database_matches_exhaustive_search() {
    let database = build_database(&partition_3x3(), 1).unwrap();

    for (board, _) in sample_boards() {
        let bfs_solution = Box::new(BFSSolver::new(board.clone(), MoveGenerator::default()))
            .solve()
            .unwrap();
        let ida_solution = Box::new(IdaStarSolver::new(
            board,
            Box::new(database.clone()),
            MoveGenerator::default(),
        ))
        .solve()
        .unwrap();
        assert_eq!(bfs_solution.len(), ida_solution.len());
    }
}

#[test]
fn solver_with_database_solves_4x4_optimally() {
    let partition = Partition::chunked(4, 3).unwrap();
    let database = build_database(&partition, 2).unwrap();

    let board: OwnedBoard = "5 1 2 4 9 6 3 8 0 10 7 11 13 14 15 12".parse().unwrap();
    let solution = Box::new(IdaStarSolver::new(
        board.clone(),
        Box::new(database),
        MoveGenerator::default(),
    ))
    .solve()
    .unwrap();

    assert_eq!(8, solution.len());
    assert!(shared::is_valid_solution(board, &solution));
}

#[test]
fn goal_board_evaluates_to_zero() {
    let database = build_database(&partition_3x3(), 1).unwrap();
    assert_eq!(0, database.evaluate(&OwnedBoard::solved(3)));
}

#[test]
fn rebuilt_database_is_byte_identical() {
    let first = build_database(&partition_3x3(), 2).unwrap();
    let second = build_database(&partition_3x3(), 1).unwrap();

    let first_path = temp_path("determinism-first");
    let second_path = temp_path("determinism-second");
    first.save(&first_path).unwrap();
    second.save(&second_path).unwrap();

    let first_bytes = fs::read(&first_path).unwrap();
    let second_bytes = fs::read(&second_path).unwrap();
    let _ = fs::remove_file(&first_path);
    let _ = fs::remove_file(&second_path);

    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn database_round_trips_through_disk() {
    let database = build_database(&partition_3x3(), 1).unwrap();
    let path = temp_path("round-trip");
    database.save(&path).unwrap();

    let loaded = PatternDatabase::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(database, loaded);
    for (board, _) in sample_boards() {
        assert_eq!(database.evaluate(&board), loaded.evaluate(&board));
    }
}

#[test]
fn missing_file_is_reported_as_missing() {
    let result = PatternDatabase::load(&temp_path("does-not-exist"));
    assert!(matches!(result, Err(PdbError::Missing(_))));
}

#[test]
fn foreign_file_is_reported_as_corrupt() {
    let path = temp_path("foreign");
    fs::write(&path, b"definitely not a database").unwrap();

    let result = PatternDatabase::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(PdbError::Corrupt(_))));
}

#[test]
fn truncated_file_is_reported_as_corrupt() {
    let database = build_database(&partition_3x3(), 1).unwrap();
    let path = temp_path("truncated");
    database.save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let result = PatternDatabase::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(PdbError::Corrupt(_))));
}
