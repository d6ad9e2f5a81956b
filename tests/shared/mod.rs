use optimal_solver::board::{Board, BoardMove, OwnedBoard};
use optimal_solver::solving::algorithm::{Solver, SolvingError};

/// 3x3 boards paired with their optimal solution lengths
pub fn sample_boards() -> Vec<(OwnedBoard, usize)> {
    let boards = [
        ("1 2 3 4 5 6 7 8 0", 0),
        ("1 2 3 4 5 6 7 0 8", 1),
        ("1 2 3 4 0 5 7 8 6", 2),
        ("4 1 3 0 2 5 7 8 6", 5),
        ("4 1 3 7 2 5 8 0 6", 7),
    ];

    boards
        .into_iter()
        .map(|(s, optimal)| (s.parse().expect("sample board must parse"), optimal))
        .collect()
}

pub fn solution_to_string(solution: &[BoardMove]) -> String {
    let symbols: Vec<String> = solution.iter().map(ToString::to_string).collect();
    symbols.join(" ")
}

pub fn is_valid_solution(mut board: OwnedBoard, solution: &[BoardMove]) -> bool {
    for &m in solution {
        board.exec_move(m);
    }

    board.is_solved()
}

pub fn assert_produces_valid_solution<S, F>(create_solver: F)
where
    S: Solver,
    F: Fn(OwnedBoard) -> S,
{
    for (board, _) in sample_boards() {
        let solution = solve(create_solver(board.clone()));
        assert!(
            is_valid_solution(board, &solution),
            "solution {} is not valid",
            solution_to_string(&solution)
        );
    }
}

pub fn assert_produces_shortest_solution<S, F>(create_solver: F)
where
    S: Solver,
    F: Fn(OwnedBoard) -> S,
{
    for (board, optimal) in sample_boards() {
        let solution = solve(create_solver(board));
        assert_eq!(
            optimal,
            solution.len(),
            "solution {} is not the shortest one",
            solution_to_string(&solution)
        );
    }
}

fn solve(solver: impl Solver) -> Vec<BoardMove> {
    let result: Result<_, SolvingError> = Box::new(solver).solve();
    result.expect("sample boards must be solvable")
}
