// rule.rs - Conway's B3/S23 transition

/// Next state of a single cell given its live neighbour count.
#[inline]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 2) | (true, 3) => true, // Survival
        (false, 3)            => true, // Birth
        _                     => false, // Death or stays dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_cell_survives_with_two_or_three() {
        assert!(next_state(true, 2));
        assert!(next_state(true, 3));
    }

    #[test]
    fn live_cell_dies_from_under_or_overpopulation() {
        for n in [0, 1, 4, 5, 6, 7, 8] {
            assert!(!next_state(true, n), "live cell with {n} neighbours should die");
        }
    }

    #[test]
    fn dead_cell_is_born_only_with_three() {
        for n in 0..=8 {
            assert_eq!(next_state(false, n), n == 3);
        }
    }
}
